use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use concordance::{Corpus, CqlConfig, IndexedCorpus, TextField};
use log::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Keyword-in-context search over a tokenized corpus")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity of diagnostic logging.
    #[arg(short, long, value_enum, default_value_t = LogLevel::Error)]
    verbosity: LogLevel,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    #[value(alias("0"))]
    Error,
    #[value(alias("1"))]
    Warn,
    #[value(alias("2"))]
    Info,
    #[value(alias("3"))]
    Debug,
    #[value(alias("4"))]
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a CQL query against a JSON-lines corpus and print the resulting KWICs.
    Search(SearchArgs),
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    /// Path to a corpus file, one JSON document per line.
    #[arg(long)]
    corpus: PathBuf,

    /// The CQL query to run. Required unless --dump-schema is given.
    #[arg(long)]
    query: Option<String>,

    /// Named field holding a document's sentences. Ignored with --bare.
    #[arg(long, default_value = "text")]
    text_field: String,

    /// Documents are bare sequences of sentences, with no named text field.
    #[arg(long)]
    bare: bool,

    #[arg(long, default_value_t = 5)]
    left: usize,

    #[arg(long, default_value_t = 5)]
    right: usize,

    #[arg(long, default_value_t = 6)]
    max_quant: usize,

    #[arg(long, default_value = "word")]
    default_attr: String,

    /// Print the corpus's inferred attribute schema and exit without searching.
    #[arg(long)]
    dump_schema: bool,
}

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new().parse_filters(cli.verbosity.as_filter()).init();

    match cli.command {
        Commands::Search(args) => {
            if let Err(err) = run_search(args) {
                error!("{err}");
                std::process::exit(1);
            }
        }
    }
}

fn run_search(args: SearchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(&args.corpus)?;
    let mut documents = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        documents.push(serde_json::from_str(line)?);
    }

    let text_field = if args.bare { TextField::Bare } else { TextField::Named(args.text_field) };
    let corpus = Corpus { documents, text_field };
    let config = CqlConfig { default_attr: args.default_attr, max_quant: args.max_quant };
    let indexed = IndexedCorpus::build(corpus, config)?;
    info!("indexed corpus with schema {:?}", indexed.schema());

    if args.dump_schema {
        println!("{}", serde_json::to_string_pretty(indexed.schema())?);
        return Ok(());
    }

    let query = args.query.ok_or("--query is required unless --dump-schema is given")?;
    let results: Vec<_> = indexed.search(&query, args.left, args.right)?.collect();
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
