mod render;
mod shell;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pccrawler_core::{query, Crawler, CrawlerConfig, InvertedIndex};
use render::{ConsoleRenderer, JsonRenderer, ResultRenderer};
use shell::Shell;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "pc-crawler")]
#[command(about = "Build and query an inverted index of a local file hierarchy", long_about = None)]
struct Cli {
    /// Root of the hierarchy to index (a directory or a single file)
    root: PathBuf,
    /// Load the index previously built for ROOT instead of rebuilding it
    #[arg(short = 'I', long)]
    load_index: bool,
    /// Allow-list of indexable terms
    #[arg(long, default_value = "resources/Thesaurus_es_ES.txt")]
    thesaurus: PathBuf,
    /// Single line of whitespace separated stopwords
    #[arg(long, default_value = "resources/stopwords_es.txt")]
    stopwords: PathBuf,
    /// JSON file overriding the crawler configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory where the index file is written and read
    #[arg(long)]
    index_dir: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Format::Console)]
    format: Format,
    /// Run these queries and exit instead of opening the interactive shell
    #[arg(long = "query", value_name = "TERM")]
    queries: Vec<String>,
    /// Print the whole index and exit
    #[arg(long, default_value_t = false)]
    print_index: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Console,
    Json,
}

fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[ERROR] {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => CrawlerConfig::from_json_file(path)?,
        None => CrawlerConfig::default(),
    };
    if cli.index_dir.is_some() {
        config.index_dir = cli.index_dir.clone();
    }

    let mut crawler = Crawler::new(config).context("invalid crawler configuration")?;
    let index = if cli.load_index {
        crawler.load(&cli.root)
    } else {
        if let Err(e) = crawler.load_thesauri(&cli.thesaurus, &cli.stopwords) {
            tracing::error!(error = %e, "could not load thesauri");
        }
        crawler
            .build(&cli.root)
            .with_context(|| format!("building the index for {}", cli.root.display()))?
    };

    let renderer: &dyn ResultRenderer = match cli.format {
        Format::Console => &ConsoleRenderer,
        Format::Json => &JsonRenderer,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.queries.is_empty() && !cli.print_index {
        let stdin = io::stdin();
        Shell::new(&index, renderer).run(stdin.lock(), &mut out)?;
        return Ok(());
    }
    run_batch(&index, renderer, &cli.queries, cli.print_index, &mut out)?;
    out.flush()?;
    Ok(())
}

fn run_batch(
    index: &InvertedIndex,
    renderer: &dyn ResultRenderer,
    queries: &[String],
    print_index: bool,
    out: &mut dyn Write,
) -> io::Result<()> {
    if print_index {
        renderer.render_index(index, out)?;
    }
    for term in queries {
        renderer.render_query(&query(index, term), out)?;
    }
    Ok(())
}
