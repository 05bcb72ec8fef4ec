use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

use codelookup_cli::render::{corpus_stats, matches_json, matches_table};
use codelookup_cli::session::{Session, SessionCommand, HELP};
use codelookup_core::config::Config;
use codelookup_core::traits::CorpusProvider;
use codelookup_core::Corpus;
use codelookup_corpus::CorpusService;
use codelookup_rank::{CodeSearchEngine, SearchOptions};
use codelookup_records::InMemoryRecordStore;

type Engine = CodeSearchEngine<CorpusService>;

/// Search ICF functioning and ICD-10-CM diagnosis codes
#[derive(Parser, Debug)]
#[command(name = "codelookup", author, version, about, long_about = None)]
struct Args {
    /// Directory holding config.toml (defaults to the working directory)
    #[arg(long, env = "CODELOOKUP_CONFIG_DIR")]
    config: Option<PathBuf>,

    /// Diagnosis document path or URL; an empty value disables it
    #[arg(long)]
    source: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one ranked search
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Maximum results (capped at 50)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show corpus statistics
    Stats,
    /// Search, select codes and save them to a patient's assessment
    Interactive {
        #[arg(long, default_value = "demo-patient")]
        patient: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let base_dir = match args.config {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let config = Config::load_from(&base_dir).map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let mut settings = config.settings()?;
    if let Some(source) = args.source {
        settings.corpus.diagnosis_source = source;
    }
    tracing::debug!("Settings from {}: {:?}", config.base_dir().display(), settings);

    let service = CorpusService::from_settings(&settings.corpus, config.base_dir());
    let engine = CodeSearchEngine::with_options(service, SearchOptions::from(&settings.search));

    match args.command {
        Commands::Search { query, limit, json } => {
            let query = query.join(" ");
            if !query.trim().is_empty() {
                load_corpus(&engine).await;
            }
            let matches = engine.search_with_limit(&query, limit.unwrap_or(engine.options().limit)).await;
            if json {
                println!("{}", matches_json(&matches)?);
            } else {
                print!("{}", matches_table(&query, &matches));
            }
        }
        Commands::Stats => {
            print!("{}", corpus_stats(load_corpus(&engine).await));
        }
        Commands::Interactive { patient } => {
            let store = InMemoryRecordStore::new();
            interactive_loop(&engine, &store, patient).await?;
        }
    }
    Ok(())
}

async fn load_corpus(engine: &Engine) -> &Corpus {
    let service = engine.provider();
    if service.is_loaded() {
        return service.corpus().await;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Loading codes from {}", service.source()));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let corpus = service.corpus().await;
    spinner.finish_and_clear();
    corpus
}

async fn interactive_loop(engine: &Engine, store: &InMemoryRecordStore, patient: String) -> Result<()> {
    let corpus = load_corpus(engine).await;
    let mut session = Session::resume(patient, store).await?;

    println!("Code lookup for patient {} ({} codes loaded)", session.patient_id(), corpus.len());
    println!("{}", HELP);
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"lookup> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match SessionCommand::parse(&line) {
            SessionCommand::Empty => continue,
            SessionCommand::Search(query) => {
                let matches = engine.search(&query).await;
                print!("{}", matches_table(&query, &matches));
                session.set_results(matches);
            }
            SessionCommand::Select(n) => match session.select(n) {
                Ok((code, true)) => println!("Added {} {}", code.code, code.description),
                Ok((code, false)) => println!("Removed {} {}", code.code, code.description),
                Err(e) => println!("{}", e),
            },
            SessionCommand::Selected => {
                if session.selected().is_empty() {
                    println!("No codes selected yet");
                }
                for (i, code) in session.selected().iter().enumerate() {
                    println!("{:>3}. {} {}", i + 1, code.code, code.description);
                }
            }
            SessionCommand::Save => match session.save(store).await {
                Ok(saved) => println!("Saved {} codes ({})", saved.selected_codes.len(), saved.patient_id.as_deref().unwrap_or_default()),
                Err(e) => println!("Save failed: {}", e),
            },
            SessionCommand::Stats => print!("{}", corpus_stats(corpus)),
            SessionCommand::Help => println!("{}", HELP),
            SessionCommand::Quit => break,
            SessionCommand::Invalid(message) => println!("{}", message),
        }
        println!();
    }
    Ok(())
}
