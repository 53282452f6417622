use anyhow::Result;
use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing::info;
use wordfreq::{
    init_logger, logger::level_from_verbosity, map_reduce, report, HttpFetcher, PipelineConfig,
    ShuffleMode, TerminalChart, Vocabulary, DEFAULT_TOP, DEFAULT_URL,
};

/// Counts the words of a text fetched over HTTP and charts the most frequent.
#[derive(Parser, Debug)]
pub struct Cli {
    #[arg(default_value = DEFAULT_URL)]
    url: String,
    /// Only count these words (case-insensitive)
    #[arg(short, long = "words")]
    words: Vec<String>,
    #[arg(short, long, default_value_t = DEFAULT_TOP)]
    top: usize,
    /// Map/reduce worker threads, 0 for one per CPU
    #[arg(short = 'j', long, default_value_t = 0)]
    workers: usize,
    #[arg(short, long, value_enum, default_value_t = ShuffleMode::Sequential)]
    shuffle: ShuffleMode,
    /// Also write logs to <LOG_DIR>/wordfreq.log
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let _guard = init_logger(level_from_verbosity(cli.verbose), cli.log_dir.as_deref())?;

    let vocabulary = Vocabulary::new(&cli.words);
    let config = PipelineConfig {
        workers: cli.workers,
        shuffle: cli.shuffle,
    };
    let url = cli.url;
    let result = tokio::task::spawn_blocking(move || {
        map_reduce(&HttpFetcher, &url, Some(&vocabulary), &config)
    })
    .await??;

    // the pipeline has already logged why
    let Some(table) = result else {
        return Ok(ExitCode::FAILURE);
    };
    if table.is_empty() {
        info!("no words counted, nothing to show");
        return Ok(ExitCode::SUCCESS);
    }

    println!("Word counts: {table}");
    report(&table, cli.top, &mut TerminalChart::stdout())?;
    Ok(ExitCode::SUCCESS)
}
