use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use pixiv_downloader::app::{App, ItemStatus, RunReport};
use pixiv_downloader::config::{
    self, DEFAULT_COOKIE_FILE, DEFAULT_DELAY_SECS, DEFAULT_DOWNLOAD_DIR, RunOptions,
};
use pixiv_downloader::fs_util;
use pixiv_downloader::output::{JsonOutput, OutputMode, TextOutput};
use pixiv_downloader::pixiv::PixivHttpClient;
use pixiv_downloader::store::CompletionStore;

#[derive(Parser)]
#[command(name = "pixiv-dl")]
#[command(about = "Batch downloader for Pixiv artworks with an incremental completion store")]
#[command(version, author)]
struct Cli {
    /// File containing artwork URLs, one per line
    input: PathBuf,

    /// Directory downloaded images are written to
    #[arg(short = 'd', long, default_value = DEFAULT_DOWNLOAD_DIR)]
    download_dir: Utf8PathBuf,

    /// File holding the pixiv session cookie
    #[arg(short = 'c', long, default_value = DEFAULT_COOKIE_FILE)]
    cookie_file: PathBuf,

    /// Re-download artworks already recorded as complete
    #[arg(long)]
    force: bool,

    /// Seconds to wait between artworks
    #[arg(long, default_value_t = DEFAULT_DELAY_SECS)]
    delay_secs: u64,

    /// Treat a failing pages request as an error instead of falling back
    /// to the single-page URL
    #[arg(long)]
    strict_pages: bool,

    /// Emit the run report as JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(report) => {
            if report.tally.failed > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> miette::Result<RunReport> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    fs_util::ensure_dir(cli.download_dir.as_std_path()).into_diagnostic()?;
    let store = CompletionStore::open(config::store_path(&cli.download_dir)).into_diagnostic()?;
    let cookie_header = config::load_cookie_header(&cli.cookie_file).into_diagnostic()?;
    let urls = config::read_url_file(&cli.input).into_diagnostic()?;

    if matches!(output_mode, OutputMode::Text) {
        println!("download directory: {}", cli.download_dir);
        println!("completion store: {} artwork(s) recorded", store.count());
        println!("processing {} URL(s)", urls.len());
    }

    let fetcher = PixivHttpClient::new(&cookie_header).into_diagnostic()?;
    let mut options = RunOptions::new(cli.download_dir);
    options.force = cli.force;
    options.strict_pages = cli.strict_pages;
    options.delay = Duration::from_secs(cli.delay_secs);

    let mut app = App::new(store, fetcher, options);
    let report = match output_mode {
        OutputMode::Json => {
            let report = app.run(&urls, &JsonOutput);
            JsonOutput::print_report(&report).into_diagnostic()?;
            report
        }
        OutputMode::Text => {
            let report = app.run(&urls, &TextOutput);
            print_run_summary(&report);
            report
        }
    };

    Ok(report)
}

fn print_run_summary(report: &RunReport) {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let red = "\x1b[31m";
    let reset = "\x1b[0m";

    println!("\n{cyan}download summary{reset}");
    println!("total URLs:      {}", report.tally.total);
    println!("{green}succeeded:       {}{reset}", report.tally.succeeded);
    println!("{yellow}skipped:         {}{reset}", report.tally.skipped);
    println!("{red}failed:          {}{reset}", report.tally.failed);
    println!("store total:     {}", report.store_total);

    for item in &report.items {
        if matches!(
            item.status,
            ItemStatus::Completed | ItemStatus::Skipped
        ) {
            continue;
        }
        let id = item.artwork_id.as_deref().unwrap_or("?");
        println!("{red}  {id}: {:?} ({}){reset}", item.status, item.url);
    }
}
