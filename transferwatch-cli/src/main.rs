//! transferwatch CLI
//!
//! Long-running watcher: polls the transfer listing, appends newly
//! announced players to the JSON store, and enriches them against FMRef.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use transferwatch_core::traits::Resolver;
use transferwatch_fmref::{NameSearchResolver, RenderClient, TeamLookupResolver};
use transferwatch_listing::ListingClient;
use transferwatch_pipeline::{
    CycleEvent, CycleReport, EnrichPolicy, SystemClock, TokioSleeper, WatchOptions, Watcher,
    default_workers,
};
use transferwatch_store::DedupKey;

mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "transferwatch")]
#[command(about = "Watch the transfer listing and enrich new players with FMRef data", long_about = None)]
struct Cli {
    /// Path to the transfers JSON store
    #[arg(short, long, default_value = "data/transfers.json")]
    store: PathBuf,

    /// Lookup strategy for eligible records
    #[arg(short, long, value_enum, default_value = "names")]
    resolver: Strategy,

    /// Listing pages to scan per cycle (default: 10 for names, 1 for teams)
    #[arg(short, long)]
    pages: Option<u32>,

    /// Seconds between cycles
    #[arg(short, long, default_value_t = 600)]
    interval: u64,

    /// Also re-resolve records still holding the unresolved sentinel
    #[arg(long)]
    retry_pending: bool,

    /// Deduplicate by name + listing id instead of name alone
    #[arg(long)]
    strict_dedup: bool,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Listing site base URL
    #[arg(long, default_value = transferwatch_listing::client::DEFAULT_BASE_URL)]
    listing_url: String,

    /// FMRef site base URL
    #[arg(long, default_value = transferwatch_fmref::client::DEFAULT_SITE_URL)]
    fmref_url: String,

    /// Browserless-compatible rendering service URL
    #[arg(long, default_value = transferwatch_fmref::client::DEFAULT_SERVICE_URL)]
    render_url: String,

    /// Rendering service access token
    #[arg(long)]
    render_token: Option<String>,

    /// Suppress the spinner (log lines only)
    #[arg(short, long)]
    quiet: bool,
}

/// Which enrichment strategy runs each cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Resolve new players to FMRef ids via the search page
    Names,
    /// Resolve known FMRef ids to their affiliated team
    Teams,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    rt.block_on(async {
        if let Err(e) = run(cli).await {
            log::error!(
                "{} {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            std::process::exit(1);
        }
    });
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let source =
        ListingClient::new(&cli.listing_url).map_err(|e| CliError::config(e.to_string()))?;
    let render = RenderClient::new(
        &cli.render_url,
        cli.render_token.as_deref(),
        &cli.fmref_url,
    )
    .map_err(|e| CliError::config(e.to_string()))?;

    let pages = cli.pages.unwrap_or(match cli.resolver {
        Strategy::Names => 10,
        Strategy::Teams => 1,
    });

    let options = WatchOptions {
        store_path: cli.store.clone(),
        pages,
        interval: Duration::from_secs(cli.interval),
        policy: if cli.retry_pending {
            EnrichPolicy::RetryPending
        } else {
            EnrichPolicy::NewOnly
        },
        dedup: if cli.strict_dedup {
            DedupKey::NameAndId
        } else {
            DedupKey::Name
        },
        workers: default_workers(),
    };

    log::info!(
        "Watching {} page(s) every {}s, store: {}",
        pages,
        cli.interval,
        cli.store.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    match cli.resolver {
        Strategy::Names => {
            drive(source, NameSearchResolver::new(render), options, cli.once, cli.quiet).await
        }
        Strategy::Teams => {
            drive(source, TeamLookupResolver::new(render), options, cli.once, cli.quiet).await
        }
    }
}

async fn drive<R: Resolver>(
    source: ListingClient,
    resolver: R,
    options: WatchOptions,
    once: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let store_label = options.store_path.display().to_string();
    let watcher = Watcher::new(source, resolver, SystemClock, TokioSleeper, options);

    if once {
        let report = watcher
            .run_cycle()
            .await
            .map_err(|e| CliError::pipeline(e.to_string()))?;
        print_report(&report, &store_label);
        return Ok(());
    }

    let mut spinner: Option<ProgressBar> = None;
    watcher
        .run(|event| match event {
            CycleEvent::CycleStarted => {
                log::info!("Checking for new transfers...");
                spinner = checking_spinner(quiet);
            }
            CycleEvent::CycleFinished(report) => {
                clear_spinner(&mut spinner);
                print_report(&report, &store_label);
            }
            CycleEvent::CycleFailed { error } => {
                clear_spinner(&mut spinner);
                log::warn!(
                    "{} {} (will retry next cycle)",
                    "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                    error,
                );
            }
            CycleEvent::Sleeping { interval } => {
                log::info!("Waiting {} before the next check...", humanize(interval));
            }
        })
        .await
        .map_err(|e| CliError::pipeline(e.to_string()))
}

fn print_report(report: &CycleReport, store_label: &str) {
    if report.added > 0 {
        log::info!(
            "{} Added {} new player(s) to {} (resolved: {}, sentinels: {}, failures: {})",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            report.added,
            store_label,
            report.resolved,
            report.sentinels,
            report.failed,
        );
    } else if report.changed() {
        log::info!(
            "{} No new players; re-resolved {} pending record(s)",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            report.resolved + report.sentinels + report.failed,
        );
    } else {
        log::info!("No new players found.");
    }
}

fn checking_spinner(quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("/-\\|"),
    );
    pb.set_message("Scanning listing pages...");
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

fn clear_spinner(spinner: &mut Option<ProgressBar>) {
    if let Some(pb) = spinner.take() {
        pb.finish_and_clear();
    }
}

fn humanize(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        format!("{} minute(s)", secs / 60)
    } else {
        format!("{} second(s)", secs)
    }
}
