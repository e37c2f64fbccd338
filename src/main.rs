//! Binary entrypoint for the gallery frame.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use gallery_frame::catalog::{Catalog, HarvardClient};
use gallery_frame::config::Configuration;
use gallery_frame::tasks;
use humantime::format_duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(
    name = "gallery-frame",
    version,
    about = "Museum artwork slideshow"
)]
struct Cli {
    /// Path to YAML config file
    #[arg(value_name = "CONFIG", default_value = "config.yaml")]
    config: PathBuf,

    /// Catalog API key (overrides catalog.api-key)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// Override the initial page size
    #[arg(long, value_name = "COUNT")]
    page_size: Option<u32>,

    /// Print one page of search results for QUERY and exit
    #[arg(long, value_name = "QUERY")]
    search: Option<String>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("gallery_frame={level}").parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("hyper=warn".parse()?);
    fmt().with_env_filter(filter).with_target(false).compact().init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut cfg = Configuration::from_yaml_file(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    if let Some(key) = cli.api_key {
        cfg.catalog.api_key = key;
    }
    if let Some(size) = cli.page_size {
        cfg.slideshow.initial_page_size = size;
    }
    let cfg = cfg.validated().context("invalid configuration values")?;
    info!(
        config = %cli.config.display(),
        base_url = %cfg.catalog.base_url,
        initial_page_size = cfg.slideshow.initial_page_size,
        growth_page_size = cfg.slideshow.growth_page_size,
        advance_interval = %format_duration(cfg.slideshow.advance_interval),
        "configuration loaded"
    );

    let client = Arc::new(HarvardClient::new(&cfg.catalog).context("failed to build catalog client")?);

    if let Some(query) = cli.search {
        return print_search(&client, &query).await;
    }

    let cancel = CancellationToken::new();

    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    // Slideshow controller; the handle carries commands in and snapshots out
    let (handle, controller) =
        tasks::controller::spawn(Arc::clone(&client), cfg.slideshow.clone(), cancel.clone());

    let mut tasks = JoinSet::new();

    tasks.spawn(async move {
        controller.await.context("controller task panicked")?.context("controller task failed")
    });

    // Keyboard input
    tasks.spawn({
        let lines = tasks::input::spawn_stdin_reader();
        let handle = handle.clone();
        let cancel = cancel.clone();
        async move {
            tasks::input::run(lines, handle, cancel)
                .await
                .context("input task failed")
        }
    });

    // The viewer runs in the foreground until shutdown
    if let Err(e) = tasks::viewer::run(handle, cancel.clone())
        .await
        .context("viewer failed")
    {
        tracing::error!("{e:?}");
    }
    cancel.cancel();

    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("task error: {e:?}"),
            Err(e) => tracing::error!("join error: {e}"),
        }
    }

    Ok(())
}

async fn print_search(client: &HarvardClient, query: &str) -> Result<()> {
    let page = client
        .search_page(query, 1)
        .await
        .with_context(|| format!("search for {query:?} failed"))?;

    println!(
        "# search: {query}\n# matches: {} (page {} of {})\n",
        page.info.totalrecords, page.info.page, page.info.pages
    );
    if page.records.is_empty() {
        println!("(no displayable artworks)");
    }
    for artwork in &page.records {
        println!("{:>9}  {} / {}", artwork.id, artwork.title, artwork.creator());
        println!("           {}", artwork.image_url());
    }
    Ok(())
}
