use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use status_core::{badge_selector, BadgeClass, PollerViewModel};
use status_engine::{InMemoryBadge, InMemoryDom, ReqwestStatusFetcher, StatusPoller};
use status_logging::{status_error, status_info};

use super::config::{load_config, BoardConfig, DEFAULT_CONFIG_FILENAME};
use super::{logging, render};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    config_path: PathBuf,
    once: bool,
}

fn parse_args(args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut config_path = None;
    let mut once = false;
    for arg in args {
        match arg.as_str() {
            "--once" => once = true,
            flag if flag.starts_with("--") => anyhow::bail!("unknown flag {flag}"),
            path if config_path.is_none() => config_path = Some(PathBuf::from(path)),
            extra => anyhow::bail!("unexpected argument {extra}"),
        }
    }
    Ok(Args {
        config_path: config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME)),
        once,
    })
}

pub fn run_app(args: impl Iterator<Item = String>) -> anyhow::Result<()> {
    let args = parse_args(args).context("usage: status_board [CONFIG] [--once]")?;
    let config = load_config(&args.config_path)?;
    logging::initialize(config.log_destination, config.level_filter()?);
    status_info!("Loaded config from {:?}", args.config_path);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    runtime.block_on(run_board(config, args.once))
}

fn build_page(config: &BoardConfig) -> InMemoryDom {
    let dom = InMemoryDom::new();
    if config.status_container {
        dom.add_container(config.container_selector.clone());
    }
    for id in &config.badges {
        dom.insert_badge(
            badge_selector(id),
            InMemoryBadge::new(&["badge", BadgeClass::Secondary.css_class()], "Pending"),
        );
    }
    dom
}

fn print_board(view: &PollerViewModel, dom: &InMemoryDom) {
    for line in render::render_board(Utc::now(), view, &dom.snapshot()) {
        println!("{line}");
    }
    println!();
}

async fn run_board(config: BoardConfig, once: bool) -> anyhow::Result<()> {
    let fetcher = ReqwestStatusFetcher::new(&config.endpoint, config.fetch_settings())
        .with_context(|| format!("cannot poll {}", config.endpoint))?;
    status_info!("Polling {}", fetcher.endpoint());
    let dom = Arc::new(build_page(&config));
    let poller = StatusPoller::new(Arc::new(fetcher), dom.clone(), config.poll_settings());

    if once {
        let view = poller.poll_once().await;
        print_board(&view, &dom);
        return Ok(());
    }

    if !poller.start() {
        println!(
            "No status container {:?} on this board; nothing to poll.",
            config.container_selector
        );
        return Ok(());
    }

    let mut render_tick = tokio::time::interval(config.render_interval());
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            result = &mut shutdown => {
                if let Err(err) = result {
                    status_error!("Failed to listen for Ctrl-C: {}", err);
                }
                break;
            }
            _ = render_tick.tick() => {
                if let Some(view) = poller.take_view_if_dirty() {
                    print_board(&view, &dom);
                }
            }
        }
    }

    poller.stop();
    status_info!("Status board shutting down");
    Ok(())
}
