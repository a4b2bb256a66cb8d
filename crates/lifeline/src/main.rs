//! `lifeline` - CLI for the drone fleet operations console
//!
//! This binary logs in, drives the console pages against an in-memory
//! surface and prints what they render.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use lifeline::api::{ApiClient, HttpTransport};
use lifeline::cli::{Cli, Command, ConfigCommand, RunCommand, StatusCommand};
use lifeline::model::{default_fleet, default_system_health, KpiMetric, KpiSnapshot};
use lifeline::render::{MemoryTarget, RecordingCharts};
use lifeline::views::fleet::summary_line;
use lifeline::views::{status_counts, Page};
use lifeline::{init_logging, AppContext, Config, SessionController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Run(run_cmd) => handle_run(config, run_cmd).await,
        Command::Status(status_cmd) => handle_status(&config, &status_cmd).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn api_client(config: &Config, offline: bool) -> anyhow::Result<ApiClient> {
    if offline {
        info!("offline mode, backend will not be contacted");
        return Ok(ApiClient::offline());
    }
    let transport = HttpTransport::new(config).context("failed to build HTTP client")?;
    Ok(ApiClient::new(Arc::new(transport)))
}

async fn handle_run(config: Config, cmd: RunCommand) -> anyhow::Result<()> {
    let api = api_client(&config, cmd.offline)?;
    let target = Arc::new(MemoryTarget::standard());
    let charts = RecordingCharts::new();
    let ctx = AppContext::new(api, config, target.clone(), Arc::new(charts.clone()));
    let mut controller = SessionController::new(ctx);

    let session = match controller.login(&cmd.username, &cmd.password).await {
        Ok(session) => session,
        Err(e) => anyhow::bail!("{}", e.login_message()),
    };
    println!(
        "Logged in as {} ({}) via {:?}",
        session.display_name, session.role, session.source
    );

    if cmd.emergency {
        let alert = controller.trigger_emergency().await?;
        println!("{}: {}", alert.title, alert.message);
    }

    let hold = Duration::from_secs(cmd.duration_secs);
    for page in cmd.pages.into_iter().map(Page::from) {
        if !controller.navigate(page.id()).await {
            warn!(%page, "page could not be opened");
            continue;
        }
        info!(%page, secs = cmd.duration_secs, "holding page");

        let interrupted = tokio::select! {
            () = tokio::time::sleep(hold) => false,
            _ = tokio::signal::ctrl_c() => true,
        };

        println!();
        println!("== {page} ==");
        print!("{}", target.dump());
        print!("{}", charts.summary());

        if interrupted {
            info!("interrupted, logging out");
            break;
        }
    }

    controller.logout().await;
    println!();
    println!("Logged out.");
    Ok(())
}

async fn handle_status(config: &Config, cmd: &StatusCommand) -> anyhow::Result<()> {
    let api = api_client(config, cmd.offline)?;
    let (kpis, fleet, health) =
        tokio::join!(api.kpis(), api.fleet_status(), api.system_health());

    let live = kpis.is_ok() && fleet.is_ok() && health.is_ok();
    let kpis = kpis.unwrap_or_else(|e| {
        warn!(error = %e, "KPI fetch failed, showing defaults");
        KpiSnapshot::default()
    });
    let fleet = fleet.unwrap_or_else(|e| {
        warn!(error = %e, "fleet fetch failed, showing defaults");
        default_fleet()
    });
    let health = health.unwrap_or_else(|e| {
        warn!(error = %e, "health fetch failed, showing defaults");
        default_system_health()
    });
    let counts: BTreeMap<String, usize> = status_counts(&fleet)
        .into_iter()
        .map(|(status, count)| (status.to_string(), count))
        .collect();
    let source = if live { "backend" } else { "fallback" };

    if cmd.json {
        let status = serde_json::json!({
            "backend": config.api.base_url,
            "source": source,
            "kpis": kpis,
            "status_counts": counts,
            "system_health": health,
            "fleet": fleet,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("lifeline status");
        println!("---------------");
        println!("Backend:       {}", config.api.base_url);
        println!("Source:        {source}");
        println!();
        for metric in KpiMetric::ALL {
            println!("{:<22} {}", format!("{metric}:"), metric.format(kpis.value(metric)));
        }
        println!();
        for (status, count) in &counts {
            println!("{:<22} {count}", format!("{status}:"));
        }
        println!();
        for (component, status) in &health {
            println!("{:<22} {status}", format!("{component}:"));
        }
        println!();
        for drone in &fleet {
            println!("  {}", summary_line(drone));
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[API]");
                println!("  Base URL:           {}", config.api.base_url);
                println!("  Connect timeout ms: {}", config.api.connect_timeout_ms);
                println!();
                println!("[Refresh]");
                println!(
                    "  Dashboard ms:       {}",
                    config.refresh.dashboard_interval_ms
                );
                println!("  Tracking ms:        {}", config.refresh.tracking_interval_ms);
                println!(
                    "  Time labels ms:     {}",
                    config.refresh.time_label_interval_ms
                );
                println!("  Frame ms:           {}", config.refresh.frame_interval_ms);
                println!();
                println!("[Auth]");
                println!("  Offline fallback:   {:?}", config.auth.offline_fallback);
                println!("  Error dismiss ms:   {}", config.auth.error_dismiss_ms);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
