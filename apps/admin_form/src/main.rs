use std::{io, path::PathBuf, sync::Arc};

mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::{Context, Result};
use cascade::{AlertContainer, AlertSink, CascadeController, InitialState};
use clap::Parser;
use client_core::{HttpLookupClient, LookupCapability};
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{events::UiEvent, orchestration::BridgeDispatcher};
use crate::ui::{FormApp, LoopControl, RenderFormat, TerminalSurface};

/// Terminal host for the project form's division -> admin cascade.
#[derive(Parser, Debug)]
struct Args {
    /// TOML config file (defaults to ./admin_form.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    /// Pre-selected division, as when editing an existing project
    #[arg(long, default_value = "")]
    division: String,
    /// Pre-selected admin, kept if the division still offers it
    #[arg(long, default_value = "")]
    admin: String,
    /// Print the dependent control as HTML instead of text
    #[arg(long)]
    html: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    let lookup: Arc<dyn LookupCapability> = Arc::new(
        HttpLookupClient::with_timeout(&settings.endpoint(), settings.request_timeout())
            .context("failed to configure lookup client")?,
    );
    tracing::info!(server_url = %settings.server_url, "admin form starting");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let worker = backend_bridge::runtime::launch(cmd_rx, ui_tx.clone(), lookup);
    ui::terminal::spawn_stdin_reader(ui_tx);

    let format = if args.html {
        RenderFormat::Html
    } else {
        RenderFormat::Text
    };
    let alerts = Arc::new(AlertContainer::new(settings.alert_dismiss_after()));
    let form = CascadeController::start(
        TerminalSurface::new(io::stdout(), format),
        BridgeDispatcher::new(cmd_tx.clone()),
        Some(Arc::clone(&alerts) as Arc<dyn AlertSink>),
        settings.text.clone(),
        InitialState {
            source: args.division.into(),
            dependent: args.admin,
        },
    );
    let mut app = FormApp::new(form, alerts);

    while let Ok(event) = ui_rx.recv() {
        if app.handle_event(event) == LoopControl::Exit {
            break;
        }
    }

    tracing::info!(submissions = app.submissions().len(), "admin form closed");
    let _ = cmd_tx.try_send(BackendCommand::Shutdown);
    drop(app);
    drop(cmd_tx);
    if worker.join().is_err() {
        tracing::error!("backend worker panicked");
    }
    Ok(())
}
