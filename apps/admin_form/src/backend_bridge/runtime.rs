//! Lookup worker: owns the tokio runtime and answers lookup commands.

use std::{sync::Arc, thread};

use cascade::resolve;
use client_core::LookupCapability;
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    lookup: Arc<dyn LookupCapability>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let event = UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                ));
                if let Err(err) = ui_tx.send(event) {
                    tracing::error!("backend: startup failure not delivered: {err}");
                }
                return;
            }
        };

        runtime.block_on(async move {
            if let Err(err) = ui_tx.try_send(UiEvent::Info("Lookup worker ready".to_string())) {
                tracing::warn!("backend: ready notice not delivered: {err}");
            }

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Lookup(ticket) => {
                        tracing::info!(
                            generation = ticket.generation,
                            source = ticket.source.as_str(),
                            "backend: lookup"
                        );
                        let lookup = Arc::clone(&lookup);
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let completion = resolve(lookup.as_ref(), ticket).await;
                            deliver(ui_tx, UiEvent::LookupCompleted(completion)).await;
                        });
                    }
                    BackendCommand::Shutdown => {
                        tracing::info!("backend: shutdown requested");
                        break;
                    }
                }
            }
        });
    })
}

/// Completions must reach the UI loop, so a full queue waits for room off the async workers.
async fn deliver(ui_tx: Sender<UiEvent>, event: UiEvent) {
    let event = match ui_tx.try_send(event) {
        Ok(()) => return,
        Err(TrySendError::Full(event)) => event,
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!("backend: lookup completion not delivered: ui loop gone");
            return;
        }
    };
    match tokio::task::spawn_blocking(move || ui_tx.send(event)).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::error!("backend: lookup completion not delivered: {err}"),
        Err(err) => tracing::error!("backend: completion delivery task failed: {err}"),
    }
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
