//! Command orchestration from the cascade controller to the backend queue.

use cascade::{DispatchError, LookupDispatch, LookupTicket};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), DispatchError> {
    let cmd_name = match &cmd {
        BackendCommand::Lookup(_) => "lookup",
        BackendCommand::Shutdown => "shutdown",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "ui command queue is full");
            Err(DispatchError::QueueFull)
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::warn!(command = cmd_name, "backend command processor disconnected");
            Err(DispatchError::Disconnected)
        }
    }
}

/// Hands lookup tickets to the backend worker thread.
pub struct BridgeDispatcher {
    cmd_tx: Sender<BackendCommand>,
}

impl BridgeDispatcher {
    pub fn new(cmd_tx: Sender<BackendCommand>) -> Self {
        Self { cmd_tx }
    }
}

impl LookupDispatch for BridgeDispatcher {
    fn dispatch(&mut self, ticket: LookupTicket) -> Result<(), DispatchError> {
        dispatch_backend_command(&self.cmd_tx, BackendCommand::Lookup(ticket))
    }
}
