//! How lookup tickets reach a lookup capability and how completions come back.

use std::sync::Arc;

use client_core::LookupCapability;
use shared::{
    domain::{OptionRecord, SelectionValue},
    error::LookupError,
};
use thiserror::Error;
use tokio::sync::mpsc;

/// Identifies one issued lookup. A completion is only applied while its
/// ticket is still the controller's latest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub generation: u64,
    pub source: SelectionValue,
}

#[derive(Debug, Clone)]
pub struct LookupCompletion {
    pub ticket: LookupTicket,
    pub result: Result<Vec<OptionRecord>, LookupError>,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("lookup queue is full")]
    QueueFull,
    #[error("lookup worker disconnected")]
    Disconnected,
}

pub trait LookupDispatch {
    fn dispatch(&mut self, ticket: LookupTicket) -> Result<(), DispatchError>;
}

pub async fn resolve(lookup: &dyn LookupCapability, ticket: LookupTicket) -> LookupCompletion {
    let result = lookup.lookup(&ticket.source).await;
    LookupCompletion { ticket, result }
}

/// Runs each lookup on its own tokio task and reports completions over an
/// unbounded channel. Must be used from within a tokio runtime.
pub struct TaskDispatcher {
    lookup: Arc<dyn LookupCapability>,
    completions: mpsc::UnboundedSender<LookupCompletion>,
}

impl TaskDispatcher {
    pub fn new(
        lookup: Arc<dyn LookupCapability>,
    ) -> (Self, mpsc::UnboundedReceiver<LookupCompletion>) {
        let (completions, rx) = mpsc::unbounded_channel();
        (
            Self {
                lookup,
                completions,
            },
            rx,
        )
    }
}

impl LookupDispatch for TaskDispatcher {
    fn dispatch(&mut self, ticket: LookupTicket) -> Result<(), DispatchError> {
        if self.completions.is_closed() {
            return Err(DispatchError::Disconnected);
        }
        let lookup = Arc::clone(&self.lookup);
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let completion = resolve(lookup.as_ref(), ticket).await;
            if completions.send(completion).is_err() {
                tracing::debug!("lookup completion dropped: receiver gone");
            }
        });
        Ok(())
    }
}
