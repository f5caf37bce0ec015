//! Cascade controller: state machine for the dependent control.

use std::sync::Arc;

use shared::{
    domain::{OptionRecord, SelectionValue},
    error::LookupError,
};
use tracing::{debug, info, warn};

use crate::{
    alert::{AlertSink, Severity},
    dispatch::{LookupCompletion, LookupDispatch, LookupTicket},
    guard::{check_submission, Control, SubmitDecision},
    render::{describe, RenderDescription},
    text::CascadeText,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiMode {
    #[default]
    Unselected,
    Loading,
    Populated,
    Empty,
    Error,
}

/// Adapter applying controller output to a concrete UI.
pub trait RenderSurface {
    fn apply(&mut self, render: &RenderDescription);
    fn focus(&mut self, control: Control);
    fn signal(&mut self, message: &str);
}

/// Values present when the form is first shown, e.g. when editing an
/// existing record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialState {
    pub source: SelectionValue,
    pub dependent: String,
}

pub struct CascadeController<S, D> {
    surface: S,
    dispatcher: D,
    alerts: Option<Arc<dyn AlertSink>>,
    text: CascadeText,
    source: SelectionValue,
    mode: UiMode,
    records: Vec<OptionRecord>,
    selected: String,
    retained: Option<String>,
    generation: u64,
    in_flight: Option<LookupTicket>,
}

impl<S: RenderSurface, D: LookupDispatch> CascadeController<S, D> {
    /// Builds the controller and renders the initial state. A pre-populated
    /// source starts a lookup straight away.
    pub fn start(
        surface: S,
        dispatcher: D,
        alerts: Option<Arc<dyn AlertSink>>,
        text: CascadeText,
        initial: InitialState,
    ) -> Self {
        let retained = (!initial.dependent.is_empty()).then_some(initial.dependent);
        let mut controller = Self {
            surface,
            dispatcher,
            alerts,
            text,
            source: SelectionValue::empty(),
            mode: UiMode::Unselected,
            records: Vec::new(),
            selected: String::new(),
            retained,
            generation: 0,
            in_flight: None,
        };

        if initial.source.is_empty() {
            controller.retained = None;
            controller.render();
        } else {
            controller.on_source_change(initial.source);
        }
        controller
    }

    pub fn on_source_change(&mut self, value: impl Into<SelectionValue>) {
        let value = value.into();
        self.generation += 1;
        self.source = value;
        self.records.clear();

        if self.source.is_empty() {
            info!(generation = self.generation, "cascade: source cleared");
            self.mode = UiMode::Unselected;
            self.selected.clear();
            self.retained = None;
            self.in_flight = None;
            self.render();
            return;
        }

        if !self.selected.is_empty() {
            self.retained = Some(std::mem::take(&mut self.selected));
        }
        self.mode = UiMode::Loading;
        self.render();

        let ticket = LookupTicket {
            generation: self.generation,
            source: self.source.clone(),
        };
        self.in_flight = Some(ticket.clone());
        debug!(
            generation = ticket.generation,
            source = ticket.source.as_str(),
            "cascade: dispatching lookup"
        );
        if let Err(err) = self.dispatcher.dispatch(ticket.clone()) {
            self.on_lookup_completed(LookupCompletion {
                ticket,
                result: Err(LookupError::failed(err.to_string())),
            });
        }
    }

    /// Applies a finished lookup. Returns `false` when the completion belongs
    /// to a superseded ticket and was discarded.
    pub fn on_lookup_completed(&mut self, completion: LookupCompletion) -> bool {
        if self.in_flight.as_ref() != Some(&completion.ticket) {
            debug!(
                generation = completion.ticket.generation,
                current = self.generation,
                source = completion.ticket.source.as_str(),
                "cascade: discarding stale lookup"
            );
            return false;
        }
        self.in_flight = None;

        match completion.result {
            Ok(records) if records.is_empty() => {
                self.mode = UiMode::Empty;
                self.retained = None;
            }
            Ok(records) => {
                self.mode = UiMode::Populated;
                if let Some(retained) = self.retained.take() {
                    if records.iter().any(|record| record.id == retained) {
                        self.selected = retained;
                    }
                }
                self.records = records;
            }
            Err(err) => {
                warn!(source = self.source.as_str(), "cascade: {err}");
                self.mode = UiMode::Error;
                self.retained = None;
                if let Some(alerts) = &self.alerts {
                    alerts.notify(&self.text.lookup_failed_alert, Severity::Error);
                }
            }
        }
        info!(
            source = self.source.as_str(),
            mode = ?self.mode,
            records = self.records.len(),
            "cascade: lookup applied"
        );
        self.render();
        true
    }

    /// Records the user's pick. Only the placeholder or a rendered record id
    /// is accepted, and only while the control is populated.
    pub fn select_dependent(&mut self, value: &str) -> bool {
        if self.mode != UiMode::Populated {
            return false;
        }
        if !value.is_empty() && !self.records.iter().any(|record| record.id == value) {
            return false;
        }
        self.selected = value.to_string();
        self.render();
        true
    }

    pub fn on_submit_attempt(&mut self) -> SubmitDecision {
        let decision = check_submission(self.source.as_str(), &self.selected, &self.text);
        if let SubmitDecision::Block { focus, message } = &decision {
            debug!(%focus, "cascade: submission blocked");
            self.surface.signal(message);
            self.surface.focus(*focus);
        }
        decision
    }

    pub fn render_description(&self) -> RenderDescription {
        describe(self.mode, &self.records, &self.selected, &self.text)
    }

    pub fn mode(&self) -> UiMode {
        self.mode
    }

    pub fn source(&self) -> &SelectionValue {
        &self.source
    }

    pub fn dependent_value(&self) -> &str {
        &self.selected
    }

    pub fn in_flight(&self) -> Option<&LookupTicket> {
        self.in_flight.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn render(&mut self) {
        let render = self.render_description();
        self.surface.apply(&render);
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
