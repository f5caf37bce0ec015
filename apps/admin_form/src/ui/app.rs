//! Event loop state for the admin form host.

use std::{io::Write, sync::Arc, time::Instant};

use cascade::{AlertContainer, CascadeController, LookupDispatch, RenderSurface, SubmitDecision};

use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    input::{parse_action, FormAction, HELP},
};
use crate::ui::terminal::TerminalSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub struct FormApp<W: Write, D: LookupDispatch> {
    form: CascadeController<TerminalSurface<W>, D>,
    alerts: Arc<AlertContainer>,
    last_alert_shown: Option<Instant>,
    last_error: Option<UiError>,
    submissions: Vec<(String, String)>,
    /// Set once stdin is gone; the loop only waits for an in-flight lookup.
    closing: bool,
}

impl<W: Write, D: LookupDispatch> FormApp<W, D> {
    pub fn new(form: CascadeController<TerminalSurface<W>, D>, alerts: Arc<AlertContainer>) -> Self {
        Self {
            form,
            alerts,
            last_alert_shown: None,
            last_error: None,
            submissions: Vec::new(),
            closing: false,
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) -> LoopControl {
        let control = match event {
            UiEvent::Input(line) => self.handle_action(parse_action(&line)),
            UiEvent::InputClosed => {
                self.closing = true;
                LoopControl::Continue
            }
            UiEvent::Info(message) => {
                tracing::info!("{message}");
                LoopControl::Continue
            }
            UiEvent::LookupCompleted(completion) => {
                let failure = completion.result.as_ref().err().map(ToString::to_string);
                if self.form.on_lookup_completed(completion) {
                    self.last_error = failure
                        .map(|message| UiError::from_message(UiErrorContext::Lookup, message));
                }
                LoopControl::Continue
            }
            UiEvent::Error(err) => {
                tracing::error!(
                    category = ?err.category(),
                    context = ?err.context(),
                    "{}",
                    err.message()
                );
                let fatal = err.is_fatal();
                self.form.surface_mut().signal(err.message());
                self.last_error = Some(err);
                if fatal {
                    LoopControl::Exit
                } else {
                    LoopControl::Continue
                }
            }
        };
        self.show_new_alert(Instant::now());
        if self.closing && self.form.in_flight().is_none() {
            return LoopControl::Exit;
        }
        control
    }

    fn handle_action(&mut self, action: FormAction) -> LoopControl {
        match action {
            FormAction::SetSource(value) => self.form.on_source_change(value),
            FormAction::SelectDependent(value) => {
                if !self.form.select_dependent(&value) {
                    self.form
                        .surface_mut()
                        .signal(&format!("'{value}' is not an available admin"));
                }
            }
            FormAction::Submit => {
                if self.form.on_submit_attempt() == SubmitDecision::Allow {
                    let division = self.form.source().to_string();
                    let admin = self.form.dependent_value().to_string();
                    self.form
                        .surface_mut()
                        .notice(&format!("submitted division={division} admin={admin}"));
                    self.submissions.push((division, admin));
                }
            }
            FormAction::Show => self.show(),
            FormAction::Help => self.form.surface_mut().notice(HELP),
            FormAction::Quit => return LoopControl::Exit,
            FormAction::Unknown(line) => {
                self.form
                    .surface_mut()
                    .signal(&format!("unknown command '{line}'; {HELP}"));
            }
        }
        LoopControl::Continue
    }

    fn show(&mut self) {
        let render = self.form.render_description();
        let status = match &self.last_error {
            Some(err) => format!(
                "division={} last error ({:?}): {}",
                self.form.source(),
                err.category(),
                err.message()
            ),
            None => format!("division={}", self.form.source()),
        };
        let surface = self.form.surface_mut();
        surface.notice(&status);
        surface.apply(&render);
        if let Some(alert) = self.alerts.current(Instant::now()) {
            surface.show_alert(&alert);
        }
    }

    fn show_new_alert(&mut self, now: Instant) {
        let Some(alert) = self.alerts.current(now) else {
            return;
        };
        if self.last_alert_shown == Some(alert.raised_at) {
            return;
        }
        self.last_alert_shown = Some(alert.raised_at);
        self.form.surface_mut().show_alert(&alert);
    }

    #[cfg(test)]
    pub fn form(&self) -> &CascadeController<TerminalSurface<W>, D> {
        &self.form
    }

    pub fn submissions(&self) -> &[(String, String)] {
        &self.submissions
    }

    #[cfg(test)]
    pub fn last_error(&self) -> Option<&UiError> {
        self.last_error.as_ref()
    }
}

#[cfg(test)]
#[path = "../tests/app_tests.rs"]
mod tests;
