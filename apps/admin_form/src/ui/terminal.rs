//! Terminal render surface and stdin reader.

use std::{
    io::{self, BufRead, Write},
    thread,
};

use cascade::{Alert, Control, RenderDescription, RenderSurface};
use crossbeam_channel::Sender;

use crate::controller::events::{UiError, UiErrorContext, UiEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderFormat {
    #[default]
    Text,
    Html,
}

pub struct TerminalSurface<W: Write> {
    out: W,
    format: RenderFormat,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, format: RenderFormat) -> Self {
        Self { out, format }
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn show_alert(&mut self, alert: &Alert) {
        let text = match self.format {
            RenderFormat::Text => format!("[{}] {}", alert.severity, alert.message),
            RenderFormat::Html => alert.to_html(),
        };
        self.emit(&text);
    }

    pub fn notice(&mut self, message: &str) {
        self.emit(message);
    }

    fn emit(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::warn!("terminal write failed: {err}");
        }
    }
}

impl<W: Write> RenderSurface for TerminalSurface<W> {
    fn apply(&mut self, render: &RenderDescription) {
        let text = format_render(render, self.format);
        self.emit(&text);
    }

    fn focus(&mut self, control: Control) {
        self.emit(&format!("focus -> {}", control_label(control)));
    }

    fn signal(&mut self, message: &str) {
        self.emit(&format!("! {message}"));
    }
}

pub fn control_label(control: Control) -> &'static str {
    match control {
        Control::Source => "division",
        Control::Dependent => "admin",
    }
}

pub fn format_render(render: &RenderDescription, format: RenderFormat) -> String {
    if format == RenderFormat::Html {
        let disabled = if render.enabled { "" } else { " disabled" };
        return format!(
            "<select id=\"id_assigned_to_admin\"{disabled}>{}</select>",
            render.to_html()
        );
    }

    let state = if render.enabled { "enabled" } else { "disabled" };
    let mut text = format!("admin ({state})");
    let mut marked = false;
    for (index, entry) in render.entries.iter().enumerate() {
        let chosen = !marked && entry.value == render.selected;
        marked |= chosen;
        let mark = if chosen { '*' } else { ' ' };
        if index == 0 {
            text.push_str(&format!("\n  [{mark}] {}", entry.label));
        } else {
            text.push_str(&format!("\n  [{mark}] {}: {}", entry.value, entry.label));
        }
    }
    text
}

/// Forwards stdin lines as input events; signals end of input on EOF.
pub fn spawn_stdin_reader(ui_tx: Sender<UiEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if ui_tx.send(UiEvent::Input(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    let _ = ui_tx.send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::Input,
                        format!("failed to read stdin: {err}"),
                    )));
                    break;
                }
            }
        }
        let _ = ui_tx.send(UiEvent::InputClosed);
    })
}
