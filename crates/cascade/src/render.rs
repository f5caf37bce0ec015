//! Pure mapping from controller state to what the dependent control shows.

use shared::domain::OptionRecord;

use crate::{controller::UiMode, text::CascadeText};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub value: String,
    pub label: String,
}

impl OptionEntry {
    fn placeholder(label: &str) -> Self {
        Self {
            value: String::new(),
            label: label.to_string(),
        }
    }
}

/// Desired state of the dependent control. `entries[0]` is always the
/// placeholder (empty value); records follow only in populated mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDescription {
    pub mode: UiMode,
    pub entries: Vec<OptionEntry>,
    pub enabled: bool,
    pub selected: String,
}

impl RenderDescription {
    pub fn placeholder(&self) -> &OptionEntry {
        &self.entries[0]
    }

    pub fn record_count(&self) -> usize {
        self.entries.len() - 1
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let mut marked = false;
        for entry in &self.entries {
            html.push_str(&format!("<option value=\"{}\"", html_escape(&entry.value)));
            if !marked && entry.value == self.selected {
                html.push_str(" selected");
                marked = true;
            }
            html.push('>');
            html.push_str(&html_escape(&entry.label));
            html.push_str("</option>");
        }
        html
    }
}

pub fn describe(
    mode: UiMode,
    records: &[OptionRecord],
    selected: &str,
    text: &CascadeText,
) -> RenderDescription {
    let placeholder = match mode {
        UiMode::Unselected => &text.unselected,
        UiMode::Loading => &text.loading,
        UiMode::Populated => &text.prompt,
        UiMode::Empty => &text.empty,
        UiMode::Error => &text.error,
    };
    let mut entries = vec![OptionEntry::placeholder(placeholder)];

    if mode == UiMode::Populated {
        entries.extend(records.iter().map(|record| OptionEntry {
            value: record.id.clone(),
            label: record.label.clone(),
        }));
    }

    let selected = if mode == UiMode::Populated {
        selected.to_string()
    } else {
        String::new()
    };

    RenderDescription {
        mode,
        entries,
        enabled: mode == UiMode::Populated,
        selected,
    }
}

pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
