//! Submission guard for the host form.

use std::fmt;

use crate::text::CascadeText;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Source,
    Dependent,
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Dependent => f.write_str("dependent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitDecision {
    Allow,
    Block { focus: Control, message: String },
}

impl SubmitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Source is checked before the dependent value so the user is sent to the
/// first unfilled control.
pub fn check_submission(source: &str, dependent: &str, text: &CascadeText) -> SubmitDecision {
    if source.is_empty() {
        SubmitDecision::Block {
            focus: Control::Source,
            message: text.source_required.clone(),
        }
    } else if dependent.is_empty() {
        SubmitDecision::Block {
            focus: Control::Dependent,
            message: text.dependent_required.clone(),
        }
    } else {
        SubmitDecision::Allow
    }
}
