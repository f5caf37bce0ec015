use serde::Deserialize;

/// Placeholder and message strings shown by the cascade. Every field can be
/// overridden from config; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CascadeText {
    pub unselected: String,
    pub loading: String,
    pub prompt: String,
    pub empty: String,
    pub error: String,
    pub lookup_failed_alert: String,
    pub source_required: String,
    pub dependent_required: String,
}

impl Default for CascadeText {
    fn default() -> Self {
        Self {
            unselected: "Select Admin (choose division first)".into(),
            loading: "Loading admins...".into(),
            prompt: "Select Admin".into(),
            empty: "No admins found in this division".into(),
            error: "Error loading admins".into(),
            lookup_failed_alert: "Error loading admins for selected division".into(),
            source_required: "Please select a division first.".into(),
            dependent_required: "Please select an admin for the project.".into(),
        }
    }
}
