use serde::{Deserialize, Deserializer, Serialize};

use crate::{domain::OptionRecord, error::LookupError};

/// Record as served by the admin lookup endpoint. Ids arrive as integers from
/// the reference server but are treated as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRecord {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
}

impl From<AdminRecord> for OptionRecord {
    fn from(value: AdminRecord) -> Self {
        Self {
            id: value.id,
            label: value.name,
        }
    }
}

/// Body of a lookup response: either `{"admins": [...]}` or `{"error": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admins: Option<Vec<AdminRecord>>,
}

impl LookupPayload {
    pub fn records(admins: Vec<AdminRecord>) -> Self {
        Self {
            error: None,
            admins: Some(admins),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            admins: None,
        }
    }

    /// An error indicator wins over any records; an empty error string does
    /// not count as one.
    pub fn into_records(self) -> Result<Vec<OptionRecord>, LookupError> {
        if let Some(message) = self.error.filter(|message| !message.is_empty()) {
            return Err(LookupError::Rejected(message));
        }
        match self.admins {
            Some(admins) => Ok(admins.into_iter().map(OptionRecord::from).collect()),
            None => Err(LookupError::failed(
                "payload carries neither admins nor error",
            )),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}
