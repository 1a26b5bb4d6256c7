use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

pub const SUGGESTIONS_COLLECTION: &str = "suggestions";

pub const STATUS_FIELD: &str = "status";
pub const ACCEPTED_AT_FIELD: &str = "acceptedAt";

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SuggestionStatus { Pending, Accepted, Rejected, Unknown }

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Accepted => "accepted",
            SuggestionStatus::Rejected => "rejected",
            SuggestionStatus::Unknown => "unknown",
        }
    }
}

impl From<&str> for SuggestionStatus {
    fn from(value: &str) -> Self {
        match value {
            "pending" => SuggestionStatus::Pending,
            "accepted" => SuggestionStatus::Accepted,
            "rejected" => SuggestionStatus::Rejected,
            _ => SuggestionStatus::Unknown,
        }
    }
}

/// Identity of a suggestion document, usable to delete it.
/// Deserialized from a `{"_id": 1}` projection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SuggestionRef {
    #[serde(rename = "_id")]
    pub id: Bson,
}

impl SuggestionRef {
    pub fn new(id: impl Into<Bson>) -> Self {
        Self { id: id.into() }
    }
}
