use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"^[a-zA-Z0-9-\.]+@[a-zA-Z0-9-]+\.[a-zA-Z]{2,4}$").unwrap();
}

/// Processing state of an item.
///
/// Every item starts out [`ItemStatus::Unprocessed`]; only the batch
/// processor (or an explicit update) moves it to [`ItemStatus::Processed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Unprocessed,
    Processed,
}

/// The persisted record this service manages.
///
/// `id` is `None` until the store assigns one on insert and is immutable
/// afterwards. A missing `status` field deserializes to the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Option<u64>,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    pub email: Option<String>,
}

impl Item {
    /// Collects every validation violation for this payload.
    ///
    /// An empty vector means the payload is acceptable. Absent email is
    /// valid; a present one must match the expected address shape.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if let Some(email) = self.email.as_deref()
            && !EMAIL_PATTERN.is_match(email)
        {
            errors.push("Wrong email format".to_string());
        }

        errors
    }
}
