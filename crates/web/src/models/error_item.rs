//! Mistake notebook records.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mistake_book_core::{ErrorItemId, TagId, UserId};

/// A logged mistake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorItem {
    pub id: ErrorItemId,
    /// Student who logged the mistake.
    pub user_id: UserId,
    pub subject: Option<String>,
    /// The question as originally captured.
    pub question_text: String,
    /// The student's (wrong) answer.
    pub answer_text: Option<String>,
    /// Explanation of the mistake, possibly AI-generated.
    pub analysis: Option<String>,
    /// 0 (new) to 100 (mastered).
    pub mastery_level: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A label attached to error items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// An error item together with its tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItemWithTags {
    #[serde(flatten)]
    pub item: ErrorItem,
    pub tags: Vec<Tag>,
}
