//! Error item repository for database operations.
//!
//! Queries are checked at runtime (`query_as`), so building the workspace
//! does not require a live database.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use mistake_book_core::{ErrorItemId, TagId, UserId};

use super::RepositoryError;
use crate::models::{ErrorItem, ErrorItemWithTags, Tag};

const MAX_MASTERY_LEVEL: i16 = 100;

#[derive(Debug, FromRow)]
struct ErrorItemRow {
    id: ErrorItemId,
    user_id: UserId,
    subject: Option<String>,
    question_text: String,
    answer_text: Option<String>,
    analysis: Option<String>,
    mastery_level: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ErrorItemRow> for ErrorItem {
    type Error = RepositoryError;

    fn try_from(r: ErrorItemRow) -> Result<Self, Self::Error> {
        if !(0..=MAX_MASTERY_LEVEL).contains(&r.mastery_level) {
            return Err(RepositoryError::DataCorruption(format!(
                "error item {} has mastery level {}",
                r.id, r.mastery_level
            )));
        }

        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            subject: r.subject,
            question_text: r.question_text,
            answer_text: r.answer_text,
            analysis: r.analysis,
            mastery_level: r.mastery_level,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// A tag joined to the item it is attached to.
#[derive(Debug, Clone, FromRow)]
pub(crate) struct ItemTagRow {
    pub(crate) error_item_id: ErrorItemId,
    pub(crate) id: TagId,
    pub(crate) name: String,
    pub(crate) created_at: DateTime<Utc>,
}

/// Repository for error item database operations.
pub struct ErrorItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ErrorItemRepository<'a> {
    /// Create a new error item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the most recently created error items with their tags.
    ///
    /// Items are ordered by `created_at` descending; ties fall back to `id`
    /// so the order is stable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn recent_with_tags(
        &self,
        limit: i64,
    ) -> Result<Vec<ErrorItemWithTags>, RepositoryError> {
        let rows = sqlx::query_as::<_, ErrorItemRow>(
            r"
            SELECT id, user_id, subject, question_text, answer_text, analysis,
                   mastery_level, created_at, updated_at
            FROM error_item
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            ",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        let items = rows
            .into_iter()
            .map(ErrorItem::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        if items.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = items.iter().map(|i| i.id.to_string()).collect();
        let tag_rows = sqlx::query_as::<_, ItemTagRow>(
            r"
            SELECT eit.error_item_id, t.id, t.name, t.created_at
            FROM error_item_tag eit
            JOIN tag t ON t.id = eit.tag_id
            WHERE eit.error_item_id = ANY($1)
            ORDER BY t.name
            ",
        )
        .bind(&ids)
        .fetch_all(self.pool)
        .await?;

        Ok(attach_tags(items, tag_rows))
    }
}

/// Group tag rows under their items, keeping the item order.
pub(crate) fn attach_tags(
    items: Vec<ErrorItem>,
    tag_rows: Vec<ItemTagRow>,
) -> Vec<ErrorItemWithTags> {
    let mut by_item: HashMap<ErrorItemId, Vec<Tag>> = HashMap::new();
    for row in tag_rows {
        by_item.entry(row.error_item_id).or_default().push(Tag {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        });
    }

    items
        .into_iter()
        .map(|item| {
            let tags = by_item.remove(&item.id).unwrap_or_default();
            ErrorItemWithTags { item, tags }
        })
        .collect()
}
