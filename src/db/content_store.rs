//! Content and tag storage.

use anyhow::Result;
use serde::Deserialize;
use tracing::warn;

use crate::db::Db;
use crate::db::connection::is_conflict;
use crate::db::schema::{
    ContentCreate, ContentRow, ContentView, content_record, tag_record, user_record,
};
use crate::types::{ContentId, TagId, UserId, new_record_key};

#[derive(Deserialize)]
struct IdRow {
    id: TagId,
}

const LIST_CONTENT_QUERY: &str = r#"
    SELECT
        record::id(id) AS id,
        link,
        kind,
        title,
        (SELECT record::id(id) AS id, title FROM $parent.tags) AS tags,
        record::id(user_id) AS owner_id,
        user_id.username AS owner_username,
        created_at
    FROM content
    WHERE user_id = $owner
    ORDER BY created_at ASC
"#;

/// Content store for database operations.
#[derive(Clone)]
pub struct ContentStore {
    db: Db,
}

impl ContentStore {
    /// Create a new content store.
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Resolve tag titles to tag records, creating the missing ones.
    ///
    /// Titles are trimmed; blank titles are dropped and duplicates collapsed,
    /// keeping first-seen order.
    pub async fn resolve_tags(&self, titles: &[String]) -> Result<Vec<TagId>> {
        let mut seen: Vec<&str> = Vec::new();
        for title in titles.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !seen.contains(&title) {
                seen.push(title);
            }
        }

        let mut ids = Vec::with_capacity(seen.len());
        for title in seen {
            ids.push(self.get_or_create_tag(title).await?);
        }
        Ok(ids)
    }

    async fn find_tag(&self, title: &str) -> Result<Option<TagId>> {
        let mut res = self
            .db
            .query("SELECT record::id(id) AS id FROM tag WHERE title = $title LIMIT 1")
            .bind(("title", title.to_string()))
            .await?;

        let rows: Vec<IdRow> = res.take(0)?;
        Ok(rows.into_iter().next().map(|r| r.id))
    }

    async fn get_or_create_tag(&self, title: &str) -> Result<TagId> {
        if let Some(id) = self.find_tag(title).await? {
            return Ok(id);
        }

        let id = TagId::new(new_record_key());
        let res = self
            .db
            .query("CREATE $id CONTENT { title: $title } RETURN NONE")
            .bind(("id", tag_record(&id)))
            .bind(("title", title.to_string()))
            .await?
            .check();

        match res {
            Ok(_) => Ok(id),
            // Lost a race with another request creating the same title
            Err(e) if is_conflict(&e) => self
                .find_tag(title)
                .await?
                .ok_or_else(|| anyhow::anyhow!("tag `{}` conflicted but was not found", title)),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a content item owned by `owner`.
    pub async fn create_content(&self, owner: &UserId, data: &ContentCreate) -> Result<ContentId> {
        let tags: Vec<_> = self
            .resolve_tags(&data.tags)
            .await?
            .iter()
            .map(tag_record)
            .collect();

        let id = ContentId::new(new_record_key());

        let query = r#"
            CREATE $id CONTENT {
                link: $link,
                kind: $kind,
                title: $title,
                tags: $tags,
                user_id: $owner
            } RETURN NONE
        "#;

        self.db
            .query(query)
            .bind(("id", content_record(&id)))
            .bind(("link", data.link.clone()))
            .bind(("kind", data.kind.as_str()))
            .bind(("title", data.title.clone()))
            .bind(("tags", tags))
            .bind(("owner", user_record(owner)))
            .await?
            .check()?;

        Ok(id)
    }

    /// List every content item owned by `owner`, oldest first.
    pub async fn list_content(&self, owner: &UserId) -> Result<Vec<ContentView>> {
        let mut res = self
            .db
            .query(LIST_CONTENT_QUERY)
            .bind(("owner", user_record(owner)))
            .await?;

        let rows: Vec<ContentRow> = res.take(0)?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                let view = row.into_view();
                if view.is_none() {
                    warn!("Content {} references a missing owner", id);
                }
                view
            })
            .collect())
    }

    /// Delete a content item if and only if it is owned by `owner`.
    ///
    /// Returns `false` when nothing matched, whether the item does not exist
    /// or belongs to someone else.
    pub async fn delete_content(&self, owner: &UserId, content_id: &ContentId) -> Result<bool> {
        let mut res = self
            .db
            .query("DELETE $id WHERE user_id = $owner RETURN BEFORE")
            .bind(("id", content_record(content_id)))
            .bind(("owner", user_record(owner)))
            .await?;

        let deleted: Vec<serde_json::Value> = res.take(0)?;
        Ok(!deleted.is_empty())
    }
}
