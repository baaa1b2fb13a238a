use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use surrealdb::RecordId;

use crate::types::{ContentId, ShareToken, TagId, UserId, Username};

/// Build the record id for a user key.
pub fn user_record(id: &UserId) -> RecordId {
    RecordId::from_table_key("user", id.as_str())
}

/// Build the record id for a content key.
pub fn content_record(id: &ContentId) -> RecordId {
    RecordId::from_table_key("content", id.as_str())
}

/// Build the record id for a tag key.
pub fn tag_record(id: &TagId) -> RecordId {
    RecordId::from_table_key("tag", id.as_str())
}

/// Build the record id of the share link owned by `owner`.
///
/// The link key equals the owner key, so at most one link per owner can
/// ever exist.
pub fn link_record(owner: &UserId) -> RecordId {
    RecordId::from_table_key("link", owner.as_str())
}

/// Persisted user, projected with its key as a plain string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Record key
    pub id: UserId,
    /// Unique login name
    pub username: Username,
    /// bcrypt hash of the password
    pub password_hash: String,
}

/// Kind of a saved content item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Image,
    Video,
    Article,
    Audio,
}

impl ContentKind {
    pub const ALL: [ContentKind; 4] = [Self::Image, Self::Video, Self::Article, Self::Audio];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Article => "article",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| {
                format!("Type must be one of: image, video, article, audio (got `{}`)", s)
            })
    }
}

/// Validated payload for inserting a content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentCreate {
    pub link: String,
    pub kind: ContentKind,
    pub title: String,
    /// Tag titles, resolved to tag records on insert
    pub tags: Vec<String>,
}

/// Tag as returned alongside content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagView {
    pub id: TagId,
    pub title: String,
}

/// Owner reference populated with the owner's username.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnerView {
    pub id: UserId,
    pub username: Username,
}

/// Content item with tags and owner resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentView {
    pub id: ContentId,
    pub link: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub title: String,
    pub tags: Vec<TagView>,
    pub owner: OwnerView,
}

/// Row shape of a content listing query.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentRow {
    pub id: ContentId,
    pub link: String,
    pub kind: ContentKind,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<TagView>,
    pub owner_id: UserId,
    pub owner_username: Option<Username>,
}

impl ContentRow {
    /// Attach the owner, returning `None` if the owner record is gone.
    pub(crate) fn into_view(self) -> Option<ContentView> {
        let username = self.owner_username?;
        Some(ContentView {
            id: self.id,
            link: self.link,
            kind: self.kind,
            title: self.title,
            tags: self.tags,
            owner: OwnerView {
                id: self.owner_id,
                username,
            },
        })
    }
}

/// Persisted share link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkRecord {
    /// Share token
    pub hash: ShareToken,
    /// Owner key
    pub owner_id: UserId,
}
