//! Media library of the admin console.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use esst_auth::User;
use esst_core::{DomainError, DomainResult, Entity, MediaId, entity};

use crate::cms::ensure_admin;
use crate::matches_query;

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Document,
    Audio,
}

impl MediaType {
    pub const ALL: [MediaType; 4] = [
        MediaType::Image,
        MediaType::Video,
        MediaType::Document,
        MediaType::Audio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
            MediaType::Document => "document",
            MediaType::Audio => "audio",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Image => "Image",
            MediaType::Video => "Video",
            MediaType::Document => "Document",
            MediaType::Audio => "Audio",
        }
    }

    /// Type guessed from a file extension; anything unknown is a document.
    pub fn from_file_name(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "svg" => MediaType::Image,
            "mp4" | "webm" | "mov" | "avi" => MediaType::Video,
            "mp3" | "wav" | "ogg" | "flac" => MediaType::Audio,
            _ => MediaType::Document,
        }
    }
}

impl FromStr for MediaType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown media type '{s}'")))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    pub id: MediaId,
    pub name: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub url: String,
    /// Bytes.
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl MediaItem {
    pub fn formatted_size(&self) -> String {
        format_file_size(self.size)
    }
}

impl Entity for MediaItem {
    type Id = MediaId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Human-readable size in powers of 1024, at most two decimals: `1.95 MB`.
pub fn format_file_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let mut number = format!("{value:.2}");
    if number.contains('.') {
        number.truncate(number.trim_end_matches('0').trim_end_matches('.').len());
    }
    format!("{number} {}", SIZE_UNITS[unit])
}

/// `media_type: None` is the "all types" choice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaFilter {
    pub query: String,
    pub media_type: Option<MediaType>,
}

impl MediaFilter {
    pub fn matches(&self, item: &MediaItem) -> bool {
        matches_query(&item.name, &self.query)
            && self.media_type.is_none_or(|t| t == item.media_type)
    }
}

/// Upload form. The type is derived from the file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMedia {
    pub name: String,
    pub url: String,
    pub size: u64,
    pub dimensions: Option<Dimensions>,
    pub alt: String,
}

/// Uploaded files, most recent first.
#[derive(Debug, Clone, Default)]
pub struct MediaLibrary {
    items: Vec<MediaItem>,
}

impl MediaLibrary {
    pub fn new(mut items: Vec<MediaItem>) -> Self {
        items.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Self { items }
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn get(&self, id: MediaId) -> Option<&MediaItem> {
        entity::find(&self.items, id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_size(&self) -> u64 {
        self.items.iter().map(|item| item.size).sum()
    }

    pub fn filter(&self, filter: &MediaFilter) -> Vec<&MediaItem> {
        self.items.iter().filter(|item| filter.matches(item)).collect()
    }

    pub fn upload(&mut self, editor: &User, new: NewMedia, now: DateTime<Utc>) -> DomainResult<&MediaItem> {
        ensure_admin(editor)?;
        let name = new.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("file name cannot be empty"));
        }
        if self.items.iter().any(|item| item.name == name) {
            return Err(DomainError::invariant(format!("a file named '{name}' already exists")));
        }

        let alt = new.alt.trim();
        let item = MediaItem {
            id: MediaId::new(),
            name: name.to_string(),
            media_type: MediaType::from_file_name(name),
            url: new.url,
            size: new.size,
            uploaded_at: now,
            dimensions: new.dimensions,
            alt: (!alt.is_empty()).then(|| alt.to_string()),
        };
        tracing::info!(media_id = %item.id, kind = item.media_type.as_str(), size = item.size, "media uploaded");

        self.items.insert(0, item);
        Ok(&self.items[0])
    }

    pub fn delete(&mut self, editor: &User, id: MediaId) -> DomainResult<MediaItem> {
        ensure_admin(editor)?;
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| DomainError::not_found(format!("media {id}")))?;
        let item = self.items.remove(index);
        tracing::info!(media_id = %id, "media deleted");
        Ok(item)
    }
}
