use serde::Serialize;
use std::hash::{Hash, Hasher};
use url::Url;

/// One catalog search result.
///
/// Equality and hashing only look at `id`: two payloads describing the same
/// catalog entry compare equal even if their metadata drifted.
#[derive(Debug, Clone, Serialize)]
pub struct Track {
    pub id: i64,
    pub artist_name: String,
    pub collection_name: Option<String>,
    pub track_name: String,
    pub preview_url: Option<String>,
    pub artwork_url: Option<String>,
}

/// Whether a track can be handed to an audio player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    Available(Url),
    Missing,
    Invalid(String),
}

impl Preview {
    pub fn is_available(&self) -> bool {
        matches!(self, Preview::Available(_))
    }
}

impl Track {
    pub fn new(id: i64, artist_name: impl Into<String>, track_name: impl Into<String>) -> Self {
        Self {
            id,
            artist_name: artist_name.into(),
            collection_name: None,
            track_name: track_name.into(),
            preview_url: None,
            artwork_url: None,
        }
    }

    pub fn with_collection(mut self, collection_name: impl Into<String>) -> Self {
        self.collection_name = Some(collection_name.into());
        self
    }

    pub fn with_preview(mut self, preview_url: impl Into<String>) -> Self {
        self.preview_url = Some(preview_url.into());
        self
    }

    pub fn with_artwork(mut self, artwork_url: impl Into<String>) -> Self {
        self.artwork_url = Some(artwork_url.into());
        self
    }

    pub fn preview(&self) -> Preview {
        match self.preview_url.as_deref().map(str::trim) {
            None | Some("") => Preview::Missing,
            Some(raw) => match Url::parse(raw) {
                Ok(url) if matches!(url.scheme(), "http" | "https" | "file") => {
                    Preview::Available(url)
                }
                _ => Preview::Invalid(raw.to_string()),
            },
        }
    }

    /// `"Artist - Title"`, plus the collection when present.
    pub fn display_line(&self) -> String {
        match &self.collection_name {
            Some(collection) => format!(
                "{} - {} ({})",
                self.artist_name, self.track_name, collection
            ),
            None => format!("{} - {}", self.artist_name, self.track_name),
        }
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Track {}

impl Hash for Track {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
