//! The config module provides the JSON configuration stores: the ordered
//! track list that drives a batch run, and the album art cache mapping.
//!
//! Both documents are read fully at startup and written fully
//! (pretty-printed) at shutdown, and only if mutated. Shape problems are
//! rejected here, at load time, with errors that name the offending entry
//! rather than failing deep inside per-item logic.

use crate::artwork::{AlbumArtCache, ArtSource};
use crate::errors::{Result, TapedeckError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One track's configuration record: identity, display metadata, and art
/// hints. Every field is optional at the serde level; which fields are
/// required depends on the operation (naming needs a title or source id,
/// fetching needs a source id).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    /// Target base name (no extension). Written back once generated so that
    /// subsequent runs are deterministic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_art_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_art_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_art_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_art_url: Option<String>,
}

/// Read and validate the track list. The document must be a JSON array of
/// objects whose present fields are strings.
pub fn load_tracks(path: &Path) -> Result<Vec<TrackDescriptor>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| TapedeckError::Config(format!("Could not read {}: {e}", path.display())))?;

    let value: serde_json::Value = serde_json::from_str(&contents)
        .map_err(|e| TapedeckError::Config(format!("Invalid JSON in {}: {e}", path.display())))?;

    let entries = value.as_array().ok_or_else(|| {
        TapedeckError::Config(format!(
            "Track metadata in {} should be a list of objects",
            path.display()
        ))
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            serde_json::from_value(entry.clone()).map_err(|e| {
                TapedeckError::Config(format!(
                    "Malformed track descriptor at index {i} in {}: {e}",
                    path.display()
                ))
            })
        })
        .collect()
}

/// Write the track list back, pretty-printed.
pub fn save_tracks(path: &Path, tracks: &[TrackDescriptor]) -> Result<()> {
    let json = serde_json::to_string_pretty(tracks)
        .map_err(|e| TapedeckError::Config(format!("Failed to serialize track list: {e}")))?;
    fs::write(path, json)?;
    Ok(())
}

/// Read and validate the album art cache. The document must be a JSON object
/// mapping album art keys to art source records.
pub fn load_art_cache(path: &Path) -> Result<AlbumArtCache> {
    let contents = fs::read_to_string(path)
        .map_err(|e| TapedeckError::Config(format!("Could not read {}: {e}", path.display())))?;

    let entries: HashMap<String, ArtSource> = serde_json::from_str(&contents).map_err(|e| {
        TapedeckError::Config(format!(
            "Album art cache in {} should be a mapping of album keys to art sources: {e}",
            path.display()
        ))
    })?;

    Ok(AlbumArtCache::from_entries(entries))
}

/// Write the art cache back, pretty-printed.
pub fn save_art_cache(path: &Path, cache: &AlbumArtCache) -> Result<()> {
    let json = serde_json::to_string_pretty(cache.entries())
        .map_err(|e| TapedeckError::Config(format!("Failed to serialize art cache: {e}")))?;
    fs::write(path, json)?;
    Ok(())
}
