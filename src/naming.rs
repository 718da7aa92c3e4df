//! Filename derivation for tracks that don't carry an explicit target name.

use crate::config::TrackDescriptor;
use crate::errors::{Result, TapedeckExpectedError};
use once_cell::sync::Lazy;
use regex::Regex;

/// Hosting service URL prefix stripped before a source id is used as a
/// filename stem.
pub const SOURCE_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

static DISALLOWED_CHARS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w.\-]").unwrap());

/// Replace spaces with underscores, then strip every character that is not
/// alphanumeric, underscore, hyphen, or period.
pub fn clean_filename(name: &str) -> String {
    let underscored = name.trim().replace(' ', "_");
    DISALLOWED_CHARS_REGEX.replace_all(&underscored, "").to_string()
}

/// Derive a safe, stable base name (no extension) for a track. Pure function
/// of the descriptor: same input always yields the same name.
///
/// Prefers `artist`+`title`; falls back to the source id with the host URL
/// prefix stripped. A descriptor with neither cannot be named.
pub fn generate_filename(track: &TrackDescriptor) -> Result<String> {
    if let Some(title) = &track.title {
        let artist = track.artist.as_deref().unwrap_or("");
        Ok(clean_filename(&format!(
            "{}_{}",
            artist.replace(' ', ""),
            title.replace(' ', "")
        )))
    } else if let Some(source_id) = &track.source_id {
        Ok(clean_filename(&source_id.replace(SOURCE_URL_PREFIX, "")))
    } else {
        Err(TapedeckExpectedError::MissingIdentity.into())
    }
}
