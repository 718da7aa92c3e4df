//! The tagger module writes textual metadata and cover art to an MP3 file.
//!
//! Tag writes are batched in memory and persisted by a single terminal write,
//! so from the caller's perspective either all of a track's tags are saved or
//! none are.

use crate::artwork::{apply_cover_art, AlbumArtCache, ArtOutcome, RemoteArtFetcher};
use crate::config::TrackDescriptor;
use crate::errors::{Result, TapedeckExpectedError};
use id3::{Tag as Id3Tag, TagLike};
use std::path::Path;
use tracing::info;

// Sets a text frame only when a non-empty value is present. Absent or empty
// values leave any existing frame untouched; there are no clearing semantics.
fn set_text_tag(tag: &mut Id3Tag, frame_id: &str, value: Option<&str>) {
    if let Some(val) = value {
        if !val.is_empty() {
            tag.set_text(frame_id, val);
        }
    }
}

/// Write a track's textual tags and cover art to the MP3 at `path`.
///
/// Fails if the file does not exist or does not look like an MP3. Tags
/// present in the descriptor overwrite the corresponding frames; the album
/// artist falls back to the artist when unset.
pub fn apply_metadata(
    path: &Path,
    track: &TrackDescriptor,
    art_cache: &mut AlbumArtCache,
    remote: &dyn RemoteArtFetcher,
) -> Result<()> {
    if !path.is_file() {
        return Err(TapedeckExpectedError::FileNotFound { path: path.to_path_buf() }.into());
    }
    if !path.to_string_lossy().ends_with(".mp3") {
        return Err(TapedeckExpectedError::NotAnMp3 { path: path.to_path_buf() }.into());
    }

    // A freshly transcoded file has no tag yet.
    let mut tag = Id3Tag::read_from_path(path).unwrap_or_else(|_| Id3Tag::new());

    set_text_tag(&mut tag, "TPE1", track.artist.as_deref());
    set_text_tag(&mut tag, "TIT2", track.title.as_deref());
    set_text_tag(&mut tag, "TALB", track.album.as_deref());
    set_text_tag(&mut tag, "TPE2", track.album_artist.as_deref().or(track.artist.as_deref()));

    match apply_cover_art(&mut tag, track, art_cache, remote) {
        ArtOutcome::Applied(kind) => info!("Applied cover art from {kind:?}"),
        ArtOutcome::NotFound => info!("No cover art found; tagging without it"),
    }

    tag.write_to_path(path, id3::Version::Id3v24)
        .map_err(|e| TapedeckExpectedError::TagWrite { reason: e.to_string() })?;

    Ok(())
}
