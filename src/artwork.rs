//! The artwork module resolves and applies cover images.
//!
//! Albums typically share one cover across many tracks, so the resolver
//! cascades through track-specific sources first, then album-specific
//! sources, then a shared cache keyed by album identity. The first album
//! source that resolves is written into the cache so that sibling tracks in
//! the same run (and, because the cache is persisted, future runs) reuse it
//! without repeated remote fetches or repeated manual path entry.
//!
//! Every source attempt either succeeds or falls through to the next one;
//! missing art is an accepted terminal state, not an error.

use crate::config::TrackDescriptor;
use crate::errors::TapedeckExpectedError;
use id3::frame::{Picture, PictureType};
use id3::Tag as Id3Tag;
use id3::TagLike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Case-sensitive suffix to MIME type mapping for supported cover images.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[(&str, &str)] =
    &[(".jpg", "image/jpeg"), (".jpeg", "image/jpeg"), (".png", "image/png")];

// Keep reads bounded; a cover image should never be anywhere near this.
const MAX_ART_BYTES: u64 = 32 * 1024 * 1024;

/// A persisted art source record: a local path, a remote URL, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Album art sources discovered so far, keyed by album identity. Mutations
/// are tracked so the persistence boundary only writes the cache back when
/// something was learned this run.
#[derive(Debug, Clone, Default)]
pub struct AlbumArtCache {
    entries: HashMap<String, ArtSource>,
    dirty: bool,
}

impl AlbumArtCache {
    pub fn from_entries(entries: HashMap<String, ArtSource>) -> Self {
        Self { entries, dirty: false }
    }

    pub fn get(&self, key: &str) -> Option<&ArtSource> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: String, source: ArtSource) {
        self.entries.insert(key, source);
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn entries(&self) -> &HashMap<String, ArtSource> {
        &self.entries
    }
}

/// Derived album identity used only as a cache lookup key, never for
/// ownership. Undefined when album or artist data is absent.
pub fn album_art_key(track: &TrackDescriptor) -> Option<String> {
    let album = track.album.as_deref().filter(|s| !s.is_empty())?;
    let artist = track
        .album_artist
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(track.artist.as_deref().filter(|s| !s.is_empty()))?;
    Some(format!("{artist} - {album}"))
}

/// Which source in the cascade produced the applied cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtSourceKind {
    SongPath,
    SongUrl,
    AlbumPath,
    AlbumUrl,
    CachePath,
    CacheUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArt {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub kind: ArtSourceKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtOutcome {
    Applied(ArtSourceKind),
    NotFound,
}

/// Fetches cover image bytes and their content type from a remote URL.
pub trait RemoteArtFetcher {
    fn fetch_art(&self, url: &str) -> std::result::Result<(Vec<u8>, String), TapedeckExpectedError>;
}

/// HTTP implementation over a shared ureq agent.
pub struct HttpArtFetcher {
    agent: ureq::Agent,
}

impl Default for HttpArtFetcher {
    fn default() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(15))
            .build();
        Self { agent }
    }
}

impl RemoteArtFetcher for HttpArtFetcher {
    fn fetch_art(&self, url: &str) -> std::result::Result<(Vec<u8>, String), TapedeckExpectedError> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| TapedeckExpectedError::ArtSource { reason: format!("request failed: {e}") })?;

        let mime_type = response.content_type().to_string();
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_ART_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|e| TapedeckExpectedError::ArtSource { reason: format!("failed to read response: {e}") })?;

        Ok((bytes, mime_type))
    }
}

fn image_mime_for_path(path: &str) -> Option<&'static str> {
    SUPPORTED_IMAGE_EXTENSIONS
        .iter()
        .find(|(ext, _)| path.ends_with(ext))
        .map(|(_, mime)| *mime)
}

/// Read a local cover image, verifying existence and a supported extension.
/// The extension is trusted for the MIME type; file contents are not
/// inspected.
fn load_local_art(path: &str) -> std::result::Result<(Vec<u8>, String), TapedeckExpectedError> {
    let mime_type = image_mime_for_path(path).ok_or_else(|| TapedeckExpectedError::ArtSource {
        reason: format!("{path} is not a supported image type (JPEG/PNG)"),
    })?;

    if !Path::new(path).is_file() {
        return Err(TapedeckExpectedError::ArtSource { reason: format!("{path} does not exist") });
    }

    let bytes = fs::read(path)
        .map_err(|e| TapedeckExpectedError::ArtSource { reason: format!("could not read {path}: {e}") })?;

    Ok((bytes, mime_type.to_string()))
}

/// Resolve a track's cover art by trying, in order: the track-specific local
/// path, the track-specific URL, the album-level local path, the album-level
/// URL, and finally the shared cache (its path entry, then its url entry).
/// An album-level success is recorded in the cache under the track's album
/// art key. Returns `None` when every source fails.
pub fn resolve_cover_art(
    track: &TrackDescriptor,
    art_cache: &mut AlbumArtCache,
    remote: &dyn RemoteArtFetcher,
) -> Option<ResolvedArt> {
    if let Some(path) = &track.song_art_path {
        info!("Trying song art path {path}");
        match load_local_art(path) {
            Ok((bytes, mime_type)) => {
                return Some(ResolvedArt { bytes, mime_type, kind: ArtSourceKind::SongPath })
            }
            Err(e) => debug!("Song art path failed: {e}"),
        }
    }

    if let Some(url) = &track.song_art_url {
        info!("Trying song art URL {url}");
        match remote.fetch_art(url) {
            Ok((bytes, mime_type)) => {
                return Some(ResolvedArt { bytes, mime_type, kind: ArtSourceKind::SongUrl })
            }
            Err(e) => debug!("Song art URL failed: {e}"),
        }
    }

    if let Some(path) = &track.album_art_path {
        info!("Trying album art path {path}");
        match load_local_art(path) {
            Ok((bytes, mime_type)) => {
                if let Some(key) = album_art_key(track) {
                    art_cache.insert(key, ArtSource { path: Some(path.clone()), url: None });
                }
                return Some(ResolvedArt { bytes, mime_type, kind: ArtSourceKind::AlbumPath });
            }
            Err(e) => debug!("Album art path failed: {e}"),
        }
    }

    if let Some(url) = &track.album_art_url {
        info!("Trying album art URL {url}");
        match remote.fetch_art(url) {
            Ok((bytes, mime_type)) => {
                if let Some(key) = album_art_key(track) {
                    art_cache.insert(key, ArtSource { path: None, url: Some(url.clone()) });
                }
                return Some(ResolvedArt { bytes, mime_type, kind: ArtSourceKind::AlbumUrl });
            }
            Err(e) => debug!("Album art URL failed: {e}"),
        }
    }

    if let Some(key) = album_art_key(track) {
        if let Some(cached) = art_cache.get(&key).cloned() {
            info!("Trying cached album art for \"{key}\"");
            if let Some(path) = &cached.path {
                match load_local_art(path) {
                    Ok((bytes, mime_type)) => {
                        return Some(ResolvedArt { bytes, mime_type, kind: ArtSourceKind::CachePath })
                    }
                    Err(e) => debug!("Cached art path failed: {e}"),
                }
            }
            if let Some(url) = &cached.url {
                match remote.fetch_art(url) {
                    Ok((bytes, mime_type)) => {
                        return Some(ResolvedArt { bytes, mime_type, kind: ArtSourceKind::CacheUrl })
                    }
                    Err(e) => debug!("Cached art URL failed: {e}"),
                }
            }
        }
    }

    None
}

/// Resolve cover art and embed it in the tag as the front cover. Missing art
/// is not an error; tagging proceeds without it.
pub fn apply_cover_art(
    tag: &mut Id3Tag,
    track: &TrackDescriptor,
    art_cache: &mut AlbumArtCache,
    remote: &dyn RemoteArtFetcher,
) -> ArtOutcome {
    match resolve_cover_art(track, art_cache, remote) {
        Some(art) => {
            tag.add_frame(Picture {
                mime_type: art.mime_type,
                picture_type: PictureType::CoverFront,
                description: String::new(),
                data: art.bytes,
            });
            ArtOutcome::Applied(art.kind)
        }
        None => ArtOutcome::NotFound,
    }
}
