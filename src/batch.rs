//! The batch module drives descriptors through the download and tagging
//! steps one at a time, folds per-item outcomes into a run report, and
//! persists any newly learned data (generated filenames, discovered art
//! locations) back to the configuration stores at the end of the run.
//!
//! One descriptor's failure never affects processing of subsequent
//! descriptors: the batch is a sequence of independent attempts, not a
//! transaction.

use crate::artwork::{AlbumArtCache, RemoteArtFetcher};
use crate::config::{self, TrackDescriptor};
use crate::download::{ensure_audio, final_path, AudioTranscoder, FetchOutcome, SourceFetcher};
use crate::errors::{Result, TapedeckExpectedError};
use crate::naming::generate_filename;
use crate::tagger::apply_metadata;
use std::path::Path;
use tracing::{error, info, warn};

const DIVIDER: &str = "================================================================";

#[derive(Debug, Clone)]
pub struct ItemOutcome {
    pub name: String,
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub successes: usize,
    pub failures: usize,
    pub outcomes: Vec<ItemOutcome>,
}

impl RunReport {
    pub fn record_success(&mut self, name: String, message: String) {
        info!("{message}");
        self.successes += 1;
        self.outcomes.push(ItemOutcome { name, ok: true, message });
    }

    pub fn record_failure(&mut self, name: String, message: String) {
        error!("Could not process \"{name}\": {message}");
        self.failures += 1;
        self.outcomes.push(ItemOutcome { name, ok: false, message });
    }

    pub fn log_summary(&self) {
        info!("Successfully downloaded and configured {} songs", self.successes);
        if self.failures > 0 {
            info!("Failed to download or configure {} songs", self.failures);
        }
    }
}

/// The per-run pipeline with its external collaborators. The trait objects
/// are the seam tests replace with fakes.
pub struct BatchOrchestrator<'a> {
    pub fetcher: &'a dyn SourceFetcher,
    pub transcoder: &'a dyn AudioTranscoder,
    pub remote_art: &'a dyn RemoteArtFetcher,
}

impl BatchOrchestrator<'_> {
    /// Process every descriptor in list order. Returns the run report and
    /// whether any descriptor was mutated (a generated filename was written
    /// back).
    pub fn run(
        &self,
        tracks: &mut [TrackDescriptor],
        dest_folder: &Path,
        art_cache: &mut AlbumArtCache,
    ) -> (RunReport, bool) {
        let mut report = RunReport::default();
        let mut tracks_dirty = false;

        for track in tracks.iter_mut() {
            let result = self.process_track(track, dest_folder, art_cache, &mut tracks_dirty);
            let name = track
                .filename
                .clone()
                .or_else(|| track.title.clone())
                .or_else(|| track.source_id.clone())
                .unwrap_or_else(|| "<unnamed>".to_string());
            match result {
                Ok(message) => report.record_success(name, message),
                Err(e) => report.record_failure(name, e.to_string()),
            }
            info!("{DIVIDER}");
        }

        report.log_summary();
        (report, tracks_dirty)
    }

    fn process_track(
        &self,
        track: &mut TrackDescriptor,
        dest_folder: &Path,
        art_cache: &mut AlbumArtCache,
        tracks_dirty: &mut bool,
    ) -> Result<String> {
        let base_name = match &track.filename {
            Some(name) => name.clone(),
            None => {
                let name = generate_filename(track)?;
                track.filename = Some(name.clone());
                *tracks_dirty = true;
                name
            }
        };

        let source_id = track
            .source_id
            .clone()
            .ok_or(TapedeckExpectedError::MissingSourceId)?;

        // Batch runs are always lazy: re-tagging on every run is cheap,
        // re-downloading is not.
        match ensure_audio(dest_folder, &base_name, &source_id, true, true, self.fetcher, self.transcoder)? {
            FetchOutcome::AlreadyPresent => {
                // An existing MP3 is presumed already tagged by a prior run.
                Ok(format!("MP3 file \"{base_name}\" already exists, skipping metadata"))
            }
            FetchOutcome::Created => {
                apply_metadata(&final_path(dest_folder, &base_name), track, art_cache, self.remote_art)?;
                Ok(format!("Successfully applied metadata for \"{base_name}\""))
            }
        }
    }
}

/// Load configuration, run the batch, and persist whatever changed.
///
/// An unreadable or misshapen track list aborts before any processing. The
/// art cache is more forgiving: a missing or malformed cache file is warned
/// about and ignored, and the run proceeds with an in-memory cache that is
/// not written back.
pub fn run_from_files(
    metadata_path: &Path,
    dest_folder: &Path,
    art_cache_path: Option<&Path>,
    orchestrator: &BatchOrchestrator,
) -> Result<RunReport> {
    let mut tracks = config::load_tracks(metadata_path)?;

    let (mut art_cache, art_cache_store) = match art_cache_path {
        Some(path) => match config::load_art_cache(path) {
            Ok(cache) => (cache, Some(path)),
            Err(e) => {
                warn!("Ignoring album art cache: {e}");
                (AlbumArtCache::default(), None)
            }
        },
        None => (AlbumArtCache::default(), None),
    };

    let (report, tracks_dirty) = orchestrator.run(&mut tracks, dest_folder, &mut art_cache);

    if let Some(path) = art_cache_store {
        if art_cache.is_dirty() {
            config::save_art_cache(path, &art_cache)?;
        }
    }
    if tracks_dirty {
        config::save_tracks(metadata_path, &tracks)?;
    }

    Ok(report)
}
