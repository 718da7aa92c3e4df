//! Tag-only tool: apply metadata from a JSON config to already-downloaded
//! MP3 files.
//!
//! Usage: tapedeck-tag <mp3-folder> <metadata-json>

use std::path::Path;
use std::process::ExitCode;
use tapedeck::artwork::{AlbumArtCache, HttpArtFetcher};
use tapedeck::config::load_tracks;
use tapedeck::download::final_path;
use tapedeck::tagger::apply_metadata;
use tracing::{error, info};

const DIVIDER: &str = "================================================================";

fn main() -> ExitCode {
    let _ = tapedeck::common::initialize_logging(None, "stderr");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 2 {
        eprintln!("Usage: tapedeck-tag <mp3-folder> <metadata-json>");
        return ExitCode::from(2);
    }

    let mp3_folder = Path::new(&args[0]);
    let metadata_path = Path::new(&args[1]);
    if !mp3_folder.is_dir() || !metadata_path.is_file() {
        error!(
            "Either {} is not an existing directory or {} is not an existing file",
            mp3_folder.display(),
            metadata_path.display()
        );
        return ExitCode::from(1);
    }

    let tracks = match load_tracks(metadata_path) {
        Ok(tracks) => tracks,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(1);
        }
    };

    let mut art_cache = AlbumArtCache::default();
    let remote_art = HttpArtFetcher::default();
    let mut successes = 0;
    let mut failures = 0;

    for track in &tracks {
        let result = match &track.filename {
            Some(base_name) => {
                apply_metadata(&final_path(mp3_folder, base_name), track, &mut art_cache, &remote_art)
            }
            None => Err(tapedeck::TapedeckExpectedError::MissingIdentity.into()),
        };
        match result {
            Ok(()) => {
                info!("Successfully applied metadata for {:?}", track.filename);
                successes += 1;
            }
            Err(e) => {
                error!("Could not apply metadata for {:?}: {e}", track.filename);
                failures += 1;
            }
        }
        info!("{DIVIDER}");
    }

    info!("Successfully applied metadata to {successes} files");
    if failures > 0 {
        info!("Failed to apply metadata to {failures} files");
    }

    ExitCode::SUCCESS
}
