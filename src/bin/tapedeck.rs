//! Combined pipeline: download, convert, and tag every track in a JSON
//! metadata config.
//!
//! Usage: tapedeck <dest-folder> <metadata-json> [art-cache-json]

use std::path::Path;
use std::process::ExitCode;
use tapedeck::artwork::HttpArtFetcher;
use tapedeck::batch::{run_from_files, BatchOrchestrator};
use tapedeck::download::{FfmpegTranscoder, YoutubeDlFetcher};
use tracing::error;

fn main() -> ExitCode {
    let _ = tapedeck::common::initialize_logging(None, "stderr");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: tapedeck <dest-folder> <metadata-json> [art-cache-json]");
        return ExitCode::from(2);
    }

    let dest_folder = Path::new(&args[0]);
    let metadata_path = Path::new(&args[1]);
    let art_cache_path = args.get(2).map(Path::new);

    if !dest_folder.is_dir() {
        error!("{} is not an existing directory", dest_folder.display());
        return ExitCode::from(1);
    }
    if !metadata_path.is_file() {
        error!("{} is not an existing file", metadata_path.display());
        return ExitCode::from(1);
    }

    let fetcher = YoutubeDlFetcher;
    let transcoder = FfmpegTranscoder;
    let remote_art = HttpArtFetcher::default();
    let orchestrator =
        BatchOrchestrator { fetcher: &fetcher, transcoder: &transcoder, remote_art: &remote_art };

    match run_from_files(metadata_path, dest_folder, art_cache_path, &orchestrator) {
        Ok(_report) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::from(1)
        }
    }
}
