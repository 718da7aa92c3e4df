//! Fetch-only tool: download and convert a list of tracks, no tagging.
//!
//! Usage: tapedeck-fetch <input-file> <dest-folder> [--lazy] [--no-clean]
//!
//! The input file holds one `<source_url> | <base_name>` pair per line.

use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tapedeck::download::{ensure_audio, parse_source_line, FfmpegTranscoder, YoutubeDlFetcher};
use tracing::{error, info};

const DIVIDER: &str = "================================================================";

fn main() -> ExitCode {
    let _ = tapedeck::common::initialize_logging(None, "stderr");

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 {
        eprintln!("Usage: tapedeck-fetch <input-file> <dest-folder> [--lazy] [--no-clean]");
        return ExitCode::from(2);
    }

    let input_file = Path::new(&args[0]);
    let dest_folder = Path::new(&args[1]);
    let flags = &args[2..];
    let lazy = flags.iter().any(|f| f == "--lazy");
    let clean = !flags.iter().any(|f| f == "--no-clean");

    if !input_file.is_file() || !dest_folder.is_dir() {
        error!("Check that both the input file and the destination folder exist");
        return ExitCode::from(1);
    }

    let contents = match fs::read_to_string(input_file) {
        Ok(contents) => contents,
        Err(e) => {
            error!("Could not read {}: {e}", input_file.display());
            return ExitCode::from(1);
        }
    };

    let mut pairs = Vec::new();
    for line in contents.lines().filter(|l| !l.trim().is_empty()) {
        match parse_source_line(line) {
            Ok(pair) => pairs.push(pair),
            Err(e) => {
                error!("Could not parse {}: {e}", input_file.display());
                return ExitCode::from(1);
            }
        }
    }

    let fetcher = YoutubeDlFetcher;
    let transcoder = FfmpegTranscoder;

    for (url, base_name) in &pairs {
        match ensure_audio(dest_folder, base_name, url, lazy, clean, &fetcher, &transcoder) {
            Ok(_) => info!("Downloaded \"{base_name}\""),
            Err(e) => error!("Could not download \"{base_name}\" ({url}): {e}"),
        }
        info!("{DIVIDER}");
    }

    ExitCode::SUCCESS
}
