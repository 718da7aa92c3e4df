//! The download module guarantees that a final MP3 artifact exists for a
//! track, fetching the intermediate M4A from the hosting service and
//! transcoding it only when required.
//!
//! The hosting service rarely offers the final target format directly, so the
//! intermediate artifact is a necessary staging step. Both artifacts share
//! the same base name, which lets the lazy-mode logic reason about each
//! independently with nothing but existence checks.

use crate::errors::{Result, TapedeckError, TapedeckExpectedError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{info, warn};

pub const INTERMEDIATE_EXTENSION: &str = "m4a";
pub const FINAL_EXTENSION: &str = "mp3";

/// Pre-transcode artifact path: `dest_folder/base_name.m4a`.
pub fn intermediate_path(dest_folder: &Path, base_name: &str) -> PathBuf {
    dest_folder.join(format!("{base_name}.{INTERMEDIATE_EXTENSION}"))
}

/// Post-transcode artifact path: `dest_folder/base_name.mp3`.
pub fn final_path(dest_folder: &Path, base_name: &str) -> PathBuf {
    dest_folder.join(format!("{base_name}.{FINAL_EXTENSION}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The final artifact was produced by this call.
    Created,
    /// The final artifact already existed and lazy mode trusted it.
    AlreadyPresent,
}

/// Fetches the remote asset identified by a source id to a local path.
/// Blocking external call; a non-zero completion status is the only failure
/// signal.
pub trait SourceFetcher {
    fn fetch(&self, source_id: &str, dest: &Path) -> Result<()>;
}

/// Transcodes a local audio file to the target format. Same blocking,
/// non-zero-status contract as [`SourceFetcher`].
pub trait AudioTranscoder {
    fn transcode(&self, src: &Path, dest: &Path) -> Result<()>;
}

fn run_command(program: &str, args: &[&str]) -> std::result::Result<(), String> {
    let status = Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| format!("failed to launch {program}: {e}"))?;

    if !status.success() {
        return Err(format!("{program} exited with {status}"));
    }
    Ok(())
}

/// Shells out to youtube-dl, requesting the M4A-only format.
#[derive(Debug, Default)]
pub struct YoutubeDlFetcher;

impl SourceFetcher for YoutubeDlFetcher {
    fn fetch(&self, source_id: &str, dest: &Path) -> Result<()> {
        let dest_arg = dest.to_string_lossy().into_owned();
        run_command("youtube-dl", &["-o", &dest_arg, "-f", "140", source_id])
            .map_err(|reason| TapedeckExpectedError::Fetch { reason }.into())
    }
}

/// Shells out to ffmpeg with the LAME encoder at quality 2.
#[derive(Debug, Default)]
pub struct FfmpegTranscoder;

impl AudioTranscoder for FfmpegTranscoder {
    fn transcode(&self, src: &Path, dest: &Path) -> Result<()> {
        let src_arg = src.to_string_lossy().into_owned();
        let dest_arg = dest.to_string_lossy().into_owned();
        run_command("ffmpeg", &["-i", &src_arg, "-acodec", "libmp3lame", "-aq", "2", &dest_arg])
            .map_err(|reason| TapedeckExpectedError::Convert { reason }.into())
    }
}

/// Guarantee that `dest_folder/base_name.mp3` exists, fetching and
/// transcoding only when required.
///
/// Under `lazy=true` existing artifacts are trusted and reused: an existing
/// MP3 short-circuits the whole call, and an existing M4A skips the fetch.
/// This is the idempotence guarantee that makes repeated runs over the same
/// config cheap and safe. Under `lazy=false` existing artifacts are deleted
/// and regenerated. With `clean=true` the M4A is removed after a successful
/// transcode; a failed removal is reported but does not downgrade the
/// outcome.
pub fn ensure_audio(
    dest_folder: &Path,
    base_name: &str,
    source_id: &str,
    lazy: bool,
    clean: bool,
    fetcher: &dyn SourceFetcher,
    transcoder: &dyn AudioTranscoder,
) -> Result<FetchOutcome> {
    let m4a_path = intermediate_path(dest_folder, base_name);
    let mp3_path = final_path(dest_folder, base_name);

    if mp3_path.is_file() {
        if lazy {
            info!("\"{base_name}\" MP3 already exists; skipping");
            return Ok(FetchOutcome::AlreadyPresent);
        }
        fs::remove_file(&mp3_path)?;
        info!("\"{base_name}\" MP3 already exists; deleting");
    }

    let mut have_intermediate = false;
    if m4a_path.is_file() {
        if lazy {
            info!("\"{base_name}\" M4A already exists; skipping download");
            have_intermediate = true;
        } else {
            fs::remove_file(&m4a_path)?;
            info!("\"{base_name}\" M4A already exists; deleting");
        }
    }

    if !have_intermediate {
        info!("Downloading M4A for \"{base_name}\" from {source_id}");
        fetcher.fetch(source_id, &m4a_path)?;
    }

    info!("Converting \"{base_name}\" from M4A to MP3");
    transcoder.transcode(&m4a_path, &mp3_path)?;

    if clean {
        if let Err(e) = fs::remove_file(&m4a_path) {
            warn!("Failed to delete intermediate M4A {}: {e}", m4a_path.display());
        } else {
            info!("Deleted \"{base_name}\" M4A file");
        }
    }

    Ok(FetchOutcome::Created)
}

/// Parse one line of the fetch-only tool's input: `"<source_url> | <base_name>"`.
pub fn parse_source_line(line: &str) -> Result<(String, String)> {
    let (url, name) = line
        .split_once(" | ")
        .ok_or_else(|| TapedeckError::Config(format!("Line is missing ' | ' separator: {line}")))?;

    let url = url.trim();
    let name = name.trim();
    if url.is_empty() || name.is_empty() {
        return Err(TapedeckError::Config(format!("Line cannot be parsed: {line}")));
    }

    Ok((url.to_string(), name.to_string()))
}
