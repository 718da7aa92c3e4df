use crate::artwork::RemoteArtFetcher;
use crate::download::{AudioTranscoder, SourceFetcher};
use crate::errors::{Result, TapedeckExpectedError};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

static INIT: Once = Once::new();

pub fn init() -> TempDir {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
    TempDir::new().expect("failed to create temp dir")
}

// Fake fetcher that writes a placeholder intermediate file instead of
// shelling out. Records every source id it was asked for.
#[derive(Default)]
pub struct FakeFetcher {
    pub calls: RefCell<Vec<String>>,
    pub fail_for: Vec<String>,
}

impl SourceFetcher for FakeFetcher {
    fn fetch(&self, source_id: &str, dest: &Path) -> Result<()> {
        self.calls.borrow_mut().push(source_id.to_string());
        if self.fail_for.iter().any(|s| s == source_id) {
            return Err(TapedeckExpectedError::Fetch { reason: "youtube-dl exited with exit status: 1".to_string() }.into());
        }
        fs::write(dest, b"fake m4a bytes").expect("failed to write fake m4a");
        Ok(())
    }
}

// Fake transcoder that copies placeholder bytes to the destination.
#[derive(Default)]
pub struct FakeTranscoder {
    pub calls: RefCell<Vec<PathBuf>>,
    pub fail: bool,
}

impl AudioTranscoder for FakeTranscoder {
    fn transcode(&self, src: &Path, dest: &Path) -> Result<()> {
        self.calls.borrow_mut().push(src.to_path_buf());
        if self.fail {
            return Err(TapedeckExpectedError::Convert { reason: "ffmpeg exited with exit status: 1".to_string() }.into());
        }
        assert!(src.is_file(), "transcode source should exist");
        fs::write(dest, b"fake mp3 bytes").expect("failed to write fake mp3");
        Ok(())
    }
}

// Fake remote art source. URLs absent from `responses` fail like a transport
// error would.
#[derive(Default)]
pub struct FakeArtFetcher {
    pub calls: RefCell<Vec<String>>,
    pub responses: HashMap<String, (Vec<u8>, String)>,
}

impl RemoteArtFetcher for FakeArtFetcher {
    fn fetch_art(&self, url: &str) -> std::result::Result<(Vec<u8>, String), TapedeckExpectedError> {
        self.calls.borrow_mut().push(url.to_string());
        match self.responses.get(url) {
            Some((bytes, mime)) => Ok((bytes.clone(), mime.clone())),
            None => Err(TapedeckExpectedError::ArtSource { reason: format!("request failed: {url}") }),
        }
    }
}

pub fn write_fake_jpeg(path: &Path) {
    fs::write(path, [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]).expect("failed to write fake jpeg");
}
