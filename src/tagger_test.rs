use crate::artwork::AlbumArtCache;
use crate::config::TrackDescriptor;
use crate::errors::{TapedeckError, TapedeckExpectedError};
use crate::tagger::apply_metadata;
use crate::testing::{self, write_fake_jpeg, FakeArtFetcher};
use id3::{Tag as Id3Tag, TagLike};
use std::fs;
use std::path::Path;

fn write_fake_mp3(path: &Path) {
    fs::write(path, b"fake mp3 bytes").expect("failed to write fake mp3");
}

#[test]
fn test_apply_metadata_writes_tags() {
    let temp_dir = testing::init();
    let mp3_path = temp_dir.path().join("song.mp3");
    write_fake_mp3(&mp3_path);

    let track = TrackDescriptor {
        artist: Some("Artist".to_string()),
        title: Some("Title".to_string()),
        album: Some("Album".to_string()),
        album_artist: Some("Various".to_string()),
        ..Default::default()
    };
    let mut cache = AlbumArtCache::default();
    let remote = FakeArtFetcher::default();

    apply_metadata(&mp3_path, &track, &mut cache, &remote).unwrap();

    let tag = Id3Tag::read_from_path(&mp3_path).unwrap();
    assert_eq!(tag.artist(), Some("Artist"));
    assert_eq!(tag.title(), Some("Title"));
    assert_eq!(tag.album(), Some("Album"));
    assert_eq!(tag.album_artist(), Some("Various"));
}

#[test]
fn test_apply_metadata_album_artist_falls_back_to_artist() {
    let temp_dir = testing::init();
    let mp3_path = temp_dir.path().join("song.mp3");
    write_fake_mp3(&mp3_path);

    let track = TrackDescriptor {
        artist: Some("Artist".to_string()),
        title: Some("Title".to_string()),
        ..Default::default()
    };
    let mut cache = AlbumArtCache::default();
    let remote = FakeArtFetcher::default();

    apply_metadata(&mp3_path, &track, &mut cache, &remote).unwrap();

    let tag = Id3Tag::read_from_path(&mp3_path).unwrap();
    assert_eq!(tag.album_artist(), Some("Artist"));
}

#[test]
fn test_apply_metadata_leaves_absent_fields_untouched() {
    let temp_dir = testing::init();
    let mp3_path = temp_dir.path().join("song.mp3");
    write_fake_mp3(&mp3_path);

    // Pre-existing tag from an earlier run.
    let mut existing = Id3Tag::new();
    existing.set_artist("Old Artist");
    existing.set_album("Old Album");
    existing.write_to_path(&mp3_path, id3::Version::Id3v24).unwrap();

    // Descriptor supplies a new title only; empty strings count as absent.
    let track = TrackDescriptor {
        title: Some("New Title".to_string()),
        album: Some(String::new()),
        ..Default::default()
    };
    let mut cache = AlbumArtCache::default();
    let remote = FakeArtFetcher::default();

    apply_metadata(&mp3_path, &track, &mut cache, &remote).unwrap();

    let tag = Id3Tag::read_from_path(&mp3_path).unwrap();
    assert_eq!(tag.title(), Some("New Title"));
    assert_eq!(tag.artist(), Some("Old Artist"));
    assert_eq!(tag.album(), Some("Old Album"));
}

#[test]
fn test_apply_metadata_embeds_cover_art() {
    let temp_dir = testing::init();
    let mp3_path = temp_dir.path().join("song.mp3");
    write_fake_mp3(&mp3_path);
    let art_path = temp_dir.path().join("cover.jpg");
    write_fake_jpeg(&art_path);

    let track = TrackDescriptor {
        title: Some("Title".to_string()),
        song_art_path: Some(art_path.to_string_lossy().to_string()),
        ..Default::default()
    };
    let mut cache = AlbumArtCache::default();
    let remote = FakeArtFetcher::default();

    apply_metadata(&mp3_path, &track, &mut cache, &remote).unwrap();

    let tag = Id3Tag::read_from_path(&mp3_path).unwrap();
    let pictures: Vec<_> = tag.pictures().collect();
    assert_eq!(pictures.len(), 1);
    assert_eq!(pictures[0].mime_type, "image/jpeg");
}

#[test]
fn test_apply_metadata_missing_file() {
    let temp_dir = testing::init();
    let mp3_path = temp_dir.path().join("missing.mp3");

    let mut cache = AlbumArtCache::default();
    let remote = FakeArtFetcher::default();

    match apply_metadata(&mp3_path, &TrackDescriptor::default(), &mut cache, &remote) {
        Err(TapedeckError::Expected(TapedeckExpectedError::FileNotFound { path })) => {
            assert_eq!(path, mp3_path);
        }
        other => panic!("Expected FileNotFound, got {other:?}"),
    }
}

#[test]
fn test_apply_metadata_rejects_non_mp3() {
    let temp_dir = testing::init();
    let wav_path = temp_dir.path().join("song.wav");
    fs::write(&wav_path, b"riff").unwrap();

    let mut cache = AlbumArtCache::default();
    let remote = FakeArtFetcher::default();

    match apply_metadata(&wav_path, &TrackDescriptor::default(), &mut cache, &remote) {
        Err(TapedeckError::Expected(TapedeckExpectedError::NotAnMp3 { .. })) => {}
        other => panic!("Expected NotAnMp3, got {other:?}"),
    }
}
