//! Test library creation
//!
//! Builds a library database the way the indexer would leave it, plus the
//! audio files its songs point to.

use super::constants::*;
use anyhow::Result;
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};
use subsonic_catalog_server::catalog_store::LIBRARY_SCHEMA;
use tempfile::TempDir;

fn audio_bytes(seed: u8) -> Vec<u8> {
    (0..TEST_AUDIO_SIZE_BYTES)
        .map(|i| (i % 251) as u8 ^ seed)
        .collect()
}

fn image_bytes(magic: &[u8]) -> Vec<u8> {
    let mut bytes = magic.to_vec();
    bytes.extend_from_slice(&[0u8; 64]);
    bytes
}

#[allow(clippy::too_many_arguments)]
fn insert_song(
    conn: &Connection,
    id: &str,
    title: &str,
    album: (&str, &str),
    artist: (&str, &str),
    track: u64,
    year: u64,
    duration: u64,
    file: &Path,
) -> Result<()> {
    conn.execute(
        "INSERT INTO songs (id, title, albumid, album, artistid, artist, trackn, discn,
            year, duration, bitRate, genre, type, filename)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?9, 320, 'Test', ?10, ?11)",
        params![
            id.parse::<i64>()?,
            title,
            album.0.parse::<i64>()?,
            album.1,
            artist.0.parse::<i64>()?,
            artist.1,
            track as i64,
            year as i64,
            duration as i64,
            file.extension().map(|e| e.to_string_lossy().to_string()),
            file.to_string_lossy(),
        ],
    )?;
    Ok(())
}

/// Creates a temporary library with 4 artists, 3 albums, 4 songs and one
/// user. Returns (temp_dir, db_path).
pub fn create_test_library() -> Result<(TempDir, PathBuf)> {
    let dir = TempDir::new()?;

    let media_path = dir.path().join("media");
    fs::create_dir_all(media_path.join("band/first"))?;
    fs::create_dir_all(media_path.join("jazz/collection"))?;

    let song_1_path = media_path.join("band/first/01 Opening Track.mp3");
    let song_2_path = media_path.join("band/first/02 Middle Track.flac");
    let song_3_path = media_path.join("band/first/03 Closing Track.mp3");
    let song_4_path = media_path.join("jazz/collection/01 Smooth Jazz.ogg");
    fs::write(&song_1_path, audio_bytes(1))?;
    fs::write(&song_2_path, audio_bytes(2))?;
    fs::write(&song_4_path, audio_bytes(4))?;

    let db_path = dir.path().join("library.db");
    let conn = Connection::open(&db_path)?;
    LIBRARY_SCHEMA.create(&conn)?;

    let artist_1 = (ARTIST_1_ID, ARTIST_1_NAME);
    let artist_2 = (ARTIST_2_ID, ARTIST_2_NAME);
    for (id, name) in [artist_1, artist_2, (ARTIST_3_ID, "aha"), (ARTIST_4_ID, "Air"), ("5", "")] {
        conn.execute(
            "INSERT INTO artists (id, name) VALUES (?1, ?2)",
            params![id.parse::<i64>()?, name],
        )?;
    }

    let album_1 = (ALBUM_1_ID, ALBUM_1_TITLE);
    let album_3 = (ALBUM_3_ID, "Jazz Collection");
    for (album, artist) in [
        (album_1, artist_1),
        ((ALBUM_2_ID, "Second Album"), artist_1),
        (album_3, artist_2),
    ] {
        conn.execute(
            "INSERT INTO albums (id, title, artistid, artist) VALUES (?1, ?2, ?3, ?4)",
            params![album.0.parse::<i64>()?, album.1, artist.0.parse::<i64>()?, artist.1],
        )?;
    }

    insert_song(&conn, SONG_1_ID, SONG_1_TITLE, album_1, artist_1, 1, SONG_1_YEAR, SONG_1_DURATION, &song_1_path)?;
    insert_song(&conn, SONG_2_ID, "Middle Track", album_1, artist_1, 2, SONG_1_YEAR, SONG_2_DURATION, &song_2_path)?;
    insert_song(&conn, SONG_3_ID, "Closing Track", album_1, artist_1, 3, SONG_1_YEAR, SONG_3_DURATION, &song_3_path)?;
    insert_song(&conn, SONG_4_ID, "Smooth Jazz", album_3, artist_2, 1, 0, 300, &song_4_path)?;

    conn.execute(
        "INSERT INTO covers (artistId, albumId, image) VALUES (?1, NULL, ?2)",
        params![ARTIST_1_ID.parse::<i64>()?, image_bytes(PNG_MAGIC)],
    )?;
    conn.execute(
        "INSERT INTO covers (artistId, albumId, image) VALUES (NULL, ?1, ?2)",
        params![ALBUM_3_ID.parse::<i64>()?, image_bytes(JPEG_MAGIC)],
    )?;

    conn.execute(
        "INSERT INTO users (username, password) VALUES (?1, ?2)",
        params![TEST_USER, TEST_PASS],
    )?;
    conn.execute(
        "INSERT INTO last_update_ts (table_name, mtime) VALUES ('songs', ?1)",
        params![SONGS_MTIME as i64],
    )?;

    Ok((dir, db_path))
}
