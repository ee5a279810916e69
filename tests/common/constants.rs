//! Shared constants for end-to-end tests
//!
//! When test data changes (user credentials, library ids, etc.),
//! update only this file.

#![allow(dead_code)]

// ============================================================================
// Test User Credentials
// ============================================================================

pub const TEST_USER: &str = "testuser";

pub const TEST_PASS: &str = "testpass123";

// ============================================================================
// Test Library IDs
// ============================================================================

/// "The Test Band", two albums
pub const ARTIST_1_ID: &str = "1";

/// "Jazz Ensemble", one album
pub const ARTIST_2_ID: &str = "2";

/// "aha", no albums
pub const ARTIST_3_ID: &str = "3";

/// "Air", no albums
pub const ARTIST_4_ID: &str = "4";

/// "First Album" by The Test Band, three songs
pub const ALBUM_1_ID: &str = "10";

/// "Second Album" by The Test Band, no songs
pub const ALBUM_2_ID: &str = "11";

/// "Jazz Collection" by Jazz Ensemble, one song
pub const ALBUM_3_ID: &str = "20";

/// "Opening Track" on First Album, mp3 on disk
pub const SONG_1_ID: &str = "100";

/// "Middle Track" on First Album, flac on disk
pub const SONG_2_ID: &str = "101";

/// "Closing Track" on First Album, file missing from disk
pub const SONG_3_ID: &str = "102";

/// "Smooth Jazz" on Jazz Collection, ogg on disk
pub const SONG_4_ID: &str = "200";

pub const NONEXISTENT_ID: &str = "999";

// ============================================================================
// Test Library Metadata
// ============================================================================

pub const ARTIST_1_NAME: &str = "The Test Band";

pub const ARTIST_2_NAME: &str = "Jazz Ensemble";

pub const ALBUM_1_TITLE: &str = "First Album";

pub const SONG_1_TITLE: &str = "Opening Track";

pub const SONG_1_DURATION: u64 = 180;

pub const SONG_2_DURATION: u64 = 240;

pub const SONG_3_DURATION: u64 = 200;

pub const SONG_1_YEAR: u64 = 2010;

/// Modification time recorded for the songs table
pub const SONGS_MTIME: u64 = 1_700_000_000;

/// Size of every audio file written to disk
pub const TEST_AUDIO_SIZE_BYTES: usize = 64 * 1024;

/// Leading bytes of the artist 1 cover (PNG)
pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Leading bytes of the album 3 cover (JPEG)
pub const JPEG_MAGIC: &[u8] = b"\xFF\xD8\xFF\xE0";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Poll interval while waiting for server readiness (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

/// Per-request timeout for the test client (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
