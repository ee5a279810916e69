//! Library entities as served to clients.
//!
//! Everything here is built per request from store rows and dropped once the
//! response has been rendered.

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

const ARTIST_COVER_PREFIX: &str = "ar-";
const ALBUM_COVER_PREFIX: &str = "al-";

/// Opaque cover art key handed to clients: a two-letter entity tag plus the
/// numeric id, e.g. `ar-7` or `al-12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverArtId {
    Artist(u64),
    Album(u64),
}

impl CoverArtId {
    /// Parses a client-supplied cover art key.
    ///
    /// Returns `None` for anything that is not `ar-<n>` or `al-<n>`,
    /// including keys shorter than four characters. `None` means "no art",
    /// not an error.
    pub fn parse(s: &str) -> Option<CoverArtId> {
        if s.len() < 4 {
            return None;
        }
        if let Some(rest) = s.strip_prefix(ARTIST_COVER_PREFIX) {
            return Self::parse_number(rest).map(CoverArtId::Artist);
        }
        if let Some(rest) = s.strip_prefix(ALBUM_COVER_PREFIX) {
            return Self::parse_number(rest).map(CoverArtId::Album);
        }
        None
    }

    /// Ids are SQLite integers, so anything past `i64::MAX` cannot match.
    fn parse_number(s: &str) -> Option<u64> {
        match s.parse::<i64>() {
            Ok(value) if value >= 0 => Some(value as u64),
            _ => None,
        }
    }
}

impl fmt::Display for CoverArtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverArtId::Artist(id) => write!(f, "{}{}", ARTIST_COVER_PREFIX, id),
            CoverArtId::Album(id) => write!(f, "{}{}", ALBUM_COVER_PREFIX, id),
        }
    }
}

impl Serialize for CoverArtId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: u64,
    pub name: String,
    pub cover_art: CoverArtId,
    pub album_count: u64,
    #[serde(rename = "album", skip_serializing_if = "Option::is_none")]
    pub albums: Option<Vec<Album>>,
}

impl Artist {
    pub fn new(id: u64, name: String, album_count: u64) -> Artist {
        Artist {
            id,
            name,
            cover_art: CoverArtId::Artist(id),
            album_count,
            albums: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: u64,
    pub name: String,
    pub artist_id: u64,
    #[serde(rename = "artist")]
    pub artist_name: String,
    pub song_count: u64,
    pub duration: u64,
    pub cover_art: CoverArtId,
    pub created: String,
    #[serde(rename = "song", skip_serializing_if = "Option::is_none")]
    pub songs: Option<Vec<Song>>,
}

impl Album {
    pub fn new(id: u64, name: String, artist_id: u64, artist_name: String) -> Album {
        Album {
            id,
            name,
            artist_id,
            artist_name,
            song_count: 0,
            duration: 0,
            cover_art: CoverArtId::Album(id),
            created: String::new(),
            songs: None,
        }
    }

    /// Attaches the album's songs, deriving song count and total duration
    /// from them.
    pub fn with_songs(mut self, songs: Vec<Song>) -> Album {
        self.song_count = songs.len() as u64;
        self.duration = songs.iter().map(|s| s.duration).sum();
        self.songs = Some(songs);
        self
    }
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: u64,
    pub parent: u64,
    pub title: String,
    pub album: String,
    pub artist: String,
    pub is_dir: bool,
    pub cover_art: CoverArtId,
    pub created: String,
    pub duration: u64,
    pub genre: String,
    pub bit_rate: u64,
    pub size: u64,
    pub suffix: String,
    pub content_type: String,
    pub is_video: bool,
    pub album_id: u64,
    pub artist_id: u64,
    pub track: u64,
    #[serde(rename = "type")]
    pub file_type: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub year: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub disc_number: u64,
    /// Absolute location of the audio file. Only used to stream it.
    #[serde(skip)]
    pub file_path: PathBuf,
}

/// The fields of a `songs` row, before derivation.
#[derive(Debug, Clone, Default)]
pub struct SongRecord {
    pub id: u64,
    pub title: String,
    pub album_id: u64,
    pub album: String,
    pub artist_id: u64,
    pub artist: String,
    pub track: u64,
    pub disc_number: u64,
    pub year: u64,
    pub duration: u64,
    pub bit_rate: u64,
    pub genre: String,
    pub file_type: String,
    pub file_name: String,
}

impl Song {
    pub fn from_record(record: SongRecord, size: u64) -> Song {
        let suffix = file_suffix(&record.file_name);
        let content_type = content_type_for_suffix(&suffix);
        Song {
            id: record.id,
            parent: record.album_id,
            title: record.title,
            album: record.album,
            artist: record.artist,
            is_dir: false,
            cover_art: CoverArtId::Album(record.album_id),
            created: created_from_year(record.year),
            duration: record.duration,
            genre: record.genre,
            bit_rate: record.bit_rate,
            size,
            suffix,
            content_type,
            is_video: false,
            album_id: record.album_id,
            artist_id: record.artist_id,
            track: record.track,
            file_type: record.file_type,
            year: record.year,
            disc_number: record.disc_number,
            file_path: PathBuf::from(record.file_name),
        }
    }
}

/// Lowercased file extension without the dot, empty when there is none.
pub fn file_suffix<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// MIME type for a file suffix, empty when unknown.
pub fn content_type_for_suffix(suffix: &str) -> String {
    if suffix.is_empty() {
        return String::new();
    }
    mime_guess::from_ext(suffix)
        .first()
        .map(|mime| mime.to_string())
        .unwrap_or_default()
}

/// Songs carry no real creation date, clients get January 1st of the year.
pub fn created_from_year(year: u64) -> String {
    format!("{:04}-01-01T00:00:00", year)
}

/// Artists sharing the same leading letter.
#[derive(Debug, Clone, Serialize)]
pub struct IndexGroup {
    pub name: String,
    #[serde(rename = "artist")]
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexCollection {
    pub last_modified: u64,
    #[serde(rename = "index")]
    pub groups: Vec<IndexGroup>,
}
