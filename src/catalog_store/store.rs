//! SQLite-backed catalog store.
//!
//! Reads the library database produced by the indexer. Connections are opened
//! read-only and shared through a small round-robin pool; each connection
//! keeps its own prepared statements.

use super::error::{CatalogError, CatalogResult};
use super::indexing::group_by_initial;
use super::models::*;
use super::queries::*;
use super::schema::LIBRARY_SCHEMA;
use super::trait_def::CatalogStore;
use crate::user::CredentialStore;
use anyhow::{anyhow, bail, Context, Result};
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    read_index: Arc<AtomicUsize>,
}

fn parse_id(id: &str) -> CatalogResult<i64> {
    match id.trim().parse::<i64>() {
        Ok(value) if value >= 0 => Ok(value),
        _ => Err(CatalogError::InvalidInput("invalid id parameter".to_string())),
    }
}

fn text(row: &Row, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn number(row: &Row, idx: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, Option<i64>>(idx)?.unwrap_or(0).max(0) as u64)
}

fn parse_artist_row(row: &Row) -> rusqlite::Result<(u64, String)> {
    Ok((number(row, 0)?, text(row, 1)?))
}

fn parse_album_row(row: &Row) -> rusqlite::Result<Album> {
    Ok(Album::new(
        number(row, 0)?,
        text(row, 1)?,
        number(row, 2)?,
        text(row, 3)?,
    ))
}

fn parse_song_row(row: &Row) -> rusqlite::Result<SongRecord> {
    Ok(SongRecord {
        id: number(row, 0)?,
        title: text(row, 1)?,
        album_id: number(row, 2)?,
        album: text(row, 3)?,
        artist_id: number(row, 4)?,
        artist: text(row, 5)?,
        track: number(row, 6)?,
        disc_number: number(row, 7)?,
        year: number(row, 8)?,
        duration: number(row, 9)?,
        bit_rate: number(row, 10)?,
        genre: text(row, 11)?,
        file_type: text(row, 12)?,
        file_name: text(row, 13)?,
    })
}

/// Builds a song, reading its size from disk. Unreadable files count as
/// zero bytes.
fn song_from_record(record: SongRecord) -> Song {
    let size = std::fs::metadata(&record.file_name)
        .map(|meta| meta.len())
        .unwrap_or(0);
    Song::from_record(record, size)
}

impl SqliteCatalogStore {
    /// Opens the library database with `read_pool_size` read-only
    /// connections.
    ///
    /// Fails when the file cannot be opened or when a table the catalog
    /// reads from is missing or lacks a column.
    pub fn open<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();
        if read_pool_size == 0 {
            bail!("Read pool size must be at least 1");
        }

        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let conn = Connection::open_with_flags(
                db_path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .with_context(|| format!("Failed to open library database {:?}", db_path))?;
            read_pool.push(Arc::new(Mutex::new(conn)));
        }

        {
            let conn = read_pool[0]
                .lock()
                .map_err(|_| anyhow!("Library connection poisoned"))?;
            LIBRARY_SCHEMA
                .validate(&conn)
                .with_context(|| format!("Invalid library database {:?}", db_path))?;

            let artist_count: i64 = conn.query_row("SELECT COUNT(*) FROM artists", [], |r| r.get(0))?;
            let album_count: i64 = conn.query_row("SELECT COUNT(*) FROM albums", [], |r| r.get(0))?;
            let song_count: i64 = conn.query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))?;
            info!(
                "Opened library: {} artists, {} albums, {} songs",
                artist_count, album_count, song_count
            );
        }

        Ok(SqliteCatalogStore {
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    fn lock(conn: &Mutex<Connection>) -> CatalogResult<MutexGuard<'_, Connection>> {
        conn.lock()
            .map_err(|_| CatalogError::Internal(anyhow!("Library connection poisoned")))
    }

    fn count_albums(conn: &Connection, artist_id: u64) -> rusqlite::Result<u64> {
        let mut stmt = conn.prepare_cached(COUNT_ALBUMS_OF_ARTIST)?;
        stmt.query_row(params![artist_id as i64], |row| number(row, 0))
    }

    fn count_songs(conn: &Connection, artist_id: u64, album_id: u64) -> rusqlite::Result<u64> {
        let mut stmt = conn.prepare_cached(COUNT_SONGS_OF_ALBUM)?;
        stmt.query_row(params![artist_id as i64, album_id as i64], |row| {
            number(row, 0)
        })
    }

    fn select_songs_of_album(conn: &Connection, album: &Album) -> rusqlite::Result<Vec<SongRecord>> {
        let mut stmt = conn.prepare_cached(SELECT_SONGS_OF_ALBUM)?;
        let rows = stmt.query_map(
            params![album.artist_id as i64, album.id as i64],
            parse_song_row,
        )?;
        rows.collect()
    }

    fn first_image(conn: &Connection, sql: &str, id: u64) -> rusqlite::Result<Option<Vec<u8>>> {
        let mut stmt = conn.prepare_cached(sql)?;
        let mut rows = stmt.query(params![id as i64])?;
        while let Some(row) = rows.next()? {
            let image: Option<Vec<u8>> = row.get(0)?;
            if let Some(image) = image.filter(|bytes| !bytes.is_empty()) {
                return Ok(Some(image));
            }
        }
        Ok(None)
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn list_indexed_artists(&self) -> CatalogResult<Vec<IndexGroup>> {
        let read_conn = self.get_read_conn();
        let conn = Self::lock(&read_conn)?;

        let mut stmt = conn.prepare_cached(SELECT_ARTISTS_BY_NAME)?;
        let rows = stmt
            .query_map([], parse_artist_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut artists = Vec::with_capacity(rows.len());
        for (id, name) in rows {
            if name.trim().is_empty() {
                continue;
            }
            let album_count = Self::count_albums(&conn, id)?;
            artists.push(Artist::new(id, name, album_count));
        }

        Ok(group_by_initial(artists))
    }

    fn get_indexes(&self) -> CatalogResult<IndexCollection> {
        let last_modified = {
            let read_conn = self.get_read_conn();
            let conn = Self::lock(&read_conn)?;
            let mut stmt = conn.prepare_cached(SELECT_TABLE_MTIME)?;
            let mtime = match stmt.query_row(params![SONGS_TABLE_NAME], |row| {
                row.get::<_, Option<i64>>(0)
            }) {
                Ok(mtime) => mtime,
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e.into()),
            };
            match mtime {
                Some(mtime) => mtime.max(0) as u64,
                None => {
                    return Err(CatalogError::Internal(anyhow!(
                        "No modification time recorded for table {}",
                        SONGS_TABLE_NAME
                    )))
                }
            }
        };

        Ok(IndexCollection {
            last_modified,
            groups: self.list_indexed_artists()?,
        })
    }

    fn get_artist(&self, id: &str) -> CatalogResult<Artist> {
        let id = parse_id(id)?;
        let read_conn = self.get_read_conn();
        let conn = Self::lock(&read_conn)?;

        let (artist_id, name) = {
            let mut stmt = conn.prepare_cached(SELECT_ARTIST)?;
            match stmt.query_row(params![id], parse_artist_row) {
                Ok(row) => row,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Err(CatalogError::NotFound),
                Err(e) => return Err(e.into()),
            }
        };

        let mut albums = {
            let mut stmt = conn.prepare_cached(SELECT_ALBUMS_OF_ARTIST)?;
            let rows = stmt.query_map(params![id], parse_album_row)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        for album in albums.iter_mut() {
            album.song_count = Self::count_songs(&conn, album.artist_id, album.id)?;
        }

        debug!("Artist {} has {} albums", artist_id, albums.len());
        let mut artist = Artist::new(artist_id, name, albums.len() as u64);
        artist.albums = Some(albums);
        Ok(artist)
    }

    fn get_album(&self, id: &str) -> CatalogResult<Album> {
        let id = parse_id(id)?;
        let read_conn = self.get_read_conn();
        let conn = Self::lock(&read_conn)?;

        let album = {
            let mut stmt = conn.prepare_cached(SELECT_ALBUM)?;
            match stmt.query_row(params![id], parse_album_row) {
                Ok(album) => album,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Err(CatalogError::NotFound),
                Err(e) => return Err(e.into()),
            }
        };

        let records = Self::select_songs_of_album(&conn, &album)?;
        drop(conn);

        let songs = records.into_iter().map(song_from_record).collect();
        Ok(album.with_songs(songs))
    }

    fn get_song(&self, id: &str) -> CatalogResult<Song> {
        let id = parse_id(id)?;
        let record = {
            let read_conn = self.get_read_conn();
            let conn = Self::lock(&read_conn)?;
            let mut stmt = conn.prepare_cached(SELECT_SONG)?;
            match stmt.query_row(params![id], parse_song_row) {
                Ok(record) => record,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Err(CatalogError::NotFound),
                Err(e) => return Err(e.into()),
            }
        };
        Ok(song_from_record(record))
    }

    fn get_cover_art(&self, cover_art_id: &str) -> CatalogResult<Option<Vec<u8>>> {
        let (sql, id) = match CoverArtId::parse(cover_art_id) {
            Some(CoverArtId::Artist(id)) => (SELECT_ARTIST_COVERS, id),
            Some(CoverArtId::Album(id)) => (SELECT_ALBUM_COVERS, id),
            None => return Ok(None),
        };

        let read_conn = self.get_read_conn();
        let conn = Self::lock(&read_conn)?;
        Ok(Self::first_image(&conn, sql, id)?)
    }
}

impl CredentialStore for SqliteCatalogStore {
    fn check_password(&self, username: &str, password: &[u8]) -> Result<bool> {
        let read_conn = self.get_read_conn();
        let conn = read_conn
            .lock()
            .map_err(|_| anyhow!("Library connection poisoned"))?;
        let mut stmt = conn.prepare_cached(COUNT_MATCHING_USERS)?;
        let count: i64 = stmt.query_row(params![username, password], |row| row.get(0))?;
        Ok(count == 1)
    }
}
