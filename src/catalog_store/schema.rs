//! Tables of the library database.
//!
//! The database is written by an external indexer; the server only reads it.
//! These declarations list the columns the catalog queries depend on and are
//! used to validate a database on open.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, Schema, SqlType, Table};

const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text),
    ],
    indices: &[],
};

const ALBUMS_TABLE: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text),
        sqlite_column!("artistid", &SqlType::Integer),
        sqlite_column!("artist", &SqlType::Text),
    ],
    indices: &[("idx_albums_artistid", "artistid")],
};

const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text),
        sqlite_column!("albumid", &SqlType::Integer),
        sqlite_column!("album", &SqlType::Text),
        sqlite_column!("artistid", &SqlType::Integer),
        sqlite_column!("artist", &SqlType::Text),
        sqlite_column!("trackn", &SqlType::Integer),
        sqlite_column!("discn", &SqlType::Integer),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("duration", &SqlType::Integer),
        sqlite_column!("bitRate", &SqlType::Integer),
        sqlite_column!("genre", &SqlType::Text),
        sqlite_column!("type", &SqlType::Text),
        sqlite_column!("filename", &SqlType::Text),
    ],
    indices: &[("idx_songs_albumid", "albumid")],
};

const COVERS_TABLE: Table = Table {
    name: "covers",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("artistId", &SqlType::Integer),
        sqlite_column!("albumId", &SqlType::Integer),
        sqlite_column!("image", &SqlType::Blob),
    ],
    indices: &[],
};

const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("username", &SqlType::Text, is_primary_key = true),
        sqlite_column!("password", &SqlType::Text, non_null = true),
    ],
    indices: &[],
};

const LAST_UPDATE_TABLE: Table = Table {
    name: "last_update_ts",
    columns: &[
        sqlite_column!("table_name", &SqlType::Text, is_primary_key = true),
        sqlite_column!("mtime", &SqlType::Integer),
    ],
    indices: &[],
};

pub const LIBRARY_SCHEMA: Schema = Schema {
    tables: &[
        ARTISTS_TABLE,
        ALBUMS_TABLE,
        SONGS_TABLE,
        COVERS_TABLE,
        USERS_TABLE,
        LAST_UPDATE_TABLE,
    ],
};
