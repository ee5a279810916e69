//! SQL text of every catalog operation.

pub const SELECT_ARTISTS_BY_NAME: &str =
    "SELECT id, name FROM artists ORDER BY name COLLATE NOCASE ASC";

pub const SELECT_ARTIST: &str = "SELECT id, name FROM artists WHERE id = ?1";

pub const COUNT_ALBUMS_OF_ARTIST: &str = "SELECT count(id) FROM albums WHERE artistid = ?1";

pub const SELECT_ALBUMS_OF_ARTIST: &str =
    "SELECT id, title, artistid, artist FROM albums WHERE artistid = ?1 ORDER BY id";

pub const SELECT_ALBUM: &str = "SELECT id, title, artistid, artist FROM albums WHERE id = ?1";

pub const COUNT_SONGS_OF_ALBUM: &str =
    "SELECT count(id) FROM songs WHERE artistid = ?1 AND albumid = ?2";

pub const SELECT_SONGS_OF_ALBUM: &str = "SELECT id, title, albumid, album, artistid, artist, \
     trackn, discn, year, duration, bitRate, genre, type, filename \
     FROM songs WHERE artistid = ?1 AND albumid = ?2 ORDER BY discn, trackn, id";

pub const SELECT_SONG: &str = "SELECT id, title, albumid, album, artistid, artist, \
     trackn, discn, year, duration, bitRate, genre, type, filename \
     FROM songs WHERE id = ?1";

pub const SELECT_ARTIST_COVERS: &str =
    "SELECT image FROM covers WHERE artistId = ?1 AND image NOT NULL";

pub const SELECT_ALBUM_COVERS: &str =
    "SELECT image FROM covers WHERE albumId = ?1 AND image NOT NULL";

pub const COUNT_MATCHING_USERS: &str =
    "SELECT count() FROM users WHERE username = ?1 AND CAST(password AS BLOB) = ?2";

pub const SELECT_TABLE_MTIME: &str = "SELECT mtime FROM last_update_ts WHERE table_name = ?1";

pub const SONGS_TABLE_NAME: &str = "songs";
