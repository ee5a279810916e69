//! CatalogStore trait definition.

use super::error::CatalogResult;
use super::models::{Album, Artist, IndexCollection, IndexGroup, Song};

/// Read-only access to the music library.
///
/// Ids are taken as received from clients; implementations reject
/// non-numeric ids with `CatalogError::InvalidInput` and report missing
/// entities with `CatalogError::NotFound`. Every call queries the backing
/// store again, nothing is cached between calls.
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Listings
    // =========================================================================

    /// All artists with a name, ordered case-insensitively and grouped by
    /// their initial. Each artist carries its album count.
    fn list_indexed_artists(&self) -> CatalogResult<Vec<IndexGroup>>;

    /// Same groups as `list_indexed_artists`, plus the last modification
    /// time of the songs table.
    fn get_indexes(&self) -> CatalogResult<IndexCollection>;

    // =========================================================================
    // Single entities
    // =========================================================================

    /// An artist with its albums, each album carrying its song count.
    fn get_artist(&self, id: &str) -> CatalogResult<Artist>;

    /// An album with its songs, song count and total duration.
    fn get_album(&self, id: &str) -> CatalogResult<Album>;

    fn get_song(&self, id: &str) -> CatalogResult<Song>;

    // =========================================================================
    // Binaries
    // =========================================================================

    /// First non-empty image stored for a cover art key (`ar-<id>` or
    /// `al-<id>`). Unknown keys and entities without art yield `Ok(None)`.
    fn get_cover_art(&self, cover_art_id: &str) -> CatalogResult<Option<Vec<u8>>>;
}
