use super::models::{Artist, IndexGroup};

/// Groups artists by the first character of their name, ASCII uppercased.
///
/// `artists` must already be ordered by name with SQLite's `NOCASE`
/// collation: a new group is opened every time the leading character
/// changes, so any other order yields repeated keys. The key is taken from
/// the name exactly as sorted, leading whitespace included, and only ASCII
/// letters are folded, as `NOCASE` does. Artists with a blank name are left
/// out.
pub fn group_by_initial(artists: Vec<Artist>) -> Vec<IndexGroup> {
    let mut groups: Vec<IndexGroup> = Vec::new();

    for artist in artists {
        if artist.name.trim().is_empty() {
            continue;
        }
        let initial = match artist.name.chars().next() {
            Some(c) => c.to_ascii_uppercase().to_string(),
            None => continue,
        };

        match groups.last_mut() {
            Some(group) if group.name == initial => group.artists.push(artist),
            _ => groups.push(IndexGroup {
                name: initial,
                artists: vec![artist],
            }),
        }
    }

    groups
}
