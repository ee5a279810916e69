//! XML rendering of response envelopes.
//!
//! Every entity field is an attribute, nested collections are child
//! elements. The artist index is wrapped in an `artists` element holding
//! `index` elements.

use super::response::{Payload, ResponseEnvelope, SerializeError, PROTOCOL_NAMESPACE, PROTOCOL_VERSION};
use crate::catalog_store::{Album, Artist, IndexCollection, IndexGroup, Song};
use std::fmt::Write;

const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Replaces characters XML 1.0 cannot carry, even escaped, with U+FFFD.
fn sanitize(value: String) -> String {
    if value.chars().all(is_xml_char) {
        return value;
    }
    value
        .chars()
        .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
        .collect()
}

struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Element>,
}

impl Element {
    fn new(name: &'static str) -> Element {
        Element {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    fn attr<V: ToString>(mut self, key: &'static str, value: V) -> Element {
        self.attributes.push((key, sanitize(value.to_string())));
        self
    }

    fn attr_if_nonzero(self, key: &'static str, value: u64) -> Element {
        if value == 0 {
            self
        } else {
            self.attr(key, value)
        }
    }

    fn child(mut self, child: Element) -> Element {
        self.children.push(child);
        self
    }

    fn children<I: IntoIterator<Item = Element>>(mut self, children: I) -> Element {
        self.children.extend(children);
        self
    }

    fn write_to<W: Write>(&self, out: &mut W) -> std::fmt::Result {
        write!(out, "<{}", self.name)?;
        for (key, value) in &self.attributes {
            write!(out, " {}=\"{}\"", key, xml::escape::escape_str_attribute(value))?;
        }
        if self.children.is_empty() {
            return out.write_str("/>");
        }
        out.write_char('>')?;
        for child in &self.children {
            child.write_to(out)?;
        }
        write!(out, "</{}>", self.name)
    }
}

fn artist_element(artist: &Artist) -> Element {
    let element = Element::new("artist")
        .attr("id", artist.id)
        .attr("name", &artist.name)
        .attr("coverArt", artist.cover_art)
        .attr("albumCount", artist.album_count);
    match &artist.albums {
        Some(albums) => element.children(albums.iter().map(album_element)),
        None => element,
    }
}

fn album_element(album: &Album) -> Element {
    let element = Element::new("album")
        .attr("id", album.id)
        .attr("name", &album.name)
        .attr("artistId", album.artist_id)
        .attr("artist", &album.artist_name)
        .attr("songCount", album.song_count)
        .attr("duration", album.duration)
        .attr("coverArt", album.cover_art)
        .attr("created", &album.created);
    match &album.songs {
        Some(songs) => element.children(songs.iter().map(song_element)),
        None => element,
    }
}

fn song_element(song: &Song) -> Element {
    Element::new("song")
        .attr("id", song.id)
        .attr("parent", song.parent)
        .attr("title", &song.title)
        .attr("album", &song.album)
        .attr("artist", &song.artist)
        .attr("isDir", song.is_dir)
        .attr("coverArt", song.cover_art)
        .attr("created", &song.created)
        .attr("duration", song.duration)
        .attr("genre", &song.genre)
        .attr("bitRate", song.bit_rate)
        .attr("size", song.size)
        .attr("suffix", &song.suffix)
        .attr("contentType", &song.content_type)
        .attr("isVideo", song.is_video)
        .attr("albumId", song.album_id)
        .attr("artistId", song.artist_id)
        .attr("track", song.track)
        .attr("type", &song.file_type)
        .attr_if_nonzero("year", song.year)
        .attr_if_nonzero("discNumber", song.disc_number)
}

fn index_element(group: &IndexGroup) -> Element {
    Element::new("index")
        .attr("name", &group.name)
        .children(group.artists.iter().map(artist_element))
}

fn indexes_element(collection: &IndexCollection) -> Element {
    Element::new("indexes")
        .attr("lastModified", collection.last_modified)
        .children(collection.groups.iter().map(index_element))
}

fn payload_element(payload: &Payload) -> Option<Element> {
    let element = match payload {
        Payload::Empty => return None,
        Payload::Error(error) => Element::new("error")
            .attr("code", error.code as u32)
            .attr("message", &error.message),
        Payload::ArtistIndex(groups) => {
            Element::new("artists").children(groups.iter().map(index_element))
        }
        Payload::Artist(artist) => artist_element(artist),
        Payload::Album(album) => album_element(album),
        Payload::Song(song) => song_element(song),
        Payload::Indexes(collection) => indexes_element(collection),
    };
    Some(element)
}

pub fn render(envelope: &ResponseEnvelope) -> Result<Vec<u8>, SerializeError> {
    let mut root = Element::new("subsonic-response")
        .attr("xmlns", PROTOCOL_NAMESPACE)
        .attr("status", envelope.status())
        .attr("version", PROTOCOL_VERSION);
    if let Some(payload) = payload_element(&envelope.payload) {
        root = root.child(payload);
    }

    let mut out = String::from(XML_HEADER);
    out.push('\n');
    root.write_to(&mut out)?;
    Ok(out.into_bytes())
}
