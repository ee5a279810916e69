//! File serving with byte ranges and conditional GET.
//!
//! Callers hand over a path; the file is opened here and its handle moves
//! into the response body stream, so it is closed when the body finishes or
//! is dropped.

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use std::io::SeekFrom;
use std::path::Path;
use std::time::SystemTime;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt},
};
use tokio_util::io::ReaderStream;
use tracing::{debug, error};

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
const STREAM_CHUNK_SIZE: usize = 4096 * 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    start_inclusive: Option<u64>,
    end_inclusive: Option<u64>,
}

impl ByteRange {
    #[cfg(test)]
    fn new(start_inclusive: Option<u64>, end_inclusive: Option<u64>) -> ByteRange {
        ByteRange {
            start_inclusive,
            end_inclusive,
        }
    }

    fn parse<S: AsRef<str>>(s: S) -> Option<ByteRange> {
        let v = s.as_ref().trim().strip_prefix("bytes=")?;
        let parts: Vec<&str> = v.split('-').collect();
        if parts.len() != 2 {
            return None;
        }

        Some(ByteRange {
            start_inclusive: parts[0].trim().parse::<u64>().ok(),
            end_inclusive: parts[1].trim().parse::<u64>().ok(),
        })
    }

    /// Inclusive bounds of this range within a file of `len` bytes.
    ///
    /// `Ok(None)` means the range says nothing usable and the whole file is
    /// served, `Err(())` means it cannot be satisfied.
    fn resolve(&self, len: u64) -> Result<Option<(u64, u64)>, ()> {
        match (self.start_inclusive, self.end_inclusive) {
            (None, None) => Ok(None),
            (Some(start), None) if start < len => Ok(Some((start, len - 1))),
            (Some(start), Some(end)) if start <= end && start < len => {
                Ok(Some((start, end.min(len - 1))))
            }
            (None, Some(suffix)) if suffix > 0 && len > 0 => {
                Ok(Some((len - suffix.min(len), len - 1)))
            }
            (Some(start), Some(end)) if start > end => Ok(None),
            _ => Err(()),
        }
    }
}

fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format(HTTP_DATE_FORMAT).to_string()
}

fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

/// True when the client copy, dated by `If-Modified-Since`, is still fresh.
fn not_modified(headers: &HeaderMap, modified: Option<SystemTime>) -> bool {
    let modified = match modified {
        Some(time) => DateTime::<Utc>::from(time).timestamp(),
        None => return false,
    };
    headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_http_date)
        .is_some_and(|since| modified <= since.timestamp())
}

fn requested_range(headers: &HeaderMap) -> Option<ByteRange> {
    headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok())
        .and_then(ByteRange::parse)
}

/// An opened file ready to be served.
pub struct ServedFile {
    file: File,
    len: u64,
    modified: Option<SystemTime>,
    content_type: String,
}

impl ServedFile {
    /// Opens `path`. A modification time that cannot be read is left
    /// unknown rather than failing.
    pub async fn open(path: &Path) -> std::io::Result<ServedFile> {
        let file = File::open(path).await?;
        let metadata = file.metadata().await?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();
        Ok(ServedFile {
            file,
            len: metadata.len(),
            modified: metadata.modified().ok(),
            content_type,
        })
    }

    pub async fn respond(mut self, request_headers: &HeaderMap) -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
        if let Ok(value) = HeaderValue::from_str(&self.content_type) {
            headers.insert(header::CONTENT_TYPE, value);
        }
        if let Some(modified) = self.modified {
            if let Ok(value) = HeaderValue::from_str(&http_date(modified)) {
                headers.insert(header::LAST_MODIFIED, value);
            }
        }

        if not_modified(request_headers, self.modified) {
            headers.remove(header::CONTENT_TYPE);
            return (StatusCode::NOT_MODIFIED, headers).into_response();
        }

        let bounds = match requested_range(request_headers).map(|range| range.resolve(self.len)) {
            None | Some(Ok(None)) => None,
            Some(Ok(Some(bounds))) => Some(bounds),
            Some(Err(())) => {
                debug!("Unsatisfiable range for a file of {} bytes", self.len);
                if let Ok(value) = HeaderValue::from_str(&format!("bytes */{}", self.len)) {
                    headers.insert(header::CONTENT_RANGE, value);
                }
                return (StatusCode::RANGE_NOT_SATISFIABLE, headers).into_response();
            }
        };

        let (status, start, length) = match bounds {
            None => (StatusCode::OK, 0, self.len),
            Some((start, end)) => {
                let content_range = format!("bytes {}-{}/{}", start, end, self.len);
                if let Ok(value) = HeaderValue::from_str(&content_range) {
                    headers.insert(header::CONTENT_RANGE, value);
                }
                (StatusCode::PARTIAL_CONTENT, start, end - start + 1)
            }
        };

        if start > 0 {
            if let Err(err) = self.file.seek(SeekFrom::Start(start)).await {
                error!("Failed to seek to {}: {}", start, err);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));

        let stream = ReaderStream::with_capacity(self.file.take(length), STREAM_CHUNK_SIZE);
        (status, headers, Body::from_stream(stream)).into_response()
    }
}
