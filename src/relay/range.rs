//! Byte-range header parsing.
//!
//! [`parse_range_header`] handles the client-facing `Range` header;
//! [`parse_content_range`] handles the upstream-facing `Content-Range`
//! answer. Both are pure functions.

use crate::error::{Error, Result};

/// A requested byte interval. `end` is `None` for open-ended ranges like
/// `bytes=500-` (from `start` to EOF).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: u64,
    pub end: Option<u64>,
}

impl RangeSpec {
    /// Render the equivalent upstream `Range` header value.
    pub fn to_header_value(&self) -> String {
        match self.end {
            Some(end) => format!("bytes={}-{}", self.start, end),
            None => format!("bytes={}-", self.start),
        }
    }
}

/// Parse a client `Range: bytes=START-END` header value.
///
/// Returns `Ok(None)` when no header was present. Only single-range requests
/// are supported; multi-range sets fail with
/// [`Error::UnsupportedMultiRange`], anything else unparseable with
/// [`Error::MalformedRange`]. Suffix ranges (`bytes=-N`) have no explicit
/// start and are rejected as malformed; callers degrade both failures to
/// full-file delivery.
pub fn parse_range_header(value: Option<&str>) -> Result<Option<RangeSpec>> {
    let Some(value) = value else {
        return Ok(None);
    };

    let malformed = || Error::MalformedRange(value.to_string());

    let ranges = value.trim().strip_prefix("bytes=").ok_or_else(malformed)?;

    if ranges.contains(',') {
        return Err(Error::UnsupportedMultiRange(value.to_string()));
    }

    let (start_str, end_str) = ranges.split_once('-').ok_or_else(malformed)?;

    let start: u64 = start_str.trim().parse().map_err(|_| malformed())?;

    let end_str = end_str.trim();
    let end = if end_str.is_empty() {
        None
    } else {
        let end: u64 = end_str.parse().map_err(|_| malformed())?;
        if end < start {
            return Err(malformed());
        }
        Some(end)
    };

    Ok(Some(RangeSpec { start, end }))
}

/// The byte window an upstream actually served, per its `Content-Range`
/// header. `size` is `None` when the upstream reported `*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRange {
    pub start: u64,
    pub end: u64,
    pub size: Option<u64>,
}

impl ContentRange {
    /// Length of the served window. Never zero, since `end >= start`.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Parse an upstream `Content-Range: bytes START-END/SIZE` header value.
pub fn parse_content_range(value: &str) -> Option<ContentRange> {
    let rest = value.trim().strip_prefix("bytes")?.trim_start();

    let (range_part, size_part) = rest.split_once('/')?;
    let (start_str, end_str) = range_part.split_once('-')?;

    let start: u64 = start_str.trim().parse().ok()?;
    let end: u64 = end_str.trim().parse().ok()?;
    if end < start {
        return None;
    }

    let size = match size_part.trim() {
        "*" => None,
        s => Some(s.parse::<u64>().ok()?),
    };

    Some(ContentRange { start, end, size })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parse_range_absent() {
        assert_eq!(parse_range_header(None).unwrap(), None);
    }

    #[test]
    fn parse_range_bounded() {
        let spec = parse_range_header(Some("bytes=0-499")).unwrap().unwrap();
        assert_eq!(spec.start, 0);
        assert_eq!(spec.end, Some(499));
    }

    #[test]
    fn parse_range_open_end() {
        let spec = parse_range_header(Some("bytes=500-")).unwrap().unwrap();
        assert_eq!(spec.start, 500);
        assert_eq!(spec.end, None);
    }

    #[test]
    fn parse_range_missing_prefix() {
        assert_matches!(
            parse_range_header(Some("0-499")),
            Err(Error::MalformedRange(_))
        );
    }

    #[test]
    fn parse_range_non_numeric() {
        assert_matches!(
            parse_range_header(Some("bytes=abc-def")),
            Err(Error::MalformedRange(_))
        );
    }

    #[test]
    fn parse_range_suffix_form_rejected() {
        assert_matches!(
            parse_range_header(Some("bytes=-500")),
            Err(Error::MalformedRange(_))
        );
    }

    #[test]
    fn parse_range_end_before_start() {
        assert_matches!(
            parse_range_header(Some("bytes=100-50")),
            Err(Error::MalformedRange(_))
        );
    }

    #[test]
    fn parse_range_multi_range_rejected() {
        assert_matches!(
            parse_range_header(Some("bytes=0-10,20-30")),
            Err(Error::UnsupportedMultiRange(_))
        );
    }

    #[test]
    fn parse_range_single_byte() {
        let spec = parse_range_header(Some("bytes=7-7")).unwrap().unwrap();
        assert_eq!(spec.start, 7);
        assert_eq!(spec.end, Some(7));
    }

    #[test]
    fn header_value_round_trip() {
        let bounded = RangeSpec {
            start: 100,
            end: Some(300),
        };
        assert_eq!(bounded.to_header_value(), "bytes=100-300");

        let open = RangeSpec {
            start: 0,
            end: None,
        };
        assert_eq!(open.to_header_value(), "bytes=0-");
    }

    #[test]
    fn parse_content_range_with_size() {
        let cr = parse_content_range("bytes 100-199/1000").unwrap();
        assert_eq!(cr.start, 100);
        assert_eq!(cr.end, 199);
        assert_eq!(cr.size, Some(1000));
        assert_eq!(cr.len(), 100);
    }

    #[test]
    fn parse_content_range_unknown_size() {
        let cr = parse_content_range("bytes 0-99/*").unwrap();
        assert_eq!(cr.size, None);
        assert_eq!(cr.len(), 100);
    }

    #[test]
    fn parse_content_range_rejects_garbage() {
        assert!(parse_content_range("100-199/1000").is_none());
        assert!(parse_content_range("bytes x-y/z").is_none());
        assert!(parse_content_range("bytes 199-100/1000").is_none());
    }
}
