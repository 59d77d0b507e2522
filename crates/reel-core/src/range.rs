//! Byte-range request parsing
//!
//! Parses a single-range `Range: bytes=<start>-<end>?` header value into a
//! validated [`RangeSpec`] and resolves it against a concrete resource size.
//! Only the first-byte form is accepted: suffix ranges (`bytes=-500`) and
//! multi-range requests are treated as malformed.

/// A syntactically valid range as sent by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: u64,
    pub end: Option<u64>,
}

/// A range resolved against a resource size; `end` is inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

/// Outcome of evaluating an optional `Range` header against a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    /// No `Range` header; serve the whole resource
    Absent,
    /// Serve the given sub-range with 206
    Partial(ByteRange),
    /// Malformed or out of bounds; answer 416
    Unsatisfiable,
}

const UNIT_PREFIX: &str = "bytes=";

impl RangeSpec {
    /// Parse a header value. Returns `None` for anything that is not exactly
    /// `bytes=<digits>-<digits>?`.
    pub fn parse(header: &str) -> Option<Self> {
        let value = header.trim();
        let spec = value
            .get(..UNIT_PREFIX.len())
            .filter(|unit| unit.eq_ignore_ascii_case(UNIT_PREFIX))
            .map(|_| &value[UNIT_PREFIX.len()..])?;

        let (start, end) = spec.trim().split_once('-')?;
        let start = parse_offset(start.trim())?;
        let end = match end.trim() {
            "" => None,
            end => Some(parse_offset(end)?),
        };

        Some(RangeSpec { start, end })
    }

    /// Resolve against a resource of `size` bytes.
    ///
    /// An end offset past the last byte is clamped to `size - 1`. A start at
    /// or past the end of the resource, or a start after the end, is
    /// unsatisfiable.
    pub fn resolve(self, size: u64) -> Option<ByteRange> {
        if size == 0 || self.start >= size {
            return None;
        }
        let last = size - 1;
        let end = self.end.map_or(last, |end| end.min(last));
        if self.start > end {
            return None;
        }
        Some(ByteRange {
            start: self.start,
            end,
        })
    }
}

fn parse_offset(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[allow(clippy::len_without_is_empty)] // a resolved range always covers at least one byte
impl ByteRange {
    /// Number of bytes covered by the range
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for a 206 response
    pub fn content_range(&self, size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, size)
    }
}

impl RangeRequest {
    /// Classify an optional `Range` header for a resource of `size` bytes
    pub fn evaluate(header: Option<&str>, size: u64) -> Self {
        match header {
            None => RangeRequest::Absent,
            Some(value) => match RangeSpec::parse(value).and_then(|spec| spec.resolve(size)) {
                Some(range) => RangeRequest::Partial(range),
                None => RangeRequest::Unsatisfiable,
            },
        }
    }
}

/// `Content-Range` header value for a 416 response
pub fn unsatisfied_content_range(size: u64) -> String {
    format!("bytes */{}", size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_closed_and_open_ranges() {
        assert_eq!(
            RangeSpec::parse("bytes=0-499"),
            Some(RangeSpec {
                start: 0,
                end: Some(499)
            })
        );
        assert_eq!(
            RangeSpec::parse("bytes=1000-"),
            Some(RangeSpec {
                start: 1000,
                end: None
            })
        );
        assert_eq!(
            RangeSpec::parse("  Bytes= 5 - 9 "),
            Some(RangeSpec {
                start: 5,
                end: Some(9)
            })
        );
    }

    #[test]
    fn rejects_malformed_syntax() {
        for header in [
            "",
            "bytes=",
            "bytes=-",
            "bytes=-500",
            "bytes=abc-10",
            "bytes=10-xyz",
            "bytes=+1-2",
            "bytes=0-1,4-5",
            "items=0-10",
            "bytes 0-10",
            "0-10",
            "bytes=18446744073709551616-",
        ] {
            assert_eq!(RangeSpec::parse(header), None, "{header:?} should be rejected");
        }
    }

    #[test]
    fn open_ended_range_runs_to_last_byte() {
        let range = RangeSpec::parse("bytes=10-").unwrap().resolve(100).unwrap();
        assert_eq!(range, ByteRange { start: 10, end: 99 });
        assert_eq!(range.len(), 90);
        assert_eq!(range.content_range(100), "bytes 10-99/100");
    }

    #[test]
    fn end_past_resource_is_clamped() {
        let range = RangeSpec::parse("bytes=90-500").unwrap().resolve(100).unwrap();
        assert_eq!(range, ByteRange { start: 90, end: 99 });
    }

    #[test]
    fn unsatisfiable_ranges_are_rejected() {
        // start beyond EOF
        assert_eq!(RangeSpec::parse("bytes=100-200").unwrap().resolve(100), None);
        // start after end
        assert_eq!(RangeSpec::parse("bytes=50-10").unwrap().resolve(100), None);
        // empty resource
        assert_eq!(RangeSpec::parse("bytes=0-").unwrap().resolve(0), None);
    }

    #[test]
    fn evaluate_classifies_requests() {
        assert_eq!(RangeRequest::evaluate(None, 10), RangeRequest::Absent);
        assert_eq!(
            RangeRequest::evaluate(Some("bytes=0-0"), 10),
            RangeRequest::Partial(ByteRange { start: 0, end: 0 })
        );
        assert_eq!(
            RangeRequest::evaluate(Some("bytes=10-110"), 10),
            RangeRequest::Unsatisfiable
        );
        assert_eq!(
            RangeRequest::evaluate(Some("garbage"), 10),
            RangeRequest::Unsatisfiable
        );
        assert_eq!(unsatisfied_content_range(10), "bytes */10");
    }

    #[test]
    fn single_byte_ranges_cover_whole_resource() {
        let size = 7;
        let covered: Vec<ByteRange> = (0..size)
            .map(|i| RangeSpec { start: i, end: Some(i) }.resolve(size).unwrap())
            .collect();
        assert_eq!(covered.iter().map(ByteRange::len).sum::<u64>(), size);
    }
}
