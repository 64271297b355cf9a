//! HTTP Range request parsing module
//!
//! Parses single `bytes=` ranges per RFC 7233. Multi-range and malformed
//! headers are ignored and the full content is served instead.

/// A parsed byte range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte position
    pub start: usize,
    /// Last byte position, None means until end of file
    pub end: Option<usize>,
}

impl ByteRange {
    /// Actual last byte position for a file of `file_size` bytes
    #[inline]
    pub fn end_position(&self, file_size: usize) -> usize {
        self.end.unwrap_or_else(|| file_size.saturating_sub(1))
    }

    #[cfg(test)]
    pub fn len(&self, file_size: usize) -> usize {
        self.end_position(file_size).saturating_sub(self.start) + 1
    }
}

/// Outcome of parsing a Range header
#[derive(Debug)]
pub enum RangeOutcome {
    /// Valid range, respond 206
    Satisfiable(ByteRange),
    /// Range lies outside the file, respond 416
    Unsatisfiable,
    /// No header, multi-range, or malformed: serve the full content
    Ignored,
}

/// Parse an HTTP Range header against a file of `file_size` bytes
///
/// Supported forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
pub fn parse(range_header: Option<&str>, file_size: usize) -> RangeOutcome {
    let Some(spec) = range_header.and_then(|h| h.strip_prefix("bytes=")) else {
        return RangeOutcome::Ignored;
    };

    // Single range only
    if spec.contains(',') {
        return RangeOutcome::Ignored;
    }

    let Some((start, end)) = spec.split_once('-') else {
        return RangeOutcome::Ignored;
    };
    let (start, end) = (start.trim(), end.trim());

    if start.is_empty() {
        parse_suffix(end, file_size)
    } else {
        parse_bounded(start, end, file_size)
    }
}

/// `bytes=-suffix`: the last `suffix` bytes
fn parse_suffix(suffix: &str, file_size: usize) -> RangeOutcome {
    let Ok(suffix) = suffix.parse::<usize>() else {
        return RangeOutcome::Ignored;
    };

    if suffix == 0 || file_size == 0 {
        return RangeOutcome::Unsatisfiable;
    }

    // A suffix longer than the file covers the whole file
    RangeOutcome::Satisfiable(ByteRange {
        start: file_size.saturating_sub(suffix),
        end: Some(file_size - 1),
    })
}

/// `bytes=start-` or `bytes=start-end`
fn parse_bounded(start: &str, end: &str, file_size: usize) -> RangeOutcome {
    let Ok(start) = start.parse::<usize>() else {
        return RangeOutcome::Ignored;
    };

    if start >= file_size {
        return RangeOutcome::Unsatisfiable;
    }

    let end = if end.is_empty() {
        None
    } else {
        match end.parse::<usize>() {
            // Clamp to the last byte of the file
            Ok(e) => Some(e.min(file_size - 1)),
            Err(_) => return RangeOutcome::Ignored,
        }
    };

    if end.is_some_and(|e| start > e) {
        return RangeOutcome::Unsatisfiable;
    }

    RangeOutcome::Satisfiable(ByteRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_header_is_ignored() {
        assert!(matches!(parse(None, 100), RangeOutcome::Ignored));
    }

    #[test]
    fn bounded_range() {
        match parse(Some("bytes=0-9"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 0);
                assert_eq!(r.end, Some(9));
                assert_eq!(r.len(100), 10);
            }
            _ => panic!("expected Satisfiable"),
        }
    }

    #[test]
    fn open_ended_range() {
        match parse(Some("bytes=50-"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 50);
                assert_eq!(r.end, None);
                assert_eq!(r.end_position(100), 99);
                assert_eq!(r.len(100), 50);
            }
            _ => panic!("expected Satisfiable"),
        }
    }

    #[test]
    fn suffix_range() {
        match parse(Some("bytes=-20"), 100) {
            RangeOutcome::Satisfiable(r) => {
                assert_eq!(r.start, 80);
                assert_eq!(r.end, Some(99));
            }
            _ => panic!("expected Satisfiable"),
        }
    }

    #[test]
    fn start_past_end_of_file() {
        assert!(matches!(
            parse(Some("bytes=200-"), 100),
            RangeOutcome::Unsatisfiable
        ));
    }

    #[test]
    fn empty_file_suffix_is_unsatisfiable() {
        assert!(matches!(
            parse(Some("bytes=-5"), 0),
            RangeOutcome::Unsatisfiable
        ));
    }

    #[test]
    fn malformed_and_multi_ranges_are_ignored() {
        assert!(matches!(parse(Some("bytes=a-b"), 100), RangeOutcome::Ignored));
        assert!(matches!(
            parse(Some("bytes=0-9,20-29"), 100),
            RangeOutcome::Ignored
        ));
        assert!(matches!(parse(Some("items=0-9"), 100), RangeOutcome::Ignored));
    }
}
