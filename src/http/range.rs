//! HTTP Range request parsing module
//!
//! Single `bytes=` range parsing (RFC 9110 section 14). Multi-range and
//! other units are ignored, which means the full body is served.

/// Inclusive byte range within a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    /// Last byte position, always `< file_size`
    pub end: u64,
}

impl ByteRange {
    #[inline]
    pub const fn byte_count(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` value for a response carrying this range
    pub fn content_range(&self, file_size: u64) -> String {
        format!("bytes {}-{}/{file_size}", self.start, self.end)
    }
}

/// What a Range header asks for
#[derive(Debug, PartialEq, Eq)]
pub enum RangeOutcome {
    /// No usable Range header: serve the whole file with 200
    Full,
    /// Serve this slice with 206
    Partial(ByteRange),
    /// Syntactically valid but outside the file: 416
    NotSatisfiable,
}

/// Parse a Range header value against a file of `file_size` bytes
///
/// Supported forms: `bytes=start-end`, `bytes=start-`, `bytes=-suffix`.
pub fn parse_range(header: Option<&str>, file_size: u64) -> RangeOutcome {
    let Some(spec) = header.and_then(|h| h.trim().strip_prefix("bytes=")) else {
        return RangeOutcome::Full;
    };

    // Only a single range is honoured
    if spec.contains(',') {
        return RangeOutcome::Full;
    }

    let Some((first, last)) = spec.split_once('-') else {
        return RangeOutcome::Full;
    };
    let (first, last) = (first.trim(), last.trim());

    if first.is_empty() {
        suffix_range(last, file_size)
    } else {
        bounded_range(first, last, file_size)
    }
}

/// `-500`: the final 500 bytes
fn suffix_range(suffix: &str, file_size: u64) -> RangeOutcome {
    let Ok(suffix) = suffix.parse::<u64>() else {
        return RangeOutcome::Full;
    };
    if suffix == 0 || file_size == 0 {
        return RangeOutcome::NotSatisfiable;
    }

    // A suffix longer than the file selects the whole file
    RangeOutcome::Partial(ByteRange {
        start: file_size.saturating_sub(suffix),
        end: file_size - 1,
    })
}

/// `100-` or `100-199`
fn bounded_range(first: &str, last: &str, file_size: u64) -> RangeOutcome {
    let Ok(start) = first.parse::<u64>() else {
        return RangeOutcome::Full;
    };

    let end = if last.is_empty() {
        None
    } else {
        match last.parse::<u64>() {
            Ok(e) => Some(e),
            Err(_) => return RangeOutcome::Full,
        }
    };

    // `200-100` is invalid syntax, not an unsatisfiable range
    if end.is_some_and(|e| e < start) {
        return RangeOutcome::Full;
    }

    if start >= file_size {
        return RangeOutcome::NotSatisfiable;
    }

    let last_byte = file_size - 1;
    RangeOutcome::Partial(ByteRange {
        start,
        end: end.map_or(last_byte, |e| e.min(last_byte)),
    })
}
