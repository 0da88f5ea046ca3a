//! Request path translation
//!
//! Maps a request path onto the served root. Segments are normalised
//! lexically so `..` can never climb above the root; symlink escapes are
//! caught separately by the canonical containment check in `static_files`.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Decode `%XX` escapes; malformed escapes are kept literally
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push((hi << 4) | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    // Invalid UTF-8 becomes U+FFFD, so such file names are unreachable
    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Encode a file name for use in an href; unreserved characters pass through
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for b in input.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(b));
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}

/// Translate a request path (query already stripped) into a file system path under `root`
pub fn translate_path(root: &Path, request_path: &str) -> PathBuf {
    let decoded = percent_decode(request_path);
    let mut segments: Vec<&str> = Vec::new();

    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s if !is_plain_segment(s) => {}
            s => segments.push(s),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(segments);
    path
}

/// A segment that maps to exactly one path component
fn is_plain_segment(segment: &str) -> bool {
    if segment.contains(['\\', '\0']) {
        return false;
    }
    if cfg!(windows) && segment.contains(':') {
        return false;
    }
    true
}
