//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.
//! No charset is appended: file bytes are served as-is.

use std::path::Path;

/// Fallback for unknown or missing extensions
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Guess the Content-Type of a file from its extension (case-insensitive)
///
/// # Examples
/// ```
/// use std::path::Path;
/// use cors_serve::http::mime::guess_type;
/// assert_eq!(guess_type(Path::new("index.html")), "text/html");
/// assert_eq!(guess_type(Path::new("clip.MP4")), "video/mp4");
/// assert_eq!(guess_type(Path::new("Makefile")), "application/octet-stream");
/// ```
pub fn guess_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    content_type_for(extension.as_deref())
}

/// Content-Type for an already lower-cased extension
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        // Text
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("txt" | "text" | "log") => "text/plain",
        Some("md" | "markdown") => "text/markdown",
        Some("csv") => "text/csv",
        Some("xml") => "application/xml",

        // JavaScript/WASM
        Some("js" | "mjs" | "cjs") => "text/javascript",
        Some("json" | "map") => "application/json",
        Some("wasm") => "application/wasm",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/vnd.microsoft.icon",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("bmp") => "image/bmp",

        // Video
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("ogv") => "video/ogg",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",

        // Audio
        Some("mp3") => "audio/mpeg",
        Some("ogg" | "oga") => "audio/ogg",
        Some("wav") => "audio/x-wav",
        Some("flac") => "audio/flac",
        Some("m4a") => "audio/mp4",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents and archives
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz" | "gzip") => "application/gzip",
        Some("tar") => "application/x-tar",

        _ => DEFAULT_CONTENT_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(guess_type(Path::new("index.html")), "text/html");
        assert_eq!(guess_type(Path::new("style.css")), "text/css");
        assert_eq!(guess_type(Path::new("app.js")), "text/javascript");
        assert_eq!(guess_type(Path::new("data.json")), "application/json");
        assert_eq!(guess_type(Path::new("mod.wasm")), "application/wasm");
        assert_eq!(guess_type(Path::new("logo.png")), "image/png");
    }

    #[test]
    fn test_extension_case_is_ignored() {
        assert_eq!(guess_type(Path::new("PAGE.HTM")), "text/html");
        assert_eq!(guess_type(Path::new("photo.JpEg")), "image/jpeg");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(guess_type(Path::new("blob.xyz")), DEFAULT_CONTENT_TYPE);
        assert_eq!(guess_type(Path::new("README")), DEFAULT_CONTENT_TYPE);
        assert_eq!(guess_type(Path::new(".hidden")), DEFAULT_CONTENT_TYPE);
    }
}
