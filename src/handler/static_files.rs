//! Static file serving module
//!
//! Resolves request paths under the served root and answers with file
//! contents, directory listings, redirects or error pages.

use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, RANGE};
use hyper::{Response, StatusCode};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use super::listing;
use super::path::{percent_decode, translate_path};
use crate::http::{self, conditional, mime, RangeOutcome};
use crate::logger;

/// File server rooted at a canonical directory
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    index_files: Vec<String>,
    directory_listing: bool,
    ranges: bool,
}

impl StaticFiles {
    /// `root` must already be canonical, containment checks rely on it
    pub const fn new(
        root: PathBuf,
        index_files: Vec<String>,
        directory_listing: bool,
        ranges: bool,
    ) -> Self {
        Self {
            root,
            index_files,
            directory_listing,
            ranges,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Answer a GET or HEAD request for `path` (`query` is only used for redirects)
    pub async fn serve(
        &self,
        path: &str,
        query: Option<&str>,
        headers: &HeaderMap,
        is_head: bool,
    ) -> Response<Full<Bytes>> {
        let fs_path = translate_path(&self.root, path);

        let metadata = match fs::metadata(&fs_path).await {
            Ok(m) => m,
            Err(e) => return io_error_response(&e, is_head),
        };

        if !self.contains(&fs_path).await {
            logger::log_warning(&format!(
                "Path escapes served root, refusing: {path} -> {}",
                fs_path.display()
            ));
            return not_found(is_head);
        }

        if metadata.is_dir() {
            return self.serve_directory(&fs_path, path, query, headers, is_head).await;
        }

        // A file cannot be addressed as a directory
        if path.ends_with('/') {
            return not_found(is_head);
        }

        self.serve_file(&fs_path, &metadata, headers, is_head).await
    }

    /// Canonical-path containment, catches symlinks pointing outside the root
    async fn contains(&self, path: &Path) -> bool {
        fs::canonicalize(path)
            .await
            .is_ok_and(|canonical| canonical.starts_with(&self.root))
    }

    async fn serve_directory(
        &self,
        dir: &Path,
        path: &str,
        query: Option<&str>,
        headers: &HeaderMap,
        is_head: bool,
    ) -> Response<Full<Bytes>> {
        if !path.ends_with('/') {
            // `//host` would be a protocol-relative Location
            let path = format!("/{}", path.trim_start_matches('/'));
            let location = match query {
                Some(q) => format!("{path}/?{q}"),
                None => format!("{path}/"),
            };
            return http::build_redirect_response(&location);
        }

        for index in &self.index_files {
            let candidate = dir.join(index);
            if let Ok(metadata) = fs::metadata(&candidate).await {
                if metadata.is_file() && self.contains(&candidate).await {
                    return self.serve_file(&candidate, &metadata, headers, is_head).await;
                }
            }
        }

        if !self.directory_listing {
            return not_found(is_head);
        }

        match listing::read_entries(dir).await {
            Ok(entries) => {
                let page = listing::render_listing(&percent_decode(path), &entries);
                http::build_html_response(page, is_head)
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => http::build_error_response(
                StatusCode::FORBIDDEN,
                "No permission to list directory",
                is_head,
            ),
            Err(e) => {
                logger::log_error(&format!("Failed to list '{}': {e}", dir.display()));
                not_found(is_head)
            }
        }
    }

    async fn serve_file(
        &self,
        file: &Path,
        metadata: &std::fs::Metadata,
        headers: &HeaderMap,
        is_head: bool,
    ) -> Response<Full<Bytes>> {
        let file_size = metadata.len();
        let content_type = mime::guess_type(file);
        let modified: Option<DateTime<Utc>> = metadata.modified().ok().map(DateTime::from);
        let last_modified = modified.map(conditional::http_date);

        if modified.is_some_and(|m| conditional::is_not_modified(headers, m)) {
            return http::build_304_response(last_modified.as_deref());
        }

        let outcome = if self.ranges {
            http::parse_range(
                headers.get(RANGE).and_then(|v| v.to_str().ok()),
                file_size,
            )
        } else {
            RangeOutcome::Full
        };

        match outcome {
            RangeOutcome::NotSatisfiable => http::build_416_response(file_size, is_head),
            RangeOutcome::Partial(range) => {
                let data = if is_head {
                    Ok(Bytes::new())
                } else {
                    read_range(file, range.start, range.byte_count()).await
                };
                match data {
                    Ok(data) => http::build_partial_response(
                        data,
                        content_type,
                        &range,
                        file_size,
                        last_modified.as_deref(),
                    ),
                    Err(e) => io_error_response(&e, is_head),
                }
            }
            RangeOutcome::Full => {
                let data = if is_head {
                    Ok(Bytes::new())
                } else {
                    fs::read(file).await.map(Bytes::from)
                };
                match data {
                    Ok(data) => http::build_file_response(
                        data,
                        content_type,
                        file_size,
                        last_modified.as_deref(),
                        self.ranges,
                    ),
                    Err(e) => io_error_response(&e, is_head),
                }
            }
        }
    }
}

/// Read `len` bytes starting at `start`
async fn read_range(file: &Path, start: u64, len: u64) -> io::Result<Bytes> {
    let len = usize::try_from(len)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "range too large"))?;
    let mut handle = fs::File::open(file).await?;
    handle.seek(SeekFrom::Start(start)).await?;

    let mut buf = vec![0; len];
    handle.read_exact(&mut buf).await?;
    Ok(Bytes::from(buf))
}

fn not_found(is_head: bool) -> Response<Full<Bytes>> {
    http::build_error_response(StatusCode::NOT_FOUND, "File not found", is_head)
}

/// Map a file system error onto the client-facing status
fn io_error_response(err: &io::Error, is_head: bool) -> Response<Full<Bytes>> {
    match err.kind() {
        io::ErrorKind::PermissionDenied => {
            http::build_error_response(StatusCode::FORBIDDEN, "Permission denied", is_head)
        }
        io::ErrorKind::NotFound => not_found(is_head),
        _ => {
            logger::log_warning(&format!("File access failed: {err}"));
            not_found(is_head)
        }
    }
}
