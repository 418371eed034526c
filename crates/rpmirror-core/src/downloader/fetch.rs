//! HTTP GET streamed straight into the destination file.
//!
//! The status line is checked before any body byte is written, so a non-200
//! response never creates or truncates the destination. Redirects are
//! followed; only the final response's status counts.

use crate::job::JobError;
use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use super::CurlOptions;

const MAX_REDIRECTS: u32 = 10;

/// Parsed `HTTP/x.y <code> <reason>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct StatusLine {
    pub(super) code: u32,
    /// Code plus reason phrase, e.g. `404 Not Found`.
    pub(super) text: String,
}

impl StatusLine {
    pub(super) fn parse(line: &[u8]) -> Option<Self> {
        let line = std::str::from_utf8(line).ok()?.trim_end();
        if !line.starts_with("HTTP/") {
            return None;
        }
        let rest = line.split_once(' ')?.1.trim();
        let (code_str, reason) = match rest.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (rest, ""),
        };
        let code = code_str.parse::<u32>().ok()?;
        let text = if reason.is_empty() {
            code.to_string()
        } else {
            format!("{} {}", code, reason)
        };
        Some(Self { code, text })
    }

    fn into_error(self) -> JobError {
        JobError::HttpStatus {
            code: self.code,
            status: self.text,
        }
    }
}

/// Destination file, opened lazily on the first body chunk.
struct BodyFile<'a> {
    path: &'a Path,
    file: Option<File>,
    written: u64,
    error: Option<io::Error>,
}

impl<'a> BodyFile<'a> {
    fn new(path: &'a Path) -> Self {
        Self {
            path,
            file: None,
            written: 0,
            error: None,
        }
    }

    fn open(&mut self) -> io::Result<&mut File> {
        let file = match self.file.take() {
            Some(f) => f,
            None => File::create(self.path)?,
        };
        Ok(self.file.insert(file))
    }

    /// Returns the number of bytes taken; anything short of `data.len()` makes curl abort.
    fn write_chunk(&mut self, data: &[u8]) -> usize {
        let res = self.open().and_then(|f| f.write_all(data));
        match res {
            Ok(()) => {
                self.written += data.len() as u64;
                data.len()
            }
            Err(e) => {
                self.error = Some(e);
                0
            }
        }
    }

    /// Creates the file if the body was empty and flushes it.
    fn finish(&mut self) -> io::Result<u64> {
        self.open()?.flush()?;
        Ok(self.written)
    }
}

/// GETs `url` into `path` (create or truncate) and returns the bytes written.
///
/// Classification: a transfer that fails before the final 200 body starts
/// (including on a redirect hop) is [`JobError::Transport`]; a completed
/// response other than 200 is [`JobError::HttpStatus`]; failing to create or
/// write the file, or the connection dropping mid-body, is
/// [`JobError::LocalIo`]. A partly written file is left in place.
pub(super) fn fetch_to_file(url: &str, path: &Path, opts: &CurlOptions) -> Result<u64, JobError> {
    let status: RefCell<Option<StatusLine>> = RefCell::new(None);
    let body = RefCell::new(BodyFile::new(path));

    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(JobError::Transport)?;
    easy.follow_location(true).map_err(JobError::Transport)?;
    easy.max_redirections(MAX_REDIRECTS)
        .map_err(JobError::Transport)?;
    if let Some(t) = opts.connect_timeout {
        easy.connect_timeout(t).map_err(JobError::Transport)?;
    }
    if let Some(t) = opts.timeout {
        easy.timeout(t).map_err(JobError::Transport)?;
    }

    let performed = {
        let mut transfer = easy.transfer();
        transfer
            .header_function(|line| {
                // Each redirect hop starts with its own status line; keep the latest.
                if let Some(s) = StatusLine::parse(line) {
                    *status.borrow_mut() = Some(s);
                }
                true
            })
            .map_err(JobError::Transport)?;
        transfer
            .write_function(|data| {
                let ok = matches!(status.borrow().as_ref(), Some(s) if s.code == 200);
                if !ok {
                    return Ok(0);
                }
                Ok(body.borrow_mut().write_chunk(data))
            })
            .map_err(JobError::Transport)?;
        transfer.perform()
    };

    let status = status.into_inner();
    let mut body = body.into_inner();

    if let Some(e) = body.error.take() {
        return Err(JobError::local_io(path, e));
    }
    match (performed, status) {
        (Ok(()), Some(s)) if s.code != 200 => Err(s.into_error()),
        (Ok(()), Some(_)) => body.finish().map_err(|e| JobError::local_io(path, e)),
        (Ok(()), None) => {
            let code = easy.response_code().map_err(JobError::Transport)?;
            Err(JobError::HttpStatus {
                code,
                status: format!("{} (no HTTP status line)", code),
            })
        }
        // Our own abort: the write callback refused a non-200 body.
        (Err(e), Some(s)) if s.code != 200 && e.is_write_error() => Err(s.into_error()),
        // The final 200 body had started arriving; the copy stage failed.
        (Err(e), Some(s))
            if s.code == 200
                && (body.file.is_some() || e.is_partial_file() || e.is_recv_error()) =>
        {
            Err(JobError::local_io(path, io::Error::new(io::ErrorKind::Other, e)))
        }
        // Connect failures on a redirect hop, redirect loops, tunnel failures.
        (Err(e), _) => Err(JobError::Transport(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_lines() {
        assert_eq!(
            StatusLine::parse(b"HTTP/1.1 404 Not Found\r\n"),
            Some(StatusLine {
                code: 404,
                text: "404 Not Found".to_string()
            })
        );
        assert_eq!(
            StatusLine::parse(b"HTTP/2 200\r\n"),
            Some(StatusLine {
                code: 200,
                text: "200".to_string()
            })
        );
        assert_eq!(StatusLine::parse(b"Content-Length: 12\r\n"), None);
        assert_eq!(StatusLine::parse(b"\r\n"), None);
        assert_eq!(StatusLine::parse(b"HTTP/1.1 abc\r\n"), None);
    }

    #[test]
    fn empty_body_still_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.rpm");
        let mut body = BodyFile::new(&path);
        assert_eq!(body.finish().unwrap(), 0);
        assert!(path.exists());
    }

    #[test]
    fn write_error_is_captured() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("a.rpm");
        let mut body = BodyFile::new(&path);
        assert_eq!(body.write_chunk(b"abc"), 0);
        assert!(body.error.is_some());
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.rpm");
        let err = fetch_to_file("http://127.0.0.1:1/a.rpm", &path, &CurlOptions::default())
            .unwrap_err();
        assert!(matches!(err, JobError::Transport(_)), "got {:?}", err);
        assert!(!path.exists());
    }
}
