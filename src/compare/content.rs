//! Byte-equality backends for regular files
//!
//! Both backends reject files of different length before touching their
//! contents. Any failure to read a file is reported as "not equal"; the
//! classifier has no separate outcome for I/O errors.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Default block size for streamed comparison
pub const BLOCK_SIZE: usize = 8 * 1024;

/// Decides whether two regular files hold identical bytes
pub trait ContentComparator: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// True only if both files could be read and are byte-for-byte equal
    fn equal(&self, first: &Path, second: &Path) -> bool;
}

/// In-process comparison reading both files block by block
#[derive(Debug, Clone)]
pub struct StreamComparator {
    block_size: usize,
}

impl Default for StreamComparator {
    fn default() -> Self {
        Self {
            block_size: BLOCK_SIZE,
        }
    }
}

impl StreamComparator {
    pub fn with_block_size(block_size: usize) -> Self {
        Self {
            block_size: block_size.max(1),
        }
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    fn compare_files(&self, first: &Path, second: &Path) -> io::Result<bool> {
        if !same_length(first, second)? {
            return Ok(false);
        }
        let a = File::open(first)?;
        let b = File::open(second)?;
        readers_equal(a, b, self.block_size)
    }
}

impl ContentComparator for StreamComparator {
    fn name(&self) -> &'static str {
        "stream"
    }

    fn equal(&self, first: &Path, second: &Path) -> bool {
        match self.compare_files(first, second) {
            Ok(equal) => equal,
            Err(e) => {
                debug!(
                    first = %first.display(),
                    second = %second.display(),
                    error = %e,
                    "Content comparison failed"
                );
                false
            }
        }
    }
}

/// Delegates to the external `cmp -s` utility
#[derive(Debug, Clone)]
pub struct ExternalComparator {
    program: OsString,
}

impl Default for ExternalComparator {
    fn default() -> Self {
        Self {
            program: OsString::from("cmp"),
        }
    }
}

impl ExternalComparator {
    /// Use a different program with `cmp`'s `-s` calling convention
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ContentComparator for ExternalComparator {
    fn name(&self) -> &'static str {
        "external"
    }

    fn equal(&self, first: &Path, second: &Path) -> bool {
        match same_length(first, second) {
            Ok(true) => {}
            Ok(false) => return false,
            Err(e) => {
                debug!(first = %first.display(), error = %e, "Failed to read file lengths");
                return false;
            }
        }

        let status = Command::new(&self.program)
            .arg("-s")
            .arg(first)
            .arg(second)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(status) => status.success(),
            Err(e) => {
                debug!(program = ?self.program, error = %e, "Failed to run external comparator");
                false
            }
        }
    }
}

/// Compare two readers block by block
pub fn readers_equal<A: Read, B: Read>(mut a: A, mut b: B, block_size: usize) -> io::Result<bool> {
    let block_size = block_size.max(1);
    let mut buf_a = vec![0u8; block_size];
    let mut buf_b = vec![0u8; block_size];

    loop {
        let n_a = fill(&mut a, &mut buf_a)?;
        let n_b = fill(&mut b, &mut buf_b)?;
        if n_a != n_b || buf_a[..n_a] != buf_b[..n_b] {
            return Ok(false);
        }
        if n_a == 0 {
            return Ok(true);
        }
    }
}

fn same_length(first: &Path, second: &Path) -> io::Result<bool> {
    Ok(fs::metadata(first)?.len() == fs::metadata(second)?.len())
}

/// Read until `buf` is full or the reader is exhausted
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    /// Hands out at most 3 bytes per read
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.0.len().min(buf.len()).min(3);
            buf[..n].copy_from_slice(&self.0[..n]);
            self.0 = &self.0[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_readers_equal() {
        let data = b"the quick brown fox jumps over the lazy dog";
        assert!(readers_equal(Cursor::new(data), Cursor::new(data), 8).unwrap());
        assert!(!readers_equal(Cursor::new(&b"abc"[..]), Cursor::new(&b"abd"[..]), 8).unwrap());
        assert!(!readers_equal(Cursor::new(&b"abc"[..]), Cursor::new(&b"ab"[..]), 8).unwrap());
        assert!(readers_equal(Cursor::new(&b""[..]), Cursor::new(&b""[..]), 8).unwrap());
    }

    #[test]
    fn test_short_reads_are_filled() {
        let data = b"0123456789abcdefghij";
        assert!(readers_equal(Trickle(data), Cursor::new(data), 8).unwrap());
    }

    #[test]
    fn test_stream_comparator_files() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let c = dir.path().join("c");
        let content = vec![7u8; BLOCK_SIZE * 3 + 11];
        let mut changed = content.clone();
        changed[BLOCK_SIZE * 2 + 5] = 8;
        fs::write(&a, &content).unwrap();
        fs::write(&b, &content).unwrap();
        fs::write(&c, &changed).unwrap();

        let cmp = StreamComparator::default();
        assert!(cmp.equal(&a, &b));
        assert!(!cmp.equal(&a, &c));
    }

    #[test]
    fn test_stream_comparator_unreadable_is_not_equal() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        fs::write(&a, "x").unwrap();
        let cmp = StreamComparator::with_block_size(0);
        assert_eq!(cmp.block_size(), 1);
        assert!(!cmp.equal(&a, &dir.path().join("missing")));
    }

    #[cfg(unix)]
    #[test]
    fn test_external_comparator_uses_exit_status() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, "aaaa").unwrap();
        fs::write(&b, "bbbb").unwrap();

        assert!(ExternalComparator::with_program("true").equal(&a, &b));
        assert!(!ExternalComparator::with_program("false").equal(&a, &b));
        assert!(!ExternalComparator::with_program("/nonexistent/cmp-tool").equal(&a, &b));
    }

    #[test]
    fn test_external_comparator_length_fast_reject() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::write(&a, "short").unwrap();
        fs::write(&b, "much longer").unwrap();

        // Would report equal if it were ever spawned
        assert!(!ExternalComparator::with_program("true").equal(&a, &b));
    }
}
