//! Filesystem staging queue.
//!
//! Each pipeline stage owns one directory under the queue root, namespaced
//! per tenant, acting as a durable single-hop queue: the producer writes a
//! file, the stage's consumer reads and removes it. Writes go to a
//! dot-prefixed temporary name and are renamed into place, so a concurrent
//! poller never observes a partially written file.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Error, Result};

/// Distinguishes in-flight files created by concurrent callers. Combined
/// with the process id it makes every temporary name unique; the dot prefix
/// keeps them out of pending listings.
static IN_FLIGHT_SEQ: AtomicU64 = AtomicU64::new(0);

fn in_flight_suffix() -> String {
    let seq = IN_FLIGHT_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{}-{seq}", std::process::id())
}

/// A pipeline stage with its own drop point.
///
/// The two stages never share a directory; a file waiting for conversion is
/// invisible to the segmentation worker and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Uploaded documents awaiting the PDF-to-XML converter
    ToExtract,
    /// Documents awaiting segmentation
    ToSegment,
}

impl Stage {
    /// Directory name of the stage under the queue root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Stage::ToExtract => "to_extract",
            Stage::ToSegment => "to_segment",
        }
    }
}

/// Durable, tenant-namespaced drop points for pipeline stages.
#[derive(Debug, Clone)]
pub struct StagingQueue {
    root: PathBuf,
}

impl StagingQueue {
    /// Create a queue rooted at the given directory. Stage directories are
    /// created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Write a file into a stage's drop point.
    ///
    /// The path is `<root>/<stage>[/<tenant>]/<file_name>`; missing
    /// directories are created. The write is all-or-nothing: content lands
    /// under a temporary name first and is renamed into place, so consumers
    /// only ever see complete files. Re-enqueuing the same key overwrites
    /// the pending file.
    pub fn enqueue(
        &self,
        stage: Stage,
        tenant: Option<&str>,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<PathBuf> {
        let dir = self.stage_dir(stage, tenant)?;
        let file_name = validate_name(file_name)?;
        fs::create_dir_all(&dir)?;

        // Rename within one directory is atomic on POSIX filesystems. The
        // temporary name is unique per call, so concurrent writers of one
        // key never share a half-written file; the last rename wins whole.
        let tmp = dir.join(format!(".{file_name}.{}.tmp", in_flight_suffix()));
        fs::write(&tmp, bytes)?;
        let path = dir.join(file_name);
        fs::rename(&tmp, &path)?;

        log::debug!("enqueued {} byte(s) at {}", bytes.len(), path.display());
        Ok(path)
    }

    /// Consumer-side read of a staged file, removing it once read.
    ///
    /// Intended for the stage's designated consumer only. An absent or
    /// already-claimed file is reported as not found, indistinguishable
    /// from never staged; of concurrent claims for one key at most one
    /// receives the content.
    pub fn claim(&self, stage: Stage, tenant: Option<&str>, file_name: &str) -> Result<Vec<u8>> {
        let dir = self.stage_dir(stage, tenant)?;
        let path = dir.join(validate_name(file_name)?);

        let claimed = claim_for_removal(&path)?;
        let bytes = fs::read(&claimed)?;
        fs::remove_file(&claimed)?;

        log::debug!("claimed {} byte(s) from {}", bytes.len(), path.display());
        Ok(bytes)
    }

    /// File names currently waiting in a stage, sorted. In-flight temporary
    /// files are excluded.
    pub fn pending(&self, stage: Stage, tenant: Option<&str>) -> Result<Vec<String>> {
        let dir = self.stage_dir(stage, tenant)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| !name.starts_with('.'))
            .collect();
        names.sort();
        Ok(names)
    }

    fn stage_dir(&self, stage: Stage, tenant: Option<&str>) -> Result<PathBuf> {
        let mut dir = self.root.join(stage.dir_name());
        if let Some(tenant) = tenant {
            dir.push(validate_name(tenant)?);
        }
        Ok(dir)
    }
}

/// Reject names that are empty, hidden, or would escape their directory.
pub(crate) fn validate_name(name: &str) -> Result<&str> {
    let escapes = name.is_empty()
        || name == ".."
        || name.starts_with('.')
        || name.contains('/')
        || name.contains('\\');
    if escapes {
        return Err(Error::InvalidName(name.to_string()));
    }
    Ok(name)
}

/// Atomically claim a file for consumption by renaming it to a unique
/// hidden name in the same directory, returning the new path.
///
/// Of any number of concurrent claimants exactly one rename succeeds; the
/// rest see not-found, as if the file never existed. The claimed file is
/// still on disk, so the caller captures the content in full before
/// removing it.
pub(crate) fn claim_for_removal(path: &Path) -> Result<PathBuf> {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or(OsStr::new("file")));
    name.push(format!(".{}.claim", in_flight_suffix()));
    let claimed = path.with_file_name(name);

    fs::rename(path, &claimed).map_err(|err| not_found_or_io(err, path))?;
    Ok(claimed)
}

fn not_found_or_io(err: std::io::Error, path: &Path) -> Error {
    if err.kind() == std::io::ErrorKind::NotFound {
        Error::NotFound(path.display().to_string())
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_enqueue_with_tenant() {
        let root = TempDir::new().unwrap();
        let queue = StagingQueue::new(root.path());

        let path = queue
            .enqueue(Stage::ToExtract, Some("tenant_one"), "test.pdf", b"%PDF")
            .unwrap();

        assert_eq!(path, root.path().join("to_extract/tenant_one/test.pdf"));
        assert_eq!(fs::read(&path).unwrap(), b"%PDF");
    }

    #[test]
    fn test_enqueue_without_tenant_is_not_namespaced() {
        let root = TempDir::new().unwrap();
        let queue = StagingQueue::new(root.path());

        let path = queue
            .enqueue(Stage::ToSegment, None, "test.pdf", b"%PDF")
            .unwrap();

        assert_eq!(path, root.path().join("to_segment/test.pdf"));
    }

    #[test]
    fn test_stages_do_not_share_a_directory() {
        let root = TempDir::new().unwrap();
        let queue = StagingQueue::new(root.path());

        queue
            .enqueue(Stage::ToExtract, Some("t"), "a.pdf", b"1")
            .unwrap();

        assert!(queue.pending(Stage::ToSegment, Some("t")).unwrap().is_empty());
        assert_eq!(
            queue.pending(Stage::ToExtract, Some("t")).unwrap(),
            vec!["a.pdf"]
        );
    }

    #[test]
    fn test_reenqueue_overwrites() {
        let root = TempDir::new().unwrap();
        let queue = StagingQueue::new(root.path());

        queue
            .enqueue(Stage::ToExtract, Some("t"), "a.pdf", b"old")
            .unwrap();
        let path = queue
            .enqueue(Stage::ToExtract, Some("t"), "a.pdf", b"new")
            .unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"new");
        assert_eq!(queue.pending(Stage::ToExtract, Some("t")).unwrap().len(), 1);
    }

    #[test]
    fn test_no_temporary_file_remains_visible() {
        let root = TempDir::new().unwrap();
        let queue = StagingQueue::new(root.path());

        queue
            .enqueue(Stage::ToExtract, None, "a.pdf", b"bytes")
            .unwrap();

        assert_eq!(queue.pending(Stage::ToExtract, None).unwrap(), vec!["a.pdf"]);
        let on_disk: Vec<_> = fs::read_dir(root.path().join("to_extract"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(on_disk.len(), 1);
    }

    #[test]
    fn test_claim_removes_the_file() {
        let root = TempDir::new().unwrap();
        let queue = StagingQueue::new(root.path());

        queue
            .enqueue(Stage::ToSegment, Some("t"), "a.pdf", b"payload")
            .unwrap();

        let bytes = queue.claim(Stage::ToSegment, Some("t"), "a.pdf").unwrap();
        assert_eq!(bytes, b"payload");

        let again = queue.claim(Stage::ToSegment, Some("t"), "a.pdf");
        assert!(matches!(again, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_pending_on_missing_stage_is_empty() {
        let root = TempDir::new().unwrap();
        let queue = StagingQueue::new(root.path());
        assert!(queue.pending(Stage::ToExtract, Some("t")).unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_enqueues_of_one_key_never_publish_partial_content() {
        use std::sync::{Arc, Barrier};
        use std::thread;

        let root = TempDir::new().unwrap();
        let queue = StagingQueue::new(root.path());
        let writers = 8;
        let barrier = Arc::new(Barrier::new(writers));

        let handles: Vec<_> = (0..writers)
            .map(|i| {
                let queue = queue.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    // Each writer races a distinct uniform payload.
                    let payload = vec![b'a' + i as u8; 64 * 1024];
                    barrier.wait();
                    queue.enqueue(Stage::ToExtract, Some("t"), "a.pdf", &payload)
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        // Whatever rename won, the published file is one complete payload.
        let bytes = fs::read(root.path().join("to_extract/t/a.pdf")).unwrap();
        assert_eq!(bytes.len(), 64 * 1024);
        assert!(bytes.iter().all(|&b| b == bytes[0]));
        assert_eq!(
            queue.pending(Stage::ToExtract, Some("t")).unwrap(),
            vec!["a.pdf"]
        );
    }

    #[test]
    fn test_concurrent_claims_deliver_to_exactly_one_consumer() {
        use std::sync::{Arc, Barrier};
        use std::thread;

        let root = TempDir::new().unwrap();
        let queue = StagingQueue::new(root.path());
        queue
            .enqueue(Stage::ToSegment, Some("t"), "a.pdf", b"payload")
            .unwrap();

        let consumers = 8;
        let barrier = Arc::new(Barrier::new(consumers));
        let handles: Vec<_> = (0..consumers)
            .map(|_| {
                let queue = queue.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    queue.claim(Stage::ToSegment, Some("t"), "a.pdf")
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for result in results {
            match result {
                Ok(bytes) => assert_eq!(bytes, b"payload"),
                Err(err) => assert!(err.is_not_found(), "losing claim saw: {err}"),
            }
        }
    }

    #[test]
    fn test_names_escaping_the_directory_are_rejected() {
        let root = TempDir::new().unwrap();
        let queue = StagingQueue::new(root.path());

        for name in ["", "..", "../a.pdf", "a/b.pdf", ".hidden"] {
            let result = queue.enqueue(Stage::ToExtract, None, name, b"x");
            assert!(matches!(result, Err(Error::InvalidName(_))), "{name:?}");
        }

        let result = queue.enqueue(Stage::ToExtract, Some("../t"), "a.pdf", b"x");
        assert!(matches!(result, Err(Error::InvalidName(_))));
    }
}
