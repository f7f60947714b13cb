//! Resource resolution
//!
//! Tasks never open files themselves. They ask a [`ResourceAccessor`] for a
//! [`ResourceHandle`] by logical path and drain it into a string with
//! [`load_text`].
//!
//! - `filesystem.rs` - accessor rooted at a directory
//! - `memory.rs` - accessor backed by an in-process map

mod filesystem;
mod memory;

use crate::core::{Result, TaskError};
use std::io::{self, Read};

pub use filesystem::FileSystemAccessor;
pub use memory::InMemoryAccessor;

/// A lazily resolved reference to named content.
pub trait ResourceHandle {
    fn exists(&self) -> bool;

    /// Opens a byte stream over the content. `Ok(None)` means the handle
    /// could not produce a stream even though it was resolved.
    fn open(&self) -> io::Result<Option<Box<dyn Read + '_>>>;
}

/// Maps logical paths to resource handles.
pub trait ResourceAccessor: Send + Sync {
    fn get(&self, path: &str) -> Option<Box<dyn ResourceHandle + '_>>;
}

/// Resolves `path` and reads the whole resource as UTF-8 text.
///
/// The text is returned untrimmed; a resource that is empty or only
/// whitespace is rejected. The stream is dropped before returning.
pub fn load_text(accessor: &dyn ResourceAccessor, path: &str) -> Result<String> {
    let not_found = || TaskError::ResourceNotFound {
        path: path.to_string(),
    };

    let handle = accessor
        .get(path)
        .filter(|handle| handle.exists())
        .ok_or_else(not_found)?;

    let mut stream = match handle.open() {
        Ok(Some(stream)) => stream,
        Ok(None) => return Err(not_found()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(not_found()),
        Err(source) => {
            return Err(TaskError::Io {
                path: path.to_string(),
                source,
            });
        }
    };

    let mut text = String::new();
    stream
        .read_to_string(&mut text)
        .map_err(|source| TaskError::Io {
            path: path.to_string(),
            source,
        })?;

    if text.trim().is_empty() {
        return Err(TaskError::EmptyResource {
            path: path.to_string(),
        });
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaskErrorKind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Reader that records when it is dropped and can fail on demand.
    struct TrackedReader {
        data: io::Cursor<Vec<u8>>,
        fail: bool,
        released: Arc<AtomicBool>,
    }

    impl Read for TrackedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.fail {
                return Err(io::Error::other("disk went away"));
            }
            self.data.read(buf)
        }
    }

    impl Drop for TrackedReader {
        fn drop(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    struct TrackedHandle<'a> {
        owner: &'a TrackedAccessor,
    }

    impl ResourceHandle for TrackedHandle<'_> {
        fn exists(&self) -> bool {
            true
        }

        fn open(&self) -> io::Result<Option<Box<dyn Read + '_>>> {
            Ok(Some(Box::new(TrackedReader {
                data: io::Cursor::new(self.owner.content.clone()),
                fail: self.owner.fail,
                released: Arc::clone(&self.owner.released),
            })))
        }
    }

    struct TrackedAccessor {
        content: Vec<u8>,
        fail: bool,
        released: Arc<AtomicBool>,
    }

    impl TrackedAccessor {
        fn new(content: &str, fail: bool) -> Self {
            Self {
                content: content.as_bytes().to_vec(),
                fail,
                released: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    impl ResourceAccessor for TrackedAccessor {
        fn get(&self, _path: &str) -> Option<Box<dyn ResourceHandle + '_>> {
            Some(Box::new(TrackedHandle { owner: self }))
        }
    }

    struct StreamlessAccessor;

    struct StreamlessHandle;

    impl ResourceHandle for StreamlessHandle {
        fn exists(&self) -> bool {
            true
        }

        fn open(&self) -> io::Result<Option<Box<dyn Read + '_>>> {
            Ok(None)
        }
    }

    impl ResourceAccessor for StreamlessAccessor {
        fn get(&self, _path: &str) -> Option<Box<dyn ResourceHandle + '_>> {
            Some(Box::new(StreamlessHandle))
        }
    }

    #[test]
    fn test_load_returns_untrimmed_text() {
        let accessor =
            InMemoryAccessor::new().with_resource("skills/e100.json", "\n{\"years\":5}\n");
        let text = load_text(&accessor, "skills/e100.json").unwrap();
        assert_eq!(text, "\n{\"years\":5}\n");
    }

    #[test]
    fn test_load_keeps_embedded_newlines() {
        let json = "{\n  \"level\": \"senior\",\n  \"tags\": [\"a\", \"b\"]\n}";
        let accessor = InMemoryAccessor::new().with_resource("a.json", json);
        assert_eq!(load_text(&accessor, "a.json").unwrap(), json);
    }

    #[test]
    fn test_missing_resource_is_not_found() {
        let accessor = InMemoryAccessor::new();
        let err = load_text(&accessor, "skills/missing.json").unwrap_err();
        assert_eq!(err.kind(), TaskErrorKind::ResourceNotFound);
        assert!(err.to_string().contains("skills/missing.json"));
    }

    #[test]
    fn test_handle_without_stream_is_not_found() {
        let err = load_text(&StreamlessAccessor, "x.json").unwrap_err();
        assert_eq!(err.kind(), TaskErrorKind::ResourceNotFound);
    }

    #[test]
    fn test_empty_and_whitespace_resources_are_rejected() {
        let accessor = InMemoryAccessor::new()
            .with_resource("empty.json", "")
            .with_resource("blank.json", " \n\t \r\n");

        for path in ["empty.json", "blank.json"] {
            let err = load_text(&accessor, path).unwrap_err();
            assert_eq!(err.kind(), TaskErrorKind::EmptyResource, "{}", path);
        }
    }

    #[test]
    fn test_invalid_utf8_is_an_io_failure() {
        let accessor = InMemoryAccessor::new().with_resource("bad.json", vec![0xff, 0xfe, 0x7b]);
        let err = load_text(&accessor, "bad.json").unwrap_err();
        assert_eq!(err.kind(), TaskErrorKind::Io);
    }

    #[test]
    fn test_stream_released_after_success() {
        let accessor = TrackedAccessor::new("{\"ok\":true}", false);
        load_text(&accessor, "ok.json").unwrap();
        assert!(accessor.released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_stream_released_after_read_failure() {
        let accessor = TrackedAccessor::new("{}", true);
        let err = load_text(&accessor, "broken.json").unwrap_err();
        assert_eq!(err.kind(), TaskErrorKind::Io);
        assert!(accessor.released.load(Ordering::SeqCst));
    }

    #[test]
    fn test_stream_released_after_empty_content() {
        let accessor = TrackedAccessor::new("   ", false);
        let err = load_text(&accessor, "blank.json").unwrap_err();
        assert_eq!(err.kind(), TaskErrorKind::EmptyResource);
        assert!(accessor.released.load(Ordering::SeqCst));
    }
}
