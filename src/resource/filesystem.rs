use super::{ResourceAccessor, ResourceHandle};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Component, Path, PathBuf};

/// Resolves logical paths relative to a root directory.
///
/// Absolute paths and paths that climb out of the root with `..` do not
/// resolve at all.
#[derive(Debug, Clone)]
pub struct FileSystemAccessor {
    root: PathBuf,
}

impl FileSystemAccessor {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, logical_path: &str) -> Option<PathBuf> {
        let relative = Path::new(logical_path);
        if logical_path.trim().is_empty() {
            return None;
        }
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        contained.then(|| self.root.join(relative))
    }
}

struct FileResource {
    path: PathBuf,
}

impl ResourceHandle for FileResource {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn open(&self) -> io::Result<Option<Box<dyn Read + '_>>> {
        let file = File::open(&self.path)?;
        Ok(Some(Box::new(BufReader::new(file))))
    }
}

impl ResourceAccessor for FileSystemAccessor {
    fn get(&self, path: &str) -> Option<Box<dyn ResourceHandle + '_>> {
        let path = self.resolve(path)?;
        Some(Box::new(FileResource { path }))
    }
}
