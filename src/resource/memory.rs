use super::{ResourceAccessor, ResourceHandle};
use std::collections::HashMap;
use std::io::{self, Cursor, Read};

/// Accessor over resources held in memory, keyed by logical path.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccessor {
    resources: HashMap<String, Vec<u8>>,
}

impl InMemoryAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.resources.insert(path.into(), content.into());
    }

    pub fn with_resource(mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(path, content);
        self
    }
}

struct MemoryResource<'a> {
    content: Option<&'a [u8]>,
}

impl ResourceHandle for MemoryResource<'_> {
    fn exists(&self) -> bool {
        self.content.is_some()
    }

    fn open(&self) -> io::Result<Option<Box<dyn Read + '_>>> {
        Ok(self
            .content
            .map(|bytes| Box::new(Cursor::new(bytes)) as Box<dyn Read + '_>))
    }
}

impl ResourceAccessor for InMemoryAccessor {
    fn get(&self, path: &str) -> Option<Box<dyn ResourceHandle + '_>> {
        let content = self.resources.get(path).map(Vec::as_slice);
        Some(Box::new(MemoryResource { content }))
    }
}
