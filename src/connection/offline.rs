use crate::interface::{Database, DirectConnection};

/// A database handle with no live connection behind it.
///
/// Good enough for validation-only runs; any attempt to execute a task
/// against it fails with a configuration-type error.
#[derive(Debug, Clone)]
pub struct OfflineDatabase {
    product_name: String,
}

impl OfflineDatabase {
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
        }
    }
}

impl Default for OfflineDatabase {
    fn default() -> Self {
        Self::new("offline")
    }
}

impl Database for OfflineDatabase {
    fn product_name(&self) -> &str {
        &self.product_name
    }

    fn direct_connection(&self) -> Option<&dyn DirectConnection> {
        None
    }
}
