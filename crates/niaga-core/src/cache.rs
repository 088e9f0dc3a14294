//! In-memory identity cache.

use std::sync::RwLock;

use crate::traits::IdentityCache;
use crate::types::Identity;
use crate::Result;

/// An in-memory [`IdentityCache`] for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryCache {
    slot: RwLock<Option<Identity>>,
}

impl MemoryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityCache for MemoryCache {
    fn load(&self) -> Result<Option<Identity>> {
        Ok(self.slot.read().unwrap().clone())
    }

    fn store(&self, identity: &Identity) -> Result<()> {
        *self.slot.write().unwrap() = Some(identity.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.write().unwrap() = None;
        Ok(())
    }
}
