//! Process-wide store of compiled formats.
//!
//! Formats are keyed by name (usually their configuration key). A format is
//! parsed the first time it is needed and replaced wholesale when its source
//! changes: the new tree is built outside the lock, then swapped in. Readers
//! get an `Arc` and render without holding the lock.
//!
//! ```rust
//! use expando::{ExpandoCache, FieldDef, ValueType};
//!
//! const DEFS: &[FieldDef] = &[FieldDef::new("n", "name", 0, 0, ValueType::String)];
//!
//! let cache = ExpandoCache::new();
//! let exp = cache.get_or_parse("row", "%n", DEFS).unwrap();
//! assert_eq!(exp.source(), "%n");
//!
//! // A bad update keeps the previous format.
//! assert!(cache.update("row", "%<n?", DEFS).is_err());
//! assert_eq!(cache.get("row").unwrap().source(), "%n");
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;
use tracing::{trace, warn};

use crate::config::FormatConfig;
use crate::error::{ParseError, Result};
use crate::registry::FieldDef;
use crate::template::Expando;

static GLOBAL: Lazy<ExpandoCache> = Lazy::new(ExpandoCache::new);

/// Returns the process-wide cache.
pub fn global() -> &'static ExpandoCache {
    &GLOBAL
}

/// Name-keyed compiled formats behind a reader/writer lock.
#[derive(Debug, Default)]
pub struct ExpandoCache {
    entries: RwLock<HashMap<String, Arc<Expando>>>,
}

impl ExpandoCache {
    pub fn new() -> Self {
        Self::default()
    }

    // Writers only insert or remove whole entries, so a poisoned map is consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<Expando>>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<Expando>>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, name: &str) -> Option<Arc<Expando>> {
        self.read().get(name).cloned()
    }

    /// Returns the cached format for `name` if it was built from `source`,
    /// otherwise parses `source` and caches it.
    pub fn get_or_parse(
        &self,
        name: &str,
        source: &str,
        defs: &[FieldDef],
    ) -> std::result::Result<Arc<Expando>, ParseError> {
        if let Some(exp) = self.get(name) {
            if exp.source() == source {
                trace!(key = name, "format cache hit");
                return Ok(exp);
            }
        }

        trace!(key = name, "building format");
        let exp = Arc::new(Expando::parse(source, defs)?);
        self.write().insert(name.to_string(), Arc::clone(&exp));
        Ok(exp)
    }

    /// Replaces the format for `name` with a fresh parse of `source`.
    ///
    /// On a parse error the previous format, if any, stays in place.
    pub fn update(
        &self,
        name: &str,
        source: &str,
        defs: &[FieldDef],
    ) -> std::result::Result<Arc<Expando>, ParseError> {
        match Expando::parse(source, defs) {
            Ok(exp) => {
                let exp = Arc::new(exp);
                self.write().insert(name.to_string(), Arc::clone(&exp));
                trace!(key = name, "format replaced");
                Ok(exp)
            }
            Err(err) => {
                warn!(
                    key = name,
                    position = err.position,
                    error = %err.message,
                    "invalid format, keeping previous"
                );
                Err(err)
            }
        }
    }

    /// Compiles the configured format for `key` into the cache under `key`.
    pub fn load(&self, config: &FormatConfig, key: &str, defs: &[FieldDef]) -> Result<Arc<Expando>> {
        let source = config.get(key)?;
        Ok(self.update(key, source, defs)?)
    }

    pub fn remove(&self, name: &str) -> Option<Arc<Expando>> {
        self.write().remove(name)
    }

    /// Drops every cached format.
    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
