/// Filter capabilities and the registry that holds them
///
/// A filter is an opaque image-to-image transform. The registry keeps
/// them in registration order and can be shared between the host and
/// any number of pickers; every reader works from a snapshot.

pub mod builtin;

use image::DynamicImage;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::FilterError;

pub use builtin::{register_default_filters, ColorMatrixFilter, ToneCurveFilter};

/// Identifier a filter is registered under
pub type FilterId = String;

/// The contract every registered filter satisfies
pub trait Filter: Send + Sync {
    /// Unique identifier, used as the registry key
    fn id(&self) -> &str;

    /// Label shown under the thumbnail
    fn name(&self) -> &str {
        self.id()
    }

    /// Produce a filtered copy of `image`
    fn process(&self, image: &DynamicImage) -> Result<DynamicImage, FilterError>;
}

impl std::fmt::Debug for dyn Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter").field("id", &self.id()).finish()
    }
}

/// Shared, ordered collection of filters
///
/// Cloning the registry clones the handle, not the contents.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    filters: RwLock<Vec<Arc<dyn Filter>>>,
    /// Bumped on every mutation so views can tell when to re-render
    revision: AtomicU64,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter at the end of the list
    ///
    /// Registering an id that already exists replaces that filter in place,
    /// keeping its position.
    pub fn register(&self, filter: Arc<dyn Filter>) {
        let mut filters = self.write();
        if let Some(slot) = filters.iter_mut().find(|f| f.id() == filter.id()) {
            log::debug!("🔁 Replacing filter '{}'", filter.id());
            *slot = filter;
        } else {
            log::debug!("➕ Registered filter '{}'", filter.id());
            filters.push(filter);
        }
        drop(filters);
        self.bump();
    }

    pub fn register_all<I>(&self, filters: I)
    where
        I: IntoIterator<Item = Arc<dyn Filter>>,
    {
        for filter in filters {
            self.register(filter);
        }
    }

    /// Remove a filter by id, returning it if it was registered
    pub fn remove(&self, id: &str) -> Option<Arc<dyn Filter>> {
        let mut filters = self.write();
        let index = filters.iter().position(|f| f.id() == id)?;
        let removed = filters.remove(index);
        drop(filters);
        self.bump();
        Some(removed)
    }

    pub fn remove_all(&self) {
        self.write().clear();
        self.bump();
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Filter>> {
        self.read().iter().find(|f| f.id() == id).cloned()
    }

    /// Copy of the current filter list, in registration order
    pub fn snapshot(&self) -> Vec<Arc<dyn Filter>> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Monotonic counter that changes whenever the contents change
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Acquire)
    }

    fn bump(&self) {
        self.inner.revision.fetch_add(1, Ordering::AcqRel);
    }

    // A panic while holding the lock cannot leave the Vec half-updated,
    // so a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<dyn Filter>>> {
        self.inner
            .filters
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<dyn Filter>>> {
        self.inner
            .filters
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<String> = self.read().iter().map(|f| f.id().to_string()).collect();
        f.debug_struct("FilterRegistry")
            .field("filters", &ids)
            .field("revision", &self.revision())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn ids(registry: &FilterRegistry) -> Vec<String> {
        registry
            .snapshot()
            .iter()
            .map(|f| f.id().to_string())
            .collect()
    }

    #[test]
    fn test_registration_order_is_kept() {
        let registry = FilterRegistry::new();
        registry.register(Arc::new(InvertFilter("b")));
        registry.register(Arc::new(InvertFilter("a")));
        registry.register(Arc::new(InvertFilter("c")));

        assert_eq!(ids(&registry), vec!["b", "a", "c"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_same_id_replaces_in_place() {
        let registry = FilterRegistry::new();
        registry.register(Arc::new(InvertFilter("a")));
        registry.register(Arc::new(InvertFilter("b")));
        registry.register(Arc::new(BrokenFilter("a")));

        assert_eq!(ids(&registry), vec!["a", "b"]);
        let replaced = registry.get("a").unwrap();
        assert!(replaced.process(&solid(2, 2, [0, 0, 0, 255])).is_err());
    }

    #[test]
    fn test_remove_and_remove_all() {
        let registry = FilterRegistry::new();
        registry.register_all([
            Arc::new(InvertFilter("a")) as Arc<dyn Filter>,
            Arc::new(InvertFilter("b")) as Arc<dyn Filter>,
        ]);

        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert_eq!(ids(&registry), vec!["b"]);

        registry.remove_all();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_revision_tracks_mutation() {
        let registry = FilterRegistry::new();
        let start = registry.revision();

        registry.register(Arc::new(InvertFilter("a")));
        let after_register = registry.revision();
        assert!(after_register > start);

        // Failed removal changes nothing
        registry.remove("missing");
        assert_eq!(registry.revision(), after_register);

        registry.remove_all();
        assert!(registry.revision() > after_register);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let registry = FilterRegistry::new();
        registry.register(Arc::new(InvertFilter("a")));

        let snapshot = registry.snapshot();
        registry.remove_all();

        assert_eq!(snapshot.len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clones_share_contents() {
        let registry = FilterRegistry::new();
        let handle = registry.clone();
        handle.register(Arc::new(InvertFilter("shared")));

        assert!(registry.get("shared").is_some());
    }
}
