//! In-memory domain store, optionally seeded with the built-in presets.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use stencil_core::{
    application::{ApplicationError, ports::DomainStore},
    domain::DomainConfiguration,
    error::StencilResult,
};

use crate::presets;

/// Thread-safe in-memory store keyed by configuration name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDomainStore {
    inner: Arc<RwLock<BTreeMap<String, DomainConfiguration>>>,
}

impl InMemoryDomainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding every built-in preset.
    pub fn with_presets() -> Self {
        let store = Self::new();
        if let Ok(mut inner) = store.inner.write() {
            for preset in presets::all() {
                inner.insert(preset.name.clone(), preset);
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DomainStore for InMemoryDomainStore {
    fn list(&self) -> StencilResult<Vec<DomainConfiguration>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner.values().cloned().collect())
    }

    fn get(&self, name: &str) -> StencilResult<DomainConfiguration> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        let found = inner.get(name).or_else(|| {
            inner
                .values()
                .find(|config| presets::same_name(&config.name, name))
        });
        found.cloned().ok_or_else(|| {
            ApplicationError::DomainNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn insert(&self, config: DomainConfiguration) -> StencilResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.insert(config.name.clone(), config);
        Ok(())
    }

    fn remove(&self, name: &str) -> StencilResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner
            .remove(name)
            .map(drop)
            .ok_or_else(|| {
                ApplicationError::DomainNotFound {
                    name: name.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stencil_core::error::StencilError;

    #[test]
    fn presets_are_listed_by_name() {
        let store = InMemoryDomainStore::with_presets();
        let names: Vec<String> = store.list().unwrap().into_iter().map(|c| c.name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(store.len(), presets::all().len());
    }

    #[test]
    fn lookup_ignores_case_and_separators() {
        let store = InMemoryDomainStore::with_presets();
        assert_eq!(store.get("shop").unwrap().name, "Shop");
        assert_eq!(store.get("project_tracker").unwrap().name, "ProjectTracker");
    }

    #[test]
    fn insert_replaces_and_remove_deletes() {
        let store = InMemoryDomainStore::new();
        assert!(store.is_empty());

        store.insert(DomainConfiguration::new("Zoo")).unwrap();
        store
            .insert(DomainConfiguration::new("Zoo").with_title("City Zoo"))
            .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Zoo").unwrap().title.as_deref(), Some("City Zoo"));

        store.remove("Zoo").unwrap();
        assert!(matches!(
            store.remove("Zoo"),
            Err(StencilError::Application(ApplicationError::DomainNotFound { .. }))
        ));
    }
}
