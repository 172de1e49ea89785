//! Per-identifier container records.
//!
//! The registry is the single source of truth for which containers exist and
//! how far their load has progressed. A record is created on first use, never
//! duplicated, and never removed for the lifetime of the page.

use std::collections::HashMap;

use crate::document::{Document, NodeId};
use crate::identifier::ModalId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
    Error,
}

impl LoadState {
    /// Loaded and Error are final: the content is never fetched again.
    pub fn is_resolved(self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    identifier: ModalId,
    state: LoadState,
    node: NodeId,
}

impl ContainerRecord {
    pub fn identifier(&self) -> &ModalId {
        &self.identifier
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Unloaded -> Loading. Refused while a load is in flight or resolved.
    pub fn mark_loading(&mut self) -> bool {
        if self.state != LoadState::Unloaded {
            return false;
        }
        self.state = LoadState::Loading;
        true
    }

    pub fn mark_loaded(&mut self) -> bool {
        self.resolve(LoadState::Loaded)
    }

    pub fn mark_error(&mut self) -> bool {
        self.resolve(LoadState::Error)
    }

    fn resolve(&mut self, next: LoadState) -> bool {
        if self.state.is_resolved() {
            return false;
        }
        self.state = next;
        true
    }
}

#[derive(Debug, Default)]
pub struct ContainerRegistry {
    records: HashMap<ModalId, ContainerRecord>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record for `id`, mounting its container node on first use.
    /// An existing record is returned untouched. The flag reports whether a
    /// new container was created.
    pub fn ensure_container<D: Document>(
        &mut self,
        document: &mut D,
        id: &ModalId,
        class: &str,
    ) -> (&mut ContainerRecord, bool) {
        let mut created = false;
        let record = self.records.entry(id.clone()).or_insert_with(|| {
            created = true;
            ContainerRecord {
                identifier: id.clone(),
                state: LoadState::Unloaded,
                node: document.mount_container(id, class),
            }
        });
        (record, created)
    }

    pub fn get(&self, id: &ModalId) -> Option<&ContainerRecord> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: &ModalId) -> Option<&mut ContainerRecord> {
        self.records.get_mut(id)
    }

    pub fn state(&self, id: &ModalId) -> Option<LoadState> {
        self.records.get(id).map(ContainerRecord::state)
    }

    pub fn mark_loading(&mut self, id: &ModalId) -> bool {
        self.records.get_mut(id).is_some_and(ContainerRecord::mark_loading)
    }

    pub fn mark_loaded(&mut self, id: &ModalId) -> bool {
        self.records.get_mut(id).is_some_and(ContainerRecord::mark_loaded)
    }

    pub fn mark_error(&mut self, id: &ModalId) -> bool {
        self.records.get_mut(id).is_some_and(ContainerRecord::mark_error)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
