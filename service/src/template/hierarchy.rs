//! Parent/child hierarchy reconstruction
//!
//! Parent references are resolved through the store's name index. A parent
//! that resolves is a managed node keyed by its entity handle; a parent that
//! does not is an imported class keyed by its lower-cased text, and every
//! entity hanging off it is a top-level root of the managed hierarchy.
//!
//! The order holds one entry per entity name. When a name was defined more
//! than once, only its latest definition takes part.

use crate::store::EntityStore;
use indexmap::{IndexMap, IndexSet};
use ontosheets_core::EntityKey;
use ontosheets_core::utils::normalize_name;
use tracing::debug;

/// A parent reference after resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// Parent authored in the spreadsheets
    Managed(EntityKey),
    /// Parent from an external ontology, lower-cased
    Imported(String),
}

/// Resolve the parent reference of an entity
#[must_use]
pub fn resolve_parent(store: &EntityStore, key: EntityKey) -> Option<ParentRef> {
    let parent = store.entity(key).parent.as_deref()?;
    Some(match store.lookup_name(parent) {
        Some(parent_key) => ParentRef::Managed(parent_key),
        None => ParentRef::Imported(normalize_name(parent)),
    })
}

/// Depth-first export order of a store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HierarchyOrder {
    /// Every entity name exactly once
    pub order: Vec<EntityKey>,
    /// Entities whose parent is missing or imported
    pub top_level: Vec<EntityKey>,
    /// Lower-cased imported parent names in discovery order
    pub imported: IndexSet<String>,
    /// Children per parent in store order
    pub children: IndexMap<ParentRef, Vec<EntityKey>>,
}

/// Builds [`HierarchyOrder`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchyResolver;

impl HierarchyResolver {
    /// Order every entity of the store depth first
    ///
    /// Traversal is seeded from the top-level roots, then from every parent
    /// in the children index; children are visited in store order and the
    /// first visit of an entity fixes its position. Entities the traversal
    /// never reaches are appended in store order. Earlier definitions of a
    /// redefined name are left out.
    #[must_use]
    pub fn build_order(store: &EntityStore) -> HierarchyOrder {
        let mut hierarchy = HierarchyOrder::default();
        let latest = latest_definitions(store);
        let current = |key: EntityKey| {
            store
                .entity(key)
                .name
                .as_deref()
                .and_then(|name| latest.get(&normalize_name(name)).copied())
                .unwrap_or(key)
        };
        let live: Vec<EntityKey> = store
            .entities()
            .map(|(key, _)| key)
            .filter(|key| current(*key) == *key)
            .collect();

        for &key in &live {
            match resolve_parent(store, key) {
                Some(ParentRef::Managed(parent)) => {
                    hierarchy
                        .children
                        .entry(ParentRef::Managed(current(parent)))
                        .or_default()
                        .push(key);
                }
                Some(ParentRef::Imported(parent)) => {
                    hierarchy.top_level.push(key);
                    hierarchy.imported.insert(parent.clone());
                    hierarchy
                        .children
                        .entry(ParentRef::Imported(parent))
                        .or_default()
                        .push(key);
                }
                None => hierarchy.top_level.push(key),
            }
        }
        debug!("Classes identified as imported: {:?}", hierarchy.imported);

        let mut visited: IndexSet<EntityKey> = IndexSet::with_capacity(live.len());
        for &root in &hierarchy.top_level {
            Self::visit(&hierarchy.children, root, &mut visited);
        }
        for parent in hierarchy.children.keys() {
            if let ParentRef::Managed(key) = parent {
                Self::visit(&hierarchy.children, *key, &mut visited);
            }
        }
        visited.extend(live);

        hierarchy.order = visited.into_iter().collect();
        hierarchy
    }

    fn visit(
        children: &IndexMap<ParentRef, Vec<EntityKey>>,
        start: EntityKey,
        visited: &mut IndexSet<EntityKey>,
    ) {
        let mut stack = vec![start];
        while let Some(key) = stack.pop() {
            if !visited.insert(key) {
                continue;
            }
            if let Some(kids) = children.get(&ParentRef::Managed(key)) {
                stack.extend(kids.iter().rev().filter(|kid| !visited.contains(*kid)));
            }
        }
    }
}

/// The last entity defined under each normalized name
fn latest_definitions(store: &EntityStore) -> IndexMap<String, EntityKey> {
    let mut latest = IndexMap::with_capacity(store.len());
    for (key, entity) in store.entities() {
        if let Some(name) = entity.name.as_deref() {
            latest.insert(normalize_name(name), key);
        }
    }
    latest
}
