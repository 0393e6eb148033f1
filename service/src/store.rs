//! Entity and relation store
//!
//! Entities and relations live in arenas owned by the store; the name and id
//! indexes only hold handles into them. Names, synonyms and relation names are
//! indexed by their normalized lower-cased form.
//!
//! Two distinct entities claiming the same name or id is reported as a
//! [`IndexCollision`]; the later entity takes over the index entry.

use indexmap::IndexMap;
use ontosheets_core::utils::normalize_name;
use ontosheets_core::{EntityKey, OntologyEntity, OntologyRelation, RelationKey};
use tracing::warn;

/// Which index a collision happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Lower-cased names and synonyms
    Name,
    /// Identifiers
    Id,
}

/// A name or id claimed by two distinct entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCollision {
    /// Index the collision happened in
    pub index: IndexKind,
    /// Contested key
    pub key: String,
    /// Entity that held the key
    pub previous: EntityKey,
    /// Entity that holds it now
    pub replacement: EntityKey,
}

/// Owner of all entities and relations read so far
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: Vec<OntologyEntity>,
    names: IndexMap<String, EntityKey>,
    ids: IndexMap<String, EntityKey>,
    relations: Vec<OntologyRelation>,
    relation_names: IndexMap<String, RelationKey>,
    relation_ids: IndexMap<String, RelationKey>,
    collisions: Vec<IndexCollision>,
}

impl EntityStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an entity and index its id, name and synonyms
    pub fn insert_entity(&mut self, entity: OntologyEntity) -> EntityKey {
        let key = EntityKey(self.entities.len());

        if let Some(id) = entity.id.as_deref() {
            self.index(IndexKind::Id, id.trim().to_string(), key);
        }
        if let Some(name) = entity.name.as_deref() {
            self.index(IndexKind::Name, normalize_name(name), key);
        }
        for synonym in &entity.synonyms {
            let synonym = normalize_name(synonym);
            if !synonym.is_empty() {
                self.index(IndexKind::Name, synonym, key);
            }
        }

        self.entities.push(entity);
        key
    }

    fn index(&mut self, kind: IndexKind, index_key: String, key: EntityKey) {
        let index = match kind {
            IndexKind::Name => &mut self.names,
            IndexKind::Id => &mut self.ids,
        };

        if let Some(previous) = index.insert(index_key.clone(), key)
            && previous != key
        {
            warn!(
                "{kind:?} '{index_key}' of entity #{} was already claimed by entity #{}",
                key.0, previous.0
            );
            self.collisions.push(IndexCollision {
                index: kind,
                key: index_key,
                previous,
                replacement: key,
            });
        }
    }

    /// Entity behind a handle
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this store.
    #[must_use]
    pub fn entity(&self, key: EntityKey) -> &OntologyEntity {
        &self.entities[key.0]
    }

    /// Mutable entity behind a handle
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this store.
    pub fn entity_mut(&mut self, key: EntityKey) -> &mut OntologyEntity {
        &mut self.entities[key.0]
    }

    /// Entities in insertion order
    pub fn entities(&self) -> impl Iterator<Item = (EntityKey, &OntologyEntity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, entity)| (EntityKey(i), entity))
    }

    /// Number of entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity was stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity known under a name or synonym, case-insensitively
    #[must_use]
    pub fn lookup_name(&self, name: &str) -> Option<EntityKey> {
        self.names.get(&normalize_name(name)).copied()
    }

    /// Entity with an identifier
    #[must_use]
    pub fn lookup_id(&self, id: &str) -> Option<EntityKey> {
        self.ids.get(id.trim()).copied()
    }

    /// Every indexed name with its entity, in indexing order
    pub fn names(&self) -> impl Iterator<Item = (&str, EntityKey)> {
        self.names.iter().map(|(name, key)| (name.as_str(), *key))
    }

    /// Collisions recorded so far
    #[must_use]
    pub fn collisions(&self) -> &[IndexCollision] {
        &self.collisions
    }

    /// Register a relation; a relation with the same name is replaced in place
    pub fn insert_relation(&mut self, relation: OntologyRelation) -> RelationKey {
        let name_key = normalize_name(&relation.name);
        let key = match self.relation_names.get(&name_key) {
            Some(&existing) => {
                self.relations[existing.0] = relation;
                existing
            }
            None => {
                let key = RelationKey(self.relations.len());
                self.relations.push(relation);
                self.relation_names.insert(name_key, key);
                key
            }
        };

        let id = self.relations[key.0].id.trim().to_string();
        if !id.is_empty() {
            self.relation_ids.insert(id, key);
        }
        key
    }

    /// Relation behind a handle
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this store.
    #[must_use]
    pub fn relation(&self, key: RelationKey) -> &OntologyRelation {
        &self.relations[key.0]
    }

    /// Relations in registration order
    pub fn relations(&self) -> impl Iterator<Item = (RelationKey, &OntologyRelation)> {
        self.relations
            .iter()
            .enumerate()
            .map(|(i, relation)| (RelationKey(i), relation))
    }

    /// Relation known under a name, case-insensitively
    #[must_use]
    pub fn lookup_relation(&self, name: &str) -> Option<RelationKey> {
        self.relation_names.get(&normalize_name(name)).copied()
    }

    /// Relation with an identifier
    #[must_use]
    pub fn lookup_relation_id(&self, id: &str) -> Option<RelationKey> {
        self.relation_ids.get(id.trim()).copied()
    }
}
