//! Cross-linking relation facts onto entities
//!
//! Facts name their source, relation and target by label. Relation labels may
//! carry a trailing `(...)` qualifier, which is dropped before the lookup.
//! Every fact of a pass is resolved before any entity is touched, so a pass
//! that fails leaves the store as it was.

use crate::store::EntityStore;
use ontosheets_core::error::{OntoError, Result};
use ontosheets_core::utils::{normalize_name, strip_trailing_qualifier};
use ontosheets_core::{EntityKey, RelationFact};
use tracing::{debug, warn};

/// What to do with a fact naming an unknown entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingEntityPolicy {
    /// Abort the pass with `OntoError::EntityNotFound`
    #[default]
    Fail,
    /// Warn and skip the fact
    Skip,
}

/// Outcome of a cross-linking pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossLinkReport {
    /// Facts attached to an entity
    pub attached: usize,
    /// Relation labels that matched no known relation
    pub unknown_relations: Vec<String>,
    /// Entity names skipped under [`MissingEntityPolicy::Skip`]
    pub missing_entities: Vec<String>,
}

/// Attaches relation facts to the entities of a store
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationCrossLinker {
    policy: MissingEntityPolicy,
}

impl RelationCrossLinker {
    /// Linker that fails on unknown entities
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Linker with an explicit policy for unknown entities
    #[must_use]
    pub fn with_policy(policy: MissingEntityPolicy) -> Self {
        Self { policy }
    }

    /// Attach facts in order; duplicates are kept
    ///
    /// # Errors
    ///
    /// Returns `OntoError::EntityNotFound` under [`MissingEntityPolicy::Fail`]
    /// when a source or target name is unknown. Nothing is attached then.
    pub fn attach(
        &self,
        store: &mut EntityStore,
        facts: &[RelationFact],
    ) -> Result<CrossLinkReport> {
        let mut report = CrossLinkReport::default();
        let mut links: Vec<(EntityKey, String, EntityKey)> = Vec::with_capacity(facts.len());

        for fact in facts {
            let label = strip_trailing_qualifier(&fact.relation);
            let Some(relation) = store.lookup_relation(label) else {
                warn!("Relation '{label}' not found, skipping fact {fact:?}");
                report.unknown_relations.push(label.to_string());
                continue;
            };

            let source = self.lookup_entity(store, &fact.source, fact, &mut report)?;
            let target = self.lookup_entity(store, &fact.target, fact, &mut report)?;
            if let (Some(source), Some(target)) = (source, target) {
                links.push((source, store.relation(relation).name.clone(), target));
            }
        }

        for (source, relation, target) in links {
            store
                .entity_mut(source)
                .add_relation_target(&relation, target);
            report.attached += 1;
        }

        debug!(
            "Attached {} relation facts ({} unknown relations, {} missing entities)",
            report.attached,
            report.unknown_relations.len(),
            report.missing_entities.len()
        );
        Ok(report)
    }

    /// Whether a fact names a known relation but an unknown entity
    #[must_use]
    pub fn is_unresolved(store: &EntityStore, fact: &RelationFact) -> bool {
        store
            .lookup_relation(strip_trailing_qualifier(&fact.relation))
            .is_some()
            && (resolve_entity(store, &fact.source).is_none()
                || resolve_entity(store, &fact.target).is_none())
    }

    fn lookup_entity(
        &self,
        store: &EntityStore,
        name: &str,
        fact: &RelationFact,
        report: &mut CrossLinkReport,
    ) -> Result<Option<EntityKey>> {
        if let Some(key) = resolve_entity(store, name) {
            return Ok(Some(key));
        }

        let name = normalize_name(name);
        match self.policy {
            MissingEntityPolicy::Fail => Err(OntoError::entity_not_found_in(
                name,
                format!("{} --{}--> {}", fact.source, fact.relation, fact.target),
            )),
            MissingEntityPolicy::Skip => {
                warn!("Entity '{name}' not found, skipping fact {fact:?}");
                report.missing_entities.push(name);
                Ok(None)
            }
        }
    }
}

fn resolve_entity(store: &EntityStore, reference: &str) -> Option<EntityKey> {
    store
        .lookup_name(reference)
        .or_else(|| store.lookup_id(reference))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontosheets_core::{OntologyEntity, OntologyRelation};
    use pretty_assertions::assert_eq;

    fn store() -> (EntityStore, EntityKey, EntityKey) {
        let mut store = EntityStore::new();
        let wheel = store.insert_entity(OntologyEntity {
            name: Some("Wheel".to_string()),
            ..OntologyEntity::default()
        });
        let car = store.insert_entity(OntologyEntity {
            name: Some("Motor car".to_string()),
            ..OntologyEntity::default()
        });
        store.insert_relation(OntologyRelation::new("BFO:0000050", "part of"));
        (store, wheel, car)
    }

    #[test]
    fn test_facts_attached_in_order() {
        let (mut store, wheel, car) = store();
        let facts = vec![
            RelationFact::new("wheel", "Part of (BFO)", "Motor\ncar"),
            RelationFact::new(" WHEEL ", "part of", "motor car"),
        ];

        let report = RelationCrossLinker::new().attach(&mut store, &facts).unwrap();
        assert_eq!(report.attached, 2);
        assert_eq!(store.entity(wheel).relation_targets("part of"), &[car, car]);
        assert!(store.entity(car).relations.is_none());
    }

    #[test]
    fn test_unknown_relation_skipped() {
        let (mut store, wheel, car) = store();
        let facts = vec![
            RelationFact::new("Wheel", "has colour", "Motor car"),
            RelationFact::new("Wheel", "part of", "Motor car"),
        ];

        let report = RelationCrossLinker::new().attach(&mut store, &facts).unwrap();
        assert_eq!(report.unknown_relations, vec!["has colour".to_string()]);
        assert_eq!(store.entity(wheel).relation_targets("part of"), &[car]);
    }

    #[test]
    fn test_unknown_entity_fails_without_partial_state() {
        let (mut store, wheel, _) = store();
        let facts = vec![
            RelationFact::new("Wheel", "part of", "Motor car"),
            RelationFact::new("Wheel", "part of", "Bicycle"),
        ];

        let err = RelationCrossLinker::new()
            .attach(&mut store, &facts)
            .unwrap_err();
        match err {
            OntoError::EntityNotFound { name, context } => {
                assert_eq!(name, "bicycle");
                assert!(context.unwrap().contains("part of"));
            }
            other => panic!("Wrong error type: {other:?}"),
        }
        assert!(store.entity(wheel).relations.is_none());
    }

    #[test]
    fn test_skip_policy_reports_missing() {
        let (mut store, wheel, car) = store();
        let facts = vec![
            RelationFact::new("Wheel", "part of", "Bicycle"),
            RelationFact::new("Wheel", "part of", "Motor car"),
        ];

        let report = RelationCrossLinker::with_policy(MissingEntityPolicy::Skip)
            .attach(&mut store, &facts)
            .unwrap();
        assert_eq!(report.attached, 1);
        assert_eq!(report.missing_entities, vec!["bicycle".to_string()]);
        assert_eq!(store.entity(wheel).relation_targets("part of"), &[car]);
    }

    #[test]
    fn test_target_resolved_by_id() {
        let (mut store, wheel, _) = store();
        let retired = store.insert_entity(OntologyEntity {
            id: Some("X:009".to_string()),
            name: Some("Horse cart".to_string()),
            curation_status: Some("Obsolete".to_string()),
            ..OntologyEntity::default()
        });
        let fact = RelationFact::new("Wheel", "part of", " X:009");
        assert!(!RelationCrossLinker::is_unresolved(&store, &fact));

        let report = RelationCrossLinker::new().attach(&mut store, &[fact]).unwrap();
        assert_eq!(report.attached, 1);
        assert_eq!(store.entity(wheel).relation_targets("part of"), &[retired]);
    }

    #[test]
    fn test_unresolved_needs_known_relation() {
        let (store, _, _) = store();
        assert!(RelationCrossLinker::is_unresolved(
            &store,
            &RelationFact::new("Wheel", "part of", "Bicycle")
        ));
        assert!(!RelationCrossLinker::is_unresolved(
            &store,
            &RelationFact::new("Wheel", "has colour", "Bicycle")
        ));
        assert!(!RelationCrossLinker::is_unresolved(
            &store,
            &RelationFact::new("Wheel", "part of", "Motor car")
        ));
    }
}
