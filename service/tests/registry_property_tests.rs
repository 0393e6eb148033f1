// Property-based tests for header resolution
//
// Relation headers are learned from arbitrary names and ids, and resolving
// one registry's headers never changes the built-in table of another.

use ontosheets_core::utils::quote_if_needed;
use ontosheets_core::{ColumnMapping, ColumnRole};
use ontosheets_service::registry::ColumnMappingRegistry;
use proptest::prelude::*;

// Strategy: relation names as curators write them
fn relation_name() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z ]{0,20}[a-z]").unwrap()
}

// Strategy: CURIE-like ids
fn relation_id() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z]{2,6}:[0-9]{7}").unwrap()
}

// Strategy: headers that are neither built in nor relation headers
fn unknown_header() -> impl Strategy<Value = String> {
    prop::string::string_regex("X-[A-Za-z0-9 ]{1,20}").unwrap()
}

proptest! {
    #[test]
    fn rel_header_with_id_uses_id(name in relation_name(), id in relation_id()) {
        let header = format!("REL '{name}' [{id}]");
        let mut registry = ColumnMappingRegistry::with_defaults();

        let mapping = registry.resolve(&header).unwrap();
        let expected = ColumnRole::Relation { property: id.clone(), name: Some(name.clone()) };
        prop_assert_eq!(&mapping.role, &expected);
        prop_assert_eq!(mapping.template_code(), format!("SC {id} some % SPLIT=;"));
        prop_assert!(registry.mapping(&header).is_some());
    }

    #[test]
    fn rel_header_without_id_uses_quoted_name(name in relation_name()) {
        let header = format!("REL '{name}'");
        let mut registry = ColumnMappingRegistry::with_defaults();

        let mapping = registry.resolve(&header).unwrap();
        let property = quote_if_needed(&name);
        prop_assert_eq!(mapping.role_id(), Some(property.as_str()));
    }

    #[test]
    fn learning_never_touches_default_table(
        names in prop::collection::vec(relation_name(), 1..5),
        unknown in prop::collection::vec(unknown_header(), 0..5),
    ) {
        let mut learner = ColumnMappingRegistry::with_defaults();
        let headers: Vec<Option<String>> = names
            .iter()
            .map(|name| format!("REL '{name}'"))
            .chain(unknown.iter().cloned())
            .map(Some)
            .collect();
        let resolved = learner.resolve_headers(&headers, "generated").unwrap();
        prop_assert!(resolved.columns.len() <= names.len());

        let fresh = ColumnMappingRegistry::with_defaults();
        prop_assert_eq!(fresh.learned_mappings().count(), 0);
        for name in &names {
            let header = format!("REL '{name}'");
            prop_assert!(fresh.mapping(&header).is_none());
        }
        for header in &unknown {
            prop_assert!(!fresh.is_ignored(header));
            prop_assert!(learner.is_ignored(header));
        }
    }

    #[test]
    fn unmapped_headers_warned_once(header in unknown_header()) {
        let mut registry = ColumnMappingRegistry::with_defaults();
        let row = vec![Some(header.clone()), Some("Name".to_string())];

        let first = registry.resolve_headers(&row, "first").unwrap();
        let second = registry.resolve_headers(&row, "second").unwrap();
        prop_assert_eq!(first.newly_ignored, vec![header]);
        prop_assert!(second.newly_ignored.is_empty());
        prop_assert_eq!(second.columns.len(), 1);
    }

    #[test]
    fn transformed_values_are_ascii(value in "\\PC{0,40}") {
        let mapping = ColumnMapping::label("Name");
        prop_assert!(mapping.transform_value(Some(&value)).is_ascii());
    }
}
