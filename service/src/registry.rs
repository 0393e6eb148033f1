//! Header to column mapping resolution
//!
//! The registry is seeded with the built-in header table and learns
//! `REL '<name>' [<id>]` relation headers as it sees them. Headers it cannot
//! map are warned about once and then ignored for the lifetime of the
//! registry, so one registry shared by several sheets accumulates what it
//! learned from each of them.

use indexmap::{IndexMap, IndexSet};
use ontosheets_core::error::{OntoError, Result};
use ontosheets_core::mapping::{DEFAULT_IGNORED_HEADERS, default_header_mappings};
use ontosheets_core::utils::{bracketed_id, quote_if_needed, quoted_tokens};
use ontosheets_core::{ColumnMapping, ColumnRole, TemplateConfig};
use tracing::{debug, warn};

/// A sheet column bound to a mapping
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedColumn {
    /// Zero-based column position in the sheet
    pub position: usize,
    /// Header text as it appears in the sheet
    pub header: String,
    /// Mapping the header resolved to
    pub mapping: ColumnMapping,
}

/// Outcome of resolving one header row
#[derive(Debug, Clone, Default)]
pub struct ResolvedHeaders {
    /// Mapped columns in sheet order
    pub columns: Vec<ResolvedColumn>,
    /// Headers ignored for the first time by this call
    pub newly_ignored: Vec<String>,
}

/// Registry of header mappings and ignored headers
#[derive(Debug, Clone)]
pub struct ColumnMappingRegistry {
    header_mappings: IndexMap<String, ColumnMapping>,
    learned: IndexSet<String>,
    ignored_headers: IndexSet<String>,
    strict: bool,
}

impl ColumnMappingRegistry {
    /// Registry with the built-in header table and ignore list
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            header_mappings: default_header_mappings()
                .into_iter()
                .map(|(header, mapping)| (header.to_string(), mapping))
                .collect(),
            learned: IndexSet::new(),
            ignored_headers: DEFAULT_IGNORED_HEADERS
                .iter()
                .map(ToString::to_string)
                .collect(),
            strict: false,
        }
    }

    /// Registry seeded from the defaults plus the configured additions
    #[must_use]
    pub fn from_config(config: &TemplateConfig) -> Self {
        let mut registry = Self::with_defaults();
        registry.strict = config.strict_headers;
        registry
            .ignored_headers
            .extend(config.ignored_headers.iter().cloned());

        for (header, mapping) in &config.header_mappings {
            let column = mapping.column.clone().unwrap_or_else(|| header.clone());
            registry
                .header_mappings
                .insert(header.clone(), ColumnMapping::new(column, mapping.role.clone()));
        }

        registry
    }

    /// Fail on unmapped headers instead of ignoring them
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Add or replace a mapping
    pub fn insert(&mut self, header: impl Into<String>, mapping: ColumnMapping) {
        self.header_mappings.insert(header.into(), mapping);
    }

    /// Mapping already known for a header, without learning anything
    #[must_use]
    pub fn mapping(&self, header: &str) -> Option<&ColumnMapping> {
        self.header_mappings.get(header)
    }

    /// Whether a header is skipped silently
    #[must_use]
    pub fn is_ignored(&self, header: &str) -> bool {
        self.ignored_headers.contains(header)
    }

    /// Headers currently ignored, in the order they were added
    pub fn ignored_headers(&self) -> impl Iterator<Item = &str> {
        self.ignored_headers.iter().map(String::as_str)
    }

    /// Relation mappings learned from `REL` headers
    pub fn learned_mappings(&self) -> impl Iterator<Item = (&str, &ColumnMapping)> {
        self.learned.iter().filter_map(|header| {
            self.header_mappings
                .get(header)
                .map(|mapping| (header.as_str(), mapping))
        })
    }

    /// Resolve a header to a mapping, learning relation headers on the way
    ///
    /// Returns `None` for unmapped headers, including malformed `REL` headers.
    pub fn resolve(&mut self, header: &str) -> Option<ColumnMapping> {
        if let Some(mapping) = self.header_mappings.get(header) {
            return Some(mapping.clone());
        }

        if header.trim().starts_with("REL") {
            return self.learn_relation(header);
        }

        None
    }

    /// Resolve a header row
    ///
    /// Blank and ignored headers are skipped. Unmapped headers are reported in
    /// one warning and added to the ignore list, or rejected in strict mode.
    ///
    /// # Errors
    ///
    /// Returns `OntoError::UnmappedHeaders` in strict mode when any header is
    /// left unmapped.
    pub fn resolve_headers(
        &mut self,
        headers: &[Option<String>],
        source_name: &str,
    ) -> Result<ResolvedHeaders> {
        debug!("Headers for '{source_name}': {headers:?}");

        let mut resolved = ResolvedHeaders::default();
        let mut unmapped = Vec::new();

        for (position, header) in headers.iter().enumerate() {
            let Some(header) = header.as_deref() else {
                continue;
            };
            if header.is_empty() || self.is_ignored(header) {
                continue;
            }

            match self.resolve(header) {
                Some(mapping) => resolved.columns.push(ResolvedColumn {
                    position,
                    header: header.to_string(),
                    mapping,
                }),
                None if !unmapped.iter().any(|h| h == header) => {
                    unmapped.push(header.to_string());
                }
                None => {}
            }
        }

        if !unmapped.is_empty() {
            if self.strict {
                return Err(OntoError::UnmappedHeaders {
                    source_name: source_name.to_string(),
                    headers: unmapped,
                });
            }

            warn!("Headers not mapped for '{source_name}': {unmapped:?}. Ignoring ...");
            self.ignored_headers.extend(unmapped.iter().cloned());
            resolved.newly_ignored = unmapped;
        }

        Ok(resolved)
    }

    fn learn_relation(&mut self, header: &str) -> Option<ColumnMapping> {
        let tokens = quoted_tokens(header);
        let [name] = tokens.as_slice() else {
            warn!("Relation column did not match expected format. Value: '{header}'");
            return None;
        };

        let property = bracketed_id(header)
            .filter(|id| !id.is_empty())
            .map_or_else(|| quote_if_needed(name), quote_if_needed);

        let mapping = ColumnMapping::new(
            header,
            ColumnRole::Relation {
                property,
                name: Some((*name).to_string()),
            },
        );
        debug!("Learned relation column '{header}' -> {}", mapping.template_code());

        self.header_mappings.insert(header.to_string(), mapping.clone());
        self.learned.insert(header.to_string());
        Some(mapping)
    }
}

impl Default for ColumnMappingRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ontosheets_core::HeaderMappingConfig;
    use pretty_assertions::assert_eq;

    fn headers(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|v| Some((*v).to_string())).collect()
    }

    #[test]
    fn test_default_table_is_stable() {
        let mut registry = ColumnMappingRegistry::with_defaults();
        let first = registry.resolve("Comment").unwrap();
        let second = registry.resolve("Comment").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.role_id(), Some("rdfs:comment"));
        assert_eq!(registry.resolve("Synonyms").unwrap().role_id(), Some("IAO:0000118"));
        assert_eq!(
            registry.resolve("Parent class/ BFO class").unwrap().source_header,
            "Parent"
        );
    }

    #[test]
    fn test_rel_header_learned() {
        let mut registry = ColumnMappingRegistry::with_defaults();
        let mapping = registry.resolve("REL 'part of' [BFO:0000050]").unwrap();
        assert_eq!(mapping.role_id(), Some("BFO:0000050"));
        assert_eq!(mapping.template_code(), "SC BFO:0000050 some % SPLIT=;");

        let learned: Vec<&str> = registry.learned_mappings().map(|(h, _)| h).collect();
        assert_eq!(learned, vec!["REL 'part of' [BFO:0000050]"]);
    }

    #[test]
    fn test_rel_header_without_id_uses_quoted_name() {
        let mut registry = ColumnMappingRegistry::with_defaults();
        let mapping = registry.resolve("REL 'has part'").unwrap();
        assert_eq!(mapping.role_id(), Some("'has part'"));
    }

    #[test]
    fn test_malformed_rel_header_is_unmapped() {
        let mut registry = ColumnMappingRegistry::with_defaults();
        assert!(registry.resolve("REL part of [BFO:0000050]").is_none());
        assert!(registry.resolve("REL 'a' or 'b' [X:1]").is_none());
    }

    #[test]
    fn test_unmapped_headers_ignored_once() {
        let mut registry = ColumnMappingRegistry::with_defaults();
        let row = headers(&["ID", "Name", "Mystery", "Structure", "Mystery"]);

        let first = registry.resolve_headers(&row, "a.xlsx").unwrap();
        assert_eq!(first.newly_ignored, vec!["Mystery".to_string()]);
        let positions: Vec<usize> = first.columns.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1]);

        let ignored_after_first: Vec<String> =
            registry.ignored_headers().map(ToString::to_string).collect();
        let second = registry.resolve_headers(&row, "b.xlsx").unwrap();
        assert!(second.newly_ignored.is_empty());
        let ignored_after_second: Vec<String> =
            registry.ignored_headers().map(ToString::to_string).collect();
        assert_eq!(ignored_after_first, ignored_after_second);
    }

    #[test]
    fn test_blank_headers_skipped() {
        let mut registry = ColumnMappingRegistry::with_defaults();
        let row = vec![Some("ID".to_string()), None, Some(String::new()), Some("Name".to_string())];
        let resolved = registry.resolve_headers(&row, "a.xlsx").unwrap();
        assert_eq!(resolved.columns.len(), 2);
        assert_eq!(resolved.columns[1].position, 3);
    }

    #[test]
    fn test_strict_mode_rejects_unmapped() {
        let mut registry = ColumnMappingRegistry::with_defaults().strict(true);
        let err = registry
            .resolve_headers(&headers(&["ID", "Mystery"]), "a.xlsx")
            .unwrap_err();
        match err {
            OntoError::UnmappedHeaders { headers, .. } => {
                assert_eq!(headers, vec!["Mystery".to_string()]);
            }
            other => panic!("Wrong error type: {other:?}"),
        }
        assert!(!registry.is_ignored("Mystery"));
    }

    #[test]
    fn test_from_config() {
        let mut config = TemplateConfig::default();
        config.ignored_headers.push("Notes".to_string());
        config.header_mappings.insert(
            "Editor note".to_string(),
            HeaderMappingConfig {
                column: Some("Curator note".to_string()),
                role: ColumnRole::Annotation {
                    property: "IAO:0000116".to_string(),
                },
            },
        );

        let registry = ColumnMappingRegistry::from_config(&config);
        assert!(registry.is_ignored("Notes"));
        assert!(registry.is_ignored("Structure"));
        let mapping = registry.mapping("Editor note").unwrap();
        assert_eq!(mapping.source_header, "Curator note");
        assert_eq!(mapping.template_code(), "A IAO:0000116 SPLIT=;");
    }
}
