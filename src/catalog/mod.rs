// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! The form catalog: the ordered sections making up the listing editor
//!
//! The built-in residential property form is embedded at compile time; a JSON
//! file with the same shape can replace it through `catalog.path`. Either way
//! the catalog is validated once at load and never mutated afterwards.

use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

use crate::config::CatalogConfig;
use crate::form::{FieldConfig, FieldKind, SectionConfig};
use crate::{EditorError, Result};

const BUILTIN_CATALOG: &str = include_str!("property_listing.json");

/// Validated, immutable list of form sections
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    sections: Vec<SectionConfig>,
}

/// Sidebar entry derived from a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    pub id: String,
    pub title: String,
    pub required_count: usize,
}

impl Catalog {
    /// Build a catalog from sections, validating it
    pub fn new(sections: Vec<SectionConfig>, strict: bool) -> Result<Self> {
        let catalog = Self { sections };
        catalog.validate(strict)?;
        Ok(catalog)
    }

    /// The embedded residential property form
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG, true)
    }

    /// Parse a JSON array of sections
    pub fn from_json(json: &str, strict: bool) -> Result<Self> {
        let sections: Vec<SectionConfig> = serde_json::from_str(json)?;
        Self::new(sections, strict)
    }

    /// Read a catalog file
    pub fn from_file(path: &Path, strict: bool) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content, strict)
    }

    /// Load according to configuration: the configured file, else the built-in form
    pub fn load(config: &CatalogConfig) -> Result<Self> {
        let catalog = match &config.path {
            Some(path) => {
                info!("Loading form catalog from {}", path);
                Self::from_file(Path::new(path), config.strict_field_types)?
            }
            None => Self::builtin()?,
        };
        info!(
            "Form catalog ready: {} sections, {} fields",
            catalog.sections.len(),
            catalog.field_count()
        );
        Ok(catalog)
    }

    pub fn sections(&self) -> &[SectionConfig] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&SectionConfig> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Look up a field by section id and field name
    pub fn field(&self, section_id: &str, name: &str) -> Option<(&SectionConfig, &FieldConfig)> {
        let section = self.section(section_id)?;
        section.field(name).map(|field| (section, field))
    }

    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|s| s.fields().count()).sum()
    }

    /// Sidebar entries in section order
    pub fn summaries(&self) -> Vec<SectionSummary> {
        self.sections
            .iter()
            .map(|s| SectionSummary {
                id: s.id.clone(),
                title: s.title.clone(),
                required_count: s.required_count(),
            })
            .collect()
    }

    /// Required fields across the whole form, shown on the Editor tab
    pub fn required_count(&self) -> usize {
        self.sections.iter().map(|s| s.required_count()).sum()
    }

    /// Check every structural rule and report all violations at once.
    ///
    /// In non-strict mode fields of an unrecognized type are allowed (they
    /// render as nothing) and only logged.
    pub fn validate(&self, strict: bool) -> Result<()> {
        let mut problems = Vec::new();
        // Section and subsection anchors share the page with field element ids
        let mut anchors: HashSet<String> = HashSet::new();

        for section in &self.sections {
            if section.id.trim().is_empty() {
                problems.push(format!("section '{}' has an empty id", section.title));
            }
            if !anchors.insert(section.id.clone()) {
                problems.push(format!("duplicate section or subsection id '{}'", section.id));
            }
            for sub in section.subsections() {
                if sub.id.trim().is_empty() {
                    problems.push(format!(
                        "subsection '{}' in section '{}' has an empty id",
                        sub.title, section.id
                    ));
                }
                if !anchors.insert(sub.id.clone()) {
                    problems.push(format!("duplicate section or subsection id '{}'", sub.id));
                }
            }

            let mut names = HashSet::new();
            for field in section.fields() {
                if !names.insert(field.name.as_str()) {
                    problems.push(format!(
                        "duplicate field name '{}' in section '{}'",
                        field.name, section.id
                    ));
                } else if !anchors.insert(field.element_id()) {
                    problems.push(format!(
                        "duplicate element id '{}' for field '{}' in section '{}'",
                        field.element_id(),
                        field.name,
                        section.id
                    ));
                }
                check_field(&section.id, field, strict, &mut problems);
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(EditorError::Catalog(problems))
        }
    }
}

fn check_field(section_id: &str, field: &FieldConfig, strict: bool, problems: &mut Vec<String>) {
    let at = format!("field '{}' in section '{}'", field.name, section_id);

    if field.name.trim().is_empty() {
        problems.push(format!("a field in section '{}' has an empty name", section_id));
    }

    match &field.kind {
        FieldKind::Select(select) if select.options.is_empty() && !select.allow_empty => {
            problems.push(format!("{} is a select without options", at));
        }
        FieldKind::Radio(radio) if radio.options.is_empty() => {
            problems.push(format!("{} is a radio group without options", at));
        }
        FieldKind::MultiSelect(multi) => {
            if multi.options.is_empty() {
                problems.push(format!("{} is a multiselect without options", at));
            }
            if multi.max_selections == Some(0) {
                problems.push(format!("{} allows zero selections", at));
            }
        }
        FieldKind::Number(number) => {
            if let (Some(min), Some(max)) = (number.min, number.max) {
                if min > max {
                    problems.push(format!("{} has min {} above max {}", at, min, max));
                }
            }
        }
        FieldKind::Unrecognized => {
            if strict {
                problems.push(format!("{} has an unrecognized type", at));
            } else {
                warn!("{} has an unrecognized type and will not be rendered", at);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::SectionBody;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.sections().len() >= 5);
        assert!(catalog.required_count() > 0);
        assert_eq!(catalog.sections()[0].id, "listing-information");
        assert!(catalog.field("location", "map").is_some());
        assert!(catalog
            .sections()
            .iter()
            .any(|s| matches!(s.body, SectionBody::Subsections(_))));
    }

    #[test]
    fn test_summaries_follow_section_order() {
        let catalog = Catalog::builtin().unwrap();
        let summaries = catalog.summaries();
        let ids: Vec<&str> = summaries.iter().map(|s| s.id.as_str()).collect();
        let expected: Vec<&str> = catalog.sections().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, expected);
        assert_eq!(
            summaries.iter().map(|s| s.required_count).sum::<usize>(),
            catalog.required_count()
        );
    }

    #[test]
    fn test_unknown_type_strict_vs_lenient() {
        let json = r#"[ { "id": "s", "title": "S", "fields": [
            { "type": "signature", "name": "sig", "label": "Signature" } ] } ]"#;

        let err = Catalog::from_json(json, true).unwrap_err();
        match err {
            EditorError::Catalog(problems) => {
                assert_eq!(problems.len(), 1);
                assert!(problems[0].contains("unrecognized type"));
            }
            other => panic!("Expected Catalog error, got {:?}", other),
        }

        let catalog = Catalog::from_json(json, false).unwrap();
        let (_, field) = catalog.field("s", "sig").unwrap();
        assert_eq!(field.kind, FieldKind::Unrecognized);
    }

    #[test]
    fn test_reports_every_structural_problem() {
        let json = r#"[
            { "id": "a", "title": "A", "subsections": [
                { "id": "b", "title": "B", "fields": [ { "type": "text", "name": "x", "label": "X" } ] },
                { "id": "b2", "title": "B2", "fields": [ { "type": "text", "name": "x", "label": "X again" } ] } ] },
            { "id": "b", "title": "Dup", "fields": [
                { "type": "radio", "name": "r", "label": "R", "options": [] },
                { "type": "multiselect", "name": "m", "label": "M", "options": [ { "value": "1", "label": "One" } ], "max_selections": 0 },
                { "type": "number", "name": "n", "label": "N", "min": 5, "max": 1 } ] }
        ]"#;

        let err = Catalog::from_json(json, true).unwrap_err();
        let problems = match err {
            EditorError::Catalog(problems) => problems,
            other => panic!("Expected Catalog error, got {:?}", other),
        };
        assert_eq!(problems.len(), 5, "{:?}", problems);
        assert!(problems.iter().any(|p| p.contains("duplicate field name 'x'")));
        assert!(problems.iter().any(|p| p.contains("duplicate section or subsection id 'b'")));
        assert!(problems.iter().any(|p| p.contains("radio group without options")));
        assert!(problems.iter().any(|p| p.contains("zero selections")));
        assert!(problems.iter().any(|p| p.contains("min 5 above max 1")));
    }

    #[test]
    fn test_same_field_name_needs_distinct_element_ids() {
        let clashing = r#"[
            { "id": "a", "title": "A", "fields": [ { "type": "text", "name": "notes", "label": "Notes" } ] },
            { "id": "b", "title": "B", "fields": [ { "type": "text", "name": "notes", "label": "Notes" } ] }
        ]"#;
        match Catalog::from_json(clashing, true).unwrap_err() {
            EditorError::Catalog(problems) => {
                assert_eq!(problems.len(), 1, "{:?}", problems);
                assert!(problems[0].contains("duplicate element id 'field-notes'"));
            }
            other => panic!("Expected Catalog error, got {:?}", other),
        }

        let distinct = r#"[
            { "id": "a", "title": "A", "fields": [ { "type": "text", "name": "notes", "label": "Notes" } ] },
            { "id": "b", "title": "B", "fields": [
                { "type": "text", "name": "notes", "label": "Notes", "id": "b-notes" } ] }
        ]"#;
        let catalog = Catalog::from_json(distinct, true).unwrap();
        assert!(catalog.field("a", "notes").is_some());
        assert!(catalog.field("b", "notes").is_some());
    }

    #[test]
    fn test_field_id_may_not_reuse_a_section_anchor() {
        let json = r#"[
            { "id": "details", "title": "Details", "fields": [
                { "type": "text", "name": "x", "label": "X", "id": "details" } ] }
        ]"#;
        match Catalog::from_json(json, true).unwrap_err() {
            EditorError::Catalog(problems) => {
                assert!(problems.iter().any(|p| p.contains("duplicate element id 'details'")));
            }
            other => panic!("Expected Catalog error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_from_configured_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, r#"[ { "id": "only", "title": "Only", "fields": [] } ]"#).unwrap();

        let config = CatalogConfig {
            path: Some(path.to_string_lossy().to_string()),
            strict_field_types: true,
        };
        let catalog = Catalog::load(&config).unwrap();
        assert_eq!(catalog.sections().len(), 1);
        assert_eq!(catalog.field_count(), 0);
    }

    #[test]
    fn test_serializes_back_to_section_array() {
        let catalog = Catalog::builtin().unwrap();
        let json = serde_json::to_string(&catalog).unwrap();
        let again = Catalog::from_json(&json, true).unwrap();
        assert_eq!(again.sections(), catalog.sections());
    }
}
