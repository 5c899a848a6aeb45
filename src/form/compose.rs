// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Section and subsection composition

use super::render::{escape, render_field_state};
use super::schema::{FieldConfig, SectionBody, SectionConfig, SubsectionConfig};
use super::state::{FieldState, StateLookup};

/// Render a section: title, optional description, then its subsections or
/// its own fields in declared order
pub fn render_section(section: &SectionConfig, states: &dyn StateLookup) -> String {
    let body = match &section.body {
        SectionBody::Subsections(subsections) => {
            let subs: String = subsections
                .iter()
                .map(|sub| render_subsection(&section.id, sub, states))
                .collect();
            format!(r#"<div class="mls-section-subsections">{}</div>"#, subs)
        }
        SectionBody::Fields(fields) => format!(
            r#"<div class="mls-section-fields">{}</div>"#,
            render_fields(&section.id, fields, states)
        ),
    };

    format!(
        r#"<section id="{id}" class="mls-section" data-section-id="{id}"><h2 class="mls-section-title">{title}</h2>{description}{body}</section>"#,
        id = escape(&section.id),
        title = escape(&section.title),
        description = description("mls-section-description", section.description.as_deref()),
        body = body,
    )
}

/// Render one subsection of the section `section_id`
pub fn render_subsection(
    section_id: &str,
    subsection: &SubsectionConfig,
    states: &dyn StateLookup,
) -> String {
    format!(
        r#"<div id="{id}" class="mls-subsection" data-subsection-id="{id}"><h3 class="mls-subsection-title">{title}</h3>{description}<div class="mls-subsection-fields">{fields}</div></div>"#,
        id = escape(&subsection.id),
        title = escape(&subsection.title),
        description = description("mls-subsection-description", subsection.description.as_deref()),
        fields = render_fields(section_id, &subsection.fields, states),
    )
}

fn render_fields(section_id: &str, fields: &[FieldConfig], states: &dyn StateLookup) -> String {
    fields
        .iter()
        .map(|field| match states.state(section_id, &field.name) {
            Some(state) => render_field_state(field, state),
            None => {
                let initial = FieldState::initial(field, None, states.default_max());
                render_field_state(field, &initial)
            }
        })
        .collect()
}

fn description(class: &str, text: Option<&str>) -> String {
    match text {
        Some(text) => format!(r#"<p class="{}">{}</p>"#, class, escape(text)),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::schema::*;
    use crate::form::state::{EditorState, FieldEvent};

    fn text_field(name: &str) -> FieldConfig {
        FieldConfig {
            name: name.to_string(),
            label: name.to_uppercase(),
            required: false,
            placeholder: None,
            id: None,
            hint: None,
            kind: FieldKind::Text(TextField::default()),
        }
    }

    fn flat_section() -> SectionConfig {
        SectionConfig {
            id: "listing".to_string(),
            title: "Listing Information".to_string(),
            description: Some("Basic facts".to_string()),
            body: SectionBody::Fields(vec![
                text_field("zeta"),
                text_field("alpha"),
                text_field("mid"),
            ]),
        }
    }

    #[test]
    fn test_flat_section_keeps_declared_order() {
        let html = render_section(&flat_section(), &());
        assert!(html.starts_with(
            r#"<section id="listing" class="mls-section" data-section-id="listing">"#
        ));
        assert!(html.contains(r#"<p class="mls-section-description">Basic facts</p>"#));
        assert!(html.contains("mls-section-fields"));
        assert!(!html.contains("mls-section-subsections"));

        let zeta = html.find("field-zeta").unwrap();
        let alpha = html.find("field-alpha").unwrap();
        let mid = html.find("field-mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }

    #[test]
    fn test_subsections_nest_fields() {
        let section = SectionConfig {
            id: "interior".to_string(),
            title: "Interior".to_string(),
            description: None,
            body: SectionBody::Subsections(vec![
                SubsectionConfig {
                    id: "interior-rooms".to_string(),
                    title: "Rooms".to_string(),
                    description: Some("Counts".to_string()),
                    fields: vec![text_field("beds")],
                },
                SubsectionConfig {
                    id: "interior-finishes".to_string(),
                    title: "Finishes".to_string(),
                    description: None,
                    fields: vec![text_field("flooring")],
                },
            ]),
        };

        let html = render_section(&section, &());
        assert!(html.contains("mls-section-subsections"));
        assert!(!html.contains("mls-section-fields"));
        assert!(!html.contains("mls-section-description"));
        assert!(html.contains(
            r#"<div id="interior-rooms" class="mls-subsection" data-subsection-id="interior-rooms">"#
        ));
        assert!(html.contains(r#"<p class="mls-subsection-description">Counts</p>"#));
        assert!(html.find("interior-rooms").unwrap() < html.find("interior-finishes").unwrap());
        assert!(html.find("field-beds").unwrap() < html.find("field-flooring").unwrap());
    }

    #[test]
    fn test_live_state_is_used_when_present() {
        let section = flat_section();
        let field = section.field("alpha").unwrap().clone();

        let mut editor = EditorState::new(10);
        editor.apply(&section, &field, FieldEvent::Input { value: "typed".to_string() });

        let html = render_section(&section, &editor);
        assert!(html.contains(r#"value="typed""#));
        assert_eq!(html.matches(r#"value="""#).count(), 2);
    }

    #[test]
    fn test_untouched_multiselect_uses_session_bound() {
        let section = SectionConfig {
            id: "features".to_string(),
            title: "Features".to_string(),
            description: None,
            body: SectionBody::Fields(vec![FieldConfig {
                kind: FieldKind::MultiSelect(MultiSelectField {
                    options: vec![SelectOption::new("pool", "Pool")],
                    max_selections: None,
                }),
                ..text_field("amenities")
            }]),
        };

        assert!(render_section(&section, &EditorState::new(3)).contains("Select up to 3 items."));
        assert!(render_section(&section, &()).contains("Select up to 10 items."));
    }
}
