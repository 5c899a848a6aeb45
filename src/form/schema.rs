// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Declarative field, subsection and section configuration

use serde::{Deserialize, Serialize};

/// One value/label pair of a select, radio or multiselect field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Description of one form control.
///
/// The attributes every control shares live here; everything that only makes
/// sense for one field type lives in that type's [`FieldKind`] variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Form-control name, unique within its section
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Explicit element id; `field-{name}` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(flatten)]
    pub kind: FieldKind,
}

/// Field type tag plus the attributes that belong to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text(TextField),
    Email(TextField),
    Tel(TextField),
    Url(TextField),
    Number(NumberField),
    Date,
    #[serde(rename = "textarea")]
    TextArea(TextAreaField),
    Select(SelectField),
    Checkbox(CheckboxField),
    Radio(RadioField),
    #[serde(rename = "yesno")]
    YesNo(YesNoField),
    #[serde(rename = "multiselect")]
    MultiSelect(MultiSelectField),
    /// Display-only map box, no input
    MapPlaceholder,
    /// Any `type` this build does not know about
    #[serde(other)]
    Unrecognized,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextAreaField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectField {
    pub options: Vec<SelectOption>,
    /// Offer an empty "— Select —" choice
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_empty: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckboxField {
    /// Submitted value when checked; `"yes"` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_when_checked: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadioField {
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YesNoField {
    /// Button labels; `["Yes", "No"]` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<[String; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiSelectField {
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_selections: Option<usize>,
}

impl FieldKind {
    /// The tag as written in configuration and in `mls-field-{tag}` classes
    pub fn tag(&self) -> &'static str {
        match self {
            FieldKind::Text(_) => "text",
            FieldKind::Email(_) => "email",
            FieldKind::Tel(_) => "tel",
            FieldKind::Url(_) => "url",
            FieldKind::Number(_) => "number",
            FieldKind::Date => "date",
            FieldKind::TextArea(_) => "textarea",
            FieldKind::Select(_) => "select",
            FieldKind::Checkbox(_) => "checkbox",
            FieldKind::Radio(_) => "radio",
            FieldKind::YesNo(_) => "yesno",
            FieldKind::MultiSelect(_) => "multiselect",
            FieldKind::MapPlaceholder => "map_placeholder",
            FieldKind::Unrecognized => "unrecognized",
        }
    }

    /// Option list for the choice-based types, empty otherwise
    pub fn options(&self) -> &[SelectOption] {
        match self {
            FieldKind::Select(f) => &f.options,
            FieldKind::Radio(f) => &f.options,
            FieldKind::MultiSelect(f) => &f.options,
            _ => &[],
        }
    }
}

impl FieldConfig {
    /// Element id used for the control: the explicit id, else `field-{name}`
    pub fn element_id(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => format!("field-{}", self.name),
        }
    }

    pub fn tag(&self) -> &'static str {
        self.kind.tag()
    }

    pub fn options(&self) -> &[SelectOption] {
        self.kind.options()
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options().iter().any(|o| o.value == value)
    }
}

/// A titled group of fields inside a section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsectionConfig {
    /// Page-unique anchor id
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// What a section contains: subsections or its own fields, never both
#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Subsections(Vec<SubsectionConfig>),
    Fields(Vec<FieldConfig>),
}

/// A titled top-level form section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSection", into = "RawSection")]
pub struct SectionConfig {
    /// Page-unique anchor id
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub body: SectionBody,
}

/// Wire shape of a section: `subsections` suppresses `fields` when non-empty
#[derive(Serialize, Deserialize)]
struct RawSection {
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subsections: Option<Vec<SubsectionConfig>>,
    #[serde(default)]
    fields: Vec<FieldConfig>,
}

impl From<RawSection> for SectionConfig {
    fn from(raw: RawSection) -> Self {
        let body = match raw.subsections {
            Some(subsections) if !subsections.is_empty() => {
                if !raw.fields.is_empty() {
                    tracing::warn!(
                        "Section '{}' has both subsections and fields; ignoring {} top-level fields",
                        raw.id,
                        raw.fields.len()
                    );
                }
                SectionBody::Subsections(subsections)
            }
            _ => SectionBody::Fields(raw.fields),
        };

        Self {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            body,
        }
    }
}

impl From<SectionConfig> for RawSection {
    fn from(section: SectionConfig) -> Self {
        let (subsections, fields) = match section.body {
            SectionBody::Subsections(subs) => (Some(subs), Vec::new()),
            SectionBody::Fields(fields) => (None, fields),
        };

        Self {
            id: section.id,
            title: section.title,
            description: section.description,
            subsections,
            fields,
        }
    }
}

impl SectionConfig {
    /// Every field of the section in declared order, subsections flattened
    pub fn fields(&self) -> Box<dyn Iterator<Item = &FieldConfig> + '_> {
        match &self.body {
            SectionBody::Subsections(subs) => Box::new(subs.iter().flat_map(|s| s.fields.iter())),
            SectionBody::Fields(fields) => Box::new(fields.iter()),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldConfig> {
        self.fields().find(|f| f.name == name)
    }

    /// Number of fields marked required, shown as the sidebar badge
    pub fn required_count(&self) -> usize {
        self.fields().filter(|f| f.required).count()
    }

    pub fn subsections(&self) -> &[SubsectionConfig] {
        match &self.body {
            SectionBody::Subsections(subs) => subs,
            SectionBody::Fields(_) => &[],
        }
    }
}
