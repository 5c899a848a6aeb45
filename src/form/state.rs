// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Transient per-field UI state and the events that change it

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use super::schema::{FieldConfig, FieldKind, SectionConfig};
use super::{iso_to_display, DEFAULT_MAX_SELECTIONS};

/// Initial value supplied alongside a field config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

/// Yes/No toggle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YesNo {
    Yes,
    No,
    #[default]
    Unset,
}

impl YesNo {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "yes" => Some(YesNo::Yes),
            "no" => Some(YesNo::No),
            _ => None,
        }
    }
}

/// Ordered selection set that never grows past its bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSelection {
    selected: Vec<String>,
    max: usize,
}

impl MultiSelection {
    pub fn new(max: usize) -> Self {
        Self {
            selected: Vec::new(),
            max,
        }
    }

    /// Seed from an initial list; duplicates are dropped and the list is cut at `max`
    pub fn with_values<I, S>(values: I, max: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new(max);
        for value in values {
            let value = value.into();
            if selection.is_full() {
                break;
            }
            if !selection.contains(&value) {
                selection.selected.push(value);
            }
        }
        selection
    }

    /// Remove `value` if present, otherwise add it while under the bound.
    ///
    /// Returns whether the set changed; adding at the bound is a silent no-op.
    pub fn toggle(&mut self, value: &str) -> bool {
        if self.remove(value) {
            return true;
        }
        if self.is_full() {
            debug!("Multiselect at bound {}, ignoring '{}'", self.max, value);
            return false;
        }
        self.selected.push(value.to_string());
        true
    }

    pub fn remove(&mut self, value: &str) -> bool {
        let before = self.selected.len();
        self.selected.retain(|v| v != value);
        self.selected.len() != before
    }

    pub fn contains(&self, value: &str) -> bool {
        self.selected.iter().any(|v| v == value)
    }

    pub fn is_full(&self) -> bool {
        self.selected.len() >= self.max
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn values(&self) -> &[String] {
        &self.selected
    }
}

/// Current state of one rendered control
#[derive(Debug, Clone, PartialEq)]
pub enum FieldState {
    /// Text-like inputs, numbers and text areas
    Input(String),
    /// Date display value in `MM/DD/YYYY`
    Date(String),
    Select(Option<String>),
    Checkbox(bool),
    Radio(Option<String>),
    YesNo(YesNo),
    MultiSelect(MultiSelection),
    /// Controls without state
    Static,
}

/// A user interaction with a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FieldEvent {
    /// Typed text
    Input { value: String },
    /// Native date picker change, `YYYY-MM-DD`
    PickDate { value: String },
    Check { checked: bool },
    /// Select option, radio option or yes/no button
    Choose { value: String },
    Toggle { value: String },
    Remove { value: String },
}

impl FieldState {
    /// State a freshly rendered control starts in
    pub fn initial(config: &FieldConfig, value: Option<&FieldValue>, default_max: usize) -> Self {
        match &config.kind {
            FieldKind::Text(_)
            | FieldKind::Email(_)
            | FieldKind::Tel(_)
            | FieldKind::Url(_)
            | FieldKind::TextArea(_) => FieldState::Input(match value {
                Some(FieldValue::Text(text)) => text.clone(),
                other => mismatched(config, other, String::new()),
            }),
            FieldKind::Number(_) => FieldState::Input(match value {
                Some(FieldValue::Number(n)) => format_number(*n),
                Some(FieldValue::Text(text)) => text.clone(),
                other => mismatched(config, other, String::new()),
            }),
            FieldKind::Date => FieldState::Date(match value {
                Some(FieldValue::Text(text)) => text.clone(),
                other => mismatched(config, other, String::new()),
            }),
            FieldKind::Select(select) => {
                let supplied = match value {
                    Some(FieldValue::Text(v)) if config.has_option(v) => Some(v.clone()),
                    Some(FieldValue::Text(v)) if v.is_empty() && select.allow_empty => None,
                    other => mismatched(config, other, None),
                };
                FieldState::Select(supplied.or_else(|| {
                    if select.allow_empty {
                        None
                    } else {
                        select.options.first().map(|o| o.value.clone())
                    }
                }))
            }
            FieldKind::Checkbox(_) => FieldState::Checkbox(match value {
                Some(FieldValue::Bool(checked)) => *checked,
                other => mismatched(config, other, false),
            }),
            FieldKind::Radio(radio) => {
                let supplied = match value {
                    Some(FieldValue::Text(v)) if config.has_option(v) => Some(v.clone()),
                    other => mismatched(config, other, None),
                };
                let first = || radio.options.first().map(|o| o.value.clone());
                FieldState::Radio(supplied.or_else(first))
            }
            FieldKind::YesNo(_) => FieldState::YesNo(match value {
                Some(FieldValue::Text(v)) => YesNo::parse(v).unwrap_or_default(),
                other => mismatched(config, other, YesNo::Unset),
            }),
            FieldKind::MultiSelect(multi) => {
                let max = multi.max_selections.unwrap_or(default_max);
                FieldState::MultiSelect(match value {
                    Some(FieldValue::List(values)) => {
                        MultiSelection::with_values(values.iter().cloned(), max)
                    }
                    other => mismatched(config, other, MultiSelection::new(max)),
                })
            }
            FieldKind::MapPlaceholder | FieldKind::Unrecognized => FieldState::Static,
        }
    }

    /// Apply an event; returns whether the state changed.
    ///
    /// Events that do not fit the field type, and choices outside the option
    /// list, leave the state untouched.
    pub fn apply(&mut self, config: &FieldConfig, event: FieldEvent) -> bool {
        match (self, event) {
            (FieldState::Input(current), FieldEvent::Input { value }) => replace(current, value),
            (FieldState::Date(current), FieldEvent::Input { value }) => replace(current, value),
            (FieldState::Date(current), FieldEvent::PickDate { value }) => {
                match iso_to_display(&value) {
                    Some(display) => replace(current, display),
                    None => false,
                }
            }
            (FieldState::Select(current), FieldEvent::Choose { value }) => {
                let allow_empty = matches!(&config.kind, FieldKind::Select(s) if s.allow_empty);
                if value.is_empty() && allow_empty {
                    replace(current, None)
                } else if config.has_option(&value) {
                    replace(current, Some(value))
                } else {
                    false
                }
            }
            (FieldState::Radio(current), FieldEvent::Choose { value })
                if config.has_option(&value) =>
            {
                replace(current, Some(value))
            }
            (FieldState::Checkbox(current), FieldEvent::Check { checked }) => {
                replace(current, checked)
            }
            (FieldState::YesNo(current), FieldEvent::Choose { value }) => {
                match YesNo::parse(&value) {
                    Some(choice) => replace(current, choice),
                    None => false,
                }
            }
            (FieldState::MultiSelect(selection), FieldEvent::Toggle { value })
                if config.has_option(&value) =>
            {
                selection.toggle(&value)
            }
            (FieldState::MultiSelect(selection), FieldEvent::Remove { value }) => {
                selection.remove(&value)
            }
            (_, event) => {
                debug!("Ignoring {:?} for {} field '{}'", event, config.tag(), config.name);
                false
            }
        }
    }

    /// Text of an input or date control, empty for other states
    pub fn text(&self) -> &str {
        match self {
            FieldState::Input(text) | FieldState::Date(text) => text,
            _ => "",
        }
    }

    /// Chosen option of a select or radio control
    pub fn choice(&self) -> Option<&str> {
        match self {
            FieldState::Select(choice) | FieldState::Radio(choice) => choice.as_deref(),
            _ => None,
        }
    }

    pub fn checked(&self) -> bool {
        matches!(self, FieldState::Checkbox(true))
    }

    pub fn yes_no(&self) -> YesNo {
        match self {
            FieldState::YesNo(choice) => *choice,
            _ => YesNo::Unset,
        }
    }

    pub fn selection(&self) -> Option<&MultiSelection> {
        match self {
            FieldState::MultiSelect(selection) => Some(selection),
            _ => None,
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn mismatched<T>(config: &FieldConfig, value: Option<&FieldValue>, fallback: T) -> T {
    if let Some(value) = value {
        debug!("Ignoring initial value {:?} for {} field '{}'", value, config.tag(), config.name);
    }
    fallback
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Lookup of live field state while composing sections
pub trait StateLookup {
    fn state(&self, section_id: &str, field_name: &str) -> Option<&FieldState>;

    /// Selection bound for untouched multiselects without their own
    fn default_max(&self) -> usize {
        DEFAULT_MAX_SELECTIONS
    }
}

/// No live state: every control renders in its initial state
impl StateLookup for () {
    fn state(&self, _section_id: &str, _field_name: &str) -> Option<&FieldState> {
        None
    }
}

/// Field state of one editor session, keyed by section id and field name
#[derive(Debug, Clone)]
pub struct EditorState {
    fields: HashMap<(String, String), FieldState>,
    default_max: usize,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SELECTIONS)
    }
}

impl EditorState {
    pub fn new(default_max: usize) -> Self {
        Self {
            fields: HashMap::new(),
            default_max,
        }
    }

    /// Apply an event to a field, creating its initial state on first touch
    pub fn apply(
        &mut self,
        section: &SectionConfig,
        field: &FieldConfig,
        event: FieldEvent,
    ) -> &FieldState {
        let default_max = self.default_max;
        let state = self
            .fields
            .entry((section.id.clone(), field.name.clone()))
            .or_insert_with(|| FieldState::initial(field, None, default_max));

        if state.apply(field, event) {
            debug!("Field '{}/{}' now {:?}", section.id, field.name, state);
        }
        state
    }

    /// Number of fields that have been touched
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Discard all field state
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    pub fn default_max(&self) -> usize {
        self.default_max
    }
}

impl StateLookup for EditorState {
    fn state(&self, section_id: &str, field_name: &str) -> Option<&FieldState> {
        self.fields.get(&(section_id.to_string(), field_name.to_string()))
    }

    fn default_max(&self) -> usize {
        self.default_max
    }
}
