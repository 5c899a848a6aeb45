// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration-driven form model: schema, field state, rendering and
//! section composition

pub mod compose;
pub mod render;
pub mod schema;
pub mod state;

use chrono::NaiveDate;

pub use compose::{render_section, render_subsection};
pub use render::{render_field, render_field_state};
pub use schema::{
    FieldConfig, FieldKind, SectionBody, SectionConfig, SelectOption, SubsectionConfig,
};
pub use state::{
    EditorState, FieldEvent, FieldState, FieldValue, MultiSelection, StateLookup, YesNo,
};

/// Selection bound for multiselect fields that do not set their own
pub const DEFAULT_MAX_SELECTIONS: usize = 10;

/// Display format of date fields
pub const DATE_DISPLAY_FORMAT: &str = "%m/%d/%Y";

/// Convert a native date picker value (`YYYY-MM-DD`) to `MM/DD/YYYY`.
///
/// Returns `None` for empty or malformed input. There is no inverse: the
/// display value is never parsed back.
pub fn iso_to_display(iso: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d").ok()?;
    Some(date.format(DATE_DISPLAY_FORMAT).to_string())
}
