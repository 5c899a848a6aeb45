// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use listing_editor::catalog::Catalog;
use listing_editor::form::{render_section, EditorState, FieldEvent};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    catalog_json: &'a str,
    strict: bool,
    events: Vec<(u8, u8, &'a str)>,
}

fn event(kind: u8, value: &str) -> FieldEvent {
    let value = value.to_string();
    match kind % 6 {
        0 => FieldEvent::Input { value },
        1 => FieldEvent::PickDate { value },
        2 => FieldEvent::Check { checked: value.is_empty() },
        3 => FieldEvent::Choose { value },
        4 => FieldEvent::Toggle { value },
        _ => FieldEvent::Remove { value },
    }
}

fuzz_target!(|input: Input| {
    let Ok(catalog) = Catalog::from_json(input.catalog_json, input.strict) else {
        return;
    };

    let mut state = EditorState::new(3);
    let fields: Vec<_> = catalog
        .sections()
        .iter()
        .flat_map(|s| s.fields().map(move |f| (s, f)))
        .collect();

    if !fields.is_empty() {
        for (index, kind, value) in input.events {
            let (section, field) = fields[index as usize % fields.len()];
            let current = state.apply(section, field, event(kind, value));
            if let Some(selection) = current.selection() {
                assert!(selection.len() <= selection.max());
            }
        }
    }

    for section in catalog.sections() {
        let _ = render_section(section, &state);
    }
});
