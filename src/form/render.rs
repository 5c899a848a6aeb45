// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Field rendering: one field config in, one HTML control out
//!
//! Markup carries stable ids and `mls-*` class markers so automated tooling can
//! locate every control without depending on visible text.

use tracing::debug;

use super::schema::{
    CheckboxField, FieldConfig, FieldKind, MultiSelectField, NumberField, RadioField, SelectField,
    TextAreaField, YesNoField,
};
use super::state::{FieldState, FieldValue, MultiSelection, YesNo};
use super::DEFAULT_MAX_SELECTIONS;

/// Render a field in its initial state, optionally seeded with a value
pub fn render_field(config: &FieldConfig, value: Option<&FieldValue>) -> String {
    let state = FieldState::initial(config, value, DEFAULT_MAX_SELECTIONS);
    render_field_state(config, &state)
}

/// Render a field from live state.
///
/// An unrecognized field type renders as an empty string.
pub fn render_field_state(config: &FieldConfig, state: &FieldState) -> String {
    match &config.kind {
        FieldKind::Text(text)
        | FieldKind::Email(text)
        | FieldKind::Tel(text)
        | FieldKind::Url(text) => render_text_input(config, text.max_length, state.text()),
        FieldKind::Number(number) => render_number(config, number, state.text()),
        FieldKind::Date => render_date(config, state.text()),
        FieldKind::TextArea(area) => render_textarea(config, area, state.text()),
        FieldKind::Select(select) => render_select(config, select, state.choice()),
        FieldKind::Checkbox(checkbox) => render_checkbox(config, checkbox, state.checked()),
        FieldKind::Radio(radio) => render_radio(config, radio, state.choice()),
        FieldKind::YesNo(yes_no) => render_yes_no(config, yes_no, state.yes_no()),
        FieldKind::MultiSelect(multi) => match state.selection() {
            Some(selection) => render_multiselect(config, multi, selection),
            None => {
                let max = multi.max_selections.unwrap_or(DEFAULT_MAX_SELECTIONS);
                render_multiselect(config, multi, &MultiSelection::new(max))
            }
        },
        FieldKind::MapPlaceholder => render_map_placeholder(),
        FieldKind::Unrecognized => {
            debug!("Field '{}' has an unrecognized type, rendering nothing", config.name);
            String::new()
        }
    }
}

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn required_marker(config: &FieldConfig) -> &'static str {
    if config.required {
        r#"<span class="mls-required" aria-hidden="true">*</span>"#
    } else {
        ""
    }
}

fn required_attrs(config: &FieldConfig) -> &'static str {
    if config.required {
        r#" required aria-required="true""#
    } else {
        ""
    }
}

fn label(config: &FieldConfig, id: &str) -> String {
    format!(
        r#"<label for="{}" class="mls-label">{}{}</label>"#,
        escape(id),
        escape(&config.label),
        required_marker(config)
    )
}

fn hint(config: &FieldConfig) -> String {
    match &config.hint {
        Some(hint) => format!(r#"<p class="mls-hint">{}</p>"#, escape(hint)),
        None => String::new(),
    }
}

fn opt_attr<T: ToString>(name: &str, value: Option<T>) -> String {
    match value {
        Some(v) => format!(r#" {}="{}""#, name, escape(&v.to_string())),
        None => String::new(),
    }
}

fn open_field(config: &FieldConfig, tag: &str) -> String {
    format!(
        r#"<div class="mls-field mls-field-{}" data-field-name="{}">"#,
        tag,
        escape(&config.name)
    )
}

fn render_text_input(config: &FieldConfig, max_length: Option<u32>, value: &str) -> String {
    let id = config.element_id();
    let tag = config.tag();
    format!(
        r#"{open}{label}<input id="{id}" name="{name}" type="{tag}" class="mls-input mls-input-text" value="{value}"{placeholder}{max_length}{required}>{hint}</div>"#,
        open = open_field(config, tag),
        label = label(config, &id),
        id = escape(&id),
        name = escape(&config.name),
        tag = tag,
        value = escape(value),
        placeholder = opt_attr("placeholder", config.placeholder.as_deref()),
        max_length = opt_attr("maxlength", max_length),
        required = required_attrs(config),
        hint = hint(config),
    )
}

fn render_number(config: &FieldConfig, number: &NumberField, value: &str) -> String {
    let id = config.element_id();
    format!(
        r#"{open}{label}<input id="{id}" name="{name}" type="number" class="mls-input mls-input-number" value="{value}"{placeholder}{min}{max}{step}{required}>{hint}</div>"#,
        open = open_field(config, "number"),
        label = label(config, &id),
        id = escape(&id),
        name = escape(&config.name),
        value = escape(value),
        placeholder = opt_attr("placeholder", config.placeholder.as_deref()),
        min = opt_attr("min", number.min),
        max = opt_attr("max", number.max),
        step = opt_attr("step", number.step),
        required = required_attrs(config),
        hint = hint(config),
    )
}

fn render_date(config: &FieldConfig, display: &str) -> String {
    let id = config.element_id();
    format!(
        r#"{open}{label}<div class="mls-date-wrapper"><input id="{id}" name="{name}" type="text" class="mls-input mls-input-date" value="{value}" placeholder="MM/DD/YYYY" pattern="\d{{2}}/\d{{2}}/\d{{4}}" autocomplete="off"{required}><button type="button" class="mls-date-picker-btn" data-action="open-picker" title="Open Calendar">&#128197;</button><input type="date" class="mls-date-native sr-only" tabindex="-1" aria-hidden="true" data-action="pick-date"></div>{hint}</div>"#,
        open = open_field(config, "date"),
        label = label(config, &id),
        id = escape(&id),
        name = escape(&config.name),
        value = escape(display),
        required = required_attrs(config),
        hint = hint(config),
    )
}

fn render_textarea(config: &FieldConfig, area: &TextAreaField, value: &str) -> String {
    let id = config.element_id();
    format!(
        r#"{open}{label}<textarea id="{id}" name="{name}" class="mls-input mls-input-textarea" rows="{rows}"{placeholder}{max_length}{required}>{value}</textarea>{hint}</div>"#,
        open = open_field(config, "textarea"),
        label = label(config, &id),
        id = escape(&id),
        name = escape(&config.name),
        rows = area.rows.unwrap_or(4),
        placeholder = opt_attr("placeholder", config.placeholder.as_deref()),
        max_length = opt_attr("maxlength", area.max_length),
        required = required_attrs(config),
        value = escape(value),
        hint = hint(config),
    )
}

fn selected_attr(selected: bool) -> &'static str {
    if selected { " selected" } else { "" }
}

fn checked_attr(checked: bool) -> &'static str {
    if checked { " checked" } else { "" }
}

fn render_select(config: &FieldConfig, select: &SelectField, choice: Option<&str>) -> String {
    let id = config.element_id();

    let mut options = String::new();
    if select.allow_empty {
        options.push_str(&format!(r#"<option value=""{}>— Select —</option>"#, selected_attr(choice.is_none())));
    }
    for opt in &select.options {
        options.push_str(&format!(
            r#"<option value="{}"{}>{}</option>"#,
            escape(&opt.value),
            selected_attr(choice == Some(opt.value.as_str())),
            escape(&opt.label)
        ));
    }

    format!(
        r#"{open}{label}<select id="{id}" name="{name}" class="mls-input mls-input-select" data-action="choose"{required}>{options}</select>{hint}</div>"#,
        open = open_field(config, "select"),
        label = label(config, &id),
        id = escape(&id),
        name = escape(&config.name),
        required = required_attrs(config),
        options = options,
        hint = hint(config),
    )
}

fn render_checkbox(config: &FieldConfig, checkbox: &CheckboxField, checked: bool) -> String {
    let id = config.element_id();
    format!(
        r#"{open}<input id="{id}" name="{name}" type="checkbox" class="mls-input mls-input-checkbox" value="{value}" data-action="check"{checked}>{label}{hint}</div>"#,
        open = open_field(config, "checkbox"),
        id = escape(&id),
        name = escape(&config.name),
        value = escape(checkbox.value_when_checked.as_deref().unwrap_or("yes")),
        checked = checked_attr(checked),
        label = label(config, &id),
        hint = hint(config),
    )
}

fn render_radio(config: &FieldConfig, radio: &RadioField, choice: Option<&str>) -> String {
    let group_id = config.element_id();

    let options: String = radio
        .options
        .iter()
        .map(|opt| {
            let opt_id = format!("{}-{}", group_id, opt.value);
            format!(
                r#"<div class="mls-radio-option"><input id="{id}" name="{name}" type="radio" value="{value}" class="mls-input mls-input-radio" data-action="choose"{checked}{required}><label for="{id}" class="mls-label">{label}</label></div>"#,
                id = escape(&opt_id),
                name = escape(&config.name),
                value = escape(&opt.value),
                checked = checked_attr(choice == Some(opt.value.as_str())),
                required = if config.required { " required" } else { "" },
                label = escape(&opt.label),
            )
        })
        .collect();

    format!(
        r#"<fieldset id="{id}" class="mls-field mls-field-radio" data-field-name="{name}"{aria}><legend class="mls-label">{label}{marker}</legend><div class="mls-radio-options">{options}</div>{hint}</fieldset>"#,
        id = escape(&group_id),
        name = escape(&config.name),
        aria = if config.required { r#" aria-required="true""# } else { "" },
        label = escape(&config.label),
        marker = required_marker(config),
        options = options,
        hint = hint(config),
    )
}

fn render_yes_no(config: &FieldConfig, yes_no: &YesNoField, choice: YesNo) -> String {
    let id = config.element_id();
    let (yes_label, no_label) = match &yes_no.options {
        Some([yes, no]) => (yes.as_str(), no.as_str()),
        None => ("Yes", "No"),
    };

    let button = |value: &str, text: &str, active: bool| {
        format!(
            r#"<button type="button" id="{id}-{value}" role="radio" aria-checked="{active}" aria-label="{text}" class="mls-yesno-btn{class}" data-action="choose" data-value="{value}">{text}</button>"#,
            id = escape(&id),
            value = value,
            active = active,
            text = escape(text),
            class = if active { " mls-yesno-btn-active" } else { "" },
        )
    };

    let show_required = config.required && choice == YesNo::Unset;
    let footer = if show_required {
        format!(
            r#"<p class="mls-field-error" role="alert">{} is required.</p>"#,
            escape(&config.label)
        )
    } else {
        hint(config)
    };

    format!(
        r#"<div class="mls-field mls-field-yesno" data-field-name="{name}" role="radiogroup"{aria} aria-labelledby="{id}-label"><span id="{id}-label" class="mls-label">{label}{marker}</span><div class="mls-yesno-buttons">{yes}{no}</div>{footer}</div>"#,
        name = escape(&config.name),
        aria = if config.required { r#" aria-required="true""# } else { "" },
        id = escape(&id),
        label = escape(&config.label),
        marker = required_marker(config),
        yes = button("yes", yes_label, choice == YesNo::Yes),
        no = button("no", no_label, choice == YesNo::No),
        footer = footer,
    )
}

fn render_multiselect(
    config: &FieldConfig,
    multi: &MultiSelectField,
    selection: &MultiSelection,
) -> String {
    let id = config.element_id();
    let max = selection.max();

    let chips: String = if selection.is_empty() {
        format!(r#"<span class="mls-multiselect-empty">Select up to {} items</span>"#, max)
    } else {
        selection
            .values()
            .iter()
            .filter_map(|value| multi.options.iter().find(|o| &o.value == value))
            .map(|opt| {
                format!(
                    r#"<span class="mls-multiselect-chip" data-selected-value="{value}">{label}<button type="button" class="mls-multiselect-remove" data-action="remove" data-value="{value}" aria-label="Remove {label}">&times;</button></span>"#,
                    value = escape(&opt.value),
                    label = escape(&opt.label),
                )
            })
            .collect()
    };

    let options: String = multi
        .options
        .iter()
        .map(|opt| {
            let selected = selection.contains(&opt.value);
            format!(
                r#"<li role="option" aria-selected="{selected}" class="mls-multiselect-option" data-action="toggle" data-option-value="{value}" data-value="{value}"><input type="checkbox" tabindex="-1" readonly{checked}><span>{label}</span></li>"#,
                selected = selected,
                value = escape(&opt.value),
                checked = checked_attr(selected),
                label = escape(&opt.label),
            )
        })
        .collect();

    let hint_text = match &config.hint {
        Some(hint) => escape(hint),
        None => format!("Select up to {} items.", max),
    };

    format!(
        r#"{open}<label for="{id}" class="mls-label">{label}{marker}</label><div class="mls-multiselect"><div id="{id}" class="mls-input mls-input-multiselect" role="combobox" aria-expanded="false" data-max-selections="{max}">{chips}</div><ul class="mls-multiselect-options" role="listbox" hidden>{options}</ul></div><p class="mls-hint">{hint}</p></div>"#,
        open = open_field(config, "multiselect"),
        id = escape(&id),
        label = escape(&config.label),
        marker = required_marker(config),
        max = max,
        chips = chips,
        options = options,
        hint = hint_text,
    )
}

fn render_map_placeholder() -> String {
    r#"<div id="map-placeholder" class="mls-map-placeholder" aria-label="Map placeholder">Map</div>"#.to_string()
}
