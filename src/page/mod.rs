// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Editor page assembly: section sidebar plus the scrollable form document

pub mod nav;

use crate::catalog::{Catalog, SectionSummary};
use crate::form::render::escape;
use crate::form::{render_section, StateLookup};

pub use nav::{active_section, scroll_target, SectionBounds, Viewport};

/// Title shown above the form and at the top of the sidebar
pub const FORM_TITLE: &str = "Residential Input Form";

/// Render the sidebar navigation; `active` marks the highlighted entry
pub fn render_sidebar(sections: &[SectionSummary], active: Option<&str>) -> String {
    let items: String = sections
        .iter()
        .map(|section| {
            let is_active = active == Some(section.id.as_str());
            let badge = if section.required_count > 0 {
                format!(
                    r#"<span class="mls-sidebar-badge" aria-label="{count} required">{count}</span>"#,
                    count = section.required_count
                )
            } else {
                String::new()
            };
            format!(
                r##"<li><a href="#{id}" class="mls-sidebar-item{active}" data-section-id="{id}" id="sidebar-link-{id}"{current}><span>{title}</span>{badge}</a></li>"##,
                id = escape(&section.id),
                active = if is_active { " mls-sidebar-item-active" } else { "" },
                current = if is_active { r#" aria-current="true""# } else { "" },
                title = escape(&section.title),
                badge = badge,
            )
        })
        .collect();

    format!(
        r#"<aside class="mls-editor-sidebar" id="editor-sidebar" aria-label="Form sections">
    <div class="mls-sidebar-header">
        <h2 class="mls-sidebar-title">{title}</h2>
        <label class="mls-sidebar-required-label"><input type="checkbox" class="mls-sidebar-required-toggle" id="sidebar-required-only"> Required</label>
    </div>
    <nav class="mls-sidebar-nav" aria-label="Sections"><ul>{items}</ul></nav>
</aside>"#,
        title = FORM_TITLE,
        items = items,
    )
}

/// Render the scrollable content region with every section in catalog order
pub fn render_content(catalog: &Catalog, states: &dyn StateLookup, scroll_offset: u32) -> String {
    let sections: String = catalog
        .sections()
        .iter()
        .map(|section| render_section(section, states))
        .collect();

    format!(
        r#"<div class="mls-editor-main" id="editor-main-content" data-scroll-offset="{offset}">
    <div class="mls-page-content">
        <h2 class="mls-content-form-title">{title}</h2>
        {sections}
    </div>
</div>"#,
        offset = scroll_offset,
        title = FORM_TITLE,
        sections = sections,
    )
}

/// Sidebar and content together; the first section starts active
pub fn render_editor_body(
    catalog: &Catalog,
    states: &dyn StateLookup,
    scroll_offset: u32,
) -> String {
    let summaries = catalog.summaries();
    let active = summaries.first().map(|s| s.id.as_str());
    format!(
        "{}\n{}",
        render_sidebar(&summaries, active),
        render_content(catalog, states, scroll_offset)
    )
}
