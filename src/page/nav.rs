// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Section navigation math
//!
//! Pure functions of measured layout, independent of any rendering: the page
//! script measures sections and asks the same questions these answer.

use serde::{Deserialize, Serialize};

/// Gap kept above a section after jumping to it
pub const DEFAULT_SCROLL_OFFSET: f64 = 24.0;

/// Vertical extent of one section in scroll-content coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionBounds {
    pub fn new(id: impl Into<String>, top: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            top,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    fn contains(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom()
    }
}

/// The visible window of the scroll region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn center(&self) -> f64 {
        self.scroll_top + self.height / 2.0
    }
}

/// The section considered in view.
///
/// The first section containing the viewport center wins. Failing that, the
/// last section starting above the center stays active, and above every
/// section the first one is active. Only an empty list yields `None`.
pub fn active_section<'a>(sections: &'a [SectionBounds], viewport: &Viewport) -> Option<&'a str> {
    let center = viewport.center();
    let mut current = None;

    for section in sections {
        if section.contains(center) {
            return Some(section.id.as_str());
        }
        if center >= section.top {
            current = Some(section.id.as_str());
        }
    }

    current.or_else(|| sections.first().map(|s| s.id.as_str()))
}

/// Scroll position that puts a section's top `offset` pixels below the
/// region's top. `section_top` and `container_top` are viewport-relative.
pub fn scroll_target(section_top: f64, container_top: f64, scroll_top: f64, offset: f64) -> f64 {
    scroll_top + (section_top - container_top) - offset
}
