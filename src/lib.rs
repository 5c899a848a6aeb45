// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Listing Editor: local property-listing input shell
//!
//! A login gate, a configuration-driven residential listing form with section
//! navigation, and a photo intake page, served as HTML by a local web server.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod form;
pub mod page;
pub mod photos;
pub mod routes;
pub mod web;

pub use config::AppConfig;
pub use error::{EditorError, Result};
