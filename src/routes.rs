// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Route table and guard decisions

use axum::http::Uri;

/// Pages the shell can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Editor,
    Photos,
}

/// Outcome of resolving a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Page),
    Redirect(String),
}

pub const LOGIN_PATH: &str = "/login";
pub const EDITOR_PATH: &str = "/editor";
pub const PHOTOS_PATH: &str = "/photos";

/// Where to send an unauthenticated request for a guarded path, or `None`
/// when the request may proceed
pub fn guard(path: &str, authenticated: bool) -> Option<String> {
    if authenticated {
        None
    } else {
        Some(login_redirect(path))
    }
}

/// Resolve a page path for the given authentication state
pub fn resolve(path: &str, authenticated: bool) -> RouteDecision {
    let page = match path {
        LOGIN_PATH => return RouteDecision::Render(Page::Login),
        "/" => None,
        EDITOR_PATH => Some(Page::Editor),
        PHOTOS_PATH => Some(Page::Photos),
        _ => return RouteDecision::Redirect("/".to_string()),
    };

    if let Some(target) = guard(path, authenticated) {
        return RouteDecision::Redirect(target);
    }

    match page {
        Some(page) => RouteDecision::Render(page),
        None => RouteDecision::Redirect(EDITOR_PATH.to_string()),
    }
}

/// Login URL remembering the originally requested path
pub fn login_redirect(from: &str) -> String {
    format!("{}?from={}", LOGIN_PATH, encode_path(from))
}

/// Where to go after signing in: the remembered path when it is a local one,
/// else the editor
pub fn return_path(from: Option<&str>) -> String {
    match from {
        Some(path) if is_local_path(path) && path != LOGIN_PATH => path.to_string(),
        _ => EDITOR_PATH.to_string(),
    }
}

// Visible ASCII only, so the result is always a valid `Location` header and
// browsers cannot strip whitespace into a `//host` reference.
fn is_local_path(path: &str) -> bool {
    if !path.starts_with('/') || path.starts_with("//") || path.contains('\\') {
        return false;
    }
    if !path.bytes().all(|b| b.is_ascii_graphic()) {
        return false;
    }
    match path.parse::<Uri>() {
        Ok(uri) => uri.scheme().is_none() && uri.authority().is_none(),
        Err(_) => false,
    }
}

fn encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
