// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Page bodies: login, editor and photos

use crate::catalog::Catalog;
use crate::config::EditorConfig;
use crate::form::render::escape;
use crate::form::StateLookup;
use crate::page::render_editor_body;
use crate::photos::{
    format_file_size, Photo, PhotoIntake, RoomType, ACCEPTED_MIME_TYPES, SUGGESTED_PHOTO_COUNT,
};
use crate::routes::Page;

use super::layout::{base_template, editor_layout};

/// Sign-in form; any credentials are accepted
pub fn render_login_page(from: Option<&str>) -> String {
    let from_input = match from {
        Some(from) => format!(r#"<input type="hidden" name="from" value="{}">"#, escape(from)),
        None => String::new(),
    };

    let content = format!(r#"<div class="mls-login-page">
    <div class="mls-login-card">
        <h1 class="mls-login-title">Sign in</h1>
        <p class="mls-login-note">Fake auth — any credentials work.</p>
        <form id="login-form" method="post" action="/login" novalidate>
            {}
            <div class="mls-field" data-field-name="username">
                <label for="login-username" class="mls-label">Username</label>
                <input id="login-username" name="username" type="text" class="mls-input" placeholder="Enter username" autocomplete="username">
            </div>
            <div class="mls-field" data-field-name="password">
                <label for="login-password" class="mls-label">Password</label>
                <input id="login-password" name="password" type="password" class="mls-input" placeholder="Enter password" autocomplete="current-password">
            </div>
            <button type="submit" id="login-submit" class="mls-login-submit">Sign in</button>
        </form>
    </div>
</div>"#, from_input);

    base_template("Sign in", &content)
}

/// Editor tab: sidebar plus every catalog section
pub fn render_editor_page(
    catalog: &Catalog,
    states: &dyn StateLookup,
    editor: &EditorConfig,
) -> String {
    let body = render_editor_body(catalog, states, editor.scroll_offset);
    let badge = catalog.required_count();
    let content = editor_layout(&editor.listing_title, Page::Editor, badge, &body);
    base_template("Editor", &content)
}

/// Photos tab in one of its three states: empty, dropzone, or grid
pub fn render_photos_page(
    intake: &PhotoIntake,
    show_upload: bool,
    editor: &EditorConfig,
    editor_badge: usize,
) -> String {
    let inner = if !intake.is_empty() {
        render_photo_grid(intake)
    } else if show_upload {
        render_dropzone()
    } else {
        render_photos_empty()
    };

    let body = format!(r#"<div class="mls-photos-main" id="photos-main-content">
{}
<input type="file" id="photo-file-input" class="mls-hidden-input" multiple accept="{}">
</div>"#, inner, ACCEPTED_MIME_TYPES.join(","));

    let content = editor_layout(&editor.listing_title, Page::Photos, editor_badge, &body);
    base_template("Photos", &content)
}

fn render_photos_empty() -> String {
    r#"<div class="mls-photos-empty" id="photos-empty">
    <a href="/photos?upload=1" class="mls-btn mls-btn-primary" id="photos-add">Add Photos</a>
    <p class="mls-hint">Upload photos to showcase the property.</p>
</div>"#.to_string()
}

fn render_dropzone() -> String {
    format!(r#"<div class="mls-photos-upload">
    <a href="/photos" class="mls-photos-upload-cancel" id="photos-upload-cancel">Cancel</a>
    <div class="mls-dropzone" id="photos-dropzone" data-drop-target data-action="browse">
        <h3>Drag and drop your files</h3>
        <button type="button" class="mls-btn mls-btn-primary" id="photos-browse" data-action="browse">Browse Photos</button>
        <p class="mls-dropzone-note">Select up to {} photos. JPEG, HEIF, or HEIC</p>
    </div>
</div>"#, SUGGESTED_PHOTO_COUNT)
}

fn render_photo_grid(intake: &PhotoIntake) -> String {
    let cards: String = intake.photos().iter().map(render_photo_card).collect();
    format!(r#"<div class="mls-photos-toolbar">
    <h2 class="mls-photos-count" id="photos-count">Photos ({})</h2>
    <button type="button" class="mls-btn mls-btn-secondary" id="photos-add" data-action="browse">Add Photos</button>
</div>
<div class="mls-photo-grid" id="photos-grid" data-drop-target>{}</div>"#, intake.len(), cards)
}

fn render_photo_card(photo: &Photo) -> String {
    let rooms: String = RoomType::ALL
        .iter()
        .map(|room| {
            format!(
                r#"<option value="{label}"{selected}>{label}</option>"#,
                label = escape(room.label()),
                selected = if photo.room_type == Some(*room) { " selected" } else { "" },
            )
        })
        .collect();

    let warning = if photo.is_supported_type() {
        String::new()
    } else {
        format!(r#"<p class="mls-photo-warning">Unsupported type {}</p>"#, escape(&photo.mime))
    };

    format!(
        r#"<div class="mls-photo-card" id="photo-{id}" data-photo-id="{id}">
    <div class="mls-photo-preview">
        <img src="{src}" alt="{name}">
        <form method="post" action="/api/photos/{id}/delete" class="mls-photo-remove-form"><button type="submit" class="mls-photo-remove" title="Remove photo" aria-label="Remove {name}">&times;</button></form>
    </div>
    <div class="mls-photo-body">
        <div class="mls-photo-info"><span class="mls-photo-name" title="{name}">{name}</span><span class="mls-photo-size">{size}</span></div>
        {warning}
        <select name="room_type" class="mls-input mls-photo-room"><option value="" disabled{unset}>Select Room...</option>{rooms}</select>
        <input type="text" name="description" class="mls-input mls-photo-description" placeholder="Enter description..." value="{description}">
    </div>
</div>"#,
        id = photo.id,
        src = photo.preview_url(),
        name = escape(&photo.name),
        size = format_file_size(photo.size),
        warning = warning,
        unset = if photo.room_type.is_none() { " selected" } else { "" },
        rooms = rooms,
        description = escape(&photo.description),
    )
}
