// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Page chrome shared by every screen: document shell, global header and tabs

use crate::form::render::escape;
use crate::routes::Page;

/// Wrap page content in the HTML document with styles and the page script
pub fn base_template(title: &str, content: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Listing Editor</title>
    <style>{}</style>
</head>
<body>
{}
<script>{}</script>
</body>
</html>"#, escape(title), STYLES, content, SCRIPT)
}

/// Header bar above the tabs. Save and publish are inert; cancel signs out.
pub fn render_global_header(listing_title: &str) -> String {
    format!(r#"<header class="mls-global-header" id="editor-global-header">
    <div class="mls-header-row">
        <h1 class="mls-listing-title" id="header-listing-title">{}</h1>
        <div class="mls-header-actions">
            <button type="button" class="mls-btn mls-btn-save-incomplete" id="header-save-incomplete">Save as Incomplete</button>
            <button type="button" class="mls-btn mls-btn-publish" id="header-publish">Publish Listing</button>
            <form method="post" action="/logout" class="mls-inline-form">
                <button type="submit" class="mls-btn mls-btn-cancel" id="header-cancel">Cancel Input</button>
            </form>
        </div>
    </div>
    <div class="mls-header-toggles">
        <label class="mls-toggle-label"><span>Expand Data Source</span><input type="checkbox" class="mls-toggle mls-toggle-expand-data" id="toggle-expand-data"></label>
        <label class="mls-toggle-label"><span>View Full Form</span><input type="checkbox" class="mls-toggle mls-toggle-view-full-form" id="toggle-view-full-form" checked></label>
    </div>
</header>"#, escape(listing_title))
}

/// Editor / Photos tab strip; the Editor tab shows the required-field total
pub fn render_tabs(active: Page, editor_badge: usize) -> String {
    let class = |page: Page| if page == active { " mls-tab-active" } else { "" };
    let current = |page: Page| if page == active { r#" aria-current="page""# } else { "" };
    let badge = if editor_badge > 0 {
        format!(
            r#"<span class="mls-tab-badge" aria-label="{count} required">{count}</span>"#,
            count = editor_badge
        )
    } else {
        String::new()
    };

    format!(r#"<nav class="mls-editor-tabs" id="editor-tabs" aria-label="Editor tabs">
    <a href="/editor" class="mls-tab mls-tab-editor{}" id="tab-editor"{}>Editor{}</a>
    <a href="/photos" class="mls-tab mls-tab-photos{}" id="tab-photos"{}>Photos</a>
</nav>"#,
        class(Page::Editor), current(Page::Editor), badge,
        class(Page::Photos), current(Page::Photos),
    )
}

/// Header, tabs and the page body in the full-height editor frame
pub fn editor_layout(listing_title: &str, active: Page, editor_badge: usize, body: &str) -> String {
    format!(r#"<div class="mls-editor-layout">
{}
{}
<div class="mls-editor-body">
{}
</div>
</div>"#, render_global_header(listing_title), render_tabs(active, editor_badge), body)
}

const STYLES: &str = r#"
:root {
    --teal-dark: #115e59;
    --teal: #0d9488;
    --teal-light: #ccfbf1;
    --gray-50: #f9fafb;
    --gray-200: #e5e7eb;
    --gray-300: #d1d5db;
    --gray-500: #6b7280;
    --gray-700: #374151;
    --gray-900: #111827;
    --red: #ef4444;
}
* { box-sizing: border-box; }
body { margin: 0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; color: var(--gray-900); background: var(--gray-50); }
.sr-only { position: absolute; width: 1px; height: 1px; padding: 0; margin: -1px; overflow: hidden; clip: rect(0,0,0,0); border: 0; }
.mls-editor-layout { display: flex; flex-direction: column; height: 100vh; overflow: hidden; }
.mls-global-header { background: var(--teal-dark); color: white; padding: 12px 16px; border-bottom: 1px solid var(--gray-200); }
.mls-header-row { display: flex; flex-wrap: wrap; justify-content: space-between; align-items: center; gap: 16px; }
.mls-listing-title { font-size: 1.125rem; margin: 0; }
.mls-header-actions { display: flex; gap: 8px; align-items: center; }
.mls-inline-form { display: inline; margin: 0; }
.mls-btn { border-radius: 4px; padding: 6px 12px; font-size: 0.875rem; cursor: pointer; border: 1px solid transparent; }
.mls-btn-save-incomplete { background: #0f766e; color: white; border-color: var(--teal); }
.mls-btn-publish { background: var(--teal); color: white; }
.mls-btn-cancel { background: white; color: var(--gray-700); border-color: var(--gray-300); }
.mls-btn-primary { background: var(--teal); color: white; }
.mls-btn-secondary { background: var(--gray-200); color: var(--gray-700); }
.mls-header-toggles { display: flex; gap: 16px; margin-top: 8px; font-size: 0.875rem; }
.mls-toggle-label { display: flex; gap: 8px; align-items: center; }
.mls-editor-tabs { display: flex; background: white; border-bottom: 1px solid var(--gray-200); }
.mls-tab { display: flex; gap: 8px; align-items: center; padding: 12px 16px; font-size: 0.875rem; color: var(--gray-500); text-decoration: none; border-bottom: 2px solid transparent; }
.mls-tab-active { color: var(--teal-dark); border-bottom-color: var(--teal); }
.mls-tab-badge, .mls-sidebar-badge { background: var(--red); color: white; border-radius: 9999px; padding: 1px 8px; font-size: 0.75rem; }
.mls-editor-body { display: flex; flex: 1; min-height: 0; overflow: hidden; }
.mls-editor-sidebar { width: 260px; flex-shrink: 0; overflow-y: auto; background: white; border-right: 1px solid var(--gray-200); padding: 12px; }
.mls-sidebar-title { font-size: 1rem; margin: 0 0 8px; }
.mls-sidebar-nav ul { list-style: none; margin: 0; padding: 0; }
.mls-sidebar-item { display: flex; justify-content: space-between; padding: 6px 8px; border-radius: 4px; color: var(--gray-700); text-decoration: none; font-size: 0.875rem; }
.mls-sidebar-item-active { background: var(--teal-light); color: var(--teal-dark); font-weight: 600; }
.mls-sidebar-required-only li:not(:has(.mls-sidebar-badge)) { display: none; }
.mls-editor-main { flex: 1; overflow-y: auto; padding: 24px; }
.mls-section { background: white; border: 1px solid var(--gray-200); border-radius: 8px; padding: 16px 20px; margin-bottom: 24px; }
.mls-section-title { font-size: 1.125rem; margin: 0 0 12px; }
.mls-subsection { border-top: 1px solid var(--gray-200); padding-top: 12px; margin-top: 12px; }
.mls-subsection-title { font-size: 1rem; margin: 0 0 8px; }
.mls-section-description, .mls-subsection-description, .mls-hint { color: var(--gray-500); font-size: 0.8125rem; }
.mls-section-fields, .mls-subsection-fields { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 16px; }
.mls-field { display: flex; flex-direction: column; gap: 4px; border: 0; padding: 0; margin: 0; }
.mls-label { font-size: 0.875rem; font-weight: 500; color: var(--gray-700); }
.mls-required { color: var(--red); margin-left: 2px; }
.mls-input { border: 1px solid var(--gray-300); border-radius: 4px; padding: 6px 8px; font-size: 0.875rem; }
.mls-input-checkbox, .mls-input-radio { width: auto; }
.mls-field-checkbox { flex-direction: row; align-items: center; }
.mls-date-wrapper { display: flex; gap: 4px; position: relative; }
.mls-date-picker-btn { border: 1px solid var(--gray-300); background: white; border-radius: 4px; cursor: pointer; }
.mls-yesno-buttons { display: flex; gap: 8px; }
.mls-yesno-btn { padding: 6px 16px; border: 1px solid var(--gray-300); background: white; border-radius: 4px; cursor: pointer; }
.mls-yesno-btn-active { background: var(--teal); color: white; border-color: var(--teal); }
.mls-field-error { color: var(--red); font-size: 0.8125rem; margin: 0; }
.mls-multiselect { position: relative; }
.mls-input-multiselect { min-height: 34px; display: flex; flex-wrap: wrap; gap: 4px; cursor: pointer; }
.mls-multiselect-empty { color: var(--gray-500); }
.mls-multiselect-chip { background: var(--teal-light); border-radius: 9999px; padding: 1px 8px; font-size: 0.8125rem; }
.mls-multiselect-remove { border: 0; background: transparent; cursor: pointer; }
.mls-multiselect-options { list-style: none; margin: 4px 0 0; padding: 4px; border: 1px solid var(--gray-300); border-radius: 4px; background: white; max-height: 220px; overflow-y: auto; }
.mls-multiselect-option { display: flex; gap: 6px; padding: 4px; cursor: pointer; }
.mls-map-placeholder { height: 200px; display: flex; align-items: center; justify-content: center; background: var(--gray-200); color: var(--gray-500); border-radius: 8px; grid-column: 1 / -1; }
.mls-login-page { min-height: 100vh; display: flex; align-items: center; justify-content: center; padding: 16px; }
.mls-login-card { width: 100%; max-width: 380px; background: white; border: 1px solid var(--gray-200); border-radius: 8px; padding: 24px; }
.mls-login-title { text-align: center; font-size: 1.25rem; margin: 0; }
.mls-login-note { text-align: center; color: var(--gray-500); font-size: 0.875rem; }
.mls-login-card form { display: flex; flex-direction: column; gap: 16px; margin-top: 24px; }
.mls-login-submit { background: var(--teal); color: white; border: 0; border-radius: 4px; padding: 8px 16px; cursor: pointer; }
.mls-photos-main { flex: 1; overflow-y: auto; padding: 32px; }
.mls-photos-empty { display: flex; flex-direction: column; align-items: center; justify-content: center; height: 100%; }
.mls-dropzone { display: flex; flex-direction: column; align-items: center; padding: 48px; border: 2px dashed var(--gray-300); border-radius: 12px; background: white; cursor: pointer; max-width: 760px; margin: 0 auto; }
.mls-dropzone-active { border-color: var(--teal); background: var(--teal-light); }
.mls-dropzone-note { color: var(--gray-500); font-size: 0.75rem; }
.mls-photos-toolbar { display: flex; justify-content: space-between; align-items: center; margin-bottom: 24px; }
.mls-photo-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 24px; border: 2px dashed transparent; border-radius: 12px; padding: 16px; min-height: 200px; }
.mls-photo-card { background: white; border: 1px solid var(--gray-200); border-radius: 8px; overflow: hidden; display: flex; flex-direction: column; }
.mls-photo-preview { position: relative; aspect-ratio: 4 / 3; background: var(--gray-200); }
.mls-photo-preview img { width: 100%; height: 100%; object-fit: cover; }
.mls-photo-remove-form { position: absolute; top: 8px; right: 8px; margin: 0; }
.mls-photo-remove { border: 0; border-radius: 9999px; background: rgba(0,0,0,0.5); color: white; width: 26px; height: 26px; cursor: pointer; }
.mls-photo-body { display: flex; flex-direction: column; gap: 12px; padding: 12px; }
.mls-photo-info { display: flex; justify-content: space-between; font-size: 0.75rem; color: var(--gray-500); border-bottom: 1px solid var(--gray-200); padding-bottom: 8px; }
.mls-photo-warning { color: var(--red); font-size: 0.75rem; margin: 0; }
.mls-hidden-input { display: none; }
"#;

const SCRIPT: &str = r#"
(function () {
    function fieldRoot(el) { return el.closest('[data-field-name]'); }

    function sendFieldEvent(el, event) {
        var root = fieldRoot(el);
        var section = el.closest('[data-section-id]');
        if (!root || !section) return;
        var listbox = root.querySelector('.mls-multiselect-options');
        var open = listbox && !listbox.hidden;
        var url = '/api/fields/' + encodeURIComponent(section.dataset.sectionId) + '/' + encodeURIComponent(root.dataset.fieldName);
        fetch(url, { method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(event) })
            .then(function (r) { return r.ok ? r.text() : null; })
            .then(function (html) {
                if (html === null) return;
                var holder = document.createElement('div');
                holder.innerHTML = html;
                var fresh = holder.firstElementChild;
                if (!fresh) return;
                root.replaceWith(fresh);
                if (open) {
                    var box = fresh.querySelector('.mls-multiselect-options');
                    if (box) box.hidden = false;
                }
            });
    }

    function openPicker(button) {
        var native = button.parentElement.querySelector('[data-action="pick-date"]');
        if (!native) return;
        try {
            if (typeof native.showPicker === 'function') { native.showPicker(); return; }
        } catch (e) { }
        native.focus();
        native.click();
    }

    document.addEventListener('click', function (e) {
        var target = e.target.closest('[data-action]');
        if (target) {
            var action = target.dataset.action;
            if (action === 'open-picker') { openPicker(target); return; }
            if (target.tagName === 'BUTTON' && action === 'choose') { sendFieldEvent(target, { action: 'choose', value: target.dataset.value }); return; }
            if (action === 'toggle') { sendFieldEvent(target, { action: 'toggle', value: target.dataset.value }); return; }
            if (action === 'remove') { e.stopPropagation(); sendFieldEvent(target, { action: 'remove', value: target.dataset.value }); return; }
        }
        var combo = e.target.closest('.mls-input-multiselect');
        if (combo) {
            var box = combo.parentElement.querySelector('.mls-multiselect-options');
            if (box) { box.hidden = !box.hidden; combo.setAttribute('aria-expanded', String(!box.hidden)); }
        }
    });

    document.addEventListener('change', function (e) {
        var el = e.target;
        if (!el.closest || !el.closest('.mls-editor-main')) return;
        var action = el.dataset.action;
        if (action === 'pick-date') { sendFieldEvent(el, { action: 'pick_date', value: el.value }); }
        else if (action === 'check') { sendFieldEvent(el, { action: 'check', checked: el.checked }); }
        else if (action === 'choose') { sendFieldEvent(el, { action: 'choose', value: el.value }); }
        else if (el.classList.contains('mls-input')) { sendFieldEvent(el, { action: 'input', value: el.value }); }
    });

    var main = document.getElementById('editor-main-content');
    var sidebar = document.getElementById('editor-sidebar');
    if (main && sidebar) {
        var offset = parseFloat(main.dataset.scrollOffset || '24');
        var links = sidebar.querySelectorAll('[data-section-id]');

        function bounds() {
            var origin = main.getBoundingClientRect().top - main.scrollTop;
            return Array.prototype.map.call(main.querySelectorAll('section[data-section-id]'), function (s) {
                var r = s.getBoundingClientRect();
                return { id: s.dataset.sectionId, top: r.top - origin, height: r.height };
            });
        }

        function activeSection(list, scrollTop, height) {
            var center = scrollTop + height / 2, current = null;
            for (var i = 0; i < list.length; i++) {
                var s = list[i];
                if (center >= s.top && center <= s.top + s.height) return s.id;
                if (center >= s.top) current = s.id;
            }
            return current || (list.length ? list[0].id : null);
        }

        function highlight() {
            var active = activeSection(bounds(), main.scrollTop, main.clientHeight);
            links.forEach(function (link) {
                var on = link.dataset.sectionId === active;
                link.classList.toggle('mls-sidebar-item-active', on);
                if (on) link.setAttribute('aria-current', 'true'); else link.removeAttribute('aria-current');
            });
        }

        links.forEach(function (link) {
            link.addEventListener('click', function (e) {
                var section = document.getElementById(link.dataset.sectionId);
                if (!section) return;
                e.preventDefault();
                var top = main.scrollTop + (section.getBoundingClientRect().top - main.getBoundingClientRect().top) - offset;
                main.scrollTo({ top: top, behavior: 'smooth' });
            });
        });

        main.addEventListener('scroll', highlight, { passive: true });
        if (window.ResizeObserver) new ResizeObserver(highlight).observe(main);
        highlight();

        var requiredOnly = document.getElementById('sidebar-required-only');
        if (requiredOnly) requiredOnly.addEventListener('change', function () {
            sidebar.classList.toggle('mls-sidebar-required-only', requiredOnly.checked);
        });
    }

    var photos = document.getElementById('photos-main-content');
    if (photos) {
        var input = document.getElementById('photo-file-input');

        function upload(files) {
            if (!files || !files.length) return;
            var data = new FormData();
            Array.prototype.forEach.call(files, function (f) { data.append('files', f, f.name); });
            fetch('/api/photos', { method: 'POST', body: data }).then(function () { window.location.href = '/photos'; });
        }

        document.querySelectorAll('[data-action="browse"]').forEach(function (b) {
            b.addEventListener('click', function (e) { e.stopPropagation(); if (input) input.click(); });
        });
        if (input) input.addEventListener('change', function () { upload(input.files); input.value = ''; });

        document.querySelectorAll('[data-drop-target]').forEach(function (zone) {
            zone.addEventListener('dragover', function (e) { e.preventDefault(); zone.classList.add('mls-dropzone-active'); });
            zone.addEventListener('dragleave', function (e) { e.preventDefault(); zone.classList.remove('mls-dropzone-active'); });
            zone.addEventListener('drop', function (e) {
                e.preventDefault();
                zone.classList.remove('mls-dropzone-active');
                if (e.dataTransfer && e.dataTransfer.files.length) upload(e.dataTransfer.files);
            });
        });

        photos.addEventListener('change', function (e) {
            var card = e.target.closest('[data-photo-id]');
            if (!card || !e.target.name) return;
            var body = new URLSearchParams();
            body.append(e.target.name, e.target.value);
            fetch('/api/photos/' + card.dataset.photoId, { method: 'POST', body: body });
        });
    }
})();
"#;
