//! Input handling — maps key events and request results to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use crate::config::Action;
use crate::core::{
    filter::{self, CriteriaPatch},
    folders,
    gallery::FetchOutcome,
    upload,
    zoom::ZoomState,
};
use crate::ui::theme::Theme;

use super::api_runtime::ApiUpdate;
use super::state::{
    ActiveView, AppState, Effect, FolderPicker, Lightbox, NoticeKind, PaneFocus, PendingUpload, Prompt,
    PromptKind,
};

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    if state.folder_picker.is_some() {
        handle_picker_key(state, key);
        return;
    }
    if state.prompt.is_some() {
        handle_prompt_key(state, key);
        return;
    }

    match state.active_view {
        ActiveView::Gallery => handle_gallery_key(state, key),
        ActiveView::Lightbox => handle_lightbox_key(state, key),
        ActiveView::Info => handle_info_key(state, key),
    }
}

// ── Gallery view (configurable bindings) ────────────────────────

fn handle_gallery_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Home => {
            active_cursor(state).reset();
            return;
        }
        KeyCode::End => {
            let len = active_len(state);
            active_cursor(state).selected = len.saturating_sub(1);
            return;
        }
        _ => {}
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };

    match action {
        Action::Quit => state.should_quit = true,
        Action::MoveUp => active_cursor(state).select_prev(),
        Action::MoveDown => {
            let len = active_len(state);
            active_cursor(state).select_next(len);
        }
        Action::SwitchPane => {
            state.focus = match state.focus {
                PaneFocus::Folders => PaneFocus::Images,
                PaneFocus::Images => PaneFocus::Folders,
            };
        }
        Action::Expand => match state.focus {
            PaneFocus::Folders => expand_selected_folder(state),
            PaneFocus::Images => {}
        },
        Action::Collapse => match state.focus {
            PaneFocus::Folders => collapse_selected_folder(state),
            PaneFocus::Images => state.focus = PaneFocus::Folders,
        },
        Action::Open => match state.focus {
            PaneFocus::Folders => {
                if let Some(row) = state.selected_folder_row() {
                    open_folder(state, row.path);
                    state.focus = PaneFocus::Images;
                }
            }
            PaneFocus::Images => open_lightbox(state),
        },
        Action::ParentFolder => {
            let current = state.gallery.current_folder().to_string();
            if !current.is_empty() {
                open_folder(state, folders::parent_path(&current).to_string());
            }
        }
        Action::ShowInfo => {
            if state.info_target().is_some() {
                state.active_view = ActiveView::Info;
            }
        }
        Action::FilterName => {
            let current = state.gallery.criteria().name_pattern.clone();
            state.prompt = Some(Prompt::new(PromptKind::FilterName, current));
        }
        Action::CycleSize => {
            let next = state.gallery.criteria().size_class.cycle();
            update_criteria(state, CriteriaPatch::size(next));
        }
        Action::CycleAge => {
            let next = filter::cycle_age(state.gallery.criteria().max_age_days);
            update_criteria(state, CriteriaPatch::max_age(next));
        }
        Action::ClearFilters => {
            state.gallery.clear_criteria();
            state.image_cursor.reset();
        }
        Action::CreateFolder => {
            state.prompt = Some(Prompt::new(PromptKind::CreateFolder, ""));
        }
        Action::Upload => {
            state.pending_upload = None;
            state.prompt = Some(Prompt::new(PromptKind::UploadPath, ""));
        }
        Action::Refresh => {
            let ticket = state.gallery.refresh();
            state.effects.push(Effect::FetchFolders);
            state.effects.push(Effect::FetchImages(ticket));
        }
        Action::ToggleTheme => {
            state.config.theme = state.config.theme.toggled();
            Theme::set_mode(state.config.theme);
            state.effects.push(Effect::SaveConfig(state.config.clone()));
        }
    }
}

fn active_cursor(state: &mut AppState) -> &mut crate::ui::cursor::ListCursor {
    match state.focus {
        PaneFocus::Folders => &mut state.folder_cursor,
        PaneFocus::Images => &mut state.image_cursor,
    }
}

fn active_len(state: &AppState) -> usize {
    match state.focus {
        PaneFocus::Folders => state.folder_rows().len(),
        PaneFocus::Images => state.gallery.filtered().len(),
    }
}

fn expand_selected_folder(state: &mut AppState) {
    let Some(row) = state.selected_folder_row() else {
        return;
    };
    if row.has_children {
        state.expanded.insert(row.path);
    }
}

/// Collapse the selected folder, or jump to its parent row when it is
/// already collapsed.
fn collapse_selected_folder(state: &mut AppState) {
    let Some(row) = state.selected_folder_row() else {
        return;
    };
    if state.expanded.remove(&row.path) {
        return;
    }
    if row.path.is_empty() {
        return;
    }
    let parent = folders::parent_path(&row.path);
    if let Some(index) = state.folder_rows().iter().position(|r| r.path == parent) {
        state.folder_cursor.selected = index;
    }
}

/// Switch the gallery to `path` and queue the listing fetch.
pub fn open_folder(state: &mut AppState, path: String) {
    let ticket = state.gallery.set_folder(path);
    state.effects.push(Effect::FetchImages(ticket));
    state.image_cursor.reset();
    reveal_folder(state);
}

/// Expand the sidebar down to the current folder and highlight it.
fn reveal_folder(state: &mut AppState) {
    let current = state.gallery.current_folder().to_string();
    let mut ancestor = folders::parent_path(&current);
    while !ancestor.is_empty() {
        state.expanded.insert(ancestor.to_string());
        ancestor = folders::parent_path(ancestor);
    }
    if let Some(index) = state.folder_rows().iter().position(|r| r.path == current) {
        state.folder_cursor.selected = index;
    }
}

fn update_criteria(state: &mut AppState, patch: CriteriaPatch) {
    state.gallery.set_criteria(patch);
    state.image_cursor.clamp(state.gallery.filtered().len());
}

// ── Prompts ─────────────────────────────────────────────────────

fn handle_prompt_key(state: &mut AppState, key: KeyEvent) {
    let Some(prompt) = state.prompt.as_mut() else {
        return;
    };
    let kind = prompt.kind;

    match key.code {
        KeyCode::Esc => {
            state.prompt = None;
            if kind == PromptKind::UploadPassword {
                state.pending_upload = None;
            }
        }
        KeyCode::Enter => {
            if let Some(prompt) = state.prompt.take() {
                submit_prompt(state, prompt);
            }
        }
        KeyCode::Backspace => {
            prompt.input.pop();
            if kind == PromptKind::FilterName {
                let text = prompt.input.clone();
                update_criteria(state, CriteriaPatch::name(text));
            }
        }
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            prompt.input.push(ch);
            if kind == PromptKind::FilterName {
                let text = prompt.input.clone();
                update_criteria(state, CriteriaPatch::name(text));
            }
        }
        _ => {}
    }
}

fn submit_prompt(state: &mut AppState, prompt: Prompt) {
    match prompt.kind {
        // Already applied while typing.
        PromptKind::FilterName => {}
        PromptKind::CreateFolder => {
            let parent = state.gallery.current_folder().to_string();
            match state.gallery.create_folder(&prompt.input, &parent) {
                Ok(request) => {
                    state.notify(NoticeKind::Info, format!("Creating folder {}…", request.path()));
                    state.effects.push(Effect::CreateFolder(request));
                }
                Err(err) => state.notify(NoticeKind::Error, err.to_string()),
            }
        }
        PromptKind::UploadPath => submit_upload_path(state, &prompt.input),
        PromptKind::UploadPassword => queue_uploads(state, &prompt.input),
    }
}

fn submit_upload_path(state: &mut AppState, input: &str) {
    let paths = upload::split_paths(input);
    if paths.is_empty() {
        state.notify(NoticeKind::Error, "No file selected");
        return;
    }

    let (files, rejected) = upload::collect_files(&paths);
    if let Some(err) = rejected.first() {
        warn!(rejected = rejected.len(), error = %err, "skipping files that cannot be uploaded");
    }
    if files.is_empty() {
        let reason = rejected
            .first()
            .map_or_else(|| "no supported files found".to_string(), ToString::to_string);
        state.notify(NoticeKind::Error, reason);
        return;
    }
    if !rejected.is_empty() {
        state.notify(
            NoticeKind::Info,
            format!("Skipping {} unsupported file(s)", rejected.len()),
        );
    }

    let current = state.gallery.current_folder();
    let folder = (!current.is_empty() && current != "root").then(|| current.to_string());
    state.pending_upload = Some(PendingUpload { files, folder });
    continue_upload(state);
}

/// Move the pending upload to its next step: destination, then password,
/// then the requests themselves.
fn continue_upload(state: &mut AppState) {
    let Some(pending) = &state.pending_upload else {
        return;
    };
    if pending.folder.is_none() {
        open_folder_picker(state);
        return;
    }
    // No answer yet from the password check counts as protected.
    if state.password_protected == Some(false) {
        queue_uploads(state, "");
    } else {
        state.prompt = Some(Prompt::new(PromptKind::UploadPassword, ""));
    }
}

fn open_folder_picker(state: &mut AppState) {
    let entries = folders::flatten(&state.folders);
    if entries.is_empty() {
        state.pending_upload = None;
        state.notify(
            NoticeKind::Error,
            "Uploads need a destination folder; create one first",
        );
        return;
    }
    state.folder_picker = Some(FolderPicker::new(entries));
}

fn handle_picker_key(state: &mut AppState, key: KeyEvent) {
    let Some(picker) = state.folder_picker.as_mut() else {
        return;
    };
    let len = picker.entries.len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.folder_picker = None;
            state.pending_upload = None;
            state.notify(NoticeKind::Info, "Upload cancelled");
        }
        KeyCode::Up | KeyCode::Char('k') => picker.cursor.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => picker.cursor.select_next(len),
        KeyCode::Home => picker.cursor.reset(),
        KeyCode::End => picker.cursor.selected = len.saturating_sub(1),
        KeyCode::Enter => {
            let chosen = picker.selected().map(|e| e.path.clone());
            state.folder_picker = None;
            if let (Some(path), Some(pending)) = (chosen, state.pending_upload.as_mut()) {
                pending.folder = Some(path);
            }
            continue_upload(state);
        }
        _ => {}
    }
}

/// One upload request per pending file.
fn queue_uploads(state: &mut AppState, password: &str) {
    let Some(PendingUpload {
        files,
        folder: Some(folder),
    }) = state.pending_upload.take()
    else {
        return;
    };
    let protected = state.password_protected != Some(false);

    let mut queued = Vec::new();
    let mut failure = None;
    for file in &files {
        match upload::prepare_upload(file, &folder, protected, password) {
            Ok(request) => queued.push(request),
            Err(err) => failure = Some(err),
        }
    }

    let summary = match queued.as_slice() {
        [only] => only.file_name.clone(),
        many => format!("{} files", many.len()),
    };
    state.uploads_in_flight += queued.len();
    let count = queued.len();
    state.effects.extend(queued.into_iter().map(Effect::Upload));

    match (count, failure) {
        (_, None) => state.notify(NoticeKind::Info, format!("Uploading {summary} to {folder}…")),
        (0, Some(err)) => state.notify(NoticeKind::Error, err.to_string()),
        (_, Some(err)) => state.notify(
            NoticeKind::Error,
            format!("Uploading {summary} to {folder}; some files were refused: {err}"),
        ),
    }
}

// ── Lightbox ────────────────────────────────────────────────────

/// Open the lightbox on the highlighted image.
fn open_lightbox(state: &mut AppState) {
    let Some(record) = state.selected_image().cloned() else {
        return;
    };
    let viewer = state.gallery.select_image(&record);
    state.lightbox = Some(Lightbox {
        viewer,
        zoom: ZoomState::default(),
        generation: 0,
        image: None,
        error: None,
    });
    state.active_view = ActiveView::Lightbox;
    request_preview(state);
}

/// Ask for the lightbox's current image, superseding any load in flight.
fn request_preview(state: &mut AppState) {
    state.preview_generation = state.preview_generation.wrapping_add(1);
    let generation = state.preview_generation;
    let Some(lb) = state.lightbox.as_mut() else {
        return;
    };
    lb.generation = generation;
    lb.image = None;
    lb.error = None;
    lb.zoom.reset();
    let path = lb.viewer.current().path.clone();
    state.effects.push(Effect::LoadPreview { generation, path });
}

fn close_lightbox(state: &mut AppState) {
    if let Some(lb) = state.lightbox.take() {
        lb.viewer.close();
    }
    state.active_view = ActiveView::Gallery;
}

fn handle_lightbox_key(state: &mut AppState, key: KeyEvent) {
    let Some(lb) = state.lightbox.as_mut() else {
        state.active_view = ActiveView::Gallery;
        return;
    };

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => close_lightbox(state),
        KeyCode::Left | KeyCode::Char('h') => {
            if lb.viewer.step_backward() {
                follow_viewer(state);
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if lb.viewer.step_forward() {
                follow_viewer(state);
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') => lb.zoom.zoom_in(),
        KeyCode::Char('-') => lb.zoom.zoom_out(),
        KeyCode::Char('0') => lb.zoom.reset(),
        KeyCode::Char('w') | KeyCode::Up => lb.zoom.pan(0, -1),
        KeyCode::Char('s') | KeyCode::Down => lb.zoom.pan(0, 1),
        KeyCode::Char('a') => lb.zoom.pan(-1, 0),
        KeyCode::Char('d') => lb.zoom.pan(1, 0),
        KeyCode::Char('i') => state.active_view = ActiveView::Info,
        _ => {}
    }
}

/// The viewer moved: load the new image and keep the list highlight on it.
fn follow_viewer(state: &mut AppState) {
    if let Some(lb) = &state.lightbox {
        let path = &lb.viewer.current().path;
        if let Some(index) = state.gallery.filtered().iter().position(|r| &r.path == path) {
            state.image_cursor.selected = index;
        }
    }
    request_preview(state);
}

// ── Info popup ──────────────────────────────────────────────────

fn handle_info_key(state: &mut AppState, key: KeyEvent) {
    if matches!(
        key.code,
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char('q')
    ) {
        state.active_view = if state.lightbox.is_some() {
            ActiveView::Lightbox
        } else {
            ActiveView::Gallery
        };
    }
}

// ── Request results ─────────────────────────────────────────────

/// Fold a finished request back into the state.
pub fn apply_update(state: &mut AppState, update: ApiUpdate) {
    match update {
        ApiUpdate::FoldersLoaded { result } => match result {
            Ok(tree) => {
                state.folders = tree;
                let tree = &state.folders;
                state.expanded.retain(|path| folders::find(tree, path).is_some());
                reveal_folder(state);
                let rows = state.folder_rows().len();
                state.folder_cursor.clamp(rows);
            }
            Err(err) => {
                warn!(error = %err, "folder tree unavailable");
                state.folders.clear();
                state.folder_cursor.clamp(1);
                state.notify(NoticeKind::Error, format!("Failed to load folders: {err}"));
            }
        },
        ApiUpdate::ImagesLoaded { ticket, result } => {
            match state.gallery.images_loaded(&ticket, result) {
                FetchOutcome::Applied(_) => {
                    state.image_cursor.clamp(state.gallery.filtered().len());
                }
                FetchOutcome::Stale => {}
                FetchOutcome::Failed(err) => {
                    state.image_cursor.reset();
                    state.notify(NoticeKind::Error, format!("Failed to load images: {err}"));
                }
            }
        }
        ApiUpdate::FolderCreated { request, result } => match result {
            Ok(()) => {
                state.notify(NoticeKind::Success, format!("Created folder {}", request.path()));
                if !request.parent.is_empty() {
                    state.expanded.insert(request.parent.clone());
                }
                state.effects.push(Effect::FetchFolders);
                if let Some(ticket) = state.gallery.folder_created(&request) {
                    state.effects.push(Effect::FetchImages(ticket));
                }
            }
            Err(err) => state.notify(NoticeKind::Error, format!("Failed to create folder: {err}")),
        },
        ApiUpdate::UploadFinished { request, result } => {
            state.uploads_in_flight = state.uploads_in_flight.saturating_sub(1);
            match result {
                Ok(()) => {
                    state.notify(
                        NoticeKind::Success,
                        format!("Uploaded {} to {}", request.file_name, request.folder),
                    );
                    if let Some(ticket) = state.gallery.upload_finished(&request.folder) {
                        state.effects.push(Effect::FetchImages(ticket));
                    }
                }
                Err(err) => state.notify(NoticeKind::Error, format!("Upload failed: {err}")),
            }
        }
        ApiUpdate::ConfigSaved { result } => match result {
            Ok(path) => debug!(path = %path.display(), "config saved"),
            Err(err) => {
                warn!(error = %err, "could not save config");
                state.notify(NoticeKind::Error, format!("Could not save settings: {err:#}"));
            }
        },
        ApiUpdate::PasswordProbed { result } => match result {
            Ok(protected) => state.password_protected = Some(protected),
            Err(err) => warn!(error = %err, "password probe failed; assuming uploads are protected"),
        },
        ApiUpdate::PreviewLoaded {
            generation,
            path,
            result,
        } => {
            let Some(lb) = state.lightbox.as_mut().filter(|lb| lb.generation == generation) else {
                debug!(%path, generation, "discarding stale preview");
                return;
            };
            match result {
                Ok(image) => lb.image = Some(image),
                Err(err) => {
                    warn!(%path, error = %err, "preview failed");
                    lb.error = Some(format!("{err:#}"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};

    use super::*;
    use crate::config::AppConfig;
    use crate::core::error::GalleryError;
    use crate::core::filter::SizeClass;
    use crate::core::gallery::{FetchTicket, GalleryController};
    use crate::core::model::{Folder, ImageRecord};

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn app() -> AppState {
        AppState::new(AppConfig::default(), GalleryController::with_clock(fixed_now))
    }

    fn press(state: &mut AppState, code: KeyCode) {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(state: &mut AppState, text: &str) {
        for ch in text.chars() {
            press(state, KeyCode::Char(ch));
        }
    }

    fn rec(name: &str, size: u64) -> ImageRecord {
        ImageRecord {
            path: format!("trips/{name}"),
            name: name.into(),
            size,
            width: Some(4),
            height: Some(3),
            date: 1_699_990_000,
        }
    }

    fn take_ticket(state: &mut AppState) -> FetchTicket {
        let ticket = state.effects.iter().rev().find_map(|e| match e {
            Effect::FetchImages(t) => Some(t.clone()),
            _ => None,
        });
        state.effects.clear();
        ticket.expect("image fetch queued")
    }

    /// App showing `trips` with three images loaded.
    fn loaded_app() -> AppState {
        let mut state = app();
        open_folder(&mut state, "trips".into());
        let ticket = take_ticket(&mut state);
        apply_update(
            &mut state,
            ApiUpdate::ImagesLoaded {
                ticket,
                result: Ok(vec![rec("a.png", 10), rec("b.png", 5_000_000), rec("c.png", 20)]),
            },
        );
        state
    }

    #[test]
    fn opening_a_folder_from_the_sidebar_queues_a_fetch() {
        let mut state = app();
        apply_update(
            &mut state,
            ApiUpdate::FoldersLoaded {
                result: Ok(vec![Folder::leaf("2023"), Folder::leaf("2024")]),
            },
        );
        state.focus = PaneFocus::Folders;
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Enter);

        assert_eq!(state.gallery.current_folder(), "2024");
        assert_eq!(state.focus, PaneFocus::Images);
        assert_eq!(take_ticket(&mut state).folder, "2024");
    }

    #[test]
    fn stale_listing_is_ignored_after_switching_folders() {
        let mut state = app();
        open_folder(&mut state, "X".into());
        let x = take_ticket(&mut state);
        open_folder(&mut state, "Y".into());
        let y = take_ticket(&mut state);

        apply_update(&mut state, ApiUpdate::ImagesLoaded { ticket: y, result: Ok(vec![rec("y.png", 1)]) });
        apply_update(&mut state, ApiUpdate::ImagesLoaded { ticket: x, result: Ok(vec![rec("x.png", 1)]) });

        assert_eq!(state.gallery.current_folder(), "Y");
        assert_eq!(state.gallery.images()[0].name, "y.png");
    }

    #[test]
    fn failed_listing_shows_an_error_and_empties_the_grid() {
        let mut state = app();
        open_folder(&mut state, "X".into());
        let ticket = take_ticket(&mut state);
        apply_update(
            &mut state,
            ApiUpdate::ImagesLoaded {
                ticket,
                result: Err(GalleryError::network("connection refused")),
            },
        );
        assert!(state.gallery.filtered().is_empty());
        assert_eq!(state.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[test]
    fn name_filter_applies_while_typing() {
        let mut state = loaded_app();
        press(&mut state, KeyCode::Char('/'));
        type_text(&mut state, "C.");
        assert_eq!(state.gallery.filtered().len(), 1);
        press(&mut state, KeyCode::Backspace);
        press(&mut state, KeyCode::Backspace);
        assert_eq!(state.gallery.filtered().len(), 3);
        press(&mut state, KeyCode::Enter);
        assert!(state.prompt.is_none());
        assert!(state.effects.is_empty());
    }

    #[test]
    fn size_cycle_clamps_the_highlight() {
        let mut state = loaded_app();
        press(&mut state, KeyCode::End);
        assert_eq!(state.image_cursor.selected, 2);
        press(&mut state, KeyCode::Char('s'));
        assert_eq!(state.gallery.criteria().size_class, SizeClass::Small);
        assert_eq!(state.gallery.filtered().len(), 2);
        assert_eq!(state.image_cursor.selected, 1);
    }

    #[test]
    fn lightbox_walks_the_filtered_listing() {
        let mut state = loaded_app();
        press(&mut state, KeyCode::Char('s'));
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.active_view, ActiveView::Lightbox);
        assert!(matches!(state.effects.last(), Some(Effect::LoadPreview { path, .. }) if path == "trips/a.png"));

        press(&mut state, KeyCode::Right);
        let lb = state.lightbox.as_ref().unwrap();
        assert_eq!(lb.viewer.current().name, "c.png");
        assert_eq!(state.image_cursor.selected, 1);

        press(&mut state, KeyCode::Right);
        assert_eq!(state.lightbox.as_ref().unwrap().viewer.current().name, "c.png");

        press(&mut state, KeyCode::Esc);
        assert!(state.lightbox.is_none());
        assert_eq!(state.active_view, ActiveView::Gallery);
    }

    #[test]
    fn stale_preview_is_dropped() {
        let mut state = loaded_app();
        press(&mut state, KeyCode::Enter);
        let first = state.preview_generation;
        press(&mut state, KeyCode::Right);

        apply_update(
            &mut state,
            ApiUpdate::PreviewLoaded {
                generation: first,
                path: "trips/a.png".into(),
                result: Ok(Arc::new(image::RgbaImage::new(1, 1))),
            },
        );
        assert!(state.lightbox.as_ref().unwrap().image.is_none());

        let current = state.preview_generation;
        apply_update(
            &mut state,
            ApiUpdate::PreviewLoaded {
                generation: current,
                path: "trips/b.png".into(),
                result: Ok(Arc::new(image::RgbaImage::new(1, 1))),
            },
        );
        assert!(state.lightbox.as_ref().unwrap().image.is_some());
    }

    #[test]
    fn create_folder_prompt_validates_and_refetches() {
        let mut state = loaded_app();
        press(&mut state, KeyCode::Char('n'));
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
        assert!(state.effects.is_empty());

        press(&mut state, KeyCode::Char('n'));
        type_text(&mut state, "summer");
        press(&mut state, KeyCode::Enter);
        let Some(Effect::CreateFolder(request)) = state.effects.pop() else {
            panic!("expected a create-folder effect");
        };
        assert_eq!(request.path(), "trips/summer");

        apply_update(&mut state, ApiUpdate::FolderCreated { request, result: Ok(()) });
        assert!(state.effects.contains(&Effect::FetchFolders));
        assert!(state.effects.iter().any(|e| matches!(e, Effect::FetchImages(t) if t.folder == "trips")));
    }

    #[test]
    fn upload_asks_for_password_when_protected() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"not really a png").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let mut state = loaded_app();
        apply_update(&mut state, ApiUpdate::PasswordProbed { result: Ok(true) });

        press(&mut state, KeyCode::Char('u'));
        type_text(&mut state, &path);
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.prompt.as_ref().map(|p| p.kind), Some(PromptKind::UploadPassword));

        // Empty password is refused.
        press(&mut state, KeyCode::Enter);
        assert!(state.effects.is_empty());
        assert_eq!(state.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));

        press(&mut state, KeyCode::Char('u'));
        type_text(&mut state, &path);
        press(&mut state, KeyCode::Enter);
        type_text(&mut state, "hunter2");
        press(&mut state, KeyCode::Enter);
        let Some(Effect::Upload(request)) = state.effects.pop() else {
            panic!("expected an upload effect");
        };
        assert_eq!(request.folder, "trips");
        assert_eq!(request.password, "hunter2");
        assert_eq!(state.uploads_in_flight, 1);

        apply_update(&mut state, ApiUpdate::UploadFinished { request, result: Ok(()) });
        assert_eq!(state.uploads_in_flight, 0);
        assert_eq!(take_ticket(&mut state).folder, "trips");
    }

    #[test]
    fn upload_skips_password_on_open_servers() {
        let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        file.write_all(b"jpeg-ish").unwrap();

        let mut state = loaded_app();
        apply_update(&mut state, ApiUpdate::PasswordProbed { result: Ok(false) });
        press(&mut state, KeyCode::Char('u'));
        type_text(&mut state, &file.path().to_string_lossy());
        press(&mut state, KeyCode::Enter);
        assert!(state.prompt.is_none());
        assert!(matches!(state.effects.last(), Some(Effect::Upload(_))));
    }

    #[test]
    fn missing_upload_file_is_refused() {
        let mut state = loaded_app();
        press(&mut state, KeyCode::Char('u'));
        type_text(&mut state, "/nonexistent/whatever.png");
        press(&mut state, KeyCode::Enter);
        assert!(state.prompt.is_none());
        assert!(state.folder_picker.is_none());
        assert!(state.effects.is_empty());
        assert_eq!(state.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    }

    fn with_tree(mut state: AppState) -> AppState {
        state.folders = vec![
            Folder::new("2024", vec![Folder::leaf("summer")]),
            Folder::leaf("misc"),
        ];
        state
    }

    #[test]
    fn upload_from_root_asks_for_a_destination() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"png").unwrap();

        let mut state = with_tree(app());
        apply_update(&mut state, ApiUpdate::PasswordProbed { result: Ok(false) });
        press(&mut state, KeyCode::Char('u'));
        type_text(&mut state, &file.path().to_string_lossy());
        press(&mut state, KeyCode::Enter);

        let picker = state.folder_picker.as_ref().expect("destination picker open");
        let paths: Vec<&str> = picker.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["2024", "2024/summer", "misc"]);
        assert!(state.effects.is_empty());

        press(&mut state, KeyCode::Down);
        press(&mut state, KeyCode::Enter);
        assert!(state.folder_picker.is_none());
        let Some(Effect::Upload(request)) = state.effects.pop() else {
            panic!("expected an upload effect");
        };
        assert_eq!(request.folder, "2024/summer");
        assert!(state.pending_upload.is_none());
    }

    #[test]
    fn picked_destination_still_needs_the_password() {
        let mut file = tempfile::Builder::new().suffix(".gif").tempfile().unwrap();
        file.write_all(b"gif").unwrap();

        let mut state = with_tree(app());
        press(&mut state, KeyCode::Char('u'));
        type_text(&mut state, &file.path().to_string_lossy());
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::End);
        press(&mut state, KeyCode::Enter);
        assert_eq!(state.prompt.as_ref().map(|p| p.kind), Some(PromptKind::UploadPassword));
        assert_eq!(
            state.pending_upload.as_ref().and_then(|p| p.folder.as_deref()),
            Some("misc")
        );

        type_text(&mut state, "pw");
        press(&mut state, KeyCode::Enter);
        let Some(Effect::Upload(request)) = state.effects.pop() else {
            panic!("expected an upload effect");
        };
        assert_eq!((request.folder.as_str(), request.password.as_str()), ("misc", "pw"));
    }

    #[test]
    fn cancelling_the_picker_drops_the_upload() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"png").unwrap();

        let mut state = with_tree(app());
        press(&mut state, KeyCode::Char('u'));
        type_text(&mut state, &file.path().to_string_lossy());
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Esc);
        assert!(state.folder_picker.is_none());
        assert!(state.pending_upload.is_none());
        assert!(state.effects.is_empty());
    }

    #[test]
    fn upload_from_root_without_folders_is_refused() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"png").unwrap();

        let mut state = app();
        press(&mut state, KeyCode::Char('u'));
        type_text(&mut state, &file.path().to_string_lossy());
        press(&mut state, KeyCode::Enter);
        assert!(state.folder_picker.is_none());
        assert!(state.pending_upload.is_none());
        assert_eq!(state.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[test]
    fn several_files_become_one_upload_each() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.png", "b.jpg", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let quoted: Vec<String> = ["a.png", "b.jpg", "notes.txt"]
            .iter()
            .map(|n| format!("\"{}\"", dir.path().join(n).display()))
            .collect();

        let mut state = loaded_app();
        apply_update(&mut state, ApiUpdate::PasswordProbed { result: Ok(false) });
        press(&mut state, KeyCode::Char('u'));
        type_text(&mut state, &quoted.join(" "));
        press(&mut state, KeyCode::Enter);

        let names: Vec<String> = state
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::Upload(r) => Some(r.file_name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(names, ["a.png", "b.jpg"]);
        assert_eq!(state.uploads_in_flight, 2);
        let notice = state.notice.as_ref().unwrap();
        assert_eq!(notice.kind, NoticeKind::Info);
        assert!(notice.text.contains("2 files"), "{}", notice.text);
    }

    #[test]
    fn theme_toggle_is_saved() {
        let mut state = app();
        press(&mut state, KeyCode::Char('t'));
        assert_eq!(state.config.theme, crate::ui::theme::ThemeMode::Light);
        assert!(matches!(
            state.effects.last(),
            Some(Effect::SaveConfig(c)) if c.theme == crate::ui::theme::ThemeMode::Light
        ));

        press(&mut state, KeyCode::Char('t'));
        assert_eq!(state.config.theme, crate::ui::theme::ThemeMode::Dark);

        apply_update(
            &mut state,
            ApiUpdate::ConfigSaved {
                result: Err(anyhow::anyhow!("read-only filesystem")),
            },
        );
        assert_eq!(state.notice.as_ref().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[test]
    fn ctrl_c_quits_from_a_prompt() {
        let mut state = app();
        press(&mut state, KeyCode::Char('/'));
        handle_key(&mut state, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(state.should_quit);
    }
}
