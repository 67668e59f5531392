//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event
//! handling).  Network work is never started from here directly: handlers
//! queue [`Effect`]s and the main loop dispatches them.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::{
    folders::{self, FolderEntry},
    gallery::{CreateFolderRequest, FetchTicket, GalleryController},
    model::{Folder, ImageRecord},
    navigation::Viewer,
    upload::UploadRequest,
    zoom::ZoomState,
};
use crate::ui::cursor::ListCursor;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Gallery,
    Lightbox,
    Info,
}

/// Which pane receives navigation keys in the gallery view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneFocus {
    Folders,
    #[default]
    Images,
}

/// Text prompts shown as popups over the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    FilterName,
    CreateFolder,
    UploadPath,
    UploadPassword,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::FilterName => " Filter by Name ",
            PromptKind::CreateFolder => " Create New Folder ",
            PromptKind::UploadPath => " Upload Files ",
            PromptKind::UploadPassword => " Enter Upload Password ",
        }
    }

    /// Whether typed characters should be masked.
    pub fn is_secret(self) -> bool {
        self == PromptKind::UploadPassword
    }
}

#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

impl Prompt {
    pub fn new(kind: PromptKind, input: impl Into<String>) -> Self {
        Self {
            kind,
            input: input.into(),
        }
    }
}

/// Severity of a status-bar notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// Work the main loop must hand to the request runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchFolders,
    FetchImages(FetchTicket),
    CreateFolder(CreateFolderRequest),
    Upload(UploadRequest),
    ProbePassword,
    LoadPreview { generation: u64, path: String },
    SaveConfig(AppConfig),
}

/// Files chosen in the upload prompt, waiting for a destination and/or the
/// password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub files: Vec<PathBuf>,
    /// `None` until a folder is picked (uploads from the root).
    pub folder: Option<String>,
}

/// Destination chooser shown when uploading from the root.
#[derive(Debug, Clone)]
pub struct FolderPicker {
    pub entries: Vec<FolderEntry>,
    pub cursor: ListCursor,
}

impl FolderPicker {
    pub fn new(entries: Vec<FolderEntry>) -> Self {
        Self {
            entries,
            cursor: ListCursor::default(),
        }
    }

    pub fn selected(&self) -> Option<&FolderEntry> {
        self.entries.get(self.cursor.selected)
    }
}

/// The open lightbox: navigation snapshot plus zoom, and the decoded image
/// once it arrives.
pub struct Lightbox {
    pub viewer: Viewer,
    pub zoom: ZoomState,
    /// Token of the preview load currently wanted.
    pub generation: u64,
    pub image: Option<Arc<image::RgbaImage>>,
    pub error: Option<String>,
}

/// Top-level application state.
pub struct AppState {
    pub config: AppConfig,
    /// Owns the current folder, listing and filter.
    pub gallery: GalleryController,
    /// Folder tree as last fetched.
    pub folders: Vec<Folder>,
    /// Paths of folders opened in the sidebar.
    pub expanded: HashSet<String>,
    pub folder_cursor: ListCursor,
    pub image_cursor: ListCursor,
    pub focus: PaneFocus,
    pub active_view: ActiveView,
    pub prompt: Option<Prompt>,
    pub lightbox: Option<Lightbox>,
    /// Monotonic token for lightbox image loads.
    pub preview_generation: u64,
    /// Server answer to the password probe; `None` until it arrives.
    pub password_protected: Option<bool>,
    pub pending_upload: Option<PendingUpload>,
    pub folder_picker: Option<FolderPicker>,
    /// Uploads currently in flight.
    pub uploads_in_flight: usize,
    /// Latest notification shown in the status bar.
    pub notice: Option<Notice>,
    /// Queued network work, drained by the main loop after each event.
    pub effects: Vec<Effect>,
    /// Tick counter (drives the spinner).
    pub tick: u64,
    /// Controls the main event loop.
    pub should_quit: bool,
}

impl AppState {
    pub fn new(config: AppConfig, gallery: GalleryController) -> Self {
        Self {
            config,
            gallery,
            folders: Vec::new(),
            expanded: HashSet::new(),
            folder_cursor: ListCursor::default(),
            image_cursor: ListCursor::default(),
            focus: PaneFocus::default(),
            active_view: ActiveView::default(),
            prompt: None,
            lightbox: None,
            preview_generation: 0,
            password_protected: None,
            pending_upload: None,
            folder_picker: None,
            uploads_in_flight: 0,
            notice: None,
            effects: Vec::new(),
            tick: 0,
            should_quit: false,
        }
    }

    /// Sidebar rows: a synthetic root entry followed by the visible part of
    /// the folder tree.
    pub fn folder_rows(&self) -> Vec<FolderEntry> {
        let mut rows = vec![FolderEntry {
            path: String::new(),
            name: "Root".into(),
            depth: 0,
            has_children: false,
        }];
        rows.extend(
            folders::visible_entries(&self.folders, &self.expanded)
                .into_iter()
                .map(|mut e| {
                    e.depth += 1;
                    e
                }),
        );
        rows
    }

    pub fn selected_folder_row(&self) -> Option<FolderEntry> {
        self.folder_rows().into_iter().nth(self.folder_cursor.selected)
    }

    pub fn selected_image(&self) -> Option<&ImageRecord> {
        self.gallery.filtered().get(self.image_cursor.selected)
    }

    /// The record the info popup describes: the lightbox image when one is
    /// open, otherwise the highlighted row.
    pub fn info_target(&self) -> Option<&ImageRecord> {
        match &self.lightbox {
            Some(lb) => Some(lb.viewer.current()),
            None => self.selected_image(),
        }
    }

    pub fn notify(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            text: text.into(),
        });
    }

    /// Whether anything is waiting on the network (drives the spinner).
    pub fn is_busy(&self) -> bool {
        self.gallery.is_loading() || self.uploads_in_flight > 0
    }
}
