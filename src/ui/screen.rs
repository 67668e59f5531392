//! Whole-frame composition: panes, status bar and overlays.

use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::state::{ActiveView, AppState, PaneFocus, PromptKind};

use super::{
    filter_bar::FilterBar,
    folder_tree::FolderTreeWidget,
    image_list::ImageListWidget,
    layout::AppLayout,
    lightbox::LightboxWidget,
    popup::{FolderPickerPopup, InfoPopup, PromptPopup},
    spinner::BusyIndicator,
    theme::Theme,
};

fn pane_block(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(if focused {
            Theme::focused_border_style()
        } else {
            Theme::border_style()
        })
}

fn folder_label(path: &str) -> &str {
    if path.is_empty() {
        "Root"
    } else {
        path
    }
}

pub fn draw(frame: &mut Frame, state: &mut AppState) {
    let layout = AppLayout::from_area(frame.area());
    let current = state.gallery.current_folder().to_string();

    // ── sidebar ────────────────────────────────────────────────
    let rows = state.folder_rows();
    let focused = state.focus == PaneFocus::Folders;
    let tree = FolderTreeWidget::new(&rows, &state.expanded, &current)
        .focused(focused)
        .block(pane_block(" Folders ".into(), focused));
    frame.render_stateful_widget(tree, layout.sidebar_area, &mut state.folder_cursor);

    // ── filter bar ─────────────────────────────────────────────
    frame.render_widget(
        FilterBar {
            block: Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border_style()),
            current_folder: &current,
            criteria: state.gallery.criteria(),
            shown: state.gallery.filtered().len(),
            total: state.gallery.images().len(),
        },
        layout.filter_area,
    );

    // ── image list ─────────────────────────────────────────────
    let focused = state.focus == PaneFocus::Images;
    let list = ImageListWidget::new(state.gallery.filtered(), state.gallery.images().len())
        .loading(state.gallery.is_loading())
        .focused(focused)
        .block(pane_block(format!(" {} ", folder_label(&current)), focused));
    frame.render_stateful_widget(list, layout.images_area, &mut state.image_cursor);

    let busy_label = if state.uploads_in_flight > 0 {
        "uploading"
    } else {
        "loading"
    };
    frame.render_widget(
        BusyIndicator {
            visible: state.is_busy(),
            tick: state.tick,
            label: busy_label,
        },
        layout.images_area,
    );

    // ── status bar ─────────────────────────────────────────────
    let status = match &state.notice {
        Some(notice) => Paragraph::new(Line::from(Span::raw(format!(" {}", notice.text))))
            .style(Theme::notice_style(notice.kind)),
        None => Paragraph::new(format!(" {}", state.config.status_bar_hint()))
            .style(Theme::status_bar_style()),
    };
    frame.render_widget(status, layout.status_area);

    // ── overlays ───────────────────────────────────────────────
    if let Some(lb) = &state.lightbox {
        if matches!(state.active_view, ActiveView::Lightbox | ActiveView::Info) {
            frame.render_widget(LightboxWidget { lightbox: lb }, frame.area());
        }
    }
    if state.active_view == ActiveView::Info {
        if let Some(record) = state.info_target() {
            frame.render_widget(InfoPopup { record }, frame.area());
        }
    }
    if let Some(prompt) = &state.prompt {
        let context = match prompt.kind {
            PromptKind::CreateFolder => Some(format!("Inside: {}", folder_label(&current))),
            PromptKind::UploadPath if current.is_empty() => {
                Some("Destination: chosen next".to_string())
            }
            PromptKind::UploadPath => Some(format!("Destination: {current}")),
            PromptKind::UploadPassword => state.pending_upload.as_ref().map(|p| {
                format!(
                    "{} file(s) to {}",
                    p.files.len(),
                    p.folder.as_deref().map_or("Root", folder_label)
                )
            }),
            PromptKind::FilterName => None,
        };
        frame.render_widget(PromptPopup { prompt, context }, frame.area());
    }
    let file_count = state.pending_upload.as_ref().map_or(0, |p| p.files.len());
    if let Some(picker) = state.folder_picker.as_mut() {
        frame.render_widget(FolderPickerPopup { picker, file_count }, frame.area());
    }
}
