//! Background repository calls, keeping the UI loop responsive.
//!
//! Each request runs on its own tokio task and reports back over an
//! unbounded channel.  Results carry whatever token the caller needs to
//! recognise stale answers (the fetch ticket, the preview generation).

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use super::state::Effect;
use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::core::{
    error::GalleryError,
    gallery::{CreateFolderRequest, FetchTicket},
    model::{Folder, ImageRecord},
    upload::UploadRequest,
};

/// Longest edge kept for lightbox images; larger ones are downscaled once
/// after decoding.
const PREVIEW_MAX_EDGE: u32 = 2048;

pub enum ApiUpdate {
    FoldersLoaded {
        result: Result<Vec<Folder>, GalleryError>,
    },
    ImagesLoaded {
        ticket: FetchTicket,
        result: Result<Vec<ImageRecord>, GalleryError>,
    },
    FolderCreated {
        request: CreateFolderRequest,
        result: Result<(), GalleryError>,
    },
    UploadFinished {
        request: UploadRequest,
        result: Result<(), GalleryError>,
    },
    PasswordProbed {
        result: Result<bool, GalleryError>,
    },
    PreviewLoaded {
        generation: u64,
        path: String,
        result: anyhow::Result<Arc<image::RgbaImage>>,
    },
    ConfigSaved {
        result: anyhow::Result<PathBuf>,
    },
}

/// Start the request described by `effect`.
pub fn dispatch(client: &ApiClient, tx: &mpsc::UnboundedSender<ApiUpdate>, effect: Effect) {
    debug!(?effect, "dispatching");
    match effect {
        Effect::FetchFolders => spawn_folder_fetch(client.clone(), tx.clone()),
        Effect::FetchImages(ticket) => spawn_image_fetch(client.clone(), tx.clone(), ticket),
        Effect::CreateFolder(request) => spawn_create_folder(client.clone(), tx.clone(), request),
        Effect::Upload(request) => spawn_upload(client.clone(), tx.clone(), request),
        Effect::ProbePassword => spawn_password_probe(client.clone(), tx.clone()),
        Effect::LoadPreview { generation, path } => {
            spawn_preview_load(client.clone(), tx.clone(), generation, path)
        }
        Effect::SaveConfig(config) => spawn_config_save(tx.clone(), config),
    }
}

/// Persist the configuration off the UI thread.
pub fn spawn_config_save(tx: mpsc::UnboundedSender<ApiUpdate>, config: AppConfig) {
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || config.save())
            .await
            .unwrap_or_else(|e| Err(anyhow::anyhow!("config writer panicked: {e}")));
        let _ = tx.send(ApiUpdate::ConfigSaved { result });
    });
}

pub fn spawn_folder_fetch(client: ApiClient, tx: mpsc::UnboundedSender<ApiUpdate>) {
    tokio::spawn(async move {
        let result = client.folders().await;
        let _ = tx.send(ApiUpdate::FoldersLoaded { result });
    });
}

pub fn spawn_image_fetch(client: ApiClient, tx: mpsc::UnboundedSender<ApiUpdate>, ticket: FetchTicket) {
    tokio::spawn(async move {
        let result = client.images(&ticket.folder).await;
        let _ = tx.send(ApiUpdate::ImagesLoaded { ticket, result });
    });
}

pub fn spawn_create_folder(
    client: ApiClient,
    tx: mpsc::UnboundedSender<ApiUpdate>,
    request: CreateFolderRequest,
) {
    tokio::spawn(async move {
        let result = client.create_folder(&request).await;
        let _ = tx.send(ApiUpdate::FolderCreated { request, result });
    });
}

pub fn spawn_upload(client: ApiClient, tx: mpsc::UnboundedSender<ApiUpdate>, request: UploadRequest) {
    tokio::spawn(async move {
        let result = client.upload(&request).await;
        let _ = tx.send(ApiUpdate::UploadFinished { request, result });
    });
}

pub fn spawn_password_probe(client: ApiClient, tx: mpsc::UnboundedSender<ApiUpdate>) {
    tokio::spawn(async move {
        let result = client.is_password_protected().await;
        let _ = tx.send(ApiUpdate::PasswordProbed { result });
    });
}

pub fn spawn_preview_load(
    client: ApiClient,
    tx: mpsc::UnboundedSender<ApiUpdate>,
    generation: u64,
    path: String,
) {
    tokio::spawn(async move {
        let result = load_preview(&client, &path).await;
        let _ = tx.send(ApiUpdate::PreviewLoaded {
            generation,
            path,
            result,
        });
    });
}

async fn load_preview(client: &ApiClient, path: &str) -> anyhow::Result<Arc<image::RgbaImage>> {
    let bytes = client.image_bytes(path).await?;
    // Decoding is CPU-bound; keep it off the async workers.
    let decoded = tokio::task::spawn_blocking(move || decode_preview(&bytes)).await??;
    Ok(Arc::new(decoded))
}

fn decode_preview(bytes: &[u8]) -> anyhow::Result<image::RgbaImage> {
    let img = image::load_from_memory(bytes)?;
    let img = if img.width() > PREVIEW_MAX_EDGE || img.height() > PREVIEW_MAX_EDGE {
        img.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE)
    } else {
        img
    };
    Ok(img.to_rgba8())
}
