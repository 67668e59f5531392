//! HTTP client for the gallery API.
//!
//! One method per endpoint.  Every call maps transport errors, timeouts,
//! non-2xx statuses and undecodable bodies onto
//! [`GalleryError::Network`]; nothing is retried.

use std::time::Duration;

use reqwest::{multipart, Client, Response, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::error::{GalleryError, GalleryResult};
use crate::core::gallery::CreateFolderRequest;
use crate::core::model::{Folder, ImageRecord};
use crate::core::upload::UploadRequest;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateFolderBody<'a> {
    folder_name: &'a str,
    parent_folder: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordProbe {
    is_password_protected: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> GalleryResult<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| GalleryError::validation("server", format!("'{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(GalleryError::validation(
                "server",
                format!("'{base_url}' is not an http(s) URL"),
            ));
        }
        // Normalise away a trailing slash so segment pushes don't produce `//`.
        if base.path().ends_with('/') {
            let trimmed = base.path().trim_end_matches('/').to_string();
            base.set_path(&trimmed);
        }
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /api/folders`
    pub async fn folders(&self) -> GalleryResult<Vec<Folder>> {
        let url = self.endpoint(&["api", "folders"])?;
        debug!(%url, "fetching folder tree");
        let response = self.http.get(url).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// `GET /api/images?folder=…`
    pub async fn images(&self, folder: &str) -> GalleryResult<Vec<ImageRecord>> {
        let url = self.endpoint(&["api", "images"])?;
        debug!(%url, folder, "fetching image listing");
        let response = self.http.get(url).query(&[("folder", folder)]).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// `POST /api/create_folder`
    pub async fn create_folder(&self, request: &CreateFolderRequest) -> GalleryResult<()> {
        let url = self.endpoint(&["api", "create_folder"])?;
        debug!(%url, name = %request.name, parent = %request.parent, "creating folder");
        let body = CreateFolderBody {
            folder_name: &request.name,
            parent_folder: &request.parent,
        };
        let response = self.http.post(url).json(&body).send().await?;
        check(response).await?;
        Ok(())
    }

    /// `GET /api/is-password-protected`
    pub async fn is_password_protected(&self) -> GalleryResult<bool> {
        let url = self.endpoint(&["api", "is-password-protected"])?;
        let response = self.http.get(url).send().await?;
        let probe: PasswordProbe = check(response).await?.json().await?;
        Ok(probe.is_password_protected)
    }

    /// `POST /api/upload` (multipart: `file`, `folder`, `password`).
    pub async fn upload(&self, request: &UploadRequest) -> GalleryResult<()> {
        let url = self.endpoint(&["api", "upload"])?;
        let bytes = tokio::fs::read(&request.file).await.map_err(|e| {
            GalleryError::validation("file", format!("{}: {e}", request.file.display()))
        })?;
        let mime = tree_magic_mini::from_u8(&bytes);
        debug!(%url, file = %request.file_name, folder = %request.folder, mime, size = bytes.len(), "uploading");

        let part = multipart::Part::bytes(bytes)
            .file_name(request.file_name.clone())
            .mime_str(mime)?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("folder", request.folder.clone())
            .text("password", request.password.clone());

        let response = self.http.post(url).multipart(form).send().await?;
        check(response).await?;
        Ok(())
    }

    /// `GET /images/{path}` — raw bytes of a stored file.
    pub async fn image_bytes(&self, path: &str) -> GalleryResult<Vec<u8>> {
        let mut segments = vec!["images"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));
        let url = self.endpoint(&segments)?;
        let response = self.http.get(url).send().await?;
        Ok(check(response).await?.bytes().await?.to_vec())
    }

    fn endpoint(&self, segments: &[&str]) -> GalleryResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| GalleryError::network(format!("cannot build a URL on {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Pass 2xx responses through; turn anything else into a network error,
/// preferring the server's `{"error": …}` message.
async fn check(response: Response) -> GalleryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_string());
    warn!(%url, %status, %message, "request rejected");
    Err(GalleryError::network(format!("{message} (HTTP {})", status.as_u16())))
}
