//! Upload preparation — everything that can be checked before the file
//! leaves the machine.

use std::fmt;
use std::path::{Path, PathBuf};

use super::error::GalleryError;

/// Largest upload the server accepts (its `MAX_CONTENT_LENGTH`).
pub const MAX_UPLOAD_BYTES: u64 = 32 * 1024 * 1024;

/// Extensions the server stores.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "heic", "heif", "webp", "tiff", "tif", "bmp", "svg", "raw",
    "cr2", "nef", "arw", "mp4", "mov", "m4v", "avi", "wmv", "flv", "mkv", "webm",
];

/// A validated upload, ready for the HTTP client.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file: PathBuf,
    pub file_name: String,
    pub folder: String,
    /// Empty when the server is not password-protected.
    pub password: String,
}

// Requests end up in debug logs; keep the password out of them.
impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("file", &self.file)
            .field("file_name", &self.file_name)
            .field("folder", &self.folder)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .finish()
    }
}

pub fn is_allowed_file(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check an upload of `file` into `folder`.
///
/// `protected` is the server's answer to the password probe; when it is
/// set a non-empty `password` is required.
pub fn prepare_upload(
    file: &Path,
    folder: &str,
    protected: bool,
    password: &str,
) -> Result<UploadRequest, GalleryError> {
    let folder = folder.trim().trim_matches('/');
    if folder.is_empty() || folder == "root" {
        return Err(GalleryError::validation(
            "folder",
            "select a destination folder first",
        ));
    }

    let file_name = check_file(file)?;

    if protected && password.is_empty() {
        return Err(GalleryError::validation(
            "password",
            "this gallery requires an upload password",
        ));
    }

    Ok(UploadRequest {
        file: file.to_path_buf(),
        file_name,
        folder: folder.to_string(),
        password: if protected { password.to_string() } else { String::new() },
    })
}

/// Check that `file` is something the server will store; returns its file
/// name.
pub fn check_file(file: &Path) -> Result<String, GalleryError> {
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| GalleryError::validation("file", "no file selected"))?;
    if !is_allowed_file(&file_name) {
        return Err(GalleryError::validation(
            "file",
            format!("'{file_name}' is not a supported image or video type"),
        ));
    }

    let meta = std::fs::metadata(file)
        .map_err(|e| GalleryError::validation("file", format!("{}: {e}", file.display())))?;
    if !meta.is_file() {
        return Err(GalleryError::validation(
            "file",
            format!("{} is not a regular file", file.display()),
        ));
    }
    if meta.len() > MAX_UPLOAD_BYTES {
        return Err(GalleryError::validation(
            "file",
            format!(
                "{} is {} MB; the limit is {} MB",
                file_name,
                meta.len() / (1024 * 1024),
                MAX_UPLOAD_BYTES / (1024 * 1024)
            ),
        ));
    }

    Ok(file_name)
}

/// Split upload-prompt input into paths.  Paths are separated by
/// whitespace; quotes group a path containing spaces and `\` escapes the
/// next character.  A leading `~/` expands to `$HOME`.
pub fn split_paths(input: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut started = false;
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        match (ch, quote) {
            ('\\', _) => {
                if let Some(next) = chars.next() {
                    current.push(next);
                    started = true;
                }
            }
            (q, None) if q == '"' || q == '\'' => {
                quote = Some(q);
                started = true;
            }
            (q, Some(open)) if q == open => quote = None,
            (c, None) if c.is_whitespace() => {
                if started {
                    paths.push(expand_home(&std::mem::take(&mut current)));
                    started = false;
                }
            }
            (c, _) => {
                current.push(c);
                started = true;
            }
        }
    }
    if started {
        paths.push(expand_home(&current));
    }
    paths
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}

/// Resolve the chosen paths into files to upload.  A directory contributes
/// its supported files (not recursively, sorted by name).  Paths that fail
/// [`check_file`] are returned with their error.
pub fn collect_files(paths: &[PathBuf]) -> (Vec<PathBuf>, Vec<GalleryError>) {
    let mut files = Vec::new();
    let mut rejected = Vec::new();
    for path in paths {
        if path.is_dir() {
            match std::fs::read_dir(path) {
                Ok(entries) => {
                    let mut found: Vec<PathBuf> = entries
                        .filter_map(|e| e.ok().map(|e| e.path()))
                        .filter(|p| check_file(p).is_ok())
                        .collect();
                    found.sort();
                    files.extend(found);
                }
                Err(e) => rejected.push(GalleryError::validation(
                    "file",
                    format!("{}: {e}", path.display()),
                )),
            }
            continue;
        }
        match check_file(path) {
            Ok(_) => files.push(path.clone()),
            Err(err) => rejected.push(err),
        }
    }
    files.dedup();
    (files, rejected)
}
