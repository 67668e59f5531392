//! Pure walks over the remote folder tree.
//!
//! The tree itself is owned by the server and replaced wholesale on every
//! fetch.  Which folders are *open* in the sidebar is display state and is
//! passed in by the caller, never stored on the nodes.

use std::collections::HashSet;

use super::model::Folder;

/// A folder flattened out of the tree, with its derived full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    /// `/`-joined segment names from the root.
    pub path: String,
    pub name: String,
    /// 0 for top-level folders.
    pub depth: usize,
    pub has_children: bool,
}

/// One clickable step of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub path: String,
}

/// Join a parent path and a segment; the root is the empty string.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

/// Path of the containing folder (`""` for top-level folders and root).
pub fn parent_path(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

/// `true` when `path` equals `ancestor` or lies beneath it.  Root is the
/// ancestor of everything.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    ancestor.is_empty()
        || path == ancestor
        || (path.starts_with(ancestor) && path.as_bytes().get(ancestor.len()) == Some(&b'/'))
}

/// Breadcrumb trail starting with the root crumb.
pub fn breadcrumbs(path: &str) -> Vec<Crumb> {
    let mut crumbs = vec![Crumb {
        label: "Root".into(),
        path: String::new(),
    }];
    let mut current = String::new();
    for part in path.split('/').filter(|p| !p.is_empty()) {
        current = join_path(&current, part);
        crumbs.push(Crumb {
            label: part.to_string(),
            path: current.clone(),
        });
    }
    crumbs
}

/// Every folder in pre-order (parents before children, siblings in server
/// order).
pub fn flatten(folders: &[Folder]) -> Vec<FolderEntry> {
    let mut out = Vec::new();
    collect(folders, "", 0, None, &mut out);
    out
}

/// Folders the sidebar should show: top-level folders plus the children
/// of every folder whose path is in `expanded` (recursively).
pub fn visible_entries(folders: &[Folder], expanded: &HashSet<String>) -> Vec<FolderEntry> {
    let mut out = Vec::new();
    collect(folders, "", 0, Some(expanded), &mut out);
    out
}

fn collect(
    folders: &[Folder],
    parent: &str,
    depth: usize,
    expanded: Option<&HashSet<String>>,
    out: &mut Vec<FolderEntry>,
) {
    for folder in folders {
        let path = join_path(parent, &folder.name);
        let descend = expanded.map_or(true, |open| open.contains(&path));
        out.push(FolderEntry {
            path: path.clone(),
            name: folder.name.clone(),
            depth,
            has_children: !folder.children.is_empty(),
        });
        if descend {
            collect(&folder.children, &path, depth + 1, expanded, out);
        }
    }
}

/// Look up a folder by full path.
pub fn find<'a>(folders: &'a [Folder], path: &str) -> Option<&'a Folder> {
    let mut level = folders;
    let mut found = None;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let folder = level.iter().find(|f| f.name == segment)?;
        level = &folder.children;
        found = Some(folder);
    }
    found
}
