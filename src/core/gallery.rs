//! Gallery view-state controller.
//!
//! Owns the current folder, its image listing, the active filter and the
//! derived filtered listing.  The controller never performs I/O: it hands
//! out [`FetchTicket`]s describing the request to run and accepts the
//! results back through [`GalleryController::images_loaded`].  Every ticket
//! carries a generation; a result whose generation is no longer current is
//! discarded so a slow response for an old folder can't overwrite a newer
//! view.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::error::GalleryError;
use super::filter::{self, CriteriaPatch, FilterCriteria};
use super::folders;
use super::model::ImageRecord;
use super::navigation::Viewer;

// ───────────────────────────────────────── requests ──────────

/// An image-list fetch the shell must perform for the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub folder: String,
}

/// A validated create-folder call for the folder repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateFolderRequest {
    pub name: String,
    pub parent: String,
}

impl CreateFolderRequest {
    /// Full path of the folder once created.
    pub fn path(&self) -> String {
        folders::join_path(&self.parent, &self.name)
    }
}

/// What happened to a fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The listing was replaced; carries the new image count.
    Applied(usize),
    /// A newer request superseded this one; nothing changed.
    Stale,
    /// The fetch failed; the listing is now empty.
    Failed(GalleryError),
}

// ───────────────────────────────────────── state ─────────────

/// The view state for one folder.  `filtered` is always
/// `filter::apply(images, criteria)` and is never edited directly.
#[derive(Debug, Clone, Default)]
pub struct GalleryViewState {
    current_folder: String,
    images: Vec<ImageRecord>,
    filtered: Vec<ImageRecord>,
    criteria: FilterCriteria,
}

pub type Clock = fn() -> DateTime<Utc>;

pub struct GalleryController {
    state: GalleryViewState,
    generation: u64,
    loading: bool,
    clock: Clock,
}

impl Default for GalleryController {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryController {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Controller whose age filter measures against `clock`.
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            state: GalleryViewState::default(),
            generation: 0,
            loading: false,
            clock,
        }
    }

    // ── accessors ───────────────────────────────────────────────

    pub fn current_folder(&self) -> &str {
        &self.state.current_folder
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.state.images
    }

    pub fn filtered(&self) -> &[ImageRecord] {
        &self.state.filtered
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.state.criteria
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view_state(&self) -> &GalleryViewState {
        &self.state
    }

    // ── folder & listing ────────────────────────────────────────

    /// Switch to `path`.  The old listing is dropped immediately and the
    /// returned ticket must be executed to load the new one.
    pub fn set_folder(&mut self, path: impl Into<String>) -> FetchTicket {
        self.state.current_folder = path.into();
        self.replace_images(Vec::new());
        info!(folder = %self.state.current_folder, "folder selected");
        self.issue_ticket()
    }

    /// Re-fetch the current folder, keeping the listing until the result
    /// arrives.
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue_ticket()
    }

    /// Feed back the result of a ticket.
    pub fn images_loaded(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<ImageRecord>, GalleryError>,
    ) -> FetchOutcome {
        if ticket.generation != self.generation {
            debug!(
                folder = %ticket.folder,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale image listing"
            );
            return FetchOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(images) => {
                let count = images.len();
                self.replace_images(images);
                debug!(folder = %ticket.folder, count, "image listing applied");
                FetchOutcome::Applied(count)
            }
            Err(err) => {
                warn!(folder = %ticket.folder, error = %err, "image listing failed");
                self.replace_images(Vec::new());
                FetchOutcome::Failed(err)
            }
        }
    }

    // ── filtering ───────────────────────────────────────────────

    pub fn set_criteria(&mut self, patch: CriteriaPatch) {
        self.state.criteria.merge(patch);
        self.recompute();
    }

    pub fn clear_criteria(&mut self) {
        self.state.criteria = FilterCriteria::default();
        self.recompute();
    }

    // ── selection ───────────────────────────────────────────────

    /// Open a viewer on `record`, with neighbours taken from the *filtered*
    /// listing.  A record that is no longer listed still opens, alone.
    pub fn select_image(&self, record: &ImageRecord) -> Viewer {
        let index = self
            .state
            .filtered
            .iter()
            .position(|r| r.path == record.path);
        match index.and_then(|i| Viewer::open(self.state.filtered.clone(), i)) {
            Some(viewer) => viewer,
            None => {
                let err = GalleryError::NotFound {
                    path: record.path.clone(),
                };
                debug!(error = %err, "opening viewer without navigation");
                Viewer::single(record.clone())
            }
        }
    }

    // ── mutations on the repository ─────────────────────────────

    /// Validate a new folder named `name` under `parent`.
    pub fn create_folder(&self, name: &str, parent: &str) -> Result<CreateFolderRequest, GalleryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GalleryError::validation("folder name", "must not be empty"));
        }
        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(GalleryError::validation(
                "folder name",
                "must be a single folder name",
            ));
        }
        Ok(CreateFolderRequest {
            name: name.to_string(),
            parent: parent.to_string(),
        })
    }

    /// A folder was created.  Returns a re-fetch when it affects the
    /// current view.
    pub fn folder_created(&mut self, request: &CreateFolderRequest) -> Option<FetchTicket> {
        self.refresh_if_affected(&request.parent)
    }

    /// An upload into `folder` succeeded.  Returns a re-fetch when it
    /// affects the current view.
    pub fn upload_finished(&mut self, folder: &str) -> Option<FetchTicket> {
        self.refresh_if_affected(folder)
    }

    // ── internals ───────────────────────────────────────────────

    fn refresh_if_affected(&mut self, changed: &str) -> Option<FetchTicket> {
        // The listing endpoint walks subfolders, so a change anywhere below
        // the current folder shows up in it.
        folders::is_within(changed, &self.state.current_folder).then(|| self.issue_ticket())
    }

    fn issue_ticket(&mut self) -> FetchTicket {
        self.generation = self.generation.wrapping_add(1);
        self.loading = true;
        FetchTicket {
            generation: self.generation,
            folder: self.state.current_folder.clone(),
        }
    }

    fn replace_images(&mut self, images: Vec<ImageRecord>) {
        self.state.images = images;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.state.filtered = filter::apply(&self.state.images, &self.state.criteria, (self.clock)());
    }
}

impl GalleryViewState {
    pub fn current_folder(&self) -> &str {
        &self.current_folder
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn filtered(&self) -> &[ImageRecord] {
        &self.filtered
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::SizeClass;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn rec(folder: &str, name: &str, size: u64) -> ImageRecord {
        ImageRecord {
            path: folders::join_path(folder, name),
            name: name.into(),
            size,
            width: Some(10),
            height: Some(10),
            date: 1_699_999_000,
        }
    }

    fn loaded(folder: &str, images: Vec<ImageRecord>) -> GalleryController {
        let mut c = GalleryController::with_clock(fixed_now);
        let ticket = c.set_folder(folder);
        let count = images.len();
        assert_eq!(c.images_loaded(&ticket, Ok(images)), FetchOutcome::Applied(count));
        c
    }

    #[test]
    fn set_folder_issues_one_ticket_per_call() {
        let mut c = GalleryController::with_clock(fixed_now);
        let t1 = c.set_folder("a");
        let t2 = c.set_folder("b");
        assert_eq!(t1.folder, "a");
        assert_eq!(t2.folder, "b");
        assert!(t2.generation > t1.generation);
        assert!(c.is_loading());
    }

    #[test]
    fn stale_listing_does_not_clobber_newer_folder() {
        let mut c = GalleryController::with_clock(fixed_now);
        let x = c.set_folder("X");
        let y = c.set_folder("Y");

        let y_images = vec![rec("Y", "y.png", 1)];
        assert_eq!(c.images_loaded(&y, Ok(y_images.clone())), FetchOutcome::Applied(1));
        assert_eq!(
            c.images_loaded(&x, Ok(vec![rec("X", "x.png", 1)])),
            FetchOutcome::Stale
        );
        assert_eq!(c.current_folder(), "Y");
        assert_eq!(c.images(), y_images.as_slice());
    }

    #[test]
    fn failed_fetch_degrades_to_empty_listing() {
        let mut c = loaded("a", vec![rec("a", "1.png", 1)]);
        let ticket = c.refresh();
        let outcome = c.images_loaded(&ticket, Err(GalleryError::network("boom")));
        assert!(matches!(outcome, FetchOutcome::Failed(GalleryError::Network { .. })));
        assert!(c.images().is_empty());
        assert!(c.filtered().is_empty());
        assert!(!c.is_loading());
    }

    #[test]
    fn criteria_change_recomputes_without_fetch() {
        let mut c = loaded(
            "a",
            vec![rec("a", "small.png", 10), rec("a", "big.png", 2_000_000)],
        );
        let generation = c.generation();
        c.set_criteria(CriteriaPatch::size(SizeClass::Large));
        assert_eq!(c.generation(), generation);
        assert_eq!(c.filtered().len(), 1);
        assert_eq!(c.filtered()[0].name, "big.png");
        assert_eq!(c.images().len(), 2);

        c.clear_criteria();
        assert_eq!(c.filtered().len(), 2);
    }

    #[test]
    fn selection_uses_filtered_adjacency() {
        let a = rec("f", "A.png", 10);
        let hidden = rec("f", "hidden.png", 5_000_000);
        let b = rec("f", "B.png", 10);
        let cc = rec("f", "C.png", 10);
        let mut c = loaded("f", vec![a.clone(), hidden, b.clone(), cc.clone()]);
        c.set_criteria(CriteriaPatch::size(SizeClass::Small));

        let t = c.select_image(&b).triple();
        assert_eq!(t.previous, Some(a.clone()));
        assert_eq!(t.current, b);
        assert_eq!(t.next, Some(cc));

        let first = c.select_image(&a).triple();
        assert_eq!(first.previous, None);
        assert_eq!(first.next.map(|r| r.name), Some("B.png".to_string()));
    }

    #[test]
    fn selecting_a_stale_record_opens_alone() {
        let c = loaded("f", vec![rec("f", "A.png", 1), rec("f", "B.png", 1)]);
        let gone = rec("f", "gone.png", 1);
        let viewer = c.select_image(&gone);
        let t = viewer.triple();
        assert_eq!(t.current, gone);
        assert!(t.previous.is_none() && t.next.is_none());
    }

    #[test]
    fn viewer_snapshot_is_independent_of_later_changes() {
        let mut c = loaded("f", vec![rec("f", "A.png", 1), rec("f", "B.png", 1)]);
        let mut viewer = c.select_image(&c.filtered()[0].clone());
        c.set_folder("elsewhere");
        assert!(viewer.step_forward());
        assert_eq!(viewer.current().name, "B.png");
    }

    #[test]
    fn create_folder_validation() {
        let c = GalleryController::with_clock(fixed_now);
        assert!(matches!(
            c.create_folder("   ", ""),
            Err(GalleryError::Validation { field: "folder name", .. })
        ));
        assert!(c.create_folder("a/b", "").is_err());
        let req = c.create_folder(" trips ", "2024").unwrap();
        assert_eq!(req.name, "trips");
        assert_eq!(req.path(), "2024/trips");
    }

    #[test]
    fn mutations_refetch_only_when_they_affect_the_view() {
        let mut c = loaded("2024", Vec::new());
        let inside = CreateFolderRequest {
            name: "x".into(),
            parent: "2024/summer".into(),
        };
        let outside = CreateFolderRequest {
            name: "x".into(),
            parent: "2023".into(),
        };
        let ticket = c.folder_created(&inside).expect("refetch");
        assert_eq!(ticket.folder, "2024");
        assert!(c.folder_created(&outside).is_none());
        assert!(c.upload_finished("2024").is_some());
        assert!(c.upload_finished("20245").is_none());
    }

    #[test]
    fn refresh_keeps_listing_until_result() {
        let mut c = loaded("a", vec![rec("a", "1.png", 1)]);
        let ticket = c.refresh();
        assert_eq!(c.images().len(), 1);
        assert_eq!(ticket.folder, "a");
    }
}
