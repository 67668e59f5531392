//! Lightbox navigation — an immutable snapshot of the listing plus a cursor.
//!
//! A [`Viewer`] is built once, when the user opens an image, and never sees
//! later changes to the gallery listing.  Stepping past either end is a
//! no-op; closing consumes the viewer.

use super::model::ImageRecord;

/// The `(previous, current, next)` grouping shown by the lightbox.
///
/// `previous`/`next` are absent exactly when `current` is the first/last
/// element of the list the triple was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTriple {
    pub previous: Option<ImageRecord>,
    pub current: ImageRecord,
    pub next: Option<ImageRecord>,
}

impl NavigationTriple {
    /// Triple around `list[index]`, or `None` if `index` is out of range.
    pub fn around(list: &[ImageRecord], index: usize) -> Option<Self> {
        let current = list.get(index)?.clone();
        Some(Self {
            previous: index.checked_sub(1).and_then(|i| list.get(i)).cloned(),
            current,
            next: list.get(index + 1).cloned(),
        })
    }

    /// A triple with no neighbours.
    pub fn alone(current: ImageRecord) -> Self {
        Self {
            previous: None,
            current,
            next: None,
        }
    }
}

/// An open lightbox.  The `closed` state is represented by the viewer no
/// longer existing.
#[derive(Debug, Clone)]
pub struct Viewer {
    snapshot: Vec<ImageRecord>,
    cursor: usize,
}

impl Viewer {
    /// Open over `snapshot` at `index`.  Returns `None` for an empty
    /// snapshot or an out-of-range index.
    pub fn open(snapshot: Vec<ImageRecord>, index: usize) -> Option<Self> {
        (index < snapshot.len()).then_some(Self {
            snapshot,
            cursor: index,
        })
    }

    /// A viewer over a single record (no navigation).
    pub fn single(record: ImageRecord) -> Self {
        Self {
            snapshot: vec![record],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &ImageRecord {
        &self.snapshot[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// `(1-based position, total)` for the "3 / 7" indicator.
    pub fn position(&self) -> (usize, usize) {
        (self.cursor + 1, self.snapshot.len())
    }

    pub fn has_previous(&self) -> bool {
        self.cursor > 0
    }

    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.snapshot.len()
    }

    pub fn triple(&self) -> NavigationTriple {
        NavigationTriple::around(&self.snapshot, self.cursor)
            .unwrap_or_else(|| NavigationTriple::alone(self.current().clone()))
    }

    /// Move to the previous image.  Returns `false` (and does nothing) at
    /// the start of the list.
    pub fn step_backward(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Move to the next image.  Returns `false` (and does nothing) at the
    /// end of the list.
    pub fn step_forward(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Terminal transition — the viewer is gone afterwards.
    pub fn close(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str) -> ImageRecord {
        ImageRecord {
            path: format!("p/{name}"),
            name: name.into(),
            size: 1,
            width: None,
            height: None,
            date: 0,
        }
    }

    fn abc() -> Vec<ImageRecord> {
        vec![rec("A"), rec("B"), rec("C")]
    }

    #[test]
    fn triple_around_middle_and_edges() {
        let list = abc();
        let mid = NavigationTriple::around(&list, 1).unwrap();
        assert_eq!(mid.previous, Some(list[0].clone()));
        assert_eq!(mid.current, list[1]);
        assert_eq!(mid.next, Some(list[2].clone()));

        let first = NavigationTriple::around(&list, 0).unwrap();
        assert_eq!(first.previous, None);
        assert_eq!(first.next, Some(list[1].clone()));

        assert!(NavigationTriple::around(&list, 3).is_none());
    }

    #[test]
    fn step_forward_stops_at_the_end() {
        let list = abc();
        let mut viewer = Viewer::open(list.clone(), 1).unwrap();
        assert!(viewer.step_forward());
        assert_eq!(viewer.current(), &list[2]);
        assert_eq!(viewer.triple().next, None);
        assert!(!viewer.step_forward());
        assert_eq!(viewer.current(), &list[2]);
        assert_eq!(viewer.position(), (3, 3));
    }

    #[test]
    fn step_backward_stops_at_the_start() {
        let list = abc();
        let mut viewer = Viewer::open(list.clone(), 0).unwrap();
        assert!(!viewer.step_backward());
        assert_eq!(viewer.cursor(), 0);
        assert!(viewer.step_forward());
        assert!(viewer.step_backward());
        assert_eq!(viewer.triple().previous, None);
        viewer.close();
    }

    #[test]
    fn open_rejects_bad_index() {
        assert!(Viewer::open(Vec::new(), 0).is_none());
        assert!(Viewer::open(abc(), 3).is_none());
    }

    #[test]
    fn single_has_no_neighbours() {
        let viewer = Viewer::single(rec("X"));
        let t = viewer.triple();
        assert!(t.previous.is_none() && t.next.is_none());
        assert!(!viewer.has_next() && !viewer.has_previous());
    }
}
