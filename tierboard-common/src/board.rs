//! Board controller
//!
//! Owns the live position model and the input session. Every gesture is
//! reduced to a model mutation here; each call that changed the model returns
//! the full snapshot to push to the server, calls that did not return `None`.
//! Pushing is the caller's business (see [`SaveQueue`](crate::sync::SaveQueue)),
//! and a failed push never rolls the board back.

use crate::model::{identifier_from_path, Bucket, Direction, GridGeometry, Snapshot};
use crate::session::{DropAction, DropTarget, InteractionMode, Key, KeyAction, Selection, Session};
use tracing::{debug, info, warn};

/// In-memory tier list plus interaction state
#[derive(Debug, Clone, Default)]
pub struct Board {
    snapshot: Snapshot,
    session: Session,
    /// Last measured layout of each bucket, indexed like [`Bucket::ALL`]
    geometry: [GridGeometry; 7],
}

impl Board {
    /// Build a board from a loaded snapshot
    pub fn new(mut snapshot: Snapshot) -> Self {
        snapshot.normalize();
        Self {
            snapshot,
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Record the rendered layout of `bucket`
    pub fn set_geometry(&mut self, bucket: Bucket, geometry: GridGeometry) {
        self.geometry[bucket.index()] = geometry;
    }

    pub fn items_per_row(&self, bucket: Bucket) -> usize {
        self.geometry[bucket.index()].items_per_row()
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.session.set_mode(mode);
    }

    /// Toggle selection; clicks on unknown items are ignored
    pub fn click(&mut self, id: &str) -> &Selection {
        if !self.snapshot.contains(id) {
            debug!("Ignoring click on unknown item {}", id);
            return self.session.selection();
        }
        self.session.click(id)
    }

    pub fn press_key(&mut self, key: Key) -> Option<Snapshot> {
        match self.session.press_key(key) {
            KeyAction::Move { id, direction } => self.step(&id, direction),
            KeyAction::Cleared | KeyAction::Ignored => None,
        }
    }

    /// On-item directional button
    pub fn arrow(&mut self, direction: Direction) -> Option<Snapshot> {
        let (id, direction) = self.session.arrow(direction)?;
        self.step(&id, direction)
    }

    fn step(&mut self, id: &str, direction: Direction) -> Option<Snapshot> {
        let (bucket, _) = self.snapshot.locate(id)?;
        let per_row = self.items_per_row(bucket);
        match self.snapshot.move_direction(id, direction, per_row) {
            Ok(Some(_)) => Some(self.snapshot.clone()),
            Ok(None) => None,
            Err(e) => {
                warn!("Directional move of {} failed: {}", id, e);
                self.session.forget(id);
                None
            }
        }
    }

    pub fn begin_drag(&mut self, id: &str) -> bool {
        self.snapshot.contains(id) && self.session.begin_drag(id)
    }

    pub fn drag_enter(&mut self, target: DropTarget) {
        self.session.drag_enter(target);
    }

    pub fn drag_leave(&mut self, target: DropTarget) {
        self.session.drag_leave(target);
    }

    /// Release the dragged item; a bucket drop appends to the bucket tail
    pub fn drop(&mut self, target: DropTarget) -> Option<Snapshot> {
        match self.session.drop(target) {
            DropAction::Move { id, bucket } => match self.snapshot.move_item(&id, bucket, usize::MAX) {
                Ok(_) => Some(self.snapshot.clone()),
                Err(e) => {
                    warn!("Drop of {} onto {} failed: {}", id, bucket, e);
                    None
                }
            },
            DropAction::StageDelete(id) => {
                debug!("Staged {} for deletion", id);
                None
            }
            DropAction::Ignored => None,
        }
    }

    pub fn end_drag(&mut self) {
        self.session.end_drag();
    }

    /// Confirm the staged deletion; returns the identifier to delete on the server
    ///
    /// The item stays on the board until [`Board::asset_deleted`] reports
    /// that the server removed it.
    pub fn confirm_delete(&mut self) -> Option<String> {
        self.session.confirm_delete()
    }

    pub fn cancel_delete(&mut self) {
        self.session.cancel_delete();
    }

    /// The server deleted `id`; remove it from its bucket
    pub fn asset_deleted(&mut self, id: &str) -> Option<Snapshot> {
        self.session.forget(id);
        let (bucket, index) = self.snapshot.remove(id)?;
        info!("Removed {} from {}[{}]", id, bucket, index);
        Some(self.snapshot.clone())
    }

    /// New uploads land at the tail of the pool
    pub fn uploaded<I, S>(&mut self, paths: I) -> Option<Snapshot>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids: Vec<String> = paths
            .into_iter()
            .map(|p| identifier_from_path(p.as_ref()).to_string())
            .collect();
        let added = self.snapshot.add_to_pool(ids);
        (added > 0).then(|| self.snapshot.clone())
    }

    /// Replace the model with a freshly loaded snapshot
    pub fn replace(&mut self, mut snapshot: Snapshot) {
        snapshot.normalize();
        self.snapshot = snapshot;
        self.session.reset();
    }

    /// Server was reset: empty every bucket and clear interaction state
    pub fn reset(&mut self) {
        self.snapshot.clear();
        self.session.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(Snapshot::from_buckets([
            (Bucket::S, vec!["s1"]),
            (Bucket::Pool, vec!["p1", "p2", "p3", "p4", "p5"]),
        ]))
    }

    #[test]
    fn test_drop_appends_to_tail() {
        let mut board = board();
        assert!(board.begin_drag("p2"));
        board.drag_enter(DropTarget::Bucket(Bucket::S));
        let saved = board.drop(DropTarget::Bucket(Bucket::S)).unwrap();
        board.end_drag();

        assert_eq!(saved.bucket(Bucket::S), ["s1", "p2"]);
        assert_eq!(saved.bucket(Bucket::Pool), ["p1", "p3", "p4", "p5"]);
        assert_eq!(board.snapshot(), &saved);
    }

    #[test]
    fn test_drop_without_drag_is_ignored() {
        let mut board = board();
        assert!(board.drop(DropTarget::Bucket(Bucket::A)).is_none());
        assert!(!board.begin_drag("ghost"));
    }

    #[test]
    fn test_keyboard_moves_use_bucket_geometry() {
        let mut board = board();
        // Pool wraps two per row: [p1 p2 / p3 p4 / p5]
        board.set_geometry(Bucket::Pool, GridGeometry::new(210.0, 100.0, 10.0));
        assert_eq!(board.items_per_row(Bucket::Pool), 2);

        board.click("p1");
        let saved = board.press_key(Key::Down).unwrap();
        assert_eq!(saved.bucket(Bucket::Pool), ["p2", "p3", "p1", "p4", "p5"]);

        let saved = board.press_key(Key::Down).unwrap();
        assert_eq!(saved.bucket(Bucket::Pool), ["p2", "p3", "p4", "p5", "p1"]);

        // Already last
        assert!(board.press_key(Key::Down).is_none());
        assert!(board.press_key(Key::Right).is_none());

        let saved = board.arrow(Direction::Up).unwrap();
        assert_eq!(saved.bucket(Bucket::Pool), ["p2", "p3", "p1", "p4", "p5"]);
    }

    #[test]
    fn test_noop_moves_do_not_persist() {
        let mut board = board();
        board.click("s1");
        assert!(board.press_key(Key::Left).is_none());
        assert!(board.press_key(Key::Up).is_none());
        assert!(board.arrow(Direction::Right).is_none());
    }

    #[test]
    fn test_click_on_unknown_item_ignored() {
        let mut board = board();
        assert_eq!(*board.click("ghost"), Selection::Unselected);
    }

    #[test]
    fn test_delete_flow() {
        let mut board = board();
        board.click("p3");
        board.begin_drag("p3");
        assert!(board.drop(DropTarget::DeleteZone).is_none());
        assert_eq!(board.session().pending_delete(), Some("p3"));

        let id = board.confirm_delete().unwrap();
        // Still present until the server confirms
        assert!(board.snapshot().contains(&id));

        let saved = board.asset_deleted(&id).unwrap();
        assert!(!saved.contains("p3"));
        assert_eq!(board.session().selected(), None);
        assert!(board.asset_deleted(&id).is_none());
    }

    #[test]
    fn test_cancel_delete_keeps_item() {
        let mut board = board();
        board.begin_drag("p1");
        board.drop(DropTarget::DeleteZone);
        board.cancel_delete();
        assert_eq!(board.session().pending_delete(), None);
        assert!(board.snapshot().contains("p1"));
    }

    #[test]
    fn test_uploaded_appends_identifiers_to_pool() {
        let mut board = Board::default();
        let saved = board
            .uploaded(["/images/tierImage-1-1.png", "/images/tierImage-1-2.png"])
            .unwrap();
        assert_eq!(saved.bucket(Bucket::Pool), ["tierImage-1-1.png", "tierImage-1-2.png"]);
        assert!(board.uploaded(["/images/tierImage-1-1.png"]).is_none());
    }

    #[test]
    fn test_two_upload_scenario_through_drops() {
        let mut board = Board::default();
        board.uploaded(["a", "b"]);

        board.begin_drag("a");
        board.drop(DropTarget::Bucket(Bucket::S));
        board.end_drag();
        assert_eq!(board.snapshot().bucket(Bucket::S), ["a"]);

        board.begin_drag("b");
        board.drop(DropTarget::Bucket(Bucket::S));
        board.end_drag();
        // Drops append; reorder with a directional move
        board.click("b");
        let saved = board.press_key(Key::Left).unwrap();
        assert_eq!(saved.bucket(Bucket::S), ["b", "a"]);
        assert!(saved.bucket(Bucket::Pool).is_empty());
    }

    #[test]
    fn test_reset_and_replace() {
        let mut board = board();
        board.click("p1");
        board.reset();
        assert!(board.snapshot().is_empty());
        assert_eq!(board.session().selected(), None);

        board.replace(Snapshot::from_buckets([(Bucket::A, vec!["x", "x"])]));
        assert_eq!(board.snapshot().bucket(Bucket::A), ["x"]);
    }
}
