//! Input session
//!
//! Holds the interaction state that both input modalities share: the current
//! mode, the selected item, the item being dragged, the highlighted drop
//! target and the item staged for deletion. Nothing here touches the
//! position model; gestures are translated into [`KeyAction`]/[`DropAction`]
//! values that the [`Board`](crate::Board) applies.
//!
//! Selection state machine:
//!
//! | from            | event          | to            |
//! |-----------------|----------------|---------------|
//! | `Unselected`    | `click(X)`     | `Selected(X)` |
//! | `Selected(X)`   | `click(X)`     | `Unselected`  |
//! | `Selected(X)`   | `click(Y)`     | `Selected(Y)` |
//! | any             | Escape / mode  | `Unselected`  |

use crate::model::{Bucket, Direction};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Which input modalities are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Pointer drag-and-drop only; selection and keyboard movement disabled
    Drag,
    /// Click-to-select only; drag initiation suppressed
    Click,
    /// Both modalities at once
    #[default]
    Both,
}

impl InteractionMode {
    pub fn allows_drag(self) -> bool {
        matches!(self, InteractionMode::Drag | InteractionMode::Both)
    }

    pub fn allows_selection(self) -> bool {
        matches!(self, InteractionMode::Click | InteractionMode::Both)
    }
}

impl FromStr for InteractionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "drag" => Ok(InteractionMode::Drag),
            "click" => Ok(InteractionMode::Click),
            "both" => Ok(InteractionMode::Both),
            other => Err(Error::InvalidInput(format!("unknown interaction mode: {}", other))),
        }
    }
}

/// Current selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(String),
}

/// Where a dragged item can be released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Bucket(Bucket),
    DeleteZone,
}

/// Keys the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Key {
        match name {
            "ArrowLeft" => Key::Left,
            "ArrowRight" => Key::Right,
            "ArrowUp" => Key::Up,
            "ArrowDown" => Key::Down,
            "Escape" | "Esc" => Key::Escape,
            _ => Key::Other,
        }
    }

    fn direction(self) -> Option<Direction> {
        match self {
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Escape | Key::Other => None,
        }
    }
}

/// What a key press asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Move { id: String, direction: Direction },
    /// Selection (or a staged deletion) was cleared
    Cleared,
    Ignored,
}

/// What a drop asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    /// Append `id` to the tail of `bucket`
    Move { id: String, bucket: Bucket },
    /// Item is awaiting delete confirmation
    StageDelete(String),
    Ignored,
}

/// Interaction state for one user session
#[derive(Debug, Clone, Default)]
pub struct Session {
    mode: InteractionMode,
    selection: Selection,
    dragged: Option<String>,
    highlighted: Option<DropTarget>,
    pending_delete: Option<String>,
}

impl Session {
    pub fn new(mode: InteractionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selected(&self) -> Option<&str> {
        match &self.selection {
            Selection::Selected(id) => Some(id),
            Selection::Unselected => None,
        }
    }

    pub fn dragged(&self) -> Option<&str> {
        self.dragged.as_deref()
    }

    pub fn highlighted(&self) -> Option<DropTarget> {
        self.highlighted
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    /// Switch modality; always clears the selection and any drag in progress
    pub fn set_mode(&mut self, mode: InteractionMode) {
        debug!("Interaction mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        self.selection = Selection::Unselected;
        self.dragged = None;
        self.highlighted = None;
    }

    /// Toggle selection of `id`
    pub fn click(&mut self, id: &str) -> &Selection {
        if !self.mode.allows_selection() || self.pending_delete.is_some() {
            return &self.selection;
        }
        self.selection = match &self.selection {
            Selection::Selected(current) if current == id => Selection::Unselected,
            _ => Selection::Selected(id.to_string()),
        };
        &self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::Unselected;
    }

    /// Keyboard input
    ///
    /// Arrow keys move the selected item. Escape cancels a staged deletion
    /// if one is open, otherwise clears the selection.
    pub fn press_key(&mut self, key: Key) -> KeyAction {
        if key == Key::Escape && self.pending_delete.take().is_some() {
            return KeyAction::Cleared;
        }
        if !self.mode.allows_selection() || self.pending_delete.is_some() {
            return KeyAction::Ignored;
        }

        if key == Key::Escape {
            return match std::mem::take(&mut self.selection) {
                Selection::Selected(_) => KeyAction::Cleared,
                Selection::Unselected => KeyAction::Ignored,
            };
        }

        match (key.direction(), self.selected()) {
            (Some(direction), Some(id)) => KeyAction::Move {
                id: id.to_string(),
                direction,
            },
            _ => KeyAction::Ignored,
        }
    }

    /// On-item arrow buttons act on the selected item
    pub fn arrow(&self, direction: Direction) -> Option<(String, Direction)> {
        if !self.mode.allows_selection() || self.pending_delete.is_some() {
            return None;
        }
        self.selected().map(|id| (id.to_string(), direction))
    }

    /// Start dragging `id`; refused in click-only mode or while a deletion is pending
    pub fn begin_drag(&mut self, id: &str) -> bool {
        if !self.mode.allows_drag() || self.pending_delete.is_some() {
            return false;
        }
        self.dragged = Some(id.to_string());
        true
    }

    pub fn drag_enter(&mut self, target: DropTarget) {
        if self.dragged.is_some() {
            self.highlighted = Some(target);
        }
    }

    pub fn drag_leave(&mut self, target: DropTarget) {
        if self.highlighted == Some(target) {
            self.highlighted = None;
        }
    }

    /// Release the dragged item over `target`
    pub fn drop(&mut self, target: DropTarget) -> DropAction {
        self.highlighted = None;
        let Some(id) = self.dragged.take() else {
            return DropAction::Ignored;
        };

        match target {
            DropTarget::Bucket(bucket) => DropAction::Move { id, bucket },
            DropTarget::DeleteZone => {
                self.pending_delete = Some(id.clone());
                DropAction::StageDelete(id)
            }
        }
    }

    /// Drag finished (dropped or abandoned)
    pub fn end_drag(&mut self) {
        self.dragged = None;
        self.highlighted = None;
    }

    /// User confirmed the staged deletion; returns the item to delete
    pub fn confirm_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }

    pub fn cancel_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }

    /// Drop every reference to an item that no longer exists
    pub fn forget(&mut self, id: &str) {
        if self.selected() == Some(id) {
            self.selection = Selection::Unselected;
        }
        if self.dragged.as_deref() == Some(id) {
            self.dragged = None;
            self.highlighted = None;
        }
        if self.pending_delete.as_deref() == Some(id) {
            self.pending_delete = None;
        }
    }

    /// Return to the initial state, keeping the mode
    pub fn reset(&mut self) {
        *self = Session::new(self.mode);
    }
}
