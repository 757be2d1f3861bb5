//! Keyboard-triggered quick-action overlay.
//!
//! At most one overlay is open. It is anchored to a card and placed next to
//! it so that it stays inside the viewport:
//!
//! 1. right of the anchor, top-aligned;
//! 2. otherwise left of the anchor;
//! 3. otherwise below the anchor, left-aligned;
//!
//! and finally `top` is clamped so the overlay's bottom edge stays on screen.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use tracing::debug;

use tack_config::OverlayConfig;
use tack_core::task::{TaskId, TaskUpdates};

/// A rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Which side of the anchor the overlay ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Right,
    Left,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayPosition {
    pub left: i32,
    pub top: i32,
    pub placement: Placement,
}

/// Overlay size and its distance from the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayGeometry {
    pub width: i32,
    pub height: i32,
    pub gap: i32,
}

impl Default for OverlayGeometry {
    fn default() -> Self {
        Self::from(&OverlayConfig::default())
    }
}

impl From<&OverlayConfig> for OverlayGeometry {
    fn from(config: &OverlayConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            gap: config.gap,
        }
    }
}

pub fn compute_position(anchor: &Rect, viewport: Viewport, geometry: &OverlayGeometry) -> OverlayPosition {
    let mut placement = Placement::Right;
    let mut left = anchor.right() + geometry.gap;
    let mut top = anchor.top;

    if left + geometry.width > viewport.width {
        placement = Placement::Left;
        left = anchor.left - geometry.width - geometry.gap;
    }
    if left < 0 {
        placement = Placement::Below;
        top = anchor.bottom() + geometry.gap;
        left = anchor.left;
    }

    top = top.min(viewport.height - geometry.height).max(0);

    OverlayPosition {
        left,
        top,
        placement,
    }
}

// ---------------------------------------------------------------------------
// Quick actions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    Assign,
    DueDate,
    Tags,
}

impl QuickAction {
    /// Maps a shortcut key: `m` assign, `d` due date, `t` tags.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'm' => Some(Self::Assign),
            'd' => Some(Self::DueDate),
            't' => Some(Self::Tags),
            _ => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            Self::Assign => 'm',
            Self::DueDate => 'd',
            Self::Tags => 't',
        }
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assign => f.write_str("assign"),
            Self::DueDate => f.write_str("due date"),
            Self::Tags => f.write_str("tags"),
        }
    }
}

/// The value a quick action commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickActionValue {
    Assignee(Option<String>),
    DueDate(Option<NaiveDate>),
    Tags(BTreeSet<String>),
}

impl QuickActionValue {
    pub fn action(&self) -> QuickAction {
        match self {
            Self::Assignee(_) => QuickAction::Assign,
            Self::DueDate(_) => QuickAction::DueDate,
            Self::Tags(_) => QuickAction::Tags,
        }
    }

    pub fn into_updates(self) -> TaskUpdates {
        match self {
            Self::Assignee(a) => TaskUpdates::assignee(a),
            Self::DueDate(d) => TaskUpdates::due_date(d),
            Self::Tags(t) => TaskUpdates::tags(t),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OverlayState {
    #[default]
    Closed,
    Open {
        anchor_task_id: TaskId,
        action: QuickAction,
        position: OverlayPosition,
    },
}

/// The single quick-action overlay.
#[derive(Debug, Clone, Default)]
pub struct QuickActionOverlay {
    state: OverlayState,
    geometry: OverlayGeometry,
}

impl QuickActionOverlay {
    pub fn new(geometry: OverlayGeometry) -> Self {
        Self {
            state: OverlayState::Closed,
            geometry,
        }
    }

    pub fn state(&self) -> &OverlayState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != OverlayState::Closed
    }

    pub fn anchor_task_id(&self) -> Option<&TaskId> {
        match &self.state {
            OverlayState::Open { anchor_task_id, .. } => Some(anchor_task_id),
            OverlayState::Closed => None,
        }
    }

    pub fn action(&self) -> Option<QuickAction> {
        match &self.state {
            OverlayState::Open { action, .. } => Some(*action),
            OverlayState::Closed => None,
        }
    }

    pub fn position(&self) -> Option<OverlayPosition> {
        match &self.state {
            OverlayState::Open { position, .. } => Some(*position),
            OverlayState::Closed => None,
        }
    }

    /// Opens the overlay for `task_id`, replacing any open instance.
    pub fn open(&mut self, task_id: &str, action: QuickAction, anchor: &Rect, viewport: Viewport) -> OverlayPosition {
        let position = compute_position(anchor, viewport, &self.geometry);
        if let Some(previous) = self.anchor_task_id() {
            debug!(previous = %previous, "replacing open overlay");
        }
        debug!(task = task_id, %action, ?position, "opened quick-action overlay");
        self.state = OverlayState::Open {
            anchor_task_id: task_id.to_string(),
            action,
            position,
        };
        position
    }

    /// Recomputes the position from the anchor's current rectangle.
    pub fn reposition(&mut self, anchor: &Rect, viewport: Viewport) -> Option<OverlayPosition> {
        let geometry = self.geometry;
        match &mut self.state {
            OverlayState::Open { position, .. } => {
                *position = compute_position(anchor, viewport, &geometry);
                Some(*position)
            }
            OverlayState::Closed => None,
        }
    }

    /// Closes the overlay. Returns `true` if it was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = OverlayState::Closed;
        was_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GEOM: OverlayGeometry = OverlayGeometry {
        width: 240,
        height: 280,
        gap: 8,
    };

    fn on_screen(pos: &OverlayPosition, viewport: Viewport) -> bool {
        pos.top >= 0 && pos.top + GEOM.height <= viewport.height
    }

    #[test]
    fn prefers_right_of_anchor() {
        let vp = Viewport::new(1200, 800);
        let pos = compute_position(&Rect::new(100, 50, 200, 80), vp, &GEOM);
        assert_eq!(
            pos,
            OverlayPosition {
                left: 308,
                top: 50,
                placement: Placement::Right
            }
        );
        assert!(on_screen(&pos, vp));
    }

    #[test]
    fn flips_left_near_right_edge() {
        let vp = Viewport::new(1200, 800);
        let pos = compute_position(&Rect::new(900, 50, 200, 80), vp, &GEOM);
        assert_eq!(pos.placement, Placement::Left);
        assert_eq!(pos.left, 900 - 240 - 8);
        assert!(on_screen(&pos, vp));
    }

    #[test]
    fn falls_back_below_when_neither_side_fits() {
        let vp = Viewport::new(400, 800);
        let pos = compute_position(&Rect::new(20, 50, 300, 80), vp, &GEOM);
        assert_eq!(pos.placement, Placement::Below);
        assert_eq!(pos.left, 20);
        assert_eq!(pos.top, 138);
        assert!(on_screen(&pos, vp));
    }

    #[test]
    fn clamps_top_to_viewport_bottom() {
        let vp = Viewport::new(1200, 800);
        let pos = compute_position(&Rect::new(100, 700, 200, 80), vp, &GEOM);
        assert_eq!(pos.placement, Placement::Right);
        assert_eq!(pos.top, 800 - 280);
        assert!(on_screen(&pos, vp));

        let tiny = Viewport::new(1200, 100);
        assert_eq!(compute_position(&Rect::new(100, 50, 200, 80), tiny, &GEOM).top, 0);
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(QuickAction::from_key('m'), Some(QuickAction::Assign));
        assert_eq!(QuickAction::from_key('D'), Some(QuickAction::DueDate));
        assert_eq!(QuickAction::from_key('t'), Some(QuickAction::Tags));
        assert_eq!(QuickAction::from_key('x'), None);
        assert_eq!(QuickAction::Tags.key(), 't');
    }

    #[test]
    fn single_overlay_and_scroll_reposition() {
        let vp = Viewport::new(1200, 800);
        let mut overlay = QuickActionOverlay::new(GEOM);
        overlay.open("T1", QuickAction::Assign, &Rect::new(100, 50, 200, 80), vp);
        overlay.open("T2", QuickAction::Tags, &Rect::new(100, 200, 200, 80), vp);
        assert_eq!(overlay.anchor_task_id().map(String::as_str), Some("T2"));
        assert_eq!(overlay.action(), Some(QuickAction::Tags));

        let moved = overlay.reposition(&Rect::new(100, 120, 200, 80), vp).unwrap();
        assert_eq!(moved.top, 120);
        assert_eq!(overlay.position(), Some(moved));

        assert!(overlay.close());
        assert!(!overlay.close());
        assert!(overlay.reposition(&Rect::default(), vp).is_none());
    }

    #[test]
    fn values_become_updates() {
        let value = QuickActionValue::Assignee(Some("alice".into()));
        assert_eq!(value.action(), QuickAction::Assign);
        assert_eq!(value.into_updates(), TaskUpdates::assignee(Some("alice".into())));
    }
}
