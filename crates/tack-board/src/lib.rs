//! Board state engine for tack.
//!
//! [`Board`] ties the column model, the filter pipeline and a persistence
//! adapter together and drives them from discrete user gestures: drag
//! events, selection toggles, keyboard shortcuts and context-menu actions.
//! All mutations are optimistic and roll back when the adapter fails.

pub mod board;
pub mod channel;
pub mod clock;
pub mod drag;
pub mod error;
pub mod events;
pub mod overlay;
pub mod selection;

pub use board::{Board, BoardOptions, ContextAction};
pub use channel::{ChannelSink, DeliveryError, RecordingSink};
pub use clock::{Clock, FixedClock, SystemClock};
pub use drag::{CancelReason, DragController, DragError, DragKind, DropOutcome};
pub use error::{BoardError, Result};
pub use events::{BoardEvent, BoardListener, EventLog, Notice, NoticeLevel};
pub use overlay::{OverlayPosition, QuickAction, QuickActionOverlay, QuickActionValue, Rect, Viewport};
pub use selection::{Selection, Toggle};
