//! Live preview during a drag.
//!
//! Move events are coalesced with a "latest wins" window: the first move
//! after the window has elapsed is applied immediately, anything arriving
//! sooner replaces the pending move. The caller flushes a pending move with
//! [`PreviewController::due`] once the window has passed; `end` and
//! `cancel` simply drop it.

use std::time::Duration;

use crate::model::board::Board;
use crate::model::geometry::{Point, Rect};

/// One pointer sample during a drag
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DragInput {
    /// Pointer position
    pub pointer: Point,
    /// Current bounding box of the dragged entity
    pub dragged: Rect,
    /// Monotonic event timestamp
    #[serde(with = "millis")]
    pub at: Duration,
}

impl DragInput {
    pub fn new(pointer: Point, dragged: Rect, at: Duration) -> Self {
        DragInput {
            pointer,
            dragged,
            at,
        }
    }

    /// A sample where the dragged box is centered on the pointer
    pub fn centered(pointer: Point, size: (f64, f64), at: Duration) -> Self {
        let dragged = Rect::new(0.0, 0.0, size.0, size.1).centered_on(pointer);
        Self::new(pointer, dragged, at)
    }
}

/// Speculative board plus move coalescing for one drag
#[derive(Debug, Clone, Default)]
pub struct PreviewController {
    window: Duration,
    last_applied: Option<Duration>,
    pending: Option<DragInput>,
    preview: Option<Board>,
}

impl PreviewController {
    pub fn new(window: Duration) -> Self {
        PreviewController {
            window,
            ..Default::default()
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Start previewing from the committed board
    pub fn begin(&mut self, committed: &Board) {
        self.last_applied = None;
        self.pending = None;
        self.preview = Some(committed.clone());
    }

    /// Offer a move. Returns the input if it should be applied now, or
    /// `None` if it was held back as the pending move.
    pub fn offer(&mut self, input: DragInput) -> Option<DragInput> {
        if self.window_open(input.at) {
            self.last_applied = Some(input.at);
            self.pending = None;
            Some(input)
        } else {
            self.pending = Some(input);
            None
        }
    }

    /// Take the pending move if its window has elapsed by `now`
    pub fn due(&mut self, now: Duration) -> Option<DragInput> {
        if self.pending.is_some() && self.window_open(now) {
            self.last_applied = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Take the pending move regardless of timing
    pub fn flush(&mut self) -> Option<DragInput> {
        let input = self.pending.take()?;
        self.last_applied = Some(input.at);
        Some(input)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_preview(&mut self, board: Board) {
        self.preview = Some(board);
    }

    pub fn preview(&self) -> Option<&Board> {
        self.preview.as_ref()
    }

    /// Drop the preview and any pending move
    pub fn discard(&mut self) {
        self.pending = None;
        self.last_applied = None;
        self.preview = None;
    }

    fn window_open(&self, at: Duration) -> bool {
        match self.last_applied {
            None => true,
            Some(last) => at.saturating_sub(last) >= self.window,
        }
    }
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
