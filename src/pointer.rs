//! Pointer state shared between input handlers and the frame loop.
//!
//! The pointer is a single slot: input handlers overwrite it, the frame loop
//! reads it once per frame. There is no queue; the last write before a frame
//! is the one that frame sees.
//!
//! ```ignore
//! let pointer = PointerCell::new();
//! let writer = pointer.clone();
//!
//! writer.apply(PointerEvent::Moved(Vec2::new(120.0, 80.0)));
//! assert_eq!(pointer.get(), Some(Vec2::new(120.0, 80.0)));
//!
//! writer.apply(PointerEvent::Left);
//! assert_eq!(pointer.get(), None);
//! ```

use glam::Vec2;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use winit::event::{TouchPhase, WindowEvent};

/// Bit pattern meaning "no pointer". Two NaN halves, which `set` never stores.
const UNSET: u64 = u64::MAX;

fn pack(position: Vec2) -> u64 {
    ((position.x.to_bits() as u64) << 32) | position.y.to_bits() as u64
}

fn unpack(bits: u64) -> Vec2 {
    Vec2::new(f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
}

/// Input that changes the pointer slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Mouse moved or entered at the given surface position.
    Moved(Vec2),
    /// Mouse left the surface.
    Left,
    /// A touch started or moved.
    Touch(Vec2),
    /// The touch ended or was cancelled.
    TouchEnded,
}

/// Lock-free, clonable single-slot pointer position.
///
/// Clones share the same slot. Stores use `Release` and loads `Acquire`, so a
/// reader on another thread that observes a position also observes everything
/// written before it.
#[derive(Debug, Clone)]
pub struct PointerCell {
    slot: Arc<AtomicU64>,
}

impl PointerCell {
    /// Create an unset pointer.
    pub fn new() -> Self {
        Self {
            slot: Arc::new(AtomicU64::new(UNSET)),
        }
    }

    /// Current pointer position, if any.
    #[inline]
    pub fn get(&self) -> Option<Vec2> {
        match self.slot.load(Ordering::Acquire) {
            UNSET => None,
            bits => Some(unpack(bits)),
        }
    }

    /// Store a pointer position. Non-finite positions clear the slot.
    pub fn set(&self, position: Vec2) {
        let bits = if position.is_finite() {
            pack(position)
        } else {
            UNSET
        };
        self.slot.store(bits, Ordering::Release);
    }

    /// Clear the pointer.
    pub fn clear(&self) {
        self.slot.store(UNSET, Ordering::Release);
    }

    /// Apply an input event to the slot.
    pub fn apply(&self, event: PointerEvent) {
        match event {
            PointerEvent::Moved(position) | PointerEvent::Touch(position) => self.set(position),
            PointerEvent::Left | PointerEvent::TouchEnded => self.clear(),
        }
    }
}

impl Default for PointerCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Translate a winit window event into a pointer event, if it is one.
pub fn pointer_event(event: &WindowEvent) -> Option<PointerEvent> {
    match event {
        WindowEvent::CursorMoved { position, .. } => Some(PointerEvent::Moved(Vec2::new(
            position.x as f32,
            position.y as f32,
        ))),
        WindowEvent::CursorLeft { .. } => Some(PointerEvent::Left),
        WindowEvent::Touch(touch) => match touch.phase {
            TouchPhase::Started | TouchPhase::Moved => Some(PointerEvent::Touch(Vec2::new(
                touch.location.x as f32,
                touch.location.y as f32,
            ))),
            TouchPhase::Ended | TouchPhase::Cancelled => Some(PointerEvent::TouchEnded),
        },
        _ => None,
    }
}
