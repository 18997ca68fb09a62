//! Frame intervals on an action timeline.

use serde::{Deserialize, Serialize};

/// A host animation frame number.
///
/// Frames are integers and may be zero or negative before the dance starts.
pub type Frame = i32;

/// Interval `[start, end]` a clip occupies on a figure's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameSpan {
    /// First frame of the clip.
    pub start: Frame,
    /// Frame where the clip hands over to the next one.
    pub end: Frame,
}

impl FrameSpan {
    /// Creates a span.
    #[must_use]
    pub const fn new(start: Frame, end: Frame) -> Self {
        Self { start, end }
    }

    /// Creates a span of `duration` frames starting at `start`.
    #[must_use]
    pub const fn starting_at(start: Frame, duration: Frame) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    /// Like [`FrameSpan::starting_at`], but `None` when the end frame would
    /// not fit in a [`Frame`].
    #[must_use]
    pub const fn checked_starting_at(start: Frame, duration: Frame) -> Option<Self> {
        match start.checked_add(duration) {
            Some(end) => Some(Self { start, end }),
            None => None,
        }
    }

    /// Number of frames between start and end.
    #[must_use]
    pub const fn len(&self) -> Frame {
        self.end - self.start
    }

    /// True when start and end coincide.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}
