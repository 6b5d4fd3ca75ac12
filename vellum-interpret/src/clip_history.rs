use crate::state::FillRule;
use kurbo::BezPath;

/// A clip path together with its fill rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPath {
    /// The path, in user space at the time the clip was set.
    pub path: BezPath,
    /// The fill rule.
    pub rule: FillRule,
}

/// The history of clip paths, saved and restored together with the graphics state.
///
/// The graphics state doesn't keep the clip path around once the path it was built
/// from has been consumed. Shading operators need the region they are clipped to,
/// which is what this records.
#[derive(Debug, Clone, Default)]
pub struct ClipHistory {
    current: Option<ClipPath>,
    saved: Vec<Option<ClipPath>>,
}

impl ClipHistory {
    /// Create a new, empty clip history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current clip path.
    pub fn set_clip(&mut self, path: BezPath, rule: FillRule) {
        self.current = Some(ClipPath { path, rule });
    }

    /// The current clip path, if any.
    pub fn clip(&self) -> Option<&ClipPath> {
        self.current.as_ref()
    }

    /// Whether a clip path is set.
    pub fn has_clip(&self) -> bool {
        self.current.is_some()
    }

    /// Push a copy of the current entry.
    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Pop back to the previously saved entry. Without a saved entry, nothing happens.
    pub fn restore(&mut self) {
        if let Some(prev) = self.saved.pop() {
            self.current = prev;
        }
    }

    /// Whether there are saved entries.
    pub fn has_saves(&self) -> bool {
        !self.saved.is_empty()
    }

    /// The number of saved entries.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}
