use std::collections::VecDeque;

/// The number of operators that are remembered in addition to the current one.
pub(crate) const OP_HISTORY_DEPTH: usize = 16;

/// The names of the most recently executed operators.
///
/// Used to look back at what happened right before the current operator, for example
/// whether a `cm` directly follows a `q`.
#[derive(Debug, Clone, Default)]
pub struct OpHistory {
    // Newest at the back.
    ops: VecDeque<&'static str>,
}

impl OpHistory {
    /// Create a new, empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an executed operator, forgetting the oldest one if necessary.
    pub fn push(&mut self, name: &'static str) {
        if self.ops.len() > OP_HISTORY_DEPTH {
            self.ops.pop_front();
        }

        self.ops.push_back(name);
    }

    /// The operator that was executed `n` operators before the current one, or
    /// an empty string if there is none. `previous(0)` is the current operator.
    pub fn previous(&self, n: usize) -> &'static str {
        self.ops
            .len()
            .checked_sub(n + 1)
            .and_then(|i| self.ops.get(i))
            .copied()
            .unwrap_or("")
    }

    /// The number of recorded operators.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether no operator has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
