//! Unified enum describing what should happen after a widget handles input.
//!
//! This keeps AppCore agnostic of the specific gate being shown; it simply
//! matches on `InputResult` and arms the requested timers.

use std::time::Duration;

/// Timers a widget asks to have delivered back to itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetTimer {
    /// BookOpen: fade in the manuscript pages
    RevealManuscript,
}

/// Result of handling input in a gate widget
#[derive(Debug, Clone, PartialEq)]
pub enum InputResult {
    /// The event was not for this widget
    Ignored,

    /// Handled, no state change visible to the sequencer
    Continue,

    /// The gate is satisfied; signal completion after `complete_after`
    /// (lets the celebration play out) and arm any widget timers
    Satisfied {
        complete_after: Duration,
        timers: Vec<(Duration, WidgetTimer)>,
    },
}

impl InputResult {
    pub fn satisfied(complete_after: Duration) -> Self {
        InputResult::Satisfied {
            complete_after,
            timers: Vec::new(),
        }
    }

    /// Check if this result satisfies the gate
    #[cfg(test)]
    pub fn is_satisfied(&self) -> bool {
        matches!(self, InputResult::Satisfied { .. })
    }

    pub fn was_handled(&self) -> bool {
        !matches!(self, InputResult::Ignored)
    }
}
