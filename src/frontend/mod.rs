//! Frontend abstraction layer
//!
//! This module defines the `Frontend` trait the terminal frontend implements:
//! event polling, rendering and cleanup behind one interface.

pub mod events;
pub mod tui;

use crate::core::AppCore;
use anyhow::Result;
pub use events::FrontendEvent;
pub use tui::TuiFrontend;

/// Frontend trait
///
/// Separates rendering concerns from presentation logic. The frontend turns
/// native input into `FrontendEvent`s and draws the core's state each frame.
pub trait Frontend {
    /// Poll for user input events, waiting at most `timeout` for the first one
    ///
    /// # Returns
    /// - `Ok(Vec<FrontendEvent>)` - List of events (empty if no events)
    /// - `Err(...)` - If event polling failed
    fn poll_events(&mut self, timeout: std::time::Duration) -> Result<Vec<FrontendEvent>>;

    /// Render the current application state
    ///
    /// Mutable because rendering records element bounds into `core.ui_state`
    /// for hit testing and gesture measurement.
    fn render(&mut self, core: &mut AppCore) -> Result<()>;

    /// Restore the terminal before exit
    fn cleanup(&mut self) -> Result<()>;

    /// Current terminal size in cells
    fn size(&self) -> (u16, u16);
}
