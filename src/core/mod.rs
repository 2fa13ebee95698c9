//! Core presentation logic
//!
//! Sequencing, gestures, timers and event routing. NO imports from
//! rendering code; frontends read AppCore and draw it.

pub mod app_core;
pub mod gesture;
pub mod input_result;
pub mod scheduler;
pub mod sequencer;

pub use app_core::AppCore;
pub use sequencer::{Direction, SlideSequencer};
