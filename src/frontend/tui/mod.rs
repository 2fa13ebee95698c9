//! TUI Frontend (ratatui-based)
//!
//! Implements the Frontend trait using ratatui for terminal rendering and
//! crossterm for events and terminal management.

pub mod app;
mod canvas;
mod chrome;
mod gates;
mod palette;
mod scenes;
mod slide_view;

pub use app::TuiFrontend;
