//! The chart editor application
//!
//! Wires the table loader, the document state and the host bridge around an
//! external chart-editing widget.

pub mod app;
pub mod config;
pub mod shell;

pub use app::EditorApp;
pub use config::{EditorConfig, LaunchParams, PlotConfig};
pub use shell::{EditorShell, HeadlessShell, RenderView};
