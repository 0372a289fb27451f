//! The editor widget capability

use tracing::{error, info};

use ce_core::{ColumnSet, DataSourceOption, Document};
use crate::config::PlotConfig;

/// Everything the widget needs for one render pass
pub struct RenderView<'a> {
    pub document: &'a Document,
    pub data_sources: &'a ColumnSet,
    pub options: &'a [DataSourceOption],
    pub config: &'a PlotConfig,
    
    /// Whether a host save handler is available
    pub can_save: bool,
}

/// External chart-editing widget.
///
/// Edits made in the widget come back through
/// [`EditorApp::on_user_edit`](crate::EditorApp::on_user_edit), chart
/// interactions through
/// [`EditorApp::emit_chart_event`](crate::EditorApp::emit_chart_event).
pub trait EditorShell: Send + Sync {
    fn render(&self, view: &RenderView<'_>);
    
    /// Show a failure to the user
    fn report_error(&self, message: &str);
}

/// Shell without a UI that logs each render
#[derive(Debug, Default)]
pub struct HeadlessShell;

impl EditorShell for HeadlessShell {
    fn render(&self, view: &RenderView<'_>) {
        info!(
            traces = view.document.data.len(),
            frames = view.document.frames.len(),
            columns = view.data_sources.len(),
            options = view.options.len(),
            editable = view.config.editable,
            can_save = view.can_save,
            "render"
        );
    }
    
    fn report_error(&self, message: &str) {
        error!("{}", message);
    }
}
