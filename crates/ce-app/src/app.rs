//! The editor application object

use std::sync::Arc;
use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use ce_bridge::{BridgeError, Embedding, HostBridge, PluginApi, RunContext, Session};
use ce_core::{AppState, ColumnSet, DataSourceOption, EventBus, EventHandler, StateError};
use ce_data::{DataError, Loaded, Source, TableLoader};

use crate::config::{EditorConfig, LaunchParams};
use crate::shell::{EditorShell, RenderView};

/// One editor per process: document state, data sources, chart events and
/// the optional host save handler.
pub struct EditorApp {
    config: EditorConfig,
    state: Arc<RwLock<AppState>>,
    events: Arc<EventBus>,
    shell: Arc<dyn EditorShell>,
    loader: TableLoader,
    save_handler: Mutex<Option<Box<dyn EventHandler>>>,
}

impl EditorApp {
    pub fn new(config: EditorConfig, shell: Arc<dyn EditorShell>) -> Self {
        let loader = TableLoader::new(config.loader.clone());
        Self::with_loader(config, shell, loader)
    }
    
    pub fn with_loader(config: EditorConfig, shell: Arc<dyn EditorShell>, loader: TableLoader) -> Self {
        Self {
            config,
            state: Arc::new(RwLock::new(AppState::default())),
            events: Arc::new(EventBus::new()),
            shell,
            loader,
            save_handler: Mutex::new(None),
        }
    }
    
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }
    
    /// Load the `load` launch parameter, or seed the demo columns when there
    /// is none. Load failures are reported through the shell.
    pub async fn startup(&self, params: &LaunchParams) {
        match &params.load {
            Some(url) => {
                info!(source = %url, "loading launch source");
                // Already reported to the user by `load`
                let _ = self.load(Source::Url(url.clone())).await;
            }
            None => {
                if self.config.seed_demo_data {
                    self.state.write().set_data_sources(ColumnSet::demo());
                }
                self.render();
            }
        }
    }
    
    /// Set up the host session if the editor is embedded.
    ///
    /// A failed or unanswered handshake leaves the editor standalone.
    pub async fn connect(self: &Arc<Self>, embedding: Embedding) -> Option<Session> {
        let transport = match embedding {
            Embedding::TopLevel => {
                debug!("top-level window, no host bridge");
                return None;
            }
            Embedding::Framed(transport) => transport,
        };
        
        let api: Arc<dyn PluginApi> = self.clone();
        match HostBridge::new(self.config.session_name.clone(), api).connect(transport).await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "host handshake failed, running standalone");
                None
            }
        }
    }
    
    /// Run startup and the host session side by side.
    ///
    /// The host is served as soon as the handshake completes, even while the
    /// launch source is still loading. Returns `true` once a host session has
    /// ended, `false` if the editor is standalone.
    pub async fn launch(self: &Arc<Self>, params: &LaunchParams, embedding: Embedding) -> Result<bool, BridgeError> {
        let serving = async {
            match self.connect(embedding).await {
                Some(session) => session.serve().await.map(|()| true),
                None => Ok(false),
            }
        };
        let ((), served) = tokio::join!(self.startup(params), serving);
        served
    }
    
    /// Load a table or a saved chart and apply it.
    ///
    /// Tables replace the data sources, documents replace the chart. On
    /// failure the error is shown to the user and state is left as it was.
    pub async fn load(&self, source: Source) -> Result<(), DataError> {
        match self.loader.load_logged(&source).await {
            Ok(Loaded::Document(document)) => {
                self.state.write().replace_document(document);
            }
            Ok(Loaded::Table(columns)) => {
                self.state.write().set_data_sources(columns);
            }
            Err(e) => {
                self.shell.report_error(&e.to_string());
                return Err(e);
            }
        }
        self.render();
        Ok(())
    }
    
    /// Apply an edit made in the widget
    pub fn on_user_edit(&self, data: Vec<Value>, layout: Map<String, Value>, frames: Vec<Value>) {
        self.state.write().apply_edit(data, layout, frames);
        self.render();
    }
    
    /// Publish an interaction on the rendered chart to subscribers
    pub fn emit_chart_event(&self, event: &str, payload: &Value) {
        self.events.publish(event, payload);
    }
    
    /// Hand the current state to the host's save handler.
    ///
    /// Returns `false` when the host did not provide one.
    pub fn save(&self) -> bool {
        let snapshot = self.state.read().snapshot();
        match self.save_handler.lock().as_mut() {
            Some(handler) => {
                handler.handle(&snapshot);
                info!("state handed to host for saving");
                true
            }
            None => {
                debug!("save requested without a host save handler");
                false
            }
        }
    }
    
    pub fn can_save(&self) -> bool {
        self.save_handler.lock().is_some()
    }
    
    pub fn snapshot(&self) -> Value {
        self.state.read().snapshot()
    }
    
    pub fn data_sources(&self) -> ColumnSet {
        self.state.read().data_sources().clone()
    }
    
    pub fn data_source_options(&self) -> Vec<DataSourceOption> {
        self.state.read().data_source_options().to_vec()
    }
    
    /// Render from the current state
    pub fn render(&self) {
        let can_save = self.can_save();
        let state = self.state.read();
        self.shell.render(&RenderView {
            document: state.document(),
            data_sources: state.data_sources(),
            options: state.data_source_options(),
            config: &self.config.plot,
            can_save,
        });
    }
}

impl PluginApi for EditorApp {
    fn setup(&self) {
        info!("host bridge initialized");
    }
    
    fn run(&self, context: RunContext) -> Result<(), StateError> {
        // A rejected snapshot leaves the save handler untouched too
        if let Some(data) = context.data {
            self.state.write().apply_host_snapshot(data)?;
        }
        if let Some(config) = context.config {
            *self.save_handler.lock() = config.save_data_handler;
        }
        self.render();
        Ok(())
    }
    
    fn set_state(&self, state: Value) -> Result<(), StateError> {
        self.state.write().merge_state(state)?;
        self.render();
        Ok(())
    }
    
    fn get_state(&self) -> Value {
        self.snapshot()
    }
    
    fn on(&self, event: &str, handler: Box<dyn EventHandler>) {
        self.events.subscribe(event, handler);
    }
    
    fn off(&self, event: &str) {
        self.events.unsubscribe_all(event);
    }
}
