//! Handshake and call dispatch

use std::sync::Arc;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use ce_core::EventHandler;
use crate::api::{PluginApi, RunConfig, RunContext};
use crate::protocol::{CallbackId, HostMessage, MethodCall, PluginMessage, EXPORTED_METHODS};
use crate::transport::Transport;
use crate::BridgeError;

/// How the editor was started
pub enum Embedding {
    /// Running as the top-level window; no host to talk to
    TopLevel,
    
    /// Running inside a host, reachable over the given transport
    Framed(Box<dyn Transport>),
}

impl Embedding {
    pub fn is_embedded(&self) -> bool {
        matches!(self, Embedding::Framed(_))
    }
}

/// Sets up a session with the host
pub struct HostBridge {
    name: String,
    api: Arc<dyn PluginApi>,
}

/// An established host session
pub struct Session {
    api: Arc<dyn PluginApi>,
    transport: Box<dyn Transport>,
    outbound_tx: mpsc::UnboundedSender<PluginMessage>,
    outbound_rx: mpsc::UnboundedReceiver<PluginMessage>,
}

/// Event handler that forwards payloads to a host callback
pub struct RemoteCallback {
    id: CallbackId,
    outbound: mpsc::UnboundedSender<PluginMessage>,
}

impl EventHandler for RemoteCallback {
    fn handle(&mut self, payload: &Value) {
        let message = PluginMessage::Callback {
            callback: self.id.clone(),
            args: vec![payload.clone()],
        };
        if self.outbound.send(message).is_err() {
            debug!(callback = %self.id.0, "host session gone, dropping callback");
        }
    }
}

impl HostBridge {
    pub fn new(name: impl Into<String>, api: Arc<dyn PluginApi>) -> Self {
        Self {
            name: name.into(),
            api,
        }
    }
    
    /// Announce the editor and wait for the host to answer.
    ///
    /// Returns `Ok(None)` if the transport closes before the host connects;
    /// the editor then carries on standalone. There is no timeout.
    pub async fn connect(self, mut transport: Box<dyn Transport>) -> Result<Option<Session>, BridgeError> {
        transport
            .send(PluginMessage::Initialized {
                name: self.name.clone(),
                methods: EXPORTED_METHODS.iter().map(|m| m.to_string()).collect(),
            })
            .await?;
        debug!(name = %self.name, "sent handshake");
        
        loop {
            match transport.recv().await? {
                Some(HostMessage::Connected) => {
                    info!(name = %self.name, "host session established");
                    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
                    return Ok(Some(Session {
                        api: self.api,
                        transport,
                        outbound_tx,
                        outbound_rx,
                    }));
                }
                Some(HostMessage::Call { id, method, .. }) => {
                    warn!(id, method = %method, "call before handshake completed");
                    transport
                        .send(PluginMessage::Reply {
                            id,
                            result: None,
                            error: Some("session not established".to_string()),
                        })
                        .await?;
                }
                None => {
                    info!("host never connected, running standalone");
                    return Ok(None);
                }
            }
        }
    }
}

impl Session {
    /// Serve host calls and forward outbound callbacks until the host
    /// disconnects.
    pub async fn serve(mut self) -> Result<(), BridgeError> {
        loop {
            tokio::select! {
                message = self.transport.recv() => match message? {
                    Some(message) => self.handle(message).await?,
                    None => {
                        info!("host disconnected");
                        return Ok(());
                    }
                },
                Some(outbound) = self.outbound_rx.recv() => {
                    self.transport.send(outbound).await?;
                }
            }
        }
    }
    
    async fn handle(&mut self, message: HostMessage) -> Result<(), BridgeError> {
        match message {
            HostMessage::Connected => {
                debug!("ignoring repeated handshake");
                Ok(())
            }
            HostMessage::Call { id, method, args } => {
                let reply = match self.dispatch(&method, args) {
                    Ok(result) => PluginMessage::Reply { id, result: Some(result), error: None },
                    Err(e) => {
                        warn!(id, method = %method, error = %e, "host call failed");
                        PluginMessage::Reply { id, result: None, error: Some(e.to_string()) }
                    }
                };
                self.transport.send(reply).await
            }
        }
    }
    
    /// Decode and run one call
    pub fn dispatch(&self, method: &str, args: Vec<Value>) -> Result<Value, BridgeError> {
        debug!(method, "host call");
        match MethodCall::parse(method, args)? {
            MethodCall::Setup => {
                self.api.setup();
                Ok(Value::Null)
            }
            MethodCall::Run(context) => {
                let context = RunContext {
                    config: context.config.map(|config| RunConfig {
                        save_data_handler: config
                            .save_data_handler
                            .map(|id| self.remote_callback(id)),
                    }),
                    data: context.data,
                };
                self.api.run(context)?;
                Ok(Value::Null)
            }
            MethodCall::SetState(state) => {
                self.api.set_state(state)?;
                Ok(Value::Null)
            }
            MethodCall::GetState => Ok(self.api.get_state()),
            MethodCall::On { event, handler } => {
                self.api.on(&event, self.remote_callback(handler));
                Ok(Value::Null)
            }
            MethodCall::Off { event } => {
                self.api.off(&event);
                Ok(Value::Null)
            }
        }
    }
    
    fn remote_callback(&self, id: CallbackId) -> Box<dyn EventHandler> {
        Box::new(RemoteCallback {
            id,
            outbound: self.outbound_tx.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ce_core::{AppState, ColumnSet, EventBus, StateError};
    use parking_lot::{Mutex, RwLock};
    use serde_json::json;
    use crate::transport::{channel, HostEndpoint};
    
    /// Minimal editor: state plus an event bus
    #[derive(Default)]
    struct FakeEditor {
        state: RwLock<AppState>,
        events: EventBus,
        saver: Mutex<Option<Box<dyn EventHandler>>>,
        setups: Mutex<usize>,
    }
    
    impl FakeEditor {
        fn save(&self) -> bool {
            let snapshot = self.state.read().snapshot();
            match self.saver.lock().as_mut() {
                Some(handler) => {
                    handler.handle(&snapshot);
                    true
                }
                None => false,
            }
        }
    }
    
    impl PluginApi for FakeEditor {
        fn setup(&self) {
            *self.setups.lock() += 1;
        }
        
        fn run(&self, context: RunContext) -> Result<(), StateError> {
            if let Some(config) = context.config {
                *self.saver.lock() = config.save_data_handler;
            }
            if let Some(data) = context.data {
                self.state.write().apply_host_snapshot(data)?;
            }
            Ok(())
        }
        
        fn set_state(&self, state: Value) -> Result<(), StateError> {
            self.state.write().merge_state(state)
        }
        
        fn get_state(&self) -> Value {
            self.state.read().snapshot()
        }
        
        fn on(&self, event: &str, handler: Box<dyn EventHandler>) {
            self.events.subscribe(event, handler);
        }
        
        fn off(&self, event: &str) {
            self.events.unsubscribe_all(event);
        }
    }
    
    async fn connected(editor: Arc<FakeEditor>) -> (Session, HostEndpoint) {
        let (transport, mut host) = channel();
        host.send(HostMessage::Connected).unwrap();
        let session = HostBridge::new("test", editor)
            .connect(Box::new(transport))
            .await
            .unwrap()
            .expect("session");
        
        match host.recv().await {
            Some(PluginMessage::Initialized { name, methods }) => {
                assert_eq!(name, "test");
                assert_eq!(methods.len(), 6);
            }
            other => panic!("expected handshake, got {:?}", other),
        }
        (session, host)
    }
    
    #[tokio::test]
    async fn test_closed_transport_means_standalone() {
        let (transport, host) = channel();
        drop(host);
        
        let editor = Arc::new(FakeEditor::default());
        let result = HostBridge::new("test", editor).connect(Box::new(transport)).await;
        
        assert!(matches!(result, Ok(None) | Err(BridgeError::Closed)));
    }
    
    #[tokio::test]
    async fn test_calls_before_handshake_are_refused() {
        let (transport, mut host) = channel();
        host.call(1, "getState", vec![]).unwrap();
        host.send(HostMessage::Connected).unwrap();
        
        let editor = Arc::new(FakeEditor::default());
        let session = HostBridge::new("test", editor).connect(Box::new(transport)).await.unwrap();
        assert!(session.is_some());
        
        assert!(matches!(host.recv().await, Some(PluginMessage::Initialized { .. })));
        match host.recv().await {
            Some(PluginMessage::Reply { id: 1, error: Some(_), .. }) => {}
            other => panic!("expected refusal, got {:?}", other),
        }
    }
    
    #[tokio::test]
    async fn test_run_extracts_data_sources() {
        let editor = Arc::new(FakeEditor::default());
        let (session, _host) = connected(editor.clone()).await;
        
        session
            .dispatch("run", vec![json!({"data": {"dataSources": {"a": [1]}, "plotSpec": [{"type": "bar"}]}})])
            .unwrap();
        let state = session.dispatch("getState", vec![]).unwrap();
        
        assert!(state.get("dataSources").is_none());
        assert_eq!(state["plotSpec"], json!([{"type": "bar"}]));
        assert_eq!(editor.state.read().data_sources().get("a"), Some(&[json!(1)][..]));
    }
    
    #[tokio::test]
    async fn test_serve_replies_and_forwards_events() {
        let editor = Arc::new(FakeEditor::default());
        let (session, mut host) = connected(editor.clone()).await;
        let serving = tokio::spawn(session.serve());
        
        host.call(1, "setup", vec![]).unwrap();
        host.call(2, "on", vec![json!("plotly_click"), json!("click-cb")]).unwrap();
        host.call(3, "setState", vec![json!({"layout": {"title": "hi"}})]).unwrap();
        host.call(4, "getState", vec![]).unwrap();
        
        for expected in 1..=3 {
            match host.recv().await {
                Some(PluginMessage::Reply { id, error: None, .. }) => assert_eq!(id, expected),
                other => panic!("unexpected message {:?}", other),
            }
        }
        match host.recv().await {
            Some(PluginMessage::Reply { id: 4, result: Some(state), .. }) => {
                assert_eq!(state["layout"], json!({"title": "hi"}));
            }
            other => panic!("unexpected message {:?}", other),
        }
        assert_eq!(*editor.setups.lock(), 1);
        
        editor.events.publish("plotly_click", &json!({"points": [{"x": 1, "y": 2, "lat": 5}]}));
        match host.recv().await {
            Some(PluginMessage::Callback { callback, args }) => {
                assert_eq!(callback, CallbackId::from("click-cb"));
                assert_eq!(args, vec![json!([{"x": 1, "y": 2}])]);
            }
            other => panic!("unexpected message {:?}", other),
        }
        
        drop(host);
        serving.await.unwrap().unwrap();
    }
    
    #[tokio::test]
    async fn test_off_stops_forwarding() {
        let editor = Arc::new(FakeEditor::default());
        let (session, _host) = connected(editor.clone()).await;
        
        session.dispatch("on", vec![json!("plotly_hover"), json!("cb")]).unwrap();
        assert_eq!(editor.events.subscriber_count("plotly_hover"), 1);
        session.dispatch("off", vec![json!("plotly_hover")]).unwrap();
        assert_eq!(editor.events.subscriber_count("plotly_hover"), 0);
    }
    
    #[tokio::test]
    async fn test_save_handler_reaches_host() {
        let editor = Arc::new(FakeEditor::default());
        *editor.state.write() = AppState::new(ColumnSet::demo());
        let (session, mut host) = connected(editor.clone()).await;
        
        assert!(!editor.save());
        session
            .dispatch("run", vec![json!({"config": {"saveDataHandler": "save-cb"}})])
            .unwrap();
        let serving = tokio::spawn(session.serve());
        
        assert!(editor.save());
        match host.recv().await {
            Some(PluginMessage::Callback { callback, args }) => {
                assert_eq!(callback, CallbackId::from("save-cb"));
                assert_eq!(args[0]["data"], json!([]));
            }
            other => panic!("unexpected message {:?}", other),
        }
        
        drop(host);
        serving.await.unwrap().unwrap();
    }
    
    #[tokio::test]
    async fn test_bad_calls_get_error_replies() {
        let editor = Arc::new(FakeEditor::default());
        let (session, mut host) = connected(editor).await;
        let serving = tokio::spawn(session.serve());
        
        host.call(9, "setState", vec![json!([1, 2])]).unwrap();
        host.call(10, "nope", vec![]).unwrap();
        for expected in [9, 10] {
            match host.recv().await {
                Some(PluginMessage::Reply { id, result: None, error: Some(_) }) => assert_eq!(id, expected),
                other => panic!("unexpected message {:?}", other),
            }
        }
        
        drop(host);
        serving.await.unwrap().unwrap();
    }
}
