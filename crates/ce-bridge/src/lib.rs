//! Remote-procedure bridge between an embedded editor and its host
//!
//! The host calls the operations of [`PluginApi`] over a [`Transport`];
//! the editor answers each call and pushes chart events and save requests
//! back through host-owned callbacks.

pub mod api;
pub mod bridge;
pub mod protocol;
pub mod transport;

use thiserror::Error;

pub use api::{PluginApi, RunConfig, RunContext};
pub use bridge::{Embedding, HostBridge, RemoteCallback, Session};
pub use protocol::{CallbackId, HostMessage, MethodCall, PluginMessage, DEFAULT_SESSION_NAME};
pub use transport::{channel, ChannelTransport, HostEndpoint, LineTransport, Transport};

/// Errors raised by the bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Invalid call: {0}")]
    InvalidCall(String),
    
    #[error("State error: {0}")]
    State(#[from] ce_core::StateError),
    
    #[error("Encoding error: {0}")]
    Codec(#[from] serde_json::Error),
    
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("Transport closed")]
    Closed,
}
