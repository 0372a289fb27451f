use serde_json::Value;
use ce_core::{EventHandler, StateError};

/// Operations the editor exposes to its host.
///
/// Calls arrive one at a time; implementations need no coordination beyond
/// their own interior locking.
pub trait PluginApi: Send + Sync {
    /// Called once when the host has finished initializing
    fn setup(&self);
    
    /// Hand over host configuration and, optionally, a state snapshot
    fn run(&self, context: RunContext) -> Result<(), StateError>;
    
    /// Shallow-merge a partial state
    fn set_state(&self, state: Value) -> Result<(), StateError>;
    
    /// Current state snapshot
    fn get_state(&self) -> Value;
    
    /// Subscribe to a named chart event
    fn on(&self, event: &str, handler: Box<dyn EventHandler>);
    
    /// Drop every subscription for a named chart event
    fn off(&self, event: &str);
}

/// Argument of [`PluginApi::run`]
#[derive(Default)]
pub struct RunContext {
    pub config: Option<RunConfig>,
    pub data: Option<Value>,
}

/// Host configuration passed to `run`
#[derive(Default)]
pub struct RunConfig {
    /// Invoked with the current state when the user asks to save
    pub save_data_handler: Option<Box<dyn EventHandler>>,
}
