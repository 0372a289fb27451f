use std::sync::Arc;
use parking_lot::Mutex;
use ahash::AHashMap;
use serde_json::{Map, Value};
use tracing::debug;

/// Event bus for interactions on the rendered chart, keyed by event name
/// (`plotly_click`, `plotly_hover`, ...).
pub struct EventBus {
    handlers: Arc<Mutex<AHashMap<String, Vec<Box<dyn EventHandler>>>>>,
}

/// Handler trait for event handlers
///
/// Handlers run while the bus is locked and must not subscribe or
/// unsubscribe from inside `handle`.
pub trait EventHandler: Send + Sync {
    fn handle(&mut self, payload: &Value);
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(AHashMap::new())),
        }
    }
    
    /// Subscribe a handler to a named event
    pub fn subscribe(&self, event: &str, handler: Box<dyn EventHandler>) {
        let mut handlers = self.handlers.lock();
        handlers.entry(event.to_string()).or_insert_with(Vec::new).push(handler);
        debug!(event, "subscribed chart event handler");
    }
    
    /// Remove every handler for a named event, returning how many were dropped
    pub fn unsubscribe_all(&self, event: &str) -> usize {
        let removed = self.handlers.lock().remove(event).map_or(0, |h| h.len());
        debug!(event, removed, "unsubscribed chart event handlers");
        removed
    }
    
    /// Number of handlers currently attached to an event
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.handlers.lock().get(event).map_or(0, Vec::len)
    }
    
    /// Publish an event. The payload is normalized once and the same
    /// normalized value is handed to every subscriber.
    pub fn publish(&self, event: &str, payload: &Value) {
        let mut handlers = self.handlers.lock();
        
        if let Some(event_handlers) = handlers.get_mut(event) {
            let payload = normalize_payload(payload);
            for handler in event_handlers.iter_mut() {
                handler.handle(&payload);
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce a chart event payload to something safe to send across a process
/// boundary.
///
/// Payloads carrying a `points` array become an array of `{x, y, z}`
/// objects; `z` is left out when absent or null. A `z` of `0` is a real
/// coordinate and is kept. Anything else passes through unchanged.
pub fn normalize_payload(payload: &Value) -> Value {
    match payload.get("points").and_then(Value::as_array) {
        Some(points) => Value::Array(points.iter().map(reduce_point).collect()),
        None => payload.clone(),
    }
}

fn reduce_point(point: &Value) -> Value {
    let mut reduced = Map::new();
    for axis in ["x", "y"] {
        if let Some(value) = point.get(axis) {
            reduced.insert(axis.to_string(), value.clone());
        }
    }
    if let Some(z) = point.get("z").filter(|z| !z.is_null()) {
        reduced.insert("z".to_string(), z.clone());
    }
    Value::Object(reduced)
}

/// Helper struct for creating event handlers from closures
pub struct ClosureEventHandler<F> {
    handler: F,
}

impl<F> EventHandler for ClosureEventHandler<F>
where
    F: FnMut(&Value) + Send + Sync,
{
    fn handle(&mut self, payload: &Value) {
        (self.handler)(payload);
    }
}

/// Create an event handler from a closure
pub fn handler_from_fn<F>(f: F) -> Box<dyn EventHandler>
where
    F: FnMut(&Value) + Send + Sync + 'static,
{
    Box::new(ClosureEventHandler { handler: f })
}
