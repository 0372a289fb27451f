//! Wire messages exchanged with the host
//!
//! Every message is a JSON object tagged by `type`. After the plugin
//! announces itself with `initialized`, the host answers `connected` and
//! may then issue `call`s, each answered by a `reply` with the same id.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::BridgeError;

/// Name the editor registers under. Existing hosts look plugins up by this
/// name, so it must not change.
pub const DEFAULT_SESSION_NAME: &str = "ImJoy Chart Editor";

/// Operations the editor exposes to the host
pub const EXPORTED_METHODS: [&str; 6] = ["setup", "run", "setState", "getState", "on", "off"];

/// Reference to a function living on the host side
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackId(pub String);

impl From<&str> for CallbackId {
    fn from(id: &str) -> Self {
        CallbackId(id.to_string())
    }
}

/// Messages sent by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    /// Completes the handshake
    Connected,
    
    /// Invoke an exported operation with positional arguments
    Call {
        id: u64,
        method: String,
        #[serde(default)]
        args: Vec<Value>,
    },
}

/// Messages sent by the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PluginMessage {
    /// Handshake announcement
    Initialized { name: String, methods: Vec<String> },
    
    /// Answer to a call; exactly one of `result` and `error` is set
    Reply {
        id: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    
    /// Invoke a host callback
    Callback { callback: CallbackId, args: Vec<Value> },
}

/// Wire shape of the `run` context
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WireRunContext {
    #[serde(default)]
    pub config: Option<WireRunConfig>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WireRunConfig {
    #[serde(default, rename = "saveDataHandler")]
    pub save_data_handler: Option<CallbackId>,
}

/// A decoded host call
#[derive(Debug, Clone, PartialEq)]
pub enum MethodCall {
    Setup,
    Run(WireRunContext),
    SetState(Value),
    GetState,
    On { event: String, handler: CallbackId },
    Off { event: String },
}

impl MethodCall {
    /// Decode a method name and its positional arguments
    pub fn parse(method: &str, args: Vec<Value>) -> Result<Self, BridgeError> {
        let mut args = args.into_iter();
        let call = match method {
            "setup" => MethodCall::Setup,
            "run" => {
                let context = match args.next() {
                    None | Some(Value::Null) => WireRunContext::default(),
                    Some(value) => serde_json::from_value(value)?,
                };
                MethodCall::Run(context)
            }
            "setState" => MethodCall::SetState(required(&mut args, method, "state")?),
            "getState" => MethodCall::GetState,
            "on" => {
                let event = string_arg(&mut args, method, "event")?;
                let handler = serde_json::from_value(required(&mut args, method, "handler")?)?;
                MethodCall::On { event, handler }
            }
            "off" => MethodCall::Off {
                event: string_arg(&mut args, method, "event")?,
            },
            other => {
                return Err(BridgeError::InvalidCall(format!("unknown method `{}`", other)));
            }
        };
        Ok(call)
    }
}

fn required(args: &mut impl Iterator<Item = Value>, method: &str, name: &str) -> Result<Value, BridgeError> {
    args.next()
        .ok_or_else(|| BridgeError::InvalidCall(format!("`{}` expects a `{}` argument", method, name)))
}

fn string_arg(args: &mut impl Iterator<Item = Value>, method: &str, name: &str) -> Result<String, BridgeError> {
    match required(args, method, name)? {
        Value::String(s) => Ok(s),
        _ => Err(BridgeError::InvalidCall(format!("`{}` expects `{}` to be a string", method, name))),
    }
}
