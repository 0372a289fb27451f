//! Transports carrying bridge messages

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::mpsc;
use tracing::warn;

use crate::protocol::{HostMessage, PluginMessage};
use crate::BridgeError;

/// A bidirectional message channel to the host.
///
/// `recv` must be cancel-safe: the session polls it alongside its outbound
/// queue. `Ok(None)` means the host went away.
#[async_trait]
pub trait Transport: Send {
    async fn send(&mut self, message: PluginMessage) -> Result<(), BridgeError>;
    
    async fn recv(&mut self) -> Result<Option<HostMessage>, BridgeError>;
}

/// In-process transport, paired with a [`HostEndpoint`]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<PluginMessage>,
    rx: mpsc::UnboundedReceiver<HostMessage>,
}

/// Host side of an in-process transport
pub struct HostEndpoint {
    tx: mpsc::UnboundedSender<HostMessage>,
    rx: mpsc::UnboundedReceiver<PluginMessage>,
}

/// Create a connected transport / host endpoint pair
pub fn channel() -> (ChannelTransport, HostEndpoint) {
    let (plugin_tx, host_rx) = mpsc::unbounded_channel();
    let (host_tx, plugin_rx) = mpsc::unbounded_channel();
    (
        ChannelTransport { tx: plugin_tx, rx: plugin_rx },
        HostEndpoint { tx: host_tx, rx: host_rx },
    )
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn send(&mut self, message: PluginMessage) -> Result<(), BridgeError> {
        self.tx.send(message).map_err(|_| BridgeError::Closed)
    }
    
    async fn recv(&mut self) -> Result<Option<HostMessage>, BridgeError> {
        Ok(self.rx.recv().await)
    }
}

impl HostEndpoint {
    pub fn send(&self, message: HostMessage) -> Result<(), BridgeError> {
        self.tx.send(message).map_err(|_| BridgeError::Closed)
    }
    
    /// Issue a call to the plugin
    pub fn call(&self, id: u64, method: &str, args: Vec<serde_json::Value>) -> Result<(), BridgeError> {
        self.send(HostMessage::Call {
            id,
            method: method.to_string(),
            args,
        })
    }
    
    /// Next message from the plugin, `None` once the plugin dropped its end
    pub async fn recv(&mut self) -> Option<PluginMessage> {
        self.rx.recv().await
    }
}

/// Newline-delimited JSON over a byte stream, e.g. stdin/stdout of a
/// process spawned by its host.
pub struct LineTransport<R, W> {
    lines: Lines<BufReader<R>>,
    writer: W,
}

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            writer,
        }
    }
}

impl LineTransport<tokio::io::Stdin, tokio::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

#[async_trait]
impl<R, W> Transport for LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, message: PluginMessage) -> Result<(), BridgeError> {
        let mut line = serde_json::to_string(&message)?;
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
    
    async fn recv(&mut self) -> Result<Option<HostMessage>, BridgeError> {
        loop {
            let Some(line) = self.lines.next_line().await? else {
                return Ok(None);
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(message) => return Ok(Some(message)),
                Err(e) => warn!(error = %e, "skipping undecodable host message"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    
    #[tokio::test]
    async fn test_line_transport_skips_noise() {
        let input = b"\n{\"type\":\"connected\"}\nnot json\n{\"type\":\"call\",\"id\":1,\"method\":\"setup\"}\n";
        let mut output = Vec::new();
        let mut transport = LineTransport::new(&input[..], &mut output);
        
        assert_eq!(transport.recv().await.unwrap(), Some(HostMessage::Connected));
        assert!(matches!(transport.recv().await.unwrap(), Some(HostMessage::Call { id: 1, .. })));
        assert_eq!(transport.recv().await.unwrap(), None);
        
        transport
            .send(PluginMessage::Reply { id: 1, result: Some(json!(null)), error: None })
            .await
            .unwrap();
        drop(transport);
        
        assert_eq!(String::from_utf8(output).unwrap(), "{\"type\":\"reply\",\"id\":1,\"result\":null}\n");
    }
    
    #[tokio::test]
    async fn test_channel_pair() {
        let (mut transport, mut host) = channel();
        host.send(HostMessage::Connected).unwrap();
        assert_eq!(transport.recv().await.unwrap(), Some(HostMessage::Connected));
        
        transport
            .send(PluginMessage::Callback { callback: "cb".into(), args: vec![] })
            .await
            .unwrap();
        assert!(matches!(host.recv().await, Some(PluginMessage::Callback { .. })));
        
        drop(host);
        assert_eq!(transport.recv().await.unwrap(), None);
    }
}
