//! Client configuration.

/// The endpoint the reference authority listens on.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080/ws";

/// Configuration for a [`GameClient`](crate::GameClient).
///
/// Start from `ClientConfig::default()` and override what you need:
///
/// ```rust
/// use othello::ClientConfig;
///
/// let config = ClientConfig::default().with_endpoint("ws://10.0.0.5:8080/ws");
/// assert_eq!(config.endpoint, "ws://10.0.0.5:8080/ws");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket URL of the game authority.
    pub endpoint: String,

    /// Capacity of the channel carrying user actions to the dispatcher.
    ///
    /// Default: 32. Zero is clamped to 1.
    pub command_capacity: usize,

    /// Capacity of the channel carrying inbound frames to the dispatcher.
    /// When full, the socket reader waits; frames are never dropped.
    ///
    /// Default: 64. Zero is clamped to 1.
    pub inbound_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            command_capacity: 32,
            inbound_capacity: 64,
        }
    }
}

impl ClientConfig {
    /// Sets the authority's WebSocket URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the command channel capacity.
    pub fn with_command_capacity(mut self, capacity: usize) -> Self {
        self.command_capacity = capacity;
        self
    }

    /// Sets the inbound frame channel capacity.
    pub fn with_inbound_capacity(mut self, capacity: usize) -> Self {
        self.inbound_capacity = capacity;
        self
    }

    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`GameClient::open`](crate::GameClient::open).
    pub fn validated(mut self) -> Self {
        if self.command_capacity == 0 {
            tracing::warn!("command_capacity is 0, clamping to 1");
            self.command_capacity = 1;
        }
        if self.inbound_capacity == 0 {
            tracing::warn!("inbound_capacity is 0, clamping to 1");
            self.inbound_capacity = 1;
        }
        self
    }
}
