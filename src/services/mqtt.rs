//! MQTT client handler for the display.
//!
//! Subscribes to command topics and publishes state updates:
//!
//! **Subscribe Topics:**
//! - `sseg/text/set` - Raw payload bytes, written exactly like a device write
//! - `sseg/clear` - Blank the display (any payload)
//!
//! **Publish Topics:**
//! - `sseg/state` - Full state JSON (on change + heartbeat)
//! - `sseg/text` - Last written text (retained)
//!
//! # Shared State
//!
//! The handler drives the same [`SharedDisplay`] as the web server:
//!
//! ```ignore
//! let display = Arc::new(SharedDisplay::new(device));
//! let handler = MqttHandler::new(Arc::clone(&display), mqtt_config);
//! ```

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use tokio::sync::mpsc;

use crate::config::MqttConfig as SharedMqttConfig;
use crate::traits::DigitalOutputBank;

use super::api::DisplayState;
use super::shared::SharedDisplay;

// ============================================================================
// Configuration
// ============================================================================

/// Runtime MQTT client configuration for `rumqttc`.
///
/// This struct uses `String` for runtime compatibility with the `rumqttc` library.
/// For embedded/no-alloc contexts, use [`crate::config::MqttConfig`] which uses
/// fixed-size `ShortString` types and convert with [`MqttRuntimeConfig::from_config`].
#[derive(Debug, Clone)]
pub struct MqttRuntimeConfig {
    /// MQTT broker hostname
    pub host: String,
    /// MQTT broker port
    pub port: u16,
    /// Broker credentials, if any
    pub credentials: Option<(String, String)>,
    /// Client ID
    pub client_id: String,
    /// Topic prefix (default: "sseg")
    pub topic_prefix: String,
    /// Heartbeat interval in milliseconds; 0 is treated as 1
    pub heartbeat_ms: u64,
    /// Keep-alive interval in seconds
    pub keep_alive_secs: u16,
}

impl Default for MqttRuntimeConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            credentials: None,
            client_id: "rs-sseg".to_string(),
            topic_prefix: "sseg".to_string(),
            heartbeat_ms: 5000,
            keep_alive_secs: 30,
        }
    }
}

impl MqttRuntimeConfig {
    /// Create a new config with the given broker address
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Create from shared MqttConfig
    pub fn from_config(config: &SharedMqttConfig) -> Self {
        let credentials = if config.username.is_empty() {
            None
        } else {
            Some((
                config.username.as_str().to_string(),
                config.password.as_str().to_string(),
            ))
        };
        Self {
            host: config.host.as_str().to_string(),
            port: config.port,
            credentials,
            client_id: config.client_id.as_str().to_string(),
            topic_prefix: config.topic_prefix.as_str().to_string(),
            heartbeat_ms: config.heartbeat_ms as u64,
            keep_alive_secs: config.keep_alive_secs,
        }
    }

    /// Set the client ID
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = id.into();
        self
    }

    /// Set the topic prefix
    pub fn topic_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.topic_prefix = prefix.into();
        self
    }

    /// Set the heartbeat interval
    pub fn heartbeat_ms(mut self, ms: u64) -> Self {
        self.heartbeat_ms = ms;
        self
    }

    /// Set broker credentials
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Heartbeat period, never shorter than 1 ms.
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_ms.max(1))
    }

    fn topic(&self, suffix: &str) -> String {
        format!("{}/{}", self.topic_prefix, suffix)
    }
}

// ============================================================================
// Commands
// ============================================================================

/// A command decoded from an incoming publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCommand<'a> {
    /// Write the payload bytes
    Write(&'a [u8]),
    /// Blank the display
    Clear,
}

impl<'a> DisplayCommand<'a> {
    /// Decode `topic` relative to `prefix`. Unknown topics yield `None`.
    pub fn parse(prefix: &str, topic: &str, payload: &'a [u8]) -> Option<Self> {
        let suffix = topic.strip_prefix(prefix)?.strip_prefix('/')?;
        match suffix {
            "text/set" => Some(DisplayCommand::Write(payload)),
            "clear" => Some(DisplayCommand::Clear),
            _ => None,
        }
    }
}

// ============================================================================
// MQTT Handler
// ============================================================================

/// MQTT handler that bridges MQTT messages to the display
pub struct MqttHandler<B> {
    display: Arc<SharedDisplay<B>>,
    config: MqttRuntimeConfig,
}

impl<B> MqttHandler<B>
where
    B: DigitalOutputBank + Send + 'static,
    B::Error: Display,
{
    /// Create a handler that writes to `display`.
    pub fn new(display: Arc<SharedDisplay<B>>, config: MqttRuntimeConfig) -> Self {
        Self { display, config }
    }

    /// Get a reference to the shared display.
    pub fn display(&self) -> Arc<SharedDisplay<B>> {
        Arc::clone(&self.display)
    }

    /// Topics this handler subscribes to.
    pub fn subscriptions(&self) -> [String; 2] {
        [self.config.topic("text/set"), self.config.topic("clear")]
    }

    /// Run the MQTT handler
    ///
    /// This function blocks and handles MQTT messages until shutdown.
    pub async fn run(self) -> Result<(), MqttError> {
        let mut options =
            MqttOptions::new(&self.config.client_id, &self.config.host, self.config.port);
        options.set_keep_alive(Duration::from_secs(self.config.keep_alive_secs as u64));
        if let Some((username, password)) = &self.config.credentials {
            options.set_credentials(username, password);
        }

        let (client, mut eventloop) = AsyncClient::new(options, 10);

        let topics = self.subscriptions();
        for topic in &topics {
            client
                .subscribe(topic, QoS::AtLeastOnce)
                .await
                .map_err(|e| MqttError::Subscribe(e.to_string()))?;
        }

        log::info!(
            "MQTT connected to {}:{}, subscribed to {:?}",
            self.config.host,
            self.config.port,
            topics
        );

        // Channel for state updates to publish
        let (tx, mut rx) = mpsc::channel::<StateUpdate>(32);

        // Spawn heartbeat task
        let heartbeat_tx = tx.clone();
        let heartbeat_interval = self.config.heartbeat_interval();
        let display_for_heartbeat = Arc::clone(&self.display);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(heartbeat_interval);
            loop {
                interval.tick().await;
                let state = display_for_heartbeat.state();
                if heartbeat_tx.send(StateUpdate::Heartbeat(state)).await.is_err() {
                    break;
                }
            }
        });

        // Spawn publisher task
        let client_for_publish = client.clone();
        let config_for_publish = self.config.clone();
        tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                if let Err(e) = publish(&client_for_publish, &config_for_publish, &update).await {
                    log::warn!("MQTT publish failed: {}", e);
                }
            }
        });

        // Main event loop
        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    if let Some(state) = self.handle_message(&publish.topic, &publish.payload) {
                        let _ = tx.send(StateUpdate::Changed(state)).await;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    log::error!("MQTT error: {:?}", e);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }

    /// Apply one incoming message.
    ///
    /// Returns the new state when the display changed.
    pub fn handle_message(&self, topic: &str, payload: &[u8]) -> Option<DisplayState> {
        let command = DisplayCommand::parse(&self.config.topic_prefix, topic, payload)?;

        let result = match command {
            DisplayCommand::Write(bytes) => self.display.write(bytes).map(|_| ()),
            DisplayCommand::Clear => self.display.clear(),
        };

        if let Err(e) = result {
            log::warn!("MQTT {} failed: {}", topic, e);
            return None;
        }
        self.display.check_changes()
    }
}

async fn publish(
    client: &AsyncClient,
    config: &MqttRuntimeConfig,
    update: &StateUpdate,
) -> Result<(), MqttError> {
    let state = match update {
        StateUpdate::Changed(s) | StateUpdate::Heartbeat(s) => s,
    };
    let state_json =
        serde_json::to_string(state).map_err(|e| MqttError::Publish(e.to_string()))?;

    // Always publish full state
    client
        .publish(config.topic("state"), QoS::AtLeastOnce, false, state_json)
        .await
        .map_err(|e| MqttError::Publish(e.to_string()))?;

    // Publish the text as retained on change
    if let StateUpdate::Changed(s) = update {
        client
            .publish(
                config.topic("text"),
                QoS::AtLeastOnce,
                true,
                s.text.as_str().as_bytes().to_vec(),
            )
            .await
            .map_err(|e| MqttError::Publish(e.to_string()))?;
    }
    Ok(())
}

enum StateUpdate {
    Changed(DisplayState),
    Heartbeat(DisplayState),
}

/// MQTT-related errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MqttError {
    /// Failed to subscribe to topic
    Subscribe(String),
    /// Failed to publish message
    Publish(String),
}

impl Display for MqttError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MqttError::Subscribe(e) => write!(f, "subscribe failed: {}", e),
            MqttError::Publish(e) => write!(f, "publish failed: {}", e),
        }
    }
}

impl std::error::Error for MqttError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayConfig;
    use crate::hal::RecordingBank;
    use crate::SegmentDevice;

    fn handler() -> MqttHandler<RecordingBank> {
        let device = SegmentDevice::new(RecordingBank::new(), &DisplayConfig::default()).unwrap();
        let display = Arc::new(SharedDisplay::new(device));
        // consume the initial change so tests see only their own
        display.check_changes();
        MqttHandler::new(display, MqttRuntimeConfig::default())
    }

    // ========================================================================
    // MqttRuntimeConfig tests
    // ========================================================================

    #[test]
    fn test_mqtt_config_default() {
        let config = MqttRuntimeConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 1883);
        assert!(config.credentials.is_none());
        assert_eq!(config.client_id, "rs-sseg");
        assert_eq!(config.topic_prefix, "sseg");
        assert_eq!(config.heartbeat_ms, 5000);
        assert_eq!(config.keep_alive_secs, 30);
    }

    #[test]
    fn test_mqtt_config_builder_chaining() {
        let config = MqttRuntimeConfig::new("broker.local", 1883)
            .client_id("custom-id")
            .topic_prefix("shop/window")
            .heartbeat_ms(2000)
            .credentials("user", "pw");

        assert_eq!(config.host, "broker.local");
        assert_eq!(config.client_id, "custom-id");
        assert_eq!(config.topic_prefix, "shop/window");
        assert_eq!(config.heartbeat_ms, 2000);
        assert_eq!(
            config.credentials,
            Some(("user".to_string(), "pw".to_string()))
        );
        assert_eq!(config.topic("text/set"), "shop/window/text/set");
    }

    #[test]
    fn test_heartbeat_interval_is_never_zero() {
        let config = MqttRuntimeConfig::default().heartbeat_ms(0);
        assert_eq!(config.heartbeat_interval(), Duration::from_millis(1));

        let from_shared =
            MqttRuntimeConfig::from_config(&SharedMqttConfig::default().with_heartbeat_ms(0));
        assert!(!from_shared.heartbeat_interval().is_zero());

        assert_eq!(
            MqttRuntimeConfig::default().heartbeat_interval(),
            Duration::from_millis(5000)
        );
    }

    #[tokio::test]
    async fn test_zero_heartbeat_builds_a_timer() {
        let config = MqttRuntimeConfig::default().heartbeat_ms(0);
        let mut interval = tokio::time::interval(config.heartbeat_interval());
        interval.tick().await;
    }

    #[test]
    fn test_mqtt_config_from_config() {
        let shared_config = SharedMqttConfig::default()
            .with_host("mqtt.test.com")
            .with_port(8883)
            .with_client_id("test-id")
            .with_topic_prefix("test-sseg")
            .with_heartbeat_ms(7500);

        let config = MqttRuntimeConfig::from_config(&shared_config);
        assert_eq!(config.host, "mqtt.test.com");
        assert_eq!(config.port, 8883);
        assert!(config.credentials.is_none());
        assert_eq!(config.client_id, "test-id");
        assert_eq!(config.topic_prefix, "test-sseg");
        assert_eq!(config.heartbeat_ms, 7500);

        let with_login = shared_config.with_credentials("u", "p");
        assert_eq!(
            MqttRuntimeConfig::from_config(&with_login).credentials,
            Some(("u".to_string(), "p".to_string()))
        );
    }

    // ========================================================================
    // DisplayCommand tests
    // ========================================================================

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            DisplayCommand::parse("sseg", "sseg/text/set", b"12"),
            Some(DisplayCommand::Write(b"12"))
        );
        assert_eq!(
            DisplayCommand::parse("sseg", "sseg/clear", b""),
            Some(DisplayCommand::Clear)
        );
        assert_eq!(DisplayCommand::parse("sseg", "sseg/state", b""), None);
        assert_eq!(DisplayCommand::parse("sseg", "other/clear", b""), None);
        assert_eq!(DisplayCommand::parse("sseg", "ssegclear", b""), None);
    }

    // ========================================================================
    // MqttHandler tests
    // ========================================================================

    #[test]
    fn test_subscriptions() {
        let handler = handler();
        assert_eq!(
            handler.subscriptions(),
            ["sseg/text/set".to_string(), "sseg/clear".to_string()]
        );
    }

    #[test]
    fn test_handle_text_message() {
        let handler = handler();
        let state = handler.handle_message("sseg/text/set", b"HELLO\n").unwrap();
        assert_eq!(state.text.as_str(), "HELLO");
        assert_eq!(state.writes, 1);
    }

    #[test]
    fn test_handle_raw_glyph_bytes() {
        let handler = handler();
        let state = handler.handle_message("sseg/text/set", &[0x80, 0x81]).unwrap();
        assert_eq!(state.text.as_str(), "??");
        assert_eq!(&state.frame[..2], &[0x5A, 0xC8]); // pause, play
    }

    #[test]
    fn test_handle_clear_message() {
        let handler = handler();
        handler.handle_message("sseg/text/set", b"88888");
        let state = handler.handle_message("sseg/clear", b"").unwrap();
        assert!(state.frame.iter().all(|b| *b == 0));
    }

    #[test]
    fn test_unknown_topic_is_ignored() {
        let handler = handler();
        assert!(handler.handle_message("sseg/unknown", b"1").is_none());
        assert_eq!(handler.display().state().writes, 0);
    }

    #[test]
    fn test_mqtt_error_display() {
        assert_eq!(
            MqttError::Subscribe("timeout".into()).to_string(),
            "subscribe failed: timeout"
        );
    }
}
