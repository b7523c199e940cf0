//! Desktop server example for testing the web UI and MQTT integration.
//!
//! This example drives a simulated shift-register chain instead of real GPIO,
//! allowing you to:
//! - Access the web UI at http://localhost:8080
//! - Test all API endpoints
//! - Optionally connect to an MQTT broker
//!
//! # Shared State
//!
//! When both web and MQTT features are enabled, they share a single
//! `SegmentDevice` via `SharedDisplay`. Text written from either source is
//! immediately visible to the other.
//!
//! # Usage
//!
//! Web server only:
//! ```sh
//! RUST_LOG=info cargo run --example desktop_server --features web
//! ```
//!
//! Web server + MQTT:
//! ```sh
//! RUST_LOG=info cargo run --example desktop_server --features web,mqtt
//! ```
//!
//! # Configuration
//!
//! Edit the `Config::default()` call in `main()` to customize settings.
//! See the commented example for how to use the builder pattern.

use rs_sseg::hal::ShiftChain;
use rs_sseg::{Config, SegmentDevice};

use std::sync::Arc;

use rs_sseg::services::{SharedDisplay, WebServerConfig};

#[cfg(feature = "mqtt")]
use rs_sseg::services::{MqttHandler, MqttRuntimeConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        println!("=================================");
        println!("  rs-sseg Desktop Server");
        println!("=================================");
        println!();

        // Central configuration - modify this for your setup
        let config = Config::default();
        // Example of customization:
        // let config = Config::default()
        //     .with_display(rs_sseg::DisplayConfig::default()
        //         .with_digit_count(8)
        //         .with_boot_text("HELLO"))
        //     .with_mqtt(rs_sseg::MqttConfig::default()
        //         .with_host("192.168.1.100")
        //         .with_topic_prefix("clock/sseg"))
        //     .with_web(rs_sseg::WebConfig::default()
        //         .with_port(3000));

        let digits = config.display.validate()?;
        let device = SegmentDevice::new(ShiftChain::new(digits), &config.display)?;

        #[cfg(all(feature = "web", feature = "mqtt"))]
        {
            run_web_and_mqtt(device, &config).await?;
        }

        #[cfg(all(feature = "web", not(feature = "mqtt")))]
        {
            run_web_only(device, &config).await?;
        }

        Ok::<(), anyhow::Error>(())
    })
}

#[cfg(all(feature = "web", not(feature = "mqtt")))]
async fn run_web_only(device: SegmentDevice<ShiftChain>, config: &Config) -> anyhow::Result<()> {
    let web_config = WebServerConfig::from_config(&config.web);

    println!("Starting web server...");
    println!("  Web UI: http://{}", web_config.addr);
    println!("  API:    http://{}/api/state", web_config.addr);
    println!();
    println!("Press Ctrl+C to stop.");
    println!();

    let display = Arc::new(SharedDisplay::new(device));
    rs_sseg::services::run_server(display, web_config).await?;
    Ok(())
}

#[cfg(all(feature = "web", feature = "mqtt"))]
async fn run_web_and_mqtt(
    device: SegmentDevice<ShiftChain>,
    config: &Config,
) -> anyhow::Result<()> {
    let web_config = WebServerConfig::from_config(&config.web);
    let mqtt_config = MqttRuntimeConfig::from_config(&config.mqtt);

    println!("Starting web server and MQTT client with SHARED STATE...");
    println!();
    println!("Web:");
    println!("  Web UI: http://{}", web_config.addr);
    println!("  API:    http://{}/api/state", web_config.addr);
    println!();
    print_mqtt_topics(&mqtt_config);
    println!("NOTE: Web and MQTT write to the same display.");
    println!();
    println!("Press Ctrl+C to stop.");
    println!();

    // =========================================================================
    // SINGLE shared display for both web and MQTT
    // =========================================================================
    let display = Arc::new(SharedDisplay::new(device));

    // =========================================================================
    // Web server with shared display
    // =========================================================================
    let display_for_web = Arc::clone(&display);
    tokio::spawn(async move {
        if let Err(e) = rs_sseg::services::run_server(display_for_web, web_config).await {
            log::error!("web server stopped: {}", e);
        }
    });

    // =========================================================================
    // MQTT handler with same shared display
    // =========================================================================
    let handler = MqttHandler::new(display, mqtt_config);
    handler.run().await?;
    Ok(())
}

#[cfg(feature = "mqtt")]
fn print_mqtt_topics(mqtt_config: &MqttRuntimeConfig) {
    let prefix = &mqtt_config.topic_prefix;
    println!("MQTT:");
    println!("  Broker:    {}:{}", mqtt_config.host, mqtt_config.port);
    println!("  Subscribe: {}/text/set, {}/clear", prefix, prefix);
    println!("  Publish:   {}/state, {}/text", prefix, prefix);
    println!();
}
