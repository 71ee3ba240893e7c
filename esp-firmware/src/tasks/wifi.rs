// WiFi Station - hält die WLAN-Verbindung für den MQTT Task aufrecht
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};

use crate::config::{WIFI_PASSWORD, WIFI_RECONNECT_DELAY_SECS, WIFI_SSID};

/// WiFi Connection Task
///
/// Verbindet im Station-Modus mit dem Access Point und versucht es nach
/// jedem Fehler oder Disconnect nach `WIFI_RECONNECT_DELAY_SECS` erneut.
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting connection task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring and starting...");

            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(WIFI_SSID.into())
                    .with_password(WIFI_PASSWORD.into()),
            );

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RECONNECT_DELAY_SECS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RECONNECT_DELAY_SECS)).await;
                continue;
            }

            info!("WiFi: Started successfully");
        }

        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        match controller.connect_async().await {
            Ok(_) => {
                info!("WiFi: Connected successfully!");
            }
            Err(e) => {
                error!("WiFi: Connection failed: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RECONNECT_DELAY_SECS)).await;
                continue;
            }
        }

        // Bis zum Verbindungsabbruch blockieren, dann neu verbinden
        info!("WiFi: Waiting for disconnect event...");
        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!(
            "WiFi: Disconnected from AP, retrying in {}s...",
            WIFI_RECONNECT_DELAY_SECS
        );

        Timer::after(Duration::from_secs(WIFI_RECONNECT_DELAY_SECS)).await;
    }
}

/// Treibt den embassy-net Stack (Pakete zwischen Radio und TCP/IP)
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// Loggt einmalig die per DHCP erhaltene Adresse
///
/// Der MQTT Task wartet selbst auf Link + IPv4, dieser Task dient nur der
/// Diagnose beim Start.
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>) {
    stack.wait_link_up().await;
    info!("WiFi: Link is up, waiting for DHCP lease...");

    stack.wait_config_up().await;
    if let Some(config) = stack.config_v4() {
        info!(
            "WiFi: Lease {} via {}, DNS {}",
            Debug2Format(&config.address),
            Debug2Format(&config.gateway),
            Debug2Format(&config.dns_servers)
        );
    }
}
