//! Wi-Fi station adapter.
//!
//! One blocking association attempt per [`NetworkPort::connect`] call; the
//! retry-forever policy and candidate ordering live in the connectivity
//! stage, not here.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `BlockingWifi<EspWifi>` station mode with
//!   WPA2 (or open when the secret is empty).
//! - **all other targets**: simulation that associates with any SSID.

use log::info;

use crate::app::ports::{NetError, NetworkPort};

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};

#[cfg(target_os = "espidf")]
pub struct WifiAdapter {
    wifi: BlockingWifi<EspWifi<'static>>,
}

#[cfg(target_os = "espidf")]
impl WifiAdapter {
    pub fn new(
        modem: Modem,
        sys_loop: EspSystemEventLoop,
        nvs: EspDefaultNvsPartition,
    ) -> anyhow::Result<Self> {
        let esp_wifi = EspWifi::new(modem, sys_loop.clone(), Some(nvs))?;
        let wifi = BlockingWifi::wrap(esp_wifi, sys_loop)?;
        Ok(Self { wifi })
    }
}

#[cfg(target_os = "espidf")]
impl NetworkPort for WifiAdapter {
    fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    fn connect(&mut self, ssid: &str, secret: &str) -> Result<(), NetError> {
        let auth_method = if secret.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };

        let config = Configuration::Client(ClientConfiguration {
            ssid: ssid.try_into().map_err(|()| NetError::AssociationFailed)?,
            password: secret
                .try_into()
                .map_err(|()| NetError::AssociationFailed)?,
            auth_method,
            ..Default::default()
        });

        let attempt = || -> anyhow::Result<()> {
            self.wifi.set_configuration(&config)?;
            self.wifi.start()?;
            self.wifi.connect()?;
            self.wifi.wait_netif_up()?;
            Ok(())
        };

        match attempt() {
            Ok(()) => {
                info!("wifi: station up on `{ssid}`");
                Ok(())
            }
            Err(_) => {
                let _ = self.wifi.disconnect();
                let _ = self.wifi.stop();
                Err(NetError::AssociationFailed)
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
pub struct WifiAdapter {
    connected: bool,
}

#[cfg(not(target_os = "espidf"))]
impl WifiAdapter {
    pub fn new() -> Self {
        Self { connected: false }
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for WifiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "espidf"))]
impl NetworkPort for WifiAdapter {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self, ssid: &str, _secret: &str) -> Result<(), NetError> {
        info!("wifi(sim): associated with `{ssid}`");
        self.connected = true;
        Ok(())
    }
}
