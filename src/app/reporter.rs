//! Report publishing stage.
//!
//! Each probe's reading becomes one Jekyll-style post committed through the
//! content-store HTTP API: front-matter record, base64-encoded, PUT to a
//! path keyed by sensor id and timestamp.
//!
//! Failure isolation is per sensor: a failed read or PUT marks that sensor
//! unsuccessful and the batch moves on.  Only token retrieval is fatal —
//! without credentials no PUT can succeed, so there is nothing to isolate.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::{error, info, warn};
use serde::Serialize;

use crate::app::ports::{HttpPort, PlatformPort, SensorBusPort};
use crate::app::registry::SensorHandle;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::status::{self, StatusSignal};

/// Content-store repository that receives the posts.
pub const REPORT_BASE_URL: &str = "https://api.github.com/repos/okielife/TempSensors";

const ACCEPT_HEADER: &str = "application/vnd.github+json";

/// PUT body for the contents API.
#[derive(Serialize)]
struct ReportBody<'a> {
    message: String,
    content: &'a str,
}

/// Undo the at-rest obfuscation of the stored token: drop newlines, then
/// reverse the character order.
pub fn recover_token(raw: &str) -> String {
    raw.chars().filter(|&c| c != '\n').rev().collect()
}

/// Render one reading as a front-matter post.
pub fn render_record(sensor_id: &str, temperature: f32, stamp: &str) -> String {
    format!(
        "---\nsensor_id: {sensor_id}\ntemperature: {temperature}\nmeasurement_time: {stamp}\n---\n{{}}\n"
    )
}

pub struct Reporter<'a> {
    token_url: Option<&'a str>,
}

impl<'a> Reporter<'a> {
    pub fn new(token_url: Option<&'a str>) -> Self {
        Self { token_url }
    }

    /// Fetch and recover the API token.  Fatal on any failure: a missing
    /// URL is a config defect, an unreachable endpoint kills the cycle.
    fn fetch_token<H: HttpPort>(&self, http: &mut H) -> Result<String> {
        let url = self
            .token_url
            .ok_or_else(|| Error::Config("TOKEN_URL is not set".into()))?;
        let response = http
            .get(url)
            .map_err(|err| Error::Transport(format!("token fetch: {err}")))?;
        if response.status != 200 {
            return Err(Error::Transport(format!(
                "token fetch returned status {}",
                response.status
            )));
        }
        Ok(recover_token(&response.body))
    }

    /// Read and publish one sensor.  Returns whether the post landed.
    fn report_one<B, H>(
        &self,
        handle: &SensorHandle,
        clock: &Clock,
        token: &str,
        bus: &mut B,
        http: &mut H,
    ) -> bool
    where
        B: SensorBusPort,
        H: HttpPort,
    {
        let temperature = match bus.read_temperature(handle.pin, handle.device) {
            Ok(t) => t,
            Err(err) => {
                warn!("report: `{}` read failed ({err}), skipping", handle.id);
                return false;
            }
        };
        let stamp = clock.stamp();
        let record = render_record(&handle.id, temperature, &stamp);
        let file_path = format!("_posts/{}/{}_{}.html", handle.id, stamp, handle.id);
        let url = format!("{REPORT_BASE_URL}/contents/{file_path}");
        let encoded = BASE64.encode(record.as_bytes());
        let body = ReportBody {
            message: format!("Updating {file_path}"),
            content: &encoded,
        };
        let Ok(payload) = serde_json::to_string(&body) else {
            // Two string fields; serialization cannot realistically fail.
            return false;
        };
        let auth = format!("Token {token}");
        let headers = [("Accept", ACCEPT_HEADER), ("Authorization", auth.as_str())];
        match http.put(&url, &headers, &payload) {
            Ok(response) if matches!(response.status, 200 | 201) => {
                info!("report: `{}` published ({} °C)", handle.id, temperature);
                true
            }
            Ok(response) => {
                warn!(
                    "report: `{}` rejected with status {}, continuing",
                    handle.id, response.status
                );
                false
            }
            Err(err) => {
                error!("report: `{}` PUT failed ({err}), continuing", handle.id);
                false
            }
        }
    }

    /// Publish the whole batch, one outcome per sensor, in handle order.
    pub fn report_all<B, H, P>(
        &self,
        handles: &[SensorHandle],
        clock: &Clock,
        bus: &mut B,
        http: &mut H,
        platform: &mut P,
    ) -> Result<Vec<(String, bool)>>
    where
        B: SensorBusPort,
        H: HttpPort,
        P: PlatformPort,
    {
        status::signal(platform, StatusSignal::Reporting);
        let token = self.fetch_token(http)?;
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            let ok = self.report_one(handle, clock, &token, bus, http);
            outcomes.push((handle.id.clone(), ok));
        }
        status::signal(platform, StatusSignal::ReportComplete);
        Ok(outcomes)
    }
}
