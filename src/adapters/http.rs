//! HTTPS client adapter.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `EspHttpConnection` with the bundled CA
//!   certificates, one connection per request.
//! - **all other targets**: simulation returning canned successes so a host
//!   run exercises the whole reporting path.

#[cfg(not(target_os = "espidf"))]
use log::info;

use crate::app::ports::{HttpError, HttpPort, HttpResponse};

#[cfg(target_os = "espidf")]
use embedded_svc::{
    http::{client::Client, Method, Status},
    io::{Read as _, Write as _},
};
#[cfg(target_os = "espidf")]
use esp_idf_svc::http::client::{Configuration as HttpConfiguration, EspHttpConnection};

#[cfg(target_os = "espidf")]
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);
#[cfg(target_os = "espidf")]
const MAX_RESPONSE_BODY: usize = 4096;

#[cfg(target_os = "espidf")]
pub struct HttpsAdapter;

#[cfg(target_os = "espidf")]
impl HttpsAdapter {
    pub fn new() -> Self {
        Self
    }

    fn client() -> Result<Client<EspHttpConnection>, HttpError> {
        let conf = HttpConfiguration {
            timeout: Some(REQUEST_TIMEOUT),
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        };
        let connection = EspHttpConnection::new(&conf).map_err(|_| HttpError::Transport)?;
        Ok(Client::wrap(connection))
    }

    fn read_response(
        response: &mut embedded_svc::http::client::Response<&mut EspHttpConnection>,
    ) -> Result<String, HttpError> {
        let mut body = Vec::new();
        let mut chunk = [0_u8; 256];
        loop {
            let read = response.read(&mut chunk).map_err(|_| HttpError::Transport)?;
            if read == 0 {
                break;
            }
            if body.len() + read > MAX_RESPONSE_BODY {
                return Err(HttpError::Transport);
            }
            body.extend_from_slice(&chunk[..read]);
        }
        String::from_utf8(body).map_err(|_| HttpError::Transport)
    }
}

#[cfg(target_os = "espidf")]
impl Default for HttpsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "espidf")]
impl HttpPort for HttpsAdapter {
    fn get(&mut self, url: &str) -> Result<HttpResponse, HttpError> {
        let mut client = Self::client()?;
        let request = client
            .request(Method::Get, url, &[])
            .map_err(|_| HttpError::Transport)?;
        let mut response = request.submit().map_err(|_| HttpError::Transport)?;
        let status = response.status();
        let body = Self::read_response(&mut response)?;
        Ok(HttpResponse { status, body })
    }

    fn put(
        &mut self,
        url: &str,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<HttpResponse, HttpError> {
        let mut client = Self::client()?;
        let mut request = client
            .request(Method::Put, url, headers)
            .map_err(|_| HttpError::Transport)?;
        request
            .write_all(body.as_bytes())
            .map_err(|_| HttpError::Transport)?;
        let mut response = request.submit().map_err(|_| HttpError::Transport)?;
        let status = response.status();
        let body = Self::read_response(&mut response)?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(not(target_os = "espidf"))]
pub struct HttpsAdapter;

#[cfg(not(target_os = "espidf"))]
impl HttpsAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for HttpsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_os = "espidf"))]
impl HttpPort for HttpsAdapter {
    fn get(&mut self, url: &str) -> Result<HttpResponse, HttpError> {
        info!("https(sim): GET {url}");
        Ok(HttpResponse {
            status: 200,
            body: "nekot-mis".to_string(),
        })
    }

    fn put(&mut self, url: &str, _headers: &[(&str, &str)], body: &str) -> Result<HttpResponse, HttpError> {
        info!("https(sim): PUT {url} ({} bytes)", body.len());
        Ok(HttpResponse {
            status: 201,
            body: String::new(),
        })
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn sim_accepts_every_put() {
        let mut http = HttpsAdapter::new();
        let response = http.put("https://example.test/x", &[], "{}").unwrap();
        assert_eq!(response.status, 201);
    }
}
