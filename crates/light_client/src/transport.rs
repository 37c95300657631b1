use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{EndpointAck, LightCommand};
use url::Url;

use crate::error::DispatchError;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait LightingEndpoint: Send + Sync {
    async fn send_command(&self, command: &LightCommand) -> Result<EndpointAck, DispatchError>;
}

pub struct HttpLightingEndpoint {
    http: Client,
    endpoint_url: Url,
}

impl HttpLightingEndpoint {
    pub fn new(endpoint_url: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint_url,
        }
    }

    pub fn with_timeout(endpoint_url: Url, timeout: Duration) -> Result<Self, DispatchError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint_url })
    }

    pub fn endpoint_url(&self) -> &Url {
        &self.endpoint_url
    }
}

#[async_trait]
impl LightingEndpoint for HttpLightingEndpoint {
    async fn send_command(&self, command: &LightCommand) -> Result<EndpointAck, DispatchError> {
        let res = self
            .http
            .post(self.endpoint_url.clone())
            .json(command)
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(DispatchError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }
        Ok(EndpointAck {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
