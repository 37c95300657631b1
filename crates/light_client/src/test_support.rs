use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use shared::{
    domain::{RgbColor, RoomId},
    protocol::{EndpointAck, LightCommand, LightState},
};
use tokio::{net::TcpListener, sync::Mutex};
use url::Url;

use crate::{error::DispatchError, transport::LightingEndpoint};

pub(crate) struct RecordingEndpoint {
    pub sent: Arc<Mutex<Vec<LightCommand>>>,
    fail_with_status: Option<u16>,
    delay: Duration,
}

impl RecordingEndpoint {
    pub fn ok() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            fail_with_status: None,
            delay: Duration::ZERO,
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Self::ok()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::ok()
        }
    }

    pub async fn sent(&self) -> Vec<LightCommand> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl LightingEndpoint for RecordingEndpoint {
    async fn send_command(&self, command: &LightCommand) -> Result<EndpointAck, DispatchError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(status) = self.fail_with_status {
            return Err(DispatchError::Endpoint {
                status,
                body: "{\"status\":\"error\"}".into(),
            });
        }
        self.sent.lock().await.push(command.clone());
        Ok(EndpointAck {
            status: 200,
            body: "{\"status\":\"success\"}".into(),
        })
    }
}

pub(crate) fn command(red: u8, room: u32) -> LightCommand {
    LightCommand::new(LightState::On, RgbColor::new(red, 0, 0), 1.0, RoomId(room))
}

#[derive(Clone)]
struct LightServerState {
    received: Arc<Mutex<Vec<LightCommand>>>,
    status: StatusCode,
}

async fn handle_led_color(
    State(state): State<LightServerState>,
    Json(command): Json<LightCommand>,
) -> (StatusCode, Json<serde_json::Value>) {
    state.received.lock().await.push(command);
    let outcome = if state.status.is_success() {
        "success"
    } else {
        "error"
    };
    (state.status, Json(serde_json::json!({ "status": outcome })))
}

/// Serves `POST /api/led/color` on an ephemeral port and records every body.
pub(crate) async fn spawn_light_server(
    status: StatusCode,
) -> anyhow::Result<(Url, Arc<Mutex<Vec<LightCommand>>>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = LightServerState {
        received: Arc::clone(&received),
        status,
    };
    let app = Router::new()
        .route("/api/led/color", post(handle_led_color))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((Url::parse(&format!("http://{addr}/api/led/color"))?, received))
}
