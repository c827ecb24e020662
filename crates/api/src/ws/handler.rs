use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{FromRequestParts, Query, State};
use axum::http::request::Parts;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use patrol_core::error::CoreError;
use patrol_core::principal::Principal;
use patrol_core::types::DbId;
use serde::Deserialize;
use serde_json::json;

use crate::auth::accounts::current_principal;
use crate::error::AppError;
use crate::handlers::checkin::CheckInRequest;
use crate::middleware::auth::{authenticate, bearer_token};
use crate::state::AppState;

/// Caller of a WebSocket upgrade, authenticated before the upgrade happens.
///
/// The token comes from `?token=` (browsers cannot set headers on a
/// WebSocket handshake) or from `Authorization: Bearer`. The stored account
/// must be active, and must belong to an active organization: that is the
/// only room the connection can join.
#[derive(Debug, Clone, Copy)]
pub struct WsAuth {
    pub principal: Principal,
    pub organization_id: DbId,
}

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

impl FromRequestParts<AppState> for WsAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let query = Query::<TokenQuery>::try_from_uri(&parts.uri)
            .map(|Query(q)| q)
            .unwrap_or_default();

        let token = query
            .token
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| bearer_token(&parts.headers))
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing access token".into()))
            })?;

        let claimed = authenticate(token, &state.config.jwt)?;
        let principal = current_principal(state.accounts.as_ref(), claimed.user_id).await?;
        let organization_id = principal.organization_id.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Token is not bound to an organization".into(),
            ))
        })?;

        Ok(WsAuth {
            principal,
            organization_id,
        })
    }
}

/// Frames a client may send.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientFrame {
    GuardCheckin(CheckInRequest),
    Ping,
}

/// Parse an inbound text frame, or build the `checkin_ack` rejecting it.
pub fn parse_client_frame(text: &str) -> Result<ClientFrame, serde_json::Value> {
    serde_json::from_str(text).map_err(|e| {
        tracing::debug!(error = %e, "Malformed WebSocket frame");
        error_ack(&AppError::Core(CoreError::Validation(format!(
            "Malformed message: {e}"
        ))))
    })
}

fn error_ack(err: &AppError) -> serde_json::Value {
    let (_, code, message) = err.parts();
    json!({
        "event": "checkin_ack",
        "data": { "success": false, "error": message, "code": code },
    })
}

fn pong() -> serde_json::Value {
    json!({ "event": "pong" })
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// `WsAuth` runs first so an unauthenticated request is rejected with 401
/// before any upgrade is attempted.
pub async fn ws_handler(
    auth: WsAuth,
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, auth))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Joins the connection to its organization's room.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Dispatches inbound frames on the current task.
///   4. Cleans up on disconnect.
async fn handle_socket(socket: WebSocket, state: AppState, auth: WsAuth) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    let ws_manager = state.ws_manager.clone();
    tracing::info!(
        conn_id = %conn_id,
        user_id = auth.principal.user_id,
        organization_id = auth.organization_id,
        "WebSocket connected"
    );

    let mut rx = ws_manager
        .add(conn_id.clone(), auth.principal.user_id, auth.organization_id)
        .await;

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                let reply = dispatch(&state, &auth.principal, text.as_str()).await;
                ws_manager
                    .send_to(&conn_id, Message::Text(reply.to_string().into()))
                    .await;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Handle one inbound frame and produce the reply for the sender.
async fn dispatch(state: &AppState, principal: &Principal, text: &str) -> serde_json::Value {
    let frame = match parse_client_frame(text) {
        Ok(frame) => frame,
        Err(ack) => return ack,
    };

    match frame {
        ClientFrame::Ping => pong(),
        ClientFrame::GuardCheckin(req) => {
            let result = state
                .checkins
                .check_in(
                    principal,
                    req.user_id,
                    &req.checkpoint_card_num,
                    chrono::Utc::now(),
                )
                .await
                .map_err(AppError::from);
            let outcome = result.and_then(|outcome| {
                serde_json::to_value(&outcome).map_err(|e| AppError::InternalError(e.to_string()))
            });
            match outcome {
                Ok(data) => json!({ "event": "checkin_ack", "data": data }),
                Err(err) => error_ack(&err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_guard_checkin() {
        let frame = parse_client_frame(
            r#"{"event":"guard_checkin","data":{"userId":7,"checkpointCardNum":"A-01"}}"#,
        )
        .unwrap();
        assert_matches!(frame, ClientFrame::GuardCheckin(req) => {
            assert_eq!(req.user_id, 7);
            assert_eq!(req.checkpoint_card_num, "A-01");
        });
    }

    #[test]
    fn parses_ping_without_data() {
        assert_matches!(parse_client_frame(r#"{"event":"ping"}"#), Ok(ClientFrame::Ping));
        assert_eq!(pong()["event"], "pong");
    }

    #[test]
    fn malformed_json_is_acknowledged_as_validation_error() {
        let ack = parse_client_frame("{not json").unwrap_err();
        assert_eq!(ack["event"], "checkin_ack");
        assert_eq!(ack["data"]["success"], false);
        assert_eq!(ack["data"]["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn unknown_event_is_rejected() {
        let ack = parse_client_frame(r#"{"event":"teleport","data":{}}"#).unwrap_err();
        assert_eq!(ack["data"]["code"], "VALIDATION_ERROR");
    }

    #[test]
    fn checkin_without_card_is_rejected() {
        let ack = parse_client_frame(r#"{"event":"guard_checkin","data":{"userId":7}}"#)
            .unwrap_err();
        assert_eq!(ack["data"]["success"], false);
    }
}
