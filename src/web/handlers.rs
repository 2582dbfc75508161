use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use log::{debug, error, info, warn};

use crate::error::RelayError;
use crate::web::models::{AssistantReply, IncomingRequest};
use crate::AppState;

// Relay endpoint, mounted on every path
pub async fn relay(
    data: web::Data<AppState>,
    payload: web::Payload,
) -> Result<HttpResponse, RelayError> {
    // The credential is checked before the body is even read
    let Some(api_key) = data.config.api_key.as_deref() else {
        error!("Rejecting request: OPENAI_API_KEY is not configured");
        return Err(RelayError::MissingApiKey);
    };

    let body = read_body(payload, data.config.max_body_bytes).await?;
    let request: IncomingRequest = serde_json::from_slice(&body)?;
    info!(
        "Chat request with {} history turns (model: {})",
        request.history.len(),
        data.config.model
    );

    let payload = request.into_payload(&data.config.model);
    debug!("Payload: {:?}", payload);

    let assistant_message = data.model.complete(api_key, &payload).await?;

    Ok(HttpResponse::Ok().json(AssistantReply { assistant_message }))
}

async fn read_body(mut payload: web::Payload, limit: usize) -> Result<web::BytesMut, RelayError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        if body.len() + chunk.len() > limit {
            warn!("Request body exceeds {} bytes", limit);
            return Err(RelayError::PayloadTooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
