use anyhow::{anyhow, Result};
use axum::{
    extract::{Form, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::bot::process_incoming_message;
use crate::config::Config;
use crate::time::TimeExtractor;

// API state that will be shared across handlers
pub struct ApiState {
    pub extractor: TimeExtractor,
}

// Form fields posted by the Twilio messaging webhook
#[derive(Debug, Deserialize)]
pub struct WebhookForm {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

/// Escape text for inclusion in an XML element.
fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// TwiML document answering with a single message.
pub fn twiml_message(text: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        escape_xml(text)
    )
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn twilio_webhook(
    State(state): State<Arc<ApiState>>,
    Form(form): Form<WebhookForm>,
) -> impl IntoResponse {
    debug!("Webhook form: {:?}", form);
    let reply = process_incoming_message(&state.extractor, form.body.trim(), &form.from);
    ([(header::CONTENT_TYPE, "application/xml")], twiml_message(&reply))
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/twilio-webhook", post(twilio_webhook))
        .with_state(state)
}

// Create and start the webhook server
pub async fn start_api_server(config: &Config) -> Result<()> {
    let state = Arc::new(ApiState {
        extractor: TimeExtractor::from_config(&config.extractor),
    });
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Webhook server starting on http://{}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow!("Failed to bind to address {}: {}", addr, e))?;

    info!("Webhook server bound to {}. Waiting for messages...", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow!("Failed to start webhook server: {}", e))?;

    Ok(())
}
