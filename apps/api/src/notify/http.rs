use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{info, warn};

use crate::config::WhatsAppConfig;
use crate::notify::{Destination, NotificationSender, SendOutcome};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";
const WHATSAPP_API_BASE: &str = "https://graph.facebook.com/v19.0";

/// Sends notifications through the Telegram Bot API and the WhatsApp Cloud API.
/// A channel without credentials reports a failed send.
#[derive(Clone)]
pub struct HttpNotifier {
    client: Client,
    telegram_bot_token: Option<String>,
    whatsapp: Option<WhatsAppConfig>,
}

impl HttpNotifier {
    pub fn new(
        client: Client,
        telegram_bot_token: Option<String>,
        whatsapp: Option<WhatsAppConfig>,
    ) -> Self {
        Self {
            client,
            telegram_bot_token,
            whatsapp,
        }
    }

    async fn send_telegram(&self, token: &str, chat_id: &str, message: &str) -> SendOutcome {
        let url = format!("{TELEGRAM_API_BASE}/bot{token}/sendMessage");
        let body = json!({ "chat_id": chat_id, "text": message });
        self.post("telegram", self.client.post(url).json(&body)).await
    }

    async fn send_whatsapp(&self, config: &WhatsAppConfig, phone: &str, message: &str) -> SendOutcome {
        let url = format!("{WHATSAPP_API_BASE}/{}/messages", config.phone_number_id);
        let body = json!({
            "messaging_product": "whatsapp",
            "to": phone,
            "type": "text",
            "text": { "body": message }
        });
        let request = self
            .client
            .post(url)
            .bearer_auth(&config.access_token)
            .json(&body);
        self.post("whatsapp", request).await
    }

    async fn post(&self, channel: &str, request: reqwest::RequestBuilder) -> SendOutcome {
        match request.send().await {
            Ok(response) if response.status().is_success() => {
                info!("Notification delivered via {channel}");
                SendOutcome::sent(format!("Sent via {channel}"))
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!("{channel} API returned {status}: {body}");
                SendOutcome::failed(format!("{channel} API returned {status}"))
            }
            Err(e) => {
                warn!("{channel} request failed: {e}");
                SendOutcome::failed(format!("{channel} request failed"))
            }
        }
    }
}

#[async_trait]
impl NotificationSender for HttpNotifier {
    async fn send(&self, message: &str, destination: &Destination) -> SendOutcome {
        if message.trim().is_empty() {
            return SendOutcome::failed("message is empty");
        }
        match destination {
            Destination::Telegram { chat_id } => match &self.telegram_bot_token {
                Some(token) => self.send_telegram(token, chat_id, message).await,
                None => {
                    warn!("Telegram notification requested but TELEGRAM_BOT_TOKEN is not set");
                    SendOutcome::failed("telegram is not configured")
                }
            },
            Destination::WhatsApp { phone } => match &self.whatsapp {
                Some(config) => self.send_whatsapp(config, phone, message).await,
                None => {
                    warn!("WhatsApp notification requested but WhatsApp credentials are not set");
                    SendOutcome::failed("whatsapp is not configured")
                }
            },
        }
    }
}
