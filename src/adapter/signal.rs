//! Signal transport via signal-cli-rest-api.
//!
//! Polls `/v1/receive/<number>` for inbound envelopes and answers each
//! data message through `/v2/send`, addressing the originating group
//! when present and the sender directly otherwise. See
//! <https://github.com/bbernhard/signal-cli-rest-api> for the API.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::app::App;
use crate::config::SignalConfig;
use crate::error::{ConfigError, Result};

/// One received Signal envelope, reduced to the fields the bot uses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default)]
    pub source_number: Option<String>,
    #[serde(default)]
    pub source: Option<Source>,
    #[serde(default)]
    pub data_message: Option<DataMessage>,
    #[serde(default)]
    pub group_info: Option<GroupInfo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataMessage {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub group_id: String,
}

impl Envelope {
    fn sender(&self) -> Option<&str> {
        self.source_number
            .as_deref()
            .or_else(|| self.source.as_ref()?.number.as_deref())
    }

    fn message(&self) -> Option<&str> {
        let text = self.data_message.as_ref()?.message.as_deref()?;
        (!text.is_empty()).then_some(text)
    }
}

/// Polling connector for one registered phone number.
pub struct SignalConnector {
    client: reqwest::Client,
    service_url: String,
    phone_number: String,
    poll_seconds: u64,
}

impl SignalConnector {
    pub fn new(config: &SignalConfig) -> Result<Self> {
        let phone_number = config
            .phone_number
            .clone()
            .ok_or(ConfigError::MissingField {
                field: "signal.phone_number",
            })?;
        Ok(Self {
            client: reqwest::Client::new(),
            service_url: config.service_url.trim_end_matches('/').to_string(),
            phone_number,
            poll_seconds: config.poll_seconds,
        })
    }

    /// Long-poll for new envelopes.
    pub async fn receive(&self) -> Result<Vec<Envelope>> {
        let url = format!("{}/v1/receive/{}", self.service_url, self.phone_number);
        let envelopes = self
            .client
            .get(url)
            .query(&[("timeout", self.poll_seconds)])
            .timeout(Duration::from_secs(self.poll_seconds + 5))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelopes)
    }

    /// Send `message` back to the conversation `envelope` came from.
    pub async fn reply(&self, envelope: &Envelope, message: &str) -> Result<()> {
        let payload = match &envelope.group_info {
            Some(group) => json!({
                "message": message,
                "number": self.phone_number,
                "recipients": [],
                "group_id": group.group_id,
            }),
            None => {
                let recipients: Vec<&str> = envelope.sender().into_iter().collect();
                json!({
                    "message": message,
                    "number": self.phone_number,
                    "recipients": recipients,
                })
            }
        };

        let url = format!("{}/v2/send", self.service_url);
        self.client
            .post(url)
            .json(&payload)
            .timeout(Duration::from_secs(15))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    /// Poll-and-answer loop. Per-envelope failures are logged and
    /// skipped; only transport-level receive errors end the loop.
    pub async fn run(&self, app: &App) -> Result<()> {
        info!(
            number = %self.phone_number,
            url = %self.service_url,
            "signal connector started"
        );
        loop {
            let envelopes = self.receive().await?;
            for envelope in envelopes {
                let Some(text) = envelope.message() else {
                    continue;
                };
                let sender = envelope.sender().unwrap_or("unknown");
                let reply = app.process_message(sender, text);
                if let Err(err) = self.reply(&envelope, &reply).await {
                    warn!(error = %err, sender, "failed to send reply");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_prefers_top_level_source_number() {
        let envelope: Envelope = serde_json::from_str(
            r#"{
                "sourceNumber": "+15550001",
                "source": {"number": "+15559999"},
                "dataMessage": {"message": "!balance"}
            }"#,
        )
        .unwrap();
        assert_eq!(envelope.sender(), Some("+15550001"));
        assert_eq!(envelope.message(), Some("!balance"));
    }

    #[test]
    fn envelope_falls_back_to_nested_source() {
        let envelope: Envelope = serde_json::from_str(
            r#"{
                "source": {"number": "+15559999"},
                "dataMessage": {"message": "!help"}
            }"#,
        )
        .unwrap();
        assert_eq!(envelope.sender(), Some("+15559999"));
    }

    #[test]
    fn envelope_without_data_message_is_skipped() {
        let envelope: Envelope = serde_json::from_str(r#"{"sourceNumber": "+1"}"#).unwrap();
        assert_eq!(envelope.message(), None);

        let empty: Envelope =
            serde_json::from_str(r#"{"dataMessage": {"message": ""}}"#).unwrap();
        assert_eq!(empty.message(), None);
    }

    #[test]
    fn group_id_deserializes_from_camel_case() {
        let envelope: Envelope = serde_json::from_str(
            r#"{"groupInfo": {"groupId": "grp-1"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.group_info.unwrap().group_id, "grp-1");
    }

    #[test]
    fn connector_requires_phone_number() {
        let config = SignalConfig::default();
        assert!(SignalConnector::new(&config).is_err());
    }
}
