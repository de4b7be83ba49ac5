use std::time::Duration;

use serde_json::json;

use crate::config::AnalyticsConfig;

/// Fire-and-forget usage beacon. Disabled by default; when enabled it
/// posts one event per feature use and ignores every failure.
#[derive(Clone)]
pub struct Analytics {
    client: reqwest::Client,
    config: AnalyticsConfig,
}

impl Analytics {
    pub fn new(config: &AnalyticsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(3))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Analytics {
            client,
            config: config.clone(),
        }
    }

    pub async fn track(&self, event_name: &str) {
        if !self.config.enabled {
            return;
        }

        let payload = json!({
            "type": "event",
            "payload": {
                "website": self.config.website_id,
                "name": event_name,
                "url": format!("/app/{}", event_name),
                "hostname": "infogen.local",
                "language": "zh-CN",
            }
        });

        // Best effort only; a dead endpoint must never affect generation
        let _ = self
            .client
            .post(&self.config.endpoint)
            .json(&payload)
            .send()
            .await;
    }
}
