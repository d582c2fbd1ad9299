use crate::domain::driftavbrott::Driftavbrott;
use crate::source::{SourceError, WindowSource};
use reqwest::StatusCode;

/// Client for the driftavbrott REST service. `GET /driftavbrott/pagaende`
/// with repeated `kanal` parameters plus `system` and `marginal`; 200 carries
/// a JSON window, 204 means nothing is ongoing.
pub struct RestWindowSource {
    pub base_url: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

impl RestWindowSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: 2500,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl WindowSource for RestWindowSource {
    async fn fetch_ongoing(
        &self,
        kanaler: &[String],
        system: &str,
        marginal: u32,
    ) -> Result<Option<Driftavbrott>, SourceError> {
        let url = format!("{}/driftavbrott/pagaende", self.base_url.trim_end_matches('/'));
        let mut query: Vec<(&str, String)> = kanaler.iter().map(|k| ("kanal", k.clone())).collect();
        query.push(("system", system.to_string()));
        query.push(("marginal", marginal.to_string()));

        let resp = self
            .client
            .get(url)
            .query(&query)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        match resp {
            Ok(r) if r.status() == StatusCode::NO_CONTENT => Ok(None),
            Ok(r) if r.status().is_success() => {
                let body = r.text().await.map_err(|e| SourceError::Transport(e.to_string()))?;
                if body.trim().is_empty() {
                    return Ok(None);
                }
                serde_json::from_str::<Driftavbrott>(&body)
                    .map(Some)
                    .map_err(|e| SourceError::Decode(e.to_string()))
            }
            Ok(r) => {
                let status = r.status().as_u16();
                let body = r.text().await.unwrap_or_default();
                Err(SourceError::Status {
                    status,
                    body: body.chars().take(200).collect(),
                })
            }
            Err(e) if e.is_timeout() => Err(SourceError::Timeout),
            Err(e) => Err(SourceError::Transport(e.to_string())),
        }
    }
}
