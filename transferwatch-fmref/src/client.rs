use std::time::Duration;

use crate::error::FmrefError;

pub const DEFAULT_SITE_URL: &str = "https://fmref.com";
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:3000";

/// Client for a Browserless-compatible rendering service.
///
/// Each call to [`render`](Self::render) runs in its own short-lived
/// browser session on the service side; the session is torn down when the
/// response is sent, so concurrent lookups never share browser state.
pub struct RenderClient {
    http: reqwest::Client,
    service_url: String,
    token: Option<String>,
    site: reqwest::Url,
}

impl RenderClient {
    pub fn new(
        service_url: &str,
        token: Option<&str>,
        site_url: &str,
    ) -> Result<Self, FmrefError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        let site = reqwest::Url::parse(site_url)
            .map_err(|e| FmrefError::Config(format!("invalid site url '{site_url}': {e}")))?;

        Ok(Self {
            http,
            service_url: service_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
            site,
        })
    }

    /// Render one URL in a fresh browser session and return the final HTML.
    pub async fn render(&self, url: &str) -> Result<String, FmrefError> {
        let mut endpoint = format!("{}/content", self.service_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }

        log::debug!("rendering {url}");
        let body = serde_json::json!({ "url": url });

        let resp = self
            .http
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FmrefError::Render {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }

    /// Search page URL for a player name.
    pub fn search_url(&self, name: &str) -> String {
        let mut url = self.site.clone();
        url.query_pairs_mut().append_pair("search", name);
        url.to_string()
    }

    /// Detail page URL for an FMRef id.
    pub fn player_url(&self, id: &str) -> String {
        format!("{}/player/{}", self.site.as_str().trim_end_matches('/'), id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_urls() {
        let client = RenderClient::new("http://localhost:3000", None, "https://fmref.com").unwrap();
        assert_eq!(
            client.search_url("Declan Rice"),
            "https://fmref.com/?search=Declan+Rice"
        );
        assert_eq!(client.player_url("85002"), "https://fmref.com/player/85002");
    }

    #[test]
    fn rejects_invalid_site_url() {
        assert!(matches!(
            RenderClient::new("http://localhost:3000", None, "not a url"),
            Err(FmrefError::Config(_))
        ));
    }
}
