use std::time::Duration;

use transferwatch_core::record::RowExtraction;
use transferwatch_core::traits::TransferSource;

use crate::error::ListingError;
use crate::extract;

pub const DEFAULT_BASE_URL: &str = "https://www.transfermarkt.co.uk";

/// The listing endpoint rejects non-browser clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Fixed filter parameters: every competition, full value range.
const LISTING_QUERY: &str =
    "ajax=yw1&land_id=0&maxMarktwert=500000000&minMarktwert=0&plus=1&wettbewerb_id=alle";

/// HTTP client for the paginated transfer listing.
pub struct ListingClient {
    http: reqwest::Client,
    base_url: String,
}

impl ListingClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ListingError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn page_url(&self, page: u32) -> String {
        format!(
            "{}/transfers/neuestetransfers/statistik?{}&page={}",
            self.base_url, LISTING_QUERY, page
        )
    }

    /// Fetch one listing page and extract its rows in document order.
    pub async fn fetch_page(&self, page: u32) -> Result<Vec<RowExtraction>, ListingError> {
        let url = self.page_url(page);
        let resp = self.http.get(&url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ListingError::Status {
                status: status.as_u16(),
                page,
            });
        }

        let html = resp.text().await?;
        let rows = extract::extract_rows(&html);
        log::debug!("page {}: {} rows extracted", page, rows.len());
        Ok(rows)
    }
}

impl TransferSource for ListingClient {
    type Error = ListingError;

    async fn fetch_page(&self, page: u32) -> Result<Vec<RowExtraction>, ListingError> {
        ListingClient::fetch_page(self, page).await
    }
}
