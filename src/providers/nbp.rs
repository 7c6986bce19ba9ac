use crate::core::config::NbpProviderConfig;
use crate::core::{RateSource, RatesRequest, RatesSpan};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for the NBP exchange-rate API (`/api/exchangerates/rates/...`).
///
/// Whatever the upstream status, the body is handed back as text: NBP answers
/// missing data and invalid ranges with short plain-text notices, and those are
/// what callers eventually show.
pub struct NbpProvider {
    base_url: Url,
    client: reqwest::Client,
}

impl NbpProvider {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("nbp-rates/0.1");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid NBP base URL: {base_url}"))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("Invalid NBP base URL: {}", base_url));
        }
        Ok(NbpProvider { base_url, client })
    }

    pub fn from_config(config: &NbpProviderConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    /// Each request part goes in as one escaped path segment.
    fn url_for(&self, request: &RatesRequest) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push(&request.table.to_string())
                .push(&request.code);
            match &request.span {
                RatesSpan::Date(date) => segments.push(date),
                RatesSpan::Last(count) => segments.push("last").push(&count.to_string()),
            };
            segments.push("");
        }
        url.set_query(Some("format=json"));
        url
    }
}

#[async_trait]
impl RateSource for NbpProvider {
    #[instrument(
        name = "NbpRatesFetch",
        skip(self, request),
        fields(table = %request.table, code = %request.code)
    )]
    async fn fetch_rates(&self, request: &RatesRequest) -> Result<String> {
        let url = self.url_for(request);
        debug!("Requesting rates from {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for code: {} URL: {}", e, request.code, url))?;

        let status = response.status();
        debug!(%status, "Received NBP response");

        response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for code: {}", request.code))
    }
}
