//! Foursquare Places API client.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::PlaceSearch;
use crate::config::ApiConfig;
use crate::error::SearchError;
use crate::models::{PlaceQuery, RawPlace, SortOrder};

const API_VERSION_HEADER: &str = "X-Places-Api-Version";

/// Authenticated handle to the places search endpoint.
///
/// Built once per run; headers and timeout are fixed at construction.
pub struct FoursquareClient {
    client: Client,
    base_url: Url,
    exclude_all_chains: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RawPlace>,
}

impl FoursquareClient {
    pub fn new(api_key: &str, config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .context("API key is not a valid header value")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            API_VERSION_HEADER,
            HeaderValue::from_str(&config.api_version)
                .context("API version is not a valid header value")?,
        );

        let client = Client::builder()
            .user_agent("poi-enrich/0.1")
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base URL '{}'", config.base_url))?;

        Ok(Self {
            client,
            base_url,
            exclude_all_chains: config.exclude_all_chains,
        })
    }

    fn request_url(&self, query: &PlaceQuery, limit: usize, sort: SortOrder) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            if self.exclude_all_chains {
                pairs.append_pair("exclude_all_chains", "true");
            }
            pairs
                .append_pair("near", &query.near())
                .append_pair("categories", query.category.foursquare_id())
                .append_pair("limit", &limit.to_string())
                .append_pair("sort", sort.as_param());
        }
        url
    }
}

#[async_trait]
impl PlaceSearch for FoursquareClient {
    async fn search(
        &self,
        query: &PlaceQuery,
        limit: usize,
        sort: SortOrder,
    ) -> Result<Vec<RawPlace>, SearchError> {
        let url = self.request_url(query, limit, sort);
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| SearchError::Transport {
                category: query.category,
                near: query.near(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(SearchError::Status {
                category: query.category,
                near: query.near(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| SearchError::Transport {
                category: query.category,
                near: query.near(),
                source,
            })?;

        decode_results(&body).map_err(|e| SearchError::Decode {
            category: query.category,
            near: query.near(),
            reason: e.to_string(),
        })
    }
}

fn decode_results(body: &str) -> serde_json::Result<Vec<RawPlace>> {
    let data: SearchResponse = serde_json::from_str(body)?;
    Ok(data.results)
}
