//! Provider client: builds the two listing URLs, runs them through the
//! rotating fetcher, and unwraps the listing-specific envelope.

use serde_json::Value;
use url::Url;

use crate::error::{RelayError, Result};
use crate::fetch::Fetcher;
use crate::reshape;
use crate::types::{Network, SortOrder, Timeframe, TokenRow};

/// Upstream refuses new-pairs pages larger than this.
pub const MAX_NEW_PAIRS_LIMIT: u32 = 50;

pub struct GmgnClient {
    fetcher: Fetcher,
    base_url: Url,
}

impl GmgnClient {
    pub fn new(fetcher: Fetcher, base_url: Url) -> Self {
        Self { fetcher, base_url }
    }

    /// Newest trading pairs on `network`, honeypots filtered out upstream.
    /// The limit is checked before any outbound call happens.
    pub async fn new_pairs(
        &self,
        network: Network,
        sort: SortOrder,
        limit: u32,
    ) -> Result<Vec<TokenRow>> {
        if limit > MAX_NEW_PAIRS_LIMIT {
            return Err(RelayError::InvalidParameter(format!(
                "limit must be at most {MAX_NEW_PAIRS_LIMIT}, got {limit}"
            )));
        }

        let url = format!(
            "{}/v1/pairs/{}/new_pairs?limit={}&orderby=open_timestamp&direction={}&filters[]=not_honeypot",
            self.base(),
            network.as_str(),
            limit,
            sort.as_str()
        );
        let data = self.fetcher.fetch(&url).await?;
        let pairs = data
            .get("pairs")
            .and_then(Value::as_array)
            .ok_or(RelayError::MalformedResponse("`pairs` array"))?;
        Ok(pairs.iter().map(reshape::new_pair_row).collect())
    }

    /// Tokens ranked by swap count over `timeframe`.
    pub async fn trending(
        &self,
        network: Network,
        sort: SortOrder,
        timeframe: Timeframe,
    ) -> Result<Vec<TokenRow>> {
        let mut url = format!(
            "{}/v1/rank/{}/swaps/{}?orderby=swaps&direction={}",
            self.base(),
            network.as_str(),
            timeframe.as_str(),
            sort.as_str()
        );
        // The 1m ranking is uncapped upstream; keep it at one page.
        if timeframe == Timeframe::M1 {
            url.push_str("&limit=20");
        }

        let data = self.fetcher.fetch(&url).await?;
        let rank = data
            .get("rank")
            .and_then(Value::as_array)
            .ok_or(RelayError::MalformedResponse("`rank` array"))?;
        Ok(rank.iter().map(reshape::trending_row).collect())
    }

    fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}
