//! Inbound HTTP surface: the greeting route and the authenticated
//! `/pools/{pool_type}` listing route.

use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, warn};

use crate::config::Config;
use crate::error::{RelayError, Result};
use crate::gmgn::{GmgnClient, MAX_NEW_PAIRS_LIMIT};
use crate::types::{Network, PoolType, SortOrder, Timeframe, TokenRow};

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Arc<GmgnClient>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/pools/:pool_type", get(pools))
        .with_state(state)
}

async fn root() -> &'static str {
    "gmgn-relay is up"
}

#[derive(Debug, Deserialize)]
struct PoolQuery {
    network: Option<Network>,
    sort: Option<SortOrder>,
    duration: Option<Timeframe>,
    limit: Option<u32>,
}

async fn pools(
    State(state): State<AppState>,
    Path(pool_type): Path<PoolType>,
    params: std::result::Result<Query<PoolQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Result<Json<Vec<TokenRow>>> {
    // Auth first: a bad key is rejected even when the parameters are also bad.
    verify_api_key(&headers, &state.config.api_key)?;
    let Query(params) =
        params.map_err(|e| RelayError::InvalidParameter(e.body_text()))?;

    let network = params.network.unwrap_or(Network::Sol);
    let sort = params.sort.unwrap_or(SortOrder::Desc);

    let rows = match pool_type {
        PoolType::GmgnNew => {
            let limit = params.limit.unwrap_or(MAX_NEW_PAIRS_LIMIT);
            state.client.new_pairs(network, sort, limit).await?
        }
        PoolType::GmgnTrending => {
            let duration = params.duration.unwrap_or(Timeframe::H1);
            state.client.trending(network, sort, duration).await?
        }
    };
    Ok(Json(rows))
}

/// Verbatim comparison against the configured secret. Runs before any
/// outbound call and before parameter interpretation.
fn verify_api_key(headers: &HeaderMap, expected: &str) -> Result<()> {
    match headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        Some(key) if key == expected => Ok(()),
        _ => Err(RelayError::Unauthorized),
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match &self {
            RelayError::Unauthorized => StatusCode::UNAUTHORIZED,
            RelayError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            RelayError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Upstream trouble, in all its shapes.
            RelayError::AntiBotBlocked { .. }
            | RelayError::UpstreamStatus { .. }
            | RelayError::Transport(_)
            | RelayError::Decode(_)
            | RelayError::MalformedResponse(_)
            | RelayError::RetryExhausted { .. } => StatusCode::BAD_GATEWAY,
        };

        if status.is_server_error() {
            error!(%status, "request failed: {self}");
        } else {
            warn!(%status, "request rejected: {self}");
        }

        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use url::Url;

    use crate::config::DEFAULT_BASE_URL;
    use crate::fetch::testing::{blocked, ok, MockTransport};
    use crate::fetch::{Fetcher, IdentityRotator};

    const KEY: &str = "test-secret";

    fn state_with(transport: Arc<MockTransport>) -> AppState {
        let config = Config {
            api_key: KEY.into(),
            proxy_source_url: None,
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
            max_attempts: 3,
            backoff_ms: 1,
        };
        let rotator = IdentityRotator::new(config.provider_host());
        let fetcher = Fetcher::with_transport(transport, rotator, config.retry_policy());
        let client = GmgnClient::new(fetcher, config.base_url.clone());
        AppState {
            config: Arc::new(config),
            client: Arc::new(client),
        }
    }

    fn get_with_key(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(API_KEY_HEADER, KEY)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn new_pairs_envelope() -> String {
        json!({
            "code": 0,
            "data": {
                "pairs": [{
                    "base_address": "So11111",
                    "chain": "sol",
                    "quote_reserve_usd": "55.5",
                    "creation_timestamp": 1700000000,
                    "base_token_info": {
                        "symbol": "WIF",
                        "name": "dogwifhat",
                        "logo": "https://img/wif.png",
                        "volume": "9000.5",
                        "market_cap": "42000",
                        "price_change_percent5m": "1.25",
                        "swaps": 17
                    }
                }]
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn root_returns_greeting() {
        let transport = MockTransport::always(blocked());
        let app = router(state_with(transport));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_api_key_is_unauthorized_with_zero_outbound_calls() {
        let transport = MockTransport::always(ok(&new_pairs_envelope()));
        let app = router(state_with(transport.clone()));
        let request = Request::builder()
            .uri("/pools/gmgn_new?network=sol&sort=desc")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn wrong_api_key_is_unauthorized() {
        let transport = MockTransport::always(ok(&new_pairs_envelope()));
        let app = router(state_with(transport.clone()));
        let request = Request::builder()
            .uri("/pools/gmgn_trending")
            .header(API_KEY_HEADER, "nope")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn bad_key_wins_over_bad_parameters() {
        let transport = MockTransport::always(ok(&new_pairs_envelope()));
        let app = router(state_with(transport.clone()));
        let request = Request::builder()
            .uri("/pools/gmgn_new?network=dogechain&limit=900")
            .header(API_KEY_HEADER, "nope")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn oversized_limit_is_rejected_before_any_outbound_call() {
        let transport = MockTransport::always(ok(&new_pairs_envelope()));
        let app = router(state_with(transport.clone()));
        let response = app
            .oneshot(get_with_key("/pools/gmgn_new?limit=51"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(transport.calls(), 0);

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("limit"));
    }

    #[tokio::test]
    async fn unknown_network_is_rejected_at_the_boundary() {
        let transport = MockTransport::always(ok(&new_pairs_envelope()));
        let app = router(state_with(transport.clone()));
        let response = app
            .oneshot(get_with_key("/pools/gmgn_new?network=dogechain"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn new_pairs_happy_path_reshapes_the_listing() {
        let transport = MockTransport::always(ok(&new_pairs_envelope()));
        let app = router(state_with(transport.clone()));
        let response = app
            .oneshot(get_with_key("/pools/gmgn_new?network=sol&sort=desc"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(transport.calls(), 1);

        let body = body_json(response).await;
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row["symbol"], "WIF");
        assert_eq!(row["network"], "sol");
        assert_eq!(row["price"], "55.5");
        // No 1h change in the fixture, so the 5m change wins.
        assert_eq!(row["percent_change"], "1.25");
        assert!(row["transactions"].is_u64());
        assert_eq!(row["transactions"], 17);
        assert_eq!(row["createdAt"], "1700000000");
    }

    #[tokio::test]
    async fn trending_happy_path_uses_rank_envelope() {
        let envelope = json!({
            "data": {
                "rank": [{
                    "symbol": "BONK",
                    "address": "DezX",
                    "chain": "sol",
                    "logo": "https://img/bonk.png",
                    "price": 0.0001230,
                    "volume": 1234.5,
                    "market_cap": 99999,
                    "price_change_percent": 12.5,
                    "swaps": 321,
                    "open_timestamp": 1690000000
                }]
            }
        })
        .to_string();
        let transport = MockTransport::always(ok(&envelope));
        let app = router(state_with(transport.clone()));
        let response = app
            .oneshot(get_with_key("/pools/gmgn_trending?duration=5m"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let row = &body.as_array().unwrap()[0];
        assert_eq!(row["name"], "BONK");
        assert_eq!(row["price"], "0.000123");
        assert_eq!(row["volume"], "1234.50");
        assert_eq!(row["percent_change"], "12.5");
    }

    #[tokio::test]
    async fn permanently_blocked_upstream_surfaces_bad_gateway() {
        let transport = MockTransport::always(blocked());
        let app = router(state_with(transport.clone()));
        let response = app
            .oneshot(get_with_key("/pools/gmgn_new"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        // The retry cap bounds the outbound attempts.
        assert_eq!(transport.calls(), 3);

        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("attempts"));
    }

    #[tokio::test]
    async fn missing_pairs_key_is_bad_gateway_not_empty_list() {
        let transport = MockTransport::always(ok(r#"{"data":{"rank":[]}}"#));
        let app = router(state_with(transport));
        let response = app
            .oneshot(get_with_key("/pools/gmgn_new"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
