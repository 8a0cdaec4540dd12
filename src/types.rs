use serde::{Deserialize, Serialize};

/// The two upstream listings the relay exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolType {
    GmgnNew,
    GmgnTrending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Eth,
    Sol,
    Bsc,
    Base,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eth => "eth",
            Self::Sol => "sol",
            Self::Bsc => "bsc",
            Self::Base => "base",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Ranking window for the trending listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "6h")]
    H6,
    #[serde(rename = "24h")]
    H24,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M1 => "1m",
            Self::M5 => "5m",
            Self::H1 => "1h",
            Self::H6 => "6h",
            Self::H24 => "24h",
        }
    }
}

/// Stable row schema returned by both pool endpoints.
///
/// Everything is a string except `transactions`; upstream numeric types vary
/// per listing, so the reshaping layer coerces them (see `reshape`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenRow {
    pub symbol: String,
    pub name: String,
    pub address: String,
    pub network: String,
    pub logo: String,
    pub price: String,
    pub volume: String,
    pub market_cap: String,
    pub percent_change: String,
    pub transactions: u64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_type_parses_snake_case() {
        let new: PoolType = serde_json::from_str("\"gmgn_new\"").unwrap();
        assert_eq!(new, PoolType::GmgnNew);
        let trending: PoolType = serde_json::from_str("\"gmgn_trending\"").unwrap();
        assert_eq!(trending, PoolType::GmgnTrending);
        assert!(serde_json::from_str::<PoolType>("\"gmgn_hot\"").is_err());
    }

    #[test]
    fn timeframe_round_trips_through_labels() {
        for (label, tf) in [
            ("1m", Timeframe::M1),
            ("5m", Timeframe::M5),
            ("1h", Timeframe::H1),
            ("6h", Timeframe::H6),
            ("24h", Timeframe::H24),
        ] {
            let parsed: Timeframe = serde_json::from_str(&format!("\"{label}\"")).unwrap();
            assert_eq!(parsed, tf);
            assert_eq!(tf.as_str(), label);
        }
        assert!(serde_json::from_str::<Timeframe>("\"12h\"").is_err());
    }

    #[test]
    fn token_row_serializes_created_at_camel_case() {
        let row = TokenRow {
            symbol: "PEPE".into(),
            name: "Pepe".into(),
            address: "0xabc".into(),
            network: "eth".into(),
            logo: String::new(),
            price: "0.12".into(),
            volume: "100.00".into(),
            market_cap: "1000".into(),
            percent_change: "0.00".into(),
            transactions: 7,
            created_at: "1700000000".into(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["createdAt"], "1700000000");
        assert_eq!(json["transactions"], 7);
    }
}
