use serde::{Deserialize, Serialize};

/// Random-walk parameters used when a token has no usable history.
pub const DEFAULT_VOLATILITY: f64 = 0.02;
pub const DEFAULT_DRIFT: f64 = 0.001;
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

/// Catalogue entry for a listed token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenProfile {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub current_price: f64,
    pub percent_change_24h: f64,
    pub market_cap: f64,
    pub volume_24h: f64,
    /// Per-step volatility of the synthetic walk
    pub volatility: f64,
    /// Per-step drift of the synthetic walk
    pub drift: f64,
}

impl TokenProfile {
    #[allow(clippy::too_many_arguments)]
    fn listed(
        id: &str,
        name: &str,
        symbol: &str,
        current_price: f64,
        percent_change_24h: f64,
        market_cap: f64,
        volume_24h: f64,
        volatility: f64,
        drift: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            current_price,
            percent_change_24h,
            market_cap,
            volume_24h,
            volatility,
            drift,
        }
    }
}

/// Walk parameters for a token id. Unknown tokens get the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkProfile {
    pub base_price: f64,
    pub volatility: f64,
    pub drift: f64,
}

impl Default for WalkProfile {
    fn default() -> Self {
        Self {
            base_price: DEFAULT_BASE_PRICE,
            volatility: DEFAULT_VOLATILITY,
            drift: DEFAULT_DRIFT,
        }
    }
}

impl From<&TokenProfile> for WalkProfile {
    fn from(profile: &TokenProfile) -> Self {
        Self {
            base_price: profile.current_price,
            volatility: profile.volatility,
            drift: profile.drift,
        }
    }
}

/// Static list of tokens shown by the application
#[derive(Debug, Clone)]
pub struct TokenCatalogue {
    tokens: Vec<TokenProfile>,
}

impl TokenCatalogue {
    pub fn new(tokens: Vec<TokenProfile>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[TokenProfile] {
        &self.tokens
    }

    pub fn find(&self, token_id: &str) -> Option<&TokenProfile> {
        self.tokens
            .iter()
            .find(|t| t.id.eq_ignore_ascii_case(token_id))
    }

    pub fn walk_profile(&self, token_id: &str) -> WalkProfile {
        self.find(token_id)
            .map(WalkProfile::from)
            .unwrap_or_default()
    }
}

impl Default for TokenCatalogue {
    fn default() -> Self {
        Self::new(vec![
            TokenProfile::listed(
                "aptos", "Aptos", "APT", 14.28, 5.2, 4.823e9, 3.28e8, 0.03, 0.002,
            ),
            TokenProfile::listed(
                "ethereum", "Ethereum", "ETH", 3480.12, 1.8, 4.278e11, 1.86e10, 0.02, 0.001,
            ),
            TokenProfile::listed(
                "bitcoin", "Bitcoin", "BTC", 59320.75, -0.5, 1.167e12, 4.25e10, 0.015, 0.0008,
            ),
            TokenProfile::listed(
                "solana", "Solana", "SOL", 121.36, 2.4, 5.23e10, 3.12e9, 0.04, 0.0025,
            ),
            TokenProfile::listed(
                "cardano", "Cardano", "ADA", 0.42, -1.2, 1.52e10, 6.3e8, 0.025, -0.0005,
            ),
            TokenProfile::listed(
                "avalanche", "Avalanche", "AVAX", 36.75, 4.1, 1.35e10, 9.45e8, 0.035, 0.0015,
            ),
        ])
    }
}
