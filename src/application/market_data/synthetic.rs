use crate::domain::token::{TokenCatalogue, WalkProfile};
use rand::Rng;

/// Smallest price a walk may reach
const PRICE_FLOOR: f64 = 1e-9;

/// Geometric random walk shaped by a token's catalogue profile.
///
/// Each step is `p *= 1 + drift + U(-volatility, volatility)`. The shape is
/// reproducible per token, the values are not.
#[derive(Debug, Clone, Default)]
pub struct SyntheticSeriesGenerator {
    catalogue: TokenCatalogue,
}

impl SyntheticSeriesGenerator {
    pub fn new(catalogue: TokenCatalogue) -> Self {
        Self { catalogue }
    }

    pub fn catalogue(&self) -> &TokenCatalogue {
        &self.catalogue
    }

    /// Exactly `days` prices, oldest first
    pub fn generate(&self, token_id: &str, days: usize) -> Vec<f64> {
        self.generate_with(token_id, days, &mut rand::rng())
    }

    pub fn generate_with<R: Rng>(&self, token_id: &str, days: usize, rng: &mut R) -> Vec<f64> {
        let profile = self.catalogue.walk_profile(token_id);
        walk(&profile, days, rng)
    }
}

fn walk<R: Rng>(profile: &WalkProfile, days: usize, rng: &mut R) -> Vec<f64> {
    let mut prices = Vec::with_capacity(days);
    if days == 0 {
        return prices;
    }

    let mut price = profile.base_price.max(PRICE_FLOOR);
    prices.push(price);
    for _ in 1..days {
        let shock = if profile.volatility > 0.0 {
            rng.random_range(-profile.volatility..profile.volatility)
        } else {
            0.0
        };
        price = (price * (1.0 + profile.drift + shock)).max(PRICE_FLOOR);
        prices.push(price);
    }
    prices
}
