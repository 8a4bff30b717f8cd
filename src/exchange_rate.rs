//! Deterministic rate generation.
//!
//! Rates are derived from SHA-256 digests of the request parameters, so the
//! same `(date_req, test_id)` pair always yields the same snapshot while
//! different test sessions on one date see different numbers.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::currency::{CURRENCIES, CurrencyDefinition};

/// Modulus applied to the request digest to form the base seed.
pub const BASE_SEED: u64 = 10_000;

/// Fractional digits kept in generated values.
pub const RATE_SCALE: u32 = 4;

/// Rates keyed by currency char code.
pub type RateSnapshot = HashMap<String, Decimal>;

/// Reduce the SHA-256 digest of `text`, read as a big-endian unsigned
/// integer, modulo `modulus`.
pub fn digest_mod(text: &str, modulus: u64) -> u64 {
    let digest = Sha256::digest(text.as_bytes());
    digest
        .iter()
        .fold(0u64, |acc, byte| ((acc << 8) | u64::from(*byte)) % modulus)
}

/// Base seed for a request. An empty `test_id` counts as absent.
pub fn seed(date_req: &str, test_id: Option<&str>) -> u64 {
    match test_id.filter(|id| !id.is_empty()) {
        Some(test_id) => digest_mod(&format!("{}_{}", date_req, test_id), BASE_SEED),
        None => digest_mod(date_req, BASE_SEED),
    }
}

fn rate_for(seed: u64, currency: &CurrencyDefinition) -> Decimal {
    let currency_seed = format!("{}_{}", seed, currency.id);

    let value = if currency.nominal == 1 {
        let base = 30 + digest_mod(currency.id, 70);
        let cents = digest_mod(&currency_seed, 100);
        Decimal::from(base) + Decimal::new(cents as i64, 2)
    } else {
        let fraction = digest_mod(&currency_seed, 1000);
        Decimal::new(fraction as i64, 4) + Decimal::new(1, 2)
    };

    value.round_dp(RATE_SCALE)
}

/// Generate the rate snapshot for a request.
pub fn generate(date_req: &str, test_id: Option<&str>) -> RateSnapshot {
    let seed = seed(date_req, test_id);

    CURRENCIES
        .iter()
        .map(|currency| (currency.char_code.to_string(), rate_for(seed, currency)))
        .collect()
}

/// Plain decimal notation with trailing zeros trimmed, keeping at least one
/// fractional digit.
pub fn format_rate(value: Decimal) -> String {
    let mut value = value.normalize();
    if value.scale() == 0 {
        value.rescale(1);
    }
    value.to_string()
}
