//! Plausibility check for retail prices against a known buyback price

/// Lowest retail price accepted when no buyback price is known (exclusive)
pub const MIN_UNREFERENCED_PRICE: u64 = 1000;

/// Return rates above this mean buyback and retail are suspiciously close
pub const MAX_RETURN_RATE: f64 = 0.95;

/// Return rates below this mean the retail price is implausibly high
pub const MIN_RETURN_RATE: f64 = 0.10;

/// Validate that a retail price makes sense relative to the buyback price.
///
/// A `buyback_price` of 0 means "unknown". The category is part of the
/// contract but no rule currently depends on it.
pub fn validate_price(retail_price: u64, buyback_price: u64, _category: &str) -> bool {
    if retail_price == 0 {
        return false;
    }
    if buyback_price == 0 {
        return retail_price > MIN_UNREFERENCED_PRICE;
    }

    // A shop never pays more than the product costs new
    if buyback_price > retail_price {
        return false;
    }

    let return_rate = buyback_price as f64 / retail_price as f64;
    (MIN_RETURN_RATE..=MAX_RETURN_RATE).contains(&return_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_candidate() {
        assert!(!validate_price(0, 0, ""));
        assert!(!validate_price(0, 5000, "PS5"));
    }

    #[test]
    fn unknown_buyback_uses_floor() {
        for p in [1, 999, 1000, 1001, 50_000] {
            assert_eq!(validate_price(p, 0, "any"), p > 1000, "price {p}");
        }
    }

    #[test]
    fn rejects_buyback_above_retail() {
        assert!(!validate_price(10_000, 10_001, ""));
        assert!(!validate_price(1500, 40_000, "PC"));
    }

    #[test]
    fn rejects_suspicious_return_rates() {
        // 96%
        assert!(!validate_price(10_000, 9_600, ""));
        // 9%
        assert!(!validate_price(100_000, 9_000, ""));
    }

    #[test]
    fn accepts_boundaries() {
        assert!(validate_price(10_000, 9_500, ""));
        assert!(validate_price(100_000, 10_000, ""));
        assert!(validate_price(20_000, 13_000, "PS5"));
    }

    #[test]
    fn matches_ratio_rule_over_a_grid() {
        for p in (1_000..=50_000).step_by(1_700) {
            for r in (100..=50_000).step_by(2_300) {
                let ratio = r as f64 / p as f64;
                let expected = r <= p && (0.10..=0.95).contains(&ratio);
                assert_eq!(validate_price(p, r, "x"), expected, "p={p} r={r}");
            }
        }
    }
}
