use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Interest rates. Input rates are percentages (3.0 = 3% p.a.); the
/// generator converts them to monthly decimals internally.
pub type Rate = Decimal;

/// Display precision for every money column in a schedule.
pub const CENT_DP: u32 = 2;

/// Round a money amount to cents (banker's rounding).
pub fn round_cents(amount: Money) -> Money {
    amount.round_dp(CENT_DP)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_cents_uses_bankers_rounding() {
        assert_eq!(round_cents(dec!(1000.005)), dec!(1000.00));
        assert_eq!(round_cents(dec!(1000.015)), dec!(1000.02));
        assert_eq!(round_cents(dec!(999.999)), dec!(1000.00));
    }

    #[test]
    fn test_with_metadata_carries_warnings() {
        let out = with_metadata(
            "test",
            &serde_json::json!({ "principal": "100" }),
            vec!["careful".into()],
            42,
            dec!(1),
        );
        assert_eq!(out.warnings, vec!["careful".to_string()]);
        assert_eq!(out.metadata.computation_time_us, 42);
        assert_eq!(out.assumptions["principal"], "100");
    }
}
