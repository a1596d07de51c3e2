use apidup_core::config::{ComparatorKind, StrategyKind};

/// Parse a threshold in `[0.0, 1.0]`
pub fn parse_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is not between 0.0 and 1.0", value))
    }
}

pub fn parse_strategy(s: &str) -> Result<StrategyKind, String> {
    s.parse().map_err(|e: apidup_core::error::ApidupError| e.to_string())
}

pub fn parse_comparator(s: &str) -> Result<ComparatorKind, String> {
    s.parse().map_err(|e: apidup_core::error::ApidupError| e.to_string())
}
