/// 当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Round a monetary amount to two decimal places.
///
/// Prices are stored as `f64` (cents-level precision is enough for a small
/// storefront); every derived amount goes through this before being persisted
/// or compared.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_to_cents() {
        // 750 ml at a 4.50 base price: 10.2272... -> 10.23
        assert_eq!(round2(4.5 * 750.0 / 330.0), 10.23);
        assert_eq!(round2(12.344), 12.34);
        assert_eq!(round2(3.0), 3.0);
    }
}
