//! Package Size Model (sellable container volume)

use crate::util::round2;
use serde::{Deserialize, Serialize};

/// Reference volume the catalog `base_price` is quoted against (standard
/// 330 ml bottle).
pub const REFERENCE_VOLUME_ML: i64 = 330;

/// A sellable unit volume - static lookup table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PackageSize {
    pub id: i64,
    /// Volume in milliliters
    pub volume_ml: i64,
}

impl PackageSize {
    /// Unit price of a recipe in this package size, scaled linearly from the
    /// recipe's base price and rounded to cents.
    pub fn unit_price(&self, base_price: f64) -> f64 {
        round2(base_price * self.volume_ml as f64 / REFERENCE_VOLUME_ML as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_price_scales_with_volume() {
        let bottle = PackageSize { id: 1, volume_ml: 330 };
        let magnum = PackageSize { id: 2, volume_ml: 750 };
        assert_eq!(bottle.unit_price(4.50), 4.50);
        assert_eq!(magnum.unit_price(4.50), 10.23);
    }
}
