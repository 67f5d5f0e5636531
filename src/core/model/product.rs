use crate::core::config::ProductConfig;
use serde::{Deserialize, Serialize};

/// An item in a customer's basket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u32,
    /// Scan time in simulated seconds at cashier efficiency 1.0
    pub process_time_secs: f64,
}

impl Product {
    pub fn new(id: u32, process_time_secs: f64) -> Self {
        Self {
            id,
            process_time_secs,
        }
    }

    /// Key under which the product sits in a basket
    pub fn name(&self) -> String {
        format!("product{}", self.id)
    }

    /// Simulated scan time at a lane with the given cashier efficiency
    pub fn scan_time(&self, cashier_efficiency: f64) -> f64 {
        self.process_time_secs * cashier_efficiency
    }
}

impl From<&ProductConfig> for Product {
    fn from(config: &ProductConfig) -> Self {
        Product::new(config.id, config.process_time_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_time_scales_with_efficiency() {
        let product = Product::new(3, 2.0);
        assert_eq!(product.scan_time(1.0), 2.0);
        assert_eq!(product.scan_time(0.5), 1.0);
        assert_eq!(product.name(), "product3");
    }
}
