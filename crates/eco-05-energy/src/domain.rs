//! Pure settlement arithmetic and region pricing.

use shared_types::{EcoError, EcoResult};
use std::collections::HashMap;

/// Fixed producer price per kWh used in settlement.
pub const PRODUCER_PRICE: f64 = 0.3;

/// Platform fee share of the total settlement cost.
pub const PLATFORM_FEE_RATE: f64 = 0.10;

/// Region price table for producer injection.
#[derive(Debug, Clone)]
pub struct EnergyConfig {
    /// Price per kWh credited to a producer, by region tag.
    pub region_prices: HashMap<String, f64>,
    /// Price used when the producer's region is not in the table.
    pub default_price: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            region_prices: HashMap::new(),
            default_price: PRODUCER_PRICE,
        }
    }
}

impl EnergyConfig {
    /// Price per kWh for a region.
    #[must_use]
    pub fn region_price(&self, region: &str) -> f64 {
        self.region_prices
            .get(region)
            .copied()
            .unwrap_or(self.default_price)
    }
}

/// The two legs of a settlement and their total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettlementReceipt {
    /// Energy settled, in kWh.
    pub kwh: f64,
    /// Total debited from the consumer.
    pub total_cost: f64,
    /// Platform-fee leg.
    pub platform_fee: f64,
    /// Producer-payout leg.
    pub producer_payout: f64,
}

/// Settlement arithmetic: the fixed producer price amortized over the
/// platform fee, `total = (kwh * PRODUCER_PRICE) / (1 - PLATFORM_FEE_RATE)`,
/// split into its two legs. The legs sum to the total.
pub fn settlement_breakdown(kwh: f64) -> EcoResult<SettlementReceipt> {
    if !kwh.is_finite() || kwh <= 0.0 {
        return Err(EcoError::ValidationError(format!(
            "kWh must be a positive finite number, got {kwh}"
        )));
    }
    let total_cost = (kwh * PRODUCER_PRICE) / (1.0 - PLATFORM_FEE_RATE);
    let platform_fee = total_cost * PLATFORM_FEE_RATE;
    Ok(SettlementReceipt {
        kwh,
        total_cost,
        platform_fee,
        producer_payout: total_cost - platform_fee,
    })
}
