use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::errors::OrderError;
use super::value_objects::FuelType;

/// Round a currency amount to two places, halves away from zero
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Static price-per-liter lookup (INR)
///
/// Fuel types without an entry are charged `default_price`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTable {
    prices: BTreeMap<FuelType, Decimal>,
    default_price: Decimal,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::new(Decimal::new(10250, 2))
            .with_price(FuelType::Petrol, Decimal::new(10250, 2))
            .with_price(FuelType::Diesel, Decimal::new(9625, 2))
    }
}

impl PriceTable {
    pub fn new(default_price: Decimal) -> Self {
        Self {
            prices: BTreeMap::new(),
            default_price,
        }
    }

    pub fn with_price(mut self, fuel_type: FuelType, price_per_liter: Decimal) -> Self {
        self.prices.insert(fuel_type, price_per_liter);
        self
    }

    pub fn default_price(&self) -> Decimal {
        self.default_price
    }

    pub fn price_per_liter(&self, fuel_type: FuelType) -> Decimal {
        self.prices
            .get(&fuel_type)
            .copied()
            .unwrap_or(self.default_price)
    }

    /// Rounded total; fails instead of overflowing on absurd quantities
    pub fn total_for(&self, fuel_type: FuelType, quantity: Decimal) -> Result<Decimal, OrderError> {
        self.price_per_liter(fuel_type)
            .checked_mul(quantity)
            .map(round_currency)
            .ok_or_else(|| OrderError::Validation("Quantity too large".to_string()))
    }

    pub fn quote(&self, fuel_type: FuelType, quantity: Decimal) -> Result<PriceQuote, OrderError> {
        Ok(PriceQuote {
            fuel_type,
            quantity,
            price_per_liter: self.price_per_liter(fuel_type),
            total_price: self.total_for(fuel_type, quantity)?,
        })
    }

    /// Effective price for every fuel type, fallbacks included
    pub fn entries(&self) -> Vec<(FuelType, Decimal)> {
        FuelType::ALL
            .iter()
            .map(|fuel| (*fuel, self.price_per_liter(*fuel)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub fuel_type: FuelType,
    pub quantity: Decimal,
    pub price_per_liter: Decimal,
    pub total_price: Decimal,
}
