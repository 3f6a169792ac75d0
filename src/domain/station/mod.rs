use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order::{FuelType, PriceTable};
use crate::notify::{Notification, Notifier};

// ============================================================================
// Station Domain - Nearby Fuel Stations
// ============================================================================
//
// A small in-memory directory of stations near the delivery area with their
// posted petrol and diesel prices. Prices can be edited; nothing is persisted.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelStation {
    pub id: String,
    pub name: String,
    pub location: String,
    pub distance_km: f64,
    pub petrol_price: Decimal,
    pub diesel_price: Decimal,
}

impl FuelStation {
    /// Posted price, or `None` for fuels the station does not list
    pub fn price_for(&self, fuel_type: FuelType) -> Option<Decimal> {
        match fuel_type {
            FuelType::Petrol => Some(self.petrol_price),
            FuelType::Diesel => Some(self.diesel_price),
            FuelType::Premium => None,
        }
    }

    /// Order pricing based on this station's posted prices
    pub fn price_table(&self) -> PriceTable {
        PriceTable::new(self.petrol_price)
            .with_price(FuelType::Petrol, self.petrol_price)
            .with_price(FuelType::Diesel, self.diesel_price)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StationError {
    #[error("Station not found: {0}")]
    NotFound(String),

    #[error("Prices must be positive (petrol {petrol}, diesel {diesel})")]
    InvalidPrice { petrol: Decimal, diesel: Decimal },
}

pub struct StationDirectory {
    stations: RwLock<Vec<FuelStation>>,
    notifier: Arc<dyn Notifier>,
}

impl StationDirectory {
    pub fn new(stations: Vec<FuelStation>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            stations: RwLock::new(stations),
            notifier,
        }
    }

    /// The five stations around Visakhapatnam
    pub fn with_defaults(notifier: Arc<dyn Notifier>) -> Self {
        let station = |id: &str, name: &str, location: &str, distance_km: f64, petrol: i64, diesel: i64| {
            FuelStation {
                id: id.to_string(),
                name: name.to_string(),
                location: location.to_string(),
                distance_km,
                petrol_price: Decimal::new(petrol, 2),
                diesel_price: Decimal::new(diesel, 2),
            }
        };

        Self::new(
            vec![
                station("station1", "Bharat Petroleum", "MVP colony, Visakhapatnam", 1.2, 10250, 9625),
                station("station2", "Indian Oil", "Endada, Visakhapatnam", 2.5, 10265, 9640),
                station("station3", "Hindustan Petroleum", "Madhurawada, Visakhapatnam", 3.8, 10245, 9615),
                station("station4", "Reliance Petroleum", "Maddillapalem, Visakhapatnam", 4.3, 10270, 9635),
                station("station5", "Bharat Petroleum", "RTC Complex, Visakhapatnam", 5.1, 10255, 9620),
            ],
            notifier,
        )
    }

    /// Every station, nearest first
    pub fn list(&self) -> Vec<FuelStation> {
        let mut stations = self.read().clone();
        stations.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        stations
    }

    pub fn get(&self, station_id: &str) -> Option<FuelStation> {
        self.read().iter().find(|s| s.id == station_id).cloned()
    }

    #[tracing::instrument(skip_all, fields(station_id = %station_id))]
    pub fn update_prices(
        &self,
        station_id: &str,
        petrol_price: Decimal,
        diesel_price: Decimal,
    ) -> Result<FuelStation, StationError> {
        let result = self.apply_prices(station_id, petrol_price, diesel_price);
        match &result {
            Ok(station) => {
                tracing::info!(
                    petrol_price = %station.petrol_price,
                    diesel_price = %station.diesel_price,
                    "✅ Station prices updated"
                );
                self.notifier
                    .notify(Notification::success("Fuel prices updated successfully"));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Station price update rejected");
                self.notifier.notify(Notification::error(e.to_string()));
            }
        }
        result
    }

    fn apply_prices(
        &self,
        station_id: &str,
        petrol_price: Decimal,
        diesel_price: Decimal,
    ) -> Result<FuelStation, StationError> {
        if petrol_price <= Decimal::ZERO || diesel_price <= Decimal::ZERO {
            return Err(StationError::InvalidPrice {
                petrol: petrol_price,
                diesel: diesel_price,
            });
        }

        let mut stations = self.write();
        let station = stations
            .iter_mut()
            .find(|s| s.id == station_id)
            .ok_or_else(|| StationError::NotFound(station_id.to_string()))?;

        station.petrol_price = petrol_price;
        station.diesel_price = diesel_price;
        Ok(station.clone())
    }

    /// Lowest posted price for `fuel_type`; the nearer station wins a tie
    pub fn cheapest(&self, fuel_type: FuelType) -> Option<FuelStation> {
        self.list()
            .into_iter()
            .filter_map(|s| s.price_for(fuel_type).map(|price| (price, s)))
            .min_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, station)| station)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<FuelStation>> {
        self.stations.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<FuelStation>> {
        self.stations.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{NotificationLevel, RecordingNotifier};

    fn directory() -> (StationDirectory, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        (StationDirectory::with_defaults(notifier.clone()), notifier)
    }

    #[test]
    fn test_list_is_sorted_by_distance() {
        let (dir, _) = directory();
        let stations = dir.list();

        assert_eq!(stations.len(), 5);
        assert!(stations.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
        assert_eq!(stations[0].location, "MVP colony, Visakhapatnam");
    }

    #[test]
    fn test_update_prices() {
        let (dir, notifier) = directory();

        let updated = dir
            .update_prices("station2", Decimal::new(10199, 2), Decimal::new(9599, 2))
            .unwrap();
        assert_eq!(updated.petrol_price, Decimal::new(10199, 2));
        assert_eq!(dir.get("station2").unwrap(), updated);

        let last = notifier.last().unwrap();
        assert_eq!(last.level, NotificationLevel::Success);
        assert_eq!(last.message, "Fuel prices updated successfully");
    }

    #[test]
    fn test_update_rejects_non_positive_price() {
        let (dir, notifier) = directory();
        let before = dir.get("station1").unwrap();

        let err = dir
            .update_prices("station1", Decimal::ZERO, Decimal::new(9625, 2))
            .unwrap_err();
        assert!(matches!(err, StationError::InvalidPrice { .. }));
        assert_eq!(dir.get("station1").unwrap(), before);
        assert_eq!(notifier.last().unwrap().level, NotificationLevel::Error);
    }

    #[test]
    fn test_update_unknown_station() {
        let (dir, _) = directory();
        let err = dir
            .update_prices("station9", Decimal::ONE, Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, StationError::NotFound(id) if id == "station9"));
    }

    #[test]
    fn test_cheapest() {
        let (dir, _) = directory();

        assert_eq!(dir.cheapest(FuelType::Petrol).unwrap().id, "station3");
        assert_eq!(dir.cheapest(FuelType::Diesel).unwrap().id, "station3");
        assert!(dir.cheapest(FuelType::Premium).is_none());

        dir.update_prices("station5", Decimal::new(10245, 2), Decimal::new(9500, 2))
            .unwrap();
        // same petrol price as station3, but further away
        assert_eq!(dir.cheapest(FuelType::Petrol).unwrap().id, "station3");
        assert_eq!(dir.cheapest(FuelType::Diesel).unwrap().id, "station5");
    }

    #[test]
    fn test_station_price_table() {
        let (dir, _) = directory();
        let table = dir.get("station2").unwrap().price_table();

        assert_eq!(table.price_per_liter(FuelType::Diesel), Decimal::new(9640, 2));
        assert_eq!(table.price_per_liter(FuelType::Premium), Decimal::new(10265, 2));
    }
}
