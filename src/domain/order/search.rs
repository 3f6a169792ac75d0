use super::fuel_order::FuelOrder;

/// Case-insensitive substring match on fuel type, delivery address or status.
/// A blank query matches everything.
pub fn search_orders<'a>(orders: &'a [FuelOrder], query: &str) -> Vec<&'a FuelOrder> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return orders.iter().collect();
    }

    orders
        .iter()
        .filter(|order| {
            order.fuel_type.as_str().contains(&needle)
                || order.delivery_address.to_lowercase().contains(&needle)
                || order.status.as_str().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::UserId;
    use crate::domain::order::{FuelType, OrderCommand, TransitionPolicy};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn order(fuel_type: FuelType, address: &str) -> FuelOrder {
        FuelOrder::place(
            UserId::from("user-a"),
            fuel_type,
            Decimal::from(5),
            Decimal::from(500),
            address.to_string(),
            None,
            Utc::now(),
        )
    }

    #[test]
    fn test_blank_query_returns_all() {
        let orders = vec![order(FuelType::Petrol, "A"), order(FuelType::Diesel, "B")];
        assert_eq!(search_orders(&orders, "   ").len(), 2);
    }

    #[test]
    fn test_matches_each_field() {
        let mut cancelled = order(FuelType::Petrol, "Endada");
        cancelled
            .handle_command(
                &OrderCommand::UpdateStatus {
                    status: crate::domain::order::OrderStatus::Cancelled,
                },
                TransitionPolicy::Strict,
                Utc::now(),
            )
            .unwrap();

        let orders = vec![
            order(FuelType::Diesel, "MVP Colony, Visakhapatnam"),
            cancelled,
        ];

        assert_eq!(search_orders(&orders, "DIESEL").len(), 1);
        assert_eq!(search_orders(&orders, "mvp colony").len(), 1);
        assert_eq!(search_orders(&orders, "cancel")[0].delivery_address, "Endada");
        assert!(search_orders(&orders, "premium").is_empty());
    }
}
