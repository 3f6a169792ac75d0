use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::context::ServiceContext;
use crate::domain::auth::UserId;
use crate::notify::Notification;
use crate::storage::{slots, Collection};

use super::commands::OrderCommand;
use super::errors::OrderError;
use super::fuel_order::FuelOrder;
use super::payment::PaymentDetails;
use super::pricing::{PriceQuote, PriceTable};
use super::value_objects::{FuelType, OrderId, OrderStatus, PaymentMethod, TransitionPolicy};

// ============================================================================
// Order Service
// ============================================================================
//
// Orchestrates: load collection → ownership check → command → save collection
//
// Every operation reports its outcome to the notifier before returning, and
// read-modify-write cycles are serialized by `write_lock` within this process.
//
// ============================================================================

/// Input for `create_order`
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub fuel_type: FuelType,
    pub quantity: Decimal,
    pub delivery_address: String,
    pub payment_method: Option<PaymentMethod>,
}

pub struct OrderService {
    ctx: ServiceContext,
    orders: Collection<FuelOrder>,
    prices: PriceTable,
    policy: TransitionPolicy,
    write_lock: Mutex<()>,
}

impl OrderService {
    pub fn new(ctx: ServiceContext) -> Self {
        let orders = Collection::new(ctx.store.clone(), slots::FUEL_ORDERS);
        Self {
            ctx,
            orders,
            prices: PriceTable::default(),
            policy: TransitionPolicy::default(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_price_table(mut self, prices: PriceTable) -> Self {
        self.prices = prices;
        self
    }

    pub fn with_transition_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn price_table(&self) -> &PriceTable {
        &self.prices
    }

    /// Price an order without placing it
    pub fn quote(&self, fuel_type: FuelType, quantity: Decimal) -> Result<PriceQuote, OrderError> {
        validate_quantity(quantity)?;
        self.prices.quote(fuel_type, quantity)
    }

    #[instrument(
        skip_all,
        fields(user_id = %request.user_id, fuel_type = %request.fuel_type, quantity = %request.quantity)
    )]
    pub async fn create_order(&self, request: NewOrder) -> Result<FuelOrder, OrderError> {
        self.ctx.simulate_latency().await;

        let result = self.place_order(request).await;
        if let Ok(order) = &result {
            self.ctx.metrics.record_order_created(order.fuel_type.as_str());
            tracing::info!(
                order_id = %order.id,
                total_price = %order.total_price,
                payment_status = %order.payment_status,
                "✅ Order placed"
            );
        }
        self.report(result, "Order placed successfully")
    }

    async fn place_order(&self, request: NewOrder) -> Result<FuelOrder, OrderError> {
        if request.user_id.as_str().trim().is_empty() {
            return Err(OrderError::Validation("A signed-in user is required".to_string()));
        }
        validate_quantity(request.quantity)?;

        let delivery_address = request.delivery_address.trim();
        if delivery_address.is_empty() {
            return Err(OrderError::Validation(
                "Please enter a delivery address".to_string(),
            ));
        }

        let total_price = self.prices.total_for(request.fuel_type, request.quantity)?;
        let order = FuelOrder::place(
            request.user_id,
            request.fuel_type,
            request.quantity,
            total_price,
            delivery_address.to_string(),
            request.payment_method,
            Utc::now(),
        );

        let _guard = self.write_lock.lock().await;
        let mut orders = self.orders.load().await.map_err(OrderError::Creation)?;
        orders.push(order.clone());
        self.orders.save(&orders).await.map_err(OrderError::Creation)?;

        Ok(order)
    }

    /// Orders owned by `user_id`, newest first
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn get_user_orders(&self, user_id: &UserId) -> Result<Vec<FuelOrder>, OrderError> {
        self.ctx.simulate_latency().await;

        let result = self.orders.load().await.map_err(OrderError::Fetch).map(|orders| {
            let mut owned: Vec<FuelOrder> =
                orders.into_iter().filter(|o| o.is_owned_by(user_id)).collect();
            owned.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
            owned
        });

        match result {
            Ok(orders) => {
                tracing::debug!(count = orders.len(), "Fetched user orders");
                Ok(orders)
            }
            Err(e) => self.fail(e),
        }
    }

    /// A single order, if the caller owns it
    #[instrument(skip_all, fields(order_id = %order_id, user_id = %user_id))]
    pub async fn get_order(&self, order_id: &OrderId, user_id: &UserId) -> Result<FuelOrder, OrderError> {
        self.ctx.simulate_latency().await;

        let result = async {
            let orders = self.orders.load().await.map_err(OrderError::Fetch)?;
            let order = orders
                .into_iter()
                .find(|o| o.id == *order_id)
                .ok_or_else(|| OrderError::NotFound(order_id.clone()))?;
            ensure_owner(&order, user_id)?;
            Ok::<_, OrderError>(order)
        }
        .await;

        match result {
            Ok(order) => Ok(order),
            Err(e) => self.fail(e),
        }
    }

    #[instrument(skip_all, fields(order_id = %order_id, user_id = %user_id, status = %status))]
    pub async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
        user_id: &UserId,
    ) -> Result<FuelOrder, OrderError> {
        self.ctx.simulate_latency().await;

        let result = self
            .apply_command(order_id, user_id, OrderCommand::UpdateStatus { status })
            .await;
        if result.is_ok() {
            self.ctx.metrics.record_status_update(status.as_str());
        }
        result
    }

    pub async fn cancel_order(&self, order_id: &OrderId, user_id: &UserId) -> Result<FuelOrder, OrderError> {
        self.update_order_status(order_id, OrderStatus::Cancelled, user_id).await
    }

    #[instrument(skip_all, fields(order_id = %order_id, user_id = %user_id, method = %method))]
    pub async fn pay_for_order(
        &self,
        order_id: &OrderId,
        user_id: &UserId,
        method: PaymentMethod,
    ) -> Result<FuelOrder, OrderError> {
        self.ctx.simulate_latency().await;

        let result = self
            .apply_command(order_id, user_id, OrderCommand::Pay { method })
            .await;
        if let Ok(order) = &result {
            self.ctx
                .metrics
                .record_payment(method.as_str(), order.payment_status.as_str());
        }
        result
    }

    /// Check the submitted payment form, then pay with its method
    pub async fn pay_with_details(
        &self,
        order_id: &OrderId,
        user_id: &UserId,
        details: &PaymentDetails,
    ) -> Result<FuelOrder, OrderError> {
        if let Err(e) = details.validate() {
            return self.fail(e);
        }
        self.pay_for_order(order_id, user_id, details.method()).await
    }

    async fn apply_command(
        &self,
        order_id: &OrderId,
        user_id: &UserId,
        command: OrderCommand,
    ) -> Result<FuelOrder, OrderError> {
        let result = async {
            let _guard = self.write_lock.lock().await;
            let mut orders = self
                .orders
                .load()
                .await
                .map_err(|e| command.storage_error(e))?;

            let order = orders
                .iter_mut()
                .find(|o| o.id == *order_id)
                .ok_or_else(|| OrderError::NotFound(order_id.clone()))?;
            ensure_owner(order, user_id)?;

            order.handle_command(&command, self.policy, Utc::now())?;
            let updated = order.clone();

            self.orders
                .save(&orders)
                .await
                .map_err(|e| command.storage_error(e))?;

            tracing::info!(
                status = %updated.status,
                payment_status = %updated.payment_status,
                "✅ Order updated"
            );
            Ok::<_, OrderError>(updated)
        }
        .await;

        self.report(result, command.success_message())
    }

    fn report<T>(&self, result: Result<T, OrderError>, success: &str) -> Result<T, OrderError> {
        match result {
            Ok(value) => {
                self.ctx.notifier.notify(Notification::success(success));
                Ok(value)
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail<T>(&self, error: OrderError) -> Result<T, OrderError> {
        tracing::warn!(error = %error, kind = error.kind(), "Order operation failed");
        self.ctx.metrics.record_error("order", error.kind());
        self.ctx.notifier.notify(Notification::error(error.to_string()));
        Err(error)
    }
}

fn validate_quantity(quantity: Decimal) -> Result<(), OrderError> {
    if quantity <= Decimal::ZERO {
        return Err(OrderError::Validation(format!(
            "Quantity must be positive, got {quantity}"
        )));
    }
    Ok(())
}

fn ensure_owner(order: &FuelOrder, user_id: &UserId) -> Result<(), OrderError> {
    if !order.is_owned_by(user_id) {
        return Err(OrderError::Unauthorized {
            order_id: order.id.clone(),
        });
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
