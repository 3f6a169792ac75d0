use std::sync::Arc;

use rust_decimal::Decimal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fuel_delivery::domain::auth::{AuthError, AuthService, User};
use fuel_delivery::domain::order::{
    search_orders, CardDetails, FuelType, NewOrder, OrderService, PaymentDetails, PaymentMethod,
    TransitionPolicy,
};
use fuel_delivery::domain::station::StationDirectory;
use fuel_delivery::{AppConfig, ServiceContext};

const DEMO_NAME: &str = "Demo Customer";
const DEMO_EMAIL: &str = "demo@fueldelivery.local";
const DEMO_PASSWORD: &str = "demo-password";
const DEMO_ADDRESS: &str = "MVP Colony, Visakhapatnam";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO, debug for this crate; override with RUST_LOG
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,fuel_delivery=debug")),
        )
        .init();

    tracing::info!("🚀 Starting fuel delivery demo");

    // === 1. Configuration and shared context ===
    let config = AppConfig::from_env()?;
    let ctx = ServiceContext::from_config(&config).await?;

    let auth = AuthService::new(ctx.clone());
    let orders = OrderService::new(ctx.clone()).with_transition_policy(
        TransitionPolicy::from_enforcement(config.enforce_status_transitions),
    );
    let stations = StationDirectory::with_defaults(Arc::clone(&ctx.notifier));

    // === 2. Session ===
    let user = match auth.restore_session().await {
        Some(user) => user,
        None => sign_in(&auth).await?,
    };
    tracing::info!(user_id = %user.id, name = %user.name, "👤 Signed in");

    // === 3. Nearby stations ===
    for station in stations.list() {
        tracing::info!(
            name = %station.name,
            location = %station.location,
            distance_km = station.distance_km,
            petrol = %station.petrol_price,
            diesel = %station.diesel_price,
            "⛽ Station"
        );
    }
    if let Some(station) = stations.cheapest(FuelType::Diesel) {
        tracing::info!(name = %station.name, price = %station.diesel_price, "Cheapest diesel");
    }

    // === 4. Orders ===
    let quote = orders.quote(FuelType::Petrol, Decimal::from(10))?;
    tracing::info!(
        price_per_liter = %quote.price_per_liter,
        total = %quote.total_price,
        "💰 Quote for 10 L petrol"
    );

    let petrol = orders
        .create_order(new_order(&user, FuelType::Petrol, Decimal::from(10), None))
        .await?;
    let diesel = orders
        .create_order(new_order(
            &user,
            FuelType::Diesel,
            Decimal::new(255, 1),
            Some(PaymentMethod::PhonePe),
        ))
        .await?;
    let premium = orders
        .create_order(new_order(&user, FuelType::Premium, Decimal::from(5), None))
        .await?;

    let card = CardDetails {
        card_number: "4111 1111 1111 1111".to_string(),
        card_name: DEMO_NAME.to_string(),
        expiry: "12/30".to_string(),
        cvv: "123".to_string(),
    };
    orders
        .pay_with_details(&petrol.id, &user.id, &PaymentDetails::CreditCard(card))
        .await?;
    orders.cancel_order(&premium.id, &user.id).await?;

    // Paying a cancelled order is refused under the default policy
    if let Err(e) = orders
        .pay_for_order(&premium.id, &user.id, PaymentMethod::CashOnDelivery)
        .await
    {
        tracing::info!(error = %e, "Payment on cancelled order refused");
    }

    // === 5. History ===
    let history = orders.get_user_orders(&user.id).await?;
    for order in &history {
        tracing::info!(
            order_id = %order.id,
            fuel_type = %order.fuel_type,
            quantity = %order.quantity,
            total = %order.total_price,
            status = %order.status,
            payment_status = %order.payment_status,
            actions = ?order.available_actions(),
            "📦 Order"
        );
    }
    let matches = search_orders(&history, "diesel");
    tracing::info!(count = matches.len(), first = ?matches.first().map(|o| &o.id), "🔎 Search 'diesel'");
    tracing::debug!(order_id = %diesel.id, "Diesel order was paid upfront");

    // === 6. Metrics ===
    println!("{}", ctx.metrics.render()?);

    tracing::info!("🎉 Demo complete!");
    Ok(())
}

async fn sign_in(auth: &AuthService) -> Result<User, AuthError> {
    match auth.signup(DEMO_NAME, DEMO_EMAIL, DEMO_PASSWORD).await {
        Err(AuthError::DuplicateEmail(_)) => auth.login(DEMO_EMAIL, DEMO_PASSWORD).await,
        other => other,
    }
}

fn new_order(
    user: &User,
    fuel_type: FuelType,
    quantity: Decimal,
    payment_method: Option<PaymentMethod>,
) -> NewOrder {
    NewOrder {
        user_id: user.id.clone(),
        fuel_type,
        quantity,
        delivery_address: DEMO_ADDRESS.to_string(),
        payment_method,
    }
}
