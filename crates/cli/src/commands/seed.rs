//! Seed the store database with baseline data.
//!
//! Idempotent: every insert is keyed on a natural unique column with
//! `ON CONFLICT DO NOTHING`, so re-running the command is safe.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Seed shipping methods, a welcome coupon and a first live stream.
///
/// # Errors
///
/// Returns `SeedError` if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .map_err(|_| SeedError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    let pool = PgPool::connect(&database_url).await?;

    seed_shipping_methods(&pool).await?;
    seed_coupons(&pool).await?;
    seed_live_stream(&pool).await?;

    tracing::info!("Seeding complete");
    Ok(())
}

async fn seed_shipping_methods(pool: &PgPool) -> Result<(), SeedError> {
    // name is not unique in the schema; guard on it manually.
    let methods: &[(&str, Decimal, &str)] = &[
        ("Standard", Decimal::new(490, 2), "3-5 business days"),
        ("Express", Decimal::new(990, 2), "1-2 business days"),
        ("Pickup point", Decimal::new(290, 2), "4-6 business days"),
    ];

    for (name, price, window) in methods {
        sqlx::query(
            r"
            INSERT INTO storefront.shipping_method (name, price, delivery_window)
            SELECT $1, $2, $3
            WHERE NOT EXISTS (
                SELECT 1 FROM storefront.shipping_method WHERE name = $1
            )
            ",
        )
        .bind(name)
        .bind(price)
        .bind(window)
        .execute(pool)
        .await?;
    }

    tracing::info!("Shipping methods seeded");
    Ok(())
}

async fn seed_coupons(pool: &PgPool) -> Result<(), SeedError> {
    sqlx::query(
        r"
        INSERT INTO storefront.coupon (code, kind, value, min_order_total)
        VALUES ('WELCOME10', 'percent', 10, 30)
        ON CONFLICT (code) DO NOTHING
        ",
    )
    .execute(pool)
    .await?;

    tracing::info!("Coupons seeded");
    Ok(())
}

async fn seed_live_stream(pool: &PgPool) -> Result<(), SeedError> {
    sqlx::query(
        r"
        INSERT INTO storefront.live_stream (title, host_name, starts_at, ends_at, goal_units)
        SELECT 'Atelier preview', 'Camille', NOW() + INTERVAL '7 days',
               NOW() + INTERVAL '7 days 1 hour', 40
        WHERE NOT EXISTS (
            SELECT 1 FROM storefront.live_stream WHERE title = 'Atelier preview'
        )
        ",
    )
    .execute(pool)
    .await?;

    tracing::info!("Live stream seeded");
    Ok(())
}
