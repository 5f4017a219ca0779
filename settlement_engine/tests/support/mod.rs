//! Shared test scaffolding: a fresh migrated SQLite database per test, plus builders for carts and settlements.
#![allow(dead_code)]

use std::path::Path;

use chrono::{Duration, Utc};
use log::*;
use settlement_engine::{
    db_types::{CartItem, DeliveryOption, DiscountType, Money, NewCoupon, NewProduct, Product, ShippingAddress},
    fees::FeeSchedule,
    NewSettlement,
    SqliteDatabase,
};
use sqlx::{migrate, migrate::MigrateDatabase, Sqlite};

pub async fn prepare_test_env(url: &str) {
    let _ = env_logger::try_init();
    create_database(url).await;
    run_migrations(url).await;
}

pub fn random_db_path() -> String {
    format!("sqlite://{}/osg_test_store_{}.db", std::env::temp_dir().display(), rand::random::<u64>())
}

pub async fn run_migrations(url: &str) {
    let db = SqliteDatabase::new_with_url(url, 5).await.expect("Error creating connection to database");
    migrate!("./src/sqlite/migrations").run(db.pool()).await.expect("Error running DB migrations");
    info!("🚀️ Migrations complete");
}

pub async fn create_database<P: AsRef<Path>>(path: P) {
    let p = path.as_ref().as_os_str().to_str().unwrap();
    if let Err(e) = Sqlite::drop_database(p).await {
        warn!("Error dropping database {p}: {e:?}");
    }
    Sqlite::create_database(p).await.expect("Error creating database");
    info!("Created Sqlite database {p}");
}

/// A fresh database at a random path, migrated and ready.
pub async fn new_test_db() -> SqliteDatabase {
    let url = random_db_path();
    prepare_test_env(&url).await;
    SqliteDatabase::new_with_url(&url, 8).await.expect("Error creating database")
}

pub fn test_schedule() -> FeeSchedule {
    FeeSchedule {
        free_shipping_threshold: Money::from_whole(1000),
        flat_delivery_fee: Money::from_whole(40),
        service_fee_bps: 500,
        processing_fee_bps: 200,
    }
}

pub fn cart_item_for(product: &Product, quantity: i64) -> CartItem {
    CartItem {
        product_id: product.id,
        name: product.name.clone(),
        price: product.price,
        stock_at_add: product.stock,
        quantity,
        vendor_id: product.vendor_id.clone(),
        images: vec![],
    }
}

pub fn address() -> ShippingAddress {
    ShippingAddress {
        name: "Thandi M".to_string(),
        line1: "12 Harbour Lane".to_string(),
        line2: None,
        city: "Cape Town".to_string(),
        state: None,
        postal_code: "8001".to_string(),
        country: "ZA".to_string(),
        phone: Some("+27 21 555 0100".to_string()),
    }
}

pub fn new_settlement(customer_id: &str, payment_id: &str, items: Vec<CartItem>) -> NewSettlement {
    NewSettlement {
        customer_id: customer_id.to_string(),
        gateway_order_id: format!("gw_ord_{payment_id}"),
        gateway_payment_id: payment_id.to_string(),
        cart_items: items,
        shipping_address: address(),
        delivery_option: DeliveryOption::Delivery,
        payment_method: "card".to_string(),
        phone_number: "+27 21 555 0100".to_string(),
        email: "thandi@example.com".to_string(),
        coupon_code: None,
    }
}

pub fn percent_coupon(code: &str, percent: i64, usage_limit: i64) -> NewCoupon {
    let now = Utc::now();
    NewCoupon {
        code: code.to_string(),
        discount_type: DiscountType::Percentage,
        discount_value: percent,
        max_discount: None,
        min_order_amount: Money::default(),
        valid_from: now - Duration::days(1),
        valid_until: now + Duration::days(30),
        usage_limit,
        restricted_to: None,
        is_active: true,
    }
}

pub async fn seed_product(db: &SqliteDatabase, vendor: &str, name: &str, price: Money, stock: i64) -> Product {
    use settlement_engine::CatalogManagement;
    db.insert_product(NewProduct { vendor_id: vendor.to_string(), name: name.to_string(), price, stock })
        .await
        .expect("Error seeding product")
}
