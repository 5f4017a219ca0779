use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::info;
use settlement_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    CouponApi,
    SettlementApi,
    SqliteDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    hooks::notify_order_created,
    routes::{health, OrderByNumberRoute, ValidateCouponRoute, VerifyPaymentRoute},
};

const EVENT_BUFFER_SIZE: usize = 64;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let producers = start_side_effect_handlers(db.clone()).await;
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Wires the side-effect emitter: one notification record and one activity entry per created order, each emission
/// independent and best-effort.
pub async fn start_side_effect_handlers(db: SqliteDatabase) -> EventProducers {
    let mut hooks = EventHooks::default();
    hooks.on_order_created(move |event| notify_order_created(db.clone(), event));
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, hooks);
    let producers = handlers.producers();
    handlers.start_handlers().await;
    info!("📬️ Side-effect handlers started");
    producers
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let bind_address = (config.host.clone(), config.port);
    let srv = HttpServer::new(move || {
        let settlement_api = SettlementApi::new(db.clone(), config.fees, producers.clone());
        let coupon_api = CouponApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("osg::access_log"))
            .app_data(web::Data::new(settlement_api))
            .app_data(web::Data::new(coupon_api))
            .app_data(web::Data::new(config.clone()))
            .service(health)
            .service(VerifyPaymentRoute::<SqliteDatabase>::new())
            .service(ValidateCouponRoute::<SqliteDatabase>::new())
            .service(OrderByNumberRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind(bind_address)?
    .run();
    Ok(srv)
}
