//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go into a separate
//! module. Keep this module neat and tidy 🙏
//!
//! Handlers are generic over the storage backend, and actix-web cannot register generic handlers directly, so each
//! route is wrapped in a small unit struct via the `route!` macro and registered through `HttpServiceFactory`.

use actix_web::{get, web, HttpResponse, Responder};
use log::*;
use serde_json::json;
use settlement_engine::{
    db_types::OrderNumber,
    CouponApi,
    CouponApiError,
    CouponStore,
    NewSettlement,
    SettlementApi,
    SettlementDatabase,
};

use crate::{
    config::ServerConfig,
    data_objects::{
        CouponValidationRequest,
        CouponValidationSuccess,
        JsonFailure,
        OrderView,
        PaymentVerificationRequest,
        SettlementSuccess,
    },
    errors::ServerError,
    verification::verify_gateway_signature,
};

#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal) => {
        paste::paste! { pub struct [<$name:camel Route>];}
        paste::paste! {
            impl [<$name:camel Route>] {
                #[allow(clippy::new_without_default)]
                pub fn new() -> Self { Self }
            }
        }
        paste::paste! {
            impl actix_web::dev::HttpServiceFactory for [<$name:camel Route>] {
                fn register(self, config: &mut actix_web::dev::AppService) {
                    let res = actix_web::Resource::new($path)
                        .name(stringify!($name))
                        .guard(actix_web::guard::$method())
                        .to($name);
                    actix_web::dev::HttpServiceFactory::register(res, config);
                }
            }
        }
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

//----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({"status": "running"}))
}

//----------------------------------------------   Checkout  ----------------------------------------------------

route!(verify_payment => Post "/checkout/verify" impl SettlementDatabase);
/// The payment verification endpoint. The gateway signature is re-checked on every call; a request that fails the
/// gate is rejected outright and never reaches settlement. On success the caller receives the full list of order
/// numbers — one per vendor in the cart — or, for a duplicate callback, the original list again.
pub async fn verify_payment<B: SettlementDatabase>(
    body: web::Json<PaymentVerificationRequest>,
    api: web::Data<SettlementApi<B>>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    trace!("🔐️ Verification request for gateway payment [{}]", request.gateway_payment_id);
    verify_gateway_signature(
        config.gateway.secret.reveal(),
        &request.gateway_order_id,
        &request.gateway_payment_id,
        &request.signature,
    )?;
    debug!("🔐️ Gateway payment [{}] authenticated. Proceeding to settlement.", request.gateway_payment_id);
    let receipt = api.settle(NewSettlement::from(request)).await?;
    Ok(HttpResponse::Ok().json(SettlementSuccess::new(receipt.order_numbers)))
}

//----------------------------------------------   Coupons  ----------------------------------------------------

route!(validate_coupon => Post "/coupons/validate" impl CouponStore);
/// Coupon pre-validation for the storefront. Rule rejections are structured validation failures, not errors: the
/// response is a 200 with `success: false` and the reason. Only a backend fault produces a 5xx.
pub async fn validate_coupon<B: CouponStore>(
    body: web::Json<CouponValidationRequest>,
    api: web::Data<CouponApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let request = body.into_inner();
    match api.validate(&request.code, &request.user_id, request.order_total).await {
        Ok(check) => Ok(HttpResponse::Ok().json(CouponValidationSuccess {
            success: true,
            coupon: check.coupon.into(),
            discount_amount: check.discount,
        })),
        Err(CouponApiError::Rejected(e)) => {
            debug!("🎟️ Coupon [{}] rejected for {}: {e}", request.code, request.user_id);
            Ok(HttpResponse::Ok().json(JsonFailure::new(e)))
        },
        Err(CouponApiError::Database(e)) => Err(ServerError::StoreUnavailable(e)),
    }
}

//----------------------------------------------   Orders  ----------------------------------------------------

route!(order_by_number => Get "/orders/{order_number}" impl SettlementDatabase);
/// Read-only view of a settled order: the order row, its line items, and the append-only activity log.
pub async fn order_by_number<B: SettlementDatabase>(
    path: web::Path<String>,
    api: web::Data<SettlementApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let number = OrderNumber::from(path.into_inner());
    let db = api.db();
    let order = db
        .fetch_order_by_number(&number)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Order {number}")))?;
    let items = db.fetch_order_items(order.id).await?;
    let activity = db.fetch_order_activity(order.id).await?;
    Ok(HttpResponse::Ok().json(OrderView { order, items, activity }))
}
