//! Order Settlement Engine
//!
//! The settlement engine turns a verified payment and a multi-vendor shopping cart into durable, uniquely numbered
//! order records. This library contains the core logic of the pipeline and is HTTP-framework agnostic.
//!
//! The library is divided into three main sections:
//! 1. Pure settlement arithmetic: the fee engine ([`mod@fees`]), the coupon rules ([`mod@coupons`]) and the order
//!    splitter ([`mod@splitter`]). These are deterministic functions with no I/O, so the money math is reproducible
//!    to the cent for audit and dispute purposes.
//! 2. Database management and control behind the traits in [`mod@traits`]. SQLite is the supported backend. You
//!    should never need to access the database directly; use the public API instead. The exception is the data types
//!    used in the database, which are defined in the `db_types` module and are public.
//! 3. The settlement public API ([`mod@api`]): [`SettlementApi`] drives the whole pipeline (split, price, allocate,
//!    commit, emit), and [`CouponApi`] exposes coupon validation on its own.
//!
//! The engine also provides a set of events that can be subscribed to. When a settlement commits, an
//! `OrderCreated` event is emitted for every order in the commit. A simple actor framework is used so that you can
//! hook into these events and perform custom actions; hook failures never propagate back into the settlement.
mod api;

pub mod coupons;
pub mod db_types;
pub mod events;
pub mod fees;
pub mod helpers;
pub mod splitter;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use api::{
    errors::CouponApiError,
    settlement_objects::{NewSettlement, SettlementReceipt},
    CouponApi,
    CouponCheck,
    SettlementApi,
};
pub use traits::{CatalogManagement, CouponStore, OrderManagement, SequenceAllocation, SettlementDatabase, SettlementError};
