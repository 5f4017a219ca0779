use crate::{
    db_types::{CartItem, NewProduct, Product},
    traits::SettlementError,
};

/// The minimal product and cart storage the settlement pipeline relies on.
///
/// Product CRUD proper lives outside this system; the engine only needs enough of the catalog to decrement stock at
/// commit time and to manage the server-side cart that the commit clears.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement: Clone {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, SettlementError>;

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, SettlementError>;

    async fn add_cart_item(&self, user_id: &str, item: CartItem) -> Result<(), SettlementError>;

    async fn fetch_cart_items(&self, user_id: &str) -> Result<Vec<CartItem>, SettlementError>;
}
