use pushkind_common::db::{DbConnection, DbPool};
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::{
    collection::{Collection, CollectionListQuery, NewCollection},
    product::{NewProduct, Product, ProductListQuery},
    promotion::{NewPromotion, Promotion, PromotionApplication, PromotionListQuery},
};

pub mod collection;
pub mod product;
pub mod promotion;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over product records.
pub trait ProductReader {
    fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
    fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
}

/// Write operations over product records.
pub trait ProductWriter {
    fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
    /// Reset the stock of the selected products to zero with a single update.
    fn clear_inventory(&self, hub_id: i32, product_ids: &[i32]) -> RepositoryResult<usize>;
    /// Overwrite the unit price of a single product of the hub.
    fn update_product_price(
        &self,
        product_id: i32,
        hub_id: i32,
        price_cents: i64,
    ) -> RepositoryResult<Product>;
}

/// Read-only operations over promotion records.
pub trait PromotionReader {
    fn get_promotion_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Promotion>>;
    fn list_promotions(
        &self,
        query: PromotionListQuery,
    ) -> RepositoryResult<(usize, Vec<Promotion>)>;
    /// Subset of `product_ids` already linked to the promotion.
    fn linked_product_ids(
        &self,
        promotion_id: i32,
        product_ids: &[i32],
    ) -> RepositoryResult<Vec<i32>>;
}

/// Write operations over promotion records.
pub trait PromotionWriter {
    fn create_promotion(&self, new_promotion: &NewPromotion) -> RepositoryResult<Promotion>;
    fn delete_promotion(&self, promotion_id: i32, hub_id: i32) -> RepositoryResult<()>;
    /// Link the selected products to `promotion` and discount the newly linked
    /// ones, atomically. Products already on the promotion are left untouched.
    fn apply_promotion_to_products(
        &self,
        promotion: &Promotion,
        product_ids: &[i32],
    ) -> RepositoryResult<PromotionApplication>;
}

/// Read-only operations over collection records.
pub trait CollectionReader {
    fn list_collections(&self, query: CollectionListQuery) -> RepositoryResult<Vec<Collection>>;
}

/// Write operations over collection records.
pub trait CollectionWriter {
    fn create_collection(&self, new_collection: &NewCollection) -> RepositoryResult<Collection>;
}
