use mockall::mock;

use super::{
    CollectionReader, CollectionWriter, ProductReader, ProductWriter, PromotionReader,
    PromotionWriter,
};
use crate::domain::{
    collection::{Collection, CollectionListQuery, NewCollection},
    product::{NewProduct, Product, ProductListQuery},
    promotion::{NewPromotion, Promotion, PromotionApplication, PromotionListQuery},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
    }
}

mock! {
    pub ProductWriter {}

    impl ProductWriter for ProductWriter {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product>;
        fn clear_inventory(&self, hub_id: i32, product_ids: &[i32]) -> RepositoryResult<usize>;
        fn update_product_price(&self, product_id: i32, hub_id: i32, price_cents: i64) -> RepositoryResult<Product>;
    }
}

mock! {
    pub PromotionReader {}

    impl PromotionReader for PromotionReader {
        fn get_promotion_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<Promotion>>;
        fn list_promotions(&self, query: PromotionListQuery) -> RepositoryResult<(usize, Vec<Promotion>)>;
        fn linked_product_ids(&self, promotion_id: i32, product_ids: &[i32]) -> RepositoryResult<Vec<i32>>;
    }
}

mock! {
    pub PromotionWriter {}

    impl PromotionWriter for PromotionWriter {
        fn create_promotion(&self, new_promotion: &NewPromotion) -> RepositoryResult<Promotion>;
        fn delete_promotion(&self, promotion_id: i32, hub_id: i32) -> RepositoryResult<()>;
        fn apply_promotion_to_products(&self, promotion: &Promotion, product_ids: &[i32]) -> RepositoryResult<PromotionApplication>;
    }
}

mock! {
    pub CollectionReader {}

    impl CollectionReader for CollectionReader {
        fn list_collections(&self, query: CollectionListQuery) -> RepositoryResult<Vec<Collection>>;
    }
}

mock! {
    pub CollectionWriter {}

    impl CollectionWriter for CollectionWriter {
        fn create_collection(&self, new_collection: &NewCollection) -> RepositoryResult<Collection>;
    }
}
