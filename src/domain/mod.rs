pub mod collection;
pub mod pricing;
pub mod product;
pub mod product_promotion;
pub mod promotion;
