pub mod collection;
pub mod product;
pub mod product_promotion;
pub mod promotion;
