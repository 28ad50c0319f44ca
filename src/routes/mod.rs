pub mod api;
pub mod collections;
pub mod main;
pub mod products;
pub mod promotions;
