//! Catalog administration for a hub: products, collections and promotions,
//! including the bulk "add products to a promotion" action.

pub mod domain;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

pub const SERVICE_ACCESS_ROLE: &str = "admin";
