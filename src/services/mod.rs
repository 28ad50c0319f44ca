pub use pushkind_common::services::errors::{ServiceError, ServiceResult};

pub mod collections;
pub mod products;
pub mod promotions;
