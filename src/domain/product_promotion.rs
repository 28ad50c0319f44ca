use serde::{Deserialize, Serialize};

/// Payload required to link a product to a promotion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NewProductPromotion {
    /// Identifier of the product joining the promotion.
    pub product_id: i32,
    /// Identifier of the promotion being applied.
    pub promotion_id: i32,
}

impl NewProductPromotion {
    /// Construct a new association payload between a product and a promotion.
    pub fn new(product_id: i32, promotion_id: i32) -> Self {
        Self {
            product_id,
            promotion_id,
        }
    }
}
