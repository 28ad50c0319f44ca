use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product_promotion::NewProductPromotion as DomainNewProductPromotion;

#[derive(Debug, Clone, Identifiable, Queryable, Associations, Selectable)]
#[diesel(
    table_name = crate::schema::product_promotions,
    belongs_to(super::product::Product, foreign_key = product_id),
    belongs_to(super::promotion::Promotion, foreign_key = promotion_id)
)]
pub struct ProductPromotion {
    pub id: i32,
    pub product_id: i32,
    pub promotion_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::product_promotions)]
pub struct NewProductPromotion {
    pub product_id: i32,
    pub promotion_id: i32,
}

impl From<&DomainNewProductPromotion> for NewProductPromotion {
    fn from(value: &DomainNewProductPromotion) -> Self {
        Self {
            product_id: value.product_id,
            promotion_id: value.promotion_id,
        }
    }
}
