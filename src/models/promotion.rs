use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::promotion::{NewPromotion as DomainNewPromotion, Promotion as DomainPromotion};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::promotions)]
pub struct Promotion {
    pub id: i32,
    pub hub_id: i32,
    pub description: String,
    pub discount_bps: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::promotions)]
pub struct NewPromotion<'a> {
    pub hub_id: i32,
    pub description: &'a str,
    pub discount_bps: i32,
}

impl From<Promotion> for DomainPromotion {
    fn from(value: Promotion) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            description: value.description,
            discount_bps: value.discount_bps,
            product_count: 0,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewPromotion> for NewPromotion<'a> {
    fn from(value: &'a DomainNewPromotion) -> Self {
        Self {
            hub_id: value.hub_id,
            description: value.description.as_str(),
            discount_bps: value.discount_bps,
        }
    }
}
