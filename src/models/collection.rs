use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::collection::{
    Collection as DomainCollection, NewCollection as DomainNewCollection,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::collections)]
pub struct Collection {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub featured_product_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::collections)]
pub struct NewCollection<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub featured_product_id: Option<i32>,
}

impl From<Collection> for DomainCollection {
    fn from(value: Collection) -> Self {
        Self {
            id: value.id,
            hub_id: value.hub_id,
            name: value.name,
            featured_product_id: value.featured_product_id,
            product_count: 0,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCollection> for NewCollection<'a> {
    fn from(value: &'a DomainNewCollection) -> Self {
        Self {
            hub_id: value.hub_id,
            name: value.name.as_str(),
            featured_product_id: value.featured_product_id,
        }
    }
}
