use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::product::{
        HIGH_INVENTORY_THRESHOLD, InventoryFilter, LOW_INVENTORY_THRESHOLD,
        NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
    },
    models::product::{NewProduct as DbNewProduct, Product as DbProduct},
    models::product_promotion::ProductPromotion as DbProductPromotion,
    repository::{DieselRepository, ProductReader, ProductWriter},
    schema::products,
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32, hub_id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .filter(products::hub_id.eq(hub_id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        if let Some(db_product) = product {
            let mut domain: DomainProduct = db_product.into();
            let mut promotions = load_promotion_ids_for_products(&mut conn, &[domain.id])?;
            domain.promotion_ids = promotions.remove(&domain.id).unwrap_or_default();
            Ok(Some(domain))
        } else {
            Ok(None)
        }
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        let mut conn = self.conn()?;

        let total = filtered_products(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_products(&query)
            .order((products::is_archived.asc(), products::name.asc(), products::id.asc()));

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;

        if db_products.is_empty() {
            return Ok((total, Vec::new()));
        }

        let product_ids: Vec<i32> = db_products.iter().map(|product| product.id).collect();
        let mut promotion_map = load_promotion_ids_for_products(&mut conn, &product_ids)?;

        let mut domain_products = Vec::with_capacity(db_products.len());
        for db_product in db_products {
            let mut domain: DomainProduct = db_product.into();
            domain.promotion_ids = promotion_map.remove(&domain.id).unwrap_or_default();
            domain_products.push(domain);
        }

        Ok((total, domain_products))
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;
        let db_new = DbNewProduct::from(new_product);

        let created = diesel::insert_into(products::table)
            .values(&db_new)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(created.into())
    }

    fn clear_inventory(&self, hub_id: i32, product_ids: &[i32]) -> RepositoryResult<usize> {
        if product_ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;

        let target = products::table
            .filter(products::hub_id.eq(hub_id))
            .filter(products::id.eq_any(product_ids));

        let updated = diesel::update(target)
            .set((
                products::inventory.eq(0),
                products::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(updated)
    }

    fn update_product_price(
        &self,
        product_id: i32,
        hub_id: i32,
        price_cents: i64,
    ) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;

        let target = products::table
            .filter(products::id.eq(product_id))
            .filter(products::hub_id.eq(hub_id));

        let updated = diesel::update(target)
            .set((
                products::price_cents.eq(price_cents),
                products::updated_at.eq(Utc::now().naive_utc()),
            ))
            .get_result::<DbProduct>(&mut conn)
            .optional()?
            .ok_or(RepositoryError::NotFound)?;

        let mut domain: DomainProduct = updated.into();
        domain.promotion_ids = load_promotion_ids_for_products(&mut conn, &[domain.id])?
            .remove(&domain.id)
            .unwrap_or_default();

        Ok(domain)
    }
}

fn filtered_products(query: &ProductListQuery) -> products::BoxedQuery<'static, Sqlite> {
    let mut items = products::table
        .filter(products::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if !query.include_archived {
        items = items.filter(products::is_archived.eq(false));
    }

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        items = items.filter(
            products::name
                .like(pattern.clone())
                .or(products::description.like(pattern)),
        );
    }

    match query.inventory {
        Some(InventoryFilter::Low) => {
            items = items.filter(products::inventory.lt(LOW_INVENTORY_THRESHOLD));
        }
        Some(InventoryFilter::High) => {
            items = items.filter(products::inventory.ge(HIGH_INVENTORY_THRESHOLD));
        }
        None => {}
    }

    if let Some(collection_id) = query.collection_id {
        items = items.filter(products::collection_id.eq(collection_id));
    }

    if let Some(ids) = query.ids.as_ref() {
        items = items.filter(products::id.eq_any(ids.clone()));
    }

    items
}

fn load_promotion_ids_for_products(
    conn: &mut SqliteConnection,
    product_ids: &[i32],
) -> RepositoryResult<HashMap<i32, Vec<i32>>> {
    use crate::schema::product_promotions;

    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = product_promotions::table
        .filter(product_promotions::product_id.eq_any(product_ids))
        .order(product_promotions::created_at.asc())
        .load::<DbProductPromotion>(conn)?;

    let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
    for row in rows {
        map.entry(row.product_id).or_default().push(row.promotion_id);
    }

    Ok(map)
}
