use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::Utc;
use diesel::dsl::{count_star, sql};
use diesel::expression::SqlLiteral;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::pricing::BASIS_POINTS,
    domain::product_promotion::NewProductPromotion as DomainNewProductPromotion,
    domain::promotion::{
        NewPromotion as DomainNewPromotion, Promotion as DomainPromotion, PromotionApplication,
        PromotionListQuery,
    },
    models::product_promotion::NewProductPromotion as DbNewProductPromotion,
    models::promotion::{NewPromotion as DbNewPromotion, Promotion as DbPromotion},
    repository::{DieselRepository, PromotionReader, PromotionWriter},
    schema::{product_promotions, products, promotions},
};

impl PromotionReader for DieselRepository {
    fn get_promotion_by_id(
        &self,
        id: i32,
        hub_id: i32,
    ) -> RepositoryResult<Option<DomainPromotion>> {
        let mut conn = self.conn()?;
        let promotion = promotions::table
            .filter(promotions::id.eq(id))
            .filter(promotions::hub_id.eq(hub_id))
            .first::<DbPromotion>(&mut conn)
            .optional()?;

        let Some(db_promotion) = promotion else {
            return Ok(None);
        };

        let mut domain: DomainPromotion = db_promotion.into();
        let mut counts = count_products_per_promotion(&mut conn, &[domain.id])?;
        domain.product_count = counts.remove(&domain.id).unwrap_or_default();

        Ok(Some(domain))
    }

    fn list_promotions(
        &self,
        query: PromotionListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainPromotion>)> {
        let mut conn = self.conn()?;

        let total = filtered_promotions(&query)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        let mut items = filtered_promotions(&query)
            .order((promotions::description.asc(), promotions::id.asc()));

        if let Some(pagination) = &query.pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_promotions = items.load::<DbPromotion>(&mut conn)?;

        if db_promotions.is_empty() {
            return Ok((total, Vec::new()));
        }

        let ids: Vec<i32> = db_promotions.iter().map(|promotion| promotion.id).collect();
        let mut counts = count_products_per_promotion(&mut conn, &ids)?;

        let promotions = db_promotions
            .into_iter()
            .map(|db_promotion| {
                let mut domain: DomainPromotion = db_promotion.into();
                domain.product_count = counts.remove(&domain.id).unwrap_or_default();
                domain
            })
            .collect();

        Ok((total, promotions))
    }

    fn linked_product_ids(
        &self,
        promotion_id: i32,
        product_ids: &[i32],
    ) -> RepositoryResult<Vec<i32>> {
        let mut conn = self.conn()?;
        let linked = load_linked_product_ids(&mut conn, promotion_id, product_ids)?;
        Ok(linked.into_iter().collect())
    }
}

impl PromotionWriter for DieselRepository {
    fn create_promotion(
        &self,
        new_promotion: &DomainNewPromotion,
    ) -> RepositoryResult<DomainPromotion> {
        let mut conn = self.conn()?;
        let db_new = DbNewPromotion::from(new_promotion);

        let created = diesel::insert_into(promotions::table)
            .values(&db_new)
            .get_result::<DbPromotion>(&mut conn)?;

        Ok(created.into())
    }

    fn delete_promotion(&self, promotion_id: i32, hub_id: i32) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            diesel::delete(
                product_promotions::table.filter(product_promotions::promotion_id.eq(promotion_id)),
            )
            .execute(conn)?;

            let deleted = diesel::delete(
                promotions::table
                    .filter(promotions::id.eq(promotion_id))
                    .filter(promotions::hub_id.eq(hub_id)),
            )
            .execute(conn)?;

            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }

    fn apply_promotion_to_products(
        &self,
        promotion: &DomainPromotion,
        product_ids: &[i32],
    ) -> RepositoryResult<PromotionApplication> {
        let selection: BTreeSet<i32> = product_ids.iter().copied().collect();
        if selection.is_empty() {
            return Ok(PromotionApplication::empty(promotion.id));
        }
        let selection: Vec<i32> = selection.into_iter().collect();

        let mut conn = self.conn()?;

        // BEGIN IMMEDIATE takes the write lock up front, so the partition
        // below cannot go stale before the insert runs.
        conn.immediate_transaction::<PromotionApplication, RepositoryError, _>(|conn| {
            let known: Vec<i32> = products::table
                .filter(products::hub_id.eq(promotion.hub_id))
                .filter(products::id.eq_any(&selection))
                .select(products::id)
                .load::<i32>(conn)?;

            let already_linked = load_linked_product_ids(conn, promotion.id, &known)?;

            let to_link: Vec<DbNewProductPromotion> = known
                .iter()
                .filter(|product_id| !already_linked.contains(*product_id))
                .map(|product_id| {
                    DbNewProductPromotion::from(&DomainNewProductPromotion::new(
                        *product_id,
                        promotion.id,
                    ))
                })
                .collect();

            let mut outcome = PromotionApplication {
                promotion_id: promotion.id,
                linked_count: 0,
                skipped_count: already_linked.len(),
                missing_count: selection.len() - known.len(),
            };

            if to_link.is_empty() {
                return Ok(outcome);
            }

            // Rows that lose a race on UNIQUE(product_id, promotion_id) are
            // ignored and do not come back from RETURNING.
            let inserted: Vec<i32> = diesel::insert_or_ignore_into(product_promotions::table)
                .values(&to_link)
                .returning(product_promotions::product_id)
                .get_results(conn)?;

            if !inserted.is_empty() {
                diesel::update(
                    products::table
                        .filter(products::hub_id.eq(promotion.hub_id))
                        .filter(products::id.eq_any(&inserted)),
                )
                .set((
                    products::price_cents
                        .eq(discounted_price_expression(promotion.discount_bps)),
                    products::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;
            }

            outcome.linked_count = inserted.len();
            outcome.skipped_count += to_link.len() - inserted.len();

            Ok(outcome)
        })
    }
}

/// `price_cents * (1 - discount)` rounded half-to-even, evaluated by SQLite.
///
/// Mirrors `domain::pricing::discounted_price_cents`. Stored prices are capped
/// at `MAX_PRICE_CENTS`, so the product stays an SQLite integer.
fn discounted_price_expression(discount_bps: i32) -> SqlLiteral<BigInt> {
    let factor = BASIS_POINTS - i64::from(discount_bps);
    let half = BASIS_POINTS / 2;
    let scaled = format!("(price_cents * {factor})");

    sql::<BigInt>(&format!(
        "{scaled} / {BASIS_POINTS} + CASE \
         WHEN {scaled} % {BASIS_POINTS} > {half} THEN 1 \
         WHEN {scaled} % {BASIS_POINTS} = {half} THEN ({scaled} / {BASIS_POINTS}) % 2 \
         ELSE 0 END"
    ))
}

fn filtered_promotions(query: &PromotionListQuery) -> promotions::BoxedQuery<'static, Sqlite> {
    let mut items = promotions::table
        .filter(promotions::hub_id.eq(query.hub_id))
        .into_boxed::<Sqlite>();

    if let Some(term) = query.search.as_ref() {
        let pattern = format!("%{}%", term);
        items = items.filter(promotions::description.like(pattern));
    }

    items
}

fn load_linked_product_ids(
    conn: &mut SqliteConnection,
    promotion_id: i32,
    product_ids: &[i32],
) -> RepositoryResult<HashSet<i32>> {
    if product_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let linked = product_promotions::table
        .filter(product_promotions::promotion_id.eq(promotion_id))
        .filter(product_promotions::product_id.eq_any(product_ids))
        .select(product_promotions::product_id)
        .load::<i32>(conn)?;

    Ok(linked.into_iter().collect())
}

fn count_products_per_promotion(
    conn: &mut SqliteConnection,
    promotion_ids: &[i32],
) -> RepositoryResult<HashMap<i32, usize>> {
    let rows = product_promotions::table
        .filter(product_promotions::promotion_id.eq_any(promotion_ids))
        .group_by(product_promotions::promotion_id)
        .select((product_promotions::promotion_id, count_star()))
        .load::<(i32, i64)>(conn)?;

    Ok(rows
        .into_iter()
        .map(|(promotion_id, count)| (promotion_id, count as usize))
        .collect())
}
