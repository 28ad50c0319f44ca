use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use pushkind_common::repository::errors::RepositoryResult;

use crate::domain::collection::{
    Collection as DomainCollection, CollectionListQuery, NewCollection as DomainNewCollection,
};
use crate::models::collection::{Collection as DbCollection, NewCollection as DbNewCollection};
use crate::repository::{CollectionReader, CollectionWriter, DieselRepository};
use crate::schema::{collections, products};

impl CollectionReader for DieselRepository {
    fn list_collections(
        &self,
        query: CollectionListQuery,
    ) -> RepositoryResult<Vec<DomainCollection>> {
        let mut conn = self.conn()?;
        let hub_id = query.hub_id;

        let mut items = collections::table
            .filter(collections::hub_id.eq(hub_id))
            .into_boxed::<Sqlite>();

        if let Some(term) = query.search.as_ref() {
            items = items.filter(collections::name.like(format!("%{}%", term)));
        }

        let db_collections = items
            .order((collections::name.asc(), collections::id.asc()))
            .load::<DbCollection>(&mut conn)?;

        if db_collections.is_empty() {
            return Ok(Vec::new());
        }

        let counts: HashMap<Option<i32>, i64> = products::table
            .filter(products::hub_id.eq(hub_id))
            .filter(products::collection_id.is_not_null())
            .group_by(products::collection_id)
            .select((products::collection_id, count_star()))
            .load::<(Option<i32>, i64)>(&mut conn)?
            .into_iter()
            .collect();

        Ok(db_collections
            .into_iter()
            .map(|db_collection| {
                let mut domain: DomainCollection = db_collection.into();
                domain.product_count = counts.get(&Some(domain.id)).copied().unwrap_or(0) as usize;
                domain
            })
            .collect())
    }
}

impl CollectionWriter for DieselRepository {
    fn create_collection(
        &self,
        new_collection: &DomainNewCollection,
    ) -> RepositoryResult<DomainCollection> {
        let mut conn = self.conn()?;
        let insertable = DbNewCollection::from(new_collection);

        let created = diesel::insert_into(collections::table)
            .values(&insertable)
            .get_result::<DbCollection>(&mut conn)?;

        Ok(created.into())
    }
}
