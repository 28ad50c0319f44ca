use std::collections::HashMap;

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::{check_role, empty_string_as_none};
use serde::{Deserialize, Serialize};

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::{
    collection::{Collection, CollectionListQuery},
    pricing::format_cents,
    product::{InventoryFilter, Product, ProductListQuery},
    promotion::{Promotion, PromotionListQuery},
};
use crate::forms::products::{AddProductForm, ProductSelectionForm, UpdatePriceForm};
use crate::repository::{CollectionReader, ProductReader, ProductWriter, PromotionReader};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the products index page.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Optional search string entered by the user.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
    /// Stock level filter, `low` or `high`.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub inventory: Option<String>,
    /// Collection filter in string form.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub collection_id: Option<String>,
}

/// Data required to render the products index template.
pub struct ProductsPageData {
    /// Paginated list of products displayed in the table.
    pub products: Paginated<ProductView>,
    /// Search query echoed back to the view when present.
    pub search: Option<String>,
    /// Active stock level filter.
    pub inventory: Option<InventoryFilter>,
    /// Active collection filter.
    pub collection_id: Option<i32>,
    /// Collections offered by the filter and the add form.
    pub collections: Vec<Collection>,
    /// Promotions of the hub, used to label product rows.
    pub promotions: Vec<Promotion>,
}

/// Loads the products overview page.
pub fn load_products_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: ProductsQuery,
) -> ServiceResult<ProductsPageData>
where
    R: ProductReader + PromotionReader + CollectionReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let ProductsQuery {
        search,
        page,
        inventory,
        collection_id,
    } = query;

    let inventory = inventory.as_deref().and_then(InventoryFilter::parse);
    let collection_id = collection_id
        .as_deref()
        .and_then(|value| value.trim().parse::<i32>().ok())
        .filter(|id| *id > 0);

    let page = page.unwrap_or(1);
    let mut list_query = ProductListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(search_term) = search.as_ref() {
        list_query = list_query.search(search_term);
    }

    if let Some(filter) = inventory {
        list_query = list_query.inventory(filter);
    }

    if let Some(collection_id) = collection_id {
        list_query = list_query.collection(collection_id);
    }

    let (total, items) = repo.list_products(list_query).map_err(ServiceError::from)?;
    let collections = repo
        .list_collections(CollectionListQuery::new(user.hub_id))
        .map_err(ServiceError::from)?;
    let (_, promotions) = repo
        .list_promotions(PromotionListQuery::new(user.hub_id))
        .map_err(ServiceError::from)?;

    let collection_lookup: HashMap<i32, &Collection> = collections
        .iter()
        .map(|collection| (collection.id, collection))
        .collect();
    let promotion_lookup: HashMap<i32, &Promotion> = promotions
        .iter()
        .map(|promotion| (promotion.id, promotion))
        .collect();

    let view_items: Vec<ProductView> = items
        .into_iter()
        .map(|product| ProductView::from_product(product, &collection_lookup, &promotion_lookup))
        .collect();

    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);
    let products = Paginated::new(view_items, page, total_pages);

    Ok(ProductsPageData {
        products,
        search,
        inventory,
        collection_id,
        collections,
        promotions,
    })
}

/// Creates a new product for the authenticated user's hub.
pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + CollectionReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_product = form
        .into_new_product(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if let Some(collection_id) = new_product.collection_id {
        let collections = repo
            .list_collections(CollectionListQuery::new(user.hub_id))
            .map_err(ServiceError::from)?;
        if !collections
            .iter()
            .any(|collection| collection.id == collection_id)
        {
            return Err(ServiceError::Form(format!(
                "invalid collection `{collection_id}`"
            )));
        }
    }

    repo.create_product(&new_product)
        .map_err(ServiceError::from)
}

/// Resets the stock of the selected products to zero.
pub fn clear_inventory<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ProductSelectionForm,
) -> ServiceResult<usize>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let product_ids = form
        .into_product_ids()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let cleared = repo
        .clear_inventory(user.hub_id, &product_ids)
        .map_err(ServiceError::from)?;

    log::info!(
        "Cleared inventory of {cleared} of {} selected products in hub {}",
        product_ids.len(),
        user.hub_id
    );

    Ok(cleared)
}

/// Overwrites the unit price of one product of the user's hub.
///
/// Linked promotions are left as they are; the new price is not discounted.
pub fn update_product_price<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: UpdatePriceForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let price_cents = form
        .into_price_cents()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let product = repo
        .update_product_price(product_id, user.hub_id, price_cents)
        .map_err(ServiceError::from)?;

    log::info!(
        "Set price of product {} in hub {} to {}",
        product.id,
        user.hub_id,
        format_cents(product.price_cents)
    );

    Ok(product)
}

/// View model exposed to the products index template.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: i32,
    pub name: String,
    pub sku: Option<String>,
    pub price_cents: i64,
    pub price_formatted: String,
    pub currency: String,
    pub inventory: i32,
    pub inventory_status: &'static str,
    pub collection_name: Option<String>,
    pub is_archived: bool,
    pub promotions: Vec<String>,
    pub updated_at: chrono::NaiveDateTime,
}

impl ProductView {
    fn from_product(
        product: Product,
        collection_lookup: &HashMap<i32, &Collection>,
        promotion_lookup: &HashMap<i32, &Promotion>,
    ) -> Self {
        let inventory_status = if product.is_low_inventory() {
            "Low"
        } else {
            "OK"
        };

        let collection_name = product
            .collection_id
            .and_then(|id| collection_lookup.get(&id))
            .map(|collection| collection.name.clone());

        let promotions = product
            .promotion_ids
            .iter()
            .filter_map(|id| promotion_lookup.get(id))
            .map(|promotion| promotion.description.clone())
            .collect();

        Self {
            id: product.id,
            price_formatted: format_cents(product.price_cents),
            price_cents: product.price_cents,
            name: product.name,
            sku: product.sku,
            currency: product.currency,
            inventory: product.inventory,
            inventory_status,
            collection_name,
            is_archived: product.is_archived,
            promotions,
            updated_at: product.updated_at,
        }
    }
}
