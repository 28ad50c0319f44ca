use std::collections::HashSet;

use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use pushkind_common::routes::{check_role, empty_string_as_none};
use serde::{Deserialize, Serialize};

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::{
    pricing::{discounted_price_cents, format_cents},
    product::{Product, ProductListQuery},
    promotion::{Promotion, PromotionApplication, PromotionListQuery},
};
use crate::forms::promotions::{AddPromotionForm, ApplyPromotionForm};
use crate::repository::{ProductReader, PromotionReader, PromotionWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the promotions page and API.
#[derive(Debug, Default, Deserialize)]
pub struct PromotionsQuery {
    /// Optional description search.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    /// Page requested by the UI (1-based).
    pub page: Option<usize>,
}

/// Data required to render the promotions template.
pub struct PromotionsPageData {
    /// Paginated promotions.
    pub promotions: Paginated<PromotionView>,
    /// Search query echoed back to the view when present.
    pub search: Option<String>,
}

/// View model for a promotion row or picker option.
#[derive(Debug, Serialize)]
pub struct PromotionView {
    pub id: i32,
    pub description: String,
    pub discount_bps: i32,
    pub discount_percent: String,
    pub product_count: usize,
    pub created_at: chrono::NaiveDateTime,
}

impl From<Promotion> for PromotionView {
    fn from(promotion: Promotion) -> Self {
        Self {
            discount_percent: promotion.discount_percent().to_string(),
            id: promotion.id,
            description: promotion.description,
            discount_bps: promotion.discount_bps,
            product_count: promotion.product_count,
            created_at: promotion.created_at,
        }
    }
}

/// Loads the promotions page.
pub fn load_promotions_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: PromotionsQuery,
) -> ServiceResult<PromotionsPageData>
where
    R: PromotionReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let PromotionsQuery { search, page } = query;
    let page = page.unwrap_or(1);

    let mut list_query =
        PromotionListQuery::new(user.hub_id).paginate(page, DEFAULT_ITEMS_PER_PAGE);
    if let Some(term) = search.as_ref() {
        list_query = list_query.search(term);
    }

    let (total, items) = repo
        .list_promotions(list_query)
        .map_err(ServiceError::from)?;

    let views: Vec<PromotionView> = items.into_iter().map(PromotionView::from).collect();
    let total_pages = total.div_ceil(DEFAULT_ITEMS_PER_PAGE);

    Ok(PromotionsPageData {
        promotions: Paginated::new(views, page, total_pages),
        search,
    })
}

/// Creates a promotion for the authenticated user's hub.
pub fn create_promotion<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddPromotionForm,
) -> ServiceResult<Promotion>
where
    R: PromotionWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let new_promotion = form
        .into_new_promotion(user.hub_id)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.create_promotion(&new_promotion)
        .map_err(ServiceError::from)
}

/// Deletes a promotion together with its product links.
///
/// Prices discounted by the promotion are not restored.
pub fn remove_promotion<R>(
    repo: &R,
    user: &AuthenticatedUser,
    promotion_id: i32,
) -> ServiceResult<()>
where
    R: PromotionWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_promotion(promotion_id, user.hub_id)
        .map_err(ServiceError::from)
}

/// Selected product as shown on the promotion picker page.
#[derive(Debug, Serialize)]
pub struct SelectedProductView {
    pub id: i32,
    pub name: String,
    pub currency: String,
    pub price_formatted: String,
    /// Price after the chosen promotion, when one is chosen and the product
    /// is not linked to it yet.
    pub discounted_price_formatted: Option<String>,
    pub already_linked: bool,
}

/// Data required to render the promotion picker page.
pub struct PromotionSelectionData {
    /// Normalized identifiers posted back by the confirmation form.
    pub product_ids: Vec<i32>,
    /// Products of the hub matching the selection.
    pub products: Vec<SelectedProductView>,
    /// Promotions available for the hub.
    pub promotions: Vec<PromotionView>,
    /// Promotion currently picked, if any.
    pub selected_promotion_id: Option<i32>,
}

/// Loads the intermediate page of the "Add products to a promotion" action.
pub fn load_promotion_selection<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: &ApplyPromotionForm,
) -> ServiceResult<PromotionSelectionData>
where
    R: ProductReader + PromotionReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let product_ids = form
        .selected_product_ids()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let (_, products) = repo
        .list_products(
            ProductListQuery::new(user.hub_id)
                .ids(product_ids.clone())
                .include_archived(),
        )
        .map_err(ServiceError::from)?;

    if products.is_empty() {
        return Err(ServiceError::Form(
            "none of the selected products exist".to_string(),
        ));
    }

    let (_, promotions) = repo
        .list_promotions(PromotionListQuery::new(user.hub_id))
        .map_err(ServiceError::from)?;

    let selected = form
        .chosen_promotion_id()
        .and_then(|id| promotions.iter().find(|promotion| promotion.id == id));

    let linked: HashSet<i32> = match selected {
        Some(promotion) => repo
            .linked_product_ids(promotion.id, &product_ids)
            .map_err(ServiceError::from)?
            .into_iter()
            .collect(),
        None => HashSet::new(),
    };

    let products = products
        .into_iter()
        .map(|product| selected_product_view(product, selected, &linked))
        .collect();

    Ok(PromotionSelectionData {
        product_ids,
        products,
        selected_promotion_id: selected.map(|promotion| promotion.id),
        promotions: promotions.into_iter().map(PromotionView::from).collect(),
    })
}

fn selected_product_view(
    product: Product,
    promotion: Option<&Promotion>,
    linked: &HashSet<i32>,
) -> SelectedProductView {
    let already_linked = linked.contains(&product.id);
    let discounted_price_formatted = match promotion {
        Some(promotion) if !already_linked => {
            discounted_price_cents(product.price_cents, promotion.discount_bps).map(format_cents)
        }
        _ => None,
    };

    SelectedProductView {
        id: product.id,
        price_formatted: format_cents(product.price_cents),
        name: product.name,
        currency: product.currency,
        discounted_price_formatted,
        already_linked,
    }
}

/// Links the selected products to a promotion and discounts the newly
/// linked ones.
///
/// The selection and promotion reference are validated before the
/// repository is touched; an empty selection is always rejected.
pub fn apply_promotion<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ApplyPromotionForm,
) -> ServiceResult<PromotionApplication>
where
    R: PromotionReader + PromotionWriter + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    let payload = form
        .into_payload()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let promotion = repo
        .get_promotion_by_id(payload.promotion_id, user.hub_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let outcome = repo
        .apply_promotion_to_products(&promotion, &payload.product_ids)
        .map_err(ServiceError::from)?;

    log::info!(
        "Applied promotion {} ({}% off) in hub {}: {} linked, {} skipped",
        promotion.id,
        promotion.discount_percent(),
        user.hub_id,
        outcome.linked_count,
        outcome.skipped_count
    );

    if outcome.missing_count > 0 {
        log::warn!(
            "Ignored {} unknown products while applying promotion {}",
            outcome.missing_count,
            promotion.id
        );
    }

    Ok(outcome)
}
