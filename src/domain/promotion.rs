use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::{discount_factor, discount_from_bps};

/// Domain representation of a promotion offered by a hub.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Promotion {
    /// Unique identifier of the promotion.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Text shown to staff when picking a promotion.
    pub description: String,
    /// Discount in basis points (`2000` is 20%), `0 <= discount_bps < 10000`.
    pub discount_bps: i32,
    /// Number of products currently linked to the promotion.
    pub product_count: usize,
    /// Timestamp for when the promotion was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the promotion.
    pub updated_at: NaiveDateTime,
}

impl Promotion {
    /// Fraction taken off the price, `0 <= discount < 1`.
    pub fn discount(&self) -> Decimal {
        discount_from_bps(self.discount_bps)
    }

    /// Multiplier applied to prices of products joining this promotion.
    pub fn discount_factor(&self) -> Decimal {
        discount_factor(self.discount())
    }

    /// Discount expressed in percent for display, e.g. `20` for `0.20`.
    pub fn discount_percent(&self) -> Decimal {
        (self.discount() * Decimal::ONE_HUNDRED).normalize()
    }
}

/// Payload required to insert a new promotion for a hub.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPromotion {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Text shown to staff when picking a promotion.
    pub description: String,
    /// Discount in basis points (`2000` is 20%).
    pub discount_bps: i32,
}

impl NewPromotion {
    /// Build a new promotion payload.
    pub fn new(hub_id: i32, description: impl Into<String>, discount_bps: i32) -> Self {
        Self {
            hub_id,
            description: description.into(),
            discount_bps,
        }
    }
}

/// Query definition used to list promotions for a hub.
#[derive(Debug, Clone)]
pub struct PromotionListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional description search term.
    pub search: Option<String>,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl PromotionListQuery {
    /// Construct a query that targets all promotions belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            pagination: None,
        }
    }

    /// Filter the results by a search term applied to the description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Outcome of applying a promotion to a selection of products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PromotionApplication {
    /// Promotion that was applied.
    pub promotion_id: i32,
    /// Products that were linked and discounted by this call.
    pub linked_count: usize,
    /// Products left untouched because they were already linked.
    pub skipped_count: usize,
    /// Selected identifiers that do not name a product of the hub.
    pub missing_count: usize,
}

impl PromotionApplication {
    /// Outcome for a call that changed nothing.
    pub fn empty(promotion_id: i32) -> Self {
        Self {
            promotion_id,
            linked_count: 0,
            skipped_count: 0,
            missing_count: 0,
        }
    }
}
