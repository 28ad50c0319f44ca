use chrono::NaiveDateTime;
use pushkind_common::pagination::Pagination;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::cents_to_decimal;

/// Stock level below which a product is reported as running low.
pub const LOW_INVENTORY_THRESHOLD: i32 = 10;

/// Stock level from which a product counts as well stocked.
pub const HIGH_INVENTORY_THRESHOLD: i32 = 100;

/// Domain representation of a product that can be managed by a hub.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional stock keeping unit identifier.
    pub sku: Option<String>,
    /// Optional longer description shown to users.
    pub description: Option<String>,
    /// Unit price represented in the smallest currency unit (for example cents).
    pub price_cents: i64,
    /// ISO 4217 currency code associated with the product price.
    pub currency: String,
    /// Units currently in stock.
    pub inventory: i32,
    /// Optional collection the product belongs to.
    pub collection_id: Option<i32>,
    /// Flag indicating whether the product has been archived.
    pub is_archived: bool,
    /// Promotions currently linked to the product.
    pub promotion_ids: Vec<i32>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

impl Product {
    /// Unit price as a decimal with currency precision.
    pub fn unit_price(&self) -> Decimal {
        cents_to_decimal(self.price_cents)
    }

    /// Whether the stock level is below [`LOW_INVENTORY_THRESHOLD`].
    pub fn is_low_inventory(&self) -> bool {
        self.inventory < LOW_INVENTORY_THRESHOLD
    }
}

/// Payload required to insert a new product for a hub.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Optional stock keeping unit identifier.
    pub sku: Option<String>,
    /// Optional longer description shown to users.
    pub description: Option<String>,
    /// Unit price represented in the smallest currency unit.
    pub price_cents: i64,
    /// ISO 4217 currency code associated with the product price.
    pub currency: String,
    /// Units in stock at creation time.
    pub inventory: i32,
    /// Optional collection the product belongs to.
    pub collection_id: Option<i32>,
}

impl NewProduct {
    /// Build a new product payload with the supplied details.
    pub fn new(
        hub_id: i32,
        name: impl Into<String>,
        price_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            hub_id,
            name: name.into(),
            sku: None,
            description: None,
            price_cents,
            currency: currency.into(),
            inventory: 0,
            collection_id: None,
        }
    }

    /// Attach an SKU identifier to the product payload.
    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the initial stock level.
    pub fn with_inventory(mut self, inventory: i32) -> Self {
        self.inventory = inventory;
        self
    }

    /// Place the product into a collection.
    pub fn with_collection_id(mut self, collection_id: i32) -> Self {
        self.collection_id = Some(collection_id);
        self
    }
}

/// Stock level filter offered on the products page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InventoryFilter {
    /// Fewer than [`LOW_INVENTORY_THRESHOLD`] units in stock.
    Low,
    /// At least [`HIGH_INVENTORY_THRESHOLD`] units in stock.
    High,
}

impl InventoryFilter {
    /// Parse the query string representation, ignoring unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "low" => Some(Self::Low),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

/// Query definition used to list products for a hub.
#[derive(Debug, Clone)]
pub struct ProductListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional name or description search term.
    pub search: Option<String>,
    /// Optional stock level filter.
    pub inventory: Option<InventoryFilter>,
    /// Optional collection filter.
    pub collection_id: Option<i32>,
    /// Restrict the results to these product identifiers.
    pub ids: Option<Vec<i32>>,
    /// Whether archived products should be included in the results.
    pub include_archived: bool,
    /// Optional pagination options applied to the query.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    /// Construct a query that targets all products belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
            inventory: None,
            collection_id: None,
            ids: None,
            include_archived: false,
            pagination: None,
        }
    }

    /// Filter the results by a search term applied to the name or description.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Filter the results by stock level.
    pub fn inventory(mut self, filter: InventoryFilter) -> Self {
        self.inventory = Some(filter);
        self
    }

    /// Filter the results to a single collection.
    pub fn collection(mut self, collection_id: i32) -> Self {
        self.collection_id = Some(collection_id);
        self
    }

    /// Restrict the results to the given identifiers.
    pub fn ids(mut self, ids: impl Into<Vec<i32>>) -> Self {
        self.ids = Some(ids.into());
        self
    }

    /// Include archived products in the results.
    pub fn include_archived(mut self) -> Self {
        self.include_archived = true;
        self
    }

    /// Apply pagination to the query with the given page number and page size.
    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
