use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Domain representation of a product collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collection {
    /// Unique identifier of the collection.
    pub id: i32,
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable name of the collection.
    pub name: String,
    /// Optional product highlighted for the collection.
    pub featured_product_id: Option<i32>,
    /// Number of products assigned to the collection.
    pub product_count: usize,
    /// Timestamp for when the collection was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the collection.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new collection for a hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCollection {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Human-readable name of the collection.
    pub name: String,
    /// Optional product highlighted for the collection.
    pub featured_product_id: Option<i32>,
}

impl NewCollection {
    /// Build a new collection payload.
    pub fn new(hub_id: i32, name: impl Into<String>) -> Self {
        Self {
            hub_id,
            name: name.into(),
            featured_product_id: None,
        }
    }

    /// Highlight a product in the collection.
    pub fn with_featured_product_id(mut self, product_id: i32) -> Self {
        self.featured_product_id = Some(product_id);
        self
    }
}

/// Query definition used when listing collections.
#[derive(Debug, Clone)]
pub struct CollectionListQuery {
    /// Owning hub identifier.
    pub hub_id: i32,
    /// Optional name search term.
    pub search: Option<String>,
}

impl CollectionListQuery {
    /// Construct a query that targets all collections belonging to `hub_id`.
    pub fn new(hub_id: i32) -> Self {
        Self {
            hub_id,
            search: None,
        }
    }

    /// Filter the results by a search term applied to the name.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}
