use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::collection::NewCollection;
use crate::forms::sanitize_inline_text;

/// Maximum length allowed for a collection name.
const NAME_MAX_LEN: usize = 255;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Result type returned by the collection form helpers.
pub type CollectionFormResult<T> = Result<T, CollectionFormError>;

/// Errors that can occur while processing collection forms.
#[derive(Debug, Error)]
pub enum CollectionFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("collection name cannot be empty")]
    EmptyName,
}

/// Form payload emitted when submitting the "Add collection" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCollectionForm {
    /// Name entered by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Optional featured product identifier.
    #[serde(default)]
    pub featured_product_id: Option<i32>,
}

impl AddCollectionForm {
    /// Validates and sanitizes the payload into a domain `NewCollection`.
    pub fn into_new_collection(self, hub_id: i32) -> CollectionFormResult<NewCollection> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(CollectionFormError::EmptyName);
        }

        let mut collection = NewCollection::new(hub_id, name);
        if let Some(product_id) = self.featured_product_id.filter(|id| *id > 0) {
            collection = collection.with_featured_product_id(product_id);
        }

        Ok(collection)
    }
}
