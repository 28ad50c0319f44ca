use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::pricing::{CURRENCY_SCALE, MAX_PRICE_CENTS, decimal_to_cents};
use crate::domain::product::NewProduct;
use crate::forms::{normalize_ids, sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a product name.
const NAME_MAX_LEN: usize = 128;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum allowed length for a SKU.
const SKU_MAX_LEN: usize = 64;
const SKU_MAX_LEN_VALIDATOR: u64 = SKU_MAX_LEN as u64;

/// ISO 4217 currency codes are three ASCII alphabetic characters.
const CURRENCY_CODE_LEN: usize = 3;
const CURRENCY_CODE_LEN_VALIDATOR: u64 = CURRENCY_CODE_LEN as u64;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("product name cannot be empty")]
    EmptyName,
    /// The provided currency code is invalid.
    #[error("invalid currency code `{value}`")]
    InvalidCurrency { value: String },
    /// The provided price is not a non-negative amount with at most two decimals.
    #[error("invalid price `{value}`")]
    InvalidPrice { value: String },
    /// The provided price exceeds the largest storable amount.
    #[error("price `{value}` exceeds 9999999999.99")]
    PriceTooLarge { value: String },
    /// Supplied collection identifier could not be parsed.
    #[error("invalid collection `{value}`")]
    InvalidCollection { value: String },
    /// No products were selected for a bulk action.
    #[error("no products selected")]
    EmptySelection,
}

/// Form payload emitted when submitting the "Add product" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    /// Name entered by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Optional SKU supplied by the user.
    #[validate(length(max = SKU_MAX_LEN_VALIDATOR))]
    pub sku: Option<String>,
    /// Optional longer description.
    pub description: Option<String>,
    /// Unit price as typed by the user, e.g. `12.50`.
    pub price: String,
    /// ISO 4217 currency code (e.g. `USD`).
    #[validate(length(equal = CURRENCY_CODE_LEN_VALIDATOR))]
    pub currency: String,
    /// Units in stock.
    #[validate(range(min = 0))]
    #[serde(default)]
    pub inventory: i32,
    /// Optional collection identifier in string form.
    #[serde(default)]
    pub collection_id: Option<String>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self, hub_id: i32) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let sanitized_name = sanitize_inline_text(&self.name);
        if sanitized_name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let sanitized_sku = self
            .sku
            .as_deref()
            .map(sanitize_sku)
            .filter(|value| !value.is_empty());

        let sanitized_description = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty());

        let price_cents = parse_price_cents(&self.price)?;
        let currency = sanitize_currency(&self.currency)?;
        let collection_id = parse_collection_id(self.collection_id)?;

        let mut new_product = NewProduct::new(hub_id, sanitized_name, price_cents, currency)
            .with_inventory(self.inventory);

        if let Some(sku) = sanitized_sku {
            new_product = new_product.with_sku(sku);
        }

        if let Some(description) = sanitized_description {
            new_product = new_product.with_description(description);
        }

        if let Some(collection_id) = collection_id {
            new_product = new_product.with_collection_id(collection_id);
        }

        Ok(new_product)
    }
}

/// Selection of products submitted by a bulk action on the products page.
#[derive(Debug, Default, Deserialize)]
pub struct ProductSelectionForm {
    /// Identifiers of the checked rows.
    #[serde(default)]
    pub product_ids: Vec<i32>,
}

impl ProductSelectionForm {
    /// Normalized, non-empty set of selected product identifiers.
    pub fn into_product_ids(self) -> ProductFormResult<Vec<i32>> {
        let ids = normalize_ids(self.product_ids);
        if ids.is_empty() {
            return Err(ProductFormError::EmptySelection);
        }
        Ok(ids)
    }
}

/// Form payload emitted by the inline price editor of a product row.
#[derive(Debug, Deserialize)]
pub struct UpdatePriceForm {
    /// New unit price as typed by the user.
    pub price: String,
}

impl UpdatePriceForm {
    /// Parsed price in minor units.
    pub fn into_price_cents(self) -> ProductFormResult<i64> {
        parse_price_cents(&self.price)
    }
}

/// Parse a user supplied price into minor units.
pub fn parse_price_cents(input: &str) -> ProductFormResult<i64> {
    let trimmed = input.trim();
    let invalid = || ProductFormError::InvalidPrice {
        value: trimmed.to_string(),
    };

    let amount = Decimal::from_str(&trimmed.replace(',', ".")).map_err(|_| invalid())?;
    if amount.is_sign_negative() || amount.scale() > CURRENCY_SCALE {
        return Err(invalid());
    }

    match decimal_to_cents(amount) {
        Some(cents) if cents <= MAX_PRICE_CENTS => Ok(cents),
        _ => Err(ProductFormError::PriceTooLarge {
            value: trimmed.to_string(),
        }),
    }
}

fn parse_collection_id(value: Option<String>) -> ProductFormResult<Option<i32>> {
    let Some(raw) = value else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<i32>() {
        Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
        _ => Err(ProductFormError::InvalidCollection {
            value: trimmed.to_string(),
        }),
    }
}

fn sanitize_sku(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
}

fn sanitize_currency(input: &str) -> ProductFormResult<String> {
    let trimmed = input.trim();
    if trimmed.len() != CURRENCY_CODE_LEN || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(ProductFormError::InvalidCurrency {
            value: trimmed.to_string(),
        });
    }

    Ok(trimmed.to_ascii_uppercase())
}
