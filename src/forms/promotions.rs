use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::pricing::discount_to_bps;
use crate::domain::promotion::NewPromotion;
use crate::forms::{normalize_ids, sanitize_inline_text};

/// Maximum allowed length for a promotion description.
const DESCRIPTION_MAX_LEN: usize = 255;
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = DESCRIPTION_MAX_LEN as u64;

/// Result type returned by the promotion form helpers.
pub type PromotionFormResult<T> = Result<T, PromotionFormError>;

/// Errors that can occur while processing promotion forms.
#[derive(Debug, Error)]
pub enum PromotionFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided description is empty after sanitization.
    #[error("promotion description cannot be empty")]
    EmptyDescription,
    /// The discount is not a number.
    #[error("invalid discount `{value}`")]
    InvalidDiscount { value: String },
    /// The discount is outside `0 <= discount < 1` or too precise.
    #[error("discount `{value}` must be at least 0 and below 1 with at most four decimals")]
    DiscountOutOfRange { value: String },
    /// No products were selected.
    #[error("no products selected")]
    EmptySelection,
    /// No promotion was chosen.
    #[error("no promotion selected")]
    MissingPromotion,
}

/// Form payload emitted when submitting the "Add promotion" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddPromotionForm {
    /// Description entered by the user.
    #[validate(length(min = 1, max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    pub description: String,
    /// Discount as a fraction (`0.2`) or a percentage (`20%`).
    pub discount: String,
}

impl AddPromotionForm {
    /// Validates and sanitizes the payload into a domain `NewPromotion`.
    pub fn into_new_promotion(self, hub_id: i32) -> PromotionFormResult<NewPromotion> {
        self.validate()?;

        let description = sanitize_inline_text(&self.description);
        if description.is_empty() {
            return Err(PromotionFormError::EmptyDescription);
        }

        let discount_bps = parse_discount_bps(&self.discount)?;

        Ok(NewPromotion::new(hub_id, description, discount_bps))
    }
}

/// Normalized request to apply a promotion to a set of products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyPromotionPayload {
    /// Promotion to apply.
    pub promotion_id: i32,
    /// Sorted, de-duplicated product identifiers.
    pub product_ids: Vec<i32>,
}

/// Form payload emitted by the "Add products to a promotion" bulk action.
///
/// The first submission carries only the selection; the confirmation page
/// posts it again together with the chosen promotion and the `apply` flag.
#[derive(Debug, Default, Deserialize)]
pub struct ApplyPromotionForm {
    /// Identifiers of the selected products.
    #[serde(default)]
    pub product_ids: Vec<i32>,
    /// Chosen promotion identifier in string form.
    #[serde(default)]
    pub promotion_id: Option<String>,
    /// Present when the user confirmed the action.
    #[serde(default)]
    pub apply: Option<String>,
}

impl ApplyPromotionForm {
    /// Whether the user confirmed the promotion choice.
    pub fn wants_apply(&self) -> bool {
        self.apply.is_some()
    }

    /// Normalized, non-empty product selection.
    pub fn selected_product_ids(&self) -> PromotionFormResult<Vec<i32>> {
        let ids = normalize_ids(self.product_ids.iter().copied());
        if ids.is_empty() {
            return Err(PromotionFormError::EmptySelection);
        }
        Ok(ids)
    }

    /// Chosen promotion, if any was picked.
    pub fn chosen_promotion_id(&self) -> Option<i32> {
        self.promotion_id
            .as_deref()
            .map(str::trim)
            .and_then(|value| value.parse::<i32>().ok())
            .filter(|id| *id > 0)
    }

    /// Validates the submission into an apply request.
    pub fn into_payload(self) -> PromotionFormResult<ApplyPromotionPayload> {
        let product_ids = self.selected_product_ids()?;
        let promotion_id = self
            .chosen_promotion_id()
            .ok_or(PromotionFormError::MissingPromotion)?;

        Ok(ApplyPromotionPayload {
            promotion_id,
            product_ids,
        })
    }
}

/// Parse a discount typed as a fraction (`0.2`) or a percentage (`20%`)
/// into basis points.
pub fn parse_discount_bps(input: &str) -> PromotionFormResult<i32> {
    let trimmed = input.trim();
    let (number, is_percent) = match trimmed.strip_suffix('%') {
        Some(number) => (number.trim(), true),
        None => (trimmed, false),
    };

    let mut discount = Decimal::from_str(&number.replace(',', ".")).map_err(|_| {
        PromotionFormError::InvalidDiscount {
            value: trimmed.to_string(),
        }
    })?;

    if is_percent {
        discount /= Decimal::ONE_HUNDRED;
    }

    discount_to_bps(discount).ok_or_else(|| PromotionFormError::DiscountOutOfRange {
        value: trimmed.to_string(),
    })
}
