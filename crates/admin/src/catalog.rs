//! Product and category creation forms.

use rust_decimal::Decimal;
use swiftthrift_core::CategoryId;
use swiftthrift_storefront::ClientError;
use swiftthrift_storefront::api::types::{CategoryRef, CreateProductPayload};

/// Item condition as offered by the admin form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemCondition {
    #[default]
    New,
    Used,
}

impl ItemCondition {
    /// Wire code: `0` for new, `1` for used.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::New => 0,
            Self::Used => 1,
        }
    }
}

impl std::str::FromStr for ItemCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "new" => Ok(Self::New),
            "1" | "used" => Ok(Self::Used),
            other => Err(format!("unknown condition `{other}`")),
        }
    }
}

/// New product as entered by an admin. Text fields are raw input.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub condition: ItemCondition,
    pub category_id: Option<CategoryId>,
}

impl ProductForm {
    /// Check the form and build the JSON part of the create request.
    ///
    /// New products are never sold.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Validation` when a field is missing or the price
    /// is not a non-negative number.
    pub fn validate(&self) -> Result<CreateProductPayload, ClientError> {
        let name = self.name.trim();
        let description = self.description.trim();
        let price = self.price.trim();
        let (false, false, false, Some(category_id)) = (
            name.is_empty(),
            description.is_empty(),
            price.is_empty(),
            self.category_id,
        ) else {
            return Err(ClientError::Validation(
                "Please fill in all product fields.".to_string(),
            ));
        };

        let price: Decimal = price
            .parse()
            .map_err(|_| ClientError::Validation(format!("Invalid price: {price}.")))?;
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ClientError::Validation(
                "Price cannot be negative.".to_string(),
            ));
        }

        Ok(CreateProductPayload {
            name: name.to_string(),
            description: description.to_string(),
            price,
            condition: self.condition.code(),
            is_sold: false,
            category: CategoryRef { category_id },
        })
    }
}

/// Check a new category name.
///
/// # Errors
///
/// Returns `ClientError::Validation` for a blank name.
pub fn validate_category_name(name: &str) -> Result<&str, ClientError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ClientError::Validation(
            "Please enter a category name.".to_string(),
        ));
    }
    Ok(name)
}
