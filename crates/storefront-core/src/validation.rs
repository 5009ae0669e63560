//! # Validation Module
//!
//! Field rules and admin forms for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin form (this module)                                     │
//! │  ├── Every field checked, every failure collected                      │
//! │  └── FieldErrors shown inline next to each input                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── UNIQUE constraints (promo code, user email)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::ProductForm;
//!
//! let form = ProductForm {
//!     name: "".to_string(),
//!     price_cents: -5,
//!     ..ProductForm::default()
//! };
//! let errors = form.validate().unwrap_err();
//! assert_eq!(errors.len(), 2);
//! assert_eq!(errors.get("name"), Some("name is required"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{FieldErrors, ValidationError};
use crate::money::Money;
use crate::types::{new_id, Category, Product, PromoCode};
use crate::{MAX_DISCOUNT_PERCENTAGE, MAX_MESSAGE_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn required_with_max(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a product name (1-200 characters).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    required_with_max("name", name, 200)
}

/// Validates a product description (optional, at most 2000 characters).
pub fn validate_description(description: &str) -> ValidationResult<()> {
    if description.trim().chars().count() > 2000 {
        return Err(ValidationError::TooLong {
            field: "description".to_string(),
            max: 2000,
        });
    }
    Ok(())
}

/// Validates a category name (1-100 characters).
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    required_with_max("name", name, 100)
}

/// Validates image references: none of them may be blank.
pub fn validate_images(images: &[String]) -> ValidationResult<()> {
    if images.iter().any(|i| i.trim().is_empty()) {
        return Err(ValidationError::InvalidFormat {
            field: "images".to_string(),
            reason: "image references cannot be blank".to_string(),
        });
    }
    Ok(())
}

/// Validates a promo code as typed by an admin.
///
/// ## Rules
/// - 3-32 characters after normalization
/// - Only letters, digits, hyphens and underscores
///
/// ```rust
/// use storefront_core::validation::validate_promo_code;
///
/// assert!(validate_promo_code("summer-10").is_ok());
/// assert!(validate_promo_code("no").is_err());
/// assert!(validate_promo_code("HAS SPACE").is_err());
/// ```
pub fn validate_promo_code(code: &str) -> ValidationResult<()> {
    let code = PromoCode::normalize(code);

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }
    if code.len() < 3 {
        return Err(ValidationError::TooShort {
            field: "code".to_string(),
            min: 3,
        });
    }
    if code.len() > 32 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 32,
        });
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address: one `@` with something on both sides.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let mut parts = email.split('@');
    let (local, domain, rest) = (parts.next(), parts.next(), parts.next());
    match (local, domain, rest) {
        (Some(local), Some(domain), None) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        }),
    }
}

/// Validates a user's display name (1-80 characters).
pub fn validate_display_name(name: &str) -> ValidationResult<()> {
    required_with_max("display_name", name, 80)
}

/// Validates a chat message body.
pub fn validate_message_body(body: &str) -> ValidationResult<()> {
    required_with_max("body", body, MAX_MESSAGE_LENGTH)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Highest accepted price: $10,000,000.00.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

/// Validates a price in cents. Zero is allowed (free items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

/// Validates a discount percentage (0-100) and narrows it.
pub fn validate_discount_percentage(field: &str, pct: i64, min: i64) -> ValidationResult<u8> {
    let max = i64::from(MAX_DISCOUNT_PERCENTAGE);
    if pct < min || pct > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min,
            max,
        });
    }
    u8::try_from(pct).map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
        min,
        max,
    })
}

// =============================================================================
// Forms
// =============================================================================

/// Admin form for creating or editing a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub images: Vec<String>,
    pub category_id: Option<String>,
    pub promo_active: bool,
    pub discount_percentage: Option<i64>,
    pub has_public_discount: bool,
}

impl ProductForm {
    /// Prefills the form from an existing product (edit screen).
    pub fn from_product(product: &Product) -> Self {
        ProductForm {
            name: product.name.clone(),
            description: product.description.clone(),
            price_cents: product.price.cents(),
            images: product.images.clone(),
            category_id: product.category_id.clone(),
            promo_active: product.promo_active,
            discount_percentage: product.discount_percentage.map(i64::from),
            has_public_discount: product.has_public_discount,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(validate_product_name(&self.name));
        errors.check(validate_description(&self.description));
        errors.check(validate_price_cents(self.price_cents));
        errors.check(validate_images(&self.images));

        match self.discount_percentage {
            Some(pct) => errors.check(validate_discount_percentage("discount_percentage", pct, 0).map(|_| ())),
            None if self.promo_active => errors.check(Err(ValidationError::Required {
                field: "discount_percentage".to_string(),
            })),
            None => {}
        }

        errors.into_result()
    }

    /// Validates and builds a brand-new product.
    pub fn into_product(self) -> Result<Product, FieldErrors> {
        let mut product = Product::new("", Money::zero());
        self.apply_to(&mut product)?;
        Ok(product)
    }

    /// Validates and writes the form onto an existing product, bumping `updated_at`.
    pub fn apply_to(&self, product: &mut Product) -> Result<(), FieldErrors> {
        self.validate()?;

        product.name = self.name.trim().to_string();
        product.description = self.description.trim().to_string();
        product.price = Money::from_cents(self.price_cents);
        product.images = self.images.iter().map(|i| i.trim().to_string()).collect();
        product.category_id = self
            .category_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        product.promo_active = self.promo_active;
        product.discount_percentage = self
            .discount_percentage
            .and_then(|pct| u8::try_from(pct).ok());
        product.has_public_discount = self.has_public_discount;
        product.updated_at = Utc::now();
        Ok(())
    }
}

/// Admin form for a category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

impl CategoryForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(validate_category_name(&self.name));
        errors.into_result()
    }

    pub fn into_category(self) -> Result<Category, FieldErrors> {
        self.validate()?;
        Ok(Category::new(self.name.trim()))
    }

    pub fn apply_to(&self, category: &mut Category) -> Result<(), FieldErrors> {
        self.validate()?;
        category.name = self.name.trim().to_string();
        category.updated_at = Utc::now();
        Ok(())
    }
}

/// Admin form for a promo code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCodeForm {
    pub code: String,
    pub discount_percentage: i64,
    pub product_id: Option<String>,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl PromoCodeForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(validate_promo_code(&self.code));
        errors.check(
            validate_discount_percentage("discount_percentage", self.discount_percentage, 1).map(|_| ()),
        );
        errors.into_result()
    }

    pub fn into_promo_code(self) -> Result<PromoCode, FieldErrors> {
        self.validate()?;
        let now = Utc::now();
        Ok(PromoCode {
            id: new_id(),
            code: PromoCode::normalize(&self.code),
            discount_percentage: u8::try_from(self.discount_percentage).unwrap_or(MAX_DISCOUNT_PERCENTAGE),
            product_id: self.product_id.filter(|id| !id.trim().is_empty()),
            is_active: self.is_active,
            expires_at: self.expires_at,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Admin form for a user's profile and role flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserForm {
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
    pub is_escrow_agent: bool,
}

impl UserForm {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(validate_email(&self.email));
        errors.check(validate_display_name(&self.display_name));
        errors.into_result()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_product_form() -> ProductForm {
        ProductForm {
            name: "Gaming account, level 80".to_string(),
            description: "Full access, email included".to_string(),
            price_cents: 4_999,
            images: vec!["images/acc-1.png".to_string()],
            category_id: None,
            promo_active: false,
            discount_percentage: None,
            has_public_discount: false,
        }
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Mechanical keyboard").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
        assert!(validate_price_cents(MAX_PRICE_CENTS).is_ok());
        assert!(validate_price_cents(MAX_PRICE_CENTS + 1).is_err());
        assert!(validate_price_cents(3_000_000_000).is_err());
    }

    #[test]
    fn test_validate_discount_percentage() {
        assert_eq!(validate_discount_percentage("d", 0, 0), Ok(0));
        assert_eq!(validate_discount_percentage("d", 100, 0), Ok(100));
        assert!(validate_discount_percentage("d", 101, 0).is_err());
        assert!(validate_discount_percentage("d", -1, 0).is_err());
        assert!(validate_discount_percentage("d", 0, 1).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("alice").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("a@b@example.com").is_err());
        assert!(validate_email("alice@localhost").is_err());
    }

    #[test]
    fn test_product_form_valid() {
        let product = valid_product_form().into_product().unwrap();
        assert_eq!(product.name, "Gaming account, level 80");
        assert_eq!(product.price.cents(), 4_999);
        assert_eq!(product.discount_percentage, None);
    }

    #[test]
    fn test_product_form_reports_each_field() {
        let form = ProductForm {
            name: String::new(),
            price_cents: -1,
            images: vec!["  ".to_string()],
            discount_percentage: Some(150),
            ..valid_product_form()
        };

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.get("name").is_some());
        assert!(errors.get("price").is_some());
        assert!(errors.get("images").is_some());
        assert_eq!(
            errors.get("discount_percentage"),
            Some("discount_percentage must be between 0 and 100")
        );
    }

    #[test]
    fn test_active_promo_needs_percentage() {
        let form = ProductForm {
            promo_active: true,
            ..valid_product_form()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get("discount_percentage"), Some("discount_percentage is required"));
    }

    #[test]
    fn test_product_form_round_trips_existing_product() {
        let mut product = valid_product_form().into_product().unwrap();
        let mut form = ProductForm::from_product(&product);
        form.promo_active = true;
        form.discount_percentage = Some(15);
        form.has_public_discount = true;
        form.category_id = Some("  ".to_string());

        form.apply_to(&mut product).unwrap();
        assert!(product.has_public_promo());
        assert_eq!(product.discount_percentage, Some(15));
        assert_eq!(product.category_id, None);
    }

    #[test]
    fn test_category_form() {
        assert!(CategoryForm { name: "Accounts".to_string() }.into_category().is_ok());
        let errors = CategoryForm { name: " ".to_string() }.validate().unwrap_err();
        assert_eq!(errors.get("name"), Some("name is required"));
    }

    #[test]
    fn test_promo_code_form_normalizes() {
        let promo = PromoCodeForm {
            code: " spring_sale ".to_string(),
            discount_percentage: 30,
            product_id: Some(String::new()),
            is_active: true,
            expires_at: None,
        }
        .into_promo_code()
        .unwrap();

        assert_eq!(promo.code, "SPRING_SALE");
        assert_eq!(promo.discount_percentage, 30);
        assert_eq!(promo.product_id, None);
    }

    #[test]
    fn test_promo_code_form_rejects_zero_percent() {
        let form = PromoCodeForm {
            code: "FREE".to_string(),
            discount_percentage: 0,
            ..PromoCodeForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.get("discount_percentage").is_some());
    }

    #[test]
    fn test_user_form() {
        let form = UserForm {
            email: "nope".to_string(),
            display_name: String::new(),
            is_admin: true,
            is_escrow_agent: false,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.get("email").is_some());
        assert!(errors.get("display_name").is_some());
    }
}
