//! # Pricing
//!
//! Effective unit prices for products.
//!
//! ## Discount Gating
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  promo_active  has_public_discount   promo code entered   unit price    │
//! │  ────────────  ───────────────────   ──────────────────   ──────────    │
//! │  false         any                   no                   price         │
//! │  true          true                  any                  price - d%    │
//! │  true          false                 no                   price         │
//! │  any           false                 yes, applies         price - c%    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! A public discount and a promo code never stack; the public discount wins.

use chrono::{DateTime, Utc};

use crate::money::Money;
use crate::types::{Product, PromoCode};

/// Unit price a shopper pays for `product` without entering any code.
///
/// The product's discount is applied only when it is both active and public.
/// A missing percentage counts as no discount.
///
/// ```rust
/// use storefront_core::{effective_price, Money, Product};
///
/// let mut product = Product::new("Headphones", Money::from_cents(10_000));
/// assert_eq!(effective_price(&product).cents(), 10_000);
///
/// product.promo_active = true;
/// product.has_public_discount = true;
/// product.discount_percentage = Some(20);
/// assert_eq!(effective_price(&product).cents(), 8_000);
/// ```
pub fn effective_price(product: &Product) -> Money {
    if !(product.promo_active && product.has_public_discount) {
        return product.price;
    }
    match product.discount_percentage {
        Some(percent) => product.price.apply_percentage_discount(percent),
        None => product.price,
    }
}

/// Unit price when the shopper has entered `promo`.
///
/// Falls back to [`effective_price`] when there is no code, the code cannot
/// be redeemed at `now`, it targets another product, or the product already
/// carries a public discount.
pub fn promo_price(product: &Product, promo: Option<&PromoCode>, now: DateTime<Utc>) -> Money {
    let public = effective_price(product);
    let Some(promo) = promo else {
        return public;
    };

    if product.has_public_promo() || promo.check(now).is_err() || !promo.applies_to(&product.id) {
        return public;
    }

    product.price.apply_percentage_discount(promo.discount_percentage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::new_id;
    use chrono::Duration;

    fn product(price_cents: i64, promo_active: bool, pct: Option<u8>, public: bool) -> Product {
        let mut p = Product::new("Test", Money::from_cents(price_cents));
        p.promo_active = promo_active;
        p.discount_percentage = pct;
        p.has_public_discount = public;
        p
    }

    fn code(pct: u8, product_id: Option<&str>) -> PromoCode {
        let now = Utc::now();
        PromoCode {
            id: new_id(),
            code: "TENOFF".to_string(),
            discount_percentage: pct,
            product_id: product_id.map(str::to_string),
            is_active: true,
            expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn inactive_promo_keeps_base_price() {
        for pct in [None, Some(0), Some(20), Some(100)] {
            for public in [false, true] {
                let p = product(1234, false, pct, public);
                assert_eq!(effective_price(&p), p.price);
            }
        }
    }

    #[test]
    fn public_promo_applies_percentage() {
        for (price, pct, expected) in [(10_000, 20, 8_000), (1_000, 0, 1_000), (999, 100, 0), (2_500, 50, 1_250)] {
            let p = product(price, true, Some(pct), true);
            assert_eq!(effective_price(&p).cents(), expected);
        }
    }

    #[test]
    fn hundred_at_twenty_percent_is_eighty() {
        let p = product(10_000, true, Some(20), true);
        assert_eq!(effective_price(&p), Money::from_cents(8_000));
    }

    #[test]
    fn non_public_promo_needs_a_code() {
        let p = product(10_000, true, Some(20), false);
        assert_eq!(effective_price(&p).cents(), 10_000);
    }

    #[test]
    fn missing_percentage_is_no_discount() {
        let p = product(10_000, true, None, true);
        assert_eq!(effective_price(&p).cents(), 10_000);
    }

    #[test]
    fn promo_code_discounts_matching_product() {
        let now = Utc::now();
        let p = product(10_000, true, Some(20), false);

        let targeted = code(10, Some(&p.id));
        assert_eq!(promo_price(&p, Some(&targeted), now).cents(), 9_000);

        let other = code(10, Some("someone-else"));
        assert_eq!(promo_price(&p, Some(&other), now).cents(), 10_000);

        let cart_wide = code(25, None);
        assert_eq!(promo_price(&p, Some(&cart_wide), now).cents(), 7_500);
    }

    #[test]
    fn public_discount_wins_over_code() {
        let now = Utc::now();
        let p = product(10_000, true, Some(20), true);
        assert_eq!(promo_price(&p, Some(&code(50, None)), now).cents(), 8_000);
    }

    #[test]
    fn expired_code_is_ignored() {
        let now = Utc::now();
        let p = product(10_000, false, None, false);
        let mut expired = code(10, None);
        expired.expires_at = Some(now - Duration::hours(1));

        assert_eq!(promo_price(&p, Some(&expired), now).cents(), 10_000);
        assert_eq!(promo_price(&p, None, now).cents(), 10_000);
    }
}
