//! # Product Types
//!
//! Product catalog types for market-cart.
//! Demo catalogs are loaded from `config/products.toml`.

use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// Central African CFA franc (FCFA) — the storefront default
    XAF,
    USD,
    EUR,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::XAF => "xaf",
            Currency::USD => "usd",
            Currency::EUR => "eur",
        }
    }

    /// Returns the number of decimal places for this currency
    /// (XAF has 0 decimals, the others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::XAF => 0,
            _ => 2,
        }
    }

    /// Convert a decimal amount to the smallest currency unit
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        let multiplier = 10_f64.powi(self.decimal_places() as i32);
        (amount * multiplier).round() as i64
    }

    /// Convert from smallest unit back to decimal
    pub fn from_smallest_unit(&self, amount: i64) -> f64 {
        let divisor = 10_f64.powi(self.decimal_places() as i32);
        amount as f64 / divisor
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::XAF
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (whole francs for XAF)
    pub amount: i64,
    /// Currency
    #[serde(default)]
    pub currency: Currency,
}

impl Price {
    /// Create a new price from a decimal amount
    pub fn new(amount: f64, currency: Currency) -> Self {
        Self {
            amount: currency.to_smallest_unit(amount),
            currency,
        }
    }

    /// Create a price from the smallest unit
    pub fn from_minor(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.currency.from_smallest_unit(self.amount)
    }

    /// Format for display (e.g., "15000 FCFA", "$15.00")
    pub fn display(&self) -> String {
        match self.currency {
            Currency::XAF => format!("{} FCFA", self.amount),
            Currency::USD => format!("${:.2}", self.as_decimal()),
            Currency::EUR => format!("€{:.2}", self.as_decimal()),
        }
    }
}

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductCategory {
    Smartphone,
    Tablet,
    Smartwatch,
    Laptop,
    Accessory,
    Other,
}

impl Default for ProductCategory {
    fn default() -> Self {
        ProductCategory::Other
    }
}

/// Physical condition of a second-hand listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Poor,
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Good
    }
}

/// Product image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// A product in the catalog.
///
/// The cart copies this struct wholesale into its line items, so it
/// doubles as the add-time snapshot: later catalog edits do not change
/// what a buyer already has in their cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Short description
    #[serde(default)]
    pub description: String,

    /// Category
    #[serde(default)]
    pub category: ProductCategory,

    /// Brand (e.g., "Samsung", "Apple")
    #[serde(default)]
    pub brand: String,

    /// Condition of the listing
    #[serde(default)]
    pub condition: Condition,

    /// Price snapshot
    pub price: Price,

    /// Pre-discount price, if the listing is discounted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,

    /// Product images
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ProductImage>,

    /// Units in stock (stock enforcement is a backend concern)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,

    /// Whether this product is active and available for purchase
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Create a new product with required fields
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: ProductCategory::Other,
            brand: String::new(),
            condition: Condition::Good,
            price,
            original_price: None,
            images: Vec::new(),
            stock: None,
            active: true,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set category
    pub fn with_category(mut self, category: ProductCategory) -> Self {
        self.category = category;
        self
    }

    /// Builder: set brand
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    /// Builder: add an image
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(ProductImage {
            url: url.into(),
            alt: String::new(),
            is_primary: self.images.is_empty(),
        });
        self
    }

    /// Builder: set stock
    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Discount percentage against the original price, if any
    pub fn discount_percentage(&self) -> Option<u8> {
        let original = self.original_price.as_ref()?;
        if original.amount <= self.price.amount || original.amount == 0 {
            return None;
        }
        let pct = (original.amount - self.price.amount) * 100 / original.amount;
        Some(pct as u8)
    }
}

/// Product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<Product>,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    /// Add a product to the catalog
    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Get all active products
    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_conversion() {
        let xaf = Currency::XAF;
        assert_eq!(xaf.to_smallest_unit(1500.0), 1500);
        assert_eq!(xaf.from_smallest_unit(1500), 1500.0);

        let usd = Currency::USD;
        assert_eq!(usd.to_smallest_unit(10.99), 1099);
        assert_eq!(usd.from_smallest_unit(1099), 10.99);
    }

    #[test]
    fn test_price_display() {
        let price = Price::from_minor(85_000, Currency::XAF);
        assert_eq!(price.display(), "85000 FCFA");

        let usd = Price::new(29.99, Currency::USD);
        assert_eq!(usd.display(), "$29.99");
    }

    #[test]
    fn test_product_builder() {
        let product = Product::new(
            "galaxy-s22",
            "Galaxy S22",
            Price::from_minor(250_000, Currency::XAF),
        )
        .with_brand("Samsung")
        .with_category(ProductCategory::Smartphone)
        .with_image("https://example.com/s22.jpg")
        .with_stock(3);

        assert_eq!(product.id, "galaxy-s22");
        assert_eq!(product.brand, "Samsung");
        assert_eq!(product.stock, Some(3));
        assert!(product.images[0].is_primary);
        assert!(product.active);
    }

    #[test]
    fn test_discount_percentage() {
        let mut product = Product::new(
            "p1",
            "Phone",
            Price::from_minor(80_000, Currency::XAF),
        );
        assert_eq!(product.discount_percentage(), None);

        product.original_price = Some(Price::from_minor(100_000, Currency::XAF));
        assert_eq!(product.discount_percentage(), Some(20));
    }

    #[test]
    fn test_catalog_from_toml() {
        let toml_str = r#"
            [[products]]
            id = "pixel-7"
            name = "Pixel 7"
            brand = "Google"
            category = "smartphone"
            condition = "very-good"
            price = { amount = 180000, currency = "xaf" }
        "#;

        let catalog = ProductCatalog::from_toml(toml_str).unwrap();
        let product = catalog.get("pixel-7").unwrap();
        assert_eq!(product.brand, "Google");
        assert_eq!(product.condition, Condition::VeryGood);
        assert_eq!(product.price.amount, 180_000);
        assert_eq!(catalog.active_products().count(), 1);
    }
}
