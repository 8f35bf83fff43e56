//! # Product Catalog
//!
//! Juice and smoothie products offered by marketplace sellers.
//! Products are loaded from `config/products.toml`.

use serde::{Deserialize, Serialize};

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Juice,
    Smoothie,
    Detox,
    Pack,
}

impl Default for Category {
    fn default() -> Self {
        Category::Juice
    }
}

/// A product in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier (e.g., "ananas-gingembre-50cl")
    pub id: String,

    /// Display name
    pub name: String,

    /// Seller storefront the product belongs to
    pub seller: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub category: Category,

    /// Unit price in francs CFA
    pub price: i64,

    /// Whether this product is available for purchase
    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        seller: impl Into<String>,
        price: i64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            seller: seller.into(),
            description: String::new(),
            category: Category::Juice,
            price,
            active: true,
            image_url: None,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set category
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Builder: set image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Builder: mark as unavailable
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Product catalog (loaded from config)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCatalog {
    pub products: Vec<Product>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self {
            products: Vec::new(),
        }
    }

    pub fn add(&mut self, product: Product) {
        self.products.push(product);
    }

    /// Builder: add a product
    pub fn with_product(mut self, product: Product) -> Self {
        self.add(product);
        self
    }

    /// Find a product by ID
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn active_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.active)
    }

    /// Active products of one seller storefront
    pub fn products_for_seller<'a>(&'a self, seller: &'a str) -> impl Iterator<Item = &'a Product> {
        self.active_products().filter(move |p| p.seller == seller)
    }

    /// Load catalog from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}
