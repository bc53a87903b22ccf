use kedai_shared::{format_rupiah, Amount};
use serde::{Deserialize, Serialize};

/// A sellable product with its canonical unit price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Amount,
}

impl Product {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Amount) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }

    /// Label shown under the product name, e.g. `Rp 17.000`.
    pub fn price_label(&self) -> String {
        format_rupiah(self.price)
    }
}

/// Catalog-related errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    #[error("Duplicate shipping destination: {0}")]
    DuplicateDestination(String),

    #[error("Catalog is empty")]
    Empty,
}

/// The server-owned price list. Display order is the configured order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, product) in products.iter().enumerate() {
            if products[..i].iter().any(|p| p.id == product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}
