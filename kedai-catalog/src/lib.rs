pub mod product;
pub mod shipping;

pub use product::{Catalog, CatalogError, Product};
pub use shipping::{ShippingOption, ShippingTable};
