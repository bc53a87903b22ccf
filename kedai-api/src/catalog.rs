use axum::{extract::State, routing::get, Json, Router};
use kedai_shared::CURRENCY;
use serde::Serialize;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub currency: &'static str,
    pub products: Vec<ProductResponse>,
    pub shipping: Vec<ShippingOptionResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
    pub price_label: String,
}

#[derive(Debug, Serialize)]
pub struct ShippingOptionResponse {
    pub destination: String,
    pub cost: u64,
    pub label: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/catalog", get(get_catalog))
}

/// GET /catalog
/// Products with zero quantities plus the shipping options, in display order
async fn get_catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let products = state
        .engine
        .catalog()
        .products()
        .iter()
        .map(|p| ProductResponse {
            id: p.id.clone(),
            name: p.name.clone(),
            price: p.price,
            quantity: 0,
            price_label: p.price_label(),
        })
        .collect();

    let shipping = state
        .engine
        .shipping()
        .options()
        .iter()
        .map(|o| ShippingOptionResponse {
            destination: o.destination.clone(),
            cost: o.cost,
            label: o.label(),
        })
        .collect();

    Json(CatalogResponse {
        currency: CURRENCY,
        products,
        shipping,
    })
}
