//! View-model conversion
//!
//! Wire shapes for the storefront frontend. Field names follow the existing
//! frontend contract (`contenants`, `conteningId`, `expires_at` on cart
//! items) and are kept stable here.

use std::collections::HashMap;

use serde::Serialize;
use shared::models::{Order, OrderLineDetail, PackageSize, Recipe, ReservationDetail, StockLevel};

/// One package size of a beer, with live availability and derived price
#[derive(Debug, Clone, Serialize)]
pub struct ContenantView {
    pub id: i64,
    pub volume: i64,
    pub stock: i64,
    pub price: f64,
}

/// Catalog entry for `GET /beers`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeerView {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub description: Option<String>,
    pub base_price: f64,
    pub image_url: String,
    pub contenants: Vec<ContenantView>,
    pub in_stock: bool,
}

/// Assemble the catalog: every recipe crossed with every package size,
/// availability filled in from the ledger snapshot
pub fn beer_views(
    recipes: Vec<Recipe>,
    packages: &[PackageSize],
    levels: &[StockLevel],
    asset_base_url: &str,
) -> Vec<BeerView> {
    let stock: HashMap<(i64, i64), i64> = levels
        .iter()
        .map(|l| ((l.recipe_id, l.package_size_id), l.available))
        .collect();

    recipes
        .into_iter()
        .map(|recipe| {
            let contenants: Vec<ContenantView> = packages
                .iter()
                .map(|pkg| ContenantView {
                    id: pkg.id,
                    volume: pkg.volume_ml,
                    stock: stock.get(&(recipe.id, pkg.id)).copied().unwrap_or(0),
                    price: pkg.unit_price(recipe.base_price),
                })
                .collect();
            let in_stock = contenants.iter().any(|c| c.stock > 0);
            BeerView {
                image_url: format!("{}/beers/{}.png", asset_base_url, recipe.id),
                id: recipe.id,
                name: recipe.name,
                color: recipe.color,
                description: recipe.description,
                base_price: recipe.base_price,
                contenants,
                in_stock,
            }
        })
        .collect()
}

/// One active hold as seen by the cart page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: i64,
    pub client_id: String,
    pub recipe_id: i64,
    pub recipe_name: String,
    #[serde(rename = "conteningId")]
    pub contening_id: i64,
    pub volume: i64,
    pub quantity: i64,
    pub price: f64,
    // The frontend reads this one in snake_case
    #[serde(rename = "expires_at")]
    pub expires_at: i64,
}

impl From<ReservationDetail> for CartItemView {
    fn from(d: ReservationDetail) -> Self {
        Self {
            id: d.id,
            client_id: d.client_id,
            recipe_id: d.recipe_id,
            recipe_name: d.recipe_name,
            contening_id: d.package_size_id,
            volume: d.volume_ml,
            quantity: d.quantity,
            price: d.price,
            expires_at: d.expires_at,
        }
    }
}

/// One allocated line of an order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub id: i64,
    pub batch_id: i64,
    pub recipe_id: i64,
    pub recipe_name: String,
    #[serde(rename = "conteningId")]
    pub contening_id: i64,
    pub volume: i64,
    pub quantity: i64,
    pub price: f64,
}

impl From<OrderLineDetail> for OrderItemView {
    fn from(l: OrderLineDetail) -> Self {
        Self {
            id: l.id,
            batch_id: l.batch_id,
            recipe_id: l.recipe_id,
            recipe_name: l.recipe_name,
            contening_id: l.package_size_id,
            volume: l.volume_ml,
            quantity: l.quantity,
            price: l.price,
        }
    }
}

/// Order with its lines for order retrieval endpoints
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: i64,
    pub client_id: String,
    pub amount: f64,
    pub status: shared::models::OrderStatus,
    pub created_at: i64,
    pub items: Vec<OrderItemView>,
}

impl OrderView {
    pub fn from_parts(order: Order, lines: Vec<OrderLineDetail>) -> Self {
        Self {
            id: order.id,
            client_id: order.client_id,
            amount: order.amount,
            status: order.status,
            created_at: order.created_at,
            items: lines.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beer_view_marks_in_stock_from_any_package() {
        let recipes = vec![Recipe {
            id: 1,
            name: "Blonde".into(),
            color: "gold".into(),
            description: None,
            base_price: 4.5,
            created_at: 0,
        }];
        let packages = vec![
            PackageSize {
                id: 10,
                volume_ml: 330,
            },
            PackageSize {
                id: 20,
                volume_ml: 750,
            },
        ];
        let levels = vec![StockLevel {
            recipe_id: 1,
            package_size_id: 20,
            available: 3,
        }];

        let views = beer_views(recipes, &packages, &levels, "/assets");
        assert_eq!(views.len(), 1);
        assert!(views[0].in_stock);
        assert_eq!(views[0].image_url, "/assets/beers/1.png");
        assert_eq!(views[0].contenants[0].stock, 0);
        assert_eq!(views[0].contenants[1].stock, 3);
        assert_eq!(views[0].contenants[1].price, 10.23);
    }

    #[test]
    fn cart_item_uses_frontend_field_names() {
        let view = CartItemView {
            id: 1,
            client_id: "c1".into(),
            recipe_id: 2,
            recipe_name: "Stout".into(),
            contening_id: 10,
            volume: 330,
            quantity: 2,
            price: 4.5,
            expires_at: 99,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("conteningId").is_some());
        assert!(json.get("expires_at").is_some());
        assert!(json.get("expiresAt").is_none());
    }
}
