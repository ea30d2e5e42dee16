//! Push-channel message types
//!
//! Shared between the server and connected observers for in-process
//! (memory) and network (TCP) delivery. Messages serialize as
//! `{"type": "...", "data": ...}` envelopes.

use crate::models::{OrderStatus, StockLevel};
use serde::{Deserialize, Serialize};

/// A broadcast event, pushed to every connected observer after the
/// transaction that produced the change has committed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum BusMessage {
    /// Full current availability table
    #[serde(rename = "STOCK_UPDATE")]
    StockUpdate(Vec<StockLevel>),
    /// Aggregate storefront statistics
    #[serde(rename = "STATS_UPDATE")]
    StatsUpdate(StatsPayload),
    /// An order was created or changed status
    #[serde(rename = "ORDER_UPDATE")]
    OrderUpdate(OrderEventPayload),
}

impl BusMessage {
    /// Event name as it appears on the wire, for logging
    pub fn event_name(&self) -> &'static str {
        match self {
            BusMessage::StockUpdate(_) => "STOCK_UPDATE",
            BusMessage::StatsUpdate(_) => "STATS_UPDATE",
            BusMessage::OrderUpdate(_) => "ORDER_UPDATE",
        }
    }
}

/// Aggregate counts pushed on `STATS_UPDATE`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsPayload {
    /// Distinct recipes in the catalog
    pub recipe_count: i64,
    /// Total liters ever produced (`Σ initial_quantity × volume`)
    pub total_liters_produced: f64,
    /// Total orders ever created
    pub order_count: i64,
}

/// Order change notification pushed on `ORDER_UPDATE`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderEventPayload {
    pub order_id: i64,
    pub client_id: String,
    pub status: OrderStatus,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_use_the_type_data_envelope() {
        let msg = BusMessage::StockUpdate(vec![StockLevel {
            recipe_id: 1,
            package_size_id: 2,
            available: 7,
        }]);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "STOCK_UPDATE");
        assert_eq!(json["data"][0]["recipeId"], 1);
        assert_eq!(json["data"][0]["available"], 7);
    }

    // Every payload must compare by value; bus delivery tests rely on it
    #[test]
    fn stock_update_compares_by_value() {
        let msg = BusMessage::StockUpdate(vec![StockLevel {
            recipe_id: 1,
            package_size_id: 2,
            available: 7,
        }]);
        assert_eq!(msg, msg.clone());
    }
}
