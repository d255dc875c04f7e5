use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of user interaction recorded in a session event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Login,
    ViewProductList,
    ViewProductDetails,
    AddProductToCart,
    ViewCart,
    UpdateCart,
    RemoveProductFromCart,
    Checkout,
    SearchProduct,
    ApplyFilter,
    ViewOrderHistory,
    ViewOrderDetails,
    RateProduct,
    AddProductReview,
    Logout,
}

impl ActionKind {
    /// Every action kind in declaration order.
    pub const ALL: [ActionKind; 15] = [
        ActionKind::Login,
        ActionKind::ViewProductList,
        ActionKind::ViewProductDetails,
        ActionKind::AddProductToCart,
        ActionKind::ViewCart,
        ActionKind::UpdateCart,
        ActionKind::RemoveProductFromCart,
        ActionKind::Checkout,
        ActionKind::SearchProduct,
        ActionKind::ApplyFilter,
        ActionKind::ViewOrderHistory,
        ActionKind::ViewOrderDetails,
        ActionKind::RateProduct,
        ActionKind::AddProductReview,
        ActionKind::Logout,
    ];

    /// Wire name used in JSON, CSV and config keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Login => "LOGIN",
            ActionKind::ViewProductList => "VIEW_PRODUCT_LIST",
            ActionKind::ViewProductDetails => "VIEW_PRODUCT_DETAILS",
            ActionKind::AddProductToCart => "ADD_PRODUCT_TO_CART",
            ActionKind::ViewCart => "VIEW_CART",
            ActionKind::UpdateCart => "UPDATE_CART",
            ActionKind::RemoveProductFromCart => "REMOVE_PRODUCT_FROM_CART",
            ActionKind::Checkout => "CHECKOUT",
            ActionKind::SearchProduct => "SEARCH_PRODUCT",
            ActionKind::ApplyFilter => "APPLY_FILTER",
            ActionKind::ViewOrderHistory => "VIEW_ORDER_HISTORY",
            ActionKind::ViewOrderDetails => "VIEW_ORDER_DETAILS",
            ActionKind::RateProduct => "RATE_PRODUCT",
            ActionKind::AddProductReview => "ADD_PRODUCT_REVIEW",
            ActionKind::Logout => "LOGOUT",
        }
    }

    /// LOGIN and LOGOUT bracket a session and are never drawn at random.
    pub fn is_session_boundary(&self) -> bool {
        matches!(self, ActionKind::Login | ActionKind::Logout)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for ActionKind {
    type Err = UnknownAction;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        ActionKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| UnknownAction(value.to_string()))
    }
}

/// One timestamped action taken by a simulated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEvent {
    pub user_id: u64,
    pub user_name: String,
    pub session_id: u64,
    pub action_name: ActionKind,
    /// Event timestamp (ISO-8601, millisecond precision, UTC).
    pub action_time: String,
}

/// Formats a timestamp the way every event carries it, e.g. `2024-01-01T00:00:00.000Z`.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn event_serializes_with_camel_case_keys() {
        let event = SessionEvent {
            user_id: 1,
            user_name: "Ada Lovelace".to_string(),
            session_id: 10001,
            action_name: ActionKind::AddProductToCart,
            action_time: "2024-01-01T00:00:00.000Z".to_string(),
        };
        let value = serde_json::to_value(&event).expect("serialize");
        assert_eq!(value["userId"], 1);
        assert_eq!(value["userName"], "Ada Lovelace");
        assert_eq!(value["sessionId"], 10001);
        assert_eq!(value["actionName"], "ADD_PRODUCT_TO_CART");
        assert_eq!(value["actionTime"], "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn action_names_parse_back() {
        for kind in ActionKind::ALL {
            assert_eq!(kind.as_str().parse::<ActionKind>(), Ok(kind));
            let json = serde_json::to_string(&kind).expect("serialize");
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
        assert_eq!("view_cart".parse::<ActionKind>(), Ok(ActionKind::ViewCart));
        assert!("DANCE".parse::<ActionKind>().is_err());
    }

    #[test]
    fn timestamps_use_millis_and_z_suffix() {
        let time = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(format_timestamp(time), "2024-03-09T14:05:07.000Z");
    }
}
