use crate::core::config::{ActionConfig, ConfigError};
use crate::core::event::ActionKind;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedAction {
    pub action: ActionKind,
    pub weight: f64,
}

/// Ordered action weights. Iteration order is the table order.
#[derive(Debug, Clone)]
pub struct ActionTable {
    entries: Vec<WeightedAction>,
}

impl ActionTable {
    /// Builds a table, rejecting negative or non-finite weights and random
    /// draws of LOGIN/LOGOUT.
    pub fn new(entries: Vec<WeightedAction>) -> Result<Self, ConfigError> {
        for entry in &entries {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "weight for {} must be a non-negative number, got {}",
                    entry.action, entry.weight
                )));
            }
            if entry.action.is_session_boundary() && entry.weight > 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} is injected explicitly and cannot have a selection weight",
                    entry.action
                )));
            }
        }
        if !entries.iter().any(|entry| entry.weight > 0.0) {
            return Err(ConfigError::Invalid(
                "action table needs at least one positive weight".to_string(),
            ));
        }
        Ok(Self { entries })
    }

    /// Weights shipped with the original generator. They sum to 1.75.
    pub fn reference() -> Self {
        let entries = reference_weights()
            .into_iter()
            .map(|(action, weight)| WeightedAction { action, weight })
            .collect();
        Self { entries }
    }

    /// Reference table with config overrides applied, normalized if requested.
    pub fn from_config(config: &ActionConfig) -> Result<Self, ConfigError> {
        let mut entries = Self::reference().entries;
        for (name, weight) in &config.weights {
            let action: ActionKind = name
                .parse()
                .map_err(|err| ConfigError::Invalid(format!("actions.weights: {err}")))?;
            if let Some(entry) = entries.iter_mut().find(|entry| entry.action == action) {
                entry.weight = *weight;
            }
        }
        let table = Self::new(entries)?;
        if config.normalize_weights {
            table.normalized()
        } else {
            Ok(table)
        }
    }

    /// Scales every weight so the table sums to 1.
    pub fn normalized(&self) -> Result<Self, ConfigError> {
        let total = self.total_weight();
        if !(total.is_finite() && total > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cannot normalize action weights summing to {total}"
            )));
        }
        let entries = self
            .entries
            .iter()
            .map(|entry| WeightedAction {
                action: entry.action,
                weight: entry.weight / total,
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|entry| entry.weight).sum()
    }

    pub fn entries(&self) -> &[WeightedAction] {
        &self.entries
    }
}

/// Draws intermediate session actions from an [`ActionTable`].
#[derive(Debug, Clone)]
pub struct ActionSelector {
    table: ActionTable,
    fallback: ActionKind,
}

impl ActionSelector {
    pub fn new(table: ActionTable) -> Self {
        // `ActionTable` guarantees at least one positive weight.
        let fallback = table
            .entries
            .iter()
            .rev()
            .find(|entry| entry.weight > 0.0)
            .map(|entry| entry.action)
            .unwrap_or(ActionKind::ViewProductList);
        Self { table, fallback }
    }

    pub fn select(&self, rng: &mut impl Rng) -> ActionKind {
        let draw: f64 = rng.gen();
        self.select_with(draw)
    }

    /// Returns the first action whose cumulative weight reaches `draw`.
    ///
    /// Zero-weight entries are skipped. When the cumulative sum never reaches
    /// `draw` the last weighted action wins.
    pub fn select_with(&self, draw: f64) -> ActionKind {
        let mut cumulative = 0.0;
        for entry in &self.table.entries {
            if entry.weight <= 0.0 {
                continue;
            }
            cumulative += entry.weight;
            if draw <= cumulative {
                return entry.action;
            }
        }
        self.fallback
    }
}

fn reference_weights() -> Vec<(ActionKind, f64)> {
    vec![
        (ActionKind::Login, 0.0),
        (ActionKind::ViewProductList, 0.3),
        (ActionKind::ViewProductDetails, 0.25),
        (ActionKind::AddProductToCart, 0.15),
        (ActionKind::ViewCart, 0.1),
        (ActionKind::UpdateCart, 0.05),
        (ActionKind::RemoveProductFromCart, 0.05),
        (ActionKind::Checkout, 0.15),
        (ActionKind::SearchProduct, 0.2),
        (ActionKind::ApplyFilter, 0.15),
        (ActionKind::ViewOrderHistory, 0.05),
        (ActionKind::ViewOrderDetails, 0.05),
        (ActionKind::RateProduct, 0.05),
        (ActionKind::AddProductReview, 0.05),
        (ActionKind::Logout, 0.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn table(weights: &[(ActionKind, f64)]) -> ActionTable {
        ActionTable::new(
            weights
                .iter()
                .map(|(action, weight)| WeightedAction {
                    action: *action,
                    weight: *weight,
                })
                .collect(),
        )
        .expect("table")
    }

    #[test]
    fn reference_weights_sum_past_one() {
        let table = ActionTable::reference();
        assert!((table.total_weight() - 1.75).abs() < 1e-9);
        assert_eq!(table.entries().len(), ActionKind::ALL.len());
        assert_eq!(table.entries()[0].action, ActionKind::Login);
        assert_eq!(table.entries()[14].action, ActionKind::Logout);
    }

    #[test]
    fn draw_near_one_picks_last_action() {
        let selector = ActionSelector::new(table(&[
            (ActionKind::ViewCart, 0.25),
            (ActionKind::Checkout, 0.25),
            (ActionKind::RateProduct, 0.5),
        ]));
        assert_eq!(selector.select_with(0.999_999), ActionKind::RateProduct);
    }

    #[test]
    fn zero_draw_picks_first_weighted_action() {
        let selector = ActionSelector::new(ActionTable::reference());
        assert_eq!(selector.select_with(0.0), ActionKind::ViewProductList);
    }

    #[test]
    fn short_table_falls_back_to_last_weighted_action() {
        let selector = ActionSelector::new(table(&[
            (ActionKind::Login, 0.0),
            (ActionKind::SearchProduct, 0.2),
            (ActionKind::ApplyFilter, 0.3),
            (ActionKind::Logout, 0.0),
        ]));
        assert_eq!(selector.select_with(0.9), ActionKind::ApplyFilter);
    }

    #[test]
    fn raw_reference_table_never_reaches_past_checkout() {
        let selector = ActionSelector::new(ActionTable::reference());
        assert_eq!(selector.select_with(0.99), ActionKind::Checkout);
    }

    #[test]
    fn normalized_reference_table_reaches_every_action() {
        let normalized = ActionTable::reference().normalized().expect("normalize");
        assert!((normalized.total_weight() - 1.0).abs() < 1e-9);
        let selector = ActionSelector::new(normalized);
        assert_eq!(selector.select_with(0.99), ActionKind::AddProductReview);
    }

    #[test]
    fn random_draws_exclude_session_boundaries() {
        let normalized = ActionTable::reference().normalized().expect("normalize");
        let selector = ActionSelector::new(normalized);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2_000 {
            assert!(!selector.select(&mut rng).is_session_boundary());
        }
    }

    #[test]
    fn config_overrides_replace_weights() {
        let mut weights = BTreeMap::new();
        weights.insert("VIEW_PRODUCT_LIST".to_string(), 0.0);
        weights.insert("view_product_details".to_string(), 1.0);
        let config = ActionConfig {
            normalize_weights: false,
            weights,
        };
        let table = ActionTable::from_config(&config).expect("table");
        let selector = ActionSelector::new(table);
        assert_eq!(selector.select_with(0.0), ActionKind::ViewProductDetails);
    }

    #[test]
    fn config_rejects_bad_overrides() {
        let mut config = ActionConfig::default();
        config.weights.insert("LOGOUT".to_string(), 0.1);
        assert!(ActionTable::from_config(&config).is_err());

        let mut config = ActionConfig::default();
        config.weights.insert("TELEPORT".to_string(), 0.1);
        assert!(ActionTable::from_config(&config).is_err());

        let mut config = ActionConfig::default();
        config.weights.insert("CHECKOUT".to_string(), -1.0);
        assert!(ActionTable::from_config(&config).is_err());
    }
}
