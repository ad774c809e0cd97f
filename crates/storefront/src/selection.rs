//! Which cart lines are marked for checkout.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use swiftthrift_core::{CartItem, CartItemId};

/// In-memory checkout selection over the loaded cart lines.
///
/// Never touches the backend. The selected ids are always a subset of the
/// loaded items: replacing the items drops ids that no longer exist, and
/// toggling an unknown id does nothing.
#[derive(Debug, Clone, Default)]
pub struct SelectionLedger {
    items: Vec<CartItem>,
    selected: BTreeSet<CartItemId>,
}

impl SelectionLedger {
    /// A ledger over `items` with nothing selected.
    #[must_use]
    pub fn new(items: Vec<CartItem>) -> Self {
        Self {
            items,
            selected: BTreeSet::new(),
        }
    }

    /// Swap in a freshly loaded item list, keeping selections that still
    /// exist.
    pub fn replace_items(&mut self, items: Vec<CartItem>) {
        self.items = items;
        let known: BTreeSet<CartItemId> = self.items.iter().map(|i| i.cart_item_id).collect();
        self.selected.retain(|id| known.contains(id));
    }

    /// Flip one item in or out of the selection.
    ///
    /// Returns whether the item is selected afterwards.
    pub fn toggle(&mut self, id: CartItemId) -> bool {
        if !self.contains_item(id) {
            return false;
        }
        if self.selected.remove(&id) {
            false
        } else {
            self.selected.insert(id);
            true
        }
    }

    /// Toggle-all: clears when everything is selected, selects everything
    /// otherwise.
    pub fn select_all(&mut self) {
        if self.is_all_selected() {
            self.selected.clear();
        } else {
            self.selected = self.items.iter().map(|i| i.cart_item_id).collect();
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Sum of the selected lines' prices, zero when nothing is selected.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.selected_items().map(|item| item.price).sum()
    }

    /// Selected lines, in cart order.
    pub fn selected_items(&self) -> impl Iterator<Item = &CartItem> {
        self.items
            .iter()
            .filter(|item| self.selected.contains(&item.cart_item_id))
    }

    #[must_use]
    pub fn is_selected(&self, id: CartItemId) -> bool {
        self.selected.contains(&id)
    }

    /// Whether every loaded item is selected. False for an empty cart.
    #[must_use]
    pub fn is_all_selected(&self) -> bool {
        !self.items.is_empty() && self.selected.len() == self.items.len()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of selected items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    fn contains_item(&self, id: CartItemId) -> bool {
        self.items.iter().any(|item| item.cart_item_id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use swiftthrift_core::{CartId, ProductId};

    fn item(id: i64, cents: i64) -> CartItem {
        CartItem {
            cart_item_id: CartItemId::new(id),
            cart_id: CartId::new(1),
            product_id: ProductId::new(id),
            price: Decimal::new(cents, 2),
            product_name: None,
        }
    }

    fn ledger() -> SelectionLedger {
        SelectionLedger::new(vec![item(1, 15_000), item(2, 19_999), item(3, 10)])
    }

    #[test]
    fn test_toggle_flips_membership() {
        let mut ledger = ledger();
        assert!(ledger.toggle(CartItemId::new(2)));
        assert!(ledger.is_selected(CartItemId::new(2)));
        assert!(!ledger.toggle(CartItemId::new(2)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_toggle_unknown_id_is_ignored() {
        let mut ledger = ledger();
        assert!(!ledger.toggle(CartItemId::new(99)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_total() {
        let mut ledger = ledger();
        assert_eq!(ledger.total(), Decimal::ZERO);
        ledger.toggle(CartItemId::new(1));
        ledger.toggle(CartItemId::new(3));
        assert_eq!(ledger.total(), Decimal::new(15_010, 2));
    }

    #[test]
    fn test_select_all_toggles() {
        let mut ledger = ledger();
        ledger.toggle(CartItemId::new(1));
        ledger.select_all();
        assert_eq!(ledger.len(), 3);
        assert!(ledger.is_all_selected());
        ledger.select_all();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_select_all_on_empty_cart_stays_empty() {
        let mut ledger = SelectionLedger::default();
        ledger.select_all();
        assert!(ledger.is_empty());
        assert!(!ledger.is_all_selected());
    }

    #[test]
    fn test_replace_items_prunes_stale_ids() {
        let mut ledger = ledger();
        ledger.select_all();
        ledger.replace_items(vec![item(2, 19_999), item(4, 500)]);
        assert_eq!(ledger.len(), 1);
        assert!(ledger.is_selected(CartItemId::new(2)));
        assert!(!ledger.is_selected(CartItemId::new(1)));
        assert_eq!(ledger.total(), Decimal::new(19_999, 2));
    }

    #[test]
    fn test_clear() {
        let mut ledger = ledger();
        ledger.select_all();
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.items().len(), 3);
    }

    fn items_strategy() -> impl Strategy<Value = Vec<CartItem>> {
        prop::collection::vec(0_i64..=1_000_000_000, 1..20).prop_map(|prices| {
            prices
                .into_iter()
                .enumerate()
                .map(|(i, cents)| item(i64::try_from(i).unwrap() + 1, cents))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_total_is_sum_of_selected(
            items in items_strategy(),
            picks in prop::collection::vec(any::<bool>(), 20),
        ) {
            let mut ledger = SelectionLedger::new(items.clone());
            let mut expected = Decimal::ZERO;
            for (item, pick) in items.iter().zip(picks) {
                if pick {
                    ledger.toggle(item.cart_item_id);
                    expected += item.price;
                }
            }
            prop_assert_eq!(ledger.total(), expected);
        }

        #[test]
        fn prop_select_all_from_partial_selects_everything_once(
            items in items_strategy(),
            picks in prop::collection::vec(any::<bool>(), 20),
        ) {
            let mut ledger = SelectionLedger::new(items.clone());
            for (item, pick) in items.iter().zip(picks) {
                if pick {
                    ledger.toggle(item.cart_item_id);
                }
            }
            let was_full = ledger.is_all_selected();
            ledger.select_all();
            if was_full {
                prop_assert!(ledger.is_empty());
            } else {
                prop_assert_eq!(ledger.len(), items.len());
                let total: Decimal = items.iter().map(|i| i.price).sum();
                prop_assert_eq!(ledger.total(), total);
            }
        }

        #[test]
        fn prop_selection_stays_subset_after_replace(
            items in items_strategy(),
            keep in 0_usize..20,
        ) {
            let mut ledger = SelectionLedger::new(items.clone());
            ledger.select_all();
            let kept: Vec<CartItem> = items.into_iter().take(keep).collect();
            ledger.replace_items(kept.clone());
            prop_assert_eq!(ledger.len(), kept.len());
            prop_assert!(ledger.selected_items().count() == ledger.len());
        }
    }
}
