/// Item quantities, coin wallet and shop purchases.
///
/// Quantities never go negative: a purchase or use that cannot be covered
/// returns `false` and leaves the inventory unchanged.
use std::collections::BTreeMap;

use log::{debug, warn};

use crate::game::catalog::{find_item, items_in, ItemCategory, ItemSpec, STARTER_ITEMS};
use crate::game::errors::PetError;
use crate::game::storage::PetStore;
use crate::game::types::Inventory;

impl Inventory {
    /// Starter items, no coins.
    pub fn starter() -> Self {
        let items = STARTER_ITEMS
            .iter()
            .map(|(id, qty)| (id.to_string(), *qty))
            .collect();
        Self { items, coins: 0 }
    }

    pub fn reset(&mut self) {
        *self = Self::starter();
    }

    pub fn quantity(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    pub fn can_afford(&self, price: u32) -> bool {
        self.coins >= price
    }

    pub fn spend_coins(&mut self, amount: u32) -> bool {
        if !self.can_afford(amount) {
            return false;
        }
        self.coins -= amount;
        true
    }

    pub fn add_item(&mut self, item_id: &str, qty: u32) {
        let entry = self.items.entry(item_id.to_string()).or_insert(0);
        *entry = entry.saturating_add(qty);
    }

    /// Buy `qty` of `item`. Refused when the total price is not covered.
    pub fn buy_item(&mut self, item: &ItemSpec, qty: u32) -> bool {
        if qty == 0 {
            return false;
        }
        let Some(total) = item.price.checked_mul(qty) else {
            return false;
        };
        if !self.spend_coins(total) {
            debug!("cannot afford {} x{} ({} coins)", item.id, qty, total);
            return false;
        }
        self.add_item(item.id, qty);
        true
    }

    /// Consume `qty` of an owned item. Emptied entries are dropped.
    pub fn use_item(&mut self, item_id: &str, qty: u32) -> bool {
        let owned = self.quantity(item_id);
        if qty == 0 || owned < qty {
            return false;
        }
        if owned == qty {
            self.items.remove(item_id);
        } else {
            self.items.insert(item_id.to_string(), owned - qty);
        }
        true
    }
}

/// Load a user's inventory, falling back to the starter set when no entry
/// exists. Unknown item ids are kept under their canonical catalog id when
/// one matches, and dropped otherwise.
pub fn load_inventory(store: &PetStore, user_id: &str) -> Result<Inventory, PetError> {
    let coins = store.get_coins(user_id)?.unwrap_or(0);
    let Some(raw_items) = store.get_inventory_items(user_id)? else {
        let mut inv = Inventory::starter();
        inv.coins = coins;
        return Ok(inv);
    };

    let mut items = BTreeMap::new();
    for (id, qty) in raw_items {
        match find_item(&id) {
            Some(spec) => {
                if qty > 0 {
                    let held = items.entry(spec.id.to_string()).or_insert(0u32);
                    *held = held.saturating_add(qty);
                }
            }
            None => warn!("dropping unknown inventory item {} for {}", id, user_id),
        }
    }
    Ok(Inventory { items, coins })
}

pub fn save_inventory(
    store: &PetStore,
    user_id: &str,
    inventory: &Inventory,
) -> Result<(), PetError> {
    store.put_inventory_items(user_id, &inventory.items)?;
    store.put_coins(user_id, inventory.coins)
}

/// One row of the shop listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopEntry {
    pub item: &'static ItemSpec,
    pub owned: u32,
    pub affordable: bool,
}

pub fn shop_listing(inventory: &Inventory) -> Vec<(ItemCategory, Vec<ShopEntry>)> {
    [ItemCategory::Food, ItemCategory::Medicine]
        .into_iter()
        .map(|category| {
            let rows = items_in(category)
                .iter()
                .map(|item| ShopEntry {
                    item,
                    owned: inventory.quantity(item.id),
                    affordable: inventory.can_afford(item.price),
                })
                .collect();
            (category, rows)
        })
        .collect()
}

/// Render the shop as text lines.
pub fn format_shop(inventory: &Inventory) -> Vec<String> {
    let mut lines = vec![format!("=== SHOP === ({} coins)", inventory.coins)];
    for (category, rows) in shop_listing(inventory) {
        lines.push(format!("-- {} --", category.label()));
        for row in rows {
            let e = row.item.effect;
            lines.push(format!(
                "{} {:<14} {:>3}c  hunger {:+} happiness {:+} energy {:+}  (owned {}){}",
                row.item.emoji,
                row.item.name,
                row.item.price,
                e.hunger,
                e.happiness,
                e.energy,
                row.owned,
                if row.affordable { "" } else { " *" },
            ));
        }
    }
    lines
}

pub fn format_inventory(inventory: &Inventory) -> Vec<String> {
    let mut lines = vec![format!("Coins: {}", inventory.coins)];
    if inventory.items.is_empty() {
        lines.push("Your inventory is empty.".to_string());
        return lines;
    }
    for (id, qty) in &inventory.items {
        match find_item(id) {
            Some(item) => lines.push(format!("{} {} x{}", item.emoji, item.name, qty)),
            None => lines.push(format!("{} x{}", id, qty)),
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::storage::PetStoreBuilder;
    use tempfile::TempDir;

    #[test]
    fn starter_inventory_has_three_fruits() {
        let inv = Inventory::starter();
        assert_eq!(inv.coins, 0);
        assert_eq!(inv.quantity("apple"), 1);
        assert_eq!(inv.quantity("orange"), 1);
        assert_eq!(inv.quantity("cucumber"), 1);
        assert_eq!(inv.items.len(), 3);
    }

    #[test]
    fn buying_requires_coins() {
        let mut inv = Inventory::starter();
        let pizza = find_item("pizza").unwrap();
        assert!(!inv.buy_item(pizza, 1));
        assert_eq!(inv, Inventory::starter());

        inv.add_coins(45);
        assert!(!inv.buy_item(pizza, 3));
        assert!(inv.buy_item(pizza, 2));
        assert_eq!(inv.coins, 5);
        assert_eq!(inv.quantity("pizza"), 2);
    }

    #[test]
    fn using_items_never_goes_negative() {
        let mut inv = Inventory::starter();
        assert!(!inv.use_item("apple", 2));
        assert!(inv.use_item("apple", 1));
        assert_eq!(inv.quantity("apple"), 0);
        assert!(!inv.items.contains_key("apple"));
        assert!(!inv.use_item("apple", 1));
        assert!(!inv.use_item("orange", 0));
    }

    #[test]
    fn spend_and_reset() {
        let mut inv = Inventory::starter();
        inv.add_coins(10);
        assert!(!inv.spend_coins(11));
        assert!(inv.spend_coins(10));
        assert_eq!(inv.coins, 0);
        inv.add_coins(99);
        inv.reset();
        assert_eq!(inv, Inventory::starter());
    }

    #[test]
    fn load_defaults_and_canonicalizes_ids() {
        let dir = TempDir::new().unwrap();
        let store = PetStoreBuilder::new(dir.path()).open().unwrap();
        assert_eq!(load_inventory(&store, "u1").unwrap(), Inventory::starter());

        store
            .set_item("mv:inventory:u1", r#"{"energyDrink":2,"apple":0,"rock":5}"#)
            .unwrap();
        store.put_coins("u1", 30).unwrap();
        let inv = load_inventory(&store, "u1").unwrap();
        assert_eq!(inv.coins, 30);
        assert_eq!(inv.quantity("energy_drink"), 2);
        assert_eq!(inv.items.len(), 1);

        save_inventory(&store, "u1", &inv).unwrap();
        assert_eq!(load_inventory(&store, "u1").unwrap(), inv);
    }

    #[test]
    fn legacy_and_canonical_ids_merge_without_overflow() {
        let dir = TempDir::new().unwrap();
        let store = PetStoreBuilder::new(dir.path()).open().unwrap();
        store
            .set_item(
                "mv:inventory:u1",
                &format!(r#"{{"energyDrink":{},"energy_drink":3,"superFood":1,"super_food":2}}"#, u32::MAX),
            )
            .unwrap();
        let inv = load_inventory(&store, "u1").unwrap();
        assert_eq!(inv.quantity("energy_drink"), u32::MAX);
        assert_eq!(inv.quantity("super_food"), 3);
    }

    #[test]
    fn shop_lists_both_catalogs() {
        let mut inv = Inventory::starter();
        inv.add_coins(6);
        let listing = shop_listing(&inv);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].1.len(), 10);
        assert_eq!(listing[1].1.len(), 5);
        let apple = &listing[0].1[0];
        assert_eq!((apple.item.id, apple.owned, apple.affordable), ("apple", 1, true));
        assert!(format_shop(&inv)[0].contains("6 coins"));
    }
}
