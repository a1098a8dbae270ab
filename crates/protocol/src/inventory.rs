//! `GET_INVENTORY` response messages.
//!
//! All types are plain values. Edits go through the `with_*` helpers, which
//! return a new value and leave the receiver untouched, so a rewrite of one
//! nested creature never aliases the decoded original.

use serde::{Deserialize, Serialize};

use crate::codec::Message;
use crate::pokemon::PokemonData;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GetInventoryResponse {
    pub success: bool,
    pub inventory_delta: Option<InventoryDelta>,
}

impl GetInventoryResponse {
    pub fn with_inventory_delta(&self, delta: InventoryDelta) -> Self {
        Self {
            success: self.success,
            inventory_delta: Some(delta),
        }
    }
}

impl Message for GetInventoryResponse {
    const NAME: &'static str = "GetInventoryResponse";
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryDelta {
    pub original_timestamp_ms: i64,
    pub new_timestamp_ms: i64,
    pub inventory_items: Vec<InventoryItem>,
}

impl InventoryDelta {
    pub fn with_inventory_items(&self, inventory_items: Vec<InventoryItem>) -> Self {
        Self {
            inventory_items,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryItem {
    pub modified_timestamp_ms: i64,
    pub inventory_item_data: Option<InventoryItemData>,
}

impl InventoryItem {
    /// The creature held by this slot, if any.
    pub fn pokemon(&self) -> Option<&PokemonData> {
        self.inventory_item_data
            .as_ref()
            .and_then(|data| data.pokemon_data.as_ref())
    }

    /// Returns a copy whose creature is replaced. Slots without item data
    /// gain an item-data entry holding only the creature.
    pub fn with_pokemon(&self, pokemon: PokemonData) -> Self {
        let data = self.inventory_item_data.clone().unwrap_or_default();
        Self {
            modified_timestamp_ms: self.modified_timestamp_ms,
            inventory_item_data: Some(InventoryItemData {
                pokemon_data: Some(pokemon),
                ..data
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryItemData {
    pub pokemon_data: Option<PokemonData>,
    pub item: Option<ItemStack>,
}

/// Non-creature inventory entry (balls, potions, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: u32,
    pub count: i32,
    pub unseen: bool,
}
