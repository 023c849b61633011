//! Item Definitions and Catalog
//!
//! Items are immutable definitions loaded once from JSON. Seeds name the crop
//! they plant by id; those references are resolved and checked when the
//! catalog is built, so every later lookup through a catalog id succeeds.

use std::fmt;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::error::{SimError, SimResult};

/// Index into the item catalog (0-based, contiguous).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Index into the catalog's item list.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Item category as written in the data file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ItemType {
    /// `"HOE"`
    Hoe,
    /// `"SWORD"`
    Sword,
    /// `"SEED"`
    Seed,
    /// `"CROP"`
    Crop,
}

/// Category-specific item data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Tills and un-tills ground, harvests mature crops
    Hoe,
    /// Weapon (no simulation effect yet)
    Sword,
    /// Plants the referenced crop
    Seed {
        /// Crop item this seed grows into
        plants: ItemId,
    },
    /// Harvestable produce
    Crop {
        /// Age (in days) at which the crop can be harvested
        matures: u8,
        /// Growing season label
        season: String,
    },
}

/// Immutable item definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Catalog index
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Category and its data
    pub kind: ItemKind,
    /// Several copies share one slot
    pub stackable: bool,
    /// Opaque sprite locator for the presentation layer
    pub render_pos: String,
}

impl Item {
    /// Category without payload.
    pub fn item_type(&self) -> ItemType {
        match self.kind {
            ItemKind::Hoe => ItemType::Hoe,
            ItemKind::Sword => ItemType::Sword,
            ItemKind::Seed { .. } => ItemType::Seed,
            ItemKind::Crop { .. } => ItemType::Crop,
        }
    }

    /// Crop this item plants, if it is a seed.
    pub fn plants(&self) -> Option<ItemId> {
        match self.kind {
            ItemKind::Seed { plants } => Some(plants),
            _ => None,
        }
    }

    /// Maturity age, if this item is a crop.
    pub fn matures(&self) -> Option<u8> {
        match self.kind {
            ItemKind::Crop { matures, .. } => Some(matures),
            _ => None,
        }
    }
}

/// One record of the JSON item file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemRecord {
    id: u32,
    name: String,
    #[serde(rename = "type")]
    item_type: ItemType,
    render_pos: String,
    #[serde(default)]
    stackable: bool,
    matures: Option<u8>,
    season: Option<String>,
    plants: Option<u32>,
}

impl ItemRecord {
    fn into_item(self) -> SimResult<Item> {
        let kind = match self.item_type {
            ItemType::Hoe => ItemKind::Hoe,
            ItemType::Sword => ItemKind::Sword,
            ItemType::Seed => ItemKind::Seed {
                plants: ItemId(self.plants.ok_or_else(|| {
                    SimError::InvalidArgument(format!("seed {} has no `plants` field", self.id))
                })?),
            },
            ItemType::Crop => ItemKind::Crop {
                matures: self.matures.ok_or_else(|| {
                    SimError::InvalidArgument(format!("crop {} has no `matures` field", self.id))
                })?,
                season: self.season.unwrap_or_default(),
            },
        };

        Ok(Item {
            id: ItemId(self.id),
            name: self.name,
            kind,
            stackable: self.stackable,
            render_pos: self.render_pos,
        })
    }
}

// =============================================================================
// CATALOG
// =============================================================================

/// Immutable item catalog keyed by contiguous 0-based id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ItemCatalog {
    items: Vec<Item>,
}

impl ItemCatalog {
    /// Build a catalog from items, validating ids and seed references.
    pub fn new(items: Vec<Item>) -> SimResult<Self> {
        for (index, item) in items.iter().enumerate() {
            if item.id.index() != index {
                return Err(SimError::InvalidArgument(format!(
                    "item `{}` has id {} but sits at position {}",
                    item.name, item.id.0, index
                )));
            }
        }

        let catalog = Self { items };
        for item in &catalog.items {
            if let Some(crop_id) = item.plants() {
                match catalog.get(crop_id) {
                    Some(crop) if crop.matures().is_some() => {}
                    Some(other) => {
                        return Err(SimError::MissingReference(format!(
                            "seed `{}` plants {} (`{}`), which is not a crop",
                            item.name, crop_id, other.name
                        )));
                    }
                    None => {
                        return Err(SimError::MissingReference(format!(
                            "seed `{}` plants unknown item {}",
                            item.name, crop_id
                        )));
                    }
                }
            }
        }

        debug!("Loaded item catalog with {} items", catalog.len());
        Ok(catalog)
    }

    /// Parse the JSON item file (an array of records).
    pub fn from_json(json: &str) -> SimResult<Self> {
        let records: Vec<ItemRecord> = serde_json::from_str(json)?;
        let items = records
            .into_iter()
            .map(ItemRecord::into_item)
            .collect::<SimResult<Vec<_>>>()?;
        Self::new(items)
    }

    /// Look up an item.
    #[inline]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())
    }

    /// Look up an item, failing with `MissingReference`.
    pub fn require(&self, id: ItemId) -> SimResult<&Item> {
        self.get(id)
            .ok_or_else(|| SimError::MissingReference(format!("unknown item {}", id)))
    }

    /// Resolve the crop a seed plants.
    pub fn crop_for_seed(&self, seed: ItemId) -> SimResult<&Item> {
        let seed_item = self.require(seed)?;
        let crop_id = seed_item.plants().ok_or_else(|| {
            SimError::InvalidArgument(format!("item `{}` is not a seed", seed_item.name))
        })?;
        self.require(crop_id)
    }

    /// Find an item by display name.
    pub fn find_by_name(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name == name)
    }

    /// All items in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Default catalog shipped with the game.
pub const DEFAULT_ITEMS_JSON: &str = include_str!("../../data/items.json");

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        { "id": 0, "name": "Hoe", "type": "HOE", "renderPos": "0" },
        { "id": 1, "name": "Parsnip Seeds", "type": "SEED", "renderPos": "0", "stackable": true, "plants": 2 },
        { "id": 2, "name": "Parsnip", "type": "CROP", "renderPos": "0:6:6", "stackable": true, "matures": 4, "season": "spring" }
    ]"#;

    #[test]
    fn test_load_catalog() {
        let catalog = ItemCatalog::from_json(SAMPLE).unwrap();
        assert_eq!(catalog.len(), 3);

        let hoe = catalog.get(ItemId(0)).unwrap();
        assert_eq!(hoe.kind, ItemKind::Hoe);
        assert!(!hoe.stackable);

        let seeds = catalog.get(ItemId(1)).unwrap();
        assert_eq!(seeds.item_type(), ItemType::Seed);
        assert_eq!(seeds.plants(), Some(ItemId(2)));

        let crop = catalog.crop_for_seed(ItemId(1)).unwrap();
        assert_eq!(crop.name, "Parsnip");
        assert_eq!(crop.matures(), Some(4));
    }

    #[test]
    fn test_seed_may_reference_later_item() {
        // Crop listed after the seed resolves fine
        let catalog = ItemCatalog::from_json(SAMPLE).unwrap();
        assert!(catalog.crop_for_seed(ItemId(1)).is_ok());
    }

    #[test]
    fn test_missing_crop_reference() {
        let json = r#"[
            { "id": 0, "name": "Ghost Seeds", "type": "SEED", "renderPos": "0", "plants": 7 }
        ]"#;
        let result = ItemCatalog::from_json(json);
        assert!(matches!(result, Err(SimError::MissingReference(_))));
    }

    #[test]
    fn test_seed_referencing_non_crop() {
        let json = r#"[
            { "id": 0, "name": "Hoe", "type": "HOE", "renderPos": "0" },
            { "id": 1, "name": "Odd Seeds", "type": "SEED", "renderPos": "0", "plants": 0 }
        ]"#;
        let result = ItemCatalog::from_json(json);
        assert!(matches!(result, Err(SimError::MissingReference(_))));
    }

    #[test]
    fn test_non_contiguous_ids_rejected() {
        let json = r#"[
            { "id": 1, "name": "Hoe", "type": "HOE", "renderPos": "0" }
        ]"#;
        assert!(matches!(ItemCatalog::from_json(json), Err(SimError::InvalidArgument(_))));
    }

    #[test]
    fn test_crop_without_matures_rejected() {
        let json = r#"[
            { "id": 0, "name": "Turnip", "type": "CROP", "renderPos": "0" }
        ]"#;
        assert!(matches!(ItemCatalog::from_json(json), Err(SimError::InvalidArgument(_))));
    }

    #[test]
    fn test_unknown_type_is_malformed() {
        let json = r#"[ { "id": 0, "name": "Rod", "type": "FISHING_ROD", "renderPos": "0" } ]"#;
        assert!(matches!(ItemCatalog::from_json(json), Err(SimError::MalformedData(_))));
    }

    #[test]
    fn test_require_unknown_id() {
        let catalog = ItemCatalog::from_json(SAMPLE).unwrap();
        assert!(matches!(catalog.require(ItemId(99)), Err(SimError::MissingReference(_))));
        assert!(matches!(catalog.crop_for_seed(ItemId(0)), Err(SimError::InvalidArgument(_))));
    }

    #[test]
    fn test_default_catalog_loads() {
        let catalog = ItemCatalog::from_json(DEFAULT_ITEMS_JSON).unwrap();
        assert!(catalog.find_by_name("Hoe").is_some());
        for item in catalog.iter() {
            if let Some(seed_crop) = item.plants() {
                assert!(catalog.get(seed_crop).and_then(Item::matures).is_some());
            }
        }
    }
}
