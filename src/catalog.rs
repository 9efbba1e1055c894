use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::FoodItem;
use crate::store::Records;

/// The food list shipped with the crate.
pub const BUNDLED_FOODS_JSON: &str = include_str!("../data/foods.json");

/// Parse a bundled catalog. Duplicate ids are rejected.
pub fn parse_bundled(json: &str) -> Result<Vec<FoodItem>> {
    let foods: Vec<FoodItem> =
        serde_json::from_str(json).context("decoding bundled food catalog")?;

    let mut seen = HashSet::new();
    for food in &foods {
        if !seen.insert(food.id.as_str()) {
            return Err(anyhow!("duplicate food id {} in bundled catalog", food.id));
        }
    }
    Ok(foods)
}

pub fn load_bundled_file(path: &Path) -> Result<Vec<FoodItem>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading food catalog {}", path.display()))?;
    parse_bundled(&json)
}

/// Bundled foods merged with the user's custom foods.
pub struct FoodCatalog {
    records: Records,
    bundled: Vec<FoodItem>,
    custom: Vec<FoodItem>,
    all: Vec<FoodItem>,
}

impl FoodCatalog {
    /// Build from already-parsed bundled foods and the persisted custom list.
    pub fn new(records: Records, bundled: Vec<FoodItem>) -> Self {
        let mut catalog = Self {
            records,
            bundled,
            custom: Vec::new(),
            all: Vec::new(),
        };
        catalog.reload_custom();
        info!(
            bundled = catalog.bundled.len(),
            custom = catalog.custom.len(),
            "loaded food catalog"
        );
        catalog
    }

    pub fn from_json(records: Records, bundled_json: &str) -> Result<Self> {
        Ok(Self::new(records, parse_bundled(bundled_json)?))
    }

    /// Merged catalog sorted by name. Equal names keep bundled-then-custom order.
    pub fn all_foods(&self) -> &[FoodItem] {
        &self.all
    }

    pub fn custom_foods(&self) -> &[FoodItem] {
        &self.custom
    }

    pub fn find(&self, id: &str) -> Option<&FoodItem> {
        self.all.iter().find(|food| food.id == id)
    }

    /// Append a custom food and persist the custom list. Returns the stored
    /// food, whose id is replaced if empty or already taken.
    pub fn add_custom_food(&mut self, mut food: FoodItem) -> FoodItem {
        if food.id.is_empty() || self.contains_id(&food.id) {
            let fresh = Uuid::new_v4().to_string();
            debug!(old_id = %food.id, new_id = %fresh, "assigning fresh custom food id");
            food.id = fresh;
        }

        self.custom.push(food.clone());
        self.records.save_custom_foods(&self.custom);
        self.rebuild();
        info!(id = %food.id, name = %food.name, "added custom food");
        food
    }

    /// Re-read the custom list from the store. Colliding ids are replaced and
    /// the corrected list is written back so the new ids stick.
    pub fn reload_custom(&mut self) {
        let bundled_ids: HashSet<&str> = self.bundled.iter().map(|f| f.id.as_str()).collect();
        let mut seen: HashSet<String> = HashSet::new();
        let mut reassigned = 0usize;
        let mut custom = self.records.load_custom_foods();
        for food in &mut custom {
            if food.id.is_empty() || bundled_ids.contains(food.id.as_str()) || seen.contains(&food.id)
            {
                let fresh = Uuid::new_v4().to_string();
                warn!(old_id = %food.id, new_id = %fresh, "custom food id collides, reassigning");
                food.id = fresh;
                reassigned += 1;
            }
            seen.insert(food.id.clone());
        }
        if reassigned > 0 {
            self.records.save_custom_foods(&custom);
        }
        self.custom = custom;
        self.rebuild();
    }

    fn contains_id(&self, id: &str) -> bool {
        self.bundled.iter().chain(&self.custom).any(|food| food.id == id)
    }

    fn rebuild(&mut self) {
        let mut all: Vec<FoodItem> = self.bundled.iter().chain(&self.custom).cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        self.all = all;
    }
}
