// Static catalog of navigable items, shipped with the bundle.

use crate::error::{EngineError, EngineResult};
use crate::model::Item;

const ITEMS_JSON: &str = include_str!("../assets/items.json");

pub fn load() -> EngineResult<Vec<Item>> {
    parse(ITEMS_JSON)
}

pub fn parse(raw: &str) -> EngineResult<Vec<Item>> {
    let items: Vec<Item> =
        serde_json::from_str(raw).map_err(|e| EngineError::Catalog(e.to_string()))?;
    if items.is_empty() {
        return Err(EngineError::EmptyCatalog);
    }
    Ok(items)
}
