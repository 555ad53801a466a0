//! Catalog item and its raw feed descriptor

use crate::error::MalformedItem;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stored in place of a missing or blank recipe
pub const NO_RECIPE: &str = "No recipe";

/// A craftable item as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identifier from the feed
    pub id: i64,
    /// Display name, never empty
    pub name: String,
    /// Descriptive tier, if the feed provides one
    pub tier: Option<i64>,
    /// Crafting inputs, usually `" + "`-joined; [`NO_RECIPE`] when absent
    pub recipe: String,
    /// Image reference (URL) for display
    pub image_url: Option<String>,
}

impl Item {
    /// Build an item, applying the same defaults as feed ingestion.
    pub fn new(
        id: i64,
        name: &str,
        tier: Option<i64>,
        recipe: Option<&str>,
        image_url: Option<&str>,
    ) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            tier,
            recipe: recipe_or_placeholder(recipe),
            image_url: image_url
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
        }
    }

    /// Parse one raw feed descriptor.
    pub fn from_descriptor(value: &Value) -> Result<Self, MalformedItem> {
        ItemDescriptor::from_value(value)?.into_item()
    }

    /// True unless the recipe is the placeholder
    pub fn has_recipe(&self) -> bool {
        self.recipe != NO_RECIPE
    }
}

fn recipe_or_placeholder(recipe: Option<&str>) -> String {
    match recipe.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => NO_RECIPE.to_string(),
    }
}

/// `(id, name)` pair used for enumeration and suggestion scans
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSummary {
    pub id: i64,
    pub name: String,
}

impl From<&Item> for ItemSummary {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
        }
    }
}

/// Item record exactly as it appears in the feed
///
/// Every field is optional here so that missing required fields surface as
/// [`MalformedItem`] instead of failing the whole snapshot.
#[derive(Debug, Clone, Default)]
pub struct ItemDescriptor {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub tier: Option<i64>,
    pub recipe: Option<String>,
    pub image_url: Option<String>,
}

impl ItemDescriptor {
    /// Read a descriptor from one element of the feed array.
    ///
    /// `id` and `name` must have the right type when present. Optional
    /// fields of the wrong type are dropped with a warning.
    pub fn from_value(value: &Value) -> Result<Self, MalformedItem> {
        let fields = value.as_object().ok_or(MalformedItem::NotAnObject)?;

        let id = match fields.get("id") {
            None | Some(Value::Null) => None,
            Some(raw) => Some(raw.as_i64().ok_or_else(|| {
                MalformedItem::InvalidField(format!("`id` must be an integer, got {}", raw))
            })?),
        };
        let name = match fields.get("name") {
            None | Some(Value::Null) => None,
            Some(raw) => Some(
                raw.as_str()
                    .ok_or_else(|| {
                        MalformedItem::InvalidField(format!("`name` must be a string, got {}", raw))
                    })?
                    .to_string(),
            ),
        };

        let image = match fields.get("image_url") {
            None | Some(Value::Null) => fields.get("image_reference"),
            found => found,
        };

        Ok(Self {
            id,
            name,
            tier: optional_field(fields.get("tier"), "tier", id, Value::as_i64),
            recipe: optional_field(fields.get("recipe"), "recipe", id, |raw| {
                raw.as_str().map(str::to_string)
            }),
            image_url: optional_field(image, "image_url", id, |raw| {
                raw.as_str().map(str::to_string)
            }),
        })
    }

    /// Validate required fields and fill in defaults
    pub fn into_item(self) -> Result<Item, MalformedItem> {
        let id = self.id.ok_or(MalformedItem::MissingField("id"))?;
        let name = self.name.ok_or(MalformedItem::MissingField("name"))?;
        if name.trim().is_empty() {
            return Err(MalformedItem::EmptyName { id });
        }

        Ok(Item::new(
            id,
            &name,
            self.tier,
            self.recipe.as_deref(),
            self.image_url.as_deref(),
        ))
    }
}

fn optional_field<T>(
    raw: Option<&Value>,
    field: &str,
    id: Option<i64>,
    read: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    match raw {
        None | Some(Value::Null) => None,
        Some(raw) => {
            let parsed = read(raw);
            if parsed.is_none() {
                log::warn!(
                    "Ignoring `{}` of item {:?}: unexpected value {}",
                    field,
                    id,
                    raw
                );
            }
            parsed
        }
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
