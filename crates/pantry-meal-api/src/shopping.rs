use serde::{Deserialize, Serialize};

use crate::{Category, SuggestionItem};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub checked: bool,
}

/// Items the household still wants to buy, in insertion order.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    pub fn contains(&self, name: &str) -> bool {
        self.items.iter().any(|v| v.name == name)
    }

    /// Adds a suggested item unless one with the same name is listed.
    pub fn add(&self, id: String, suggestion: &SuggestionItem) -> Self {
        let mut next = self.clone();
        if !self.contains(&suggestion.item) {
            next.items.push(ShoppingListItem {
                id,
                name: suggestion.item.clone(),
                category: suggestion.category.clone(),
                checked: false,
            });
        }
        next
    }

    pub fn toggle(&self, id: &str) -> Self {
        let mut next = self.clone();
        for item in next.items.iter_mut().filter(|v| v.id == id) {
            item.checked = !item.checked;
        }
        next
    }

    pub fn remove(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.items.retain(|v| v.id != id);
        next
    }
}
