use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Spoilage text given to ingredients that were typed in by hand.
pub const MANUAL_SPOILAGE_TIME: &str = "N/A";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    /// free text like "3-5 días" or "1 semana"
    pub spoilage_time: String,
    pub category: Category,
}

impl Ingredient {
    pub fn manual(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spoilage_time: MANUAL_SPOILAGE_TIME.into(),
            category: Category::Other,
        }
    }

    /// key used for identity, names are compared case-insensitively
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Ingredient category, normalized once from whatever label the
/// generation service or a stored document carried.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Fruit,
    Vegetable,
    /// the combined "fruits and vegetables" shelf
    Produce,
    Meat,
    Dairy,
    Pantry,
    Other,
    Custom(String),
}

impl Category {
    pub fn parse(label: &str) -> Self {
        use Category::*;

        let trimmed = label.trim();
        match trimmed.to_lowercase().as_str() {
            "fruta" | "frutas" | "fruit" | "fruits" => Fruit,
            "verdura" | "verduras" | "vegetal" | "vegetales"
                | "vegetable" | "vegetables" => Vegetable,
            "frutas y verduras" | "fruta y verdura" | "frutas y vegetales"
                | "fruits and vegetables" | "produce" => Produce,
            "carne" | "carnes" | "meat" | "meats" => Meat,
            "lácteo" | "lácteos" | "lacteo" | "lacteos" | "dairy" => Dairy,
            "despensa" | "pantry" => Pantry,
            "" | "otro" | "otros" | "other" => Other,
            _ => Custom(trimmed.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Fruit => "fruta",
            Category::Vegetable => "verdura",
            Category::Produce => "frutas y verduras",
            Category::Meat => "carnes",
            Category::Dairy => "lácteos",
            Category::Pantry => "despensa",
            Category::Other => "otro",
            Category::Custom(label) => label,
        }
    }

    /// fresh fruit or vegetables, the only items that get spoilage alerts
    pub fn is_fresh_produce(&self) -> bool {
        matches!(self, Category::Fruit | Category::Vegetable | Category::Produce)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self { Self::parse(&value) }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self { Self::parse(value) }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Custom(label) => label,
            other => other.label().to_string(),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Merges recognized ingredients with hand-typed names.
///
/// Order is preserved and the first ingredient with a given name (compared
/// case-insensitively) wins, so recognized ingredients keep their metadata
/// over a manual entry of the same name.
pub fn merge(vision: &[Ingredient], manual: &[String]) -> Vec<Ingredient> {
    let mut seen = HashSet::new();

    vision.iter()
        .cloned()
        .chain(manual.iter().map(Ingredient::manual))
        .filter(|v| seen.insert(v.key()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(name: &str, spoilage: &str, category: &str) -> Ingredient {
        Ingredient {
            name: name.into(),
            spoilage_time: spoilage.into(),
            category: Category::parse(category),
        }
    }

    #[test]
    fn merge_keeps_first_occurrence_case_insensitive() {
        let vision = vec![ingredient("Tomate", "3-5 días", "verdura")];
        let manual = vec!["tomate".to_string(), "Cebolla".to_string()];

        let merged = merge(&vision, &manual);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], vision[0]);
        assert_eq!(merged[1], Ingredient::manual("Cebolla"));
        assert_eq!(merged[1].spoilage_time, "N/A");
        assert_eq!(merged[1].category, Category::Other);
    }

    #[test]
    fn merge_drops_duplicates_inside_one_list() {
        let vision = vec![
            ingredient("Leche", "7 días", "lácteos"),
            ingredient("LECHE", "1 semana", "despensa"),
            ingredient("Pan", "3 días", "despensa"),
        ];
        let manual = vec!["pan".to_string(), "Arroz".to_string(), "arroz".to_string()];

        let names: Vec<_> = merge(&vision, &manual).into_iter()
            .map(|v| (v.name, v.spoilage_time))
            .collect();
        assert_eq!(names, vec![
            ("Leche".to_string(), "7 días".to_string()),
            ("Pan".to_string(), "3 días".to_string()),
            ("Arroz".to_string(), "N/A".to_string()),
        ]);
    }

    #[test]
    fn merge_compares_non_ascii_names() {
        let vision = vec![ingredient("Ñame", "2 semanas", "verdura")];
        let merged = merge(&vision, &["ñAME".to_string()]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn merge_is_repeatable() {
        let vision = vec![
            ingredient("Tomate", "3-5 días", "verdura"),
            ingredient("Leche", "1 semana", "lácteos"),
        ];
        let manual = vec!["LECHE".to_string(), "Cebolla".to_string()];

        let once = merge(&vision, &manual);
        assert_eq!(once, merge(&vision, &manual));

        // merging the result again changes nothing
        assert_eq!(merge(&once, &[]), once);
        assert_eq!(merge(&once, &manual), once);
    }

    #[test]
    fn merge_of_empty_inputs_is_empty() {
        assert!(merge(&[], &[]).is_empty());
    }

    #[test]
    fn category_labels_normalize() {
        assert_eq!(Category::parse(" Fruta "), Category::Fruit);
        assert_eq!(Category::parse("VERDURAS"), Category::Vegetable);
        assert_eq!(Category::parse("Frutas y Verduras"), Category::Produce);
        assert_eq!(Category::parse("Lacteos"), Category::Dairy);
        assert_eq!(Category::parse("otro"), Category::Other);
        assert_eq!(Category::parse("Panadería"), Category::Custom("Panadería".into()));

        assert!(Category::Produce.is_fresh_produce());
        assert!(!Category::Meat.is_fresh_produce());
        assert!(!Category::Custom("fruta seca".into()).is_fresh_produce());
    }

    #[test]
    fn category_serializes_as_label() {
        let json = serde_json::to_string(&ingredient("Mango", "2-3 días", "Fruit")).unwrap();
        assert_eq!(json, r#"{"name":"Mango","spoilageTime":"2-3 días","category":"fruta"}"#);

        let back: Ingredient = serde_json::from_str(&json).unwrap();
        assert_eq!(back.category, Category::Fruit);
    }
}
