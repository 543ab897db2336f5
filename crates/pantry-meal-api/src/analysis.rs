use serde::{Deserialize, Serialize};

use super::raw;
use crate::{Category, Ingredient};

/// Score range of a nutritional assessment.
pub const SCORE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=10.0;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub identified_ingredients: Vec<Ingredient>,
    pub recipe_suggestions: Vec<Recipe>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub description: String,
    pub ingredients_used: Vec<String>,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionalAssessment {
    pub score: f64,
    pub summary: String,
    pub missing_groups: Vec<String>,
    /// ranked, best first
    pub suggestions: Vec<SuggestionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionItem {
    pub item: String,
    pub category: Category,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplementarySuggestion {
    pub product_name: String,
    pub reason: String,
}

impl From<raw::ApiIngredient> for Ingredient {
    fn from(value: raw::ApiIngredient) -> Self {
        Self {
            name: value.name.trim().to_string(),
            spoilage_time: value.spoilage_time,
            category: Category::parse(&value.category),
        }
    }
}

impl From<raw::ApiRecipe> for Recipe {
    fn from(value: raw::ApiRecipe) -> Self {
        Self {
            title: value.title,
            description: value.description,
            ingredients_used: value.ingredients_used,
            instructions: value.instructions,
        }
    }
}

impl From<raw::ApiAnalysisResult> for AnalysisResult {
    fn from(value: raw::ApiAnalysisResult) -> Self {
        Self {
            identified_ingredients: value.identified_ingredients.into_iter().map(Into::into).collect(),
            recipe_suggestions: value.recipe_suggestions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<raw::ApiAssessment> for NutritionalAssessment {
    fn from(value: raw::ApiAssessment) -> Self {
        if !SCORE_RANGE.contains(&value.score) {
            tracing::warn!("assessment score {} outside of {SCORE_RANGE:?}", value.score);
        }

        Self {
            score: value.score,
            summary: value.summary,
            missing_groups: value.missing_groups,
            suggestions: value.suggestions.into_iter().map(|v| SuggestionItem {
                item: v.item,
                category: Category::parse(&v.category),
                reason: v.reason,
            }).collect(),
        }
    }
}

impl From<raw::ApiComplementarySuggestion> for ComplementarySuggestion {
    fn from(value: raw::ApiComplementarySuggestion) -> Self {
        Self { product_name: value.product_name, reason: value.reason }
    }
}
