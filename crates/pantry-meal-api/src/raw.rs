//! Payloads exchanged with the content generation service.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Asks for a json answer shaped like `schema`.
    pub fn json(parts: Vec<Part>, schema: serde_json::Value) -> Self {
        Self {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_mime_type: Some("application/json".into()),
                response_schema: Some(schema),
                response_modalities: None,
            },
        }
    }

    pub fn image(prompt: impl Into<String>) -> Self {
        Self {
            contents: vec![Content { parts: vec![Part::text(prompt)] }],
            generation_config: GenerationConfig {
                response_mime_type: None,
                response_schema: None,
                response_modalities: Some(vec!["IMAGE".into()]),
            },
        }
    }
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), inline_data: None }
    }

    pub fn jpeg(base64: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: "image/jpeg".into(),
                data: base64.into(),
            }),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// base64
    pub data: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Candidate {
    pub content: Content,
}

impl GenerateContentResponse {
    /// text of the first candidate
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.parts;
        let text: String = parts.iter().flat_map(|v| v.text.as_deref()).collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }

    pub fn inline_image(&self) -> Option<&InlineData> {
        self.candidates.first()?
            .content.parts.iter()
        .find_map(|v| v.inline_data.as_ref())
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnalysisResult {
    #[serde(default)]
    pub identified_ingredients: Vec<ApiIngredient>,
    #[serde(default)]
    pub recipe_suggestions: Vec<ApiRecipe>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiIngredient {
    pub name: String,
    pub spoilage_time: String,
    /// free text like "Frutas y Verduras"
    pub category: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiRecipe {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub ingredients_used: Vec<String>,
    pub instructions: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiWeeklyPlan {
    pub daily_plans: Vec<ApiDailyPlan>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiDailyPlan {
    /// english weekday in lowercase
    pub day: String,
    pub breakfast: ApiMeal,
    pub morning_snack: ApiMeal,
    pub lunch: ApiMeal,
    pub afternoon_snack: ApiMeal,
    pub dinner: ApiMeal,
    pub water_intake_liters: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiMeal {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default)]
    pub micronutrients: String,
    #[serde(default)]
    pub image_prompt: String,
    #[serde(default)]
    pub instructions: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiAssessment {
    pub score: f64,
    pub summary: String,
    #[serde(default)]
    pub missing_groups: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<ApiSuggestionItem>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSuggestionItem {
    pub item: String,
    pub category: String,
    pub reason: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiComplementarySuggestions {
    #[serde(default)]
    pub suggestions: Vec<ApiComplementarySuggestion>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiComplementarySuggestion {
    pub product_name: String,
    pub reason: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiTips {
    #[serde(default)]
    pub tips: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiIngredientSuggestions {
    #[serde(default)]
    pub suggestions: Vec<String>,
}
