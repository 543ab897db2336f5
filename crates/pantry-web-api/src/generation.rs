use std::sync::Arc;

use pantry_meal_api::{
    raw::{self, GenerateContentRequest, GenerateContentResponse, Part},
    AnalysisResult, ComplementarySuggestion, DailyRequirements, FamilyMember,
    MemberProfile, NutritionalAssessment, PlanParseError, WeeklyMealPlan,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::GenerationConfig;

mod schema;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Plan(#[from] PlanParseError),
    #[error("generation returned no content")]
    Empty,
}

/// Client for a `generateContent` style endpoint.
#[derive(Clone)]
pub struct Generator {
    client: reqwest::Client,
    config: Arc<GenerationConfig>,
    api_key: Arc<str>,
}

impl Generator {
    pub fn new(config: &GenerationConfig, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            config: Arc::new(config.clone()),
            api_key: api_key.into(),
        }
    }

    /// Returns `None` when the configured api key variable is not set.
    pub fn from_config(config: &GenerationConfig) -> Option<Self> {
        match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Some(Self::new(config, key.trim())),
            _ => {
                tracing::warn!("{} is not set, running without generation", config.api_key_env);
                None
            },
        }
    }

    async fn generate(
        &self, model: &str, request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let url = format!(
            "{}/models/{model}:generateContent",
            self.config.base_url.trim_end_matches('/'),
        );

        Ok(self.client.post(url)
            .header("x-goog-api-key", self.api_key.as_ref())
            .json(request)
            .send().await?
            .error_for_status()?
        .json().await?)
    }

    async fn generate_json<T: DeserializeOwned>(
        &self, model: &str, parts: Vec<Part>, schema: serde_json::Value,
    ) -> Result<T, GenerationError> {
        let response = self.generate(model, &GenerateContentRequest::json(parts, schema)).await?;
        let text = response.text().ok_or(GenerationError::Empty)?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn ask<T: DeserializeOwned>(
        &self, prompt: String, schema: serde_json::Value,
    ) -> Result<T, GenerationError> {
        self.generate_json(&self.config.text_model, vec![Part::text(prompt)], schema).await
    }

    /// Identifies groceries on base64 jpeg photos and suggests recipes.
    pub async fn analyze_images(&self, images: &[String]) -> Result<AnalysisResult, GenerationError> {
        let prompt = format!("\
            Eres un asistente culinario. Identifica los alimentos de estas fotos de una compra.\n\
            Responde todo en español.\n\
            Para frutas y verduras frescas estima la vida útil de forma conservadora, \
            como si llevaran tiempo en el estante (fresas 2-3 días, bananos 3-5 días).\n\
            Sugiere 3 recetas con los alimentos identificados.\
        ");

        let parts = images.iter()
            .map(|v| Part::jpeg(v.as_str()))
            .chain([Part::text(prompt)])
        .collect();

        let result: raw::ApiAnalysisResult = self.generate_json(
            &self.config.text_model, parts, schema::analysis(),
        ).await?;
        Ok(result.into())
    }

    pub async fn daily_requirements(
        &self, profile: &MemberProfile,
    ) -> Result<DailyRequirements, GenerationError> {
        let prompt = format!(
            "Calcula las necesidades nutricionales diarias de esta persona: {}",
            serde_json::to_string(profile)?,
        );
        self.ask(prompt, schema::daily_requirements()).await
    }

    pub async fn evaluate_balance(
        &self, ingredients: &[String],
    ) -> Result<NutritionalAssessment, GenerationError> {
        let prompt = format!("\
            Actúa como nutricionista. Evalúa el balance de esta compra: [{}].\n\
            Revisa proteínas, carbohidratos, grasas, frutas y verduras, \
            indica los grupos que faltan y sugiere 5 alimentos para agregar.\n\
            Responde en español.",
            ingredients.join(", "),
        );

        let assessment: raw::ApiAssessment = self.ask(prompt, schema::assessment()).await?;
        Ok(assessment.into())
    }

    pub async fn weekly_plan(
        &self, ingredients: &[String], history: &[String], roster: &[FamilyMember],
    ) -> Result<WeeklyMealPlan, GenerationError> {
        let family = roster.iter()
            .map(|v| format!("{} ({} años, objetivo: {})", v.profile.name, v.profile.age, label(&v.profile.goal)))
            .collect::<Vec<_>>()
        .join("; ");

        let prompt = format!("\
            Crea un menú semanal saludable de cocina colombiana, todo en español.\n\
            Ingredientes disponibles: [{}]\n\
            Compras anteriores: [{}]\n\
            Familia: [{family}]\n\
            Usa primero los ingredientes disponibles. \
            Adapta las preparaciones para menores de 2 años.",
            ingredients.join(", "),
            history.join(", "),
        );

        let plan: raw::ApiWeeklyPlan = self.generate_json(
            &self.config.plan_model, vec![Part::text(prompt)], schema::weekly_plan(),
        ).await?;
        Ok(WeeklyMealPlan::try_from(plan)?)
    }

    /// Returns the image as a `data:` url, `None` when no image came back.
    pub async fn meal_image(&self, prompt: &str) -> Result<Option<String>, GenerationError> {
        let response = self.generate(
            &self.config.image_model, &GenerateContentRequest::image(prompt),
        ).await?;

        Ok(response.inline_image()
            .map(|v| format!("data:{};base64,{}", v.mime_type, v.data)))
    }

    pub async fn ingredient_suggestions(
        &self, query: &str, existing: &[String],
    ) -> Result<Vec<String>, GenerationError> {
        let prompt = format!("\
            Sugiere 5 ingredientes de supermercado en español que empiecen por \"{query}\".\n\
            No incluyas: [{}]. Contexto: cocina colombiana.",
            existing.join(", "),
        );

        let v: raw::ApiIngredientSuggestions = self.ask(prompt, schema::strings("suggestions")).await?;
        Ok(v.suggestions)
    }

    pub async fn health_tips(&self) -> Result<Vec<String>, GenerationError> {
        let prompt = format!("\
            Escribe 7 consejos cortos y motivadores de nutrición y salud \
            en español para una familia colombiana.\
        ");

        let v: raw::ApiTips = self.ask(prompt, schema::strings("tips")).await?;
        Ok(v.tips)
    }

    pub async fn complementary_suggestions(
        &self, plan: &WeeklyMealPlan, roster: &[FamilyMember], existing: &[String],
    ) -> Result<Vec<ComplementarySuggestion>, GenerationError> {
        let meals = plan.days()
            .flat_map(|(_, day)| day.meals().map(|(_, meal)| meal.name.clone()))
            .collect::<Vec<_>>()
        .join(", ");
        let family = roster.iter()
            .map(|v| v.profile.name.as_str())
            .collect::<Vec<_>>()
        .join(", ");

        let prompt = format!("\
            Este es el menú de la semana: [{meals}], para: [{family}].\n\
            Sugiere 5 productos en español que lo complementen.\n\
            No sugieras: [{}].",
            existing.join(", "),
        );

        let v: raw::ApiComplementarySuggestions = self.ask(prompt, schema::complementary()).await?;
        Ok(v.suggestions.into_iter().map(Into::into).collect())
    }
}

/// wire name of a unit enum, like `maintain_weight`
fn label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value).ok()
        .and_then(|v| v.as_str().map(ToOwned::to_owned))
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_meal_api::Goal;

    #[test]
    fn label_uses_wire_name() {
        assert_eq!(label(&Goal::HealthyGrowth), "healthy_growth");
        assert_eq!(label(&3), "");
    }

    #[test]
    fn missing_key_disables_generation() {
        let config = GenerationConfig {
            api_key_env: format!("PANTRY_TEST_KEY_THAT_IS_NEVER_SET"),
            ..Default::default()
        };
        assert!(Generator::from_config(&config).is_none());
    }
}
