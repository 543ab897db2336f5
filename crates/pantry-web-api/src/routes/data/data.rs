
use axum::{http::StatusCode, Json};
use mongodb::bson::oid::ObjectId;
use pantry_meal_api::{
    FamilyMember, MacroTotals, NutritionalAssessment, PortionBand,
    ProjectedMacros, PurchaseRecord, Recipe, TrackingError,
};
use serde::{Deserialize, Serialize};

use crate::generation::GenerationError;

#[derive(Debug, thiserror::Error)]
pub enum HouseholdError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Tracking(#[from] TrackingError),
    #[error("generation is not configured")]
    GenerationDisabled,
    #[error("purchase has no ingredients")]
    NoIngredients,
    #[error("no images to analyze")]
    NoImages,
    #[error("member needs a name")]
    InvalidMember,
    #[error("member {0} not found")]
    MemberNotFound(String),
}

impl HouseholdError {
    fn status(&self) -> (StatusCode, &'static str) {
        match self {
            HouseholdError::Generation(_) => (StatusCode::BAD_GATEWAY, "generation_failed"),
            HouseholdError::Tracking(TrackingError::NoPlan) => (StatusCode::CONFLICT, "no_plan"),
            HouseholdError::GenerationDisabled => (StatusCode::SERVICE_UNAVAILABLE, "generation_disabled"),
            HouseholdError::NoIngredients => (StatusCode::BAD_REQUEST, "no_ingredients"),
            HouseholdError::NoImages => (StatusCode::BAD_REQUEST, "no_images"),
            HouseholdError::InvalidMember => (StatusCode::BAD_REQUEST, "invalid_member"),
            HouseholdError::MemberNotFound(_) => (StatusCode::NOT_FOUND, "member_not_found"),
        }
    }
}

impl From<HouseholdError> for (StatusCode, Json<String>) {
    fn from(value: HouseholdError) -> Self {
        let (status, code) = value.status();
        if status.is_server_error() {
            tracing::error!("request failed: {value}");
        }
        (status, Json(code.to_string()))
    }
}

/// Outcome of analyzing grocery photos.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOutcome {
    pub purchase: PurchaseRecord,
    pub recipes: Vec<Recipe>,
    /// missing when the balance could not be evaluated
    pub assessment: Option<NutritionalAssessment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExtraFood {
    pub name: String,
    pub calories: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotals {
    pub totals: MacroTotals,
    /// consumed calories in percent of the first member's target
    pub progress: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPortions {
    pub planned: MacroTotals,
    pub members: Vec<MemberPortion>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPortion {
    pub id: String,
    pub name: String,
    pub multiplier: f64,
    pub band: PortionBand,
    pub projected: ProjectedMacros,
    pub coverage: ProjectedMacros,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    #[serde(flatten)]
    pub record: PurchaseRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    #[serde(flatten)]
    pub member: FamilyMember,
}
