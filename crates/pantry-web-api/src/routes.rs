
use std::collections::BTreeMap;

use axum::{
    extract::{FromRef, Path, Query, State},
    routing::{delete, get, post},
    Json,
    Router,
};

use pantry_meal_api::{
    AggregateMode, ComplementarySuggestion, DailyRequirements, ExpiringItem,
    ExtraFoodItem, FamilyMember, Ingredient, MealImage, MemberProfile, PlanDay,
    PurchaseHistory, PurchaseRecord, ShoppingList, SuggestionItem, TrackingSnapshot,
    WeeklyMealPlan,
};
use serde::{Deserialize, Serialize};

use crate::{config::Config, generation::Generator};

use self::data::{
    AnalyzeOutcome, DayPortions, DayTotals, HouseholdCollections,
    HouseholdManager, NewExtraFood,
};

mod data;
mod helpers;
use helpers::*;

#[derive(Clone, FromRef)]
struct AppState {
    household: HouseholdManager,
}

impl AppState {
    async fn new(config: &Config) -> Self {
        let db = if let Some(db) = &config.db {
            tracing::info!("connecting to db");
            let v = connect_db(db).await;
            tracing::info!("connected to db");
            v
        } else {
            tracing::info!("no db specified");
            None
        };

        let generator = config.generation.as_ref().and_then(Generator::from_config);
        if config.generation.is_none() {
            tracing::info!("no generation specified");
        }

        let household = HouseholdManager::new(generator, db.as_ref().map(HouseholdCollections::new));
        household.load().await;

        Self { household }
    }
}

pub async fn make_router(config: &Config) -> Router {
    router(AppState::new(config).await)
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/purchases", get(purchases).post(record_purchase))
        .route("/api/purchases/analyze", post(analyze_purchase))
        .route("/api/alerts", get(alerts))
        .route("/api/ingredients/suggestions", get(ingredient_suggestions))
        .route("/api/family", get(family).post(add_member))
        .route("/api/family/:id", delete(remove_member))
        .route("/api/plan", get(plan).put(replace_plan))
        .route("/api/plan/generate", post(generate_plan))
        .route("/api/plan/complementary", get(complementary))
        .route("/api/plan/:day/:slot/consumed", post(toggle_consumed))
        .route("/api/plan/:day/:slot/image", post(meal_image))
        .route("/api/plan/:day/extras", post(add_extra))
        .route("/api/plan/:day/extras/:id", delete(remove_extra))
        .route("/api/plan/:day/totals", get(totals))
        .route("/api/plan/:day/portions", get(portions))
        .route("/api/shopping", get(shopping).post(add_to_shopping))
        .route("/api/shopping/:id/toggle", post(toggle_shopping))
        .route("/api/shopping/:id", delete(remove_from_shopping))
        .route("/api/tips", get(tips))
    .with_state(state)
}


#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PurchaseRequest {
    date: Option<String>,
    #[serde(default)]
    ingredients: Vec<Ingredient>,
    #[serde(default)]
    manual: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    date: Option<String>,
    /// base64 jpeg
    images: Vec<String>,
    #[serde(default)]
    manual: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DateQuery {
    today: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SuggestionQuery {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewMember {
    #[serde(flatten)]
    profile: MemberProfile,
    daily_requirements: Option<DailyRequirements>,
}

#[derive(Debug, Deserialize)]
struct TotalsQuery {
    #[serde(default)]
    mode: AggregateMode,
}

/// The active plan with its consumption tracking.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanView {
    plan: Option<WeeklyMealPlan>,
    /// `day-slot` keys of eaten meals
    consumed: Vec<String>,
    extras: BTreeMap<PlanDay, Vec<ExtraFoodItem>>,
}

impl From<TrackingSnapshot> for PlanView {
    fn from(value: TrackingSnapshot) -> Self {
        let extras = PlanDay::ALL.into_iter()
            .filter(|day| !value.extras_for(*day).is_empty())
            .map(|day| (day, value.extras_for(day).to_vec()))
        .collect();

        Self {
            plan: value.plan().cloned(),
            consumed: value.consumed_keys(),
            extras,
        }
    }
}

async fn purchases(
    State(household): State<HouseholdManager>,
) -> Json<PurchaseHistory> {
    Json(household.history().await)
}

async fn record_purchase(
    State(household): State<HouseholdManager>,
    Json(req): Json<PurchaseRequest>,
) -> ApiResult<PurchaseRecord> {
    let date = date_or_today(req.date.as_deref())?;
    Ok(Json(household.record_purchase(date, &req.ingredients, &req.manual).await?))
}

async fn analyze_purchase(
    State(household): State<HouseholdManager>,
    Json(req): Json<AnalyzeRequest>,
) -> ApiResult<AnalyzeOutcome> {
    let date = date_or_today(req.date.as_deref())?;
    Ok(Json(household.analyze_purchase(date, &req.images, &req.manual).await?))
}

async fn alerts(
    Query(q): Query<DateQuery>,
    State(household): State<HouseholdManager>,
) -> ApiResult<Vec<ExpiringItem>> {
    let today = date_or_today(q.today.as_deref())?;
    Ok(Json(household.alerts(today).await))
}

async fn ingredient_suggestions(
    Query(q): Query<SuggestionQuery>,
    State(household): State<HouseholdManager>,
) -> Json<Vec<String>> {
    Json(household.ingredient_suggestions(&q.q).await)
}

async fn family(
    State(household): State<HouseholdManager>,
) -> Json<Vec<FamilyMember>> {
    Json(household.roster().await)
}

async fn add_member(
    State(household): State<HouseholdManager>,
    Json(req): Json<NewMember>,
) -> ApiResult<FamilyMember> {
    Ok(Json(household.add_member(req.profile, req.daily_requirements).await?))
}

async fn remove_member(
    Path(id): Path<String>,
    State(household): State<HouseholdManager>,
) -> ApiResult<Vec<FamilyMember>> {
    Ok(Json(household.remove_member(&id).await?))
}

async fn plan(
    State(household): State<HouseholdManager>,
) -> Json<PlanView> {
    Json(household.tracking().await.into())
}

async fn replace_plan(
    State(household): State<HouseholdManager>,
    Json(plan): Json<WeeklyMealPlan>,
) -> Json<PlanView> {
    Json(household.install_plan(plan).await.into())
}

async fn generate_plan(
    State(household): State<HouseholdManager>,
) -> ApiResult<PlanView> {
    Ok(Json(household.generate_plan().await?.into()))
}

async fn complementary(
    State(household): State<HouseholdManager>,
) -> ApiResult<Vec<ComplementarySuggestion>> {
    Ok(Json(household.complementary().await?))
}

async fn toggle_consumed(
    Path((day, slot)): Path<(String, String)>,
    State(household): State<HouseholdManager>,
) -> ApiResult<PlanView> {
    let (day, slot) = (parse_day(&day)?, parse_slot(&slot)?);
    Ok(Json(household.toggle_consumed(day, slot).await?.into()))
}

async fn meal_image(
    Path((day, slot)): Path<(String, String)>,
    State(household): State<HouseholdManager>,
) -> ApiResult<MealImage> {
    let (day, slot) = (parse_day(&day)?, parse_slot(&slot)?);
    Ok(Json(household.meal_image(day, slot).await?))
}

async fn add_extra(
    Path(day): Path<String>,
    State(household): State<HouseholdManager>,
    Json(extra): Json<NewExtraFood>,
) -> ApiResult<ExtraFoodItem> {
    let day = parse_day(&day)?;
    Ok(Json(household.add_extra(day, extra).await?))
}

async fn remove_extra(
    Path((day, id)): Path<(String, String)>,
    State(household): State<HouseholdManager>,
) -> ApiResult<PlanView> {
    let day = parse_day(&day)?;
    Ok(Json(household.remove_extra(day, &id).await.into()))
}

async fn totals(
    Path(day): Path<String>,
    Query(q): Query<TotalsQuery>,
    State(household): State<HouseholdManager>,
) -> ApiResult<DayTotals> {
    let day = parse_day(&day)?;
    Ok(Json(household.totals(day, q.mode).await?))
}

async fn portions(
    Path(day): Path<String>,
    State(household): State<HouseholdManager>,
) -> ApiResult<DayPortions> {
    let day = parse_day(&day)?;
    Ok(Json(household.portions(day).await?))
}

async fn shopping(
    State(household): State<HouseholdManager>,
) -> Json<ShoppingList> {
    Json(household.shopping().await)
}

async fn add_to_shopping(
    State(household): State<HouseholdManager>,
    Json(suggestion): Json<SuggestionItem>,
) -> Json<ShoppingList> {
    Json(household.add_to_shopping(&suggestion).await)
}

async fn toggle_shopping(
    Path(id): Path<String>,
    State(household): State<HouseholdManager>,
) -> Json<ShoppingList> {
    Json(household.toggle_shopping(&id).await)
}

async fn remove_from_shopping(
    Path(id): Path<String>,
    State(household): State<HouseholdManager>,
) -> Json<ShoppingList> {
    Json(household.remove_from_shopping(&id).await)
}

async fn tips(
    State(household): State<HouseholdManager>,
) -> Json<Vec<String>> {
    Json(household.tips().await)
}
