use std::{future::Future, sync::Arc};

use chrono::NaiveDate;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::{FindOptions, ReplaceOptions},
    Collection,
};
use tokio::sync::RwLock;
use pantry_meal_api::{
    calorie_progress, merge, project, AggregateMode, ComplementarySuggestion,
    DailyRequirements, ExpiringItem, ExtraFoodItem, FamilyMember, Ingredient,
    MealImage, MealSlot, MemberProfile, PlanDay, PurchaseHistory, PurchaseRecord,
    ShoppingList, SuggestionItem, TrackingError, TrackingSnapshot, WeeklyMealPlan,
    HISTORY_LIMIT,
};

use crate::generation::Generator;

mod data;
pub use data::*;

/// Shown when no tips could be generated.
pub const FALLBACK_TIPS: [&str; 2] = ["Bebe más agua hoy.", "Come frutas y verduras."];

#[derive(Debug, Default, Clone)]
struct Household {
    history: PurchaseHistory,
    roster: Vec<FamilyMember>,
    tracking: TrackingSnapshot,
    shopping: ShoppingList,
}

fn new_id() -> String {
    ObjectId::new().to_hex()
}

/// Trims hand-typed names and drops the blank ones.
fn clean_manual(names: &[String]) -> Vec<String> {
    names.iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
    .collect()
}

fn image_of(tracking: &TrackingSnapshot, day: PlanDay, slot: MealSlot) -> MealImage {
    tracking.plan()
        .map(|v| v.meal(day, slot).image.clone())
    .unwrap_or_default()
}

/// Owns the household state. In-memory state is authoritative, the document
/// store only mirrors purchases and the family roster.
#[derive(Clone)]
pub struct HouseholdManager {
    generator: Option<Generator>,
    collections: Option<HouseholdCollections>,
    data: Arc<RwLock<Household>>,
}

impl HouseholdManager {
    pub fn new(generator: Option<Generator>, collections: Option<HouseholdCollections>) -> Self {
        Self {
            generator,
            collections,
            data: Arc::new(RwLock::new(Household::default())),
        }
    }

    /// Restores purchases and the roster from the document store.
    pub async fn load(&self) {
        let Some(collections) = &self.collections else { return };

        match collections.load_purchases().await {
            Ok(records) => {
                tracing::info!("loaded {} purchases", records.len());
                self.data.write().await.history = PurchaseHistory::new(records);
            },
            Err(err) => tracing::error!("could not load purchases: {err}"),
        }

        match collections.load_family().await {
            Ok(roster) => {
                tracing::info!("loaded {} family members", roster.len());
                self.data.write().await.roster = roster;
            },
            Err(err) => tracing::error!("could not load family: {err}"),
        }
    }

    fn generator(&self) -> Result<&Generator, HouseholdError> {
        self.generator.as_ref().ok_or(HouseholdError::GenerationDisabled)
    }

    /// Runs a write against the document store in the background.
    fn persist<F, Fut>(&self, what: &'static str, write: F)
    where
        F: FnOnce(HouseholdCollections) -> Fut,
        Fut: Future<Output = mongodb::error::Result<()>> + Send + 'static,
    {
        if let Some(collections) = self.collections.clone() {
            let task = write(collections);
            tokio::spawn(async move {
                if let Err(err) = task.await {
                    tracing::error!("could not store {what}: {err}");
                }
            });
        }
    }

    pub async fn history(&self) -> PurchaseHistory {
        self.data.read().await.history.clone()
    }

    pub async fn record_purchase(
        &self, date: NaiveDate, vision: &[Ingredient], manual: &[String],
    ) -> Result<PurchaseRecord, HouseholdError> {
        let vision: Vec<_> = vision.iter()
            .map(|v| Ingredient { name: v.name.trim().to_string(), ..v.clone() })
        .collect();
        let ingredients = merge(&vision, &clean_manual(manual));
        if ingredients.is_empty() {
            return Err(HouseholdError::NoIngredients);
        }

        let record = PurchaseRecord { id: new_id(), date, ingredients };

        let mut data = self.data.write().await;
        data.history = data.history.record(record.clone());
        let keep_from = (data.history.records().len() >= HISTORY_LIMIT)
            .then(|| data.history.records().last().map(|v| v.date))
        .flatten();
        drop(data);

        tracing::info!("recorded purchase of {date} with {} items", record.ingredients.len());

        let stored = record.clone();
        self.persist("purchase", move |c| async move {
            c.store_purchase(&stored, keep_from).await
        });

        Ok(record)
    }

    pub async fn analyze_purchase(
        &self, date: NaiveDate, images: &[String], manual: &[String],
    ) -> Result<AnalyzeOutcome, HouseholdError> {
        let generator = self.generator()?;
        if images.is_empty() {
            return Err(HouseholdError::NoImages);
        }

        let analysis = generator.analyze_images(images).await?;
        let purchase = self.record_purchase(date, &analysis.identified_ingredients, manual).await?;

        let names: Vec<_> = purchase.ingredients.iter().map(|v| v.name.clone()).collect();
        let assessment = match generator.evaluate_balance(&names).await {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!("could not evaluate purchase balance: {err}");
                None
            },
        };

        Ok(AnalyzeOutcome {
            purchase,
            recipes: analysis.recipe_suggestions,
            assessment,
        })
    }

    pub async fn alerts(&self, today: NaiveDate) -> Vec<ExpiringItem> {
        self.data.read().await.history.alerts(today)
    }

    pub async fn roster(&self) -> Vec<FamilyMember> {
        self.data.read().await.roster.clone()
    }

    /// Adds a member, asking the generation service for the daily
    /// requirements when none are given.
    pub async fn add_member(
        &self, mut profile: MemberProfile, requirements: Option<DailyRequirements>,
    ) -> Result<FamilyMember, HouseholdError> {
        profile.name = profile.name.trim().to_string();
        if profile.name.is_empty() {
            return Err(HouseholdError::InvalidMember);
        }

        let daily_requirements = match requirements {
            Some(v) => v,
            None => self.generator()?.daily_requirements(&profile).await?,
        };

        let member = FamilyMember { id: new_id(), profile, daily_requirements };
        self.data.write().await.roster.push(member.clone());

        let stored = member.clone();
        self.persist("family member", move |c| async move {
            c.store_member(&stored).await
        });

        Ok(member)
    }

    pub async fn remove_member(&self, id: &str) -> Result<Vec<FamilyMember>, HouseholdError> {
        let mut data = self.data.write().await;
        let before = data.roster.len();
        data.roster.retain(|v| v.id != id);
        if data.roster.len() == before {
            return Err(HouseholdError::MemberNotFound(id.to_string()));
        }
        let roster = data.roster.clone();
        drop(data);

        let id = id.to_string();
        self.persist("family member removal", move |c| async move {
            c.delete_member(&id).await
        });

        Ok(roster)
    }

    pub async fn tracking(&self) -> TrackingSnapshot {
        self.data.read().await.tracking.clone()
    }

    /// Installs `plan` as the active plan, resetting consumption tracking.
    pub async fn install_plan(&self, plan: WeeklyMealPlan) -> TrackingSnapshot {
        let mut data = self.data.write().await;
        data.tracking = data.tracking.replace_plan(plan);
        data.tracking.clone()
    }

    pub async fn generate_plan(&self) -> Result<TrackingSnapshot, HouseholdError> {
        let generator = self.generator()?;

        let (ingredients, history, roster) = {
            let data = self.data.read().await;
            if data.history.is_empty() {
                tracing::warn!("generating a plan without any recorded purchase");
            }
            let ingredients: Vec<_> = data.history.latest()
                .map(|v| v.ingredients.iter().map(|i| i.name.clone()).collect())
            .unwrap_or_default();
            (ingredients, data.history.known_items(), data.roster.clone())
        };

        let plan = generator.weekly_plan(&ingredients, &history, &roster).await?;
        tracing::info!("generated weekly plan for {} members", roster.len());

        Ok(self.install_plan(plan).await)
    }

    async fn transition(
        &self, next: impl FnOnce(&TrackingSnapshot) -> Result<TrackingSnapshot, TrackingError>,
    ) -> Result<TrackingSnapshot, HouseholdError> {
        let mut data = self.data.write().await;
        data.tracking = next(&data.tracking)?;
        Ok(data.tracking.clone())
    }

    pub async fn toggle_consumed(
        &self, day: PlanDay, slot: MealSlot,
    ) -> Result<TrackingSnapshot, HouseholdError> {
        self.transition(|v| v.toggle_consumed(day, slot)).await
    }

    pub async fn add_extra(
        &self, day: PlanDay, extra: NewExtraFood,
    ) -> Result<ExtraFoodItem, HouseholdError> {
        let item = ExtraFoodItem {
            id: new_id(),
            name: extra.name.trim().to_string(),
            calories: extra.calories,
            protein: extra.protein,
            carbs: extra.carbs,
            fat: extra.fat,
        };

        self.transition(|v| v.add_extra(day, item.clone())).await?;
        Ok(item)
    }

    pub async fn remove_extra(&self, day: PlanDay, id: &str) -> TrackingSnapshot {
        let mut data = self.data.write().await;
        data.tracking = data.tracking.remove_extra(day, id);
        data.tracking.clone()
    }

    pub async fn totals(
        &self, day: PlanDay, mode: AggregateMode,
    ) -> Result<DayTotals, HouseholdError> {
        let data = self.data.read().await;
        let totals = data.tracking.daily_totals(day, mode)?;
        let consumed = data.tracking.daily_totals(day, AggregateMode::ConsumedOnly)?;

        Ok(DayTotals {
            totals,
            progress: calorie_progress(&consumed, &data.roster),
        })
    }

    pub async fn portions(&self, day: PlanDay) -> Result<DayPortions, HouseholdError> {
        let data = self.data.read().await;
        let planned = data.tracking.daily_totals(day, AggregateMode::FullDay)?;
        let projections = project(&planned, &data.roster);

        let members = data.roster.iter()
            .filter_map(|member| {
                let projection = projections.get(&member.id)?;
                Some(MemberPortion {
                    id: member.id.clone(),
                    name: member.profile.name.clone(),
                    multiplier: projection.multiplier,
                    band: projection.band(),
                    projected: projection.projected,
                    coverage: projection.coverage(&member.daily_requirements),
                })
            })
        .collect();

        Ok(DayPortions { planned, members })
    }

    /// Generates the image of one meal.
    ///
    /// A meal that is already loading or has an image is returned as is.
    /// A failed generation leaves the meal without image so it can be
    /// requested again.
    pub async fn meal_image(
        &self, day: PlanDay, slot: MealSlot,
    ) -> Result<MealImage, HouseholdError> {
        let generator = self.generator()?;

        let prompt = {
            let mut data = self.data.write().await;
            let Some(next) = data.tracking.begin_image(day, slot)? else {
                return Ok(image_of(&data.tracking, day, slot));
            };
            data.tracking = next;
            data.tracking.plan()
                .map(|v| v.meal(day, slot).image_prompt.clone())
            .unwrap_or_default()
        };

        let url = match generator.meal_image(&prompt).await {
            Ok(v) => v,
            Err(err) => {
                tracing::warn!("could not generate image for {day}-{slot}: {err}");
                None
            },
        };

        // the plan may have been replaced, and the new meal may be loading
        // an image of its own by now
        let mut data = self.data.write().await;
        let same_request = data.tracking.plan()
            .map(|v| v.meal(day, slot))
            .is_some_and(|v| v.image == MealImage::Loading && v.image_prompt == prompt);
        if !same_request {
            tracing::info!("plan changed while generating image for {day}-{slot}, dropping it");
            return Ok(image_of(&data.tracking, day, slot));
        }

        data.tracking = data.tracking.finish_image(day, slot, url)?;
        Ok(image_of(&data.tracking, day, slot))
    }

    pub async fn shopping(&self) -> ShoppingList {
        self.data.read().await.shopping.clone()
    }

    pub async fn add_to_shopping(&self, suggestion: &SuggestionItem) -> ShoppingList {
        let mut data = self.data.write().await;
        data.shopping = data.shopping.add(new_id(), suggestion);
        data.shopping.clone()
    }

    pub async fn toggle_shopping(&self, id: &str) -> ShoppingList {
        let mut data = self.data.write().await;
        data.shopping = data.shopping.toggle(id);
        data.shopping.clone()
    }

    pub async fn remove_from_shopping(&self, id: &str) -> ShoppingList {
        let mut data = self.data.write().await;
        data.shopping = data.shopping.remove(id);
        data.shopping.clone()
    }

    /// Generated health tips, [`FALLBACK_TIPS`] when there are none.
    pub async fn tips(&self) -> Vec<String> {
        let tips = match &self.generator {
            Some(generator) => generator.health_tips().await
                .map_err(|err| tracing::warn!("could not generate tips: {err}"))
            .ok(),
            None => None,
        };

        tips.filter(|v| !v.is_empty())
            .unwrap_or_else(|| FALLBACK_TIPS.map(String::from).to_vec())
    }

    /// Products that complement the active plan, skipping what was bought
    /// last or is already on the shopping list.
    pub async fn complementary(&self) -> Result<Vec<ComplementarySuggestion>, HouseholdError> {
        let generator = self.generator()?;

        let (plan, roster, existing) = {
            let data = self.data.read().await;
            let plan = data.tracking.plan().cloned().ok_or(TrackingError::NoPlan)?;
            let existing: Vec<_> = data.history.latest()
                .into_iter()
                .flat_map(|v| v.ingredients.iter().map(|i| i.name.clone()))
                .chain(data.shopping.items().iter().map(|v| v.name.clone()))
            .collect();
            (plan, data.roster.clone(), existing)
        };

        Ok(generator.complementary_suggestions(&plan, &roster, &existing).await?)
    }

    /// Ingredient names for autocompletion, empty on any failure.
    pub async fn ingredient_suggestions(&self, query: &str) -> Vec<String> {
        let query = query.trim();
        let Some(generator) = &self.generator else { return Vec::new() };
        if query.is_empty() {
            return Vec::new();
        }

        let existing = self.data.read().await.history.known_items();
        generator.ingredient_suggestions(query, &existing).await
            .unwrap_or_else(|err| {
                tracing::warn!("could not suggest ingredients for {query:?}: {err}");
                Vec::new()
            })
    }
}

#[derive(Clone)]
pub struct HouseholdCollections {
    purchases: Collection<PurchaseDoc>,
    family: Collection<MemberDoc>,
}

impl HouseholdCollections {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            purchases: db.collection("purchases"),
            family: db.collection("family"),
        }
    }

    async fn load_purchases(&self) -> mongodb::error::Result<Vec<PurchaseRecord>> {
        let mut cursor = self.purchases.find(None, FindOptions::builder()
            .sort(doc! { "date": -1 })
            .limit(HISTORY_LIMIT as i64)
        .build()).await?;

        let mut records = Vec::new();
        while cursor.advance().await? {
            records.push(cursor.deserialize_current()?.record);
        }
        Ok(records)
    }

    async fn load_family(&self) -> mongodb::error::Result<Vec<FamilyMember>> {
        let mut cursor = self.family.find(None, None).await?;

        let mut roster = Vec::new();
        while cursor.advance().await? {
            roster.push(cursor.deserialize_current()?.member);
        }
        Ok(roster)
    }

    /// Stores a purchase, replacing one of the same day, and drops purchases
    /// older than `keep_from`.
    async fn store_purchase(
        &self, record: &PurchaseRecord, keep_from: Option<NaiveDate>,
    ) -> mongodb::error::Result<()> {
        self.purchases.replace_one(doc! {
            "date": record.date.to_string(),
        }, PurchaseDoc {
            _id: None,
            record: record.clone(),
        }, ReplaceOptions::builder()
            .upsert(true)
        .build()).await?;

        if let Some(keep_from) = keep_from {
            self.purchases.delete_many(doc! {
                "date": { "$lt": keep_from.to_string() },
            }, None).await?;
        }

        Ok(())
    }

    async fn store_member(&self, member: &FamilyMember) -> mongodb::error::Result<()> {
        self.family.replace_one(doc! {
            "id": &member.id,
        }, MemberDoc {
            _id: None,
            member: member.clone(),
        }, ReplaceOptions::builder()
            .upsert(true)
        .build()).await?;

        Ok(())
    }

    async fn delete_member(&self, id: &str) -> mongodb::error::Result<()> {
        self.family.delete_one(doc! { "id": id }, None).await?;
        Ok(())
    }
}
