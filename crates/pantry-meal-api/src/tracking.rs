use std::{collections::{BTreeMap, BTreeSet, HashSet}, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    aggregate, AggregateMode, ExtraFoodItem, MacroTotals, MealImage,
    MealSlot, PlanDay, WeeklyMealPlan,
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TrackingError {
    #[error("no meal plan has been generated yet")]
    NoPlan,
}

/// The active weekly plan together with what was actually eaten.
///
/// Snapshots are never mutated in place, every transition returns a new
/// snapshot. The plan is shared between snapshots until a transition has to
/// change a meal.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSnapshot {
    plan: Option<Arc<WeeklyMealPlan>>,
    consumed: BTreeSet<(PlanDay, MealSlot)>,
    extras: BTreeMap<PlanDay, Vec<ExtraFoodItem>>,
}

impl TrackingSnapshot {
    pub fn new(plan: WeeklyMealPlan) -> Self {
        Self { plan: Some(Arc::new(plan)), ..Default::default() }
    }

    pub fn plan(&self) -> Option<&WeeklyMealPlan> {
        self.plan.as_deref()
    }

    /// Installs a new plan, consumption tracking starts over.
    pub fn replace_plan(&self, plan: WeeklyMealPlan) -> Self {
        Self::new(plan)
    }

    pub fn toggle_consumed(&self, day: PlanDay, slot: MealSlot) -> Result<Self, TrackingError> {
        self.require_plan()?;

        let mut next = self.clone();
        if !next.consumed.remove(&(day, slot)) {
            next.consumed.insert((day, slot));
        }
        Ok(next)
    }

    pub fn add_extra(&self, day: PlanDay, item: ExtraFoodItem) -> Result<Self, TrackingError> {
        self.require_plan()?;

        let mut next = self.clone();
        next.extras.entry(day).or_default().push(item);
        Ok(next)
    }

    pub fn remove_extra(&self, day: PlanDay, id: &str) -> Self {
        let mut next = self.clone();
        if let Some(items) = next.extras.get_mut(&day) {
            items.retain(|v| v.id != id);
            if items.is_empty() {
                next.extras.remove(&day);
            }
        }
        next
    }

    /// Marks a meal image as being generated.
    ///
    /// Returns `None` when the image is already loading or ready.
    pub fn begin_image(&self, day: PlanDay, slot: MealSlot) -> Result<Option<Self>, TrackingError> {
        let plan = self.require_plan()?;
        if plan.meal(day, slot).image != MealImage::NotRequested {
            return Ok(None);
        }
        Ok(Some(self.with_image(day, slot, MealImage::Loading)))
    }

    /// Stores the outcome of an image generation, no url resets the meal so
    /// the image can be requested again.
    pub fn finish_image(
        &self, day: PlanDay, slot: MealSlot, url: Option<String>,
    ) -> Result<Self, TrackingError> {
        let plan = self.require_plan()?;
        if plan.meal(day, slot).image != MealImage::Loading {
            tracing::warn!("image for {day}-{slot} finished without being requested");
        }

        let image = match url {
            Some(url) if !url.is_empty() => MealImage::Ready { url },
            _ => MealImage::NotRequested,
        };
        Ok(self.with_image(day, slot, image))
    }

    fn with_image(&self, day: PlanDay, slot: MealSlot, image: MealImage) -> Self {
        let mut next = self.clone();
        if let Some(plan) = next.plan.as_mut() {
            Arc::make_mut(plan).day_mut(day).meal_mut(slot).image = image;
        }
        next
    }

    fn require_plan(&self) -> Result<&WeeklyMealPlan, TrackingError> {
        self.plan().ok_or(TrackingError::NoPlan)
    }

    pub fn is_consumed(&self, day: PlanDay, slot: MealSlot) -> bool {
        self.consumed.contains(&(day, slot))
    }

    pub fn consumed_for(&self, day: PlanDay) -> HashSet<MealSlot> {
        self.consumed.range((day, MealSlot::Breakfast)..=(day, MealSlot::Dinner))
            .map(|(_, slot)| *slot)
        .collect()
    }

    /// Consumed markers in their `day-slot` wire form.
    pub fn consumed_keys(&self) -> Vec<String> {
        self.consumed.iter()
            .map(|(day, slot)| format!("{day}-{slot}"))
        .collect()
    }

    pub fn extras_for(&self, day: PlanDay) -> &[ExtraFoodItem] {
        self.extras.get(&day).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn daily_totals(&self, day: PlanDay, mode: AggregateMode) -> Result<MacroTotals, TrackingError> {
        let plan = self.require_plan()?;
        Ok(aggregate(plan.day(day), &self.consumed_for(day), self.extras_for(day), mode))
    }
}
