use std::{collections::HashSet, iter::Sum, ops::{Add, AddAssign}};

use serde::{Deserialize, Serialize};

use crate::{DailyMeal, Meal, MealSlot};

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Add for MacroTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl AddAssign for MacroTotals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for MacroTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl From<&Meal> for MacroTotals {
    fn from(value: &Meal) -> Self {
        Self {
            calories: value.calories,
            protein: value.protein,
            carbs: value.carbs,
            fat: value.fat,
        }
    }
}

/// Food eaten outside of the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraFoodItem {
    pub id: String,
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl From<&ExtraFoodItem> for MacroTotals {
    fn from(value: &ExtraFoodItem) -> Self {
        Self {
            calories: value.calories,
            protein: value.protein,
            carbs: value.carbs,
            fat: value.fat,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateMode {
    /// only meals marked as eaten
    #[default]
    ConsumedOnly,
    /// every planned meal
    FullDay,
}

/// Sums the macros of one day.
///
/// Extras are logged consumption and count in both modes. Values are not
/// rounded.
pub fn aggregate(
    day: &DailyMeal,
    consumed: &HashSet<MealSlot>,
    extras: &[ExtraFoodItem],
    mode: AggregateMode,
) -> MacroTotals {
    let meals: MacroTotals = day.meals()
        .filter(|(slot, _)| match mode {
            AggregateMode::FullDay => true,
            AggregateMode::ConsumedOnly => consumed.contains(slot),
        })
        .map(|(_, meal)| MacroTotals::from(meal))
    .sum();

    meals + extras.iter().map(MacroTotals::from).sum::<MacroTotals>()
}
