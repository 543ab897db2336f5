use std::{collections::HashMap, fmt, str::FromStr};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::raw;

/// Fixed day keys of a weekly plan, week starts on sunday.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanDay {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl PlanDay {
    pub const ALL: [PlanDay; 7] = [
        PlanDay::Sunday, PlanDay::Monday, PlanDay::Tuesday, PlanDay::Wednesday,
        PlanDay::Thursday, PlanDay::Friday, PlanDay::Saturday,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PlanDay::Sunday => "sunday",
            PlanDay::Monday => "monday",
            PlanDay::Tuesday => "tuesday",
            PlanDay::Wednesday => "wednesday",
            PlanDay::Thursday => "thursday",
            PlanDay::Friday => "friday",
            PlanDay::Saturday => "saturday",
        }
    }
}

impl From<Weekday> for PlanDay {
    fn from(value: Weekday) -> Self {
        Self::ALL[value.num_days_from_sunday() as usize]
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown plan day: '{0}'")]
pub struct UnknownDay(pub String);

impl FromStr for PlanDay {
    type Err = UnknownDay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Self::ALL.into_iter()
            .find(|v| v.key() == lower)
        .ok_or_else(|| UnknownDay(s.to_string()))
    }
}

impl fmt::Display for PlanDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MealSlot {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 5] = [
        MealSlot::Breakfast, MealSlot::MorningSnack, MealSlot::Lunch,
        MealSlot::AfternoonSnack, MealSlot::Dinner,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::MorningSnack => "morningSnack",
            MealSlot::Lunch => "lunch",
            MealSlot::AfternoonSnack => "afternoonSnack",
            MealSlot::Dinner => "dinner",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown meal slot: '{0}'")]
pub struct UnknownSlot(pub String);

impl FromStr for MealSlot {
    type Err = UnknownSlot;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter()
            .find(|v| v.key().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| UnknownSlot(s.to_string()))
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Image of a meal, generated on demand.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum MealImage {
    #[default]
    NotRequested,
    Loading,
    Ready { url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub name: String,
    /// macros are per serving, one adult base portion
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub micronutrients: String,
    pub instructions: String,
    pub image_prompt: String,
    #[serde(default)]
    pub image: MealImage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMeal {
    pub breakfast: Meal,
    pub morning_snack: Meal,
    pub lunch: Meal,
    pub afternoon_snack: Meal,
    pub dinner: Meal,
    pub water_intake_liters: f64,
}

impl DailyMeal {
    pub fn meal(&self, slot: MealSlot) -> &Meal {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::MorningSnack => &self.morning_snack,
            MealSlot::Lunch => &self.lunch,
            MealSlot::AfternoonSnack => &self.afternoon_snack,
            MealSlot::Dinner => &self.dinner,
        }
    }

    pub fn meal_mut(&mut self, slot: MealSlot) -> &mut Meal {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::MorningSnack => &mut self.morning_snack,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::AfternoonSnack => &mut self.afternoon_snack,
            MealSlot::Dinner => &mut self.dinner,
        }
    }

    pub fn meals(&self) -> impl Iterator<Item = (MealSlot, &Meal)> {
        MealSlot::ALL.into_iter().map(move |v| (v, self.meal(v)))
    }
}

/// A full week, every day is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMealPlan {
    pub sunday: DailyMeal,
    pub monday: DailyMeal,
    pub tuesday: DailyMeal,
    pub wednesday: DailyMeal,
    pub thursday: DailyMeal,
    pub friday: DailyMeal,
    pub saturday: DailyMeal,
}

impl WeeklyMealPlan {
    pub fn day(&self, day: PlanDay) -> &DailyMeal {
        match day {
            PlanDay::Sunday => &self.sunday,
            PlanDay::Monday => &self.monday,
            PlanDay::Tuesday => &self.tuesday,
            PlanDay::Wednesday => &self.wednesday,
            PlanDay::Thursday => &self.thursday,
            PlanDay::Friday => &self.friday,
            PlanDay::Saturday => &self.saturday,
        }
    }

    pub fn day_mut(&mut self, day: PlanDay) -> &mut DailyMeal {
        match day {
            PlanDay::Sunday => &mut self.sunday,
            PlanDay::Monday => &mut self.monday,
            PlanDay::Tuesday => &mut self.tuesday,
            PlanDay::Wednesday => &mut self.wednesday,
            PlanDay::Thursday => &mut self.thursday,
            PlanDay::Friday => &mut self.friday,
            PlanDay::Saturday => &mut self.saturday,
        }
    }

    pub fn days(&self) -> impl Iterator<Item = (PlanDay, &DailyMeal)> {
        PlanDay::ALL.into_iter().map(move |v| (v, self.day(v)))
    }

    pub fn meal(&self, day: PlanDay, slot: MealSlot) -> &Meal {
        self.day(day).meal(slot)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlanParseError {
    #[error(transparent)]
    UnknownDay(#[from] UnknownDay),
    #[error("generated plan is missing {0}")]
    MissingDay(PlanDay),
}

impl From<raw::ApiMeal> for Meal {
    fn from(value: raw::ApiMeal) -> Self {
        Self {
            name: value.name,
            calories: value.calories,
            protein: value.protein,
            carbs: value.carbs,
            fat: value.fat,
            micronutrients: value.micronutrients,
            instructions: value.instructions,
            image_prompt: value.image_prompt,
            image: MealImage::NotRequested,
        }
    }
}

impl From<raw::ApiDailyPlan> for DailyMeal {
    fn from(value: raw::ApiDailyPlan) -> Self {
        Self {
            breakfast: value.breakfast.into(),
            morning_snack: value.morning_snack.into(),
            lunch: value.lunch.into(),
            afternoon_snack: value.afternoon_snack.into(),
            dinner: value.dinner.into(),
            water_intake_liters: value.water_intake_liters,
        }
    }
}

impl TryFrom<raw::ApiWeeklyPlan> for WeeklyMealPlan {
    type Error = PlanParseError;

    fn try_from(value: raw::ApiWeeklyPlan) -> Result<Self, Self::Error> {
        let mut days = HashMap::<PlanDay, DailyMeal>::new();
        for plan in value.daily_plans {
            let day: PlanDay = plan.day.parse()?;

            if days.insert(day, plan.into()).is_some() {
                tracing::warn!("{day} was generated twice, keeping the later one");
            }
        }

        let mut take = |day: PlanDay| days.remove(&day).ok_or(PlanParseError::MissingDay(day));
        Ok(Self {
            sunday: take(PlanDay::Sunday)?,
            monday: take(PlanDay::Monday)?,
            tuesday: take(PlanDay::Tuesday)?,
            wednesday: take(PlanDay::Wednesday)?,
            thursday: take(PlanDay::Thursday)?,
            friday: take(PlanDay::Friday)?,
            saturday: take(PlanDay::Saturday)?,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn meal(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> Meal {
        Meal {
            name: name.into(),
            calories, protein, carbs, fat,
            micronutrients: String::new(),
            instructions: String::new(),
            image_prompt: format!("photo of {name}"),
            image: MealImage::NotRequested,
        }
    }

    /// 400 + 150 + 700 + 200 + 550 = 2000 kcal
    pub(crate) fn sample_day() -> DailyMeal {
        DailyMeal {
            breakfast: meal("Arepa con huevo", 400.0, 20.0, 45.0, 15.0),
            morning_snack: meal("Fruta picada", 150.0, 2.0, 35.0, 1.0),
            lunch: meal("Bandeja paisa", 700.0, 40.0, 70.0, 30.0),
            afternoon_snack: meal("Yogur", 200.0, 10.0, 25.0, 6.0),
            dinner: meal("Sancocho", 550.0, 28.0, 60.0, 18.0),
            water_intake_liters: 2.0,
        }
    }

    pub(crate) fn sample_plan() -> WeeklyMealPlan {
        WeeklyMealPlan {
            sunday: sample_day(),
            monday: sample_day(),
            tuesday: sample_day(),
            wednesday: sample_day(),
            thursday: sample_day(),
            friday: sample_day(),
            saturday: sample_day(),
        }
    }

    #[test]
    fn day_and_slot_keys_parse() {
        assert_eq!("Monday".parse::<PlanDay>().unwrap(), PlanDay::Monday);
        assert_eq!("morningsnack".parse::<MealSlot>().unwrap(), MealSlot::MorningSnack);
        assert!("lunes".parse::<PlanDay>().is_err());
        assert_eq!(PlanDay::from(Weekday::Sun), PlanDay::Sunday);
        assert_eq!(PlanDay::from(Weekday::Sat), PlanDay::Saturday);
    }

    #[test]
    fn image_state_is_tagged() {
        let ready = MealImage::Ready { url: "data:image/png;base64,AA".into() };
        let json = serde_json::to_value(&ready).unwrap();
        assert_eq!(json, serde_json::json!({ "state": "ready", "url": "data:image/png;base64,AA" }));

        let loading: MealImage = serde_json::from_str(r#"{"state":"loading"}"#).unwrap();
        assert_eq!(loading, MealImage::Loading);
    }
}
