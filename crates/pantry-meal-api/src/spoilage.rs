use chrono::{Days, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Ingredient, PurchaseRecord};

/// Days left at or below which an item needs attention.
pub const URGENT_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpoilageVerdict {
    pub days_left: i64,
    pub is_urgent: bool,
    pub is_expired: bool,
}

impl SpoilageVerdict {
    fn from_days_left(days_left: i64) -> Self {
        Self {
            days_left,
            is_urgent: (0..=URGENT_DAYS).contains(&days_left),
            is_expired: days_left < 0,
        }
    }
}

/// Unit of a spoilage description, read from the word right after the
/// numbers. Anything unknown means days.
///
/// Months (`mes`, `meses`, `month`) are an extension on top of days and
/// weeks: "1 mes" is 30 days here, where a days-or-weeks reading would give
/// a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShelfLifeUnit { Days, Weeks, Months }

impl ShelfLifeUnit {
    fn from_token(token: Option<&str>) -> Self {
        let Some(token) = token.map(str::to_lowercase) else { return Self::Days };

        if token.starts_with("semana") || token.starts_with("week") {
            Self::Weeks
        } else if token == "mes" || token.starts_with("meses") || token.starts_with("month") {
            Self::Months
        } else {
            Self::Days
        }
    }

    fn days(self) -> u64 {
        match self {
            Self::Days => 1,
            Self::Weeks => 7,
            Self::Months => 30,
        }
    }
}

/// A parsed spoilage description such as "3-5 días".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShelfLife {
    pub min: u64,
    pub max: u64,
    pub unit: ShelfLifeUnit,
}

impl ShelfLife {
    /// Ranges may be written "1-2", "1–2", "1 a 2", "1 o 2", "1 y 2" or
    /// "1 to 2".
    pub fn parse(text: &str) -> Option<Self> {
        lazy_static! {
            static ref SHELF_LIFE_RE: Regex = Regex::new(
                r"(\d+)(?:\s*(?:[-–—]|(?i:a|o|y|to)\s)\s*(\d+))?(?:\s*(\p{L}+))?"
            ).unwrap();
        }

        let caps = SHELF_LIFE_RE.captures(text)?;
        let first: u64 = caps.get(1)?.as_str().parse().ok()?;
        let second: u64 = match caps.get(2) {
            Some(v) => v.as_str().parse().ok()?,
            None => first,
        };
        let unit = ShelfLifeUnit::from_token(caps.get(3).map(|v| v.as_str()));

        Some(Self {
            min: first.min(second).checked_mul(unit.days())?,
            max: first.max(second).checked_mul(unit.days())?,
            unit,
        })
    }

    /// worst case, the shortest end of the range
    pub fn expiry_from(&self, purchased: NaiveDate) -> Option<NaiveDate> {
        purchased.checked_add_days(Days::new(self.min))
    }
}

/// Estimates how many days an item bought on `purchased` has left on `today`.
///
/// Returns `None` when the description carries no number, the item then
/// cannot be assessed and must not be treated as urgent.
pub fn estimate(
    purchased: NaiveDate, spoilage_time: &str, today: NaiveDate,
) -> Option<SpoilageVerdict> {
    let expiry = ShelfLife::parse(spoilage_time)?.expiry_from(purchased)?;
    Some(SpoilageVerdict::from_days_left((expiry - today).num_days()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringItem {
    pub name: String,
    pub days_left: i64,
}

/// Urgent fresh produce of one purchase, most urgent first.
pub fn expiring_items(record: &PurchaseRecord, today: NaiveDate) -> Vec<ExpiringItem> {
    let mut items: Vec<ExpiringItem> = record.ingredients.iter()
        .filter(|v| v.category.is_fresh_produce())
        .filter_map(|v| expiring_item(v, record.date, today))
    .collect();

    // stable, ties keep purchase order
    items.sort_by_key(|v| v.days_left);
    items
}

fn expiring_item(
    ingredient: &Ingredient, purchased: NaiveDate, today: NaiveDate,
) -> Option<ExpiringItem> {
    let verdict = estimate(purchased, &ingredient.spoilage_time, today)?;
    verdict.is_urgent.then(|| ExpiringItem {
        name: ingredient.name.clone(),
        days_left: verdict.days_left,
    })
}
