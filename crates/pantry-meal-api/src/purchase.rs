use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{expiring_items, ExpiringItem, Ingredient};

/// How many purchases are kept around.
pub const HISTORY_LIMIT: usize = 10;

/// Wire format of every calendar date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, thiserror::Error)]
pub enum DateParseError {
    #[error("expected a YYYY-MM-DD date, got '{0}'")]
    Shape(String),
    #[error("InvalidDate: {0}")]
    InvalidDate(#[from] chrono::ParseError),
}

/// Parses a `YYYY-MM-DD` date as a plain calendar day.
///
/// No timestamp is involved, so the local timezone can never move the
/// result to a neighbouring day.
pub fn parse_calendar_date(s: &str) -> Result<NaiveDate, DateParseError> {
    let well_formed = s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !well_formed {
        return Err(DateParseError::Shape(s.to_string()));
    }
    Ok(NaiveDate::parse_from_str(s, DATE_FORMAT)?)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: String,
    pub date: NaiveDate,
    pub ingredients: Vec<Ingredient>,
}

/// Recent purchases, newest first.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseHistory {
    /// is always sorted, newest first
    records: Vec<PurchaseRecord>,
}

impl PurchaseHistory {
    /// Builds a history from records in any order.
    pub fn new(mut records: Vec<PurchaseRecord>) -> Self {
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records.dedup_by_key(|v| v.date);
        records.truncate(HISTORY_LIMIT);
        Self { records }
    }

    /// Returns the history with `record` added, replacing a purchase on the
    /// same day.
    pub fn record(&self, record: PurchaseRecord) -> Self {
        let mut records = self.records.clone();
        records.retain(|v| v.date != record.date);
        records.push(record);
        Self::new(records)
    }

    pub fn latest(&self) -> Option<&PurchaseRecord> {
        self.records.first()
    }

    pub fn records(&self) -> &[PurchaseRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Names ever bought, first occurrence order, exact duplicates removed.
    pub fn known_items(&self) -> Vec<String> {
        let mut items: Vec<String> = Vec::new();
        for name in self.records.iter().flat_map(|v| v.ingredients.iter().map(|i| &i.name)) {
            if !items.contains(name) {
                items.push(name.clone());
            }
        }
        items
    }

    /// Spoilage alerts for the newest purchase.
    pub fn alerts(&self, today: NaiveDate) -> Vec<ExpiringItem> {
        self.latest()
            .map(|v| expiring_items(v, today))
        .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    fn record(id: &str, date: &str, names: &[&str]) -> PurchaseRecord {
        PurchaseRecord {
            id: id.into(),
            date: parse_calendar_date(date).unwrap(),
            ingredients: names.iter().map(|n| Ingredient {
                name: n.to_string(),
                spoilage_time: "2 días".into(),
                category: Category::Fruit,
            }).collect(),
        }
    }

    #[test]
    fn calendar_dates_are_strict() {
        assert_eq!(
            parse_calendar_date("2024-01-03").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        );
        assert!(matches!(parse_calendar_date("2024-1-3"), Err(DateParseError::Shape(_))));
        assert!(matches!(parse_calendar_date("2024-01-03T00:00:00Z"), Err(DateParseError::Shape(_))));
        assert!(matches!(parse_calendar_date("2024-02-30"), Err(DateParseError::InvalidDate(_))));
    }

    #[test]
    fn record_keeps_newest_first_and_caps() {
        let mut history = PurchaseHistory::default();
        for day in 1..=12 {
            history = history.record(record(&format!("p{day}"), &format!("2024-01-{day:02}"), &["Mango"]));
        }

        assert_eq!(history.records().len(), HISTORY_LIMIT);
        assert_eq!(history.latest().unwrap().id, "p12");
        assert_eq!(history.records().last().unwrap().id, "p3");
    }

    #[test]
    fn record_replaces_same_day() {
        let history = PurchaseHistory::default()
            .record(record("a", "2024-01-01", &["Mango"]))
            .record(record("b", "2024-01-02", &["Pera"]))
            .record(record("c", "2024-01-01", &["Uva"]));

        let ids: Vec<_> = history.records().iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn older_purchase_does_not_become_latest() {
        let history = PurchaseHistory::default()
            .record(record("new", "2024-05-10", &["Mango"]))
            .record(record("old", "2024-05-01", &["Pera"]));
        assert_eq!(history.latest().unwrap().id, "new");
    }

    #[test]
    fn known_items_are_unique() {
        let history = PurchaseHistory::new(vec![
            record("a", "2024-01-01", &["Mango", "Pera"]),
            record("b", "2024-01-02", &["Pera", "Uva"]),
        ]);
        assert_eq!(history.known_items(), vec!["Pera", "Uva", "Mango"]);
    }

    #[test]
    fn alerts_use_latest_purchase() {
        let history = PurchaseHistory::new(vec![
            record("a", "2024-01-01", &["Mango"]),
            record("b", "2024-01-05", &["Uva"]),
        ]);
        let alerts = history.alerts(parse_calendar_date("2024-01-05").unwrap());
        assert_eq!(alerts, vec![ExpiringItem { name: "Uva".into(), days_left: 2 }]);

        assert!(PurchaseHistory::default().alerts(parse_calendar_date("2024-01-05").unwrap()).is_empty());
    }
}
