use pantry_meal_api::{
    merge, parse_calendar_date, project, raw, AggregateMode, AnalysisResult, Category,
    ExtraFoodItem, FamilyMember, MealSlot, PlanDay, PlanParseError, PortionBand,
    PurchaseHistory, PurchaseRecord, TrackingSnapshot, WeeklyMealPlan,
};
use serde_json::json;

fn meal(name: &str, calories: f64, protein: f64) -> serde_json::Value {
    json!({
        "name": name,
        "calories": calories,
        "protein": protein,
        "carbs": calories / 10.0,
        "fat": calories / 50.0,
        "micronutrients": "Vitamina C",
        "imagePrompt": format!("Professional food photography of {name}"),
        "instructions": "Cocinar."
    })
}

fn day_plan(day: &str) -> serde_json::Value {
    json!({
        "day": day,
        "breakfast": meal("Calentado", 500.0, 20.0),
        "morningSnack": meal("Mango", 100.0, 1.0),
        "lunch": meal("Ajiaco", 800.0, 45.0),
        "afternoonSnack": meal("Queso con bocadillo", 200.0, 8.0),
        "dinner": meal("Arroz con pollo", 400.0, 26.0),
        "waterIntakeLiters": 2.5
    })
}

fn generated_plan(days: &[&str]) -> raw::ApiWeeklyPlan {
    let plans: Vec<_> = days.iter().map(|d| day_plan(d)).collect();
    serde_json::from_value(json!({ "dailyPlans": plans })).unwrap()
}

const WEEK: [&str; 7] = ["sunday", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday"];

#[test]
fn generated_plan_folds_into_week() {
    let plan = WeeklyMealPlan::try_from(generated_plan(&WEEK)).unwrap();
    assert_eq!(plan.days().count(), 7);
    assert_eq!(plan.meal(PlanDay::Wednesday, MealSlot::Lunch).name, "Ajiaco");
    assert_eq!(plan.day(PlanDay::Saturday).water_intake_liters, 2.5);
}

#[test]
fn generated_plan_must_cover_every_day() {
    let err = WeeklyMealPlan::try_from(generated_plan(&WEEK[..6])).unwrap_err();
    assert!(matches!(err, PlanParseError::MissingDay(PlanDay::Saturday)));

    let mut days = WEEK.to_vec();
    days.push("domingo");
    let err = WeeklyMealPlan::try_from(generated_plan(&days)).unwrap_err();
    assert!(matches!(err, PlanParseError::UnknownDay(_)));
}

#[test]
fn tracking_feeds_portions() {
    let plan = WeeklyMealPlan::try_from(generated_plan(&WEEK)).unwrap();
    let roster: Vec<FamilyMember> = serde_json::from_value(json!([
        {
            "id": "ana", "name": "Ana", "age": 38, "gender": "female",
            "activityLevel": "lightly_active", "goal": "maintain_weight",
            "dailyRequirements": { "calories": 2000.0, "protein": 90.0, "carbs": 250.0, "fat": 65.0 }
        },
        {
            "id": "tomas", "name": "Tomás", "age": 6, "gender": "male",
            "activityLevel": "very_active", "goal": "healthy_growth",
            "dailyRequirements": { "calories": 1400.0, "protein": 35.0, "carbs": 180.0, "fat": 45.0 }
        }
    ])).unwrap();

    let state = TrackingSnapshot::new(plan)
        .toggle_consumed(PlanDay::Monday, MealSlot::Lunch).unwrap()
        .add_extra(PlanDay::Monday, ExtraFoodItem {
            id: "x1".into(),
            name: "Buñuelo".into(),
            calories: 150.0,
            protein: 4.0,
            carbs: 15.0,
            fat: 8.0,
        }).unwrap();

    let consumed = state.daily_totals(PlanDay::Monday, AggregateMode::ConsumedOnly).unwrap();
    assert_eq!(consumed.calories, 950.0);

    let planned = state.daily_totals(PlanDay::Tuesday, AggregateMode::FullDay).unwrap();
    assert_eq!(planned.calories, 2000.0);

    let portions = project(&planned, &roster);
    assert_eq!(portions["ana"].multiplier, 1.0);
    assert_eq!(portions["ana"].projected.protein, planned.protein);
    assert_eq!(portions["tomas"].multiplier, 0.7);
    assert_eq!(portions["tomas"].band(), PortionBand::ServeLess);
}

#[test]
fn analysis_feeds_spoilage_alerts() {
    let analysis: raw::ApiAnalysisResult = serde_json::from_value(json!({
        "identifiedIngredients": [
            { "name": "Fresas", "spoilageTime": "2-3 días", "category": "Frutas y Verduras" },
            { "name": "Leche", "spoilageTime": "1 semana", "category": "Lácteos" },
            { "name": "Aguacate", "spoilageTime": "1-2 días", "category": "fruta" }
        ],
        "recipeSuggestions": [
            {
                "title": "Batido de fresa",
                "description": "Refrescante",
                "ingredientsUsed": ["Fresas", "Leche"],
                "instructions": "Licuar."
            }
        ]
    })).unwrap();
    let analysis = AnalysisResult::from(analysis);
    assert_eq!(analysis.identified_ingredients[0].category, Category::Produce);
    assert_eq!(analysis.recipe_suggestions.len(), 1);

    let ingredients = merge(
        &analysis.identified_ingredients,
        &["leche".to_string(), "Cebolla".to_string()],
    );
    assert_eq!(ingredients.len(), 4);

    let history = PurchaseHistory::default().record(PurchaseRecord {
        id: "p1".into(),
        date: parse_calendar_date("2024-06-10").unwrap(),
        ingredients,
    });

    let alerts = history.alerts(parse_calendar_date("2024-06-10").unwrap());
    let names: Vec<_> = alerts.iter().map(|v| (v.name.as_str(), v.days_left)).collect();
    assert_eq!(names, vec![("Aguacate", 1), ("Fresas", 2)]);
}
