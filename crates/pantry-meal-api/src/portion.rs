use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::MacroTotals;

/// Multiplier above which a member is served more than the base plan.
pub const SERVE_MORE_ABOVE: f64 = 1.1;
/// Multiplier below which a member is served less than the base plan.
pub const SERVE_LESS_BELOW: f64 = 0.9;

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRequirements {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender { Male, Female, Other }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    MaintainWeight,
    GainMuscle,
    HealthyGrowth,
}

/// Everything about a member except what is assigned on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    pub id: String,
    #[serde(flatten)]
    pub profile: MemberProfile,
    pub daily_requirements: DailyRequirements,
}

/// Macros scaled by a portion multiplier, calories are left out since they
/// match the requirement by construction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedMacros {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortionBand { ServeMore, OnTarget, ServeLess }

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortionProjection {
    pub multiplier: f64,
    pub projected: ProjectedMacros,
}

impl PortionProjection {
    pub fn band(&self) -> PortionBand {
        if self.multiplier > SERVE_MORE_ABOVE {
            PortionBand::ServeMore
        } else if self.multiplier < SERVE_LESS_BELOW {
            PortionBand::ServeLess
        } else {
            PortionBand::OnTarget
        }
    }

    /// Share of each requirement the projected portion covers, 1.0 is 100%.
    pub fn coverage(&self, requirements: &DailyRequirements) -> ProjectedMacros {
        fn ratio(value: f64, target: f64) -> f64 {
            if target > 0.0 { value / target } else { 0.0 }
        }

        ProjectedMacros {
            protein: ratio(self.projected.protein, requirements.protein),
            carbs: ratio(self.projected.carbs, requirements.carbs),
            fat: ratio(self.projected.fat, requirements.fat),
        }
    }
}

/// Scales a day of planned meals to each member's calorie requirement.
///
/// A day without planned calories projects a multiplier of 1 for everyone.
pub fn project(
    planned: &MacroTotals, roster: &[FamilyMember],
) -> BTreeMap<String, PortionProjection> {
    roster.iter().map(|member| {
        let multiplier = if planned.calories > 0.0 {
            member.daily_requirements.calories / planned.calories
        } else { 1.0 };

        (member.id.clone(), PortionProjection {
            multiplier,
            projected: ProjectedMacros {
                protein: planned.protein * multiplier,
                carbs: planned.carbs * multiplier,
                fat: planned.fat * multiplier,
            },
        })
    }).collect()
}

/// Percentage of the first member's calorie target reached by `consumed`.
pub fn calorie_progress(consumed: &MacroTotals, roster: &[FamilyMember]) -> Option<f64> {
    let target = roster.first()?.daily_requirements.calories;
    (target > 0.0).then(|| consumed.calories / target * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: &str, calories: f64) -> FamilyMember {
        FamilyMember {
            id: id.into(),
            profile: MemberProfile {
                name: format!("member {id}"),
                age: 35,
                gender: Gender::Female,
                activity_level: ActivityLevel::ModeratelyActive,
                goal: Goal::MaintainWeight,
            },
            daily_requirements: DailyRequirements {
                calories,
                protein: 100.0,
                carbs: 250.0,
                fat: 70.0,
            },
        }
    }

    fn planned() -> MacroTotals {
        MacroTotals { calories: 2000.0, protein: 100.0, carbs: 240.0, fat: 60.0 }
    }

    #[test]
    fn matching_requirement_keeps_plan() {
        let out = project(&planned(), &[member("a", 2000.0)]);
        let a = out["a"];
        assert_eq!(a.multiplier, 1.0);
        assert_eq!(a.projected, ProjectedMacros { protein: 100.0, carbs: 240.0, fat: 60.0 });
        assert_eq!(a.band(), PortionBand::OnTarget);
    }

    #[test]
    fn multiplier_scales_macros() {
        let out = project(&planned(), &[member("kid", 1000.0), member("teen", 3000.0)]);

        assert_eq!(out["kid"].multiplier, 0.5);
        assert_eq!(out["kid"].projected.protein, 50.0);
        assert_eq!(out["kid"].band(), PortionBand::ServeLess);

        assert_eq!(out["teen"].multiplier, 1.5);
        assert_eq!(out["teen"].projected.fat, 90.0);
        assert_eq!(out["teen"].band(), PortionBand::ServeMore);
    }

    #[test]
    fn band_edges_are_on_target() {
        let at = |m| PortionProjection { multiplier: m, projected: ProjectedMacros::default() }.band();
        assert_eq!(at(1.1), PortionBand::OnTarget);
        assert_eq!(at(0.9), PortionBand::OnTarget);
        assert_eq!(at(1.11), PortionBand::ServeMore);
        assert_eq!(at(0.89), PortionBand::ServeLess);
    }

    #[test]
    fn zero_calorie_day_falls_back_to_one() {
        let out = project(&MacroTotals::default(), &[member("a", 2000.0), member("b", 0.0)]);
        for projection in out.values() {
            assert_eq!(projection.multiplier, 1.0);
            assert!(projection.projected.protein.is_finite());
        }
    }

    #[test]
    fn empty_roster_projects_nothing() {
        assert!(project(&planned(), &[]).is_empty());
        assert_eq!(calorie_progress(&planned(), &[]), None);
    }

    #[test]
    fn coverage_is_relative_to_requirements() {
        let m = member("a", 2000.0);
        let out = project(&planned(), std::slice::from_ref(&m));
        let coverage = out["a"].coverage(&m.daily_requirements);
        assert_eq!(coverage.protein, 1.0);
        assert_eq!(coverage.carbs, 240.0 / 250.0);

        let none = out["a"].coverage(&DailyRequirements::default());
        assert_eq!(none, ProjectedMacros::default());
    }

    #[test]
    fn progress_uses_first_member() {
        let consumed = MacroTotals { calories: 500.0, ..Default::default() };
        let roster = [member("a", 2000.0), member("b", 1000.0)];
        assert_eq!(calorie_progress(&consumed, &roster), Some(25.0));
        assert_eq!(calorie_progress(&consumed, &[member("z", 0.0)]), None);
    }

    #[test]
    fn project_is_repeatable() {
        let roster = [member("a", 1234.5), member("b", 2345.6)];
        assert_eq!(project(&planned(), &roster), project(&planned(), &roster));
    }

    #[test]
    fn member_serializes_flat() {
        let json = serde_json::to_value(member("a", 1800.0)).unwrap();
        assert_eq!(json["activityLevel"], "moderately_active");
        assert_eq!(json["dailyRequirements"]["calories"], 1800.0);
        assert_eq!(json["name"], "member a");
    }
}
