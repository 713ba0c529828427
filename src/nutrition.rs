//! Daily calorie recommendation (Mifflin–St Jeor) and day classification.
//!
//! Pure functions over an in-memory profile; the HTTP layer fetches the user
//! row and converts its nullable text columns with the `parse` helpers here.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Any non-empty value that is not "male" falls into the female-formula
    /// branch, matching how profiles were stored historically.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "" => None,
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => Some(Self::Other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    /// Unknown labels keep the sedentary multiplier (1.2).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "" => None,
            "lightly_active" => Some(Self::LightlyActive),
            "moderately_active" => Some(Self::ModeratelyActive),
            "very_active" => Some(Self::VeryActive),
            "extremely_active" => Some(Self::ExtremelyActive),
            _ => Some(Self::Sedentary),
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::LightlyActive => 1.375,
            Self::ModeratelyActive => 1.55,
            Self::VeryActive => 1.725,
            Self::ExtremelyActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    LoseWeight,
    MaintainWeight,
    GainWeight,
}

impl Goal {
    /// Unrecognized goals behave as "maintain".
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "" => None,
            "lose_weight" => Some(Self::LoseWeight),
            "gain_weight" => Some(Self::GainWeight),
            _ => Some(Self::MaintainWeight),
        }
    }
}

/// Profile subset needed for the recommendation. Every field is optional;
/// a missing required field makes the recommendation unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct Profile {
    pub age: Option<f64>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
}

/// Recommended daily calories, or `None` when any of age, weight, height,
/// gender or activity level is absent. Callers must treat `None` as "no
/// data", not as zero.
pub fn recommended_calories(profile: &Profile) -> Option<i32> {
    let age = profile.age?;
    let weight = profile.weight_kg?;
    let height = profile.height_cm?;
    let gender = profile.gender?;
    let activity = profile.activity_level?;

    let bmr = match gender {
        Gender::Male => 88.362 + 13.397 * weight + 4.799 * height - 5.677 * age,
        Gender::Female | Gender::Other => {
            447.593 + 9.247 * weight + 3.098 * height - 4.33 * age
        }
    };

    let tdee = bmr * activity.multiplier();

    let recommended = match profile.goal {
        Some(Goal::LoseWeight) => tdee - 500.0,
        Some(Goal::GainWeight) => tdee + 300.0,
        _ => tdee,
    };

    Some(recommended.round() as i32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalorieStatus {
    Low,
    Balanced,
    High,
}

/// Classifies a day's calories against the recommended target: below 90% is
/// low, above 110% is high. Without a target the UI's fixed thresholds apply
/// (< 1200 low, > 2500 high).
pub fn classify_day(calories: f64, target: Option<i32>) -> CalorieStatus {
    match target {
        Some(target) => {
            let percent = calories / f64::from(target) * 100.0;
            if percent < 90.0 {
                CalorieStatus::Low
            } else if percent > 110.0 {
                CalorieStatus::High
            } else {
                CalorieStatus::Balanced
            }
        }
        None => {
            if calories < 1200.0 {
                CalorieStatus::Low
            } else if calories > 2500.0 {
                CalorieStatus::High
            } else {
                CalorieStatus::Balanced
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_profile() -> Profile {
        Profile {
            age: Some(30.0),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            gender: Some(Gender::Male),
            activity_level: Some(ActivityLevel::ModeratelyActive),
            goal: Some(Goal::MaintainWeight),
        }
    }

    #[test]
    fn known_value_male_moderate() {
        let expected =
            ((88.362_f64 + 13.397 * 70.0 + 4.799 * 175.0 - 5.677 * 30.0) * 1.55).round() as i32;
        assert_eq!(recommended_calories(&full_profile()), Some(expected));
    }

    #[test]
    fn female_branch_uses_female_coefficients() {
        let profile = Profile {
            gender: Some(Gender::Female),
            ..full_profile()
        };
        let expected =
            ((447.593_f64 + 9.247 * 70.0 + 3.098 * 175.0 - 4.33 * 30.0) * 1.55).round() as i32;
        assert_eq!(recommended_calories(&profile), Some(expected));
    }

    #[test]
    fn other_gender_uses_female_coefficients() {
        let female = Profile {
            gender: Some(Gender::Female),
            ..full_profile()
        };
        let other = Profile {
            gender: Some(Gender::Other),
            ..full_profile()
        };
        assert_eq!(recommended_calories(&female), recommended_calories(&other));
    }

    #[test]
    fn goal_adjustments_are_exact() {
        let maintain = recommended_calories(&full_profile()).unwrap();
        let lose = recommended_calories(&Profile {
            goal: Some(Goal::LoseWeight),
            ..full_profile()
        })
        .unwrap();
        let gain = recommended_calories(&Profile {
            goal: Some(Goal::GainWeight),
            ..full_profile()
        })
        .unwrap();
        assert_eq!(lose, maintain - 500);
        assert_eq!(gain, maintain + 300);
    }

    #[test]
    fn absent_goal_means_maintain() {
        let no_goal = Profile {
            goal: None,
            ..full_profile()
        };
        assert_eq!(
            recommended_calories(&no_goal),
            recommended_calories(&full_profile())
        );
    }

    #[test]
    fn any_missing_required_field_yields_none() {
        let base = full_profile();
        let missing: [Profile; 5] = [
            Profile { age: None, ..base },
            Profile {
                weight_kg: None,
                ..base
            },
            Profile {
                height_cm: None,
                ..base
            },
            Profile {
                gender: None,
                ..base
            },
            Profile {
                activity_level: None,
                ..base
            },
        ];
        for profile in missing {
            assert_eq!(recommended_calories(&profile), None);
        }
    }

    #[test]
    fn deterministic_across_calls() {
        let profile = full_profile();
        let first = recommended_calories(&profile);
        let second = recommended_calories(&profile);
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_activity_label_falls_back_to_sedentary_multiplier() {
        let parsed = ActivityLevel::parse("couch_surfing").unwrap();
        assert_eq!(parsed.multiplier(), 1.2);
        assert_eq!(ActivityLevel::parse(""), None);
    }

    #[test]
    fn multiplier_table_matches_reference_values() {
        assert_eq!(ActivityLevel::Sedentary.multiplier(), 1.2);
        assert_eq!(ActivityLevel::LightlyActive.multiplier(), 1.375);
        assert_eq!(ActivityLevel::ModeratelyActive.multiplier(), 1.55);
        assert_eq!(ActivityLevel::VeryActive.multiplier(), 1.725);
        assert_eq!(ActivityLevel::ExtremelyActive.multiplier(), 1.9);
    }

    #[test]
    fn classification_with_target_uses_percent_bands() {
        assert_eq!(classify_day(1000.0, Some(2000)), CalorieStatus::Low);
        assert_eq!(classify_day(1800.0, Some(2000)), CalorieStatus::Balanced);
        assert_eq!(classify_day(2200.0, Some(2000)), CalorieStatus::Balanced);
        assert_eq!(classify_day(2300.0, Some(2000)), CalorieStatus::High);
    }

    #[test]
    fn classification_without_target_uses_fixed_thresholds() {
        assert_eq!(classify_day(1100.0, None), CalorieStatus::Low);
        assert_eq!(classify_day(1200.0, None), CalorieStatus::Balanced);
        assert_eq!(classify_day(2500.0, None), CalorieStatus::Balanced);
        assert_eq!(classify_day(2600.0, None), CalorieStatus::High);
    }
}
