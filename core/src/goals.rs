use crate::models::{ActivityLevel, DietGoal, DietPreferences, GoalPace, MacroTargets, UserProfile};

const BMR_MIN: f64 = 500.0;
const BMR_MAX: f64 = 5000.0;
const LOSE_WEIGHT_FLOOR: f64 = 1200.0;

fn sex_offset(profile: &UserProfile) -> f64 {
    use crate::models::BiologicalSex::{Female, Male, Other, Unknown};
    match profile.sex {
        Male => 5.0,
        Female => -161.0,
        // Midpoint of the male/female offsets, kept as the exact
        // constant consumers already depend on.
        Other | Unknown => -78.0,
    }
}

/// Mifflin-St Jeor basal metabolic rate, clamped to [500, 5000].
/// `None` when any biometric is missing or non-positive; callers
/// must fall back to [`fallback_calories`] rather than compute from
/// partial data.
#[must_use]
pub fn bmr(profile: &UserProfile) -> Option<f64> {
    if profile.weight_kg <= 0.0 || profile.height_cm <= 0.0 || profile.age == 0 {
        return None;
    }
    let raw = 10.0 * profile.weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age)
        + sex_offset(profile);
    Some(raw.clamp(BMR_MIN, BMR_MAX))
}

fn activity_multiplier(activity: ActivityLevel) -> f64 {
    match activity {
        ActivityLevel::Sedentary => 1.20,
        ActivityLevel::LightlyActive => 1.375,
        ActivityLevel::ModeratelyActive => 1.55,
        ActivityLevel::HighlyActive => 1.725,
    }
}

fn pace_offset(pace: GoalPace) -> f64 {
    match pace {
        GoalPace::Slowly => 250.0,
        GoalPace::Steadily => 500.0,
        GoalPace::Quickly => 750.0,
    }
}

/// Calorie target when biometrics are unavailable: a goal-based base
/// scaled by a coarser activity multiplier.
#[must_use]
pub fn fallback_calories(prefs: &DietPreferences) -> f64 {
    let base = match prefs.goal {
        DietGoal::LoseWeight => 1800.0,
        DietGoal::Maintain => 2200.0,
        DietGoal::GainMuscle => 2500.0,
    };
    let multiplier = match prefs.activity {
        ActivityLevel::Sedentary => 0.95,
        ActivityLevel::LightlyActive => 1.0,
        ActivityLevel::ModeratelyActive => 1.1,
        ActivityLevel::HighlyActive => 1.25,
    };
    base * multiplier
}

fn target_calories(profile: &UserProfile, prefs: &DietPreferences) -> f64 {
    match bmr(profile) {
        Some(bmr) => {
            let tdee = bmr * activity_multiplier(prefs.activity);
            let offset = pace_offset(prefs.pace);
            match prefs.goal {
                DietGoal::LoseWeight => (tdee - offset).max(LOSE_WEIGHT_FLOOR),
                DietGoal::Maintain => tdee,
                DietGoal::GainMuscle => tdee + offset,
            }
        }
        None => fallback_calories(prefs),
    }
}

/// Derive whole-gram daily targets from profile + preferences.
///
/// Calories are truncated to a whole number first; the 30/40/30
/// macro split is computed from that integer (4 kcal/g protein and
/// carbs, 9 kcal/g fat), each truncated.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn compute_goals(profile: &UserProfile, prefs: &DietPreferences) -> MacroTargets {
    let calories = target_calories(profile, prefs).trunc() as i64;
    let cal = calories as f64;
    MacroTargets {
        calories,
        protein_g: (cal * 0.3 / 4.0).trunc() as i64,
        carbs_g: (cal * 0.4 / 4.0).trunc() as i64,
        fat_g: (cal * 0.3 / 9.0).trunc() as i64,
    }
}
