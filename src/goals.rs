//! Daily calorie and macro targets.
//!
//! Uses the Mifflin-St Jeor equation for BMR, scales it by a fixed activity
//! multiplier to get TDEE, then shifts by ±500 kcal for the user's goal.
//! Protein is fixed at 1.8 g/kg, fat takes 25% of calories and carbs fill the
//! remainder.

use chrono::NaiveDate;

use crate::models::{Gender, NutritionGoals, UserProfile};

const PROTEIN_G_PER_KG: f64 = 1.8;
const FAT_CALORIE_SHARE: f64 = 0.25;
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Whole years between `date_of_birth` and `today`. A future date of birth is 0.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> u32 {
    today.years_since(date_of_birth).unwrap_or(0)
}

pub fn bmr(profile: &UserProfile, today: NaiveDate) -> f64 {
    let age = f64::from(age_on(profile.date_of_birth, today));
    let base = 10.0 * profile.weight + 6.25 * profile.height - 5.0 * age;
    match profile.gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

pub fn tdee(profile: &UserProfile, today: NaiveDate) -> f64 {
    bmr(profile, today) * profile.activity_level.multiplier()
}

/// Compute goals for `profile` as of `today`. Inputs are not validated.
pub fn calculate_goals(profile: &UserProfile, today: NaiveDate) -> NutritionGoals {
    let calories = tdee(profile, today) + profile.goal.calorie_offset();
    let protein = profile.weight * PROTEIN_G_PER_KG;
    let fat = calories * FAT_CALORIE_SHARE / KCAL_PER_G_FAT;
    let carbs =
        (calories - protein * KCAL_PER_G_PROTEIN - fat * KCAL_PER_G_FAT) / KCAL_PER_G_CARBS;

    NutritionGoals {
        calories,
        protein,
        carbs,
        fat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, Goal};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn profile(gender: Gender, activity_level: ActivityLevel, goal: Goal) -> UserProfile {
        UserProfile {
            name: "Sam".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1994, 6, 15).unwrap(),
            height: 175.0,
            weight: 70.0,
            gender,
            activity_level,
            goal,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected:.4}, got {actual:.4}"
        );
    }

    #[test]
    fn reference_male_moderate_maintain() {
        let p = profile(Gender::Male, ActivityLevel::Moderate, Goal::Maintain);
        assert_eq!(age_on(p.date_of_birth, today()), 30);
        assert_close(bmr(&p, today()), 1648.75);

        let goals = calculate_goals(&p, today());
        assert_close(goals.calories, 2555.5625);
        assert_close(goals.protein, 126.0);
        assert_close(goals.fat, 70.99);
        assert_close(goals.carbs, 353.16);
    }

    #[test]
    fn female_offset_and_goal_shift() {
        let p = profile(Gender::Female, ActivityLevel::Sedentary, Goal::Lose);
        assert_close(bmr(&p, today()), 1482.75);
        assert_close(calculate_goals(&p, today()).calories, 1482.75 * 1.2 - 500.0);

        let p = profile(Gender::Female, ActivityLevel::VeryActive, Goal::Gain);
        assert_close(calculate_goals(&p, today()).calories, 1482.75 * 1.9 + 500.0);
    }

    #[test]
    fn macros_account_for_every_calorie() {
        for level in ActivityLevel::ALL {
            for goal in [Goal::Lose, Goal::Maintain, Goal::Gain] {
                for gender in [Gender::Male, Gender::Female] {
                    let p = profile(gender, level, goal);
                    let g = calculate_goals(&p, today());
                    let kcal = g.fat * 9.0 + g.protein * 4.0 + g.carbs * 4.0;
                    assert!((kcal - g.calories).abs() < 1e-6);
                    assert_eq!(g.protein, p.weight * 1.8);
                    assert_eq!(g, calculate_goals(&p, today()));
                }
            }
        }
    }

    #[test]
    fn age_truncates_to_whole_years() {
        let dob = NaiveDate::from_ymd_opt(1990, 12, 31).unwrap();
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2020, 12, 30).unwrap()), 29);
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()), 30);
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(1980, 1, 1).unwrap()), 0);
    }
}
