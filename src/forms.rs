//! Raw form input for the profile and custom-food editors.
//!
//! Drafts hold the strings as typed. They only turn into model values once
//! every required field parses, so the submit action can stay disabled until
//! [`ProfileDraft::is_submittable`] / [`FoodDraft::is_submittable`] is true.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::{ActivityLevel, FoodItem, Gender, Goal, UserProfile};

#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDraft {
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub weight: String,
    pub height: String,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

impl ProfileDraft {
    pub fn new(date_of_birth: NaiveDate) -> Self {
        Self {
            name: String::new(),
            date_of_birth,
            weight: String::new(),
            height: String::new(),
            gender: Gender::Male,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::Maintain,
        }
    }

    /// Pre-fill from an existing profile for editing.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            date_of_birth: profile.date_of_birth,
            weight: format!("{:.1}", profile.weight),
            height: format!("{:.1}", profile.height),
            gender: profile.gender,
            activity_level: profile.activity_level,
            goal: profile.goal,
        }
    }

    pub fn is_submittable(&self) -> bool {
        self.build().is_some()
    }

    pub fn build(&self) -> Option<UserProfile> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        Some(UserProfile {
            name: name.to_string(),
            date_of_birth: self.date_of_birth,
            height: parse_positive(&self.height)?,
            weight: parse_positive(&self.weight)?,
            gender: self.gender,
            activity_level: self.activity_level,
            goal: self.goal,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodDraft {
    pub name: String,
    pub serving_size: String,
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
}

impl FoodDraft {
    pub fn is_submittable(&self) -> bool {
        self.build().is_some()
    }

    /// A custom food with a fresh id, if every field is filled in and parses.
    pub fn build(&self) -> Option<FoodItem> {
        let name = self.name.trim();
        let serving_size = self.serving_size.trim();
        if name.is_empty() || serving_size.is_empty() {
            return None;
        }
        let calories: i32 = self.calories.trim().parse().ok()?;
        if calories < 0 {
            return None;
        }
        Some(FoodItem {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            serving_size: serving_size.to_string(),
            calories,
            protein: parse_non_negative(&self.protein)?,
            carbs: parse_non_negative(&self.carbs)?,
            fat: parse_non_negative(&self.fat)?,
        })
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_positive(raw: &str) -> Option<f64> {
    parse_finite(raw).filter(|v| *v > 0.0)
}

fn parse_non_negative(raw: &str) -> Option<f64> {
    parse_finite(raw).filter(|v| *v >= 0.0)
}
