use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    #[serde(rename = "very active", alias = "very-active", alias = "veryActive")]
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::VeryActive,
    ];

    /// TDEE multiplier applied to BMR.
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    /// Daily calorie adjustment relative to TDEE (kcal).
    pub fn calorie_offset(self) -> f64 {
        match self {
            Goal::Lose => -500.0,
            Goal::Maintain => 0.0,
            Goal::Gain => 500.0,
        }
    }
}

/// The single user profile captured at onboarding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub date_of_birth: NaiveDate,
    /// Height in cm
    pub height: f64,
    /// Weight in kg
    pub weight: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// Daily calorie and macro targets derived from a [`UserProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionGoals {
    /// Calories (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein: f64,
    /// Carbs (g)
    pub carbs: f64,
    /// Fat (g)
    pub fat: f64,
}

/// A food from the bundled catalog or a user-created custom food.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    /// Serving label, e.g. "100g" or "1 medium"
    pub serving_size: String,
    /// Calories (kcal)
    pub calories: i32,
    /// Protein (g)
    pub protein: f64,
    /// Carbs (g)
    pub carbs: f64,
    /// Fat (g)
    pub fat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snacks,
    ];
}

/// A food logged against a day. The food is copied, not referenced, so later
/// catalog changes never rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedFoodItem {
    pub id: Uuid,
    pub food: FoodItem,
    pub date_added: DateTime<Utc>,
    pub meal: MealType,
}

/// Everything logged on one local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub date: NaiveDate,
    #[serde(default)]
    pub logged_foods: Vec<LoggedFoodItem>,
    /// Glasses of water
    #[serde(default)]
    pub water_intake: u32,
}

impl DailyLog {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            logged_foods: Vec::new(),
            water_intake: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.logged_foods.is_empty() && self.water_intake == 0
    }

    pub fn total_calories(&self) -> f64 {
        self.logged_foods
            .iter()
            .map(|item| f64::from(item.food.calories))
            .sum()
    }

    pub fn total_protein(&self) -> f64 {
        self.logged_foods.iter().map(|item| item.food.protein).sum()
    }

    pub fn total_carbs(&self) -> f64 {
        self.logged_foods.iter().map(|item| item.food.carbs).sum()
    }

    pub fn total_fat(&self) -> f64 {
        self.logged_foods.iter().map(|item| item.food.fat).sum()
    }
}

/// One macro's consumption against its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroProgress {
    pub consumed: f64,
    pub goal: f64,
}

impl MacroProgress {
    /// Fraction of the goal consumed; 0 when the goal is not positive.
    pub fn fraction(&self) -> f64 {
        if self.goal > 0.0 {
            self.consumed / self.goal
        } else {
            0.0
        }
    }

    pub fn remaining(&self) -> f64 {
        self.goal - self.consumed
    }
}

/// Dashboard view of a day's totals against the stored goals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyProgress {
    pub calories: MacroProgress,
    pub protein: MacroProgress,
    pub carbs: MacroProgress,
    pub fat: MacroProgress,
    pub water_intake: u32,
}

impl DailyProgress {
    pub fn new(log: &DailyLog, goals: &NutritionGoals) -> Self {
        Self {
            calories: MacroProgress {
                consumed: log.total_calories(),
                goal: goals.calories,
            },
            protein: MacroProgress {
                consumed: log.total_protein(),
                goal: goals.protein,
            },
            carbs: MacroProgress {
                consumed: log.total_carbs(),
                goal: goals.carbs,
            },
            fat: MacroProgress {
                consumed: log.total_fat(),
                goal: goals.fat,
            },
            water_intake: log.water_intake,
        }
    }
}
