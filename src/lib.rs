//! Local nutrition tracking: calorie and macro goals from a user profile,
//! write-through daily food and water logs, gap-free history for charting and
//! a bundled food catalog extended with custom foods.

pub mod catalog;
pub mod client;
pub mod clock;
pub mod config;
pub mod forms;
pub mod goals;
pub mod history;
pub mod log;
pub mod models;
pub mod store;

pub use client::NutritionTracker;
pub use config::Config;
