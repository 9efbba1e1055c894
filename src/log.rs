//! Today's food and water log.
//!
//! [`DailyLogManager`] is the only writer of day-keyed records. Every mutation
//! re-saves the whole day before publishing the new state to subscribers.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::clock::Clock;
use crate::history::Metric;
use crate::models::{DailyLog, FoodItem, LoggedFoodItem, MealType};
use crate::store::Records;

pub struct DailyLogManager {
    records: Records,
    clock: Arc<dyn Clock>,
    log: DailyLog,
    tx: watch::Sender<DailyLog>,
}

impl DailyLogManager {
    pub fn new(records: Records, clock: Arc<dyn Clock>) -> Self {
        let log = records.load_log(clock.today());
        let (tx, _) = watch::channel(log.clone());
        Self {
            records,
            clock,
            log,
            tx,
        }
    }

    pub fn daily_log(&self) -> &DailyLog {
        &self.log
    }

    /// Receive the log after every persisted change.
    pub fn subscribe(&self) -> watch::Receiver<DailyLog> {
        self.tx.subscribe()
    }

    /// Entries for one meal, newest first.
    pub fn foods_for_meal(&self, meal: MealType) -> Vec<&LoggedFoodItem> {
        let mut foods: Vec<&LoggedFoodItem> = self
            .log
            .logged_foods
            .iter()
            .filter(|item| item.meal == meal)
            .collect();
        foods.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        foods
    }

    /// Switch to the clock's current day if it has moved on.
    pub fn roll_over(&mut self) {
        let today = self.clock.today();
        if self.log.date != today {
            info!(from = %self.log.date, to = %today, "rolling daily log over");
            self.log = self.records.load_log(today);
            self.tx.send_replace(self.log.clone());
        }
    }

    /// Re-read today's log from the store, discarding the in-memory copy.
    pub fn reload(&mut self) {
        self.log = self.records.load_log(self.clock.today());
        self.tx.send_replace(self.log.clone());
    }

    pub fn add_food(&mut self, food: FoodItem, meal: MealType) -> LoggedFoodItem {
        self.roll_over();
        let item = LoggedFoodItem {
            id: Uuid::new_v4(),
            food,
            date_added: self.clock.now().with_timezone(&Utc),
            meal,
        };
        debug!(id = %item.id, food = %item.food.name, ?meal, "logging food");
        self.log.logged_foods.push(item.clone());
        self.commit();
        item
    }

    /// Remove entries by id. Returns how many were removed.
    pub fn remove_food(&mut self, ids: &HashSet<Uuid>) -> usize {
        self.roll_over();
        let before = self.log.logged_foods.len();
        self.log.logged_foods.retain(|item| !ids.contains(&item.id));
        let removed = before - self.log.logged_foods.len();
        debug!(requested = ids.len(), removed, "removing logged foods");
        self.commit();
        removed
    }

    pub fn add_water(&mut self) {
        self.roll_over();
        self.log.water_intake += 1;
        self.commit();
    }

    /// Decrement water, never below zero. A no-op at zero.
    pub fn remove_water(&mut self) {
        self.roll_over();
        if self.log.water_intake > 0 {
            self.log.water_intake -= 1;
            self.commit();
        }
    }

    /// Record a manual value for `metric` on `date`.
    ///
    /// Water replaces the day's counter. Any other metric is logged as a snack
    /// carrying only that nutrient.
    pub fn record_entry(&mut self, date: NaiveDate, metric: Metric, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(anyhow!("manual {} entry must be a finite number", metric.label()));
        }
        self.roll_over();

        let mut log = if date == self.log.date {
            self.log.clone()
        } else {
            self.records.load_log(date)
        };

        match metric {
            Metric::Water => log.water_intake = value.max(0.0) as u32,
            _ => log.logged_foods.push(LoggedFoodItem {
                id: Uuid::new_v4(),
                food: manual_food(metric, value),
                date_added: self.clock.now().with_timezone(&Utc),
                meal: MealType::Snacks,
            }),
        }
        info!(%date, metric = metric.label(), value, "recorded manual entry");

        if date == self.log.date {
            self.log = log;
            self.commit();
        } else {
            self.records.save_log(&log);
        }
        Ok(())
    }

    fn commit(&mut self) {
        self.records.save_log(&self.log);
        self.tx.send_replace(self.log.clone());
    }
}

fn manual_food(metric: Metric, value: f64) -> FoodItem {
    let mut food = FoodItem {
        id: Uuid::new_v4().to_string(),
        name: format!("Manual Entry - {}", metric.title()),
        serving_size: "Manual".to_string(),
        calories: 0,
        protein: 0.0,
        carbs: 0.0,
        fat: 0.0,
    };
    match metric {
        Metric::Calories => food.calories = value as i32,
        Metric::Protein => food.protein = value,
        Metric::Carbs => food.carbs = value,
        Metric::Fat => food.fat = value,
        Metric::Water => {}
    }
    food
}
