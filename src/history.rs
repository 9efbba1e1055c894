use std::sync::Arc;

use chrono::Duration;
use tracing::debug;

use crate::clock::Clock;
use crate::models::DailyLog;
use crate::store::Records;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeRange {
    #[default]
    Week,
    Month,
}

impl TimeRange {
    pub fn days(self) -> u32 {
        match self {
            TimeRange::Week => 7,
            TimeRange::Month => 30,
        }
    }
}

/// A charted quantity read off a [`DailyLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Calories,
    Protein,
    Carbs,
    Fat,
    Water,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Calories,
        Metric::Protein,
        Metric::Carbs,
        Metric::Fat,
        Metric::Water,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Calories => "calories",
            Metric::Protein => "protein",
            Metric::Carbs => "carbs",
            Metric::Fat => "fat",
            Metric::Water => "water",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::Calories => "Calories",
            Metric::Protein => "Protein",
            Metric::Carbs => "Carbs",
            Metric::Fat => "Fat",
            Metric::Water => "Water",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Calories => "kcal",
            Metric::Protein | Metric::Carbs | Metric::Fat => "grams",
            Metric::Water => "glasses",
        }
    }

    pub fn value(self, log: &DailyLog) -> f64 {
        match self {
            Metric::Calories => log.total_calories(),
            Metric::Protein => log.total_protein(),
            Metric::Carbs => log.total_carbs(),
            Metric::Fat => log.total_fat(),
            Metric::Water => f64::from(log.water_intake),
        }
    }
}

/// Mean of `metric` over the days where it is positive; 0 if there are none.
pub fn average(logs: &[DailyLog], metric: Metric) -> f64 {
    let values: Vec<f64> = logs
        .iter()
        .map(|log| metric.value(log))
        .filter(|v| *v > 0.0)
        .collect();
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Read-only access to past day logs.
#[derive(Clone)]
pub struct HistoryLoader {
    records: Records,
    clock: Arc<dyn Clock>,
}

impl HistoryLoader {
    pub fn new(records: Records, clock: Arc<dyn Clock>) -> Self {
        Self { records, clock }
    }

    /// Logs for the `days` days ending today, oldest first. Untouched days
    /// come back empty, so the result always has exactly `days` entries.
    pub fn load_recent(&self, days: u32) -> Vec<DailyLog> {
        let today = self.clock.today();
        let logs: Vec<DailyLog> = (0..days)
            .rev()
            .map(|offset| self.records.load_log(today - Duration::days(i64::from(offset))))
            .collect();
        debug!(days, %today, "loaded recent logs");
        logs
    }

    pub fn load_range(&self, range: TimeRange) -> Vec<DailyLog> {
        self.load_recent(range.days())
    }
}
