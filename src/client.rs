use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::info;

use crate::catalog::{self, FoodCatalog, BUNDLED_FOODS_JSON};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::goals::calculate_goals;
use crate::history::HistoryLoader;
use crate::log::DailyLogManager;
use crate::models::{DailyProgress, NutritionGoals, UserProfile};
use crate::store::{FileStore, RecordStore, Records};

/// One installation's nutrition data: profile and goals, today's log, history
/// and the food catalog, all sharing one record store.
pub struct NutritionTracker {
    records: Records,
    clock: Arc<dyn Clock>,
    log: DailyLogManager,
    history: HistoryLoader,
    catalog: FoodCatalog,
    onboarded: watch::Sender<bool>,
}

impl NutritionTracker {
    /// Open the file-backed store described by `config`. Fails if the food
    /// catalog can't be loaded.
    pub fn open(config: &Config) -> Result<Self> {
        let store = Arc::new(FileStore::open(&config.data_dir)?);
        let records = Records::new(store).with_reset_window(config.reset_window_days);
        let bundled = match &config.catalog_path {
            Some(path) => catalog::load_bundled_file(path)?,
            None => catalog::parse_bundled(BUNDLED_FOODS_JSON)?,
        };
        let catalog = FoodCatalog::new(records.clone(), bundled);
        Ok(Self::assemble(records, Arc::new(SystemClock), catalog))
    }

    pub fn with_parts(
        store: Arc<dyn RecordStore>,
        clock: Arc<dyn Clock>,
        catalog_json: &str,
    ) -> Result<Self> {
        let records = Records::new(store);
        let catalog = FoodCatalog::from_json(records.clone(), catalog_json)?;
        Ok(Self::assemble(records, clock, catalog))
    }

    fn assemble(records: Records, clock: Arc<dyn Clock>, catalog: FoodCatalog) -> Self {
        let log = DailyLogManager::new(records.clone(), clock.clone());
        let history = HistoryLoader::new(records.clone(), clock.clone());
        let (onboarded, _) = watch::channel(records.load_goals().is_some());
        Self {
            records,
            clock,
            log,
            history,
            catalog,
            onboarded,
        }
    }

    pub fn is_onboarded(&self) -> bool {
        *self.onboarded.borrow()
    }

    pub fn subscribe_onboarding(&self) -> watch::Receiver<bool> {
        self.onboarded.subscribe()
    }

    /// Store the first profile and its goals.
    pub fn complete_onboarding(&mut self, profile: UserProfile) -> NutritionGoals {
        let goals = self.store_profile(&profile);
        info!(name = %profile.name, calories = goals.calories, "onboarding complete");
        goals
    }

    /// Replace the profile; goals are recomputed from it.
    pub fn update_profile(&mut self, profile: UserProfile) -> NutritionGoals {
        let goals = self.store_profile(&profile);
        info!(calories = goals.calories, "profile updated");
        goals
    }

    fn store_profile(&mut self, profile: &UserProfile) -> NutritionGoals {
        let goals = calculate_goals(profile, self.clock.today());
        self.records.save_profile(profile);
        self.records.save_goals(&goals);
        self.onboarded.send_replace(true);
        goals
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.records.load_profile()
    }

    pub fn goals(&self) -> Option<NutritionGoals> {
        self.records.load_goals()
    }

    /// Today's totals against the stored goals, once onboarded. The log is
    /// rolled over first so a session left open past midnight reads the new day.
    pub fn progress(&mut self) -> Option<DailyProgress> {
        let goals = self.goals()?;
        self.log.roll_over();
        Some(DailyProgress::new(self.log.daily_log(), &goals))
    }

    /// Delete every record and return to the not-onboarded state.
    pub fn reset(&mut self) {
        self.records.delete_all(self.clock.today());
        self.catalog.reload_custom();
        self.log.reload();
        self.onboarded.send_replace(false);
        info!("all nutrition data reset");
    }

    pub fn log(&self) -> &DailyLogManager {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut DailyLogManager {
        &mut self.log
    }

    pub fn history(&self) -> &HistoryLoader {
        &self.history
    }

    pub fn catalog(&self) -> &FoodCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut FoodCatalog {
        &mut self.catalog
    }
}
