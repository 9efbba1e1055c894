use std::collections::HashSet;
use std::sync::{Arc, Once};

use chrono::{Duration, Local, NaiveDate, TimeZone};
use nutrition_tracker::catalog::BUNDLED_FOODS_JSON;
use nutrition_tracker::clock::{Clock, FixedClock};
use nutrition_tracker::forms::{FoodDraft, ProfileDraft};
use nutrition_tracker::history::{average, Metric, TimeRange};
use nutrition_tracker::models::{ActivityLevel, Gender, Goal, MealType, UserProfile};
use nutrition_tracker::store::{FileStore, MemoryStore};
use nutrition_tracker::{Config, NutritionTracker};

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn clock() -> FixedClock {
    FixedClock::new(Local.with_ymd_and_hms(2024, 6, 15, 8, 30, 0).unwrap())
}

fn profile() -> UserProfile {
    UserProfile {
        name: "Robin".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1994, 6, 15).unwrap(),
        height: 175.0,
        weight: 70.0,
        gender: Gender::Male,
        activity_level: ActivityLevel::Moderate,
        goal: Goal::Maintain,
    }
}

fn memory_tracker(clock: &FixedClock) -> NutritionTracker {
    NutritionTracker::with_parts(
        Arc::new(MemoryStore::new()),
        Arc::new(clock.clone()),
        BUNDLED_FOODS_JSON,
    )
    .unwrap()
}

#[test]
fn onboarding_stores_profile_and_derived_goals() {
    init_tracing();
    let clock = clock();
    let mut tracker = memory_tracker(&clock);
    assert!(!tracker.is_onboarded());
    assert!(tracker.progress().is_none());

    let goals = tracker.complete_onboarding(profile());
    assert!(tracker.is_onboarded());
    assert_eq!(tracker.profile(), Some(profile()));
    assert_eq!(tracker.goals(), Some(goals));
    assert!((goals.calories - 2555.5625).abs() < 1e-9);
    assert!((goals.protein - 126.0).abs() < 1e-9);

    let mut edited = profile();
    edited.goal = Goal::Lose;
    let lowered = tracker.update_profile(edited);
    assert!((lowered.calories - (goals.calories - 500.0)).abs() < 1e-9);
    assert_eq!(tracker.goals(), Some(lowered));
}

#[test]
fn dashboard_progress_follows_logged_food() {
    init_tracing();
    let clock = clock();
    let mut tracker = memory_tracker(&clock);
    tracker.complete_onboarding(profile());

    let chicken = tracker
        .catalog()
        .all_foods()
        .iter()
        .find(|f| f.name == "Chicken Breast")
        .cloned()
        .unwrap();
    let item = tracker.log_mut().add_food(chicken, MealType::Lunch);
    tracker.log_mut().add_water();

    for meal in MealType::ALL {
        let expected = usize::from(meal == MealType::Lunch);
        assert_eq!(tracker.log().foods_for_meal(meal).len(), expected);
    }

    let progress = tracker.progress().unwrap();
    assert_eq!(progress.calories.consumed, 165.0);
    assert_eq!(progress.protein.consumed, 31.0);
    assert_eq!(progress.water_intake, 1);
    assert!(progress.calories.fraction() > 0.0 && progress.calories.fraction() < 1.0);

    tracker.log_mut().remove_food(&HashSet::from([item.id]));
    assert_eq!(tracker.progress().unwrap().calories.consumed, 0.0);
}

#[test]
fn progress_moves_to_the_new_day_after_midnight() {
    init_tracing();
    let clock = clock();
    clock.set(Local.with_ymd_and_hms(2024, 6, 15, 23, 0, 0).unwrap());
    let mut tracker = memory_tracker(&clock);
    tracker.complete_onboarding(profile());

    let oats = tracker.catalog().find("food-006").cloned().unwrap();
    tracker.log_mut().add_food(oats, MealType::Breakfast);
    assert_eq!(tracker.progress().unwrap().calories.consumed, 150.0);

    clock.advance(Duration::hours(2));
    let progress = tracker.progress().unwrap();
    assert_eq!(progress.calories.consumed, 0.0);
    assert_eq!(
        tracker.log().daily_log().date,
        NaiveDate::from_ymd_opt(2024, 6, 16).unwrap()
    );

    let days = tracker.history().load_recent(2);
    assert_eq!(days[0].total_calories(), 150.0);
    assert!(days[1].is_empty());
}

#[test]
fn history_window_is_fixed_length() {
    init_tracing();
    let clock = clock();
    let mut tracker = memory_tracker(&clock);
    let today = clock.today();

    tracker
        .log_mut()
        .record_entry(today - Duration::days(10), Metric::Calories, 1800.0)
        .unwrap();
    tracker
        .log_mut()
        .record_entry(today - Duration::days(40), Metric::Calories, 2200.0)
        .unwrap();
    tracker.log_mut().record_entry(today, Metric::Calories, 2000.0).unwrap();

    let week = tracker.history().load_range(TimeRange::Week);
    assert_eq!(week.len(), 7);
    assert_eq!(average(&week, Metric::Calories), 2000.0);
    for metric in Metric::ALL {
        let expected = if metric == Metric::Calories { 2000.0 } else { 0.0 };
        assert_eq!(average(&week, metric), expected, "{}", metric.label());
    }

    let month = tracker.history().load_range(TimeRange::Month);
    assert_eq!(month.len(), 30);
    assert_eq!(month.first().unwrap().date, today - Duration::days(29));
    assert_eq!(average(&month, Metric::Calories), 1900.0);
    assert_eq!(tracker.log().daily_log().total_calories(), 2000.0);
}

#[test]
fn custom_foods_from_form_join_the_catalog() {
    init_tracing();
    let clock = clock();
    let mut tracker = memory_tracker(&clock);
    let bundled = tracker.catalog().all_foods().len();

    let draft = FoodDraft {
        name: "Aardvark Bar".to_string(),
        serving_size: "1 bar".to_string(),
        calories: "210".to_string(),
        protein: "20".to_string(),
        carbs: "22".to_string(),
        fat: "7".to_string(),
    };
    let food = tracker.catalog_mut().add_custom_food(draft.build().unwrap());

    let all = tracker.catalog().all_foods();
    assert_eq!(all.len(), bundled + 1);
    assert_eq!(all[0].id, food.id);
    assert!(all.windows(2).all(|w| w[0].name <= w[1].name));
}

#[test]
fn file_backed_tracker_survives_reopen_and_reset() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let clock = clock();

    let open = || {
        NutritionTracker::with_parts(
            Arc::new(FileStore::open(dir.path()).unwrap()),
            Arc::new(clock.clone()),
            BUNDLED_FOODS_JSON,
        )
        .unwrap()
    };

    let mut tracker = open();
    let mut draft = ProfileDraft::new(NaiveDate::from_ymd_opt(1994, 6, 15).unwrap());
    draft.name = "Robin".to_string();
    draft.weight = "70".to_string();
    draft.height = "175".to_string();
    draft.activity_level = ActivityLevel::Moderate;
    tracker.complete_onboarding(draft.build().unwrap());
    let oats = tracker.catalog().find("food-006").cloned().unwrap();
    tracker.log_mut().add_food(oats, MealType::Breakfast);
    drop(tracker);

    let mut tracker = open();
    assert!(tracker.is_onboarded());
    assert_eq!(tracker.profile(), Some(profile()));
    assert_eq!(tracker.log().daily_log().total_calories(), 150.0);

    let mut onboarding = tracker.subscribe_onboarding();
    tracker.reset();
    assert!(onboarding.has_changed().unwrap());
    assert!(!*onboarding.borrow_and_update());
    assert!(tracker.profile().is_none());
    assert!(tracker.log().daily_log().is_empty());

    let tracker = open();
    assert!(!tracker.is_onboarded());
    assert!(tracker.history().load_recent(3).iter().all(|log| log.is_empty()));
}

#[test]
fn open_from_config_uses_catalog_override() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("foods.json");
    std::fs::write(
        &catalog_path,
        r#"[{"id":"x","name":"Only Food","servingSize":"1","calories":1,"protein":0,"carbs":0,"fat":0}]"#,
    )
    .unwrap();

    let config = Config {
        data_dir: dir.path().join("data"),
        catalog_path: Some(catalog_path),
        reset_window_days: 7,
    };
    let tracker = NutritionTracker::open(&config).unwrap();
    assert_eq!(tracker.catalog().all_foods().len(), 1);

    let missing = Config {
        catalog_path: Some(dir.path().join("missing.json")),
        ..config
    };
    assert!(NutritionTracker::open(&missing).is_err());
}
