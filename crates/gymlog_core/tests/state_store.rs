use gymlog_core::db::open_db_in_memory;
use gymlog_core::model::exercise::{ExerciseMedia, MediaKind};
use gymlog_core::model::sede::NewFavorite;
use gymlog_core::service::library::{ExpansionState, LinkCollection, SummaryLevel};
use gymlog_core::service::sedes::MoveDirection;
use gymlog_core::repo::state_repo::StateBackup;
use gymlog_core::{
    AppStore, LogUpdate, NewExerciseLog, NewNadaSession, RepoError, RepoResult,
    SqliteStateRepository, StateRepository, StoreError, STORAGE_KEY,
};
use rusqlite::Connection;
use std::cell::Cell;

fn store_in(conn: &Connection) -> AppStore<SqliteStateRepository<'_>> {
    let mut store = AppStore::open(SqliteStateRepository::new(conn)).unwrap();
    store.set_active_sede(Some("ventas")).unwrap();
    store
}

fn press(date: &str, kilos: &str) -> NewExerciseLog {
    NewExerciseLog {
        exercise_name: "press banca".to_string(),
        date: date.to_string(),
        day: "Día 1".to_string(),
        reps: "10".to_string(),
        kilos: kilos.to_string(),
        series: "4".to_string(),
        ..NewExerciseLog::default()
    }
}

fn image(payload: &str) -> ExerciseMedia {
    ExerciseMedia {
        kind: MediaKind::Image,
        data_url: format!("data:image/png;base64,{payload}"),
    }
}

#[test]
fn fresh_store_seeds_default_sedes_and_persists_them() {
    let conn = open_db_in_memory().unwrap();
    let store = AppStore::open(SqliteStateRepository::new(&conn)).unwrap();

    assert_eq!(store.sede_names(), ["VENTAS", "LEGANÉS"]);
    assert!(store.active_sede().is_none());
    assert!(store.repo().load_state(STORAGE_KEY).unwrap().is_some());
}

#[test]
fn set_active_sede_matches_case_insensitively_or_creates() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);
    assert_eq!(store.active_sede(), Some("VENTAS"));

    let created = store.set_active_sede(Some("  centro ")).unwrap();
    assert_eq!(created.as_deref(), Some("CENTRO"));
    assert_eq!(store.sede_names(), ["VENTAS", "LEGANÉS", "CENTRO"]);
    assert_eq!(
        store.active_sede_data().unwrap().workout_days.len(),
        5,
        "new sedes get the full day catalogue"
    );

    let err = store.set_active_sede(Some("   ")).unwrap_err();
    assert!(matches!(err, StoreError::InvalidSedeName(_)));
    assert_eq!(store.active_sede(), Some("CENTRO"));

    assert_eq!(store.set_active_sede(None).unwrap(), None);
    assert!(store.active_sede().is_none());
}

#[test]
fn add_daily_log_requires_an_active_sede() {
    let conn = open_db_in_memory().unwrap();
    let mut store = AppStore::open(SqliteStateRepository::new(&conn)).unwrap();

    let err = store.add_daily_log(press("2024-06-03", "60")).unwrap_err();
    assert!(matches!(err, StoreError::NoActiveSede));
    assert!(store.state().daily_logs.is_empty());
}

#[test]
fn add_daily_log_records_name_and_expands_the_log() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);

    let first = store.add_daily_log(press("2024-06-03", "60")).unwrap();
    let second = store.add_daily_log(press("2024-06-05", "62")).unwrap();

    let state = store.state();
    assert_eq!(state.daily_logs[0].id, second, "new logs go first");
    assert_eq!(state.daily_logs[1].id, first);
    assert_eq!(state.daily_logs[0].sede, "VENTAS");

    let sede = store.active_sede_data().unwrap();
    assert_eq!(sede.exercise_names["Día 1"], vec!["PRESS BANCA"]);
    assert_eq!(sede.workout_days["Día 1"].expanded_logs, vec![first, second]);
}

#[test]
fn daily_logs_for_day_are_newest_first_with_undated_last() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);
    store.add_daily_log(press("", "50")).unwrap();
    store.add_daily_log(press("2024-06-03", "60")).unwrap();
    store.add_daily_log(press("2024-06-05", "62")).unwrap();

    let kilos: Vec<&str> = store
        .daily_logs_for_day("Día 1")
        .iter()
        .map(|log| log.kilos.as_str())
        .collect();
    assert_eq!(kilos, vec!["62", "60", "50"]);
    assert!(store.daily_logs_for_day("Día 2").is_empty());
}

#[test]
fn editing_a_promoted_log_clears_the_flag_and_resave_replaces_the_copy() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);
    let id = store.add_daily_log(press("2024-06-03", "60")).unwrap();

    store.save_log_to_summary(&id).unwrap();
    let daily = store.state().daily_log(&id).unwrap();
    assert!(daily.is_saved_to_summary);
    assert_eq!(daily.saved_state.as_ref(), Some(&daily.snapshot()));
    let summary = store.state().summary_log(&id).unwrap();
    assert!(!summary.is_saved_to_summary);
    assert!(summary.saved_state.is_none());

    let same_id = store
        .update_daily_log(
            &id,
            LogUpdate {
                kilos: Some("65".to_string()),
                ..LogUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(same_id, id);
    assert!(!store.state().daily_log(&id).unwrap().is_saved_to_summary);
    assert_eq!(store.state().summary_log(&id).unwrap().kilos, "60");

    store.save_log_to_summary(&id).unwrap();
    assert_eq!(store.state().summary_logs.len(), 1);
    assert_eq!(store.state().summary_log(&id).unwrap().kilos, "65");
}

#[test]
fn changing_the_date_of_a_promoted_log_forks_it() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);
    let id = store.add_daily_log(press("2024-06-03", "60")).unwrap();
    store.save_log_to_summary(&id).unwrap();

    let forked = store
        .update_daily_log(
            &id,
            LogUpdate {
                date: Some("2024-06-10".to_string()),
                ..LogUpdate::default()
            },
        )
        .unwrap();

    assert_ne!(forked, id);
    let daily = store.state().daily_log(&forked).unwrap();
    assert_eq!(daily.date, "2024-06-10");
    assert!(!daily.is_saved_to_summary);
    assert!(daily.saved_state.is_none());
    assert!(store.state().daily_log(&id).is_none());
    assert_eq!(store.state().summary_log(&id).unwrap().date, "2024-06-03");

    let expanded = &store.active_sede_data().unwrap().workout_days["Día 1"].expanded_logs;
    assert_eq!(expanded, &vec![forked]);
}

#[test]
fn renaming_an_exercise_adds_the_new_name() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);
    let id = store.add_daily_log(press("2024-06-03", "60")).unwrap();

    store
        .update_daily_log(
            &id,
            LogUpdate {
                exercise_name: Some("press inclinado".to_string()),
                ..LogUpdate::default()
            },
        )
        .unwrap();

    let names = &store.active_sede_data().unwrap().exercise_names["Día 1"];
    assert_eq!(names, &vec!["PRESS BANCA", "PRESS INCLINADO"]);
}

#[test]
fn removing_summary_entries_unflags_daily_copies() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);
    let monday = store.add_daily_log(press("2024-06-03", "60")).unwrap();
    let friday = store.add_daily_log(press("2024-06-07", "62")).unwrap();
    let next_week = store.add_daily_log(press("2024-06-10", "64")).unwrap();
    for id in [&monday, &friday, &next_week] {
        store.save_log_to_summary(id).unwrap();
    }

    store.remove_summary_log(&monday).unwrap();
    assert!(!store.state().daily_log(&monday).unwrap().is_saved_to_summary);

    let err = store.remove_summary_log(&monday).unwrap_err();
    assert!(matches!(err, StoreError::LogNotFound(_)));

    assert_eq!(store.remove_day_exercises("2024-06-03", "Día 2").unwrap(), 0);
    assert_eq!(store.remove_week_data("2024-06-03").unwrap(), 1);
    assert!(!store.state().daily_log(&friday).unwrap().is_saved_to_summary);
    assert!(store.state().summary_log(&next_week).is_some());

    let err = store.remove_week_data("someday").unwrap_err();
    assert!(matches!(err, StoreError::InvalidDate(_)));
}

#[test]
fn unknown_log_ids_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);

    assert!(matches!(
        store.save_log_to_summary("missing"),
        Err(StoreError::LogNotFound(_))
    ));
    assert!(matches!(
        store.remove_daily_log("missing"),
        Err(StoreError::LogNotFound(_))
    ));
    assert!(matches!(
        store.update_daily_log("missing", LogUpdate::default()),
        Err(StoreError::LogNotFound(_))
    ));
}

#[test]
fn removing_media_drops_only_the_indexed_item() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);
    let mut input = press("2024-06-03", "60");
    input.media = vec![image("a"), image("b")];
    let id = store.add_daily_log(input).unwrap();

    store.remove_daily_log_media(&id, 0).unwrap();
    store.remove_daily_log_media(&id, 9).unwrap();
    assert_eq!(store.state().daily_log(&id).unwrap().media, vec![image("b")]);
}

#[test]
fn rename_sede_retags_records_and_selection() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);
    let id = store.add_daily_log(press("2024-06-03", "60")).unwrap();
    store.save_log_to_summary(&id).unwrap();
    store
        .add_nada_session(NewNadaSession {
            date: "2024-06-07".to_string(),
            day: "Día 5".to_string(),
            ..NewNadaSession::default()
        })
        .unwrap();

    assert!(store.rename_sede("VENTAS", "norte").unwrap());

    let state = store.state();
    assert_eq!(state.sede_order, vec!["NORTE", "LEGANÉS"]);
    assert_eq!(state.active_sede.as_deref(), Some("NORTE"));
    assert!(!state.sedes.contains_key("VENTAS"));
    assert_eq!(state.daily_logs[0].sede, "NORTE");
    assert_eq!(state.summary_logs[0].sede, "NORTE");
    assert_eq!(state.summary_nada_sessions[0].sede, "NORTE");

    assert!(!store.rename_sede("NORTE", " norte ").unwrap());
    assert!(matches!(
        store.rename_sede("NORTE", "leganés"),
        Err(StoreError::SedeExists(_))
    ));
    assert!(matches!(
        store.rename_sede("SUR", "este"),
        Err(StoreError::SedeNotFound(_))
    ));
}

#[test]
fn removing_a_sede_with_or_without_its_records() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);
    store.add_daily_log(press("2024-06-03", "60")).unwrap();
    store.set_active_sede(Some("LEGANÉS")).unwrap();
    store.add_daily_log(press("2024-06-04", "55")).unwrap();

    store.remove_sede_only("VENTAS").unwrap();
    assert_eq!(store.sede_names(), ["LEGANÉS"]);
    assert_eq!(store.state().daily_logs.len(), 2);

    store.remove_sede_and_data("LEGANÉS").unwrap();
    assert!(store.sede_names().is_empty());
    assert!(store.active_sede().is_none());
    let remaining: Vec<&str> = store
        .state()
        .daily_logs
        .iter()
        .map(|log| log.sede.as_str())
        .collect();
    assert_eq!(remaining, vec!["VENTAS"]);
}

#[test]
fn move_sede_swaps_neighbours_and_ignores_edges() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);
    store.set_active_sede(Some("centro")).unwrap();

    store.move_sede(2, MoveDirection::Up).unwrap();
    assert_eq!(store.sede_names(), ["VENTAS", "CENTRO", "LEGANÉS"]);
    store.move_sede(0, MoveDirection::Up).unwrap();
    store.move_sede(2, MoveDirection::Down).unwrap();
    store.move_sede(7, MoveDirection::Up).unwrap();
    assert_eq!(store.sede_names(), ["VENTAS", "CENTRO", "LEGANÉS"]);
}

#[test]
fn reopening_restores_the_persisted_state() {
    let conn = open_db_in_memory().unwrap();
    let snapshot = {
        let mut store = store_in(&conn);
        let id = store.add_daily_log(press("2024-06-03", "60")).unwrap();
        store.save_log_to_summary(&id).unwrap();
        store.state().clone()
    };

    let reopened = AppStore::open(SqliteStateRepository::new(&conn)).unwrap();
    assert_eq!(reopened.state(), &snapshot);
}

#[test]
fn unparseable_blob_is_archived_before_defaults_replace_it() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::new(&conn);
    repo.save_state(STORAGE_KEY, "{not json").unwrap();

    let store = AppStore::open(repo).unwrap();
    assert_eq!(store.sede_names(), ["VENTAS", "LEGANÉS"]);

    let backups = store.repo().list_backups(STORAGE_KEY).unwrap();
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].reason, "unparseable");
    assert_eq!(backups[0].payload, "{not json");
    assert_ne!(
        store.repo().load_state(STORAGE_KEY).unwrap().as_deref(),
        Some("{not json")
    );
}

#[test]
fn separate_storage_keys_do_not_share_state() {
    let conn = open_db_in_memory().unwrap();
    let mut first = AppStore::open_with_key(SqliteStateRepository::new(&conn), "a").unwrap();
    first.set_active_sede(Some("norte")).unwrap();

    let second = AppStore::open_with_key(SqliteStateRepository::new(&conn), "b").unwrap();
    assert_eq!(second.storage_key(), "b");
    assert!(second.active_sede().is_none());
    assert!(!second.sede_names().contains(&"NORTE".to_string()));
}

#[test]
fn exercise_name_suggestions_are_deduplicated() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);

    assert!(store.add_exercise_name("Día 2", "sentadilla").unwrap());
    assert!(!store.add_exercise_name("Día 2", " SENTADILLA ").unwrap());
    assert!(store.add_exercise_name("Día 2", "hip thrust").unwrap());
    assert!(!store.add_exercise_name("Día 2", "  ").unwrap());
    assert_eq!(
        store.active_sede_data().unwrap().exercise_names["Día 2"],
        vec!["HIP THRUST", "SENTADILLA"]
    );

    assert!(store.remove_exercise_name("Día 2", "sentadilla").unwrap());
    assert!(!store.remove_exercise_name("Día 2", "sentadilla").unwrap());
    assert!(!store.remove_exercise_name("Día 9", "hip thrust").unwrap());
}

#[test]
fn favourites_merge_by_name() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);

    let id = store
        .add_favorite_exercise(NewFavorite {
            name: "Sentadilla".to_string(),
            day_title: "Día 2".to_string(),
            media: vec![image("a")],
            notes: None,
        })
        .unwrap();
    let merged = store
        .add_favorite_exercise(NewFavorite {
            name: "SENTADILLA".to_string(),
            day_title: "Pierna".to_string(),
            media: vec![image("b")],
            notes: Some("profunda".to_string()),
        })
        .unwrap();
    assert_eq!(merged, id);

    let favorites = &store.active_sede_data().unwrap().favorite_exercises;
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].media, vec![image("a"), image("b")]);
    assert_eq!(favorites[0].day_title, "Pierna");
    assert_eq!(favorites[0].notes.as_deref(), Some("profunda"));

    store.remove_favorite_exercise_media(&id, 0).unwrap();
    assert_eq!(
        store.active_sede_data().unwrap().favorite_exercises[0].media,
        vec![image("b")]
    );
    store.remove_favorite_exercise(&id).unwrap();
    assert!(matches!(
        store.remove_favorite_exercise(&id),
        Err(StoreError::FavoriteNotFound(_))
    ));
}

#[test]
fn links_reject_blank_and_duplicate_urls() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);

    let first = store.add_stretching_link("https://video/1").unwrap().unwrap();
    assert!(store.add_stretching_link("https://video/1").unwrap().is_none());
    assert!(store.add_posture_link("").unwrap().is_none());
    store.add_posture_link("https://video/1").unwrap().unwrap();

    let sede = store.active_sede_data().unwrap();
    assert_eq!(sede.stretching_links[0].name, "Video 1");
    assert_eq!(sede.posture_links.len(), 1);

    assert!(store
        .update_link_name(LinkCollection::Stretching, &first, "Isquios")
        .unwrap());
    assert_eq!(store.active_sede_data().unwrap().stretching_links[0].name, "Isquios");
    assert!(store.remove_link(LinkCollection::Stretching, &first).unwrap());
    assert!(!store.remove_link(LinkCollection::Stretching, &first).unwrap());

    let muscle = store
        .add_muscle_group_link("Día 1", "Pecho", "https://video/2")
        .unwrap()
        .unwrap();
    assert!(store
        .add_muscle_group_link("Día 1", "Pecho", "https://video/2")
        .unwrap()
        .is_none());
    assert!(store
        .update_muscle_group_link_name("Día 1", "Pecho", &muscle, "Aperturas")
        .unwrap());
    assert!(!store
        .remove_muscle_group_link("Día 1", "Bíceps", &muscle)
        .unwrap());
    assert!(store
        .remove_muscle_group_link("Día 1", "Pecho", &muscle)
        .unwrap());
}

#[test]
fn collapse_and_expansion_flags_toggle() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);
    let id = store.add_daily_log(press("2024-06-03", "60")).unwrap();

    assert!(!store.toggle_exercise_log_expansion("Día 1", &id, None).unwrap());
    assert!(store
        .toggle_exercise_log_expansion("Día 1", &id, Some(ExpansionState::Open))
        .unwrap());
    assert!(store
        .toggle_exercise_log_expansion("Día 1", &id, Some(ExpansionState::Open))
        .unwrap());
    assert_eq!(
        store.active_sede_data().unwrap().workout_days["Día 1"].expanded_logs,
        vec![id.clone()]
    );

    store.toggle_summary_week_collapse("2024-06-03").unwrap();
    store.toggle_summary_day_collapse("2024-06-03-Día 1").unwrap();
    store
        .toggle_summary_collapse(SummaryLevel::Exercise, "2024-06-03-Día 1-press banca")
        .unwrap();
    let sede = store.active_sede_data().unwrap();
    assert_eq!(sede.summary_collapsed_weeks, vec!["2024-06-03"]);
    assert_eq!(sede.summary_collapsed_exercises.len(), 1);

    store.toggle_summary_week_collapse("2024-06-03").unwrap();
    assert!(store.active_sede_data().unwrap().summary_collapsed_weeks.is_empty());

    // Promotion re-expands the log's summary path.
    store.save_log_to_summary(&id).unwrap();
    let sede = store.active_sede_data().unwrap();
    assert!(sede.summary_collapsed_days.is_empty());
    assert!(sede.summary_collapsed_exercises.is_empty());
}

#[test]
fn cardio_form_drafts_feed_recorded_sessions() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);

    assert!(store
        .update_workout_day_form("Día 5", "distance", "3,5")
        .unwrap());
    assert!(store
        .update_workout_day_form("Día 5", "distanceUnit", "mts")
        .unwrap());
    assert!(store.update_workout_day_form("Día 5", "title", "Cinta").unwrap());
    assert!(!store.update_workout_day_form("Día 9", "title", "x").unwrap());
    assert!(matches!(
        store.update_workout_day_form("Día 5", "pace", "x"),
        Err(StoreError::InvalidFormField(_))
    ));
    assert!(matches!(
        store.update_workout_day_form("Día 5", "distanceUnit", "millas"),
        Err(StoreError::InvalidFormField(_))
    ));

    let id = store.submit_nada_form("Día 5").unwrap();
    let session = &store.state().summary_nada_sessions[0];
    assert_eq!(session.id, id);
    assert_eq!(session.title, "Cinta");
    assert_eq!(session.metrics.distance, "3,5");
    assert_eq!(session.sede, "VENTAS");
    assert!(session.notes.is_none());

    assert!(store.clear_nada_form("Día 5").unwrap());
    let form = &store.active_sede_data().unwrap().workout_days["Día 5"].nada;
    assert!(form.title.is_empty());
    assert!(form.metrics.distance.is_empty());
}

#[test]
fn undated_cardio_sessions_get_a_placeholder_date() {
    let conn = open_db_in_memory().unwrap();
    let mut store = store_in(&conn);

    store
        .add_nada_session(NewNadaSession {
            date: "2024-06-07".to_string(),
            day: "Día 5".to_string(),
            ..NewNadaSession::default()
        })
        .unwrap();
    store
        .add_nada_session(NewNadaSession {
            date: "  ".to_string(),
            day: "Día 5".to_string(),
            ..NewNadaSession::default()
        })
        .unwrap();

    let dates: Vec<&str> = store
        .state()
        .summary_nada_sessions
        .iter()
        .map(|session| session.date.as_str())
        .collect();
    assert_eq!(dates, vec!["Sin fecha", "2024-06-07"]);
}

/// SQLite repository whose writes can be switched off.
struct FlakyRepository<'conn> {
    inner: SqliteStateRepository<'conn>,
    fail_writes: Cell<bool>,
}

impl StateRepository for FlakyRepository<'_> {
    fn load_state(&self, key: &str) -> RepoResult<Option<String>> {
        self.inner.load_state(key)
    }

    fn save_state(&self, key: &str, payload: &str) -> RepoResult<()> {
        if self.fail_writes.get() {
            return Err(RepoError::InvalidData("disk full".to_string()));
        }
        self.inner.save_state(key, payload)
    }

    fn backup_state(&self, key: &str, payload: &str, reason: &str) -> RepoResult<i64> {
        self.inner.backup_state(key, payload, reason)
    }

    fn list_backups(&self, key: &str) -> RepoResult<Vec<StateBackup>> {
        self.inner.list_backups(key)
    }
}

#[test]
fn failed_write_leaves_memory_and_storage_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let mut store = AppStore::open(FlakyRepository {
        inner: SqliteStateRepository::new(&conn),
        fail_writes: Cell::new(false),
    })
    .unwrap();
    store.set_active_sede(Some("ventas")).unwrap();
    let stored_before = store.repo().load_state(STORAGE_KEY).unwrap();

    store.repo().fail_writes.set(true);
    let result = store.add_daily_log(press("2024-06-03", "60"));
    assert!(matches!(result, Err(StoreError::Repo(_))));
    assert!(store.state().daily_logs.is_empty());
    assert!(store
        .active_sede_data()
        .unwrap()
        .exercise_names
        .values()
        .all(Vec::is_empty));
    assert_eq!(store.repo().load_state(STORAGE_KEY).unwrap(), stored_before);

    // The rejected change must not reappear with the next successful write.
    store.repo().fail_writes.set(false);
    store.set_active_sede(Some("norte")).unwrap();
    let reopened = AppStore::open(SqliteStateRepository::new(&conn)).unwrap();
    assert!(reopened.state().daily_logs.is_empty());
    assert_eq!(reopened.active_sede(), Some("NORTE"));
}
