//! Command handlers: translate parsed arguments into store calls and print
//! the outcome.

use crate::cli::{
    CardioCommand, Commands, Direction, ExportTarget, LogCommand, SedeCommand, SummaryCommand, Unit,
};
use crate::config::Config;
use crate::error::{CliError, CliResult};
use gymlog_core::dates::{format_display_date, format_iso, format_week_range, local_today};
use gymlog_core::export::{self, format_log_text, ExportFile};
use gymlog_core::model::day::{day_label, WORKOUT_DAYS};
use gymlog_core::model::exercise::DistanceUnit;
use gymlog_core::model::nada::{CardioDistanceUnit, NadaMetrics};
use gymlog_core::service::sedes::{sede_color, MoveDirection};
use gymlog_core::summary::{
    compare_with_previous, comparison_pool, group_by_week, performance, MetricComparison, Trend,
};
use gymlog_core::{AppStore, LogUpdate, NewExerciseLog, NewNadaSession, StateRepository};
use log::info;
use std::path::Path;

pub fn dispatch<R: StateRepository>(
    store: &mut AppStore<R>,
    command: Commands,
    config: &Config,
) -> CliResult<()> {
    match command {
        Commands::Sede { action } => sede(store, action),
        Commands::Log { action } => log_command(store, action),
        Commands::Cardio { action } => cardio(store, action),
        Commands::Summary { action } => summary(store, action),
        Commands::Stats => {
            stats(store);
            Ok(())
        }
        Commands::Export {
            target,
            text,
            output,
        } => {
            let dir = output.unwrap_or_else(|| config.export_dir.clone());
            let file = render_export(store, target, text)?;
            write_export(&dir, &file)
        }
        Commands::Import { file } => {
            let json = std::fs::read_to_string(&file)?;
            let mode = store.import_data(&json)?;
            println!("imported {} ({mode:?})", file.display());
            Ok(())
        }
    }
}

/// Accepts `1`..`5` as shorthand for the catalogue day keys.
pub fn resolve_day(input: &str) -> CliResult<String> {
    let trimmed = input.trim();
    if let Ok(number) = trimmed.parse::<usize>() {
        return WORKOUT_DAYS
            .get(number.wrapping_sub(1))
            .map(|day| day.to_string())
            .ok_or_else(|| CliError::InvalidArgument(format!("unknown workout day `{input}`")));
    }
    if WORKOUT_DAYS.contains(&trimmed) {
        return Ok(trimmed.to_string());
    }
    Err(CliError::InvalidArgument(format!(
        "unknown workout day `{input}`"
    )))
}

fn sede<R: StateRepository>(store: &mut AppStore<R>, action: SedeCommand) -> CliResult<()> {
    match action {
        SedeCommand::List => {
            let active = store.active_sede().map(str::to_string);
            for name in store.sede_names() {
                let marker = if active.as_deref() == Some(name.as_str()) { "*" } else { " " };
                println!("{marker} {name} ({})", sede_color(name).name());
            }
        }
        SedeCommand::Use { name, clear } => {
            let target = if clear { None } else { name.as_deref() };
            match store.set_active_sede(target)? {
                Some(selected) => println!("active sede: {selected}"),
                None => println!("active sede cleared"),
            }
        }
        SedeCommand::Rename { old, new } => {
            if store.rename_sede(&old, &new)? {
                println!("renamed {old}");
            } else {
                println!("nothing to rename");
            }
        }
        SedeCommand::Remove { name, keep_logs } => {
            if keep_logs {
                store.remove_sede_only(&name)?;
            } else {
                store.remove_sede_and_data(&name)?;
            }
            println!("removed {name}");
        }
        SedeCommand::Move { name, direction } => {
            let index = store
                .sede_names()
                .iter()
                .position(|existing| *existing == name)
                .ok_or_else(|| CliError::InvalidArgument(format!("unknown sede `{name}`")))?;
            let direction = match direction {
                Direction::Up => MoveDirection::Up,
                Direction::Down => MoveDirection::Down,
            };
            store.move_sede(index, direction)?;
            println!("{}", store.sede_names().join(", "));
        }
    }
    Ok(())
}

fn log_command<R: StateRepository>(store: &mut AppStore<R>, action: LogCommand) -> CliResult<()> {
    match action {
        LogCommand::Add {
            day,
            name,
            date,
            series,
            reps,
            kilos,
            time,
            calories,
            unit,
            notes,
        } => {
            let id = store.add_daily_log(NewExerciseLog {
                exercise_name: name,
                date: date.unwrap_or_else(|| format_iso(local_today())),
                day: resolve_day(&day)?,
                reps,
                kilos,
                series,
                media: Vec::new(),
                notes,
                tiempo: time,
                calorias: calories,
                distance_unit: unit.map(distance_unit),
            })?;
            println!("{id}");
        }
        LogCommand::Edit {
            id,
            name,
            date,
            series,
            reps,
            kilos,
            time,
            calories,
            notes,
        } => {
            let final_id = store.update_daily_log(
                &id,
                LogUpdate {
                    exercise_name: name,
                    date,
                    reps,
                    kilos,
                    series,
                    media: None,
                    notes: notes.map(Some),
                    tiempo: time.map(Some),
                    calorias: calories.map(Some),
                    distance_unit: None,
                },
            )?;
            println!("{final_id}");
        }
        LogCommand::Rm { id } => {
            store.remove_daily_log(&id)?;
            println!("removed {id}");
        }
        LogCommand::Save { id } => {
            store.save_log_to_summary(&id)?;
            println!("saved {id}");
        }
        LogCommand::Unsave { id } => {
            store.remove_summary_log(&id)?;
            println!("unsaved {id}");
        }
        LogCommand::List { day } => {
            let today = local_today();
            let days: Vec<String> = match day {
                Some(day) => vec![resolve_day(&day)?],
                None => WORKOUT_DAYS.iter().map(|day| day.to_string()).collect(),
            };
            for day in days {
                let logs = store.daily_logs_for_day(&day);
                if logs.is_empty() {
                    continue;
                }
                println!("== {} ==", day_label(&day));
                for log in logs {
                    let saved = if log.is_saved_to_summary { " [saved]" } else { "" };
                    println!("{}{saved}", format_log_text(log, today));
                    println!("  id: {}", log.id);
                }
            }
        }
    }
    Ok(())
}

fn distance_unit(unit: Unit) -> DistanceUnit {
    match unit {
        Unit::Km => DistanceUnit::Kilometers,
        Unit::M => DistanceUnit::Meters,
    }
}

fn cardio<R: StateRepository>(store: &mut AppStore<R>, action: CardioCommand) -> CliResult<()> {
    match action {
        CardioCommand::Add {
            day,
            date,
            title,
            speed,
            distance,
            unit,
            incline,
            time,
            calories,
            notes,
        } => {
            let distance_unit = CardioDistanceUnit::parse(&unit)
                .ok_or_else(|| CliError::InvalidArgument(format!("invalid distance unit `{unit}`")))?;
            let id = store.add_nada_session(NewNadaSession {
                date: date.unwrap_or_else(|| format_iso(local_today())),
                day: resolve_day(&day)?,
                title,
                metrics: NadaMetrics {
                    speed,
                    distance,
                    distance_unit,
                    incline,
                    time,
                    calories,
                },
                notes,
            })?;
            println!("{id}");
        }
    }
    Ok(())
}

fn summary<R: StateRepository>(store: &mut AppStore<R>, action: SummaryCommand) -> CliResult<()> {
    match action {
        SummaryCommand::Show => show_summary(store),
        SummaryCommand::RmWeek { week_start } => {
            let removed = store.remove_week_data(&week_start)?;
            println!("removed {removed} summary logs");
        }
        SummaryCommand::RmDay { week_start, day } => {
            let removed = store.remove_day_exercises(&week_start, &resolve_day(&day)?)?;
            println!("removed {removed} summary logs");
        }
    }
    Ok(())
}

fn show_summary<R: StateRepository>(store: &AppStore<R>) {
    let today = local_today();
    let state = store.state();
    let pool = comparison_pool(&state.summary_logs, &state.daily_logs);
    let weeks = group_by_week(&state.summary_logs, today);
    if weeks.is_empty() {
        println!("{}", export::EMPTY_EXPORT_TEXT);
    }

    for week in &weeks {
        println!("{}", format_week_range(week.start));
        for day in &week.days {
            println!("  {}", day_label(&day.day));
            for group in day.by_exercise() {
                println!("    {}", group.exercise_name);
                for log in group.logs {
                    let trends = render_trends(&compare_with_previous(log, &pool));
                    println!(
                        "      {} [{}] {} x {} @ {}{trends}",
                        format_display_date(&log.date, today),
                        log.sede,
                        or_dash(&log.series),
                        or_dash(&log.reps),
                        or_dash(&log.kilos)
                    );
                }
            }
        }
    }

    if !state.summary_nada_sessions.is_empty() {
        println!("cardio sessions: {}", state.summary_nada_sessions.len());
    }
}

fn stats<R: StateRepository>(store: &AppStore<R>) {
    let today = local_today();
    let state = store.state();
    let pool = comparison_pool(&state.summary_logs, &state.daily_logs);
    let Some(performance) = performance(&pool) else {
        println!("no logs recorded yet");
        return;
    };

    println!("last session:");
    println!("{}", format_log_text(performance.last_log, today));
    if !performance.comparison.is_empty() {
        println!("  trend:{}", render_trends(&performance.comparison));
    }
    if performance.is_new_record {
        println!("new personal record!");
    } else {
        println!("personal record:");
        println!("{}", format_log_text(performance.personal_record, today));
    }
}

fn render_trends(comparison: &MetricComparison) -> String {
    let metrics = [
        ("series", comparison.series),
        ("reps", comparison.reps),
        ("kilos", comparison.kilos),
        ("tiempo", comparison.tiempo),
        ("calorias", comparison.calorias),
    ];
    metrics
        .iter()
        .filter_map(|(name, trend)| {
            let arrow = match (*trend)? {
                Trend::Increase => "+",
                Trend::Decrease => "-",
                Trend::Same => "=",
            };
            Some(format!(" {name}{arrow}"))
        })
        .collect()
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn render_export<R: StateRepository>(
    store: &AppStore<R>,
    target: ExportTarget,
    text: bool,
) -> CliResult<ExportFile> {
    let state = store.state();
    let today = local_today();
    let file = match (target, text) {
        (ExportTarget::Full, false) => export::export_full(state, today)?,
        (ExportTarget::Full, true) => export::export_full_text(state, today),
        (ExportTarget::Summary, false) => export::export_summary(state, today)?,
        (ExportTarget::Summary, true) => export::export_summary_text(state, today),
        (ExportTarget::Week { week_start }, false) => export::export_week(state, &week_start, today)?,
        (ExportTarget::Week { week_start }, true) => {
            export::export_week_text(state, &week_start, today)?
        }
        (ExportTarget::Day { week_start, day }, false) => {
            export::export_day(state, &week_start, &resolve_day(&day)?, today)?
        }
        (ExportTarget::Day { week_start, day }, true) => {
            export::export_day_text(state, &week_start, &resolve_day(&day)?, today)?
        }
    };
    Ok(file)
}

fn write_export(dir: &Path, file: &ExportFile) -> CliResult<()> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&file.filename);
    std::fs::write(&path, &file.contents)?;
    info!(
        "event=export_write module=cli status=ok file={} bytes={}",
        path.display(),
        file.contents.len()
    );
    println!("{}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::resolve_day;

    #[test]
    fn resolve_day_accepts_numbers_and_keys() {
        assert_eq!(resolve_day("1").unwrap(), "Día 1");
        assert_eq!(resolve_day(" 5 ").unwrap(), "Día 5");
        assert_eq!(resolve_day("Día 3").unwrap(), "Día 3");
        assert!(resolve_day("0").is_err());
        assert!(resolve_day("6").is_err());
        assert!(resolve_day("lunes").is_err());
    }
}
