use chrono::TimeZone;
use std::fmt::{Display, Write};
use taskboard_core::dashboard::Dashboard;
use taskboard_core::search::SearchResults;
use taskboard_core::stats::WeekStats;
use taskboard_core::{Task, TaskApi, WeekDay};

/// One line per day, Monday first. The selected day is bracketed and today starred.
pub fn week_strip(days: &[WeekDay]) -> String {
    days.iter()
        .map(|day| {
            let label = day.date.format("%a %d").to_string();
            let label = if day.is_selected {
                format!("[{}]", label)
            } else {
                format!(" {} ", label)
            };
            if day.is_today { format!("{}*", label) } else { format!("{} ", label) }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn task_line<Tz: TimeZone>(task: &Task, tz: &Tz, unsynced: bool) -> String
where
    Tz::Offset: Display,
{
    let mut line = format!(
        "[{}] {} {} ({})",
        if task.completed { "x" } else { " " },
        task.datetime.with_timezone(tz).format("%H:%M"),
        task.title,
        task.priority,
    );
    if !task.description.is_empty() {
        let _ = write!(line, " - {}", task.description);
    }
    let _ = write!(line, "  #{}", task.id);
    if unsynced {
        line.push_str(" (not saved)");
    }
    line
}

pub fn stats_line(stats: &WeekStats) -> String {
    format!(
        "This week: {} tasks, {} completed, {} pending ({}% complete)",
        stats.total, stats.completed, stats.pending, stats.completed_pct
    )
}

pub fn dashboard<A: TaskApi, Tz: TimeZone>(dashboard: &Dashboard<A, Tz>) -> String
where
    Tz::Offset: Display,
{
    let tz = dashboard.week().start().timezone();
    let mut out = week_strip(&dashboard.week_days());
    out.push('\n');
    let _ = writeln!(out, "{}", dashboard.selected_day().format("%A, %B %-d"));

    let visible = dashboard.visible_tasks();
    if visible.is_empty() {
        out.push_str("  No tasks\n");
    }
    for task in visible {
        let _ = writeln!(out, "  {}", task_line(task, &tz, dashboard.is_unsynced(&task.id)));
    }

    out.push_str(&stats_line(&dashboard.week_stats()));
    out
}

pub fn search_results<Tz: TimeZone>(results: &SearchResults, tz: &Tz) -> String
where
    Tz::Offset: Display,
{
    match results {
        SearchResults::NotSearched => "Type to search tasks".to_string(),
        SearchResults::Matches(tasks) if tasks.is_empty() => "No tasks found".to_string(),
        SearchResults::Matches(tasks) => tasks
            .iter()
            .map(|task| {
                format!(
                    "{} {}",
                    task.datetime.with_timezone(tz).format("%Y-%m-%d"),
                    task_line(task, tz, false)
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}
