use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use taskboard_client::HttpTaskApi;
use taskboard_client::config::ClientConfig;
use taskboard_client::view;
use taskboard_core::form::{FormError, TaskForm};
use taskboard_core::scroll::NoScrollControl;
use taskboard_core::week::local_date;
use taskboard_core::{Dashboard, Priority, SubmitError, Task, TaskApi};

#[derive(Parser, Debug)]
#[command(name = "taskboard", about = "Weekly task dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Show the current week, one day's tasks and the weekly statistics
    Week {
        /// Day to list, defaults to today
        #[arg(long)]
        day: Option<NaiveDate>,
    },
    Add(TaskFields),
    Edit {
        id: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Toggle a task between pending and completed
    Done { id: String },
    Rm { id: String },
    /// Search every loaded task by title or description
    Search { query: String },
}

#[derive(Debug, Clone, Args)]
struct TaskFields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Start time as HH:MM
    #[arg(long, value_parser = parse_time)]
    start: Option<NaiveTime>,
    /// End time as HH:MM
    #[arg(long, value_parser = parse_time)]
    end: Option<NaiveTime>,
    #[arg(long)]
    priority: Option<Priority>,
}

impl TaskFields {
    fn apply(self, form: &mut TaskForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(date) = self.date {
            form.date = date;
        }
        if let Some(start) = self.start {
            form.start_time = start;
        }
        if let Some(end) = self.end {
            form.end_time = end;
        }
        if let Some(priority) = self.priority {
            form.priority = priority;
        }
    }
}

fn parse_time(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
}

type LocalDashboard = Dashboard<HttpTaskApi, Local>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;

    let api = HttpTaskApi::new(&config.api_url)?;
    let mut dashboard: LocalDashboard = Dashboard::new(api, Local::now(), Arc::new(NoScrollControl));
    dashboard.load().await;

    match cli.command {
        Commands::Week { day } => {
            if let Some(day) = day {
                dashboard.select_day(day);
            }
        }
        Commands::Add(fields) => {
            dashboard.open_add()?;
            if let Some(form) = dashboard.form_mut() {
                fields.apply(form);
            }
            submit(&mut dashboard).await;
        }
        Commands::Edit { id, fields } => {
            dashboard.open_edit(&id)?;
            if let Some(form) = dashboard.form_mut() {
                fields.apply(form);
            }
            submit(&mut dashboard).await;
        }
        Commands::Done { id } => {
            dashboard.toggle_complete(&id).await;
            select_task_day(&mut dashboard, &id);
        }
        Commands::Rm { id } => {
            select_task_day(&mut dashboard, &id);
            dashboard.delete_task(&id).await;
        }
        Commands::Search { query } => {
            dashboard.open_search()?;
            dashboard.set_search(query);
            println!("{}", view::search_results(&dashboard.search_results(), &Local));
            dashboard.close_search();
            return Ok(());
        }
    }

    println!("{}", view::dashboard(&dashboard));
    Ok(())
}

async fn submit(dashboard: &mut LocalDashboard) {
    match dashboard.submit().await {
        Ok(task) => select_day_of(dashboard, &task),
        Err(SubmitError::Form(FormError::EmptyTitle)) => println!("Title is required"),
        Err(SubmitError::Api(_)) => println!("Failed to save changes. Try again."),
        Err(err) => println!("{}", err),
    }
}

fn select_task_day<A: TaskApi>(dashboard: &mut Dashboard<A, Local>, id: &str) {
    if let Some(task) = dashboard.tasks().iter().find(|task| task.id == id).cloned() {
        select_day_of(dashboard, &task);
    }
}

fn select_day_of<A: TaskApi>(dashboard: &mut Dashboard<A, Local>, task: &Task) {
    dashboard.select_day(local_date(&task.datetime, &Local));
}
