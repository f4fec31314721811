use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use taskboard_client::HttpTaskApi;
use taskboard_core::scroll::NoScrollControl;
use taskboard_core::{ApiError, Dashboard, Priority, TaskApi, TaskDraft, TaskPatch, TaskQuery};

mod common;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
}

fn draft(title: &str, datetime: DateTime<Utc>) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        description: String::new(),
        datetime,
        priority: Priority::Medium,
    }
}

async fn setup() -> anyhow::Result<HttpTaskApi> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let base_url = common::spawn_server().await?;
    Ok(HttpTaskApi::new(&base_url)?)
}

#[tokio::test(flavor = "multi_thread")]
async fn can_manage_a_task_over_http() {
    let api = setup().await.expect("Failed to setup test context");

    let created = api.create_task(&draft("Pay rent", at(3, 9))).await.unwrap();
    assert!(!created.id.is_empty());
    assert!(!created.completed);
    assert!(created.created_at.is_some());

    let week = api
        .list_tasks(&TaskQuery::between(at(3, 0), at(10, 0)))
        .await
        .unwrap();
    assert_eq!(week, vec![created.clone()]);

    let patched = api
        .patch_task(&created.id, &TaskPatch::completed(true))
        .await
        .unwrap();
    assert!(patched.completed);
    assert_eq!(patched.title, "Pay rent");

    let mut replacement = draft("Pay rent early", at(4, 8));
    replacement.priority = Priority::High;
    let replaced = api.replace_task(&created.id, &replacement).await.unwrap();
    assert_eq!(replaced.title, "Pay rent early");
    assert_eq!(replaced.datetime, at(4, 8));
    assert_eq!(replaced.priority, Priority::High);
    assert!(replaced.completed);

    api.delete_task(&created.id).await.unwrap();
    assert_eq!(api.get_task(&created.id).await, Err(ApiError::NotFound));
}

#[tokio::test(flavor = "multi_thread")]
async fn searches_with_text_query() {
    let api = setup().await.expect("Failed to setup test context");
    api.create_task(&draft("Pay RENT", at(3, 9))).await.unwrap();
    api.create_task(&draft("Groceries", at(4, 9))).await.unwrap();

    let found = api
        .list_tasks(&TaskQuery {
            q: Some("rent".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Pay RENT");
}

#[tokio::test(flavor = "multi_thread")]
async fn maps_error_statuses() {
    let api = setup().await.expect("Failed to setup test context");

    assert_eq!(
        api.delete_task("does-not-exist").await,
        Err(ApiError::NotFound)
    );
    assert_eq!(
        api.create_task(&draft(" ", at(3, 9))).await,
        Err(ApiError::Validation("Title is required".to_string()))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn reports_transport_failure_when_server_is_unreachable() {
    let api = HttpTaskApi::new("http://127.0.0.1:1").unwrap();

    let result = api.list_tasks(&TaskQuery::default()).await;

    assert!(matches!(result, Err(ApiError::Transport(_))));
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_falls_back_to_examples_when_server_is_unreachable() {
    let api = HttpTaskApi::new("http://127.0.0.1:1").unwrap();
    let mut dashboard = Dashboard::new(api, at(5, 12), Arc::new(NoScrollControl));

    dashboard.load().await;

    assert!(!dashboard.is_loading());
    assert_eq!(dashboard.tasks().len(), 4);
    assert!(dashboard.tasks().iter().all(|task| dashboard.is_unsynced(&task.id)));
    assert_eq!(dashboard.week_stats().completed_pct, 50);
}

#[tokio::test(flavor = "multi_thread")]
async fn dashboard_session_against_live_server() {
    let api = setup().await.expect("Failed to setup test context");
    api.create_task(&draft("Last week", at(2, 9))).await.unwrap();
    api.create_task(&draft("Thursday", at(6, 9))).await.unwrap();

    let mut dashboard = Dashboard::new(api.clone(), at(5, 12), Arc::new(NoScrollControl));
    dashboard.load().await;
    let titles: Vec<_> = dashboard.tasks().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Thursday"]);

    dashboard.open_add().unwrap();
    dashboard.form_mut().unwrap().title = "Standup".to_string();
    let created = dashboard.submit().await.unwrap();
    assert_eq!(created.datetime, at(5, 9));
    assert!(!dashboard.is_unsynced(&created.id));
    assert!(dashboard.overlay().is_closed());

    let visible: Vec<_> = dashboard.visible_tasks().iter().map(|t| t.id.clone()).collect();
    assert_eq!(visible, vec![created.id.clone()]);

    dashboard.toggle_complete(&created.id).await;
    assert!(api.get_task(&created.id).await.unwrap().completed);
    let stats = dashboard.week_stats();
    assert_eq!((stats.total, stats.completed, stats.completed_pct), (2, 1, 50));

    dashboard.delete_task(&created.id).await;
    assert_eq!(api.get_task(&created.id).await, Err(ApiError::NotFound));
    assert_eq!(dashboard.tasks().len(), 1);
}
