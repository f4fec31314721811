use chrono::{DateTime, TimeZone, Utc};
use sea_orm::DatabaseConnection;
use taskboard_server::entities::task::Priority;
use taskboard_server::task::{NewTask, TaskChanges, TaskFilter, TaskService, TaskServiceError};

mod common;

async fn setup() -> anyhow::Result<DatabaseConnection> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    common::setup_db().await
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
}

fn new_task(title: &str, description: &str, datetime: DateTime<Utc>) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: description.to_string(),
        datetime,
        priority: Priority::Medium,
    }
}

#[tokio::test]
async fn can_create_task() {
    let db = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&db);

    let created = service
        .create_task(new_task("Pay rent", "", at(3, 9)))
        .await
        .expect("Failed to create task");

    assert!(!created.id.is_empty());
    assert_eq!(created.title, "Pay rent");
    assert_eq!(created.datetime, at(3, 9));
    assert_eq!(created.priority, Priority::Medium);
    assert!(!created.completed);

    let fetched = service
        .get_task_by_id(&created.id)
        .await
        .expect("Failed to fetch task");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn lists_tasks_ordered_by_datetime() {
    let db = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&db);
    for (title, when) in [("late", at(5, 17)), ("early", at(3, 9)), ("middle", at(4, 12))] {
        service.create_task(new_task(title, "", when)).await.unwrap();
    }

    let tasks = service.list_tasks(TaskFilter::default()).await.unwrap();

    let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["early", "middle", "late"]);
}

#[tokio::test]
async fn range_includes_start_and_excludes_end() {
    let db = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&db);
    for (title, when) in [
        ("before", at(2, 23)),
        ("at start", at(3, 0)),
        ("inside", at(9, 12)),
        ("at end", at(10, 0)),
    ] {
        service.create_task(new_task(title, "", when)).await.unwrap();
    }

    let tasks = service
        .list_tasks(TaskFilter {
            start: Some(at(3, 0)),
            end: Some(at(10, 0)),
            q: None,
        })
        .await
        .unwrap();

    let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["at start", "inside"]);
}

#[tokio::test]
async fn ignores_half_open_range() {
    let db = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&db);
    service.create_task(new_task("old", "", at(1, 9))).await.unwrap();
    service.create_task(new_task("new", "", at(20, 9))).await.unwrap();

    let tasks = service
        .list_tasks(TaskFilter {
            start: Some(at(10, 0)),
            end: None,
            q: None,
        })
        .await
        .unwrap();

    assert_eq!(tasks.len(), 2);
}

#[tokio::test]
async fn text_filter_matches_title_or_description_case_insensitively() {
    let db = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&db);
    service.create_task(new_task("Pay RENT", "", at(3, 9))).await.unwrap();
    service
        .create_task(new_task("Landlord", "about the rent", at(4, 9)))
        .await
        .unwrap();
    service.create_task(new_task("Groceries", "milk", at(5, 9))).await.unwrap();

    let tasks = service
        .list_tasks(TaskFilter {
            q: Some("rent".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Pay RENT", "Landlord"]);
}

#[tokio::test]
async fn text_filter_treats_wildcards_literally() {
    let db = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&db);
    service.create_task(new_task("50% done", "", at(3, 9))).await.unwrap();
    service.create_task(new_task("500 done", "", at(4, 9))).await.unwrap();

    let tasks = service
        .list_tasks(TaskFilter {
            q: Some("0%".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "50% done");
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let db = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&db);
    let created = service
        .create_task(new_task("Standup", "daily", at(3, 9)))
        .await
        .unwrap();

    let updated = service
        .update_task_by_id(
            &created.id,
            TaskChanges {
                completed: Some(true),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update task");

    assert!(updated.completed);
    assert_eq!(updated.title, "Standup");
    assert_eq!(updated.description, "daily");
    assert_eq!(updated.datetime, at(3, 9));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn update_of_unknown_task_is_not_found() {
    let db = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&db);

    let result = service
        .update_task_by_id("missing", TaskChanges::default())
        .await;

    assert!(matches!(result, Err(TaskServiceError::NotFound(id)) if id == "missing"));
}

#[tokio::test]
async fn can_delete_task() {
    let db = setup().await.expect("Failed to setup test context");
    let service = TaskService::new(&db);
    let created = service
        .create_task(new_task("Throwaway", "", at(3, 9)))
        .await
        .unwrap();

    service
        .delete_task_by_id(&created.id)
        .await
        .expect("Failed to delete task");

    assert!(matches!(
        service.get_task_by_id(&created.id).await,
        Err(TaskServiceError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_task_by_id(&created.id).await,
        Err(TaskServiceError::NotFound(_))
    ));
}
