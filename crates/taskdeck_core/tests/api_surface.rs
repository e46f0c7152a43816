use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{
    Api, CreateTaskRequest, ListNameRequest, UpdateTaskRequest, UserId,
};
use uuid::Uuid;

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;
const STATUS_NO_CONTENT: u16 = 204;
const STATUS_BAD_REQUEST: u16 = 400;
const STATUS_UNAUTHORIZED: u16 = 401;
const STATUS_NOT_FOUND: u16 = 404;

fn owner() -> UserId {
    Uuid::new_v4()
}

fn create_request(title: &str) -> CreateTaskRequest {
    CreateTaskRequest {
        title: title.to_string(),
        completed: false,
        due_date: None,
        task_list: None,
    }
}

#[test]
fn unauthenticated_calls_are_rejected_before_core_logic() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();

    let err = api.list_tasks(None, None).unwrap_err();
    assert_eq!(err.status, STATUS_UNAUTHORIZED);

    let err = api.create_task(None, &create_request("never stored")).unwrap_err();
    assert_eq!(err.status, STATUS_UNAUTHORIZED);

    // Nothing reached the store: an authenticated read sees an empty set.
    let listed = api.list_tasks(Some(owner()), None).unwrap();
    assert!(listed.body.is_empty());
}

#[test]
fn create_then_read_round_trips_through_the_surface() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();
    let user = owner();

    let created = api.create_task(Some(user), &create_request("write minutes")).unwrap();
    assert_eq!(created.status, STATUS_CREATED);
    assert!(created.body.task_list.is_some(), "task must land in the inbox");

    let uuid = created.body.task_uuid.to_string();
    let detail = api.task_detail(Some(user), &uuid).unwrap();
    assert_eq!(detail.status, STATUS_OK);
    assert_eq!(detail.body, created.body);
}

#[test]
fn listing_with_unknown_reference_returns_404_with_message() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();

    let err = api.list_tasks(Some(owner()), Some("list-not-found")).unwrap_err();
    assert_eq!(err.status, STATUS_NOT_FOUND);
    assert_eq!(err.message, "Task list was not found. We cannot list tasks.");
}

#[test]
fn counting_with_unknown_reference_returns_the_verbatim_count_message() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();

    let err = api.count_tasks(Some(owner()), Some("list-not-found")).unwrap_err();
    assert_eq!(err.status, STATUS_NOT_FOUND);
    assert_eq!(err.message, "List was not found. We cannot count tasks.");

    // An existing-looking but absent uuid gets the same answer.
    let err = api
        .count_tasks(Some(owner()), Some(&Uuid::new_v4().to_string()))
        .unwrap_err();
    assert_eq!(err.status, STATUS_NOT_FOUND);
    assert_eq!(err.message, "List was not found. We cannot count tasks.");
}

#[test]
fn count_body_serializes_the_three_fields() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();
    let user = owner();

    api.create_task(
        Some(user),
        &CreateTaskRequest {
            completed: true,
            ..create_request("done already")
        },
    )
    .unwrap();
    api.create_task(Some(user), &create_request("still open")).unwrap();

    let counts = api.count_tasks(Some(user), None).unwrap();
    assert_eq!(counts.status, STATUS_OK);

    let body = serde_json::to_value(counts.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"total": 2, "completed": 1, "uncompleted": 1})
    );
}

#[test]
fn error_bodies_serialize_message_and_optional_field() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();

    let not_found = api.list_tasks(Some(owner()), Some("nope")).unwrap_err();
    let body = serde_json::to_value(&not_found).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"message": "Task list was not found. We cannot list tasks."})
    );

    let invalid = api.create_task(Some(owner()), &create_request("  ")).unwrap_err();
    assert_eq!(invalid.status, STATUS_BAD_REQUEST);
    let body = serde_json::to_value(&invalid).unwrap();
    assert_eq!(body["field"], serde_json::json!("title"));
}

#[test]
fn update_and_delete_map_to_200_and_204() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();
    let user = owner();

    let created = api.create_task(Some(user), &create_request("tidy desk")).unwrap();
    let uuid = created.body.task_uuid.to_string();

    let patched = api
        .update_task(
            Some(user),
            &uuid,
            &UpdateTaskRequest {
                completed: Some(true),
                ..UpdateTaskRequest::default()
            },
            true,
        )
        .unwrap();
    assert_eq!(patched.status, STATUS_OK);
    assert!(patched.body.completed);

    let deleted = api.delete_task(Some(user), &uuid).unwrap();
    assert_eq!(deleted.status, STATUS_NO_CONTENT);

    let missing = api.task_detail(Some(user), &uuid).unwrap_err();
    assert_eq!(missing.status, STATUS_NOT_FOUND);
    assert_eq!(missing.message, "Task was not found.");
}

#[test]
fn full_update_without_required_fields_is_a_field_error() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();
    let user = owner();

    let created = api.create_task(Some(user), &create_request("needs both")).unwrap();
    let uuid = created.body.task_uuid.to_string();

    let err = api
        .update_task(
            Some(user),
            &uuid,
            &UpdateTaskRequest {
                title: Some("only title".to_string()),
                ..UpdateTaskRequest::default()
            },
            false,
        )
        .unwrap_err();
    assert_eq!(err.status, STATUS_BAD_REQUEST);
    assert_eq!(err.field, Some("completed"));
}

#[test]
fn cross_owner_task_operations_return_404() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();
    let user_a = owner();
    let user_b = owner();

    let task_b = api.create_task(Some(user_b), &create_request("b secret")).unwrap();
    let uuid = task_b.body.task_uuid.to_string();

    let err = api.delete_task(Some(user_a), &uuid).unwrap_err();
    assert_eq!(err.status, STATUS_NOT_FOUND);

    // B still sees the task.
    let detail = api.task_detail(Some(user_b), &uuid).unwrap();
    assert_eq!(detail.body.title, "b secret");
}

#[test]
fn malformed_task_uuid_reads_as_missing_task() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();

    let err = api.task_detail(Some(owner()), "not-a-uuid").unwrap_err();
    assert_eq!(err.status, STATUS_NOT_FOUND);
    assert_eq!(err.message, "Task was not found.");
}

#[test]
fn list_endpoints_cover_create_detail_rename_and_inbox() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();
    let user = owner();

    let created = api
        .create_list(Some(user), &ListNameRequest { name: "shopping".to_string() })
        .unwrap();
    assert_eq!(created.status, STATUS_CREATED);

    let uuid = created.body.list_uuid.to_string();
    let detail = api.list_detail(Some(user), &uuid).unwrap();
    assert_eq!(detail.body.name, "shopping");

    let renamed = api
        .rename_list(Some(user), &uuid, &ListNameRequest { name: "groceries".to_string() })
        .unwrap();
    assert_eq!(renamed.body.name, "groceries");

    // Referencing the inbox by keyword creates it on the fly.
    let inbox = api.list_detail(Some(user), "inbox").unwrap();
    assert_eq!(inbox.status, STATUS_OK);
    assert_eq!(inbox.body.name, "inbox");

    let all = api.list_lists(Some(user)).unwrap();
    assert_eq!(all.body.len(), 2);

    let missing = api.list_detail(Some(user), &Uuid::new_v4().to_string()).unwrap_err();
    assert_eq!(missing.status, STATUS_NOT_FOUND);
    assert_eq!(missing.message, "List Not found.");
}

#[test]
fn deleting_the_inbox_through_the_surface_is_a_bad_request() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();
    let user = owner();

    api.list_detail(Some(user), "inbox").unwrap();
    let err = api.delete_list(Some(user), "inbox").unwrap_err();
    assert_eq!(err.status, STATUS_BAD_REQUEST);

    let kept = api.list_lists(Some(user)).unwrap();
    assert_eq!(kept.body.len(), 1);
}

#[test]
fn filtering_tasks_by_list_through_the_surface() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();
    let user = owner();

    let shopping = api
        .create_list(Some(user), &ListNameRequest { name: "shopping".to_string() })
        .unwrap();
    let shopping_uuid = shopping.body.list_uuid.to_string();

    api.create_task(
        Some(user),
        &CreateTaskRequest {
            task_list: Some(shopping_uuid.clone()),
            ..create_request("bread")
        },
    )
    .unwrap();
    api.create_task(Some(user), &create_request("loose")).unwrap();

    let filtered = api.list_tasks(Some(user), Some(&shopping_uuid)).unwrap();
    assert_eq!(filtered.body.len(), 1);
    assert_eq!(filtered.body[0].title, "bread");

    // The uppercase spelling of the same uuid resolves identically.
    let upper = shopping_uuid.to_uppercase();
    let filtered_upper = api.list_tasks(Some(user), Some(&upper)).unwrap();
    assert_eq!(filtered_upper.body, filtered.body);
}

#[test]
fn upcoming_endpoint_orders_by_due_date() {
    let conn = open_db_in_memory().unwrap();
    let api = Api::try_new(&conn).unwrap();
    let user = owner();

    for (title, due) in [("later", Some(2_000i64)), ("sooner", Some(1_000)), ("never", None)] {
        api.create_task(
            Some(user),
            &CreateTaskRequest {
                due_date: due,
                ..create_request(title)
            },
        )
        .unwrap();
    }

    let upcoming = api.upcoming_tasks(Some(user)).unwrap();
    let titles: Vec<_> = upcoming.body.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["sooner", "later"]);
}
