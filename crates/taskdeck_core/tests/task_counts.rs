use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{
    ListService, NewTask, ResolvedTarget, SqliteListRepository, SqliteTaskRepository, TaskService,
    TaskServiceError, UserId,
};
use uuid::Uuid;

fn services(
    conn: &rusqlite::Connection,
) -> (
    TaskService<SqliteTaskRepository<'_>, SqliteListRepository<'_>>,
    ListService<SqliteListRepository<'_>>,
) {
    let tasks = TaskService::new(
        SqliteTaskRepository::try_new(conn).unwrap(),
        SqliteListRepository::try_new(conn).unwrap(),
    );
    let lists = ListService::new(SqliteListRepository::try_new(conn).unwrap());
    (tasks, lists)
}

fn owner() -> UserId {
    Uuid::new_v4()
}

fn task(title: &str, completed: bool, due_date: Option<i64>, list: ResolvedTarget) -> NewTask {
    NewTask {
        title: title.to_string(),
        completed,
        due_date,
        list,
    }
}

#[test]
fn counts_over_the_whole_task_set() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, _) = services(&conn);
    let user = owner();

    for completed in [true, true, false] {
        tasks
            .create_task(user, task("chore", completed, None, ResolvedTarget::NoFilter))
            .unwrap();
    }

    let counts = tasks.count_tasks(user, ResolvedTarget::NoFilter).unwrap();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.completed, 2);
    assert_eq!(counts.uncompleted, 1);
    assert_eq!(counts.total, counts.completed + counts.uncompleted);
}

#[test]
fn counts_are_scoped_to_the_requesting_owner() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, _) = services(&conn);
    let user_a = owner();
    let user_b = owner();

    tasks
        .create_task(user_b, task("b only", false, None, ResolvedTarget::NoFilter))
        .unwrap();

    let counts = tasks.count_tasks(user_a, ResolvedTarget::NoFilter).unwrap();
    assert_eq!(counts.total, 0);
    assert_eq!(counts.completed, 0);
    assert_eq!(counts.uncompleted, 0);
}

#[test]
fn counts_by_list_ignore_other_lists() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, lists) = services(&conn);
    let user = owner();

    let shopping = lists.create_list(user, "shopping").unwrap();
    let job = lists.create_list(user, "job").unwrap();

    let in_shopping = ResolvedTarget::ById(shopping.list_uuid);
    let in_job = ResolvedTarget::ById(job.list_uuid);
    tasks.create_task(user, task("a", true, None, in_shopping)).unwrap();
    tasks.create_task(user, task("b", true, None, in_shopping)).unwrap();
    tasks.create_task(user, task("c", false, None, in_shopping)).unwrap();
    tasks.create_task(user, task("d", true, None, in_job)).unwrap();

    let counts = tasks.count_tasks(user, in_shopping).unwrap();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.completed, 2);
    assert_eq!(counts.uncompleted, 1);
}

#[test]
fn upcoming_counts_use_the_due_date_predicate() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, _) = services(&conn);
    let user = owner();

    tasks
        .create_task(user, task("due a", false, Some(1_000), ResolvedTarget::NoFilter))
        .unwrap();
    tasks
        .create_task(user, task("due b", false, Some(2_000), ResolvedTarget::NoFilter))
        .unwrap();
    tasks
        .create_task(user, task("no due", false, None, ResolvedTarget::NoFilter))
        .unwrap();

    let counts = tasks.count_tasks(user, ResolvedTarget::Upcoming).unwrap();
    assert_eq!(counts.total, 2);
    assert_eq!(counts.completed, 0);
    assert_eq!(counts.uncompleted, 2);
}

#[test]
fn counting_inbox_creates_it_lazily_and_counts_only_inbox_tasks() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, lists) = services(&conn);
    let user = owner();

    let shopping = lists.create_list(user, "shopping").unwrap();
    tasks
        .create_task(user, task("listed", true, None, ResolvedTarget::ById(shopping.list_uuid)))
        .unwrap();
    tasks
        .create_task(user, task("loose", false, None, ResolvedTarget::NoFilter))
        .unwrap();

    let counts = tasks.count_tasks(user, ResolvedTarget::Inbox).unwrap();
    assert_eq!(counts.total, 1);
    assert_eq!(counts.uncompleted, 1);
}

#[test]
fn counting_a_missing_list_fails_with_list_not_found() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, _) = services(&conn);

    let err = tasks
        .count_tasks(owner(), ResolvedTarget::ById(Uuid::new_v4()))
        .unwrap_err();
    assert!(matches!(err, TaskServiceError::ListNotFound));
}
