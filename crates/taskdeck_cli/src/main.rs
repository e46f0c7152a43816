//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `taskdeck_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::{Api, CreateTaskRequest};
use uuid::Uuid;

fn main() {
    println!("taskdeck_core ping={}", taskdeck_core::ping());
    println!("taskdeck_core version={}", taskdeck_core::core_version());

    // End-to-end probe against a throwaway in-memory store: create a task
    // with no list and confirm it lands in the lazily-created inbox.
    let conn = match open_db_in_memory() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("taskdeck_core probe failed to open store: {err}");
            std::process::exit(1);
        }
    };

    let api = match Api::try_new(&conn) {
        Ok(api) => api,
        Err(err) => {
            eprintln!("taskdeck_core probe failed to build api: {err}");
            std::process::exit(1);
        }
    };

    let owner = Uuid::new_v4();
    let request = CreateTaskRequest {
        title: "probe task".to_string(),
        completed: false,
        due_date: None,
        task_list: None,
    };

    match api.create_task(Some(owner), &request) {
        Ok(created) => {
            let inboxed = created.body.task_list.is_some();
            println!("taskdeck_core probe created={} inboxed={inboxed}", created.status);
        }
        Err(err) => {
            eprintln!("taskdeck_core probe create failed: {}", err.message);
            std::process::exit(1);
        }
    }
}
