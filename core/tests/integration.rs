//! Full CRUD lifecycle test against the live server.
//!
//! # Design
//! Starts the server on a random port over an in-memory SQLite database,
//! then exercises every client operation over real HTTP using ureq.

use todo_core::{ApiError, CreateTodo, HttpMethod, HttpResponse, TodoClient, UpdateTodo};
use todo_server::DatabaseSettings;

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: todo_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            agent.put(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

/// Serve the app on a background thread and return a client pointed at it.
fn start_server() -> TodoClient {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let settings = DatabaseSettings {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            };
            let db = todo_server::db::connect(&settings).await.unwrap();
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            todo_server::run(listener, db).await
        })
        .unwrap();
    });

    TodoClient::new(&format!("http://{addr}"))
}

#[test]
fn crud_lifecycle() {
    let client = start_server();

    // Step 1: list: should be empty.
    let todos = client.parse_list_todos(execute(client.build_list_todos(None))).unwrap();
    assert!(todos.is_empty(), "expected empty list");

    // Step 2: create a todo.
    let create_input = CreateTodo {
        title: "Buy milk".to_string(),
        description: Some("two litres".to_string()),
        completed: false,
    };
    let req = client.build_create_todo(&create_input).unwrap();
    let created = client.parse_create_todo(execute(req)).unwrap();
    assert_eq!(created.title, "Buy milk");
    assert!(!created.completed);
    assert_eq!(created.created_at, created.updated_at);
    let id = created.id;

    // Step 3: get the created todo.
    let fetched = client.parse_get_todo(execute(client.build_get_todo(id))).unwrap();
    assert_eq!(fetched, created);

    // Step 4: mark completed by id.
    let update_input = UpdateTodo {
        completed: Some(true),
        ..Default::default()
    };
    let req = client.build_update_todo(id, &update_input).unwrap();
    let updated = client.parse_update_todo(execute(req)).unwrap();
    assert_eq!(updated.title, "Buy milk");
    assert!(updated.completed);
    assert!(updated.updated_at >= created.updated_at);

    // Step 5: rename by title.
    let update_input = UpdateTodo {
        title: Some("Buy milk & eggs".to_string()),
        ..Default::default()
    };
    let req = client.build_update_todo_by_title("Buy milk", &update_input).unwrap();
    let renamed = client.parse_update_todo(execute(req)).unwrap();
    assert_eq!(renamed.id, id);
    assert_eq!(renamed.title, "Buy milk & eggs");
    assert_eq!(renamed.description.as_deref(), Some("two litres"));

    // Step 6: the filtered lists partition the full list.
    let done = client.parse_list_todos(execute(client.build_list_todos(Some(true)))).unwrap();
    let open = client.parse_list_todos(execute(client.build_list_todos(Some(false)))).unwrap();
    assert_eq!(done.len(), 1);
    assert!(open.is_empty());

    // Step 7: invalid input surfaces as Validation.
    let bad = CreateTodo {
        title: "x".repeat(101),
        description: None,
        completed: false,
    };
    let req = client.build_create_todo(&bad).unwrap();
    let err = client.parse_create_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    // Step 8: delete.
    let deleted = client.parse_delete_todo(execute(client.build_delete_todo(id))).unwrap();
    assert!(deleted.message.contains(&id.to_string()));
    assert!(deleted.todos.is_empty());

    // Step 9: get after delete: should be NotFound.
    let err = client.parse_get_todo(execute(client.build_get_todo(id))).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // Step 10: delete again: should be NotFound.
    let err = client.parse_delete_todo(execute(client.build_delete_todo(id))).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    // Step 11: update by an unknown title: should be NotFound.
    let req = client.build_update_todo_by_title("nothing here", &UpdateTodo::default()).unwrap();
    let err = client.parse_update_todo(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
