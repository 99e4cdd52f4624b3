use pressdesk_core::db::open_db_in_memory;
use pressdesk_core::{
    CreateTodoRequest, EntityKind, Patch, RepoError, SqliteTodoRepository, TodoRepository,
    TodoService, UpdateTodoRequest,
};

#[test]
fn create_sets_defaults_and_equal_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let todo = repo
        .create_todo(&CreateTodoRequest::new("buy milk", ""))
        .unwrap();

    assert!(todo.id > 0);
    assert_eq!(todo.title, "buy milk");
    assert_eq!(todo.description, "");
    assert!(!todo.completed);
    assert_eq!(todo.created_at, todo.updated_at);

    let loaded = repo.get_todo(todo.id).unwrap().unwrap();
    assert_eq!(loaded, todo);
}

#[test]
fn get_missing_todo_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    assert!(repo.get_todo(42).unwrap().is_none());
}

#[test]
fn partial_update_changes_only_provided_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let created = repo
        .create_todo(&CreateTodoRequest::new("write report", "quarterly numbers"))
        .unwrap();

    let updated = repo
        .update_todo(
            created.id,
            &UpdateTodoRequest {
                completed: Patch::Set(true),
                ..UpdateTodoRequest::default()
            },
        )
        .unwrap();

    assert!(updated.completed);
    assert_eq!(updated.title, "write report");
    assert_eq!(updated.description, "quarterly numbers");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);

    let renamed = repo
        .update_todo(
            created.id,
            &UpdateTodoRequest {
                title: Patch::Set("write final report".to_string()),
                description: Patch::Set(String::new()),
                ..UpdateTodoRequest::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.title, "write final report");
    assert_eq!(renamed.description, "");
    assert!(renamed.completed);
}

#[test]
fn update_and_delete_missing_todo_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let err = repo
        .update_todo(7, &UpdateTodoRequest::default())
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Todo,
            id: 7
        }
    ));

    let err = repo.delete_todo(7).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn delete_removes_todo() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let todo = repo.create_todo(&CreateTodoRequest::new("tmp", "")).unwrap();

    repo.delete_todo(todo.id).unwrap();

    assert!(repo.get_todo(todo.id).unwrap().is_none());
    assert!(repo.delete_todo(todo.id).unwrap_err().is_not_found());
}

#[test]
fn list_returns_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    let first = repo.create_todo(&CreateTodoRequest::new("first", "")).unwrap();
    let second = repo.create_todo(&CreateTodoRequest::new("second", "")).unwrap();
    let third = repo.create_todo(&CreateTodoRequest::new("third", "")).unwrap();

    let ids: Vec<_> = repo.list_todos().unwrap().into_iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[test]
fn service_rejects_invalid_title_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());

    let err = service
        .create_todo(&CreateTodoRequest::new("   ", "no title"))
        .unwrap_err();
    match err {
        RepoError::Validation(errors) => assert!(errors.has_field("title")),
        other => panic!("unexpected error: {other}"),
    }

    let err = service
        .create_todo(&CreateTodoRequest::new("x".repeat(256), ""))
        .unwrap_err();
    assert_eq!(err.code(), "validation_failed");

    assert!(service.list_todos().unwrap().is_empty());
}

#[test]
fn service_rejects_blank_title_on_update() {
    let conn = open_db_in_memory().unwrap();
    let service = TodoService::new(SqliteTodoRepository::try_new(&conn).unwrap());
    let todo = service
        .create_todo(&CreateTodoRequest::new("keep me", ""))
        .unwrap();

    let err = service
        .update_todo(
            todo.id,
            &UpdateTodoRequest {
                title: Patch::Set(String::new()),
                ..UpdateTodoRequest::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.code(), "validation_failed");

    let loaded = service.get_todo(todo.id).unwrap().unwrap();
    assert_eq!(loaded.title, "keep me");
}
