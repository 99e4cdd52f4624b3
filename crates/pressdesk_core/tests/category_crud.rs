use pressdesk_core::db::open_db_in_memory;
use pressdesk_core::{
    BlogRepository, CategoryRepository, CategoryService, CreateBlogRequest,
    CreateCategoryRequest, EntityKind, Patch, RepoError, SqliteBlogRepository,
    SqliteCategoryRepository, UpdateCategoryRequest,
};

#[test]
fn create_and_get_category() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();

    let created = repo
        .create_category(&CreateCategoryRequest::new("Tech").with_description("gadgets"))
        .unwrap();

    let loaded = repo.get_category(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.name, "Tech");
    assert_eq!(loaded.description.as_deref(), Some("gadgets"));
}

#[test]
fn list_orders_by_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();
    for name in ["Travel", "Food", "Music"] {
        repo.create_category(&CreateCategoryRequest::new(name)).unwrap();
    }

    let names: Vec<_> = repo
        .list_categories()
        .unwrap()
        .into_iter()
        .map(|category| category.name)
        .collect();
    assert_eq!(names, vec!["Food", "Music", "Travel"]);
}

#[test]
fn duplicate_name_is_reported_on_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();
    repo.create_category(&CreateCategoryRequest::new("Tech")).unwrap();
    let other = repo.create_category(&CreateCategoryRequest::new("Life")).unwrap();

    let err = repo
        .create_category(&CreateCategoryRequest::new("Tech"))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Duplicate {
            entity: EntityKind::Category,
            field: "name"
        }
    ));

    let err = repo
        .update_category(
            other.id,
            &UpdateCategoryRequest {
                name: Patch::Set("Tech".to_string()),
                ..UpdateCategoryRequest::default()
            },
        )
        .unwrap_err();
    assert_eq!(err.code(), "duplicate");
    assert_eq!(repo.list_categories().unwrap().len(), 2);
}

#[test]
fn update_can_clear_or_keep_description() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();
    let created = repo
        .create_category(&CreateCategoryRequest::new("Tech").with_description("gadgets"))
        .unwrap();

    let renamed = repo
        .update_category(
            created.id,
            &UpdateCategoryRequest {
                name: Patch::Set("Technology".to_string()),
                ..UpdateCategoryRequest::default()
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Technology");
    assert_eq!(renamed.description.as_deref(), Some("gadgets"));
    assert_eq!(renamed.created_at, created.created_at);

    let cleared = repo
        .update_category(
            created.id,
            &UpdateCategoryRequest {
                description: Patch::Set(None),
                ..UpdateCategoryRequest::default()
            },
        )
        .unwrap();
    assert_eq!(cleared.name, "Technology");
    assert_eq!(cleared.description, None);
}

#[test]
fn update_missing_category_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::try_new(&conn).unwrap();

    let err = repo
        .update_category(
            9,
            &UpdateCategoryRequest {
                name: Patch::Set("Ghost".to_string()),
                ..UpdateCategoryRequest::default()
            },
        )
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn service_rejects_short_name() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());

    let err = service
        .create_category(&CreateCategoryRequest::new("X"))
        .unwrap_err();
    match err {
        RepoError::Validation(errors) => {
            assert!(errors.has_field("name"));
            assert_eq!(
                errors.errors()[0].message,
                "name must be at least 2 characters"
            );
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.list_categories().unwrap().is_empty());
}

#[test]
fn delete_is_blocked_while_blogs_reference_category() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let blogs = SqliteBlogRepository::try_new(&conn).unwrap();

    let category = service
        .create_category(&CreateCategoryRequest::new("Tech"))
        .unwrap();
    let blog = blogs
        .create_blog(
            &CreateBlogRequest::new("Go Basics", "Learn the Go language", "Al")
                .in_category(category.id),
        )
        .unwrap();

    let err = service.delete_category(category.id).unwrap_err();
    match err {
        RepoError::ConflictInUse {
            category_id,
            blog_count,
        } => {
            assert_eq!(category_id, category.id);
            assert_eq!(blog_count, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.get_category(category.id).unwrap().is_some());

    blogs.delete_blog(blog.id).unwrap();
    service.delete_category(category.id).unwrap();
    assert!(service.get_category(category.id).unwrap().is_none());
}

#[test]
fn delete_missing_category_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());

    let err = service.delete_category(404).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: EntityKind::Category,
            id: 404
        }
    ));
}

#[test]
fn detail_reports_blog_count() {
    let conn = open_db_in_memory().unwrap();
    let service = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());
    let blogs = SqliteBlogRepository::try_new(&conn).unwrap();

    let tech = service
        .create_category(&CreateCategoryRequest::new("Tech"))
        .unwrap();
    let empty = service
        .create_category(&CreateCategoryRequest::new("Empty"))
        .unwrap();
    for title in ["Go Basics", "Rust Basics"] {
        blogs
            .create_blog(
                &CreateBlogRequest::new(title, "Some long enough content", "Al")
                    .in_category(tech.id),
            )
            .unwrap();
    }

    let detail = service.get_category_detail(tech.id).unwrap().unwrap();
    assert_eq!(detail.category, tech);
    assert_eq!(detail.blog_count, 2);

    let detail = service.get_category_detail(empty.id).unwrap().unwrap();
    assert_eq!(detail.blog_count, 0);

    assert!(service.get_category_detail(999).unwrap().is_none());
}
