//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `pressdesk_core` linkage, configuration and schema bootstrap.
//! - Print deterministic `key=value` lines for quick local sanity checks.
//!
//! Reads the YAML file named by `PRESSDESK_CONFIG`; without it, checks a
//! private in-memory database.

use log::info;
use pressdesk_core::db::open_db_with_config;
use pressdesk_core::{
    init_logging_from_config, load_config, AppConfig, BlogListFilter, BlogService,
    CategoryService, DatabaseConfig, LoggingConfig, SqliteBlogRepository,
    SqliteCategoryRepository, SqliteTodoRepository, TodoService,
};
use std::error::Error;
use std::process::ExitCode;

const CONFIG_ENV: &str = "PRESSDESK_CONFIG";

fn main() -> ExitCode {
    println!("pressdesk_core ping={}", pressdesk_core::ping());
    println!("pressdesk_core version={}", pressdesk_core::core_version());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pressdesk_cli status=error error={err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_config(path)?,
        None => AppConfig {
            database: DatabaseConfig::in_memory(),
            logging: LoggingConfig::default(),
        },
    };

    let file_logging = init_logging_from_config(&config.logging)?;
    let conn = open_db_with_config(&config.database)?;

    let todos = TodoService::new(SqliteTodoRepository::try_new(&conn)?);
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn)?);
    let blogs = BlogService::new(
        SqliteBlogRepository::try_new(&conn)?,
        SqliteCategoryRepository::try_new(&conn)?,
    );

    let todo_count = todos.list_todos()?.len();
    let category_count = categories.list_categories()?.len();
    let blog_count = blogs.list_blogs(&BlogListFilter::All)?.len();
    let published_count = blogs.list_blogs(&BlogListFilter::Published)?.len();

    println!(
        "pressdesk_db in_memory={} file_logging={}",
        config.database.is_in_memory(),
        file_logging
    );
    println!(
        "pressdesk_counts todos={todo_count} categories={category_count} blogs={blog_count} published={published_count}"
    );
    info!(
        "event=cli_check module=cli status=ok todos={} categories={} blogs={} published={}",
        todo_count, category_count, blog_count, published_count
    );
    Ok(())
}
