use rusqlite::{params, Connection};
use tasknest_core::db::open_db_in_memory;
use tasknest_core::model::color::DEFAULT_PALETTE;
use tasknest_core::model::ordering::sort_entities;
use tasknest_core::{
    Category, CategoryRepository, CategoryService, CategoryServiceError, Color, SortDescriptor,
    SqliteCategoryRepository, SqliteTaskRepository, TaskRepository, ValidationError,
};
use uuid::Uuid;

fn category_service(
    conn: &Connection,
) -> CategoryService<SqliteCategoryRepository<'_>, SqliteTaskRepository<'_>> {
    CategoryService::new(
        SqliteCategoryRepository::new(conn),
        SqliteTaskRepository::new(conn),
    )
}

fn set_created_at(conn: &Connection, category: &Category, created_at: i64) {
    conn.execute(
        "UPDATE categories SET created_at = ?1 WHERE uuid = ?2;",
        params![created_at, category.id().to_string()],
    )
    .unwrap();
}

#[test]
fn default_lookup_returns_smallest_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::new(&conn);

    let mut work = Category::new("Work", "45AAF2", "briefcase").unwrap();
    work.set_order(1);
    let mut personal = Category::new("Personal", "FC5C65", "progress").unwrap();
    personal.set_order(0);
    repo.create_category(&work).unwrap();
    repo.create_category(&personal).unwrap();

    let found = repo.default_category().unwrap().unwrap();
    assert_eq!(found.name(), "Personal");
    assert_eq!(found.id(), personal.id());
}

#[test]
fn default_lookup_on_empty_store_is_none() {
    let conn = open_db_in_memory().unwrap();
    let service = category_service(&conn);
    assert!(service.default_category().unwrap().is_none());
}

#[test]
fn default_ordering_is_deterministic_for_tied_orders() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCategoryRepository::new(&conn);

    let mut created = Vec::new();
    for (order, created_at) in [(2, 100), (1, 300), (1, 200)] {
        let mut category = Category::new(format!("c{order}-{created_at}"), "", "").unwrap();
        category.set_order(order);
        repo.create_category(&category).unwrap();
        set_created_at(&conn, &category, created_at);
        created.push(category.id());
    }

    let names = |categories: &[Category]| -> Vec<String> {
        categories.iter().map(|c| c.name().to_string()).collect()
    };
    let first = repo.list_categories(&Default::default()).unwrap();
    let second = repo.list_categories(&Default::default()).unwrap();
    assert_eq!(names(&first), vec!["c1-200", "c1-300", "c2-100"]);
    assert_eq!(names(&first), names(&second));

    // In-memory sorting agrees with the store.
    let mut shuffled = second;
    shuffled.reverse();
    sort_entities(&mut shuffled, &[]);
    assert_eq!(names(&shuffled), names(&first));
}

#[test]
fn descending_created_at_listing_is_supported() {
    let conn = open_db_in_memory().unwrap();
    let service = category_service(&conn);
    let older = service.create_category("older", "", "").unwrap();
    let newer = service.create_category("newer", "", "").unwrap();
    set_created_at(&conn, &older, 10);
    set_created_at(&conn, &newer, 20);

    let listed = service
        .list_categories(&[SortDescriptor::by_created_at(false)])
        .unwrap();
    assert_eq!(listed[0].id(), newer.id());
    assert_eq!(listed[1].id(), older.id());
}

#[test]
fn create_category_appends_after_last_position() {
    let conn = open_db_in_memory().unwrap();
    let service = category_service(&conn);

    let first = service.create_category("Home", "", "house").unwrap();
    let second = service.create_category("Errands", "#26de81", "cart").unwrap();
    assert_eq!((first.order(), second.order()), (0, 1));
    assert_eq!(second.color_encoding(), Some("26DE81"));
    assert_eq!(first.color_value(), DEFAULT_PALETTE[0]);
}

#[test]
fn reorder_rewrites_positions_to_requested_sequence() {
    let conn = open_db_in_memory().unwrap();
    let service = category_service(&conn);
    let a = service.create_category("a", "", "").unwrap();
    let b = service.create_category("b", "", "").unwrap();
    let c = service.create_category("c", "", "").unwrap();

    service.reorder(&[c.id(), a.id(), b.id()]).unwrap();

    let ids: Vec<Uuid> = service
        .list_categories(&[])
        .unwrap()
        .iter()
        .map(|category| category.id())
        .collect();
    assert_eq!(ids, vec![c.id(), a.id(), b.id()]);
    assert_eq!(service.default_category().unwrap().unwrap().id(), c.id());
}

#[test]
fn reorder_with_unknown_id_writes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = category_service(&conn);
    let a = service.create_category("a", "", "").unwrap();
    let missing = Uuid::new_v4();

    let err = service.reorder(&[missing, a.id()]).unwrap_err();
    assert!(matches!(err, CategoryServiceError::CategoryNotFound(id) if id == missing));
    assert_eq!(service.get_category(a.id()).unwrap().unwrap().order(), 0);
}

#[test]
fn edits_are_validated_and_persisted() {
    let conn = open_db_in_memory().unwrap();
    let service = category_service(&conn);
    let category = service.create_category("Inbox", "", "").unwrap();

    let err = service.rename_category(category.id(), "   ").unwrap_err();
    assert!(matches!(
        err,
        CategoryServiceError::Validation(ValidationError::BlankCategoryName)
    ));

    service.rename_category(category.id(), "Later").unwrap();
    service
        .set_category_color(category.id(), Color::rgb(0x4B, 0x7B, 0xEC))
        .unwrap();
    service.set_category_icon(category.id(), "clock").unwrap();
    service.set_order(category.id(), 7).unwrap();

    let stored = service.get_category(category.id()).unwrap().unwrap();
    assert_eq!(stored.name(), "Later");
    assert_eq!(stored.color_encoding(), Some("4B7BEC"));
    assert_eq!(stored.icon_asset_name().as_deref(), Some("category-icon-clock"));
    assert_eq!(stored.order(), 7);
}

#[test]
fn active_tasks_exclude_completed_and_trashed() {
    let conn = open_db_in_memory().unwrap();
    let service = category_service(&conn);
    let tasks = SqliteTaskRepository::new(&conn);
    let category = service.create_category("Home", "", "").unwrap();
    let other = service.create_category("Other", "", "").unwrap();

    let open = tasknest_core::Task::new(&category, "open").unwrap();
    let mut done = tasknest_core::Task::new(&category, "done").unwrap();
    done.set_completed(true);
    let mut binned = tasknest_core::Task::new(&category, "binned").unwrap();
    binned.set_trashed(true);
    let elsewhere = tasknest_core::Task::new(&other, "elsewhere").unwrap();
    for task in [&open, &done, &binned, &elsewhere] {
        tasks.create_task(task).unwrap();
    }

    let active = service.active_tasks(category.id()).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id(), open.id());
}
