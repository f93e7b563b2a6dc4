use todos_core::{
    ListId, SessionData, SessionTodoStore, StoreError, TodoItem, TodoList, TodoStore,
};

fn empty_session() -> SessionData {
    SessionData::with_lists(Vec::new())
}

fn list_id(store: &SessionTodoStore<'_>, title: &str) -> ListId {
    store
        .list_all()
        .unwrap()
        .into_iter()
        .find(|list| list.title == title)
        .unwrap_or_else(|| panic!("list {title} missing"))
        .id
}

#[test]
fn seeded_session_lists_come_back_sorted() {
    let mut session = SessionData::new();
    let store = SessionTodoStore::new(&mut session).unwrap();

    let lists = store.list_all().unwrap();
    let titles: Vec<&str> = lists.iter().map(|list| list.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Additional Todos", "social todos", "Work Todos", "Home Todos"]
    );

    let work = &lists[2];
    let work_items: Vec<&str> = work.items.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(
        work_items,
        vec!["Duck out of meeting", "Chat with co-workers", "Get coffee"]
    );
}

#[test]
fn existing_lists_are_reused_instead_of_reseeded() {
    let mut session = SessionData::with_lists(vec![TodoList::new(1, "Only")]);
    let store = SessionTodoStore::new(&mut session).unwrap();
    assert_eq!(store.list_all().unwrap().len(), 1);

    let mut emptied = empty_session();
    let store = SessionTodoStore::new(&mut emptied).unwrap();
    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn duplicate_title_returns_false_ignoring_case() {
    let mut session = empty_session();
    let mut store = SessionTodoStore::new(&mut session).unwrap();

    assert!(store.list_add("X").unwrap());
    assert!(!store.list_add("X").unwrap());
    assert!(!store.list_add("x").unwrap());
    assert_eq!(store.list_all().unwrap().len(), 1);
    assert!(store.list_title_exists("X").unwrap());
    assert!(!store.list_title_exists("x").unwrap());
}

#[test]
fn reads_return_copies_that_do_not_alias_session_state() {
    let mut session = empty_session();
    let mut store = SessionTodoStore::new(&mut session).unwrap();
    store.list_add("Home").unwrap();
    let home = list_id(&store, "Home");
    store.item_add(home, "Dishes").unwrap();

    let mut loaded = store.list_load(home).unwrap().unwrap();
    loaded.title = "Changed".to_string();
    loaded.items[0].done = true;
    let mut item = store.item_load(home, loaded.items[0].id).unwrap().unwrap();
    item.title = "Changed too".to_string();

    let fresh = store.list_load(home).unwrap().unwrap();
    assert_eq!(fresh.title, "Home");
    assert_eq!(fresh.items[0].title, "Dishes");
    assert!(!fresh.items[0].done);
}

#[test]
fn toggle_delete_and_missing_targets() {
    let mut session = empty_session();
    let mut store = SessionTodoStore::new(&mut session).unwrap();
    store.list_add("Home").unwrap();
    let home = list_id(&store, "Home");
    store.item_add(home, "Dishes").unwrap();
    let item_id = store.list_load(home).unwrap().unwrap().items[0].id;

    assert!(store.item_toggle(home, item_id).unwrap());
    assert!(store.item_load(home, item_id).unwrap().unwrap().done);
    assert!(store.item_toggle(home, item_id).unwrap());
    assert!(!store.item_load(home, item_id).unwrap().unwrap().done);

    assert!(!store.item_toggle(home + 100, item_id).unwrap());
    assert!(store.item_load(home + 100, item_id).unwrap().is_none());

    assert!(store.item_delete(home, item_id).unwrap());
    assert!(!store.item_delete(home, item_id).unwrap());
    assert!(!store.item_delete(home + 100, item_id).unwrap());
}

#[test]
fn items_mark_all_done_on_empty_or_missing_list_is_false() {
    let mut session = empty_session();
    let mut store = SessionTodoStore::new(&mut session).unwrap();
    store.list_add("Empty").unwrap();
    store.list_add("Home").unwrap();
    let empty = list_id(&store, "Empty");
    let home = list_id(&store, "Home");
    store.item_add(home, "Dishes").unwrap();
    store.item_add(home, "Laundry").unwrap();

    assert!(!store.items_mark_all_done(empty).unwrap());
    assert!(!store.items_mark_all_done(999).unwrap());
    assert!(store.items_mark_all_done(home).unwrap());
    assert!(store.list_load(home).unwrap().unwrap().is_done());
}

#[test]
fn list_destroy_removes_list_and_items() {
    let mut session = empty_session();
    let mut store = SessionTodoStore::new(&mut session).unwrap();
    store.list_add("Home").unwrap();
    let home = list_id(&store, "Home");
    store.item_add(home, "Dishes").unwrap();
    let item_id = store.list_load(home).unwrap().unwrap().items[0].id;

    assert!(store.list_destroy(home).unwrap());
    assert!(store.list_load(home).unwrap().is_none());
    assert!(store.item_load(home, item_id).unwrap().is_none());
    assert!(!store.list_destroy(home).unwrap());
}

#[test]
fn list_set_title_enforces_uniqueness_against_other_lists_only() {
    let mut session = empty_session();
    let mut store = SessionTodoStore::new(&mut session).unwrap();
    store.list_add("Home").unwrap();
    store.list_add("Work").unwrap();
    let home = list_id(&store, "Home");
    let work = list_id(&store, "Work");

    assert!(store.list_set_title(home, "HOME").unwrap());
    let err = store.list_set_title(work, "home").unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation { .. }));
    assert_eq!(store.list_load(work).unwrap().unwrap().title, "Work");
    assert!(!store.list_set_title(999, "Nowhere").unwrap());
}

#[test]
fn item_add_generates_fresh_ids() {
    let mut session = SessionData::with_lists(vec![TodoList {
        id: 5,
        title: "Home".to_string(),
        items: vec![TodoItem::new(7, "Dishes")],
    }]);
    let mut store = SessionTodoStore::new(&mut session).unwrap();

    assert!(store.item_add(5, "Laundry").unwrap());
    assert!(store.item_add(5, "Vacuum").unwrap());
    assert!(!store.item_add(6, "Nowhere").unwrap());

    let ids: Vec<i64> = store
        .list_load(5)
        .unwrap()
        .unwrap()
        .items
        .iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec![7, 8, 9]);
}

#[test]
fn verify_credentials_is_always_false() {
    let mut session = SessionData::new();
    let store = SessionTodoStore::new(&mut session).unwrap();
    assert!(!store.verify_credentials("admin", "secret").unwrap());
}

#[test]
fn mutations_persist_in_the_session_between_store_instances() {
    let mut session = empty_session();
    {
        let mut store = SessionTodoStore::new(&mut session).unwrap();
        store.list_add("Home").unwrap();
    }
    {
        let mut store = SessionTodoStore::new(&mut session).unwrap();
        let home = list_id(&store, "Home");
        store.item_add(home, "Dishes").unwrap();
    }

    let store = SessionTodoStore::new(&mut session).unwrap();
    let lists = store.list_all().unwrap();
    assert_eq!(lists[0].items[0].title, "Dishes");
}
