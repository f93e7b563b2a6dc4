//! Fixture dataset for freshly created sessions.

use super::{StoreError, StoreResult};
use crate::model::todo::TodoList;

const SEED_DATA_JSON: &str = include_str!("seed_data.json");

/// Parses the bundled seed lists.
pub fn seed_todo_lists() -> StoreResult<Vec<TodoList>> {
    serde_json::from_str(SEED_DATA_JSON)
        .map_err(|err| StoreError::InvalidData(format!("seed data: {err}")))
}

/// Largest list or item id used by `lists`, or 0 when empty.
pub fn max_id(lists: &[TodoList]) -> i64 {
    lists
        .iter()
        .flat_map(|list| std::iter::once(list.id).chain(list.items.iter().map(|item| item.id)))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{max_id, seed_todo_lists};
    use std::collections::HashSet;

    #[test]
    fn seed_data_parses_with_unique_titles_and_ids() {
        let lists = seed_todo_lists().unwrap();
        assert_eq!(lists.len(), 4);

        let titles: HashSet<String> = lists.iter().map(|list| list.title.to_lowercase()).collect();
        assert_eq!(titles.len(), lists.len());

        let item_ids: Vec<i64> = lists
            .iter()
            .flat_map(|list| list.items.iter().map(|item| item.id))
            .collect();
        let unique: HashSet<i64> = item_ids.iter().copied().collect();
        assert_eq!(unique.len(), item_ids.len());
        assert_eq!(max_id(&lists), 8);
    }

    #[test]
    fn max_id_of_nothing_is_zero() {
        assert_eq!(max_id(&[]), 0);
    }
}
