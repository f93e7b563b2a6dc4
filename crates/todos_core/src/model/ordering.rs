//! Done/undone partitioning and case-insensitive title ordering.
//!
//! Both store backends route their reads through these helpers so that the
//! same data always comes back in the same order.
//!
//! # Invariants
//! - Partitioning keeps relative order inside each group.
//! - Title sorting is stable and compares lowercase titles.

use super::todo::{title_key, TodoItem, TodoList};
use std::cmp::Ordering;

/// Anything ordered by its title.
pub trait Titled {
    fn title(&self) -> &str;
}

impl Titled for TodoItem {
    fn title(&self) -> &str {
        &self.title
    }
}

impl Titled for TodoList {
    fn title(&self) -> &str {
        &self.title
    }
}

/// Returns whether `list` is non-empty and every item is done.
pub fn is_done_list(list: &TodoList) -> bool {
    list.is_done()
}

/// Moves done lists behind not-done lists, keeping relative order.
pub fn partition_lists(lists: Vec<TodoList>) -> Vec<TodoList> {
    let (mut undone, done): (Vec<_>, Vec<_>) =
        lists.into_iter().partition(|list| !is_done_list(list));
    undone.extend(done);
    undone
}

/// Stable sort by lowercase title.
pub fn sort_by_title<T: Titled>(values: &mut [T]) {
    values.sort_by(|left, right| compare_titles(left.title(), right.title()));
}

/// Lists ordered not-done first, then done, each group by title.
pub fn sorted_lists(lists: Vec<TodoList>) -> Vec<TodoList> {
    let (mut undone, mut done): (Vec<_>, Vec<_>) =
        lists.into_iter().partition(|list| !is_done_list(list));
    sort_by_title(&mut undone);
    sort_by_title(&mut done);
    undone.extend(done);
    undone
}

/// Items ordered not-done first, then done, each group by title.
pub fn sorted_items(items: Vec<TodoItem>) -> Vec<TodoItem> {
    let (mut undone, mut done): (Vec<_>, Vec<_>) = items.into_iter().partition(|item| !item.done);
    sort_by_title(&mut undone);
    sort_by_title(&mut done);
    undone.extend(done);
    undone
}

/// Sorts lists and the items inside each of them.
pub fn sorted_lists_with_items(lists: Vec<TodoList>) -> Vec<TodoList> {
    sorted_lists(
        lists
            .into_iter()
            .map(|mut list| {
                list.items = sorted_items(std::mem::take(&mut list.items));
                list
            })
            .collect(),
    )
}

fn compare_titles(left: &str, right: &str) -> Ordering {
    title_key(left).cmp(&title_key(right))
}
