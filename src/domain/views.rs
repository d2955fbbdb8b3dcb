use super::enums::{SortKey, StatusFilter};
use super::task::Task;
use uuid::Uuid;

/// Derive the displayed task list from search text, status filter and sort key.
///
/// The view is rebuilt from scratch on every call. Sorting is stable, so tasks
/// with equal keys keep their input order.
pub fn derive_view(tasks: &[Task], search: &str, filter: StatusFilter, sort: SortKey) -> Vec<Task> {
    let mut view: Vec<Task> = tasks
        .iter()
        .filter(|task| task.matches_search(search))
        .filter(|task| filter.accepts(task.completed))
        .cloned()
        .collect();

    match sort {
        SortKey::Deadline => view.sort_by_key(|task| task.deadline_millis()),
        SortKey::Priority => view.sort_by_key(|task| task.priority.sort_rank()),
        SortKey::Category => view.sort_by(|a, b| a.category_label().cmp(b.category_label())),
    }

    view
}

/// Tasks whose id (hyphenated or simple form) starts with `prefix`
pub fn find_by_prefix<'a>(tasks: &'a [Task], prefix: &str) -> Vec<&'a Task> {
    let needle = prefix.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    tasks
        .iter()
        .filter(|task| {
            task.id.hyphenated().to_string().starts_with(&needle)
                || task.id.simple().to_string().starts_with(&needle)
        })
        .collect()
}

/// Full task list plus the inputs of the displayed view
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    pub search: String,
    pub filter: StatusFilter,
    pub sort: SortKey,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Default::default()
        }
    }

    /// Replace the held list with a fresh fetch
    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    pub fn view(&self) -> Vec<Task> {
        derive_view(&self.tasks, &self.search, self.filter, self.sort)
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn find(&self, prefix: &str) -> Vec<&Task> {
        find_by_prefix(&self.tasks, prefix)
    }
}
