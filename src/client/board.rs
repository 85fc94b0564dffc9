//! Client-side view state: the task cache and the selected filter.
//!
//! The board only changes in response to confirmed server data; rendering
//! is a pure function of the cache and the filter.

use crate::types::{Filter, Task, TaskId};

/// Markup shown when the initial fetch fails.
pub const LOAD_FAILURE_HTML: &str = "<div class=\"empty-state\"><h3>Failed to load tasks</h3><p>Please try again later</p></div>";

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Cached tasks plus the active filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoBoard {
    tasks: Vec<Task>,
    filter: Filter,
}

impl TodoBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board seeded with a full listing (already newest first).
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            filter: Filter::All,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Replace the cache with a fresh server listing.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// A newly created task goes to the top.
    pub fn insert_created(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    /// Swap in the server's copy of an updated task.
    ///
    /// Returns false when the task is not cached; the cache is unchanged.
    pub fn apply_updated(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// Drop a deleted task. Returns whether it was cached.
    pub fn remove(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Tasks shown under the current filter, in cache order.
    pub fn visible(&self) -> Vec<&Task> {
        self.tasks_matching(self.filter)
    }

    pub fn tasks_matching(&self, filter: Filter) -> Vec<&Task> {
        self.tasks.iter().filter(|t| filter.matches(t)).collect()
    }

    /// (all, active, completed) counts over the whole cache.
    pub fn counts(&self) -> (usize, usize, usize) {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        (self.tasks.len(), self.tasks.len() - completed, completed)
    }

    /// Heading and hint for an empty view.
    pub fn empty_message(&self) -> (&'static str, &'static str) {
        match self.filter {
            Filter::All => ("No tasks yet", "Add your first task to get started!"),
            Filter::Active => ("No active tasks", ""),
            Filter::Completed => ("No completed tasks yet", ""),
        }
    }

    /// List markup for the current view. User text is escaped.
    pub fn render_html(&self) -> String {
        let visible = self.visible();
        if visible.is_empty() {
            let (heading, hint) = self.empty_message();
            return format!(
                "<div class=\"empty-state\"><h3>{}</h3><p>{}</p></div>",
                heading, hint
            );
        }

        visible
            .into_iter()
            .map(render_task_html)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Plain-text rendition for terminals.
    pub fn render_text(&self) -> String {
        let visible = self.visible();
        if visible.is_empty() {
            let (heading, hint) = self.empty_message();
            return if hint.is_empty() {
                heading.to_string()
            } else {
                format!("{}. {}", heading, hint)
            };
        }

        let mut out = String::new();
        for task in visible {
            out.push_str(&format!(
                "[{}] #{} {} ({}) {}\n",
                if task.completed { "x" } else { " " },
                task.id,
                task.title,
                task.priority,
                task.created_at.format("%Y-%m-%d"),
            ));
            if !task.description.is_empty() {
                out.push_str(&format!("      {}\n", task.description));
            }
        }

        let (_, active, completed) = self.counts();
        out.push_str(&format!("{} active, {} completed", active, completed));
        out
    }
}

fn render_task_html(task: &Task) -> String {
    let priority = html_escape(&task.priority);
    let description = if task.description.is_empty() {
        String::new()
    } else {
        format!("<p>{}</p>", html_escape(&task.description))
    };

    format!(
        "<div class=\"todo-item priority-{priority}{completed_class}\" data-id=\"{id}\">\
<input type=\"checkbox\" class=\"todo-checkbox\" data-action=\"toggle\"{checked}>\
<div class=\"todo-content\"><h3>{title}</h3>{description}\
<div class=\"todo-meta\"><span class=\"priority-badge {priority}\">{priority}</span><span>{date}</span></div></div>\
<div class=\"todo-actions\"><button class=\"btn-delete\" data-action=\"delete\">Delete</button></div></div>",
        priority = priority,
        completed_class = if task.completed { " completed" } else { "" },
        id = task.id,
        checked = if task.completed { " checked" } else { "" },
        title = html_escape(&task.title),
        description = description,
        date = task.created_at.format("%Y-%m-%d"),
    )
}
