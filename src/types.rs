//! Core types shared by the store, the HTTP layer and the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Server-assigned task identifier.
pub type TaskId = i64;

/// Priority labels understood by the client.
pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";

/// Priority stored when a create request leaves it out.
pub const PRIORITY_DEFAULT: &str = PRIORITY_MEDIUM;

/// Returns true for the three labels the client knows how to style.
///
/// Storage does not enforce this; unknown labels are kept as given.
pub fn is_known_priority(priority: &str) -> bool {
    matches!(priority, PRIORITY_LOW | PRIORITY_MEDIUM | PRIORITY_HIGH)
}

/// A single todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub priority: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Description to persist: missing becomes the empty string.
    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Priority to persist: missing or empty becomes [`PRIORITY_DEFAULT`].
    pub fn priority_or_default(&self) -> &str {
        match self.priority.as_deref() {
            Some(p) if !p.is_empty() => p,
            _ => PRIORITY_DEFAULT,
        }
    }
}

/// Partial update for a task.
///
/// A field that is `None` keeps its stored value. On the wire an omitted
/// field and an explicit `null` both deserialize to `None`, so neither
/// changes anything; send `""` to clear the description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
}

impl TaskPatch {
    /// Patch that only flips the completion flag.
    pub fn completed(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
    }

    /// Apply the coalescing rules to an in-memory task.
    ///
    /// Timestamps are left to the caller.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(priority) = &self.priority {
            task.priority = priority.clone();
        }
    }
}

/// Display-only filter over the client's task cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    /// Whether a task is shown under this filter.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Filter::All),
            "active" => Ok(Filter::Active),
            "completed" | "done" => Ok(Filter::Completed),
            other => Err(format!(
                "unknown filter '{}', expected all, active or completed",
                other
            )),
        }
    }
}

/// Current time truncated to millisecond precision, matching storage.
pub fn now() -> DateTime<Utc> {
    from_millis(Utc::now().timestamp_millis()).unwrap_or_else(Utc::now)
}

/// Convert epoch milliseconds to a UTC timestamp.
pub fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
}

/// Next `updated_at` for a mutation: now, but never at or before `previous`.
pub fn advance_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + chrono::Duration::milliseconds(1);
    if now > floor { now } else { floor }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task(completed: bool) -> Task {
        let ts = now();
        Task {
            id: 1,
            title: "Buy milk".to_string(),
            description: String::new(),
            completed,
            priority: PRIORITY_LOW.to_string(),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn new_task_defaults() {
        let input = NewTask::new("Buy milk");
        assert_eq!(input.description_or_default(), "");
        assert_eq!(input.priority_or_default(), "medium");

        let input = NewTask::new("Buy milk").with_priority("");
        assert_eq!(input.priority_or_default(), "medium");

        let input = NewTask::new("Buy milk").with_priority("urgent");
        assert_eq!(input.priority_or_default(), "urgent");
    }

    #[test]
    fn patch_null_and_missing_are_the_same() {
        let missing: TaskPatch = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        let nulls: TaskPatch =
            serde_json::from_str(r#"{"completed": true, "title": null, "priority": null}"#)
                .unwrap();
        assert_eq!(missing, nulls);
        assert_eq!(missing, TaskPatch::completed(true));
        assert!(!missing.is_empty());
        assert!(TaskPatch::default().is_empty());
    }

    #[test]
    fn patch_apply_keeps_unset_fields() {
        let mut task = sample_task(false);
        let before = task.clone();
        TaskPatch::completed(true).apply_to(&mut task);

        assert!(task.completed);
        assert_eq!(task.title, before.title);
        assert_eq!(task.description, before.description);
        assert_eq!(task.priority, before.priority);
    }

    #[test]
    fn filter_matches_completion_flag() {
        let open = sample_task(false);
        let done = sample_task(true);

        assert!(Filter::All.matches(&open) && Filter::All.matches(&done));
        assert!(Filter::Active.matches(&open) && !Filter::Active.matches(&done));
        assert!(!Filter::Completed.matches(&open) && Filter::Completed.matches(&done));
    }

    #[test]
    fn filter_parses_and_displays() {
        for filter in Filter::ALL {
            assert_eq!(filter.to_string().parse::<Filter>(), Ok(filter));
        }
        assert_eq!(" Active ".parse::<Filter>(), Ok(Filter::Active));
        assert!("archived".parse::<Filter>().is_err());
    }

    #[test]
    fn advance_timestamp_is_strictly_increasing() {
        let ts = now();
        assert!(advance_timestamp(ts, ts) > ts);
        assert!(advance_timestamp(ts, ts - chrono::Duration::seconds(5)) > ts);

        let later = ts + chrono::Duration::seconds(5);
        assert_eq!(advance_timestamp(ts, later), later);
    }

    #[test]
    fn task_serializes_with_iso_timestamps() {
        let task = sample_task(false);
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["priority"], "low");
        let created = json["created_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(created).is_ok());
    }

    #[test]
    fn known_priorities() {
        assert!(is_known_priority("low"));
        assert!(is_known_priority("high"));
        assert!(!is_known_priority("urgent"));
    }
}
