use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::{Priority, Task, generate_id};
use crate::planner::PlannerError;
use crate::week;

/// Sort key for tasks without a time, later than any real `HH:MM`
const NO_TIME_SENTINEL: &str = "99:99";
/// Time assumed for untimed tasks when deciding if they are overdue
const END_OF_DAY: &str = "23:59";

/// Form payload used to create or edit a task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub id: Option<String>, // None when creating
    pub title: String,
    pub date: String,
    pub time: String,
    pub priority: Priority,
    pub notes: String,
}

impl TaskDraft {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: week::to_ymd(date),
            ..Self::default()
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            id: Some(task.id.clone()),
            title: task.title.clone(),
            date: task.date.clone(),
            time: task.time.clone().unwrap_or_default(),
            priority: task.priority,
            notes: task.notes.clone(),
        }
    }

    /// Validate and normalise the draft. `completed` carries over the
    /// state of the task being edited.
    pub fn into_task(self, completed: bool) -> Result<Task, PlannerError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(PlannerError::EmptyTitle);
        }

        let date = week::parse_ymd(&self.date)
            .map_err(|_| PlannerError::InvalidDate(self.date.clone()))?;

        let time = match self.time.trim() {
            "" => None,
            raw => {
                let parsed = NaiveTime::parse_from_str(raw, "%H:%M")
                    .map_err(|_| PlannerError::InvalidTime(raw.to_string()))?;
                Some(parsed.format("%H:%M").to_string())
            }
        };

        Ok(Task {
            id: self.id.unwrap_or_else(|| generate_id("id")),
            title,
            date: week::to_ymd(date),
            time,
            priority: self.priority,
            notes: self.notes.trim().to_string(),
            completed,
        })
    }
}

/// In-memory task collection. Persistence is handled by the caller.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Insert the task if its id is new, otherwise replace the stored one
    pub fn save(&mut self, task: Task) -> Result<&Task, PlannerError> {
        if task.title.trim().is_empty() {
            return Err(PlannerError::EmptyTitle);
        }
        let idx = match self.tasks.iter().position(|t| t.id == task.id) {
            Some(idx) => {
                self.tasks[idx] = task;
                idx
            }
            None => {
                self.tasks.push(task);
                self.tasks.len() - 1
            }
        };
        Ok(&self.tasks[idx])
    }

    /// Create or update from a form draft, keeping the completion state
    /// of an existing task
    pub fn save_draft(&mut self, draft: TaskDraft) -> Result<&Task, PlannerError> {
        let completed = draft
            .id
            .as_deref()
            .and_then(|id| self.get(id))
            .map(|t| t.completed)
            .unwrap_or(false);
        let task = draft.into_task(completed)?;
        self.save(task)
    }

    /// Returns false when no task has this id
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    pub fn toggle_complete(&mut self, id: &str, value: bool) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = value;
                true
            }
            None => false,
        }
    }
}

/// Case-insensitive substring match on title or notes
pub fn filter_tasks(tasks: &[Task], query: &str) -> Vec<Task> {
    if query.is_empty() {
        return tasks.to_vec();
    }
    let q = query.to_lowercase();
    tasks
        .iter()
        .filter(|t| t.title.to_lowercase().contains(&q) || t.notes.to_lowercase().contains(&q))
        .cloned()
        .collect()
}

/// Order within a day: time ascending (untimed last), then priority descending
pub fn compare_within_day(a: &Task, b: &Task) -> Ordering {
    let at = a.time.as_deref().unwrap_or(NO_TIME_SENTINEL);
    let bt = b.time.as_deref().unwrap_or(NO_TIME_SENTINEL);
    at.cmp(bt).then_with(|| b.priority.cmp(&a.priority))
}

pub fn sort_day(tasks: &mut [Task]) {
    tasks.sort_by(compare_within_day);
}

/// Group tasks by their date string, each day already sorted
pub fn group_by_date(tasks: &[Task]) -> BTreeMap<String, Vec<Task>> {
    let mut by_date: BTreeMap<String, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        by_date.entry(task.date.clone()).or_default().push(task.clone());
    }
    for day in by_date.values_mut() {
        sort_day(day);
    }
    by_date
}

/// True when the task is open and its date (plus time, or 23:59) is before `now`
pub fn is_overdue(task: &Task, now: NaiveDateTime) -> bool {
    if task.completed || task.date.is_empty() {
        return false;
    }
    let Ok(date) = week::parse_ymd(&task.date) else {
        return false;
    };
    let time = task.time.as_deref().unwrap_or(END_OF_DAY);
    let Ok(time) = NaiveTime::parse_from_str(time, "%H:%M") else {
        return false;
    };
    date.and_time(time) < now
}

/// One column of the week grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayColumn {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
}

/// Seven day columns starting at `start`, filtered by `query`
pub fn week_columns(tasks: &[Task], query: &str, start: NaiveDate) -> Vec<DayColumn> {
    let mut by_date = group_by_date(&filter_tasks(tasks, query));
    (0..7)
        .map(|offset| {
            let date = week::add_days(start, offset);
            let tasks = by_date.remove(&week::to_ymd(date)).unwrap_or_default();
            DayColumn { date, tasks }
        })
        .collect()
}

/// Number of tasks matching `query` dated within `start..=end`
pub fn count_in_week(tasks: &[Task], query: &str, start: NaiveDate, end: NaiveDate) -> usize {
    filter_tasks(tasks, query)
        .iter()
        .filter_map(|t| week::parse_ymd(&t.date).ok())
        .filter(|d| *d >= start && *d <= end)
        .count()
}

/// Completed tasks, most recent date and time first
pub fn completed_tasks(tasks: &[Task]) -> Vec<Task> {
    let mut done: Vec<Task> = tasks.iter().filter(|t| t.completed).cloned().collect();
    done.sort_by(|a, b| {
        let ad = if a.date.is_empty() { "0000-00-00" } else { a.date.as_str() };
        let bd = if b.date.is_empty() { "0000-00-00" } else { b.date.as_str() };
        let at = a.time.as_deref().unwrap_or("00:00");
        let bt = b.time.as_deref().unwrap_or("00:00");
        bd.cmp(ad).then_with(|| bt.cmp(at))
    });
    done
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn task(title: &str, date: &str, time: Option<&str>, priority: Priority) -> Task {
        let mut t = Task::new(title.to_string(), date.to_string());
        t.time = time.map(str::to_string);
        t.priority = priority;
        t
    }

    #[test]
    fn sorts_by_time_then_priority() {
        let mut day = vec![
            task("a", "2024-03-14", Some("09:00"), Priority::Low),
            task("b", "2024-03-14", None, Priority::High),
            task("c", "2024-03-14", Some("09:00"), Priority::High),
        ];
        sort_day(&mut day);
        let order: Vec<&str> = day.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn filter_matches_title_or_notes_ignoring_case() {
        let mut with_notes = task("Compras", "2024-03-14", None, Priority::Low);
        with_notes.notes = "Comprar LEITE".to_string();
        let tasks = vec![
            task("Leitura", "2024-03-14", None, Priority::Low),
            with_notes,
            task("Academia", "2024-03-15", None, Priority::Low),
        ];
        let found = filter_tasks(&tasks, "lei");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].title, "Leitura");
        assert_eq!(found[1].title, "Compras");
    }

    #[test]
    fn empty_query_keeps_everything_in_order() {
        let tasks = vec![
            task("z", "2024-03-15", None, Priority::Low),
            task("a", "2024-03-14", None, Priority::Low),
        ];
        assert_eq!(filter_tasks(&tasks, ""), tasks);
    }

    #[test]
    fn groups_by_date() {
        let tasks = vec![
            task("late", "2024-03-14", Some("18:00"), Priority::Low),
            task("other", "2024-03-15", None, Priority::Low),
            task("early", "2024-03-14", Some("07:30"), Priority::Low),
        ];
        let grouped = group_by_date(&tasks);
        assert_eq!(grouped.len(), 2);
        let day: Vec<&str> = grouped["2024-03-14"].iter().map(|t| t.title.as_str()).collect();
        assert_eq!(day, vec!["early", "late"]);
    }

    #[test]
    fn overdue_rules() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 14).unwrap().and_hms_opt(10, 0, 0).unwrap();
        let yesterday = week::to_ymd((now - Duration::days(1)).date());

        let mut open = task("x", &yesterday, None, Priority::Low);
        assert!(is_overdue(&open, now));
        open.completed = true;
        assert!(!is_overdue(&open, now));

        // Today without time counts as 23:59
        let today = task("y", "2024-03-14", None, Priority::Low);
        assert!(!is_overdue(&today, now));
        let earlier = task("z", "2024-03-14", Some("09:59"), Priority::Low);
        assert!(is_overdue(&earlier, now));
        let exact = task("w", "2024-03-14", Some("10:00"), Priority::Low);
        assert!(!is_overdue(&exact, now));

        let undated = task("u", "", None, Priority::Low);
        assert!(!is_overdue(&undated, now));
    }

    #[test]
    fn save_inserts_then_replaces() {
        let mut store = TaskStore::default();
        let t = task("first", "2024-03-14", None, Priority::Low);
        let id = t.id.clone();
        store.save(t).unwrap();
        let mut edited = store.get(&id).unwrap().clone();
        edited.title = "renamed".to_string();
        store.save(edited).unwrap();
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.tasks()[0].title, "renamed");
    }

    #[test]
    fn save_rejects_blank_title() {
        let mut store = TaskStore::default();
        let res = store.save(task("   ", "2024-03-14", None, Priority::Low));
        assert!(matches!(res, Err(PlannerError::EmptyTitle)));
        assert!(store.tasks().is_empty());
    }

    #[test]
    fn draft_validation_and_normalisation() {
        let draft = TaskDraft {
            title: "  Dentista ".to_string(),
            date: "2024-03-14".to_string(),
            time: "09:05".to_string(),
            priority: Priority::Medium,
            notes: " levar exames ".to_string(),
            ..TaskDraft::default()
        };
        let t = draft.into_task(false).unwrap();
        assert_eq!(t.title, "Dentista");
        assert_eq!(t.time.as_deref(), Some("09:05"));
        assert_eq!(t.notes, "levar exames");
        assert!(t.id.starts_with("id_"));

        let bad_date = TaskDraft { title: "x".into(), date: "14/03/2024".into(), ..TaskDraft::default() };
        assert!(matches!(bad_date.into_task(false), Err(PlannerError::InvalidDate(_))));

        for raw in ["2024-3-5", "+262142-12-31", "2024-02-30"] {
            let draft = TaskDraft { title: "x".into(), date: raw.into(), ..TaskDraft::default() };
            assert!(matches!(draft.into_task(false), Err(PlannerError::InvalidDate(d)) if d == raw));
        }

        let bad_time = TaskDraft { title: "x".into(), date: "2024-03-14".into(), time: "25:00".into(), ..TaskDraft::default() };
        assert!(matches!(bad_time.into_task(false), Err(PlannerError::InvalidTime(_))));
    }

    #[test]
    fn editing_a_draft_keeps_completion() {
        let mut store = TaskStore::default();
        let mut t = task("done", "2024-03-14", None, Priority::Low);
        t.completed = true;
        let id = t.id.clone();
        store.save(t).unwrap();

        let mut draft = TaskDraft::from_task(store.get(&id).unwrap());
        draft.title = "still done".to_string();
        store.save_draft(draft).unwrap();
        assert!(store.get(&id).unwrap().completed);
    }

    #[test]
    fn missing_ids_are_no_ops() {
        let mut store = TaskStore::new(vec![task("a", "2024-03-14", None, Priority::Low)]);
        assert!(!store.delete("nope"));
        assert!(!store.toggle_complete("nope", true));
        assert_eq!(store.tasks().len(), 1);
    }

    #[test]
    fn week_columns_and_count() {
        let start = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let tasks = vec![
            task("mon", "2024-03-11", None, Priority::Low),
            task("sun", "2024-03-17", None, Priority::Low),
            task("next", "2024-03-18", None, Priority::Low),
        ];
        let cols = week_columns(&tasks, "", start);
        assert_eq!(cols.len(), 7);
        assert_eq!(cols[0].tasks[0].title, "mon");
        assert_eq!(cols[6].tasks[0].title, "sun");
        assert!(cols[1].tasks.is_empty());

        let end = week::add_days(start, 6);
        assert_eq!(count_in_week(&tasks, "", start, end), 2);
        assert_eq!(count_in_week(&tasks, "sun", start, end), 1);
    }

    #[test]
    fn completed_sorted_most_recent_first() {
        let mut a = task("a", "2024-03-10", Some("08:00"), Priority::Low);
        let mut b = task("b", "2024-03-12", None, Priority::Low);
        let mut c = task("c", "2024-03-12", Some("14:00"), Priority::Low);
        let d = task("open", "2024-03-20", None, Priority::Low);
        a.completed = true;
        b.completed = true;
        c.completed = true;
        let done = completed_tasks(&[a, b, c, d]);
        let order: Vec<&str> = done.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(order, vec!["c", "b", "a"]);
    }
}
