use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Title given to blocks created without one
pub const DEFAULT_BLOCK_TITLE: &str = "Novo bloco";
/// Title used when a block's title is cleared
pub const UNTITLED_BLOCK_TITLE: &str = "Sem título";

/// Task priority, stored as 1 (low), 2 (medium) or 3 (high)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    #[default]
    Low = 1,
    Medium = 2,
    High = 3,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Baixa",
            Priority::Medium => "Média",
            Priority::High => "Alta",
        }
    }

    /// Next priority, wrapping from High back to Low
    pub fn cycle_up(self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn cycle_down(self) -> Self {
        match self {
            Priority::Low => Priority::High,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::Low),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::High),
            other => Err(format!("priority must be 1, 2 or 3, got {}", other)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p as u8
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scheduled task. Field names on disk keep the original storage layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "data", default)]
    pub date: String, // YYYY-MM-DD
    #[serde(rename = "hora", default, deserialize_with = "empty_string_as_none")]
    pub time: Option<String>, // HH:MM
    #[serde(rename = "prioridade", default)]
    pub priority: Priority,
    #[serde(rename = "notas", default)]
    pub notes: String,
    #[serde(rename = "concluida", default)]
    pub completed: bool,
}

impl Task {
    pub fn new(title: String, date: String) -> Self {
        Self {
            id: generate_id("id"),
            title,
            date,
            time: None,
            priority: Priority::default(),
            notes: String::new(),
            completed: false,
        }
    }
}

/// A named container of notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteBlock {
    pub id: String,
    #[serde(rename = "titulo", default)]
    pub title: String,
    #[serde(rename = "itens", default)]
    pub items: Vec<NoteItem>,
    #[serde(rename = "createdAt", default)]
    pub created_at: i64, // epoch milliseconds
}

impl NoteBlock {
    pub fn new(title: String, created_at: i64) -> Self {
        Self {
            id: generate_id("nb"),
            title,
            items: Vec::new(),
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteItem {
    pub id: String,
    #[serde(rename = "titulo", default)]
    pub title: String,
    #[serde(rename = "texto", default)]
    pub text: String,
    pub ts: i64, // last modified, epoch milliseconds
}

impl NoteItem {
    pub fn new(text: String, ts: i64) -> Self {
        Self {
            id: generate_id("nt"),
            title: String::new(),
            text,
            ts,
        }
    }
}

/// Opaque unique identifier with a short type prefix (`id_`, `nb_`, `nt_`)
pub fn generate_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_reads_original_field_names() {
        let json = r#"{"id":"id_1a2b3c4d","titulo":"Dentista","data":"2024-03-14","hora":"","prioridade":3,"notas":"levar exames","concluida":false}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.title, "Dentista");
        assert_eq!(task.date, "2024-03-14");
        assert_eq!(task.time, None);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.notes, "levar exames");
    }

    #[test]
    fn task_defaults_for_missing_fields() {
        let task: Task = serde_json::from_str(r#"{"id":"x","titulo":"t"}"#).unwrap();
        assert_eq!(task.priority, Priority::Low);
        assert!(!task.completed);
        assert!(task.notes.is_empty());
    }

    #[test]
    fn invalid_priority_is_rejected() {
        let res: Result<Task, _> = serde_json::from_str(r#"{"id":"x","titulo":"t","prioridade":7}"#);
        assert!(res.is_err());
    }

    #[test]
    fn note_block_uses_camel_case_created_at() {
        let block = NoteBlock::new(DEFAULT_BLOCK_TITLE.to_string(), 42);
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["createdAt"], 42);
        assert_eq!(value["titulo"], "Novo bloco");
        assert!(value["itens"].as_array().unwrap().is_empty());
    }

    #[test]
    fn generated_ids_are_prefixed_and_distinct() {
        let a = generate_id("nt");
        let b = generate_id("nt");
        assert!(a.starts_with("nt_"));
        assert_ne!(a, b);
    }

    #[test]
    fn priority_cycles() {
        assert_eq!(Priority::High.cycle_up(), Priority::Low);
        assert_eq!(Priority::Low.cycle_down(), Priority::High);
    }
}
