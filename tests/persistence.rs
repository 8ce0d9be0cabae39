use planner::database::{NOTES_SLOT, TASKS_SLOT};
use planner::tasks::TaskDraft;
use planner::{Action, Database, Outcome, Planner, Priority};
use tempfile::TempDir;

fn open(dir: &TempDir) -> Database {
    let path = dir.path().join("data").join("planner.db");
    Database::new(path.to_str().unwrap()).unwrap()
}

fn draft(title: &str, date: &str, time: &str, priority: Priority) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        priority,
        ..TaskDraft::default()
    }
}

#[test]
fn state_survives_reopening_the_file() {
    let dir = TempDir::new().unwrap();

    let (task_id, block_id) = {
        let mut planner = Planner::load(open(&dir));
        let task = match planner
            .dispatch(Action::SaveTask(draft("Reunião", "2024-03-14", "09:00", Priority::High)))
            .unwrap()
        {
            Outcome::TaskSaved(task) => task,
            other => panic!("unexpected {:?}", other),
        };
        planner
            .dispatch(Action::ToggleComplete { id: task.id.clone(), value: true })
            .unwrap();
        let block = match planner.dispatch(Action::CreateBlock { title: Some("Ideias".into()) }).unwrap() {
            Outcome::BlockCreated(block) => block,
            other => panic!("unexpected {:?}", other),
        };
        planner
            .dispatch(Action::AddNote { block_id: block.id.clone(), text: "primeira nota".into() })
            .unwrap();
        (task.id, block.id)
    };

    let planner = Planner::load(open(&dir));
    let task = planner.task(&task_id).unwrap();
    assert_eq!(task.title, "Reunião");
    assert_eq!(task.time.as_deref(), Some("09:00"));
    assert_eq!(task.priority, Priority::High);
    assert!(task.completed);

    let block = planner.block(&block_id).unwrap();
    assert_eq!(block.title, "Ideias");
    assert_eq!(block.items.len(), 1);
    assert_eq!(block.items[0].text, "primeira nota");
}

#[test]
fn stored_json_keeps_the_original_field_names() {
    let dir = TempDir::new().unwrap();
    let mut planner = Planner::load(open(&dir));
    planner
        .dispatch(Action::SaveTask(draft("x", "2024-03-14", "", Priority::Medium)))
        .unwrap();

    let raw = planner.database().get_item(TASKS_SLOT).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let task = &value[0];
    assert_eq!(task["titulo"], "x");
    assert_eq!(task["data"], "2024-03-14");
    assert_eq!(task["prioridade"], 2);
    assert_eq!(task["concluida"], false);
}

#[test]
fn malformed_slots_load_as_empty_collections() {
    let dir = TempDir::new().unwrap();
    {
        let db = open(&dir);
        db.set_item(TASKS_SLOT, "{not json").unwrap();
        db.set_item(NOTES_SLOT, "42").unwrap();
    }

    let mut planner = Planner::load(open(&dir));
    assert!(planner.tasks().is_empty());
    assert!(planner.blocks().is_empty());

    // The next save replaces the broken document
    planner.dispatch(Action::CreateBlock { title: None }).unwrap();
    assert_eq!(open(&dir).load_note_blocks().len(), 1);
}

#[test]
fn deleting_a_block_drops_its_notes_on_disk() {
    let dir = TempDir::new().unwrap();
    let mut planner = Planner::load(open(&dir));
    let block_id = match planner.dispatch(Action::CreateBlock { title: None }).unwrap() {
        Outcome::BlockCreated(block) => block.id,
        other => panic!("unexpected {:?}", other),
    };
    for text in ["um", "dois", "três"] {
        planner
            .dispatch(Action::AddNote { block_id: block_id.clone(), text: text.into() })
            .unwrap();
    }
    planner.dispatch(Action::DeleteBlock { id: block_id }).unwrap();

    let reopened = open(&dir);
    assert!(reopened.load_note_blocks().is_empty());
    let raw = reopened.get_item(NOTES_SLOT).unwrap().unwrap();
    assert_eq!(raw, "[]");
}
