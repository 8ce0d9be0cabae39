use crate::models::{DEFAULT_BLOCK_TITLE, NoteBlock, NoteItem, UNTITLED_BLOCK_TITLE};
use crate::reflow::reflow;

/// In-memory note-block collection. Persistence is handled by the caller.
#[derive(Debug, Clone, Default)]
pub struct NoteStore {
    blocks: Vec<NoteBlock>,
}

impl NoteStore {
    pub fn new(blocks: Vec<NoteBlock>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[NoteBlock] {
        &self.blocks
    }

    pub fn get(&self, id: &str) -> Option<&NoteBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut NoteBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Append an empty block. A blank title falls back to the default one.
    pub fn create_block(&mut self, title: Option<&str>, now: i64) -> &NoteBlock {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_BLOCK_TITLE);
        self.blocks.push(NoteBlock::new(title.to_string(), now));
        let idx = self.blocks.len() - 1;
        &self.blocks[idx]
    }

    pub fn rename_block(&mut self, id: &str, title: &str) -> bool {
        let Some(block) = self.get_mut(id) else {
            return false;
        };
        let title = title.trim();
        block.title = if title.is_empty() {
            UNTITLED_BLOCK_TITLE.to_string()
        } else {
            title.to_string()
        };
        true
    }

    /// Remove a block together with all of its notes
    pub fn delete_block(&mut self, id: &str) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id != id);
        self.blocks.len() != before
    }

    /// Append a note to a block. Blank text or an unknown block is a no-op.
    pub fn add_note(&mut self, block_id: &str, text: &str, now: i64) -> Option<&NoteItem> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let block = self.get_mut(block_id)?;
        block.items.push(NoteItem::new(text.to_string(), now));
        block.items.last()
    }

    /// Replace a note's title and text. The text is reflowed to
    /// `words_per_line` and the timestamp refreshed.
    pub fn update_note(
        &mut self,
        block_id: &str,
        note_id: &str,
        title: &str,
        text: &str,
        words_per_line: usize,
        now: i64,
    ) -> Option<&NoteItem> {
        let block = self.get_mut(block_id)?;
        let note = block.items.iter_mut().find(|n| n.id == note_id)?;
        note.title = title.trim().to_string();
        note.text = reflow(text, words_per_line);
        note.ts = now;
        Some(&*note)
    }

    pub fn delete_note(&mut self, block_id: &str, note_id: &str) -> bool {
        let Some(block) = self.get_mut(block_id) else {
            return false;
        };
        let before = block.items.len();
        block.items.retain(|n| n.id != note_id);
        block.items.len() != before
    }
}

/// A block's notes in display order, most recently modified first
pub fn sorted_items(block: &NoteBlock) -> Vec<&NoteItem> {
    let mut items: Vec<&NoteItem> = block.items.iter().collect();
    items.sort_by(|a, b| b.ts.cmp(&a.ts));
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_block_uses_default_title() {
        let mut store = NoteStore::default();
        let block = store.create_block(None, 10).clone();
        assert_eq!(block.title, "Novo bloco");
        assert!(block.items.is_empty());
        assert_eq!(block.created_at, 10);
        assert!(block.id.starts_with("nb_"));

        store.create_block(Some("  Trabalho "), 11);
        assert_eq!(store.blocks()[1].title, "Trabalho");
    }

    #[test]
    fn clearing_a_title_marks_block_untitled() {
        let mut store = NoteStore::default();
        let id = store.create_block(Some("Casa"), 1).id.clone();
        assert!(store.rename_block(&id, "   "));
        assert_eq!(store.get(&id).unwrap().title, "Sem título");
        assert!(!store.rename_block("missing", "x"));
    }

    #[test]
    fn add_note_ignores_blank_text_and_unknown_block() {
        let mut store = NoteStore::default();
        let id = store.create_block(None, 1).id.clone();
        assert!(store.add_note(&id, "  \n ", 2).is_none());
        assert!(store.add_note("nb_missing", "texto", 2).is_none());

        let note = store.add_note(&id, " comprar pão ", 3).unwrap().clone();
        assert_eq!(note.text, "comprar pão");
        assert_eq!(note.ts, 3);
        assert!(note.title.is_empty());
        assert_eq!(store.get(&id).unwrap().items.len(), 1);
    }

    #[test]
    fn update_note_reflows_and_refreshes_timestamp() {
        let mut store = NoteStore::default();
        let block_id = store.create_block(None, 1).id.clone();
        let note_id = store.add_note(&block_id, "old", 2).unwrap().id.clone();

        let note = store
            .update_note(&block_id, &note_id, " Título ", "a b c d e", 2, 99)
            .unwrap();
        assert_eq!(note.title, "Título");
        assert_eq!(note.text, "a b\nc d\ne");
        assert_eq!(note.ts, 99);

        assert!(store.update_note(&block_id, "nt_missing", "", "x", 2, 100).is_none());
    }

    #[test]
    fn deleting_block_drops_its_notes() {
        let mut store = NoteStore::default();
        let keep = store.create_block(Some("keep"), 1).id.clone();
        let gone = store.create_block(Some("gone"), 2).id.clone();
        store.add_note(&gone, "one", 3);
        store.add_note(&gone, "two", 4);

        assert!(store.delete_block(&gone));
        assert!(!store.delete_block(&gone));
        assert_eq!(store.blocks().len(), 1);
        assert_eq!(store.blocks()[0].id, keep);
    }

    #[test]
    fn delete_note_removes_only_that_note() {
        let mut store = NoteStore::default();
        let block_id = store.create_block(None, 1).id.clone();
        let first = store.add_note(&block_id, "first", 2).unwrap().id.clone();
        store.add_note(&block_id, "second", 3);

        assert!(store.delete_note(&block_id, &first));
        assert!(!store.delete_note(&block_id, &first));
        let block = store.get(&block_id).unwrap();
        assert_eq!(block.items.len(), 1);
        assert_eq!(block.items[0].text, "second");
    }

    #[test]
    fn items_display_newest_first_without_reordering_storage() {
        let mut block = NoteBlock::new("b".to_string(), 0);
        block.items.push(NoteItem::new("old".to_string(), 1));
        block.items.push(NoteItem::new("new".to_string(), 3));
        block.items.push(NoteItem::new("mid".to_string(), 2));

        let shown: Vec<&str> = sorted_items(&block).iter().map(|n| n.text.as_str()).collect();
        assert_eq!(shown, vec!["new", "mid", "old"]);
        assert_eq!(block.items[0].text, "old");
    }
}
