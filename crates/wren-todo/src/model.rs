//! To-do List Model

use serde::{Deserialize, Serialize};

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Which items the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    /// Display order of the filter buttons
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Active => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

/// Ordered list of items plus the current filter
#[derive(Debug, Clone, Default)]
pub struct TodoList {
    items: Vec<Todo>,
    next_id: u64,
    filter: Filter,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from saved items; new ids continue after the largest one
    pub fn from_items(items: Vec<Todo>) -> Self {
        let next_id = items
            .iter()
            .map(|t| t.id.saturating_add(1))
            .max()
            .unwrap_or(0);
        Self {
            items,
            next_id,
            filter: Filter::All,
        }
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == id)
    }

    /// Append an item; blank text is ignored
    pub fn add(&mut self, text: &str) -> Option<&Todo> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.next_id == u64::MAX {
            self.renumber();
        }
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(Todo {
            id,
            text: text.to_string(),
            completed: false,
        });
        self.items.last()
    }

    /// Reassign ids `0..len` in list order once the id space runs out
    fn renumber(&mut self) {
        tracing::warn!("item ids exhausted, renumbering {} items", self.items.len());
        for (id, todo) in (0..).zip(self.items.iter_mut()) {
            todo.id = id;
        }
        self.next_id = self.items.len() as u64;
    }

    /// Flip the completed flag; returns the new state
    pub fn toggle(&mut self, id: u64) -> Option<bool> {
        let todo = self.items.iter_mut().find(|t| t.id == id)?;
        todo.completed = !todo.completed;
        Some(todo.completed)
    }

    pub fn remove(&mut self, id: u64) -> Option<Todo> {
        let index = self.items.iter().position(|t| t.id == id)?;
        Some(self.items.remove(index))
    }

    /// Replace the text of an item
    ///
    /// A draft that trims to nothing keeps the existing text.
    pub fn edit(&mut self, id: u64, draft: &str) -> Option<&Todo> {
        let todo = self.items.iter_mut().find(|t| t.id == id)?;
        let draft = draft.trim();
        if !draft.is_empty() {
            todo.text = draft.to_string();
        }
        Some(&*todo)
    }

    /// Drop every completed item; returns how many went
    pub fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|t| !t.completed);
        before - self.items.len()
    }

    pub fn has_completed(&self) -> bool {
        self.items.iter().any(|t| t.completed)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Items passing the current filter, in list order
    pub fn visible(&self) -> Vec<&Todo> {
        self.items.iter().filter(|t| self.filter.matches(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TodoList {
        let mut list = TodoList::new();
        list.add("Buy milk");
        list.add("Walk dog");
        list.add("Write report");
        list
    }

    #[test]
    fn test_add_trims_and_ignores_blank() {
        let mut list = TodoList::new();
        assert_eq!(list.add("  Buy milk  ").map(|t| t.text.as_str()), Some("Buy milk"));
        assert!(list.add("   ").is_none());
        assert!(list.add("").is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut list = sample();
        list.remove(2);
        let id = list.add("Another").map(|t| t.id);
        assert_eq!(id, Some(3));
    }

    #[test]
    fn test_from_items_continues_ids() {
        let mut list = TodoList::from_items(vec![Todo {
            id: 41,
            text: "Saved".into(),
            completed: true,
        }]);
        assert_eq!(list.add("Fresh").map(|t| t.id), Some(42));
    }

    #[test]
    fn test_largest_saved_id_renumbers_instead_of_overflowing() {
        let mut list = TodoList::from_items(vec![
            Todo {
                id: 7,
                text: "Early".into(),
                completed: false,
            },
            Todo {
                id: u64::MAX,
                text: "Last".into(),
                completed: true,
            },
        ]);
        assert_eq!(list.add("Fresh").map(|t| t.id), Some(2));

        let ids: Vec<u64> = list.items().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(list.get(1).map(|t| t.text.as_str()), Some("Last"));
        assert_eq!(list.add("Next").map(|t| t.id), Some(3));
    }

    #[test]
    fn test_toggle_and_filters() {
        let mut list = sample();
        assert_eq!(list.toggle(1), Some(true));
        assert_eq!(list.toggle(99), None);
        assert!(list.has_completed());

        list.set_filter(Filter::Active);
        let active: Vec<u64> = list.visible().iter().map(|t| t.id).collect();
        assert_eq!(active, vec![0, 2]);

        list.set_filter(Filter::Completed);
        let done: Vec<u64> = list.visible().iter().map(|t| t.id).collect();
        assert_eq!(done, vec![1]);
    }

    #[test]
    fn test_edit_keeps_text_for_blank_draft() {
        let mut list = sample();
        assert_eq!(list.edit(0, "  Buy oat milk ").map(|t| t.text.clone()), Some("Buy oat milk".into()));
        assert_eq!(list.edit(0, "   ").map(|t| t.text.clone()), Some("Buy oat milk".into()));
        assert!(list.edit(7, "x").is_none());
    }

    #[test]
    fn test_clear_completed() {
        let mut list = sample();
        list.toggle(0);
        list.toggle(2);
        assert_eq!(list.clear_completed(), 2);
        assert!(!list.has_completed());
        assert_eq!(list.items()[0].text, "Walk dog");
        assert_eq!(list.clear_completed(), 0);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(Filter::parse("Active"), Some(Filter::Active));
        assert_eq!(Filter::parse(" completed "), Some(Filter::Completed));
        assert_eq!(Filter::parse("done"), None);
        assert_eq!(Filter::default(), Filter::All);
    }
}
