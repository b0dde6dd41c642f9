use ratatui::widgets::ListState;

pub struct SelectorState {
    pub prompt: String,
    pub items: Vec<String>,
    pub list_state: ListState,
}

impl SelectorState {
    pub fn new(prompt: impl Into<String>, items: Vec<String>) -> Self {
        let mut s = Self {
            prompt: prompt.into(),
            items,
            list_state: ListState::default(),
        };
        if !s.items.is_empty() {
            s.list_state.select(Some(0));
        }
        s
    }

    pub fn selected_value(&self) -> Option<&str> {
        let idx = self.list_state.selected()?;
        self.items.get(idx).map(String::as_str)
    }

    pub fn move_selection(&mut self, delta: i32) {
        if self.items.is_empty() {
            self.list_state.select(None);
            return;
        }
        let cur = self.list_state.selected().unwrap_or(0) as i32;
        let len = self.items.len() as i32;
        let next = (cur + delta).clamp(0, len - 1) as usize;
        self.list_state.select(Some(next));
    }

    pub fn select_first(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(self.items.len() - 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(n: usize) -> SelectorState {
        SelectorState::new("Select", (0..n).map(|i| format!("u{i}@example.com")).collect())
    }

    #[test]
    fn starts_on_first_item() {
        assert_eq!(state(3).selected_value(), Some("u0@example.com"));
        assert_eq!(state(0).selected_value(), None);
    }

    #[test]
    fn movement_clamps_at_edges() {
        let mut s = state(3);
        s.move_selection(-1);
        assert_eq!(s.list_state.selected(), Some(0));
        s.move_selection(10);
        assert_eq!(s.list_state.selected(), Some(2));
        s.move_selection(-1);
        assert_eq!(s.selected_value(), Some("u1@example.com"));
    }

    #[test]
    fn home_and_end() {
        let mut s = state(4);
        s.select_last();
        assert_eq!(s.list_state.selected(), Some(3));
        s.select_first();
        assert_eq!(s.list_state.selected(), Some(0));
    }
}
