pub mod events;
pub mod state;
pub mod ui;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;

use crate::domain::session::Selection;
use crate::terminal::events::{KeyOutcome, handle_key};
use crate::terminal::state::SelectorState;

pub trait Selector {
    fn choose(&mut self, options: &[String]) -> Result<Selection>;
}

/// Full-screen list prompt on the controlling terminal.
pub struct TerminalSelector {
    prompt: String,
}

impl TerminalSelector {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

impl Default for TerminalSelector {
    fn default() -> Self {
        Self::new("Select an email")
    }
}

impl Selector for TerminalSelector {
    fn choose(&mut self, options: &[String]) -> Result<Selection> {
        if options.is_empty() {
            log::info!("nothing to select from");
            return Ok(Selection::Cancelled);
        }
        let mut state = SelectorState::new(self.prompt.clone(), options.to_vec());

        let terminal = ratatui::init();
        let result = run(terminal, &mut state);
        ratatui::restore();

        result
    }
}

fn run(mut terminal: DefaultTerminal, state: &mut SelectorState) -> Result<Selection> {
    loop {
        terminal.draw(|f| ui::render(f, state))?;
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match handle_key(key, state) {
                KeyOutcome::Continue => {}
                KeyOutcome::Choose(v) => return Ok(Selection::Chosen(v)),
                KeyOutcome::Cancel => return Ok(Selection::Cancelled),
            }
        }
    }
}
