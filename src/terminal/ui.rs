use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, List, ListItem, Paragraph},
};

use crate::terminal::state::SelectorState;

pub fn render(f: &mut Frame, state: &mut SelectorState) {
    let [list_area, footer] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
        .margin(1)
        .areas(f.area());

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .title(format!(" {} ({}) ", state.prompt, state.items.len()))
        .border_style(Style::default().fg(Color::Yellow));

    let items: Vec<ListItem> = state
        .items
        .iter()
        .map(|e| ListItem::new(e.as_str()))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("➜ ")
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(list, list_area, &mut state.list_state);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("j/k", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" move  "),
        Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" select  "),
        Span::styled("q/Esc", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" cancel"),
    ]));
    f.render_widget(hint, footer);
}
