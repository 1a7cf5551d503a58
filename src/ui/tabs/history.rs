use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::{format_date, truncate_string};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    // Entries arrive pre-sorted newest first
    let items: Vec<ListItem> = app
        .journal_entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let date = format_date(entry.date);
            let content = truncate_string(
                &entry.content,
                (area.width as usize).saturating_sub(date.len() + 8),
            );

            let line = Line::from(vec![
                Span::styled(format!("  {}  ", date), styles::highlight_style()),
                Span::raw(content),
            ]);

            let style = if i == app.history_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Journal History ({} entries) ", app.journal_entries.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if items.is_empty() {
        let hint = Paragraph::new(Line::styled(
            "  No journal entries yet - write one on the Journal tab",
            styles::muted_style(),
        ))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.history_selection));

    frame.render_stateful_widget(list, area, &mut state);
}
