use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState, Tab};
use crate::ui::styles;
use crate::utils::format_date_long;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(area);

    render_editor(frame, app, chunks[0]);
    render_hint(frame, app, chunks[1]);
}

fn render_editor(frame: &mut Frame, app: &App, area: Rect) {
    let editing = matches!(app.state, AppState::Inserting) && app.current_tab == Tab::Journal;

    let status = if app.journal_dirty {
        Span::styled(" [unsaved] ", styles::error_style())
    } else if app.today_entry().is_some() {
        Span::styled(" [saved] ", styles::success_style())
    } else {
        Span::styled(" [empty] ", styles::muted_style())
    };

    let block = Block::default()
        .title(Line::from(vec![
            Span::styled(
                format!(" {} ", format_date_long(App::today())),
                styles::title_style(),
            ),
            status,
        ]))
        .borders(Borders::ALL)
        .border_style(styles::border_style(editing));

    let cursor = if editing { "▌" } else { "" };
    let text = format!("{}{}", app.journal_draft, cursor);

    let style = if editing {
        styles::input_style()
    } else if app.journal_draft.is_empty() {
        styles::muted_style()
    } else {
        styles::list_item_style()
    };

    let content = if text.is_empty() {
        Line::styled("How was your day? Press [e] to write.", styles::muted_style())
    } else {
        Line::styled(text, style)
    };

    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_hint(frame: &mut Frame, app: &App, area: Rect) {
    let editing = matches!(app.state, AppState::Inserting) && app.current_tab == Tab::Journal;

    let hint = if editing {
        "Enter saves the entry, Esc stops editing without saving."
    } else {
        "One line about today. [e] edit, past entries live in [4] History."
    };

    let paragraph = Paragraph::new(Line::styled(format!("  {}", hint), styles::muted_style()));
    frame.render_widget(paragraph, area);
}
