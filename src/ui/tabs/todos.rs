use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, AppState, Tab};
use crate::ui::styles;
use crate::utils::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let inserting = matches!(app.state, AppState::Inserting) && app.current_tab == Tab::Todos;

    let (list_area, input_area) = if inserting {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    render_list(frame, app, list_area);

    if let Some(input_area) = input_area {
        render_input(frame, app, input_area);
    }
}

fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let done = app.todos.iter().filter(|t| t.completed).count();

    let items: Vec<ListItem> = app
        .todos
        .iter()
        .enumerate()
        .map(|(i, todo)| {
            let checkbox = if todo.completed { "[x]" } else { "[ ]" };
            let line = Line::from(format!(
                " {} {}",
                checkbox,
                truncate_string(&todo.text, area.width.saturating_sub(8) as usize)
            ));

            let style = if i == app.todo_selection {
                styles::selected_style()
            } else if todo.completed {
                styles::completed_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let block = Block::default()
        .title(format!(" Today's Todos ({}/{} done) ", done, app.todos.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    if items.is_empty() {
        let hint = Paragraph::new(Line::styled(
            "  Nothing to do - press [a] to add a todo",
            styles::muted_style(),
        ))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    state.select(Some(app.todo_selection));

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" New todo (Enter to save, Esc to cancel) ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let text = format!("{}▌", app.input_buffer);
    let paragraph = Paragraph::new(Line::styled(text, styles::input_style())).block(block);
    frame.render_widget(paragraph, area);
}
