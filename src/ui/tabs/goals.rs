use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, AppState, GoalPane, Tab};
use crate::ui::styles;
use crate::utils::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let inserting = matches!(app.state, AppState::Inserting) && app.current_tab == Tab::Goals;

    let (panes_area, input_area) = if inserting {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(panes_area);

    render_pane(frame, app, chunks[0], GoalPane::LongTerm);
    render_pane(frame, app, chunks[1], GoalPane::ShortTerm);

    if let Some(input_area) = input_area {
        render_input(frame, app, input_area);
    }
}

fn render_pane(frame: &mut Frame, app: &App, area: Rect, pane: GoalPane) {
    let goals = app.goals_for(pane);
    let focused = app.goal_pane == pane;

    let items: Vec<ListItem> = goals
        .iter()
        .enumerate()
        .map(|(i, goal)| {
            let line = Line::from(format!(
                "  {}",
                truncate_string(&goal.title, area.width.saturating_sub(6) as usize)
            ));

            let style = if focused && i == app.goal_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let title = format!(" {} ({}) ", pane.goal_type().label(), goals.len());

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    if items.is_empty() {
        let hint = Paragraph::new(Line::styled(
            "  No goals yet - press [a] to add one",
            styles::muted_style(),
        ))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    if focused {
        state.select(Some(app.goal_selection.min(goals.len().saturating_sub(1))));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let pane_label = match app.goal_pane {
        GoalPane::LongTerm => "long-term",
        GoalPane::ShortTerm => "short-term",
    };

    let block = Block::default()
        .title(format!(" New {} goal (Enter to save, Esc to cancel) ", pane_label))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let text = format!("{}▌", app.input_buffer);
    let paragraph = Paragraph::new(Line::styled(text, styles::input_style())).block(block);
    frame.render_widget(paragraph, area);
}
