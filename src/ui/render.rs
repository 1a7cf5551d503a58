use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, LoginFocus, SignupFocus, Tab};

use super::styles;
use super::tabs::{goals, history, journal, todos};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(2), // Tabs
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_tabs(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::LoggingIn) {
        render_login_overlay(frame, app);
    }

    if matches!(app.state, AppState::SigningUp) {
        render_signup_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Dayboard";
    let greeting = match app.greeting_name() {
        Some(name) => format!("Hello, {}", name),
        None => "Not signed in".to_string(),
    };
    let help_hint = "[?] Help";

    let padding = area
        .width
        .saturating_sub((title.len() + greeting.len() + help_hint.len() + 7) as u16)
        as usize;

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(greeting, styles::highlight_style()),
        Span::raw("   "),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let tabs = [Tab::Goals, Tab::Todos, Tab::Journal, Tab::History];

    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in tabs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let label = format!("[{}] {}", i + 1, tab.title());
        if app.current_tab == *tab {
            spans.push(Span::styled(label, styles::tab_style(true)));
        } else {
            spans.push(Span::styled(label, styles::muted_style()));
        }
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_tab {
        Tab::Goals => goals::render(frame, app, area),
        Tab::Todos => todos::render(frame, app, area),
        Tab::Journal => journal::render(frame, app, area),
        Tab::History => history::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.current_tab {
        Tab::Goals => "[a]dd | [d]elete | [h/l] pane | [u]pdate | [L]ogout | [q]uit",
        Tab::Todos => "[a]dd | [space] toggle | [d]elete | [u]pdate | [L]ogout | [q]uit",
        Tab::Journal => "[e]dit | [u]pdate | [L]ogout | [q]uit",
        Tab::History => "[j/k] scroll | [u]pdate | [L]ogout | [q]uit",
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => String::from(" Ready "),
    };
    let right_text = format!(" {} ", shortcuts);

    let padding = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(50, 22, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  Dayboard", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  1-4       ", styles::help_key_style()),
            Span::styled("Switch tabs", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Tab/←/→   ", styles::help_key_style()),
            Span::styled("Prev/next tab", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  j/k or ↑/↓", styles::help_key_style()),
            Span::styled(" Navigate list", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  h/l       ", styles::help_key_style()),
            Span::styled("Switch goal pane", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  a         ", styles::help_key_style()),
            Span::styled("Add goal or todo", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Space     ", styles::help_key_style()),
            Span::styled("Toggle todo done", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  d         ", styles::help_key_style()),
            Span::styled("Delete selected item", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  e         ", styles::help_key_style()),
            Span::styled("Edit today's journal", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  u         ", styles::help_key_style()),
            Span::styled("Refresh from server", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  L         ", styles::help_key_style()),
            Span::styled("Log out", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("     Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

/// A labelled, cursor-carrying form field line for the auth overlays.
fn form_field(label: &str, value: &str, focused: bool, masked: bool) -> Line<'static> {
    let display = if masked {
        "*".repeat(value.len().min(20))
    } else {
        value.chars().take(20).collect()
    };
    let cursor = if focused { "▌" } else { "" };
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };

    Line::from(vec![
        Span::raw("   "),
        Span::styled(format!("{:<10}[", label), styles::muted_style()),
        Span::styled(format!("{:<20}{}", display, cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

fn form_button(label: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Line::from(vec![
        Span::raw("            ["),
        Span::styled(text, style),
        Span::raw("]"),
    ])
}

fn render_login_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 13 } else { 11 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("   Sign in to Dayboard", styles::title_style())),
        Line::from(""),
        form_field(
            "Username:",
            &app.login_username,
            app.login_focus == LoginFocus::Username,
            false,
        ),
        form_field(
            "Password:",
            &app.login_password,
            app.login_focus == LoginFocus::Password,
            true,
        ),
        Line::from(""),
        form_button("Login", app.login_focus == LoginFocus::Button),
        Line::from(""),
        Line::from(vec![
            Span::styled("   No account? ", styles::muted_style()),
            Span::styled("Ctrl+S", styles::help_key_style()),
            Span::styled(" to sign up", styles::muted_style()),
        ]),
    ];

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("   {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_signup_overlay(frame: &mut Frame, app: &App) {
    let height = if app.login_error.is_some() { 14 } else { 12 };
    let area = centered_rect_fixed(46, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("   Create a Dayboard account", styles::title_style())),
        Line::from(""),
        form_field(
            "Username:",
            &app.signup_username,
            app.signup_focus == SignupFocus::Username,
            false,
        ),
        form_field(
            "Email:",
            &app.signup_email,
            app.signup_focus == SignupFocus::Email,
            false,
        ),
        form_field(
            "Password:",
            &app.signup_password,
            app.signup_focus == SignupFocus::Password,
            true,
        ),
        Line::from(""),
        form_button("Sign up", app.signup_focus == SignupFocus::Button),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Have an account? ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to sign in", styles::muted_style()),
        ]),
    ];

    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("   {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled("   Dayboard", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
