//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppState, GoalPane, LoginFocus, SignupFocus, Tab};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle auth overlays
    if matches!(app.state, AppState::LoggingIn) {
        return handle_login_input(app, key).await;
    }

    if matches!(app.state, AppState::SigningUp) {
        return handle_signup_input(app, key).await;
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(
            key.code,
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
        ) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle insert mode (new goal/todo text, journal editing)
    if matches!(app.state, AppState::Inserting) {
        return handle_insert_input(app, key).await;
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('1') => app.current_tab = Tab::Goals,
        KeyCode::Char('2') => app.current_tab = Tab::Todos,
        KeyCode::Char('3') => app.current_tab = Tab::Journal,
        KeyCode::Char('4') => app.current_tab = Tab::History,
        KeyCode::Tab | KeyCode::Right => app.current_tab = app.current_tab.next(),
        KeyCode::BackTab | KeyCode::Left => app.current_tab = app.current_tab.prev(),
        KeyCode::Char('u') => app.refresh_all_background(),
        KeyCode::Char('L') => app.logout(),
        _ => return handle_tab_input(app, key).await,
    }

    Ok(false)
}

/// Tab-specific keys in Normal mode.
async fn handle_tab_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.current_tab {
        Tab::Goals => match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let count = app.goals_for(app.goal_pane).len();
                if count > 0 && app.goal_selection < count - 1 {
                    app.goal_selection += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.goal_selection = app.goal_selection.saturating_sub(1);
            }
            KeyCode::Char('h') => {
                app.goal_pane = GoalPane::LongTerm;
                app.goal_selection = 0;
            }
            KeyCode::Char('l') => {
                app.goal_pane = GoalPane::ShortTerm;
                app.goal_selection = 0;
            }
            KeyCode::Char('a') => {
                app.input_buffer.clear();
                app.state = AppState::Inserting;
            }
            KeyCode::Char('d') => app.delete_selected_goal().await,
            _ => {}
        },
        Tab::Todos => match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if !app.todos.is_empty() && app.todo_selection < app.todos.len() - 1 {
                    app.todo_selection += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.todo_selection = app.todo_selection.saturating_sub(1);
            }
            KeyCode::Char('a') => {
                app.input_buffer.clear();
                app.state = AppState::Inserting;
            }
            KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected_todo().await,
            KeyCode::Char('d') => app.delete_selected_todo().await,
            _ => {}
        },
        Tab::Journal => {
            if matches!(key.code, KeyCode::Char('e') | KeyCode::Enter) {
                app.state = AppState::Inserting;
            }
        }
        Tab::History => match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if !app.journal_entries.is_empty()
                    && app.history_selection < app.journal_entries.len() - 1
                {
                    app.history_selection += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                app.history_selection = app.history_selection.saturating_sub(1);
            }
            _ => {}
        },
    }

    Ok(false)
}

/// Insert mode: text entry for new goals/todos and the journal editor.
async fn handle_insert_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.input_buffer.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            match app.current_tab {
                Tab::Goals => app.add_goal().await,
                Tab::Todos => app.add_todo().await,
                Tab::Journal => app.save_journal().await,
                Tab::History => {}
            }
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => app.pop_input_char(),
        KeyCode::Char(c) => app.push_input_char(c),
        _ => {}
    }

    Ok(false)
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Ctrl+S switches to the signup form
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.start_signup();
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => {
            // Nothing behind the overlay without a session, so quit
            if app.is_authenticated() {
                app.state = AppState::Normal;
            } else {
                app.state = AppState::Quitting;
                return Ok(true);
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Password,
                LoginFocus::Password => LoginFocus::Button,
                LoginFocus::Button => LoginFocus::Username,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.login_focus = match app.login_focus {
                LoginFocus::Username => LoginFocus::Button,
                LoginFocus::Password => LoginFocus::Username,
                LoginFocus::Button => LoginFocus::Password,
            };
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => app.attempt_login().await,
        },
        KeyCode::Backspace => app.pop_form_char(),
        KeyCode::Char(c) => app.push_form_char(c),
        _ => {}
    }

    Ok(false)
}

async fn handle_signup_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.start_login(),
        KeyCode::Tab | KeyCode::Down => {
            app.signup_focus = match app.signup_focus {
                SignupFocus::Username => SignupFocus::Email,
                SignupFocus::Email => SignupFocus::Password,
                SignupFocus::Password => SignupFocus::Button,
                SignupFocus::Button => SignupFocus::Username,
            };
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.signup_focus = match app.signup_focus {
                SignupFocus::Username => SignupFocus::Button,
                SignupFocus::Email => SignupFocus::Username,
                SignupFocus::Password => SignupFocus::Email,
                SignupFocus::Button => SignupFocus::Password,
            };
        }
        KeyCode::Enter => match app.signup_focus {
            SignupFocus::Username => app.signup_focus = SignupFocus::Email,
            SignupFocus::Email => app.signup_focus = SignupFocus::Password,
            SignupFocus::Password | SignupFocus::Button => app.attempt_signup().await,
        },
        KeyCode::Backspace => app.pop_form_char(),
        KeyCode::Char(c) => app.push_form_char(c),
        _ => {}
    }

    Ok(false)
}
