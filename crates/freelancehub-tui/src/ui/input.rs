//! Keyboard input handling for the TUI.
//!
//! Translates key events into navigation, form edits and page actions.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use freelancehub_core::pages::forms::can_add_char;
use freelancehub_core::router::Route;

use crate::app::{App, AppState, GotoKind, LoginFocus, ProfileFocus, ProjectFocus, RegisterFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Only quitting is possible while the session is being resolved
    if app.session.is_loading() {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            app.state = AppState::Quitting;
            return Ok(true);
        }
        return Ok(false);
    }

    match app.state {
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
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
        AppState::EnteringId(kind) => {
            handle_goto_input(app, kind, key).await;
            return Ok(false);
        }
        AppState::Normal | AppState::Quitting => {}
    }

    // Screens with a focused text field take every key
    match app.current_route() {
        Route::Login => {
            handle_login_input(app, key).await;
            return Ok(false);
        }
        Route::Register => {
            handle_register_input(app, key).await;
            return Ok(false);
        }
        Route::Project(_) if app.project_focus != ProjectFocus::Bids => {
            handle_bid_form_input(app, key).await;
            return Ok(false);
        }
        Route::Profile(_) | Route::MyProfile if app.profile_is_editing() => {
            handle_profile_edit_input(app, key).await;
            return Ok(false);
        }
        _ => {}
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
        KeyCode::Char(c @ '1'..='9') => {
            let index = (c as usize) - ('1' as usize);
            app.status_message = None;
            app.follow_nav_link(index).await;
            return Ok(false);
        }
        KeyCode::Char('p') => {
            app.start_goto(GotoKind::Project);
            return Ok(false);
        }
        KeyCode::Char('u') => {
            app.start_goto(GotoKind::Profile);
            return Ok(false);
        }
        KeyCode::Char('m') => {
            app.go(Route::MyProfile).await;
            return Ok(false);
        }
        KeyCode::Char('r') => {
            app.reload().await;
            return Ok(false);
        }
        KeyCode::Esc | KeyCode::Backspace => {
            app.back().await;
            return Ok(false);
        }
        _ => {}
    }

    match app.current_route() {
        Route::Project(_) => handle_project_input(app, key).await,
        Route::Profile(_) | Route::MyProfile => {
            if key.code == KeyCode::Char('e') {
                app.start_profile_edit();
            }
        }
        _ => {}
    }

    Ok(false)
}

async fn handle_goto_input(app: &mut App, kind: GotoKind, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.goto_input.clear();
            app.state = AppState::Normal;
        }
        KeyCode::Enter => app.finish_goto(kind).await,
        KeyCode::Backspace => {
            app.goto_input.pop();
        }
        KeyCode::Char(c) => app.push_goto_char(c),
        _ => {}
    }
}

/// Append a typed character to a text field if it fits
fn push_char(field: &mut String, c: char) {
    if can_add_char(field.chars().count(), c) {
        field.push(c);
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.back().await,
        KeyCode::Down | KeyCode::Tab => app.login_focus = app.login_focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.login_focus = app.login_focus.prev(),
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            // Enter on the password submits, like a browser form
            LoginFocus::Password | LoginFocus::Button => app.submit_login().await,
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_form.email.pop();
            }
            LoginFocus::Password => {
                app.login_form.password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => push_char(&mut app.login_form.email, c),
            LoginFocus::Password => push_char(&mut app.login_form.password, c),
            LoginFocus::Button => {}
        },
        _ => {}
    }
}

async fn handle_register_input(app: &mut App, key: KeyEvent) {
    let form = &mut app.register_form;
    match (key.code, app.register_focus) {
        (KeyCode::Esc, _) => app.back().await,
        (KeyCode::Down | KeyCode::Tab, focus) => app.register_focus = focus.next(),
        (KeyCode::Up | KeyCode::BackTab, focus) => app.register_focus = focus.prev(),
        (KeyCode::Enter, RegisterFocus::Button) => app.submit_register().await,
        (KeyCode::Enter, focus) => app.register_focus = focus.next(),
        (KeyCode::Left | KeyCode::Right | KeyCode::Char(' '), RegisterFocus::Role) => {
            form.is_freelancer = !form.is_freelancer;
        }
        (KeyCode::Backspace, RegisterFocus::Username) => {
            form.username.pop();
        }
        (KeyCode::Backspace, RegisterFocus::Email) => {
            form.email.pop();
        }
        (KeyCode::Backspace, RegisterFocus::Password) => {
            form.password.pop();
        }
        (KeyCode::Char(c), RegisterFocus::Username) => push_char(&mut form.username, c),
        (KeyCode::Char(c), RegisterFocus::Email) => push_char(&mut form.email, c),
        (KeyCode::Char(c), RegisterFocus::Password) => push_char(&mut form.password, c),
        _ => {}
    }
}

async fn handle_project_input(app: &mut App, key: KeyEvent) {
    let max_index = app.project_bid_count().saturating_sub(1);
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            app.bid_selection = app.bid_selection.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.bid_selection = (app.bid_selection + 1).min(max_index);
        }
        KeyCode::Char('b') => app.start_bid(),
        KeyCode::Char('a') => app.accept_selected_bid().await,
        KeyCode::Char('c') => app.open_project_client().await,
        KeyCode::Enter => app.open_selected_bidder().await,
        _ => {}
    }
}

async fn handle_bid_form_input(app: &mut App, key: KeyEvent) {
    let Some(page) = app.project_page.as_mut() else {
        app.project_focus = ProjectFocus::Bids;
        return;
    };
    let form = &mut page.bid_form;
    match (key.code, app.project_focus) {
        (KeyCode::Esc, _) => {
            form.error = None;
            app.project_focus = ProjectFocus::Bids;
        }
        (KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab, ProjectFocus::Amount) => {
            app.project_focus = ProjectFocus::Proposal;
        }
        (KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab, _) => {
            app.project_focus = ProjectFocus::Amount;
        }
        (KeyCode::Enter, ProjectFocus::Amount) => app.project_focus = ProjectFocus::Proposal,
        (KeyCode::Enter, _) => app.submit_bid().await,
        (KeyCode::Backspace, ProjectFocus::Amount) => {
            form.amount.pop();
        }
        (KeyCode::Backspace, _) => {
            form.proposal.pop();
        }
        (KeyCode::Char(c), ProjectFocus::Amount) => {
            if c.is_ascii_digit() || c == '.' {
                push_char(&mut form.amount, c);
            }
        }
        (KeyCode::Char(c), _) => push_char(&mut form.proposal, c),
        _ => {}
    }
}

async fn handle_profile_edit_input(app: &mut App, key: KeyEvent) {
    let Some(page) = app.profile_page.as_mut() else {
        return;
    };
    match (key.code, app.profile_focus) {
        (KeyCode::Esc, _) => app.cancel_profile_edit(),
        (KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down, focus) => {
            app.profile_focus = match focus {
                ProfileFocus::Bio => ProfileFocus::Skills,
                ProfileFocus::Skills => ProfileFocus::Bio,
            };
        }
        (KeyCode::Enter, _) => app.save_profile().await,
        (KeyCode::Backspace, ProfileFocus::Bio) => {
            page.edit_bio.pop();
        }
        (KeyCode::Backspace, ProfileFocus::Skills) => {
            page.edit_skills.pop();
        }
        (KeyCode::Char(c), ProfileFocus::Bio) => push_char(&mut page.edit_bio, c),
        (KeyCode::Char(c), ProfileFocus::Skills) => push_char(&mut page.edit_skills, c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_char_respects_limit() {
        let mut field = String::new();
        push_char(&mut field, 'a');
        push_char(&mut field, '\n');
        assert_eq!(field, "a");

        let mut full = "x".repeat(freelancehub_core::pages::forms::MAX_FIELD_LENGTH);
        push_char(&mut full, 'y');
        assert!(!full.ends_with('y'));
    }
}
