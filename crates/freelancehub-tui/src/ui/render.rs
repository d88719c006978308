use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use freelancehub_core::pages::NavTarget;
use freelancehub_core::router::Route;

use crate::app::{App, AppState, GotoKind};

use super::screens::{forms, home, profile, project};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    // Nothing but a loading screen until the persisted credential is resolved
    if app.session.is_loading() {
        render_loading(frame);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Length(3), // Nav bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_nav_bar(frame, app, chunks[1]);
    render_main_content(frame, app, chunks[2]);
    render_status_bar(frame, app, chunks[3]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame),
        AppState::EnteringId(kind) => render_goto_overlay(frame, app, kind),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        AppState::Normal | AppState::Quitting => {}
    }
}

fn render_loading(frame: &mut Frame) {
    let area = centered_rect_fixed(30, 5, frame.area());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("        Loading...", styles::title_style())),
    ])
    .block(block);
    frame.render_widget(paragraph, area);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  FreelanceHub";
    let right = match app.identity() {
        Some(user) => format!("{} ({})  [?] Help", user.username, user.role_display()),
        None => "[?] Help".to_string(),
    };

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + right.chars().count() + 4),
        )),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_nav_bar(frame: &mut Frame, app: &App, area: Rect) {
    let current = app.current_route();

    let mut spans = vec![Span::raw(" ")];
    for (i, link) in app.nav_links().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        let selected = match link.target {
            NavTarget::Go(Route::Profile(id)) => {
                current == Route::MyProfile || current == Route::Profile(id)
            }
            NavTarget::Go(route) => route == current,
            NavTarget::Logout => false,
        };
        spans.push(Span::styled(
            format!("[{}] {}", i + 1, link.label),
            styles::nav_style(selected),
        ));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_route() {
        Route::Home | Route::Projects => home::render(frame, app, area),
        Route::Project(_) => project::render(frame, app, area),
        Route::Profile(_) | Route::MyProfile => profile::render(frame, app, area),
        Route::Login => forms::render_login(frame, app, area),
        Route::Register => forms::render_register(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[Esc] back | [q]uit";

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => format!(" {} ", app.current_route().path()),
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(desc, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(52, 25, frame.area());
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  FreelanceHub", styles::title_style())),
        Line::from(Span::styled(
            format!("  version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::highlight_style())),
        help_line("1-9", "Follow nav bar link"),
        help_line("p", "Open a project by id"),
        help_line("u", "Open a user profile by id"),
        help_line("m", "My profile (login required)"),
        help_line("Esc", "Go back"),
        help_line("r", "Reload page"),
        Line::from(""),
        Line::from(Span::styled(" Forms", styles::highlight_style())),
        help_line("Tab/↑/↓", "Move between fields"),
        help_line("Enter", "Next field / submit"),
        Line::from(""),
        Line::from(Span::styled(" Project Page", styles::highlight_style())),
        help_line("b", "Place a bid"),
        help_line("a", "Accept highlighted bid"),
        help_line("Enter", "Open bidder's profile"),
        help_line("c", "Open client's profile"),
        Line::from(""),
        Line::from(Span::styled(" Profile Page", styles::highlight_style())),
        help_line("e", "Edit your bio and skills"),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
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

fn render_goto_overlay(frame: &mut Frame, app: &App, kind: GotoKind) {
    let area = centered_rect_fixed(40, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(format!("  {}: [", kind.prompt()), styles::muted_style()),
            Span::styled(format!("{:<12}▌", app.goto_input), styles::selected_style()),
            Span::styled("]", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Go to ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
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
