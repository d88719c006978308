use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::styles;

/// Landing screen. The API has no project listing, so projects are opened by id.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Find work, hire talent.",
            styles::title_style(),
        )),
        Line::from(""),
    ];

    match app.identity() {
        Some(user) => lines.push(Line::from(format!(
            "  Logged in as {} ({}).",
            user.username,
            user.role_display()
        ))),
        None => lines.push(Line::from(Span::styled(
            "  You are browsing anonymously. Log in to bid on projects.",
            styles::muted_style(),
        ))),
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  [p] ", styles::help_key_style()),
        Span::raw("Open a project by id"),
    ]));
    lines.push(Line::from(vec![
        Span::styled("  [u] ", styles::help_key_style()),
        Span::raw("Open a user profile by id"),
    ]));

    let block = Block::default()
        .title(format!(" {} ", app.current_route().title()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
