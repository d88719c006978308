use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus, RegisterFocus};
use crate::ui::render::centered_rect_fixed;
use crate::ui::styles;

use super::{button_line, field_line};

fn form_block(title: &'static str) -> Block<'static> {
    Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
}

fn push_messages(lines: &mut Vec<Line<'static>>, error: Option<&str>, success: Option<&str>) {
    if let Some(error) = error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", error), styles::error_style())));
    }
    if let Some(success) = success {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", success), styles::success_style())));
    }
}

pub fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.login_form;
    let height = if form.error.is_some() { 10 } else { 8 };
    let area = centered_rect_fixed(50, height, area);
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(""),
        field_line("Email", &form.email, app.login_focus == LoginFocus::Email, false),
        field_line("Password", &form.password, app.login_focus == LoginFocus::Password, true),
        Line::from(""),
        button_line("Login", app.login_focus == LoginFocus::Button),
    ];
    push_messages(&mut lines, form.error.as_deref(), None);

    frame.render_widget(Paragraph::new(lines).block(form_block(" Login ")), area);
}

pub fn render_register(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.register_form;
    let height = if form.error.is_some() || form.success.is_some() { 12 } else { 10 };
    let area = centered_rect_fixed(50, height, area);
    frame.render_widget(Clear, area);

    let focus = app.register_focus;
    let role_focused = focus == RegisterFocus::Role;
    let role = if form.is_freelancer { "Freelancer" } else { "Client" };

    let mut lines = vec![
        Line::from(""),
        field_line("Username", &form.username, focus == RegisterFocus::Username, false),
        field_line("Email", &form.email, focus == RegisterFocus::Email, false),
        field_line("Password", &form.password, focus == RegisterFocus::Password, true),
        Line::from(vec![
            Span::styled(format!("  {:>10}: ", "I am a"), styles::muted_style()),
            Span::styled(format!("< {} >", role), styles::field_style(role_focused)),
        ]),
        Line::from(""),
        button_line("Register", focus == RegisterFocus::Button),
    ];
    push_messages(&mut lines, form.error.as_deref(), form.success.as_deref());

    frame.render_widget(Paragraph::new(lines).block(form_block(" Register ")), area);
}
