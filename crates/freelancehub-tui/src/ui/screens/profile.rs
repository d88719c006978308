use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use freelancehub_core::models::PublicProfile;
use freelancehub_core::pages::{PageView, ProfilePage};
use freelancehub_core::utils::format_date;

use crate::app::{App, ProfileFocus};
use crate::ui::styles;

use super::{field_line, placeholder};

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.0}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(page) = app.profile_page.as_ref() else {
        let block = Block::default()
            .title(" Profile ")
            .borders(Borders::ALL)
            .border_style(styles::border_style(true));
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let view = page.view();
    if let Some(lines) = placeholder(&view) {
        let block = Block::default()
            .title(format!(" Profile #{} ", page.user_id()))
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true));
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }
    let PageView::Ready(profile) = view else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_about(frame, app, page, profile, chunks[0]);
    render_reviews(frame, profile, chunks[1]);
}

fn render_about(frame: &mut Frame, app: &App, page: &ProfilePage, profile: &PublicProfile, area: Rect) {
    let user = &profile.user;
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Role: ", styles::highlight_style()),
            Span::raw(user.role_display()),
        ]),
        Line::from(vec![
            Span::styled("Rating: ", styles::highlight_style()),
            Span::raw(user.rating_display()),
        ]),
    ];
    if let Some(ref email) = user.email {
        lines.push(Line::from(vec![
            Span::styled("Email: ", styles::highlight_style()),
            Span::raw(email.clone()),
        ]));
    }
    if user.is_freelancer {
        lines.push(Line::from(vec![
            Span::styled("Completion: ", styles::highlight_style()),
            Span::raw(percent(user.completion_rate)),
            Span::styled("  On time: ", styles::highlight_style()),
            Span::raw(percent(user.on_time_rate)),
        ]));
    }
    lines.push(Line::from(""));

    if page.is_editing() {
        lines.push(Line::from(Span::styled("Edit Profile", styles::title_style())));
        lines.push(field_line("Bio", &page.edit_bio, app.profile_focus == ProfileFocus::Bio, false));
        lines.push(field_line(
            "Skills",
            &page.edit_skills,
            app.profile_focus == ProfileFocus::Skills,
            false,
        ));
        lines.push(Line::from(Span::styled(
            "Skills are comma-separated. [Enter] save | [Esc] cancel",
            styles::muted_style(),
        )));
    } else {
        lines.push(Line::from(Span::styled("Bio", styles::title_style())));
        lines.push(Line::from(user.bio_display().to_string()));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Skills", styles::title_style())));
        let skills = user.skill_list();
        if skills.is_empty() {
            lines.push(Line::from(Span::styled("No skills listed.", styles::muted_style())));
        } else {
            lines.push(Line::from(skills.join(" · ")));
        }
        if page.is_current_user(app.identity()) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("[e] edit profile", styles::muted_style())));
        }
    }

    let block = Block::default()
        .title(format!(" {} ", user.username))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_reviews(frame: &mut Frame, profile: &PublicProfile, area: Rect) {
    let mut lines = Vec::new();
    if profile.reviews_received.is_empty() {
        lines.push(Line::from(Span::styled(" No reviews yet.", styles::muted_style())));
    }
    for review in &profile.reviews_received {
        let mut header = vec![
            Span::styled(review.reviewer_name().to_string(), styles::highlight_style()),
            Span::raw("  "),
            Span::raw(review.rating_display()),
        ];
        if let Some(ref created) = review.created_at {
            header.push(Span::styled(format!("  {}", format_date(created)), styles::muted_style()));
        }
        lines.push(Line::from(header));
        if let Some(ref comment) = review.comment {
            lines.push(Line::from(format!("  {}", comment)));
        }
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .title(format!(" Reviews ({}) ", profile.reviews_received.len()))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
