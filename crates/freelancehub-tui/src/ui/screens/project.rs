use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use freelancehub_core::models::Project;
use freelancehub_core::pages::{PageView, ProjectPage};
use freelancehub_core::utils::{format_date, format_money, truncate_string};

use crate::app::{App, ProjectFocus};
use crate::ui::styles;

use super::{field_line, placeholder};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(page) = app.project_page.as_ref() else {
        return;
    };

    let view = page.view();
    if let Some(lines) = placeholder(&view) {
        let block = Block::default()
            .title(format!(" Project #{} ", page.project_id()))
            .title_style(styles::title_style())
            .borders(Borders::ALL)
            .border_style(styles::border_style(true));
        frame.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }
    let PageView::Ready(project) = view else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_details(frame, app, page, project, chunks[0]);
    render_bids(frame, app, page, project, chunks[1]);
}

fn render_details(frame: &mut Frame, app: &App, page: &ProjectPage, project: &Project, area: Rect) {
    let viewer = app.identity();
    let status_open = project.status.is_open();

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Status: ", styles::highlight_style()),
            Span::styled(project.status.display_name(), styles::status_style(status_open)),
        ]),
        Line::from(vec![
            Span::styled("Budget: ", styles::highlight_style()),
            Span::raw(format_money(project.budget)),
        ]),
        Line::from(vec![
            Span::styled("Client: ", styles::highlight_style()),
            Span::raw(project.client.username.clone()),
        ]),
    ];

    if let Some(ref created) = project.created_at {
        lines.push(Line::from(vec![
            Span::styled("Posted: ", styles::highlight_style()),
            Span::raw(format_date(created)),
        ]));
    }
    if let Some(ref freelancer) = project.freelancer {
        lines.push(Line::from(vec![
            Span::styled("Freelancer: ", styles::highlight_style()),
            Span::raw(freelancer.username.clone()),
        ]));
    }
    let skills = project.required_skill_list();
    if !skills.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Skills: ", styles::highlight_style()),
            Span::raw(skills.join(", ")),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(project.description.clone()));
    lines.push(Line::from(""));

    if page.shows_already_bid(viewer) {
        lines.push(Line::from(Span::styled(
            "You have already placed a bid on this project.",
            styles::success_style(),
        )));
    } else if page.can_bid(viewer) {
        render_bid_form(&mut lines, app, page);
    } else if viewer.is_none() && status_open {
        lines.push(Line::from(Span::styled(
            "Log in as a freelancer to bid on this project.",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(format!(" {} ", project.title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.project_focus != ProjectFocus::Bids));

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_bid_form(lines: &mut Vec<Line<'static>>, app: &App, page: &ProjectPage) {
    lines.push(Line::from(Span::styled("Place a Bid", styles::title_style())));
    lines.push(field_line(
        "Amount ($)",
        &page.bid_form.amount,
        app.project_focus == ProjectFocus::Amount,
        false,
    ));
    lines.push(field_line(
        "Proposal",
        &page.bid_form.proposal,
        app.project_focus == ProjectFocus::Proposal,
        false,
    ));
    if let Some(ref error) = page.bid_form.error {
        lines.push(Line::from(Span::styled(error.clone(), styles::error_style())));
    }
    if app.project_focus == ProjectFocus::Bids {
        lines.push(Line::from(Span::styled("[b] start bidding", styles::muted_style())));
    } else {
        lines.push(Line::from(Span::styled(
            "[Enter] submit on proposal | [Esc] cancel",
            styles::muted_style(),
        )));
    }
}

fn render_bids(frame: &mut Frame, app: &App, page: &ProjectPage, project: &Project, area: Rect) {
    let focused = app.project_focus == ProjectFocus::Bids;
    let can_accept = page.can_accept_bids(app.identity());

    let items: Vec<ListItem> = project
        .bids
        .iter()
        .enumerate()
        .map(|(i, bid)| {
            let mut header = format!(
                "{:<16} {:>12}",
                truncate_string(&bid.freelancer.username, 16),
                format_money(bid.amount)
            );
            if let Some(days) = bid.proposed_timeline_days {
                header.push_str(&format!("  {}d", days));
            }
            let style = if i == app.bid_selection && focused {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(vec![
                Line::styled(header, style),
                Line::styled(
                    format!("  {}", truncate_string(&bid.proposal, 60)),
                    styles::muted_style(),
                ),
            ])
        })
        .collect();

    let hint = if can_accept { " [a]ccept " } else { "" };
    let block = Block::default()
        .title(format!(" {}{} ", project.bid_count_display(), hint))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    if items.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            " No bids yet.",
            styles::muted_style(),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(app.bid_selection));
    frame.render_stateful_widget(list, area, &mut state);
}
