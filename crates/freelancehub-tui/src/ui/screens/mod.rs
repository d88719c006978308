//! Route-specific content rendering.

pub mod forms;
pub mod home;
pub mod profile;
pub mod project;

use ratatui::text::{Line, Span};

use freelancehub_core::pages::PageView;

use super::styles;

/// Width of the visible part of a text field
const FIELD_WIDTH: usize = 24;

/// One labelled input field, showing the tail of the value when it overflows
pub(crate) fn field_line(label: &str, value: &str, focused: bool, masked: bool) -> Line<'static> {
    let shown: String = if masked {
        "*".repeat(value.chars().count().min(FIELD_WIDTH))
    } else {
        let skip = value.chars().count().saturating_sub(FIELD_WIDTH);
        value.chars().skip(skip).collect()
    };
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::styled(format!("  {:>10}: [", label), styles::muted_style()),
        Span::styled(
            format!("{:<width$}{}", shown, cursor, width = FIELD_WIDTH),
            styles::field_style(focused),
        ),
        Span::styled("]", styles::muted_style()),
    ])
}

pub(crate) fn button_line(label: &str, focused: bool) -> Line<'static> {
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Line::from(vec![
        Span::raw("              ["),
        Span::styled(text, styles::field_style(focused)),
        Span::raw("]"),
    ])
}

/// Lines for a page that is not ready yet, or `None` when there is data to show
pub(crate) fn placeholder<T>(view: &PageView<'_, T>) -> Option<Vec<Line<'static>>> {
    match view {
        PageView::Loading => Some(vec![Line::from(Span::styled(
            "  Loading...",
            styles::muted_style(),
        ))]),
        PageView::Failed(message) => Some(vec![Line::from(Span::styled(
            format!("  {}", message),
            styles::error_style(),
        ))]),
        PageView::Empty => Some(vec![Line::from(Span::styled(
            "  Nothing to show.",
            styles::muted_style(),
        ))]),
        PageView::Ready(_) => None,
    }
}
