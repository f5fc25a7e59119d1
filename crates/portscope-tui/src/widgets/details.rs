//! Details popup — properties of the last activated port.
//!
//! Opened whenever a record is activated; close with `Escape` or `Enter`.

use crate::theme::Theme;
use portscope_core::Record;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph, Widget, Wrap},
};

pub struct DetailsPopup<'a> {
    record: &'a Record,
    theme: &'a Theme,
}

impl<'a> DetailsPopup<'a> {
    pub fn new(record: &'a Record, theme: &'a Theme) -> Self {
        Self { record, theme }
    }
}

impl Widget for DetailsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.record.details();
        let popup = super::centered_rect(56, rows.len() as u16 + 2, area);
        Clear.render(popup, buf);

        let block = Block::bordered()
            .title(" Port (Esc to close) ")
            .border_style(self.theme.border_focused);
        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines: Vec<Line> = rows
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(
                        format!(" {label:<10} "),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(value),
                ])
            })
            .collect();

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}
