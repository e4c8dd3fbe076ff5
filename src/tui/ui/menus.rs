//! Filter menu.

use super::layout::{fit_lines_to_area, popup_rect, truncate_with_ellipsis};
use crate::data::FilterField;
use crate::tui::App;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// One row per filter field, showing the value currently applied.
pub fn draw_filter_menu(f: &mut Frame, app: &App) {
    let area = popup_rect(55, 40, 44, 12, f.area());
    f.render_widget(Clear, area);

    let focused = app.filter_menu_field();
    let options = app.state.filter_options();
    let dim_style = Style::default().fg(Color::DarkGray);
    let value_width = area.width.saturating_sub(22) as usize;

    let mut lines = vec![Line::from("")];
    for field in FilterField::ALL {
        let is_focused = focused == Some(field);
        let marker = if is_focused { "▶" } else { " " };
        let label_style = if is_focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let (value, value_style) = match app.state.filters.get(field) {
            Some(v) => (v.to_string(), Style::default().fg(Color::Magenta)),
            None => ("Все".to_string(), dim_style),
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), label_style),
            Span::styled(format!("{:<10}", field.label()), label_style),
            Span::styled("◀ ", dim_style),
            Span::styled(truncate_with_ellipsis(&value, value_width), value_style),
            Span::styled(" ▶", dim_style),
            Span::styled(format!("  ({})", options.values(field).len()), dim_style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  j/k: поле | h/l: значение | c: сбросить | Esc: закрыть",
        dim_style,
    )));

    let block = Block::default()
        .title(" Фильтры ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = block.inner(area);
    let paragraph = Paragraph::new(fit_lines_to_area(lines, inner))
        .block(block)
        .style(Style::default().fg(Color::White));

    f.render_widget(paragraph, area);
}
