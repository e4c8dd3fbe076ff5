//! Table rendering: the issues tab, the sprint summaries and the shared
//! drawing of [`view::Table`] nodes.

use super::icons;
use super::layout::{display_width, fit_column_widths, fit_line_to_width, COLUMN_SPACING};
use super::status::StatusConfigurable;
use crate::data::{FilterField, IssuesPanel};
use crate::format::RowClass;
use crate::tui::app::HitAreas;
use crate::tui::App;
use crate::view::{self, tables};
use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState},
    Frame,
};

pub fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn link_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}

fn header_style() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(Color::Rgb(102, 126, 234))
        .add_modifier(Modifier::BOLD)
}

fn row_style(class: RowClass) -> Style {
    match class {
        RowClass::Story => Style::default().fg(Color::Rgb(170, 220, 170)),
        RowClass::Epic => Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
        RowClass::Default => Style::default(),
    }
}

pub fn cell_line(cell: &view::Cell) -> Line<'static> {
    match cell {
        view::Cell::Text(text) => Line::raw(text.clone()),
        view::Cell::Link(link) => Line::styled(link.text.clone(), link_style()),
        view::Cell::Links(links) if links.is_empty() => Line::styled("-", dim()),
        view::Cell::Links(links) => {
            let mut spans = Vec::with_capacity(links.len() * 2);
            for (i, link) in links.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(" "));
                }
                spans.push(Span::styled(link.text.clone(), link_style()));
            }
            Line::from(spans)
        }
        view::Cell::Badge { text, class } => {
            let cfg = class.status_config();
            Line::from(Span::styled(format!("{} {}", cfg.icon, text), cfg.style))
        }
        view::Cell::Priority { text, class } => {
            Line::from(Span::styled(text.clone(), class.status_config().style))
        }
    }
}

/// Widest content per column, header included.
fn natural_widths(headers: &[String], body: &[Vec<Line<'_>>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            body.iter()
                .filter_map(|cells| cells.get(i))
                .map(Line::width)
                .max()
                .unwrap_or(0)
                .max(display_width(header))
        })
        .collect()
}

/// Render a table node into a bordered block.
///
/// With `state` the rows are selectable. With `hits` the sortable header
/// cells and the row area are recorded for mouse clicks.
pub fn draw_table(
    f: &mut Frame,
    area: Rect,
    table: &view::Table,
    empty: &str,
    state: Option<&mut TableState>,
    hits: Option<&HitAreas>,
) {
    let title = table
        .title
        .as_deref()
        .map(|t| format!(" {} ", t))
        .unwrap_or_default();
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(dim());
    let inner = block.inner(area);

    if table.is_empty() {
        let text = Line::styled(empty.to_string(), dim()).centered();
        f.render_widget(Paragraph::new(text).block(block), area);
        return;
    }

    let marker = if state.is_some() {
        display_width(icons::SELECTED) as u16
    } else {
        0
    };
    let headers: Vec<String> = table.columns.iter().map(view::Column::header).collect();
    let body: Vec<Vec<Line<'static>>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(cell_line).collect())
        .collect();
    let widths = fit_column_widths(
        &natural_widths(&headers, &body),
        inner.width.saturating_sub(marker) as usize,
    );

    if let Some(hits) = hits {
        let mut header_hits = hits.headers.borrow_mut();
        let mut x = inner.x + marker;
        for (column, width) in table.columns.iter().zip(&widths) {
            if let Some(sort) = column.sort {
                header_hits.push((Rect::new(x, inner.y, *width, 1).intersection(inner), sort));
            }
            x = x.saturating_add(*width + COLUMN_SPACING);
        }
        hits.issue_rows.set(Some(Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        }));
    }

    let header = Row::new(headers.into_iter().map(Cell::from)).style(header_style());
    let rows = table
        .rows
        .iter()
        .zip(body)
        .map(|(row, cells)| Row::new(cells.into_iter().map(Cell::from)).style(row_style(row.class)));

    let widget = Table::new(rows, widths.iter().map(|w| Constraint::Length(*w)))
        .header(header)
        .block(block)
        .column_spacing(COLUMN_SPACING)
        .flex(Flex::Start)
        .row_highlight_style(
            Style::default()
                .bg(Color::Rgb(40, 44, 52))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(icons::SELECTED)
        .highlight_spacing(if marker > 0 {
            HighlightSpacing::Always
        } else {
            HighlightSpacing::Never
        });

    match state {
        Some(state) => f.render_stateful_widget(widget, area, state),
        None => f.render_widget(widget, area),
    }
}

/// Flatten a table node into text lines, for tables inside scrolling panels.
pub fn table_lines(table: &view::Table, width: u16) -> Vec<Line<'static>> {
    let headers: Vec<String> = table.columns.iter().map(view::Column::header).collect();
    let body: Vec<Vec<Line<'static>>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(cell_line).collect())
        .collect();
    let widths = fit_column_widths(&natural_widths(&headers, &body), width as usize);

    let join = |cells: Vec<Line<'static>>, style: Style| -> Line<'static> {
        let mut spans = Vec::new();
        for (i, (cell, w)) in cells.into_iter().zip(&widths).enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let w = *w as usize;
            let cell = fit_line_to_width(cell, w);
            let pad = w.saturating_sub(cell.width());
            spans.extend(cell.spans);
            spans.push(Span::raw(" ".repeat(pad)));
        }
        Line::from(spans).style(style)
    };

    let mut lines = vec![join(headers.into_iter().map(Line::raw).collect(), header_style())];
    for (row, cells) in table.rows.iter().zip(body) {
        lines.push(join(cells, row_style(row.class)));
    }
    lines
}

// ─────────────────────────────────────────────────────────────────────────────
// Issues tab
// ─────────────────────────────────────────────────────────────────────────────

fn filter_summary(app: &App) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for field in FilterField::ALL {
        if let Some(value) = app.state.filters.get(field) {
            spans.push(Span::styled(format!("{}: ", field.label()), dim()));
            spans.push(Span::styled(
                format!("{}  ", value),
                Style::default().fg(Color::Magenta),
            ));
        }
    }
    spans
}

fn draw_search_line(f: &mut Frame, app: &App, area: Rect, shown: usize) {
    let query_style = if app.state.search_mode {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    };
    let cursor = if app.state.search_mode { "▏" } else { "" };

    let mut spans = vec![
        Span::raw(format!(" {} ", icons::SEARCH)),
        if app.state.search_query.is_empty() && !app.state.search_mode {
            Span::styled("Поиск по ключу, описанию, исполнителю (/)", dim())
        } else {
            Span::styled(format!("{}{}", app.state.search_query, cursor), query_style)
        },
        Span::raw("   "),
    ];
    if app.state.filters.is_active() {
        spans.push(Span::styled(format!("{} ", icons::FILTER), dim()));
        spans.extend(filter_summary(app));
    }
    spans.push(Span::styled(
        format!("Показано {} из {}", shown, app.state.issues.len()),
        dim(),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn draw_issues_tab(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let browse = &app.config.tracker.browse_url;
    let table = match &app.state.panel {
        IssuesPanel::Issues => {
            let visible = app.state.visible_issues();
            draw_search_line(f, app, chunks[0], visible.len());
            let mut table = tables::issues_table(&visible, &app.state.sort, browse);
            table.title = Some(format!("Задачи ({})", visible.len()));
            table
        }
        IssuesPanel::SeoTasks(tasks) => {
            let hint = Line::from(vec![
                Span::raw(" "),
                Span::styled("SEO задачи. Любая сортировка, фильтр или поиск вернёт список задач", dim()),
            ]);
            f.render_widget(Paragraph::new(hint), chunks[0]);
            tables::seo_table(tasks, browse).unwrap_or_default()
        }
    };

    let empty = if app.is_loading() && app.state.issues.is_empty() {
        "Загрузка…"
    } else {
        "Задачи не найдены"
    };
    let mut state = app.issues_table.borrow_mut();
    draw_table(f, chunks[1], &table, empty, Some(&mut *state), Some(&app.hits));
}

// ─────────────────────────────────────────────────────────────────────────────
// Sprints tab
// ─────────────────────────────────────────────────────────────────────────────

pub fn draw_sprints_tab(f: &mut Frame, app: &App, area: Rect) {
    let Some(stats) = &app.state.statistics else {
        let text = if app.is_loading() { "Загрузка…" } else { "Нет данных" };
        f.render_widget(
            Paragraph::new(Line::styled(text, dim()).centered())
                .block(Block::default().borders(Borders::ALL).border_style(dim())),
            area,
        );
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(columns[1]);

    // j/k scroll the sprint list
    let mut sprint_state = TableState::default().with_offset(app.scroll as usize);
    draw_table(
        f,
        columns[0],
        &tables::sprint_summary_table(&stats.by_sprint),
        "Нет спринтов",
        Some(&mut sprint_state),
        None,
    );
    draw_table(
        f,
        right[0],
        &tables::status_summary_table(&stats.by_status),
        "Нет данных",
        None,
        None,
    );
    draw_table(
        f,
        right[1],
        &tables::type_summary_table(&stats.by_type),
        "Нет данных",
        None,
        None,
    );
}
