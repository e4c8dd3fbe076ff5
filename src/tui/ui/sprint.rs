//! Header counter cards and the Sprint load tab.

use super::layout::hex_color;
use super::status::StatusConfigurable;
use super::table::{dim, table_lines};
use super::icons;
use crate::data::{CurrentSprintIssues, CurrentSprintStats};
use crate::tui::app::SprintIssuesState;
use crate::tui::App;
use crate::view::sprint::{CapacityNote, Metric, ProgressLevel, SprintLoadCard, SprintLoadDetails};
use crate::view::tables::{sprint_detail, NO_SPRINT_ISSUES};
use crate::workload::ALL_ON_TRACK;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, LineGauge, Paragraph, Wrap},
    Frame,
};

const METRICS_PER_ROW: usize = 4;
const METRIC_HEIGHT: u16 = 5;

fn card(f: &mut Frame, area: Rect, title: &str, value: String, border: Style) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border);
    let text = Line::styled(value, Style::default().add_modifier(Modifier::BOLD)).centered();
    f.render_widget(Paragraph::new(text).block(block), area);
}

/// Counter cards plus the sprint load card.
pub fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
            Constraint::Ratio(1, 5),
        ])
        .split(area);

    let c = &app.counters;
    let border = dim();
    card(f, cells[0], &format!("{} Всего задач", icons::CARD_TOTAL), c.total.to_string(), border);
    card(f, cells[1], &format!("{} Связей", icons::CARD_LINKS), c.total_links.to_string(), border);
    card(
        f,
        cells[2],
        &format!("{} В работе", icons::CARD_IN_PROGRESS),
        c.in_progress.to_string(),
        border,
    );
    card(f, cells[3], &format!("{} Готово", icons::CARD_DONE), c.completed.to_string(), border);

    let load = match &app.sprint_stats {
        Some(stats) => SprintLoadCard::from_stats(stats, &app.config.sprint),
        None => SprintLoadCard::unavailable(),
    };
    let block = Block::default()
        .title(" ⚡ Загрузка спринта ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(hex_color(load.color)));
    let text = Line::from(vec![
        Span::raw(format!("{} ", load.icon)),
        Span::styled(load.percent, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {}", load.sprint_name), dim()),
    ])
    .centered();
    f.render_widget(Paragraph::new(text).block(block), cells[4]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Sprint load tab
// ─────────────────────────────────────────────────────────────────────────────

fn placeholder(f: &mut Frame, area: Rect, text: &str, style: Style) {
    f.render_widget(
        Paragraph::new(Line::styled(text.to_string(), style).centered())
            .block(Block::default().borders(Borders::ALL).border_style(dim())),
        area,
    );
}

fn level_color(level: ProgressLevel) -> Color {
    match level {
        ProgressLevel::Normal => Color::Rgb(102, 126, 234),
        ProgressLevel::Warning => Color::Rgb(243, 156, 18),
        ProgressLevel::Danger => Color::Rgb(231, 76, 60),
    }
}

fn draw_metric(f: &mut Frame, area: Rect, metric: &Metric) {
    let block = Block::default()
        .title(format!(" {} ", metric.title))
        .borders(Borders::ALL)
        .border_style(dim());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    f.render_widget(
        Paragraph::new(Line::styled(
            metric.value.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        rows[0],
    );
    f.render_widget(Paragraph::new(Line::styled(metric.subtext.clone(), dim())), rows[1]);

    if let Some(progress) = &metric.progress {
        let gauge = LineGauge::default()
            .ratio(progress.fill / 100.0)
            .label(progress.label.clone())
            .filled_style(Style::default().fg(level_color(progress.level)))
            .unfilled_style(dim());
        f.render_widget(gauge, rows[2]);
    }
}

fn draw_metrics(f: &mut Frame, area: Rect, metrics: &[Metric]) {
    let row_count = metrics.len().div_ceil(METRICS_PER_ROW);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(METRIC_HEIGHT); row_count])
        .split(area);

    for (chunk, row_area) in metrics.chunks(METRICS_PER_ROW).zip(rows.iter()) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, METRICS_PER_ROW as u32); METRICS_PER_ROW])
            .split(*row_area);
        for (metric, cell) in chunk.iter().zip(cells.iter()) {
            draw_metric(f, *cell, metric);
        }
    }
}

fn recommendation_lines(details: &SprintLoadDetails) -> Vec<Line<'static>> {
    if details.recommendations.is_empty() {
        return vec![Line::styled(
            format!("  {}", ALL_ON_TRACK),
            Style::default().fg(Color::Green),
        )];
    }
    details
        .recommendations
        .iter()
        .map(|r| {
            Line::from(vec![
                Span::raw(format!("  {} ", r.icon)),
                Span::styled(
                    format!("{} ", r.title),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(r.text.clone()),
            ])
        })
        .collect()
}

fn sprint_issue_lines(app: &App, width: u16) -> Vec<Line<'static>> {
    let message = |text: &str, style: Style| vec![Line::styled(text.to_string(), style).centered()];

    let (issues, sprint_name) = match &app.sprint_issues {
        SprintIssuesState::NotLoaded => return message(NO_SPRINT_ISSUES, dim()),
        SprintIssuesState::Loading => return message("Загрузка…", dim()),
        SprintIssuesState::Failed => {
            return message("Ошибка загрузки задач", Style::default().fg(Color::Red))
        }
        SprintIssuesState::Loaded(CurrentSprintIssues::Unavailable { .. }) => {
            return message(NO_SPRINT_ISSUES, dim())
        }
        SprintIssuesState::Loaded(CurrentSprintIssues::Available {
            issues,
            sprint_name,
        }) => (issues, sprint_name.as_deref().unwrap_or_default()),
    };

    let Some(detail) = sprint_detail(issues, sprint_name, &app.config.tracker.browse_url) else {
        return message(NO_SPRINT_ISSUES, dim());
    };

    let mut lines = vec![
        Line::styled(detail.header(), Style::default().add_modifier(Modifier::BOLD)),
        Line::styled(format!("Всего задач: {}", detail.total), dim()),
    ];
    for (bucket, table) in &detail.groups {
        let cfg = bucket.status_class().status_config();
        lines.push(Line::from(""));
        lines.push(Line::styled(
            format!("{} {}", cfg.icon, table.title.clone().unwrap_or_default()),
            cfg.style.add_modifier(Modifier::BOLD),
        ));
        lines.extend(table_lines(table, width));
    }
    lines
}

pub fn draw_sprint_load_tab(f: &mut Frame, app: &App, area: Rect) {
    let stats = match &app.sprint_stats {
        None if app.is_loading() => return placeholder(f, area, "Загрузка…", dim()),
        None => return placeholder(f, area, "Нет данных", dim()),
        Some(CurrentSprintStats::Unavailable { error }) => {
            return placeholder(f, area, &format!("Нет данных: {}", error), dim())
        }
        Some(CurrentSprintStats::Available(stats)) => stats,
    };

    let details = SprintLoadDetails::build(stats, &app.config.sprint);
    let recommendations = recommendation_lines(&details);
    let metric_rows = details.metrics.len().div_ceil(METRICS_PER_ROW) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(metric_rows * METRIC_HEIGHT),
            Constraint::Length(1),
            Constraint::Length(recommendations.len() as u16 + 2),
            Constraint::Min(3),
        ])
        .split(area);

    let band = details.band.status_config();
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", details.title),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("{} {}", band.icon, details.band.label()), band.style),
    ]);
    f.render_widget(Paragraph::new(title), chunks[0]);

    draw_metrics(f, chunks[1], &details.metrics);

    let note_style = match details.capacity_note {
        CapacityNote::Exceeded => Style::default().fg(Color::Red),
        CapacityNote::WithinCapacity => Style::default().fg(Color::Green),
    };
    f.render_widget(
        Paragraph::new(Line::styled(format!(" {}", details.capacity_note.text()), note_style)),
        chunks[2],
    );

    let block = Block::default()
        .title(" 💡 Рекомендации ")
        .borders(Borders::ALL)
        .border_style(dim());
    f.render_widget(
        Paragraph::new(recommendations)
            .block(block)
            .wrap(Wrap { trim: false }),
        chunks[3],
    );

    let block = Block::default().borders(Borders::ALL).border_style(dim());
    let inner = block.inner(chunks[4]);
    let lines = sprint_issue_lines(app, inner.width);
    f.render_widget(Paragraph::new(lines).block(block).scroll((app.scroll, 0)), chunks[4]);
}
