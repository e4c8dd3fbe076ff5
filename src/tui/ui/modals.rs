//! Modal popup rendering - alerts and issue details.

use super::layout::{fit_lines_to_area, popup_rect};
use super::status::StatusConfigurable;
use super::table::{dim, table_lines};
use crate::format::{format_hours, or_dash, PriorityClass, StatusClass};
use crate::tui::app::DetailsState;
use crate::tui::{App, ModalState};
use crate::view::tables::issue_links_table;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn draw_alert(f: &mut Frame, message: &str) {
    let area = popup_rect(50, 20, 40, 7, f.area());
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::raw(message.to_string()).centered(),
        Line::from(""),
        Line::styled("Enter / Esc: закрыть", dim()).centered(),
    ];
    let block = Block::default()
        .title(" Внимание ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", label), Style::default().fg(Color::Cyan)),
        Span::raw(value),
    ])
}

pub fn draw_issue_details(f: &mut Frame, app: &App) {
    let ModalState::IssueDetails {
        issue_key,
        details,
        scroll,
    } = &app.modal
    else {
        return;
    };

    let area = popup_rect(80, 80, 60, 16, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", issue_key))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    let lines: Vec<Line> = match details {
        DetailsState::Loading => vec![Line::styled(format!("{} Загрузка…", app.spinner_char()), dim())],
        DetailsState::Failed(err) => vec![Line::styled(
            format!("Не удалось загрузить задачу: {}", err),
            Style::default().fg(Color::Red),
        )],
        DetailsState::Loaded(d) => {
            let issue = &d.issue;
            let status = StatusClass::classify(issue.status.as_deref()).status_config();
            let priority = PriorityClass::classify(issue.priority.as_deref()).status_config();

            let mut lines = vec![
                Line::styled(
                    format!("  {}", or_dash(issue.summary.as_deref())),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::from(""),
                Line::from(vec![
                    Span::styled(format!("  {:<14}", "Статус"), Style::default().fg(Color::Cyan)),
                    Span::styled(
                        format!("{} {}", status.icon, or_dash(issue.status.as_deref())),
                        status.style,
                    ),
                ]),
                field("Тип", or_dash(issue.issue_type.as_deref()).to_string()),
                Line::from(vec![
                    Span::styled(format!("  {:<14}", "Приоритет"), Style::default().fg(Color::Cyan)),
                    Span::styled(or_dash(issue.priority.as_deref()).to_string(), priority.style),
                ]),
                field("Исполнитель", or_dash(issue.assignee.as_deref()).to_string()),
                field("Спринт", or_dash(issue.sprint.as_deref()).to_string()),
                field(
                    "Время",
                    format!(
                        "{} / {}",
                        format_hours(&issue.time_original_estimate),
                        format_hours(&issue.time_spent)
                    ),
                ),
            ];
            if let Some(epic) = &issue.epic_link {
                lines.push(field("Эпик", epic.clone()));
            }
            if !issue.labels.is_empty() {
                lines.push(field("Метки", issue.labels.join(", ")));
            }
            if let Some(updated) = &issue.updated_date {
                lines.push(field("Обновлено", updated.clone()));
            }

            lines.push(Line::from(""));
            let links = issue_links_table(&d.links, &app.config.tracker.browse_url);
            lines.push(Line::styled(
                format!("  {}", links.title.clone().unwrap_or_default()),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            if links.is_empty() {
                lines.push(Line::styled("  Нет связей", dim()));
            } else {
                lines.extend(table_lines(&links, chunks[0].width));
            }
            lines
        }
    };

    f.render_widget(Paragraph::new(lines).scroll((*scroll, 0)), chunks[0]);
    let footer = vec![Line::styled("Enter: открыть в Jira | j/k: прокрутка | Esc: закрыть", dim())];
    f.render_widget(Paragraph::new(fit_lines_to_area(footer, chunks[1])), chunks[1]);
}
