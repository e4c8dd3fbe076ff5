//! Status configuration, the tab bar, the status bar and the help popup.

use super::icons;
use super::layout::{display_width, fit_lines_to_area, hex_color, popup_rect};
use crate::format::{PriorityClass, StatusClass};
use crate::tui::{App, Tab};
use crate::workload::WorkloadBand;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Unified status configuration - single source of truth for icon and style.
pub struct StatusConfig {
    pub icon: &'static str,
    pub style: Style,
}

/// Trait for types that can provide their display configuration (icon + style).
pub trait StatusConfigurable {
    fn status_config(&self) -> StatusConfig;
}

impl StatusConfigurable for StatusClass {
    fn status_config(&self) -> StatusConfig {
        match self {
            StatusClass::InProgress => StatusConfig {
                icon: icons::STATUS_IN_PROGRESS,
                style: Style::default().fg(Color::Blue),
            },
            StatusClass::Done => StatusConfig {
                icon: icons::STATUS_DONE,
                style: Style::default().fg(Color::Green),
            },
            StatusClass::Open => StatusConfig {
                icon: icons::STATUS_OPEN,
                style: Style::default().fg(Color::Yellow),
            },
            StatusClass::Closed => StatusConfig {
                icon: icons::STATUS_CLOSED,
                style: Style::default().fg(Color::DarkGray),
            },
        }
    }
}

impl StatusConfigurable for PriorityClass {
    fn status_config(&self) -> StatusConfig {
        match self {
            PriorityClass::High => StatusConfig {
                icon: icons::PRIORITY_HIGH,
                style: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            },
            PriorityClass::Medium => StatusConfig {
                icon: icons::PRIORITY_MEDIUM,
                style: Style::default().fg(Color::Yellow),
            },
            PriorityClass::Low => StatusConfig {
                icon: icons::PRIORITY_LOW,
                style: Style::default().fg(Color::Green),
            },
            PriorityClass::None => StatusConfig {
                icon: icons::PRIORITY_NONE,
                style: Style::default().fg(Color::DarkGray),
            },
        }
    }
}

impl StatusConfigurable for WorkloadBand {
    fn status_config(&self) -> StatusConfig {
        StatusConfig {
            icon: self.icon(),
            style: Style::default()
                .fg(hex_color(self.color()))
                .add_modifier(Modifier::BOLD),
        }
    }
}

fn status_legend() -> Vec<Line<'static>> {
    let entry = |class: StatusClass, label: &'static str| {
        let cfg = class.status_config();
        Line::from(vec![
            Span::styled(format!("  {}  ", cfg.icon), cfg.style),
            Span::raw(label),
        ])
    };
    let priority = |class: PriorityClass, label: &'static str| {
        let cfg = class.status_config();
        Line::from(vec![
            Span::styled(format!("  {} ", cfg.icon), cfg.style),
            Span::raw(label),
        ])
    };
    vec![
        Line::from("  СТАТУСЫ"),
        entry(StatusClass::InProgress, "В работе"),
        entry(StatusClass::Open, "Открыто"),
        entry(StatusClass::Done, "Готово"),
        entry(StatusClass::Closed, "Другое"),
        Line::from(""),
        Line::from("  ПРИОРИТЕТ"),
        priority(PriorityClass::High, "Высокий"),
        priority(PriorityClass::Medium, "Средний"),
        priority(PriorityClass::Low, "Низкий"),
    ]
}

const SHORTCUTS: &[(&str, &str)] = &[
    ("1-4 / Tab", "Переключить вкладку"),
    ("j/k ↑/↓", "Навигация"),
    ("gg / G", "В начало / в конец"),
    ("Ctrl+d/u", "Страница вниз / вверх"),
    ("Enter", "Открыть задачу в Jira"),
    ("o", "Связи задачи"),
    ("/", "Поиск"),
    ("f", "Фильтры (Связи: по размеру экрана)"),
    ("s1-s5", "Сортировка: ключ, описание, исполнитель, оценка, затрачено"),
    ("c", "Сбросить фильтры"),
    ("S", "Мои SEO задачи"),
    ("p / b", "Физика графа / открыть граф в браузере"),
    ("r", "Обновить"),
    ("q", "Выход"),
];

/// Draw the tab bar and record each tab's area for mouse clicks.
pub fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    let mut x = area.x + 1;
    let mut hits = app.hits.tabs.borrow_mut();

    for (i, tab) in Tab::ALL.iter().enumerate() {
        let label = format!(" {} {} ", i + 1, tab.title());
        let width = display_width(&label) as u16;
        let style = if *tab == app.tab {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        hits.push((Rect::new(x, area.y, width, 1).intersection(area), *tab));
        spans.push(Span::styled(label, style));
        x = x.saturating_add(width);

        if i + 1 < Tab::ALL.len() {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
            x = x.saturating_add(3);
        }
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the status bar at the bottom of the screen.
pub fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let width = area.width as usize;

    let mut spans = Vec::new();
    if app.is_loading() {
        spans.push(Span::styled(
            format!(" {} Загрузка… ", app.spinner_char()),
            Style::default().fg(Color::Yellow),
        ));
    }

    if let Some(err) = &app.error_message {
        spans.push(Span::styled(format!(" {} ", err), Style::default().fg(Color::Red)));
    } else if app.state.search_mode {
        let text = if width >= 55 {
            " Введите запрос | Enter: применить | Esc: сбросить "
        } else {
            " Поиск "
        };
        spans.push(Span::styled(text, Style::default().fg(Color::Yellow)));
    } else {
        if let Some(synced) = app.state.last_synced() {
            spans.push(Span::styled(
                format!(" Последняя синхронизация: {} ", synced),
                Style::default().fg(Color::Gray),
            ));
        }
        let hints = match app.tab {
            Tab::Issues if width >= 120 => {
                " │ j/k: навигация | Enter: Jira | o: связи | /: поиск | f: фильтры | s1-5: сортировка | ?: помощь "
            }
            Tab::Links if width >= 110 => {
                " │ j/k: узлы | Enter: Jira | p: физика | f: по размеру | b: в браузере | ?: помощь "
            }
            _ if width >= 70 => " │ Tab: вкладки | r: обновить | ?: помощь ",
            _ => " ? ",
        };
        spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the help popup.
pub fn draw_help_popup(f: &mut Frame) {
    let area = popup_rect(65, 80, 40, 12, f.area());
    f.render_widget(Clear, area);

    let key_style = Style::default().fg(Color::Cyan);
    let mut lines = vec![Line::from("  КЛАВИШИ")];
    for (keys, action) in SHORTCUTS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", keys), key_style),
            Span::raw(*action),
        ]));
    }
    lines.push(Line::from(""));
    lines.extend(status_legend());
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Esc: закрыть",
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title(" Помощь ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    let lines = fit_lines_to_area(lines, inner);
    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(Color::White));

    f.render_widget(paragraph, area);
}
