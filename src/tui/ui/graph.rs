//! Links tab: graph toolbar, node list, legend and hover tooltip.

use super::icons;
use super::layout::{display_width, hex_color, tooltip_rect, truncate_with_ellipsis};
use super::table::dim;
use crate::data::LinkDirection;
use crate::format::{or_dash, StatusClass};
use crate::graph::{
    edge_color, node_palette, GraphStatus, NodeShape, HIGHLIGHT_BORDER,
};
use crate::tui::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn draw_toolbar(f: &mut Frame, app: &App, area: Rect) {
    let key = Style::default().fg(Color::Cyan);
    let physics_style = if app.graph.physics() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };
    let line = Line::from(vec![
        Span::styled(" f", key),
        Span::raw(" 📐 По размеру экрана  "),
        Span::styled("p", key),
        Span::raw(" ⚡ Физика: "),
        Span::styled(app.graph.physics_label(), physics_style),
        Span::raw("  "),
        Span::styled("b", key),
        Span::raw(" 🌐 Открыть граф  │  "),
        Span::styled("Узлов: ", dim()),
        Span::raw(app.graph.nodes().len().to_string()),
        Span::styled(" | Связей: ", dim()),
        Span::raw(app.graph.edge_count().to_string()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn node_line(app: &App, index: usize, width: usize, hovered: bool) -> Line<'static> {
    let Some(node) = app.graph.nodes().get(index) else {
        return Line::default();
    };
    let (shape, border_width) = NodeShape::for_type(node.issue_type.as_deref());
    let (background, border) = node_palette(node.status.as_deref());

    let mut key_style = Style::default().fg(hex_color(border));
    if border_width > 2 {
        key_style = key_style.add_modifier(Modifier::BOLD);
    }

    let prefix = format!(" {} {:<12} ", shape.glyph(), node.issue_key);
    let status = format!(" {}", or_dash(node.status.as_deref()));
    let summary_width = width
        .saturating_sub(display_width(&prefix))
        .saturating_sub(display_width(&status));
    let summary = truncate_with_ellipsis(or_dash(node.summary.as_deref()), summary_width);
    let pad = summary_width.saturating_sub(display_width(&summary));

    let mut line = Line::from(vec![
        Span::styled(format!(" {} ", shape.glyph()), Style::default().fg(hex_color(background))),
        Span::styled(format!("{:<12} ", node.issue_key), key_style),
        Span::raw(format!("{}{}", summary, " ".repeat(pad))),
        Span::styled(status, dim()),
    ]);

    if index == app.graph.selected() {
        line = line.style(Style::default().bg(Color::Rgb(40, 44, 52)).add_modifier(Modifier::BOLD));
    } else if hovered {
        line = line.style(Style::default().add_modifier(Modifier::UNDERLINED));
    }
    line
}

fn draw_node_list(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Граф связей задач ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(hex_color(HIGHLIGHT_BORDER)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    match app.graph.status() {
        GraphStatus::NotLoaded | GraphStatus::Loading => {
            f.render_widget(Paragraph::new(Line::styled("Загрузка графа…", dim()).centered()), inner);
            return;
        }
        GraphStatus::Failed(message) => {
            f.render_widget(
                Paragraph::new(Line::styled(message.clone(), Style::default().fg(Color::Red)).centered()),
                inner,
            );
            return;
        }
        GraphStatus::Ready => {}
    }

    app.hits.graph_nodes.set(Some(inner));
    let hovered = app.hovered_node();
    let start = app.graph.scroll.min(app.graph.nodes().len().saturating_sub(1));
    let lines: Vec<Line> = (start..app.graph.nodes().len())
        .take(inner.height as usize)
        .map(|i| node_line(app, i, inner.width as usize, hovered == Some(i)))
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_legend(f: &mut Frame, area: Rect) {
    let swatch = |class: StatusClass, label: &'static str| {
        let status = match class {
            StatusClass::Done => "Готово",
            StatusClass::InProgress => "В работе",
            StatusClass::Open => "Открыто",
            StatusClass::Closed => "",
        };
        let (background, border) = node_palette(Some(status));
        Line::from(vec![
            Span::styled(" ■ ", Style::default().fg(hex_color(background)).bg(hex_color(border))),
            Span::raw(format!(" {}", label)),
        ])
    };
    let edge = |direction: LinkDirection| {
        let arrow = match direction {
            LinkDirection::Inward => icons::LINK_INWARD,
            LinkDirection::Outward => icons::LINK_OUTWARD,
        };
        Line::from(vec![
            Span::styled(
                format!(" ━━{} ", arrow),
                Style::default().fg(hex_color(edge_color(direction))),
            ),
            Span::raw(direction.label()),
        ])
    };

    let lines = vec![
        Line::styled(" Статусы (цвет):", Style::default().add_modifier(Modifier::BOLD)),
        swatch(StatusClass::Done, "Готово"),
        swatch(StatusClass::InProgress, "В работе"),
        swatch(StatusClass::Open, "Открыто"),
        swatch(StatusClass::Closed, "Другое"),
        Line::from(""),
        Line::styled(" Типы задач (форма):", Style::default().add_modifier(Modifier::BOLD)),
        Line::raw(format!(" {} Эпик", NodeShape::Hexagon.glyph())),
        Line::raw(format!(" {} История", NodeShape::Ellipse.glyph())),
        Line::raw(format!(" {} Задача", NodeShape::Box.glyph())),
        Line::from(""),
        Line::styled(" Связи:", Style::default().add_modifier(Modifier::BOLD)),
        edge(LinkDirection::Inward),
        edge(LinkDirection::Outward),
    ];

    let block = Block::default()
        .title(" Легенда ")
        .borders(Borders::ALL)
        .border_style(dim());
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_selected(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Выбранная задача ")
        .borders(Borders::ALL)
        .border_style(dim());
    let text: Vec<Line> = app
        .graph
        .tooltip(app.graph.selected())
        .map(|t| t.lines().map(|l| Line::raw(format!(" {}", l))).collect())
        .unwrap_or_default();
    f.render_widget(Paragraph::new(text).block(block), area);
}

/// Dark tooltip next to the pointer for the hovered node.
fn draw_tooltip(f: &mut Frame, app: &App) {
    let (Some(index), Some(pointer)) = (app.hovered_node(), app.hover) else {
        return;
    };
    let Some(text) = app.graph.tooltip(index) else {
        return;
    };

    let lines: Vec<Line> = text.lines().map(|l| Line::raw(l.to_string())).collect();
    let width = lines.iter().map(Line::width).max().unwrap_or(0).min(60) as u16 + 4;
    let height = lines.len() as u16 + 2;
    let bounds = f.area();
    let area = tooltip_rect(pointer, width, height, bounds);

    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
        .style(Style::default().bg(Color::Rgb(20, 20, 20)).fg(Color::White));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn draw_links_tab(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    draw_toolbar(f, app, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(32)])
        .split(rows[1]);
    draw_node_list(f, app, columns[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(16), Constraint::Min(0)])
        .split(columns[1]);
    draw_legend(f, side[0]);
    draw_selected(f, app, side[1]);

    draw_tooltip(f, app);
}
