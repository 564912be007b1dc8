//! Rendering of the selector screen

use crate::catalog::{GroupKey, LocationGroup};
use crate::controller::StrategyController;
use crate::domain::DependencyRecord;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState};
use ratatui::Frame;
use std::path::Path;

const NAV_WIDTH: u16 = 24;
const NAV_LABEL_MAX: usize = 16;

const HELP: &str = "w/s group  ↑/↓ move  ←/→ tier  [/] group tier  space select  a all  c clear  e equalize  enter apply  q quit";

pub(super) fn draw(frame: &mut Frame, controller: &StrategyController, root: &Path) {
    let [body, footer] = Layout::vertical([Constraint::Min(3), Constraint::Length(2)])
        .areas(frame.area());
    let [nav, table] =
        Layout::horizontal([Constraint::Length(NAV_WIDTH), Constraint::Min(20)]).areas(body);

    draw_nav(frame, nav, controller, root);
    draw_table(frame, table, controller, root);
    draw_footer(frame, footer, controller);
}

fn selected_in(group: &LocationGroup, controller: &StrategyController) -> usize {
    group
        .members
        .iter()
        .filter_map(|key| controller.catalog().get(key))
        .filter(|record| record.selected)
        .count()
}

/// Shorten a label to `max` characters, keeping its tail
fn truncate_label(label: &str, max: usize) -> String {
    let count = label.chars().count();
    if count <= max {
        return label.to_string();
    }
    let tail: String = label.chars().skip(count - (max - 1)).collect();
    format!("…{}", tail)
}

fn draw_nav(frame: &mut Frame, area: Rect, controller: &StrategyController, root: &Path) {
    let items: Vec<ListItem> = controller
        .groups()
        .iter()
        .map(|group| {
            let label = truncate_label(&group.key.label(root), NAV_LABEL_MAX);
            let selected = selected_in(group, controller);
            let count = if selected > 0 {
                format!(" ({})", selected)
            } else {
                String::new()
            };
            let style = match group.key {
                GroupKey::Shared => Style::default().fg(Color::Magenta),
                GroupKey::Location(_) => Style::default(),
            };
            ListItem::new(Line::from(vec![
                Span::styled(label, style),
                Span::styled(count, Style::default().fg(Color::Green)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::RIGHT).title("Package"))
        .highlight_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("› ");

    let mut state = ListState::default();
    state.select(Some(controller.active_group_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn record_row<'a>(
    record: &'a DependencyRecord,
    controller: &StrategyController,
    root: &Path,
) -> Row<'a> {
    let mark = if record.selected {
        Span::styled("✔", Style::default().fg(Color::Green))
    } else {
        Span::raw(" ")
    };

    let name_style = if record.selected {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let current_style = if controller.has_diverging_versions(&record.name) {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    let target_style = if controller.is_at_target(record) {
        Style::default()
    } else {
        Style::default().fg(Color::Cyan)
    };

    let tier_style = if controller.has_higher_tier_available(record) {
        Style::default().fg(Color::Magenta)
    } else {
        Style::default().fg(Color::Yellow)
    };

    let location = GroupKey::Location(record.manifest_dir.clone()).label(root);

    Row::new(vec![
        Cell::from(mark),
        Cell::from(Span::styled(record.name.as_str(), name_style)),
        Cell::from(Span::styled(record.current_range.as_str(), current_style)),
        Cell::from(Span::styled(record.display_version(), target_style)),
        Cell::from(Span::styled(record.target_tier.label(), tier_style)),
        Cell::from(Span::styled(location, Style::default().fg(Color::DarkGray))),
    ])
}

fn draw_table(frame: &mut Frame, area: Rect, controller: &StrategyController, root: &Path) {
    let records = controller.active_records();
    let rows: Vec<Row> = records
        .iter()
        .map(|record| record_row(record, controller, root))
        .collect();

    let header = Row::new(["", "Name", "Current", "Target", "Strategy", "Location"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let widths = [
        Constraint::Length(2),
        Constraint::Length(32),
        Constraint::Length(14),
        Constraint::Length(19),
        Constraint::Length(12),
        Constraint::Min(8),
    ];

    let title = controller
        .active_group()
        .map(|group| format!(" {} ", group.key.label(root)))
        .unwrap_or_default();

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = TableState::default();
    if !records.is_empty() {
        state.select(Some(controller.cursor()));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_footer(frame: &mut Frame, area: Rect, controller: &StrategyController) {
    let selected = controller.selected_snapshot().len();
    let lines = vec![
        Line::from(Span::styled(
            format!(
                "{} selected of {}",
                selected,
                controller.catalog().len()
            ),
            Style::default().fg(Color::Green),
        )),
        Line::from(Span::styled(HELP, Style::default().fg(Color::DarkGray))),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}
