//! Stateless UI rendering for the Othello board.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::app::App;
use crate::game::{BOARD_SIZE, Cell, Coord};
use crate::render::BoardView;

const BOARD_WIDTH: u16 = 3 + 3 * BOARD_SIZE as u16 + 2;
const BOARD_HEIGHT: u16 = BOARD_SIZE as u16 + 3;

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(BOARD_HEIGHT), // Board
            Constraint::Length(3), // Counters and status
            Constraint::Length(1), // Help
        ])
        .split(area);

    let title = Paragraph::new("Strictly Othello")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    match app.view() {
        Some(view) => {
            draw_board(frame, chunks[1], view, app.cursor());
            draw_status(frame, chunks[2], view);
        }
        None => {
            let waiting = Paragraph::new("Connecting to server...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(waiting, chunks[1]);
        }
    }

    let help = Paragraph::new("arrows move  enter place  r reset  q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);

    if app.thinking() {
        draw_popup(frame, area, "AI", "AI is thinking...", Color::Magenta);
    }
    if let Some(notice) = app.notice() {
        draw_popup(
            frame,
            area,
            "Notice",
            &format!("{}\n\nPress any key", notice),
            Color::Yellow,
        );
    }
}

fn draw_board(frame: &mut Frame, area: Rect, view: &BoardView, cursor: Coord) {
    let board_area = center_rect(area, BOARD_WIDTH, BOARD_HEIGHT);

    let mut lines = Vec::with_capacity(BOARD_SIZE + 1);
    let header: String = (0..BOARD_SIZE).map(|y| format!(" {} ", y)).collect();
    lines.push(Line::from(Span::styled(
        format!("   {}", header),
        Style::default().fg(Color::DarkGray),
    )));

    for x in 0..BOARD_SIZE as u8 {
        let mut spans = vec![Span::styled(
            format!(" {} ", x),
            Style::default().fg(Color::DarkGray),
        )];
        for y in 0..BOARD_SIZE as u8 {
            if let Some(coord) = Coord::new(x, y) {
                spans.push(cell_span(view, coord, coord == cursor));
            }
        }
        lines.push(Line::from(spans));
    }

    let board = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(board, board_area);
}

fn cell_span(view: &BoardView, coord: Coord, selected: bool) -> Span<'static> {
    let cell = view.cell(coord);
    let (symbol, base_style) = match (cell.stone, cell.marker) {
        (Cell::Black, _) => (" ● ", Style::default().fg(Color::Black).bg(Color::Green)),
        (Cell::White, _) => (" ○ ", Style::default().fg(Color::White).bg(Color::Green)),
        (Cell::Empty, true) => (" · ", Style::default().fg(Color::Yellow).bg(Color::Green)),
        (Cell::Empty, false) => ("   ", Style::default().bg(Color::Green)),
    };

    let style = if selected {
        base_style.bg(Color::LightCyan).add_modifier(Modifier::BOLD)
    } else {
        base_style
    };
    Span::styled(symbol, style)
}

fn draw_status(frame: &mut Frame, area: Rect, view: &BoardView) {
    let text = Line::from(vec![
        Span::styled(
            format!("● {}", view.black_count()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("○ {}", view.white_count()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(view.status().to_string(), Style::default().fg(Color::Yellow)),
    ]);

    let status = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

fn draw_popup(frame: &mut Frame, area: Rect, title: &str, text: &str, color: Color) {
    let popup_area = center_rect(area, 44, 7);
    frame.render_widget(Clear, popup_area);

    let popup = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(popup, popup_area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Length(area.height.saturating_sub(height) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(area.width.saturating_sub(width) / 2),
            Constraint::Length(width),
            Constraint::Length(area.width.saturating_sub(width) / 2),
        ])
        .split(vert[1])[1]
}
