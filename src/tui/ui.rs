//! Stateless rendering of a [`ChatView`].

use super::view::{BoardView, ChatView, Entry, HeartView};
use crate::games::tictactoe::{Mark, Position, Square};
use crate::ports::{Anchor, CellFx, InputPrompt};
use crate::script::Sender;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

const KEY_HINTS: &str = "1-9 choose · ←↑→↓ + Enter play · Space tap heart · t tap bubble · q quit";

struct Palette {
    background: Color,
    text: Color,
    received: Color,
    sent: Color,
    accent: Color,
}

impl Palette {
    fn new(night_mode: bool) -> Self {
        if night_mode {
            Self {
                background: Color::Black,
                text: Color::Gray,
                received: Color::Magenta,
                sent: Color::Cyan,
                accent: Color::Yellow,
            }
        } else {
            Self {
                background: Color::Reset,
                text: Color::Reset,
                received: Color::LightMagenta,
                sent: Color::Blue,
                accent: Color::Red,
            }
        }
    }
}

/// Draws the whole chat screen.
pub fn draw(frame: &mut Frame, view: &ChatView) {
    let palette = Palette::new(view.night_mode);
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(palette.background)),
        area,
    );

    let widget_height = match (&view.board, &view.heart, &view.choices) {
        (Some(_), _, _) => 9,
        (None, Some(_), _) => 4,
        (None, None, Some((_, _, labels))) => labels.len() as u16 + 2,
        _ => 0,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Min(5),                // Chat log
            Constraint::Length(widget_height), // Board, heart or choices
            Constraint::Length(3),             // Input field
            Constraint::Length(1),             // Footer
        ])
        .split(area);

    draw_header(frame, chunks[0], view, &palette);
    draw_log(frame, chunks[1], view, &palette);
    if let Some(board) = &view.board {
        draw_board(frame, chunks[2], board, view, &palette);
    } else if let Some(heart) = &view.heart {
        draw_heart(frame, chunks[2], heart, &palette);
    } else if let Some((_, _, labels)) = &view.choices {
        draw_choices(frame, chunks[2], labels, &palette);
    }
    draw_input(frame, chunks[3], view, &palette);
    draw_footer(frame, chunks[4], view, &palette);
}

fn draw_header(frame: &mut Frame, area: Rect, view: &ChatView, palette: &Palette) {
    let mut title = String::from("‹  💌 Valentine");
    if view.character_shown {
        title.push_str("   (👀 someone is peeking)");
    }
    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_log(frame: &mut Frame, area: Rect, view: &ChatView, palette: &Palette) {
    let mut lines: Vec<Line> = view
        .entries
        .iter()
        .map(|entry| match entry {
            Entry::Message { id, text, sender } => {
                let reactions: String = view.reactions_at(Anchor::Element(*id)).collect();
                let text = if reactions.is_empty() {
                    text.clone()
                } else {
                    format!("{text}  {reactions}")
                };
                match sender {
                    Sender::Received => Line::from(Span::styled(
                        text,
                        Style::default().fg(palette.received),
                    )),
                    Sender::Sent => Line::from(Span::styled(
                        text,
                        Style::default().fg(palette.sent),
                    ))
                    .alignment(Alignment::Right),
                    Sender::System => Line::from(Span::styled(
                        text,
                        Style::default().fg(palette.text).add_modifier(Modifier::ITALIC),
                    ))
                    .alignment(Alignment::Center),
                }
            }
            Entry::Notification(text) => Line::from(Span::styled(
                text.clone(),
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Center),
        })
        .collect();

    if let Some((_, heart)) = view.typing {
        let dots = if heart { "• • ♥" } else { "• • •" };
        lines.push(Line::from(Span::styled(
            dots,
            Style::default().fg(Color::DarkGray),
        )));
    }

    // Keep the newest lines in view.
    let skip = lines.len().saturating_sub(area.height as usize);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();
    frame.render_widget(Paragraph::new(visible).wrap(Wrap { trim: false }), area);
}

fn draw_choices(frame: &mut Frame, area: Rect, labels: &[&'static str], palette: &Palette) {
    let lines: Vec<Line> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| Line::from(format!("[{}] {}", i + 1, label)))
        .collect();
    let widget = Paragraph::new(lines)
        .style(Style::default().fg(palette.sent))
        .block(Block::default().borders(Borders::ALL).title("Reply"));
    frame.render_widget(widget, area);
}

fn draw_heart(frame: &mut Frame, area: Rect, heart: &HeartView, palette: &Palette) {
    let pulse = "❤️ ".repeat(heart.taps as usize + 1);
    let widget = Paragraph::new(vec![Line::from(pulse), Line::from(heart.status.clone())])
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.accent))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn draw_board(frame: &mut Frame, area: Rect, board: &BoardView, view: &ChatView, palette: &Palette) {
    let cursor = matches!(view.prompt, Some(InputPrompt::Board(_))).then_some(view.cursor);
    let mut lines = vec![Line::from(Span::styled(
        board.status.clone(),
        Style::default().fg(Color::Yellow),
    ))];

    for row in Position::ALL.chunks(3) {
        let mut spans = Vec::new();
        for (i, pos) in row.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
            }
            spans.push(draw_cell(board, *pos, cursor, view));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(Span::styled(
            "───────────────",
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.pop();

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(palette.text))
        .block(Block::default().borders(Borders::ALL).title("Tic-Tac-Toe"));
    frame.render_widget(widget, area);
}

fn draw_cell<'a>(board: &BoardView, pos: Position, cursor: Option<Position>, view: &ChatView) -> Span<'a> {
    let (symbol, mut style) = match board.board.get(pos) {
        Square::Empty => (format!(" {} ", pos.to_index() + 1), Style::default().fg(Color::DarkGray)),
        Square::Occupied(Mark::Human) => (
            " X ".to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Square::Occupied(Mark::System) => (
            " O ".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    match board.flash {
        Some((flashed, CellFx::Wiggle)) if flashed == pos => {
            style = style.add_modifier(Modifier::SLOW_BLINK);
        }
        Some((flashed, CellFx::Stolen)) if flashed == pos => {
            style = style.bg(Color::Yellow);
        }
        _ => {}
    }
    if cursor == Some(pos) {
        style = style.bg(Color::White).fg(Color::Black);
    }

    let glyph: String = view.reactions_at(Anchor::Cell(pos)).collect();
    Span::styled(format!("{symbol}{glyph}"), style)
}

fn draw_input(frame: &mut Frame, area: Rect, view: &ChatView, palette: &Palette) {
    let (text, style) = match &view.draft {
        Some((draft, true)) => (
            draft.clone(),
            Style::default().fg(palette.text).bg(Color::LightBlue),
        ),
        Some((draft, false)) => (draft.clone(), Style::default().fg(palette.text)),
        None => ("iMessage".to_string(), Style::default().fg(Color::DarkGray)),
    };
    let widget = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, view: &ChatView, palette: &Palette) {
    let text = if view.sheet_open {
        "Report · Block · Mute   (Esc to cancel)".to_string()
    } else if let Some(flourish) = &view.flourish {
        format!("{flourish}   {KEY_HINTS}")
    } else {
        KEY_HINTS.to_string()
    };
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(palette.text)),
        area,
    );
}
