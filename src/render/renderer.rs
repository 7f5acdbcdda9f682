use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::game::{GameConfig, GameState};

/// The three sprites of the game, built once
#[derive(Debug, Clone)]
pub struct Glyphs {
    pub apple: Span<'static>,
    pub body: Span<'static>,
    pub head: Span<'static>,
    pub empty: Span<'static>,
}

impl Glyphs {
    pub fn load() -> Self {
        Self {
            apple: Span::styled(
                "● ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            body: Span::styled("□ ", Style::default().fg(Color::Green)),
            head: Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            empty: Span::styled("  ", Style::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tile {
    Empty,
    Apple,
    Body,
    Head,
}

pub struct Renderer {
    glyphs: Glyphs,
    dot_size: i32,
    cells: i32,
}

impl Renderer {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            glyphs: Glyphs::load(),
            dot_size: config.dot_size,
            cells: config.grid_cells(),
        }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Score
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Controls
            ])
            .split(frame.area());

        frame.render_widget(self.render_score(state), chunks[0]);

        let board = self.board_area(chunks[1]);
        if state.running {
            frame.render_widget(self.render_grid(state), board);
        } else {
            frame.render_widget(self.render_game_over(state), board);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    /// Center a board-sized rectangle inside `area`
    fn board_area(&self, area: Rect) -> Rect {
        let width = ((self.cells * 2 + 2) as u16).min(area.width);
        let height = ((self.cells + 2) as u16).min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }

    fn tiles(&self, state: &GameState) -> Vec<Tile> {
        let cells = self.cells;
        let mut tiles = vec![Tile::Empty; (cells * cells) as usize];
        let index = |(col, row): (i32, i32)| -> Option<usize> {
            let inside = (0..cells).contains(&col) && (0..cells).contains(&row);
            inside.then(|| (row * cells + col) as usize)
        };

        let mut place = |cell: (i32, i32), tile: Tile| {
            if let Some(i) = index(cell) {
                tiles[i] = tile;
            }
        };

        place(state.apple.cell(self.dot_size), Tile::Apple);
        for segment in state.snake.body_segments() {
            place(segment.cell(self.dot_size), Tile::Body);
        }
        place(state.snake.head().cell(self.dot_size), Tile::Head);

        tiles
    }

    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let tiles = self.tiles(state);
        let lines: Vec<Line> = tiles
            .chunks(self.cells as usize)
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|tile| match tile {
                        Tile::Empty => self.glyphs.empty.clone(),
                        Tile::Apple => self.glyphs.apple.clone(),
                        Tile::Body => self.glyphs.body.clone(),
                        Tile::Head => self.glyphs.head.clone(),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .border_style(Style::default().fg(Color::White))
                .title(" Snake "),
        )
    }

    fn render_score(&self, state: &GameState) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Game Over!",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}
