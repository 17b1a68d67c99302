//! The game renderer functions.

use crate::app::AppGame;
use fuse_rs::{ActionKind, CellSnapshot, Coord, Fuse, FuseStep, GameStatus, Highlight, Player, Snapshot};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::Frame,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Row, Table, Widget},
};
use std::collections::BTreeSet;

/// The number of terminal rows that a single cell occupies (including the borders).
const CELL_HEIGHT: u16 = 3;
/// The number of terminal columns that a single cell occupies (including the borders).
const CELL_WIDTH: u16 = 7;
/// The gap between two rows of cells, where the vertical fuses are drawn.
const CONNECTOR_HEIGHT: u16 = 1;
/// The gap between two columns of cells, where the horizontal fuses are drawn.
const CONNECTOR_WIDTH: u16 = 3;

const BOMB_SYMBOL: &str = "💣";
const FUSE_RIGHT_SYMBOL: &str = "─>─";
const FUSE_LEFT_SYMBOL: &str = "─<─";
const FUSE_HORIZONTAL_BOTH_SYMBOL: &str = "<─>";
const FUSE_DOWN_SYMBOL: &str = "↓";
const FUSE_UP_SYMBOL: &str = "↑";
const FUSE_VERTICAL_BOTH_SYMBOL: &str = "↕";

const PLAYER_X_BG_COLOR: Color = Color::Rgb(255, 224, 178);
const PLAYER_O_BG_COLOR: Color = Color::Rgb(224, 224, 224);
const CELL_COLOR: Color = Color::Black;
const CELL_PALE_COLOR: Color = Color::Gray;
const CURSOR_COLOR: Color = Color::Blue;
const PLACE_HIGHLIGHT_COLOR: Color = Color::DarkGray;
const BOMB_HIGHLIGHT_COLOR: Color = Color::LightRed;
const FUSE_FROM_HIGHLIGHT_COLOR: Color = Color::Magenta;
const FUSE_SELECTED_FROM_HIGHLIGHT_COLOR: Color = Color::Red;
const FUSE_TO_HIGHLIGHT_COLOR: Color = Color::LightMagenta;
const WINNING_COLOR: Color = Color::Green;
const EXPLOSION_COLOR: Color = Color::LightRed;
const FUSE_COLOR: Color = Color::Rgb(139, 69, 19);
const BURNING_FUSE_COLOR: Color = Color::Red;
const BOARD_BORDER_COLOR: Color = Color::DarkGray;
const OUTCOME_POPUP_WIN_BORDER_COLOR: Color = Color::Green;
const OUTCOME_POPUP_DRAW_BORDER_COLOR: Color = Color::Yellow;
const LEAVE_CONFIRMATION_POPUP_BORDER_COLOR: Color = Color::Red;
const INFO_WIDGET_BLOCK_COLOR: Color = Color::DarkGray;
const REGULAR_TEXT_COLOR: Color = Color::Black;
const LEGEND_TEXT_COLOR: Color = Color::DarkGray;

const LEGEND_TEXT: [&str; 5] = [
    "[↑][←][↓][→] / [w][a][s][d] / [i][j][k][l]: move the cursor",
    "[SPACE] / [ENTER]: act on the selected cell",
    "[m] / [b] / [f]: place markers / bombs / fuses",
    "[r]: start a new game",
    "[q] / [ESC]: leave",
];
const EXPLOSION_STATUS_TEXT: &str = "BOOM!";
const OUTCOME_POPUP_TEXT: [&str; 4] = [
    "",
    "Use:",
    "[SPACE] / [ENTER] to start a new game",
    "[q] / [ESC] to leave",
];
const LEAVE_CONFIRMATION_POPUP_TEXT: [&str; 6] = [
    "Are you sure you want to quit?",
    "The game shall not be saved!",
    "",
    "Use:",
    "[SPACE] / [ENTER] - CONFIRM",
    "[q] / [ESC] - CANCEL",
];

pub fn render_game(app: &AppGame, frame: &mut Frame) {
    let snapshot = app.game.snapshot();

    // the root container is the whole terminal rectangle
    let root_container = frame.size();

    // the app layout consists of the board, stats and legend containers
    let (board_container, (status_info_container, action_info_container, fuses_info_container), legend_container) =
        create_app_layout(&root_container);

    let grid_container = center(&board_container, grid_height() + 2, grid_width() + 2);
    let grid = build_grid_layout(&inner(&grid_container));

    let (exploding_cells, burning_fuses) = match &app.playback {
        Some(playback) => (playback.exploding_cells(), playback.burning_fuses()),
        None => (BTreeSet::new(), Vec::new()),
    };

    // 1. Render the terminal background in the current player's color
    frame.render_widget(
        Block::default().bg(player_color(snapshot.current_player)),
        root_container,
    );

    // 2. Render the border around the board
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(Style::default().fg(BOARD_BORDER_COLOR)),
        grid_container,
    );

    // 3. Render the cells and the fuses between them
    grid.iter().enumerate().for_each(|(grid_row, row)| {
        row.iter().enumerate().for_each(|(grid_column, container)| {
            let (row_index, column_index) = ((grid_row / 2) as u8, (grid_column / 2) as u8);

            match (grid_row % 2, grid_column % 2) {
                (0, 0) => {
                    let coord = (row_index, column_index);

                    if let Some(cell) = snapshot.cell(coord) {
                        let widget = build_cell_widget(
                            cell,
                            app.cursor_position == coord && !snapshot.is_game_over(),
                            exploding_cells.contains(&coord),
                        );
                        frame.render_widget(widget, *container);
                    }
                }
                (0, 1) => frame.render_widget(
                    build_connector_widget(
                        &snapshot,
                        &burning_fuses,
                        (row_index, column_index),
                        (row_index, column_index + 1),
                    ),
                    *container,
                ),
                (1, 0) => frame.render_widget(
                    build_connector_widget(
                        &snapshot,
                        &burning_fuses,
                        (row_index, column_index),
                        (row_index + 1, column_index),
                    ),
                    *container,
                ),
                _ => {}
            }
        });
    });

    // 4. Render the stats
    let status_text = if app.playback.is_some() {
        EXPLOSION_STATUS_TEXT.to_string()
    } else {
        snapshot.status_line()
    };
    frame.render_widget(build_info_widget(status_text, "Status"), status_info_container);
    frame.render_widget(
        build_info_widget(describe_action(&snapshot), "Action"),
        action_info_container,
    );
    frame.render_widget(
        build_info_widget(snapshot.fuses.len().to_string(), "Fuses"),
        fuses_info_container,
    );

    // 5. Render the legend
    frame.render_widget(build_legend_widget(), legend_container);

    // 6. Render the outcome popup in case the game has ended and the explosion (if any) is over
    if app.playback.is_none() {
        let outcome = match snapshot.status {
            GameStatus::Won { .. } => Some(OUTCOME_POPUP_WIN_BORDER_COLOR),
            GameStatus::Draw => Some(OUTCOME_POPUP_DRAW_BORDER_COLOR),
            GameStatus::InProgress => None,
        };

        if let Some(border_color) = outcome {
            let lines: Vec<_> = [snapshot.status_line()]
                .into_iter()
                .chain(OUTCOME_POPUP_TEXT.iter().map(|line| line.to_string()))
                .collect();

            render_popup(frame, lines, border_color);
        }
    }

    // 7. Render the leave confirmation popup in case the leave has been requested
    if app.awaiting_leave_confirmation {
        render_popup(
            frame,
            LEAVE_CONFIRMATION_POPUP_TEXT.map(|line| line.to_string()),
            LEAVE_CONFIRMATION_POPUP_BORDER_COLOR,
        );
    }
}

fn player_color(player: Player) -> Color {
    match player {
        Player::X => PLAYER_X_BG_COLOR,
        Player::O => PLAYER_O_BG_COLOR,
    }
}

fn describe_action(snapshot: &Snapshot) -> String {
    match (snapshot.action, snapshot.fuse_step) {
        (ActionKind::PlaceMarker, _) => "Place a marker".to_string(),
        (ActionKind::PlaceBomb, _) => "Place a bomb".to_string(),
        (ActionKind::PlaceFuse, Some(FuseStep::SelectTo((row, column)))) => {
            format!("Fuse from {row},{column}: pick the end")
        }
        (ActionKind::PlaceFuse, _) => "Fuse: pick the start".to_string(),
    }
}

/// The total height of the cells and the gaps between them.
fn grid_height() -> u16 {
    let size = fuse_rs::BOARD_SIZE as u16;
    size * CELL_HEIGHT + (size - 1) * CONNECTOR_HEIGHT
}

/// The total width of the cells and the gaps between them.
fn grid_width() -> u16 {
    let size = fuse_rs::BOARD_SIZE as u16;
    size * CELL_WIDTH + (size - 1) * CONNECTOR_WIDTH
}

/// The method creates the base layout of the application: the board, some information on the ongoing game and the
/// controls-legend.
fn create_app_layout(container: &Rect) -> (Rect, (Rect, Rect, Rect), Rect) {
    // the stats container's height is 3 rows: 2 for borders and one for the contents
    let stats_container_height = 3;
    let legend_container_height = LEGEND_TEXT.len() as u16;
    // the board container's height is all that's left
    let board_container_height = container
        .height
        .saturating_sub(stats_container_height + legend_container_height);

    let app_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            board_container_height,
            stats_container_height,
            legend_container_height,
        ]))
        .split(*container)
        .to_vec();

    let stats_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([10, 80, 10]))
        .split(app_layout[1])[1];

    let info_containers = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([40, 40, 20]))
        .split(stats_container)
        .to_vec();

    let legend_container = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_percentages([5, 90, 5]))
        .split(app_layout[2])[1];

    (
        app_layout[0],
        (info_containers[0], info_containers[1], info_containers[2]),
        legend_container,
    )
}

/// Carves a rectangle of the given size out of the middle of the container (or the whole container if it's smaller).
fn center(container: &Rect, height: u16, width: u16) -> Rect {
    let remainder_height = container.height.saturating_sub(height);
    let remainder_width = container.width.saturating_sub(width);

    let row = Layout::default()
        .direction(Direction::Vertical)
        .constraints(Constraint::from_lengths([
            remainder_height / 2,
            height,
            remainder_height - remainder_height / 2,
        ]))
        .split(*container)[1];

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(Constraint::from_lengths([
            remainder_width / 2,
            width,
            remainder_width - remainder_width / 2,
        ]))
        .split(row)[1]
}

/// The container without its one-character border.
fn inner(container: &Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(*container)
}

/// The grid layout is what's used to display the cells of the board and the fuses between them.
///
/// Rows and columns of cells alternate with narrow gaps, so the layout is `2 * BOARD_SIZE - 1` slots in each direction.
/// Slots with both indices even hold cells, the ones with an odd column hold horizontal fuses and the ones with an odd
/// row hold vertical fuses.
fn build_grid_layout(container: &Rect) -> Vec<Vec<Rect>> {
    let slots = 2 * fuse_rs::BOARD_SIZE as usize - 1;

    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints((0..slots).map(|i| {
            Constraint::Length(if i % 2 == 0 { CELL_HEIGHT } else { CONNECTOR_HEIGHT })
        }))
        .split(*container);

    vertical_layout
        .iter()
        .map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints((0..slots).map(|i| {
                    Constraint::Length(if i % 2 == 0 { CELL_WIDTH } else { CONNECTOR_WIDTH })
                }))
                .split(*row)
                .to_vec()
        })
        .collect::<Vec<_>>()
}

/// Build a popup with the provided contents (lines of a text), set to it the provided border color and render it in the
/// center of the frame.
///
/// The width of the popup is the width of the text's longest line and its height is the number of the lines.
fn render_popup(frame: &mut Frame, lines: impl IntoIterator<Item = String>, border_color: Color) {
    let lines: Vec<String> = lines.into_iter().collect();
    let lines_amount = lines.len() as u16;

    let block = Block::default()
        .bg(Color::White)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let text = Paragraph::new(lines.join("\n"))
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(block);

    let popup_width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0) as u16 + 2;
    let container = center(&frame.size(), lines_amount + 2, popup_width);

    // clear the region so that it doesn't contain any old graphics and render the widget in the prepared region
    frame.render_widget(Clear, container);
    frame.render_widget(text, container);
}

/// The function builds a widget that represents a single cell.
///
/// The marker and the bomb are always shown. The border shows the cell's highlight, the cursor or the explosion
/// (the explosion taking precedence over everything else).
fn build_cell_widget(cell: &CellSnapshot, selected: bool, exploding: bool) -> impl Widget {
    let marker = cell.marker.map(|player| player.to_string()).unwrap_or_default();
    let bomb = if cell.has_bomb { BOMB_SYMBOL } else { "" };
    let symbol = format!("{marker:^2}{bomb:^2}");

    let highlight_color = match cell.highlight {
        Highlight::None => CELL_PALE_COLOR,
        Highlight::Place => PLACE_HIGHLIGHT_COLOR,
        Highlight::Bomb => BOMB_HIGHLIGHT_COLOR,
        Highlight::FuseFrom => FUSE_FROM_HIGHLIGHT_COLOR,
        Highlight::FuseSelectedFrom => FUSE_SELECTED_FROM_HIGHLIGHT_COLOR,
        Highlight::FuseTo => FUSE_TO_HIGHLIGHT_COLOR,
        Highlight::Winning => WINNING_COLOR,
    };

    let border_color = if exploding {
        EXPLOSION_COLOR
    } else if selected {
        CURSOR_COLOR
    } else {
        highlight_color
    };

    let border_type = if selected || cell.highlight == Highlight::Winning {
        BorderType::Thick
    } else {
        BorderType::Plain
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));

    let paragraph = Paragraph::new(symbol)
        .fg(CELL_COLOR)
        .bold()
        .alignment(Alignment::Center)
        .block(block);

    if exploding {
        paragraph.bg(EXPLOSION_COLOR)
    } else {
        paragraph
    }
}

/// Builds the widget drawn in the gap between two adjacent cells, `a` being the upper or the left one.
///
/// Fuses still burning in an explosion playback are drawn too, even though the board no longer holds them.
fn build_connector_widget(snapshot: &Snapshot, burning_fuses: &[Fuse], a: Coord, b: Coord) -> impl Widget {
    let has_fuse = |from: Coord, to: Coord| snapshot.fuses.iter().any(|fuse| fuse.from == from && fuse.to == to);
    let is_burning = |from: Coord, to: Coord| burning_fuses.iter().any(|fuse| fuse.from == from && fuse.to == to);

    let (forward_burning, backward_burning) = (is_burning(a, b), is_burning(b, a));
    let forward = has_fuse(a, b) || forward_burning;
    let backward = has_fuse(b, a) || backward_burning;

    let horizontal = a.0 == b.0;
    let symbol = match (forward, backward, horizontal) {
        (true, true, true) => FUSE_HORIZONTAL_BOTH_SYMBOL,
        (true, false, true) => FUSE_RIGHT_SYMBOL,
        (false, true, true) => FUSE_LEFT_SYMBOL,
        (true, true, false) => FUSE_VERTICAL_BOTH_SYMBOL,
        (true, false, false) => FUSE_DOWN_SYMBOL,
        (false, true, false) => FUSE_UP_SYMBOL,
        (false, false, _) => "",
    };

    let color = if forward_burning || backward_burning {
        BURNING_FUSE_COLOR
    } else {
        FUSE_COLOR
    };

    Paragraph::new(symbol)
        .fg(color)
        .bold()
        .alignment(Alignment::Center)
}

/// Prepares a paragraph to render as an info-block.
fn build_info_widget(text: String, title: &str) -> impl Widget + '_ {
    Paragraph::new(text)
        .fg(REGULAR_TEXT_COLOR)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(BorderType::Thick)
                .border_style(Style::default().fg(INFO_WIDGET_BLOCK_COLOR)),
        )
}

/// The function builds the ready-to-use legend block (some text that provides information about the in-game controls).
fn build_legend_widget() -> impl Widget {
    let rows = LEGEND_TEXT.map(|legend_row| {
        let (keys, description) = legend_row.split_at(legend_row.find(':').unwrap_or(legend_row.len()));

        Row::new([
            Line::from(keys).alignment(Alignment::Right),
            Line::from(description).alignment(Alignment::Left),
        ])
    });

    Table::new(rows, Constraint::from_percentages([50, 50])).fg(LEGEND_TEXT_COLOR)
}
