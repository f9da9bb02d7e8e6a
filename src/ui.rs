#![allow(
    // Lane coordinates are small and non-negative once clamped to the drawing area
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use std::time::Duration;

use crate::app::App;
use crate::components::BlockColor;
use crate::game::{BLOCK_SIZE, LANE_HEIGHT};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

// Minimum sizes required for the game to be playable
pub const LANE_WIDTH: u16 = 16; // Including borders
pub const MIN_LANE_ROWS: u16 = 10;
pub const MIN_INFO_WIDTH: u16 = 26;
const BLOCK_WIDTH: u16 = 8;

pub fn render(f: &mut Frame, app: &mut App) {
    let min_total_width = LANE_WIDTH + MIN_INFO_WIDTH;
    let min_total_height = MIN_LANE_ROWS + 2 + 3; // Borders plus title and timer bar

    // Check if the terminal is too small to render the game properly
    if f.area().width < min_total_width || f.area().height < min_total_height {
        app.session.set_suspended(true);

        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("RGB Beam - Paused"),
        );

        let warning_area = centered_rect(50, 30, f.area());
        f.render_widget(warning_text, warning_area);
        return;
    } else if app.session.is_suspended() {
        app.session.set_suspended(false);
    }

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(LANE_WIDTH), Constraint::Min(MIN_INFO_WIDTH)])
        .split(f.area());

    let lane_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(MIN_LANE_ROWS + 2),
            Constraint::Length(1), // Timer bar
        ])
        .split(main_layout[0]);

    let title = Paragraph::new("RGB BEAM")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, lane_layout[0]);

    render_lane(f, app, lane_layout[1]);

    if app.config.display.show_timer_bar {
        render_timer_bar(f, app, lane_layout[2]);
    }

    render_info(f, app, main_layout[1]);
}

/// Maps a lane position to the terminal row of the block's top edge
#[must_use]
pub fn lane_row(position: f32, rows: u16) -> i32 {
    (position / LANE_HEIGHT * f32::from(rows)).floor() as i32
}

/// Number of rows a block covers at this lane height
#[must_use]
pub fn block_rows(rows: u16) -> u16 {
    ((BLOCK_SIZE / LANE_HEIGHT * f32::from(rows)).round() as u16).max(1)
}

fn render_lane(f: &mut Frame, app: &mut App, area: Rect) {
    let lane = Block::default().borders(Borders::ALL);
    let inner = lane.inner(area);
    f.render_widget(lane, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let flash = Duration::from_millis(app.config.display.beam_flash_ms);
    let center_x = inner.left() + inner.width / 2;

    // Beam goes first so blocks are drawn over it
    if let Some(color) = app.view.active_beam(flash) {
        for y in inner.top()..inner.bottom() {
            if let Some(cell) = f.buffer_mut().cell_mut((center_x, y)) {
                cell.set_symbol("┃");
                cell.set_fg(color.get_color());
            }
        }
    }

    let target = app.target_id();
    let height = block_rows(inner.height);
    let width = BLOCK_WIDTH.min(inner.width);
    let left = inner.left() + (inner.width - width) / 2;

    for (id, block) in &app.view.blocks {
        let top = lane_row(block.position, inner.height);
        let is_target = Some(*id) == target;
        let symbol = if is_target { "▓" } else { "█" };

        for dy in 0..i32::from(height) {
            let row = top + dy;
            if row < 0 || row >= i32::from(inner.height) {
                continue;
            }
            let y = inner.top() + row as u16;
            for x in left..left + width {
                if let Some(cell) = f.buffer_mut().cell_mut((x, y)) {
                    cell.set_symbol(symbol);
                    cell.set_fg(block.color.get_color());
                    cell.set_bg(Color::Black);
                }
            }
        }
    }

    // Overlay the game over banner on the lane
    if app.view.game_over.is_some() {
        let game_over = Paragraph::new("GAME OVER")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));

        let banner = Rect {
            x: inner.x,
            y: inner.y + inner.height / 2,
            width: inner.width,
            height: 1,
        };
        f.render_widget(game_over, banner);
    }
}

fn render_timer_bar(f: &mut Frame, app: &App, area: Rect) {
    let ratio = f64::from(app.view.timer_ratio).clamp(0.0, 1.0);
    let color = if ratio > 0.5 {
        Color::Green
    } else if ratio > 0.25 {
        Color::Yellow
    } else {
        Color::Red
    };

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .label("")
        .ratio(ratio);
    f.render_widget(gauge, area);
}

fn render_info(f: &mut Frame, app: &mut App, area: Rect) {
    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(3), // Score and speed
            Constraint::Length(3), // Status message
            Constraint::Min(5),    // Controls
        ])
        .split(area);

    let info_title = Paragraph::new("INFO")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(info_title, info_layout[0]);

    let stats = format!(
        "Score: {}\nSpeed: {:.2}",
        app.view.score, app.view.speed_factor
    );
    f.render_widget(
        Paragraph::new(stats).wrap(Wrap { trim: true }),
        info_layout[1],
    );

    let status_color = if app.view.game_over.is_some() {
        Color::Red
    } else {
        Color::White
    };
    let status = Paragraph::new(app.status_message())
        .style(Style::default().fg(status_color))
        .wrap(Wrap { trim: true });
    f.render_widget(status, info_layout[2]);

    let controls = Paragraph::new(vec![
        Line::from("Controls:"),
        control_line("Q", BlockColor::Red),
        control_line("W", BlockColor::Green),
        control_line("E", BlockColor::Blue),
        Line::from("R: Restart"),
        Line::from("Esc: Quit"),
    ])
    .block(Block::default().borders(Borders::TOP))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[3]);
}

fn control_line(key: &str, color: BlockColor) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{key}: ")),
        Span::styled(
            color.name().to_uppercase(),
            Style::default().fg(color.get_color()),
        ),
    ])
}

/// Helper function to create a centered rect using up certain percentage of the available rect
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
