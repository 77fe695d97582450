use crate::app::{App, Focus};
use crate::braille;
use crate::particle::ParticleKind;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;
const STATUS_HEIGHT: u16 = 9;
const PARAMS_HEIGHT: u16 = 10;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 50;

/// Number of lines in controls content
pub const CONTROLS_CONTENT_LINES: u16 = 18;

// UI color scheme
const BORDER_COLOR: Color = Color::Cyan;
const HIGHLIGHT_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Creates a standard styled block with rounded borders
fn styled_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
        .title(title)
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if app.fullscreen_mode {
        render_canvas(frame, area, app);
    } else {
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .split(area);

        render_sidebar(frame, layout[0], app);
        render_canvas(frame, layout[1], app);
    }

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

/// Calculate the canvas size (excluding borders)
pub fn get_canvas_size(frame_area: Rect, fullscreen: bool) -> (u16, u16) {
    if fullscreen {
        (frame_area.width.saturating_sub(2), frame_area.height.saturating_sub(2))
    } else {
        let canvas_width = frame_area.width.saturating_sub(SIDEBAR_WIDTH + 2);
        let canvas_height = frame_area.height.saturating_sub(2);
        (canvas_width, canvas_height)
    }
}

/// Terminal position of the canvas's top-left character (inside the border)
pub fn canvas_origin(fullscreen: bool) -> (u16, u16) {
    if fullscreen {
        (1, 1)
    } else {
        (SIDEBAR_WIDTH + 1, 1)
    }
}

/// Map a terminal position to canvas character coordinates, if it lies on the canvas
pub fn to_canvas(column: u16, row: u16, frame_area: Rect, fullscreen: bool) -> Option<(u16, u16)> {
    let (ox, oy) = canvas_origin(fullscreen);
    let (width, height) = get_canvas_size(frame_area, fullscreen);
    let cx = column.checked_sub(ox)?;
    let cy = row.checked_sub(oy)?;
    (cx < width && cy < height).then_some((cx, cy))
}

/// Rows left for the controls box below the status and parameters boxes
pub fn get_controls_visible_lines(terminal_height: u16) -> u16 {
    terminal_height
        .saturating_sub(STATUS_HEIGHT + PARAMS_HEIGHT)
        .saturating_sub(2)
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(STATUS_HEIGHT),
            Constraint::Length(PARAMS_HEIGHT),
            Constraint::Min(6), // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_controls_box(frame, sections[2], app);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Pixel Sand ");

    let counts = app.simulation.counts();
    let count_line = |kind: ParticleKind| {
        Line::from(Span::styled(
            format!("{:<6} {}", kind.name(), counts.get(&kind).copied().unwrap_or(0)),
            Style::default().fg(TEXT_COLOR),
        ))
    };

    let (status_text, status_color) = if app.simulation.paused {
        ("PAUSED", HIGHLIGHT_COLOR)
    } else {
        ("RUNNING", BORDER_COLOR)
    };

    let mut content: Vec<Line> = ParticleKind::ALL.iter().map(|&k| count_line(k)).collect();
    content.push(Line::from(Span::styled(
        format!("Total  {}", app.simulation.particle_count()),
        Style::default().fg(TEXT_COLOR),
    )));
    content.push(Line::from(Span::styled(
        format!(
            "{}x{} t={}",
            app.simulation.cols(),
            app.simulation.rows(),
            app.simulation.tick()
        ),
        Style::default().fg(DIM_TEXT_COLOR),
    )));
    content.push(Line::from(Span::styled(status_text, Style::default().fg(status_color))));
    if let Some(message) = &app.message {
        content.push(Line::from(Span::styled(
            message.as_str(),
            Style::default().fg(Color::Green),
        )));
    }

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn on_off(flag: bool) -> String {
    let text = if flag { "on" } else { "off" };
    text.to_string()
}

fn render_params_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Parameters ");

    let make_line = |label: &str, value: String, focused: bool| {
        let prefix = if focused { "> " } else { "  " };
        let style = if focused {
            Style::default().fg(HIGHLIGHT_COLOR)
        } else {
            Style::default().fg(TEXT_COLOR)
        };
        Line::from(Span::styled(format!("{}{}: {}", prefix, label, value), style))
    };

    let params = app.simulation.params();

    let content = vec![
        make_line(
            "Cell",
            format!("{}", params.cell_size),
            app.focus == Focus::CellSize,
        ),
        make_line("Dust", params.dust.name().to_string(), app.focus == Focus::Dust),
        make_line("Glue", on_off(app.brush.glue), app.focus == Focus::Glue),
        make_line(
            "Gravity",
            format!("{:.1}", params.gravity),
            app.focus == Focus::Gravity,
        ),
        make_line("Magic", on_off(app.brush.magic), app.focus == Focus::Material),
        Line::from(vec![
            Span::styled(
                format!(
                    "{}Sand: {} ",
                    if app.focus == Focus::SandColor { "> " } else { "  " },
                    app.brush.sand_color.name()
                ),
                Style::default().fg(if app.focus == Focus::SandColor {
                    HIGHLIGHT_COLOR
                } else {
                    TEXT_COLOR
                }),
            ),
            Span::styled("■", Style::default().fg(app.brush.preview().into())),
        ]),
        make_line(
            "Speed",
            format!("{}", app.ticks_per_frame),
            app.focus == Focus::Speed,
        ),
        make_line("Wind", format!("{:.1}", params.wind), app.focus == Focus::Wind),
    ];

    // Calculate scroll to keep focused item visible based on actual area
    let focus_line = app.focus.line_index();
    let visible_height = area.height.saturating_sub(2); // minus borders
    let content_height = content.len() as u16;

    let scroll = if visible_height == 0 || visible_height >= content_height {
        0 // No scrolling needed
    } else if focus_line >= visible_height {
        // Scroll to show focused line at bottom of visible area
        focus_line.saturating_sub(visible_height - 1)
    } else {
        0 // Focus is within first visible lines
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: String| -> Line<'_> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("LMB", "pour sand/dust".to_string()),
        make_control("RMB", "pour water".to_string()),
        make_control("Space", "pause/resume".to_string()),
        make_control("H/?", "help".to_string()),
        make_control("X", "clear".to_string()),
        make_control("M", format!("magic: {}", on_off(app.brush.magic))),
        make_control("U", format!("glue: {}", on_off(app.brush.glue))),
        make_control("D", "dust palette".to_string()),
        make_control("C", "sand color".to_string()),
        make_control("g/G", "gravity".to_string()),
        make_control("w/W", "wind".to_string()),
        make_control("z/Z", "cell size".to_string()),
        make_control("+/-", "speed".to_string()),
        make_control("Tab", "next param".to_string()),
        make_control("↑/↓", "adjust".to_string()),
        make_control("V", "fullscreen".to_string()),
        make_control("S", "save config".to_string()),
        make_control("Q", "quit".to_string()),
    ];

    let content_height = content.len() as u16;
    let visible_height = area.height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    let title = if is_scrollable {
        " Controls (↑↓) "
    } else {
        " Controls "
    };

    let block = styled_block(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((app.controls_scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let snapshot = app.simulation.snapshot();
    let cells = braille::render_to_braille(
        &snapshot,
        app.simulation.cols(),
        app.simulation.rows(),
        app.simulation.params().cell_size,
        inner.width,
        inner.height,
    );

    for cell in cells {
        let x = inner.x + cell.x;
        let y = inner.y + cell.y;

        if x < inner.x + inner.width && y < inner.y + inner.height {
            let cell_rect = Rect {
                x,
                y,
                width: 1,
                height: 1,
            };
            let span = Span::styled(cell.char.to_string(), Style::default().fg(cell.color));
            let paragraph = Paragraph::new(Line::from(span));
            frame.render_widget(paragraph, cell_rect);
        }
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &App) {
    // Calculate the canvas area (exclude sidebar unless fullscreen)
    let canvas_x = if app.fullscreen_mode { 0 } else { SIDEBAR_WIDTH };
    let canvas_width = if app.fullscreen_mode {
        area.width
    } else {
        area.width.saturating_sub(SIDEBAR_WIDTH)
    };

    // Center the help dialog within the canvas
    let help_width = 56.min(canvas_width.saturating_sub(4));
    let help_height = area.height.saturating_sub(4).min(40);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    // Clear the background
    frame.render_widget(Clear, help_area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("PIXEL SAND", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Pour particles with the mouse and watch them fall, pile up and flow. The grid is split into column bands that update in parallel every tick."),
        Line::from(""),
        Line::from(Span::styled("MATERIALS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from(""),
        Line::from(Span::styled("Sand (left button)", Style::default().fg(TEXT_COLOR))),
        Line::from("Falls, then slides diagonally to form piles. Drifts with the wind."),
        Line::from(""),
        Line::from(Span::styled("Water (right button)", Style::default().fg(TEXT_COLOR))),
        Line::from("Falls, then flows sideways to level out. Ignores the wind."),
        Line::from(""),
        Line::from(Span::styled("Magic Dust (M, then left button)", Style::default().fg(TEXT_COLOR))),
        Line::from("Moves like sand and shimmers through the palette chosen with D: Star Dust, Fairy Sparkles, Rainbow Mist."),
        Line::from(""),
        Line::from(Span::styled("Glue (U)", Style::default().fg(TEXT_COLOR))),
        Line::from("Sand and dust poured while glue is on never move. Use it to build walls and cups."),
        Line::from(""),
        Line::from(Span::styled("PARAMETERS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("g/G gravity (negative falls upward), w/W wind strength, z/Z cell size. Changing the cell size resizes the grid and removes every particle."),
        Line::from(""),
        Line::from(Span::styled("BASIC CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Space=Pause, X=Clear, C=Sand color, V=Fullscreen, Tab/Arrows=Adjust, +/-=Speed, S=Save config, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let max_scroll = content_height.saturating_sub(visible_height);
    let is_scrollable = max_scroll > 0;

    // Update title to show scroll hint if scrollable
    let title = if is_scrollable {
        " Help (J/K scroll, H to close) "
    } else {
        " Help (H to close) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(HIGHLIGHT_COLOR))
        .title(title);

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll, 0));

    frame.render_widget(paragraph, help_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_size() {
        let area = Rect::new(0, 0, 100, 30);
        assert_eq!(get_canvas_size(area, false), (74, 28));
        assert_eq!(get_canvas_size(area, true), (98, 28));
    }

    #[test]
    fn test_to_canvas() {
        let area = Rect::new(0, 0, 100, 30);
        assert_eq!(to_canvas(25, 1, area, false), Some((0, 0)));
        assert_eq!(to_canvas(10, 5, area, false), None);
        assert_eq!(to_canvas(1, 1, area, true), Some((0, 0)));
        assert_eq!(to_canvas(99, 29, area, true), None);
        assert_eq!(to_canvas(98, 28, area, true), Some((97, 27)));
    }

    #[test]
    fn test_controls_visible_lines() {
        assert_eq!(get_controls_visible_lines(40), 19);
        assert_eq!(get_controls_visible_lines(10), 0);
    }
}
