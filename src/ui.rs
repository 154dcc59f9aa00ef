use crate::app::App;
use crate::braille::BrailleCell;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 22;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

/// Number of lines in controls content
pub const CONTROLS_CONTENT_LINES: u16 = 7;

// UI color scheme
const BORDER_COLOR: Color = Color::Yellow;
const HIGHLIGHT_COLOR: Color = Color::LightYellow;
const TEXT_COLOR: Color = Color::White;
const DIM_TEXT_COLOR: Color = Color::Gray;

/// Splash shown while the swarm is hidden
const BANANA_HAND: [&str; 7] = [
    "    _            ",
    "   //\\           ",
    "   V  \\          ",
    "    \\  \\_        ",
    "     \\,'.`-.     ",
    "      |\\ `. `.   ",
    "      ( \\  `. `-.",
];

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
    let inner = canvas_inner(frame_area, fullscreen);
    (inner.width, inner.height)
}

/// Screen rectangle of the canvas contents, used for click hit-testing
pub fn canvas_inner(frame_area: Rect, fullscreen: bool) -> Rect {
    let outer = if fullscreen {
        frame_area
    } else {
        let sidebar = SIDEBAR_WIDTH.min(frame_area.width);
        Rect {
            x: frame_area.x + sidebar,
            y: frame_area.y,
            width: frame_area.width - sidebar,
            height: frame_area.height,
        }
    };
    Rect {
        x: outer.x.saturating_add(1),
        y: outer.y.saturating_add(1),
        width: outer.width.saturating_sub(2),
        height: outer.height.saturating_sub(2),
    }
}

/// Number of visible lines in the controls box for a terminal height
pub fn get_controls_visible_lines(terminal_height: u16) -> u16 {
    terminal_height.saturating_sub(STATUS_HEIGHT + 2)
}

const STATUS_HEIGHT: u16 = 10;

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(STATUS_HEIGHT), // Status
            Constraint::Min(5),                // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_controls_box(frame, sections[1], app);
}

/// Signed wind shown as a bar growing left or right from the centre
fn wind_gauge(wind: f32, width: usize) -> String {
    let half = width / 2;
    let reach = ((wind.abs() / 1.2).min(1.0) * half as f32).round() as usize;
    let mut gauge = vec!['·'; half * 2 + 1];
    gauge[half] = '|';
    for i in 1..=reach {
        let index = if wind < 0.0 { half - i } else { half + i };
        gauge[index] = '█';
    }
    gauge.into_iter().collect()
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Banana Swarm ");

    let (status_text, status_color) = if app.is_visible() {
        ("VISIBLE", Color::Green)
    } else {
        ("HIDDEN", DIM_TEXT_COLOR)
    };

    let effect_name = app
        .active_effect()
        .map(|e| e.name().to_string())
        .unwrap_or_else(|| format!("next: {}", app.upcoming_effect().name()));

    let gauge_width = area.width.saturating_sub(4) as usize;

    let content = vec![
        Line::from(Span::styled(status_text, Style::default().fg(status_color))),
        Line::from(vec![
            Span::styled("Effect: ", Style::default().fg(DIM_TEXT_COLOR)),
            Span::styled(effect_name, Style::default().fg(HIGHLIGHT_COLOR)),
        ]),
        Line::from(Span::styled(
            format!("Bananas: {}", app.swarm.len()),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("Frames: {}", app.driver.frames_rendered()),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!(
                "Idle: {}  Clicks: {}",
                app.driver.invocations() - app.driver.frames_rendered(),
                app.controller.toggles()
            ),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!(
                "Scale: 1:{}  Lit: {}",
                app.surface.pixel_ratio(),
                app.surface.grid().filled()
            ),
            Style::default().fg(DIM_TEXT_COLOR),
        )),
        Line::from(Span::styled("Wind", Style::default().fg(DIM_TEXT_COLOR))),
        Line::from(Span::styled(
            wind_gauge(app.swarm.ambient.wind_strength, gauge_width),
            Style::default().fg(Color::Cyan),
        )),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    // Helper to create a control line
    let make_control = |key: &str, desc: &str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Click", "next effect"),
        make_control("Enter", "next effect"),
        make_control("Space", "next effect"),
        make_control("H", "help"),
        make_control("V", "fullscreen"),
        make_control("J/K", "scroll help"),
        make_control("Q", "quit"),
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

    if app.is_visible() {
        render_cells(frame, inner, &app.canvas_cells());
    } else {
        render_splash(frame, inner, app);
    }
}

fn render_cells(frame: &mut Frame, inner: Rect, cells: &[BrailleCell]) {
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

/// The banana hand: clicking it (or pressing Enter) brings the swarm back
fn render_splash(frame: &mut Frame, inner: Rect, app: &App) {
    let mut content: Vec<Line> = BANANA_HAND
        .iter()
        .map(|row| Line::from(Span::styled(*row, Style::default().fg(BORDER_COLOR))))
        .collect();
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        format!("click for {}", app.upcoming_effect().name().to_lowercase()),
        Style::default().fg(TEXT_COLOR).add_modifier(Modifier::BOLD),
    )));

    let height = (content.len() as u16).min(inner.height);
    let splash_area = Rect {
        x: inner.x,
        y: inner.y + inner.height.saturating_sub(height) / 2,
        width: inner.width,
        height,
    };

    let paragraph = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(paragraph, splash_area);
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
    let help_height = area.height.saturating_sub(4).min(30);
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
        Line::from(Span::styled("BANANA SWARM", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Every trigger toggles the swarm. Each time it comes back it switches to the next effect."),
        Line::from(""),
        Line::from(Span::styled("EFFECTS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Drift - bananas float around their home spots"),
        Line::from("Spin - steady or boosted rotation"),
        Line::from("Wobble - nervous jitter"),
        Line::from("Stretch - squash and stretch"),
        Line::from("Popcorn - pop off the floor and bounce"),
        Line::from("Breeze - hang from stems and sway in the wind"),
        Line::from("Orbit - circle the centre of the canvas"),
        Line::from(""),
        Line::from(Span::styled("CONTROLS:", Style::default().fg(HIGHLIGHT_COLOR))),
        Line::from("Click canvas, Enter or Space = next, V=Fullscreen, H=Help, Q=Quit"),
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
