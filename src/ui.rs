use crate::app::{App, Focus};
use crate::braille;
use crate::color::value_color;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const SIDEBAR_WIDTH: u16 = 24;

/// Max scroll for help content (generous to account for text wrapping on small screens)
pub const HELP_CONTENT_LINES: u16 = 40;

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

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let matrix_rows = app.simulation.matrix().size() as u16 + 1;
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7),               // Status
            Constraint::Length(10),              // Parameters
            Constraint::Length(matrix_rows + 2), // Matrix
            Constraint::Min(4),                  // Controls
        ])
        .split(area);

    render_status_box(frame, sections[0], app);
    render_params_box(frame, sections[1], app);
    render_matrix_box(frame, sections[2], app);
    render_controls_box(frame, sections[3]);
}

fn render_status_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Particle Life ");
    let stats = app.simulation.stats();

    let (status_text, status_color) = if app.paused {
        ("PAUSED", HIGHLIGHT_COLOR)
    } else {
        ("RUNNING", BORDER_COLOR)
    };

    let mut state_line = vec![
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::styled(
            format!(" {}", app.simulation.config().boundary.name()),
            Style::default().fg(DIM_TEXT_COLOR),
        ),
    ];
    if app.simulation.has_pending_matrix() {
        state_line.push(Span::styled(" +matrix", Style::default().fg(Color::Green)));
    }

    let last_line = match &app.status_message {
        Some(msg) => Line::from(Span::styled(msg.clone(), Style::default().fg(DIM_TEXT_COLOR))),
        None => Line::from(""),
    };

    let config = app.simulation.config();
    let content = vec![
        Line::from(Span::styled(
            format!("tick {}", stats.tick),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("N {}  K {}", config.particle_count, config.color_count),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(Span::styled(
            format!("speed {:.4}", stats.mean_speed),
            Style::default().fg(TEXT_COLOR),
        )),
        Line::from(state_line),
        last_line,
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
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

    let config = app.simulation.config();

    let content = vec![
        make_line(
            "Particles",
            format!("{}", config.particle_count),
            app.focus == Focus::Particles,
        ),
        make_line(
            "Colors",
            format!("{}", config.color_count),
            app.focus == Focus::Colors,
        ),
        make_line(
            "Radius",
            format!("{:.2}", config.max_radius),
            app.focus == Focus::Radius,
        ),
        make_line("Beta", format!("{:.2}", config.beta), app.focus == Focus::Beta),
        make_line(
            "Friction",
            format!("{:.2}", config.friction_half_life),
            app.focus == Focus::Friction,
        ),
        make_line(
            "Bounds",
            config.boundary.name().to_string(),
            app.focus == Focus::Boundary,
        ),
        make_line(
            "Search",
            config.effective_search().name().to_string(),
            app.focus == Focus::Search,
        ),
        make_line(
            "Speed",
            format!("{}", app.steps_per_frame),
            app.focus == Focus::Speed,
        ),
    ];

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

/// Attraction matrix as a heat map; row i lists how color i responds to each color j
fn render_matrix_box(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block(" Matrix ");
    let rows = app.simulation.matrix_snapshot();
    let size = rows.len();

    let mut header = vec![Span::raw("  ")];
    header.extend(
        (0..size).map(|j| Span::styled("●", Style::default().fg(app.palette.color(j)))),
    );

    let mut content = vec![Line::from(header)];
    for (i, row) in rows.iter().enumerate() {
        let mut spans = vec![Span::styled(
            "● ",
            Style::default().fg(app.palette.color(i)),
        )];
        spans.extend(
            row.iter()
                .map(|&v| Span::styled("■", Style::default().fg(value_color(v)))),
        );
        content.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}

fn render_controls_box(frame: &mut Frame, area: Rect) {
    let key_style = Style::default().fg(HIGHLIGHT_COLOR);
    let desc_style = Style::default().fg(DIM_TEXT_COLOR);

    let make_control = |key: &'static str, desc: &'static str| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("{:>5}", key), key_style),
            Span::styled(format!(" {}", desc), desc_style),
        ])
    };

    let content = vec![
        make_control("Space", "pause/resume"),
        make_control("R", "new matrix"),
        make_control("P", "new particles"),
        make_control("X", "export matrix"),
        make_control("Tab", "select param"),
        make_control("↑/↓", "adjust"),
        make_control("+/-", "speed"),
        make_control("V", "fullscreen"),
        make_control("H", "help"),
        make_control("Q", "quit"),
    ];

    let paragraph = Paragraph::new(content).block(styled_block(" Controls "));
    frame.render_widget(paragraph, area);
}

fn render_canvas(frame: &mut Frame, area: Rect, app: &App) {
    let block = styled_block("");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let particles = app.simulation.particle_snapshot();
    let cells = braille::render_to_braille(&particles, inner.width, inner.height, &app.palette);

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
            frame.render_widget(Paragraph::new(Line::from(span)), cell_rect);
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
    let help_height = area.height.saturating_sub(4).min(30);
    let x = canvas_x + (canvas_width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = Rect {
        x: area.x + x,
        y: area.y + y,
        width: help_width,
        height: help_height,
    };

    frame.render_widget(Clear, help_area);

    let heading = |text: &'static str| {
        Line::from(Span::styled(text, Style::default().fg(HIGHLIGHT_COLOR)))
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled("PARTICLE LIFE", Style::default().fg(BORDER_COLOR))),
        Line::from(""),
        Line::from("Each color attracts or repels every other color by a random amount. Close neighbors always push apart; further out the matrix decides."),
        Line::from(""),
        heading("MATRIX"),
        Line::from("Row = the color that moves, column = the color it reacts to. Green attracts, red repels. R draws a new matrix, applied on the next step."),
        Line::from(""),
        heading("PARAMETERS"),
        Line::from("Radius: interaction range. Beta: fraction of the range that is pure repulsion. Friction: velocity half-life in seconds."),
        Line::from("Bounds: Periodic wraps around the edges; Open lets particles drift away (all-pairs search)."),
        Line::from("Changing a parameter restarts the simulation."),
        Line::from(""),
        heading("CONTROLS"),
        Line::from("Space=Pause, R=New matrix, P=New particles, X=Export matrix.txt, Tab/Arrows=Adjust, +/-=Speed, V=Fullscreen, Q=Quit"),
        Line::from(""),
    ];

    let content_height = content.len() as u16;
    let visible_height = help_height.saturating_sub(2); // minus borders
    let is_scrollable = content_height > visible_height;

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
