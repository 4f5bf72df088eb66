use crate::shared::{
    DisplayState, Screen, FOOTER, HERO_DESCRIPTION, HERO_ICON, HERO_TITLE, SUBTITLE, TITLE,
};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

const ACCENT: Color = Color::Rgb(255, 140, 66);

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, blink_on: bool) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title + subtitle
            Constraint::Min(10), // intro or step card
            Constraint::Length(3), // transport buttons
            Constraint::Length(3), // volume
            Constraint::Length(1), // footer
        ])
        .split(area);

    draw_header(frame, sections[0]);
    match state.screen {
        Screen::Intro => {
            draw_intro(frame, sections[1]);
            draw_hints(frame, sections[2]);
        }
        Screen::Step => {
            draw_step_card(frame, sections[1], state, blink_on);
            draw_transport(frame, sections[2], state);
            draw_volume(frame, sections[3], state);
        }
    }
    draw_footer(frame, sections[4], state);
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let text = Text::from(vec![
        Line::from(Span::styled(
            TITLE,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(SUBTITLE, Style::default().fg(Color::Gray))),
    ]);
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
}

fn draw_intro(frame: &mut Frame, area: Rect) {
    let text = Text::from(vec![
        Line::from(HERO_ICON),
        Line::from(""),
        Line::from(Span::styled(
            HERO_TITLE,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(HERO_DESCRIPTION),
        Line::from(""),
        Line::from(Span::styled(
            "[ Enter ]  Begin Journey",
            Style::default().fg(Color::Black).bg(ACCENT),
        )),
    ]);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_hints(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new("Enter: begin   Space: play/pause   q: quit")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_step_card(frame: &mut Frame, area: Rect, state: &DisplayState, blink_on: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(state.step_label())
        .border_style(Style::default().fg(ACCENT));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // icon
            Constraint::Length(2), // title
            Constraint::Min(2), // description
            Constraint::Length(1), // progress
            Constraint::Length(1), // auto-play indicator
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(state.icon).alignment(Alignment::Center), rows[0]);
    frame.render_widget(
        Paragraph::new(Span::styled(
            state.title,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        rows[1],
    );
    frame.render_widget(
        Paragraph::new(state.description)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        rows[2],
    );
    frame.render_widget(
        Gauge::default()
            .ratio(state.progress.clamp(0.0, 1.0))
            .label(format!("{}/{}", state.step + 1, state.total_steps))
            .gauge_style(Style::default().fg(ACCENT).bg(Color::DarkGray)),
        rows[3],
    );
    frame.render_widget(
        Paragraph::new(status_line(state, blink_on)).alignment(Alignment::Center),
        rows[4],
    );
}

fn status_line(state: &DisplayState, blink_on: bool) -> Line<'static> {
    if !state.playing {
        return Line::from(Span::styled("Paused", Style::default().fg(Color::Gray)));
    }
    let pulse = if blink_on { "●" } else { " " };
    let mut spans = vec![
        Span::styled(pulse, Style::default().fg(Color::Red)),
        Span::raw(" Auto-playing..."),
    ];
    if let Some(left) = state.step_remaining {
        spans.push(Span::styled(
            format!("  next in {:.0}s", left.ceil()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn draw_transport(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);
    let button = |label: &'static str, on: bool| {
        Span::styled(format!(" {label} "), if on { enabled } else { disabled })
    };

    let line = Line::from(vec![
        button("← Previous", state.can_previous),
        Span::raw("  "),
        button(if state.playing { "⏸ Pause" } else { "▶ Play" }, true),
        Span::raw("  "),
        button("Next →", state.can_next),
        Span::raw("  "),
        button("↻ Reset", true),
    ]);
    frame.render_widget(
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn draw_volume(frame: &mut Frame, area: Rect, state: &DisplayState) {
    frame.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("🔊 Volume (-/=)"))
            .ratio(f64::from(state.volume.clamp(0.0, 1.0)))
            .label(format!("{:.0}%", state.volume * 100.0))
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::DarkGray)),
        area,
    );
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let text = format!("{FOOTER}   ·   sound: {}   nodes: {}", state.sound, state.active_nodes);
    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
