use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};
use time_humanize::{Accuracy, HumanTime, Tense};

use pomo::pomo::RunState;
use pomo::util::format_mm_ss;

use crate::{App, AppState, SETTING_LABELS};

const VERTICAL_MARGIN: u16 = 2;

pub fn draw(app: &mut App, f: &mut Frame) {
    match app.state {
        AppState::Timer => f.render_widget(&*app, f.area()),
        AppState::Settings => render_settings(app, f),
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let time_style = if self.pomo.is_work_interval() {
            Style::default().patch(bold_style).fg(Color::Magenta)
        } else {
            Style::default().patch(bold_style).fg(Color::Green)
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints(
                [
                    Constraint::Min(1),    // top padding
                    Constraint::Length(1), // interval label
                    Constraint::Length(1), // countdown
                    Constraint::Length(1), // run state
                    Constraint::Min(1),    // bottom padding
                    Constraint::Length(1), // history summary
                    Constraint::Length(1), // controls
                ]
                .as_ref(),
            )
            .split(area);

        let label = Paragraph::new(Span::styled(
            format!(
                "{} · session {}",
                self.pomo.current_kind, self.pomo.session_index
            ),
            dim_style,
        ))
        .alignment(Alignment::Center);
        label.render(chunks[1], buf);

        let countdown = Paragraph::new(Span::styled(
            format_mm_ss(self.pomo.remaining_secs),
            time_style,
        ))
        .alignment(Alignment::Center);
        countdown.render(chunks[2], buf);

        if self.pomo.run_state == RunState::Paused {
            let paused = Paragraph::new(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ))
            .alignment(Alignment::Center);
            paused.render(chunks[3], buf);
        }

        let summary = Paragraph::new(Span::styled(summary_line(self), dim_style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        summary.render(chunks[5], buf);

        let primary = match self.pomo.run_state {
            RunState::Idle => "Start",
            RunState::Running => "Pause",
            RunState::Paused => "Resume",
        };
        let mut spans = vec![Span::styled(
            format!("(space) {} ", primary),
            italic_style,
        )];
        spans.push(Span::styled(
            "(s) skip ",
            if self.pomo.skip_allowed() {
                italic_style
            } else {
                Style::default().patch(italic_style).patch(dim_style)
            },
        ));
        spans.push(Span::styled(
            "(x) stop (e) settings (esc) quit",
            italic_style,
        ));
        let controls = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        controls.render(chunks[6], buf);
    }
}

fn summary_line(app: &App) -> String {
    let sessions = match app.today_work_sessions {
        0 => "no work sessions today".to_string(),
        1 => "1 work session today".to_string(),
        n => format!("{} work sessions today", n),
    };

    match &app.last_interval {
        Some(record) => {
            let since = chrono::Local::now()
                .signed_duration_since(record.timestamp)
                .num_seconds()
                .max(0) as u64;
            let ago = HumanTime::from(std::time::Duration::from_secs(since))
                .to_text_en(Accuracy::Rough, Tense::Past);
            format!("{} · last interval {}", sessions, ago)
        }
        None => sessions,
    }
}

pub fn render_settings(app: &mut App, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3),                         // title
            Constraint::Length(SETTING_LABELS.len() as u16 + 2), // form
            Constraint::Length(1),                         // error
            Constraint::Min(0),
            Constraint::Length(2), // instructions
        ])
        .split(area);

    let title = Paragraph::new("Settings")
        .block(Block::default().borders(Borders::ALL))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let lines: Vec<Line> = SETTING_LABELS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let selected = i == app.settings_form.selected;
            let marker = if selected { "> " } else { "  " };
            let value = &app.settings_form.fields[i];
            let style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!("{}{:<28}{}", marker, label, value),
                style,
            ))
        })
        .collect();

    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Durations"))
        .alignment(Alignment::Left);
    f.render_widget(form, chunks[1]);

    if let Some(error) = app.settings_form.error {
        let error_line = Paragraph::new(Span::styled(
            error,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        f.render_widget(error_line, chunks[2]);
    }

    let instructions = Paragraph::new(
        "Digits to edit, backspace to erase | up/down to move | enter to apply (resets the session) | esc to cancel",
    )
    .style(
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    )
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(instructions, chunks[4]);
}
