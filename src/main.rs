mod ui;

use chrono::Local;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use pomo::{
    alert::AlertPlayer,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, SettingsUpdate},
    history::{self, HistoryDb, IntervalRecord},
    notify::{DesktopNotifier, Notifier, NullNotifier},
    pomo::{BoundaryEvent, Pomo},
    runtime::{CrosstermEventSource, EventSource, FixedTicker, PomoEvent, Runner, Ticker},
    util::format_mm_ss,
};

const TICK_RATE_MS: u64 = 1000;

pub const SETTING_LABELS: [&str; 4] = [
    "Work (minutes)",
    "Short break (minutes)",
    "Long break (minutes)",
    "Long-break delay (pairs)",
];

/// sleek pomodoro tui with desktop notifications and session history
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A sleek pomodoro TUI that cycles work and break intervals, sends desktop notifications and audio cues at every boundary, and keeps a history of finished sessions."
)]
pub struct Cli {
    /// work interval length in minutes (replaces the stored setting)
    #[clap(short = 'w', long, value_parser = clap::value_parser!(u64).range(1..))]
    work: Option<u64>,

    /// short break length in minutes (replaces the stored setting)
    #[clap(short = 's', long, value_parser = clap::value_parser!(u64).range(1..))]
    short_break: Option<u64>,

    /// long break length in minutes (replaces the stored setting)
    #[clap(short = 'l', long, value_parser = clap::value_parser!(u64).range(1..))]
    long_break: Option<u64>,

    /// work/break pairs before a long break (replaces the stored setting)
    #[clap(short = 'd', long, value_parser = clap::value_parser!(u32).range(1..))]
    long_break_delay: Option<u32>,

    /// disable the audio cue at interval boundaries
    #[clap(long)]
    mute: bool,

    /// disable desktop notifications
    #[clap(long)]
    quiet: bool,
}

impl Cli {
    fn has_overrides(&self) -> bool {
        self.work.is_some()
            || self.short_break.is_some()
            || self.long_break.is_some()
            || self.long_break_delay.is_some()
    }

    /// Overlay the given flags on the stored config. Flags arrive in minutes
    /// and pairs; storage is seconds and session indices.
    fn merged_config(&self, stored: &Config) -> Config {
        Config {
            work_secs: self.work.map_or(stored.work_secs, |m| m * 60),
            short_break_secs: self.short_break.map_or(stored.short_break_secs, |m| m * 60),
            long_break_secs: self.long_break.map_or(stored.long_break_secs, |m| m * 60),
            long_break_delay: self
                .long_break_delay
                .map_or(stored.long_break_delay, |p| p * 2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Timer,
    Settings,
}

/// Edit buffer for the settings screen. Digit-only input; parses into a
/// `SettingsUpdate` only when every field is a positive integer.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub fields: [String; 4],
    pub selected: usize,
    pub error: Option<&'static str>,
}

impl SettingsForm {
    pub fn from_config(config: &Config) -> Self {
        Self {
            fields: [
                (config.work_secs / 60).to_string(),
                (config.short_break_secs / 60).to_string(),
                (config.long_break_secs / 60).to_string(),
                (config.long_break_delay / 2).to_string(),
            ],
            selected: 0,
            error: None,
        }
    }

    pub fn push_digit(&mut self, c: char) {
        if c.is_ascii_digit() && self.fields[self.selected].len() < 3 {
            self.fields[self.selected].push(c);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        self.fields[self.selected].pop();
        self.error = None;
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.fields.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + self.fields.len() - 1) % self.fields.len();
    }

    /// All fields must parse to positive integers; anything else is refused
    /// here, before the timer ever sees it.
    pub fn parse(&self) -> Option<SettingsUpdate> {
        let mut values = [0u64; 4];
        for (i, field) in self.fields.iter().enumerate() {
            match field.parse::<u64>() {
                Ok(v) if v > 0 => values[i] = v,
                _ => return None,
            }
        }
        Some(SettingsUpdate {
            work_mins: values[0],
            short_break_mins: values[1],
            long_break_mins: values[2],
            long_break_pairs: values[3] as u32,
        })
    }
}

#[derive(Debug)]
pub struct App {
    pub pomo: Pomo,
    pub state: AppState,
    pub settings_form: SettingsForm,
    pub config_store: FileConfigStore,
    pub history: Option<HistoryDb>,
    pub log_path: Option<PathBuf>,
    pub today_work_sessions: i64,
    pub last_interval: Option<IntervalRecord>,
    pub muted: bool,
}

impl App {
    pub fn new(
        config: Config,
        config_store: FileConfigStore,
        history: Option<HistoryDb>,
        log_path: Option<PathBuf>,
        muted: bool,
    ) -> Self {
        let settings_form = SettingsForm::from_config(&config);
        let mut app = Self {
            pomo: Pomo::new(config),
            state: AppState::Timer,
            settings_form,
            config_store,
            history,
            log_path,
            today_work_sessions: 0,
            last_interval: None,
            muted,
        };
        app.refresh_summary();
        app
    }

    /// Re-read the cached history summary shown on the timer screen.
    pub fn refresh_summary(&mut self) {
        if let Some(db) = &self.history {
            self.today_work_sessions = db.work_sessions_today().unwrap_or(0);
            self.last_interval = db.last_interval().unwrap_or(None);
        }
    }
}

/// Terminal/tab title, derived from the session-index parity.
pub fn title_for(pomo: &Pomo) -> String {
    format!(
        "{} - {}",
        format_mm_ss(pomo.remaining_secs),
        if pomo.is_work_interval() {
            "Work"
        } else {
            "Break"
        }
    )
}

/// Dispatch the side effects of a crossed interval boundary: notification,
/// audio cue, history row, and log line. The timer itself only described
/// what happened.
fn handle_boundary(
    app: &mut App,
    notifier: &mut dyn Notifier,
    player: &mut AlertPlayer,
    event: BoundaryEvent,
) {
    notifier.notify(event.classification);
    if !app.muted {
        player.play();
    }

    let record = IntervalRecord::from_boundary(&event, Local::now());
    if let Some(db) = &app.history {
        let _ = db.record_interval(&record);
    }
    if let Some(log_path) = &app.log_path {
        let _ = history::append_log_line(log_path, &record);
    }

    app.refresh_summary();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    if cli.has_overrides() {
        // Flag overrides follow the settings-update convention: the merged
        // config replaces the stored one wholesale.
        config = cli.merged_config(&config);
        let _ = config_store.save(&config);
    }

    let history = HistoryDb::new().ok();
    let mut app = App::new(
        config,
        config_store,
        history,
        AppDirs::session_log_path(),
        cli.mute,
    );

    let mut notifier: Box<dyn Notifier> = if cli.quiet {
        Box::new(NullNotifier)
    } else {
        Box::new(DesktopNotifier)
    };
    let mut player = AlertPlayer::new();

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    let result = start_tui(
        &mut terminal,
        &mut app,
        &runner,
        notifier.as_mut(),
        &mut player,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
    notifier: &mut dyn Notifier,
    player: &mut AlertPlayer,
) -> Result<(), Box<dyn Error>> {
    loop {
        let _ = execute!(io::stdout(), SetTitle(title_for(&app.pomo)));
        terminal.draw(|f| ui::draw(app, f))?;

        // Ticks are only synthesized while the countdown runs; when idle or
        // paused the runner blocks on real input.
        match runner.step(app.pomo.is_running()) {
            PomoEvent::Tick => {
                if let Some(event) = app.pomo.on_tick() {
                    handle_boundary(app, notifier, player, event);
                }
            }
            PomoEvent::Resize => {}
            PomoEvent::Closed => break,
            PomoEvent::Key(key) => {
                if handle_key(app, key, notifier, player) == Flow::Quit {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_key(
    app: &mut App,
    key: KeyEvent,
    notifier: &mut dyn Notifier,
    player: &mut AlertPlayer,
) -> Flow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }

    match app.state {
        AppState::Timer => match key.code {
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char(' ') => app.pomo.toggle(),
            KeyCode::Char('s') => {
                if app.pomo.skip_allowed() {
                    let event = app.pomo.skip();
                    handle_boundary(app, notifier, player, event);
                }
            }
            KeyCode::Char('x') => app.pomo.stop(),
            KeyCode::Char('e') => {
                app.settings_form = SettingsForm::from_config(&app.pomo.config);
                app.state = AppState::Settings;
            }
            _ => {}
        },
        AppState::Settings => match key.code {
            KeyCode::Esc => app.state = AppState::Timer,
            KeyCode::Up => app.settings_form.select_prev(),
            KeyCode::Down | KeyCode::Tab => app.settings_form.select_next(),
            KeyCode::Backspace => app.settings_form.backspace(),
            KeyCode::Enter => match app.settings_form.parse() {
                Some(update) => {
                    let config: Config = update.into();
                    let _ = app.config_store.save(&config);
                    app.pomo.apply_settings(config);
                    app.state = AppState::Timer;
                }
                None => {
                    app.settings_form.error = Some("every field needs a positive number");
                }
            },
            KeyCode::Char(c) => app.settings_form.push_digit(c),
            _ => {}
        },
    }

    Flow::Continue
}
