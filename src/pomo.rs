use crate::config::Config;
use crate::policy::{self, BoundaryKind, IntervalKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum RunState {
    Idle,
    Running,
    Paused,
}

/// What just happened at an interval boundary. The timer returns one of
/// these from every advance; the shell decides what to do with it
/// (notification, audio cue, history row). The timer itself performs no I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryEvent {
    /// Index of the interval that just ended.
    pub finished_index: u32,
    /// Parity classification of the finished index, used for notification copy.
    pub classification: BoundaryKind,
    /// Kind of the interval that just ended.
    pub finished_kind: IntervalKind,
    /// Configured length of the finished interval.
    pub planned_secs: u64,
    /// Seconds actually counted down before the boundary.
    pub elapsed_secs: u64,
    /// True when the boundary came from a manual skip rather than expiry.
    pub skipped: bool,
}

/// The countdown state machine: run state, remaining time, and the 1-based
/// session index whose parity encodes work-vs-break.
#[derive(Debug, Clone, PartialEq)]
pub struct Pomo {
    pub config: Config,
    pub run_state: RunState,
    pub session_index: u32,
    pub remaining_secs: u64,
    pub current_kind: IntervalKind,
    planned_secs: u64,
    elapsed_secs: u64,
}

impl Pomo {
    pub fn new(config: Config) -> Self {
        let work = config.work_secs;
        Self {
            config,
            run_state: RunState::Idle,
            session_index: 1,
            remaining_secs: work,
            current_kind: IntervalKind::Work,
            planned_secs: work,
            elapsed_secs: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn is_idle(&self) -> bool {
        self.run_state == RunState::Idle
    }

    /// Odd indices are work intervals, even indices breaks. This drives the
    /// title and notification copy even while a substituted long break runs.
    pub fn is_work_interval(&self) -> bool {
        policy::is_work_index(self.session_index)
    }

    /// Skipping is pointless before anything has started.
    pub fn skip_allowed(&self) -> bool {
        !(self.run_state == RunState::Idle && self.session_index == 1)
    }

    pub fn start(&mut self) {
        self.run_state = RunState::Running;
    }

    pub fn pause(&mut self) {
        if self.run_state == RunState::Running {
            self.run_state = RunState::Paused;
        }
    }

    /// Primary control: start when idle or paused, pause when running.
    pub fn toggle(&mut self) {
        match self.run_state {
            RunState::Running => self.pause(),
            RunState::Idle | RunState::Paused => self.start(),
        }
    }

    /// Abort the cycle. Idempotent: a second stop leaves the state unchanged.
    pub fn stop(&mut self) {
        self.run_state = RunState::Idle;
        self.session_index = 1;
        self.remaining_secs = self.config.work_secs;
        self.current_kind = IntervalKind::Work;
        self.planned_secs = self.config.work_secs;
        self.elapsed_secs = 0;
    }

    /// Consume one elapsed second. Counts down while time remains; once the
    /// countdown has reached zero the next tick crosses the boundary.
    /// No-op unless running — the tick source is gated, this guard keeps the
    /// machine total anyway.
    pub fn on_tick(&mut self) -> Option<BoundaryEvent> {
        if self.run_state != RunState::Running {
            return None;
        }

        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            self.elapsed_secs += 1;
            None
        } else {
            Some(self.advance_interval(false))
        }
    }

    /// Manually end the current interval. Shares the advance path with the
    /// zero-remaining tick, so sequencing and side-effect requests are
    /// identical to a natural expiry. Accepted in any run state.
    pub fn skip(&mut self) -> BoundaryEvent {
        self.advance_interval(true)
    }

    /// Replace the configuration wholesale and reset the session.
    pub fn apply_settings(&mut self, config: Config) {
        self.config = config;
        self.stop();
    }

    fn advance_interval(&mut self, skipped: bool) -> BoundaryEvent {
        let adv = policy::advance(self.session_index, &self.config);

        let event = BoundaryEvent {
            finished_index: self.session_index,
            classification: BoundaryKind::from_finished_index(self.session_index),
            finished_kind: self.current_kind,
            planned_secs: self.planned_secs,
            elapsed_secs: self.elapsed_secs,
            skipped,
        };

        self.remaining_secs = adv.duration_secs;
        self.session_index = adv.next_index;
        self.current_kind = adv.kind;
        self.planned_secs = adv.duration_secs;
        self.elapsed_secs = 0;
        if adv.auto_stop {
            self.run_state = RunState::Idle;
        }

        event
    }
}
