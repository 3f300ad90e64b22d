use crate::config::Config;

/// Kind of a single countdown interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum IntervalKind {
    Work,
    #[strum(serialize = "Short Break")]
    ShortBreak,
    #[strum(serialize = "Long Break")]
    LongBreak,
}

/// Which side of an interval boundary just finished, classified by the
/// parity of the finished session index (odd = work, even = break).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum BoundaryKind {
    WorkFinished,
    BreakFinished,
}

impl BoundaryKind {
    pub fn from_finished_index(index: u32) -> Self {
        if index % 2 != 0 {
            BoundaryKind::WorkFinished
        } else {
            BoundaryKind::BreakFinished
        }
    }
}

/// Sessions are numbered from 1, breaks included: 1 work, 2 break, 3 work...
/// Odd indices are work intervals, even indices breaks.
pub fn is_work_index(index: u32) -> bool {
    index % 2 != 0
}

/// Outcome of advancing past the interval at `current_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub kind: IntervalKind,
    pub duration_secs: u64,
    /// The run pauses after every break; the user resumes work explicitly.
    pub auto_stop: bool,
    pub next_index: u32,
}

/// Decide what follows the interval at `current_index`.
///
/// The long-break substitution is checked before parity: when the finished
/// index equals the configured delay, the next interval is a long break and
/// the countdown keeps running. Otherwise an odd (work) index is followed by
/// a running short break, and an even (break) index by a stopped work
/// interval. Total over all positive indices.
pub fn advance(current_index: u32, config: &Config) -> Advance {
    let next_index = current_index + 1;

    if current_index == config.long_break_delay {
        Advance {
            kind: IntervalKind::LongBreak,
            duration_secs: config.long_break_secs,
            auto_stop: false,
            next_index,
        }
    } else if is_work_index(current_index) {
        Advance {
            kind: IntervalKind::ShortBreak,
            duration_secs: config.short_break_secs,
            auto_stop: false,
            next_index,
        }
    } else {
        Advance {
            kind: IntervalKind::Work,
            duration_secs: config.work_secs,
            auto_stop: true,
            next_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock() -> Config {
        Config::default()
    }

    #[test]
    fn work_finishes_into_running_short_break() {
        let adv = advance(1, &stock());
        assert_eq!(adv.kind, IntervalKind::ShortBreak);
        assert_eq!(adv.duration_secs, 300);
        assert!(!adv.auto_stop);
        assert_eq!(adv.next_index, 2);
    }

    #[test]
    fn break_finishes_into_stopped_work() {
        let adv = advance(2, &stock());
        assert_eq!(adv.kind, IntervalKind::Work);
        assert_eq!(adv.duration_secs, 1500);
        assert!(adv.auto_stop);
        assert_eq!(adv.next_index, 3);
    }

    #[test]
    fn delay_index_triggers_long_break() {
        let adv = advance(4, &stock());
        assert_eq!(adv.kind, IntervalKind::LongBreak);
        assert_eq!(adv.duration_secs, 1200);
        assert!(!adv.auto_stop);
        assert_eq!(adv.next_index, 5);
    }

    #[test]
    fn delay_check_precedes_parity() {
        // With an even delay the substitution happens on a break index; the
        // parity branches never see it.
        let mut cfg = stock();
        cfg.long_break_delay = 2;

        let adv = advance(2, &cfg);
        assert_eq!(adv.kind, IntervalKind::LongBreak);
        assert_eq!(adv.duration_secs, cfg.long_break_secs);
        assert!(!adv.auto_stop);
        assert_eq!(adv.next_index, 3);
    }

    #[test]
    fn past_the_delay_parity_rules_resume() {
        let adv = advance(5, &stock());
        assert_eq!(adv.kind, IntervalKind::ShortBreak);
        assert_eq!(adv.duration_secs, 300);
        assert!(!adv.auto_stop);
        assert_eq!(adv.next_index, 6);

        let adv = advance(6, &stock());
        assert_eq!(adv.kind, IntervalKind::Work);
        assert!(adv.auto_stop);
        assert_eq!(adv.next_index, 7);
    }

    #[test]
    fn advance_is_total_and_deterministic() {
        let cfg = stock();
        for index in 1..=50u32 {
            let a = advance(index, &cfg);
            let b = advance(index, &cfg);
            assert_eq!(a, b);
            assert_eq!(a.next_index, index + 1);
            assert!(a.duration_secs > 0);
        }
    }

    #[test]
    fn boundary_classification_follows_parity() {
        assert_eq!(
            BoundaryKind::from_finished_index(1),
            BoundaryKind::WorkFinished
        );
        assert_eq!(
            BoundaryKind::from_finished_index(2),
            BoundaryKind::BreakFinished
        );
        assert_eq!(
            BoundaryKind::from_finished_index(7),
            BoundaryKind::WorkFinished
        );
    }

    #[test]
    fn interval_kind_display_names() {
        assert_eq!(IntervalKind::Work.to_string(), "Work");
        assert_eq!(IntervalKind::ShortBreak.to_string(), "Short Break");
        assert_eq!(IntervalKind::LongBreak.to_string(), "Long Break");
    }
}
