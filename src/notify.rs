use std::io::Write;

use notify_rust::Notification;

use crate::policy::BoundaryKind;

/// Renders interval-boundary notifications. The timer only decides *that* a
/// boundary was crossed; implementations decide how to tell the user.
pub trait Notifier {
    fn notify(&mut self, boundary: BoundaryKind);
}

/// Fixed notification copy per boundary class.
pub fn boundary_copy(boundary: BoundaryKind) -> (&'static str, &'static str) {
    match boundary {
        BoundaryKind::WorkFinished => ("It's Break Time", "Take a short break... :)"),
        BoundaryKind::BreakFinished => ("It's Work Time!", "Time to get back to work... :)"),
    }
}

/// Desktop notifications via the platform notification service, degrading to
/// the terminal bell when the service is unavailable.
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&mut self, boundary: BoundaryKind) {
        let (summary, body) = boundary_copy(boundary);

        let shown = Notification::new()
            .summary(summary)
            .body(body)
            .appname("pomo")
            .icon("alarm-clock")
            .show();

        if shown.is_err() {
            let mut out = std::io::stdout();
            let _ = out.write_all(b"\x07");
            let _ = out.flush();
        }
    }
}

/// Swallows notifications; used under `--quiet` and in tests.
#[derive(Debug, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _boundary: BoundaryKind) {}
}
