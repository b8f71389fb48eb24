use std::{fmt, time::Duration};

use colored::Colorize;
use tracing::debug;

/// How long a notification stays up unless the caller says otherwise.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Level {
    Success,
    Error,
    Warning,
    Info,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque handle returned by [`Notifier::show`], only good for dismissal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NotificationId(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub level: Level,
    pub duration: Duration,
}

/// Fire-and-forget toast boundary.
pub trait Notifier {
    fn show(&mut self, message: &str, level: Level, duration: Duration) -> NotificationId;

    fn dismiss(&mut self, id: NotificationId);

    fn success(&mut self, message: &str) -> NotificationId {
        self.show(message, Level::Success, DEFAULT_DURATION)
    }

    fn error(&mut self, message: &str) -> NotificationId {
        self.show(message, Level::Error, DEFAULT_DURATION)
    }

    fn warning(&mut self, message: &str) -> NotificationId {
        self.show(message, Level::Warning, DEFAULT_DURATION)
    }

    fn info(&mut self, message: &str) -> NotificationId {
        self.show(message, Level::Info, DEFAULT_DURATION)
    }
}

/// Prints notifications to stderr. Terminal lines cannot be withdrawn, so
/// durations and dismissal are accepted and ignored.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    next_id: u64,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Notifier for ConsoleNotifier {
    fn show(&mut self, message: &str, level: Level, _duration: Duration) -> NotificationId {
        self.next_id += 1;
        let line = match level {
            Level::Success => format!("✔ {message}").green(),
            Level::Error => format!("✖ {message}").red(),
            Level::Warning => format!("! {message}").yellow(),
            Level::Info => format!("i {message}").blue(),
        };
        eprintln!("{line}");
        NotificationId(self.next_id)
    }

    fn dismiss(&mut self, id: NotificationId) {
        debug!(?id, "dismiss requested for console notification");
    }
}

/// Keeps every notification in memory; the surface used by tests and by
/// callers that want to inspect outcomes.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    entries: Vec<Notification>,
    dismissed: Vec<NotificationId>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Notification> {
        self.entries.last()
    }

    /// Notifications that have not been dismissed yet.
    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.entries
            .iter()
            .filter(|entry| !self.dismissed.contains(&entry.id))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.dismissed.clear();
    }
}

impl Notifier for RecordingNotifier {
    fn show(&mut self, message: &str, level: Level, duration: Duration) -> NotificationId {
        let id = NotificationId(self.entries.len() as u64 + 1);
        self.entries.push(Notification {
            id,
            message: message.to_string(),
            level,
            duration,
        });
        id
    }

    fn dismiss(&mut self, id: NotificationId) {
        if !self.dismissed.contains(&id) {
            self.dismissed.push(id);
        }
    }
}
