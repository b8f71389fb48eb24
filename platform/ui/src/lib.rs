//! Boundaries between the HR pipeline and whatever surface presents it:
//! translation, notifications, routing, input debouncing and user-facing errors.

pub mod debounce;
pub mod error;
pub mod i18n;
pub mod notify;
pub mod route;

pub use debounce::{Debouncer, Pending};
pub use error::{UserFacing, report};
pub use i18n::{Locale, Translator};
pub use notify::{ConsoleNotifier, Level, NotificationId, Notifier, RecordingNotifier};
pub use route::Route;
