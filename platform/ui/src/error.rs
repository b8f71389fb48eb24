use platform_store::StorageError;
use tracing::warn;

use crate::{
    i18n::Translator,
    notify::{NotificationId, Notifier},
};

/// Errors that can be shown to a user: a stable code for logs and scripts,
/// and a localized message.
pub trait UserFacing: std::error::Error {
    fn code(&self) -> &'static str;

    fn message(&self, translator: &Translator) -> String;
}

/// Logs `err`, translates it, and raises it as an error notification.
pub fn report<E, N>(err: &E, translator: &Translator, notifier: &mut N) -> NotificationId
where
    E: UserFacing + ?Sized,
    N: Notifier + ?Sized,
{
    warn!(code = err.code(), error = %err, "operation failed");
    let message = err.message(translator);
    notifier.error(&message)
}

impl UserFacing for StorageError {
    fn code(&self) -> &'static str {
        StorageError::code(self)
    }

    fn message(&self, translator: &Translator) -> String {
        let detail = match self {
            StorageError::QuotaExceeded { .. } => translator.t("errors.storage.quotaExceeded"),
            StorageError::AccessDenied(_) => translator.t("errors.storage.accessDenied"),
            StorageError::Malformed { .. } => translator.t("errors.storage.readError"),
            StorageError::KeyRequired
            | StorageError::InvalidKey(_)
            | StorageError::Serialization { .. }
            | StorageError::Io(_) => translator.t("errors.storage.writeError"),
        };
        format!("{}: {}", translator.t("errors.storage.failed"), detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Level, Locale, RecordingNotifier};

    #[test]
    fn storage_errors_are_reported_as_localized_notifications() {
        let translator = Translator::new(Locale::En).unwrap();
        let mut notifier = RecordingNotifier::new();
        let err = StorageError::QuotaExceeded {
            needed: 10,
            remaining: 2,
        };
        report(&err, &translator, &mut notifier);
        let shown = notifier.last().unwrap();
        assert_eq!(shown.level, Level::Error);
        assert_eq!(
            shown.message,
            "Failed to save changes: Storage quota exceeded. Cannot save additional data."
        );
    }

    #[test]
    fn codes_pass_through() {
        let err = StorageError::AccessDenied("locked".into());
        assert_eq!(UserFacing::code(&err), "ACCESS_DENIED");
    }
}
