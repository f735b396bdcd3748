//! # Notifications
//!
//! One capability for telling the user what happened and for asking before a
//! destructive action. Each host supplies its own implementation; the core
//! only sees `dyn Notifier`.

use std::fmt;

use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The answer to a confirmation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Granted,
    Denied,
    /// The host will ask asynchronously and report back through
    /// `Action::ConfirmDelete` or `Action::CancelDelete`.
    Pending,
}

pub trait Notifier {
    fn name(&self) -> &str;

    fn notify(&mut self, notice: &Notice);

    fn confirm(&mut self, prompt: &str) -> Confirmation;
}

/// Headless notifier: writes notices to the log and answers confirmations
/// with a fixed policy.
pub struct LogNotifier {
    assume_yes: bool,
}

impl LogNotifier {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn notify(&mut self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Warning | NoticeLevel::Failure => warn!("{}", notice.message),
            NoticeLevel::Success | NoticeLevel::Info => info!("{}", notice.message),
        }
    }

    fn confirm(&mut self, prompt: &str) -> Confirmation {
        let answer = if self.assume_yes {
            Confirmation::Granted
        } else {
            Confirmation::Denied
        };
        info!("Confirm '{prompt}': {answer:?}");
        answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_notifier_policy() {
        assert_eq!(LogNotifier::new(true).confirm("delete?"), Confirmation::Granted);
        assert_eq!(LogNotifier::new(false).confirm("delete?"), Confirmation::Denied);
    }

    #[test]
    fn test_notice_display_is_message() {
        let notice = Notice::new(NoticeLevel::Success, "Saved");
        assert_eq!(notice.to_string(), "Saved");
    }
}
