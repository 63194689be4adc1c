use rollcall_core::{Notification, NotificationLevel, Notifier};

/// Prints notifications to the terminal: successes and info on stdout,
/// errors on stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier {
    quiet: bool,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps stdout clean for machine-readable output; errors still print.
    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

fn render(notification: &Notification) -> String {
    match notification.level {
        NotificationLevel::Success => format!("✅ {}", notification.message),
        NotificationLevel::Error => format!("❌ {}", notification.message),
        NotificationLevel::Info => format!("ℹ️  {}", notification.message),
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => eprintln!("{}", render(&notification)),
            _ if self.quiet => {}
            _ => println!("{}", render(&notification)),
        }
    }
}
