use std::io::{self, Write as _};

use dialoguer::theme::ColorfulTheme;

use crate::ui::{ClipboardWriter, Confirm, NamePrompt, Notifier};

/// Terminal implementation of the collaborator interfaces, backed by
/// `dialoguer`.
#[derive(Default)]
pub struct ConsoleShell {
    theme: ColorfulTheme,
}

impl ConsoleShell {
    /// Build a shell with the default prompt theme.
    pub fn new() -> Self {
        Self::default()
    }
}

impl NamePrompt for ConsoleShell {
    fn request_name(&self) -> Option<String> {
        dialoguer::Input::<String>::with_theme(&self.theme)
            .with_prompt("Enter a name for this game")
            .allow_empty(true)
            .interact_text()
            .ok()
            .filter(|name| !name.trim().is_empty())
    }
}

impl Confirm for ConsoleShell {
    fn confirm(&self, message: &str) -> bool {
        dialoguer::Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

impl Notifier for ConsoleShell {
    fn notify(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

impl ClipboardWriter for ConsoleShell {
    /// The terminal has no clipboard; the document is printed so the user
    /// can copy it from the scrollback.
    fn write(&self, document: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{document}")?;
        handle.flush()
    }
}
