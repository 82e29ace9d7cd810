use crate::error::Result;

/// Source of user input during a login.
pub trait Prompter: Send + Sync {
    /// Reads one line of plain text.
    fn ask(&self, prompt: &str) -> Result<String>;
    /// Reads one line without echoing it.
    fn ask_secret(&self, prompt: &str) -> Result<String>;
}
