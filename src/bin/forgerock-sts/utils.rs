use forgerock_sts::prompt::Prompter;
use forgerock_sts::Result;
use std::io::{self, BufRead, Write};

/// Asks on stderr so that stdout stays free for the credentials.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&self, prompt: &str) -> Result<String> {
        eprint!("{} ", prompt);
        let _ = io::stderr().flush();

        let mut buffer = String::new();
        io::stdin().lock().read_line(&mut buffer)?;
        // remove \n on unix or \r\n on windows
        let len = buffer.trim_end_matches(&['\r', '\n'][..]).len();
        buffer.truncate(len);

        Ok(buffer)
    }

    fn ask_secret(&self, prompt: &str) -> Result<String> {
        let secret = rpassword::prompt_password(format!("{} ", prompt))?;

        Ok(secret)
    }
}

/// Uses `current` when given, asks otherwise.
pub fn value_or_ask(
    prompter: &dyn Prompter,
    current: &Option<String>,
    prompt: &str,
) -> Result<String> {
    match current {
        Some(value) => Ok(value.clone()),
        None => prompter.ask(prompt),
    }
}
