use crate::error::Result;
use std::io::{self, Write};

/// Only "y" and "yes" (any casing) count as consent; everything else,
/// including an empty line, is a refusal.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Ask a yes/no question on the terminal and block for the answer.
pub fn confirm(question: &str) -> Result<bool> {
    print!("{question} (Y/N) ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_affirmative(&input))
}
