use std::io::{self, BufRead, Write};

use crate::error::{ProclogError, Result};
use crate::output::{CYAN, RESET};

/// Ask a free-form question on stdout and read one line from stdin.
pub fn ask(question: &str) -> Result<String> {
    let stdin = io::stdin();
    ask_with(question, &mut stdin.lock(), &mut io::stdout())
}

/// [`ask`] over arbitrary reader/writer pairs.
///
/// Returns the trimmed answer. End of input is an
/// [`ProclogError::InvalidInput`] since nothing was provided.
pub fn ask_with<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
) -> Result<String> {
    write!(output, "{CYAN}?{RESET} {} ", question)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ProclogError::InvalidInput(format!(
            "no answer given to '{}'",
            question
        )));
    }

    Ok(line.trim().to_string())
}
