use std::io::{self, BufRead, Write};

use crate::error::Result;

/// Asks a yes/no question on standard input. Only `y`/`Y` confirms; any
/// other answer (including EOF) declines. Blocking read, no timeout.
pub fn confirm(question: &str) -> Result<bool> {
    let stdin = io::stdin();
    let mut answer = String::new();
    ask(question, &mut stdin.lock(), &mut io::stdout(), &mut answer)?;
    Ok(is_yes(&answer))
}

fn ask<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    output: &mut W,
    answer: &mut String,
) -> Result<()> {
    write!(output, "{question} (y/n): ")?;
    output.flush()?;
    input.read_line(answer)?;
    Ok(())
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_y_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes("Y\n"));
        assert!(!is_yes("yes\n"));
        assert!(!is_yes("n\n"));
        assert!(!is_yes(""));
    }

    #[test]
    fn prompt_appends_the_answer_hint() {
        let mut input = &b"y\n"[..];
        let mut output = Vec::new();
        let mut answer = String::new();
        ask("继续?", &mut input, &mut output, &mut answer).expect("prompt written");

        assert_eq!(String::from_utf8(output).expect("utf-8"), "继续? (y/n): ");
        assert!(is_yes(&answer));
    }
}
