//! Interactive yes/no confirmation

use std::io::{BufRead, Write};

/// Ask a yes/no question on stdin. Accepts `y`/`yes`/`n`/`no` (any case,
/// surrounding whitespace ignored); anything else re-prompts. Blocks until
/// the user answers.
pub fn confirm(question: &str) -> std::io::Result<bool> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    confirm_with(&mut stdin.lock(), &mut stdout.lock(), question)
}

fn confirm_with<R: BufRead, W: Write>(
    reader: &mut R,
    writer: &mut W,
    question: &str,
) -> std::io::Result<bool> {
    loop {
        write!(writer, "{question} (y/n): ")?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            // stdin closed; treat as a decline rather than looping forever
            return Ok(false);
        }

        match line.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &str) -> (bool, String) {
        let mut reader = input.as_bytes();
        let mut output = Vec::new();
        let answer = confirm_with(&mut reader, &mut output, "Delete?").unwrap();
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn accepts_yes_after_garbage() {
        let (answer, output) = run("maybe\nYES\n");
        assert!(answer);
        // re-prompted once
        assert_eq!(output.matches("(y/n)").count(), 2);
    }

    #[test]
    fn plain_n_declines() {
        let (answer, _) = run("n\n");
        assert!(!answer);
    }

    #[test]
    fn case_and_whitespace_are_ignored() {
        assert!(run("  Y  \n").0);
        assert!(!run("\tNo\n").0);
    }

    #[test]
    fn blank_input_reprompts() {
        let (answer, output) = run("\n   \ny\n");
        assert!(answer);
        assert_eq!(output.matches("(y/n)").count(), 3);
    }

    #[test]
    fn eof_declines() {
        let (answer, _) = run("");
        assert!(!answer);
    }
}
