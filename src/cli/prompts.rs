use std::io::{self, Write};

use anyhow::{Context, Result};

/// Print a prompt, read one line from stdin, and hand back the trimmed text.
/// Every interactive field in the tool goes through here so whitespace
/// handling stays uniform.
pub(crate) fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush().context("failed to flush prompt")?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read input")?;
    Ok(line.trim().to_string())
}

/// Ask a T/F question. Only a lone `t`/`T` counts as yes, mirroring the
/// confirmation convention used throughout the menus.
pub(crate) fn confirm(label: &str) -> Result<bool> {
    let answer = prompt(label)?;
    Ok(answer.eq_ignore_ascii_case("t"))
}

/// Interpret a menu selection. `None` means the input was not a number at
/// all; the caller decides what range is meaningful.
pub(crate) fn parse_selection(input: &str) -> Option<usize> {
    input.trim().parse::<usize>().ok()
}
