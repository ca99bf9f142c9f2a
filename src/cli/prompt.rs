//! Legal warning and authorization prompt

use std::io::{self, BufRead, Write};

/// Print the legal warning banner
pub fn write_warning(out: &mut impl Write) -> io::Result<()> {
    let rule = "=".repeat(80);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "⚠️  LEGAL WARNING - READ CAREFULLY")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "This tool is for testing YOUR OWN infrastructure only.")?;
    writeln!(
        out,
        "Using this against systems you don't own or operate is ILLEGAL and a CYBERCRIME."
    )?;
    writeln!(
        out,
        "It may result in IMPRISONMENT or other serious punishment if reported & tracked via IP."
    )?;
    writeln!(
        out,
        "You must have explicit written authorization before testing any system."
    )?;
    writeln!(out, "{rule}")
}

/// Ask for confirmation; only an explicit "yes" (any case) proceeds
pub fn confirm(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    write!(
        out,
        "\n✋ Do you own this system and have authorization to test it? (yes/no): "
    )?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}
