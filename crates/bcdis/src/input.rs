//! Reading bytecode from files.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Reads bytecode from `path`, either raw or as hex text.
pub fn read_bytecode(path: &Path, hex: bool) -> Result<Vec<u8>> {
    if hex {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read hex file: {}", path.display()))?;
        parse_hex_bytes(&text).with_context(|| format!("Invalid hex in {}", path.display()))
    } else {
        fs::read(path).with_context(|| format!("Failed to read bytecode: {}", path.display()))
    }
}

/// Parses whitespace- or comma-separated hex bytes.
///
/// Bytes may carry a `0x` prefix and may be run together (`0c05`).
/// Everything after `;` or `#` on a line is a comment.
pub fn parse_hex_bytes(text: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.split(|c: char| c == ';' || c == '#').next().unwrap_or("");
        for token in line.split(|c: char| c.is_whitespace() || c == ',') {
            let token = token.strip_prefix("0x").unwrap_or(token);
            if token.is_empty() {
                continue;
            }
            if token.len() % 2 != 0 {
                bail!("line {}: odd number of hex digits in {:?}", line_no + 1, token);
            }
            for pair in token.as_bytes().chunks(2) {
                let digits = std::str::from_utf8(pair)
                    .with_context(|| format!("line {}: non-ASCII input", line_no + 1))?;
                let byte = u8::from_str_radix(digits, 16)
                    .with_context(|| format!("line {}: invalid hex byte {:?}", line_no + 1, digits))?;
                bytes.push(byte);
            }
        }
    }

    Ok(bytes)
}

/// Parses an offset given in decimal or `0x`-prefixed hex.
pub fn parse_offset(s: &str) -> Result<usize, String> {
    match s.strip_prefix("0x") {
        Some(hex) => usize::from_str_radix(hex, 16).map_err(|e| e.to_string()),
        None => s.parse().map_err(|e: std::num::ParseIntError| e.to_string()),
    }
}
