//! Line-level parsing of checksum manifests.
//!
//! A line is `<path> <hex>`, split at the last space so paths may contain
//! spaces. Lines starting with `;` are comments. The checksum is read from
//! the token's leading hex digits.

/// Parse one manifest line into `(path bytes, expected checksum)`.
/// Returns `None` for comments, blank lines and malformed lines.
pub fn parse_line(line: &[u8]) -> Option<(&[u8], u32)> {
    let line = trim_end(line);
    if line.is_empty() || line[0] == b';' {
        return None;
    }
    let split = line.iter().rposition(|&b| b == b' ')?;
    let path = trim_end(&line[..split]);
    let token = &line[split + 1..];
    if path.is_empty() {
        return None;
    }
    Some((path, parse_hex32(token)?))
}

/// Unsigned hex from the leading digits of `token`; parsing stops at the
/// first non-hex byte. Needs at least one digit and must fit in 32 bits.
/// No sign or `0x` prefix is recognised.
fn parse_hex32(token: &[u8]) -> Option<u32> {
    let digits = token
        .iter()
        .position(|b| !b.is_ascii_hexdigit())
        .unwrap_or(token.len());
    if digits == 0 {
        return None;
    }
    token[..digits].iter().try_fold(0u32, |acc, &b| {
        let digit = (b as char).to_digit(16)?;
        acc.checked_mul(16)?.checked_add(digit)
    })
}

fn trim_end(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &bytes[..end]
}
