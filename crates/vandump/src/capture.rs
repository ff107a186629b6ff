use anyhow::{Context, Result, anyhow};
use vanbus::VanFrame;

/// Parse one capture line.
///
/// Frames are written `IDEN#HEXPAYLOAD`, optionally preceded by a
/// `(timestamp)` and an interface name as candump logs are, and optionally
/// followed by `!` when the receiver saw a checksum failure. Blank lines and
/// `;` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<VanFrame>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(';') {
        return Ok(None);
    }
    let rest = match line.strip_prefix('(') {
        Some(stamped) => stamped
            .split_once(')')
            .map(|(_, rest)| rest)
            .ok_or_else(|| anyhow!("unterminated timestamp"))?,
        None => line,
    };

    let mut tokens = rest.split_whitespace();
    let frame = tokens
        .by_ref()
        .find(|t| t.contains('#'))
        .ok_or_else(|| anyhow!("no IDEN#DATA field"))?;
    let checksum_ok = match tokens.next() {
        None => true,
        Some("!") => false,
        Some(other) => return Err(anyhow!("unexpected trailing field {other:?}")),
    };

    let (iden, data) = frame.split_once('#').unwrap_or((frame, ""));
    let iden = u16::from_str_radix(iden, 16).with_context(|| format!("bad identifier {iden:?}"))?;
    let data = hex::decode(data).with_context(|| format!("bad payload {data:?}"))?;
    Ok(Some(VanFrame::new(iden, &data, checksum_ok)?))
}
