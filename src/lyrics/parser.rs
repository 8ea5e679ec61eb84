//! LRC format parser
//!
//! Each input line may carry a `[mm:ss.xx]` or `[mm:ss.xxx]` timestamp tag:
//! [00:12.34] Hello world
//! [00:15.000] Another line
//!
//! Only the first tag of a line is honored; a second tag stays in the text.
//! Lines without a tag, or with nothing left after removing it, are skipped.

use super::LyricLine;

/// Parse LRC text into timed lines, in source order.
pub fn parse(content: &str) -> Vec<LyricLine> {
    let mut lines = Vec::new();

    for raw in content.lines() {
        let Some((time, start, end)) = find_tag(raw) else {
            continue;
        };

        let mut text = String::with_capacity(raw.len() - (end - start));
        text.push_str(&raw[..start]);
        text.push_str(&raw[end..]);
        let text = text.trim();

        if !text.is_empty() {
            lines.push(LyricLine::new(time, text.to_string()));
        }
    }

    lines
}

/// Locate the first well-formed timestamp tag in a line.
/// Returns the time in seconds and the byte range of the tag.
fn find_tag(line: &str) -> Option<(f64, usize, usize)> {
    line.match_indices('[').find_map(|(start, _)| {
        let (time, len) = parse_tag(&line[start..])?;
        Some((time, start, start + len))
    })
}

/// Parse a tag at the start of `s`: `[` 2 digits `:` 2 digits `.` 2-3 digits `]`.
fn parse_tag(s: &str) -> Option<(f64, usize)> {
    let b = s.as_bytes();
    if b.len() < 10 || b[0] != b'[' || b[3] != b':' || b[6] != b'.' {
        return None;
    }

    let min = two_digits(&b[1..3])?;
    let sec = two_digits(&b[4..6])?;

    let frac_len = b[7..].iter().take_while(|c| c.is_ascii_digit()).count();
    if !(2..=3).contains(&frac_len) || b.get(7 + frac_len) != Some(&b']') {
        return None;
    }

    // ASCII digits only, so the slice is valid UTF-8.
    let frac: u32 = s[7..7 + frac_len].parse().ok()?;
    // Two digits are centiseconds, three are milliseconds.
    let ms = if frac_len == 2 { frac * 10 } else { frac };

    let time = f64::from(min) * 60.0 + f64::from(sec) + f64::from(ms) / 1000.0;
    Some((time, 7 + frac_len + 1))
}

fn two_digits(b: &[u8]) -> Option<u32> {
    match b {
        [h, l] if h.is_ascii_digit() && l.is_ascii_digit() => {
            Some(u32::from(h - b'0') * 10 + u32::from(l - b'0'))
        }
        _ => None,
    }
}
