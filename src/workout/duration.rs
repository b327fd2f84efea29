//! Duration and count text helpers
//!
//! Display format is always `MM:SS` with unbounded minutes. Parsing is
//! forgiving about shape (`45`, `1:05`, `1:00:30`) but strict about range,
//! and reports failure as `None` rather than a default so callers can show
//! a validation message instead of silently saving a wrong value.

/// Formats whole seconds as zero-padded `MM:SS`.
///
/// Minutes are not wrapped into hours (`3600` → `"60:00"`). Negative input
/// is clamped to zero. Session totals wider than `u32` format fine, but
/// [`parse_duration`] only reads values back up to `u32::MAX`.
#[must_use]
pub fn format_duration(sec: i64) -> String {
    let s = sec.max(0);
    format!("{:02}:{:02}", s / 60, s % 60)
}

/// Parses duration text into whole seconds.
///
/// Accepted shapes, after trimming surrounding whitespace:
///
/// | input        | meaning                | constraints                  |
/// |--------------|------------------------|------------------------------|
/// | empty        | `0`                    |                              |
/// | `S`          | seconds                | `S >= 0`                     |
/// | `M:S`        | minutes, seconds       | `M >= 0`, `S` in `0..=59`    |
/// | `H:M:S`      | hours, minutes, seconds| `H >= 0`, `M`, `S` in `0..=59` |
///
/// Returns `None` for any other shape, a non-numeric component, an
/// out-of-range component, or a result that does not fit in `u32`.
#[must_use]
pub fn parse_duration(input: &str) -> Option<u32> {
    let t = input.trim();
    if t.is_empty() {
        return Some(0);
    }

    if !t.contains(':') {
        return parse_component(t);
    }

    let parts: Vec<&str> = t.split(':').collect();
    match parts.as_slice() {
        [m, s] => {
            let m = parse_component(m)?;
            let s = parse_sixty(s)?;
            m.checked_mul(60)?.checked_add(s)
        }
        [h, m, s] => {
            let h = parse_component(h)?;
            let m = parse_sixty(m)?;
            let s = parse_sixty(s)?;
            h.checked_mul(3600)?.checked_add(m * 60 + s)
        }
        _ => None,
    }
}

/// Parses a positive-count text field (reps, sets).
///
/// Only ASCII digits are accepted; signs and inner whitespace are not.
/// Zero parses successfully; callers reject it where needed.
#[must_use]
pub fn parse_count(input: &str) -> Option<u32> {
    let t = input.trim();
    if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    t.parse().ok()
}

/// A single non-negative numeric component.
fn parse_component(s: &str) -> Option<u32> {
    let n: i64 = s.parse().ok()?;
    u32::try_from(n).ok()
}

/// A component constrained to `0..=59`.
fn parse_sixty(s: &str) -> Option<u32> {
    parse_component(s).filter(|n| *n <= 59)
}
