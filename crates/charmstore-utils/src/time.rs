use std::time::Duration;

/// Parses a compact duration string such as `30s`, `1m30s`, `250ms` or `1d2h`.
///
/// Each component is a run of digits followed by one of the units `ms`, `s`,
/// `m`, `h` or `d`. Components are summed. An empty string is a zero duration.
///
/// Returns `None` for malformed input or on overflow.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use charmstore_utils::time::parse_duration;
///
/// assert_eq!(parse_duration("1m30s"), Some(Duration::from_secs(90)));
/// ```
pub fn parse_duration(input: &str) -> Option<Duration> {
    let mut total = Duration::ZERO;
    let mut rest = input.trim();

    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            return None;
        }

        let number: u32 = rest[..digits].parse().ok()?;
        rest = &rest[digits..];

        let (unit, tail) = if let Some(tail) = rest.strip_prefix("ms") {
            (Duration::from_millis(1), tail)
        } else {
            let mut chars = rest.chars();
            let unit = match chars.next()? {
                's' => Duration::from_secs(1),
                'm' => Duration::from_secs(60),
                'h' => Duration::from_secs(60 * 60),
                'd' => Duration::from_secs(24 * 60 * 60),
                _ => return None,
            };
            (unit, chars.as_str())
        };

        total = total.checked_add(unit.checked_mul(number)?)?;
        rest = tail;
    }

    Some(total)
}
