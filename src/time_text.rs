/// `mm:ss` formatting and parsing for the countdown display
use regex::Regex;
use std::sync::OnceLock;

fn minutes_seconds_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)\s*:\s*(\d+)$").expect("valid time pattern"))
}

/// Format seconds as zero-padded `mm:ss`; minutes grow past two digits
pub fn format_time_text(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Parse operator time input: `m:ss`, `mm:ss` or plain seconds
///
/// Anything unparseable yields 0. Seconds above 59 are accepted and carried
/// into minutes (`1:75` is 135 seconds).
pub fn parse_time_text(input: &str) -> u64 {
    let text = input.trim();

    if let Some(captures) = minutes_seconds_pattern().captures(text) {
        let minutes: Option<u64> = captures.get(1).and_then(|m| m.as_str().parse().ok());
        let seconds: Option<u64> = captures.get(2).and_then(|s| s.as_str().parse().ok());
        return match (minutes, seconds) {
            (Some(m), Some(s)) => m.saturating_mul(60).saturating_add(s),
            _ => 0,
        };
    }

    text.parse().unwrap_or_else(|_| {
        tracing::debug!("Unparseable time text '{}', using 0", text);
        0
    })
}
