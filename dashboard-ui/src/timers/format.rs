const SECOND_MS: i64 = 1000;
const MINUTE_MS: i64 = SECOND_MS * 60;
const HOUR_MS: i64 = MINUTE_MS * 60;
const DAY_MS: i64 = HOUR_MS * 24;

/// `[d:]h:m:s.ms` for a stopwatch. Days are omitted when zero.
pub fn format_elapsed(elapsed_ms: i64, padding: Option<char>) -> String {
    if elapsed_ms < 0 {
        return match padding {
            Some(p) => format!("{p}{p}:{p}{p}:{p}{p}:{p}{p}.{p}{p}{p}"),
            None => "0:0:0:0.0".to_string(),
        };
    }

    let days = elapsed_ms / DAY_MS;
    let hours = (elapsed_ms % DAY_MS) / HOUR_MS;
    let minutes = (elapsed_ms % HOUR_MS) / MINUTE_MS;
    let seconds = (elapsed_ms % MINUTE_MS) / SECOND_MS;
    let millis = elapsed_ms % SECOND_MS;

    let clock = format!(
        "{}:{}:{}.{}",
        pad(hours, 2, padding),
        pad(minutes, 2, padding),
        pad(seconds, 2, padding),
        pad(millis, 3, padding),
    );

    if days > 0 {
        format!("{}:{clock}", pad(days, 2, padding))
    } else {
        clock
    }
}

/// `h:m:s` for a countdown. Hours wrap at a day and every field is clamped at zero.
pub fn format_remaining(remaining_ms: i64, padding: Option<char>) -> String {
    let hours = ((remaining_ms % DAY_MS) / HOUR_MS).max(0);
    let minutes = ((remaining_ms % HOUR_MS) / MINUTE_MS).max(0);
    let seconds = ((remaining_ms % MINUTE_MS) / SECOND_MS).max(0);

    format!(
        "{}:{}:{}",
        pad(hours, 2, padding),
        pad(minutes, 2, padding),
        pad(seconds, 2, padding),
    )
}

fn pad(value: i64, width: usize, padding: Option<char>) -> String {
    let digits = value.to_string();
    match padding {
        Some(p) if digits.len() < width => {
            let mut out: String = std::iter::repeat(p).take(width - digits.len()).collect();
            out.push_str(&digits);
            out
        }
        _ => digits,
    }
}
