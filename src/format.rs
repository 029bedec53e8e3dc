/// Human readable duration: `45s`, `3m 5s`, `1h 2m 3s`.
pub fn format_duration(seconds: i64) -> String {
    if seconds < 0 {
        return "invalid duration".to_string();
    }
    if seconds < 60 {
        return format!("{seconds}s");
    }
    if seconds < 3600 {
        return format!("{}m {}s", seconds / 60, seconds % 60);
    }
    format!("{}h {}m {}s", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}

/// `HH:MM:SS` clock face for the running timer.
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}:{:02}", seconds / 3600, (seconds % 3600) / 60, seconds % 60)
}
