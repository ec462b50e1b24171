// Formatting helpers for the display surfaces

use super::projection::Projection;

/// Session length in minutes
pub fn session_minutes(total_ticks: u64) -> f64 {
    total_ticks as f64 / 60.0
}

/// "42 minutes", or one decimal when the session is not a whole number of minutes
pub fn format_session_time(total_ticks: u64) -> String {
    if total_ticks % 60 == 0 {
        format!("{} minutes", total_ticks / 60)
    } else {
        format!("{:.1} minutes", session_minutes(total_ticks))
    }
}

/// Counter shown next to the active sequence: "<seconds left> <repeats left>"
pub fn count_label(projection: &Projection) -> String {
    format!(
        "{} {}",
        projection.remaining_ticks_in_phase, projection.repeats_remaining
    )
}

/// One-line status for the terminal display
pub fn status_line(projection: &Projection) -> String {
    if !projection.is_running {
        return format!(
            "idle - session time {}",
            format_session_time(projection.total_session_ticks)
        );
    }

    let channel = if projection.channel_active() {
        projection.step.label()
    } else {
        "-"
    };

    format!(
        "sequence {}/{} | {:<4} {:<5} | {:>3}s | {} repeats left",
        projection.sequence_index + 1,
        crate::sequencer::program::SEQUENCE_TABLE.len(),
        projection.phase.label(),
        channel,
        projection.remaining_ticks_in_phase,
        projection.repeats_remaining
    )
}
