//! Common utilities and helpers

use std::time::Duration;

/// Utility functions for ClipBatch
pub struct Utils;

impl Utils {
    /// Format duration for display
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        let milliseconds = duration.subsec_millis();

        if hours > 0 {
            format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, milliseconds)
        } else {
            format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
        }
    }

    /// Format clip time in seconds as HH:MM:SS.mmm, or raw seconds when out of range
    pub fn format_timestamp(seconds: f64) -> String {
        match Duration::try_from_secs_f64(seconds.max(0.0)) {
            Ok(duration) => Self::format_duration(duration),
            Err(_) => format!("{:.3}s", seconds),
        }
    }

    /// Calculate progress percentage
    pub fn calculate_progress(current: usize, total: usize) -> f64 {
        if total == 0 {
            100.0
        } else {
            (current as f64 / total as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(Utils::format_duration(Duration::from_millis(61_250)), "01:01.250");
        assert_eq!(Utils::format_duration(Duration::from_secs(3_725)), "01:02:05.000");
    }

    #[test]
    fn test_format_timestamp_clamps_negative() {
        assert_eq!(Utils::format_timestamp(10.0), "00:10.000");
        assert_eq!(Utils::format_timestamp(-1.0), "00:00.000");
    }

    #[test]
    fn test_format_timestamp_out_of_range_falls_back_to_seconds() {
        let huge = 1e300 / 30.0;
        assert_eq!(Utils::format_timestamp(huge), format!("{:.3}s", huge));
        assert_eq!(Utils::format_timestamp(f64::INFINITY), "infs");
    }

    #[test]
    fn test_calculate_progress() {
        assert_eq!(Utils::calculate_progress(1, 4), 25.0);
        assert_eq!(Utils::calculate_progress(0, 0), 100.0);
    }
}
