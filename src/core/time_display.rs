use crate::constants::LONG_MEDIA_THRESHOLD_SECS;

/// Format the `position / duration` readout shown on the control bar.
///
/// Short media uses `mm:ss`, anything an hour or longer uses `hh:mm:ss` for
/// both sides. Negative and non-finite inputs read as zero.
pub fn format_time_display(position: f64, duration: f64) -> String {
    let position = whole_seconds(position);
    let duration_secs = whole_seconds(duration);

    if duration.is_finite() && duration >= LONG_MEDIA_THRESHOLD_SECS {
        format!("{} / {}", format_hms(position), format_hms(duration_secs))
    } else {
        format!("{} / {}", format_ms(position), format_ms(duration_secs))
    }
}

fn whole_seconds(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

// Clock-style: hours wrap at a day, minutes past an hour fold into the hour
fn format_ms(total: u64) -> String {
    let total = total % 86_400;
    format!("{:02}:{:02}", (total / 60) % 60, total % 60)
}

fn format_hms(total: u64) -> String {
    let total = total % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_media_uses_minutes() {
        assert_eq!(format_time_display(12.0, 45.0), "00:12 / 00:45");
        assert_eq!(format_time_display(59.9, 3599.0), "00:59 / 59:59");
    }

    #[test]
    fn test_long_media_uses_hours() {
        assert_eq!(format_time_display(10.0, 3661.0), "00:00:10 / 01:01:01");
        assert_eq!(format_time_display(0.0, 3600.0), "00:00:00 / 01:00:00");
    }

    #[test]
    fn test_invalid_inputs_read_as_zero() {
        assert_eq!(format_time_display(-3.0, 45.0), "00:00 / 00:45");
        assert_eq!(format_time_display(f64::NAN, 0.0), "00:00 / 00:00");
    }
}
