use crate::error::WarnError;

pub(crate) fn parse_mmss(raw: &str) -> Result<u32, WarnError> {
    let invalid = || WarnError::InvalidTimestamp {
        input: raw.to_string(),
    };
    let (minutes, seconds) = raw.trim().split_once(':').ok_or_else(invalid)?;
    let minutes = parse_digits(minutes).ok_or_else(invalid)?;
    let seconds = parse_digits(seconds).ok_or_else(invalid)?;
    if seconds >= 60 {
        return Err(invalid());
    }
    minutes
        .checked_mul(60)
        .and_then(|total| total.checked_add(seconds))
        .ok_or_else(invalid)
}

pub(crate) fn format_mmss(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

// `u32::from_str` accepts a leading '+', which is not a valid clock field.
fn parse_digits(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}
