use chrono::NaiveDateTime;

/// Output folder name: `"<prefix>_<test>_<YYYYMMDD_HHMM>"`.
#[must_use]
pub fn folder_name(prefix: &str, test_name: &str, timestamp: &NaiveDateTime) -> String {
    format!("{prefix}_{test_name}_{}", timestamp.format("%Y%m%d_%H%M"))
}

/// Viewpoint name: `"<ordinal> - <display name>"`, `ordinal` 1-based.
#[must_use]
pub fn viewpoint_name(ordinal: usize, display_name: &str) -> String {
    format!("{ordinal} - {display_name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn folder_name_format() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(14, 5, 59))
            .unwrap_or_default();
        assert_eq!(
            folder_name("Clash VP", "Duct vs Beam", &ts),
            "Clash VP_Duct vs Beam_20240301_1405"
        );
    }

    #[test]
    fn viewpoint_name_format() {
        assert_eq!(viewpoint_name(3, "Clash7"), "3 - Clash7");
    }
}
