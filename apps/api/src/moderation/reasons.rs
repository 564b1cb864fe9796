//! Recognized reason codes per flag kind and report target.

use crate::models::flag::FlagKind;

/// Reasons accepted on role-appeal flags.
pub const APPEAL_REASONS: &[&str] = &[
    "unfair_demotion",
    "activity_miscount",
    "extenuating_circumstances",
];

/// Reasons accepted on content complaints and content reports.
pub const CONTENT_REASONS: &[&str] = &[
    "spam",
    "harassment",
    "spoiler_without_tag",
    "hate_speech",
    "off_topic",
    "misinformation",
];

pub fn recognized_flag_reasons(kind: FlagKind) -> &'static [&'static str] {
    match kind {
        FlagKind::ReviewerRoleAppeal => APPEAL_REASONS,
        FlagKind::ContentComplaint => CONTENT_REASONS,
    }
}

pub fn is_recognized_flag_reason(kind: FlagKind, reason: &str) -> bool {
    recognized_flag_reasons(kind).contains(&reason)
}

pub fn is_recognized_report_reason(reason: &str) -> bool {
    CONTENT_REASONS.contains(&reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appeal_reasons_are_kind_specific() {
        assert!(is_recognized_flag_reason(
            FlagKind::ReviewerRoleAppeal,
            "unfair_demotion"
        ));
        assert!(!is_recognized_flag_reason(
            FlagKind::ContentComplaint,
            "unfair_demotion"
        ));
    }

    #[test]
    fn test_content_reasons_shared_between_flags_and_reports() {
        assert!(is_recognized_flag_reason(FlagKind::ContentComplaint, "spam"));
        assert!(is_recognized_report_reason("spam"));
    }

    #[test]
    fn test_unknown_reason_rejected() {
        assert!(!is_recognized_flag_reason(
            FlagKind::ContentComplaint,
            "dislike"
        ));
        assert!(!is_recognized_report_reason(""));
    }
}
