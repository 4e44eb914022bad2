/// Visual classification of a free-form status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Danger,
    /// Anything still in flight or unknown (RUNNING, PENDING, MANUAL_REVIEW, ...)
    Pending,
}

impl StatusTone {
    pub fn of(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "error" | "failed" => Self::Danger,
            "done" | "success" | "approved" => Self::Success,
            _ => Self::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tone() {
        assert_eq!(StatusTone::of("ERROR"), StatusTone::Danger);
        assert_eq!(StatusTone::of("failed"), StatusTone::Danger);
        assert_eq!(StatusTone::of("DONE"), StatusTone::Success);
        assert_eq!(StatusTone::of("Approved"), StatusTone::Success);
        assert_eq!(StatusTone::of("MANUAL_REVIEW"), StatusTone::Pending);
        assert_eq!(StatusTone::of(""), StatusTone::Pending);
    }
}
