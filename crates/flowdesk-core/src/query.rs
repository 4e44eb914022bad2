//! Filters and query-string construction for the grouped executions endpoint.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat};

use crate::error::{ConsoleError, Result};
use crate::models::EntityId;

/// Workflow constraint: the backend accepts either an id or a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowFilter {
    Id(EntityId),
    Name(String),
}

/// A date bound as typed by the operator.
///
/// A bare date covers the whole calendar day: as a lower bound it starts at
/// midnight, as an upper bound it ends at 23:59:59. An explicit time is used
/// as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    Day(NaiveDate),
    At(NaiveDateTime),
}

impl DateBound {
    /// Accepts `YYYY-MM-DD`, RFC 3339 with an offset (converted to UTC), and
    /// `YYYY-MM-DDTHH:MM[:SS]` read as UTC (a space may replace the `T`).
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(Self::Day(day));
        }
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self::At(at.naive_utc()));
        }
        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
            if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
                return Ok(Self::At(at));
            }
        }
        Err(ConsoleError::validation(format!(
            "Invalid date '{}': use YYYY-MM-DD or RFC 3339",
            raw
        )))
    }

    fn start(self) -> NaiveDateTime {
        match self {
            Self::Day(day) => day.and_time(NaiveTime::MIN),
            Self::At(at) => at,
        }
    }

    fn end(self) -> NaiveDateTime {
        match self {
            Self::Day(day) => day.and_hms_opt(23, 59, 59).unwrap_or_else(|| day.and_time(NaiveTime::MIN)),
            Self::At(at) => at,
        }
    }
}

fn rfc3339(at: NaiveDateTime) -> String {
    at.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Filters applied to the executions list. Empty fields are omitted from the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionFilters {
    pub from: Option<DateBound>,
    pub to: Option<DateBound>,
    pub status: Option<String>,
    pub workflow: Option<WorkflowFilter>,
}

impl ExecutionFilters {
    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none() && self.status.is_none() && self.workflow.is_none()
    }

    /// Lower bound as sent to the backend.
    pub fn from_param(&self) -> Option<String> {
        self.from.map(|bound| rfc3339(bound.start()))
    }

    /// Upper bound as sent to the backend; a bare date is inclusive of the whole day.
    pub fn to_param(&self) -> Option<String> {
        self.to.map(|bound| rfc3339(bound.end()))
    }
}

/// Query string of one grouped-executions request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionQuery {
    pairs: Vec<(String, String)>,
}

impl ExecutionQuery {
    pub fn from_filters(filters: &ExecutionFilters, page: u32, page_size: u32) -> Self {
        let mut pairs = Vec::new();
        if let Some(from) = filters.from_param() {
            pairs.push(("from".to_string(), from));
        }
        if let Some(to) = filters.to_param() {
            pairs.push(("to".to_string(), to));
        }
        if let Some(status) = filters.status.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("status".to_string(), status.to_string()));
        }
        match &filters.workflow {
            Some(WorkflowFilter::Id(id)) => pairs.push(("workflowId".to_string(), id.to_string())),
            Some(WorkflowFilter::Name(name)) if !name.trim().is_empty() => {
                pairs.push(("name".to_string(), name.trim().to_string()));
            }
            _ => {}
        }
        pairs.push(("page".to_string(), page.to_string()));
        pairs.push(("pageSize".to_string(), page_size.to_string()));
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_date_extends_to_end_of_day() {
        let filters = ExecutionFilters {
            from: Some(DateBound::parse("2024-01-01").unwrap()),
            to: Some(DateBound::parse("2024-01-01").unwrap()),
            ..Default::default()
        };
        let query = ExecutionQuery::from_filters(&filters, 1, 10);
        assert_eq!(query.get("from"), Some("2024-01-01T00:00:00Z"));
        assert_eq!(query.get("to"), Some("2024-01-01T23:59:59Z"));
    }

    #[test]
    fn test_explicit_time_is_kept() {
        let bound = DateBound::parse("2024-03-05T08:30").unwrap();
        let filters = ExecutionFilters { to: Some(bound), ..Default::default() };
        assert_eq!(filters.to_param().as_deref(), Some("2024-03-05T08:30:00Z"));
    }

    #[test]
    fn test_rfc3339_offset_is_converted_to_utc() {
        let filters = ExecutionFilters {
            from: Some(DateBound::parse("2024-01-01T10:00:00Z").unwrap()),
            to: Some(DateBound::parse("2024-01-01T10:00:00+02:00").unwrap()),
            ..Default::default()
        };
        let query = ExecutionQuery::from_filters(&filters, 1, 10);
        assert_eq!(query.get("from"), Some("2024-01-01T10:00:00Z"));
        assert_eq!(query.get("to"), Some("2024-01-01T08:00:00Z"));
    }

    #[test]
    fn test_invalid_date_rejected() {
        assert!(DateBound::parse("01/02/2024").is_err());
    }

    #[test]
    fn test_empty_filters_only_send_paging() {
        let query = ExecutionQuery::from_filters(&ExecutionFilters::default(), 2, 20);
        assert_eq!(
            query.pairs(),
            &[("page".to_string(), "2".to_string()), ("pageSize".to_string(), "20".to_string())]
        );
    }

    #[test]
    fn test_status_and_workflow_keys() {
        let filters = ExecutionFilters {
            status: Some("ERROR".to_string()),
            workflow: Some(WorkflowFilter::Id(4)),
            ..Default::default()
        };
        let query = ExecutionQuery::from_filters(&filters, 1, 10);
        assert_eq!(query.get("status"), Some("ERROR"));
        assert_eq!(query.get("workflowId"), Some("4"));
        assert_eq!(query.get("name"), None);

        let by_name = ExecutionFilters {
            workflow: Some(WorkflowFilter::Name("Digest".to_string())),
            ..Default::default()
        };
        assert_eq!(ExecutionQuery::from_filters(&by_name, 1, 10).get("name"), Some("Digest"));
    }
}
