use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Due date sub-record of a task.
///
/// At most one of `date`/`datetime` is meaningful; `datetime` wins when both
/// are sent. Neither set means the task has no due date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
    #[serde(default)]
    pub recurring: bool,
    /// Human-readable due string as typed by the user ("every monday").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DueKind<'a> {
    Unset,
    Date(&'a str),
    DateTime(&'a str),
}

impl Due {
    fn kind(&self) -> DueKind<'_> {
        fn non_empty(s: &Option<String>) -> Option<&str> {
            s.as_deref().filter(|v| !v.is_empty())
        }
        if let Some(dt) = non_empty(&self.datetime) {
            DueKind::DateTime(dt)
        } else if let Some(d) = non_empty(&self.date) {
            DueKind::Date(d)
        } else {
            DueKind::Unset
        }
    }

    pub fn is_set(&self) -> bool {
        self.kind() != DueKind::Unset
    }

    /// The raw due string, or an empty string.
    pub fn input_string(&self) -> &str {
        self.string.as_deref().unwrap_or("")
    }

    /// Best-effort parse of the due instant.
    ///
    /// Returns `None` when no due date is set and also when the value cannot be
    /// parsed; a malformed value is never an error, it reads as "no due date".
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self.kind() {
            DueKind::DateTime(s) => {
                let parsed = parse_datetime(s);
                if parsed.is_none() {
                    log::debug!("Unparseable due datetime: {}", s);
                }
                parsed
            }
            DueKind::Date(s) => match NaiveDate::parse_from_str(s, DATE_FORMAT) {
                Ok(date) => date.and_hms_opt(0, 0, 0).map(|t| t.and_utc()),
                Err(e) => {
                    log::debug!("Unparseable due date {}: {}", s, e);
                    None
                }
            },
            DueKind::Unset => None,
        }
    }

    /// `YYYY-MM-DD(Dow) HH:MM` for date-times, `YYYY-MM-DD(Dow)` for dates, else empty.
    pub fn display(&self) -> String {
        match (self.kind(), self.instant()) {
            (DueKind::DateTime(_), Some(t)) => t.format("%Y-%m-%d(%a) %H:%M").to_string(),
            (DueKind::Date(_), Some(t)) => t.format("%Y-%m-%d(%a)").to_string(),
            _ => String::new(),
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    pub fn is_due_today(&self) -> bool {
        self.is_due_today_at(Utc::now())
    }

    /// Date-times compare by instant; dates compare by calendar day.
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        match (self.kind(), self.instant()) {
            (DueKind::DateTime(_), Some(t)) => t < now,
            (DueKind::Date(_), Some(t)) => t.date_naive() < now.date_naive(),
            _ => false,
        }
    }

    pub fn is_due_today_at(&self, now: DateTime<Utc>) -> bool {
        self.instant()
            .is_some_and(|t| t.date_naive() == now.date_naive())
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = NaiveDateTime::parse_from_str(s, DATETIME_FORMAT) {
        return Some(t.and_utc());
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    // Floating times carry no offset
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|t| t.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date_only(d: &str) -> Due {
        Due {
            date: Some(d.to_string()),
            ..Default::default()
        }
    }

    fn date_time(dt: &str) -> Due {
        Due {
            date: Some(dt[..10].to_string()),
            datetime: Some(dt.to_string()),
            ..Default::default()
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn date_only_display_and_today() {
        let due = date_only("2026-03-02");
        assert_eq!(due.display(), "2026-03-02(Mon)");
        assert!(due.is_due_today_at(at(2026, 3, 2, 0, 0)));
        assert!(due.is_due_today_at(at(2026, 3, 2, 23, 59)));
        assert!(!due.is_due_today_at(at(2026, 3, 3, 0, 0)));
        assert!(!due.is_due_today_at(at(2026, 3, 1, 12, 0)));
    }

    #[test]
    fn date_only_overdue_is_day_level() {
        let due = date_only("2026-03-02");
        assert!(!due.is_overdue_at(at(2026, 3, 2, 23, 59)));
        assert!(due.is_overdue_at(at(2026, 3, 3, 0, 0)));
        assert!(!due.is_overdue_at(at(2026, 3, 1, 8, 0)));
    }

    #[test]
    fn datetime_display_and_overdue_by_instant() {
        let due = date_time("2026-03-02T09:30:00Z");
        assert_eq!(due.display(), "2026-03-02(Mon) 09:30");
        assert!(!due.is_overdue_at(at(2026, 3, 2, 9, 0)));
        assert!(due.is_overdue_at(at(2026, 3, 2, 9, 31)));
        assert!(due.is_due_today_at(at(2026, 3, 2, 23, 0)));
        assert!(!due.is_due_today_at(at(2026, 3, 3, 0, 0)));
    }

    #[test]
    fn datetime_accepts_offsets_and_floating_times() {
        let due = date_time("2026-03-02T11:30:00+02:00");
        assert_eq!(due.instant(), Some(at(2026, 3, 2, 9, 30)));

        let due = date_time("2026-03-02T09:30:00");
        assert_eq!(due.instant(), Some(at(2026, 3, 2, 9, 30)));
    }

    #[test]
    fn unset_due_has_no_display_or_urgency() {
        let now = at(2026, 3, 2, 12, 0);
        for due in [Due::default(), date_only("")] {
            assert!(!due.is_set());
            assert_eq!(due.instant(), None);
            assert_eq!(due.display(), "");
            assert!(!due.is_overdue_at(now));
            assert!(!due.is_due_today_at(now));
        }
    }

    #[test]
    fn malformed_due_reads_as_unset() {
        let now = at(2026, 3, 2, 12, 0);
        for due in [date_only("next tuesday"), date_time("2026-03-02Tbogus")] {
            assert!(due.is_set());
            assert_eq!(due.instant(), None);
            assert_eq!(due.display(), "");
            assert!(!due.is_overdue_at(now));
            assert!(!due.is_due_today_at(now));
        }
    }

    #[test]
    fn empty_datetime_falls_back_to_date() {
        let due = Due {
            date: Some("2026-03-02".to_string()),
            datetime: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(due.display(), "2026-03-02(Mon)");
        assert_eq!(due.instant(), Some(at(2026, 3, 2, 0, 0)));
    }
}
