use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParkError;

/// Close reason recorded when the caller does not supply one
pub const DEFAULT_CLOSE_REASON: &str = "Toleg edildi";

/// Occupancy state of a parking session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Inside,
    Exited,
}

impl FromStr for SessionStatus {
    type Err = ParkError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Inside" => Ok(SessionStatus::Inside),
            "Exited" => Ok(SessionStatus::Exited),
            other => Err(ParkError::InvalidRequest(format!(
                "unknown status '{other}', expected Inside or Exited"
            ))),
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Inside => write!(f, "Inside"),
            SessionStatus::Exited => write!(f, "Exited"),
        }
    }
}

/// One occupancy of a parking spot by a vehicle, from entry to exit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingSession {
    /// Storage-assigned identifier, immutable
    pub id: u64,
    /// Vehicle plate; many historical sessions may share it
    pub plate: String,
    /// Facility/lot this session belongs to
    pub park_lot: String,
    /// Entry stamp in `%Y-%m-%d %H:%M:%S`
    pub start_time: String,
    /// Exit stamp, unset while the vehicle is inside
    pub end_time: Option<String>,
    pub status: SessionStatus,
    /// Whole minutes parked, set only at close
    pub duration_minutes: Option<i64>,
    /// Fee in whole currency units, set only at close
    pub fee: Option<f64>,
    /// Operator identity that closed the session
    pub closed_by: Option<String>,
    pub close_reason: Option<String>,
    /// Opaque reference to the captured plate photo; stored raw,
    /// rewritten to a URL only at presentation time
    pub photo_ref: Option<String>,
}

/// Entry request. Status and timestamps are always server-assigned.
#[derive(Debug, Clone)]
pub struct OpenRequest {
    pub plate: String,
    pub park_lot: String,
    pub photo_ref: Option<String>,
}

/// Exit request. The caller-writable surface of a close is exactly
/// this: the end stamp and an optional reason.
#[derive(Debug, Clone)]
pub struct CloseRequest {
    pub end_time: String,
    pub reason: Option<String>,
}

/// Fields a newly inserted session is built from
#[derive(Debug, Clone)]
pub struct NewSession {
    pub plate: String,
    pub park_lot: String,
    pub start_time: String,
    pub photo_ref: Option<String>,
}

/// Server-computed changes applied to a session at close. The store
/// applies these and nothing else to the existing record.
#[derive(Debug, Clone)]
pub struct SessionClose {
    pub end_time: String,
    pub duration_minutes: i64,
    pub fee: f64,
    pub closed_by: Option<String>,
    pub close_reason: String,
}

/// Filter predicates for session queries
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Substring match on the plate
    pub plate_contains: Option<String>,
    /// Exact match on the park lot
    pub park_lot: Option<String>,
    pub status: Option<SessionStatus>,
    /// Date-only (`%Y-%m-%d`) equality on the entry stamp
    pub start_date: Option<String>,
    /// Date-only equality on the exit stamp
    pub end_date: Option<String>,
}

impl SessionFilter {
    pub fn matches(&self, session: &ParkingSession) -> bool {
        if let Some(plate) = &self.plate_contains {
            if !session.plate.contains(plate.as_str()) {
                return false;
            }
        }
        if let Some(lot) = &self.park_lot {
            if &session.park_lot != lot {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if &session.status != status {
                return false;
            }
        }
        if let Some(date) = &self.start_date {
            if !session.start_time.starts_with(date.as_str()) {
                return false;
            }
        }
        if let Some(date) = &self.end_date {
            match &session.end_time {
                Some(end) if end.starts_with(date.as_str()) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Offset pagination parameters, 1-based
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn offset(&self) -> usize {
        ((self.page - 1) * self.limit) as usize
    }
}

/// One page of query results plus navigation totals
#[derive(Debug, Clone, Serialize)]
pub struct SessionPage {
    pub sessions: Vec<ParkingSession>,
    pub page: u64,
    pub limit: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> ParkingSession {
        ParkingSession {
            id: 1,
            plate: "AB 1234 CD".to_string(),
            park_lot: "P4".to_string(),
            start_time: "2024-01-01 10:00:00".to_string(),
            end_time: Some("2024-01-01 11:00:00".to_string()),
            status: SessionStatus::Exited,
            duration_minutes: Some(60),
            fee: Some(600.0),
            closed_by: Some("op-1".to_string()),
            close_reason: Some(DEFAULT_CLOSE_REASON.to_string()),
            photo_ref: Some("cam/1.jpg".to_string()),
        }
    }

    #[test]
    fn status_round_trips_through_str() {
        assert_eq!("Inside".parse::<SessionStatus>().unwrap(), SessionStatus::Inside);
        assert_eq!("Exited".parse::<SessionStatus>().unwrap(), SessionStatus::Exited);
        assert_eq!(SessionStatus::Inside.to_string(), "Inside");
        assert!("inside".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn status_serializes_as_plain_string() {
        let json = serde_json::to_string(&SessionStatus::Inside).unwrap();
        assert_eq!(json, "\"Inside\"");
    }

    #[test]
    fn filter_matches_on_plate_substring() {
        let session = sample_session();
        let filter = SessionFilter {
            plate_contains: Some("1234".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&session));

        let filter = SessionFilter {
            plate_contains: Some("9999".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&session));
    }

    #[test]
    fn filter_matches_date_only_prefixes() {
        let session = sample_session();
        let filter = SessionFilter {
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&session));

        let filter = SessionFilter {
            end_date: Some("2024-01-02".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&session));
    }

    #[test]
    fn filter_end_date_never_matches_open_sessions() {
        let mut session = sample_session();
        session.end_time = None;
        let filter = SessionFilter {
            end_date: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert!(!filter.matches(&session));
    }

    #[test]
    fn page_request_offset_is_zero_based() {
        let page = PageRequest { page: 1, limit: 5 };
        assert_eq!(page.offset(), 0);
        let page = PageRequest { page: 3, limit: 5 };
        assert_eq!(page.offset(), 10);
    }
}
