use park_core::{ParkingSession, SessionPage, SessionStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub plate: String,
    pub park_lot: String,
    #[serde(default)]
    pub photo_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CloseSessionRequest {
    /// Exit stamp in `%Y-%m-%d %H:%M:%S`
    pub end_time: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub park_lot: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub plate: Option<String>,
    pub park_lot: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Session as rendered to API clients.
///
/// `photo_url` is derived from the stored reference at response time
/// when a public base URL is configured; the stored reference itself
/// rides along untouched.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: u64,
    pub plate: String,
    pub park_lot: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub status: SessionStatus,
    pub duration_minutes: Option<i64>,
    pub fee: Option<f64>,
    pub closed_by: Option<String>,
    pub close_reason: Option<String>,
    pub photo_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl SessionView {
    pub fn render(session: &ParkingSession, public_url: Option<&str>) -> Self {
        let photo_url = match (public_url, session.photo_ref.as_deref()) {
            (Some(base), Some(photo_ref)) => {
                Some(format!("{}/plate/{}", base.trim_end_matches('/'), photo_ref))
            }
            _ => None,
        };
        Self {
            id: session.id,
            plate: session.plate.clone(),
            park_lot: session.park_lot.clone(),
            start_time: session.start_time.clone(),
            end_time: session.end_time.clone(),
            status: session.status,
            duration_minutes: session.duration_minutes,
            fee: session.fee,
            closed_by: session.closed_by.clone(),
            close_reason: session.close_reason.clone(),
            photo_ref: session.photo_ref.clone(),
            photo_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionEnvelope {
    pub message: String,
    pub session: SessionView,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionView>,
    pub page: u64,
    pub limit: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl SessionListResponse {
    pub fn render(page: SessionPage, public_url: Option<&str>) -> Self {
        Self {
            sessions: page
                .sessions
                .iter()
                .map(|session| SessionView::render(session, public_url))
                .collect(),
            page: page.page,
            limit: page.limit,
            total_count: page.total_count,
            total_pages: page.total_pages,
            has_next: page.has_next,
            has_prev: page.has_prev,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ParkingSession {
        ParkingSession {
            id: 3,
            plate: "AA 111".to_string(),
            park_lot: "P4".to_string(),
            start_time: "2024-01-01 10:00:00".to_string(),
            end_time: None,
            status: SessionStatus::Inside,
            duration_minutes: None,
            fee: None,
            closed_by: None,
            close_reason: None,
            photo_ref: Some("cam/7.jpg".to_string()),
        }
    }

    #[test]
    fn photo_url_is_derived_not_substituted() {
        let view = SessionView::render(&session(), Some("http://gate.example/"));
        assert_eq!(view.photo_ref.as_deref(), Some("cam/7.jpg"));
        assert_eq!(
            view.photo_url.as_deref(),
            Some("http://gate.example/plate/cam/7.jpg")
        );
    }

    #[test]
    fn no_public_url_means_no_photo_url() {
        let view = SessionView::render(&session(), None);
        assert_eq!(view.photo_ref.as_deref(), Some("cam/7.jpg"));
        assert!(view.photo_url.is_none());
    }

    #[test]
    fn no_photo_ref_means_no_photo_url() {
        let mut session = session();
        session.photo_ref = None;
        let view = SessionView::render(&session, Some("http://gate.example"));
        assert!(view.photo_url.is_none());
    }
}
