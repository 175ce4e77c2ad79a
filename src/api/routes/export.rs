use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{AttendanceRecord, PayPeriod, RecordType};

/// Byte order mark so spreadsheet tools detect UTF-8.
const UTF8_BOM: &str = "\u{FEFF}";

#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// Any date inside the pay period to export; defaults to today
    pub date: Option<NaiveDate>,

    /// Restrict to one user
    pub user: Option<String>,
}

fn status_label(record_type: RecordType) -> &'static str {
    match record_type {
        RecordType::Attendance => "Attendance",
        RecordType::Vacation => "Vacation",
        RecordType::Mission => "Mission",
        RecordType::LocAttendance => "Attendance (verified)",
        RecordType::LocDeparture => "Departure (verified)",
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render one pay period's records as CSV text.
pub fn render_period_csv(period: &PayPeriod, records: &[AttendanceRecord]) -> String {
    let mut out = String::from(UTF8_BOM);
    out.push_str(&period.label());
    out.push('\n');
    out.push_str("Employee,Day,Date,Status\n");

    for record in records {
        out.push_str(&format!(
            "{},{},{},{}\n",
            csv_field(&record.user_name),
            csv_field(&record.day_name),
            record.calendar_date(),
            csv_field(status_label(record.record_type)),
        ));
    }
    out
}

/// Download the pay period containing the query date as a CSV report.
pub async fn export_csv(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<(HeaderMap, String), ApiError> {
    let date = params.date.unwrap_or_else(|| Utc::now().date_naive());
    let period = PayPeriod::containing(date);

    let mut records = state.records.read_all()?;
    records.retain(|r| period.contains(r.calendar_date()));
    if let Some(user) = &params.user {
        records.retain(|r| &r.user_name == user);
    }
    records.sort_by(|a, b| a.date.cmp(&b.date));

    let csv = render_period_csv(&period, &records);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    let filename = format!(
        "attachment; filename=\"attendance_{}_{}.csv\"",
        period.start, period.end
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&filename)
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    );

    Ok((headers, csv))
}
