use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Accepted due date formats, tried in order.
pub const DUE_DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%m.%d.%Y"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid due date format. Please use MM/DD/YYYY or MM.DD.YYYY.")]
pub struct DueDateError {
    pub input: String,
}

/// Parse user input into the instant of local midnight on that date.
pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>, DueDateError> {
    let date = parse_calendar_date(input)?;
    Ok(local_midnight(date))
}

pub fn parse_calendar_date(input: &str) -> Result<NaiveDate, DueDateError> {
    let trimmed = input.trim();
    DUE_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| DueDateError {
            input: input.to_string(),
        })
}

fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    let midnight: NaiveDateTime = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        // Midnight can fall inside a DST gap; the day then starts an hour later.
        .or_else(|| {
            Local
                .from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}
