use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::hospital::Hospital;

/// Times travel as `HH:MM` strings; `HH:MM:SS` is accepted on input.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).ok_or_else(|| D::Error::custom(format!("invalid time: {}", raw)))
    }
}

/// The calendar placement of a shift: both endpoints as date + time-of-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    pub end_time: NaiveTime,
}

impl ShiftWindow {
    /// Places a time-of-day template on `date`. An end time at or before the
    /// start time rolls over to the next day, so equal times span 24 hours.
    /// Returns `None` only when the next day is outside chrono's date range.
    pub fn from_template(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Option<Self> {
        let end_date = if end_time <= start_time {
            date.checked_add_days(Days::new(1))?
        } else {
            date
        };

        Some(Self {
            start_date: date,
            start_time,
            end_date,
            end_time,
        })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start_date.and_time(self.start_time)
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end_date.and_time(self.end_time)
    }

    /// Unrounded duration in hours
    pub fn hours(&self) -> f64 {
        (self.end() - self.start()).num_seconds().abs() as f64 / 3600.0
    }

    /// Half-open intersection: a window ending exactly when another starts does not overlap it.
    pub fn overlaps(&self, other: &ShiftWindow) -> bool {
        self.start() < other.end() && other.start() < self.end()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: Uuid,
    pub hospital_id: Uuid,
    pub start_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    pub end_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub total_hours: f64,
    pub total_amount: f64,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Shift {
    /// Hours and amount are computed here from the hospital's current rate and
    /// stored; later rate changes do not touch existing shifts.
    pub fn new(hospital: &Hospital, window: ShiftWindow, notes: Option<String>) -> Self {
        let total_hours = window.hours();
        Self {
            id: Uuid::new_v4(),
            hospital_id: hospital.id,
            start_date: window.start_date,
            start_time: window.start_time,
            end_date: window.end_date,
            end_time: window.end_time,
            total_hours,
            total_amount: total_hours * hospital.hourly_rate,
            is_paid: false,
            notes,
        }
    }

    /// Moves the shift to a new window/hospital, recomputing the snapshot
    /// values. The paid flag is kept.
    pub fn reschedule(&mut self, hospital: &Hospital, window: ShiftWindow, notes: Option<String>) {
        let Shift { id, is_paid, .. } = *self;
        *self = Shift {
            id,
            is_paid,
            ..Shift::new(hospital, window, notes)
        };
    }

    pub fn window(&self) -> ShiftWindow {
        ShiftWindow {
            start_date: self.start_date,
            start_time: self.start_time,
            end_date: self.end_date,
            end_time: self.end_time,
        }
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.window().start()
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.window().end()
    }

    pub fn status_at(&self, now: NaiveDateTime) -> ShiftStatus {
        if now < self.starts_at() {
            ShiftStatus::Upcoming {
                days_until: (self.start_date - now.date()).num_days(),
            }
        } else if now <= self.ends_at() {
            ShiftStatus::Ongoing
        } else {
            ShiftStatus::Completed
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ShiftStatus {
    Upcoming {
        #[serde(rename = "daysUntil")]
        days_until: i64,
    },
    Ongoing,
    Completed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShiftWithStatus {
    #[serde(flatten)]
    pub shift: Shift,
    #[serde(flatten)]
    pub status: ShiftStatus,
}

/// Single add / edit payload. Times stay raw strings until validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShiftInput {
    pub hospital_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
}

/// Bulk add payload: one time-of-day template applied to every date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BulkShiftInput {
    pub hospital_id: Option<Uuid>,
    pub dates: Vec<NaiveDate>,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BulkAddResult {
    pub added_shifts: usize,
    pub conflict_dates: Vec<NaiveDate>,
    /// Dates that passed the overlap check but could not be stored
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_dates: Vec<NaiveDate>,
    pub shifts: Vec<Shift>,
}
