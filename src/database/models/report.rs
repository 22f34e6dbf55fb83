use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::macros::string_enum;
use super::shift::ShiftWithStatus;

string_enum! {
    #[derive(Default)]
    pub enum Period {
        Today => "today",
        ThisWeek => "thisWeek",
        ThisMonth => "thisMonth",
        Last30Days => "last30Days",
        Last3Months => "last3Months",
        Last6Months => "last6Months",
        ThisYear => "thisYear",
        #[default]
        All => "all",
    }
}

impl Period {
    pub fn label(&self) -> &'static str {
        match self {
            Period::Today => "Hoje",
            Period::ThisWeek => "Esta semana",
            Period::ThisMonth => "Este mês",
            Period::Last30Days => "Últimos 30 dias",
            Period::Last3Months => "Últimos 3 meses",
            Period::Last6Months => "Últimos 6 meses",
            Period::ThisYear => "Este ano",
            Period::All => "Todos os períodos",
        }
    }
}

string_enum! {
    #[derive(Default)]
    pub enum PaidFilter {
        #[default]
        All => "all",
        Paid => "paid",
        Pending => "pending",
    }
}

/// Query-string filters shared by the shift list, reports and export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShiftFilter {
    pub hospital_id: Option<Uuid>,
    pub paid: PaidFilter,
    pub period: Period,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub shift_count: usize,
    pub total_hours: f64,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub pending_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HospitalBreakdown {
    pub hospital_id: Uuid,
    /// `None` when the hospital record no longer exists
    pub hospital_name: Option<String>,
    pub color: Option<String>,
    #[serde(flatten)]
    pub totals: Totals,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBreakdown {
    /// `YYYY-MM`
    pub month: String,
    #[serde(flatten)]
    pub totals: Totals,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub period: Period,
    pub period_label: String,
    pub totals: Totals,
    pub by_hospital: Vec<HospitalBreakdown>,
    pub by_month: Vec<MonthlyBreakdown>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub month: String,
    pub totals: Totals,
    pub upcoming_shifts: Vec<ShiftWithStatus>,
}

/// Export switches, read from the query string next to [`ShiftFilter`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub economic: Option<bool>,
}

impl ExportOptions {
    pub fn show_economic_values(&self) -> bool {
        self.economic.unwrap_or(true)
    }
}
