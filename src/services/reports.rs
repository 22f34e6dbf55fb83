//! Read-only folds over a user's shifts. Every function takes "now"/"today"
//! explicitly so results are reproducible.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::database::models::{
    Dashboard, Hospital, HospitalBreakdown, MonthlyBreakdown, PaidFilter, Period, Report, Shift,
    ShiftFilter, ShiftWithStatus, Totals,
};

pub const MONTHS_IN_TREND: usize = 6;
pub const DASHBOARD_UPCOMING: usize = 4;

/// Half-open `[start, end)` range of start dates covered by `period`;
/// `None` means unbounded.
pub fn period_range(period: Period, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let tomorrow = today.checked_add_days(Days::new(1))?;
    let first_of_month = today.with_day(1)?;

    match period {
        Period::All => None,
        Period::Today => Some((today, tomorrow)),
        Period::ThisWeek => {
            let start = today.checked_sub_days(Days::new(
                today.weekday().num_days_from_sunday().into(),
            ))?;
            Some((start, start.checked_add_days(Days::new(7))?))
        }
        Period::ThisMonth => Some((
            first_of_month,
            first_of_month.checked_add_months(Months::new(1))?,
        )),
        Period::Last30Days => Some((today.checked_sub_days(Days::new(30))?, tomorrow)),
        Period::Last3Months => Some((today.checked_sub_months(Months::new(3))?, tomorrow)),
        Period::Last6Months => Some((today.checked_sub_months(Months::new(6))?, tomorrow)),
        Period::ThisYear => Some((
            NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
            NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?,
        )),
    }
}

pub fn matches_filter(shift: &Shift, filter: &ShiftFilter, today: NaiveDate) -> bool {
    let hospital_match = filter.hospital_id.is_none_or(|id| shift.hospital_id == id);

    let paid_match = match filter.paid {
        PaidFilter::All => true,
        PaidFilter::Paid => shift.is_paid,
        PaidFilter::Pending => !shift.is_paid,
    };

    let period_match = period_range(filter.period, today)
        .is_none_or(|(start, end)| shift.start_date >= start && shift.start_date < end);

    let from_match = filter.from.is_none_or(|from| shift.start_date >= from);
    let to_match = filter.to.is_none_or(|to| shift.start_date <= to);

    hospital_match && paid_match && period_match && from_match && to_match
}

pub fn sort_chronologically(shifts: &mut [Shift]) {
    shifts.sort_by_key(Shift::starts_at);
}

/// Filtered and sorted by start
pub fn filter_shifts(shifts: &[Shift], filter: &ShiftFilter, today: NaiveDate) -> Vec<Shift> {
    let mut filtered: Vec<Shift> = shifts
        .iter()
        .filter(|shift| matches_filter(shift, filter, today))
        .cloned()
        .collect();
    sort_chronologically(&mut filtered);
    filtered
}

pub fn totals<'a>(shifts: impl IntoIterator<Item = &'a Shift>) -> Totals {
    shifts.into_iter().fold(Totals::default(), |mut acc, shift| {
        acc.shift_count += 1;
        acc.total_hours += shift.total_hours;
        acc.total_amount += shift.total_amount;
        if shift.is_paid {
            acc.paid_amount += shift.total_amount;
        } else {
            acc.pending_amount += shift.total_amount;
        }
        acc
    })
}

/// Hospitals in registry order, then ids of deleted hospitals in order of
/// first appearance. Hospitals without shifts are left out.
pub fn by_hospital(shifts: &[Shift], hospitals: &[Hospital]) -> Vec<HospitalBreakdown> {
    let mut order: Vec<Uuid> = hospitals.iter().map(|h| h.id).collect();
    for shift in shifts {
        if !order.contains(&shift.hospital_id) {
            order.push(shift.hospital_id);
        }
    }

    order
        .into_iter()
        .filter_map(|hospital_id| {
            let hospital = hospitals.iter().find(|h| h.id == hospital_id);
            let totals = totals(shifts.iter().filter(|s| s.hospital_id == hospital_id));
            (totals.shift_count > 0).then(|| HospitalBreakdown {
                hospital_id,
                hospital_name: hospital.map(|h| h.name.clone()),
                color: hospital.map(|h| h.color.clone()),
                totals,
            })
        })
        .collect()
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// The most recent months that have shifts, oldest first
pub fn by_month(shifts: &[Shift]) -> Vec<MonthlyBreakdown> {
    let mut months: BTreeMap<String, Vec<&Shift>> = BTreeMap::new();
    for shift in shifts {
        months.entry(month_key(shift.start_date)).or_default().push(shift);
    }

    let skip = months.len().saturating_sub(MONTHS_IN_TREND);
    months
        .into_iter()
        .skip(skip)
        .map(|(month, shifts)| MonthlyBreakdown {
            month,
            totals: totals(shifts),
        })
        .collect()
}

pub fn build_report(
    shifts: &[Shift],
    hospitals: &[Hospital],
    filter: &ShiftFilter,
    today: NaiveDate,
) -> Report {
    let filtered = filter_shifts(shifts, filter, today);

    Report {
        period: filter.period,
        period_label: filter.period.label().to_string(),
        totals: totals(&filtered),
        by_hospital: by_hospital(&filtered, hospitals),
        by_month: by_month(&filtered),
    }
}

/// Shifts starting at or after `now`, soonest first
pub fn upcoming(shifts: &[Shift], now: NaiveDateTime) -> Vec<ShiftWithStatus> {
    let mut upcoming: Vec<Shift> = shifts
        .iter()
        .filter(|shift| shift.starts_at() >= now)
        .cloned()
        .collect();
    sort_chronologically(&mut upcoming);

    upcoming
        .into_iter()
        .map(|shift| ShiftWithStatus {
            status: shift.status_at(now),
            shift,
        })
        .collect()
}

pub fn dashboard(shifts: &[Shift], now: NaiveDateTime) -> Dashboard {
    let today = now.date();
    let this_month = ShiftFilter {
        period: Period::ThisMonth,
        ..Default::default()
    };
    let month_shifts = filter_shifts(shifts, &this_month, today);

    let mut upcoming_shifts = upcoming(shifts, now);
    upcoming_shifts.truncate(DASHBOARD_UPCOMING);

    Dashboard {
        month: month_key(today),
        totals: totals(&month_shifts),
        upcoming_shifts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{ShiftStatus, ShiftWindow, parse_time};
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn hospital(name: &str, rate: f64) -> Hospital {
        Hospital {
            id: Uuid::new_v4(),
            name: name.to_string(),
            hourly_rate: rate,
            address: None,
            color: "#10B981".to_string(),
            is_disabled: false,
        }
    }

    fn shift(hospital: &Hospital, day: &str, start: &str, end: &str, paid: bool) -> Shift {
        let window = ShiftWindow::from_template(
            date(day),
            parse_time(start).unwrap(),
            parse_time(end).unwrap(),
        )
        .unwrap();
        let mut shift = Shift::new(hospital, window, None);
        shift.is_paid = paid;
        shift
    }

    #[test]
    fn period_ranges_from_today() {
        // 2024-05-15 is a Wednesday
        let today = date("2024-05-15");

        assert_eq!(period_range(Period::All, today), None);
        assert_eq!(
            period_range(Period::ThisWeek, today),
            Some((date("2024-05-12"), date("2024-05-19")))
        );
        assert_eq!(
            period_range(Period::ThisMonth, today),
            Some((date("2024-05-01"), date("2024-06-01")))
        );
        assert_eq!(
            period_range(Period::Last30Days, today),
            Some((date("2024-04-15"), date("2024-05-16")))
        );
        assert_eq!(
            period_range(Period::Last3Months, today),
            Some((date("2024-02-15"), date("2024-05-16")))
        );
        assert_eq!(
            period_range(Period::ThisYear, today),
            Some((date("2024-01-01"), date("2025-01-01")))
        );
    }

    #[test]
    fn week_starts_on_sunday() {
        let sunday = date("2024-05-12");
        assert_eq!(
            period_range(Period::ThisWeek, sunday),
            Some((sunday, date("2024-05-19")))
        );
    }

    #[test]
    fn filters_combine() {
        let a = hospital("Hospital A", 100.0);
        let b = hospital("Hospital B", 50.0);
        let shifts = vec![
            shift(&a, "2024-05-20", "07:00", "19:00", true),
            shift(&a, "2024-05-02", "07:00", "19:00", false),
            shift(&b, "2024-05-10", "19:00", "07:00", false),
            shift(&a, "2024-04-30", "07:00", "19:00", false),
        ];
        let today = date("2024-05-15");

        let filter = ShiftFilter {
            hospital_id: Some(a.id),
            paid: PaidFilter::Pending,
            period: Period::ThisMonth,
            ..Default::default()
        };
        let filtered = filter_shifts(&shifts, &filter, today);
        assert_eq!(filtered, vec![shifts[1].clone()]);

        let range = ShiftFilter {
            from: Some(date("2024-05-01")),
            to: Some(date("2024-05-10")),
            ..Default::default()
        };
        let in_range = filter_shifts(&shifts, &range, today);
        assert_eq!(
            in_range.iter().map(|s| s.start_date).collect::<Vec<_>>(),
            vec![date("2024-05-02"), date("2024-05-10")]
        );
    }

    #[test]
    fn totals_split_paid_and_pending() {
        let a = hospital("Hospital A", 100.0);
        let shifts = vec![
            shift(&a, "2024-01-01", "08:00", "20:00", true),
            shift(&a, "2024-01-02", "08:00", "14:00", false),
        ];

        assert_eq!(
            totals(&shifts),
            Totals {
                shift_count: 2,
                total_hours: 18.0,
                total_amount: 1800.0,
                paid_amount: 1200.0,
                pending_amount: 600.0,
            }
        );
        assert_eq!(totals(&[]), Totals::default());
    }

    #[test]
    fn hospital_breakdown_skips_empty_and_keeps_orphans() {
        let a = hospital("Hospital A", 100.0);
        let b = hospital("Hospital B", 50.0);
        let gone = hospital("Removido", 10.0);
        let shifts = vec![
            shift(&gone, "2024-01-03", "08:00", "10:00", false),
            shift(&b, "2024-01-01", "08:00", "20:00", false),
        ];

        let breakdown = by_hospital(&shifts, &[a, b.clone()]);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].hospital_id, b.id);
        assert_eq!(breakdown[0].totals.total_amount, 600.0);
        assert_eq!(breakdown[1].hospital_id, gone.id);
        assert_eq!(breakdown[1].hospital_name, None);
    }

    #[test]
    fn monthly_trend_keeps_last_six_months() {
        let a = hospital("Hospital A", 10.0);
        let shifts: Vec<Shift> = (1..=8)
            .map(|month| shift(&a, &format!("2024-{:02}-05", month), "08:00", "10:00", false))
            .collect();

        let months = by_month(&shifts);
        assert_eq!(
            months.iter().map(|m| m.month.as_str()).collect::<Vec<_>>(),
            vec!["2024-03", "2024-04", "2024-05", "2024-06", "2024-07", "2024-08"]
        );
        assert_eq!(months[0].totals.total_hours, 2.0);
    }

    #[test]
    fn report_is_built_from_filtered_shifts() {
        let a = hospital("Hospital A", 100.0);
        let shifts = vec![
            shift(&a, "2024-05-02", "08:00", "20:00", false),
            shift(&a, "2023-12-02", "08:00", "20:00", false),
        ];
        let filter = ShiftFilter {
            period: Period::ThisYear,
            ..Default::default()
        };

        let report = build_report(&shifts, &[a], &filter, date("2024-05-15"));
        assert_eq!(report.period_label, "Este ano");
        assert_eq!(report.totals.shift_count, 1);
        assert_eq!(report.by_month.len(), 1);
        assert_eq!(report.by_month[0].month, "2024-05");
    }

    #[test]
    fn dashboard_shows_month_totals_and_next_four() {
        let a = hospital("Hospital A", 100.0);
        let shifts: Vec<Shift> = ["2024-05-01", "2024-05-20", "2024-05-22", "2024-05-25", "2024-06-01", "2024-06-03"]
            .iter()
            .map(|day| shift(&a, day, "08:00", "10:00", false))
            .collect();
        let now = date("2024-05-15").and_time(parse_time("12:00").unwrap());

        let dashboard = dashboard(&shifts, now);
        assert_eq!(dashboard.month, "2024-05");
        assert_eq!(dashboard.totals.shift_count, 4);
        assert_eq!(dashboard.upcoming_shifts.len(), 4);
        assert_eq!(dashboard.upcoming_shifts[0].shift.start_date, date("2024-05-20"));
        assert_eq!(
            dashboard.upcoming_shifts[0].status,
            ShiftStatus::Upcoming { days_until: 5 }
        );
    }
}
