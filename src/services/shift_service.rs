use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tokio::sync::MutexGuard;
use uuid::Uuid;

use crate::database::{
    models::{
        BulkAddResult, BulkShiftInput, Hospital, Shift, ShiftFilter, ShiftInput, ShiftWindow,
        ShiftWithStatus, parse_time,
    },
    repositories::{HospitalRepository, ShiftRepository},
    store::Storage,
};
use crate::error::AppError;
use crate::services::{
    overlap::OverlapGuard,
    reports,
    validation::{validate_bulk_shift, validate_shift},
};

pub const OVERLAP_MESSAGE: &str = "Shift overlaps an existing shift";

fn parse_template_time(field: &str, raw: &str) -> Result<NaiveTime, AppError> {
    parse_time(raw).ok_or_else(|| AppError::BadRequest(format!("Invalid {}: {}", field, raw)))
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Shift ledger of one user
#[derive(Clone)]
pub struct ShiftService {
    shifts: ShiftRepository,
    hospitals: HospitalRepository,
}

impl ShiftService {
    pub fn for_user(storage: &Storage, owner_id: Uuid) -> Self {
        Self {
            shifts: ShiftRepository::new(storage.clone(), owner_id),
            hospitals: HospitalRepository::new(storage.clone(), owner_id),
        }
    }

    /// Filtered and sorted chronologically
    pub async fn list(&self, filter: &ShiftFilter, today: NaiveDate) -> Result<Vec<Shift>, AppError> {
        let shifts = self.shifts.get_all().await?;
        Ok(reports::filter_shifts(&shifts, filter, today))
    }

    pub async fn get(&self, id: Uuid) -> Result<Shift, AppError> {
        self.shifts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", &id.to_string()))
    }

    pub async fn get_with_status(&self, id: Uuid, now: NaiveDateTime) -> Result<ShiftWithStatus, AppError> {
        let shift = self.get(id).await?;
        Ok(ShiftWithStatus {
            status: shift.status_at(now),
            shift,
        })
    }

    pub async fn upcoming(&self, now: NaiveDateTime) -> Result<Vec<ShiftWithStatus>, AppError> {
        let shifts = self.shifts.get_all().await?;
        Ok(reports::upcoming(&shifts, now))
    }

    async fn hospital(&self, guard: &MutexGuard<'_, ()>, id: Uuid) -> Result<Hospital, AppError> {
        self.hospitals
            .find_by_id_with(guard, id)
            .await?
            .ok_or_else(|| AppError::not_found("Hospital", &id.to_string()))
    }

    /// Hospital lookup for new shifts: must exist and be enabled
    async fn active_hospital(&self, guard: &MutexGuard<'_, ()>, id: Uuid) -> Result<Hospital, AppError> {
        let hospital = self.hospital(guard, id).await?;
        if !hospital.is_enabled() {
            return Err(AppError::BadRequest(format!(
                "Hospital {} is disabled",
                hospital.name
            )));
        }
        Ok(hospital)
    }

    /// Rejected as a whole when the new shift overlaps any stored shift.
    pub async fn add_shift(&self, input: ShiftInput) -> Result<Shift, AppError> {
        validate_shift(&input)?;
        let (Some(hospital_id), Some(date)) = (input.hospital_id, input.date) else {
            return Err(AppError::BadRequest("Hospital and date are required".to_string()));
        };

        let start = parse_template_time("startTime", &input.start_time)?;
        let end = parse_template_time("endTime", &input.end_time)?;
        let window = ShiftWindow::from_template(date, start, end)
            .ok_or_else(|| AppError::BadRequest(format!("Date out of range: {}", date)))?;

        // Hospital lookup, overlap check and insert form one critical section
        let lock = self.shifts.lock().await;
        let hospital = self.active_hospital(&lock, hospital_id).await?;
        let shift = Shift::new(&hospital, window, clean_notes(input.notes));

        let shift = self
            .shifts
            .modify_with(&lock, |shifts| {
                if !OverlapGuard::new(shifts.iter()).admit(window) {
                    return Err(AppError::Conflict(OVERLAP_MESSAGE.to_string()));
                }
                shifts.push(shift.clone());
                Ok(shift)
            })
            .await?;
        drop(lock);

        log::info!(
            "Shift {} added at {} ({:.2}h)",
            shift.id,
            hospital.name,
            shift.total_hours
        );
        Ok(shift)
    }

    /// Dates are processed in order. Each one is checked against the stored
    /// shifts plus the ones accepted earlier in the batch and stored on its
    /// own; a conflict or a storage failure never undoes earlier dates.
    pub async fn bulk_add(&self, input: BulkShiftInput) -> Result<BulkAddResult, AppError> {
        validate_bulk_shift(&input)?;
        let Some(hospital_id) = input.hospital_id else {
            return Err(AppError::BadRequest("Hospital is required".to_string()));
        };

        let start = parse_template_time("startTime", &input.start_time)?;
        let end = parse_template_time("endTime", &input.end_time)?;
        let notes = clean_notes(input.notes);

        let lock = self.shifts.lock().await;
        let hospital = self.active_hospital(&lock, hospital_id).await?;
        let existing = self.shifts.get_all_with(&lock).await?;
        let mut guard = OverlapGuard::new(existing.iter());
        let mut result = BulkAddResult::default();

        for date in input.dates {
            let Some(window) = ShiftWindow::from_template(date, start, end) else {
                result.failed_dates.push(date);
                continue;
            };

            if guard.conflicts_with(&window) {
                result.conflict_dates.push(date);
                continue;
            }

            let shift = Shift::new(&hospital, window, notes.clone());
            match self.shifts.insert_with(&lock, shift.clone()).await {
                Ok(()) => {
                    guard.record(window);
                    result.added_shifts += 1;
                    result.shifts.push(shift);
                }
                Err(e) => {
                    log::error!("Failed to store shift for {}: {:#}", date, e);
                    result.failed_dates.push(date);
                }
            }
        }
        drop(lock);

        log::info!(
            "Bulk add at {}: {} added, {} conflicts, {} failed",
            hospital.name,
            result.added_shifts,
            result.conflict_dates.len(),
            result.failed_dates.len()
        );
        Ok(result)
    }

    /// Recomputes hours and amount with the hospital's current rate. The
    /// shift is only checked against the other shifts, never against itself.
    pub async fn edit_shift(&self, id: Uuid, input: ShiftInput) -> Result<Shift, AppError> {
        validate_shift(&input)?;
        let (Some(hospital_id), Some(date)) = (input.hospital_id, input.date) else {
            return Err(AppError::BadRequest("Hospital and date are required".to_string()));
        };

        let start = parse_template_time("startTime", &input.start_time)?;
        let end = parse_template_time("endTime", &input.end_time)?;
        let window = ShiftWindow::from_template(date, start, end)
            .ok_or_else(|| AppError::BadRequest(format!("Date out of range: {}", date)))?;
        let notes = clean_notes(input.notes);

        let lock = self.shifts.lock().await;
        let current = self
            .shifts
            .find_by_id_with(&lock, id)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", &id.to_string()))?;
        let hospital = if current.hospital_id == hospital_id {
            self.hospital(&lock, hospital_id).await?
        } else {
            self.active_hospital(&lock, hospital_id).await?
        };

        self.shifts
            .modify_with(&lock, |shifts| {
                if OverlapGuard::new(shifts.iter().filter(|s| s.id != id)).conflicts_with(&window) {
                    return Err(AppError::Conflict(OVERLAP_MESSAGE.to_string()));
                }
                let shift = shifts
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or_else(|| AppError::not_found("Shift", &id.to_string()))?;
                shift.reschedule(&hospital, window, notes);
                Ok(shift.clone())
            })
            .await
    }

    pub async fn toggle_paid(&self, id: Uuid) -> Result<Shift, AppError> {
        self.shifts
            .update(id, |shift| shift.is_paid = !shift.is_paid)
            .await?
            .ok_or_else(|| AppError::not_found("Shift", &id.to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.shifts.delete(id).await? {
            return Err(AppError::not_found("Shift", &id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::HospitalInput;
    use crate::services::hospital_service::HospitalService;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn setup(rate: f64) -> (ShiftService, HospitalService, Hospital) {
        let storage = Storage::memory();
        let owner = Uuid::new_v4();
        let hospitals = HospitalService::for_user(&storage, owner);
        let hospital = hospitals
            .add(HospitalInput {
                name: "Hospital Central".to_string(),
                hourly_rate: Some(rate),
                address: None,
                color: "#3B82F6".to_string(),
            })
            .await
            .unwrap();
        (ShiftService::for_user(&storage, owner), hospitals, hospital)
    }

    fn single(hospital: &Hospital, day: &str, start: &str, end: &str) -> ShiftInput {
        ShiftInput {
            hospital_id: Some(hospital.id),
            date: Some(date(day)),
            start_time: start.to_string(),
            end_time: end.to_string(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn add_computes_hours_and_amount() {
        let (service, _, hospital) = setup(100.0).await;
        let shift = service
            .add_shift(single(&hospital, "2024-01-01", "08:00", "20:00"))
            .await
            .unwrap();

        assert_eq!(shift.total_hours, 12.0);
        assert_eq!(shift.total_amount, 1200.0);
        assert_eq!(shift.end_date, date("2024-01-01"));
    }

    #[tokio::test]
    async fn touching_shifts_are_both_accepted() {
        let (service, _, hospital) = setup(100.0).await;
        service
            .add_shift(single(&hospital, "2024-01-01", "08:00", "20:00"))
            .await
            .unwrap();
        let night = service
            .add_shift(single(&hospital, "2024-01-01", "20:00", "08:00"))
            .await
            .unwrap();

        assert_eq!(night.end_date, date("2024-01-02"));
        assert_eq!(service.list(&ShiftFilter::default(), date("2024-01-01")).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn overlapping_single_add_changes_nothing() {
        let (service, _, hospital) = setup(100.0).await;
        service
            .add_shift(single(&hospital, "2024-01-01", "07:00", "19:00"))
            .await
            .unwrap();

        let err = service
            .add_shift(single(&hospital, "2024-01-01", "12:00", "13:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(service.list(&ShiftFilter::default(), date("2024-01-01")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn bulk_reports_conflicting_dates() {
        let (service, _, hospital) = setup(100.0).await;
        service
            .add_shift(single(&hospital, "2024-01-01", "07:00", "19:00"))
            .await
            .unwrap();

        let result = service
            .bulk_add(BulkShiftInput {
                hospital_id: Some(hospital.id),
                dates: vec![date("2024-01-01"), date("2024-01-02")],
                start_time: "07:00".to_string(),
                end_time: "19:00".to_string(),
                notes: None,
            })
            .await
            .unwrap();

        assert_eq!(result.added_shifts, 1);
        assert_eq!(result.conflict_dates, vec![date("2024-01-01")]);
        assert!(result.failed_dates.is_empty());
        assert_eq!(result.shifts[0].start_date, date("2024-01-02"));
    }

    #[tokio::test]
    async fn bulk_checks_candidates_against_each_other() {
        let (service, _, hospital) = setup(10.0).await;

        let result = service
            .bulk_add(BulkShiftInput {
                hospital_id: Some(hospital.id),
                dates: vec![date("2024-03-01"), date("2024-03-02"), date("2024-03-03")],
                start_time: "20:00".to_string(),
                end_time: "12:00".to_string(),
                notes: Some("  ".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(result.added_shifts, 3);
        assert!(result.conflict_dates.is_empty());
        assert!(result.shifts.iter().all(|s| s.notes.is_none() && s.total_hours == 16.0));

        let again = service
            .bulk_add(BulkShiftInput {
                hospital_id: Some(hospital.id),
                dates: vec![date("2024-03-04"), date("2024-03-04"), date("2024-03-03")],
                start_time: "20:00".to_string(),
                end_time: "12:00".to_string(),
                notes: None,
            })
            .await
            .unwrap();

        assert_eq!(again.added_shifts, 1);
        assert_eq!(again.conflict_dates, vec![date("2024-03-04"), date("2024-03-03")]);
    }

    #[tokio::test]
    async fn disabled_or_unknown_hospital_is_rejected() {
        let (service, hospitals, hospital) = setup(100.0).await;
        hospitals.toggle_status(hospital.id).await.unwrap();

        let err = service
            .add_shift(single(&hospital, "2024-01-01", "07:00", "19:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let mut unknown = single(&hospital, "2024-01-01", "07:00", "19:00");
        unknown.hospital_id = Some(Uuid::new_v4());
        assert!(matches!(
            service.add_shift(unknown).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn hospital_deleted_while_add_waits_is_not_referenced() {
        let storage = Storage::memory();
        let owner = Uuid::new_v4();
        let hospital = HospitalService::for_user(&storage, owner)
            .add(HospitalInput {
                name: "Hospital Central".to_string(),
                hourly_rate: Some(100.0),
                address: None,
                color: "#3B82F6".to_string(),
            })
            .await
            .unwrap();
        let service = ShiftService::for_user(&storage, owner);
        let shifts = ShiftRepository::new(storage.clone(), owner);
        let hospitals = HospitalRepository::new(storage.clone(), owner);

        let guard = storage.write_guard().await;
        let pending = tokio::spawn({
            let service = service.clone();
            let input = single(&hospital, "2024-01-01", "07:00", "19:00");
            async move { service.add_shift(input).await }
        });
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(!pending.is_finished());

        // Same critical section as a hospital delete
        assert_eq!(shifts.count_for_hospital_with(&guard, hospital.id).await.unwrap(), 0);
        assert!(hospitals.delete_with(&guard, hospital.id).await.unwrap());
        drop(guard);

        let added = pending.await.unwrap();
        assert!(matches!(added, Err(AppError::NotFound(_))));
        assert!(shifts.get_all().await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_identical_adds_store_one_shift() {
        let (service, _, hospital) = setup(100.0).await;

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                let input = single(&hospital, "2024-01-01", "07:00", "19:00");
                tokio::spawn(async move { service.add_shift(input).await })
            })
            .collect();

        let mut accepted = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(e) => assert!(matches!(e, AppError::Conflict(_))),
            }
        }

        assert_eq!(accepted, 1);
        assert_eq!(service.list(&ShiftFilter::default(), date("2024-01-01")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn edit_recomputes_and_ignores_itself() {
        let (service, hospitals, hospital) = setup(100.0).await;
        let shift = service
            .add_shift(single(&hospital, "2024-01-01", "07:00", "19:00"))
            .await
            .unwrap();
        service.toggle_paid(shift.id).await.unwrap();

        let mut rate_change = HospitalInput {
            name: hospital.name.clone(),
            hourly_rate: Some(50.0),
            address: None,
            color: hospital.color.clone(),
        };
        hospitals.edit(hospital.id, rate_change.clone()).await.unwrap();

        // snapshot survives the rate change
        assert_eq!(service.get(shift.id).await.unwrap().total_amount, 1200.0);

        let edited = service
            .edit_shift(shift.id, single(&hospital, "2024-01-01", "08:00", "19:00"))
            .await
            .unwrap();
        assert_eq!(edited.id, shift.id);
        assert!(edited.is_paid);
        assert_eq!(edited.total_hours, 11.0);
        assert_eq!(edited.total_amount, 550.0);

        rate_change.hourly_rate = Some(75.0);
        hospitals.edit(hospital.id, rate_change).await.unwrap();
        assert_eq!(service.get(shift.id).await.unwrap().total_amount, 550.0);
    }

    #[tokio::test]
    async fn edit_into_another_shift_conflicts() {
        let (service, _, hospital) = setup(100.0).await;
        service
            .add_shift(single(&hospital, "2024-01-01", "07:00", "19:00"))
            .await
            .unwrap();
        let other = service
            .add_shift(single(&hospital, "2024-01-02", "07:00", "19:00"))
            .await
            .unwrap();

        let err = service
            .edit_shift(other.id, single(&hospital, "2024-01-01", "18:00", "20:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(service.get(other.id).await.unwrap(), other);
    }

    #[tokio::test]
    async fn toggle_and_delete() {
        let (service, _, hospital) = setup(100.0).await;
        let shift = service
            .add_shift(single(&hospital, "2024-01-01", "07:00", "19:00"))
            .await
            .unwrap();

        assert!(service.toggle_paid(shift.id).await.unwrap().is_paid);
        assert!(!service.toggle_paid(shift.id).await.unwrap().is_paid);

        service.delete(shift.id).await.unwrap();
        assert!(matches!(service.delete(shift.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.get(shift.id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn upcoming_starts_now_or_later() {
        let (service, _, hospital) = setup(100.0).await;
        for day in ["2024-01-03", "2024-01-01", "2024-01-05"] {
            service
                .add_shift(single(&hospital, day, "07:00", "19:00"))
                .await
                .unwrap();
        }

        let now = date("2024-01-03").and_hms_opt(7, 0, 0).unwrap();
        let upcoming = service.upcoming(now).await.unwrap();
        assert_eq!(
            upcoming.iter().map(|s| s.shift.start_date).collect::<Vec<_>>(),
            vec![date("2024-01-03"), date("2024-01-05")]
        );
    }
}
