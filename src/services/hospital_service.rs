use uuid::Uuid;

use crate::database::{
    models::{Hospital, HospitalInput},
    repositories::{HospitalRepository, ShiftRepository},
    store::Storage,
};
use crate::error::AppError;
use crate::services::validation::validate_hospital;

/// Hospital registry of one user
#[derive(Clone)]
pub struct HospitalService {
    storage: Storage,
    hospitals: HospitalRepository,
    shifts: ShiftRepository,
}

impl HospitalService {
    pub fn for_user(storage: &Storage, owner_id: Uuid) -> Self {
        Self {
            storage: storage.clone(),
            hospitals: HospitalRepository::new(storage.clone(), owner_id),
            shifts: ShiftRepository::new(storage.clone(), owner_id),
        }
    }

    pub async fn list(&self) -> Result<Vec<Hospital>, AppError> {
        Ok(self.hospitals.get_all().await?)
    }

    pub async fn enabled(&self) -> Result<Vec<Hospital>, AppError> {
        Ok(self.hospitals.find_enabled().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Hospital, AppError> {
        self.hospitals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Hospital", &id.to_string()))
    }

    pub async fn add(&self, input: HospitalInput) -> Result<Hospital, AppError> {
        validate_hospital(&input)?;

        let hospital = self.hospitals.create(Hospital::new(input)).await?;
        log::info!("Hospital {} created ({})", hospital.id, hospital.name);
        Ok(hospital)
    }

    /// Existing shifts keep the amounts computed with the old rate
    pub async fn edit(&self, id: Uuid, input: HospitalInput) -> Result<Hospital, AppError> {
        validate_hospital(&input)?;

        self.hospitals
            .update(id, |hospital| hospital.apply(input))
            .await?
            .ok_or_else(|| AppError::not_found("Hospital", &id.to_string()))
    }

    pub async fn toggle_status(&self, id: Uuid) -> Result<Hospital, AppError> {
        let hospital = self
            .hospitals
            .update(id, |hospital| hospital.is_disabled = !hospital.is_disabled)
            .await?
            .ok_or_else(|| AppError::not_found("Hospital", &id.to_string()))?;

        log::info!(
            "Hospital {} {}",
            hospital.id,
            if hospital.is_enabled() { "enabled" } else { "disabled" }
        );
        Ok(hospital)
    }

    /// Refused while any shift references the hospital; nothing is cascaded.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let guard = self.storage.write_guard().await;

        let referencing = self.shifts.count_for_hospital_with(&guard, id).await?;
        if referencing > 0 {
            return Err(AppError::Conflict(format!(
                "Cannot delete hospital: {} shift(s) still reference it. Delete or move those shifts first.",
                referencing
            )));
        }

        if !self.hospitals.delete_with(&guard, id).await? {
            return Err(AppError::not_found("Hospital", &id.to_string()));
        }

        log::info!("Hospital {} deleted", id);
        Ok(())
    }
}
