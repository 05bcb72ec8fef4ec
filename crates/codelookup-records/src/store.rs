use std::collections::HashMap;
use std::future::Future;

use chrono::Utc;
use tokio::sync::RwLock;

use codelookup_core::error::{Error, Result};

use crate::assessment::Assessment;
use crate::care_plan::CarePlan;

/// Per-patient persistence for assessments and care plans.
///
/// Saving replaces the patient's previous record and returns the stored copy,
/// stamped with the patient id and save time.
pub trait RecordStore: Send + Sync {
    fn get_assessment(&self, patient_id: &str) -> impl Future<Output = Result<Option<Assessment>>> + Send;
    fn save_assessment(&self, patient_id: &str, assessment: Assessment) -> impl Future<Output = Result<Assessment>> + Send;
    fn get_care_plan(&self, patient_id: &str) -> impl Future<Output = Result<Option<CarePlan>>> + Send;
    fn save_care_plan(&self, patient_id: &str, plan: CarePlan) -> impl Future<Output = Result<CarePlan>> + Send;
}

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    assessments: RwLock<HashMap<String, Assessment>>,
    care_plans: RwLock<HashMap<String, CarePlan>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn patient_key(patient_id: &str) -> Result<String> {
    let id = patient_id.trim();
    if id.is_empty() {
        return Err(Error::Operation("patient id must not be blank".into()));
    }
    Ok(id.to_string())
}

impl RecordStore for InMemoryRecordStore {
    async fn get_assessment(&self, patient_id: &str) -> Result<Option<Assessment>> {
        let key = patient_key(patient_id)?;
        Ok(self.assessments.read().await.get(&key).cloned())
    }

    async fn save_assessment(&self, patient_id: &str, mut assessment: Assessment) -> Result<Assessment> {
        let key = patient_key(patient_id)?;
        assessment.patient_id = Some(key.clone());
        assessment.saved_at = Some(Utc::now());
        tracing::debug!("Saving assessment for {} ({} codes)", key, assessment.selected_codes.len());
        self.assessments.write().await.insert(key, assessment.clone());
        Ok(assessment)
    }

    async fn get_care_plan(&self, patient_id: &str) -> Result<Option<CarePlan>> {
        let key = patient_key(patient_id)?;
        Ok(self.care_plans.read().await.get(&key).cloned())
    }

    async fn save_care_plan(&self, patient_id: &str, mut plan: CarePlan) -> Result<CarePlan> {
        let key = patient_key(patient_id)?;
        plan.patient_id = Some(key.clone());
        plan.saved_at = Some(Utc::now());
        tracing::debug!("Saving care plan for {} ({}% complete)", key, plan.progress_percent());
        self.care_plans.write().await.insert(key, plan.clone());
        Ok(plan)
    }
}
