use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarePlanTask {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Treatment plan attached to a patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarePlan {
    pub short_term_goals: String,
    pub long_term_goals: String,
    pub exercise_therapy: String,
    pub duration: String,
    pub frequency: String,
    pub exercises: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<CarePlanTask>>,
    pub completed_tasks: u32,
    pub total_tasks: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl CarePlan {
    /// Completion in whole percent, capped at 100.
    ///
    /// A non-empty task list wins over the completed/total counters; with
    /// neither available the plan is at 0.
    pub fn progress_percent(&self) -> u8 {
        let (done, total) = match self.tasks.as_deref() {
            Some(tasks) if !tasks.is_empty() => (tasks.iter().filter(|t| t.completed).count() as f64, tasks.len() as f64),
            _ if self.total_tasks > 0 => (f64::from(self.completed_tasks), f64::from(self.total_tasks)),
            _ => return 0,
        };
        (done / total * 100.0).round().min(100.0) as u8
    }
}
