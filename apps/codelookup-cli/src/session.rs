//! State and command parsing for the interactive lookup loop.

use anyhow::{bail, Result};

use codelookup_core::ScoredMatch;
use codelookup_records::{Assessment, RecordStore, SelectedCode, SelectedCodes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Search(String),
    /// 1-based index into the last result list.
    Select(usize),
    Selected,
    Save,
    Stats,
    Help,
    Quit,
    Invalid(String),
    Empty,
}

impl SessionCommand {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::Empty;
        }
        if !input.starts_with('/') {
            return Self::Search(input.to_string());
        }
        let mut parts = input.split_whitespace();
        let command = parts.next().unwrap_or_default();
        match command {
            "/select" | "/add" => match parts.next().map(str::parse::<usize>) {
                Some(Ok(n)) if n > 0 => Self::Select(n),
                _ => Self::Invalid("usage: /select <result number>".into()),
            },
            "/selected" => Self::Selected,
            "/save" => Self::Save,
            "/stats" | "/s" => Self::Stats,
            "/help" | "/h" => Self::Help,
            "/quit" | "/q" | "/exit" => Self::Quit,
            other => Self::Invalid(format!("unknown command {}", other)),
        }
    }
}

pub const HELP: &str = "\
Commands:
  <query>        search both vocabularies
  /select <n>    toggle result n of the last search in the assessment
  /selected      list selected codes
  /save          store the assessment for the current patient
  /stats         corpus statistics
  /help          show this help
  /quit          exit";

/// One clinician's lookup session against a single patient's assessment.
pub struct Session {
    patient_id: String,
    assessment: Assessment,
    last_results: Vec<ScoredMatch>,
}

impl Session {
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self { patient_id: patient_id.into(), assessment: Assessment::default(), last_results: Vec::new() }
    }

    /// Start from the patient's stored assessment when there is one.
    pub async fn resume<S: RecordStore>(patient_id: impl Into<String>, store: &S) -> Result<Self> {
        let mut session = Self::new(patient_id);
        if let Some(existing) = store.get_assessment(&session.patient_id).await? {
            session.assessment = existing;
        }
        Ok(session)
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn set_results(&mut self, results: Vec<ScoredMatch>) {
        self.last_results = results;
    }

    pub fn results(&self) -> &[ScoredMatch] {
        &self.last_results
    }

    /// Toggle the `n`-th (1-based) result of the last search. Returns the code
    /// and whether it is now selected.
    pub fn select(&mut self, n: usize) -> Result<(SelectedCode, bool)> {
        let Some(result) = n.checked_sub(1).and_then(|i| self.last_results.get(i)) else {
            bail!("no result {} (last search returned {})", n, self.last_results.len());
        };
        let code = SelectedCode::from(result);
        let now_selected = self.assessment.selected_codes.toggle(code.clone());
        Ok((code, now_selected))
    }

    pub fn selected(&self) -> &SelectedCodes {
        &self.assessment.selected_codes
    }

    pub async fn save<S: RecordStore>(&mut self, store: &S) -> Result<&Assessment> {
        self.assessment = store.save_assessment(&self.patient_id, self.assessment.clone()).await?;
        Ok(&self.assessment)
    }
}
