use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PortalError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub cgpa: f64,
    pub semester: i32,
    pub branch: String,
    pub university_id: String,
    pub college_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentForm {
    pub name: String,
    pub email: String,
    pub cgpa: String,
    pub semester: String,
    pub branch: String,
    pub university_id: String,
    pub college_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub cgpa: Option<String>,
    pub semester: Option<String>,
    pub branch: Option<String>,
    pub university_id: Option<String>,
    pub college_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub location: String,
    pub package: String,
    pub cgpa_requirement: f64,
    pub interview_date: NaiveDate,
    pub eligible_branches: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CompanyForm {
    /// Existing id to overwrite; a fresh id is generated when absent.
    pub id: Option<String>,
    pub name: String,
    pub location: String,
    pub package: String,
    pub cgpa_requirement: String,
    pub interview_date: String,
    pub eligible_branches: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    #[default]
    Pending,
    Eligible,
    Rejected,
}

impl DecisionStatus {
    pub const ALL: [DecisionStatus; 3] = [Self::Pending, Self::Eligible, Self::Rejected];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Eligible => "eligible",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionStatus {
    type Err = PortalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "eligible" => Ok(Self::Eligible),
            "rejected" => Ok(Self::Rejected),
            other => Err(PortalError::InvalidStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionKey {
    pub company_id: String,
    pub student_id: String,
}

impl DecisionKey {
    pub fn new(company_id: impl Into<String>, student_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            student_id: student_id.into(),
        }
    }
}

impl fmt::Display for DecisionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.company_id, self.student_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub company_id: String,
    pub student_id: String,
    pub status: DecisionStatus,
    pub updated_at: DateTime<Utc>,
}

impl Decision {
    pub fn key(&self) -> DecisionKey {
        DecisionKey::new(&self.company_id, &self.student_id)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub student: Student,
    pub status: DecisionStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyCandidate {
    pub company: Company,
    pub status: DecisionStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyOverview {
    pub company: Company,
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeOutcome {
    pub company_removed: bool,
    pub decisions_removed: u64,
}

#[derive(Debug, Clone)]
pub struct StatusSummary {
    pub status: DecisionStatus,
    pub count: usize,
}
