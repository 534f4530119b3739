use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::eligibility;
use crate::error::{PortalError, Result};
use crate::ledger::{index_statuses, DecisionLedger};
use crate::models::{
    Candidate, Company, CompanyCandidate, CompanyOverview, DecisionKey, DecisionStatus, Student,
};
use crate::records::{authenticated, Records};
use crate::retry::RetryPolicy;
use crate::store::RecordStore;

#[derive(Clone)]
pub struct PortalService {
    records: Records,
    ledger: DecisionLedger,
}

impl PortalService {
    pub fn new(store: Arc<dyn RecordStore>, retry: RetryPolicy) -> Self {
        Self {
            records: Records::new(store.clone(), retry),
            ledger: DecisionLedger::new(store, retry),
        }
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn ledger(&self) -> &DecisionLedger {
        &self.ledger
    }

    pub async fn candidates_for_company(&self, company_id: &str) -> Result<Vec<Candidate>> {
        let company = self.records.get_company(company_id).await?;
        let students = self.records.list_students().await?;
        let statuses = index_statuses(&self.ledger.statuses_for_company(company_id).await?);

        let candidates = candidates(&company, &students, &statuses);
        debug!(company_id, candidates = candidates.len(), "computed candidates");
        Ok(candidates)
    }

    pub async fn company_candidates(&self, student_id: &str) -> Result<Vec<CompanyCandidate>> {
        let student = self.records.find_student(student_id).await?;
        let companies = self.records.list_companies().await?;
        let statuses = index_statuses(&self.ledger.statuses_for_student(student_id).await?);

        Ok(eligibility::filter_eligible_companies(&student, &companies)
            .into_iter()
            .map(|company| CompanyCandidate {
                status: status_of(&statuses, &company.id, &student.id),
                company: company.clone(),
            })
            .collect())
    }

    /// Requires both derived eligibility and an explicit `eligible` decision.
    pub async fn eligible_interviews(&self, student_id: &str) -> Result<Vec<Company>> {
        let interviews: Vec<Company> = self
            .company_candidates(student_id)
            .await?
            .into_iter()
            .filter(|candidate| candidate.status == DecisionStatus::Eligible)
            .map(|candidate| candidate.company)
            .collect();

        debug!(student_id, interviews = interviews.len(), "resolved eligible interviews");
        Ok(interviews)
    }

    pub async fn my_interviews(&self, identity: Option<&str>) -> Result<Vec<Company>> {
        let id = authenticated(identity)?;
        self.eligible_interviews(id).await
    }

    pub async fn placement_overview(&self, company_id: Option<&str>) -> Result<Vec<CompanyOverview>> {
        let students = self.records.list_students().await?;
        let mut companies = self.records.list_companies().await?;
        let statuses = self.ledger.all_statuses().await?;

        if let Some(id) = company_id {
            companies.retain(|company| company.id == id);
            if companies.is_empty() {
                return Err(PortalError::not_found("company", id));
            }
        }

        Ok(companies
            .into_iter()
            .map(|company| CompanyOverview {
                candidates: candidates(&company, &students, &statuses),
                company,
            })
            .collect())
    }
}

fn status_of(
    statuses: &HashMap<DecisionKey, DecisionStatus>,
    company_id: &str,
    student_id: &str,
) -> DecisionStatus {
    statuses
        .get(&DecisionKey::new(company_id, student_id))
        .copied()
        .unwrap_or_default()
}

fn candidates(
    company: &Company,
    students: &[Student],
    statuses: &HashMap<DecisionKey, DecisionStatus>,
) -> Vec<Candidate> {
    eligibility::filter_eligible_students(students, company)
        .into_iter()
        .map(|student| Candidate {
            status: status_of(statuses, &company.id, &student.id),
            student: student.clone(),
        })
        .collect()
}
