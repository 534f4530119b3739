use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{PortalError, Result};
use crate::models::{Decision, DecisionKey, DecisionStatus};
use crate::retry::RetryPolicy;
use crate::store::RecordStore;
use crate::validation;

#[derive(Clone)]
pub struct DecisionLedger {
    store: Arc<dyn RecordStore>,
    retry: RetryPolicy,
}

impl DecisionLedger {
    pub fn new(store: Arc<dyn RecordStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    pub async fn set_status(&self, company_id: &str, student_id: &str, status: &str) -> Result<Decision> {
        let status = validation::parse_status(status)?;
        if company_id.trim().is_empty() || student_id.trim().is_empty() {
            return Err(PortalError::InvalidArgument(
                "company and student ids must not be empty".into(),
            ));
        }

        self.retry
            .run("get_student", || self.store.get_student(student_id))
            .await?
            .ok_or_else(|| PortalError::not_found("student", student_id))?;

        let decision = Decision {
            company_id: company_id.to_string(),
            student_id: student_id.to_string(),
            status,
            updated_at: Utc::now(),
        };
        let written = self
            .retry
            .run("upsert_decision", || self.store.upsert_decision(&decision))
            .await?;
        if !written {
            return Err(PortalError::not_found("company", company_id));
        }

        info!(key = %decision.key(), status = %decision.status, "recorded decision");
        Ok(decision)
    }

    pub async fn get_status(&self, company_id: &str, student_id: &str) -> Result<DecisionStatus> {
        let key = DecisionKey::new(company_id, student_id);
        let decision = self
            .retry
            .run("get_decision", || self.store.get_decision(&key))
            .await?;

        debug!(%key, found = decision.is_some(), "looked up decision");
        Ok(decision.map(|decision| decision.status).unwrap_or_default())
    }

    pub async fn all_statuses(&self) -> Result<HashMap<DecisionKey, DecisionStatus>> {
        let decisions = self
            .retry
            .run("list_decisions", || self.store.list_decisions())
            .await?;

        Ok(index_statuses(&decisions))
    }

    pub async fn statuses_for_student(&self, student_id: &str) -> Result<Vec<Decision>> {
        self.retry
            .run("decisions_for_student", || self.store.decisions_for_student(student_id))
            .await
    }

    pub async fn statuses_for_company(&self, company_id: &str) -> Result<Vec<Decision>> {
        self.retry
            .run("decisions_for_company", || self.store.decisions_for_company(company_id))
            .await
    }
}

pub fn index_statuses(decisions: &[Decision]) -> HashMap<DecisionKey, DecisionStatus> {
    decisions
        .iter()
        .map(|decision| (decision.key(), decision.status))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Company, Student};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    async fn ledger() -> (Arc<MemoryStore>, DecisionLedger) {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        for id in ["ria", "dev"] {
            store
                .upsert_student(&Student {
                    id: id.to_string(),
                    name: id.to_string(),
                    email: format!("{id}@college.edu"),
                    cgpa: 8.0,
                    semester: 5,
                    branch: "Computer Science".to_string(),
                    university_id: "U".to_string(),
                    college_id: "C".to_string(),
                    created_at: now,
                    updated_at: now,
                })
                .await
                .unwrap();
        }
        for id in ["acme", "basil"] {
            store
                .upsert_company(&Company {
                    id: id.to_string(),
                    name: id.to_string(),
                    location: String::new(),
                    package: String::new(),
                    cgpa_requirement: 7.0,
                    interview_date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
                    eligible_branches: vec!["Computer Science".to_string()],
                })
                .await
                .unwrap();
        }
        let ledger = DecisionLedger::new(store.clone(), RetryPolicy::default());
        (store, ledger)
    }

    #[tokio::test]
    async fn absent_decision_reads_as_pending() {
        let (_, ledger) = ledger().await;
        assert_eq!(ledger.get_status("acme", "ria").await.unwrap(), DecisionStatus::Pending);
        assert_eq!(ledger.get_status("nobody", "nowhere").await.unwrap(), DecisionStatus::Pending);
    }

    #[tokio::test]
    async fn repeated_writes_are_idempotent() {
        let (store, ledger) = ledger().await;
        ledger.set_status("acme", "ria", "eligible").await.unwrap();
        ledger.set_status("acme", "ria", "eligible").await.unwrap();

        assert_eq!(ledger.get_status("acme", "ria").await.unwrap(), DecisionStatus::Eligible);
        assert_eq!(store.list_decisions().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn last_write_wins() {
        let (_, ledger) = ledger().await;
        ledger.set_status("acme", "ria", "eligible").await.unwrap();
        ledger.set_status("acme", "ria", "rejected").await.unwrap();
        assert_eq!(ledger.get_status("acme", "ria").await.unwrap(), DecisionStatus::Rejected);
    }

    #[tokio::test]
    async fn invalid_status_is_refused_before_writing() {
        let (store, ledger) = ledger().await;
        assert!(matches!(
            ledger.set_status("acme", "ria", "shortlisted").await,
            Err(PortalError::InvalidStatus(_))
        ));
        assert!(store.list_decisions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_company_or_student_is_not_found() {
        let (_, ledger) = ledger().await;
        assert!(matches!(
            ledger.set_status("ghost", "ria", "eligible").await,
            Err(PortalError::NotFound { entity: "company", .. })
        ));
        assert!(matches!(
            ledger.set_status("acme", "ghost", "eligible").await,
            Err(PortalError::NotFound { entity: "student", .. })
        ));
        assert!(matches!(
            ledger.set_status("", "ria", "eligible").await,
            Err(PortalError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn scoped_and_bulk_reads_agree() {
        let (_, ledger) = ledger().await;
        ledger.set_status("acme", "ria", "eligible").await.unwrap();
        ledger.set_status("acme", "dev", "rejected").await.unwrap();
        ledger.set_status("basil", "ria", "pending").await.unwrap();

        let all = ledger.all_statuses().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[&DecisionKey::new("acme", "dev")], DecisionStatus::Rejected);

        assert_eq!(ledger.statuses_for_student("ria").await.unwrap().len(), 2);
        let acme = ledger.statuses_for_company("acme").await.unwrap();
        assert_eq!(acme.len(), 2);
        assert!(acme.iter().all(|decision| decision.company_id == "acme"));
    }
}
