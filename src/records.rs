use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{PortalError, Result};
use crate::models::{CascadeOutcome, Company, CompanyForm, Student, StudentForm, StudentPatch};
use crate::retry::RetryPolicy;
use crate::store::RecordStore;
use crate::validation;

pub fn authenticated(identity: Option<&str>) -> Result<&str> {
    match identity.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(PortalError::NotAuthenticated),
    }
}

#[derive(Clone)]
pub struct Records {
    store: Arc<dyn RecordStore>,
    retry: RetryPolicy,
}

impl Records {
    pub fn new(store: Arc<dyn RecordStore>, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    pub async fn save_student(&self, identity: Option<&str>, form: &StudentForm) -> Result<Student> {
        let id = authenticated(identity)?;
        let student = validation::student_from_form(id, form, Utc::now())?;
        let stored = self
            .retry
            .run("upsert_student", || self.store.upsert_student(&student))
            .await?;

        info!(student_id = %stored.id, branch = %stored.branch, cgpa = stored.cgpa, "saved student profile");
        Ok(stored)
    }

    pub async fn get_student(&self, identity: Option<&str>) -> Result<Student> {
        let id = authenticated(identity)?;
        self.find_student(id).await
    }

    pub async fn find_student(&self, id: &str) -> Result<Student> {
        debug!(student_id = %id, "fetching student");
        self.retry
            .run("get_student", || self.store.get_student(id))
            .await?
            .ok_or_else(|| PortalError::not_found("student", id))
    }

    pub async fn update_student(&self, identity: Option<&str>, patch: &StudentPatch) -> Result<Student> {
        let id = authenticated(identity)?;
        let existing = self.find_student(id).await?;
        let merged = validation::merge_student(existing, patch, Utc::now())?;
        let stored = self
            .retry
            .run("upsert_student", || self.store.upsert_student(&merged))
            .await?;

        info!(student_id = %stored.id, "updated student profile");
        Ok(stored)
    }

    pub async fn list_students(&self) -> Result<Vec<Student>> {
        self.retry
            .run("list_students", || self.store.list_students())
            .await
    }

    pub async fn save_company(&self, form: &CompanyForm) -> Result<Company> {
        let company = validation::company_from_form(form)?;
        self.retry
            .run("upsert_company", || self.store.upsert_company(&company))
            .await?;

        info!(
            company_id = %company.id,
            cgpa_requirement = company.cgpa_requirement,
            branches = company.eligible_branches.len(),
            "saved company"
        );
        Ok(company)
    }

    pub async fn get_company(&self, id: &str) -> Result<Company> {
        debug!(company_id = %id, "fetching company");
        self.retry
            .run("get_company", || self.store.get_company(id))
            .await?
            .ok_or_else(|| PortalError::not_found("company", id))
    }

    pub async fn list_companies(&self) -> Result<Vec<Company>> {
        self.retry
            .run("list_companies", || self.store.list_companies())
            .await
    }

    /// Decisions go first, then the company, then a second sweep for any
    /// decision written in between. Decision writes need a live company, so
    /// a failure at any step leaves either the company with its decisions or
    /// no decisions at all, and a company re-saved under the same id starts
    /// clean.
    pub async fn delete_company(&self, id: &str) -> Result<CascadeOutcome> {
        if id.trim().is_empty() {
            return Err(PortalError::InvalidArgument("company id must not be empty".into()));
        }

        let mut decisions_removed = self.delete_decisions(id).await?;
        let company_removed = self
            .retry
            .run("delete_company", || self.store.delete_company(id))
            .await?;
        decisions_removed += self.delete_decisions(id).await?;

        info!(company_id = %id, company_removed, decisions_removed, "deleted company");
        Ok(CascadeOutcome {
            company_removed,
            decisions_removed,
        })
    }

    async fn delete_decisions(&self, company_id: &str) -> Result<u64> {
        self.retry
            .run("delete_decisions_for_company", || {
                self.store.delete_decisions_for_company(company_id)
            })
            .await
    }
}
