use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{Company, Decision, DecisionKey, Student};

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts or replaces the student keyed by `student.id`. An existing
    /// record keeps its `created_at`. Returns the record as stored.
    async fn upsert_student(&self, student: &Student) -> Result<Student>;

    async fn get_student(&self, id: &str) -> Result<Option<Student>>;

    async fn list_students(&self) -> Result<Vec<Student>>;

    async fn upsert_company(&self, company: &Company) -> Result<()>;

    async fn get_company(&self, id: &str) -> Result<Option<Company>>;

    async fn list_companies(&self) -> Result<Vec<Company>>;

    async fn delete_company(&self, id: &str) -> Result<bool>;

    /// Writes the decision only while its company exists, checked atomically
    /// with the write. Returns `false` when the company is missing.
    async fn upsert_decision(&self, decision: &Decision) -> Result<bool>;

    async fn get_decision(&self, key: &DecisionKey) -> Result<Option<Decision>>;

    async fn list_decisions(&self) -> Result<Vec<Decision>>;

    async fn decisions_for_company(&self, company_id: &str) -> Result<Vec<Decision>>;

    async fn decisions_for_student(&self, student_id: &str) -> Result<Vec<Decision>>;

    async fn delete_decisions_for_company(&self, company_id: &str) -> Result<u64>;
}

#[derive(Debug, Default)]
struct Collections {
    students: BTreeMap<String, Student>,
    companies: BTreeMap<String, Company>,
    decisions: BTreeMap<DecisionKey, Decision>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn upsert_student(&self, student: &Student) -> Result<Student> {
        let mut inner = self.inner.write().await;
        let mut stored = student.clone();
        if let Some(existing) = inner.students.get(&student.id) {
            stored.created_at = existing.created_at;
        }
        inner.students.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_student(&self, id: &str) -> Result<Option<Student>> {
        Ok(self.inner.read().await.students.get(id).cloned())
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        Ok(self.inner.read().await.students.values().cloned().collect())
    }

    async fn upsert_company(&self, company: &Company) -> Result<()> {
        self.inner
            .write()
            .await
            .companies
            .insert(company.id.clone(), company.clone());
        Ok(())
    }

    async fn get_company(&self, id: &str) -> Result<Option<Company>> {
        Ok(self.inner.read().await.companies.get(id).cloned())
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        Ok(self.inner.read().await.companies.values().cloned().collect())
    }

    async fn delete_company(&self, id: &str) -> Result<bool> {
        Ok(self.inner.write().await.companies.remove(id).is_some())
    }

    async fn upsert_decision(&self, decision: &Decision) -> Result<bool> {
        let mut inner = self.inner.write().await;
        if !inner.companies.contains_key(&decision.company_id) {
            return Ok(false);
        }
        inner.decisions.insert(decision.key(), decision.clone());
        Ok(true)
    }

    async fn get_decision(&self, key: &DecisionKey) -> Result<Option<Decision>> {
        Ok(self.inner.read().await.decisions.get(key).cloned())
    }

    async fn list_decisions(&self) -> Result<Vec<Decision>> {
        Ok(self.inner.read().await.decisions.values().cloned().collect())
    }

    async fn decisions_for_company(&self, company_id: &str) -> Result<Vec<Decision>> {
        let inner = self.inner.read().await;
        Ok(inner
            .decisions
            .values()
            .filter(|decision| decision.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn decisions_for_student(&self, student_id: &str) -> Result<Vec<Decision>> {
        let inner = self.inner.read().await;
        Ok(inner
            .decisions
            .values()
            .filter(|decision| decision.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn delete_decisions_for_company(&self, company_id: &str) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.decisions.len();
        inner
            .decisions
            .retain(|key, _| key.company_id != company_id);
        Ok((before - inner.decisions.len()) as u64)
    }
}
