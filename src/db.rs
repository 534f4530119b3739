use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::warn;

use crate::config::Config;
use crate::error::Result;
use crate::models::{Company, Decision, DecisionKey, DecisionStatus, Student};
use crate::store::RecordStore;

const STUDENT_COLUMNS: &str = "id, full_name, email, cgpa, semester, branch, university_id, \
     college_id, created_at, updated_at";
const COMPANY_COLUMNS: &str =
    "id, name, location, package, cgpa_requirement, interview_date, eligible_branches";
const DECISION_COLUMNS: &str = "company_id, student_id, status, updated_at";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.retry.timeout)
            .connect(&config.database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn init_db(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn student_from_row(row: &PgRow) -> Result<Student> {
    Ok(Student {
        id: row.try_get("id")?,
        name: row.try_get("full_name")?,
        email: row.try_get("email")?,
        cgpa: row.try_get("cgpa")?,
        semester: row.try_get("semester")?,
        branch: row.try_get("branch")?,
        university_id: row.try_get("university_id")?,
        college_id: row.try_get("college_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn company_from_row(row: &PgRow) -> Result<Company> {
    Ok(Company {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        location: row.try_get("location")?,
        package: row.try_get("package")?,
        cgpa_requirement: row.try_get("cgpa_requirement")?,
        interview_date: row.try_get("interview_date")?,
        eligible_branches: row.try_get("eligible_branches")?,
    })
}

fn decision_from_row(row: &PgRow) -> Result<Decision> {
    let company_id: String = row.try_get("company_id")?;
    let student_id: String = row.try_get("student_id")?;
    let raw_status: String = row.try_get("status")?;
    let status = raw_status.parse().unwrap_or_else(|_| {
        warn!(%company_id, %student_id, status = %raw_status, "unknown stored status, reading as pending");
        DecisionStatus::Pending
    });

    Ok(Decision {
        company_id,
        student_id,
        status,
        updated_at: row.try_get("updated_at")?,
    })
}

fn decisions_from_rows(rows: &[PgRow]) -> Result<Vec<Decision>> {
    rows.iter().map(decision_from_row).collect()
}

#[async_trait]
impl RecordStore for PgStore {
    async fn upsert_student(&self, student: &Student) -> Result<Student> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO placement_portal.students ({STUDENT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE
            SET full_name = EXCLUDED.full_name,
                email = EXCLUDED.email,
                cgpa = EXCLUDED.cgpa,
                semester = EXCLUDED.semester,
                branch = EXCLUDED.branch,
                university_id = EXCLUDED.university_id,
                college_id = EXCLUDED.college_id,
                updated_at = EXCLUDED.updated_at
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(&student.id)
        .bind(&student.name)
        .bind(&student.email)
        .bind(student.cgpa)
        .bind(student.semester)
        .bind(&student.branch)
        .bind(&student.university_id)
        .bind(&student.college_id)
        .bind(student.created_at)
        .bind(student.updated_at)
        .fetch_one(&self.pool)
        .await?;

        student_from_row(&row)
    }

    async fn get_student(&self, id: &str) -> Result<Option<Student>> {
        let row = sqlx::query(&format!(
            "SELECT {STUDENT_COLUMNS} FROM placement_portal.students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(student_from_row).transpose()
    }

    async fn list_students(&self) -> Result<Vec<Student>> {
        let rows = sqlx::query(&format!(
            "SELECT {STUDENT_COLUMNS} FROM placement_portal.students ORDER BY full_name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(student_from_row).collect()
    }

    async fn upsert_company(&self, company: &Company) -> Result<()> {
        sqlx::query(&format!(
            r#"
            INSERT INTO placement_portal.companies ({COMPANY_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                location = EXCLUDED.location,
                package = EXCLUDED.package,
                cgpa_requirement = EXCLUDED.cgpa_requirement,
                interview_date = EXCLUDED.interview_date,
                eligible_branches = EXCLUDED.eligible_branches
            "#
        ))
        .bind(&company.id)
        .bind(&company.name)
        .bind(&company.location)
        .bind(&company.package)
        .bind(company.cgpa_requirement)
        .bind(company.interview_date)
        .bind(&company.eligible_branches)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_company(&self, id: &str) -> Result<Option<Company>> {
        let row = sqlx::query(&format!(
            "SELECT {COMPANY_COLUMNS} FROM placement_portal.companies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(company_from_row).transpose()
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        let rows = sqlx::query(&format!(
            "SELECT {COMPANY_COLUMNS} FROM placement_portal.companies ORDER BY interview_date, name"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(company_from_row).collect()
    }

    async fn delete_company(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM placement_portal.companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn upsert_decision(&self, decision: &Decision) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO placement_portal.decisions (company_id, student_id, status, updated_at)
            SELECT $1, $2, $3, $4
            WHERE EXISTS (SELECT 1 FROM placement_portal.companies WHERE id = $1)
            ON CONFLICT (company_id, student_id) DO UPDATE
            SET status = EXCLUDED.status, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&decision.company_id)
        .bind(&decision.student_id)
        .bind(decision.status.as_str())
        .bind(decision.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_decision(&self, key: &DecisionKey) -> Result<Option<Decision>> {
        let row = sqlx::query(&format!(
            "SELECT {DECISION_COLUMNS} FROM placement_portal.decisions \
             WHERE company_id = $1 AND student_id = $2"
        ))
        .bind(&key.company_id)
        .bind(&key.student_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(decision_from_row).transpose()
    }

    async fn list_decisions(&self) -> Result<Vec<Decision>> {
        let rows = sqlx::query(&format!(
            "SELECT {DECISION_COLUMNS} FROM placement_portal.decisions"
        ))
        .fetch_all(&self.pool)
        .await?;

        decisions_from_rows(&rows)
    }

    async fn decisions_for_company(&self, company_id: &str) -> Result<Vec<Decision>> {
        let rows = sqlx::query(&format!(
            "SELECT {DECISION_COLUMNS} FROM placement_portal.decisions WHERE company_id = $1"
        ))
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        decisions_from_rows(&rows)
    }

    async fn decisions_for_student(&self, student_id: &str) -> Result<Vec<Decision>> {
        let rows = sqlx::query(&format!(
            "SELECT {DECISION_COLUMNS} FROM placement_portal.decisions WHERE student_id = $1"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        decisions_from_rows(&rows)
    }

    async fn delete_decisions_for_company(&self, company_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM placement_portal.decisions WHERE company_id = $1")
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
