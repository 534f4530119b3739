use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{PortalError, Result};
use crate::models::{Company, CompanyForm, DecisionStatus, Student, StudentForm, StudentPatch};

pub const CGPA_MIN: f64 = 0.0;
pub const CGPA_MAX: f64 = 10.0;
pub const SEMESTER_MIN: i32 = 1;
pub const SEMESTER_MAX: i32 = 8;

pub fn parse_cgpa(raw: &str) -> Result<f64> {
    parse_grade("cgpa", raw)
}

pub fn parse_cgpa_requirement(raw: &str) -> Result<f64> {
    parse_grade("cgpa_requirement", raw)
}

fn parse_grade(field: &'static str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| PortalError::validation(field, format!("{field} must be a number")))?;

    if !value.is_finite() || !(CGPA_MIN..=CGPA_MAX).contains(&value) {
        return Err(PortalError::validation(field, format!("{field} out of range")));
    }

    Ok(value)
}

pub fn parse_semester(raw: &str) -> Result<i32> {
    // Spreadsheet exports write whole numbers as "6.0".
    let value: f64 = raw
        .trim()
        .parse()
        .ok()
        .filter(|value: &f64| value.is_finite() && value.fract() == 0.0)
        .ok_or_else(|| PortalError::validation("semester", "semester must be a whole number"))?;

    if value < f64::from(SEMESTER_MIN) || value > f64::from(SEMESTER_MAX) {
        return Err(PortalError::validation("semester", "semester out of range"));
    }

    Ok(value as i32)
}

/// Keeps the value as given; branch names are matched byte for byte.
pub fn require(field: &'static str, value: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(PortalError::validation(field, format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub fn parse_status(raw: &str) -> Result<DecisionStatus> {
    raw.parse()
}

pub fn parse_interview_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        PortalError::validation("interview_date", "interview_date must be YYYY-MM-DD")
    })
}

pub fn normalize_branches(branches: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(branches.len());
    for branch in branches {
        if branch.trim().is_empty() || unique.contains(branch) {
            continue;
        }
        unique.push(branch.clone());
    }
    unique
}

pub fn student_from_form(id: &str, form: &StudentForm, now: DateTime<Utc>) -> Result<Student> {
    Ok(Student {
        id: id.to_string(),
        name: require("name", &form.name)?,
        email: require("email", &form.email)?,
        cgpa: parse_cgpa(&form.cgpa)?,
        semester: parse_semester(&form.semester)?,
        branch: require("branch", &form.branch)?,
        university_id: require("university_id", &form.university_id)?,
        college_id: require("college_id", &form.college_id)?,
        created_at: now,
        updated_at: now,
    })
}

pub fn merge_student(existing: Student, patch: &StudentPatch, now: DateTime<Utc>) -> Result<Student> {
    let mut student = existing;

    if let Some(name) = &patch.name {
        student.name = require("name", name)?;
    }
    if let Some(email) = &patch.email {
        student.email = require("email", email)?;
    }
    if let Some(cgpa) = &patch.cgpa {
        student.cgpa = parse_cgpa(cgpa)?;
    }
    if let Some(semester) = &patch.semester {
        student.semester = parse_semester(semester)?;
    }
    if let Some(branch) = &patch.branch {
        student.branch = require("branch", branch)?;
    }
    if let Some(university_id) = &patch.university_id {
        student.university_id = require("university_id", university_id)?;
    }
    if let Some(college_id) = &patch.college_id {
        student.college_id = require("college_id", college_id)?;
    }

    student.updated_at = now;
    Ok(student)
}

pub fn company_from_form(form: &CompanyForm) -> Result<Company> {
    let id = match &form.id {
        Some(id) => require("id", id)?,
        None => uuid::Uuid::new_v4().to_string(),
    };

    Ok(Company {
        id,
        name: require("name", &form.name)?,
        location: form.location.clone(),
        package: form.package.clone(),
        cgpa_requirement: parse_cgpa_requirement(&form.cgpa_requirement)?,
        interview_date: parse_interview_date(&form.interview_date)?,
        eligible_branches: normalize_branches(&form.eligible_branches),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> StudentForm {
        StudentForm {
            name: "Ria Kapoor".to_string(),
            email: "ria.kapoor@college.edu".to_string(),
            cgpa: "8.2".to_string(),
            semester: "6".to_string(),
            branch: "Computer Science".to_string(),
            university_id: "U-2291".to_string(),
            college_id: "C-17".to_string(),
        }
    }

    fn field_of(err: PortalError) -> &'static str {
        match err {
            PortalError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn cgpa_bounds_are_inclusive() {
        assert_eq!(parse_cgpa("10").unwrap(), 10.0);
        assert_eq!(parse_cgpa("0").unwrap(), 0.0);
        assert_eq!(parse_cgpa(" 7.25 ").unwrap(), 7.25);
    }

    #[test]
    fn cgpa_outside_range_is_rejected() {
        let err = parse_cgpa("10.5").unwrap_err();
        assert_eq!(err.to_string(), "cgpa out of range");
        assert!(parse_cgpa("-0.01").is_err());
    }

    #[test]
    fn cgpa_must_be_a_finite_number() {
        assert!(parse_cgpa("NaN").is_err());
        assert!(parse_cgpa("inf").is_err());
        assert!(parse_cgpa("").is_err());
        assert!(parse_cgpa("eight").is_err());
    }

    #[test]
    fn semester_must_be_whole_and_in_range() {
        assert_eq!(parse_semester("1").unwrap(), 1);
        assert_eq!(parse_semester("8").unwrap(), 8);
        assert!(parse_semester("0").is_err());
        assert!(parse_semester("9").is_err());
        assert_eq!(parse_semester(" 6.0 ").unwrap(), 6);
        assert!(parse_semester("6.5").is_err());
        assert!(parse_semester("8.0001").is_err());
        assert!(parse_semester("NaN").is_err());
        assert!(parse_semester("six").is_err());
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        assert_eq!(field_of(require("branch", "   ").unwrap_err()), "branch");
        assert_eq!(require("branch", " Civil ").unwrap(), " Civil ");
    }

    #[test]
    fn form_converts_into_student() {
        let now = Utc::now();
        let student = student_from_form("ria.kapoor@college.edu", &form(), now).unwrap();
        assert_eq!(student.cgpa, 8.2);
        assert_eq!(student.semester, 6);
        assert_eq!(student.created_at, now);
    }

    #[test]
    fn form_reports_the_failing_field() {
        let mut bad = form();
        bad.semester = "12".to_string();
        let err = student_from_form("ria.kapoor@college.edu", &bad, Utc::now()).unwrap_err();
        assert_eq!(field_of(err), "semester");
    }

    #[test]
    fn merge_only_touches_present_fields() {
        let created = Utc::now() - chrono::Duration::days(3);
        let student = student_from_form("ria.kapoor@college.edu", &form(), created).unwrap();
        let patch = StudentPatch {
            cgpa: Some("9.1".to_string()),
            ..StudentPatch::default()
        };

        let now = Utc::now();
        let merged = merge_student(student.clone(), &patch, now).unwrap();
        assert_eq!(merged.cgpa, 9.1);
        assert_eq!(merged.name, student.name);
        assert_eq!(merged.created_at, created);
        assert_eq!(merged.updated_at, now);
    }

    #[test]
    fn merge_validates_patched_fields() {
        let student = student_from_form("ria.kapoor@college.edu", &form(), Utc::now()).unwrap();
        let patch = StudentPatch {
            cgpa: Some("11".to_string()),
            ..StudentPatch::default()
        };
        assert!(merge_student(student, &patch, Utc::now()).is_err());
    }

    #[test]
    fn branches_behave_as_a_set() {
        let branches = vec![
            "Computer Science".to_string(),
            "".to_string(),
            "Civil Engineering".to_string(),
            "Computer Science".to_string(),
            "computer science".to_string(),
        ];
        assert_eq!(
            normalize_branches(&branches),
            vec!["Computer Science", "Civil Engineering", "computer science"]
        );
    }

    #[test]
    fn company_without_id_gets_one_generated() {
        let form = CompanyForm {
            name: "Acme Systems".to_string(),
            cgpa_requirement: "8".to_string(),
            interview_date: "2026-11-20".to_string(),
            eligible_branches: vec!["Computer Science".to_string()],
            ..CompanyForm::default()
        };
        let company = company_from_form(&form).unwrap();
        assert!(!company.id.is_empty());
        assert_eq!(company.interview_date, NaiveDate::from_ymd_opt(2026, 11, 20).unwrap());
    }

    #[test]
    fn company_requirement_is_range_checked() {
        let form = CompanyForm {
            id: Some("acme".to_string()),
            name: "Acme Systems".to_string(),
            cgpa_requirement: "10.1".to_string(),
            interview_date: "2026-11-20".to_string(),
            ..CompanyForm::default()
        };
        assert_eq!(field_of(company_from_form(&form).unwrap_err()), "cgpa_requirement");
    }

    #[test]
    fn status_literals_are_enforced() {
        assert_eq!(parse_status("rejected").unwrap(), DecisionStatus::Rejected);
        assert!(matches!(parse_status("approved"), Err(PortalError::InvalidStatus(_))));
    }
}
