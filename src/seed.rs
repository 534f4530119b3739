use tracing::info;

use crate::error::Result;
use crate::models::{CompanyForm, StudentForm};
use crate::service::PortalService;

pub async fn seed(service: &PortalService) -> Result<()> {
    let students = vec![
        ("rahul.sharma@college.edu", "Rahul Sharma", "8.5", "6", "Computer Science", "U-1001"),
        ("priya.singh@college.edu", "Priya Singh", "9.2", "7", "Information Technology", "U-1002"),
        ("amit.kumar@college.edu", "Amit Kumar", "7.4", "6", "Electrical Engineering", "U-1003"),
        ("neha.gupta@college.edu", "Neha Gupta", "8.9", "8", "Electronics & Communication", "U-1004"),
    ];

    for (email, name, cgpa, semester, branch, university_id) in students {
        let form = StudentForm {
            name: name.to_string(),
            email: email.to_string(),
            cgpa: cgpa.to_string(),
            semester: semester.to_string(),
            branch: branch.to_string(),
            university_id: university_id.to_string(),
            college_id: "GEC-01".to_string(),
        };
        service.records().save_student(Some(email), &form).await?;
    }

    let companies = vec![
        (
            "techcorp",
            "TechCorp Solutions",
            "8.0",
            "2026-11-15",
            "Bengaluru",
            "12 LPA",
            vec!["Computer Science", "Information Technology"],
        ),
        (
            "powergrid",
            "PowerGrid Systems",
            "7.0",
            "2026-11-22",
            "Pune",
            "8 LPA",
            vec!["Electrical Engineering", "Electronics & Communication"],
        ),
        (
            "dataflow",
            "DataFlow Analytics",
            "8.5",
            "2026-12-03",
            "Hyderabad",
            "15 LPA",
            vec!["Computer Science", "Electronics & Communication"],
        ),
    ];

    for (id, name, requirement, date, location, package, branches) in companies {
        let form = CompanyForm {
            id: Some(id.to_string()),
            name: name.to_string(),
            location: location.to_string(),
            package: package.to_string(),
            cgpa_requirement: requirement.to_string(),
            interview_date: date.to_string(),
            eligible_branches: branches.into_iter().map(str::to_string).collect(),
        };
        service.records().save_company(&form).await?;
    }

    let decisions = [
        ("techcorp", "rahul.sharma@college.edu", "eligible"),
        ("techcorp", "priya.singh@college.edu", "eligible"),
        ("powergrid", "amit.kumar@college.edu", "rejected"),
        ("dataflow", "neha.gupta@college.edu", "eligible"),
    ];

    for (company_id, student_id, status) in decisions {
        service.ledger().set_status(company_id, student_id, status).await?;
    }

    info!("seed data loaded");
    Ok(())
}
