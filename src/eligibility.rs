use crate::models::{Company, Student};

pub fn is_eligible(student: &Student, company: &Company) -> bool {
    student.cgpa >= company.cgpa_requirement
        && company
            .eligible_branches
            .iter()
            .any(|branch| branch == &student.branch)
}

pub fn filter_eligible_students<'a>(students: &'a [Student], company: &Company) -> Vec<&'a Student> {
    students
        .iter()
        .filter(|student| is_eligible(student, company))
        .collect()
}

pub fn filter_eligible_companies<'a>(student: &Student, companies: &'a [Company]) -> Vec<&'a Company> {
    companies
        .iter()
        .filter(|company| is_eligible(student, company))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn student(id: &str, cgpa: f64, branch: &str) -> Student {
        Student {
            id: id.to_string(),
            name: id.to_string(),
            email: format!("{id}@college.edu"),
            cgpa,
            semester: 6,
            branch: branch.to_string(),
            university_id: "U-1".to_string(),
            college_id: "C-1".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn company(id: &str, requirement: f64, branches: &[&str]) -> Company {
        Company {
            id: id.to_string(),
            name: id.to_string(),
            location: "Pune".to_string(),
            package: "12 LPA".to_string(),
            cgpa_requirement: requirement,
            interview_date: NaiveDate::from_ymd_opt(2026, 11, 20).unwrap(),
            eligible_branches: branches.iter().map(|b| b.to_string()).collect(),
        }
    }

    #[test]
    fn qualifying_student_is_eligible() {
        let s = student("ria", 8.2, "Computer Science");
        let c = company("acme", 8.0, &["Computer Science"]);
        assert!(is_eligible(&s, &c));
    }

    #[test]
    fn threshold_is_inclusive() {
        let s = student("ria", 8.0, "Computer Science");
        let c = company("acme", 8.0, &["Computer Science"]);
        assert!(is_eligible(&s, &c));
    }

    #[test]
    fn low_cgpa_or_missing_branch_disqualifies() {
        let c = company("acme", 8.0, &["Computer Science"]);
        assert!(!is_eligible(&student("dev", 7.99, "Computer Science"), &c));
        assert!(!is_eligible(&student("ana", 9.5, "Civil Engineering"), &c));
    }

    #[test]
    fn branch_match_is_exact() {
        let c = company("acme", 6.0, &["Computer Science"]);
        assert!(!is_eligible(&student("ria", 9.0, "computer science"), &c));
        assert!(!is_eligible(&student("ria", 9.0, "Computer Science "), &c));
    }

    #[test]
    fn eligibility_follows_current_field_values() {
        let mut s = student("ria", 8.2, "Computer Science");
        let c = company("acme", 8.0, &["Computer Science"]);
        assert!(is_eligible(&s, &c));
        s.cgpa = 7.5;
        assert!(!is_eligible(&s, &c));
    }

    #[test]
    fn filters_preserve_input_order() {
        let students = vec![
            student("zoe", 9.0, "Computer Science"),
            student("dev", 6.0, "Computer Science"),
            student("amy", 8.5, "Electrical Engineering"),
        ];
        let c = company("acme", 8.0, &["Electrical Engineering", "Computer Science"]);
        let ids: Vec<&str> = filter_eligible_students(&students, &c)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["zoe", "amy"]);

        let companies = vec![
            company("umbra", 9.5, &["Computer Science"]),
            company("acme", 8.0, &["Computer Science"]),
            company("basil", 7.0, &["Computer Science", "Civil Engineering"]),
        ];
        let ids: Vec<&str> = filter_eligible_companies(&students[0], &companies)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["acme", "basil"]);
    }
}
