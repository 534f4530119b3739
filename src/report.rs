use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{Candidate, CompanyOverview, DecisionStatus, StatusSummary};

pub fn summarize_by_status<'a, I>(candidates: I) -> Vec<StatusSummary>
where
    I: IntoIterator<Item = &'a Candidate>,
{
    let mut counts = [0usize; 3];
    for candidate in candidates {
        let slot = DecisionStatus::ALL
            .iter()
            .position(|status| *status == candidate.status)
            .unwrap_or(0);
        counts[slot] += 1;
    }

    let mut summaries: Vec<StatusSummary> = DecisionStatus::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(status, count)| StatusSummary {
            status: *status,
            count,
        })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

pub fn build_report(scope: Option<&str>, generated_on: NaiveDate, overview: &[CompanyOverview]) -> String {
    let summaries = summarize_by_status(overview.iter().flat_map(|entry| entry.candidates.iter()));

    let mut output = String::new();
    let scope_label = scope.unwrap_or("all companies");

    let _ = writeln!(output, "# Placement Eligibility Report");
    let _ = writeln!(output, "Generated for {} on {}", scope_label, generated_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Decision Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No eligible candidates yet.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(output, "- {}: {} candidates", summary.status, summary.count);
        }
    }

    if overview.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "No companies registered.");
        return output;
    }

    for entry in overview {
        let company = &entry.company;
        let _ = writeln!(output);
        let _ = writeln!(output, "## {} ({})", company.name, company.id);
        let _ = writeln!(
            output,
            "Interview {} in {}, package {}; minimum CGPA {:.2}; branches: {}",
            company.interview_date,
            display_or_dash(&company.location),
            display_or_dash(&company.package),
            company.cgpa_requirement,
            if company.eligible_branches.is_empty() {
                "none".to_string()
            } else {
                company.eligible_branches.join(", ")
            }
        );

        if entry.candidates.is_empty() {
            let _ = writeln!(output, "No students meet the criteria.");
            continue;
        }

        let mut candidates: Vec<&Candidate> = entry.candidates.iter().collect();
        candidates.sort_by(|a, b| {
            b.student
                .cgpa
                .partial_cmp(&a.student.cgpa)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for candidate in candidates {
            let _ = writeln!(
                output,
                "- {} ({}, {}) CGPA {:.2}, semester {}: {}",
                candidate.student.name,
                candidate.student.email,
                candidate.student.branch,
                candidate.student.cgpa,
                candidate.student.semester,
                candidate.status
            );
        }
    }

    output
}

fn display_or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
