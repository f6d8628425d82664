//! Printable class report: one row per student in enrollment order.

use chrono::NaiveDate;

use super::classroom::Classroom;
use super::metrics::{format_display_date, format_iso_date};
use super::models::{OverallStatus, Student};
use shared::{ClassReportResponse, ClassReportRow, ReportStatus};

fn report_status(student: &Student) -> ReportStatus {
    match student.latest_measurement() {
        None => ReportStatus::NoData,
        Some(latest) => match &latest.assessment {
            None => ReportStatus::Pending,
            Some(assessment) => match assessment.overall_status {
                OverallStatus::Normal => ReportStatus::Normal,
                OverallStatus::NeedsAttention => ReportStatus::NeedsAttention,
            },
        },
    }
}

fn report_row(index: usize, student: &Student, today: NaiveDate) -> ClassReportRow {
    let latest = student.latest_measurement();
    let status = report_status(student);

    ClassReportRow {
        index,
        student_id: student.id.clone(),
        name: student.name.clone(),
        dob_display: format_display_date(student.dob),
        age_in_months: student.current_age_in_months(today),
        last_measured: latest.map(|m| format_display_date(m.date)),
        height: latest.map(|m| m.height_cm),
        weight: latest.map(|m| m.weight_kg),
        bmi: latest.and_then(|m| m.bmi),
        status,
        needs_attention: status == ReportStatus::NeedsAttention,
    }
}

pub fn build_class_report(classroom: &Classroom, today: NaiveDate) -> ClassReportResponse {
    let rows = classroom
        .students()
        .iter()
        .enumerate()
        .map(|(i, student)| report_row(i + 1, student, today))
        .collect();

    ClassReportResponse {
        class_name: classroom.class_info().map(|info| info.class_name.clone()),
        generated_on: format_iso_date(today),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::classroom::NewStudent;
    use crate::backend::domain::metrics::parse_iso_date;
    use crate::backend::domain::models::{Assessment, GrowthStatus};
    use shared::Gender;

    fn date(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    fn enroll(classroom: &mut Classroom, name: &str, dob: &str) -> Student {
        classroom
            .add_student(NewStudent {
                name: name.to_string(),
                dob: date(dob),
                gender: Gender::Male,
                photo: None,
                parent_phone: None,
                health_notes: None,
            })
            .unwrap()
    }

    #[test]
    fn test_report_rows() {
        let mut classroom = Classroom::new();
        classroom
            .setup_class("Leaf 1", ["Mai".to_string(), "Anh".to_string()])
            .unwrap();

        let no_data = enroll(&mut classroom, "An", "2021-04-10");
        let pending = enroll(&mut classroom, "Binh", "2018-01-20");
        let flagged = enroll(&mut classroom, "Chi", "2020-09-01");

        classroom
            .add_measurement(&pending.id, 116.0, 20.5, date("2023-11-05"))
            .unwrap();
        let m = classroom
            .add_measurement(&flagged.id, 100.0, 20.0, date("2024-02-01"))
            .unwrap();
        classroom.update_assessment(
            &flagged.id,
            &m.id,
            Assessment {
                height_status: GrowthStatus::Normal,
                weight_status: GrowthStatus::Obese,
                bmi_status: GrowthStatus::NotApplicable,
                summary: "Weight is high for height.".to_string(),
                advice: Vec::new(),
                overall_status: OverallStatus::NeedsAttention,
            },
        );

        let report = build_class_report(&classroom, date("2024-06-01"));
        assert_eq!(report.class_name.as_deref(), Some("Leaf 1"));
        assert_eq!(report.generated_on, "2024-06-01");
        assert_eq!(report.rows.len(), 3);

        let first = &report.rows[0];
        assert_eq!((first.index, first.name.as_str()), (1, "An"));
        assert_eq!(first.student_id, no_data.id);
        assert_eq!(first.status, ReportStatus::NoData);
        assert_eq!(first.age_in_months, 38);
        assert_eq!(first.dob_display, "10/04/2021");
        assert!(first.last_measured.is_none());

        let second = &report.rows[1];
        assert_eq!(second.status, ReportStatus::Pending);
        assert_eq!(second.age_in_months, 70);
        assert_eq!(second.last_measured.as_deref(), Some("05/11/2023"));
        assert!(second.bmi.is_some());
        assert!(!second.needs_attention);

        let third = &report.rows[2];
        assert_eq!(third.status, ReportStatus::NeedsAttention);
        assert!(third.needs_attention);
        assert_eq!(third.height, Some(100.0));
        assert_eq!(third.bmi, None);
    }

    #[test]
    fn test_report_without_class() {
        let report = build_class_report(&Classroom::new(), date("2024-06-01"));
        assert!(report.class_name.is_none());
        assert!(report.rows.is_empty());
    }
}
