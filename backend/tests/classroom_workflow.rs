use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use growth_tracker_backend::backend::domain::metrics::parse_iso_date;
use growth_tracker_backend::backend::domain::models::{Assessment, GrowthStatus, OverallStatus};
use growth_tracker_backend::backend::domain::{
    AssessmentError, AssessmentProvider, AssessmentRequest, EventDetails, NewStudent,
};
use growth_tracker_backend::backend::initialize_with;
use growth_tracker_backend::backend::storage::{ClassroomRepository, YamlConnection};
use shared::{Gender, ReportStatus};

/// Flags children of 70 months or more with a BMI above 18 and counts calls
struct ThresholdProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl AssessmentProvider for ThresholdProvider {
    fn name(&self) -> &str {
        "threshold"
    }

    async fn assess(&self, request: &AssessmentRequest) -> Result<Assessment, AssessmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;

        let heavy = request.bmi.map(|bmi| bmi > 18.0).unwrap_or(false);
        Ok(Assessment {
            height_status: GrowthStatus::Normal,
            weight_status: if heavy { GrowthStatus::Overweight } else { GrowthStatus::Normal },
            bmi_status: match request.bmi {
                Some(_) if heavy => GrowthStatus::Overweight,
                Some(_) => GrowthStatus::Normal,
                None => GrowthStatus::NotApplicable,
            },
            summary: format!("Assessed at {} months.", request.age_in_months),
            advice: Vec::new(),
            overall_status: if heavy { OverallStatus::NeedsAttention } else { OverallStatus::Normal },
        })
    }
}

fn date(s: &str) -> NaiveDate {
    parse_iso_date(s).unwrap()
}

fn student(name: &str, dob: &str, gender: Gender) -> NewStudent {
    NewStudent {
        name: name.to_string(),
        dob: date(dob),
        gender,
        photo: None,
        parent_phone: Some("0903 111 222".to_string()),
        health_notes: None,
    }
}

#[tokio::test]
async fn test_school_year_end_to_end() {
    let temp_dir = tempfile::tempdir().unwrap();
    let connection = YamlConnection::new(temp_dir.path()).unwrap();
    let provider = Arc::new(ThresholdProvider { calls: AtomicUsize::new(0) });

    let state = initialize_with(
        Arc::new(ClassroomRepository::new(connection.clone())),
        provider.clone(),
    )
    .await;
    let classroom = &state.classroom_service;

    let info = classroom
        .setup_class("Sunflower", ["Nguyen Thi Mai".to_string(), "Tran Minh Anh".to_string()])
        .await
        .unwrap();
    assert_eq!(info.menu.len(), 5);
    assert!(info.menu.iter().all(|slot| slot.meals.is_empty()));

    classroom
        .add_schedule_event(EventDetails {
            date: date("2024-05-20"),
            title: "Height and weight check".to_string(),
            description: "Whole class".to_string(),
        })
        .await
        .unwrap();

    let lan = classroom.add_student(student("Lan", "2022-01-15", Gender::Female)).await.unwrap();
    let khoa = classroom.add_student(student("Khoa", "2018-01-20", Gender::Male)).await.unwrap();
    let hoa = classroom.add_student(student("Hoa", "2021-09-09", Gender::Female)).await.unwrap();

    let lan_march = classroom.add_measurement(&lan.id, 95.0, 14.0, date("2024-03-15")).await.unwrap();
    assert_eq!(lan_march.bmi, None);
    classroom.add_measurement(&lan.id, 93.0, 13.5, date("2024-01-01")).await.unwrap();

    let khoa_young = classroom.add_measurement(&khoa.id, 115.0, 20.0, date("2023-10-05")).await.unwrap();
    let khoa_latest = classroom.add_measurement(&khoa.id, 116.0, 26.0, date("2023-11-05")).await.unwrap();
    assert_eq!(khoa_young.bmi, None);
    assert_eq!(khoa_latest.bmi, Some(19.32));

    // Two viewers open Lan's measurement at the same time
    let assessments = &state.assessment_service;
    let (first, second) = tokio::join!(
        assessments.ensure_assessment(&lan.id, &lan_march.id),
        assessments.ensure_assessment(&lan.id, &lan_march.id),
    );
    assert_eq!(first.unwrap(), second.unwrap());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    let report = assessments.class_report(date("2024-06-01")).await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    assert_eq!(report.class_name.as_deref(), Some("Sunflower"));
    let rows: Vec<_> = report.rows.iter().map(|r| (r.name.as_str(), r.status)).collect();
    assert_eq!(
        rows,
        vec![
            ("Lan", ReportStatus::Normal),
            ("Khoa", ReportStatus::NeedsAttention),
            ("Hoa", ReportStatus::NoData),
        ]
    );
    assert_eq!(report.rows[0].last_measured.as_deref(), Some("15/03/2024"));
    assert_eq!(report.rows[1].age_in_months, 70);
    assert!(report.rows[1].needs_attention);
    assert_eq!(report.rows[2].student_id, hoa.id);

    // Everything survives a restart
    let restarted = initialize_with(
        Arc::new(ClassroomRepository::new(connection)),
        provider.clone(),
    )
    .await;
    let reloaded = restarted.classroom_service.snapshot().await;
    assert_eq!(reloaded, classroom.snapshot().await);

    let khoa_reloaded = restarted.classroom_service.get_student(&khoa.id).await.unwrap();
    let latest = khoa_reloaded.latest_measurement().unwrap();
    assert_eq!(latest.id, khoa_latest.id);
    assert_eq!(
        latest.assessment.as_ref().unwrap().overall_status,
        OverallStatus::NeedsAttention
    );

    // Already assessed measurements never go back to the provider
    restarted.assessment_service.assess_class().await;
    assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_corrupted_data_starts_fresh() {
    let temp_dir = tempfile::tempdir().unwrap();
    let connection = YamlConnection::new(temp_dir.path()).unwrap();
    std::fs::write(connection.class_info_path(), "class_name: [oops").unwrap();

    let state = initialize_with(
        Arc::new(ClassroomRepository::new(connection)),
        Arc::new(ThresholdProvider { calls: AtomicUsize::new(0) }),
    )
    .await;

    assert!(!state.classroom_service.is_configured().await);
    assert!(state.classroom_service.list_students().await.is_empty());
}
