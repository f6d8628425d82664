//! Assessment workflow.
//!
//! Moves a measurement from unassessed to assessed by asking the external
//! provider. Concurrent triggers for the same measurement share one outbound
//! request through an in-flight table keyed by measurement id. The request
//! runs on its own task, so a caller that goes away does not cancel it and a
//! late result still attaches under the first-wins policy.

use chrono::NaiveDate;
use futures::future::{join_all, BoxFuture, FutureExt, Shared};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::assessment_provider::{AssessmentError, AssessmentProvider, AssessmentRequest};
use super::class_report::build_class_report;
use super::classroom_service::ClassroomService;
use super::models::{Assessment, AttachOutcome};
use shared::ClassReportResponse;

type AssessmentResult = Result<Assessment, AssessmentError>;
type PendingAssessment = Shared<BoxFuture<'static, AssessmentResult>>;

struct InFlight {
    ticket: u64,
    request: PendingAssessment,
}

type InFlightTable = Arc<Mutex<HashMap<String, InFlight>>>;

/// Outcome of one student in a class-wide pass
#[derive(Debug, Clone, PartialEq)]
pub struct StudentAssessmentOutcome {
    pub student_id: String,
    pub measurement_id: String,
    pub result: AssessmentResult,
}

#[derive(Clone)]
pub struct AssessmentService {
    classroom_service: ClassroomService,
    provider: Arc<dyn AssessmentProvider>,
    in_flight: InFlightTable,
    next_ticket: Arc<AtomicU64>,
}

impl AssessmentService {
    pub fn new(classroom_service: ClassroomService, provider: Arc<dyn AssessmentProvider>) -> Self {
        Self {
            classroom_service,
            provider,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            next_ticket: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Number of measurements with an outstanding provider request
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.lock().map(|table| table.len()).unwrap_or(0)
    }

    /// Return the measurement's assessment, requesting one if it has none yet.
    pub async fn ensure_assessment(&self, student_id: &str, measurement_id: &str) -> AssessmentResult {
        let student = self
            .classroom_service
            .get_student(student_id)
            .await
            .ok_or_else(|| AssessmentError::StudentNotFound(student_id.to_string()))?;
        let measurement = student
            .measurement(measurement_id)
            .ok_or_else(|| AssessmentError::MeasurementNotFound(measurement_id.to_string()))?;

        if let Some(existing) = &measurement.assessment {
            debug!("Measurement {} already assessed", measurement_id);
            return Ok(existing.clone());
        }

        let request = AssessmentRequest::for_measurement(&student, measurement);
        let pending = self.join_or_start(student_id, measurement_id, request)?;
        pending.await
    }

    /// Join the outstanding request for this measurement or start a new one
    fn join_or_start(
        &self,
        student_id: &str,
        measurement_id: &str,
        request: AssessmentRequest,
    ) -> Result<PendingAssessment, AssessmentError> {
        let mut table = self
            .in_flight
            .lock()
            .map_err(|_| AssessmentError::Interrupted("in-flight table poisoned".to_string()))?;

        if let Some(existing) = table.get(measurement_id) {
            debug!("Joining in-flight assessment for measurement {}", measurement_id);
            return Ok(existing.request.clone());
        }

        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        info!(
            "Requesting assessment for measurement {} from {}",
            measurement_id,
            self.provider.name()
        );

        // The task removes its own entry, which needs this lock, so it cannot
        // finish before the entry below is inserted.
        let task = tokio::spawn(run_assessment(
            self.classroom_service.clone(),
            self.provider.clone(),
            self.in_flight.clone(),
            ticket,
            student_id.to_string(),
            measurement_id.to_string(),
            request,
        ));
        let pending = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(AssessmentError::Interrupted(e.to_string())),
            }
        }
        .boxed()
        .shared();

        table.insert(
            measurement_id.to_string(),
            InFlight {
                ticket,
                request: pending.clone(),
            },
        );
        Ok(pending)
    }

    /// Assess every student's latest measurement that has no assessment yet.
    /// Failures are reported per student and never abort the pass.
    pub async fn assess_class(&self) -> Vec<StudentAssessmentOutcome> {
        let targets: Vec<(String, String)> = self
            .classroom_service
            .list_students()
            .await
            .into_iter()
            .filter_map(|student| {
                let latest = student.latest_measurement()?;
                if latest.is_assessed() {
                    return None;
                }
                Some((student.id.clone(), latest.id.clone()))
            })
            .collect();

        if targets.is_empty() {
            debug!("Class-wide assessment pass: nothing to assess");
            return Vec::new();
        }
        info!("Class-wide assessment pass for {} students", targets.len());

        let outcomes = join_all(targets.into_iter().map(|(student_id, measurement_id)| async move {
            let result = self.ensure_assessment(&student_id, &measurement_id).await;
            StudentAssessmentOutcome {
                student_id,
                measurement_id,
                result,
            }
        }))
        .await;

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        if failed > 0 {
            warn!("Class-wide assessment pass finished with {} failures", failed);
        }
        outcomes
    }

    /// Run the class-wide pass, then build the report from the resulting state
    pub async fn class_report(&self, today: NaiveDate) -> ClassReportResponse {
        self.assess_class().await;
        let classroom = self.classroom_service.snapshot().await;
        build_class_report(&classroom, today)
    }
}

async fn run_assessment(
    classroom_service: ClassroomService,
    provider: Arc<dyn AssessmentProvider>,
    in_flight: InFlightTable,
    ticket: u64,
    student_id: String,
    measurement_id: String,
    request: AssessmentRequest,
) -> AssessmentResult {
    // A previous request may have attached and left the table after the
    // caller read its snapshot; its entry is only removed once attached.
    let result = match stored_assessment(&classroom_service, &student_id, &measurement_id).await {
        Some(existing) => {
            debug!("Measurement {} was assessed before the request started", measurement_id);
            Ok(existing)
        }
        None => match provider.assess(&request).await {
            Ok(assessment) => attach(&classroom_service, &student_id, &measurement_id, assessment).await,
            Err(e) => {
                warn!("Assessment for measurement {} failed: {}", measurement_id, e);
                Err(e)
            }
        },
    };

    if let Ok(mut table) = in_flight.lock() {
        if table.get(&measurement_id).map(|entry| entry.ticket) == Some(ticket) {
            table.remove(&measurement_id);
        }
    }
    result
}

async fn stored_assessment(
    classroom_service: &ClassroomService,
    student_id: &str,
    measurement_id: &str,
) -> Option<Assessment> {
    classroom_service
        .get_student(student_id)
        .await
        .and_then(|s| s.measurement(measurement_id).and_then(|m| m.assessment.clone()))
}

/// Attach a fresh assessment and return whichever one the measurement ends up carrying
async fn attach(
    classroom_service: &ClassroomService,
    student_id: &str,
    measurement_id: &str,
    assessment: Assessment,
) -> AssessmentResult {
    let outcome = classroom_service
        .update_assessment(student_id, measurement_id, assessment.clone())
        .await
        .map_err(|e| {
            warn!("Failed to store assessment for measurement {}: {}", measurement_id, e);
            AssessmentError::Storage(e.to_string())
        })?;

    match outcome {
        AttachOutcome::Attached => Ok(assessment),
        AttachOutcome::AlreadyAssessed => stored_assessment(classroom_service, student_id, measurement_id)
            .await
            .ok_or_else(|| AssessmentError::MeasurementNotFound(measurement_id.to_string())),
        AttachOutcome::NotFound => Err(AssessmentError::MeasurementNotFound(measurement_id.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::classroom::NewStudent;
    use crate::backend::domain::metrics::parse_iso_date;
    use crate::backend::domain::models::{GrowthStatus, OverallStatus};
    use crate::backend::storage::yaml::test_utils::TestEnvironment;
    use async_trait::async_trait;
    use shared::{Gender, ReportStatus};
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// Provider that answers from a script after a short delay and counts calls
    struct ScriptedProvider {
        calls: AtomicUsize,
        delay: Duration,
        script: Mutex<VecDeque<AssessmentResult>>,
    }

    impl ScriptedProvider {
        fn new(script: Vec<AssessmentResult>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay: Duration::from_millis(50),
                script: Mutex::new(script.into()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AssessmentProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn assess(&self, _request: &AssessmentRequest) -> AssessmentResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(normal("default")))
        }
    }

    fn normal(summary: &str) -> Assessment {
        Assessment {
            height_status: GrowthStatus::Normal,
            weight_status: GrowthStatus::Normal,
            bmi_status: GrowthStatus::NotApplicable,
            summary: summary.to_string(),
            advice: Vec::new(),
            overall_status: OverallStatus::Normal,
        }
    }

    fn date(s: &str) -> NaiveDate {
        parse_iso_date(s).unwrap()
    }

    async fn setup_test(
        env: &TestEnvironment,
        script: Vec<AssessmentResult>,
    ) -> (AssessmentService, ClassroomService, Arc<ScriptedProvider>) {
        let classroom_service = ClassroomService::load(env.shared_repository()).await;
        classroom_service
            .setup_class("Leaf 1", ["Mai".to_string(), "Anh".to_string()])
            .await
            .unwrap();
        let provider = Arc::new(ScriptedProvider::new(script));
        let service = AssessmentService::new(classroom_service.clone(), provider.clone());
        (service, classroom_service, provider)
    }

    async fn enroll_measured(classroom_service: &ClassroomService, name: &str) -> (String, String) {
        let student = classroom_service
            .add_student(NewStudent {
                name: name.to_string(),
                dob: date("2021-05-05"),
                gender: Gender::Female,
                photo: None,
                parent_phone: None,
                health_notes: None,
            })
            .await
            .unwrap();
        let m = classroom_service
            .add_measurement(&student.id, 96.0, 14.2, date("2024-05-05"))
            .await
            .unwrap();
        (student.id, m.id)
    }

    #[tokio::test]
    async fn test_concurrent_triggers_share_one_request() {
        let env = TestEnvironment::new().unwrap();
        let (service, classroom_service, provider) = setup_test(&env, vec![Ok(normal("shared"))]).await;
        let (student_id, measurement_id) = enroll_measured(&classroom_service, "Lan").await;

        let (a, b, c) = tokio::join!(
            service.ensure_assessment(&student_id, &measurement_id),
            service.ensure_assessment(&student_id, &measurement_id),
            service.ensure_assessment(&student_id, &measurement_id),
        );

        assert_eq!(provider.calls(), 1);
        assert_eq!(a.unwrap().summary, "shared");
        assert_eq!(b.unwrap().summary, "shared");
        assert_eq!(c.unwrap().summary, "shared");
        assert_eq!(service.in_flight_count(), 0);

        let student = classroom_service.get_student(&student_id).await.unwrap();
        assert_eq!(student.measurements.len(), 1);
        assert_eq!(student.measurements[0].assessment.as_ref().unwrap().summary, "shared");
    }

    #[tokio::test]
    async fn test_assessed_measurement_skips_provider() {
        let env = TestEnvironment::new().unwrap();
        let (service, classroom_service, provider) = setup_test(&env, vec![Ok(normal("first"))]).await;
        let (student_id, measurement_id) = enroll_measured(&classroom_service, "Lan").await;

        service.ensure_assessment(&student_id, &measurement_id).await.unwrap();
        let again = service.ensure_assessment(&student_id, &measurement_id).await.unwrap();

        assert_eq!(provider.calls(), 1);
        assert_eq!(again.summary, "first");
    }

    #[tokio::test]
    async fn test_failure_leaves_measurement_unassessed_and_retry_requests_again() {
        let env = TestEnvironment::new().unwrap();
        let (service, classroom_service, provider) =
            setup_test(&env, vec![Err(AssessmentError::Timeout), Ok(normal("retry"))]).await;
        let (student_id, measurement_id) = enroll_measured(&classroom_service, "Lan").await;

        let failed = service.ensure_assessment(&student_id, &measurement_id).await;
        assert_eq!(failed, Err(AssessmentError::Timeout));
        let student = classroom_service.get_student(&student_id).await.unwrap();
        assert!(!student.measurements[0].is_assessed());
        assert_eq!(service.in_flight_count(), 0);

        let retried = service.ensure_assessment(&student_id, &measurement_id).await.unwrap();
        assert_eq!(retried.summary, "retry");
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_dropped_caller_does_not_cancel_request() {
        let env = TestEnvironment::new().unwrap();
        let (service, classroom_service, provider) = setup_test(&env, vec![Ok(normal("late"))]).await;
        let (student_id, measurement_id) = enroll_measured(&classroom_service, "Lan").await;

        let abandoned = tokio::time::timeout(
            Duration::from_millis(5),
            service.ensure_assessment(&student_id, &measurement_id),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(150)).await;
        let student = classroom_service.get_student(&student_id).await.unwrap();
        assert_eq!(student.measurements[0].assessment.as_ref().unwrap().summary, "late");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_snapshot_after_completed_request_skips_provider() {
        let env = TestEnvironment::new().unwrap();
        let (service, classroom_service, provider) = setup_test(&env, vec![Ok(normal("first"))]).await;
        let (student_id, measurement_id) = enroll_measured(&classroom_service, "Lan").await;

        // Read before the first request completes, then start after it left the table
        let stale = classroom_service.get_student(&student_id).await.unwrap();
        let request = AssessmentRequest::for_measurement(&stale, stale.measurement(&measurement_id).unwrap());
        service.ensure_assessment(&student_id, &measurement_id).await.unwrap();
        assert_eq!(service.in_flight_count(), 0);

        let late = service
            .join_or_start(&student_id, &measurement_id, request)
            .unwrap()
            .await
            .unwrap();
        assert_eq!(late.summary, "first");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let env = TestEnvironment::new().unwrap();
        let (service, classroom_service, provider) = setup_test(&env, Vec::new()).await;
        let (student_id, _) = enroll_measured(&classroom_service, "Lan").await;

        assert!(matches!(
            service.ensure_assessment("student::missing", "measurement::x").await,
            Err(AssessmentError::StudentNotFound(_))
        ));
        assert!(matches!(
            service.ensure_assessment(&student_id, "measurement::missing").await,
            Err(AssessmentError::MeasurementNotFound(_))
        ));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_assess_class_reports_failures_per_student() {
        let env = TestEnvironment::new().unwrap();
        let (service, classroom_service, provider) = setup_test(
            &env,
            vec![Ok(normal("ok")), Err(AssessmentError::Network("connection reset".to_string()))],
        )
        .await;
        enroll_measured(&classroom_service, "Lan").await;
        enroll_measured(&classroom_service, "Minh").await;
        classroom_service
            .add_student(NewStudent {
                name: "Hoa".to_string(),
                dob: date("2021-01-01"),
                gender: Gender::Female,
                photo: None,
                parent_phone: None,
                health_notes: None,
            })
            .await
            .unwrap();

        let outcomes = service.assess_class().await;
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes.iter().filter(|o| o.result.is_ok()).count(), 1);
        assert_eq!(provider.calls(), 2);

        let report = service.class_report(date("2024-06-01")).await;
        assert_eq!(provider.calls(), 3);
        let statuses: Vec<_> = report.rows.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![ReportStatus::Normal, ReportStatus::Normal, ReportStatus::NoData]
        );
    }
}
