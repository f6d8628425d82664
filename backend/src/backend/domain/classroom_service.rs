//! Classroom service: the single authoritative owner of class and student data.
//!
//! Wraps the [`Classroom`] aggregate with persistence. State is loaded once at
//! startup and saved after every mutation. A mutation is applied to a copy of
//! the aggregate, persisted, and only then committed, so a failed save leaves
//! the in-memory state untouched.

use chrono::NaiveDate;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::classroom::{Classroom, EventDetails, NewStudent};
use super::models::{
    Assessment, AttachOutcome, ClassInfo, GrowthMetric, HealthEvent, Measurement, SchoolDay,
    Student, ValidationError,
};
use crate::backend::domain::metrics::format_iso_date;
use crate::backend::io::rest::mappers::class_info_mapper::ClassInfoMapper;
use crate::backend::io::rest::mappers::student_mapper::StudentMapper;
use crate::backend::storage::ClassroomStorage;
use shared::{DashboardResponse, GrowthPoint, StudentDetailResponse};

#[derive(Debug, thiserror::Error)]
pub enum ClassroomError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Which documents a mutation touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Documents {
    ClassInfo,
    Students,
    Both,
}

#[derive(Clone)]
pub struct ClassroomService {
    storage: Arc<dyn ClassroomStorage>,
    state: Arc<RwLock<Classroom>>,
}

impl ClassroomService {
    /// Load the stored classroom. Unreadable data is logged and replaced by an empty classroom.
    pub async fn load(storage: Arc<dyn ClassroomStorage>) -> Self {
        let classroom = match storage.load().await {
            Ok(Some(stored)) => Classroom::from_parts(Some(stored.class_info), stored.students),
            Ok(None) => {
                info!("No class has been set up yet");
                Classroom::new()
            }
            Err(e) => {
                warn!("Failed to load stored classroom, starting fresh: {:#}", e);
                Classroom::new()
            }
        };

        Self {
            storage,
            state: Arc::new(RwLock::new(classroom)),
        }
    }

    async fn persist(&self, classroom: &Classroom, documents: Documents) -> anyhow::Result<()> {
        if matches!(documents, Documents::Students | Documents::Both) {
            self.storage.save_students(classroom.students()).await?;
        }
        if matches!(documents, Documents::ClassInfo | Documents::Both) {
            if let Some(info) = classroom.class_info() {
                self.storage.save_class_info(info).await?;
            }
        }
        Ok(())
    }

    /// Apply `change` to a copy of the aggregate, persist it, then commit
    async fn mutate<T>(
        &self,
        documents: Documents,
        change: impl FnOnce(&mut Classroom) -> Result<T, ValidationError>,
    ) -> Result<T, ClassroomError> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let output = change(&mut next)?;
        self.persist(&next, documents).await?;
        *state = next;
        Ok(output)
    }

    /// Copy of the whole aggregate
    pub async fn snapshot(&self) -> Classroom {
        self.state.read().await.clone()
    }

    pub async fn is_configured(&self) -> bool {
        self.state.read().await.is_configured()
    }

    pub async fn class_info(&self) -> Option<ClassInfo> {
        self.state.read().await.class_info().cloned()
    }

    pub async fn list_students(&self) -> Vec<Student> {
        self.state.read().await.students().to_vec()
    }

    pub async fn get_student(&self, student_id: &str) -> Option<Student> {
        self.state.read().await.student(student_id).cloned()
    }

    pub async fn setup_class(&self, class_name: &str, teachers: [String; 2]) -> Result<ClassInfo, ClassroomError> {
        info!("Setting up class: {}", class_name);
        let info = self
            .mutate(Documents::Both, |classroom| classroom.setup_class(class_name, teachers))
            .await?;
        info!("Class {} is ready", info.class_name);
        Ok(info)
    }

    pub async fn update_class_info(&self, class_info: ClassInfo) -> Result<ClassInfo, ClassroomError> {
        info!("Updating class info for {}", class_info.class_name);
        self.mutate(Documents::ClassInfo, |classroom| {
            classroom.update_class_info(class_info.clone())?;
            Ok(class_info)
        })
        .await
    }

    pub async fn add_schedule_event(&self, details: EventDetails) -> Result<HealthEvent, ClassroomError> {
        info!("Adding schedule event {:?} on {}", details.title, details.date);
        self.mutate(Documents::ClassInfo, |classroom| classroom.add_schedule_event(details))
            .await
    }

    pub async fn update_schedule_event(
        &self,
        event_id: &str,
        details: EventDetails,
    ) -> Result<HealthEvent, ClassroomError> {
        info!("Updating schedule event {}", event_id);
        self.mutate(Documents::ClassInfo, |classroom| {
            classroom.update_schedule_event(event_id, details)
        })
        .await
    }

    pub async fn remove_schedule_event(&self, event_id: &str) -> Result<HealthEvent, ClassroomError> {
        info!("Removing schedule event {}", event_id);
        self.mutate(Documents::ClassInfo, |classroom| classroom.remove_schedule_event(event_id))
            .await
    }

    pub async fn set_menu_meals(&self, day: SchoolDay, meals: &str) -> Result<ClassInfo, ClassroomError> {
        info!("Updating {} menu", day.day_name());
        self.mutate(Documents::ClassInfo, |classroom| {
            classroom.set_menu_meals(day, meals)?;
            classroom.class_info().cloned().ok_or(ValidationError::ClassNotConfigured)
        })
        .await
    }

    pub async fn add_student(&self, new_student: NewStudent) -> Result<Student, ClassroomError> {
        info!("Enrolling student: name={}, dob={}", new_student.name, new_student.dob);
        let student = self
            .mutate(Documents::Students, |classroom| classroom.add_student(new_student))
            .await?;
        info!("Enrolled student {} with ID: {}", student.name, student.id);
        Ok(student)
    }

    pub async fn update_student_info(
        &self,
        student_id: &str,
        parent_phone: Option<String>,
        health_notes: Option<String>,
    ) -> Result<Student, ClassroomError> {
        info!("Updating info for student {}", student_id);
        self.mutate(Documents::Students, |classroom| {
            classroom.update_student_info(student_id, parent_phone, health_notes)
        })
        .await
    }

    pub async fn add_measurement(
        &self,
        student_id: &str,
        height_cm: f64,
        weight_kg: f64,
        date: NaiveDate,
    ) -> Result<Measurement, ClassroomError> {
        info!(
            "Adding measurement for student {}: {} cm, {} kg on {}",
            student_id, height_cm, weight_kg, date
        );
        self.mutate(Documents::Students, |classroom| {
            classroom.add_measurement(student_id, height_cm, weight_kg, date)
        })
        .await
    }

    /// Attach an assessment under the first-wins policy. Only a successful
    /// attachment is persisted.
    pub async fn update_assessment(
        &self,
        student_id: &str,
        measurement_id: &str,
        assessment: Assessment,
    ) -> Result<AttachOutcome, ClassroomError> {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let outcome = next.update_assessment(student_id, measurement_id, assessment);

        match outcome {
            AttachOutcome::Attached => {
                self.persist(&next, Documents::Students).await?;
                *state = next;
                info!("Attached assessment to measurement {}", measurement_id);
            }
            AttachOutcome::AlreadyAssessed => {
                info!("Measurement {} already assessed, ignoring later response", measurement_id);
            }
            AttachOutcome::NotFound => {
                warn!(
                    "Assessment for unknown measurement {} of student {} dropped",
                    measurement_id, student_id
                );
            }
        }

        Ok(outcome)
    }

    /// Class overview; `None` until the class is set up
    pub async fn dashboard(&self, today: NaiveDate) -> Option<DashboardResponse> {
        let state = self.state.read().await;
        let info = state.class_info()?;

        let next_event = info
            .next_event(today)
            .cloned()
            .map(ClassInfoMapper::event_to_dto);
        let schedule = info
            .sorted_schedule()
            .into_iter()
            .map(ClassInfoMapper::event_to_dto)
            .collect();
        let class_info = ClassInfoMapper::to_dto(info.clone());

        Some(DashboardResponse {
            class_name: class_info.class_name,
            teachers: class_info.teachers,
            student_count: state.students().len(),
            next_event,
            schedule,
            menu: class_info.menu,
        })
    }

    /// Everything the student detail view needs
    pub async fn student_detail(&self, student_id: &str, today: NaiveDate) -> Option<StudentDetailResponse> {
        let student = self.get_student(student_id).await?;

        let series = |metric: GrowthMetric| {
            student.growth_series(metric).map(|points| {
                points
                    .into_iter()
                    .map(|(date, value)| GrowthPoint { date: format_iso_date(date), value })
                    .collect()
            })
        };
        let height_series = series(GrowthMetric::Height);
        let weight_series = series(GrowthMetric::Weight);
        let age_in_months = student.current_age_in_months(today);
        let latest_measurement = student
            .latest_measurement()
            .cloned()
            .map(StudentMapper::measurement_to_dto);

        Some(StudentDetailResponse {
            student: StudentMapper::to_dto(student),
            age_in_months,
            latest_measurement,
            height_series,
            weight_series,
        })
    }
}
