//! The classroom aggregate.
//!
//! `Classroom` is the single in-memory owner of class metadata and the
//! student list. Every student mutation rebuilds the student list with exactly
//! one student transformed; nothing outside this type edits a student in place.
//! Callers receive clones.

use chrono::NaiveDate;
use std::collections::HashSet;

use super::models::{
    Assessment, AttachOutcome, ClassInfo, HealthEvent, Measurement, PhotoRef, SchoolDay, Student,
    ValidationError,
};
use shared::Gender;

const MAX_NAME_LENGTH: usize = 100;

/// Details needed to enroll a student
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub photo: Option<PhotoRef>,
    pub parent_phone: Option<String>,
    pub health_notes: Option<String>,
}

/// Fields of a schedule event as entered by a teacher
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetails {
    pub date: NaiveDate,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classroom {
    class_info: Option<ClassInfo>,
    students: Vec<Student>,
}

/// Empty strings clear an optional text field
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }
    Ok(name.to_string())
}

fn validate_class_fields(class_name: &str, teachers: &[String; 2]) -> Result<(), ValidationError> {
    if class_name.trim().is_empty() {
        return Err(ValidationError::EmptyClassName);
    }
    for (index, teacher) in teachers.iter().enumerate() {
        if teacher.trim().is_empty() {
            return Err(ValidationError::EmptyTeacherName(index + 1));
        }
    }
    Ok(())
}

fn validate_event_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyEventTitle);
    }
    Ok(())
}

fn validate_event(details: &EventDetails) -> Result<(), ValidationError> {
    validate_event_title(&details.title)
}

/// Every event needs a title and an id unique within the schedule
fn validate_schedule(schedule: &[HealthEvent]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for event in schedule {
        validate_event_title(&event.title)?;
        if event.id.trim().is_empty() {
            return Err(ValidationError::EmptyEventId);
        }
        if !seen.insert(event.id.as_str()) {
            return Err(ValidationError::DuplicateEventId(event.id.clone()));
        }
    }
    Ok(())
}

/// Reject non-positive or non-finite body measurements
pub fn validate_body_measurements(height_cm: f64, weight_kg: f64) -> Result<(), ValidationError> {
    if !(height_cm.is_finite() && height_cm > 0.0) {
        return Err(ValidationError::NonPositiveHeight(height_cm));
    }
    if !(weight_kg.is_finite() && weight_kg > 0.0) {
        return Err(ValidationError::NonPositiveWeight(weight_kg));
    }
    Ok(())
}

impl Classroom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(class_info: Option<ClassInfo>, students: Vec<Student>) -> Self {
        Self { class_info, students }
    }

    pub fn class_info(&self) -> Option<&ClassInfo> {
        self.class_info.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.class_info.is_some()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn student(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == student_id)
    }

    /// Replace the student list with one where only `student_id` is transformed
    fn transform_student<T>(
        &mut self,
        student_id: &str,
        transform: impl FnOnce(&mut Student) -> T,
    ) -> Result<T, ValidationError> {
        if self.student(student_id).is_none() {
            return Err(ValidationError::StudentNotFound(student_id.to_string()));
        }

        let mut transform = Some(transform);
        let mut output = None;
        self.students = std::mem::take(&mut self.students)
            .into_iter()
            .map(|mut student| {
                if student.id == student_id {
                    if let Some(f) = transform.take() {
                        output = Some(f(&mut student));
                    }
                }
                student
            })
            .collect();

        output.ok_or_else(|| ValidationError::StudentNotFound(student_id.to_string()))
    }

    fn class_info_mut(&mut self) -> Result<&mut ClassInfo, ValidationError> {
        self.class_info.as_mut().ok_or(ValidationError::ClassNotConfigured)
    }

    /// Create the class. Any previous student list is discarded.
    pub fn setup_class(&mut self, class_name: &str, teachers: [String; 2]) -> Result<ClassInfo, ValidationError> {
        validate_class_fields(class_name, &teachers)?;
        let teachers = teachers.map(|t| t.trim().to_string());
        let info = ClassInfo::new(class_name.trim(), teachers);
        self.class_info = Some(info.clone());
        self.students = Vec::new();
        Ok(info)
    }

    /// Wholesale replacement of the class metadata. The menu is taken as
    /// given; a weekday missing from it makes `set_menu_meals` fail with
    /// [`ValidationError::UnknownSchoolDay`].
    pub fn update_class_info(&mut self, info: ClassInfo) -> Result<(), ValidationError> {
        validate_class_fields(&info.class_name, &info.teachers)?;
        validate_schedule(&info.schedule)?;
        self.class_info = Some(info);
        Ok(())
    }

    pub fn add_schedule_event(&mut self, details: EventDetails) -> Result<HealthEvent, ValidationError> {
        validate_event(&details)?;
        let info = self.class_info_mut()?;
        let event = HealthEvent {
            id: HealthEvent::generate_id(),
            date: details.date,
            title: details.title.trim().to_string(),
            description: details.description.trim().to_string(),
        };
        info.schedule.push(event.clone());
        Ok(event)
    }

    pub fn update_schedule_event(
        &mut self,
        event_id: &str,
        details: EventDetails,
    ) -> Result<HealthEvent, ValidationError> {
        validate_event(&details)?;
        let info = self.class_info_mut()?;
        let event = info
            .schedule
            .iter_mut()
            .find(|e| e.id == event_id)
            .ok_or_else(|| ValidationError::EventNotFound(event_id.to_string()))?;
        event.date = details.date;
        event.title = details.title.trim().to_string();
        event.description = details.description.trim().to_string();
        Ok(event.clone())
    }

    pub fn remove_schedule_event(&mut self, event_id: &str) -> Result<HealthEvent, ValidationError> {
        let info = self.class_info_mut()?;
        let position = info
            .schedule
            .iter()
            .position(|e| e.id == event_id)
            .ok_or_else(|| ValidationError::EventNotFound(event_id.to_string()))?;
        Ok(info.schedule.remove(position))
    }

    pub fn set_menu_meals(&mut self, day: SchoolDay, meals: &str) -> Result<(), ValidationError> {
        let info = self.class_info_mut()?;
        if !info.set_meals(day, meals.trim()) {
            return Err(ValidationError::UnknownSchoolDay(day.id().to_string()));
        }
        Ok(())
    }

    pub fn add_student(&mut self, new_student: NewStudent) -> Result<Student, ValidationError> {
        let name = validate_name(&new_student.name)?;
        let student = Student {
            id: Student::generate_id(),
            name,
            dob: new_student.dob,
            gender: new_student.gender,
            photo: new_student.photo,
            parent_phone: optional_text(new_student.parent_phone),
            health_notes: optional_text(new_student.health_notes),
            measurements: Vec::new(),
        };
        self.students = self
            .students
            .iter()
            .cloned()
            .chain(std::iter::once(student.clone()))
            .collect();
        Ok(student)
    }

    /// Update the parent contact and health notes. `None` leaves a field as is.
    pub fn update_student_info(
        &mut self,
        student_id: &str,
        parent_phone: Option<String>,
        health_notes: Option<String>,
    ) -> Result<Student, ValidationError> {
        self.transform_student(student_id, |student| {
            if parent_phone.is_some() {
                student.parent_phone = optional_text(parent_phone);
            }
            if health_notes.is_some() {
                student.health_notes = optional_text(health_notes);
            }
            student.clone()
        })
    }

    pub fn add_measurement(
        &mut self,
        student_id: &str,
        height_cm: f64,
        weight_kg: f64,
        date: NaiveDate,
    ) -> Result<Measurement, ValidationError> {
        validate_body_measurements(height_cm, weight_kg)?;
        self.transform_student(student_id, |student| {
            student.add_measurement(height_cm, weight_kg, date)
        })
    }

    /// Attach an assessment under the first-wins policy. Unknown students and
    /// measurements are reported as [`AttachOutcome::NotFound`], never as errors.
    pub fn update_assessment(
        &mut self,
        student_id: &str,
        measurement_id: &str,
        assessment: Assessment,
    ) -> AttachOutcome {
        self.transform_student(student_id, |student| {
            student.attach_assessment(measurement_id, assessment)
        })
        .unwrap_or(AttachOutcome::NotFound)
    }
}
