use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender of a student. Accepts the Vietnamese labels used by older data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "Nam", alias = "Male")]
    Male,
    #[serde(alias = "Nữ", alias = "Female")]
    Female,
}

/// A single piece of advice for parents attached to an assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentalAdvice {
    pub title: String,
    pub details: String,
}

/// Growth assessment as it travels over the wire and into data files.
///
/// Status fields carry the canonical labels ("Normal", "Stunted", ...). The
/// camelCase aliases match the JSON shape the assessment provider returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(alias = "heightStatus")]
    pub height_status: String,
    #[serde(alias = "weightStatus")]
    pub weight_status: String,
    #[serde(alias = "bmiStatus")]
    pub bmi_status: String,
    pub summary: String,
    #[serde(alias = "parentalAdvice", default)]
    pub parental_advice: Vec<ParentalAdvice>,
    /// Either "Normal" or "Needs Attention"
    #[serde(alias = "overallStatus")]
    pub overall_status: String,
}

/// One dated height/weight observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: String,
    /// Measurement date (YYYY-MM-DD)
    pub date: String,
    /// Height in centimetres
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    /// Only present when the student was at least 70 months old on `date`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    /// Date of birth (YYYY-MM-DD)
    pub dob: String,
    pub gender: Gender,
    /// Opaque photo reference produced by the image encoder, stored verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_notes: Option<String>,
    /// Ordered by ascending date
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub name: String,
}

/// A dated entry on the class health schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthEvent {
    pub id: String,
    /// Event date (YYYY-MM-DD)
    pub date: String,
    pub title: String,
    pub description: String,
}

/// One weekday slot of the weekly menu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Stable slot id: "monday" through "friday"
    pub id: String,
    /// Display name of the day
    pub day: String,
    pub meals: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub class_name: String,
    /// Always exactly two teachers
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub health_schedule: Vec<HealthEvent>,
    pub menu: Vec<MenuItem>,
}

/// Caller role; teachers edit, parents read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Teacher,
    Parent,
}

impl UserRole {
    pub fn can_edit(&self) -> bool {
        matches!(self, UserRole::Teacher)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Teacher => "teacher",
            UserRole::Parent => "parent",
        }
    }
}

impl FromStr for UserRole {
    type Err = UserRoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "teacher" => Ok(UserRole::Teacher),
            "parent" => Ok(UserRole::Parent),
            _ => Err(UserRoleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRoleParseError(pub String);

impl fmt::Display for UserRoleParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown user role: {}", self.0)
    }
}

impl std::error::Error for UserRoleParseError {}

/// Request to create the class for the first time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupClassRequest {
    pub class_name: String,
    pub teacher_names: [String; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfoResponse {
    pub class_info: ClassInfo,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEventRequest {
    /// Event date (YYYY-MM-DD)
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateMenuRequest {
    pub meals: String,
}

/// Overview of the class shown after login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub class_name: String,
    pub teachers: Vec<Teacher>,
    pub student_count: usize,
    pub next_event: Option<HealthEvent>,
    /// Sorted by ascending date
    pub schedule: Vec<HealthEvent>,
    pub menu: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateStudentRequest {
    pub name: String,
    /// Date of birth (YYYY-MM-DD)
    pub dob: String,
    pub gender: Gender,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub parent_phone: Option<String>,
    #[serde(default)]
    pub health_notes: Option<String>,
}

/// Partial update of the editable student details. `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateStudentInfoRequest {
    #[serde(default)]
    pub parent_phone: Option<String>,
    #[serde(default)]
    pub health_notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentResponse {
    pub student: Student,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentListResponse {
    pub students: Vec<Student>,
}

/// A single point on a growth chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDetailResponse {
    pub student: Student,
    /// Age at the latest measurement, or today when there is none
    pub age_in_months: u32,
    pub latest_measurement: Option<Measurement>,
    /// Absent until at least two measurements exist
    pub height_series: Option<Vec<GrowthPoint>>,
    pub weight_series: Option<Vec<GrowthPoint>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddMeasurementRequest {
    /// Height in centimetres
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    /// Measurement date (YYYY-MM-DD)
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResponse {
    pub student_id: String,
    pub measurement: Measurement,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    pub student_id: String,
    pub measurement_id: String,
    pub assessment: Assessment,
}

/// Status column of the class report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Normal,
    NeedsAttention,
    /// Latest measurement exists but has no assessment yet
    Pending,
    /// Student has no measurements
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReportRow {
    /// 1-based position in enrollment order
    pub index: usize,
    pub student_id: String,
    pub name: String,
    /// DD/MM/YYYY
    pub dob_display: String,
    pub age_in_months: u32,
    /// DD/MM/YYYY of the latest measurement
    pub last_measured: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub bmi: Option<f64>,
    pub status: ReportStatus,
    pub needs_attention: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassReportResponse {
    pub class_name: Option<String>,
    /// Report date (YYYY-MM-DD)
    pub generated_on: String,
    pub rows: Vec<ClassReportRow>,
}
