//! Gemini growth-assessment provider.
//!
//! Calls the `generateContent` endpoint with a pediatric-nutrition prompt and a
//! JSON response schema, then validates the returned labels into a typed
//! [`Assessment`]. Any response that does not fit the closed status vocabulary
//! is rejected as malformed.

use async_trait::async_trait;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::backend::domain::assessment_provider::{AssessmentError, AssessmentProvider, AssessmentRequest};
use crate::backend::domain::metrics::BMI_MIN_AGE_MONTHS;
use crate::backend::domain::models::{Assessment, GrowthStatus, OverallStatus};
use crate::backend::io::rest::mappers::assessment_mapper::AssessmentMapper;
use shared::Gender;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AssessmentError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssessmentError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            client,
        })
    }

    /// Point the provider at another endpoint, e.g. a proxy
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

fn quoted_labels(labels: impl IntoIterator<Item = &'static str>) -> String {
    labels
        .into_iter()
        .map(|label| format!("\"{}\"", label))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Prompt sent to the model for one measurement
pub fn build_prompt(request: &AssessmentRequest) -> String {
    let child = match request.gender {
        Gender::Male => "boy",
        Gender::Female => "girl",
    };
    let bmi_text = match request.bmi {
        Some(bmi) => format!(", with a BMI of {}", bmi),
        None => String::new(),
    };
    let status_labels = quoted_labels(GrowthStatus::ALL.iter().map(|s| s.label()));
    let overall_labels = quoted_labels([OverallStatus::Normal.label(), OverallStatus::NeedsAttention.label()]);

    format!(
        "As a pediatric nutrition expert, assess the growth of a {child}, {age} months old, \
         {height} cm tall and weighing {weight} kg{bmi_text}, against the WHO child growth standards.\n\
         \n\
         1. Indicators: classify height-for-age, weight-for-age and BMI-for-age separately. \
         Use exactly one of: {status_labels}. BMI only applies from {bmi_age} months of age; \
         below that answer \"{not_applicable}\".\n\
         2. Summary: one friendly sentence describing the child's overall development.\n\
         3. Advice for parents: if any indicator is not normal, give 2-3 pieces of direct, positive, \
         practical advice, each with a short title and a paragraph of details with everyday meal ideas. \
         If the child is developing normally, return an empty list.\n\
         4. Overall: answer exactly one of {overall_labels}.\n\
         \n\
         Write the summary and advice in Vietnamese and follow the JSON schema strictly.",
        child = child,
        age = request.age_in_months,
        height = request.height_cm,
        weight = request.weight_kg,
        bmi_text = bmi_text,
        status_labels = status_labels,
        bmi_age = BMI_MIN_AGE_MONTHS,
        not_applicable = GrowthStatus::NotApplicable.label(),
        overall_labels = overall_labels,
    )
}

/// JSON schema the model must answer with
pub fn response_schema() -> Value {
    let status_labels: Vec<&str> = GrowthStatus::ALL.iter().map(|s| s.label()).collect();
    let status = json!({ "type": "STRING", "enum": status_labels });

    json!({
        "type": "OBJECT",
        "properties": {
            "heightStatus": status,
            "weightStatus": status,
            "bmiStatus": status,
            "summary": { "type": "STRING" },
            "parentalAdvice": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "details": { "type": "STRING" }
                    },
                    "required": ["title", "details"]
                }
            },
            "overallStatus": {
                "type": "STRING",
                "enum": [OverallStatus::Normal.label(), OverallStatus::NeedsAttention.label()]
            }
        },
        "required": ["heightStatus", "weightStatus", "bmiStatus", "summary", "parentalAdvice", "overallStatus"]
    })
}

pub fn request_body(request: &AssessmentRequest) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": build_prompt(request) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": response_schema()
        }
    })
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Models sometimes wrap JSON in a markdown fence despite the mime type
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Extract and validate the assessment from a `generateContent` response body
pub fn parse_generate_response(body: &str) -> Result<Assessment, AssessmentError> {
    let envelope: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| AssessmentError::Malformed(format!("Unexpected response envelope: {}", e)))?;

    let text: String = envelope
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .ok_or_else(|| AssessmentError::Malformed("Response contained no candidates".to_string()))?;

    if text.trim().is_empty() {
        return Err(AssessmentError::Malformed("Response text was empty".to_string()));
    }

    let raw: shared::Assessment = serde_json::from_str(strip_code_fence(&text))
        .map_err(|e| AssessmentError::Malformed(format!("Assessment JSON did not match schema: {}", e)))?;

    AssessmentMapper::to_domain(raw).map_err(|e| AssessmentError::Malformed(e.to_string()))
}

#[async_trait]
impl AssessmentProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn assess(&self, request: &AssessmentRequest) -> Result<Assessment, AssessmentError> {
        debug!(
            "Sending assessment request to {}: age={} months, height={} cm, weight={} kg",
            self.model, request.age_in_months, request.height_cm, request.weight_kg
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AssessmentError::Timeout
                } else {
                    AssessmentError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                AssessmentError::Timeout
            } else {
                AssessmentError::Network(e.to_string())
            }
        })?;

        if !status.is_success() {
            warn!("Gemini API returned {}: {}", status, body);
            return Err(AssessmentError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        parse_generate_response(&body)
    }
}
