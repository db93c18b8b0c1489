//! Advisor-style report generation on top of an external text-generation service.
//!
//! `request_report` keeps the three outcomes apart; `generate_report` collapses
//! them into a string that is always safe to display.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::error::AdvisorError;
use crate::models::StudentRecord;

pub const NOT_CONFIGURED_MESSAGE: &str = "API Key not configured. Unable to generate report.";
pub const NO_RESPONSE_MESSAGE: &str = "No response generated.";
pub const FAILURE_MESSAGE: &str =
    "An error occurred while generating the report. Please try again later.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedText {
    pub text: Option<String>,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_content(&self, prompt: &str) -> Result<GeneratedText, AdvisorError>;
}

#[derive(Debug)]
pub enum ReportOutcome {
    Generated(String),
    NoResponse,
    NotConfigured,
    Failed(AdvisorError),
}

impl ReportOutcome {
    pub fn into_message(self) -> String {
        match self {
            ReportOutcome::Generated(text) => text,
            ReportOutcome::NoResponse => NO_RESPONSE_MESSAGE.to_string(),
            ReportOutcome::NotConfigured => NOT_CONFIGURED_MESSAGE.to_string(),
            ReportOutcome::Failed(err) => {
                tracing::error!(error = %err, "error generating report");
                FAILURE_MESSAGE.to_string()
            }
        }
    }
}

pub fn build_prompt(student: &StudentRecord) -> String {
    let activities = match student.activities().join(", ") {
        joined if joined.is_empty() => "None listed".to_string(),
        joined => joined,
    };
    let grades = student
        .grades
        .iter()
        .map(|g| format!("- {}: {} ({})", g.subject, g.score, g.letter))
        .collect::<Vec<_>>()
        .join("\n");

    [
        "You are a professional high school academic advisor.".to_string(),
        "Write a constructive, encouraging, but honest report card comment (approx 150 words) for the following student.".to_string(),
        String::new(),
        format!("Student Name: {} {}", student.first_name, student.last_name),
        format!("Grade Level: {}", student.grade_level),
        format!("GPA: {}", student.gpa),
        format!("Attendance Rate: {}%", student.attendance_rate),
        format!("Extracurriculars: {activities}"),
        String::new(),
        "Subject Grades:".to_string(),
        grades,
        String::new(),
        "Focus on strengths, identify 1 area for improvement if scores are below 85 in any subject, and conclude with a positive outlook.".to_string(),
        "Format the response in Markdown.".to_string(),
    ]
    .join("\n")
}

/// Runs one report request. `None` means no credential is configured, in which
/// case nothing is sent.
pub async fn request_report(
    student: &StudentRecord,
    transport: Option<&dyn TextGenerator>,
) -> ReportOutcome {
    let Some(transport) = transport else {
        tracing::warn!("API_KEY is missing from environment variables");
        return ReportOutcome::NotConfigured;
    };

    let prompt = build_prompt(student);
    tracing::debug!(student_id = %student.id, prompt_len = prompt.len(), "requesting report");

    match transport.generate_content(&prompt).await {
        Ok(GeneratedText { text: Some(text) }) if !text.is_empty() => {
            ReportOutcome::Generated(text)
        }
        Ok(_) => ReportOutcome::NoResponse,
        Err(AdvisorError::MissingApiKey) => {
            tracing::warn!("API_KEY is missing from environment variables");
            ReportOutcome::NotConfigured
        }
        Err(err) => ReportOutcome::Failed(err),
    }
}

pub async fn generate_report(
    student: &StudentRecord,
    transport: Option<&dyn TextGenerator>,
) -> String {
    request_report(student, transport).await.into_message()
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    fn into_generated(self) -> GeneratedText {
        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty());
        GeneratedText { text }
    }
}

/// `generateContent` client for the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Returns `None` when no API key is configured.
    pub fn from_settings(settings: &Settings) -> Option<Self> {
        let api_key = settings.api_key.clone()?;
        Some(Self {
            client: reqwest::Client::new(),
            api_base: settings.api_base.clone(),
            model: settings.model.clone(),
            api_key,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_content(&self, prompt: &str) -> Result<GeneratedText, AdvisorError> {
        if self.api_key.is_empty() {
            return Err(AdvisorError::MissingApiKey);
        }

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(AdvisorError::Status { status, body });
        }

        let body = resp.text().await?;
        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|err| AdvisorError::Decode(err.to_string()))?;
        Ok(parsed.into_generated())
    }
}
