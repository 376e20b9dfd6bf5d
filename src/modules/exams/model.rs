//! Exam, question, option, and proctor-assignment models and DTOs.
//!
//! The choice columns of the schema are closed Rust enums backed by
//! Postgres enum types, so a typo'd status or question type is a compile
//! or decode error, never silently stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "exam_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExamType {
    #[default]
    Standard,
    Adaptive,
    Timed,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "exam_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExamStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "monitoring_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MonitoringLevel {
    Basic,
    #[default]
    Standard,
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "question_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Essay,
    Code,
    ImageBased,
    AudioBased,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "assignment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Assigned,
    Active,
    Completed,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exam {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub duration_minutes: i32,
    pub max_attempts: i32,
    pub passing_score: f64,
    pub instructions: Option<String>,
    pub exam_type: ExamType,
    pub status: ExamStatus,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub proctoring_enabled: bool,
    pub ai_monitoring_level: MonitoringLevel,
    #[schema(value_type = Object)]
    pub settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Question {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub question_text: String,
    pub question_type: QuestionType,
    pub points: f64,
    pub time_limit_seconds: Option<i32>,
    pub order_index: i32,
    pub is_required: bool,
    #[schema(value_type = Vec<String>)]
    pub media_urls: serde_json::Value,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct QuestionOption {
    pub id: Uuid,
    pub question_id: Uuid,
    pub option_text: String,
    pub is_correct: bool,
    pub order_index: i32,
    pub explanation: String,
    pub media_url: String,
    pub created_at: DateTime<Utc>,
}

/// A proctor's responsibility for an exam. Rows are never hard-deleted;
/// removal is a status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExamProctor {
    pub id: Uuid,
    pub exam_id: Uuid,
    pub proctor_id: Uuid,
    pub assigned_by: Uuid,
    pub is_primary: bool,
    pub status: AssignmentStatus,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateExamDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Duration must be at least one minute"))]
    pub duration_minutes: i32,
    #[validate(range(min = 1, message = "Max attempts must be at least 1"))]
    pub max_attempts: Option<i32>,
    #[validate(range(min = 0.0, max = 100.0, message = "Passing score must be between 0 and 100"))]
    pub passing_score: f64,
    pub instructions: Option<String>,
    pub exam_type: Option<ExamType>,
    pub status: Option<ExamStatus>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub proctoring_enabled: Option<bool>,
    pub ai_monitoring_level: Option<MonitoringLevel>,
    #[schema(value_type = Object)]
    pub settings: Option<serde_json::Value>,
}

/// Partial exam update; absent fields keep their stored values.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateExamDto {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Duration must be at least one minute"))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 1, message = "Max attempts must be at least 1"))]
    pub max_attempts: Option<i32>,
    #[validate(range(min = 0.0, max = 100.0, message = "Passing score must be between 0 and 100"))]
    pub passing_score: Option<f64>,
    pub instructions: Option<String>,
    pub exam_type: Option<ExamType>,
    pub status: Option<ExamStatus>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub proctoring_enabled: Option<bool>,
    pub ai_monitoring_level: Option<MonitoringLevel>,
    #[schema(value_type = Object)]
    pub settings: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssignProctorDto {
    pub exam: Uuid,
    pub proctor: Uuid,
    pub is_primary: Option<bool>,
    pub status: Option<AssignmentStatus>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionDto {
    pub exam: Uuid,
    #[validate(length(min = 1, message = "Question text may not be blank"))]
    pub question_text: String,
    pub question_type: QuestionType,
    #[validate(range(min = 0.0, message = "Points may not be negative"))]
    pub points: Option<f64>,
    #[validate(range(min = 1, message = "Time limit must be at least one second"))]
    pub time_limit_seconds: Option<i32>,
    #[validate(range(min = 0, message = "Order index may not be negative"))]
    pub order_index: i32,
    pub is_required: Option<bool>,
    #[schema(value_type = Vec<String>)]
    pub media_urls: Option<serde_json::Value>,
    #[schema(value_type = Object)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateQuestionOptionDto {
    pub question: Uuid,
    #[validate(length(min = 1, message = "Option text may not be blank"))]
    pub option_text: String,
    pub is_correct: Option<bool>,
    #[validate(range(min = 0, message = "Order index may not be negative"))]
    pub order_index: i32,
    pub explanation: Option<String>,
    pub media_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&QuestionType::MultipleChoice).unwrap(),
            r#""multiple_choice""#
        );
        assert_eq!(
            serde_json::to_string(&AssignmentStatus::Removed).unwrap(),
            r#""removed""#
        );
        assert_eq!(
            serde_json::to_string(&MonitoringLevel::Strict).unwrap(),
            r#""strict""#
        );
    }

    #[test]
    fn test_enum_defaults_match_schema_defaults() {
        assert_eq!(ExamType::default(), ExamType::Standard);
        assert_eq!(ExamStatus::default(), ExamStatus::Draft);
        assert_eq!(MonitoringLevel::default(), MonitoringLevel::Standard);
        assert_eq!(AssignmentStatus::default(), AssignmentStatus::Assigned);
    }

    #[test]
    fn test_create_exam_dto_minimal_body() {
        let dto: CreateExamDto = serde_json::from_value(serde_json::json!({
            "title": "Mathematics Final Exam",
            "duration_minutes": 120,
            "passing_score": 70.0
        }))
        .unwrap();

        assert!(dto.validate().is_ok());
        assert!(dto.exam_type.is_none());
        assert!(dto.settings.is_none());
    }

    #[test]
    fn test_create_exam_dto_rejects_zero_duration() {
        let dto: CreateExamDto = serde_json::from_value(serde_json::json!({
            "title": "Broken",
            "duration_minutes": 0,
            "passing_score": 70.0
        }))
        .unwrap();

        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("duration_minutes"));
    }

    #[test]
    fn test_create_question_dto_rejects_unknown_type() {
        let result = serde_json::from_value::<CreateQuestionDto>(serde_json::json!({
            "exam": Uuid::new_v4(),
            "question_text": "What is 2 + 2?",
            "question_type": "matching",
            "order_index": 1
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_assign_proctor_dto_optional_fields_default_to_none() {
        let dto: AssignProctorDto = serde_json::from_value(serde_json::json!({
            "exam": Uuid::new_v4(),
            "proctor": Uuid::new_v4()
        }))
        .unwrap();

        assert!(dto.is_primary.is_none());
        assert!(dto.status.is_none());
    }
}
