use serde_json::json;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::exams::model::{
    AssignProctorDto, AssignmentStatus, CreateExamDto, CreateQuestionDto, CreateQuestionOptionDto,
    Exam, ExamProctor, Question, QuestionOption, UpdateExamDto,
};
use crate::modules::users::model::Role;
use crate::utils::errors::AppError;

const EXAM_COLUMNS: &str = "id, title, description, created_by, duration_minutes, max_attempts, \
     passing_score, instructions, exam_type, status, start_time, end_time, proctoring_enabled, \
     ai_monitoring_level, settings, created_at, updated_at";

const QUESTION_COLUMNS: &str = "id, exam_id, question_text, question_type, points, \
     time_limit_seconds, order_index, is_required, media_urls, metadata, created_at, updated_at";

const OPTION_COLUMNS: &str =
    "id, question_id, option_text, is_correct, order_index, explanation, media_url, created_at";

const ASSIGNMENT_COLUMNS: &str =
    "id, exam_id, proctor_id, assigned_by, is_primary, status, assigned_at";

pub struct ExamService;

impl ExamService {
    pub async fn list_exams(db: &PgPool) -> Result<Vec<Exam>, AppError> {
        let exams = sqlx::query_as::<_, Exam>(&format!(
            "SELECT {EXAM_COLUMNS} FROM exams ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;

        Ok(exams)
    }

    pub async fn get_exam(db: &PgPool, id: Uuid) -> Result<Exam, AppError> {
        let exam = sqlx::query_as::<_, Exam>(&format!(
            "SELECT {EXAM_COLUMNS} FROM exams WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Exam not found"))?;

        Ok(exam)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_exam(
        db: &PgPool,
        created_by: Uuid,
        dto: CreateExamDto,
    ) -> Result<Exam, AppError> {
        let exam = sqlx::query_as::<_, Exam>(&format!(
            "INSERT INTO exams (title, description, created_by, duration_minutes, max_attempts, \
             passing_score, instructions, exam_type, status, start_time, end_time, \
             proctoring_enabled, ai_monitoring_level, settings)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {EXAM_COLUMNS}"
        ))
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(created_by)
        .bind(dto.duration_minutes)
        .bind(dto.max_attempts.unwrap_or(1))
        .bind(dto.passing_score)
        .bind(&dto.instructions)
        .bind(dto.exam_type.unwrap_or_default())
        .bind(dto.status.unwrap_or_default())
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(dto.proctoring_enabled.unwrap_or(true))
        .bind(dto.ai_monitoring_level.unwrap_or_default())
        .bind(dto.settings.unwrap_or_else(|| json!({})))
        .fetch_one(db)
        .await?;

        Ok(exam)
    }

    /// Applies a partial update; absent fields keep their stored values.
    #[instrument(skip(db, dto))]
    pub async fn update_exam(db: &PgPool, id: Uuid, dto: UpdateExamDto) -> Result<Exam, AppError> {
        let exam = sqlx::query_as::<_, Exam>(&format!(
            "UPDATE exams SET
                 title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 duration_minutes = COALESCE($4, duration_minutes),
                 max_attempts = COALESCE($5, max_attempts),
                 passing_score = COALESCE($6, passing_score),
                 instructions = COALESCE($7, instructions),
                 exam_type = COALESCE($8, exam_type),
                 status = COALESCE($9, status),
                 start_time = COALESCE($10, start_time),
                 end_time = COALESCE($11, end_time),
                 proctoring_enabled = COALESCE($12, proctoring_enabled),
                 ai_monitoring_level = COALESCE($13, ai_monitoring_level),
                 settings = COALESCE($14, settings),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {EXAM_COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.duration_minutes)
        .bind(dto.max_attempts)
        .bind(dto.passing_score)
        .bind(&dto.instructions)
        .bind(dto.exam_type)
        .bind(dto.status)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(dto.proctoring_enabled)
        .bind(dto.ai_monitoring_level)
        .bind(dto.settings)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Exam not found"))?;

        Ok(exam)
    }

    /// Assigns a proctor to an exam.
    ///
    /// Pre-checks, first violation wins: the exam must exist, the pair must
    /// not already be assigned, the target must hold the proctor role. The
    /// UNIQUE (exam_id, proctor_id) constraint remains the enforcement
    /// point for concurrent duplicates; a lost race surfaces as the same
    /// Conflict.
    #[instrument(skip(db, dto))]
    pub async fn assign_proctor(
        db: &PgPool,
        assigned_by: Uuid,
        dto: AssignProctorDto,
    ) -> Result<ExamProctor, AppError> {
        Self::get_exam(db, dto.exam).await?;

        let already_assigned: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM exam_proctors WHERE exam_id = $1 AND proctor_id = $2)",
        )
        .bind(dto.exam)
        .bind(dto.proctor)
        .fetch_one(db)
        .await?;

        if already_assigned.0 {
            return Err(AppError::conflict(
                "Proctor is already assigned to this exam",
            ));
        }

        let role: Option<(Role,)> = sqlx::query_as("SELECT role FROM users WHERE id = $1")
            .bind(dto.proctor)
            .fetch_optional(db)
            .await?;

        match role {
            None => return Err(AppError::not_found("Proctor not found")),
            Some((Role::Proctor,)) => {}
            Some(_) => {
                return Err(AppError::bad_request(
                    "Assigned user must have the proctor role",
                ));
            }
        }

        let assignment = sqlx::query_as::<_, ExamProctor>(&format!(
            "INSERT INTO exam_proctors (exam_id, proctor_id, assigned_by, is_primary, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(dto.exam)
        .bind(dto.proctor)
        .bind(assigned_by)
        .bind(dto.is_primary.unwrap_or(false))
        .bind(dto.status.unwrap_or_default())
        .fetch_one(db)
        .await
        .map_err(map_assignment_unique_violation)?;

        Ok(assignment)
    }

    pub async fn list_assignments(db: &PgPool) -> Result<Vec<ExamProctor>, AppError> {
        let assignments = sqlx::query_as::<_, ExamProctor>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM exam_proctors ORDER BY assigned_at DESC"
        ))
        .fetch_all(db)
        .await?;

        Ok(assignments)
    }

    /// Exams the given proctor is responsible for, excluding assignments
    /// that were removed.
    pub async fn exams_for_proctor(db: &PgPool, proctor_id: Uuid) -> Result<Vec<Exam>, AppError> {
        let exams = sqlx::query_as::<_, Exam>(
            "SELECT e.id, e.title, e.description, e.created_by, e.duration_minutes, \
             e.max_attempts, e.passing_score, e.instructions, e.exam_type, e.status, \
             e.start_time, e.end_time, e.proctoring_enabled, e.ai_monitoring_level, e.settings, \
             e.created_at, e.updated_at
             FROM exams e
             JOIN exam_proctors ep ON ep.exam_id = e.id
             WHERE ep.proctor_id = $1 AND ep.status <> $2
             ORDER BY e.created_at DESC",
        )
        .bind(proctor_id)
        .bind(AssignmentStatus::Removed)
        .fetch_all(db)
        .await?;

        Ok(exams)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_question(db: &PgPool, dto: CreateQuestionDto) -> Result<Question, AppError> {
        Self::get_exam(db, dto.exam).await?;

        let question = sqlx::query_as::<_, Question>(&format!(
            "INSERT INTO questions (exam_id, question_text, question_type, points, \
             time_limit_seconds, order_index, is_required, media_urls, metadata)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {QUESTION_COLUMNS}"
        ))
        .bind(dto.exam)
        .bind(&dto.question_text)
        .bind(dto.question_type)
        .bind(dto.points.unwrap_or(1.0))
        .bind(dto.time_limit_seconds)
        .bind(dto.order_index)
        .bind(dto.is_required.unwrap_or(true))
        .bind(dto.media_urls.unwrap_or_else(|| json!([])))
        .bind(dto.metadata.unwrap_or_else(|| json!({})))
        .fetch_one(db)
        .await?;

        Ok(question)
    }

    pub async fn list_questions(db: &PgPool, exam_id: Uuid) -> Result<Vec<Question>, AppError> {
        Self::get_exam(db, exam_id).await?;

        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE exam_id = $1 ORDER BY order_index"
        ))
        .bind(exam_id)
        .fetch_all(db)
        .await?;

        Ok(questions)
    }

    pub async fn get_question(db: &PgPool, id: Uuid) -> Result<Question, AppError> {
        let question = sqlx::query_as::<_, Question>(&format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found("Question not found"))?;

        Ok(question)
    }

    #[instrument(skip(db, dto))]
    pub async fn create_question_option(
        db: &PgPool,
        dto: CreateQuestionOptionDto,
    ) -> Result<QuestionOption, AppError> {
        let option = sqlx::query_as::<_, QuestionOption>(&format!(
            "INSERT INTO question_options (question_id, option_text, is_correct, order_index, \
             explanation, media_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {OPTION_COLUMNS}"
        ))
        .bind(dto.question)
        .bind(&dto.option_text)
        .bind(dto.is_correct.unwrap_or(false))
        .bind(dto.order_index)
        .bind(dto.explanation.unwrap_or_default())
        .bind(dto.media_url.unwrap_or_default())
        .fetch_one(db)
        .await?;

        Ok(option)
    }
}

/// A concurrent duplicate submission loses the check-then-insert race and
/// trips the UNIQUE constraint; report it as the same Conflict the
/// pre-check produces.
fn map_assignment_unique_violation(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::conflict("Proctor is already assigned to this exam")
        }
        _ => AppError::internal(err),
    }
}
