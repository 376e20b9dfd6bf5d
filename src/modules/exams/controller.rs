use axum::extract::{Path, State};
use axum::http::{Method, StatusCode};
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::middleware::permissions::{admin_only, assigned_proctor_only};
use crate::modules::users::model::{Role, User};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::ErrorResponse;
use crate::utils::responses::{ApiResult, SuccessResponse, ok, success};
use crate::validator::ValidatedJson;

use super::model::{
    AssignProctorDto, CreateExamDto, CreateQuestionDto, CreateQuestionOptionDto, Exam, ExamProctor,
    Question, QuestionOption, UpdateExamDto,
};
use super::service::ExamService;

/// List all exams
#[utoipa::path(
    get,
    path = "/api/exam/",
    responses(
        (status = 200, description = "List of exams", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
pub async fn list_exams(State(state): State<AppState>, _auth_user: AuthUser) -> ApiResult<Vec<Exam>> {
    let exams = ExamService::list_exams(&state.db).await?;
    Ok(ok(exams))
}

/// Exam detail
#[utoipa::path(
    get,
    path = "/api/exam/{exam_id}",
    params(("exam_id" = Uuid, Path, description = "Exam id")),
    responses(
        (status = 200, description = "Exam detail", body = SuccessResponse),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
pub async fn get_exam(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(exam_id): Path<Uuid>,
) -> ApiResult<Exam> {
    let exam = ExamService::get_exam(&state.db, exam_id).await?;
    Ok(ok(exam))
}

/// Create an exam (admin only)
#[utoipa::path(
    post,
    path = "/api/exam/create",
    request_body = CreateExamDto,
    responses(
        (status = 201, description = "Exam created successfully", body = SuccessResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
pub async fn create_exam(
    State(state): State<AppState>,
    method: Method,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateExamDto>,
) -> ApiResult<Exam> {
    admin_only(&method, &auth_user)?;

    let exam = ExamService::create_exam(&state.db, auth_user.user_id()?, dto).await?;
    Ok(success(
        exam,
        "Exam created successfully",
        StatusCode::CREATED,
    ))
}

/// Update an exam (admin only)
#[utoipa::path(
    put,
    path = "/api/exam/{exam_id}/update",
    params(("exam_id" = Uuid, Path, description = "Exam id")),
    request_body = UpdateExamDto,
    responses(
        (status = 200, description = "Exam updated successfully", body = SuccessResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
pub async fn update_exam(
    State(state): State<AppState>,
    method: Method,
    auth_user: AuthUser,
    Path(exam_id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateExamDto>,
) -> ApiResult<Exam> {
    admin_only(&method, &auth_user)?;

    let exam = ExamService::update_exam(&state.db, exam_id, dto).await?;
    Ok(success(exam, "Exam updated successfully", StatusCode::OK))
}

/// List users holding the proctor role
#[utoipa::path(
    get,
    path = "/api/exam/proctors",
    responses(
        (status = 200, description = "List of proctors", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Proctors"
)]
pub async fn list_proctors(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> ApiResult<Vec<User>> {
    let proctors = UserService::list_by_role(&state.db, Role::Proctor).await?;
    Ok(ok(proctors))
}

/// Assign a proctor to an exam (admin only)
#[utoipa::path(
    post,
    path = "/api/exam/assign-proctor",
    request_body = AssignProctorDto,
    responses(
        (status = 200, description = "Proctor assigned successfully", body = SuccessResponse),
        (status = 400, description = "Assigned user must have the proctor role", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 409, description = "Proctor is already assigned to this exam", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Proctors"
)]
pub async fn assign_proctor(
    State(state): State<AppState>,
    method: Method,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<AssignProctorDto>,
) -> ApiResult<ExamProctor> {
    admin_only(&method, &auth_user)?;

    let assignment = ExamService::assign_proctor(&state.db, auth_user.user_id()?, dto).await?;
    Ok(success(
        assignment,
        "Proctor assigned successfully",
        StatusCode::OK,
    ))
}

/// List proctor assignments
#[utoipa::path(
    get,
    path = "/api/exam/assignments",
    responses(
        (status = 200, description = "List of assignments", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Proctors"
)]
pub async fn list_assignments(
    State(state): State<AppState>,
    _auth_user: AuthUser,
) -> ApiResult<Vec<ExamProctor>> {
    let assignments = ExamService::list_assignments(&state.db).await?;
    Ok(ok(assignments))
}

/// Exams assigned to the requesting proctor
#[utoipa::path(
    get,
    path = "/api/exam/proctor/assigned",
    responses(
        (status = 200, description = "Assigned exams", body = SuccessResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Proctors"
)]
pub async fn list_assigned_exams(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> ApiResult<Vec<Exam>> {
    let exams = ExamService::exams_for_proctor(&state.db, auth_user.user_id()?).await?;
    Ok(ok(exams))
}

/// Add a question to an exam (assigned proctor only)
#[utoipa::path(
    post,
    path = "/api/exam/questions/create",
    request_body = CreateQuestionDto,
    responses(
        (status = 201, description = "Question created successfully", body = SuccessResponse),
        (status = 403, description = "Not assigned to this exam", body = ErrorResponse),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Questions"
)]
pub async fn create_question(
    State(state): State<AppState>,
    method: Method,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateQuestionDto>,
) -> ApiResult<Question> {
    assigned_proctor_only(&state.db, &method, &auth_user, Some(dto.exam)).await?;

    let question = ExamService::create_question(&state.db, dto).await?;
    Ok(success(
        question,
        "Question created successfully",
        StatusCode::CREATED,
    ))
}

/// Questions of an exam, ordered by position
#[utoipa::path(
    get,
    path = "/api/exam/{exam_id}/questions",
    params(("exam_id" = Uuid, Path, description = "Exam id")),
    responses(
        (status = 200, description = "List of questions", body = SuccessResponse),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Questions"
)]
pub async fn list_questions(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(exam_id): Path<Uuid>,
) -> ApiResult<Vec<Question>> {
    let questions = ExamService::list_questions(&state.db, exam_id).await?;
    Ok(ok(questions))
}

/// Add an option to a question (assigned proctor only)
#[utoipa::path(
    post,
    path = "/api/exam/question-options/create",
    request_body = CreateQuestionOptionDto,
    responses(
        (status = 201, description = "Question option created successfully", body = SuccessResponse),
        (status = 403, description = "Not assigned to this exam", body = ErrorResponse),
        (status = 404, description = "Question not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Questions"
)]
pub async fn create_question_option(
    State(state): State<AppState>,
    method: Method,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateQuestionOptionDto>,
) -> ApiResult<QuestionOption> {
    // The option payload names a question, not an exam; gate on the
    // parent question's exam.
    let question = ExamService::get_question(&state.db, dto.question).await?;
    assigned_proctor_only(&state.db, &method, &auth_user, Some(question.exam_id)).await?;

    let option = ExamService::create_question_option(&state.db, dto).await?;
    Ok(success(
        option,
        "Question option created successfully",
        StatusCode::CREATED,
    ))
}
