use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::exams::model::{
    AssignProctorDto, AssignmentStatus, CreateExamDto, CreateQuestionDto, CreateQuestionOptionDto,
    Exam, ExamProctor, ExamStatus, ExamType, MonitoringLevel, Question, QuestionOption,
    QuestionType, UpdateExamDto,
};
use crate::modules::users::model::{
    LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RefreshResponse,
    RegisterRequestDto, Role, User,
};
use crate::utils::errors::ErrorResponse;
use crate::utils::responses::SuccessResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::users::controller::register,
        crate::modules::users::controller::login,
        crate::modules::users::controller::refresh,
        crate::modules::users::controller::logout,
        crate::modules::users::controller::me,
        crate::modules::exams::controller::list_exams,
        crate::modules::exams::controller::get_exam,
        crate::modules::exams::controller::create_exam,
        crate::modules::exams::controller::update_exam,
        crate::modules::exams::controller::list_proctors,
        crate::modules::exams::controller::assign_proctor,
        crate::modules::exams::controller::list_assignments,
        crate::modules::exams::controller::list_assigned_exams,
        crate::modules::exams::controller::create_question,
        crate::modules::exams::controller::list_questions,
        crate::modules::exams::controller::create_question_option,
    ),
    components(
        schemas(
            Role,
            User,
            RegisterRequestDto,
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            RefreshResponse,
            LogoutRequest,
            Exam,
            ExamType,
            ExamStatus,
            MonitoringLevel,
            CreateExamDto,
            UpdateExamDto,
            Question,
            QuestionType,
            CreateQuestionDto,
            QuestionOption,
            CreateQuestionOptionDto,
            ExamProctor,
            AssignmentStatus,
            AssignProctorDto,
            SuccessResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login, and token lifecycle"),
        (name = "Exams", description = "Exam management endpoints"),
        (name = "Proctors", description = "Proctor roster and assignment endpoints"),
        (name = "Questions", description = "Question and option authoring endpoints")
    ),
    info(
        title = "Invigil API",
        version = "0.1.0",
        description = "Exam management and proctoring REST API. Every response, success or \
                       error, uses the uniform envelope: `{status, message, data|errors}`.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
