use axum::{
    Router,
    routing::{get, post, put},
};

use crate::modules::exams::controller::{
    assign_proctor, create_exam, create_question, create_question_option, get_exam,
    list_assigned_exams, list_assignments, list_exams, list_proctors, list_questions, update_exam,
};
use crate::state::AppState;

pub fn init_exams_router() -> Router<AppState> {
    Router::new()
        // Admin - exam management
        .route("/", get(list_exams))
        .route("/create", post(create_exam))
        .route("/{exam_id}", get(get_exam))
        .route("/{exam_id}/update", put(update_exam))
        // Admin - proctor management
        .route("/proctors", get(list_proctors))
        .route("/assign-proctor", post(assign_proctor))
        .route("/assignments", get(list_assignments))
        // Proctor - assigned exams
        .route("/proctor/assigned", get(list_assigned_exams))
        // Proctor - question management
        .route("/questions/create", post(create_question))
        .route("/{exam_id}/questions", get(list_questions))
        .route("/question-options/create", post(create_question_option))
}
