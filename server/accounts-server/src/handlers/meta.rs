//! Predefined catalogues served to registration and reset forms.

use axum::extract::Query;
use axum::Json;
use serde::Deserialize;

use crate::error::{api_success, ApiResponse};

const SECURITY_QUESTIONS_EN: [&str; 10] = [
    "What was the house number and street name you lived in as a child?",
    "What were the last four digits of your childhood telephone number?",
    "What primary school did you attend?",
    "In what town or city was your first full time job?",
    "In what town or city did you meet your spouse/partner?",
    "What is the middle name of your oldest child?",
    "What are the last five digits of your driver's licence number?",
    "What is your grandmother's (on your mother's side) maiden name?",
    "What is your spouse or partner's mother's maiden name?",
    "In what town or city did your mother and father meet?",
];

const SECURITY_QUESTIONS_DE: [&str; 10] = [
    "Wie war die Hausnummer und der Straßenname, in dem Sie als Kind gelebt haben?",
    "Was waren die letzten vier Ziffern der Telefonnummer Ihrer Kindheit?",
    "Welche Grundschule haben Sie besucht?",
    "In welcher Stadt war Ihr erster Vollzeitjob?",
    "In welcher Stadt haben Sie Ihren Ehepartner/Partner getroffen?",
    "Wie lautet der zweite Vorname Ihres ältesten Kindes?",
    "Was sind die letzten fünf Ziffern Ihrer Führerscheinnummer?",
    "Wie lautet der Mädchenname Ihrer Großmutter (mütterlicherseits)?",
    "Wie lautet der Mädchenname der Mutter Ihres Ehepartners oder Ihrer Partnerin?",
    "In welcher Stadt lernten sich deine Mutter und dein Vater kennen?",
];

const RESEARCH_INTERESTS: [&str; 3] = ["VR", "AR", "AV"];

#[derive(Debug, Deserialize)]
pub struct LangParams {
    pub lang: Option<String>,
}

/// The predefined security questions, English by default.
#[utoipa::path(
    get,
    path = "/meta/security-questions",
    tag = "meta",
    params(("lang" = Option<String>, Query, description = "Language, `en` or `de`")),
    responses(
        (status = 200, description = "Predefined security questions", body = [String])
    )
)]
pub async fn security_questions(
    Query(params): Query<LangParams>,
) -> Json<ApiResponse<Vec<&'static str>>> {
    let questions = match params.lang.as_deref() {
        Some("de") => SECURITY_QUESTIONS_DE,
        _ => SECURITY_QUESTIONS_EN,
    };
    Json(api_success(questions.to_vec()))
}

/// The predefined research-interest tag suggestions.
#[utoipa::path(
    get,
    path = "/meta/research-interests",
    tag = "meta",
    responses(
        (status = 200, description = "Suggested tags", body = [String])
    )
)]
pub async fn research_interests() -> Json<ApiResponse<Vec<&'static str>>> {
    Json(api_success(RESEARCH_INTERESTS.to_vec()))
}
