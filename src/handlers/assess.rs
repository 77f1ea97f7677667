//! Assessment handlers: the HTML form flow and the JSON API

use std::collections::HashMap;

use axum::{
    body::{Body, Bytes},
    extract::{rejection::JsonRejection, FromRequest, Request, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};

use crate::logic::pipeline::assess;
use crate::models::{Assessment, PatientForm};
use crate::views::{render_form, render_page, render_result};
use crate::{AppError, AppResult, AppState};

fn initial_form(state: &AppState) -> PatientForm {
    PatientForm {
        threshold: state.config.threshold.base_threshold,
        ..Default::default()
    }
}

fn form_page(state: &AppState, form: &PatientForm, error: Option<&str>) -> Html<String> {
    Html(render_page(&render_form(form, &state.config.threshold, error)))
}

/// Empty form with default values
pub async fn index(State(state): State<AppState>) -> Html<String> {
    form_page(&state, &initial_form(&state), None)
}

/// Rebuild a request around an already-buffered body so it can be decoded twice
fn replay(headers: &HeaderMap, body: &Bytes) -> Request {
    let mut request = Request::new(Body::from(body.clone()));
    *request.method_mut() = axum::http::Method::POST;
    *request.headers_mut() = headers.clone();
    request
}

/// Form submission: the form again, followed by the result
pub async fn predict(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let form = match Form::<PatientForm>::from_request(replay(&headers, &body), &()).await {
        Ok(Form(form)) => form,
        Err(rejection) => {
            let message = rejection.body_text();
            tracing::debug!("Rejected form: {}", message);

            // Keep whatever the user typed that still parses
            let submitted =
                Form::<HashMap<String, String>>::from_request(replay(&headers, &body), &())
                    .await
                    .map(|Form(pairs)| pairs)
                    .unwrap_or_default();
            let form = initial_form(&state).with_submitted(&submitted);

            let page = form_page(&state, &form, Some(&message));
            return (StatusCode::BAD_REQUEST, page).into_response();
        }
    };

    if let Err(message) = form.check() {
        tracing::debug!("Invalid form values: {}", message);
        let page = form_page(&state, &form, Some(&message));
        return (StatusCode::UNPROCESSABLE_ENTITY, page).into_response();
    }

    let assessment = assess(&state.model, &form, &state.config.heart_age);
    tracing::info!(
        probability = assessment.prediction.probability,
        label = assessment.prediction.label,
        threshold = form.threshold,
        "Prediction served"
    );

    let body = format!(
        "{}{}",
        render_form(&form, &state.config.threshold, None),
        render_result(&form, &assessment)
    );
    Html(render_page(&body)).into_response()
}

/// Same pipeline, returning the full assessment as JSON
pub async fn predict_json(
    State(state): State<AppState>,
    payload: Result<Json<PatientForm>, JsonRejection>,
) -> AppResult<Json<Assessment>> {
    let Json(form) = payload?;
    form.check().map_err(AppError::ValidationError)?;

    let assessment = assess(&state.model, &form, &state.config.heart_age);
    tracing::info!(
        probability = assessment.prediction.probability,
        label = assessment.prediction.label,
        "API prediction served"
    );

    Ok(Json(assessment))
}
