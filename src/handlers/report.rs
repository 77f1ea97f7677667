//! CSV report handler

use axum::{
    extract::{rejection::FormRejection, State},
    http::header,
    response::IntoResponse,
    Form,
};

use crate::logic::pipeline::assess;
use crate::models::PatientForm;
use crate::views::{render_csv, REPORT_FILE_NAME};
use crate::{AppError, AppResult, AppState};

/// Re-run the submitted values and return them as a CSV attachment
pub async fn download(
    State(state): State<AppState>,
    submission: Result<Form<PatientForm>, FormRejection>,
) -> AppResult<impl IntoResponse> {
    let Form(form) = submission?;
    form.check().map_err(AppError::ValidationError)?;

    let assessment = assess(&state.model, &form, &state.config.heart_age);
    tracing::info!(label = assessment.prediction.label, "Report generated");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", REPORT_FILE_NAME),
            ),
        ],
        render_csv(&assessment),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::tests::test_app;

    fn report_request(body: &str) -> Request<Body> {
        Request::post("/report")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_report_download() {
        let body = "age=61&sex=Female&cp=Asymptomatic&trestbps=140&chol=260&fbs=Yes\
            &restecg=Having+ST-T+wave+abnormality&thalach=110&exang=Yes&oldpeak=2.5\
            &slope=Flat&ca=2&thal=Reversible+Defect&threshold=0.5";
        let response = test_app().oneshot(report_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"heart_disease_prediction.csv\""
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(
            csv,
            "age,sex,cp,trestbps,chol,fbs,restecg,thalach,exang,oldpeak,slope,ca,thal,Prediction\n\
             61,0,4,140,260,1,1,110,1,2.5,2,2,3,Likely to have heart disease\n"
        );
    }

    #[tokio::test]
    async fn test_report_rejects_invalid_values() {
        let body = "age=50&sex=Male&cp=Typical+Angina&trestbps=120&chol=200&fbs=No\
            &restecg=Normal&thalach=300&exang=No&oldpeak=0&slope=Upsloping&ca=0&thal=Normal";
        let response = test_app().oneshot(report_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
