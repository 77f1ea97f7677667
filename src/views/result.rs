//! Result section rendered under the form after a submission

use super::charts::{contribution_pie, probability_bar};
use super::page::escape;
use crate::models::{Assessment, Categorical, PatientForm};

/// Features shown in the attribution pie
pub const TOP_FEATURES: usize = 5;

pub fn render_result(form: &PatientForm, assessment: &Assessment) -> String {
    let prediction = &assessment.prediction;
    let risk_pct = prediction.probability * 100.0;
    let summary = &assessment.summary;
    let heart_age = &assessment.heart_age;

    let prediction_color = if prediction.is_at_risk() { "red" } else { "green" };
    let banner = if prediction.is_at_risk() {
        ("banner-risk", "red", "At Risk")
    } else {
        ("banner-healthy", "green", "Healthy")
    };

    let pie = contribution_pie(&assessment.attribution.top(TOP_FEATURES))
        .unwrap_or_else(|| "<p>No feature contributed to this prediction.</p>".to_string());

    let tips: String = assessment
        .health_tips
        .iter()
        .map(|tip| format!("<li>{}</li>", escape(tip)))
        .collect();

    format!(
        r#"<section class="results">
<p><b>🧠 Model Confidence Level:</b> {confidence}</p>

<h3>🧾 Personalized Summary</h3>
<div class="card summary">
    {tone}<br><br>
    {risk_note}<br>
    🧪 {chol_note}<br>
    🩸 {bp_note}
</div>

<h4 style="color:{heart_color};">🧓 Estimated Heart Age: <b>{heart_age} years</b></h4>

<div class="dashboard">
    <h3>📊 Summary Dashboard</h3>
    <ul>
        <li>✅ <b>Prediction:</b> <span style="color:{prediction_color};">{outcome}</span></li>
        <li>📉 <b>Risk Score:</b> {risk_pct:.2}%</li>
        <li>🧓 <b>Estimated Heart Age:</b> {heart_age} years</li>
        <li>🧪 <b>Cholesterol:</b> {chol} mg/dL</li>
        <li>🩸 <b>Resting Blood Pressure:</b> {trestbps} mmHg</li>
        <li>🫀 <b>Maximum Heart Rate:</b> {thalach} bpm</li>
    </ul>
</div>

<div class="card {banner_class}">
    <h3>🧠 Prediction: <span style="color:{banner_color};">{banner_text}</span></h3>
    <p>📊 <b>Risk Score:</b> {risk_pct:.2}%</p>
</div>

{bar}
{pie}

<h3>🩺 Health Tips Based on Your Profile</h3>
<ul>{tips}</ul>

{download}
</section>"#,
        confidence = assessment.confidence.label(),
        tone = escape(&summary.tone),
        risk_note = escape(&summary.risk_note),
        chol_note = escape(&summary.cholesterol_note),
        bp_note = escape(&summary.blood_pressure_note),
        heart_color = heart_age.color.css(),
        heart_age = heart_age.years,
        prediction_color = prediction_color,
        outcome = assessment.outcome,
        risk_pct = risk_pct,
        chol = form.chol,
        trestbps = form.trestbps,
        thalach = form.thalach,
        banner_class = banner.0,
        banner_color = banner.1,
        banner_text = banner.2,
        bar = probability_bar(prediction.probability),
        pie = pie,
        tips = tips,
        download = render_download(form),
    )
}

/// Re-posts the submitted values to the CSV endpoint
fn render_download(form: &PatientForm) -> String {
    let fields = [
        ("age", form.age.to_string()),
        ("sex", form.sex.label().to_string()),
        ("cp", form.cp.label().to_string()),
        ("trestbps", form.trestbps.to_string()),
        ("chol", form.chol.to_string()),
        ("fbs", form.fbs.label().to_string()),
        ("restecg", form.restecg.label().to_string()),
        ("thalach", form.thalach.to_string()),
        ("exang", form.exang.label().to_string()),
        ("oldpeak", form.oldpeak.to_string()),
        ("slope", form.slope.label().to_string()),
        ("ca", form.ca.to_string()),
        ("thal", form.thal.label().to_string()),
        ("threshold", form.threshold.to_string()),
    ];

    let hidden: String = fields
        .iter()
        .map(|(name, value)| {
            format!(r#"<input type="hidden" name="{}" value="{}">"#, name, escape(value))
        })
        .collect();

    format!(
        r#"<form method="post" action="/report">{}<button type="submit">📥 Download Report</button></form>"#,
        hidden
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::narrative::HeartAgeCoefficients;
    use crate::logic::pipeline::{assess, tests::stump_model};
    use crate::models::{RestingEcg, YesNo};

    #[test]
    fn test_result_sections_in_order() {
        let form = PatientForm { fbs: YesNo::No, ..Default::default() };
        let assessment = assess(&stump_model(), &form, &HeartAgeCoefficients::default());
        let html = render_result(&form, &assessment);

        let order = [
            "Model Confidence Level",
            "Personalized Summary",
            "Estimated Heart Age: <b>50 years</b>",
            "Summary Dashboard",
            "🧠 Prediction:",
            "Probability</text>",
            "Contributing Features",
            "Health Tips",
            "Download Report",
        ];
        let positions: Vec<usize> = order.iter().map(|s| html.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);

        assert!(html.contains("Healthy"));
        assert!(html.contains("33.33%"));
    }

    #[test]
    fn test_download_carries_labels() {
        let form = PatientForm { restecg: RestingEcg::StTAbnormality, ..Default::default() };
        let html = render_download(&form);
        assert!(html.contains(r#"name="restecg" value="Having ST-T wave abnormality""#));
        assert!(html.contains(r#"name="threshold" value="0.5267""#));
        assert!(html.contains(r#"action="/report""#));
    }
}
