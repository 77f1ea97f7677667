//! Input form and reference guide

use super::page::escape;
use crate::logic::model::ThresholdConfig;
use crate::models::{Categorical, PatientForm};

fn select<C: Categorical + PartialEq>(name: &str, label: &str, current: C) -> String {
    let options: String = C::ALL
        .iter()
        .map(|choice| {
            let selected = if *choice == current { " selected" } else { "" };
            format!(
                r#"<option value="{value}"{selected}>{value}</option>"#,
                value = escape(choice.label()),
                selected = selected
            )
        })
        .collect();

    format!(
        r#"<label for="{name}">{label}</label><select id="{name}" name="{name}">{options}</select>"#,
        name = name,
        label = label,
        options = options
    )
}

fn number(name: &str, label: &str, value: String, bounds: &str) -> String {
    format!(
        r#"<label for="{name}">{label}</label><input type="number" id="{name}" name="{name}" value="{value}"{bounds} required>"#,
        name = name,
        label = label,
        value = value,
        bounds = bounds
    )
}

fn vessels(current: u8) -> String {
    let options: String = (0..=3u8)
        .map(|n| {
            let selected = if n == current { " selected" } else { "" };
            format!(r#"<option value="{n}"{selected}>{n}</option>"#, n = n, selected = selected)
        })
        .collect();
    format!(
        r#"<label for="ca">🔍 Major Vessels (0–3)</label><select id="ca" name="ca">{}</select>"#,
        options
    )
}

/// The assessment form, pre-filled with `form`
pub fn render_form(form: &PatientForm, threshold: &ThresholdConfig, error: Option<&str>) -> String {
    let error_html = error
        .map(|msg| format!(r#"<div class="error">❌ {}</div>"#, escape(msg)))
        .unwrap_or_default();

    let left = [
        number("age", "🧓 Age", form.age.to_string(), r#" min="5" max="99" step="1""#),
        select("sex", "🧬 Sex", form.sex),
        select("cp", "🫀 Chest Pain Type", form.cp),
        number("trestbps", "🩸 Resting Blood Pressure", form.trestbps.to_string(), r#" min="0" step="any""#),
        number("chol", "🧪 Serum Cholesterol (mg/dl)", form.chol.to_string(), r#" min="0" step="any""#),
        select("fbs", "🩺 Fasting Blood Sugar &gt; 120 mg/dl?", form.fbs),
        select("restecg", "🫀 ECG Results", form.restecg),
    ]
    .concat();

    let right = [
        number("thalach", "🫀 Max Heart Rate", form.thalach.to_string(), r#" min="50" max="220" step="1""#),
        select("exang", "🏃‍♂️ Exercise Induced Angina?", form.exang),
        number("oldpeak", "📉 Oldpeak (ST Depression)", form.oldpeak.to_string(), r#" step="any""#),
        select("slope", "📈 Slope of ST", form.slope),
        vessels(form.ca),
        select("thal", "🧬 Thalassemia", form.thal),
    ]
    .concat();

    format!(
        r#"{error_html}
<form method="post" action="/predict">
    <div class="columns">
        <div>{left}</div>
        <div>{right}</div>
    </div>
    <label for="threshold">🛠️ Adjust Risk Threshold: <output id="threshold-value">{value:.4}</output></label>
    <input type="range" id="threshold" name="threshold" min="{min}" max="{max}" step="{step}" value="{value}"
        oninput="document.getElementById('threshold-value').value = Number(this.value).toFixed(2)">
    <button type="submit">💡 Predict Now</button>
</form>
{guide}"#,
        error_html = error_html,
        left = left,
        right = right,
        min = threshold.min_threshold,
        max = threshold.max_threshold,
        step = threshold.step,
        value = form.threshold,
        guide = render_reference_guide(),
    )
}

/// Healthy ranges table shown under the form
pub fn render_reference_guide() -> &'static str {
    r#"<h3>ℹ️ Input Reference Guide</h3>
<div class="card guide">
    <table>
        <tr class="head"><th>🧪 Feature</th><th>✅ Healthy / Normal Range</th><th>📌 Notes</th></tr>
        <tr><td>Age</td><td>25 - 65</td><td>Heart risk increases with age</td></tr>
        <tr><td>Resting BP</td><td>90 - 130 mmHg</td><td>Above 130 = High BP</td></tr>
        <tr><td>Cholesterol</td><td>125 - 200 mg/dL</td><td>Above 240 = High Risk</td></tr>
        <tr><td>Max Heart Rate</td><td>100 - 190 bpm</td><td>Lower values may be concern</td></tr>
        <tr><td>Oldpeak</td><td>0 - 2</td><td>Higher indicates stress</td></tr>
        <tr><td>Fasting Sugar</td><td>No (&lt;= 120 mg/dL)</td><td>"Yes" = high sugar</td></tr>
    </table>
    <p style="margin-top:10px; font-size:12px;">⚠️ Always consult a healthcare provider for accurate medical advice.</p>
</div>"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChestPain;

    #[test]
    fn test_form_lists_every_choice() {
        let html = render_form(&PatientForm::default(), &ThresholdConfig::default(), None);
        for cp in ChestPain::ALL {
            assert!(html.contains(&format!(r#"<option value="{}""#, cp.label())));
        }
        assert!(html.contains(r#"name="threshold" min="0.1" max="0.9" step="0.0001" value="0.5267""#));
        assert!(html.contains("Input Reference Guide"));
        assert!(!html.contains(r#"class="error""#));
    }

    #[test]
    fn test_form_keeps_selection() {
        let form = PatientForm { cp: ChestPain::Asymptomatic, ca: 2, ..Default::default() };
        let html = render_form(&form, &ThresholdConfig::default(), None);
        assert!(html.contains(r#"<option value="Asymptomatic" selected>"#));
        assert!(html.contains(r#"<option value="2" selected>"#));
    }

    #[test]
    fn test_integer_fields_step_by_one() {
        let html = render_form(&PatientForm::default(), &ThresholdConfig::default(), None);
        assert!(html.contains(r#"name="age" value="50" min="5" max="99" step="1""#));
        assert!(html.contains(r#"name="thalach" value="150" min="50" max="220" step="1""#));
        assert!(html.contains(r#"name="chol" value="200" min="0" step="any""#));
        assert!(html.contains(r#"name="oldpeak" value="0" step="any""#));
    }

    #[test]
    fn test_form_shows_escaped_error() {
        let html = render_form(&PatientForm::default(), &ThresholdConfig::default(), Some("age <5"));
        assert!(html.contains("age &lt;5"));
    }
}
