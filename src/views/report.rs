//! CSV report download

use crate::logic::features::FEATURE_LAYOUT;
use crate::models::Assessment;

pub const REPORT_FILE_NAME: &str = "heart_disease_prediction.csv";

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One-row table: the encoded inputs plus the textual outcome
pub fn render_csv(assessment: &Assessment) -> String {
    let header: Vec<String> = FEATURE_LAYOUT
        .iter()
        .map(|name| csv_field(name))
        .chain(std::iter::once(csv_field("Prediction")))
        .collect();

    let row: Vec<String> = assessment
        .features
        .as_slice()
        .iter()
        .map(|value| csv_field(&value.to_string()))
        .chain(std::iter::once(csv_field(assessment.outcome)))
        .collect();

    format!("{}\n{}\n", header.join(","), row.join(","))
}
