use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Risk threshold above which an ignition date is forecast.
const HIGH_RISK_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub predicted_ignition_date: Option<NaiveDate>,
    pub risk_score: f64,
    pub warning: &'static str,
}

/// Placeholder linear heuristic standing in for a future model. Risk scales
/// linearly from 40°C to 80°C; at or above the threshold the forecast is a
/// fixed two days out. Pure function, no storage access.
pub fn predict_ignition_risk(current_temp: f64, current_date: NaiveDate) -> Prediction {
    let risk_score = ((current_temp - 40.0) / 40.0).clamp(0.0, 1.0);
    let risk_score = (risk_score * 1000.0).round() / 1000.0;

    if risk_score >= HIGH_RISK_THRESHOLD {
        Prediction {
            predicted_ignition_date: Some(current_date + Duration::days(2)),
            risk_score,
            warning: "high risk",
        }
    } else {
        Prediction {
            predicted_ignition_date: None,
            risk_score,
            warning: "low risk",
        }
    }
}
