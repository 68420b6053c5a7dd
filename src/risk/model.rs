use anyhow::Context;
use serde::Deserialize;

/// Number of input features, in wire order: temperature, humidity,
/// pressure, rainfall, wind speed.
pub const FEATURE_COUNT: usize = 5;

/// Binary flood classifier loaded from a JSON artifact at startup. The
/// artifact carries the coefficients of a logistic model trained offline;
/// class label 1 means "flood".
#[derive(Debug, Clone, Deserialize)]
pub struct FloodModel {
    weights: [f64; FEATURE_COUNT],
    bias: f64,
}

impl FloodModel {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read flood model artifact {path}"))?;
        let model: FloodModel =
            serde_json::from_str(&raw).context("parse flood model artifact")?;
        Ok(model)
    }

    /// Predicted class label, or `None` when the inputs put the model
    /// outside numeric range. Callers treat `None` as "no model signal".
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Option<u8> {
        let z = self
            .weights
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;
        if !z.is_finite() {
            return None;
        }
        let probability = 1.0 / (1.0 + (-z).exp());
        Some(u8::from(probability >= 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rain_heavy_model() -> FloodModel {
        // Positive weight on rainfall only; fires past ~40mm.
        serde_json::from_str(r#"{"weights": [0.0, 0.0, 0.0, 0.25, 0.0], "bias": -10.0}"#).unwrap()
    }

    #[test]
    fn artifact_parses_and_predicts_deterministically() {
        let model = rain_heavy_model();
        let wet = [25.0, 90.0, 1000.0, 80.0, 5.0];
        let dry = [25.0, 40.0, 1015.0, 0.0, 2.0];
        assert_eq!(model.predict(&wet), Some(1));
        assert_eq!(model.predict(&dry), Some(0));
        // Stateless: repeated calls agree.
        assert_eq!(model.predict(&wet), model.predict(&wet));
    }

    #[test]
    fn non_finite_inputs_yield_no_signal() {
        let model = rain_heavy_model();
        assert_eq!(model.predict(&[f64::NAN, 0.0, 0.0, 0.0, 0.0]), None);
        assert_eq!(model.predict(&[0.0, 0.0, 0.0, f64::INFINITY, 0.0]), None);
    }

    #[test]
    fn wrong_arity_artifact_is_rejected() {
        let err = serde_json::from_str::<FloodModel>(r#"{"weights": [1.0, 2.0], "bias": 0.0}"#);
        assert!(err.is_err());
    }
}
