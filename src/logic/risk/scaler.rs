//! Feature Scaler
//!
//! Min-max hoặc standard normalization, fit theo cột trên training matrix.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerKind {
    /// (x - min) / (max - min)
    MinMax,
    /// (x - mean) / std
    Standard,
}

/// Per-column affine transform: (x - offset) / scale
#[derive(Debug, Clone)]
pub struct FittedScaler {
    pub kind: ScalerKind,
    offset: Array1<f64>,
    scale: Array1<f64>,
}

impl FittedScaler {
    pub fn fit(kind: ScalerKind, data: &Array2<f64>) -> EngineResult<Self> {
        if data.nrows() == 0 {
            return Err(EngineError::InsufficientData("scaler needs at least one row".into()));
        }

        let (offset, scale) = match kind {
            ScalerKind::MinMax => {
                let min = data.fold_axis(Axis(0), f64::INFINITY, |a, &b| a.min(b));
                let max = data.fold_axis(Axis(0), f64::NEG_INFINITY, |a, &b| a.max(b));
                (min.clone(), &max - &min)
            }
            ScalerKind::Standard => {
                let mean = data
                    .mean_axis(Axis(0))
                    .ok_or_else(|| EngineError::InsufficientData("empty matrix".into()))?;
                let std = data.std_axis(Axis(0), 0.0);
                (mean, std)
            }
        };

        // Constant column: leave the centred value unscaled
        let scale = scale.mapv(|s| if s.abs() < f64::EPSILON { 1.0 } else { s });

        Ok(Self { kind, offset, scale })
    }

    pub fn transform(&self, data: &Array2<f64>) -> Array2<f64> {
        (data - &self.offset) / &self.scale
    }

    pub fn transform_row(&self, row: ArrayView1<f64>) -> Array1<f64> {
        (&row - &self.offset) / &self.scale
    }
}
