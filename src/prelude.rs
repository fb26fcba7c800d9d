//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use cultivar::prelude::*;
//! ```

pub use crate::engine::ForecastEngine;
pub use crate::ensemble::{EnsembleWeights, TemperatureEnsemble};
pub use crate::error::{CultivarError, Result};
pub use crate::linear_model::LinearRegression;
pub use crate::metrics::{mae, mse, r_squared, rmse};
pub use crate::preprocessing::StandardScaler;
pub use crate::primitives::{Matrix, Vector};
pub use crate::store::{ModelStore, PredictionBundle};
pub use crate::traits::{Estimator, Transformer};
pub use crate::tree::{DecisionTreeRegressor, GradientBoostingRegressor, RandomForestRegressor};
pub use crate::weather::{FeatureVector, WeatherInput, WeatherSnapshot};
