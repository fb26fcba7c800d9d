//! Cultivar: agro-environmental prediction engine in pure Rust.
//!
//! Cultivar predicts near-term environmental conditions (temperature,
//! humidity, rainfall, air quality) from a four-feature weather snapshot
//! and turns those predictions into agricultural risk alerts and
//! crop-suitability recommendations. Temperature is estimated by a
//! three-role ensemble (linear, forest, boosted) blended with fixed
//! weights; the other targets use single regressors.
//!
//! # Quick Start
//!
//! ```
//! use cultivar::advisor;
//! use cultivar::risk::{self, Severity};
//! use cultivar::store::TemperaturePrediction;
//! use cultivar::weather::FeatureVector;
//!
//! // Crop advice is a pure table lookup plus threshold rules
//! let (recommendations, score) = advisor::recommend("rice", 28.0, 75.0);
//! assert_eq!(recommendations.len(), 2);
//! assert_eq!(score, 100.0);
//!
//! // Risk rules evaluate a prediction against current conditions
//! let prediction = TemperaturePrediction { value: 36.5, confidence: 95.8 };
//! let features = FeatureVector::new(36.5, 75.0, 1013.0, 12.0);
//! let alerts = risk::assess(&prediction, &features, &[]);
//! assert_eq!(alerts[0].severity, Severity::High);
//! ```
//!
//! Model-backed prediction goes through [`engine::ForecastEngine`], which
//! loads a saved model store or trains one on the deterministic synthetic
//! corpus at startup.
//!
//! # Modules
//!
//! - [`primitives`]: Core Vector and Matrix types
//! - [`traits`]: Estimator and Transformer capability traits
//! - [`metrics`]: Regression evaluation metrics
//! - [`preprocessing`]: Feature normalization (StandardScaler)
//! - [`linear_model`]: OLS linear regression
//! - [`tree`]: Decision tree, random forest, and gradient boosting regressors
//! - [`ensemble`]: The three-role weighted temperature blend
//! - [`synthetic`]: Deterministic training corpus generation
//! - [`store`]: The trained model store with load/save
//! - [`weather`]: Input boundary types, feature extraction, forecast sampling
//! - [`risk`]: Agricultural risk assessment rules
//! - [`advisor`]: Crop requirement table and suitability scoring
//! - [`engine`]: The process-lifetime request facade

pub mod advisor;
pub mod engine;
pub mod ensemble;
pub mod error;
pub mod linear_model;
pub mod metrics;
pub mod prelude;
pub mod preprocessing;
pub mod primitives;
pub mod risk;
pub mod store;
pub mod synthetic;
pub mod traits;
pub mod tree;
pub mod weather;

pub use error::{CultivarError, Result};
pub use primitives::{Matrix, Vector};
pub use traits::{Estimator, Transformer};
