//! Yearly K-Means analysis report, as produced by the external analysis service.
//! Nothing here computes anything; the types only mirror the response body.

use serde::{Deserialize, Serialize};
use crate::ordered::ordered_map;

/// Body POSTed to the yearly analysis endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub under_performing: Vec<String>,
    /// Subject name → per-subject analysis, in server order.
    #[serde(with = "ordered_map")]
    pub subject_analysis: Vec<(String, SubjectAnalysis)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_metrics: Option<ModelMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_metadata: Option<AnalysisMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_avg: Option<f64>,
    #[serde(default)]
    pub critical_students: Vec<CriticalStudent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalStudent {
    pub student: String,
    pub avg_score: f64,
    pub last_3_avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    /// Feature name → importance weight in [0, 1], in server order.
    #[serde(with = "ordered_map")]
    pub feature_importances: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub method_used: String,
}
