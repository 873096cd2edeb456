//! Presentation of an analysis report. No computation, filtering or sorting:
//! everything is shown in the order the backend sent it.

use edupanel_common::{AnalysisReport, CriticalStudent, SubjectAnalysis};
use serde::Serialize;

pub const NO_UNDER_PERFORMING: &str = "No under-performing students found";
pub const NO_CRITICAL_CASES: &str = "No critical cases";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub under_performing: Vec<String>,
    pub under_performing_placeholder: Option<&'static str>,
    pub subjects: Vec<SubjectView>,
    pub insights: Option<InsightsView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectView {
    pub name: String,
    /// Empty when the backend sent no class average.
    pub class_avg: String,
    pub critical: Vec<String>,
    pub critical_placeholder: Option<&'static str>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightsView {
    pub method: Option<String>,
    pub factors: Vec<String>,
}

impl ReportView {
    pub fn from_report(report: &AnalysisReport) -> Self {
        let under_performing_placeholder =
            report.under_performing.is_empty().then_some(NO_UNDER_PERFORMING);

        let subjects = report
            .subject_analysis
            .iter()
            .map(|(name, analysis)| SubjectView::new(name, analysis))
            .collect();

        let insights = match (&report.analysis_metadata, &report.model_metrics) {
            (None, None) => None,
            (metadata, metrics) => Some(InsightsView {
                method: metadata.as_ref().map(|m| method_label(&m.method_used)),
                factors: metrics
                    .iter()
                    .flat_map(|m| m.feature_importances.iter())
                    .map(|(factor, weight)| importance_label(factor, *weight))
                    .collect(),
            }),
        };

        Self {
            under_performing: report.under_performing.clone(),
            under_performing_placeholder,
            subjects,
            insights,
        }
    }
}

impl SubjectView {
    fn new(name: &str, analysis: &SubjectAnalysis) -> Self {
        let critical: Vec<String> = analysis.critical_students.iter().map(critical_label).collect();
        Self {
            name: name.to_string(),
            class_avg: analysis.class_avg.map(format_class_avg).unwrap_or_default(),
            critical_placeholder: critical.is_empty().then_some(NO_CRITICAL_CASES),
            critical,
            recommendations: analysis.recommendations.clone().unwrap_or_default(),
        }
    }
}

/// "Bob (Avg: 55.3)" — average score to exactly one decimal place.
pub fn critical_label(student: &CriticalStudent) -> String {
    format!("{} (Avg: {:.1})", student.student, student.avg_score)
}

/// Class averages are shown as received (72.5 → "72.5", 72.0 → "72").
pub fn format_class_avg(avg: f64) -> String {
    avg.to_string()
}

pub fn method_label(method: &str) -> String {
    format!("Method: {method}")
}

/// Importance weight as a percentage with one decimal.
pub fn importance_label(factor: &str, weight: f64) -> String {
    format!("{}: {:.1}%", factor, weight * 100.0)
}
