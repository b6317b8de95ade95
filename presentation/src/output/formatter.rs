//! Output formatter trait

use crew_application::GameReport;

/// Trait for formatting game reports
pub trait OutputFormatter {
    /// Format the complete report: rounds, meetings and agents
    fn format(&self, report: &GameReport) -> String;

    /// Format as JSON
    fn format_json(&self, report: &GameReport) -> String;

    /// Format the result only (concise output)
    fn format_summary(&self, report: &GameReport) -> String;
}
