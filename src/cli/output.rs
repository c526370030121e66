use console::{style, Color};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;

use crate::ai::{DiscoveryResult, FaultKind, PredictError, PredictionResponse};

pub struct OutputFormatter {
    use_colors: bool,
    pretty_json: bool,
}

/// Stderr spinner shown while a request is outstanding.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "]),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    pub fn stop(self) {
        self.bar.finish_and_clear();
    }
}

impl OutputFormatter {
    pub fn new(use_colors: bool, pretty_json: bool) -> Self {
        Self {
            use_colors,
            pretty_json,
        }
    }

    // ========================================================================
    // Responses
    // ========================================================================

    pub fn format_response(&self, response: &PredictionResponse, raw: bool) -> String {
        if !raw {
            if let Some(discovery) = response.discovery() {
                return self.format_discovery(&discovery);
            }
        }

        self.format_json(response.as_value())
    }

    pub fn format_json(&self, value: &Value) -> String {
        let rendered = if self.pretty_json {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        // A Value always serializes
        rendered.unwrap_or_else(|_| value.to_string())
    }

    fn format_discovery(&self, discovery: &DiscoveryResult) -> String {
        if !discovery.success {
            let reason = discovery
                .error
                .as_deref()
                .unwrap_or("service reported failure without a reason");
            return self.format_warning(&format!("Prediction unsuccessful: {reason}"));
        }

        if discovery.results.is_empty() {
            return self.format_info("No molecules returned.");
        }

        let mut output = String::new();
        let header = format!("{} molecule(s)", discovery.molecule_count());
        output.push_str(&self.style_text(&header, Color::Cyan));
        output.push_str("\n\n");

        for (i, molecule) in discovery.results.iter().enumerate() {
            let number = format!("{}. ", i + 1);
            output.push_str(&self.style_text(&number, Color::Cyan));
            output.push_str(&self.style_text(
                molecule.smiles.as_deref().unwrap_or("<no SMILES>"),
                Color::Green,
            ));
            output.push('\n');

            let props = &molecule.properties;
            let line = format!(
                "   pIC50: {}  logP: {}  atoms: {}",
                format_number(props.pic50),
                format_number(props.log_p),
                format_number(props.atom_count)
            );
            output.push_str(&self.style_text(&line, Color::Blue));
            output.push('\n');

            if let Some(justification) = &molecule.justification {
                output.push_str(&format!("   {justification}\n"));
            }

            if i < discovery.results.len() - 1 {
                output.push('\n');
            }
        }

        output
    }

    // ========================================================================
    // Faults
    // ========================================================================

    /// Message for a failed call, worded by fault kind.
    pub fn format_fault(&self, error: &PredictError) -> String {
        let headline = match error.kind() {
            FaultKind::Transport => "Prediction server unreachable",
            FaultKind::Service => "Prediction server rejected the input",
            FaultKind::Decode => "Unexpected response from prediction server",
            FaultKind::Timeout => "Prediction request timed out",
            FaultKind::Cancelled => "Prediction cancelled",
            FaultKind::Config => "Invalid request",
        };

        let mut message = format!("{headline}: {error}");
        if let Some(body) = error.service_body() {
            message.push_str(&format!("\n{}", self.format_json(body)));
        }
        if let PredictError::Decode { body, .. } = error {
            message.push_str(&format!("\nBody: {}", truncate(body, 200)));
        }

        self.format_error(&message)
    }

    pub fn format_error(&self, message: &str) -> String {
        format!("{} {}", self.style_text("Error:", Color::Red), message)
    }

    pub fn format_success(&self, message: &str) -> String {
        format!("{} {}", self.style_text("✓", Color::Green), message)
    }

    pub fn format_warning(&self, message: &str) -> String {
        format!("{} {}", self.style_text("⚠", Color::Yellow), message)
    }

    pub fn format_info(&self, message: &str) -> String {
        format!("{} {}", self.style_text("ℹ", Color::Blue), message)
    }

    fn style_text(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            style(text).fg(color).to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(true, true)
    }
}

fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    fn plain() -> OutputFormatter {
        OutputFormatter::new(false, false)
    }

    #[test]
    fn test_opaque_response_prints_json() {
        let response = PredictionResponse::new(json!({"label": "positive", "score": 0.87}));
        assert_eq!(
            plain().format_response(&response, false),
            r#"{"label":"positive","score":0.87}"#
        );
    }

    #[test]
    fn test_discovery_listing() {
        let response = PredictionResponse::new(json!({
            "success": true,
            "results": [{
                "smiles": "CCO",
                "justification": "small and polar",
                "image": null,
                "properties": {"pIC50": 6.25, "logP": null, "atom_count": 9}
            }],
            "count": 1
        }));

        let output = plain().format_response(&response, false);
        assert!(output.starts_with("1 molecule(s)"));
        assert!(output.contains("1. CCO"));
        assert!(output.contains("pIC50: 6.25  logP: n/a  atoms: 9"));
        assert!(output.contains("small and polar"));
    }

    #[test]
    fn test_raw_skips_discovery_listing() {
        let response = PredictionResponse::new(json!({"success": true, "results": []}));
        assert_eq!(
            plain().format_response(&response, true),
            r#"{"success":true,"results":[]}"#
        );
    }

    #[test]
    fn test_unsuccessful_discovery() {
        let response = PredictionResponse::new(json!({
            "success": false,
            "error": "agent failed",
            "results": []
        }));
        assert_eq!(
            plain().format_response(&response, false),
            "⚠ Prediction unsuccessful: agent failed"
        );
    }

    #[test]
    fn test_fault_messages_by_kind() {
        let formatter = plain();

        let service = PredictError::Service {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: Some(json!({"detail": "bad input"})),
        };
        let output = formatter.format_fault(&service);
        assert!(output.starts_with("Error: Prediction server rejected the input"));
        assert!(output.contains(r#"{"detail":"bad input"}"#));

        let decode = PredictError::Decode {
            source: serde_json::from_str::<Value>("oops").unwrap_err(),
            body: "oops".to_string(),
        };
        let output = formatter.format_fault(&decode);
        assert!(output.starts_with("Error: Unexpected response"));
        assert!(output.ends_with("Body: oops"));

        let timeout = PredictError::Timeout(Duration::from_secs(2));
        assert!(formatter
            .format_fault(&timeout)
            .starts_with("Error: Prediction request timed out"));
    }

    #[test]
    fn test_truncate_long_body() {
        let long = "x".repeat(300);
        let cut = truncate(&long, 200);
        assert_eq!(cut.chars().count(), 201);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate("short", 200), "short");
    }
}
