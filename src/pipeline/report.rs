// src/pipeline/report.rs

//! Plain-text rendering of verdicts.

use std::fmt::Write;

use crate::models::{LocalClassification, RemoteClassification, Verdict};

const NOT_AVAILABLE: &str = "N/A";

/// Multi-line report for one verdict.
pub fn render_verdict(verdict: &Verdict) -> String {
    let mut out = String::new();
    let status = if verdict.is_burner {
        "BURNER / VIRTUAL NUMBER"
    } else {
        "LEGITIMATE CARRIER LINE"
    };

    let _ = writeln!(out, "{}  {}", verdict.phone, status);
    let _ = writeln!(out, "  Analyzed: {}", verdict.timestamp.to_rfc3339());

    let _ = writeln!(out, "  Reference table:");
    match &verdict.local {
        LocalClassification::Success(m) => {
            let _ = writeln!(out, "    NPA-NXX:        {}", m.exchange_key);
            let _ = writeln!(
                out,
                "    Provider:       {}",
                m.provider.as_deref().unwrap_or("Unknown")
            );
            let _ = writeln!(out, "    Classification: {}", m.label);
        }
        LocalClassification::Failure { reason } => {
            let _ = writeln!(out, "    Error: {reason}");
        }
    }

    let _ = writeln!(out, "  Line-type authority:");
    match &verdict.remote {
        RemoteClassification::Success(m) => {
            let _ = writeln!(
                out,
                "    Carrier:        {}",
                m.carrier_name.as_deref().unwrap_or(NOT_AVAILABLE)
            );
            let _ = writeln!(
                out,
                "    Line type:      {}",
                m.line_type.as_deref().unwrap_or(NOT_AVAILABLE)
            );
            let _ = writeln!(out, "    Classification: {}", m.label);
        }
        RemoteClassification::Failure { reason } => {
            let _ = writeln!(out, "    Error: {reason}");
        }
    }

    if verdict.sources_disagree() {
        let _ = writeln!(
            out,
            "  Note: sources disagree; the line-type authority takes precedence"
        );
    }

    out
}

/// One line per history entry, prefixed with its position.
pub fn render_history(history: &[Verdict]) -> String {
    if history.is_empty() {
        return "No analyses recorded.\n".to_string();
    }

    let mut out = String::new();
    for (index, verdict) in history.iter().enumerate() {
        let local = verdict
            .local
            .matched()
            .map(|m| m.label.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let remote = verdict
            .remote
            .matched()
            .map(|m| m.label.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let _ = writeln!(
            out,
            "{:>3}  {}  {:<7}  local: {:<17}  remote: {:<14}  {}",
            index,
            verdict.phone,
            if verdict.is_burner { "BURNER" } else { "REAL" },
            local,
            remote,
            verdict.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocalLabel, LocalMatch, PhoneNumber, RemoteMatch};
    use crate::services::reconcile::reconcile;
    use chrono::Utc;

    fn disagreeing() -> Verdict {
        reconcile(
            PhoneNumber::parse("9852679258").unwrap(),
            LocalClassification::Success(LocalMatch::new(
                "985-267",
                Some("ONVOY, LLC - LA".to_string()),
                LocalLabel::BurnerVoip,
            )),
            RemoteClassification::Success(RemoteMatch::from_line_type(
                "+19852679258",
                Some("Verizon Wireless".to_string()),
                Some("mobile".to_string()),
            )),
            Utc::now(),
        )
    }

    #[test]
    fn test_render_verdict() {
        let text = render_verdict(&disagreeing());

        assert!(text.starts_with("+1 (985) 267-9258  LEGITIMATE CARRIER LINE"));
        assert!(text.contains("Provider:       ONVOY, LLC - LA"));
        assert!(text.contains("Classification: BURNER/VoIP"));
        assert!(text.contains("Classification: REAL MOBILE"));
        assert!(text.contains("sources disagree"));
    }

    #[test]
    fn test_render_failure() {
        let verdict = reconcile(
            PhoneNumber::parse("9852679258").unwrap(),
            LocalClassification::Success(LocalMatch::not_found("985-267")),
            RemoteClassification::failure("Authority error: HTTP 401"),
            Utc::now(),
        );
        let text = render_verdict(&verdict);

        assert!(text.contains("Provider:       Unknown"));
        assert!(text.contains("Classification: Not Found"));
        assert!(text.contains("Error: Authority error: HTTP 401"));
        assert!(!text.contains("disagree"));
    }

    #[test]
    fn test_render_history() {
        assert_eq!(render_history(&[]), "No analyses recorded.\n");

        let text = render_history(&[disagreeing(), disagreeing()]);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].trim_start().starts_with("0  +1 (985) 267-9258  REAL"));
        assert!(lines[1].trim_start().starts_with('1'));
    }
}
