// src/services/reconcile.rs

//! Merges reference table and authority results into one verdict.

use chrono::{DateTime, Utc};

use crate::models::{LocalClassification, PhoneNumber, RemoteClassification, Verdict};

/// Burner decision with authority precedence.
///
/// A successful authority answer with a line type decides, burner or not.
/// The reference table's burner flag is used only when the authority call
/// failed or returned no line type.
pub fn is_burner(local: &LocalClassification, remote: &RemoteClassification) -> bool {
    if remote.is_decisive() {
        return remote.is_burner();
    }
    local.success() && local.is_burner()
}

/// Build a verdict from both sub-results.
pub fn reconcile(
    phone: PhoneNumber,
    local: LocalClassification,
    remote: RemoteClassification,
    timestamp: DateTime<Utc>,
) -> Verdict {
    Verdict {
        is_burner: is_burner(&local, &remote),
        phone,
        local,
        remote,
        timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LocalLabel, LocalMatch, RemoteMatch, Source};

    fn local(label: LocalLabel) -> LocalClassification {
        LocalClassification::Success(LocalMatch::new(
            "985-267",
            Some("SOME CARRIER".to_string()),
            label,
        ))
    }

    fn remote(line_type: &str) -> RemoteClassification {
        RemoteClassification::Success(RemoteMatch::from_line_type(
            "+19852679258",
            Some("Carrier".to_string()),
            Some(line_type.to_string()),
        ))
    }

    fn verdict(local: LocalClassification, remote: RemoteClassification) -> Verdict {
        let phone = PhoneNumber::parse("9852679258").unwrap();
        reconcile(phone, local, remote, Utc::now())
    }

    #[test]
    fn remote_mobile_overrides_local_burner() {
        let v = verdict(local(LocalLabel::BurnerVoip), remote("mobile"));
        assert!(!v.is_burner);
        assert!(v.sources_disagree());
        assert_eq!(v.decided_by(), Source::Remote);
    }

    #[test]
    fn remote_failure_falls_back_to_local() {
        let v = verdict(
            local(LocalLabel::BurnerVoip),
            RemoteClassification::failure("HTTP 401"),
        );
        assert!(v.is_burner);
        assert_eq!(v.decided_by(), Source::Local);
        assert!(!v.sources_disagree());
    }

    #[test]
    fn remote_voip_overrides_local_mobile() {
        let v = verdict(local(LocalLabel::RealMobile), remote("nonFixedVoip"));
        assert!(v.is_burner);
        assert_eq!(v.decided_by(), Source::Remote);
    }

    #[test]
    fn both_negative_is_not_burner() {
        let v = verdict(local(LocalLabel::LandlineRegional), remote("landline"));
        assert!(!v.is_burner);
        assert!(!v.sources_disagree());
    }

    #[test]
    fn local_failure_with_remote_negative() {
        let v = verdict(LocalClassification::failure("missing table"), remote("mobile"));
        assert!(!v.is_burner);
        assert_eq!(v.decided_by(), Source::Remote);
    }

    #[test]
    fn remote_without_line_type_defers_to_local() {
        let unknown = RemoteClassification::Success(RemoteMatch::from_line_type(
            "+19852679258",
            None,
            None,
        ));
        let v = verdict(local(LocalLabel::BurnerVoip), unknown);
        assert!(v.is_burner);
        assert_eq!(v.decided_by(), Source::Local);
    }

    #[test]
    fn verdict_keeps_both_sub_results() {
        let l = local(LocalLabel::NotFound);
        let r = remote("fixedVoip");
        let v = verdict(l.clone(), r.clone());
        assert_eq!(v.local, l);
        assert_eq!(v.remote, r);
        assert_eq!(v.phone.e164, "+19852679258");
    }
}
