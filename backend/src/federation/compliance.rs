use crate::error::FederationError;
use common::model::compliance::{ComplianceAcknowledgment, ComplianceFlag};

/// Proof that every compliance item was accepted for `target_id`.
///
/// Only [`ComplianceGate::submit`] creates one, so holding an `Approved` is
/// the only way to start polling a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approved {
    target_id: String,
}

impl Approved {
    pub fn target_id(&self) -> &str {
        &self.target_id
    }
}

/// An open approval attempt for one poll target.
#[derive(Debug)]
pub struct ComplianceGate {
    target_id: String,
    acknowledgment: ComplianceAcknowledgment,
}

impl ComplianceGate {
    /// Opens a gate for `target_id` with every flag cleared.
    pub fn begin(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            acknowledgment: ComplianceAcknowledgment::default(),
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn acknowledgment(&self) -> ComplianceAcknowledgment {
        self.acknowledgment
    }

    pub fn toggle(&mut self, flag: ComplianceFlag) -> ComplianceAcknowledgment {
        self.acknowledgment.toggle(flag);
        self.acknowledgment
    }

    /// Approves the target if all flags are set. A failed submit leaves every
    /// flag as it was so the operator can keep checking boxes.
    pub fn submit(&self) -> Result<Approved, FederationError> {
        let missing = self.acknowledgment.missing();
        if !missing.is_empty() {
            return Err(FederationError::IncompleteCompliance { missing });
        }
        Ok(Approved {
            target_id: self.target_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_succeeds_only_with_every_flag() {
        let mut gate = ComplianceGate::begin("route-1");
        for flag in ComplianceFlag::ALL {
            assert!(gate.submit().is_err());
            gate.toggle(flag);
        }
        let approved = gate.submit().unwrap();
        assert_eq!(approved.target_id(), "route-1");
    }

    #[test]
    fn any_single_missing_flag_is_rejected_without_clearing_the_others() {
        for unchecked in ComplianceFlag::ALL {
            let mut gate = ComplianceGate::begin("route-1");
            for flag in ComplianceFlag::ALL.into_iter().filter(|f| *f != unchecked) {
                gate.toggle(flag);
            }
            let before = gate.acknowledgment();

            match gate.submit() {
                Err(FederationError::IncompleteCompliance { missing }) => {
                    assert_eq!(missing, vec![unchecked])
                }
                other => panic!("expected incomplete compliance, got {:?}", other),
            }
            assert_eq!(gate.acknowledgment(), before);
        }
    }

    #[test]
    fn a_new_gate_starts_cleared() {
        let gate = ComplianceGate::begin("route-2");
        assert_eq!(gate.acknowledgment(), ComplianceAcknowledgment::default());
        assert_eq!(gate.target_id(), "route-2");
    }
}
