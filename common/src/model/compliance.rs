use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three acknowledgments an operator must give before polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceFlag {
    Terms,
    DataProtection,
    PurposeLimitation,
}

impl ComplianceFlag {
    pub const ALL: [ComplianceFlag; 3] = [
        ComplianceFlag::Terms,
        ComplianceFlag::DataProtection,
        ComplianceFlag::PurposeLimitation,
    ];
}

impl fmt::Display for ComplianceFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComplianceFlag::Terms => "terms",
            ComplianceFlag::DataProtection => "data_protection",
            ComplianceFlag::PurposeLimitation => "purpose_limitation",
        };
        f.write_str(label)
    }
}

/// The checkbox state of a single approval attempt.
///
/// A fresh acknowledgment has every flag cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceAcknowledgment {
    pub terms_accepted: bool,
    pub data_protection_accepted: bool,
    pub purpose_limitation_accepted: bool,
}

impl ComplianceAcknowledgment {
    pub fn is_set(&self, flag: ComplianceFlag) -> bool {
        match flag {
            ComplianceFlag::Terms => self.terms_accepted,
            ComplianceFlag::DataProtection => self.data_protection_accepted,
            ComplianceFlag::PurposeLimitation => self.purpose_limitation_accepted,
        }
    }

    /// Flips exactly one flag.
    pub fn toggle(&mut self, flag: ComplianceFlag) {
        let slot = match flag {
            ComplianceFlag::Terms => &mut self.terms_accepted,
            ComplianceFlag::DataProtection => &mut self.data_protection_accepted,
            ComplianceFlag::PurposeLimitation => &mut self.purpose_limitation_accepted,
        };
        *slot = !*slot;
    }

    pub fn all_accepted(&self) -> bool {
        self.missing().is_empty()
    }

    /// Flags that are still unchecked, in declaration order.
    pub fn missing(&self) -> Vec<ComplianceFlag> {
        ComplianceFlag::ALL
            .into_iter()
            .filter(|flag| !self.is_set(*flag))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_only_the_named_flag() {
        let mut ack = ComplianceAcknowledgment::default();
        ack.toggle(ComplianceFlag::DataProtection);
        assert!(ack.data_protection_accepted);
        assert!(!ack.terms_accepted);
        assert!(!ack.purpose_limitation_accepted);

        ack.toggle(ComplianceFlag::DataProtection);
        assert_eq!(ack, ComplianceAcknowledgment::default());
    }

    #[test]
    fn missing_lists_unchecked_flags() {
        let mut ack = ComplianceAcknowledgment::default();
        ack.toggle(ComplianceFlag::Terms);
        assert_eq!(
            ack.missing(),
            vec![ComplianceFlag::DataProtection, ComplianceFlag::PurposeLimitation]
        );
        ack.toggle(ComplianceFlag::DataProtection);
        ack.toggle(ComplianceFlag::PurposeLimitation);
        assert!(ack.all_accepted());
    }
}
