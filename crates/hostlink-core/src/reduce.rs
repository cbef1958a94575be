// ── Verification state reduction ──
//
// Level-triggered: the new status is computed from the latest checks alone.
// Nothing from a previous status carries over.

use crate::model::VerificationStatus;

/// Latest ownership check from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipCheck {
    pub verified: bool,
}

/// Latest routing check from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingCheck {
    pub misconfigured: bool,
}

pub fn reduce(ownership: OwnershipCheck, routing: RoutingCheck) -> VerificationStatus {
    VerificationStatus::new(ownership.verified, !routing.misconfigured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fully_verified_iff_both_checks_pass() {
        for verified in [false, true] {
            for misconfigured in [false, true] {
                let s = reduce(OwnershipCheck { verified }, RoutingCheck { misconfigured });
                assert_eq!(s.ownership_verified(), verified);
                assert_eq!(s.routing_verified(), !misconfigured);
                assert_eq!(s.fully_verified(), verified && !misconfigured);
            }
        }
    }

    #[test]
    fn earlier_success_does_not_latch() {
        let before = reduce(
            OwnershipCheck { verified: true },
            RoutingCheck {
                misconfigured: false,
            },
        );
        assert!(before.fully_verified());

        let after = reduce(
            OwnershipCheck { verified: true },
            RoutingCheck {
                misconfigured: true,
            },
        );
        assert!(!after.routing_verified());
        assert!(!after.fully_verified());
    }
}
