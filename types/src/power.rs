//! Power-up values exchanged between the round pipeline and the power rules.

use crate::roulette::{Color, Outcome};

/// What a power rule sees when it is asked to modify a round.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundContext {
    /// Length of the current color streak, counting this spin (always >= 1).
    pub streak: u32,
    pub color: Option<Color>,
    pub outcome: Outcome,
    pub base_payout: f64,
}

/// Raw effect returned by a power rule, before capping.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerEffect {
    pub multiplier: f64,
    pub extra_respins: u32,
    pub note: String,
}

impl PowerEffect {
    pub fn multiplier(multiplier: f64, note: impl Into<String>) -> Self {
        Self {
            multiplier,
            extra_respins: 0,
            note: note.into(),
        }
    }

    pub fn respins(extra_respins: u32, note: impl Into<String>) -> Self {
        Self {
            multiplier: 1.0,
            extra_respins,
            note: note.into(),
        }
    }
}

/// Modification applied to a single round's payout.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerModification {
    pub multiplier: f64,
    pub extra_respins: u32,
    pub active: bool,
    pub note: String,
    pub rule_name: Option<String>,
}

impl Default for PowerModification {
    fn default() -> Self {
        Self::identity()
    }
}

impl PowerModification {
    /// No modification: multiplier 1.0, no respins, inactive.
    pub fn identity() -> Self {
        Self {
            multiplier: 1.0,
            extra_respins: 0,
            active: false,
            note: String::new(),
            rule_name: None,
        }
    }

    /// Inactive modification built from a rule effect (activation is decided by the manager).
    pub fn from_effect(effect: PowerEffect) -> Self {
        Self {
            multiplier: effect.multiplier,
            extra_respins: effect.extra_respins,
            active: false,
            note: effect.note,
            rule_name: None,
        }
    }

    /// Final payout for a round given its base payout.
    ///
    /// A losing round (base payout 0) stays at 0 whatever the modification says.
    /// Each extra respin credits one more base payout on top of the multiplied amount.
    pub fn apply_to(&self, base_payout: f64) -> f64 {
        if base_payout <= 0.0 {
            return 0.0;
        }
        let mut payout = base_payout * self.multiplier;
        if self.extra_respins > 0 {
            payout += base_payout * f64::from(self.extra_respins);
        }
        payout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_leaves_payout_untouched() {
        let identity = PowerModification::identity();
        assert_eq!(identity.apply_to(20.0), 20.0);
        assert!(!identity.active);
        assert_eq!(identity.rule_name, None);
    }

    #[test]
    fn test_multiplier_and_respins_stack() {
        let modification = PowerModification {
            multiplier: 2.0,
            extra_respins: 1,
            active: true,
            note: "x2".to_string(),
            rule_name: Some("FlatMultiplier".to_string()),
        };
        // 20 * 2 + 20 * 1
        assert_eq!(modification.apply_to(20.0), 60.0);
    }

    #[test]
    fn test_losses_are_immune() {
        let modification = PowerModification {
            multiplier: 3.0,
            extra_respins: 4,
            active: true,
            note: String::new(),
            rule_name: None,
        };
        assert_eq!(modification.apply_to(0.0), 0.0);
    }
}
