use super::{CapPolicy, PowerRule, Trigger, TriggerPolicy};
use crate::casino::GameRng;
use powerspin_types::power::{PowerModification, RoundContext};
use thiserror::Error as ThisError;
use tracing::debug;

#[derive(Debug, Clone, ThisError, PartialEq)]
pub enum PowerError {
    #[error("rule {name} has invalid weight {weight} (must be finite and >= 0)")]
    InvalidWeight { name: String, weight: f64 },
}

/// A registered rule with its selection weight.
pub struct WeightedRule {
    rule: Box<dyn PowerRule>,
    name: String,
    weight: f64,
}

impl WeightedRule {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl std::fmt::Debug for WeightedRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightedRule")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish()
    }
}

/// Fires power rules on selected rounds.
///
/// Per round: the trigger policy decides whether anything fires, a rule is
/// drawn with probability proportional to its weight, its effect is passed
/// through the cap policy, and the result is marked active. Rounds where the
/// trigger stays quiet, or where no rule carries weight, get the identity
/// modification and do not count as activations.
pub struct PowerManager {
    rules: Vec<WeightedRule>,
    trigger: Box<dyn TriggerPolicy>,
    cap: Box<dyn CapPolicy>,
    activations: u64,
}

impl Default for PowerManager {
    fn default() -> Self {
        Self::new(Trigger::Never, super::Cap::Uncapped)
    }
}

impl PowerManager {
    pub fn new(trigger: impl TriggerPolicy + 'static, cap: impl CapPolicy + 'static) -> Self {
        Self {
            rules: Vec::new(),
            trigger: Box::new(trigger),
            cap: Box::new(cap),
            activations: 0,
        }
    }

    /// Register a rule under its own name.
    pub fn add_rule(&mut self, rule: impl PowerRule + 'static, weight: f64) -> Result<(), PowerError> {
        self.add_named_rule(Box::new(rule), None, weight)
    }

    /// Register a boxed rule, optionally overriding the name recorded on activation.
    pub fn add_named_rule(
        &mut self,
        rule: Box<dyn PowerRule>,
        name: Option<String>,
        weight: f64,
    ) -> Result<(), PowerError> {
        let name = name.unwrap_or_else(|| rule.name().to_string());
        if !weight.is_finite() || weight < 0.0 {
            return Err(PowerError::InvalidWeight { name, weight });
        }
        self.rules.push(WeightedRule { rule, name, weight });
        Ok(())
    }

    /// Builder form of [`PowerManager::add_rule`].
    pub fn with_rule(mut self, rule: impl PowerRule + 'static, weight: f64) -> Result<Self, PowerError> {
        self.add_rule(rule, weight)?;
        Ok(self)
    }

    pub fn rules(&self) -> &[WeightedRule] {
        &self.rules
    }

    pub fn total_weight(&self) -> f64 {
        self.rules.iter().map(|r| r.weight).sum()
    }

    /// Number of rounds on which a rule has fired.
    pub fn activations(&self) -> u64 {
        self.activations
    }

    /// Weighted random choice over the registered rules.
    ///
    /// Draws uniformly in `[0, total)` and returns the first rule whose
    /// cumulative weight reaches the draw. Zero-weight rules are never chosen.
    pub fn choose_rule(&self, rng: &mut GameRng) -> Option<&WeightedRule> {
        let total = self.total_weight();
        if self.rules.is_empty() || total <= 0.0 {
            return None;
        }
        let pick = rng.next_f64() * total;
        let mut cumulative = 0.0;
        for entry in self.rules.iter().filter(|r| r.weight > 0.0) {
            cumulative += entry.weight;
            if pick <= cumulative {
                return Some(entry);
            }
        }
        // Floating point drift can leave the draw just above the final sum.
        self.rules.iter().rev().find(|r| r.weight > 0.0)
    }

    /// Apply a power rule to this round if the trigger fires.
    pub fn maybe_apply(
        &mut self,
        round_index: u64,
        context: &RoundContext,
        rng: &mut GameRng,
    ) -> PowerModification {
        if !self.trigger.should_trigger(round_index, context) {
            return PowerModification::identity();
        }
        let Some(entry) = self.choose_rule(rng) else {
            debug!(round_index, "power triggered with no weighted rules");
            return PowerModification::identity();
        };

        let raw = PowerModification::from_effect(entry.rule.apply(context));
        let name = entry.name.clone();
        let mut modification = self.cap.cap(raw, context);
        modification.active = true;
        modification.rule_name = Some(name);
        self.activations += 1;

        debug!(
            round_index,
            rule = ?modification.rule_name,
            multiplier = modification.multiplier,
            extra_respins = modification.extra_respins,
            "power activated"
        );
        modification
    }
}
