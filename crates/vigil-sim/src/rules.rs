//! Pairwise interaction rules and the capabilities they act on.
//!
//! A rule inspects one peer's view and, when the peer exposes what the
//! rule needs, updates its owner. Owners keep their rules in a
//! [`RuleSet`] and run them with [`apply_rules`] during interaction.

use tracing::debug;
use vigil_core::constants::LINK_MIN_DISTANCE;
use vigil_core::enums::JammerKind;
use vigil_core::types::Position;
use vigil_core::view::EntityView;
use vigil_flight::fsm::JamSignals;

use crate::entity::{Peers, StepContext};

pub type Rule<S> = fn(&mut S, &mut StepContext, &EntityView);

/// Ordered list of rules applied to every peer.
pub struct RuleSet<S> {
    rules: Vec<Rule<S>>,
}

impl<S> Default for RuleSet<S> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<S> Clone for RuleSet<S> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<S> RuleSet<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rule: Rule<S>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule<S>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every rule against every peer, peers outermost.
    pub fn apply(&self, owner: &mut S, ctx: &mut StepContext, peers: &Peers) {
        for peer in peers.iter() {
            for rule in &self.rules {
                rule(owner, ctx, peer);
            }
        }
    }
}

/// An entity that owns a rule set over itself.
pub trait HasRules: Sized {
    fn rules_mut(&mut self) -> &mut RuleSet<Self>;
}

/// Run the owner's rules. The set is taken out for the duration so rules
/// get a plain `&mut` to their owner.
pub fn apply_rules<S: HasRules>(owner: &mut S, ctx: &mut StepContext, peers: &Peers) {
    let rules = std::mem::take(owner.rules_mut());
    rules.apply(owner, ctx, peers);
    let added = std::mem::replace(owner.rules_mut(), rules);
    owner.rules_mut().rules.extend(added.rules);
}

// --- Capabilities ---

/// Something a beam can wear down.
pub trait Damageable {
    fn damage(&self) -> Option<f64>;

    /// Subtract `amount`, returning what is left.
    fn take_damage(&mut self, amount: f64) -> Option<f64>;
}

/// Something whose navigation or data link can be jammed.
pub trait JamReceiver {
    fn position(&self) -> Position;

    /// Received jammer power (power / d²) at which the data link drops.
    fn link_margin(&self) -> f64;

    fn jam_signals_mut(&mut self) -> &mut JamSignals;
}

// --- Built-in rules ---

/// Apply the damage of any beam that is on and locked on the owner.
/// Deactivates the owner once its damage capacity is exhausted.
pub fn laser_damage<S: Damageable>(owner: &mut S, ctx: &mut StepContext, peer: &EntityView) {
    let Some(beam) = peer.beam else {
        return;
    };
    let rate = beam.rate_on(ctx.id());
    if rate <= 0.0 || owner.damage().is_none() {
        return;
    }
    if let Some(left) = owner.take_damage(rate * ctx.dt()) {
        if left <= 0.0 && !ctx.is_deactivated() {
            debug!(target_id = %ctx.id(), by = %peer.id, now = ctx.now(), "destroyed by beam");
            ctx.deactivate();
        }
    }
}

/// Record jamming from any powered jammer in range of the owner.
///
/// GPS jamming is range gated only. Data-link jamming additionally needs
/// the received power to beat the owner's link margin.
pub fn collect_jamming<S: JamReceiver>(owner: &mut S, _ctx: &mut StepContext, peer: &EntityView) {
    let (Some(jammer), Some(at)) = (peer.jammer, peer.position) else {
        return;
    };
    if !jammer.power_on {
        return;
    }
    let distance = owner.position().range_to(&at);
    if distance > jammer.max_range {
        return;
    }
    match jammer.kind {
        JammerKind::Gps => owner.jam_signals_mut().gps = true,
        JammerKind::DataLink => {
            let received = jammer.power / distance.max(LINK_MIN_DISTANCE).powi(2);
            if received > owner.link_margin() {
                owner.jam_signals_mut().data_link = true;
            }
        }
    }
}
