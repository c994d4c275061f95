//! UAV entity.
//!
//! Feeds the pure flight controller from `vigil_flight` once per tick and
//! applies jamming and beam damage through its rule set.

use tracing::debug;

use vigil_core::config::{UavConfig, Validate};
use vigil_core::enums::{EntityKind, UavState};
use vigil_core::error::ConfigResult;
use vigil_core::types::{Position, Velocity};
use vigil_core::view::EntityView;
use vigil_flight::fsm::{self, FlightContext, JamSignals};
use vigil_flight::route::Route;

use crate::entity::{Entity, Header, Peers, StepContext};
use crate::rules::{
    apply_rules, collect_jamming, laser_damage, Damageable, HasRules, JamReceiver, RuleSet,
};

pub struct Uav {
    header: Header,
    config: UavConfig,
    route: Route,
    state: UavState,
    position: Position,
    velocity: Velocity,
    life: f64,
    damage: Option<f64>,
    jam: JamSignals,
    rules: RuleSet<Uav>,
}

impl Uav {
    pub fn new(config: UavConfig) -> ConfigResult<Self> {
        config.validate()?;
        let route = Route::new(config.waypoints.clone());
        let position = route.home().unwrap_or_default();
        Ok(Self {
            header: Header::named(config.name.clone()),
            route,
            state: UavState::Normal,
            position,
            velocity: Velocity::default(),
            life: config.life,
            damage: config.damage,
            jam: JamSignals::default(),
            rules: RuleSet::new().with(collect_jamming).with(laser_damage),
            config,
        })
    }

    pub fn from_json(value: &serde_json::Value) -> ConfigResult<Self> {
        Self::new(vigil_core::config::from_json(value)?)
    }

    pub fn state(&self) -> UavState {
        self.state
    }

    /// Force the flight state.
    pub fn set_state(&mut self, state: UavState) {
        if state != self.state {
            debug!(uav = %self.header.id(), from = ?self.state, to = ?state, "state forced");
            self.state = state;
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Remaining endurance in seconds.
    pub fn life(&self) -> f64 {
        self.life
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Jamming collected in the latest interaction phase.
    pub fn jam_signals(&self) -> JamSignals {
        self.jam
    }

    pub fn add_rule(&mut self, rule: crate::rules::Rule<Uav>) {
        self.rules.push(rule);
    }
}

impl Damageable for Uav {
    fn damage(&self) -> Option<f64> {
        self.damage
    }

    fn take_damage(&mut self, amount: f64) -> Option<f64> {
        let left = self.damage.as_mut()?;
        *left -= amount;
        Some(*left)
    }
}

impl JamReceiver for Uav {
    fn position(&self) -> Position {
        self.position
    }

    fn link_margin(&self) -> f64 {
        self.config.link_margin
    }

    fn jam_signals_mut(&mut self) -> &mut JamSignals {
        &mut self.jam
    }
}

impl HasRules for Uav {
    fn rules_mut(&mut self) -> &mut RuleSet<Self> {
        &mut self.rules
    }
}

impl Entity for Uav {
    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Uav
    }

    fn view(&self) -> EntityView {
        EntityView {
            position: Some(self.position),
            velocity: Some(self.velocity),
            cross_section: self.config.cross_section,
            signal: self.config.signal,
            damage: self.damage,
            ..self.header.view(self.kind())
        }
    }

    fn update(&mut self, ctx: &mut StepContext) {
        let dt = ctx.dt();
        self.life -= dt;
        if self.life <= 0.0 {
            debug!(uav = %ctx.id(), now = ctx.now(), "endurance exhausted");
            self.velocity = Velocity::default();
            ctx.deactivate();
            return;
        }

        let previous = self.position;
        let update = fsm::advance(&FlightContext {
            state: self.state,
            position: self.position,
            velocity: self.velocity,
            waypoints: self.route.waypoints(),
            next_waypoint: self.route.next_index(),
            speed: self.config.speed,
            dt,
            two_way: self.config.two_way,
        });
        if update.state != self.state {
            debug!(uav = %ctx.id(), from = ?self.state, to = ?update.state, now = ctx.now(), "flight state");
        }
        self.state = update.state;
        self.position = update.position;
        self.route.set_next_index(update.next_waypoint);
        if update.deactivate {
            debug!(uav = %ctx.id(), state = ?self.state, now = ctx.now(), "flight over");
            ctx.deactivate();
        }

        self.velocity = if dt > 0.0 {
            Velocity::from((self.position.as_dvec3() - previous.as_dvec3()) / dt)
        } else {
            Velocity::default()
        };
    }

    fn interact(&mut self, ctx: &mut StepContext, peers: &Peers) {
        self.jam = JamSignals::default();
        apply_rules(self, ctx, peers);
        let next = fsm::react(
            self.state,
            self.jam,
            self.route.next_index(),
            self.route.waypoints().len(),
        );
        if next != self.state {
            debug!(uav = %ctx.id(), from = ?self.state, to = ?next, now = ctx.now(), "jam response");
            self.state = next;
        }
    }

    fn reset(&mut self, _ctx: &mut StepContext) {
        self.route.reset();
        self.state = UavState::Normal;
        self.position = self.route.home().unwrap_or_default();
        self.velocity = Velocity::default();
        self.life = self.config.life;
        self.damage = self.config.damage;
        self.jam = JamSignals::default();
    }

    /// Batch-assignable attributes: `state`, `speed`, `life`, `two_way`.
    ///
    /// # Panics
    ///
    /// Assigning `state` a string that is not a [`UavState`] name. Other
    /// value shapes are rejected.
    fn set_attribute(&mut self, name: &str, value: &serde_json::Value) -> bool {
        match name {
            "state" => {
                if !value.is_string() {
                    return false;
                }
                let state: UavState = match serde_json::from_value(value.clone()) {
                    Ok(state) => state,
                    Err(err) => panic!("invalid UAV state {value}: {err}"),
                };
                self.set_state(state);
                true
            }
            "speed" => match value.as_f64() {
                Some(speed) if speed > 0.0 => {
                    self.config.speed = speed;
                    true
                }
                _ => false,
            },
            "life" => match value.as_f64() {
                Some(life) => {
                    self.life = life;
                    true
                }
                None => false,
            },
            "two_way" => match value.as_bool() {
                Some(two_way) => {
                    self.config.two_way = two_way;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
