//! Scripted target: constant-velocity body with optional capabilities.

use vigil_core::config::{TargetConfig, Validate};
use vigil_core::enums::EntityKind;
use vigil_core::error::ConfigResult;
use vigil_core::types::{Position, Velocity};
use vigil_core::view::EntityView;

use crate::entity::{Entity, Header, Peers, StepContext};
use crate::rules::{apply_rules, laser_damage, Damageable, HasRules, Rule, RuleSet};

pub struct Target {
    header: Header,
    config: TargetConfig,
    position: Position,
    velocity: Velocity,
    damage: Option<f64>,
    life: Option<f64>,
    rules: RuleSet<Target>,
}

impl Target {
    pub fn new(config: TargetConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            header: Header::named(config.name.clone()),
            position: config.position,
            velocity: config.velocity,
            damage: config.damage,
            life: config.life,
            rules: RuleSet::new().with(laser_damage),
            config,
        })
    }

    pub fn from_json(value: &serde_json::Value) -> ConfigResult<Self> {
        Self::new(vigil_core::config::from_json(value)?)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Velocity) {
        self.velocity = velocity;
    }

    pub fn remaining_damage(&self) -> Option<f64> {
        self.damage
    }

    pub fn add_rule(&mut self, rule: Rule<Target>) {
        self.rules.push(rule);
    }
}

impl Damageable for Target {
    fn damage(&self) -> Option<f64> {
        self.damage
    }

    fn take_damage(&mut self, amount: f64) -> Option<f64> {
        let left = self.damage.as_mut()?;
        *left -= amount;
        Some(*left)
    }
}

impl HasRules for Target {
    fn rules_mut(&mut self) -> &mut RuleSet<Self> {
        &mut self.rules
    }
}

impl Entity for Target {
    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Target
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
        self.position = Position::from(self.position.as_dvec3() + self.velocity.as_dvec3() * dt);
        if let Some(life) = self.life.as_mut() {
            *life -= dt;
            if *life <= 0.0 {
                ctx.deactivate();
            }
        }
    }

    fn interact(&mut self, ctx: &mut StepContext, peers: &Peers) {
        apply_rules(self, ctx, peers);
    }

    fn reset(&mut self, _ctx: &mut StepContext) {
        self.position = self.config.position;
        self.velocity = self.config.velocity;
        self.damage = self.config.damage;
        self.life = self.config.life;
    }

    fn set_attribute(&mut self, name: &str, value: &serde_json::Value) -> bool {
        match name {
            "position" => match Position::from_json(value) {
                Some(p) => {
                    self.position = p;
                    true
                }
                None => false,
            },
            "velocity" => match serde_json::from_value::<Velocity>(value.clone()) {
                Ok(v) => {
                    self.velocity = v;
                    true
                }
                Err(_) => false,
            },
            "damage" => match value.as_f64() {
                Some(d) => {
                    self.damage = Some(d);
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
