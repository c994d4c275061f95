//! Directed-energy emitter.
//!
//! Points and locks like the EO sensor. While emitting it drains its
//! battery (`work` seconds from full to empty) and switches itself off when
//! empty; while idle it recharges over `recover` seconds. The locked
//! target receives `power / kill_time(range)` damage per second through its
//! own `laser_damage` rule, read from this laser's beam view.

use tracing::debug;

use vigil_core::config::{LaserConfig, Validate};
use vigil_core::enums::{EntityKind, PointingState};
use vigil_core::error::ConfigResult;
use vigil_core::messages::Message;
use vigil_core::types::{Direction, EntityId, Position};
use vigil_core::view::{BeamView, EntityView};

use super::pointing::{Lock, Pointing};
use crate::entity::{Entity, Header, Peers, StepContext};

pub struct Laser {
    header: Header,
    config: LaserConfig,
    pointing: Pointing,
    power_on: bool,
    /// Charge fraction in `[0, 1]`.
    battery: f64,
    damage_rate: f64,
}

impl Laser {
    pub fn new(config: LaserConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            header: Header::named(config.name.clone()),
            pointing: Pointing::new(config.position, config.fov, config.bounds, config.direction),
            power_on: config.power_on,
            battery: 1.0,
            damage_rate: 0.0,
            config,
        })
    }

    pub fn from_json(value: &serde_json::Value) -> ConfigResult<Self> {
        Self::new(vigil_core::config::from_json(value)?)
    }

    pub fn config(&self) -> &LaserConfig {
        &self.config
    }

    pub fn guide(&mut self, direction: Direction, immediate: bool) {
        self.pointing.guide(direction, immediate);
    }

    pub fn release(&mut self) {
        self.pointing.release();
    }

    /// Set emission, or toggle it with `None`. Returns the new switch state.
    pub fn switch(&mut self, power_on: Option<bool>) -> bool {
        self.power_on = power_on.unwrap_or(!self.power_on);
        debug!(laser = %self.header.id(), power_on = self.power_on, "laser switched");
        self.power_on
    }

    pub fn power_on(&self) -> bool {
        self.power_on
    }

    pub fn battery(&self) -> f64 {
        self.battery
    }

    pub fn state(&self) -> PointingState {
        self.pointing.state()
    }

    pub fn direction(&self) -> Direction {
        self.pointing.direction()
    }

    pub fn result(&self) -> Option<&Lock> {
        self.pointing.lock()
    }

    pub fn target(&self) -> Option<EntityId> {
        self.pointing.locked_target()
    }

    /// Damage per second currently delivered to the locked target.
    pub fn damage_rate(&self) -> f64 {
        if self.power_on {
            self.damage_rate
        } else {
            0.0
        }
    }

    fn update_battery(&mut self, dt: f64) {
        if self.power_on {
            self.battery -= dt / self.config.work;
        } else {
            self.battery += dt / self.config.recover;
        }
        self.battery = self.battery.clamp(0.0, 1.0);
        if self.power_on && self.battery <= 0.0 {
            debug!(laser = %self.header.id(), "battery empty, switching off");
            self.power_on = false;
        }
    }
}

impl Entity for Laser {
    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Laser
    }

    fn view(&self) -> EntityView {
        EntityView {
            position: Some(self.pointing.origin()),
            beam: Some(BeamView {
                power_on: self.power_on,
                target: self.pointing.locked_target(),
                damage_rate: self.damage_rate,
            }),
            ..self.header.view(self.kind())
        }
    }

    fn update(&mut self, ctx: &mut StepContext) {
        self.pointing.update();
        self.update_battery(ctx.dt());
    }

    fn interact(&mut self, ctx: &mut StepContext, peers: &Peers) {
        self.pointing.interact(&ctx.time(), peers);
        self.damage_rate = self
            .pointing
            .lock()
            .map_or(0.0, |lock| self.config.damage_rate(lock.aer.range));
    }

    fn on_message(&mut self, _ctx: &mut StepContext, _sender: Option<EntityId>, message: &Message) {
        match message {
            Message::Guide {
                direction,
                immediate,
            } => self.guide(*direction, *immediate),
            Message::Release => self.release(),
            Message::Power { on } => {
                self.switch(*on);
            }
            _ => {}
        }
    }

    fn reset(&mut self, _ctx: &mut StepContext) {
        self.pointing.reset();
        self.power_on = self.config.power_on;
        self.battery = 1.0;
        self.damage_rate = 0.0;
    }

    fn on_deactivate(&mut self) {
        self.power_on = false;
    }

    fn set_attribute(&mut self, name: &str, value: &serde_json::Value) -> bool {
        match name {
            "power_on" => match value.as_bool() {
                Some(on) => {
                    self.switch(Some(on));
                    true
                }
                None => false,
            },
            "power" => match value.as_f64() {
                Some(power) if power >= 0.0 => {
                    self.config.power = power;
                    true
                }
                _ => false,
            },
            "position" => match Position::from_json(value) {
                Some(p) => {
                    self.config.position = p;
                    self.pointing.set_origin(p);
                    true
                }
                None => false,
            },
            "guide" => match serde_json::from_value::<Direction>(value.clone()) {
                Ok(direction) => {
                    self.guide(direction, false);
                    true
                }
                Err(_) => false,
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
