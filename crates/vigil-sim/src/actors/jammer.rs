//! Jammer: a switchable emitter with a range gate.
//!
//! Jamming itself is applied by the victims' `collect_jamming` rule, which
//! reads this entity's [`JammerView`]. While on, the jammer also radiates a
//! signal that passive receivers can locate.

use tracing::debug;

use vigil_core::config::{JammerConfig, Validate};
use vigil_core::enums::{EntityKind, JammerKind};
use vigil_core::error::ConfigResult;
use vigil_core::messages::Message;
use vigil_core::types::{EntityId, Position};
use vigil_core::view::{EntityView, JammerView};

use crate::entity::{Entity, Header, StepContext};

pub struct Jammer {
    header: Header,
    config: JammerConfig,
    power_on: bool,
}

impl Jammer {
    pub fn new(config: JammerConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            header: Header::named(config.name.clone()),
            power_on: config.power_on,
            config,
        })
    }

    pub fn from_json(value: &serde_json::Value) -> ConfigResult<Self> {
        Self::new(vigil_core::config::from_json(value)?)
    }

    pub fn kind_of_jamming(&self) -> JammerKind {
        self.config.kind
    }

    pub fn power_on(&self) -> bool {
        self.power_on
    }

    /// Set the switch, or toggle it with `None`.
    pub fn switch(&mut self, power_on: Option<bool>) -> bool {
        self.power_on = power_on.unwrap_or(!self.power_on);
        debug!(jammer = %self.header.id(), power_on = self.power_on, "jammer switched");
        self.power_on
    }

    /// Whether `at` lies inside the jamming range.
    pub fn in_range(&self, at: &Position) -> bool {
        self.config.position.range_to(at) <= self.config.max_range
    }
}

impl Entity for Jammer {
    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Jammer
    }

    fn view(&self) -> EntityView {
        EntityView {
            position: Some(self.config.position),
            signal: self.power_on.then_some(self.config.power),
            jammer: Some(JammerView {
                kind: self.config.kind,
                power_on: self.power_on,
                power: self.config.power,
                max_range: self.config.max_range,
            }),
            ..self.header.view(self.kind())
        }
    }

    fn on_message(&mut self, _ctx: &mut StepContext, _sender: Option<EntityId>, message: &Message) {
        if let Message::Power { on } = message {
            self.switch(*on);
        }
    }

    fn reset(&mut self, _ctx: &mut StepContext) {
        self.power_on = self.config.power_on;
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
            "position" => match Position::from_json(value) {
                Some(p) => {
                    self.config.position = p;
                    true
                }
                None => false,
            },
            "max_range" => match value.as_f64() {
                Some(range) if range > 0.0 => {
                    self.config.max_range = range;
                    true
                }
                _ => false,
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
