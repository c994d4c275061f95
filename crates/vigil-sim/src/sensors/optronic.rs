//! Electro-optical sensor: a guided narrow field of view that locks on the
//! target nearest its boresight and follows it.

use vigil_core::config::{OptronicConfig, Validate};
use vigil_core::enums::{EntityKind, PointingState};
use vigil_core::error::ConfigResult;
use vigil_core::messages::Message;
use vigil_core::types::{Direction, EntityId, Position};
use vigil_core::view::EntityView;

use super::pointing::{Lock, Pointing};
use crate::entity::{Entity, Header, Peers, StepContext};

pub struct Optronic {
    header: Header,
    pointing: Pointing,
}

impl Optronic {
    pub fn new(config: OptronicConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            header: Header::named(config.name),
            pointing: Pointing::new(config.position, config.fov, config.bounds, config.direction),
        })
    }

    pub fn from_json(value: &serde_json::Value) -> ConfigResult<Self> {
        Self::new(vigil_core::config::from_json(value)?)
    }

    pub fn guide(&mut self, direction: Direction, immediate: bool) {
        self.pointing.guide(direction, immediate);
    }

    pub fn release(&mut self) {
        self.pointing.release();
    }

    pub fn state(&self) -> PointingState {
        self.pointing.state()
    }

    pub fn direction(&self) -> Direction {
        self.pointing.direction()
    }

    /// Lock on the followed target, present only while tracking.
    pub fn result(&self) -> Option<&Lock> {
        self.pointing.lock()
    }

    pub fn target(&self) -> Option<EntityId> {
        self.pointing.locked_target()
    }
}

impl Entity for Optronic {
    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Optronic
    }

    fn view(&self) -> EntityView {
        EntityView {
            position: Some(self.pointing.origin()),
            ..self.header.view(self.kind())
        }
    }

    fn update(&mut self, _ctx: &mut StepContext) {
        self.pointing.update();
    }

    fn interact(&mut self, ctx: &mut StepContext, peers: &Peers) {
        self.pointing.interact(&ctx.time(), peers);
    }

    fn on_message(&mut self, _ctx: &mut StepContext, _sender: Option<EntityId>, message: &Message) {
        match message {
            Message::Guide {
                direction,
                immediate,
            } => self.guide(*direction, *immediate),
            Message::Release => self.release(),
            _ => {}
        }
    }

    fn reset(&mut self, _ctx: &mut StepContext) {
        self.pointing.reset();
    }

    fn set_attribute(&mut self, name: &str, value: &serde_json::Value) -> bool {
        match name {
            "position" => match Position::from_json(value) {
                Some(p) => {
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
