//! Passive receiver: bearings to emitters, refreshed at most once per
//! `rate` seconds per emitter.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use vigil_core::config::{ReceiverConfig, Validate};
use vigil_core::enums::EntityKind;
use vigil_core::error::ConfigResult;
use vigil_core::types::{ClockInfo, EntityId, Position};
use vigil_core::view::EntityView;

use crate::detector::{detect_all, Detector};
use crate::entity::{Entity, Header, Peers, StepContext};

const TIME_EPS: f64 = 1e-9;

/// Latest bearing to one emitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReceiverReport {
    pub time: f64,
    /// Azimuth from the receiver (radians, 0 = North, clockwise).
    pub bearing: f64,
    pub target: EntityId,
}

pub struct Receiver {
    header: Header,
    config: ReceiverConfig,
    outputs: BTreeMap<EntityId, ReceiverReport>,
    fresh: Vec<(EntityId, f64)>,
    now: f64,
}

impl Receiver {
    pub fn new(config: ReceiverConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            header: Header::named(config.name.clone()),
            config,
            outputs: BTreeMap::new(),
            fresh: Vec::new(),
            now: 0.0,
        })
    }

    pub fn from_json(value: &serde_json::Value) -> ConfigResult<Self> {
        Self::new(vigil_core::config::from_json(value)?)
    }

    pub fn rate(&self) -> f64 {
        self.config.rate
    }

    /// Every retained bearing, fresh or not.
    pub fn outputs(&self) -> impl Iterator<Item = &ReceiverReport> {
        self.outputs.values()
    }

    /// Bearings refreshed in the current tick.
    pub fn result(&self) -> Vec<ReceiverReport> {
        self.outputs
            .values()
            .filter(|r| r.time == self.now)
            .copied()
            .collect()
    }
}

impl Detector for Receiver {
    type Measurement = f64;

    fn need_evaluate(&self, time: &ClockInfo, target: &EntityView) -> bool {
        if target.position.is_none() || target.signal.is_none() {
            return false;
        }
        match self.outputs.get(&target.id) {
            Some(last) if self.config.rate > 0.0 => {
                time.now - last.time >= self.config.rate - TIME_EPS
            }
            _ => true,
        }
    }

    fn evaluate(&mut self, _time: &ClockInfo, target: &EntityView) -> Option<f64> {
        target.signal?;
        let aer = self.config.position.aer_to(&target.position?);
        self.config.bounds.contains(&aer).then_some(aer.azimuth)
    }

    fn accept(&mut self, _time: &ClockInfo, target: EntityId, bearing: Option<f64>) {
        if let Some(bearing) = bearing {
            self.fresh.push((target, bearing));
        }
    }

    fn finalize(&mut self, time: &ClockInfo, _peers: &Peers) {
        for (target, bearing) in self.fresh.drain(..) {
            self.outputs.insert(
                target,
                ReceiverReport {
                    time: time.now,
                    bearing,
                    target,
                },
            );
        }
        let rate = self.config.rate;
        self.outputs
            .retain(|_, report| time.now - report.time <= rate + TIME_EPS);
    }
}

impl Entity for Receiver {
    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Receiver
    }

    fn view(&self) -> EntityView {
        EntityView {
            position: Some(self.config.position),
            ..self.header.view(self.kind())
        }
    }

    fn interact(&mut self, ctx: &mut StepContext, peers: &Peers) {
        self.now = ctx.now();
        self.fresh.clear();
        let time = ctx.time();
        detect_all(self, &time, peers);
    }

    fn reset(&mut self, ctx: &mut StepContext) {
        self.outputs.clear();
        self.fresh.clear();
        self.now = ctx.now();
    }

    fn set_attribute(&mut self, name: &str, value: &serde_json::Value) -> bool {
        match name {
            "position" => match Position::from_json(value) {
                Some(p) => {
                    self.config.position = p;
                    true
                }
                None => false,
            },
            "rate" => match value.as_f64() {
                Some(rate) if rate >= 0.0 => {
                    self.config.rate = rate;
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
