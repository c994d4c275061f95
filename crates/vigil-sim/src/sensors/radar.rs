//! Track-while-scan radar.
//!
//! A narrow search sector sweeps the horizon, one sector width per tick,
//! completing a revolution every `search_rate` seconds. Targets first seen
//! in the sector open a batch in `Searching`; `search_num` consecutive hits
//! on successive revolutions confirm it as `Tracking`, after which it is
//! revisited every `track_rate` seconds regardless of the sector. A miss
//! while searching cancels the batch at once; `cancel_num` consecutive
//! misses cancel a confirmed track.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use vigil_core::config::{RadarConfig, Validate};
use vigil_core::constants::RADAR_REVISIT_SLACK;
use vigil_core::enums::{EntityKind, TrackState};
use vigil_core::error::ConfigResult;
use vigil_core::types::{Aer, ClockInfo, EntityId, Position};
use vigil_core::view::EntityView;

use crate::detector::{detect_all, Detector};
use crate::entity::{Entity, Header, Peers, StepContext};

/// Absolute slack on time comparisons against configured intervals.
const TIME_EPS: f64 = 1e-9;

/// Angular overlap between consecutive sectors, absorbing sweep round-off.
const SECTOR_EPS: f64 = 1e-12;

/// Persistent per-target detection state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarTrack {
    pub batch_id: u32,
    /// Time of the last evaluation, hit or miss.
    pub time: f64,
    pub measurement: Option<Aer>,
    pub state: TrackState,
    pub hits: u32,
    pub misses: u32,
    #[serde(skip)]
    updated: bool,
}

/// One published batch update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarReport {
    pub batch_id: u32,
    pub target: EntityId,
    pub time: f64,
    /// `None` for a miss or a cancellation.
    pub measurement: Option<Aer>,
    pub state: TrackState,
}

pub struct Radar {
    header: Header,
    config: RadarConfig,
    tracks: BTreeMap<EntityId, RadarTrack>,
    reports: Vec<RadarReport>,
    /// Last batch id handed out. Never rewound, not even by `reset`.
    last_batch: u32,
    /// Total swept angle since reset; the current sector ends here.
    sweep: f64,
    sector_width: f64,
    rng: ChaCha8Rng,
}

impl Radar {
    pub fn new(config: RadarConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            header: Header::named(config.name.clone()),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            tracks: BTreeMap::new(),
            reports: Vec::new(),
            last_batch: 0,
            sweep: 0.0,
            sector_width: 0.0,
        })
    }

    pub fn from_json(value: &serde_json::Value) -> ConfigResult<Self> {
        Self::new(vigil_core::config::from_json(value)?)
    }

    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    pub fn position(&self) -> Position {
        self.config.position
    }

    /// Live batches keyed by target id.
    pub fn tracks(&self) -> &BTreeMap<EntityId, RadarTrack> {
        &self.tracks
    }

    pub fn track(&self, target: EntityId) -> Option<&RadarTrack> {
        self.tracks.get(&target)
    }

    /// Batches updated in the current tick, cancellations included.
    pub fn reports(&self) -> &[RadarReport] {
        &self.reports
    }

    /// Current search sector as `(start, width)` radians.
    pub fn sector(&self) -> (f64, f64) {
        ((self.sweep - self.sector_width).rem_euclid(TAU), self.sector_width)
    }

    fn in_sector(&self, azimuth: f64) -> bool {
        let (start, width) = self.sector();
        if width <= 0.0 {
            return false;
        }
        if width >= TAU {
            return true;
        }
        let rel = (azimuth - start).rem_euclid(TAU);
        rel <= width + SECTOR_EPS || rel >= TAU - SECTOR_EPS
    }

    fn next_batch(&mut self) -> u32 {
        self.last_batch += 1;
        self.last_batch
    }

    fn add_noise(&mut self, mut aer: Aer) -> Aer {
        let noise = self.config.noise;
        if noise.is_off() {
            return aer;
        }
        let mut draw = |sigma: f64| -> f64 {
            let z: f64 = self.rng.sample(StandardNormal);
            z * sigma
        };
        aer.azimuth = (aer.azimuth + draw(noise.azimuth_sigma)).rem_euclid(TAU);
        aer.elevation += draw(noise.elevation_sigma);
        aer.range = (aer.range + draw(noise.range_sigma)).max(0.0);
        aer
    }

    /// Count a miss on a live batch.
    fn miss(&mut self, target: EntityId, now: f64) {
        let cancel_num = self.config.cancel_num;
        let Some(track) = self.tracks.get_mut(&target) else {
            return;
        };
        track.time = now;
        track.measurement = None;
        track.updated = true;
        match track.state {
            TrackState::Searching => track.state = TrackState::Cancelled,
            TrackState::Tracking => {
                track.misses += 1;
                if track.misses >= cancel_num {
                    track.state = TrackState::Cancelled;
                }
            }
            TrackState::Cancelled => {}
        }
        if track.state == TrackState::Cancelled {
            debug!(radar = %self.header.id(), target_id = %target, batch = track.batch_id, now, "batch cancelled");
        }
    }
}

impl Detector for Radar {
    type Measurement = Aer;

    fn need_evaluate(&self, time: &ClockInfo, target: &EntityView) -> bool {
        let Some(at) = target.position else {
            return false;
        };
        let azimuth = self.config.position.bearing_to(&at);
        match self.tracks.get(&target.id) {
            None => self.in_sector(azimuth),
            Some(track) => match track.state {
                TrackState::Searching => {
                    time.now - track.time > time.dt * RADAR_REVISIT_SLACK && self.in_sector(azimuth)
                }
                TrackState::Tracking => time.now - track.time >= self.config.track_rate - TIME_EPS,
                TrackState::Cancelled => false,
            },
        }
    }

    fn evaluate(&mut self, _time: &ClockInfo, target: &EntityView) -> Option<Aer> {
        let at = target.position?;
        target.cross_section?;
        if let Some(min_speed) = self.config.min_radial_speed {
            let velocity = target.velocity.unwrap_or_default();
            if velocity.radial_speed(&self.config.position, &at).abs() < min_speed {
                return None;
            }
        }
        let aer = self.config.position.aer_to(&at);
        if !self.config.bounds.contains(&aer) {
            return None;
        }
        Some(self.add_noise(aer))
    }

    fn accept(&mut self, time: &ClockInfo, target: EntityId, measurement: Option<Aer>) {
        let Some(aer) = measurement else {
            self.miss(target, time.now);
            return;
        };

        if !self.tracks.contains_key(&target) {
            let batch_id = self.next_batch();
            debug!(radar = %self.header.id(), target_id = %target, batch = batch_id, now = time.now, "new batch");
            self.tracks.insert(
                target,
                RadarTrack {
                    batch_id,
                    time: time.now,
                    measurement: None,
                    state: TrackState::Searching,
                    hits: 0,
                    misses: 0,
                    updated: false,
                },
            );
        }

        let search_num = self.config.search_num;
        let radar = self.header.id();
        if let Some(track) = self.tracks.get_mut(&target) {
            track.time = time.now;
            track.measurement = Some(aer);
            track.updated = true;
            track.misses = 0;
            if track.state == TrackState::Searching {
                track.hits += 1;
                if track.hits >= search_num {
                    track.state = TrackState::Tracking;
                    debug!(%radar, target_id = %target, batch = track.batch_id, now = time.now, "batch confirmed");
                }
            }
        }
    }

    fn finalize(&mut self, time: &ClockInfo, peers: &Peers) {
        // Batches whose target left the snapshot are never evaluated; age them here.
        let vanished: Vec<EntityId> = self
            .tracks
            .iter()
            .filter(|(id, track)| {
                !track.updated && peers.get(**id).and_then(|v| v.position).is_none()
            })
            .filter(|(_, track)| {
                let interval = match track.state {
                    TrackState::Searching => self.config.search_rate,
                    _ => self.config.track_rate,
                };
                time.now - track.time >= interval - TIME_EPS
            })
            .map(|(id, _)| *id)
            .collect();
        for id in vanished {
            self.miss(id, time.now);
        }

        self.reports = self
            .tracks
            .iter()
            .filter(|(_, track)| track.updated)
            .map(|(id, track)| RadarReport {
                batch_id: track.batch_id,
                target: *id,
                time: track.time,
                measurement: track.measurement,
                state: track.state,
            })
            .collect();
        self.tracks.retain(|_, track| track.state != TrackState::Cancelled);
    }
}

impl Entity for Radar {
    fn header(&self) -> &Header {
        &self.header
    }

    fn header_mut(&mut self) -> &mut Header {
        &mut self.header
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Radar
    }

    fn view(&self) -> EntityView {
        EntityView {
            position: Some(self.config.position),
            ..self.header.view(self.kind())
        }
    }

    fn update(&mut self, ctx: &mut StepContext) {
        self.sector_width = (TAU * ctx.dt() / self.config.search_rate).min(TAU);
        self.sweep += self.sector_width;
    }

    fn interact(&mut self, ctx: &mut StepContext, peers: &Peers) {
        for track in self.tracks.values_mut() {
            track.updated = false;
        }
        let time = ctx.time();
        detect_all(self, &time, peers);
    }

    fn reset(&mut self, _ctx: &mut StepContext) {
        self.tracks.clear();
        self.reports.clear();
        // Batch ids stay unique across episodes.
        self.sweep = 0.0;
        self.sector_width = 0.0;
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
    }

    fn set_attribute(&mut self, name: &str, value: &serde_json::Value) -> bool {
        match (name, value.as_f64()) {
            ("position", _) => match Position::from_json(value) {
                Some(p) => {
                    self.config.position = p;
                    true
                }
                None => false,
            },
            ("search_rate", Some(v)) if v > 0.0 => {
                self.config.search_rate = v;
                true
            }
            ("track_rate", Some(v)) if v > 0.0 => {
                self.config.track_rate = v;
                true
            }
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
