//! UAV flight state machine.
//!
//! [`advance`] moves the aircraft for one tick according to its state.
//! [`react`] applies the jamming collected during the interaction phase,
//! producing the state used from the next tick on. No ECS or scenario
//! dependency; operates on plain data.

use vigil_core::enums::UavState;
use vigil_core::types::{Position, Velocity};

use crate::route::step_toward;

/// Input to one self-update of the flight controller.
pub struct FlightContext<'a> {
    pub state: UavState,
    pub position: Position,
    /// Velocity observed over the previous tick.
    pub velocity: Velocity,
    pub waypoints: &'a [Position],
    pub next_waypoint: usize,
    pub speed: f64,
    pub dt: f64,
    pub two_way: bool,
}

/// Output of one self-update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightUpdate {
    pub state: UavState,
    pub position: Position,
    pub next_waypoint: usize,
    /// The flight is over; the entity should leave the scenario.
    pub deactivate: bool,
}

/// Jamming observed by a UAV during one interaction phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JamSignals {
    pub data_link: bool,
    pub gps: bool,
}

impl JamSignals {
    pub fn any(&self) -> bool {
        self.data_link || self.gps
    }
}

/// Advance the controller by one tick.
pub fn advance(ctx: &FlightContext) -> FlightUpdate {
    let hold = FlightUpdate {
        state: ctx.state,
        position: ctx.position,
        next_waypoint: ctx.next_waypoint,
        deactivate: false,
    };

    match ctx.state {
        UavState::Normal => fly_route(ctx, hold),
        UavState::Back => fly_home(ctx, hold),
        UavState::GpsLost => FlightUpdate {
            position: drift(&ctx.position, &ctx.velocity, ctx.dt),
            ..hold
        },
        // Entering Home or Over already deactivates; this covers a state assigned from outside.
        UavState::Home | UavState::Over => FlightUpdate {
            deactivate: true,
            ..hold
        },
    }
}

fn fly_route(ctx: &FlightContext, hold: FlightUpdate) -> FlightUpdate {
    let Some(target) = ctx.waypoints.get(ctx.next_waypoint) else {
        // Route exhausted: turn around or end the mission. Movement resumes next tick.
        if ctx.two_way {
            return FlightUpdate {
                state: UavState::Back,
                ..hold
            };
        }
        return FlightUpdate {
            state: UavState::Over,
            deactivate: true,
            ..hold
        };
    };

    let (position, remaining) = step_toward(&ctx.position, target, ctx.speed * ctx.dt);
    let next_waypoint = if remaining <= 0.0 {
        ctx.next_waypoint + 1
    } else {
        ctx.next_waypoint
    };
    FlightUpdate {
        position,
        next_waypoint,
        ..hold
    }
}

fn fly_home(ctx: &FlightContext, hold: FlightUpdate) -> FlightUpdate {
    let Some(home) = ctx.waypoints.first() else {
        return FlightUpdate {
            state: UavState::Over,
            deactivate: true,
            ..hold
        };
    };
    let (position, remaining) = step_toward(&ctx.position, home, ctx.speed * ctx.dt);
    let arrived = remaining <= 0.0;
    FlightUpdate {
        state: if arrived { UavState::Home } else { UavState::Back },
        position,
        deactivate: arrived,
        ..hold
    }
}

fn drift(position: &Position, velocity: &Velocity, dt: f64) -> Position {
    Position::from(position.as_dvec3() + velocity.as_dvec3() * dt)
}

/// State after this tick's jamming.
///
/// A data-link jam aborts the mission (Back) and a GPS jam denies
/// navigation (GpsLost); GPS wins when both are present. Terminal states
/// never change. Once the air is clear, a jam-induced Back with waypoints
/// remaining and a GpsLost both resume the route.
pub fn react(
    state: UavState,
    signals: JamSignals,
    next_waypoint: usize,
    route_len: usize,
) -> UavState {
    if state.is_terminal() {
        return state;
    }
    if signals.gps {
        return UavState::GpsLost;
    }
    if signals.data_link {
        return UavState::Back;
    }
    match state {
        UavState::Back if next_waypoint < route_len => UavState::Normal,
        UavState::GpsLost => UavState::Normal,
        other => other,
    }
}
