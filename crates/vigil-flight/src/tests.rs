#[cfg(test)]
mod tests {
    use vigil_core::enums::UavState;
    use vigil_core::types::{Position, Velocity};

    use crate::fsm::{advance, react, FlightContext, JamSignals};
    use crate::route::{step_toward, Route};

    const EPS: f64 = 1e-9;

    fn square() -> Vec<Position> {
        vec![
            Position::new(0.0, 0.0, 0.0),
            Position::new(10.0, 0.0, 0.0),
            Position::new(10.0, 10.0, 0.0),
        ]
    }

    fn context(state: UavState, position: Position, waypoints: &[Position], next: usize) -> FlightContext<'_> {
        FlightContext {
            state,
            position,
            velocity: Velocity::default(),
            waypoints,
            next_waypoint: next,
            speed: 2.0,
            dt: 0.5,
            two_way: true,
        }
    }

    #[test]
    fn test_step_toward_partial_and_arrival() {
        let from = Position::new(0.0, 0.0, 0.0);
        let to = Position::new(3.0, 4.0, 0.0);

        let (pos, left) = step_toward(&from, &to, 1.0);
        assert!((pos.x - 0.6).abs() < EPS && (pos.y - 0.8).abs() < EPS);
        assert!((left - 4.0).abs() < EPS);

        let (pos, left) = step_toward(&from, &to, 7.0);
        assert_eq!(pos, to, "overshoot should snap onto the waypoint");
        assert!((left + 2.0).abs() < EPS);
    }

    #[test]
    fn test_step_toward_zero_length_segment() {
        let p = Position::new(1.0, 1.0, 1.0);
        let (pos, left) = step_toward(&p, &p, 0.0);
        assert_eq!(pos, p);
        assert!(left <= 0.0);
    }

    #[test]
    fn test_route_bookkeeping() {
        let mut route = Route::new(square());
        assert_eq!(route.home(), Some(Position::new(0.0, 0.0, 0.0)));
        assert!(!route.is_exhausted());
        route.set_next_index(10);
        assert_eq!(route.next_index(), 3);
        assert!(route.is_exhausted());
        route.reset();
        assert_eq!(route.next_index(), 0);
    }

    #[test]
    fn test_normal_reaches_launch_point_immediately() {
        let route = square();
        let update = advance(&context(UavState::Normal, route[0], &route, 0));
        assert_eq!(update.next_waypoint, 1);
        assert_eq!(update.position, route[0]);
        assert_eq!(update.state, UavState::Normal);
    }

    #[test]
    fn test_normal_moves_speed_times_dt() {
        let route = square();
        let update = advance(&context(UavState::Normal, route[0], &route, 1));
        assert!((update.position.x - 1.0).abs() < EPS);
        assert_eq!(update.next_waypoint, 1);
        assert!(!update.deactivate);
    }

    #[test]
    fn test_exhausted_route_two_way_goes_back() {
        let route = square();
        let update = advance(&context(UavState::Normal, route[2], &route, 3));
        assert_eq!(update.state, UavState::Back);
        assert_eq!(update.position, route[2], "no movement on the turnaround tick");
        assert!(!update.deactivate);

        let mut one_way = context(UavState::Normal, route[2], &route, 3);
        one_way.two_way = false;
        let update = advance(&one_way);
        assert_eq!(update.state, UavState::Over);
        assert!(update.deactivate, "one-way mission ends on the tick it is exhausted");
    }

    #[test]
    fn test_back_arrives_home() {
        let route = square();
        let near_home = Position::new(0.5, 0.0, 0.0);
        let update = advance(&context(UavState::Back, near_home, &route, 2));
        assert_eq!(update.state, UavState::Home);
        assert_eq!(update.position, route[0]);
        assert!(update.deactivate, "arrival ends the flight at once");

        let far = Position::new(10.0, 0.0, 0.0);
        let update = advance(&context(UavState::Back, far, &route, 2));
        assert_eq!(update.state, UavState::Back);
        assert!(!update.deactivate);
        assert!((update.position.x - 9.0).abs() < EPS);
    }

    #[test]
    fn test_terminal_states_deactivate() {
        let route = square();
        for state in [UavState::Home, UavState::Over] {
            let update = advance(&context(state, route[0], &route, 3));
            assert!(update.deactivate, "{state:?} should deactivate");
        }
    }

    #[test]
    fn test_gps_lost_drifts_on_last_velocity() {
        let route = square();
        let mut ctx = context(UavState::GpsLost, Position::new(5.0, 0.0, 0.0), &route, 2);
        ctx.velocity = Velocity::new(0.0, -2.0, 0.0);
        let update = advance(&ctx);
        assert!((update.position.y + 1.0).abs() < EPS);
        assert_eq!(update.next_waypoint, 2, "waypoints do not advance while denied");
    }

    #[test]
    fn test_react_data_link_forces_back() {
        let jam = JamSignals {
            data_link: true,
            gps: false,
        };
        assert_eq!(react(UavState::Normal, jam, 1, 3), UavState::Back);
        assert_eq!(react(UavState::Home, jam, 1, 3), UavState::Home);
        assert_eq!(react(UavState::Over, jam, 3, 3), UavState::Over);
    }

    #[test]
    fn test_react_gps_overrides_data_link() {
        let both = JamSignals {
            data_link: true,
            gps: true,
        };
        assert_eq!(react(UavState::Normal, both, 1, 3), UavState::GpsLost);
        assert!(both.any());
    }

    #[test]
    fn test_react_clear_air_resumes_route() {
        let clear = JamSignals::default();
        assert_eq!(react(UavState::Back, clear, 1, 3), UavState::Normal);
        assert_eq!(
            react(UavState::Back, clear, 3, 3),
            UavState::Back,
            "a finished route keeps heading home"
        );
        assert_eq!(react(UavState::GpsLost, clear, 3, 3), UavState::Normal);
        assert_eq!(react(UavState::Normal, clear, 1, 3), UavState::Normal);
    }
}
