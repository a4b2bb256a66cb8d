//! Bounded random walks that keep the console moving while the backend is
//! unreachable.

use rand::Rng;

use crate::model::{Drone, DroneStatus, Flight, KpiSnapshot};

/// Success rate bounds in percent.
pub const SUCCESS_RATE_RANGE: (f64, f64) = (90.0, 100.0);

/// Delivery time bounds in minutes.
pub const DELIVERY_MINUTES_RANGE: (f64, f64) = (8.0, 20.0);

/// Lowest battery an active drone drains to.
pub const ACTIVE_BATTERY_FLOOR: f64 = 20.0;

/// Nudge success rate by up to 0.05 and delivery time by up to 0.25.
pub fn jitter_kpis<R: Rng + ?Sized>(kpis: &mut KpiSnapshot, rng: &mut R) {
    let (lo, hi) = SUCCESS_RATE_RANGE;
    kpis.success_rate_percent = (kpis.success_rate_percent + rng.gen_range(-0.05..=0.05)).clamp(lo, hi);

    let (lo, hi) = DELIVERY_MINUTES_RANGE;
    kpis.avg_delivery_minutes = (kpis.avg_delivery_minutes + rng.gen_range(-0.25..=0.25)).clamp(lo, hi);
}

/// Active drones drain up to 2% (floored at 20%); charging drones gain up
/// to 5% (capped at 100%). Everything else is left alone.
pub fn drift_batteries<R: Rng + ?Sized>(fleet: &mut [Drone], rng: &mut R) {
    for drone in fleet {
        match drone.status {
            DroneStatus::Active => {
                drone.battery_percent =
                    (drone.battery_percent - rng.gen_range(0.0..=2.0)).max(ACTIVE_BATTERY_FLOOR);
            }
            DroneStatus::Charging => {
                drone.battery_percent = (drone.battery_percent + rng.gen_range(0.0..=5.0)).min(100.0);
            }
            _ => {}
        }
    }
}

/// Advance a flight by up to 5 points, capped at 100.
pub fn advance_flight<R: Rng + ?Sized>(flight: &mut Flight, rng: &mut R) {
    flight.progress_percent = (flight.progress_percent + rng.gen_range(0.0..=5.0)).min(100.0);
}

/// Starting progress for a newly tracked flight.
pub fn initial_progress<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(10.0..=60.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_jitter_kpis_stays_in_bounds() {
        let mut rng = rng();
        let mut kpis = KpiSnapshot::default();

        for _ in 0..10_000 {
            let before = kpis.clone();
            jitter_kpis(&mut kpis, &mut rng);
            assert!((kpis.success_rate_percent - before.success_rate_percent).abs() <= 0.05 + 1e-9);
            assert!((kpis.avg_delivery_minutes - before.avg_delivery_minutes).abs() <= 0.25 + 1e-9);
            assert!((90.0..=100.0).contains(&kpis.success_rate_percent));
            assert!((8.0..=20.0).contains(&kpis.avg_delivery_minutes));
        }
        assert_eq!(kpis.total_drones, 15);
        assert_eq!(kpis.active_missions, 8);
    }

    #[test]
    fn test_jitter_kpis_clamps_out_of_range_values() {
        let mut rng = rng();
        let mut kpis = KpiSnapshot {
            success_rate_percent: 120.0,
            avg_delivery_minutes: 2.0,
            ..KpiSnapshot::default()
        };
        jitter_kpis(&mut kpis, &mut rng);
        assert!(kpis.success_rate_percent <= 100.0);
        assert!(kpis.avg_delivery_minutes >= 8.0);
    }

    #[test]
    fn test_drift_batteries_per_status() {
        let mut rng = rng();
        let mut fleet = vec![
            Drone::new("A", DroneStatus::Active, "", "", 21.0),
            Drone::new("C", DroneStatus::Charging, "", "", 98.0),
            Drone::new("M", DroneStatus::Maintenance, "", "", 23.0),
            Drone::new("I", DroneStatus::Idle, "", "", 100.0),
        ];

        for _ in 0..100 {
            let before: Vec<f64> = fleet.iter().map(|d| d.battery_percent).collect();
            drift_batteries(&mut fleet, &mut rng);

            assert!(fleet[0].battery_percent <= before[0]);
            assert!(fleet[0].battery_percent >= ACTIVE_BATTERY_FLOOR);
            assert!(before[0] - fleet[0].battery_percent <= 2.0 + 1e-9);

            assert!(fleet[1].battery_percent >= before[1]);
            assert!(fleet[1].battery_percent <= 100.0);
        }
        assert!((fleet[0].battery_percent - ACTIVE_BATTERY_FLOOR).abs() < f64::EPSILON);
        assert!((fleet[1].battery_percent - 100.0).abs() < f64::EPSILON);
        assert!((fleet[2].battery_percent - 23.0).abs() < f64::EPSILON);
        assert!((fleet[3].battery_percent - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_advance_flight_caps_at_100() {
        let mut rng = rng();
        let mut flight = Flight {
            drone_id: "LLA-001".to_string(),
            destination: "Zone Alpha".to_string(),
            progress_percent: 40.0,
        };

        let before = flight.progress_percent;
        for _ in 0..3 {
            advance_flight(&mut flight, &mut rng);
        }
        assert!(flight.progress_percent - before <= 15.0 + 1e-9);
        assert!(flight.progress_percent >= before);

        for _ in 0..100 {
            advance_flight(&mut flight, &mut rng);
        }
        assert!((flight.progress_percent - 100.0).abs() < f64::EPSILON);
        assert_eq!(flight.eta_minutes(), 1);
    }

    #[test]
    fn test_initial_progress_range() {
        let mut rng = rng();
        for _ in 0..1_000 {
            let progress = initial_progress(&mut rng);
            assert!((10.0..=60.0).contains(&progress));
        }
    }
}
