// Copyright (c) 2026 rezky_nightky

use chrono::{DateTime, Utc};

use crate::trip::TripWindow;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub coords: LatLng,
}

pub const LAUSANNE: City = City {
    name: "Lausanne",
    coords: LatLng::new(46.5197, 6.6323),
};

pub const QUEBEC: City = City {
    name: "Québec",
    coords: LatLng::new(46.8139, -71.208),
};

pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * h.sqrt().asin()
}

/// Straight-line interpolation in degree space. Exact at `t == 0` and `t == 1`.
pub fn lerp(a: LatLng, b: LatLng, t: f64) -> LatLng {
    LatLng {
        lat: a.lat * (1.0 - t) + b.lat * t,
        lng: a.lng * (1.0 - t) + b.lng * t,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceModel {
    real_km: f64,
}

impl DistanceModel {
    pub fn between(a: LatLng, b: LatLng) -> Self {
        Self {
            real_km: haversine_km(a, b),
        }
    }

    pub fn real_km(&self) -> f64 {
        self.real_km
    }

    pub fn symbolic_km(&self, window: &TripWindow, now: DateTime<Utc>) -> f64 {
        self.real_km * window.remaining_fraction(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::{
        DEFAULT_START, DEFAULT_START_ZONE, DEFAULT_TARGET, DEFAULT_TARGET_ZONE,
    };
    use chrono::Duration;

    fn window() -> TripWindow {
        TripWindow::from_local(
            DEFAULT_START,
            DEFAULT_START_ZONE,
            DEFAULT_TARGET,
            DEFAULT_TARGET_ZONE,
        )
        .unwrap()
    }

    #[test]
    fn lausanne_to_quebec_reference_distance() {
        let km = haversine_km(LAUSANNE.coords, QUEBEC.coords);
        assert!((km - 5679.62).abs() < 0.01, "got {km}");
        assert_eq!(format!("{:.0}", km), "5680");
    }

    #[test]
    fn haversine_is_symmetric_and_zero_on_same_point() {
        let a = haversine_km(LAUSANNE.coords, QUEBEC.coords);
        let b = haversine_km(QUEBEC.coords, LAUSANNE.coords);
        assert!((a - b).abs() < 1e-9);
        assert_eq!(haversine_km(LAUSANNE.coords, LAUSANNE.coords), 0.0);
    }

    #[test]
    fn lerp_is_exact_at_the_ends() {
        assert_eq!(lerp(LAUSANNE.coords, QUEBEC.coords, 0.0), LAUSANNE.coords);
        assert_eq!(lerp(LAUSANNE.coords, QUEBEC.coords, 1.0), QUEBEC.coords);
    }

    #[test]
    fn symbolic_distance_decays_to_zero() {
        let w = window();
        let model = DistanceModel::between(LAUSANNE.coords, QUEBEC.coords);
        let start = w.start().with_timezone(&Utc);
        let end = w.end().with_timezone(&Utc);

        assert_eq!(model.symbolic_km(&w, start), model.real_km());
        assert_eq!(model.symbolic_km(&w, end), 0.0);
        assert_eq!(model.symbolic_km(&w, end + Duration::days(30)), 0.0);

        let mut prev = model.symbolic_km(&w, start);
        let mut t = start + Duration::hours(5);
        while t < end {
            let km = model.symbolic_km(&w, t);
            assert!(km < prev);
            prev = km;
            t += Duration::hours(5);
        }
    }
}
