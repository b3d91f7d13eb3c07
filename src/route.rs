//! GPX route topography: distance, grade and the adaptive speed profile.

use std::io::{BufReader, Read};

use itertools::Itertools;

use crate::{prelude::*, quantity::distance::Kilometers};

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Stand-in distance for coincident points, so that the grade stays finite.
const ZERO_DISTANCE_METERS: f64 = 1e-5;

/// Grade, in radians, above which the rider is assumed to climb slowly.
const UPHILL_GRADE: f64 = 0.03;

/// Climbing speed, 25 km/h.
pub const UPHILL_SPEED: f64 = 6.94;

/// Cruising speed, 40 km/h.
pub const CRUISING_SPEED: f64 = 11.11;

/// Raw track point as found in the source document.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RoutePoint {
    pub latitude: f64,
    pub longitude: f64,

    /// Elevation in meters, zero when the track does not have one.
    pub elevation: f64,

    /// Distance from the first point in meters.
    pub cumulative_distance: f64,

    /// Grade of the segment ending at this point, in radians.
    pub grade: f64,

    /// Speed assigned to the segment ending at this point, in meters per second.
    pub speed: f64,
}

/// Stretch between two consecutive route points.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    /// Meters.
    pub length: f64,

    /// Radians.
    pub grade: f64,

    /// Meters per second.
    pub speed: f64,
}

impl Segment {
    /// Time to ride through the segment, in seconds. Standing segments take no time.
    pub fn duration(&self) -> f64 {
        if self.speed > 0.0 { self.length / self.speed } else { 0.0 }
    }
}

#[must_use]
#[derive(Clone, Debug)]
pub struct Route {
    points: Vec<RoutePoint>,
}

impl Route {
    /// Build the route from raw waypoints, computing distances, grades and speeds.
    pub fn try_from_waypoints(waypoints: impl IntoIterator<Item = Waypoint>) -> Result<Self> {
        let mut points: Vec<RoutePoint> = Vec::new();

        for (index, waypoint) in waypoints.into_iter().enumerate() {
            ensure!(
                waypoint.latitude.is_finite() && (-90.0..=90.0).contains(&waypoint.latitude),
                Error::parse(format!("point #{index} has invalid latitude {}", waypoint.latitude)),
            );
            ensure!(
                waypoint.longitude.is_finite() && (-180.0..=180.0).contains(&waypoint.longitude),
                Error::parse(format!(
                    "point #{index} has invalid longitude {}",
                    waypoint.longitude,
                )),
            );
            let elevation = waypoint.elevation.filter(|elevation| elevation.is_finite());

            let point = match points.last() {
                None => RoutePoint {
                    latitude: waypoint.latitude,
                    longitude: waypoint.longitude,
                    elevation: elevation.unwrap_or(0.0),
                    cumulative_distance: 0.0,
                    grade: 0.0,
                    speed: CRUISING_SPEED,
                },
                Some(previous) => {
                    let distance = haversine_distance(
                        previous.latitude,
                        previous.longitude,
                        waypoint.latitude,
                        waypoint.longitude,
                    );
                    let elevation = elevation.unwrap_or(0.0);
                    let run = if distance == 0.0 { ZERO_DISTANCE_METERS } else { distance };
                    let grade = ((elevation - previous.elevation) / run).atan();
                    RoutePoint {
                        latitude: waypoint.latitude,
                        longitude: waypoint.longitude,
                        elevation,
                        cumulative_distance: previous.cumulative_distance + distance,
                        grade,
                        speed: assign_speed(grade),
                    }
                }
            };
            points.push(point);
        }

        ensure!(!points.is_empty(), Error::parse("the track contains no points"));
        Ok(Self { points })
    }

    /// Read every track point of every track and segment, in document order.
    #[instrument(skip_all)]
    pub fn read_gpx<R: Read>(reader: R) -> Result<Self> {
        let document = gpx::read(BufReader::new(reader))?;
        let waypoints = document
            .tracks
            .iter()
            .flat_map(|track| &track.segments)
            .flat_map(|segment| &segment.points)
            .map(|point| {
                let location = point.point();
                Waypoint { latitude: location.y(), longitude: location.x(), elevation: point.elevation }
            });
        let route = Self::try_from_waypoints(waypoints)?;
        info!(n_points = route.points.len(), length = ?route.length(), "parsed the route");
        Ok(route)
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    pub fn length(&self) -> Kilometers {
        self.points
            .last()
            .map_or(Kilometers::ZERO, |point| Kilometers::from_meters(point.cumulative_distance))
    }

    /// Segments between consecutive points, taking the grade and speed of the ending point.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.iter().tuple_windows().map(|(from, to)| Segment {
            length: to.cumulative_distance - from.cumulative_distance,
            grade: to.grade,
            speed: to.speed,
        })
    }

    pub fn topography(&self) -> Topography {
        let (min_elevation, max_elevation) = self
            .points
            .iter()
            .map(|point| point.elevation)
            .minmax_by(f64::total_cmp)
            .into_option()
            .unwrap_or_default();
        let (ascent, descent) = self.points.iter().tuple_windows().fold(
            (0.0, 0.0),
            |(ascent, descent), (from, to)| {
                let delta = to.elevation - from.elevation;
                if delta > 0.0 { (ascent + delta, descent) } else { (ascent, descent - delta) }
            },
        );
        let n_uphill = self.segments().filter(|segment| segment.speed < CRUISING_SPEED).count();
        #[expect(clippy::cast_precision_loss)]
        let uphill_share =
            if self.points.len() > 1 { n_uphill as f64 / (self.points.len() - 1) as f64 } else { 0.0 };
        Topography {
            length: self.length(),
            n_points: self.points.len(),
            min_elevation,
            max_elevation,
            ascent,
            descent,
            uphill_share,
        }
    }
}

/// Parse a GPX track into the route.
pub fn parse_route<R: Read>(track: R) -> Result<Route> {
    Route::read_gpx(track)
}

/// Summary of the route profile.
#[must_use]
#[derive(Copy, Clone, Debug)]
pub struct Topography {
    pub length: Kilometers,
    pub n_points: usize,

    /// Meters.
    pub min_elevation: f64,

    /// Meters.
    pub max_elevation: f64,

    /// Total climb in meters.
    pub ascent: f64,

    /// Total descent in meters.
    pub descent: f64,

    /// Share of segments ridden at the climbing speed, `0..=1`.
    pub uphill_share: f64,
}

fn assign_speed(grade: f64) -> f64 {
    if grade > UPHILL_GRADE { UPHILL_SPEED } else { CRUISING_SPEED }
}

/// Great-circle distance in meters.
fn haversine_distance(latitude_1: f64, longitude_1: f64, latitude_2: f64, longitude_2: f64) -> f64 {
    let phi_1 = latitude_1.to_radians();
    let phi_2 = latitude_2.to_radians();
    let delta_phi = (latitude_2 - latitude_1).to_radians();
    let delta_lambda = (longitude_2 - longitude_1).to_radians();
    let a = (delta_phi / 2.0).sin().powi(2)
        + phi_1.cos() * phi_2.cos() * (delta_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * a.sqrt().atan2((1.0 - a).sqrt())
}

#[cfg(test)]
pub mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    /// Degrees of latitude per meter along a meridian.
    const DEGREES_PER_METER: f64 = 180.0 / (std::f64::consts::PI * EARTH_RADIUS_METERS);

    /// Straight northbound track starting at the equator, one point per `spacing` meters.
    pub fn northbound(elevations: &[Option<f64>], spacing: f64) -> Route {
        #[expect(clippy::cast_precision_loss)]
        let waypoints = elevations.iter().enumerate().map(|(index, elevation)| Waypoint {
            latitude: index as f64 * spacing * DEGREES_PER_METER,
            longitude: 36.8,
            elevation: *elevation,
        });
        Route::try_from_waypoints(waypoints).unwrap()
    }

    const GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
            <trk>
                <trkseg>
                    <trkpt lat="-1.2921" lon="36.8219"><ele>1661.0</ele></trkpt>
                    <trkpt lat="-1.2930" lon="36.8230"><ele>1665.0</ele></trkpt>
                    <trkpt lat="-1.2940" lon="36.8240"></trkpt>
                </trkseg>
            </trk>
        </gpx>
    "#;

    #[test]
    fn read_gpx_ok() {
        let route = parse_route(GPX.as_bytes()).unwrap();
        assert_eq!(route.points().len(), 3);
        assert_abs_diff_eq!(route.points()[0].elevation, 1661.0);
        assert_abs_diff_eq!(route.points()[2].elevation, 0.0);
        assert!(route.length() > Kilometers::ZERO);
    }

    #[test]
    fn read_gpx_without_points() {
        let document = r#"<?xml version="1.0" encoding="UTF-8"?>
            <gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
                <trk><trkseg></trkseg></trk>
            </gpx>
        "#;
        assert!(matches!(parse_route(document.as_bytes()), Err(Error::Parse(_))));
    }

    #[test]
    fn read_gpx_garbage() {
        assert!(matches!(parse_route("not a track".as_bytes()), Err(Error::Parse(_))));
    }

    #[test]
    fn invalid_latitude() {
        let waypoints = [Waypoint { latitude: f64::NAN, longitude: 0.0, elevation: None }];
        assert!(matches!(Route::try_from_waypoints(waypoints), Err(Error::Parse(_))));
    }

    #[test]
    fn haversine_one_degree() {
        assert_abs_diff_eq!(
            haversine_distance(0.0, 0.0, 1.0, 0.0),
            EARTH_RADIUS_METERS * 1.0_f64.to_radians(),
            epsilon = 1e-6,
        );
    }

    #[test]
    fn cumulative_distance_matches_length() {
        let route = northbound(&[Some(0.0), Some(5.0), Some(2.0), Some(2.0), Some(40.0)], 250.0);
        for (from, to) in route.points().iter().tuple_windows() {
            assert!(to.cumulative_distance >= from.cumulative_distance);
        }
        assert_abs_diff_eq!(route.length().to_meters(), 1000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(
            route.points().last().unwrap().cumulative_distance,
            route.length().to_meters(),
            epsilon = 1e-9,
        );
    }

    #[test]
    fn flat_route_is_cruised() {
        let route = northbound(&[None; 10], 100.0);
        assert!(route.points().iter().all(|point| point.grade == 0.0));
        assert!(route.points().iter().all(|point| point.speed == CRUISING_SPEED));
    }

    #[test]
    fn climbs_are_slow() {
        // 10 m over 100 m is ≈0.0997 rad:
        let route = northbound(&[Some(0.0), Some(10.0), Some(10.0)], 100.0);
        assert_abs_diff_eq!(route.points()[1].grade, 0.1_f64.atan(), epsilon = 1e-6);
        assert_eq!(route.points()[1].speed, UPHILL_SPEED);
        assert_eq!(route.points()[2].speed, CRUISING_SPEED);
    }

    #[test]
    fn coincident_points_do_not_divide_by_zero() {
        let waypoints = [
            Waypoint { latitude: 0.0, longitude: 0.0, elevation: Some(0.0) },
            Waypoint { latitude: 0.0, longitude: 0.0, elevation: Some(1.0) },
        ];
        let route = Route::try_from_waypoints(waypoints).unwrap();
        assert!(route.points()[1].grade.is_finite());
        assert_eq!(route.points()[1].speed, UPHILL_SPEED);
        assert_eq!(route.segments().next().unwrap().duration(), 0.0);
    }

    #[test]
    fn topography_ok() {
        let route = northbound(&[Some(10.0), Some(20.0), Some(15.0), Some(15.0)], 100.0);
        let topography = route.topography();
        assert_eq!(topography.n_points, 4);
        assert_abs_diff_eq!(topography.min_elevation, 10.0);
        assert_abs_diff_eq!(topography.max_elevation, 20.0);
        assert_abs_diff_eq!(topography.ascent, 10.0);
        assert_abs_diff_eq!(topography.descent, 5.0);
        assert_abs_diff_eq!(topography.uphill_share, 1.0 / 3.0);
    }
}
