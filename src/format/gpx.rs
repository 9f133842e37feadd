//! GPX output formatter
//!
//! Locations and places become waypoints; a route becomes a single-segment
//! track between its endpoint waypoints.

use crate::error::Result;
use crate::format::{OutputFormatter, Report};
use crate::geo::Coordinates;

/// GPX formatter - outputs GPX waypoints and tracks
pub struct GpxFormatter;

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoints and route track"
    }

    fn format(&self, report: &Report<'_>) -> Result<String> {
        let mut gpx = String::new();

        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="wayfinder">"#);
        gpx.push('\n');

        match report {
            Report::Location(location) => {
                push_waypoint(
                    &mut gpx,
                    &location.coordinates,
                    &location.name,
                    Some(location.formatted_address.as_str()),
                );
            }
            Report::Places(places) => {
                for place in places.iter() {
                    push_waypoint(
                        &mut gpx,
                        &place.coordinates,
                        &place.name,
                        Some(place.address.as_str()),
                    );
                }
            }
            Report::Distance(report) => {
                push_waypoint(&mut gpx, &report.from.coordinates, &report.from.name, None);
                push_waypoint(&mut gpx, &report.to.coordinates, &report.to.name, None);
            }
            Report::Route(route) => {
                if let Some(origin) = &route.origin_location {
                    push_waypoint(&mut gpx, origin, "Origin", None);
                }
                if let Some(dest) = &route.dest_location {
                    push_waypoint(&mut gpx, dest, "Destination", None);
                }
                if !route.path.is_empty() {
                    gpx.push_str("  <trk>\n");
                    gpx.push_str(&format!("    <name>{}</name>\n", route.mode.label()));
                    gpx.push_str(&format!(
                        "    <desc>{:.1} km, {} min</desc>\n",
                        route.distance_km, route.duration_min
                    ));
                    gpx.push_str("    <trkseg>\n");
                    for p in &route.path {
                        gpx.push_str(&format!(
                            "      <trkpt lat=\"{}\" lon=\"{}\"/>\n",
                            p.lat, p.lng
                        ));
                    }
                    gpx.push_str("    </trkseg>\n");
                    gpx.push_str("  </trk>\n");
                }
            }
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}

fn push_waypoint(gpx: &mut String, at: &Coordinates, name: &str, desc: Option<&str>) {
    gpx.push_str(&format!(r#"  <wpt lat="{}" lon="{}">"#, at.lat, at.lng));
    gpx.push('\n');
    gpx.push_str(&format!("    <name>{}</name>\n", escape(name)));
    if let Some(desc) = desc.filter(|d| !d.is_empty()) {
        gpx.push_str(&format!("    <desc>{}</desc>\n", escape(desc)));
    }
    gpx.push_str("  </wpt>\n");
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
