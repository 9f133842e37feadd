//! Human-readable text output formatter

use crate::error::Result;
use crate::format::{OutputFormatter, Report};
use crate::geo::{Coordinates, ResolvedLocation};
use crate::service::route::RouteResult;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &Report<'_>) -> Result<String> {
        let mut output = String::new();

        match report {
            Report::Location(location) => write_location(&mut output, location),
            Report::Places(places) => {
                output.push_str(&format!("{} place(s)\n", places.len()));
                for (i, place) in places.iter().enumerate() {
                    output.push_str(&format!(
                        "  {}. {} [{}] {}\n",
                        i + 1,
                        place.name,
                        place.place_type,
                        point(&place.coordinates)
                    ));
                    output.push_str(&format!("     {} {}", place.city, place.address));
                    if let Some(d) = place.distance_m {
                        output.push_str(&format!(" ({:.0}m)", d));
                    }
                    output.push('\n');
                }
            }
            Report::Distance(report) => {
                output.push_str(&format!(
                    "From: {} {}\n",
                    report.from.name,
                    point(&report.from.coordinates)
                ));
                output.push_str(&format!(
                    "To: {} {}\n",
                    report.to.name,
                    point(&report.to.coordinates)
                ));
                output.push_str(&format!("Distance: {:.2} km\n", report.distance_km));
            }
            Report::Route(route) => write_route(&mut output, route),
        }

        Ok(output)
    }
}

fn point(c: &Coordinates) -> String {
    format!("({:.6}, {:.6})", c.lng, c.lat)
}

fn write_location(output: &mut String, location: &ResolvedLocation) {
    output.push_str(&format!("{}\n", location.name));
    output.push_str(&format!("  Address: {}\n", location.formatted_address));
    output.push_str(&format!("  Coordinates: {}\n", point(&location.coordinates)));

    let region: Vec<&str> = [&location.province, &location.city, &location.district]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .collect();
    if !region.is_empty() {
        output.push_str(&format!("  Region: {}\n", region.join(" ")));
    }
    output.push_str(&format!("  Source: {}\n", location.source));
}

fn write_route(output: &mut String, route: &RouteResult) {
    let mode = format!("{} ({})", route.mode.label(), route.mode);

    if !route.success {
        output.push_str(&format!(
            "Route {} failed: {}\n",
            mode,
            route.error_message.as_deref().unwrap_or("unknown error")
        ));
        return;
    }

    output.push_str(&format!("Route {}\n", mode));
    if let Some(origin) = &route.origin_location {
        output.push_str(&format!("  From: {}\n", point(origin)));
    }
    if let Some(dest) = &route.dest_location {
        output.push_str(&format!("  To: {}\n", point(dest)));
    }
    output.push_str(&format!("  Distance: {:.1} km\n", route.distance_km));
    output.push_str(&format!("  Duration: {} min\n", route.duration_min));
    output.push_str(&format!("  Path: {} points\n", route.path.len()));
}
