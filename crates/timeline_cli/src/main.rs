//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `timeline_core` linkage without the browser bridge.
//! - Print deterministic interval output for quick local sanity checks.

use timeline_core::{generate_intervals, parse_timeline_date, IntervalType, TimelineBounds};

fn main() {
    println!("timeline_core ping={}", timeline_core::ping());
    println!("timeline_core version={}", timeline_core::core_version());

    let Some(bounds) = TimelineBounds::from_parts(
        parse_timeline_date("1939-09-01"),
        parse_timeline_date("1945-09-02"),
    ) else {
        eprintln!("timeline_core smoke bounds are invalid");
        std::process::exit(1);
    };
    for tick in generate_intervals(&bounds, IntervalType::Yearly, None) {
        println!("tick label={} position={:.2}", tick.label, tick.position_percent);
    }
}
