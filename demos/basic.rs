//! Loads a small two-floor map, paints some avoidance and prints a few searches.
//!
//! Run with `RUST_LOG=debug cargo run --example basic --features stats` to see search timings.
use floorpath::{grid::pack_bitmap, prelude::*};

const MAP: [&str; 10] = [
    "..........",
    "..####....",
    "..#..#....",
    "..#..#..##",
    "..........",
    "######.###",
    "..........",
    "...##.....",
    "...##.....",
    "..........",
];

fn load(navigator: &mut Navigator, floor: i32, origin: IVec2) -> Result<(), NavError> {
    let flags: Vec<bool> = MAP
        .iter()
        .flat_map(|row| row.chars().map(|c| c == '.'))
        .collect();
    navigator.load_floor(floor, 10, 10, origin, &pack_bitmap(&flags))
}

fn report(label: &str, result: &SearchResult) {
    match &result.path {
        Some(path) if result.status == PathStatus::PathFound => println!(
            "{label}: {} in {:?}, {} steps, cost {}, ends at {:?}",
            result.status,
            result.elapsed,
            path.len(),
            path.cost(),
            result.reached
        ),
        _ => println!("{label}: {} in {:?}", result.status, result.elapsed),
    }
}

fn main() -> Result<(), NavError> {
    env_logger::init();

    let mut navigator = Navigator::new();
    load(&mut navigator, 0, IVec2::ZERO)?;
    load(&mut navigator, 1, IVec2::new(-20, 40))?;

    // A campfire nobody wants to walk through and a hedge that can't be crossed.
    navigator.rebuild_overlay(
        0,
        &[
            AvoidanceArea::new(6, 6, 2, 2, 120),
            AvoidanceArea::new(6, 5, 1, 1, 255),
        ],
    )?;

    let mut scratch = ScratchBuffers::new();

    let request = SearchRequest::to_tile(0, IVec2::new(0, 0), IVec2::new(9, 9));
    report("corner to corner", &navigator.find_path(&mut scratch, &request, &NeverCancel));

    let request = SearchRequest::to_tile(1, IVec2::new(-20, 40), IVec2::new(-11, 49))
        .with_occupied([IVec3::new(-14, 45, 1)]);
    report("offset floor", &navigator.find_path(&mut scratch, &request, &NeverCancel));

    let result = navigator.find_path_to_any(
        &mut scratch,
        0,
        IVec2::new(0, 9),
        &[IVec2::new(3, 2), IVec2::new(9, 0)],
        &[],
        &NeverCancel,
    );
    report("nearest exit", &result);

    let request =
        SearchRequest::at_stance(0, IVec2::new(0, 9), IVec2::new(8, 8), Stance::at_range(2));
    report("keep distance", &navigator.find_path(&mut scratch, &request, &NeverCancel));

    let request = SearchRequest::to_tile(0, IVec2::new(0, 0), IVec2::new(3, 1));
    report("into a wall", &navigator.find_path(&mut scratch, &request, &NeverCancel));
    report(
        "into a wall, snapped",
        &navigator.find_path_snapped(&mut scratch, &request, &NeverCancel),
    );

    println!(
        "steps to the far corner: {:?}",
        navigator.path_length(
            &mut scratch,
            &SearchRequest::to_tile(0, IVec2::new(0, 0), IVec2::new(9, 9)),
            &NeverCancel
        )
    );

    Ok(())
}
