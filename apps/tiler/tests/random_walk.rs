use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tiler::adapter::{RecordedTile, RecordingSurface};
use tiler::engine::{FetchRequest, TileSink, Tiler};
use tiler::{Coord, Point, Size, TilerConfig};

const TILE: u32 = 40;

fn expected_placement(coord: Coord, top_left: Coord) -> Point {
    Point::new(
        ((coord.x - top_left.x) * TILE as i64) as f64,
        ((coord.y - top_left.y) * TILE as i64) as f64,
    )
}

#[test_timeout::timeout(30)]
fn arbitrary_moves_keep_tiles_inside_and_placed() {
    for seed in 0..8u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        // Answer roughly half the requested tiles, leaving holes that later
        // refreshes have to fill.
        let mut answer_rng = StdRng::seed_from_u64(seed ^ 0xA5A5);
        let config = TilerConfig {
            tile_size: Some(TILE),
            margin: rng.gen_range(0..=3),
            x: rng.gen_range(-50..=50),
            y: rng.gen_range(-50..=50),
        };
        let mut tiler = Tiler::new(
            &config,
            Size::new(320.0, 240.0),
            RecordingSurface::new(),
            move |request: &FetchRequest, sink: &mut TileSink<RecordedTile>| {
                for &coord in &request.to_fetch {
                    if answer_rng.gen_bool(0.5) {
                        sink.push(coord, RecordedTile::new(coord.to_string()));
                    }
                }
            },
        );
        tiler.refresh();

        for step in 0..300 {
            match rng.gen_range(0..10) {
                0 => tiler.resize(Size::new(
                    rng.gen_range(0.0..=640.0_f64).round(),
                    rng.gen_range(0.0..=480.0_f64).round(),
                )),
                1 => {
                    let anchor = tiler.anchor();
                    tiler.jump_to(Coord::new(
                        anchor.x + rng.gen_range(-6..=6),
                        anchor.y + rng.gen_range(-6..=6),
                    ));
                }
                2 => tiler.reload(),
                _ => {
                    let frame = tiler.frame_position();
                    tiler.drag_stop(Point::new(
                        frame.left + rng.gen_range(-200.0..=200.0_f64).round(),
                        frame.top + rng.gen_range(-200.0..=200.0_f64).round(),
                    ));
                }
            }

            assert!(tiler.verify().is_ok(), "seed {seed} step {step}");
            let corners = tiler.corners();
            let initial = -((TILE * config.margin) as f64);
            let frame = tiler.frame_position();
            assert!(
                (frame.left - initial).abs() < TILE as f64 && (frame.top - initial).abs() < TILE as f64,
                "seed {seed} step {step}: frame {frame:?} drifted a whole tile"
            );
            for (coord, tile) in tiler.tiles() {
                let expected = expected_placement(coord, corners.top_left());
                assert_eq!(tile.position, Some(expected), "seed {seed} step {step} tile {coord}");
                assert_eq!(tiler.placement(coord), Some(expected));
            }
        }
    }
}
