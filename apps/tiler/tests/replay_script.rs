use std::path::PathBuf;

use tiler::Coord;
use tiler::replay::{Delivery, Script, Step, run_script};

fn demo() -> Script {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/pan.toml");
    Script::load(&path).unwrap()
}

#[test_timeout::timeout]
fn demo_script_replays_immediately() {
    let script = demo();
    let reports = run_script(&script, Delivery::Immediate).unwrap();
    assert_eq!(reports.len(), script.steps.len());

    // 3x2 visible plus a one tile ring.
    assert_eq!(reports[0].requests[0].to_fetch.len(), 20);
    assert_eq!(reports[0].tiles, 20);

    // A drag without release changes nothing.
    assert_eq!(reports[2].step, Step::Drag { left: -180.0, top: -100.0 });
    assert!(reports[2].requests.is_empty());
    assert_eq!(reports[2].anchor, Coord::new(0, 0));

    // Released two and a half tiles to the left.
    assert_eq!(reports[3].anchor, Coord::new(2, 0));
    assert_eq!(reports[3].frame.left, -150.0);
    assert_eq!(reports[3].requests[0].removed.len(), 8);
    assert_eq!(reports[3].detached.len(), 8);

    assert_eq!(reports[6].anchor, Coord::new(20, -4));
    assert_eq!(reports[7].requests[0].to_fetch.len(), reports[7].tiles);
}

#[test_timeout::timeout]
fn demo_script_replays_with_loader_thread() {
    let reports = run_script(&demo(), Delivery::Deferred).unwrap();
    assert_eq!(reports[0].tiles, 0);
    assert_eq!(reports[1].delivered, 20);
    assert_eq!(reports[1].tiles, 20);
    // Shrinking only evicts, so nothing is sent to the loader.
    assert!(reports[5].requests[0].to_fetch.is_empty());
    assert_eq!(reports[5].tiles, 12);
    // The jump batch lands first, then the reload batch replaces it.
    let last = reports.last().unwrap();
    assert_eq!(last.anchor, Coord::new(20, -4));
    assert_eq!(last.delivered, 24);
    assert_eq!(last.tiles, 12);
}

#[test_timeout::timeout]
fn reports_serialize_as_json_lines() {
    let reports = run_script(&demo(), Delivery::Immediate).unwrap();
    let line = serde_json::to_string(&reports[0]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["step"]["action"], "refresh");
    assert_eq!(value["requests"][0]["to_fetch"][0], serde_json::json!([-1, -1]));
    assert_eq!(value["corners"]["x1"], -1);
}
