use std::io::{self, Write};

use tracing::info;

use crate::cli::{Cli, Command, OutputFormat, ReplayArgs, WanderArgs};
use crate::cli::error::CliError;
use crate::config::TilerConfig;
use crate::model::{Coord, Size};
use crate::replay::{self, Delivery, Script, StepReport, WanderOptions, WanderSummary};
use crate::telemetry;

/// Tile edge a walk uses when neither the flag, the config file nor the
/// environment names one.
pub const WANDER_TILE_SIZE: u32 = 64;

pub fn run(cli: Cli) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command {
        Command::Replay(args) => run_replay(args, &mut out),
        Command::Wander(args) => run_wander(args, &mut out),
    }
}

fn delivery(deferred: bool) -> Delivery {
    if deferred {
        Delivery::Deferred
    } else {
        Delivery::Immediate
    }
}

fn run_replay(args: ReplayArgs, out: &mut impl Write) -> Result<(), CliError> {
    let script = Script::load(&args.script)?;
    info!(
        target: "tiler::cli",
        script = %args.script.display(),
        steps = script.steps.len(),
        deferred = args.deferred,
        "replay_start"
    );
    let reports = replay::run_script(&script, delivery(args.deferred))?;
    for report in &reports {
        match args.format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(report)?)?,
            OutputFormat::Text => write_report(out, report)?,
        }
    }
    telemetry::report();
    Ok(())
}

fn run_wander(args: WanderArgs, out: &mut impl Write) -> Result<(), CliError> {
    let mut config = match &args.config {
        Some(path) => TilerConfig::load(path)?,
        None => TilerConfig::default(),
    }
    .apply_env()?;
    config.tile_size = args.tile_size.or(config.tile_size).or(Some(WANDER_TILE_SIZE));
    info!(
        target: "tiler::cli",
        seed = args.seed,
        steps = args.steps,
        tile_size = ?config.tile_size,
        margin = config.margin,
        "wander_start"
    );
    let options = WanderOptions {
        steps: args.steps,
        seed: args.seed,
        viewport: Size::new(args.width, args.height),
        max_drag: args.max_drag,
        delivery: delivery(args.deferred),
    };
    let summary = replay::wander(&config, &options)?;
    telemetry::report();
    match args.format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&summary)?)?,
        OutputFormat::Text => write_summary(out, &summary)?,
    }
    Ok(())
}

fn write_report(out: &mut impl Write, report: &StepReport) -> io::Result<()> {
    writeln!(
        out,
        "#{} {} anchor={} corners={} frame=({}, {}) tiles={}",
        report.index,
        report.step.name(),
        report.anchor,
        report.corners,
        report.frame.left,
        report.frame.top,
        report.tiles
    )?;
    for request in &report.requests {
        writeln!(
            out,
            "  fetch {} remove {}",
            coord_list(&request.to_fetch),
            coord_list(&request.removed)
        )?;
    }
    if report.delivered > 0 {
        writeln!(out, "  delivered {}", report.delivered)?;
    }
    if !report.detached.is_empty() {
        writeln!(out, "  detached {}", report.detached.join(" "))?;
    }
    Ok(())
}

fn write_summary(out: &mut impl Write, summary: &WanderSummary) -> io::Result<()> {
    writeln!(out, "steps       {}", summary.steps)?;
    writeln!(out, "fetches     {}", summary.fetches)?;
    writeln!(out, "fetched     {}", summary.fetched)?;
    writeln!(out, "evicted     {}", summary.evicted)?;
    writeln!(out, "peak tiles  {}", summary.peak_tiles)?;
    writeln!(out, "final tiles {}", summary.final_tiles)?;
    writeln!(out, "anchor      {}", summary.final_anchor)
}

fn coord_list(coords: &[Coord]) -> String {
    if coords.is_empty() {
        return "-".to_string();
    }
    coords
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ENV_MUTEX;
    use crate::engine::FetchRequest;
    use crate::model::{Corners, Point};
    use crate::replay::Step;
    use clap::Parser;

    fn wander_json(argv: &[&str]) -> serde_json::Value {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let cli = Cli::try_parse_from(argv).unwrap();
        let Command::Wander(args) = cli.command else {
            panic!("expected wander");
        };
        let mut buf = Vec::new();
        run_wander(args, &mut buf).unwrap();
        serde_json::from_slice(&buf).unwrap()
    }

    #[test_timeout::timeout]
    fn default_wander_fetches_tiles() {
        let summary = wander_json(&["tiler", "wander", "--steps", "50", "--format", "json"]);
        assert_eq!(summary["steps"], 50);
        assert!(summary["fetched"].as_u64().unwrap() > 0);
        assert!(summary["peak_tiles"].as_u64().unwrap() > 0);
    }

    #[test_timeout::timeout]
    fn tile_size_flag_changes_the_grid() {
        let argv = ["tiler", "wander", "--steps", "0", "--width", "640", "--height", "480"];
        let coarse = wander_json(&[&argv[..], &["--tile-size", "320", "--format", "json"][..]].concat());
        // 2 + 2 * margin columns by 2 + 2 * margin rows.
        assert_eq!(coarse["final_tiles"], 36);
        let fine = wander_json(&[&argv[..], &["--tile-size", "160", "--format", "json"][..]].concat());
        assert_eq!(fine["final_tiles"], 56);
    }

    #[test_timeout::timeout]
    fn text_report_lists_requests() {
        let report = StepReport {
            index: 3,
            step: Step::Refresh,
            requests: vec![FetchRequest::new(vec![Coord::new(1, 0)], vec![])],
            detached: vec!["0:0@1".into()],
            delivered: 0,
            anchor: Coord::new(0, 0),
            corners: Corners::new(-1, -1, 1, 1),
            frame: Point::new(-100.0, -100.0),
            tiles: 9,
        };
        let mut buf = Vec::new();
        write_report(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("#3 refresh anchor=(0, 0)"));
        assert!(text.contains("  fetch (1, 0) remove -\n"));
        assert!(text.contains("  detached 0:0@1\n"));
    }
}
