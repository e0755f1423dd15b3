//! Blade Arcade headless driver
//!
//! Runs the simulation against the scripted autopilot for a fixed simulated
//! duration and prints a JSON summary. Useful for tuning and soak runs without
//! a headset.

#[cfg(not(target_os = "android"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::Context;
    use blade_arcade::autopilot::{Autopilot, RunReport, run_with};
    use blade_arcade::consts::{DEFAULT_SEED, FALLBACK_REFRESH_RATE};
    use blade_arcade::render::{DrawCommand, build_draw_list};
    use blade_arcade::sim::GameState;
    use blade_arcade::{QualityPreset, Settings, Tuning};
    use clap::Parser;
    use serde::Serialize;

    #[derive(Parser, Debug)]
    #[command(name = "blade-arcade", about = "Headless blade arcade simulation")]
    struct Cli {
        /// Simulated seconds to run
        #[arg(long, default_value_t = 60.0)]
        seconds: f32,

        /// Seed for the game's LCG and the autopilot
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u32,

        /// Tuning JSON file (missing fields use defaults)
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Settings JSON file (missing fields use defaults)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Quality preset override: low, medium or high
        #[arg(long)]
        quality: Option<String>,

        /// Probability that the autopilot ignores a target
        #[arg(long, default_value_t = 0.2)]
        miss_rate: f32,

        /// Reported display refresh rate (Hz)
        #[arg(long, default_value_t = FALLBACK_REFRESH_RATE)]
        refresh_rate: f32,

        /// Print the effective tuning as JSON and exit
        #[arg(long)]
        dump_tuning: bool,
    }

    #[derive(Debug, Serialize)]
    struct SessionSummary {
        seed: u32,
        simulated_seconds: f32,
        #[serde(flatten)]
        report: RunReport,
        peak_draw_commands: usize,
        peak_cubes: usize,
        peak_lines: usize,
    }

    pub fn run() -> anyhow::Result<()> {
        let cli = Cli::parse();
        env_logger::init();

        let tuning = match &cli.tuning {
            Some(path) => Tuning::load(path)
                .with_context(|| format!("loading tuning from {}", path.display()))?,
            None => Tuning::default(),
        };

        if cli.dump_tuning {
            println!("{}", serde_json::to_string_pretty(&tuning)?);
            return Ok(());
        }

        let mut settings = match &cli.settings {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if let Some(name) = &cli.quality {
            settings.quality = QualityPreset::parse(name)
                .with_context(|| format!("unknown quality preset '{name}'"))?;
        }

        anyhow::ensure!(cli.seconds >= 0.0, "--seconds must not be negative");
        anyhow::ensure!(
            (0.0..=1.0).contains(&cli.miss_rate),
            "--miss-rate must be within [0, 1]"
        );

        log::info!(
            "Blade Arcade headless run: {}s at {} Hz, seed {}, quality {}",
            cli.seconds,
            cli.refresh_rate,
            cli.seed,
            settings.quality.as_str()
        );

        let mut state = GameState::with_config(cli.seed, tuning, settings);
        let mut pilot = Autopilot::new(cli.seed as u64, cli.miss_rate).with_refresh_rate(cli.refresh_rate);
        let frames = pilot.frames_for(cli.seconds);

        let (mut peak_draw_commands, mut peak_cubes, mut peak_lines) = (0, 0, 0);
        let report = run_with(&mut state, &mut pilot, frames, |state, _| {
            let draws = build_draw_list(state);
            let cubes = draws
                .iter()
                .filter(|d| matches!(d, DrawCommand::Cube { .. }))
                .count();
            peak_draw_commands = peak_draw_commands.max(draws.len());
            peak_cubes = peak_cubes.max(cubes);
            peak_lines = peak_lines.max(draws.len() - cubes);
        });

        log::info!(
            "Finished {} frames: {} games, best score {}",
            report.frames,
            report.games_finished,
            report.best_score
        );

        let summary = SessionSummary {
            seed: cli.seed,
            simulated_seconds: cli.seconds,
            report,
            peak_draw_commands,
            peak_cubes,
            peak_lines,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_os = "android"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_os = "android")]
fn main() {
    // Android hosts load the library directly; there is no standalone driver
}
