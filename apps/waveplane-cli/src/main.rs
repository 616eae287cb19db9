use anyhow::Result;
use clap::{Parser, Subcommand};
use glam::Vec2;
use tracing_subscriber::EnvFilter;
use waveplane_kernel::clock::DEFAULT_STEP;
use waveplane_kernel::{CENTER, FrameDriver, PlaneGeometry, RippleParams, ripple_offset};
use waveplane_render::{DebugTextRenderer, Renderer, SceneView};

#[derive(Parser)]
#[command(name = "waveplane-cli", about = "Headless waveplane operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and scene defaults
    Info,
    /// Drive the ripple for a number of frames and dump the surface
    Simulate {
        /// Number of frames to advance
        #[arg(short, long, default_value_t = 60)]
        frames: u64,
        /// Spatial frequency, clamped to [0, 100]
        #[arg(long, default_value_t = 20.0)]
        width: f32,
        /// Amplitude, clamped to [0, 20]
        #[arg(long, default_value_t = 4.0)]
        height: f32,
        /// Temporal frequency, clamped to [0, 5]
        #[arg(long, default_value_t = 1.0)]
        speed: f32,
        /// Plane subdivisions per side
        #[arg(long, default_value_t = 25)]
        segments: u32,
        /// Emit probe samples as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("waveplane-cli v{}", env!("CARGO_PKG_VERSION"));
            let defaults = RippleParams::default();
            println!(
                "defaults: width={} height={} speed={}",
                defaults.width(),
                defaults.height(),
                defaults.speed()
            );
            println!("time step per frame: {DEFAULT_STEP}");
        }
        Commands::Simulate {
            frames,
            width,
            height,
            speed,
            segments,
            json,
        } => {
            let params = RippleParams::new(width, height, speed);
            let mut mesh = PlaneGeometry::new(100.0, 100.0, segments, segments)?;
            let mut driver = FrameDriver::new();

            for _ in 0..frames {
                driver.drive(&mut mesh, Some(&params));
            }
            let t = driver.clock().time();
            tracing::info!(frames, time = t, "simulation complete");

            if json {
                // Probe the center, a half-unit point, and a corner.
                let probes: Vec<_> = [CENTER, Vec2::new(1.0, 0.5), Vec2::new(0.0, 0.0)]
                    .iter()
                    .map(|&uv| {
                        serde_json::json!({
                            "u": uv.x,
                            "v": uv.y,
                            "offset": ripple_offset(uv, t, &params),
                        })
                    })
                    .collect();
                let report = serde_json::json!({
                    "frames": frames,
                    "time": t,
                    "params": params,
                    "probes": probes,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let output = DebugTextRenderer::new().render(&mesh, &SceneView::default());
                print!("{output}");
            }
        }
    }

    Ok(())
}
