//! Aeolian CLI - wind-blown sand ripples and dunes.
//!
//! Runs either cellular-automaton model, records grayscale frames, and writes
//! the final surface as a colormap preview and a 16-bit heightmap.

use clap::{Args, Parser, Subcommand};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use aeolian::dunes::DuneConfig;
use aeolian::export::{
    assemble_gif, export_colormap_png, export_heightmap_png16, export_profile_png, FrameOptions,
    FrameRecorder, PngExportOptions,
};
use aeolian::pipeline::{
    DuneModel, FrameSink, MemorySink, Pipeline, RippleModel, RunConfig, SurfaceModel, TeeSink,
};
use aeolian::ripples::RippleConfig;

/// Wind-blown sand ripple and dune simulator.
#[derive(Parser)]
#[command(name = "aeolian")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Nishimori-Ouchi ripple model.
    Ripples {
        #[command(flatten)]
        run: RunArgs,

        /// Lattice columns (downwind axis).
        #[arg(long)]
        nx: Option<usize>,

        /// Lattice rows.
        #[arg(long)]
        ny: Option<usize>,

        /// Number of saltation + creep passes.
        #[arg(long)]
        steps: Option<u32>,

        /// Amplitude of the random initial bed.
        #[arg(long)]
        eps: Option<f32>,

        /// Grain quantum in units of eps.
        #[arg(long)]
        q0: Option<f32>,

        /// Base saltation length.
        #[arg(long)]
        l0: Option<f32>,

        /// Height coupling of the saltation length.
        #[arg(long)]
        b: Option<f32>,

        /// Creep coefficient (0..=1).
        #[arg(long)]
        d: Option<f32>,
    },

    /// Run the Werner slab dune model.
    Dunes {
        #[command(flatten)]
        run: RunArgs,

        /// Lattice columns (downwind axis).
        #[arg(long)]
        nx: Option<usize>,

        /// Lattice rows.
        #[arg(long)]
        ny: Option<usize>,

        /// Nominal timesteps (each is nx*ny transport events).
        #[arg(long)]
        timesteps: Option<u32>,

        /// Mean initial slabs per cell.
        #[arg(long)]
        mean_height: Option<u32>,

        /// Deposition probability on sand.
        #[arg(long)]
        p_sand: Option<f32>,

        /// Deposition probability on bare substrate.
        #[arg(long)]
        p_nosand: Option<f32>,

        /// Saltation hop length in cells.
        #[arg(long)]
        jump_length: Option<usize>,

        /// Shadow zone angle in degrees.
        #[arg(long)]
        shadow_angle: Option<f32>,

        /// Capture a frame every N timesteps.
        #[arg(long)]
        frame_interval: Option<u32>,
    },

    /// Display lattice and workload information for a configuration.
    Info {
        /// Lattice columns.
        #[arg(long, default_value = "100")]
        nx: usize,

        /// Lattice rows.
        #[arg(long, default_value = "100")]
        ny: usize,

        /// Mean initial slabs per cell (dunes).
        #[arg(long, default_value = "3")]
        mean_height: u32,
    },
}

/// Options shared by both models.
#[derive(Args)]
struct RunArgs {
    /// Random seed for reproducible runs.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output directory.
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// JSON configuration file; flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not write per-step frames.
    #[arg(long)]
    no_frames: bool,

    /// Assemble recorded frames into a looping GIF.
    #[arg(long)]
    gif: bool,

    /// GIF frame delay in milliseconds.
    #[arg(long, default_value = "100")]
    gif_delay_ms: u32,

    /// Height offset drawn as full white/black in frames.
    #[arg(long)]
    frame_max: Option<f32>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ripples { run, nx, ny, steps, eps, q0, l0, b, d } => {
            let mut config: RippleConfig = load_config(run.config.as_deref());
            override_with(&mut config.nx, nx);
            override_with(&mut config.ny, ny);
            override_with(&mut config.steps, steps);
            override_with(&mut config.eps, eps);
            override_with(&mut config.q0, q0);
            override_with(&mut config.l0, l0);
            override_with(&mut config.b, b);
            override_with(&mut config.d, d);
            if run.no_frames {
                config.write_frames = false;
            }
            run_ripples(config, run);
        }
        Commands::Dunes {
            run,
            nx,
            ny,
            timesteps,
            mean_height,
            p_sand,
            p_nosand,
            jump_length,
            shadow_angle,
            frame_interval,
        } => {
            let mut config: DuneConfig = load_config(run.config.as_deref());
            override_with(&mut config.nx, nx);
            override_with(&mut config.ny, ny);
            override_with(&mut config.timesteps, timesteps);
            override_with(&mut config.mean_slab_height, mean_height);
            override_with(&mut config.p_sand, p_sand);
            override_with(&mut config.p_nosand, p_nosand);
            override_with(&mut config.jump_length, jump_length);
            override_with(&mut config.shadow_angle_deg, shadow_angle);
            override_with(&mut config.frame_interval, frame_interval);
            if run.no_frames {
                config.frame_interval = 0;
            }
            run_dunes(config, run);
        }
        Commands::Info { nx, ny, mean_height } => {
            run_info(nx, ny, mean_height);
        }
    }
}

fn fail(context: &str, err: impl Display) -> ! {
    error!("{}: {}", context, err);
    std::process::exit(1);
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

fn load_config<C: DeserializeOwned + Default>(path: Option<&Path>) -> C {
    let Some(path) = path else {
        return C::default();
    };
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| fail(&format!("Error reading {}", path.display()), e));
    serde_json::from_str(&text).unwrap_or_else(|e| fail(&format!("Error parsing {}", path.display()), e))
}

fn write_config<C: Serialize>(config: &C, output: &Path) {
    let path = output.join("config.json");
    let text = serde_json::to_string_pretty(config).unwrap_or_else(|e| fail("Error serializing config", e));
    std::fs::write(&path, text).unwrap_or_else(|e| fail(&format!("Error writing {}", path.display()), e));
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    })
}

fn run_ripples(config: RippleConfig, run: RunArgs) {
    let seed = resolve_seed(run.seed);

    println!("Aeolian - Sand Ripples");
    println!("======================");
    println!("Lattice: {}x{}", config.nx, config.ny);
    println!("Steps: {}", config.steps);
    println!("Seed: {}", seed);
    println!("Output: {}", run.output.display());

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut model = RippleModel::new(config.clone(), &mut rng).unwrap_or_else(|e| fail("Error initializing ripples", e));
    let frame_options = FrameOptions {
        max_val: run.frame_max.unwrap_or(2.0),
        center: 0.0,
    };

    drive(&mut model, RunConfig::for_ripples(&config), &mut rng, &run, frame_options);
    write_config(&config, &run.output);
}

fn run_dunes(config: DuneConfig, run: RunArgs) {
    let seed = resolve_seed(run.seed);

    println!("Aeolian - Sand Dunes");
    println!("====================");
    println!("Lattice: {}x{}", config.nx, config.ny);
    println!("Timesteps: {} ({} events each)", config.timesteps, config.events_per_timestep());
    println!("Initial slabs: {}", config.initial_slabs());
    println!("Seed: {}", seed);
    println!("Output: {}", run.output.display());

    let start = Instant::now();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut model = DuneModel::new(config.clone(), &mut rng).unwrap_or_else(|e| fail("Error seeding dunes", e));
    info!("Seeded initial slabs in {:.2?}", start.elapsed());

    let mean = config.mean_slab_height.max(1) as f32;
    let frame_options = FrameOptions {
        max_val: run.frame_max.unwrap_or(mean),
        center: mean,
    };

    drive(&mut model, RunConfig::for_dunes(&config), &mut rng, &run, frame_options);

    let totals = model.totals();
    println!(
        "Events: {} moved, {} empty, {} shadowed, {} avalanche moves",
        totals.moved, totals.empty, totals.shadowed, totals.avalanche_moves
    );
    write_config(&config, &run.output);
}

fn drive(
    model: &mut dyn SurfaceModel,
    run_config: RunConfig,
    rng: &mut ChaCha8Rng,
    run: &RunArgs,
    frame_options: FrameOptions,
) {
    std::fs::create_dir_all(&run.output)
        .unwrap_or_else(|e| fail("Error creating output directory", e));

    let mut recorder = if run_config.frame_interval > 0 {
        Some(
            FrameRecorder::new(run.output.join("frames"), frame_options)
                .unwrap_or_else(|e| fail("Error creating frame directory", e)),
        )
    } else {
        None
    };
    // A one-row lattice is also recorded as a stacked space-time profile.
    let one_row = model.snapshot().ny() == 1;
    let mut profile = MemorySink::default();

    let report_every = (run_config.steps / 10).max(1);
    let summary = {
        let mut sinks: Vec<&mut dyn FrameSink> = Vec::new();
        if let Some(r) = recorder.as_mut() {
            sinks.push(r);
        }
        if one_row {
            sinks.push(&mut profile);
        }
        Pipeline::new(run_config)
            .run_with_callbacks(model, rng, &mut TeeSink::new(sinks), |step, total| {
                if step % report_every == 0 || step == total {
                    println!("  [{}/{}] steps", step, total);
                }
            })
            .unwrap_or_else(|e| fail("Error during simulation", e))
    };

    println!("Simulation completed in {:.2?}", summary.elapsed);
    println!("Mass: {:.4} -> {:.4}", summary.initial_mass, summary.final_mass);

    if run.gif {
        match recorder.as_ref() {
            Some(r) if !r.frames().is_empty() => {
                let path = run.output.join("animation.gif");
                assemble_gif(r.frames(), &path, run.gif_delay_ms)
                    .unwrap_or_else(|e| fail("Error assembling GIF", e));
                println!("  Wrote {}", path.display());
            }
            _ => warn!("--gif requested but no frames were recorded"),
        }
    }

    if !profile.frames.is_empty() {
        let path = run.output.join("profile.png");
        export_profile_png(&profile.frames, 0, &path).unwrap_or_else(|e| fail("Error exporting profile", e));
        println!("  Wrote {}", path.display());
    }

    let surface = model.snapshot();
    let (min_h, max_h) = surface.height_range();
    println!("Height range: [{:.4}, {:.4}]", min_h, max_h);

    let options = PngExportOptions::auto_range(&surface);
    let preview = run.output.join("surface.png");
    export_colormap_png(&surface, &preview, &options).unwrap_or_else(|e| fail("Error exporting preview", e));
    let heightmap = run.output.join("heightmap.png");
    export_heightmap_png16(&surface, &heightmap, &options).unwrap_or_else(|e| fail("Error exporting heightmap", e));
    println!("  Wrote {}", preview.display());
    println!("  Wrote {}", heightmap.display());
}

fn run_info(nx: usize, ny: usize, mean_height: u32) {
    let cells = (nx as u64) * (ny as u64);
    let bytes_ripples = cells * 4; // f32
    let bytes_dunes = cells * 4; // u32
    let bytes_png16 = cells * 2;
    let bytes_frame = cells;

    println!("Aeolian - Lattice Info");
    println!("======================");
    println!();
    println!("Lattice: {}x{} ({} cells)", nx, ny, cells);
    println!();
    println!("Memory usage (in-memory):");
    println!("  Ripple heights: {:>12} bytes ({:.2} MB)", bytes_ripples, bytes_ripples as f64 / 1024.0 / 1024.0);
    println!("  Dune slabs:     {:>12} bytes ({:.2} MB)", bytes_dunes, bytes_dunes as f64 / 1024.0 / 1024.0);
    println!();
    println!("Dune workload:");
    println!("  Events per timestep: {:>12}", cells);
    println!("  Initial slabs:       {:>12}", cells * mean_height as u64);
    println!();
    println!("Export file sizes (uncompressed):");
    println!("  Frame (8-bit):    {:>10} bytes", bytes_frame);
    println!("  Heightmap (16-bit): {:>8} bytes", bytes_png16);
}
