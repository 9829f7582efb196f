use std::{
	path::{Path, PathBuf},
	sync::Arc,
	thread,
	time::Duration,
};

use clap::{Parser, Subcommand};
use log::info;
use mcmap::{
	MapConfig, MapError, MapResult, Tile, TILE_SIZE, WorldMap,
	world::{
		features::{FeatureMarkers, PointMarker},
		players::{NoLivePositions, PlayerMarker},
	},
};
use serde::Serialize;

#[derive(Parser)]
#[command(
	name = "mcmap",
	about = "Render map tiles and markers from a Minecraft world"
)]
struct Cli {
	/// JSON map config. Positional world paths override its worldDir.
	#[arg(long, global = true)]
	config: Option<PathBuf>,
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Render one region of a world to a PNG
	Tile {
		world: PathBuf,
		#[arg(allow_negative_numbers = true)]
		region_x: i32,
		#[arg(allow_negative_numbers = true)]
		region_z: i32,
		/// Output PNG path
		#[arg(long, short)]
		output: PathBuf,
	},
	/// Render the seed preview of one region to a PNG
	Preview {
		seed: String,
		#[arg(allow_negative_numbers = true)]
		region_x: i32,
		#[arg(allow_negative_numbers = true)]
		region_z: i32,
		/// Output PNG path
		#[arg(long, short)]
		output: PathBuf,
	},
	/// Print structures, spawners, the world spawn and players as JSON
	Markers {
		world: PathBuf,
	},
	/// Render every region of a world, logging progress
	GenerateAll {
		world: PathBuf,
		/// Also write every tile as a PNG into this directory
		#[arg(long)]
		out_dir: Option<PathBuf>,
	},
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkerReport<'a> {
	#[serde(flatten)]
	features: &'a FeatureMarkers,
	world_spawn: Option<PointMarker>,
	players: Vec<PlayerMarker>,
}

fn load_config(path: Option<&Path>, world: &Path) -> MapResult<MapConfig> {
	let mut config = match path {
		Some(path) => MapConfig::load(path)?,
		None => MapConfig::default(),
	};
	config.world_dir = world.to_owned();
	Ok(config)
}

fn write_png(tile: &Tile, path: &Path) -> MapResult<()> {
	let image = image::RgbImage::from_raw(TILE_SIZE as u32, TILE_SIZE as u32, tile.as_bytes().to_vec())
		.ok_or_else(|| MapError::Custom("tile buffer has the wrong size".to_owned()))?;
	image.save(path)
		.map_err(|err| MapError::Custom(format!("failed to write {}: {err}", path.display())))?;
	info!("Wrote {}", path.display());
	Ok(())
}

fn run_markers(config: MapConfig) -> MapResult<()> {
	let map = WorldMap::new(config);
	let features = map.feature_markers()?;
	let report = MarkerReport {
		features: &features,
		world_spawn: map.world_spawn()?,
		players: map.player_markers(&NoLivePositions)?,
	};
	println!("{}", serde_json::to_string_pretty(&report)?);
	Ok(())
}

fn run_generate_all(config: MapConfig, out_dir: Option<PathBuf>) -> MapResult<()> {
	let map = Arc::new(WorldMap::new(config));
	if !map.start_generate_all() {
		return MapError::custom("a map job is already running");
	}
	let mut reported = usize::MAX;
	let status = loop {
		let status = map.job_status();
		if !status.running {
			break status;
		}
		if status.done != reported {
			info!("Rendered {}/{} regions", status.done, status.total);
			reported = status.done;
		}
		thread::sleep(Duration::from_millis(250));
	};
	if let Some(out_dir) = out_dir {
		std::fs::create_dir_all(&out_dir)?;
		for file in map.region_files()? {
			let tile = map.region_tile(file.x, file.z)?;
			write_png(&tile, &out_dir.join(format!("r.{}.{}.png", file.x, file.z)))?;
		}
	}
	println!("{}", serde_json::to_string_pretty(&status)?);
	match status.error {
		Some(error) => MapError::custom(error),
		None => Ok(()),
	}
}

fn main() {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let cli = Cli::parse();
	let config_path = cli.config.as_deref();

	let result = match cli.command {
		Command::Tile { world, region_x, region_z, output } => {
			load_config(config_path, &world).and_then(|config| {
				let tile = WorldMap::new(config).region_tile(region_x, region_z)?;
				write_png(&tile, &output)
			})
		}
		Command::Preview { seed, region_x, region_z, output } => {
			let tile = mcmap::render::render_seed_preview_tile(&seed, region_x, region_z);
			write_png(&tile, &output)
		}
		Command::Markers { world } => load_config(config_path, &world).and_then(run_markers),
		Command::GenerateAll { world, out_dir } => {
			load_config(config_path, &world).and_then(|config| run_generate_all(config, out_dir))
		}
	};

	if let Err(err) = result {
		exit_with_error(err);
	}
}

fn exit_with_error(err: MapError) -> ! {
	eprintln!("Error: {}", err);
	std::process::exit(1);
}
