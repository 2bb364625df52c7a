use std::error::Error;

use clap::Parser;
use glam::Vec3;
use scenetree::Scene;
use tracing::{debug, info};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(author, version, about = "Spin a two-level hierarchy and log world transforms", long_about = None)]
struct Cli {
	#[arg(long, default_value_t = 10, help = "Number of frames to simulate")]
	frames: u32,
	#[arg(long, default_value_t = 1.0 / 60.0, help = "Seconds per frame, used as the rotation angle in radians")]
	dt: f32,
	#[arg(short, long, help = "Also print the hierarchy every frame")]
	verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();

	tracing_subscriber::registry()
		.with(fmt::layer())
		.with(if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO })
		.init();

	let mut scene = Scene::new();

	let obj1 = scene.new_node();
	scene.add_to_root(obj1)?;

	let obj2 = scene.new_node();
	if let Some(node) = scene.node_mut(obj2) {
		node.set_position(Vec3::new(1.5, 0.0, 0.0));
	}
	scene.add(obj1, obj2)?;

	scene.update(false);

	for frame in 0..cli.frames {
		if let Some(node) = scene.node_mut(obj1) {
			node.rotate_y(cli.dt);
		}
		if let Some(node) = scene.node_mut(obj2) {
			node.rotate_z(cli.dt);
		}

		scene.update(false);

		for uuid in [obj1, obj2] {
			let Some(node) = scene.node(uuid) else {
				continue;
			};
			let pos = node.world_position();
			let rot = node.world_rotation();
			info!(
				"frame {frame}: {uuid} at ({:.3}, {:.3}, {:.3}) facing ({:.3}, {:.3}, {:.3}, {:.3})",
				pos.x, pos.y, pos.z, rot.x, rot.y, rot.z, rot.w
			);
		}
		debug!("\n{scene}");
	}

	Ok(())
}
