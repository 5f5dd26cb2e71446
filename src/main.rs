use quadtree_img::error::CoreError;
use quadtree_img::{container, pgm, tree};

use std::fs::File;
use std::io::{Read, Write};

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	eprintln!("{}", msg);
	std::process::exit(code)
}

fn exit_code_for(err: CoreError) -> (&'static str, i32) {
	match err {
		CoreError::InvalidDimensions => ("Input raster has invalid dimensions", 4),
		CoreError::InvalidPixel => ("Input raster contains an out-of-range pixel", 4),
		CoreError::InvalidAlpha => ("Alpha must be a positive real number", 2),
		CoreError::Underflow => ("Compressed data ended unexpectedly", 4),
		CoreError::MalformedHeader => ("Compressed data has an invalid header", 4),
		CoreError::AllocationFailure => ("Computation limits exceeded", 5),
	}
}

fn default_output_path(input_path: &str, ext: &str) -> String {
	input_path.rsplitn(2, '.').last().unwrap().to_string() + ext
}

fn read_file(path: &str) -> Vec<u8> {
	let mut fh = match File::open(path) {
		Ok(f) => f,
		Err(_) => error_exit("File not found or could not be read", 3),
	};
	let mut data = Vec::new();
	match fh.read_to_end(&mut data) {
		Ok(_) => (),
		Err(_) => error_exit("Could not read from input file", 3),
	}
	data
}

fn write_file(path: &str, data: &[u8]) {
	let mut fh = match File::create(path) {
		Ok(f) => f,
		Err(_) => error_exit("Could not open output file", 3),
	};
	match fh.write_all(data) {
		Ok(_) => (),
		Err(_) => error_exit("Could not write to output file", 3),
	}
}

/// `clap`-based CLI for the quadtree grayscale image codec.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image data
///
/// 5: computation limits exceeded
fn main() {
	let matches = clap::App::new("quadtree_img")
		.version("0.3.0")
		.author("vkcz")
		.about("Lossless/lossy grayscale image codec based on a complete quadtree decomposition.")
		.arg_from_usage("-c, --compress 'Encode a PGM raster into a QTC/Q1 compressed file'")
		.arg_from_usage("-u, --uncompress 'Decode a QTC/Q1 compressed file back into a PGM raster'")
		.arg_from_usage("-g, --grid 'Also emit a segmentation-grid PGM alongside the main output'")
		.arg_from_usage("-a, --alpha=[N] 'Enables lossy filtering during encode with positive real alpha'")
		.arg_from_usage("-v, --verbose 'Print progress information to stderr'")
		.arg_from_usage("-i, --input=<PATH> 'Path to the input file'")
		.arg_from_usage("-o, --output=[PATH] 'Path to the output file; defaults to INPUT with a modified extension'")
		.get_matches();

	let (compress, uncompress) = (matches.is_present("compress"), matches.is_present("uncompress"));
	let verbose = matches.is_present("verbose");
	let input_path = matches.value_of("input").unwrap();

	match (compress, uncompress) {
		(true, true) => error_exit("Only one of -c/--compress and -u/--uncompress must be present", 2),
		(false, false) => error_exit("One of -c/--compress and -u/--uncompress must be present", 2),
		(true, false) => run_compress(input_path, &matches, verbose),
		(false, true) => run_uncompress(input_path, &matches, verbose),
	}
}

fn run_compress(input_path: &str, matches: &clap::ArgMatches, verbose: bool) {
	let alpha = match matches.value_of("alpha") {
		Some(s) => match s.parse::<f64>() {
			Ok(n) => Some(n),
			Err(_) => error_exit("Non-numeric value for alpha", 2),
		},
		None => None,
	};

	let source = read_file(input_path);
	let image = match pgm::read(&source) {
		Ok(p) => p,
		Err(e) => {
			let (msg, code) = exit_code_for(e);
			error_exit(msg, code)
		}
	};
	if image.width != image.height {
		error_exit("Input raster has invalid dimensions", 4);
	}
	if verbose {
		eprintln!("read {}x{} raster, max_val={}", image.width, image.height, image.max_val);
	}

	let mut quadtree = match tree::builder::build(&image.pixels, image.width, image.max_val) {
		Ok(t) => t,
		Err(e) => {
			let (msg, code) = exit_code_for(e);
			error_exit(msg, code)
		}
	};
	if let Some(alpha) = alpha {
		if let Err(e) = tree::filter::apply(&mut quadtree, alpha) {
			let (msg, code) = exit_code_for(e);
			error_exit(msg, code)
		}
		if verbose {
			eprintln!("applied lossy filter with alpha={}", alpha);
		}
	}

	let core = tree::encoder::encode(&quadtree);
	let container_bytes = container::write(&core, image.width);
	let output_path = matches.value_of("output").map(str::to_string).unwrap_or_else(|| default_output_path(input_path, ".qtc"));
	write_file(&output_path, &container_bytes);

	if matches.is_present("grid") {
		let grid = tree::grid::render(&quadtree);
		let grid_bytes = pgm::write(&grid, image.width, image.height, 255);
		let grid_path = default_output_path(&output_path, ".grid.pgm");
		write_file(&grid_path, &grid_bytes);
	}
}

fn run_uncompress(input_path: &str, matches: &clap::ArgMatches, verbose: bool) {
	let source = read_file(input_path);
	let core = match container::read(&source) {
		Ok(c) => c,
		Err(e) => {
			let (msg, code) = exit_code_for(e);
			error_exit(msg, code)
		}
	};
	let quadtree = match tree::decoder::decode(core) {
		Ok(t) => t,
		Err(e) => {
			let (msg, code) = exit_code_for(e);
			error_exit(msg, code)
		}
	};
	let width = quadtree.width();
	if verbose {
		eprintln!("decoded {}x{} raster from {} tree nodes", width, width, quadtree.node_count());
	}

	let pixels = tree::painter::paint(&quadtree);
	let pgm_bytes = pgm::write(&pixels, width, width, 255);
	let output_path = matches.value_of("output").map(str::to_string).unwrap_or_else(|| default_output_path(input_path, ".pgm"));
	write_file(&output_path, &pgm_bytes);

	if matches.is_present("grid") {
		let grid = tree::grid::render(&quadtree);
		let grid_bytes = pgm::write(&grid, width, width, 255);
		let grid_path = default_output_path(&output_path, ".grid.pgm");
		write_file(&grid_path, &grid_bytes);
	}
}
