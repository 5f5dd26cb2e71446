pub mod bits;
pub mod container;
pub mod error;
pub mod pgm;
pub mod tree;

pub use error::CoreError;
pub use tree::Quadtree;

/// Builds a quadtree from a grayscale raster, optionally collapsing it
/// with the lossy filter, and serializes it into a QTC/Q1 container.
pub fn encode_image(raster: &[u8], width: usize, max_val: u8, alpha: Option<f64>) -> Result<Vec<u8>, CoreError> {
	let mut quadtree = tree::builder::build(raster, width, max_val)?;
	if let Some(alpha) = alpha {
		tree::filter::apply(&mut quadtree, alpha)?;
	}
	let core = tree::encoder::encode(&quadtree);
	Ok(container::write(&core, width))
}

/// Parses a QTC/Q1 container and paints the decoded tree back into a
/// pixel raster, returning the raster alongside its side length.
pub fn decode_image(container: &[u8]) -> Result<(Vec<u8>, usize), CoreError> {
	let core = container::read(container)?;
	let quadtree = tree::decoder::decode(core)?;
	let width = quadtree.width();
	Ok((tree::painter::paint(&quadtree), width))
}

/// Builds (and optionally filters) a quadtree, then renders the
/// segmentation-grid visualization for it, without going through the
/// bit-stream encoding at all.
pub fn render_grid(raster: &[u8], width: usize, max_val: u8, alpha: Option<f64>) -> Result<Vec<u8>, CoreError> {
	let mut quadtree = tree::builder::build(raster, width, max_val)?;
	if let Some(alpha) = alpha {
		tree::filter::apply(&mut quadtree, alpha)?;
	}
	Ok(tree::grid::render(&quadtree))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lossless_roundtrip_preserves_the_raster() {
		let raster = [10u8, 20, 40, 30];
		let container = encode_image(&raster, 2, 255, None).unwrap();
		let (decoded, width) = decode_image(&container).unwrap();
		assert_eq!(width, 2);
		assert_eq!(decoded, raster.to_vec());
	}

	#[test]
	fn lossy_filter_collapses_a_busy_image_to_its_root_mean() {
		let raster: Vec<u8> = (0..256).map(|i| if (i / 16 + i % 16) % 2 == 0 { 10 } else { 240 }).collect();
		let root_mean = tree::builder::build(&raster, 16, 255).unwrap().node(0).mean;
		let container = encode_image(&raster, 16, 255, Some(1000.0)).unwrap();
		let (decoded, _) = decode_image(&container).unwrap();
		assert!(decoded.iter().all(|&p| p == root_mean));
	}

	#[test]
	fn lossless_roundtrip_of_a_uniform_raster_inherits_the_mean_into_every_pixel() {
		let raster = [7u8; 16];
		let container = encode_image(&raster, 4, 255, None).unwrap();
		let (decoded, _) = decode_image(&container).unwrap();
		assert_eq!(decoded, raster.to_vec());
	}

	#[test]
	fn invalid_alpha_is_rejected_before_encoding() {
		let raster = [1u8, 2, 3, 4];
		assert_eq!(encode_image(&raster, 2, 255, Some(0.0)), Err(CoreError::InvalidAlpha));
	}
}
