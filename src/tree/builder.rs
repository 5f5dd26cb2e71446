use crate::error::CoreError;
use crate::tree::{Node, Quadtree};

/// Recursively aggregates a grayscale raster into a freshly allocated
/// quadtree, populating every node's mean, epsilon, uniform flag and
/// variance, plus the tree-wide `mean_variance`/`max_variance`.
///
/// `raster` must have `width * width` bytes with `width` a power of
/// two, and every byte must be at most `max_val`.
pub fn build(raster: &[u8], width: usize, max_val: u8) -> Result<Quadtree, CoreError> {
	if width == 0 || !width.is_power_of_two() {
		return Err(CoreError::InvalidDimensions);
	}
	if raster.len() != width * width {
		return Err(CoreError::InvalidDimensions);
	}
	if raster.iter().any(|&p| p > max_val) {
		return Err(CoreError::InvalidPixel);
	}

	let levels = width.trailing_zeros();
	let mut tree = Quadtree::new(levels);
	let mut sum_variance = 0.0f64;
	let mut max_variance = 0.0f64;
	build_node(raster, width, &mut tree, 0, 0, 0, width, &mut sum_variance, &mut max_variance);

	let internal_count = Quadtree::internal_count(levels);
	tree.mean_variance = if internal_count > 0 { sum_variance / internal_count as f64 } else { 0.0 };
	tree.max_variance = max_variance;
	Ok(tree)
}

/// Postorder fill of the subtree rooted at `i`, covering the
/// `size x size` quadrant whose top-left corner is `(x, y)`.
fn build_node(
	raster: &[u8],
	width: usize,
	tree: &mut Quadtree,
	i: usize,
	x: usize,
	y: usize,
	size: usize,
	sum_variance: &mut f64,
	max_variance: &mut f64,
) {
	if size == 1 {
		*tree.node_mut(i) = Node { mean: raster[y * width + x], epsilon: 0, uniform: true, variance: 0.0 };
		return;
	}

	let half = size / 2;
	let positions = [(x, y), (x + half, y), (x + half, y + half), (x, y + half)];
	for k in 1..=4 {
		let (cx, cy) = positions[k - 1];
		build_node(raster, width, tree, Quadtree::child(i, k), cx, cy, half, sum_variance, max_variance);
	}

	let children: [Node; 4] = [
		tree.node(Quadtree::child(i, 1)),
		tree.node(Quadtree::child(i, 2)),
		tree.node(Quadtree::child(i, 3)),
		tree.node(Quadtree::child(i, 4)),
	];
	let sum: u32 = children.iter().map(|c| c.mean as u32).sum();
	let mean = (sum / 4) as u8;
	let epsilon = (sum % 4) as u8;
	let uniform = children.iter().all(|c| c.uniform) && children.iter().all(|c| c.mean == children[0].mean);
	let variance = children
		.iter()
		.map(|c| c.variance.powi(2) + (mean as f64 - c.mean as f64).powi(2))
		.sum::<f64>()
		.sqrt()
		/ 4.0;

	*tree.node_mut(i) = Node { mean, epsilon, uniform, variance };
	*sum_variance += variance;
	if variance > *max_variance {
		*max_variance = variance;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rejects_non_power_of_two_side() {
		let raster = vec![0u8; 9];
		assert_eq!(build(&raster, 3, 255), Err(CoreError::InvalidDimensions));
	}

	#[test]
	fn rejects_pixel_above_max_val() {
		let raster = [10u8, 20, 30, 200];
		assert_eq!(build(&raster, 2, 100), Err(CoreError::InvalidPixel));
	}

	#[test]
	fn single_pixel_builds_a_leaf_root() {
		let tree = build(&[128], 1, 255).unwrap();
		assert_eq!(tree.levels, 0);
		let root = tree.node(0);
		assert_eq!(root.mean, 128);
		assert_eq!(root.epsilon, 0);
		assert!(root.uniform);
		assert_eq!(tree.mean_variance, 0.0);
		assert_eq!(tree.max_variance, 0.0);
	}

	#[test]
	fn uniform_2x2_raster_is_fully_uniform() {
		let tree = build(&[10, 10, 10, 10], 2, 255).unwrap();
		let root = tree.node(0);
		assert_eq!(root.mean, 10);
		assert_eq!(root.epsilon, 0);
		assert!(root.uniform);
	}

	#[test]
	fn nonuniform_2x2_raster_computes_epsilon_and_fourth_child_relation() {
		// TL=10 TR=20 BR=30 BL=40, children laid out clockwise so that
		// index order matches positions (0,0),(1,0),(1,1),(0,1).
		let tree = build(&[10, 20, 40, 30], 2, 255).unwrap();
		let root = tree.node(0);
		assert_eq!(root.mean, 25);
		assert_eq!(root.epsilon, 0);
		assert!(!root.uniform);
		let c1 = tree.node(1).mean as i32;
		let c2 = tree.node(2).mean as i32;
		let c3 = tree.node(3).mean as i32;
		let c4 = tree.node(4).mean as i32;
		assert_eq!(4 * root.mean as i32 + root.epsilon as i32, c1 + c2 + c3 + c4);
	}

	#[test]
	fn checkerboard_has_no_uniform_internal_nodes() {
		let raster = [0u8, 255, 255, 0, 255, 0, 0, 255, 0, 255, 255, 0, 255, 0, 0, 255];
		let tree = build(&raster, 4, 255).unwrap();
		for i in 0..tree.node_count() {
			if !tree.is_leaf(i) {
				assert!(!tree.node(i).uniform);
			}
		}
	}
}
