use crate::error::CoreError;
use crate::tree::Quadtree;

/// Bottom-up lossy pruning: collapses subtrees whose variance is
/// dominated by a threshold `sigma` that starts at
/// `mean_variance / max_variance` and is scaled by `alpha` at every
/// level of descent, including the root's own check — otherwise the
/// root would be compared against the unscaled ratio no matter how
/// large `alpha` is, and could never collapse.
///
/// `alpha` must be a positive real number.
pub fn apply(tree: &mut Quadtree, alpha: f64) -> Result<(), CoreError> {
	if !(alpha > 0.0) {
		return Err(CoreError::InvalidAlpha);
	}
	let sigma0 = if tree.max_variance == 0.0 { 0.0 } else { tree.mean_variance / tree.max_variance };
	visit(tree, 0, sigma0 * alpha, alpha);
	Ok(())
}

/// Returns whether the subtree rooted at `i` ended up uniform.
fn visit(tree: &mut Quadtree, i: usize, sigma: f64, alpha: f64) -> bool {
	if tree.node(i).uniform {
		return true;
	}

	let child_sigma = sigma * alpha;
	let mut collapsed = 0;
	for k in 1..=4 {
		if visit(tree, Quadtree::child(i, k), child_sigma, alpha) {
			collapsed += 1;
		}
	}

	if collapsed == 4 && tree.node(i).variance <= sigma {
		let node = tree.node_mut(i);
		node.uniform = true;
		node.epsilon = 0;
		return true;
	}
	false
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tree::builder;

	#[test]
	fn rejects_nonpositive_alpha() {
		let mut tree = builder::build(&[1, 2, 3, 4], 2, 255).unwrap();
		assert_eq!(apply(&mut tree, 0.0), Err(CoreError::InvalidAlpha));
		assert_eq!(apply(&mut tree, -1.0), Err(CoreError::InvalidAlpha));
	}

	#[test]
	fn filtering_an_already_uniform_tree_is_a_noop() {
		let raster = vec![42u8; 64];
		let mut tree = builder::build(&raster, 8, 255).unwrap();
		let before = tree.node(0);
		apply(&mut tree, 1.5).unwrap();
		assert_eq!(tree.node(0), before);
		assert!(tree.node(0).uniform);
	}

	#[test]
	fn aggressive_alpha_collapses_a_checkerboard_to_the_root_mean() {
		let raster: Vec<u8> = (0..256).map(|i| if (i / 16 + i % 16) % 2 == 0 { 10 } else { 240 }).collect();
		let mut tree = builder::build(&raster, 16, 255).unwrap();
		let root_mean = tree.node(0).mean;
		apply(&mut tree, 1000.0).unwrap();
		assert!(tree.node(0).uniform);
		assert_eq!(tree.node(0).mean, root_mean);
	}

	#[test]
	fn applying_filter_twice_is_idempotent() {
		let raster: Vec<u8> = (0..256u32).map(|i| (i % 7 * 30) as u8).collect();
		let mut once = builder::build(&raster, 16, 255).unwrap();
		apply(&mut once, 1.2).unwrap();
		let mut twice = once.clone();
		apply(&mut twice, 1.2).unwrap();
		for i in 0..once.node_count() {
			assert_eq!(once.node(i), twice.node(i));
		}
	}
}
