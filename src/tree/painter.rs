use crate::tree::Quadtree;

/// Rasterizes a decoded (or built) tree into a `width x width` pixel
/// buffer by preorder traversal down to the leaves. This is the
/// reference traversal policy: painting could stop early at any
/// `uniform` node and produce the same pixels, but walking to the
/// leaves is simplest and always correct.
pub fn paint(tree: &Quadtree) -> Vec<u8> {
	let width = tree.width();
	let mut raster = vec![0u8; width * width];
	fill(tree, 0, 0, 0, width, &mut raster, width);
	raster
}

fn fill(tree: &Quadtree, i: usize, x: usize, y: usize, size: usize, raster: &mut [u8], width: usize) {
	if tree.is_leaf(i) {
		raster[y * width + x] = tree.node(i).mean;
		return;
	}
	let half = size / 2;
	let positions = [(x, y), (x + half, y), (x + half, y + half), (x, y + half)];
	for k in 1..=4 {
		let (cx, cy) = positions[k - 1];
		fill(tree, Quadtree::child(i, k), cx, cy, half, raster, width);
	}
}
