use crate::tree::Quadtree;

/// Draws the segmentation grid the quadtree decomposition used: a
/// white (255) canvas with a one-pixel border along the top and left
/// edge of every uniform *internal* subtree (a single leaf pixel
/// draws nothing, since a border around one pixel carries no visual
/// information). Non-uniform internal nodes recurse into their four
/// children instead of drawing anything themselves.
pub fn render(tree: &Quadtree) -> Vec<u8> {
	let width = tree.width();
	let mut raster = vec![255u8; width * width];
	draw(tree, 0, 0, 0, width, &mut raster, width);
	raster
}

fn draw(tree: &Quadtree, i: usize, x: usize, y: usize, size: usize, raster: &mut [u8], width: usize) {
	let leaf = tree.is_leaf(i);
	if tree.node(i).uniform && !leaf {
		if y > 0 {
			for dx in 0..size {
				raster[y * width + x + dx] = 190;
			}
		}
		if x > 0 {
			for dy in 0..size {
				raster[(y + dy) * width + x] = 190;
			}
		}
		return;
	}
	if leaf {
		return;
	}

	let half = size / 2;
	let positions = [(x, y), (x + half, y), (x + half, y + half), (x, y + half)];
	for k in 1..=4 {
		let (cx, cy) = positions[k - 1];
		draw(tree, Quadtree::child(i, k), cx, cy, half, raster, width);
	}
}
