use crate::bits::BitBuffer;
use crate::tree::Quadtree;

/// Serializes a (possibly filtered) quadtree: a one-byte `levels`
/// header followed by a preorder, parent-context-sensitive bit stream.
///
/// A node's mean is omitted when it is the fourth child of a
/// non-uniform parent (it is reconstructed at decode time from the
/// parent's mean/epsilon and the other three children); a node's
/// epsilon/uniform bit are omitted entirely when it is a leaf (they
/// are implicitly zero/true); and a node's fields are omitted
/// entirely when its parent is uniform (the whole subtree below a
/// uniform node shares its mean, so nothing further is written).
pub fn encode(tree: &Quadtree) -> Vec<u8> {
	let mut buf = BitBuffer::new();
	emit(tree, 0, &mut buf);
	buf.finish();

	let mut out = Vec::with_capacity(1 + buf.as_bytes().len());
	out.push(tree.levels as u8);
	out.extend_from_slice(buf.as_bytes());
	out
}

fn emit(tree: &Quadtree, i: usize, buf: &mut BitBuffer) {
	let is_root = i == 0;
	if !is_root && tree.node(Quadtree::parent(i)).uniform {
		// Parent already uniform: this whole subtree is implied.
		return;
	}

	let is_fourth = !is_root && i % 4 == 0;
	let leaf = tree.is_leaf(i);
	// The root and the first three children of a non-uniform parent
	// carry their own mean; a fourth child's mean is reconstructed
	// instead, so it is never written.
	let needs_mean = is_root || !is_fourth;

	let node = tree.node(i);
	if needs_mean {
		buf.push(node.mean, 8);
	}

	if !leaf {
		buf.push(node.epsilon, 2);
		if node.epsilon == 0 {
			buf.push(node.uniform as u8, 1);
		}
		if !node.uniform {
			for k in 1..=4 {
				emit(tree, Quadtree::child(i, k), buf);
			}
		}
	}
}
