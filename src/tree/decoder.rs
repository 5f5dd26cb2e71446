use crate::bits::BitBuffer;
use crate::error::CoreError;
use crate::tree::{Node, Quadtree};

/// Largest tree depth the decoder will allocate for, guarding against
/// a corrupt `levels` header demanding an absurd node count.
const MAX_LEVELS: u32 = 20;

/// Inverts `encoder::encode`: reads the one-byte `levels` header,
/// allocates an empty tree of that depth, then fills it in preorder
/// using the same parent-context rules the encoder applied.
pub fn decode(bytes: &[u8]) -> Result<Quadtree, CoreError> {
	let levels = *bytes.first().ok_or(CoreError::MalformedHeader)? as u32;
	if levels > MAX_LEVELS {
		return Err(CoreError::MalformedHeader);
	}

	let mut buf = BitBuffer::from_bytes(bytes[1..].to_vec());
	let mut tree = Quadtree::new(levels);
	parse(&mut tree, 0, &mut buf)?;
	Ok(tree)
}

fn parse(tree: &mut Quadtree, i: usize, buf: &mut BitBuffer) -> Result<(), CoreError> {
	let is_root = i == 0;

	if !is_root && tree.node(Quadtree::parent(i)).uniform {
		let parent = tree.node(Quadtree::parent(i));
		*tree.node_mut(i) = Node { mean: parent.mean, epsilon: 0, uniform: true, variance: 0.0 };
		if !tree.is_leaf(i) {
			for k in 1..=4 {
				parse(tree, Quadtree::child(i, k), buf)?;
			}
		}
		return Ok(());
	}

	let is_fourth = !is_root && i % 4 == 0;
	let leaf = tree.is_leaf(i);
	let needs_mean = is_root || !is_fourth;

	let mean = if needs_mean {
		buf.pull(8)? as u8
	} else {
		let parent = tree.node(Quadtree::parent(i));
		let m1 = tree.node(i - 3).mean as i32;
		let m2 = tree.node(i - 2).mean as i32;
		let m3 = tree.node(i - 1).mean as i32;
		(4 * parent.mean as i32 + parent.epsilon as i32 - m1 - m2 - m3) as u8
	};

	if leaf {
		*tree.node_mut(i) = Node { mean, epsilon: 0, uniform: true, variance: 0.0 };
		return Ok(());
	}

	let epsilon = buf.pull(2)? as u8;
	let uniform = if epsilon == 0 { buf.pull(1)? != 0 } else { false };
	*tree.node_mut(i) = Node { mean, epsilon, uniform, variance: 0.0 };

	// Recurse even when this node is uniform: no bits are consumed for a
	// uniform subtree, but its descendants still need their mean filled in
	// by inheritance (the parent-uniform branch above), all the way to the
	// leaves, not just at the immediate children.
	for k in 1..=4 {
		parse(tree, Quadtree::child(i, k), buf)?;
	}
	Ok(())
}
