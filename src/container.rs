//! The QTC/Q1 compressed-file container: a short text header (magic,
//! a compression-date comment, a compression-rate comment) in front
//! of the opaque bit payload the core encoder produces.

use crate::error::CoreError;
use chrono::Local;

const MAGIC: &[u8] = b"Q1\n";

/// Wraps an already-encoded core payload (`levels` byte + packed body)
/// in the QTC/Q1 text header.
pub fn write(core: &[u8], width: usize) -> Vec<u8> {
	let rate = compression_rate(core, width);
	let date = Local::now().format("%a %b %e %H:%M:%S %Y").to_string();

	let mut out = Vec::with_capacity(core.len() + 64);
	out.extend_from_slice(MAGIC);
	out.extend_from_slice(format!("# Compression date : {}\n", date).as_bytes());
	out.extend_from_slice(format!("# Compression rate {:.2}%\n", rate).as_bytes());
	out.extend_from_slice(core);
	out
}

/// The fraction of the original raster's bit size the payload occupies,
/// as a percentage. The one-byte `levels` header does not count toward
/// the payload: only the bits after it are "compressed" data proper.
fn compression_rate(core: &[u8], width: usize) -> f64 {
	let payload_bits = core.len().saturating_sub(1) as f64 * 8.0;
	let original_bits = (width * width * 8) as f64;
	if original_bits == 0.0 {
		0.0
	} else {
		payload_bits / original_bits * 100.0
	}
}

/// Strips the magic line and any number of leading `#` comment lines,
/// returning the raw core payload (`levels` byte + packed body).
///
/// A line is only ever recognized as a comment by peeking at its first
/// byte; as soon as a line doesn't start with `#`, parsing stops and
/// everything from there on is treated as opaque binary payload, even
/// if it happens to contain bytes that look like whitespace or `#`.
pub fn read(data: &[u8]) -> Result<&[u8], CoreError> {
	if data.len() < MAGIC.len() || &data[..MAGIC.len()] != MAGIC {
		return Err(CoreError::MalformedHeader);
	}
	let mut pos = MAGIC.len();
	loop {
		if pos >= data.len() {
			return Err(CoreError::MalformedHeader);
		}
		if data[pos] == b'#' {
			match data[pos..].iter().position(|&b| b == b'\n') {
				Some(off) => pos += off + 1,
				None => return Err(CoreError::MalformedHeader),
			}
		} else {
			break;
		}
	}
	Ok(&data[pos..])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn roundtrips_through_write_then_read() {
		let core = vec![1u8, 0b1010_1010, 0b1111_0000];
		let container = write(&core, 2);
		assert_eq!(read(&container).unwrap(), core.as_slice());
	}

	#[test]
	fn skips_an_arbitrary_number_of_comment_lines() {
		let mut data = Vec::new();
		data.extend_from_slice(b"Q1\n");
		data.extend_from_slice(b"# one\n");
		data.extend_from_slice(b"# two\n");
		data.extend_from_slice(b"# three\n");
		data.extend_from_slice(&[9, 8, 7]);
		assert_eq!(read(&data).unwrap(), &[9, 8, 7]);
	}

	#[test]
	fn missing_magic_is_malformed() {
		assert_eq!(read(b"nope"), Err(CoreError::MalformedHeader));
	}

	#[test]
	fn compression_rate_excludes_the_levels_header_byte() {
		// 1 header byte + 1 body byte over a 8x8 original (64 bytes = 512 bits):
		// body contributes 8 bits -> 8/512 * 100 = 1.5625%.
		let core = vec![3u8, 0xff];
		assert!((compression_rate(&core, 8) - 1.5625).abs() < 1e-9);
	}
}
