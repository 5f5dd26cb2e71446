use std::fmt;

/// Errors surfaced by the codec core.
///
/// Propagation policy: every stage returns these through its public
/// entry point rather than panicking; the CLI collaborator translates
/// them into a user-facing message and an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
	/// The input raster's side is not a positive power of two.
	InvalidDimensions,
	/// The raster contains a value outside `[0, max_val]`.
	InvalidPixel,
	/// The lossy filter was given a non-positive alpha.
	InvalidAlpha,
	/// The decoder requested more bits than the stream had left.
	Underflow,
	/// The declared `levels` header is inconsistent with the payload.
	MalformedHeader,
	/// A tree or buffer allocation could not be satisfied.
	AllocationFailure,
}

impl fmt::Display for CoreError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let msg = match self {
			CoreError::InvalidDimensions => "raster side is not a positive power of two",
			CoreError::InvalidPixel => "raster contains a pixel outside the declared range",
			CoreError::InvalidAlpha => "filter alpha must be a positive real number",
			CoreError::Underflow => "bit stream exhausted before the requested field was read",
			CoreError::MalformedHeader => "declared tree depth is inconsistent with the payload",
			CoreError::AllocationFailure => "could not allocate memory for the tree or buffer",
		};
		f.write_str(msg)
	}
}

impl std::error::Error for CoreError {}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn displays_a_human_readable_message() {
		assert_eq!(
			CoreError::Underflow.to_string(),
			"bit stream exhausted before the requested field was read"
		);
	}
}
