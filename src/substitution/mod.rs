//! The substitution module rewrites a bit buffer by swapping one fixed-width pattern for another.
//!
//! Encoding happens in two parts:
//! - Header: the victim and the replacement, each as a 5-bit width field (width - 1)
//!   followed by the pattern value, most significant bit first.
//! - Payload: a greedy left-to-right scan of the input. Every window equal to the victim
//!   is replaced by the replacement and skipped; every other bit is copied through.
//!
//! Decoding reads the header and runs the same scan over the payload with the roles of the
//! two patterns swapped. This only restores the input exactly when the replacement never
//! arises among the copied bits, which is why the replacement is chosen from the patterns
//! that never occur in the input, and why the selector checks the round trip.
//!
pub mod decoder;
pub mod encoder;
pub mod header;
