//! The analysis module gathers the bit pattern statistics that drive the substitution.
//!
//! - pattern: a fixed-width bit string and the shift-extend step that slides it one bit.
//! - histogram: occurrence counts of every sliding window of one width, in a single pass.
//! - selector: the two width searches.
//!   - Ascending escape search: widen until some pattern never occurs (the escape).
//!   - Descending victim search: from the widest width down, pick the most frequent pattern
//!     whose replacement by the escape shrinks the buffer.
//!
pub mod histogram;
pub mod pattern;
pub mod selector;
