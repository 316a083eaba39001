//! The bitstream module forms the bit-level storage and I/O subsystem of bitsub.
//!
//! Every stage of the pipeline works on a BitBuffer: the input file is expanded into one
//! (LSB-first, eight bits per byte), the encoder builds a new one with a BitWriter, and the
//! decoder reads the substitution header back with a BitReader.
//!
//! The container module frames a finished BitBuffer so that its exact bit length survives
//! being written to a byte-oriented file.
//!
pub mod bitbuffer;
pub mod bitreader;
pub mod bitwriter;
pub mod container;
