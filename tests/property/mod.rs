//! Property-based tests for the overlay codec

mod codec;
