//! Occurrence tests across parsing, zone handling and the multiplexer.
