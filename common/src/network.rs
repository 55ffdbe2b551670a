//! IPv4 helpers shared by the parser, the validator and the topology builder.

pub mod subnet;
