//! Directory logic independent of the wire protocol.

pub mod enrich;
