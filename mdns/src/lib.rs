#![warn(deprecated_in_future)]
#![warn(future_incompatible)]
#![warn(missing_copy_implementations)]
#![warn(missing_docs)]
#![warn(nonstandard_style)]
#![warn(rust_2018_compatibility)]
#![warn(rust_2018_idioms)]
#![warn(single_use_lifetimes)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unused)]

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::redundant_else)]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::wildcard_imports)]

#![deny(clippy::cast_possible_truncation)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::cast_sign_loss)]
#![deny(unsafe_code)]


//! The mdns crate is the wire-protocol part of castwatch. It implements the
//! multicast DNS protocol: creating question packets, and decoding response
//! packets from their byte structure.


mod types;
pub use self::types::*;

mod subject;
pub use self::subject::Subject;

mod wire;
pub use self::wire::{Wire, WireError, ErrorCode};

pub mod record;
pub use self::record::RecordType;


/// The largest datagram an mDNS responder may send (RFC 6762 §17), and so
/// the size of the receive buffer a session needs.
pub const MAXIMUM_PACKET_SIZE: usize = 9000;

/// How many records a single response may declare, in total across its
/// sections, before this crate refuses to parse it. A guard against
/// malformed count fields requesting enormous allocations.
pub const DEFAULT_MAXIMUM_RECORDS: u32 = 1000;
