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
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

#![deny(clippy::cast_possible_truncation)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::cast_sign_loss)]
#![deny(unsafe_code)]


//! Discovering Chromecasts on the local network, and noticing when they
//! disappear again.
//!
//! The service queries the mDNS group for `_googlecast._tcp.local.` on a
//! timer, folds the responses into a table of known devices, and emits a
//! [`DiscoveryUpdate`] whenever a device appears, materially changes, or
//! has gone unseen for long enough to be declared gone.


mod device;
pub use self::device::{DeviceID, DiscoveryUpdate, KnownDevice};

mod extract;

mod discover;
pub use self::discover::{
    discover, Discoverer, InvalidExpireRate,
    DEFAULT_EXPIRE_RATE, DEFAULT_QUERY_INTERVAL, SERVICE_NAME,
};
