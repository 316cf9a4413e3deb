//! What we know about a Chromecast, and how that knowledge changes.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};


/// An opaque container for the sixteen-byte identifier a Chromecast keeps
/// across its lifetime, found in the `id` key of its TXT record.
#[derive(PartialEq, Eq, Hash, Debug, Copy, Clone)]
pub struct DeviceID([u8; 16]);

impl DeviceID {

    /// Parses the 32-hex-digit form the TXT record carries. Returns `None`
    /// unless the input is exactly 32 hex digits.
    pub fn from_hex(input: &str) -> Option<Self> {
        let digits = input.as_bytes();
        if digits.len() != 32 {
            return None;
        }

        let mut bytes = [0_u8; 16];
        for (index, pair) in digits.chunks(2).enumerate() {
            let high = char::from(pair[0]).to_digit(16)?;
            let low = char::from(pair[1]).to_digit(16)?;
            bytes[index] = u8::try_from(high * 16 + low).ok()?;
        }

        Some(Self(bytes))
    }
}

impl fmt::Display for DeviceID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }

        Ok(())
    }
}


/// A Chromecast that has been discovered and seen recently.
#[derive(PartialEq, Debug, Clone)]
pub struct KnownDevice {

    /// The identifier the device keeps across its lifetime.
    pub id: DeviceID,

    /// The name the owner gave the device (the `fn` TXT key).
    pub friendly_name: String,

    /// The hostname its SRV record points at.
    pub hostname: String,

    /// The IPv4 address of that hostname, when the response carried one.
    pub ipv4: Option<Ipv4Addr>,

    /// The IPv6 address of that hostname, when the response carried one.
    pub ipv6: Option<Ipv6Addr>,

    /// The hardware model (the `md` TXT key).
    pub model: String,
}


/// Informs a consumer of the update stream that the Chromecast identified
/// by `id` has changed state in some way: coming, going, or updating.
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct DiscoveryUpdate {

    /// Which device this update is about.
    pub id: DeviceID,

    /// True when the device was newly discovered or materially changed;
    /// false when it has expired.
    pub active: bool,
}
