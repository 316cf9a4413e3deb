use std::fmt;
use std::net::Ipv6Addr;

use log::*;

use crate::wire::*;


/// An **AAAA** record, which contains an IPv6 address.
///
/// # References
///
/// - [RFC 3596](https://tools.ietf.org/html/rfc3596) — DNS Extensions to
///   Support IP Version 6 (October 2003)
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct AAAA {

    /// The IPv6 address contained in the packet.
    pub address: Ipv6Addr,
}

impl Wire for AAAA {
    const NAME: &'static str = "AAAA";
    const RR_TYPE: u16 = 0x001C;

    fn read(stated_length: u16, c: &mut Cursor<&[u8]>) -> Result<Self, WireError> {
        if stated_length != 16 {
            warn!("Length is incorrect (record length {:?}, but should be sixteen)", stated_length);
            return Err(WireError::WrongRecordLength { stated_length, mandated_length: 16 });
        }

        let mut buf = [0_u8; 16];
        c.read_exact(&mut buf)?;

        let address = Ipv6Addr::from(buf);
        trace!("Parsed IPv6 address -> {:?}", address);

        Ok(Self { address })
    }
}

impl fmt::Display for AAAA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}
