use std::fmt;

use crate::wire::*;


/// A **TXT** record, which holds free-form descriptive octets. mDNS service
/// instances use these for key=value metadata (RFC 6763 §6), but that
/// structure is the application's business, so the octets are kept raw
/// here: exactly as many of them as the record's stated length says.
///
/// # References
///
/// - [RFC 1035 §3.3.14](https://tools.ietf.org/html/rfc1035) — Domain Names,
///   Implementation and Specification (November 1987)
#[derive(PartialEq, Debug, Clone)]
pub struct TXT {

    /// The unparsed octets contained in the record.
    pub message: Vec<u8>,
}

impl Wire for TXT {
    const NAME: &'static str = "TXT";
    const RR_TYPE: u16 = 0x0010;

    fn read(stated_length: u16, c: &mut Cursor<&[u8]>) -> Result<Self, WireError> {
        let mut message = vec![ 0_u8; usize::from(stated_length) ];
        c.read_exact(&mut message)?;

        Ok(Self { message })
    }
}

impl fmt::Display for TXT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.message))
    }
}
