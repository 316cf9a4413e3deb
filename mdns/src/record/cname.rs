use std::fmt;

use crate::subject::{ReadSubject, Subject};
use crate::wire::*;


/// A **CNAME** _(canonical name)_ record, which aliases one name to
/// another.
///
/// # References
///
/// - [RFC 1035 §3.3.1](https://tools.ietf.org/html/rfc1035) — Domain Names,
///   Implementation and Specification (November 1987)
#[derive(PartialEq, Debug, Clone)]
pub struct CNAME {

    /// The name this record is an alias for. The record's stated length is
    /// advisory only; the name's own terminator is what ends it.
    pub domain: Subject,
}

impl Wire for CNAME {
    const NAME: &'static str = "CNAME";
    const RR_TYPE: u16 = 0x0005;

    fn read(_stated_length: u16, c: &mut Cursor<&[u8]>) -> Result<Self, WireError> {
        let domain = c.read_subject()?;
        Ok(Self { domain })
    }
}

impl fmt::Display for CNAME {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.domain)
    }
}
