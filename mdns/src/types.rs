//! An mDNS exchange is lopsided: one question packet goes out to the
//! multicast group, and any number of responders send response packets
//! back. The two packet shapes share a header format, but a question never
//! carries records, and a response never repeats the question.

use crate::record::{Record, RecordType};
use crate::subject::Subject;


/// A question that gets multicast to the group.
#[derive(PartialEq, Debug, Clone)]
pub struct Question {

    /// The transaction ID. mDNS responders do not echo this back reliably,
    /// so it is always zero on send and never used for matching.
    pub transaction_id: u16,

    /// The header flags. No flag is relevant to an mDNS question, so this
    /// is always zero on send.
    pub flags: u16,

    /// The name being asked about.
    pub subject: Subject,

    /// The type of record being requested.
    pub qtype: RecordType,

    /// Whether responders are asked to reply to this socket directly
    /// instead of to the whole group. On the wire this preference is the
    /// top bit of the question's class field (RFC 6762 §5.4).
    pub unicast_reply: bool,
}


/// A response received from the multicast group.
#[derive(PartialEq, Debug, Clone)]
pub struct Response {

    /// The transaction ID of the response. Usually zero, like the ones we
    /// send.
    pub transaction_id: u16,

    /// The raw header flags. These have already been validated during
    /// decoding; a packet with an unacceptable flag never becomes a
    /// `Response` at all.
    pub flags: u16,

    /// The records in the answer section.
    pub answers: Vec<Answer>,

    /// The records in the additional section. Responders use this for the
    /// SRV/TXT/address records that make their answers usable without
    /// further queries.
    pub additionals: Vec<Answer>,
}


/// A single resource record within a response.
#[derive(PartialEq, Debug, Clone)]
pub struct Answer {

    /// The name this record is about.
    pub subject: Subject,

    /// The record's class. Always the Internet class, 0x0001; anything
    /// else fails decoding.
    pub class: u16,

    /// The time-to-live duration, in seconds.
    pub ttl: u32,

    /// The record contained in this answer.
    pub record: Record,
}
