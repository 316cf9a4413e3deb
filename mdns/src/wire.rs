//! Encoding questions for, and parsing responses from, the mDNS wire.

pub(crate) use std::io::{Cursor, Read};
pub(crate) use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use std::fmt;
use std::io;

use log::*;

use crate::record::{Record, RecordType, A, AAAA, CNAME, PTR, SRV, TXT};
use crate::subject::{ReadSubject, Subject};
use crate::types::*;
use crate::DEFAULT_MAXIMUM_RECORDS;


/// The class of every mDNS record and question: the Internet class.
pub(crate) const CLASS_INTERNET: u16 = 0x0001;

/// Asking for a unicast reply sets the top bit of the question's class
/// field (RFC 6762 §5.4).
const QCLASS_UNICAST_REPLY: u16 = 0x8000;


impl Question {

    /// Builds a question asking for records of the given type under the
    /// given dotted-format name. Fails if the name is not encodable.
    pub fn new(subject: &str, qtype: RecordType) -> Result<Self, WireError> {
        let subject = Subject::encode(subject)?;
        Ok(Self { transaction_id: 0, flags: 0, subject, qtype, unicast_reply: false })
    }

    /// Converts this question to a vector of bytes.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(32);

        bytes.write_u16::<BigEndian>(self.transaction_id)?;
        bytes.write_u16::<BigEndian>(self.flags)?;

        bytes.write_u16::<BigEndian>(1)?;  // question count
        bytes.write_u16::<BigEndian>(0)?;  // answer count
        bytes.write_u16::<BigEndian>(0)?;  // authority RR count
        bytes.write_u16::<BigEndian>(0)?;  // additional RR count

        self.subject.write_to(&mut bytes)?;
        bytes.write_u16::<BigEndian>(self.qtype.to_u16())?;

        let mut qclass = CLASS_INTERNET;
        if self.unicast_reply {
            qclass |= QCLASS_UNICAST_REPLY;
        }
        bytes.write_u16::<BigEndian>(qclass)?;

        Ok(bytes)
    }
}


impl Response {

    /// Reads bytes off of the given slice, parsing them into a response,
    /// with the default cap on the declared record count.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        Self::from_bytes_with_limit(bytes, DEFAULT_MAXIMUM_RECORDS)
    }

    /// Reads bytes off of the given slice, parsing them into a response.
    /// A packet whose sections declare more than `maximum_records` records
    /// in total is refused before any of them is parsed.
    pub fn from_bytes_with_limit(bytes: &[u8], maximum_records: u32) -> Result<Self, WireError> {
        info!("Parsing response");
        trace!("Bytes -> {:?}", bytes);
        let mut c = Cursor::new(bytes);

        let transaction_id = c.read_u16::<BigEndian>()?;
        trace!("Read txid -> {:?}", transaction_id);

        let flags = c.read_u16::<BigEndian>()?;
        trace!("Read flags -> {:#06x}", flags);
        validate_response_flags(flags)?;

        let query_count = c.read_u16::<BigEndian>()?;
        if query_count > 0 {
            // mDNS responses must not repeat the question (RFC 6762 §6)
            warn!("Response repeats {} questions", query_count);
            return Err(WireError::QuestionInResponse { count: query_count });
        }

        let answer_count     = c.read_u16::<BigEndian>()?;
        let authority_count  = c.read_u16::<BigEndian>()?;
        let additional_count = c.read_u16::<BigEndian>()?;

        let count = u32::from(answer_count) + u32::from(authority_count) + u32::from(additional_count);
        if count > maximum_records {
            warn!("Refusing to parse {} declared records (the cap is {})", count, maximum_records);
            return Err(WireError::TooManyRecords { count, limit: maximum_records });
        }

        let mut answers = Vec::new();
        debug!("Reading {}x answer from response", answer_count);
        for _ in 0 .. answer_count {
            answers.push(Answer::from_bytes(&mut c)?);
        }

        debug!("Reading and discarding {}x authority record", authority_count);
        for _ in 0 .. authority_count {
            let _ = Answer::from_bytes(&mut c)?;
        }

        let mut additionals = Vec::new();
        debug!("Reading {}x additional record from response", additional_count);
        for _ in 0 .. additional_count {
            additionals.push(Answer::from_bytes(&mut c)?);
        }

        Ok(Self { transaction_id, flags, answers, additionals })
    }
}


/// Checks the header flags of a packet claiming to be a response. The
/// masks, going down: QR must be set, the opcode must be the standard
/// query opcode, a truncated response is not something this client can
/// follow up on, the reserved bits must be clear, and the response code
/// must signal success.
fn validate_response_flags(flags: u16) -> Result<(), WireError> {
    if flags & 0x8000 != 0x8000 {
        return Err(WireError::NotAResponse);
    }

    if flags & 0x7800 != 0x0000 {
        return Err(WireError::OpcodeNotQuery { opcode: (flags & 0x7800) >> 11 });
    }

    if flags & 0x0200 != 0x0000 {
        return Err(WireError::TruncatedResponse);
    }

    if flags & 0x0070 != 0x0000 {
        return Err(WireError::ReservedBitsSet);
    }

    match ErrorCode::from_bits(flags & 0x000F) {
        None        => Ok(()),
        Some(code)  => Err(WireError::ErrorCode(code)),
    }
}


impl Answer {

    /// Reads bytes from the given cursor, and parses them into a single
    /// resource record.
    fn from_bytes(c: &mut Cursor<&[u8]>) -> Result<Self, WireError> {
        let subject = c.read_subject()?;
        trace!("Read subject -> {}", subject);

        let rtype = c.read_u16::<BigEndian>()?;
        trace!("Read rtype -> {:?}", rtype);

        let class = c.read_u16::<BigEndian>()?;
        if class != CLASS_INTERNET {
            warn!("Record for {} has class {:#06x}", subject, class);
            return Err(WireError::ClassNotInternet { class });
        }

        let ttl = c.read_u32::<BigEndian>()?;
        trace!("Read TTL -> {:?}", ttl);

        let stated_length = c.read_u16::<BigEndian>()?;
        trace!("Read record length -> {:?}", stated_length);

        let record = Record::from_bytes(rtype, stated_length, c)?;
        Ok(Self { subject, class, ttl, record })
    }
}


impl Record {

    /// Reads at most `stated_length` bytes from the given cursor, and
    /// parses them into a record structure depending on the type number,
    /// which has already been read.
    fn from_bytes(rtype: u16, stated_length: u16, c: &mut Cursor<&[u8]>) -> Result<Self, WireError> {

        macro_rules! try_record {
            ($record:tt) => {
                if $record::RR_TYPE == rtype {
                    info!("Parsing {} record (type {}, len {})", $record::NAME, rtype, stated_length);
                    return Wire::read(stated_length, c).map(Self::$record)
                }
            }
        }

        // Try all the records, one type at a time, returning early if the
        // type number matches.
        try_record!(A);
        try_record!(AAAA);
        try_record!(CNAME);
        try_record!(PTR);
        try_record!(SRV);
        try_record!(TXT);

        // Otherwise, collect the bytes verbatim into an unknown record, so
        // the cursor still advances past it.
        debug!("Skipping {} bytes of unparsed {} record", stated_length, RecordType::from_u16(rtype));
        let mut bytes = vec![ 0_u8; usize::from(stated_length) ];
        c.read_exact(&mut bytes)?;

        Ok(Self::Other { type_number: rtype, bytes })
    }
}


/// Trait for decoding record payloads from bytes read over the wire.
pub trait Wire: Sized {

    /// This record's type as a string, such as `"A"` or `"SRV"`.
    const NAME: &'static str;

    /// The number signifying that a record is of this type.
    /// See <https://www.iana.org/assignments/dns-parameters/dns-parameters.xhtml#dns-parameters-4>
    const RR_TYPE: u16;

    /// Read at most `stated_length` bytes from the given `Cursor`. This
    /// cursor travels throughout the complete datagram, so record payloads
    /// can follow compression pointers to any earlier offset.
    fn read(stated_length: u16, c: &mut Cursor<&[u8]>) -> Result<Self, WireError>;
}


/// Something that can go wrong deciphering an mDNS packet.
#[derive(PartialEq, Debug, Clone)]
pub enum WireError {

    /// There was an IO error reading from the cursor. Almost all the time,
    /// this means that the buffer was too short.
    IO,
    // (io::Error is not PartialEq so we don't propagate it)

    /// A hostname contained a label longer than the 63 octets RFC 1035
    /// allows, either in a string being encoded or in a length octet on
    /// the wire.
    LabelTooLong {

        /// The length of the offending label.
        length: usize,
    },

    /// A hostname being encoded contained an empty label: a leading dot,
    /// or two dots in a row.
    EmptyLabel,

    /// When the data contained a name whose compression pointers form a
    /// cycle, or chain too deep. Contains the pointer offsets that had
    /// been followed.
    TooMuchRecursion(Vec<u16>),

    /// When the data contained a name with a pointer to an offset outside
    /// of the packet. Contains the invalid offset.
    OutOfBounds(u16),

    /// When the DNS standard requires records of this type to have a
    /// certain fixed length, but the response specified a different
    /// length.
    ///
    /// This error should be returned regardless of the _content_ of the
    /// record, whatever it is.
    WrongRecordLength {

        /// The length of the record's data, as specified in the packet.
        stated_length: u16,

        /// The length of the record that the DNS specification mandates.
        mandated_length: u16,
    },

    /// A record's class was something other than the Internet class, the
    /// only one mDNS uses.
    ClassNotInternet {

        /// The class number that was in the packet.
        class: u16,
    },

    /// A response carried a question section, which mDNS responses must
    /// not do.
    QuestionInResponse {

        /// The number of questions the response declared.
        count: u16,
    },

    /// A response's sections declared more records in total than the
    /// configured cap. Nothing was parsed or allocated for them.
    TooManyRecords {

        /// The total record count the response declared.
        count: u32,

        /// The cap in force.
        limit: u32,
    },

    /// The packet did not have the QR bit set, so it is a query, not a
    /// response.
    NotAResponse,

    /// The packet's opcode was not the standard query opcode.
    OpcodeNotQuery {

        /// The opcode that was in the packet.
        opcode: u16,
    },

    /// The packet had reserved header bits set.
    ReservedBitsSet,

    /// The response was marked as truncated. This client drops truncated
    /// responses rather than retrying over another transport.
    TruncatedResponse,

    /// The response carried a non-zero response code.
    ErrorCode(ErrorCode),
}

impl From<io::Error> for WireError {
    fn from(ioe: io::Error) -> Self {
        error!("IO error -> {:?}", ioe);
        Self::IO
    }
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IO => {
                write!(f, "the packet was truncated")
            }
            Self::LabelTooLong { length } => {
                write!(f, "hostname contains an illegal label component that is {} bytes long", length)
            }
            Self::EmptyLabel => {
                write!(f, "hostname contains an illegal label component that is empty")
            }
            Self::TooMuchRecursion(offsets) => {
                write!(f, "label compression pointers looped (offsets {:?})", offsets)
            }
            Self::OutOfBounds(offset) => {
                write!(f, "label compression pointer to offset {} is outside the packet", offset)
            }
            Self::WrongRecordLength { stated_length, mandated_length } => {
                write!(f, "record length should be {}, but the packet says {}", mandated_length, stated_length)
            }
            Self::ClassNotInternet { class } => {
                write!(f, "record class {:#06x} is not the Internet class", class)
            }
            Self::QuestionInResponse { count } => {
                write!(f, "response repeats {} questions", count)
            }
            Self::TooManyRecords { count, limit } => {
                write!(f, "response declares {} records, over the cap of {}", count, limit)
            }
            Self::NotAResponse => {
                write!(f, "packet is not a response")
            }
            Self::OpcodeNotQuery { opcode } => {
                write!(f, "response opcode {} is not the query opcode", opcode)
            }
            Self::ReservedBitsSet => {
                write!(f, "response has reserved header bits set")
            }
            Self::TruncatedResponse => {
                write!(f, "response is truncated")
            }
            Self::ErrorCode(code) => {
                write!(f, "response code {:?}", code)
            }
        }
    }
}


/// A code indicating an error, from the low four bits of the header flags.
#[derive(PartialEq, Debug, Copy, Clone)]
pub enum ErrorCode {

    /// The server was unable to interpret the query.
    FormatError,

    /// There was a problem with the server.
    ServerFailure,

    /// The name referenced in the query does not exist.
    NXDomain,

    /// The server does not support one of the requested features.
    NotImplemented,

    /// The server was able to interpret the query, but refused to fulfil
    /// it.
    QueryRefused,

    /// An error code we don't know what it is.
    Other(u16),
}

impl ErrorCode {

    /// Extracts the rcode from the last four bits of the flags field.
    fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            0 => None,
            1 => Some(Self::FormatError),
            2 => Some(Self::ServerFailure),
            3 => Some(Self::NXDomain),
            4 => Some(Self::NotImplemented),
            5 => Some(Self::QueryRefused),
            n => Some(Self::Other(n)),
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn minimal_question() {
        let question = Question::new("a.b.", RecordType::A).unwrap();

        assert_eq!(question.to_bytes().unwrap(), &[
            0x00, 0x00,  // transaction ID
            0x00, 0x00,  // flags
            0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,  // counts (1, 0, 0, 0)
            0x01, b'a', 0x01, b'b', 0x00,  // subject
            0x00, 0x01,  // type A
            0x00, 0x01,  // class IN
        ]);
    }

    #[test]
    fn unicast_reply_rides_on_the_class_bit() {
        let mut question = Question::new("a.b.", RecordType::PTR).unwrap();
        question.unicast_reply = true;

        let bytes = question.to_bytes().unwrap();
        assert_eq!(&bytes[bytes.len() - 4 ..], &[
            0x00, 0x0C,  // type PTR
            0x80, 0x01,  // class IN, unicast-reply bit set
        ]);
    }

    #[test]
    fn rcode_mapping() {
        assert_eq!(ErrorCode::from_bits(0), None);
        assert_eq!(ErrorCode::from_bits(1), Some(ErrorCode::FormatError));
        assert_eq!(ErrorCode::from_bits(2), Some(ErrorCode::ServerFailure));
        assert_eq!(ErrorCode::from_bits(3), Some(ErrorCode::NXDomain));
        assert_eq!(ErrorCode::from_bits(4), Some(ErrorCode::NotImplemented));
        assert_eq!(ErrorCode::from_bits(5), Some(ErrorCode::QueryRefused));
        assert_eq!(ErrorCode::from_bits(9), Some(ErrorCode::Other(9)));
    }

    #[test]
    fn flag_validation() {
        assert_eq!(validate_response_flags(0x8400), Ok(()));
        assert_eq!(validate_response_flags(0x0000), Err(WireError::NotAResponse));
        assert_eq!(validate_response_flags(0x8800), Err(WireError::OpcodeNotQuery { opcode: 1 }));
        assert_eq!(validate_response_flags(0x8200), Err(WireError::TruncatedResponse));
        assert_eq!(validate_response_flags(0x8010), Err(WireError::ReservedBitsSet));
        assert_eq!(validate_response_flags(0x8403), Err(WireError::ErrorCode(ErrorCode::NXDomain)));
    }
}
