//! The query session: one question out, a finite stream of responses back.

use std::time::Duration;

use log::*;
use tokio::sync::mpsc;
use tokio::time::{self, Instant};

use mdns::{Question, RecordType, Response, DEFAULT_MAXIMUM_RECORDS, MAXIMUM_PACKET_SIZE};

use crate::multicast::Network;
use crate::Error;


/// How long a session listens for responses unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// How many decoded responses may sit unread before the receive task
/// waits for the consumer to catch up.
const CHANNEL_DEPTH: usize = 16;


/// A single mDNS query: one question multicast to the group, answered by a
/// stream of decoded responses that ends at the session deadline.
///
/// # Examples
///
/// ```no_run
/// use mdns::RecordType;
/// use mdns_transport::QuerySession;
///
/// # async fn example() -> Result<(), mdns_transport::Error> {
/// let session = QuerySession::new("_googlecast._tcp.local.", RecordType::PTR)?;
/// let mut responses = session.run().await?;
///
/// while let Some(response) = responses.recv().await {
///     for answer in &response.answers {
///         println!("{}", answer.record);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(PartialEq, Debug)]
pub struct QuerySession {
    question: Question,
    network: Network,
    timeout: Duration,
    maximum_records: u32,
}

impl QuerySession {

    /// Creates a session asking for records of the given type under the
    /// given name. Fails if the name is not a legal hostname.
    pub fn new(subject: &str, qtype: RecordType) -> Result<Self, Error> {
        let question = Question::new(subject, qtype)?;

        Ok(Self {
            question,
            network: Network::default(),
            timeout: DEFAULT_TIMEOUT,
            maximum_records: DEFAULT_MAXIMUM_RECORDS,
        })
    }

    /// Changes which IP version and interface the query goes out on.
    pub fn set_network(&mut self, network: Network) {
        self.network = network;
    }

    /// Changes the session deadline to a value other than the default of
    /// five seconds.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Changes the cap on the record count a single response may declare,
    /// from the default of 1000.
    pub fn set_maximum_records(&mut self, maximum_records: u32) {
        self.maximum_records = maximum_records;
    }

    /// Asks responders to reply to this socket directly rather than to the
    /// whole group.
    pub fn set_unicast_reply(&mut self, unicast_reply: bool) {
        self.question.unicast_reply = unicast_reply;
    }

    /// Encodes and sends the question, then starts the receive task.
    ///
    /// The returned channel yields every response that arrives and decodes
    /// before the deadline, then closes. Datagrams that fail to decode are
    /// dropped without ending the session; a socket error ends it early.
    pub async fn run(self) -> Result<mpsc::Receiver<Response>, Error> {
        let socket = self.network.bind()?;
        let group = self.network.group();

        let bytes = self.question.to_bytes()?;
        info!("Sending {} bytes of query to {}", bytes.len(), group);
        let sent = socket.send_to(&bytes, group).await?;
        debug!("Sent {} bytes", sent);

        let deadline = Instant::now() + self.timeout;
        let maximum_records = self.maximum_records;
        let (tx, rx) = mpsc::channel(CHANNEL_DEPTH);

        tokio::spawn(async move {
            // one receive buffer for the whole session
            let mut buf = [0_u8; MAXIMUM_PACKET_SIZE];

            loop {
                let (length, sender) = match time::timeout_at(deadline, socket.recv_from(&mut buf)).await {
                    Err(_) => {
                        debug!("Session deadline reached");
                        break;
                    }
                    Ok(Err(e)) => {
                        warn!("Error reading from socket -> {:?}", e);
                        break;
                    }
                    Ok(Ok(received)) => received,
                };

                trace!("Received {} bytes from {}", length, sender);
                match Response::from_bytes_with_limit(&buf[.. length], maximum_records) {
                    Ok(response) => {
                        if tx.send(response).await.is_err() {
                            debug!("Receiver went away, ending session");
                            break;
                        }
                    }
                    Err(e) => {
                        debug!("Dropping undecodable packet from {} -> {}", sender, e);
                    }
                }
            }
        });

        Ok(rx)
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn session_defaults() {
        let session = QuerySession::new("_googlecast._tcp.local.", RecordType::PTR).unwrap();

        assert_eq!(session.network, Network::default());
        assert_eq!(session.timeout, DEFAULT_TIMEOUT);
        assert_eq!(session.maximum_records, DEFAULT_MAXIMUM_RECORDS);
        assert!(! session.question.unicast_reply);
    }

    #[test]
    fn bad_subject_is_refused_before_any_io() {
        assert!(QuerySession::new("bad..name", RecordType::A).is_err());
    }
}
