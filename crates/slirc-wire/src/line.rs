//! Line framing for the client transport.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::WireError;

/// Frames the incoming byte stream into lines.
///
/// The decoder splits on LF, strips a trailing CR, and keeps the final
/// incomplete segment buffered until the next chunk arrives. Decoding is
/// lossy so a line of bad UTF-8 never kills the connection, and no length
/// limit is enforced. The encoder appends CRLF.
#[derive(Debug, Default)]
pub struct LineCodec {
    /// Offset of the next unscanned byte, so repeated polls over a partial
    /// line do not rescan it from the start.
    scanned: usize,
}

impl LineCodec {
    /// Create a fresh codec.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = WireError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, WireError> {
        match src[self.scanned..].iter().position(|b| *b == b'\n') {
            Some(offset) => {
                let mut line = src.split_to(self.scanned + offset + 1);
                self.scanned = 0;
                line.truncate(line.len() - 1);
                if line.last() == Some(&b'\r') {
                    line.truncate(line.len() - 1);
                }
                Ok(Some(String::from_utf8_lossy(&line).into_owned()))
            }
            None => {
                self.scanned = src.len();
                Ok(None)
            }
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = WireError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<(), WireError> {
        dst.reserve(line.len() + 2);
        dst.put_slice(line.as_bytes());
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(buf: &mut BytesMut, chunk: &str) {
        buf.extend_from_slice(chunk.as_bytes());
    }

    #[test]
    fn decodes_crlf_and_bare_lf() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        feed(&mut buf, "PING :one\r\nPING :two\n");
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("PING :one"));
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("PING :two"));
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn reassembles_across_chunk_boundaries() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        feed(&mut buf, ":irc.example.net 001 kit :Wel");
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        feed(&mut buf, "come\r\nPI");
        assert_eq!(
            codec.decode(&mut buf).unwrap().as_deref(),
            Some(":irc.example.net 001 kit :Welcome")
        );
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        feed(&mut buf, "NG :x\r\n");
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some("PING :x"));
    }

    #[test]
    fn bad_utf8_decodes_lossily() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        buf.extend_from_slice(b"PRIVMSG #x :caf\xe9\r\n");
        let line = codec.decode(&mut buf).unwrap().unwrap();
        assert!(line.starts_with("PRIVMSG #x :caf"));
        assert!(line.contains('\u{fffd}'));
    }

    #[test]
    fn empty_line_is_preserved_as_empty() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        buf.extend_from_slice(b"\r\n");
        assert_eq!(codec.decode(&mut buf).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn encoder_appends_crlf() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();
        codec.encode("NICK kit".to_string(), &mut buf).unwrap();
        assert_eq!(&buf[..], b"NICK kit\r\n");
    }
}
