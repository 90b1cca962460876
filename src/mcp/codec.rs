//! Line framing for the stdio transport.
//!
//! Lines that are not valid UTF-8 or that exceed the length limit are
//! yielded as [`InboundLine::Malformed`] instead of failing the stream, so
//! one bad line never ends the session.

use bytes::BytesMut;
use std::io;
use tokio_util::codec::{Decoder, Encoder, LinesCodec, LinesCodecError};

/// Longest request line accepted, in bytes.
pub const MAX_LINE_LENGTH: usize = 4 * 1024 * 1024;

/// One line read from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundLine {
    /// A complete UTF-8 line, without its terminator
    Text(String),
    /// A line that could not be framed; the reason is reported back as a parse error
    Malformed(String),
}

/// Newline-delimited codec that survives malformed lines.
#[derive(Debug, Clone)]
pub struct JsonLinesCodec {
    inner: LinesCodec,
}

impl JsonLinesCodec {
    /// Creates a codec limited to [`MAX_LINE_LENGTH`].
    pub fn new() -> Self {
        Self::with_max_length(MAX_LINE_LENGTH)
    }

    /// Creates a codec with a custom line length limit.
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            inner: LinesCodec::new_with_max_length(max_length),
        }
    }
}

impl Default for JsonLinesCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn recover(
    decoded: Result<Option<String>, LinesCodecError>,
) -> Result<Option<InboundLine>, LinesCodecError> {
    match decoded {
        Ok(line) => Ok(line.map(InboundLine::Text)),
        Err(LinesCodecError::MaxLineLengthExceeded) => Ok(Some(InboundLine::Malformed(
            "line exceeds maximum length".to_string(),
        ))),
        Err(LinesCodecError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
            Ok(Some(InboundLine::Malformed(e.to_string())))
        }
        Err(e) => Err(e),
    }
}

impl Decoder for JsonLinesCodec {
    type Item = InboundLine;
    type Error = LinesCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<InboundLine>, LinesCodecError> {
        recover(self.inner.decode(buf))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<InboundLine>, LinesCodecError> {
        recover(self.inner.decode_eof(buf))
    }
}

impl<T: AsRef<str>> Encoder<T> for JsonLinesCodec {
    type Error = LinesCodecError;

    fn encode(&mut self, line: T, dst: &mut BytesMut) -> Result<(), LinesCodecError> {
        self.inner.encode(line, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_utf8_line_is_skipped_not_fatal() {
        let mut codec = JsonLinesCodec::new();
        let mut buf = BytesMut::from(&b"{\"id\":1}\n\xff\xfe\n{\"id\":2}\n"[..]);

        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(InboundLine::Text("{\"id\":1}".to_string()))
        );
        assert!(matches!(
            codec.decode(&mut buf).unwrap(),
            Some(InboundLine::Malformed(_))
        ));
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(InboundLine::Text("{\"id\":2}".to_string()))
        );
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_overlong_line_is_discarded_once() {
        let mut codec = JsonLinesCodec::with_max_length(16);
        let mut buf = BytesMut::from(&b"abcdefghijklmnopqrstuvwxyz\nafter\n"[..]);

        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(InboundLine::Malformed("line exceeds maximum length".to_string()))
        );
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(InboundLine::Text("after".to_string()))
        );
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_final_line_without_newline_at_eof() {
        let mut codec = JsonLinesCodec::new();
        let mut buf = BytesMut::from(&b"tail"[..]);
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert_eq!(
            codec.decode_eof(&mut buf).unwrap(),
            Some(InboundLine::Text("tail".to_string()))
        );
    }

    #[test]
    fn test_encode_appends_newline() {
        let mut codec = JsonLinesCodec::new();
        let mut dst = BytesMut::new();
        codec.encode("{}", &mut dst).unwrap();
        assert_eq!(&dst[..], b"{}\n");
    }
}
