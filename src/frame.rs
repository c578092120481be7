use std::io::{self, Read};

/// Size of the little-endian `u32` length prefix in front of every payload.
pub const LENGTH_PREFIX_BYTES: usize = 4;

// Upper bound on the up-front allocation for a payload. Larger payloads still
// work; they just grow the buffer as bytes arrive.
const MAX_PREALLOC_BYTES: usize = 1024 * 1024;

/// The payload half of a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// All `length` bytes arrived.
    Complete(Vec<u8>),

    /// The stream ended before the declared length was reached.
    Truncated { expected: u32, got: usize },
}

/// Reads `[u32 LE length][length bytes]` frames from a byte stream.
///
/// The reader never buffers beyond the frame currently being read, so a
/// caller can interleave responses with reads on a pipe.
pub struct FrameReader<R: Read> {
    inner: R,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read the next length prefix.
    ///
    /// Returns `Ok(None)` when the stream ends before four bytes are available,
    /// including a clean EOF and a partial prefix.
    pub fn read_length(&mut self) -> io::Result<Option<u32>> {
        let mut prefix = [0u8; LENGTH_PREFIX_BYTES];
        let n = read_up_to(&mut self.inner, &mut prefix)?;
        if n < LENGTH_PREFIX_BYTES {
            return Ok(None);
        }
        Ok(Some(u32::from_le_bytes(prefix)))
    }

    /// Read exactly `length` payload bytes, or report how many arrived before EOF.
    pub fn read_payload(&mut self, length: u32) -> io::Result<Frame> {
        let expected = length as usize;
        let mut payload = Vec::with_capacity(expected.min(MAX_PREALLOC_BYTES));
        (&mut self.inner)
            .take(u64::from(length))
            .read_to_end(&mut payload)?;

        if payload.len() < expected {
            return Ok(Frame::Truncated {
                expected: length,
                got: payload.len(),
            });
        }
        Ok(Frame::Complete(payload))
    }
}

/// Fill `buf` from `r` until it is full or the stream hits EOF.
fn read_up_to<R: Read>(r: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn framed(payload: &[u8]) -> Vec<u8> {
        let mut out = (payload.len() as u32).to_le_bytes().to_vec();
        out.extend_from_slice(payload);
        out
    }

    fn next_frame<R: Read>(reader: &mut FrameReader<R>) -> io::Result<Option<Frame>> {
        match reader.read_length()? {
            Some(length) => reader.read_payload(length).map(Some),
            None => Ok(None),
        }
    }

    /// Hands out at most one byte per `read` call.
    struct Trickle<R>(R);

    impl<R: Read> Read for Trickle<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let end = buf.len().min(1);
            self.0.read(&mut buf[..end])
        }
    }

    #[test]
    fn reads_complete_frames_in_order() -> anyhow::Result<()> {
        let mut input = framed(b"abcd");
        input.extend(framed(b"xy"));
        let mut reader = FrameReader::new(Cursor::new(input));

        assert_eq!(next_frame(&mut reader)?, Some(Frame::Complete(b"abcd".to_vec())));
        assert_eq!(next_frame(&mut reader)?, Some(Frame::Complete(b"xy".to_vec())));
        assert_eq!(next_frame(&mut reader)?, None);
        Ok(())
    }

    #[test]
    fn empty_stream_is_end_of_stream() -> anyhow::Result<()> {
        let mut reader = FrameReader::new(Cursor::new(Vec::new()));
        assert_eq!(reader.read_length()?, None);
        Ok(())
    }

    #[test]
    fn partial_prefix_is_end_of_stream() -> anyhow::Result<()> {
        let mut reader = FrameReader::new(Cursor::new(vec![0x10, 0x00]));
        assert_eq!(next_frame(&mut reader)?, None);
        Ok(())
    }

    #[test]
    fn zero_length_frame_has_empty_payload() -> anyhow::Result<()> {
        let mut reader = FrameReader::new(Cursor::new(framed(&[])));
        assert_eq!(next_frame(&mut reader)?, Some(Frame::Complete(Vec::new())));
        assert_eq!(next_frame(&mut reader)?, None);
        Ok(())
    }

    #[test]
    fn short_payload_is_reported_as_truncated() -> anyhow::Result<()> {
        let mut input = 10u32.to_le_bytes().to_vec();
        input.extend_from_slice(&[1, 2, 3]);
        let mut reader = FrameReader::new(Cursor::new(input));

        assert_eq!(
            next_frame(&mut reader)?,
            Some(Frame::Truncated {
                expected: 10,
                got: 3
            })
        );
        assert_eq!(next_frame(&mut reader)?, None);
        Ok(())
    }

    #[test]
    fn length_prefix_is_little_endian() -> anyhow::Result<()> {
        let mut reader = FrameReader::new(Cursor::new(vec![0x01, 0x02, 0x00, 0x00]));
        assert_eq!(reader.read_length()?, Some(0x0201));
        Ok(())
    }

    #[test]
    fn reassembles_frames_from_short_reads() -> anyhow::Result<()> {
        let payload: Vec<u8> = (0..=255).collect();
        let mut reader = FrameReader::new(Trickle(Cursor::new(framed(&payload))));
        assert_eq!(next_frame(&mut reader)?, Some(Frame::Complete(payload)));
        Ok(())
    }
}
