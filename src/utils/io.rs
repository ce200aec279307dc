// I/O utilities for reading live streams

use std::io::{self, Read, Write};

/// Reader that never returns a partial fill.
///
/// Network bodies hand out data in whatever chunk sizes arrive. Every decoder
/// in this crate needs exact-length reads, so `read` keeps pulling from the
/// inner source until the buffer is full. End of stream before that point is
/// reported as `UnexpectedEof`, never as a short count.
pub struct WaitReader<R> {
    inner: R,
}

impl<R: Read> WaitReader<R> {
    pub fn new(inner: R) -> Self {
        WaitReader { inner }
    }
}

impl<R: Read> Read for WaitReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("stream ended after {} of {} bytes", filled, buf.len()),
                    ));
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

/// Reader that copies everything it reads into a writer
pub struct TeeReader<'a, R: ?Sized, W: ?Sized> {
    reader: &'a mut R,
    writer: &'a mut W,
}

impl<'a, R: Read + ?Sized, W: Write + ?Sized> TeeReader<'a, R, W> {
    pub fn new(reader: &'a mut R, writer: &'a mut W) -> Self {
        TeeReader { reader, writer }
    }
}

impl<R: Read + ?Sized, W: Write + ?Sized> Read for TeeReader<'_, R, W> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        self.writer.write_all(&buf[..n])?;
        Ok(n)
    }
}

/// Read a single byte
pub fn read_u8<R: Read + ?Sized>(reader: &mut R) -> io::Result<u8> {
    let mut buffer = [0u8; 1];
    reader.read_exact(&mut buffer)?;
    Ok(buffer[0])
}

/// Read little-endian 32-bit integer
pub fn read_le_u32<R: Read + ?Sized>(reader: &mut R) -> io::Result<u32> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(u32::from_le_bytes(buffer))
}

/// Read a field prefixed by its little-endian 32-bit length
pub fn read_le_u32_prefixed<R: Read + ?Sized>(reader: &mut R) -> io::Result<Vec<u8>> {
    let length = read_le_u32(reader)? as usize;
    // Grow as data arrives so a bogus length can't allocate gigabytes up front
    let mut data = Vec::new();
    (&mut *reader).take(length as u64).read_to_end(&mut data)?;
    if data.len() != length {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("field declares {} bytes, only {} available", length, data.len()),
        ));
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most `chunk` bytes per call, like a slow socket
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn wait_reader_fills_from_small_chunks() {
        let source = Trickle { data: (0..10).collect(), pos: 0, chunk: 3 };
        let mut reader = WaitReader::new(source);
        let mut buf = [0u8; 8];
        assert_eq!(reader.read(&mut buf).unwrap(), 8);
        assert_eq!(buf, [0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn wait_reader_reports_short_fill_as_error() {
        let source = Trickle { data: vec![1, 2, 3], pos: 0, chunk: 1 };
        let mut reader = WaitReader::new(source);
        let mut buf = [0u8; 5];
        let err = reader.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn wait_reader_clean_end_is_an_error() {
        let mut reader = WaitReader::new(Cursor::new(Vec::new()));
        let mut buf = [0u8; 1];
        assert_eq!(reader.read(&mut buf).unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn tee_reader_copies_bytes() {
        let mut source = Cursor::new(b"hello world".to_vec());
        let mut copy = Vec::new();
        let mut tee = TeeReader::new(&mut source, &mut copy);
        let mut buf = [0u8; 5];
        tee.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"hello");
        assert_eq!(copy, b"hello");
    }

    #[test]
    fn prefixed_field_must_be_complete() {
        let mut data = Cursor::new(vec![5, 0, 0, 0, b'a', b'b']);
        let err = read_le_u32_prefixed(&mut data).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);

        let mut data = Cursor::new(vec![2, 0, 0, 0, b'a', b'b']);
        assert_eq!(read_le_u32_prefixed(&mut data).unwrap(), b"ab");
    }
}
