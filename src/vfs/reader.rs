/*!
 * Stream Reader
 * Cursor adapter exposing a positional byte stream as `Read + Seek`
 */

use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Deref;

use super::traits::ByteStream;
use super::types::VfsResult;
use crate::resolver::Shared;

/// Positional reads a [`StreamReader`] can drive
pub trait ReadAt {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<usize>;

    fn size(&self) -> VfsResult<u64>;
}

impl ReadAt for dyn ByteStream {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<usize> {
        ByteStream::read_at(self, offset, buf)
    }

    fn size(&self) -> VfsResult<u64> {
        ByteStream::size(self)
    }
}

impl ReadAt for Shared<dyn ByteStream> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> VfsResult<usize> {
        Shared::<dyn ByteStream>::read_at(self, offset, buf)
    }

    fn size(&self) -> VfsResult<u64> {
        Shared::<dyn ByteStream>::size(self)
    }
}

/// Cursor over a byte stream
///
/// Generic over anything that dereferences to a readable stream, so it works
/// with both borrowed streams and resolver handles.
pub struct StreamReader<S> {
    stream: S,
    position: u64,
}

impl<S> StreamReader<S>
where
    S: Deref,
    S::Target: ReadAt,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            position: 0,
        }
    }

    /// Current cursor position
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Recover the wrapped stream
    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S> Read for StreamReader<S>
where
    S: Deref,
    S::Target: ReadAt,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = ReadAt::read_at(&*self.stream, self.position, buf)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        self.position += read as u64;
        Ok(read)
    }
}

impl<S> Seek for StreamReader<S>
where
    S: Deref,
    S::Target: ReadAt,
{
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let size = ReadAt::size(&*self.stream)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => size.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
        };
        match target {
            Some(position) => {
                self.position = position;
                Ok(position)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek to a negative or overflowing position",
            )),
        }
    }
}
