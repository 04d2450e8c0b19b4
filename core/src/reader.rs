// Byte-level access to a disk image
// Every read is addressed by absolute offset; nothing here knows about FAT

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::FatscopeError;

/// Random-access reader over an opened disk image.
///
/// Owns the file handle for the volume's lifetime; the handle is closed when
/// the reader is dropped, on every exit path.
#[derive(Debug)]
pub struct ImageReader {
    file: File,
    size: u64,
}

impl ImageReader {
    /// Open an image file for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FatscopeError> {
        let file = File::open(path)?;
        Self::new(file)
    }

    /// Wrap an already-opened file.
    pub fn new(file: File) -> Result<Self, FatscopeError> {
        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }

    /// Total size of the image in bytes.
    pub fn len(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Read exactly `len` bytes starting at `offset`.
    ///
    /// A read past the end of the image, or any short read from the
    /// underlying file, is an error: the image must contain every region its
    /// boot sector describes.
    pub fn read_at(&mut self, offset: u64, len: usize) -> Result<Vec<u8>, FatscopeError> {
        if len == 0 {
            return Ok(Vec::new());
        }
        self.file.seek(SeekFrom::Start(offset))?;
        let mut buf = vec![0u8; len];
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn read_at_returns_requested_range() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[0u8, 1, 2, 3, 4, 5, 6, 7]).unwrap();

        let mut reader = ImageReader::open(tmp.path()).unwrap();
        assert_eq!(reader.len(), 8);
        assert_eq!(reader.read_at(2, 3).unwrap(), vec![2, 3, 4]);
        assert_eq!(reader.read_at(0, 0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn read_past_end_is_an_io_error() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[0u8; 16]).unwrap();

        let mut reader = ImageReader::open(tmp.path()).unwrap();
        let err = reader.read_at(8, 16).unwrap_err();
        assert!(matches!(err, FatscopeError::Io(_)));
    }
}
