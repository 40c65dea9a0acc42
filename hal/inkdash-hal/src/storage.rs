//! Random-access blob storage
//!
//! Font files are far larger than the RAM budget, so they are read on
//! demand: a few bytes of index, one glyph record at a time. A blob can
//! live in memory-mapped flash (`&[u8]`), on a filesystem (`std` feature),
//! or behind an external SPI flash chip implemented by the board crate.

/// Errors from blob storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Blob could not be opened
    NotFound,
    /// Read extends past the end of the blob
    OutOfBounds,
    /// Underlying device failed
    Io,
}

/// Read-only random-access storage
pub trait BlobStorage {
    /// Total length of the blob in bytes
    fn len(&self) -> u32;

    /// Check if the blob is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fill `buf` with the bytes starting at `offset`
    ///
    /// Either the whole buffer is filled or an error is returned.
    fn read_at(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Read a little-endian `u16` at `offset`
    fn read_u16_le(&mut self, offset: u32) -> Result<u16, StorageError> {
        let mut raw = [0u8; 2];
        self.read_at(offset, &mut raw)?;
        Ok(u16::from_le_bytes(raw))
    }

    /// Read a little-endian `u32` at `offset`
    fn read_u32_le(&mut self, offset: u32) -> Result<u32, StorageError> {
        let mut raw = [0u8; 4];
        self.read_at(offset, &mut raw)?;
        Ok(u32::from_le_bytes(raw))
    }
}

impl BlobStorage for &[u8] {
    fn len(&self) -> u32 {
        <[u8]>::len(self) as u32
    }

    fn read_at(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), StorageError> {
        let start = offset as usize;
        let end = start
            .checked_add(buf.len())
            .ok_or(StorageError::OutOfBounds)?;
        let src = self.get(start..end).ok_or(StorageError::OutOfBounds)?;
        buf.copy_from_slice(src);
        Ok(())
    }
}

impl<T: BlobStorage + ?Sized> BlobStorage for &mut T {
    fn len(&self) -> u32 {
        (**self).len()
    }

    fn read_at(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), StorageError> {
        (**self).read_at(offset, buf)
    }
}

/// File-backed blob, opened once and read with seeks
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct FileStorage {
    file: std::fs::File,
    len: u32,
}

#[cfg(feature = "std")]
impl FileStorage {
    /// Open a file for random-access reads
    pub fn open<P: AsRef<std::path::Path>>(path: P) -> Result<Self, StorageError> {
        let file = std::fs::File::open(path).map_err(|_| StorageError::NotFound)?;
        let len = file.metadata().map_err(|_| StorageError::Io)?.len();
        let len = u32::try_from(len).map_err(|_| StorageError::OutOfBounds)?;
        Ok(Self { file, len })
    }
}

#[cfg(feature = "std")]
impl BlobStorage for FileStorage {
    fn len(&self) -> u32 {
        self.len
    }

    fn read_at(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), StorageError> {
        use std::io::{Read, Seek, SeekFrom};

        if offset as u64 + buf.len() as u64 > self.len as u64 {
            return Err(StorageError::OutOfBounds);
        }
        self.file
            .seek(SeekFrom::Start(offset as u64))
            .map_err(|_| StorageError::Io)?;
        self.file.read_exact(buf).map_err(|_| StorageError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_read_at() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let mut blob: &[u8] = &data;
        let mut buf = [0u8; 3];
        blob.read_at(2, &mut buf).unwrap();
        assert_eq!(buf, [3, 4, 5]);
        assert_eq!(BlobStorage::len(&blob), 6);
    }

    #[test]
    fn test_slice_read_past_end() {
        let data = [0u8; 4];
        let mut blob: &[u8] = &data;
        let mut buf = [0u8; 2];
        assert_eq!(blob.read_at(3, &mut buf), Err(StorageError::OutOfBounds));
        assert_eq!(blob.read_at(u32::MAX, &mut buf), Err(StorageError::OutOfBounds));
    }

    #[test]
    fn test_little_endian_helpers() {
        let data = [0x46u8, 0x55, 0x78, 0x56, 0x34, 0x12];
        let mut blob: &[u8] = &data;
        assert_eq!(blob.read_u16_le(0).unwrap(), 0x5546);
        assert_eq!(blob.read_u32_le(2).unwrap(), 0x1234_5678);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_file_storage_round_trip() {
        use std::io::Write;

        let path = std::env::temp_dir().join("inkdash-hal-storage-test.bin");
        {
            let mut file = std::fs::File::create(&path).unwrap();
            file.write_all(&[9, 8, 7, 6]).unwrap();
        }

        let mut storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.len(), 4);
        let mut buf = [0u8; 2];
        storage.read_at(1, &mut buf).unwrap();
        assert_eq!(buf, [8, 7]);
        assert_eq!(storage.read_at(3, &mut buf), Err(StorageError::OutOfBounds));

        std::fs::remove_file(&path).ok();
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_file_storage_missing() {
        let result = FileStorage::open("/nonexistent/inkdash/font.bin");
        assert_eq!(result.err(), Some(StorageError::NotFound));
    }
}
