//! Archive access for EPUB containers.
//!
//! Content references never hold entry data themselves; they look entries up
//! through an [`EpubArchive`] each time they are read. Two providers ship with
//! the crate: [`MemoryArchive`] for entries already held in memory and
//! [`ZipEpubArchive`] for `.epub` files.

use std::collections::HashMap;
use std::fmt;
use std::io::{self, Cursor, Read};

use bytes::Bytes;

/// A named entry of the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    name: String,
    len: u64,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, len: u64) -> Self {
        Self {
            name: name.into(),
            len,
        }
    }

    /// Member name inside the container
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uncompressed size in bytes
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Provider of named entries inside an EPUB container.
///
/// Implementations must be safe to share between threads; content references
/// holding the same archive may be read concurrently.
pub trait EpubArchive: Send + Sync + fmt::Debug {
    /// Look up an entry by its member name, or `None` if it does not exist.
    fn entry(&self, name: &str) -> Option<ArchiveEntry>;

    /// Open a fresh stream positioned at the start of the entry's content.
    fn open(&self, entry: &ArchiveEntry) -> io::Result<Box<dyn Read + Send>>;
}

/// Archive whose entries are held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    entries: HashMap<String, Bytes>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Bytes>) {
        self.entries.insert(name.into(), data.into());
    }

    /// Builder-style variant of [`MemoryArchive::insert`].
    pub fn with_entry(mut self, name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Bytes> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, D: Into<Bytes>> FromIterator<(N, D)> for MemoryArchive {
    fn from_iter<I: IntoIterator<Item = (N, D)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(name, data)| (name.into(), data.into()))
            .collect();
        Self { entries }
    }
}

impl EpubArchive for MemoryArchive {
    fn entry(&self, name: &str) -> Option<ArchiveEntry> {
        self.entries
            .get(name)
            .map(|data| ArchiveEntry::new(name, data.len() as u64))
    }

    fn open(&self, entry: &ArchiveEntry) -> io::Result<Box<dyn Read + Send>> {
        let data = self.entries.get(entry.name()).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, entry.name().to_string())
        })?;
        Ok(Box::new(Cursor::new(data)))
    }
}

#[cfg(feature = "zip")]
pub use self::zip_archive::ZipEpubArchive;

#[cfg(feature = "zip")]
mod zip_archive {
    use super::*;
    use crate::common::{Error, Result};
    use crate::epub::constants::MAX_ENTRY_SIZE;
    use parking_lot::Mutex;
    use std::path::Path;
    use zip::ZipArchive;

    /// ZIP-backed EPUB container.
    ///
    /// The central directory is indexed once on construction so lookups do not
    /// touch the archive. Entries are inflated only when opened.
    pub struct ZipEpubArchive {
        archive: Mutex<ZipArchive<Cursor<Bytes>>>,
        /// Member name -> (index in the central directory, uncompressed size)
        index: HashMap<String, (usize, u64)>,
    }

    impl ZipEpubArchive {
        /// Open an `.epub` file from a path.
        ///
        /// # Errors
        /// Returns an error if the file doesn't exist, isn't a valid ZIP file,
        /// or cannot be read.
        pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
            let path = path.as_ref();

            if !path.exists() {
                return Err(Error::PackageNotFound(path.display().to_string()));
            }

            let data = std::fs::read(path)?;
            Self::from_bytes(data)
        }

        /// Create an archive from an in-memory `.epub` image.
        pub fn from_bytes(data: impl Into<Bytes>) -> Result<Self> {
            let mut archive = ZipArchive::new(Cursor::new(data.into()))?;

            let mut index = HashMap::with_capacity(archive.len());
            for i in 0..archive.len() {
                let file = archive.by_index(i)?;
                if file.is_dir() {
                    continue;
                }
                index.insert(file.name().to_string(), (i, file.size()));
            }

            tracing::debug!(entries = index.len(), "indexed epub archive");
            Ok(Self {
                archive: Mutex::new(archive),
                index,
            })
        }

        /// Create an archive by reading a whole stream into memory.
        pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
            let mut data = Vec::new();
            reader.read_to_end(&mut data)?;
            Self::from_bytes(data)
        }

        /// Number of file entries (directories excluded).
        pub fn len(&self) -> usize {
            self.index.len()
        }

        pub fn is_empty(&self) -> bool {
            self.index.is_empty()
        }

        /// All member names in the archive.
        pub fn member_names(&self) -> impl Iterator<Item = &str> {
            self.index.keys().map(String::as_str)
        }
    }

    impl EpubArchive for ZipEpubArchive {
        fn entry(&self, name: &str) -> Option<ArchiveEntry> {
            self.index
                .get(name)
                .map(|&(_, len)| ArchiveEntry::new(name, len))
        }

        fn open(&self, entry: &ArchiveEntry) -> io::Result<Box<dyn Read + Send>> {
            let &(idx, len) = self.index.get(entry.name()).ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, entry.name().to_string())
            })?;

            let mut archive = self.archive.lock();
            let file = archive.by_index(idx).map_err(io::Error::other)?;
            let mut buf = Vec::with_capacity(len.min(MAX_ENTRY_SIZE) as usize);
            file.take(len + 1).read_to_end(&mut buf)?;
            if buf.len() as u64 > len {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} inflates past its declared size of {len} bytes", entry.name()),
                ));
            }
            Ok(Box::new(Cursor::new(buf)))
        }
    }

    impl fmt::Debug for ZipEpubArchive {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("ZipEpubArchive")
                .field("entries", &self.index.len())
                .finish()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        fn build_epub(files: &[(&str, &[u8])]) -> Vec<u8> {
            let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
            let stored =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
            writer.start_file("mimetype", stored).unwrap();
            writer.write_all(b"application/epub+zip").unwrap();
            writer.add_directory("OEBPS/", SimpleFileOptions::default()).unwrap();
            for (name, data) in files {
                writer
                    .start_file(*name, SimpleFileOptions::default())
                    .unwrap();
                writer.write_all(data).unwrap();
            }
            writer.finish().unwrap().into_inner()
        }

        #[test]
        fn test_lookup_and_open() {
            let data = build_epub(&[("OEBPS/ch1.xhtml", &b"<html/>"[..])]);
            let archive = ZipEpubArchive::from_bytes(data).unwrap();

            assert_eq!(archive.len(), 2);
            let entry = archive.entry("OEBPS/ch1.xhtml").unwrap();
            assert_eq!(entry.len(), 7);

            let mut content = Vec::new();
            archive.open(&entry).unwrap().read_to_end(&mut content).unwrap();
            assert_eq!(content, b"<html/>");
        }

        #[test]
        fn test_directories_and_missing_entries() {
            let data = build_epub(&[]);
            let archive = ZipEpubArchive::from_bytes(data).unwrap();
            assert!(archive.entry("OEBPS/").is_none());
            assert!(archive.entry("OEBPS/missing.css").is_none());
            assert!(archive.member_names().any(|n| n == "mimetype"));
        }

        #[test]
        fn test_open_from_path() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("book.epub");
            std::fs::write(&path, build_epub(&[("a.css", &b"p{}"[..])])).unwrap();

            let archive = ZipEpubArchive::open(&path).unwrap();
            assert!(archive.entry("a.css").is_some());

            let missing = ZipEpubArchive::open(dir.path().join("nope.epub"));
            assert!(matches!(missing, Err(Error::PackageNotFound(_))));
        }

        /// Rewrite the uncompressed size in every local and central header.
        fn understate_sizes(data: &mut [u8], size: u32) {
            for (signature, offset) in [(&b"PK\x03\x04"[..], 22), (&b"PK\x01\x02"[..], 24)] {
                let headers: Vec<usize> = memchr::memmem::find_iter(data, signature).collect();
                for pos in headers {
                    data[pos + offset..pos + offset + 4].copy_from_slice(&size.to_le_bytes());
                }
            }
        }

        #[test]
        fn test_open_rejects_entry_larger_than_declared() {
            let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
            writer.start_file("big.png", SimpleFileOptions::default()).unwrap();
            writer.write_all(&[7u8; 4096]).unwrap();
            let mut data = writer.finish().unwrap().into_inner();
            understate_sizes(&mut data, 4);

            let archive = ZipEpubArchive::from_bytes(data).unwrap();
            let entry = archive.entry("big.png").unwrap();
            assert_eq!(entry.len(), 4);

            let err = archive.open(&entry).err().unwrap();
            assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        }

        #[test]
        fn test_not_a_zip() {
            assert!(ZipEpubArchive::from_bytes(b"not a zip".to_vec()).is_err());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_archive() {
        let archive = MemoryArchive::new().with_entry("OEBPS/a.css", "p {}");
        let entry = archive.entry("OEBPS/a.css").unwrap();
        assert_eq!(entry.len(), 4);
        assert!(archive.entry("OEBPS/b.css").is_none());

        let mut content = String::new();
        archive.open(&entry).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "p {}");
    }

    #[test]
    fn test_memory_archive_from_iter() {
        let archive: MemoryArchive = [("a", "1"), ("b", "22")].into_iter().collect();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.entry("b").map(|e| e.len()), Some(2));
    }
}
