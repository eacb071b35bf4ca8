//! Append-only log files.
//!
//! [`FileRepository`] stores any serializable type as length-prefixed
//! bincode records. It backs both `commands.log` and `events.log`.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::events::Event;
use crate::repository::traits::{CommandRepository, EventRepository};
use crate::repository::types::CommandLogEntry;
use crate::repository::{RepositoryError, Result};

const LEN_PREFIX: u64 = 4;

/// Append-only log of `T`.
///
/// ```text
/// [u32 little-endian length][bincode T]
/// [u32 little-endian length][bincode T]
/// ...
/// ```
///
/// Offsets handed out by [`Self::append`] are byte offsets of the length
/// prefix and stay valid for the life of the file.
pub struct FileRepository<T> {
    name: String,
    path: PathBuf,
    writer: BufWriter<File>,
    end: u64,
    _phantom: PhantomData<T>,
}

/// `commands.log`
pub type FileCommandLog = FileRepository<CommandLogEntry>;

/// `events.log`
pub type FileEventLog = FileRepository<Event>;

impl<T> FileRepository<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a new, empty log. Fails if the file already exists.
    pub fn create(dir: impl AsRef<Path>, name: impl AsRef<str>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let path = dir.join(name.as_ref());
        let file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    RepositoryError::LogAlreadyExists(path.display().to_string())
                }
                _ => RepositoryError::Io(e),
            })?;

        tracing::debug!(path = %path.display(), "created log");
        Ok(Self::from_file(name.as_ref(), path, file, 0))
    }

    /// Opens an existing log for appending.
    pub fn open(dir: impl AsRef<Path>, name: impl AsRef<str>) -> Result<Self> {
        let path = dir.as_ref().join(name.as_ref());
        let file = OpenOptions::new().append(true).open(&path)?;
        let end = file.metadata()?.len();

        tracing::debug!(path = %path.display(), end, "opened log");
        Ok(Self::from_file(name.as_ref(), path, file, end))
    }

    fn from_file(name: &str, path: PathBuf, file: File, end: u64) -> Self {
        Self {
            name: name.to_owned(),
            path,
            writer: BufWriter::new(file),
            end,
            _phantom: PhantomData,
        }
    }

    /// Appends one record and returns its offset.
    pub fn append(&mut self, item: &T) -> Result<u64> {
        let bytes =
            bincode::serialize(item).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let len = u32::try_from(bytes.len()).map_err(|_| {
            RepositoryError::Serialization(format!("record of {} bytes is too large", bytes.len()))
        })?;

        let offset = self.end;
        self.writer.write_all(&len.to_le_bytes())?;
        self.writer.write_all(&bytes)?;
        self.end += LEN_PREFIX + u64::from(len);
        Ok(offset)
    }

    /// Reads the record at `offset`.
    ///
    /// Only flushed records are visible. A record cut short by a crash is
    /// reported as [`RepositoryError::CorruptedData`].
    pub fn read_at_offset(&self, offset: u64) -> Result<Option<(T, u64)>> {
        let file = File::open(&self.path)?;
        let size = file.metadata()?.len();
        if offset >= size {
            return Ok(None);
        }

        let mut reader = BufReader::new(file);
        reader.seek(SeekFrom::Start(offset))?;
        read_record(&mut reader, offset)
            .map(|(item, len)| Some((item, offset + LEN_PREFIX + len)))
    }

    /// Reads every record from the start of the file.
    pub fn read_all(&mut self) -> Result<Vec<T>> {
        self.flush()?;
        read_all(&self.path)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Size of the log in bytes, including buffered writes.
    pub fn size(&self) -> u64 {
        self.end
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reads every record of a log file without opening it for writing.
pub fn read_all<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let mut items = Vec::new();
    let mut offset = 0;
    while offset < size {
        let (item, len) = read_record(&mut reader, offset)?;
        items.push(item);
        offset += LEN_PREFIX + len;
    }
    Ok(items)
}

fn read_record<T: DeserializeOwned>(reader: &mut impl Read, offset: u64) -> Result<(T, u64)> {
    let truncated = |e: std::io::Error| match e.kind() {
        ErrorKind::UnexpectedEof => {
            RepositoryError::CorruptedData(format!("truncated record at offset {offset}"))
        }
        _ => RepositoryError::Io(e),
    };

    let mut len_bytes = [0u8; LEN_PREFIX as usize];
    reader.read_exact(&mut len_bytes).map_err(truncated)?;
    let len = u32::from_le_bytes(len_bytes);

    let mut data = vec![0u8; len as usize];
    reader.read_exact(&mut data).map_err(truncated)?;

    let item = bincode::deserialize(&data).map_err(|e| {
        RepositoryError::CorruptedData(format!("record at offset {offset}: {e}"))
    })?;
    Ok((item, u64::from(len)))
}

impl<T> Drop for FileRepository<T> {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            tracing::warn!("Failed to flush log '{}' on drop: {}", self.name, e);
        }
    }
}

impl EventRepository for FileRepository<Event> {
    fn append(&mut self, event: &Event) -> Result<u64> {
        FileRepository::append(self, event)
    }

    fn read_at_offset(&self, offset: u64) -> Result<Option<(Event, u64)>> {
        FileRepository::read_at_offset(self, offset)
    }

    fn flush(&mut self) -> Result<()> {
        FileRepository::flush(self)
    }

    fn size(&self) -> Result<u64> {
        Ok(FileRepository::size(self))
    }

    fn name(&self) -> &str {
        FileRepository::name(self)
    }
}

impl CommandRepository for FileRepository<CommandLogEntry> {
    fn append(&mut self, entry: &CommandLogEntry) -> Result<u64> {
        FileRepository::append(self, entry)
    }

    fn read_at_offset(&self, offset: u64) -> Result<Option<(CommandLogEntry, u64)>> {
        FileRepository::read_at_offset(self, offset)
    }

    fn flush(&mut self) -> Result<()> {
        FileRepository::flush(self)
    }

    fn size(&self) -> Result<u64> {
        Ok(FileRepository::size(self))
    }

    fn name(&self) -> &str {
        FileRepository::name(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        nonce: u64,
        label: String,
    }

    fn entry(nonce: u64) -> Entry {
        Entry {
            nonce,
            label: format!("entry {nonce}"),
        }
    }

    #[test]
    fn offsets_chain_through_the_log() {
        let dir = TempDir::new().unwrap();
        let mut log = FileRepository::<Entry>::create(dir.path(), "test.log").unwrap();

        let first = log.append(&entry(0)).unwrap();
        let second = log.append(&entry(1)).unwrap();
        log.flush().unwrap();

        assert_eq!(first, 0);
        let (read, next) = log.read_at_offset(first).unwrap().unwrap();
        assert_eq!(read, entry(0));
        assert_eq!(next, second);

        let (read, next) = log.read_at_offset(second).unwrap().unwrap();
        assert_eq!(read, entry(1));
        assert_eq!(next, log.size());
        assert!(log.read_at_offset(next).unwrap().is_none());
    }

    #[test]
    fn create_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let _log = FileRepository::<Entry>::create(dir.path(), "test.log").unwrap();

        assert!(matches!(
            FileRepository::<Entry>::create(dir.path(), "test.log"),
            Err(RepositoryError::LogAlreadyExists(_))
        ));
    }

    #[test]
    fn reopened_log_appends_after_existing_records() {
        let dir = TempDir::new().unwrap();
        {
            let mut log = FileRepository::<Entry>::create(dir.path(), "test.log").unwrap();
            log.append(&entry(0)).unwrap();
        }

        let mut log = FileRepository::<Entry>::open(dir.path(), "test.log").unwrap();
        assert!(log.size() > 0);
        log.append(&entry(1)).unwrap();

        assert_eq!(log.read_all().unwrap(), vec![entry(0), entry(1)]);
    }

    #[test]
    fn truncated_tail_is_reported_as_corruption() {
        let dir = TempDir::new().unwrap();
        let path = {
            let mut log = FileRepository::<Entry>::create(dir.path(), "test.log").unwrap();
            log.append(&entry(0)).unwrap();
            log.append(&entry(1)).unwrap();
            log.path().to_path_buf()
        };

        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 2]).unwrap();

        assert!(matches!(
            read_all::<Entry>(&path),
            Err(RepositoryError::CorruptedData(_))
        ));
    }
}
