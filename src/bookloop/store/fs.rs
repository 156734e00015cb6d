use super::{Collection, CollectionLocks, RecordStore};
use crate::config::BookloopConfig;
use crate::error::{BookloopError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::MutexGuard;
use uuid::Uuid;

pub const DEFAULT_BOOKS_FILE: &str = "books.json";
pub const DEFAULT_USERS_FILE: &str = "users.json";
pub const DEFAULT_PROFIT_FILE: &str = "admin_profit.json";

/// File-backed store: one JSON file per collection inside `root`.
pub struct FileStore {
    root: PathBuf,
    books_file: String,
    users_file: String,
    profit_file: String,
    locks: CollectionLocks,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            books_file: DEFAULT_BOOKS_FILE.to_string(),
            users_file: DEFAULT_USERS_FILE.to_string(),
            profit_file: DEFAULT_PROFIT_FILE.to_string(),
            locks: CollectionLocks::default(),
        }
    }

    /// Use the file names from a loaded configuration.
    pub fn with_config(mut self, config: &BookloopConfig) -> Self {
        self.books_file = config.books_file.clone();
        self.users_file = config.users_file.clone();
        self.profit_file = config.profit_file.clone();
        self
    }

    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        let name = match collection {
            Collection::Books => &self.books_file,
            Collection::Users => &self.users_file,
            Collection::Profit => &self.profit_file,
        };
        self.root.join(name)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(BookloopError::Io)?;
        }
        Ok(())
    }
}

impl RecordStore for FileStore {
    fn read_document(&self, collection: Collection) -> Result<Option<String>> {
        match fs::read_to_string(self.collection_path(collection)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BookloopError::Io(e)),
        }
    }

    fn write_document(&self, collection: Collection, contents: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.collection_path(collection);

        // Write next to the target and rename over it so readers never see a partial file
        let tmp_file = self
            .root
            .join(format!(".{}-{}.tmp", collection, Uuid::new_v4()));
        if let Err(e) = fs::write(&tmp_file, contents) {
            let _ = fs::remove_file(&tmp_file);
            return Err(BookloopError::Io(e));
        }
        fs::rename(&tmp_file, &target).map_err(|e| {
            let _ = fs::remove_file(&tmp_file);
            BookloopError::Io(e)
        })?;
        Ok(())
    }

    fn lock(&self, collection: Collection) -> Result<MutexGuard<'_, ()>> {
        self.locks.acquire(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Book, BookDetails, BookId};

    #[test]
    fn missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let books: Vec<Book> = store.load(Collection::Books, Vec::new()).unwrap();
        assert!(books.is_empty());
    }

    #[test]
    fn creates_data_dir_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("data");
        let store = FileStore::new(&root);
        let books = vec![Book::new(BookId(1), "sam", BookDetails::new("A", "B", 1.0))];
        store.save(Collection::Books, &books).unwrap();
        assert!(root.join(DEFAULT_BOOKS_FILE).exists());
    }

    #[test]
    fn uses_configured_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let config = BookloopConfig {
            books_file: "listings.json".into(),
            ..BookloopConfig::default()
        };
        let store = FileStore::new(dir.path()).with_config(&config);
        assert_eq!(
            store.collection_path(Collection::Books),
            dir.path().join("listings.json")
        );
        assert_eq!(
            store.collection_path(Collection::Profit),
            dir.path().join(DEFAULT_PROFIT_FILE)
        );
    }
}
