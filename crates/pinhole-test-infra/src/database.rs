use crate::error::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DATABASE_NAME: &str = "urls.db";

/// A database location inside a temporary directory.
///
/// The directory and everything in it is removed when the fixture is dropped,
/// so keep it alive for as long as any store opened on [`path`](Self::path).
pub struct TempDatabase {
    dir: TempDir,
    path: PathBuf,
}

impl TempDatabase {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("pinhole-").tempdir()?;
        let path = dir.path().join(DATABASE_NAME);
        Ok(Self { dir, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_lives_inside_dir_and_is_cleaned_up() {
        let db = TempDatabase::new().unwrap();
        let dir = db.dir().to_path_buf();

        assert!(dir.exists());
        assert_eq!(db.path().parent(), Some(dir.as_path()));
        assert!(!db.path().exists());

        drop(db);
        assert!(!dir.exists());
    }
}
