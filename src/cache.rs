use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Directory of raw HTML pages, one file per page named by its page number.
/// Page numbers count from the last page; see
/// [`download_missing_pages`](crate::data_collector::download_missing_pages).
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    /// Open a cache directory, creating it if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs_err::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn page_file(&self, page_number: u32) -> PathBuf {
        self.dir.join(format!("{page_number}.html"))
    }

    /// Cache entries as (page number, path) pairs, ascending by page number.
    /// Files whose names do not parse back into a page number are ignored.
    fn page_entries(&self) -> anyhow::Result<Vec<(u32, PathBuf)>> {
        let mut entries = vec![];
        for entry in fs_err::read_dir(&self.dir)? {
            let path = entry?.path();
            if let Some(page_number) = page_number_from_path(&path) {
                entries.push((page_number, path));
            }
        }
        entries.sort();
        Ok(entries)
    }

    pub fn cached_page_numbers(&self) -> anyhow::Result<BTreeSet<u32>> {
        Ok(self
            .page_entries()?
            .into_iter()
            .map(|(page_number, _)| page_number)
            .collect())
    }

    pub fn page_paths(&self) -> anyhow::Result<Vec<PathBuf>> {
        Ok(self
            .page_entries()?
            .into_iter()
            .map(|(_, path)| path)
            .collect())
    }

    /// Write a fetched page.  Pages are immutable once stored.
    pub fn store(&self, page_number: u32, body: &str) -> anyhow::Result<()> {
        Ok(fs_err::write(self.page_file(page_number), body)?)
    }
}

fn page_number_from_path(path: &Path) -> Option<u32> {
    if path.extension()? != "html" {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::page_number_from_path;

    #[test]
    fn test_page_number_from_path() {
        assert_eq!(page_number_from_path(Path::new("cache/17.html")), Some(17));
        assert_eq!(page_number_from_path(Path::new("17.html")), Some(17));
        assert_eq!(page_number_from_path(Path::new("cache/17.json")), None);
        assert_eq!(page_number_from_path(Path::new("cache/notes.html")), None);
        assert_eq!(page_number_from_path(Path::new("cache/17")), None);
    }
}
