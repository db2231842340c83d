//! Local transport: `file://` paths and a couple of `about:` pages.

use std::fs;
use std::io;
use std::path::Path;

use tabweave_core::{CancelFlag, FetchError, Request, Transport};
use tracing::debug;
use url::Url;

pub struct LocalTransport {
    user_agent: String,
}

impl LocalTransport {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }

    fn about(&self, page: &str) -> Result<Vec<u8>, FetchError> {
        match page {
            "blank" => Ok(Vec::new()),
            "version" => Ok(format!(
                "# tabweave {}\n\nUser agent: {}\n",
                env!("CARGO_PKG_VERSION"),
                self.user_agent
            )
            .into_bytes()),
            other => Err(FetchError::NotFound(format!("about:{other}"))),
        }
    }

    fn file(&self, url: &Url, cancel: &CancelFlag) -> Result<Vec<u8>, FetchError> {
        let path = url
            .to_file_path()
            .map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        if path.is_dir() {
            return directory_index(&path);
        }
        fs::read(&path).map_err(|e| io_error(&path, e))
    }
}

impl Transport for LocalTransport {
    fn fetch(&self, request: &Request, cancel: &CancelFlag) -> Result<Vec<u8>, FetchError> {
        debug!(url = %request, "local fetch");
        match request.scheme() {
            "about" => self.about(request.url().path()),
            "file" => self.file(request.url(), cancel),
            other => Err(FetchError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// A gemtext listing of a directory, one link per entry, sorted by name.
fn directory_index(path: &Path) -> Result<Vec<u8>, FetchError> {
    let mut names: Vec<(String, bool)> = fs::read_dir(path)
        .map_err(|e| io_error(path, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (entry.file_name().to_string_lossy().into_owned(), is_dir)
        })
        .collect();
    names.sort();

    let mut page = format!("# Index of {}\n\n", path.display());
    for (name, is_dir) in names {
        let target = if is_dir { format!("{name}/") } else { name.clone() };
        page.push_str(&format!("=> {target} {name}\n"));
    }
    Ok(page.into_bytes())
}

fn io_error(path: &Path, err: io::Error) -> FetchError {
    match err.kind() {
        io::ErrorKind::NotFound => FetchError::NotFound(path.display().to_string()),
        _ => FetchError::Transport(format!("{}: {err}", path.display())),
    }
}
