use std::{
    fs, io,
    path::{Path, PathBuf},
    thread,
};

use futures::{
    channel::oneshot,
    future::{self, FutureExt, LocalBoxFuture},
};
use log::trace;

const BUILTIN_PREFIX: &str = "builtin:";

const BUILTIN_ICONS: [(&str, &[u8]); 4] = [
    ("table", include_bytes!("../../assets/icons/table.svg")),
    (
        "primary-key",
        include_bytes!("../../assets/icons/primary-key.svg"),
    ),
    ("nullable", include_bytes!("../../assets/icons/nullable.svg")),
    (
        "not-nullable",
        include_bytes!("../../assets/icons/not-nullable.svg"),
    ),
];

/// Resolves an icon locator into raw image bytes.
///
/// Fetches are single-threaded futures; the loader runs all of them
/// concurrently on the caller's executor.
pub trait ImageFetcher {
    fn fetch<'a>(&'a self, locator: &'a str) -> LocalBoxFuture<'a, io::Result<Vec<u8>>>;
}

/// Serves `builtin:<name>` from the icons compiled into the library and
/// every other locator from a file relative to a root directory.
#[derive(Debug, Clone, Default)]
pub struct AssetFetcher {
    root: PathBuf,
}

impl AssetFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names accepted after the `builtin:` prefix.
    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN_ICONS.into_iter().map(|(name, _)| name)
    }

    fn builtin(name: &str) -> io::Result<Vec<u8>> {
        BUILTIN_ICONS
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, data)| data.to_vec())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no built-in icon named `{name}`"),
                )
            })
    }

    /// Reads the file on its own thread so the executor never blocks on disk.
    fn read_file(&self, locator: &str) -> io::Result<oneshot::Receiver<io::Result<Vec<u8>>>> {
        let path = self.root.join(locator);
        trace!(path = path.display().to_string(); "Reading icon file");

        let (sender, receiver) = oneshot::channel();
        thread::Builder::new()
            .name(format!("dbmagic-icon-{locator}"))
            .spawn(move || {
                // The receiver is gone only if the load was abandoned.
                let _ = sender.send(fs::read(path));
            })?;
        Ok(receiver)
    }
}

impl ImageFetcher for AssetFetcher {
    fn fetch<'a>(&'a self, locator: &'a str) -> LocalBoxFuture<'a, io::Result<Vec<u8>>> {
        if let Some(name) = locator.strip_prefix(BUILTIN_PREFIX) {
            return future::ready(Self::builtin(name)).boxed_local();
        }

        match self.read_file(locator) {
            Ok(receiver) => async move {
                receiver.await.map_err(|_| {
                    io::Error::other(format!("reading `{locator}` ended without a result"))
                })?
            }
            .boxed_local(),
            Err(err) => future::ready(Err(err)).boxed_local(),
        }
    }
}
