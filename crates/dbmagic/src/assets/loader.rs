use std::{fmt::Write as _, io};

use futures::future::join_all;
use log::{debug, error, info};
use thiserror::Error;

use dbmagic_core::icon::IconKey;

use super::{DecodeError, IconImage, IconImages, IconSet, ImageFetcher, PartialIconImages};

/// Why a single icon could not be loaded.
#[derive(Debug, Error)]
pub enum IconFailureReason {
    #[error("fetch failed: {0}")]
    Fetch(#[source] io::Error),

    #[error("decode failed: {0}")]
    Decode(#[source] DecodeError),

    #[error("never resolved")]
    Unresolved,
}

/// One icon that failed to load.
#[derive(Debug)]
pub struct IconFailure {
    key: IconKey,
    locator: String,
    reason: IconFailureReason,
}

impl IconFailure {
    pub fn key(&self) -> IconKey {
        self.key
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn reason(&self) -> &IconFailureReason {
        &self.reason
    }
}

/// Every icon that failed during one [`IconLoader::load_all`] call.
#[derive(Debug, Error)]
#[error("failed to load {} icon(s): {}", .failures.len(), describe(.failures))]
pub struct AssetError {
    failures: Vec<IconFailure>,
}

impl AssetError {
    pub fn failures(&self) -> &[IconFailure] {
        &self.failures
    }
}

fn describe(failures: &[IconFailure]) -> String {
    let mut out = String::new();
    for (i, failure) in failures.iter().enumerate() {
        if i > 0 {
            out.push_str("; ");
        }
        let _ = write!(
            out,
            "{} (`{}`): {}",
            failure.key, failure.locator, failure.reason
        );
    }
    out
}

/// Resolves an [`IconSet`] into [`IconImages`].
#[derive(Debug, Clone)]
pub struct IconLoader<F> {
    fetcher: F,
}

impl<F: ImageFetcher> IconLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches and decodes every icon concurrently.
    ///
    /// Completes only once every fetch has finished. A single failure fails
    /// the whole set; the error reports every failed key, not only the first.
    /// There is no timeout: a fetch that never completes stalls the call.
    pub async fn load_all(&self, icon_set: &IconSet) -> Result<IconImages, AssetError> {
        info!(icons_count = IconKey::ALL.len(); "Loading icons");

        let outcomes = join_all(
            icon_set
                .iter()
                .map(|(key, locator)| self.load_one(key, locator)),
        )
        .await;

        let mut partial = PartialIconImages::default();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok((key, image)) => partial.insert(key, image),
                Err(failure) => failures.push(failure),
            }
        }

        if !failures.is_empty() {
            return Err(AssetError { failures });
        }

        partial.finish().map_err(|missing| AssetError {
            failures: missing
                .into_iter()
                .map(|key| IconFailure {
                    key,
                    locator: icon_set.locator(key).to_string(),
                    reason: IconFailureReason::Unresolved,
                })
                .collect(),
        })
    }

    async fn load_one(
        &self,
        key: IconKey,
        locator: &str,
    ) -> Result<(IconKey, IconImage), IconFailure> {
        debug!(key:% = key, locator; "Fetching icon");

        let fail = |reason: IconFailureReason| {
            error!(key:% = key, locator, reason:% = reason; "Icon failed to load");
            IconFailure {
                key,
                locator: locator.to_string(),
                reason,
            }
        };

        let data = self
            .fetcher
            .fetch(locator)
            .await
            .map_err(|err| fail(IconFailureReason::Fetch(err)))?;
        let image = IconImage::decode(data).map_err(|err| fail(IconFailureReason::Decode(err)))?;

        debug!(key:% = key, format:% = image.format(); "Icon loaded");
        Ok((key, image))
    }
}
