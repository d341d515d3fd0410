//! Concurrent image prefetch.
//!
//! Every locator is fetched on the blocking pool under its own timeout; results are gathered into
//! a [`PrefetchedImages`] keyed by locator, so nothing downstream depends on completion order.

use crate::source::ImageSource;
use ahash::AHashMap;
use fitx_core::FetchError;
use image::RgbImage;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Outcome of a prefetch, served back through [`ImageSource`].
#[derive(Debug, Default)]
pub struct PrefetchedImages {
    images: AHashMap<String, Result<RgbImage, FetchError>>,
}

impl PrefetchedImages {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.images.values().filter(|r| r.is_err()).count()
    }

    pub fn insert(&mut self, locator: String, result: Result<RgbImage, FetchError>) {
        self.images.insert(locator, result);
    }
}

impl ImageSource for PrefetchedImages {
    fn fetch(&self, locator: &str) -> Result<RgbImage, FetchError> {
        match self.images.get(locator) {
            Some(result) => result.clone(),
            None => Err(FetchError::NotPrefetched(locator.to_string())),
        }
    }
}

/// Fetch all `locators` concurrently. Duplicates are fetched once.
///
/// A fetch that outlives `timeout` is recorded as [`FetchError::Timeout`]; the blocking call itself
/// is left to finish in the background.
pub async fn prefetch<I>(source: Arc<dyn ImageSource>, locators: I, timeout: Duration) -> PrefetchedImages
where
    I: IntoIterator<Item = String>,
{
    let mut tasks = JoinSet::new();
    let mut seen = ahash::AHashSet::new();

    for locator in locators {
        if !seen.insert(locator.clone()) {
            continue;
        }
        let source = source.clone();
        tasks.spawn(async move {
            let blocking = {
                let locator = locator.clone();
                tokio::task::spawn_blocking(move || source.fetch(&locator))
            };
            let result = match tokio::time::timeout(timeout, blocking).await {
                Ok(Ok(fetched)) => fetched,
                Ok(Err(join_error)) => Err(FetchError::Network {
                    locator: locator.clone(),
                    reason: join_error.to_string(),
                }),
                Err(_) => Err(FetchError::Timeout(locator.clone())),
            };
            (locator, result)
        });
    }

    let mut prefetched = PrefetchedImages::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((locator, result)) => {
                if let Err(e) = &result {
                    warn!(%locator, error = %e, "image prefetch failed");
                }
                prefetched.insert(locator, result);
            }
            Err(e) => warn!(error = %e, "image prefetch task aborted"),
        }
    }

    debug!(
        images = prefetched.len(),
        failures = prefetched.failures(),
        "prefetch complete"
    );
    prefetched
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct SlowSource {
        calls: AtomicUsize,
    }

    impl ImageSource for SlowSource {
        fn fetch(&self, locator: &str) -> Result<RgbImage, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match locator {
                "slow" => {
                    std::thread::sleep(Duration::from_millis(300));
                    Ok(RgbImage::new(1, 1))
                }
                "broken" => Err(FetchError::InvalidLocator(locator.to_string())),
                _ => Ok(RgbImage::from_pixel(4, 4, Rgb([9, 9, 9]))),
            }
        }
    }

    #[tokio::test]
    async fn test_prefetch_gathers_results_and_failures() {
        let source = Arc::new(SlowSource {
            calls: AtomicUsize::new(0),
        });
        let locators = ["a", "b", "a", "broken", "slow"].map(String::from);

        let images = prefetch(source.clone(), locators, Duration::from_millis(50)).await;

        assert_eq!(images.len(), 4);
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
        assert_eq!(images.fetch("a").unwrap().get_pixel(0, 0).0, [9, 9, 9]);
        assert!(images.fetch("b").is_ok());
        assert!(matches!(images.fetch("broken"), Err(FetchError::InvalidLocator(_))));
        assert!(matches!(images.fetch("slow"), Err(FetchError::Timeout(_))));
        assert!(matches!(images.fetch("never"), Err(FetchError::NotPrefetched(_))));
        assert_eq!(images.failures(), 2);
    }
}
