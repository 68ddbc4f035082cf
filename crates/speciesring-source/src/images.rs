//! Species photo lookup.

use std::{cell::RefCell, collections::HashMap};

use log::{debug, warn};
use reqwest::Url;

use crate::{SourceError, transport::Transport};

pub const OBSERVATIONS_URL: &str = "https://api.inaturalist.org/v1/observations";

/// Photo size substituted into the URLs returned by iNaturalist.
const IMAGE_SIZE: &str = "medium";

/// Resolves a representative photo for a species.
pub trait ImageResolver {
    /// Returns a photo URL for `scientific_name`, or `None` when no photo can
    /// be found. Lookups never fail.
    fn image_url(&self, scientific_name: &str) -> Option<String>;
}

impl<R: ImageResolver + ?Sized> ImageResolver for &R {
    fn image_url(&self, scientific_name: &str) -> Option<String> {
        (**self).image_url(scientific_name)
    }
}

impl<R: ImageResolver + ?Sized> ImageResolver for Box<R> {
    fn image_url(&self, scientific_name: &str) -> Option<String> {
        (**self).image_url(scientific_name)
    }
}

/// Resolver for offline runs; never finds a photo.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn image_url(&self, _scientific_name: &str) -> Option<String> {
        None
    }
}

/// Looks up the most recent iNaturalist observation of a taxon.
///
/// Answers are memoised per scientific name for the lifetime of the
/// resolver, including misses.
#[derive(Debug)]
pub struct INaturalistResolver<T> {
    transport: T,
    memo: RefCell<HashMap<String, Option<String>>>,
}

impl<T: Transport> INaturalistResolver<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            memo: RefCell::new(HashMap::new()),
        }
    }

    fn lookup(&self, scientific_name: &str) -> Result<Option<String>, SourceError> {
        let url = Url::parse_with_params(
            OBSERVATIONS_URL,
            &[("taxon_name", scientific_name), ("per_page", "1")],
        )
        .map_err(|err| SourceError::InvalidUrl {
            url: OBSERVATIONS_URL.to_string(),
            reason: err.to_string(),
        })?;

        let page = self.transport.get(url.as_str())?;
        let body: serde_json::Value = serde_json::from_str(page.body())?;
        Ok(photo_url(&body))
    }
}

impl<T: Transport> ImageResolver for INaturalistResolver<T> {
    fn image_url(&self, scientific_name: &str) -> Option<String> {
        if let Some(cached) = self.memo.borrow().get(scientific_name) {
            return cached.clone();
        }

        let resolved = match self.lookup(scientific_name) {
            Ok(url) => url,
            Err(err) => {
                warn!(scientific_name, err:%; "Image lookup failed");
                None
            }
        };
        debug!(scientific_name, found = resolved.is_some(); "Resolved species image");

        self.memo
            .borrow_mut()
            .insert(scientific_name.to_string(), resolved.clone());
        resolved
    }
}

/// Extracts the first photo of the first observation, resized to medium.
fn photo_url(body: &serde_json::Value) -> Option<String> {
    let url = body.pointer("/results/0/photos/0/url")?.as_str()?;
    Some(url.replacen("square", IMAGE_SIZE, 1))
}
