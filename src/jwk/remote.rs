// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Fetch-and-refresh of a remote [`JwkSet`], per spec.md §2 "Remote JWKS
//! cache" and §5 "Remote JWKS cache". The core does no networking itself;
//! callers supply a [`JwkSetFetch`] capability and drive refresh.

use std::sync::RwLock;
use std::time::Duration;
use std::time::Instant;

use crate::error::Error;
use crate::error::Result;
use crate::jwk::JwkSet;

/// The injected HTTP capability a [`RemoteJwkSet`] uses to retrieve bytes
/// from its configured URL. The CLI/HTTP layer implementing this trait is
/// out of scope for this crate (spec.md §1 "thin collaborators").
pub trait JwkSetFetch {
  fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

struct Cached {
  set: JwkSet,
  last_fetch: Option<Instant>,
}

/// A key set kept fresh from a remote URL. Readers never block on network:
/// [`RemoteJwkSet::current`] always returns the last successfully fetched
/// set, and [`RemoteJwkSet::refresh_if_stale`] is the cooperative tick a
/// caller-owned worker drives periodically.
pub struct RemoteJwkSet<F: JwkSetFetch> {
  url: String,
  min_refresh_interval: Duration,
  fetcher: F,
  cache: RwLock<Cached>,
}

impl<F: JwkSetFetch> RemoteJwkSet<F> {
  pub fn new(url: impl Into<String>, min_refresh_interval: Duration, fetcher: F) -> Self {
    Self {
      url: url.into(),
      min_refresh_interval,
      fetcher,
      cache: RwLock::new(Cached {
        set: JwkSet::new(),
        last_fetch: None,
      }),
    }
  }

  pub fn url(&self) -> &str {
    &self.url
  }

  /// The last successfully fetched set. Empty until the first successful
  /// refresh.
  pub fn current(&self) -> JwkSet {
    let cache = self.cache.read().expect("RemoteJwkSet lock poisoned");
    cache.set.iter().cloned().collect()
  }

  /// Fetch and swap the cached set if `min_refresh_interval` has elapsed
  /// since the last successful fetch. On failure, the previous value is
  /// retained and the error is returned for the caller to log/observe.
  pub fn refresh_if_stale(&self) -> Result<bool> {
    {
      let cache = self.cache.read().expect("RemoteJwkSet lock poisoned");
      if let Some(last_fetch) = cache.last_fetch {
        if last_fetch.elapsed() < self.min_refresh_interval {
          return Ok(false);
        }
      }
    }

    let bytes: Vec<u8> = self
      .fetcher
      .fetch(&self.url)
      .map_err(|error| Error::CapabilityError(error.to_string()))?;
    let set: JwkSet = serde_json::from_slice(&bytes)?;

    let mut cache = self.cache.write().expect("RemoteJwkSet lock poisoned");
    cache.set = set;
    cache.last_fetch = Some(Instant::now());

    Ok(true)
  }
}
