/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by translators. Every variant maps onto an HTTP-like
/// status code so callers can report failures uniformly across vendors.
#[derive(Debug, Error)]
pub enum Error {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("vendor responded with {status}: {message}")]
    Vendor { status: u16, message: String },

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn status(&self) -> u16 {
        match *self {
            Error::BadRequest(_) => 400,
            Error::Unauthorized(_) => 401,
            Error::NotFound(_) => 404,
            Error::NotImplemented(_) => 501,
            Error::Timeout(_) => 504,
            Error::Vendor { status, .. } => status,
            Error::Http(ref e) if e.is_timeout() => 504,
            Error::Http(ref e) => e.status().map(|s| s.as_u16()).unwrap_or(502),
            Error::Json(_) => 502,
            Error::Config(_) | Error::Io(_) => 500,
        }
    }
}
