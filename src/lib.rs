/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

//! Translators between vendor smart-home APIs and a small set of common
//! device schemas.
//!
//! Each vendor has a hub translator that discovers the devices of an
//! account and hands out one device translator per device. Device
//! translators read and write through the vendor's API but answer with
//! normalized `schema::Platform` documents, so callers see a lamp as a
//! lamp whichever vendor made it.

pub mod adapters;
pub mod color;
pub mod config;
pub mod error;
pub mod http;
pub mod hub;
pub mod schema;
pub mod translator;
pub mod verify;

pub use crate::error::{ Error, Result };
