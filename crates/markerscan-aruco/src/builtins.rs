//! Embedded built-in dictionaries.
//!
//! The source of truth lives in `markerscan-aruco/data/*_CODES.json`; codes
//! are packed row-major with black = 1.

#![allow(clippy::unreadable_literal)]

use crate::Dictionary;

include!(concat!(env!("OUT_DIR"), "/builtins.rs"));
