//! Square binary fiducial markers: dictionaries, localization and decoding.
//!
//! This crate covers:
//! - embedded built-in dictionaries (compiled into the binary),
//! - matching observed codes against a dictionary under all four rotations,
//! - finding convex quadrilateral candidates in a grayscale image,
//! - decoding candidates into marker ids with orientation-corrected corners.
//!
//! It works on [`markerscan_core::GrayImageView`] and never touches image
//! codecs; see the `markerscan` crate for the byte-level entry points.
//!
//! ```
//! use markerscan_aruco::{builtins, Matcher};
//!
//! let dict = builtins::DICT_4X4_50;
//! let matcher = Matcher::exact(dict);
//! let m = matcher.match_code(dict.codes[7]).expect("known code");
//! assert_eq!((m.id, m.rotation), (7, 0));
//! ```

pub mod builtins;
mod contours;
mod decode;
mod dictionary;
mod localize;
mod matcher;
mod polygon;
mod scan;
mod threshold;

pub use contours::{find_contours, Contour};
pub use decode::{decode_candidate, CandidateRejection, DecodedMarker, DecoderParams};
pub use dictionary::{pack_bits, unpack_bits, Dictionary};
pub use localize::{locate_candidates, LocalizerParams, MarkerCandidate};
pub use matcher::{rotate_code_u64, Match, Matcher};
pub use scan::{scan_image, ScanOutcome};
