use crate::annotate::annotate;
use crate::image_io::{decode_image, to_gray};
use crate::score::marker_confidence;
use crate::{DetectError, DetectedMarker, DetectionResult, DetectorParams};
use image::RgbImage;
use log::{debug, info};
use markerscan_aruco::{builtins, scan_image, Matcher};
use std::sync::LazyLock;

#[cfg(feature = "tracing")]
use tracing::instrument;

static SHARED: LazyLock<MarkerDetector> = LazyLock::new(MarkerDetector::default);

/// Detector for the built-in `DICT_4X4_50` dictionary.
///
/// Immutable after construction; a single instance can serve any number of
/// threads.
#[derive(Clone, Debug)]
pub struct MarkerDetector {
    params: DetectorParams,
    matcher: Matcher,
}

impl Default for MarkerDetector {
    fn default() -> Self {
        Self::new(DetectorParams::default())
    }
}

impl MarkerDetector {
    pub fn new(params: DetectorParams) -> Self {
        let matcher = Matcher::new(builtins::DICT_4X4_50, params.max_hamming);
        let dict = matcher.dictionary();
        debug!(
            "marker detector ready: {} ({} ids, max_hamming={})",
            dict.name,
            dict.len(),
            matcher.max_hamming()
        );
        Self { params, matcher }
    }

    /// Process-wide detector with default parameters, built on first use.
    pub fn shared() -> &'static MarkerDetector {
        &SHARED
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Decode `bytes` and detect markers.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, bytes), fields(bytes = bytes.len()))
    )]
    pub fn detect(&self, bytes: &[u8]) -> Result<DetectionResult, DetectError> {
        let rgb = decode_image(bytes)?;
        self.detect_image(&rgb)
    }

    /// Detect markers in an already decoded raster.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, image),
            fields(width = image.width(), height = image.height())
        )
    )]
    pub fn detect_image(&self, image: &RgbImage) -> Result<DetectionResult, DetectError> {
        let gray = to_gray(image)?;
        let outcome = scan_image(
            &gray.view(),
            &self.params.localizer,
            &self.params.decoder,
            &self.matcher,
        );

        let markers: Vec<DetectedMarker> = outcome
            .markers
            .iter()
            .map(|m| DetectedMarker {
                id: m.id,
                corners: m.corners,
                confidence: marker_confidence(&m.corners),
            })
            .collect();

        let result = DetectionResult {
            markers,
            image_width: image.width(),
            image_height: image.height(),
            rejected_count: outcome.rejected,
        };
        if result.markers.is_empty() {
            info!("no markers detected ({} rejected)", result.rejected_count);
        } else {
            info!(
                "detected {} markers {:?} ({} rejected)",
                result.total_markers(),
                result.ids(),
                result.rejected_count
            );
        }
        Ok(result)
    }

    /// Decode `bytes`, detect markers and draw them on a copy of the image.
    pub fn detect_and_annotate(
        &self,
        bytes: &[u8],
    ) -> Result<(DetectionResult, RgbImage), DetectError> {
        let rgb = decode_image(bytes)?;
        let result = self.detect_image(&rgb)?;
        let annotated = annotate(&rgb, &result);
        Ok((result, annotated))
    }
}

/// Detect markers with the shared default detector.
pub fn detect_markers(bytes: &[u8]) -> Result<DetectionResult, DetectError> {
    MarkerDetector::shared().detect(bytes)
}

/// Detect markers with the shared default detector and annotate the image.
pub fn detect_markers_with_annotation(
    bytes: &[u8],
) -> Result<(DetectionResult, RgbImage), DetectError> {
    MarkerDetector::shared().detect_and_annotate(bytes)
}
