use std::fmt;
use thiserror::Error;
use vulkanalia::vk;

/// Which kind of runtime capability a wishlist entry names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeFeature {
    Layer,
    Extension,
}

impl fmt::Display for RuntimeFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeFeature::Layer => f.write_str("layer"),
            RuntimeFeature::Extension => f.write_str("extension"),
        }
    }
}

/// Why no single queue family could serve both graphics submission and presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueFamilyShortfall {
    /// No family advertises graphics operations.
    NoGraphics,
    /// No family can present to the surface.
    NoPresent,
    /// Both roles resolve, but to different families. Concurrent sharing is not supported.
    Split { graphics: u32, present: u32 },
}

impl fmt::Display for QueueFamilyShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueFamilyShortfall::NoGraphics => {
                f.write_str("no queue family supports graphics operations")
            }
            QueueFamilyShortfall::NoPresent => {
                f.write_str("no queue family can present to the surface")
            }
            QueueFamilyShortfall::Split { graphics, present } => write!(
                f,
                "graphics resolved to family {graphics} but presentation to family {present}, \
                 and concurrent sharing is not supported"
            ),
        }
    }
}

/// Every way the negotiation between the application and the device can fail.
///
/// All of these are fatal for the session: nothing is retried, and there is no fallback tier to
/// retry with.
#[derive(Debug, Error)]
pub enum NegotiationError {
    /// A wishlisted layer or extension is not reported by the runtime.
    #[error("Required {kind} not supported: {name}")]
    UnsupportedRuntimeFeature { kind: RuntimeFeature, name: String },

    /// None of the enumerated physical devices passed every suitability check.
    #[error("Failed to find a suitable physical device ({candidates} candidate(s) checked).")]
    NoSuitableDevice { candidates: usize },

    #[error("Queue family unavailable: {0}.")]
    QueueFamilyUnavailable(QueueFamilyShortfall),

    /// The surface is in a degenerate state (empty format or present-mode list).
    #[error("Surface negotiation failed: {0}.")]
    SurfaceNegotiationFailure(&'static str),

    #[error("Vulkan call failed: {0}")]
    Vulkan(#[from] vk::ErrorCode),
}

/// A physical device was rejected by one of the suitability checks.
///
/// Only used to explain, in the logs, why a candidate was skipped.
#[derive(Debug, Error)]
#[error("Missing {0}.")]
pub(crate) struct SuitabilityError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_missing_capability() {
        let err = NegotiationError::UnsupportedRuntimeFeature {
            kind: RuntimeFeature::Layer,
            name: "VK_LAYER_KHRONOS_validation".into(),
        };
        assert_eq!(
            err.to_string(),
            "Required layer not supported: VK_LAYER_KHRONOS_validation"
        );

        let err = NegotiationError::QueueFamilyUnavailable(QueueFamilyShortfall::Split {
            graphics: 0,
            present: 1,
        });
        let message = err.to_string();
        assert!(message.contains("family 0"));
        assert!(message.contains("family 1"));
    }
}
