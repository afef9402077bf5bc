use std::convert::Infallible;

/// Errors produced while turning a cursor position into a world position.
///
/// Every variant is local to a single pick. Nothing is retried: the next
/// interaction starts a fresh pick.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PickError {
    /// The depth buffer format is not one the decoder understands.
    #[error("unsupported depth format: {0}")]
    UnsupportedFormat(String),
    /// `proj * view` has no inverse. Points at a broken camera upstream.
    #[error("view-projection matrix is not invertible")]
    SingularTransform,
    /// The homogeneous divisor vanished after inversion (point at infinity).
    #[error("homogeneous divisor is zero after unprojection")]
    DegenerateDivisor,
    /// The viewport has a zero width or height.
    #[error("viewport has no area")]
    EmptyViewport,
    /// The mapped readback held fewer bytes than one depth texel.
    #[error("depth readback holds {0} bytes, expected at least 4")]
    ShortReadback(usize),
}

// Lets `DepthFormat` itself be passed wherever a fallible format tag is accepted.
impl From<Infallible> for PickError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
