/// Errors reported by fallible layout queries.
///
/// Geometry anomalies (zero-sized viewports or items) are not errors: they resolve to an
/// empty window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("index {index} is out of range for a layout of {len} items")]
    IndexOutOfRange { index: usize, len: usize },
}
