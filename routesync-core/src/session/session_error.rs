#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("segment {segment_id} has {points} geometry point(s), at least 2 are required")]
    InvalidGeometry { segment_id: String, points: usize },
    #[error("segment index {index} is out of range for a route with {len} segment(s)")]
    SegmentIndexOutOfRange { index: usize, len: usize },
    #[error("no active route session")]
    NoActiveSession,
    #[error("vehicle id is not known for this session")]
    MissingVehicle,
    #[error("no position sample is available")]
    MissingPosition,
    #[error("failed to parse event timestamp '{0}'")]
    InvalidTimestamp(String),
}
