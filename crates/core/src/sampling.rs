//! Uniform frame index planning.

/// Default number of frames sampled from a video.
pub const DEFAULT_FRAME_COUNT: u64 = 100;

/// The ordered set of frame indices to extract from a video.
///
/// Indices are strictly increasing and lie in `[0, total_frames - 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePlan {
    total_frames: u64,
    indices: Vec<u64>,
    exhaustive: bool,
}

impl SamplePlan {
    /// Plan `requested` frames spread evenly over `total_frames`.
    ///
    /// When the video is shorter than the request every frame is taken.
    /// Otherwise index `i` is `i * (total - 1) / (requested - 1)` truncated,
    /// so the first and last frames are always included.
    pub fn new(total_frames: u64, requested: u64) -> Self {
        if total_frames < requested {
            tracing::warn!(
                total_frames,
                requested,
                "Video has only {total_frames} frames, extracting all of them",
            );
            return Self {
                total_frames,
                indices: (0..total_frames).collect(),
                exhaustive: true,
            };
        }

        let indices = match requested {
            0 => Vec::new(),
            1 => vec![0],
            n => {
                // u128 keeps `i * span` exact for any u64 frame count.
                let span = u128::from(total_frames - 1);
                let steps = u128::from(n - 1);
                (0..n)
                    .map(|i| (u128::from(i) * span / steps) as u64)
                    .collect()
            }
        };

        Self {
            total_frames,
            exhaustive: indices.len() as u64 == total_frames,
            indices,
        }
    }

    pub fn indices(&self) -> &[u64] {
        &self.indices
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// True when the plan covers every frame of the video.
    pub fn is_exhaustive(&self) -> bool {
        self.exhaustive
    }
}
