//! Frame sources feeding the region counter.

use std::convert::Infallible;

use ndarray::Array3;

/// An ordered, finite, non-restartable stream of frames.
///
/// Frames are (height, width, channel) pixel arrays.
pub trait FrameSource {
    /// Error type for frame acquisition failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Next frame, or `None` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<Array3<u8>>, Self::Error>;

    /// Total number of frames, when known. Only used for progress reporting.
    fn frame_count(&self) -> Option<u64> {
        None
    }
}

/// Adapts any iterator of frames into a `FrameSource`.
#[derive(Debug, Clone)]
pub struct FrameIter<I> {
    frames: I,
    frame_count: Option<u64>,
}

impl<I: Iterator<Item = Array3<u8>>> FrameIter<I> {
    pub fn new<T>(frames: T) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        let frames = frames.into_iter();
        let frame_count = match frames.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(lower as u64),
            _ => None,
        };
        Self {
            frames,
            frame_count,
        }
    }

    /// Override the frame count reported for progress.
    pub fn with_frame_count(mut self, frame_count: u64) -> Self {
        self.frame_count = Some(frame_count);
        self
    }
}

impl<I: Iterator<Item = Array3<u8>>> FrameSource for FrameIter<I> {
    type Error = Infallible;

    fn next_frame(&mut self) -> Result<Option<Array3<u8>>, Self::Error> {
        Ok(self.frames.next())
    }

    fn frame_count(&self) -> Option<u64> {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_iter_count_from_exact_iterator() {
        let frames = vec![Array3::<u8>::zeros((2, 2, 3)); 4];
        let mut source = FrameIter::new(frames);
        assert_eq!(source.frame_count(), Some(4));

        let mut seen = 0;
        while let Ok(Some(_)) = source.next_frame() {
            seen += 1;
        }
        assert_eq!(seen, 4);
    }

    #[test]
    fn test_frame_iter_unknown_count() {
        let frames = (0..3)
            .map(|_| Array3::<u8>::zeros((1, 1, 1)))
            .filter(|_| true);
        let source = FrameIter::new(frames);
        assert_eq!(source.frame_count(), None);
        assert_eq!(source.with_frame_count(3).frame_count(), Some(3));
    }
}
