// src/animation/tracks.rs
use crate::animation::values::Interpolatable;
use crate::errors::{HayloftError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationMode {
    #[default]
    Linear,
    Step,
}

/// A time-sorted list of keys for one animated property.
///
/// A track always holds at least one key. Key times are non-decreasing.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    times: Vec<f32>,
    values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    /// Builds a track from parallel time/value arrays.
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Result<Self> {
        if times.len() != values.len() {
            return Err(HayloftError::TrackLengthMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        if times.is_empty() {
            return Err(HayloftError::EmptyTrack);
        }
        if let Some(index) = times.windows(2).position(|w| w[1] < w[0]) {
            return Err(HayloftError::UnsortedKeys {
                index: index + 1,
                time: times[index + 1],
            });
        }

        Ok(Self {
            times,
            values,
            interpolation,
        })
    }

    /// Like [`new`](Self::new), but an empty track degrades to a single
    /// `fallback` key instead of failing.
    pub fn new_or(
        times: Vec<f32>,
        values: Vec<T>,
        interpolation: InterpolationMode,
        fallback: T,
    ) -> Result<Self> {
        if times.is_empty() && values.is_empty() {
            return Ok(Self::constant(fallback));
        }
        Self::new(times, values, interpolation)
    }

    /// Single-key track holding `value` forever.
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self {
            times: vec![0.0],
            values: vec![value],
            interpolation: InterpolationMode::Linear,
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always `false`; tracks keep at least one key.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Time of the last key.
    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Index of the left key for `time`.
    ///
    /// Scans forward from the first key while the next key's time is
    /// `<= time`, so the cost is linear in the track length. Times before
    /// the first key resolve to 0, times past the last key to `len - 1`.
    #[must_use]
    pub fn seek_index(&self, time: f32) -> usize {
        let mut index = 0;
        while index + 1 < self.times.len() && self.times[index + 1] <= time {
            index += 1;
        }
        index
    }

    /// Interpolates between key `index` and its successor at `time`.
    #[must_use]
    pub fn sample_at(&self, index: usize, time: f32) -> T {
        let len = self.times.len();
        let index = index.min(len - 1);

        // No next key: hold the value
        if index + 1 >= len {
            return self.values[index];
        }

        match self.interpolation {
            InterpolationMode::Step => self.values[index],
            InterpolationMode::Linear => {
                let t0 = self.times[index];
                let dt = self.times[index + 1] - t0;

                // Zero-length spans fall back to the left key
                let t = if dt > 1e-6 { (time - t0) / dt } else { 0.0 };
                let t = t.clamp(0.0, 1.0);

                T::interpolate_linear(self.values[index], self.values[index + 1], t)
            }
        }
    }

    /// Stateless sample: `seek_index` followed by `sample_at`.
    #[must_use]
    pub fn sample(&self, time: f32) -> T {
        self.sample_at(self.seek_index(time), time)
    }
}
