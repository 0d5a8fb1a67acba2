//! Streaming aggregate of real-valued samples.

use busprobe_types::IntervalSummary;

/// Running average, standard deviation, minimum and maximum over a stream
/// of samples, in constant memory.
///
/// Mean and variance are maintained with Welford's online algorithm
/// (<https://en.wikipedia.org/wiki/Algorithms_for_calculating_variance#Welford%27s_online_algorithm>).
///
/// With no samples, [`avg`](Self::avg) and [`std_dev`](Self::std_dev) return
/// NaN and [`min`](Self::min) / [`max`](Self::max) return `None`. Check
/// [`count`](Self::count) first if that matters. To reset, build a new value.
///
/// # Example
///
/// ```rust
/// use busprobe_stats::Statistics;
///
/// let mut stats = Statistics::new();
/// for sample in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     stats.update(sample);
/// }
///
/// assert!((stats.avg() - 5.0).abs() < 1e-12);
/// assert!((stats.std_dev() - 2.0).abs() < 1e-12);
/// assert_eq!(stats.min(), Some(2.0));
/// assert_eq!(stats.max(), Some(9.0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    count: u64,
    average: f64,
    /// Sum of squared distances from the mean.
    sum_square_mean_dist: f64,
    extrema: Option<Extrema>,
}

#[derive(Debug, Clone, Copy)]
struct Extrema {
    min: f64,
    max: f64,
}

impl Statistics {
    /// Create an aggregate with no samples.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sample.
    pub fn update(&mut self, sample: f64) {
        self.count += 1;

        let previous_avg = self.average;
        self.average = previous_avg + (sample - previous_avg) / self.count as f64;

        self.sum_square_mean_dist += (sample - previous_avg) * (sample - self.average);

        self.extrema = Some(match self.extrema {
            Some(e) => Extrema {
                min: e.min.min(sample),
                max: e.max.max(sample),
            },
            None => Extrema {
                min: sample,
                max: sample,
            },
        });
    }

    /// Number of samples seen.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of all samples, or NaN with no samples.
    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        self.average
    }

    /// Population standard deviation, or NaN with no samples.
    pub fn std_dev(&self) -> f64 {
        (self.sum_square_mean_dist / self.count as f64).sqrt()
    }

    /// Smallest sample.
    pub fn min(&self) -> Option<f64> {
        self.extrema.map(|e| e.min)
    }

    /// Largest sample.
    pub fn max(&self) -> Option<f64> {
        self.extrema.map(|e| e.max)
    }

    /// Summarize the samples as millisecond intervals.
    ///
    /// The rate is `1 / (avg_ms * 1e-3)` Hz.
    pub fn summary(&self) -> IntervalSummary {
        IntervalSummary {
            avg_hz: 1.0 / (self.avg() * 1e-3),
            std_deviation: self.std_dev(),
            min: self.min(),
            max: self.max(),
        }
    }
}
