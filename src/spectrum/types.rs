use serde::{Deserialize, Serialize};

/// A (mass position, intensity) data point.
///
/// Implemented by both sample kinds so window filtering can treat centroids and
/// profile points alike.
pub trait MassSample: Copy {
    /// Mass-to-charge position of the sample
    fn position(&self) -> f64;
    /// Signal intensity of the sample
    fn intensity(&self) -> f64;
}

/// A discrete, centroided peak
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    /// Mass-to-charge ratio (MS:1000040)
    pub position: f64,
    /// Peak intensity (MS:1000042)
    pub intensity: f64,
}

impl Centroid {
    /// Create a new centroid
    pub fn new(position: f64, intensity: f64) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

impl MassSample for Centroid {
    fn position(&self) -> f64 {
        self.position
    }

    fn intensity(&self) -> f64 {
        self.intensity
    }
}

/// A raw sample of the continuous profile trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    /// Mass-to-charge ratio
    pub position: f64,
    /// Signal intensity
    pub intensity: f64,
}

impl ProfilePoint {
    /// Create a new profile point
    pub fn new(position: f64, intensity: f64) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

impl MassSample for ProfilePoint {
    fn position(&self) -> f64 {
        self.position
    }

    fn intensity(&self) -> f64 {
        self.intensity
    }
}

/// Spectrum header.
///
/// `low_position`/`high_position` hold the recorded scan range of a source
/// spectrum. The remaining numeric fields are derived from the centroids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumHeader {
    /// Unique spectrum identifier
    pub spectrum_id: i64,
    /// Native scan number
    pub scan_number: i64,
    /// Retention time in seconds
    pub retention_time: f32,
    /// Lower end of the scan range
    pub low_position: f64,
    /// Upper end of the scan range
    pub high_position: f64,
    /// Position of the most intense centroid
    pub base_peak_position: f64,
    /// Intensity of the most intense centroid
    pub base_peak_intensity: f64,
    /// Sum of all centroid intensities
    pub total_intensity: f64,
}

/// Acquisition settings of the scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanEvent {
    /// MS level (1 for MS1, 2 for MS/MS, etc.)
    pub ms_level: i16,
    /// Polarity: 1 (positive) or -1 (negative)
    pub polarity: i8,
    /// Isolation window center
    pub isolation_mass: Option<f64>,
    /// Full isolation window width
    pub isolation_width: Option<f64>,
}

impl Default for ScanEvent {
    fn default() -> Self {
        Self {
            ms_level: 1,
            polarity: 1,
            isolation_mass: None,
            isolation_width: None,
        }
    }
}

/// Precursor ion information. Passed through untouched by the merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Precursor {
    /// Precursor m/z
    pub mz: Option<f64>,
    /// Precursor charge state
    pub charge: Option<i16>,
    /// Precursor intensity
    pub intensity: Option<f64>,
}

/// A single spectrum with its centroid and profile data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Header with scan range and summary statistics
    #[serde(default)]
    pub header: SpectrumHeader,
    /// Scan event settings
    #[serde(default)]
    pub scan_event: ScanEvent,
    /// Precursor record
    #[serde(default)]
    pub precursor: Precursor,
    /// Centroided peaks, in acquisition order
    #[serde(default)]
    pub centroids: Vec<Centroid>,
    /// Profile points, in acquisition order
    #[serde(default)]
    pub profile: Vec<ProfilePoint>,
}

impl Spectrum {
    /// Most intense centroid; the first one wins on ties.
    ///
    /// Returns `None` for a spectrum without centroids.
    pub fn most_intense_centroid(&self) -> Option<&Centroid> {
        let mut peaks = self.centroids.iter();
        let mut best = peaks.next()?;
        for peak in peaks {
            if peak.intensity > best.intensity {
                best = peak;
            }
        }
        Some(best)
    }

    /// Sum of all centroid intensities
    pub fn total_centroid_intensity(&self) -> f64 {
        self.centroids.iter().map(MassSample::intensity).sum()
    }

    /// Calculate and set the base peak and total intensity from the centroids
    pub fn compute_statistics(&mut self) {
        let Some(base_peak) = self.most_intense_centroid().copied() else {
            return;
        };

        self.header.base_peak_position = base_peak.position;
        self.header.base_peak_intensity = base_peak.intensity;
        self.header.total_intensity = self.total_centroid_intensity();
    }

    /// Recorded scan range as `(low, high)`
    pub fn scan_range(&self) -> (f64, f64) {
        (self.header.low_position, self.header.high_position)
    }

    /// Number of centroids
    pub fn centroid_count(&self) -> usize {
        self.centroids.len()
    }

    /// Number of profile points
    pub fn profile_count(&self) -> usize {
        self.profile.len()
    }

    /// Sanity check on the header: finite, non-negative summary values and an
    /// ordered scan range.
    pub fn is_valid(&self) -> bool {
        let h = &self.header;
        let finite = [
            h.low_position,
            h.high_position,
            h.base_peak_position,
            h.base_peak_intensity,
            h.total_intensity,
        ]
        .iter()
        .all(|v| v.is_finite());

        finite
            && h.low_position >= 0.0
            && h.low_position <= h.high_position
            && h.base_peak_intensity >= 0.0
            && h.total_intensity >= 0.0
    }
}
