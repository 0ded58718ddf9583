use super::types::{Centroid, ProfilePoint, Spectrum};

/// Builder for constructing Spectrum objects fluently
#[derive(Debug, Clone)]
pub struct SpectrumBuilder {
    spectrum: Spectrum,
}

impl SpectrumBuilder {
    /// Create a new spectrum builder with required IDs
    pub fn new(spectrum_id: i64, scan_number: i64) -> Self {
        let mut spectrum = Spectrum::default();
        spectrum.header.spectrum_id = spectrum_id;
        spectrum.header.scan_number = scan_number;
        Self { spectrum }
    }

    /// Set the MS level (1 for MS1, 2 for MS/MS, etc.)
    pub fn ms_level(mut self, level: i16) -> Self {
        self.spectrum.scan_event.ms_level = level;
        self
    }

    /// Set the retention time in seconds
    pub fn retention_time(mut self, rt: f32) -> Self {
        self.spectrum.header.retention_time = rt;
        self
    }

    /// Set the polarity (1 for positive, -1 for negative)
    pub fn polarity(mut self, polarity: i8) -> Self {
        self.spectrum.scan_event.polarity = polarity;
        self
    }

    /// Set the recorded scan range
    pub fn scan_range(mut self, low: f64, high: f64) -> Self {
        self.spectrum.header.low_position = low;
        self.spectrum.header.high_position = high;
        self
    }

    /// Set precursor information for MS2+ spectra
    pub fn precursor(mut self, mz: f64, charge: Option<i16>, intensity: Option<f64>) -> Self {
        self.spectrum.precursor.mz = Some(mz);
        self.spectrum.precursor.charge = charge;
        self.spectrum.precursor.intensity = intensity;
        self
    }

    /// Set the isolation window center and full width
    pub fn isolation(mut self, mass: f64, width: f64) -> Self {
        self.spectrum.scan_event.isolation_mass = Some(mass);
        self.spectrum.scan_event.isolation_width = Some(width);
        self
    }

    /// Set all centroids at once
    pub fn centroids(mut self, centroids: Vec<Centroid>) -> Self {
        self.spectrum.centroids = centroids;
        self
    }

    /// Add a single centroid
    pub fn add_centroid(mut self, position: f64, intensity: f64) -> Self {
        self.spectrum
            .centroids
            .push(Centroid::new(position, intensity));
        self
    }

    /// Set all profile points at once
    pub fn profile(mut self, profile: Vec<ProfilePoint>) -> Self {
        self.spectrum.profile = profile;
        self
    }

    /// Add a single profile point
    pub fn add_profile_point(mut self, position: f64, intensity: f64) -> Self {
        self.spectrum
            .profile
            .push(ProfilePoint::new(position, intensity));
        self
    }

    /// Build the spectrum, computing statistics automatically
    pub fn build(mut self) -> Spectrum {
        self.spectrum.compute_statistics();
        self.spectrum
    }
}
