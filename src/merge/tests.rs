use super::*;
use crate::segment::{SegmentBound, SegmentError};
use crate::spectrum::{Spectrum, SpectrumBuilder};

fn two_segments() -> Vec<SegmentBound> {
    vec![SegmentBound::new(0.0, 100.0), SegmentBound::new(100.0, 200.0)]
}

fn three_segments() -> Vec<SegmentBound> {
    vec![
        SegmentBound::new(100.0, 400.0),
        SegmentBound::new(400.0, 700.0),
        SegmentBound::new(700.0, 1000.0),
    ]
}

/// Segmented run where spectrum `i` covers segment `(i + phase) % n`
fn segmented_run(segments: &[SegmentBound], phase: usize, count: usize) -> Vec<Spectrum> {
    (0..count)
        .map(|i| {
            let bound = segments[(i + phase) % segments.len()];
            let width = bound.width();
            SpectrumBuilder::new(i as i64, i as i64 + 1)
                .retention_time(i as f32 * 0.2)
                .scan_range(bound.lower, bound.upper)
                .add_centroid(bound.lower + width * 0.25, 1000.0 + i as f64)
                .add_centroid(bound.lower + width * 0.75, 2000.0 + i as f64)
                .add_profile_point(bound.lower + width * 0.5, 10.0)
                .build()
        })
        .collect()
}

#[test]
fn test_two_segment_merge() {
    let merger = SegmentMerger::new(MergeConfig::fixed_order(two_segments())).unwrap();
    let spectra: Vec<Spectrum> = (0..4)
        .map(|i| {
            SpectrumBuilder::new(i, i + 1)
                .add_centroid(50.0, 10.0)
                .add_centroid(150.0, 20.0)
                .build()
        })
        .collect();

    let mut diagnostics = CollectingDiagnostics::new();
    let output = merger.merge(&spectra, &mut diagnostics);

    assert_eq!(output.spectra.len(), 2);
    for composite in &output.spectra {
        let positions: Vec<f64> = composite.centroids.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![50.0, 150.0]);
    }

    let stats = &output.report.statistics;
    assert_eq!(stats.spectra_consumed, 4);
    assert_eq!(stats.composites_emitted, 2);
    assert_eq!(stats.centroids_kept, 4);
    assert_eq!(stats.centroids_discarded, 4);
    assert_eq!(output.report.retention_fraction, Some(0.5));
    assert_eq!(output.report.phase_offset, Some(0));
}

#[test]
fn test_composite_header() {
    let merger = SegmentMerger::new(MergeConfig::new(three_segments())).unwrap();
    let spectra = segmented_run(&three_segments(), 0, 3);

    let output = merger.merge(&spectra, CollectingDiagnostics::new());
    let composite = &output.spectra[0];

    assert_eq!(composite.header.spectrum_id, 0);
    assert_eq!(composite.header.retention_time, 0.0);
    assert_eq!(composite.header.low_position, 100.0);
    assert_eq!(composite.header.high_position, 1000.0);
    assert_eq!(composite.header.base_peak_position, 925.0);
    assert_eq!(composite.header.base_peak_intensity, 2002.0);
    assert_eq!(composite.header.total_intensity, 9006.0);
    assert_eq!(composite.scan_event.isolation_mass, Some(550.0));
    assert_eq!(composite.scan_event.isolation_width, Some(900.0));
    assert_eq!(composite.centroid_count(), 6);
    assert_eq!(composite.profile_count(), 3);
    assert_eq!(output.report.statistics.profile_points_in_window, 3);
}

#[test]
fn test_precursor_comes_from_first_spectrum() {
    let merger = SegmentMerger::new(MergeConfig::new(two_segments())).unwrap();
    let spectra = vec![
        SpectrumBuilder::new(0, 1)
            .scan_range(0.0, 100.0)
            .precursor(512.3, Some(2), None)
            .add_centroid(20.0, 1.0)
            .build(),
        SpectrumBuilder::new(1, 2)
            .scan_range(100.0, 200.0)
            .precursor(999.9, Some(3), None)
            .add_centroid(120.0, 1.0)
            .build(),
    ];

    let output = merger.merge(&spectra, CollectingDiagnostics::new());
    assert_eq!(output.spectra[0].precursor.mz, Some(512.3));
    assert_eq!(output.spectra[0].precursor.charge, Some(2));
}

#[test]
fn test_auto_alignment_rotates_segments() {
    let bounds = three_segments();
    let spectra = segmented_run(&bounds, 2, 9);

    let aligned = SegmentMerger::new(MergeConfig::auto_aligned(bounds.clone())).unwrap();
    let output = aligned.merge(&spectra, CollectingDiagnostics::new());

    assert_eq!(output.report.phase_offset, Some(2));
    assert_eq!(output.spectra.len(), 3);
    assert_eq!(output.report.statistics.centroids_discarded, 0);
    assert_eq!(output.report.retention_fraction, Some(1.0));
    assert!(!output.report.low_retention);

    // Without alignment every spectrum is filtered against the wrong window
    let fixed = SegmentMerger::new(MergeConfig::fixed_order(bounds)).unwrap();
    let mut diagnostics = CollectingDiagnostics::new();
    let output = fixed.merge(&spectra, &mut diagnostics);

    assert_eq!(output.report.phase_offset, Some(0));
    assert_eq!(output.report.statistics.centroids_kept, 0);
    assert!(output.spectra.is_empty());
    assert_eq!(output.report.statistics.degenerate_cycles, vec![0, 1, 2]);
    assert!(output.report.low_retention);
}

#[test]
fn test_trailing_partial_cycle_dropped() {
    let bounds = three_segments();
    let spectra = segmented_run(&bounds, 0, 8);
    let merger = SegmentMerger::new(MergeConfig::new(bounds)).unwrap();

    let output = merger.merge(&spectra, CollectingDiagnostics::new());

    assert_eq!(output.spectra.len(), 8 / 3);
    assert_eq!(output.report.statistics.trailing_spectra_dropped, 2);
    assert!(!output.report.statistics.trailing_cycle_flushed);
    assert_eq!(output.report.statistics.centroids_kept, 12);
}

#[test]
fn test_trailing_partial_cycle_flushed() {
    let bounds = three_segments();
    let spectra = segmented_run(&bounds, 0, 8);
    let merger = SegmentMerger::new(
        MergeConfig::new(bounds).with_flush_trailing_partial_cycle(true),
    )
    .unwrap();

    let output = merger.merge(&spectra, CollectingDiagnostics::new());

    assert_eq!(output.spectra.len(), 3);
    assert!(output.report.statistics.trailing_cycle_flushed);
    assert_eq!(output.report.statistics.trailing_spectra_dropped, 0);
    assert_eq!(output.spectra[2].centroid_count(), 4);
    assert_eq!(output.report.statistics.centroids_kept, 16);
}

#[test]
fn test_complete_last_cycle_is_emitted() {
    let bounds = three_segments();
    let spectra = segmented_run(&bounds, 0, 6);
    let merger = SegmentMerger::new(MergeConfig::new(bounds)).unwrap();

    let output = merger.merge(&spectra, CollectingDiagnostics::new());
    assert_eq!(output.spectra.len(), 2);
    assert_eq!(output.spectra[1].header.spectrum_id, 3);
    assert_eq!(output.report.statistics.trailing_spectra_dropped, 0);
}

#[test]
fn test_empty_input() {
    let merger = SegmentMerger::new(MergeConfig::new(two_segments())).unwrap();
    let mut diagnostics = CollectingDiagnostics::new();
    let output = merger.merge(&Vec::<Spectrum>::new(), &mut diagnostics);

    assert!(output.spectra.is_empty());
    assert_eq!(output.report.statistics, RunStatistics::default());
    assert_eq!(output.report.phase_offset, None);
    assert_eq!(output.report.retention_fraction, None);
    assert!(!output.report.low_retention);
    assert_eq!(diagnostics.warning_count(), 0);
}

#[test]
fn test_degenerate_cycle_is_reported() {
    let merger = SegmentMerger::new(MergeConfig::fixed_order(two_segments())).unwrap();
    let spectra = vec![
        SpectrumBuilder::new(0, 1).add_centroid(50.0, 1.0).build(),
        SpectrumBuilder::new(1, 2).add_centroid(150.0, 1.0).build(),
        // Second cycle: every centroid sits in the other segment's window
        SpectrumBuilder::new(2, 3)
            .add_centroid(150.0, 1.0)
            .add_profile_point(50.0, 1.0)
            .build(),
        SpectrumBuilder::new(3, 4).add_centroid(50.0, 1.0).build(),
        SpectrumBuilder::new(4, 5).add_centroid(50.0, 1.0).build(),
        SpectrumBuilder::new(5, 6).add_centroid(150.0, 1.0).build(),
    ];

    let mut diagnostics = CollectingDiagnostics::new();
    let output = merger.merge(&spectra, &mut diagnostics);

    assert_eq!(output.spectra.len(), 2);
    assert_eq!(output.spectra[1].header.spectrum_id, 4);

    let stats = &output.report.statistics;
    assert_eq!(stats.degenerate_cycles, vec![1]);
    assert_eq!(stats.composites_emitted, 2);
    assert_eq!(stats.centroids_kept, 4);
    assert_eq!(stats.centroids_discarded, 2);
    assert!(output.report.has_warnings());
    assert!(diagnostics.has_warning_containing("Cycle 1 kept no centroids"));
}

#[test]
fn test_low_retention_warns_once() {
    // Every spectrum keeps 9 of 10 centroids: 90% retention, below 98%, but no
    // cycle keeps fewer than it discards
    let bounds = two_segments();
    let spectra: Vec<Spectrum> = (0..8)
        .map(|i| {
            let bound = bounds[i % 2];
            let mut builder = SpectrumBuilder::new(i as i64, i as i64 + 1)
                .scan_range(bound.lower, bound.upper);
            for j in 0..9 {
                builder = builder.add_centroid(bound.lower + 5.0 + j as f64, 100.0);
            }
            builder.add_centroid(bound.upper + 500.0, 1.0).build()
        })
        .collect();

    let merger = SegmentMerger::new(MergeConfig::auto_aligned(bounds)).unwrap();
    let mut diagnostics = CollectingDiagnostics::new();
    let output = merger.merge(&spectra, &mut diagnostics);

    assert_eq!(output.report.retention_fraction, Some(0.9));
    assert!(output.report.low_retention);
    assert_eq!(diagnostics.warning_count(), 1);
    assert!(diagnostics.has_warning_containing("segment bounds"));
}

#[test]
fn test_retention_above_threshold_is_quiet() {
    let bounds = two_segments();
    let spectra = segmented_run(&bounds, 0, 4);
    let merger = SegmentMerger::new(
        MergeConfig::new(bounds).with_retention_warning_threshold(0.5),
    )
    .unwrap();

    let mut diagnostics = CollectingDiagnostics::new();
    let output = merger.merge(&spectra, &mut diagnostics);
    assert!(!output.report.low_retention);
    assert_eq!(diagnostics.warning_count(), 0);
}

#[test]
fn test_cycle_keeping_less_than_discarded_warns() {
    let merger = SegmentMerger::new(MergeConfig::fixed_order(two_segments())).unwrap();
    let spectra = vec![
        SpectrumBuilder::new(0, 1)
            .add_centroid(50.0, 1.0)
            .add_centroid(150.0, 1.0)
            .add_centroid(160.0, 1.0)
            .build(),
        SpectrumBuilder::new(1, 2).add_centroid(20.0, 1.0).build(),
    ];

    let mut diagnostics = CollectingDiagnostics::new();
    merger.merge(&spectra, &mut diagnostics);
    assert!(diagnostics.has_warning_containing("Cycle 0: number of centroids kept (1)"));
}

#[test]
fn test_identical_runs_give_identical_output() {
    let bounds = three_segments();
    let spectra = segmented_run(&bounds, 1, 31);
    let merger = SegmentMerger::new(MergeConfig::new(bounds)).unwrap();

    let first = merger.merge(&spectra, CollectingDiagnostics::new());
    let second = merger.merge(&spectra, CollectingDiagnostics::new());

    assert_eq!(first.spectra, second.spectra);
    assert_eq!(
        serde_json::to_string(&first.spectra).unwrap(),
        serde_json::to_string(&second.spectra).unwrap()
    );
    assert_eq!(first.report.statistics, second.report.statistics);
}

#[test]
fn test_source_spectra_are_untouched() {
    let bounds = two_segments();
    let spectra = segmented_run(&bounds, 0, 4);
    let snapshot = spectra.clone();

    let merger = SegmentMerger::new(MergeConfig::new(bounds)).unwrap();
    merger.merge(&spectra, CollectingDiagnostics::new());
    assert_eq!(spectra, snapshot);
}

#[test]
fn test_segment_order_verification() {
    let bounds = three_segments();
    let mut spectra = segmented_run(&bounds, 0, 9);
    // Third cycle starts on the wrong segment
    spectra.swap(6, 7);

    let merger = SegmentMerger::new(
        MergeConfig::new(bounds.clone()).with_verify_segment_order(true),
    )
    .unwrap();
    let mut diagnostics = CollectingDiagnostics::new();
    let output = merger.merge(&spectra, &mut diagnostics);

    assert_eq!(output.report.statistics.order_mismatches, 1);
    assert!(diagnostics.has_warning_containing("Cycle 2 starts with scan range"));

    let unchecked = SegmentMerger::new(MergeConfig::new(bounds)).unwrap();
    let output = unchecked.merge(&spectra, CollectingDiagnostics::new());
    assert_eq!(output.report.statistics.order_mismatches, 0);
}

#[test]
fn test_overlapping_segments_duplicate_samples() {
    let bounds = vec![SegmentBound::new(0.0, 120.0), SegmentBound::new(100.0, 200.0)];
    let spectra = vec![
        SpectrumBuilder::new(0, 1)
            .scan_range(0.0, 120.0)
            .add_centroid(110.0, 5.0)
            .build(),
        SpectrumBuilder::new(1, 2)
            .scan_range(100.0, 200.0)
            .add_centroid(110.0, 5.0)
            .build(),
    ];

    let merger = SegmentMerger::new(MergeConfig::new(bounds)).unwrap();
    let mut diagnostics = CollectingDiagnostics::new();
    let output = merger.merge(&spectra, &mut diagnostics);

    assert_eq!(output.spectra[0].centroid_count(), 2);
    assert!(diagnostics.has_warning_containing("overlap"));
}

#[test]
fn test_spot_checks() {
    let bounds = two_segments();
    let spectra = segmented_run(&bounds, 0, 16);
    let merger = SegmentMerger::new(MergeConfig::new(bounds)).unwrap();

    let mut diagnostics = CollectingDiagnostics::new();
    merger.merge(&spectra, &mut diagnostics);

    // Cycles close at positions 2, 4, ..., 14; checkpoints every 4 spectra
    let spot_checks = diagnostics
        .infos
        .iter()
        .filter(|m| m.starts_with("Spot check"))
        .count();
    assert_eq!(spot_checks, 3);
    assert!(diagnostics.infos[0].contains("Number of spectra: 16"));
}

#[test]
fn test_incremental_session_matches_batch_merge() {
    let bounds = three_segments();
    let spectra = segmented_run(&bounds, 1, 12);
    let merger = SegmentMerger::new(MergeConfig::new(bounds)).unwrap();

    let mut session = merger.session(CollectingDiagnostics::new(), None);
    let mut merged = Vec::new();
    for spectrum in &spectra {
        merged.extend(session.push(spectrum));
    }
    assert_eq!(session.position(), 12);
    assert_eq!(session.aligner().map(|a| a.offset()), Some(1));
    assert_eq!(session.statistics().composites_emitted, 3);

    let (last, report) = session.finish();
    merged.extend(last);

    let batch = merger.merge(&spectra, CollectingDiagnostics::new());
    assert_eq!(merged, batch.spectra);
    assert_eq!(report.statistics, batch.report.statistics);
}

#[test]
fn test_invalid_configuration() {
    assert!(matches!(
        SegmentMerger::new(MergeConfig::new(two_segments()).with_segment_count(3)),
        Err(MergeError::Segment(SegmentError::MissingBounds { .. }))
    ));
    assert!(matches!(
        SegmentMerger::new(MergeConfig::new(vec![SegmentBound::new(0.0, 1.0)])),
        Err(MergeError::Segment(SegmentError::TooFewSegments { .. }))
    ));
    assert!(matches!(
        SegmentMerger::new(MergeConfig::new(two_segments()).with_retention_warning_threshold(1.5)),
        Err(MergeError::InvalidThreshold(_))
    ));
    assert!(matches!(
        SegmentMerger::new(MergeConfig::default()),
        Err(MergeError::Segment(SegmentError::TooFewSegments { .. }))
    ));
}

#[test]
fn test_config_from_json_uses_every_segment() {
    let json = r#"{
        "segments": [
            {"lower": 100.0, "upper": 400.0},
            {"lower": 400.0, "upper": 700.0},
            {"lower": 700.0, "upper": 1000.0}
        ]
    }"#;

    let config: MergeConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.segment_count, None);
    assert!(config.auto_align_phase);
    assert_eq!(config.retention_warning_threshold, DEFAULT_RETENTION_WARNING_THRESHOLD);

    let merger = SegmentMerger::new(config.clone()).unwrap();
    assert_eq!(merger.segments().len(), 3);

    let restored: MergeConfig =
        serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(restored, config);

    let limited: MergeConfig = serde_json::from_str(
        r#"{"segment_count": 2, "segments": [
            {"lower": 0.0, "upper": 1.0}, {"lower": 1.0, "upper": 2.0}, {"lower": 2.0, "upper": 3.0}
        ]}"#,
    )
    .unwrap();
    assert_eq!(SegmentMerger::new(limited).unwrap().segments().len(), 2);
}

#[test]
fn test_profile_only_cycles_count_in_window_points() {
    let merger = SegmentMerger::new(MergeConfig::fixed_order(two_segments())).unwrap();
    let spectra: Vec<Spectrum> = (0..4)
        .map(|i| {
            SpectrumBuilder::new(i, i + 1)
                .add_profile_point(50.0, 5.0)
                .add_profile_point(150.0, 5.0)
                .build()
        })
        .collect();

    let output = merger.merge(&spectra, CollectingDiagnostics::new());
    let stats = &output.report.statistics;
    assert!(output.spectra.is_empty());
    assert_eq!(stats.degenerate_cycles, vec![0, 1]);
    assert_eq!(stats.profile_points_in_window, 4);
    assert_eq!(output.report.retention_fraction, None);
}

#[test]
fn test_config_presets() {
    let fixed = MergeConfig::fixed_order(two_segments());
    assert!(!fixed.auto_align_phase);
    assert_eq!(fixed.retention_warning_threshold, 0.90);
    assert_eq!(fixed.resolved_segment_count(), 2);

    let aligned = MergeConfig::auto_aligned(three_segments());
    assert!(aligned.auto_align_phase);
    assert_eq!(aligned.retention_warning_threshold, 0.98);
    assert_eq!(aligned.resolved_segment_count(), 3);
    assert!(!aligned.flush_trailing_partial_cycle);
}

#[test]
fn test_report_display() {
    let bounds = two_segments();
    let spectra = segmented_run(&bounds, 0, 5);
    let merger = SegmentMerger::new(MergeConfig::new(bounds)).unwrap();
    let output = merger.merge(&spectra, CollectingDiagnostics::new());

    let text = output.report.to_string();
    assert!(text.contains("5 consumed, 2 composites"));
    assert!(text.contains("Trailing partial cycle dropped (1 spectra)"));
    assert!(output.report.summary_line().contains("composites: 2/5"));

    let json = serde_json::to_value(&output.report).unwrap();
    assert_eq!(json["composites_emitted"], 2);
    assert_eq!(json["phase_offset"], 0);
}
