use reliability_harness::{
    agreement_summary, cohens_kappa, krippendorff_alpha, percent_agreement, AgreementConfig,
    CoderData, Coding, Document, UncodedPolicy, ValidationError,
};

fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// 500 characters, five 100-char segments.
fn doc_500() -> Document {
    let content: String = "abcdefghij".repeat(50);
    Document::new("doc1", content).with_name("Interview 1")
}

/// One coding per segment index; `None` leaves the segment uncoded.
fn coder(id: &str, per_segment: &[Option<&str>]) -> CoderData {
    let codings = per_segment
        .iter()
        .enumerate()
        .filter_map(|(i, code)| {
            code.map(|code| {
                Coding::new(
                    format!("{id}-{i}"),
                    "doc1",
                    code,
                    id,
                    i * 100,
                    i * 100 + 100,
                )
            })
        })
        .collect();
    CoderData::new(id, format!("Coder {id}"), codings)
}

fn scenario_coders() -> Vec<CoderData> {
    vec![
        coder("a", &[Some("c1"), Some("c1"), Some("c2"), None, Some("c2")]),
        coder("b", &[Some("c1"), Some("c2"), Some("c2"), None, Some("c2")]),
    ]
}

#[test]
fn two_coder_scenario_percent_agreement_and_disagreement() {
    let docs = vec![doc_500()];
    let coders = scenario_coders();
    let cfg = AgreementConfig::default();

    let pa = percent_agreement(&coders, &docs, &cfg).unwrap();
    assert!(approx_eq(pa.value, 0.8, 1e-12), "{}", pa.value);
    assert_eq!(pa.units, 5);
    assert_eq!(pa.pairwise.len(), 1);
    assert_eq!(pa.pairwise[0].agreements, 4);

    let kappa = cohens_kappa(&coders, &docs, &cfg).unwrap();
    assert!(approx_eq(kappa.value, 0.6875, 1e-9), "{}", kappa.value);
    assert_eq!(kappa.interpretation, "Substantial");
    assert_eq!(kappa.color_token, "lime");
    assert_eq!(kappa.disagreements.len(), 1);

    let d = &kappa.disagreements[0];
    assert_eq!(d.document_name, "Interview 1");
    assert_eq!(d.coder1, "Coder a");
    assert_eq!(d.coder1_code, "c1");
    assert_eq!(d.coder2_code, "c2");
    // Second segment covers characters 100..200.
    assert_eq!(d.segment_text, docs[0].slice_chars(100, 200));

    let ci = kappa.confidence_interval.unwrap();
    assert!(ci.lower <= kappa.value && kappa.value <= ci.upper);
}

#[test]
fn identical_coders_agree_perfectly() {
    let docs = vec![doc_500()];
    let codes = [Some("c1"), Some("c2"), Some("c3"), None, Some("c1")];
    let coders = vec![coder("a", &codes), coder("b", &codes)];
    let cfg = AgreementConfig::default();

    let summary = agreement_summary(&coders, &docs, &cfg).unwrap();
    assert_eq!(summary.segments, 5);
    assert_eq!(summary.percent_agreement.value, 1.0);
    assert_eq!(summary.cohens_kappa.value, 1.0);
    assert_eq!(summary.krippendorff_alpha.value, 1.0);
    assert!(summary.cohens_kappa.disagreements.is_empty());
}

#[test]
fn skewed_base_rates_pull_kappa_below_percent_agreement() {
    let content = "x".repeat(1000);
    let docs = vec![Document::new("doc1", content)];
    let mut a = vec![Some("x"); 10];
    a[9] = Some("y");
    let mut b = vec![Some("x"); 10];
    b[8] = Some("y");
    let coders = vec![coder("a", &a), coder("b", &b)];
    let cfg = AgreementConfig::default();

    let pa = percent_agreement(&coders, &docs, &cfg).unwrap();
    let kappa = cohens_kappa(&coders, &docs, &cfg).unwrap();
    assert!(approx_eq(pa.value, 0.8, 1e-12));
    assert!(kappa.value < pa.value);
    // Raw kappa is -1/9; clamped by default.
    assert_eq!(kappa.value, 0.0);

    let unclamped = AgreementConfig {
        clamp_negative: false,
        ..AgreementConfig::default()
    };
    let raw = cohens_kappa(&coders, &docs, &unclamped).unwrap();
    assert!(approx_eq(raw.value, -1.0 / 9.0, 1e-9), "{}", raw.value);
}

#[test]
fn krippendorff_tracks_kappa_when_uncoded_is_a_category() {
    let docs = vec![doc_500()];
    let coders = scenario_coders();

    let as_category = AgreementConfig {
        treat_uncoded_as: Some(UncodedPolicy::Category),
        ..AgreementConfig::default()
    };
    let kappa = cohens_kappa(&coders, &docs, &as_category).unwrap();
    let alpha = krippendorff_alpha(&coders, &docs, &as_category).unwrap();
    assert!(approx_eq(alpha.value, 0.709_677, 1e-5), "{}", alpha.value);
    assert!((alpha.value - kappa.value).abs() < 0.05);
    assert_eq!(alpha.uncoded_policy, UncodedPolicy::Category);

    // Default treats the uncoded segment as missing and drops it.
    let default_alpha = krippendorff_alpha(&coders, &docs, &AgreementConfig::default()).unwrap();
    assert_eq!(default_alpha.uncoded_policy, UncodedPolicy::Missing);
    assert_eq!(default_alpha.units, 4);
    assert!(approx_eq(default_alpha.value, 0.533_333, 1e-5), "{}", default_alpha.value);
    assert!((default_alpha.value - kappa.value).abs() > 0.1);
}

#[test]
fn krippendorff_handles_three_coders() {
    let docs = vec![doc_500()];
    let coders = vec![
        coder("a", &[Some("a"), Some("a"), Some("b"), Some("a"), Some("b")]),
        coder("b", &[Some("a"), Some("b"), Some("b"), Some("a"), Some("b")]),
        coder("c", &[Some("a"), Some("a"), Some("b"), None, Some("b")]),
    ];
    let cfg = AgreementConfig::default();

    let alpha = krippendorff_alpha(&coders, &docs, &cfg).unwrap();
    assert!(approx_eq(alpha.value, 0.714_285_7, 1e-6), "{}", alpha.value);
    assert_eq!(alpha.coders, 3);

    let kappa = cohens_kappa(&coders, &docs, &cfg).unwrap();
    assert!(kappa.insufficient_data);
    assert_eq!(kappa.value, 0.0);
    assert_eq!(kappa.color_token, "gray");

    let pa = percent_agreement(&coders, &docs, &cfg).unwrap();
    assert_eq!(pa.pairwise.len(), 3);
}

#[test]
fn empty_documents_are_insufficient_data() {
    let docs = vec![Document::new("doc1", "")];
    let coders = vec![coder("a", &[]), coder("b", &[])];
    let cfg = AgreementConfig::default();

    let summary = agreement_summary(&coders, &docs, &cfg).unwrap();
    assert_eq!(summary.segments, 0);
    for result in [
        &summary.percent_agreement,
        &summary.cohens_kappa,
        &summary.krippendorff_alpha,
    ] {
        assert!(result.insufficient_data);
        assert_eq!(result.value, 0.0);
        assert!(result.interpretation.starts_with("Insufficient data"));
        assert!(result.level.is_none());
    }
}

#[test]
fn single_coder_is_insufficient_data() {
    let docs = vec![doc_500()];
    let coders = vec![coder("a", &[Some("c1"); 5])];
    let cfg = AgreementConfig::default();

    assert!(percent_agreement(&coders, &docs, &cfg).unwrap().insufficient_data);
    assert!(cohens_kappa(&coders, &docs, &cfg).unwrap().insufficient_data);
    assert!(krippendorff_alpha(&coders, &docs, &cfg).unwrap().insufficient_data);
}

#[test]
fn disagreement_records_are_capped() {
    let docs = vec![Document::new("doc1", "z".repeat(3000))];
    let coders = vec![
        CoderData::new("a", "A", vec![Coding::new("a1", "doc1", "yes", "a", 0, 3000)]),
        CoderData::new("b", "B", vec![Coding::new("b1", "doc1", "no", "b", 0, 3000)]),
    ];

    let kappa = cohens_kappa(&coders, &docs, &AgreementConfig::default()).unwrap();
    assert_eq!(kappa.units, 30);
    assert_eq!(kappa.disagreements.len(), 20);

    let cfg = AgreementConfig {
        max_disagreements: 5,
        ..AgreementConfig::default()
    };
    let kappa = cohens_kappa(&coders, &docs, &cfg).unwrap();
    assert_eq!(kappa.disagreements.len(), 5);
}

#[test]
fn tile_width_changes_segment_count() {
    let docs = vec![doc_500()];
    let coders = scenario_coders();
    let cfg = AgreementConfig::default().with_tile_width(50);

    let pa = percent_agreement(&coders, &docs, &cfg).unwrap();
    assert_eq!(pa.units, 10);
    assert!(approx_eq(pa.value, 0.8, 1e-12));
}

#[test]
fn malformed_codings_are_rejected() {
    let docs = vec![doc_500()];
    let coders = vec![
        CoderData::new("a", "A", vec![Coding::new("a1", "doc1", "c1", "a", 0, 600)]),
        coder("b", &[Some("c1"); 5]),
    ];
    let err = percent_agreement(&coders, &docs, &AgreementConfig::default()).unwrap_err();
    assert!(matches!(err, ValidationError::OffsetOutOfBounds { end: 600, len: 500, .. }));

    let inverted = vec![
        CoderData::new("a", "A", vec![Coding::new("a1", "doc1", "c1", "a", 200, 100)]),
        coder("b", &[Some("c1"); 5]),
    ];
    let err = cohens_kappa(&inverted, &docs, &AgreementConfig::default()).unwrap_err();
    assert!(matches!(err, ValidationError::InvertedRange { .. }));

    let zero_width = AgreementConfig::default().with_tile_width(0);
    let err = krippendorff_alpha(&scenario_coders(), &docs, &zero_width).unwrap_err();
    assert_eq!(err, ValidationError::ZeroTileWidth);
}

#[test]
fn out_of_range_confidence_level_is_rejected() {
    let docs = vec![doc_500()];
    let codes = [Some("c1"), Some("c2"), Some("c1"), Some("c2"), Some("c1")];
    let coders = vec![coder("a", &codes), coder("b", &codes)];
    let cfg = AgreementConfig {
        confidence_level: 1.0,
        ..AgreementConfig::default()
    };

    let err = cohens_kappa(&coders, &docs, &cfg).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidConfig(_)));
    assert!(agreement_summary(&coders, &docs, &cfg).is_err());
}

#[test]
fn codings_for_unknown_documents_are_ignored() {
    let docs = vec![doc_500()];
    let mut coders = scenario_coders();
    coders[0]
        .codings
        .push(Coding::new("stray", "other-doc", "c9", "a", 0, 10_000));

    let pa = percent_agreement(&coders, &docs, &AgreementConfig::default()).unwrap();
    assert!(approx_eq(pa.value, 0.8, 1e-12));
}
