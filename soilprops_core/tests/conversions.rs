//! Consistency of the conductivity domain conversions as driven by the
//! engine, checked against the forward models.

use soilprops_config::EngineCfg;
use soilprops_core::{predict, Property, SoilBuilder};
use soilprops_models::{longmire_smith_ec, sheets_hendrickx};

#[test]
fn emi_frequency_shift_round_trips() {
    let measured = 0.035;
    let mut soil = SoilBuilder::new()
        .with_scalar(Property::BulkEc, measured)
        .with_instrument("EMI Dualem")
        .build()
        .unwrap();
    let cfg = EngineCfg::default();
    predict(&mut soil, &cfg).unwrap();

    let dc = soil.value(Property::BulkEcDc, 0);
    assert!(dc.is_finite() && dc < measured);
    // Shifting the recovered DC value back up reproduces the measurement.
    let back = longmire_smith_ec(dc, 9e3);
    assert!((back - measured).abs() < 1e-3, "round trip {back}");
}

#[test]
fn temperature_correction_round_trips() {
    let measured = 0.06;
    let temperature = 288.15;
    let mut soil = SoilBuilder::new()
        .with_scalar(Property::BulkEc, measured)
        .with_scalar(Property::Temperature, temperature)
        .build()
        .unwrap();
    let cfg = EngineCfg::default();
    predict(&mut soil, &cfg).unwrap();

    let dc_tc = soil.value(Property::BulkEcDcTc, 0);
    assert!((dc_tc - sheets_hendrickx(measured, temperature)).abs() < 1e-9);
    // Cooler than 25 °C, so the corrected value is larger.
    assert!(dc_tc > measured);
}

#[test]
fn dc_conditions_make_all_three_domains_equal() {
    let measured = 0.045;
    let mut soil = SoilBuilder::new()
        .with_scalar(Property::BulkEc, measured)
        .build()
        .unwrap();
    let cfg = EngineCfg::default();
    predict(&mut soil, &cfg).unwrap();

    assert_eq!(soil.value(Property::BulkEcDc, 0), measured);
    assert_eq!(soil.value(Property::BulkEcDcTc, 0), measured);
}

#[test]
fn dc_tc_measurement_propagates_back_to_the_measurement_domain() {
    let dc_tc = 0.05;
    let mut soil = SoilBuilder::new()
        .with_scalar(Property::BulkEcDcTc, dc_tc)
        .with_scalar(Property::Temperature, 308.15)
        .build()
        .unwrap();
    let cfg = EngineCfg::default();
    predict(&mut soil, &cfg).unwrap();

    let dc = soil.value(Property::BulkEcDc, 0);
    assert!(dc.is_finite());
    // Warmer than the reference, so the in-situ value is larger.
    assert!(dc > dc_tc);
    assert!((sheets_hendrickx(dc, 308.15) - dc_tc).abs() < 1e-4);
    // At DC measurement frequency the uncorrected domain equals DC.
    assert_eq!(soil.value(Property::BulkEc, 0), dc);
}
