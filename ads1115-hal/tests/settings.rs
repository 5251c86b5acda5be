//! Configuration setters, raw register access and the comparator.
mod common;

use ads1115_hal::{
    ComparatorLatch, ComparatorMode, ComparatorPolarity, ComparatorQueue, DataRate, ErrorKind,
    Gain, Mode, Mux,
};
use common::started;

#[test]
fn setters_rewrite_thresholds_then_config() {
    let mut h = started();
    h.adc.set_gain(Gain::Fsr4_096V).unwrap();
    assert_eq!(
        h.state().writes(),
        [(0x02, 0x8000), (0x03, 0x7FFF), (0x01, 0x4383)]
    );
    assert_eq!(h.adc.gain(), Gain::Fsr4_096V);
    assert_eq!(h.adc.lsb_voltage(), 125.0e-6);
}

#[test]
fn each_setter_changes_only_its_field() {
    let mut h = started();

    h.adc.set_mux(Mux::Ain1Ain3).unwrap();
    assert_eq!(h.state().config(), 0x2583);
    assert_eq!(h.adc.mux(), Mux::Ain1Ain3);

    h.adc.set_data_rate(DataRate::Sps860).unwrap();
    assert_eq!(h.state().config(), 0x25E3);
    assert_eq!(h.adc.data_rate(), DataRate::Sps860);
    assert_eq!(h.adc.conversion_time_ms(), 3);

    h.adc.set_mode(Mode::Continuous).unwrap();
    assert_eq!(h.state().config(), 0x24E3);
    assert_eq!(h.adc.mode(), Mode::Continuous);
}

#[test]
fn mode_change_abandons_outstanding_conversion() {
    let mut h = started();
    let _ = h.adc.start_conversion().unwrap();
    h.adc.set_mode(Mode::Continuous).unwrap();
    h.adc.set_mode(Mode::SingleShot).unwrap();

    h.clock.advance(100);
    let err = h.adc.read_raw().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConversionNotReady);
    // A fresh conversion is not refused as busy.
    let _ = h.adc.start_conversion().unwrap();
}

#[test]
fn failed_mode_change_still_abandons_outstanding_conversion() {
    let mut h = started();
    h.state().never_completes = true;
    let _ = h.adc.start_conversion().unwrap();

    h.state().fail_next = 1;
    assert!(h.adc.set_mode(Mode::Continuous).is_err());
    h.state().fail_next = 1;
    assert!(h.adc.set_mode(Mode::SingleShot).is_err());
    assert_eq!(h.adc.mode(), Mode::SingleShot);

    h.state().never_completes = false;
    let _ = h.adc.start_conversion().unwrap();
    h.clock.advance(h.adc.conversion_time_ms());
    assert!(h.adc.read_raw().is_ok());
}

#[test]
fn failed_setter_keeps_the_new_value() {
    let mut h = started();
    h.state().fail_next = 1;

    let err = h.adc.set_gain(Gain::Fsr0_256V).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportError);
    assert_eq!(h.adc.gain(), Gain::Fsr0_256V);
    assert_eq!(h.adc.consecutive_failures(), 1);
    // Stopped at the first failed write.
    assert_eq!(h.state().log.len(), 1);
}

#[test]
fn read_config_reports_device_register() {
    let mut h = started();
    // Idle, so the OS bit reads back set.
    assert_eq!(h.adc.read_config(), Ok(0xC583));
}

#[test]
fn write_config_rejects_reserved_gain_codes() {
    let mut h = started();
    for value in [0x0C00, 0x8E83] {
        let err = h.adc.write_config(value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParam);
    }
    assert!(h.state().log.is_empty());
    assert_eq!(h.adc.gain(), Gain::Fsr2_048V);
}

#[test]
fn write_config_resynchronises_stored_settings() {
    let mut h = started();
    h.adc.write_config(0x029F).unwrap();

    assert_eq!(h.state().writes(), [(0x01, 0x029F)]);
    assert_eq!(h.adc.mux(), Mux::Ain0Ain1);
    assert_eq!(h.adc.gain(), Gain::Fsr4_096V);
    assert_eq!(h.adc.mode(), Mode::Continuous);
    assert_eq!(h.adc.data_rate(), DataRate::Sps128);
    assert_eq!(h.adc.comparator_mode(), ComparatorMode::Window);
    assert_eq!(h.adc.comparator_polarity(), ComparatorPolarity::ActiveHigh);
    assert_eq!(h.adc.comparator_latch(), ComparatorLatch::Latching);
    assert_eq!(h.adc.comparator_queue(), ComparatorQueue::Disable);
}

#[test]
fn failed_write_config_leaves_settings_alone() {
    let mut h = started();
    h.state().fail_next = 1;
    assert!(h.adc.write_config(0x029F).is_err());
    assert_eq!(h.adc.mode(), Mode::SingleShot);
    assert_eq!(h.adc.gain(), Gain::Fsr2_048V);
}

#[test]
fn thresholds_are_written_and_read_back() {
    let mut h = started();
    h.adc.set_thresholds(-100, 2000).unwrap();
    assert_eq!(h.state().writes(), [(0x02, 0xFF9C), (0x03, 0x07D0)]);
    assert_eq!(h.adc.get_thresholds(), Ok((-100, 2000)));

    // Reading back adopts whatever the device holds.
    h.state().registers[2] = 5;
    assert_eq!(h.adc.get_thresholds(), Ok((5, 2000)));
    assert_eq!(h.adc.config().threshold_low, 5);
    assert_eq!(h.adc.config().threshold_high, 2000);
}

#[test]
fn comparator_setters_map_to_their_bits() {
    let mut h = started();

    h.adc.set_comparator_mode(ComparatorMode::Window).unwrap();
    assert_eq!(h.state().config(), 0x4593);

    h.adc.set_comparator_latch(ComparatorLatch::Latching).unwrap();
    assert_eq!(h.state().config(), 0x4597);

    h.adc
        .set_comparator_polarity(ComparatorPolarity::ActiveHigh)
        .unwrap();
    assert_eq!(h.state().config(), 0x459F);

    h.adc.set_comparator_queue(ComparatorQueue::Assert2).unwrap();
    assert_eq!(h.state().config(), 0x459D);
    assert_eq!(h.adc.comparator_queue(), ComparatorQueue::Assert2);
}

#[test]
fn conversion_ready_pin_setup_and_teardown() {
    let mut h = started();

    h.adc.enable_conversion_ready_pin().unwrap();
    assert_eq!(
        h.state().writes(),
        [(0x02, 0x0000), (0x03, 0x8000), (0x01, 0x4580)]
    );
    assert!(h.adc.config().is_conversion_ready_mode());

    h.adc.disable_comparator().unwrap();
    assert_eq!(h.state().config(), 0x4583);
    assert!(!h.adc.config().is_conversion_ready_mode());
}

#[test]
fn raw_to_voltage_tracks_gain() {
    let mut h = started();
    assert!((h.adc.raw_to_voltage(1000) - 0.0625).abs() < 1e-6);

    h.adc.set_gain(Gain::Fsr6_144V).unwrap();
    assert!((h.adc.raw_to_voltage(i16::MIN) + 6.144).abs() < 1e-4);
    assert!((h.adc.raw_to_voltage(i16::MAX) - 6.144).abs() < 1e-3);
    assert_eq!(h.adc.raw_to_voltage(0), 0.0);
}

#[test]
fn smallest_range_at_fastest_rate() {
    let mut h = started();
    h.adc.set_gain(Gain::Fsr0_256V).unwrap();
    h.adc.set_data_rate(DataRate::Sps860).unwrap();

    assert_eq!(h.adc.conversion_time_ms(), 3);
    assert_eq!(h.adc.lsb_voltage(), 7.8125e-6);
    let volts = h.adc.raw_to_voltage(128);
    assert!((volts - 128.0 * 7.8125e-6).abs() < 1e-9, "{volts}");
}
