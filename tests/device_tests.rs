//! Device-level tests against a simulated shift-register chain

use rs_sseg::hal::{RecordingBank, ShiftChain};
use rs_sseg::{
    classify, ConfigError, DeviceError, DigitCount, DisplayConfig, Line, LinePins, PatternTable,
    SegmentDevice, TextRenderer,
};

fn chain_device(digits: usize) -> SegmentDevice<ShiftChain> {
    let config = DisplayConfig::default().with_digit_count(digits);
    let chain = ShiftChain::new(DigitCount::new(digits).unwrap());
    SegmentDevice::new(chain, &config).unwrap()
}

fn p(c: u8) -> u8 {
    PatternTable::lookup(classify(c).unwrap()).bits()
}

// ============================================================================
// Bring-up
// ============================================================================

#[test]
fn boot_text_is_latched_and_output_enabled() {
    let device = chain_device(5);
    let chain = device.bank();
    assert!(chain.output_enabled());
    assert_eq!(chain.commit_count(), 1);
    assert_eq!(chain.latched(), vec![0x01; 5]);
}

#[test]
fn custom_boot_text() {
    let config = DisplayConfig::default()
        .with_digit_count(3)
        .with_boot_text("HI");
    let device = SegmentDevice::new(RecordingBank::new(), &config).unwrap();
    assert_eq!(
        device.bank().last_committed_bytes(),
        vec![p(b'i'), p(b'h'), 0x00]
    );
}

#[test]
fn active_low_output_enable() {
    let config = DisplayConfig::default().with_output_enable_level(false);
    let device = SegmentDevice::new(RecordingBank::new(), &config).unwrap();
    assert!(!device.bank().level(Line::OutputEnable));
    assert_eq!(device.bank().rising_edges(Line::OutputEnable), 0);
}

#[test]
fn bring_up_rejects_invalid_configs() {
    let zero = DisplayConfig::default().with_digit_count(0);
    assert!(matches!(
        SegmentDevice::new(RecordingBank::new(), &zero),
        Err(DeviceError::Config(ConfigError::DigitCount(0)))
    ));

    let too_many = DisplayConfig::default().with_digit_count(65);
    assert!(SegmentDevice::new(RecordingBank::new(), &too_many).is_err());

    let shared_pin = DisplayConfig::default().with_pins(LinePins {
        data: 5,
        clock: 5,
        ..LinePins::default()
    });
    assert!(matches!(
        SegmentDevice::new(RecordingBank::new(), &shared_pin),
        Err(DeviceError::Config(ConfigError::DuplicatePin { .. }))
    ));
}

#[test]
fn bring_up_fails_on_broken_line() {
    let bank = RecordingBank::new().fail_on(Line::Clock);
    let err = SegmentDevice::new(bank, &DisplayConfig::default()).unwrap_err();
    assert_eq!(err.to_string(), "line error: injected failure on clock");
}

// ============================================================================
// Writes
// ============================================================================

#[test]
fn write_latches_the_shifted_frame() {
    let mut device = chain_device(4);
    device.open().write(b"8888").unwrap();
    assert_eq!(device.bank().latched(), vec![p(b'8'); 4]);
    assert_eq!(device.bank().pending(), device.bank().latched());
    assert_eq!(device.bank().commit_count(), 2);
}

#[test]
fn write_shows_the_rendered_frame() {
    let mut device = chain_device(4);
    let accepted = device.open().write(b"12:34\n").unwrap();
    assert_eq!(accepted, 6);

    let expected = TextRenderer::render(b"12:34", 5, DigitCount::new(4).unwrap());
    assert_eq!(device.bank().latched(), expected.to_bytes().to_vec());
    assert_eq!(device.last_frame(), &expected);
}

#[test]
fn oversized_write_keeps_twice_the_digit_count() {
    let mut device = chain_device(2);
    // only "abcd" is kept, so "cd" is shown
    let accepted = device.open().write(b"abcdefgh").unwrap();
    assert_eq!(accepted, 8);
    assert_eq!(device.bank().latched(), vec![p(b'd'), p(b'c')]);
}

#[test]
fn crlf_only_write_blanks() {
    let mut device = chain_device(3);
    device.open().write(b"123").unwrap();
    device.open().write(b"\r\n").unwrap();
    assert_eq!(device.bank().latched(), vec![0x00; 3]);
}

#[test]
fn each_write_is_one_commit() {
    let mut device = chain_device(2);
    {
        let mut session = device.open();
        for text in [&b"1"[..], b"22", b"", b"x"] {
            session.write(text).unwrap();
        }
        assert_eq!(session.device().frames_committed(), 5);
    }
    assert_eq!(device.bank().commit_count(), 5);
}

#[test]
fn failed_write_keeps_previous_frame() {
    let config = DisplayConfig::default().with_digit_count(1);
    // bring-up uses 4 calls, one frame uses 8 * 3 + 2
    let bank = RecordingBank::new().fail_after(4 + 26 + 10);
    let mut device = SegmentDevice::new(bank, &config).unwrap();
    let before = device.last_frame().clone();

    assert!(matches!(
        device.open().write(b"7"),
        Err(DeviceError::Line(_))
    ));
    assert_eq!(device.last_frame(), &before);
    assert_eq!(device.frames_committed(), 1);
}

#[test]
fn chain_storage_stays_fixed_over_many_writes() {
    let mut device = chain_device(5);
    for _ in 0..10_000 {
        device.open().write(b"12345").unwrap();
    }

    let chain = device.bank();
    assert_eq!(chain.commit_count(), 10_001);
    assert_eq!(chain.digits(), 5);
    assert_eq!(chain.latched().len(), 5);
    assert_eq!(chain.pending().len(), 5);
}

// ============================================================================
// Shutdown
// ============================================================================

#[test]
fn shutdown_blanks_the_chain() {
    let mut device = chain_device(3);
    device.open().write(b"abc").unwrap();

    let chain = device.shutdown().unwrap();
    assert_eq!(chain.latched(), vec![0x00; 3]);
    assert_eq!(chain.commit_count(), 3);
}
