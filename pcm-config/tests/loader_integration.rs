//! Integration tests for loading mixer files from disk

mod helpers;

use std::fs;

use helpers::{fixture, mixer_document, path_str, MixerFile};
use pcm_config::{
    get_pcm_device_id, init_pcm_ids, ConfigurationFault, DeviceTable, Direction, LoadError, LoaderConfig,
    PcmConfigLoader, UseCase, NO_DEVICE,
};
use rstest::rstest;

fn ids(table: &DeviceTable, usecase: UseCase) -> (i32, i32) {
    (
        get_pcm_device_id(table, usecase, Direction::Playback),
        get_pcm_device_id(table, usecase, Direction::Capture),
    )
}

#[test]
fn test_full_mixer_file() {
    let mut table = DeviceTable::new();
    init_pcm_ids(&mut table, Some(&fixture("mixer_paths_full.xml"))).expect("Failed to load fixture");

    assert_eq!(ids(&table, UseCase::Playback), (0, 0));
    assert_eq!(ids(&table, UseCase::PlaybackMultiChannel), (NO_DEVICE, NO_DEVICE));
    assert_eq!(ids(&table, UseCase::PlaybackOffload), (6, 6));
    assert_eq!(ids(&table, UseCase::PlaybackDeepBuffer), (1, 1));
    assert_eq!(ids(&table, UseCase::Capture), (2, 2));
    assert_eq!(ids(&table, UseCase::BtSco), (5, 7));
    assert_eq!(ids(&table, UseCase::FmRadio), (8, 8));
    assert_eq!(ids(&table, UseCase::VoiceCall), (3, 4));
}

#[test]
fn test_bluetooth_capture_override() {
    let mut table = DeviceTable::new();
    init_pcm_ids(&mut table, Some(&fixture("bluetooth_override.xml"))).unwrap();

    assert_eq!(ids(&table, UseCase::BtSco), (5, 7));

    let defaults = DeviceTable::new();
    for usecase in UseCase::ALL.into_iter().filter(|u| *u != UseCase::BtSco) {
        assert_eq!(table.entry(usecase), defaults.entry(usecase), "{usecase} changed");
    }
}

#[test]
fn test_file_without_pcmdai_keeps_defaults() {
    let mut table = DeviceTable::new();
    init_pcm_ids(&mut table, Some(&fixture("no_pcmdai.xml"))).unwrap();
    assert!(table.is_default());
}

#[test]
fn test_unknown_links_are_ignored() {
    let mut table = DeviceTable::new();
    init_pcm_ids(&mut table, Some(&fixture("unknown_links.xml"))).unwrap();

    assert_eq!(ids(&table, UseCase::FmRadio), (12, 12));
    assert_eq!(ids(&table, UseCase::Capture), (0, 0));
    assert_eq!(ids(&table, UseCase::PlaybackMultiChannel), (NO_DEVICE, NO_DEVICE));
}

#[test]
fn test_truncated_file_keeps_partial_updates() {
    let mut table = DeviceTable::new();
    let err = init_pcm_ids(&mut table, Some(&fixture("truncated.xml"))).unwrap_err();

    assert!(
        matches!(
            err,
            LoadError::InvalidConfiguration {
                fault: ConfigurationFault::Syntax { .. },
                ..
            }
        ),
        "unexpected error: {err}"
    );
    assert_eq!(ids(&table, UseCase::Playback), (9, 9));
    assert_eq!(ids(&table, UseCase::Capture), (10, 10));
    assert_eq!(ids(&table, UseCase::VoiceCall), (1, 1));
}

#[test]
fn test_every_cut_of_full_fixture_is_invalid() {
    let bytes = fs::read(helpers::fixture_path("mixer_paths_full.xml")).unwrap();
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace()).unwrap() + 1;
    let loader = PcmConfigLoader::default();

    for len in 0..end {
        let mut table = DeviceTable::new();
        let result = loader.load_source(&mut table, &bytes[..len], "cut fixture");
        assert!(
            matches!(result, Err(LoadError::InvalidConfiguration { .. })),
            "accepted a document cut at byte {len}: {:?}",
            String::from_utf8_lossy(&bytes[len.saturating_sub(20)..len])
        );
    }
}

#[test]
fn test_missing_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("mixer_paths_0.xml");
    let mut table = DeviceTable::new();

    let err = init_pcm_ids(&mut table, Some(path_str(&missing))).unwrap_err();

    assert!(matches!(err, LoadError::DeviceNotConfigured { ref path, .. } if *path == missing));
    assert_eq!(err.errno(), -19);
    assert!(table.is_default());
}

#[test]
fn test_configured_default_path_is_used() {
    let mixer = MixerFile::new(&mixer_document(&[("capture_link", "5")]));
    let loader = PcmConfigLoader::new(LoaderConfig::new().with_path(&mixer.path)).unwrap();
    let mut table = DeviceTable::new();

    loader.load(&mut table, None).unwrap();
    assert_eq!(ids(&table, UseCase::Capture), (5, 5));
}

#[rstest]
#[case("playback_link", UseCase::Playback)]
#[case("playback_offload_link", UseCase::PlaybackOffload)]
#[case("playback_deep_link", UseCase::PlaybackDeepBuffer)]
#[case("capture_link", UseCase::Capture)]
#[case("bluetooth_link", UseCase::BtSco)]
#[case("fmradio_link", UseCase::FmRadio)]
#[case("baseband_link", UseCase::VoiceCall)]
fn test_single_link_sets_both_directions(#[case] link: &str, #[case] usecase: UseCase) {
    let mixer = MixerFile::new(&mixer_document(&[(link, "5")]));
    let mut table = DeviceTable::new();

    init_pcm_ids(&mut table, Some(mixer.path_str())).unwrap();

    assert_eq!(ids(&table, usecase), (5, 5));
    let defaults = DeviceTable::new();
    for other in UseCase::ALL.into_iter().filter(|u| *u != usecase) {
        assert_eq!(table.entry(other), defaults.entry(other));
    }
}

#[test]
fn test_later_declarations_win() {
    let xml = mixer_document(&[
        ("baseband_link", "3"),
        ("baseband_capture_link", "4"),
        ("baseband_link", "6"),
    ]);
    let mixer = MixerFile::new(&xml);
    let mut table = DeviceTable::new();

    init_pcm_ids(&mut table, Some(mixer.path_str())).unwrap();
    assert_eq!(ids(&table, UseCase::VoiceCall), (6, 6));
}

#[test]
fn test_loading_twice_is_idempotent() {
    let path = fixture("mixer_paths_full.xml");

    let mut once = DeviceTable::new();
    init_pcm_ids(&mut once, Some(&path)).unwrap();

    let mut twice = DeviceTable::new();
    init_pcm_ids(&mut twice, Some(&path)).unwrap();
    init_pcm_ids(&mut twice, Some(&path)).unwrap();

    assert_eq!(once, twice);
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(64)]
#[case(1024)]
#[case(1 << 16)]
fn test_chunk_size_does_not_change_result(#[case] chunk_size: usize) {
    let loader = PcmConfigLoader::new(LoaderConfig::new().with_chunk_size(chunk_size)).unwrap();
    let mut table = DeviceTable::new();
    loader.load(&mut table, Some(&fixture("mixer_paths_full.xml"))).unwrap();

    let mut reference = DeviceTable::new();
    init_pcm_ids(&mut reference, Some(&fixture("mixer_paths_full.xml"))).unwrap();

    assert_eq!(table, reference);
}

#[test]
fn test_lenient_values_from_file() {
    let mixer = MixerFile::new(&mixer_document(&[("capture_link", "12abc"), ("fmradio_link", "radio")]));
    let mut table = DeviceTable::new();

    init_pcm_ids(&mut table, Some(mixer.path_str())).unwrap();

    assert_eq!(ids(&table, UseCase::Capture), (12, 12));
    assert_eq!(ids(&table, UseCase::FmRadio), (0, 0));
}

#[test]
fn test_strict_values_from_file() {
    let mixer = MixerFile::new(&mixer_document(&[("capture_link", "3"), ("fmradio_link", "radio")]));
    let loader = PcmConfigLoader::new(LoaderConfig::strict()).unwrap();
    let mut table = DeviceTable::new();

    let err = loader.load(&mut table, Some(mixer.path_str())).unwrap_err();

    assert!(err.to_string().contains("fmradio_link"), "{err}");
    assert_eq!(ids(&table, UseCase::Capture), (3, 3));
    assert_eq!(ids(&table, UseCase::FmRadio), (NO_DEVICE, NO_DEVICE));
}

#[test]
fn test_long_path_rejected_by_default() {
    let long = format!("/data/vendor/audio/{}.xml", "x".repeat(100));
    let mut table = DeviceTable::new();

    let err = init_pcm_ids(&mut table, Some(&long)).unwrap_err();

    assert!(matches!(err, LoadError::PathTooLong { limit: 99, .. }));
    assert!(table.is_default());
}

#[test]
fn test_long_path_truncated_with_legacy_config() {
    let dir = tempfile::tempdir().unwrap();
    let base = path_str(dir.path()).to_string();
    assert!(base.len() < 90, "temp dir path too long for this test: {}", base);

    // The first 99 bytes of `requested` name the file that actually exists.
    let requested = format!("{}/{}", base, "m".repeat(150));
    let truncated = &requested[..99];
    fs::write(truncated, mixer_document(&[("playback_deep_link", "5")])).unwrap();

    let mut table = DeviceTable::new();
    let err = init_pcm_ids(&mut table, Some(&requested)).unwrap_err();
    assert!(matches!(err, LoadError::PathTooLong { .. }));

    let loader = PcmConfigLoader::new(LoaderConfig::legacy()).unwrap();
    loader.load(&mut table, Some(&requested)).unwrap();
    assert_eq!(ids(&table, UseCase::PlaybackDeepBuffer), (5, 5));
}
