//! Integration tests for checking a vendor header against the pinned table

mod helpers;

use bladerf_shim::{Error, HeaderDefines, LIBBLADERF_API_VERSION, MACROS, verify, verify_file};

#[test]
fn test_vendor_header_verifies_clean() {
    let defines = HeaderDefines::parse(helpers::VENDOR_HEADER).expect("parse");
    let report = verify(&defines).expect("verify");

    assert!(report.is_clean(), "drifted: {:?}, missing: {:?}", report.drifted, report.missing);
    assert_eq!(report.matched.len(), MACROS.len());
    assert_eq!(report.header_version, Some(LIBBLADERF_API_VERSION));
    assert!(report.version_matches());
    assert!(report.ensure_clean().is_ok());
}

#[test]
fn test_every_pinned_value_matches_header_bit_for_bit() {
    let defines = HeaderDefines::parse(helpers::VENDOR_HEADER).expect("parse");
    for def in MACROS {
        let evaluated = defines.eval(def.macro_name).expect(def.macro_name);
        assert_eq!(def.ty.truncate(evaluated), def.value, "{}", def.macro_name);
    }
}

#[test]
fn test_changed_flag_is_reported_as_drift() {
    let header = helpers::header_with("BLADERF_META_FLAG_TX_NOW", "(1 << 4)");
    let report = verify(&HeaderDefines::parse(&header).unwrap()).unwrap();

    assert_eq!(report.drifted.len(), 1);
    let (def, found) = report.drifted[0];
    assert_eq!(def.macro_name, "BLADERF_META_FLAG_TX_NOW");
    assert_eq!(found, 0x10);

    match report.ensure_clean() {
        Err(Error::Drift {
            name,
            expected,
            found,
        }) => {
            assert_eq!(name, "BLADERF_META_FLAG_TX_NOW");
            assert_eq!(expected, 0x4);
            assert_eq!(found, 0x10);
        }
        other => panic!("expected drift, got {:?}", other),
    }
}

#[test]
fn test_changed_channel_encoding_propagates_to_modules() {
    let header = helpers::header_with(
        "BLADERF_CHANNEL_TX(ch)",
        "(bladerf_channel)(((ch) << 1) | 0x2)",
    );
    let report = verify(&HeaderDefines::parse(&header).unwrap()).unwrap();

    let drifted: Vec<_> = report.drifted.iter().map(|(d, _)| d.macro_name).collect();
    assert_eq!(drifted, vec!["BLADERF_MODULE_TX"]);
}

#[test]
fn test_helper_macro_is_expanded_as_text() {
    // Parenthesized, the helper gives the pinned 1 << 17; as text it does not
    let header = format!(
        "#define MINIEXP_BASE 0x1 + 0xffff\n{}",
        helpers::header_with("BLADERF_META_FLAG_RX_HW_MINIEXP2", "(MINIEXP_BASE * 2)")
    );
    let report = verify(&HeaderDefines::parse(&header).unwrap()).unwrap();

    assert_eq!(report.drifted.len(), 1);
    let (def, found) = report.drifted[0];
    assert_eq!(def.macro_name, "BLADERF_META_FLAG_RX_HW_MINIEXP2");
    assert_eq!(found, 0x1ffff);
}

#[test]
fn test_missing_macro_is_reported() {
    let header = helpers::header_without("BLADERF_TRIGGER_REG_LINE");
    let report = verify(&HeaderDefines::parse(&header).unwrap()).unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.missing.len(), 1);
    assert!(matches!(
        report.ensure_clean(),
        Err(Error::MissingMacro(name)) if name == "BLADERF_TRIGGER_REG_LINE"
    ));
}

#[test]
fn test_older_header_version_is_flagged() {
    let header = helpers::header_with("LIBBLADERF_API_VERSION", "(0x02040100)");
    let report = verify(&HeaderDefines::parse(&header).unwrap()).unwrap();

    assert_eq!(report.header_version, Some(0x0204_0100));
    assert!(!report.version_matches());
    assert!(report.is_clean());
}

#[test]
fn test_verify_file_reads_from_disk() {
    let path = helpers::write_temp_header("clean", helpers::VENDOR_HEADER);
    let report = verify_file(&path).expect("verify file");
    assert!(report.is_clean());
    std::fs::remove_file(path).ok();
}

#[test]
fn test_verify_file_missing_path() {
    let err = verify_file("/nonexistent/libbladeRF.h").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
