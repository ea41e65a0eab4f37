mod util;

use lvjson_xml::{EncodeOptions, Whitespace, XmlError, decode, encode};

const OMIT: EncodeOptions = EncodeOptions { whitespace: Whitespace::Omit };
const PRESERVE: EncodeOptions = EncodeOptions { whitespace: Whitespace::Preserve };

#[test]
fn canonical_package_round_trips_byte_for_byte() {
    let xml = util::read_fixture("package.canonical.vipb");
    let tree = encode(&xml, Some("Package"), OMIT).expect("fixture must encode");

    let deps = &tree["Package"]["Library_General_Settings"]["Dependencies"]["External_Dependencies"]["Package"];
    assert_eq!(deps.as_array().map(Vec::len), Some(2));
    assert_eq!(deps[1]["Name"]["__text"], "oglib_array");
    assert_eq!(tree["Package"]["@Version"], "2.0");

    let out = decode(&tree, Some("Package")).expect("tree must decode");
    assert_eq!(out, xml);
}

#[test]
fn canonical_project_round_trips_byte_for_byte() {
    let xml = util::read_fixture("project.canonical.lvproj");
    let tree = encode(&xml, Some("Project"), OMIT).unwrap();
    assert_eq!(decode(&tree, Some("Project")).unwrap(), xml);
}

#[test]
fn tool_saved_project_is_normalized_to_canonical_layout() {
    let raw = util::read_fixture("project.raw.lvproj");
    let canonical = util::read_fixture("project.canonical.lvproj");

    let tree = encode(&raw, Some("Project"), OMIT).unwrap();
    let out = decode(&tree, Some("Project")).unwrap();

    assert_eq!(out, canonical);
    assert!(!out.starts_with("<?xml"));
    assert!(!out.starts_with('\u{feff}'));
    assert!(!out.contains(" />"));
    assert!(!out.replace("\r\n", "").contains('\n'));
}

#[test]
fn decoder_output_is_idempotent() {
    let raw = util::read_fixture("project.raw.lvproj");
    let first = decode(&encode(&raw, None, OMIT).unwrap(), None).unwrap();
    let second = decode(&encode(&first, None, OMIT).unwrap(), None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn package_fixture_is_not_a_project() {
    let xml = util::read_fixture("package.canonical.vipb");
    assert!(matches!(
        encode(&xml, Some("Project"), OMIT),
        Err(XmlError::SchemaMismatch { .. })
    ));
}

#[test]
fn preserved_whitespace_does_not_grow_across_cycles() {
    let first = decode(&encode("<r>\n  <a/>\n</r>", None, PRESERVE).unwrap(), None).unwrap();
    assert_eq!(first, "<r>\r\n  <a/>\r\n</r>");

    let second = decode(&encode(&first, None, PRESERVE).unwrap(), None).unwrap();
    assert_eq!(first, second);

    let raw = util::read_fixture("project.raw.lvproj");
    let once = decode(&encode(&raw, None, PRESERVE).unwrap(), None).unwrap();
    let twice = decode(&encode(&once, None, PRESERVE).unwrap(), None).unwrap();
    assert_eq!(once, util::read_fixture("project.canonical.lvproj"));
    assert_eq!(once, twice);
}
