//! Classification must survive whatever an exposed server sends back.

use index_harvest::classify::{extract_artifacts, extract_keyword_snippets, is_uninteresting};

#[test]
fn test_extraction_on_hostile_input() {
    let inputs = [
        String::new(),
        "\u{0}\u{1}\u{2}".to_string(),
        "ünïcødé password: пароль 🔑 token=✓✓✓".to_string(),
        "999.999.999.999:99999 256.1.1.1 1.2.3.4:70000".to_string(),
        "@".repeat(10_000),
        ".".repeat(10_000),
        "password".repeat(2_000),
    ];
    for input in &inputs {
        let artifacts = extract_artifacts(input);
        assert!(artifacts.public_ips.is_empty());
        for snippet in extract_keyword_snippets(input) {
            assert!(!snippet.is_empty());
        }
    }
}

#[test]
fn test_invalid_addresses_are_not_reported() {
    let artifacts = extract_artifacts("999.999.999.999:99999 256.1.1.1 1.2.3.4:70000");
    assert!(artifacts.public_ips.is_empty());
}

#[test]
fn test_collection_filter_on_odd_names() {
    assert!(!is_uninteresting(""));
    assert!(!is_uninteresting("客户"));
    assert!(is_uninteresting(".kibana_task_manager_7.17.0_001"));
}
