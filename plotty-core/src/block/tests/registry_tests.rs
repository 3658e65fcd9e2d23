use super::test_helpers::block;
use crate::block::builtin::filter::Comparison;
use crate::block::{BlockDecodeError, BlockKind, BlockRegistry, BlockSpec};
use pretty_assertions::assert_eq;

#[test]
fn every_kind_has_a_decoder() {
    // Arrange
    let registry = BlockRegistry::new();
    let samples = [
        "1&a^1^b",
        "2&1&a",
        "3&2&a",
        "4&3&x&y",
        "5&a^1^;",
        "6&a^b",
        "7&style&a",
    ];

    // Act
    let kinds: Vec<BlockKind> = samples
        .iter()
        .map(|s| registry.decode(s).unwrap().kind())
        .collect();

    // Assert
    assert_eq!(kinds, BlockKind::ALL.to_vec());
}

#[test]
fn flags_follow_the_tag() {
    let BlockSpec::Filter(filter) = block("112&a^2^b") else {
        panic!("expected a filter");
    };
    assert_eq!(filter.flags, 12);
    assert_eq!(filter.conditions[0].comparison, Comparison::IsNot);
}

#[test]
fn encode_is_canonical() {
    for text in [
        "10&benchmark^1^fop&heap^2^64",
        "21&2&invocation",
        "33&1;bmtime&build^jdk8&benchmark",
        "40&1&heap&benchmark&bmtime&wide",
        "40&4&heap&bmtime^gc",
        "50&bmtime^2^1.5;",
        "60&benchmark^heap",
        "71&metrics",
    ] {
        assert_eq!(block(text).encode(), text);
    }
}

#[test]
fn missing_flags_encode_as_zero() {
    assert_eq!(block("2&1&invocation").encode(), "20&1&invocation");
}

#[test]
fn decode_errors() {
    let registry = BlockRegistry::new();

    assert!(matches!(
        registry.decode("9&x"),
        Err(BlockDecodeError::UnknownTag { tag: '9' })
    ));
    assert!(matches!(
        registry.decode("2x&1&a"),
        Err(BlockDecodeError::Flags { .. })
    ));
    assert!(matches!(
        registry.decode("2&3&a"),
        Err(BlockDecodeError::Invalid { what: "type", .. })
    ));
    assert!(matches!(
        registry.decode("6&a"),
        Err(BlockDecodeError::Invalid { .. })
    ));
    assert!(matches!(
        registry.decode("3&1&benchmark"),
        Err(BlockDecodeError::Missing { .. })
    ));
}
