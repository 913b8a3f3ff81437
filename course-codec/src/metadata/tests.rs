//! Tests for the metadata store

use super::*;

fn author_store() -> MetadataStore {
    let mut store = MetadataStore::new();
    store.set_text("Author", "abood").unwrap();
    store.set_other("Author", 5, vec![0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
    store
}

#[test]
fn test_empty_store_encodes_to_nothing() {
    assert_eq!(MetadataStore::new().encode().unwrap(), Vec::<u8>::new());
    assert!(MetadataStore::decode(&[]).is_empty());
}

#[test]
fn test_encode_layout() {
    let bytes = author_store().encode().unwrap();

    let mut expected = b"MD2_".to_vec();
    expected.extend([0, 0, 0, 6]);
    expected.extend(b"Author");
    expected.extend([0, 0, 0, 2]);
    expected.extend([0, 0, 0, 1, 0, 0, 0, 5]);
    expected.extend(b"abood");
    expected.extend([0, 0, 0, 5, 0, 0, 0, 4, 0xDE, 0xAD, 0xBE, 0xEF]);
    assert_eq!(bytes, expected);
}

#[test]
fn test_save_load_roundtrip_keeps_unknown_types() {
    let bytes = author_store().encode().unwrap();
    let store = MetadataStore::decode(&bytes);

    assert_eq!(store.text("Author").as_deref(), Some("abood"));
    assert_eq!(store.other("Author", 5), Some(&[0xDE, 0xAD, 0xBE, 0xEF][..]));
    assert_eq!(store.encode().unwrap(), bytes);
}

#[test]
fn test_keys_and_types_are_sorted() {
    let mut store = MetadataStore::new();
    store.set_other("b", 9, vec![1]).unwrap();
    store.set_binary("b", vec![2]).unwrap();
    store.set_text("a", "x").unwrap();

    let bytes = store.encode().unwrap();
    // "a" comes first
    assert_eq!(&bytes[4..9], &[0, 0, 0, 1, b'a']);
    let b_entry = &bytes[4 + 4 + 1 + 4 + 8 + 1..];
    assert_eq!(&b_entry[..5], &[0, 0, 0, 1, b'b']);
    // tag 0 before tag 9
    assert_eq!(&b_entry[9..13], &[0, 0, 0, 0]);
}

#[test]
fn test_padding_is_ignored() {
    let mut bytes = author_store().encode().unwrap();
    bytes.extend([0, 0, 0]);
    assert_eq!(MetadataStore::parse(&bytes).unwrap(), author_store());

    let mut bytes = author_store().encode().unwrap();
    bytes.extend([0, 0, 0, 0]);
    assert_eq!(MetadataStore::parse(&bytes).unwrap(), author_store());
}

#[test]
fn test_keys_without_types_are_dropped() {
    let mut bytes = b"MD2_".to_vec();
    bytes.extend([0; 8]);
    let store = MetadataStore::decode(&bytes);
    assert!(store.is_empty());
    assert_eq!(store.encode().unwrap(), Vec::<u8>::new());

    // a typeless key next to a real one leaves only the real one
    let mut bytes = b"MD2_".to_vec();
    bytes.extend([0, 0, 0, 4]);
    bytes.extend(b"Note");
    bytes.extend([0, 0, 0, 0]);
    bytes.extend(&author_store().encode().unwrap()[4..]);
    assert_eq!(MetadataStore::parse(&bytes).unwrap(), author_store());
}

#[test]
fn test_truncated_entry() {
    let mut bytes = author_store().encode().unwrap();
    bytes.truncate(bytes.len() - 2);
    assert!(matches!(
        MetadataStore::parse(&bytes),
        Err(MetadataError::Truncated { .. })
    ));
    // best-effort decode falls back to empty
    assert!(MetadataStore::decode(&bytes).is_empty());
}

#[test]
fn test_text_is_one_byte_per_char() {
    let mut store = MetadataStore::new();
    store.set_text("Name", "Caf\u{e9}").unwrap();
    assert_eq!(store.other("Name", TYPE_TEXT), Some(&b"Caf\xe9"[..]));
    assert_eq!(store.text("Name").as_deref(), Some("Caf\u{e9}"));

    assert_eq!(
        store.set_text("Name", "\u{3042}"),
        Err(MetadataError::NotLatin1 { what: "text value" })
    );
    assert_eq!(
        store.set_binary("\u{3042}", vec![]),
        Err(MetadataError::NotLatin1 { what: "key" })
    );
}

#[test]
fn test_remove() {
    let mut store = author_store();
    assert!(store.remove("Author"));
    assert!(!store.remove("Author"));
    assert!(store.is_empty());
}

#[test]
fn test_legacy_webpage_alias() {
    let data = b"(dp0\nS'Author'\np1\nS'abood'\np2\nsS'Webpage'\np3\nS'example.org'\np4\ns.";
    let store = MetadataStore::decode(data);
    assert_eq!(store.text("Author").as_deref(), Some("abood"));
    assert_eq!(store.text("Webpage").as_deref(), Some("example.org"));
    assert_eq!(store.text("Website").as_deref(), Some("example.org"));
}

#[test]
fn test_legacy_existing_website_wins() {
    let data = b"(dp0\nS'Webpage'\np1\nS'old'\np2\nsS'Website'\np3\nS'new'\np4\ns.";
    let store = MetadataStore::decode(data);
    assert_eq!(store.text("Website").as_deref(), Some("new"));
}

#[test]
fn test_legacy_garbage_is_empty() {
    assert!(MetadataStore::decode(b"\x80\x02}q\x00.").is_empty());
    assert!(MetadataStore::decode(b"not a pickle").is_empty());
    assert!(MetadataStore::decode(&[0xFF; 64]).is_empty());
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    fn arb_store() -> impl Strategy<Value = MetadataStore> {
        proptest::collection::vec(
            (
                "[A-Za-z]{1,12}",
                any::<u32>(),
                proptest::collection::vec(any::<u8>(), 0..32),
            ),
            0..8,
        )
        .prop_map(|entries| {
            let mut store = MetadataStore::new();
            for (key, tag, value) in entries {
                store.set_other(&key, tag, value).unwrap();
            }
            store
        })
    }

    proptest! {
        #[test]
        fn prop_encode_decode_roundtrip(store in arb_store()) {
            let bytes = store.encode().unwrap();
            let decoded = MetadataStore::decode(&bytes);
            prop_assert_eq!(&decoded, &store);
            prop_assert_eq!(decoded.encode().unwrap(), bytes);
        }

        #[test]
        fn prop_decode_never_panics(data in proptest::collection::vec(any::<u8>(), 0..96)) {
            let _ = MetadataStore::decode(&data);
        }
    }
}
