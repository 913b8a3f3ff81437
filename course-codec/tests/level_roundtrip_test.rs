//! Integration tests for the level load/save pipeline.
//!
//! Tests the complete flow:
//! 1. Hand-assemble course blobs in the source byte order
//! 2. Load them through a level archive
//! 3. Save in the target byte order and load again

use std::collections::BTreeMap;

use proptest::prelude::*;

use course_codec::block_table;
use course_codec::records::{
    Background, Bounding, Entrance, LevelObject, Location, Sprite, Zone, encode_layer,
    encode_records,
};
use course_codec::{Area, Endian, Level, MetadataStore, UnitDirResolver};
use course_shared::{Archive, Config, MemoryArchive};

/// Route codec logs to the test output when RUST_LOG is set
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn bounding(id: u16) -> Bounding {
    Bounding {
        upper: 0x40,
        lower: -0x100,
        upper_2: 0x40,
        lower_2: -0x100,
        id,
        flags: 0x0F,
    }
}

fn zone_at(id: u8, x: i32, bounding_id: u16, background_id: u16) -> Zone {
    Zone {
        x,
        y: 0x200,
        width: 0x180,
        height: 0xF0,
        id,
        bounding_id: Some(bounding_id),
        background_id: Some(background_id),
        ..Default::default()
    }
}

/// A course blob as an older tool would write it: sparse reference ids,
/// zone ids out of order, legacy metadata in the gap.
fn legacy_course_blob(endian: Endian) -> Vec<u8> {
    let mut blocks: [Vec<u8>; block_table::BLOCK_COUNT] = Default::default();
    blocks[2] = encode_records(&[bounding(3), bounding(8)], &[], endian).unwrap();
    let tinted = Background {
        params: [5, 0, 0],
        ..Background::black(10)
    };
    blocks[4] = encode_records(&[Background::black(2), tinted], &[], endian).unwrap();
    blocks[7] = encode_records(
        &[Sprite {
            sprite_type: 0x41,
            x: 0x300,
            y: 0x220,
            ..Default::default()
        }],
        &[0xFF; 4],
        endian,
    )
    .unwrap();
    blocks[9] = encode_records(
        &[
            zone_at(7, 0x100, 8, 10),
            zone_at(3, 0x400, 3, 2),
            zone_at(5, 0x800, 3, 99),
        ],
        &[],
        endian,
    )
    .unwrap();
    blocks[12] = vec![0xC0, 0xFF, 0xEE, 0x00];

    let legacy = b"(dp0\nS'Webpage'\np1\nS'example.org'\np2\ns.";
    block_table::encode(&blocks, legacy, endian).unwrap()
}

fn level_archive(endian: Endian) -> MemoryArchive {
    let layer = encode_layer(
        &[LevelObject {
            object_type: 20,
            x: 5,
            y: 6,
            width: 1,
            height: 1,
            ..Default::default()
        }],
        endian,
    )
    .unwrap()
    .unwrap();

    let mut archive = MemoryArchive::new();
    archive.insert("course1.bin", legacy_course_blob(endian));
    archive.insert("course1_bgdatL1.bin", layer);
    archive.insert("course2.bin", legacy_course_blob(endian));
    // area 3 is missing, so area 4 is never reached
    archive.insert("course4.bin", legacy_course_blob(endian));
    archive
}

#[test]
fn test_load_legacy_level() {
    init_logging();
    let level = Level::load("1-2", &level_archive(Endian::Little), Endian::Little).unwrap();

    assert_eq!(level.areas.len(), 2);
    let area = &level.areas[0];

    assert_eq!(area.zones.iter().map(|z| z.id).collect::<Vec<_>>(), vec![0, 1, 2]);
    assert_eq!(area.zones[2].background_id, None, "unknown background id 99");
    assert_eq!(area.zones[0].bounding_id, Some(8));
    assert_eq!(area.metadata.text("Website").as_deref(), Some("example.org"));
    assert_eq!(area.opaque.get(&12), Some(&vec![0xC0, 0xFF, 0xEE, 0x00]));

    // item block folded into type 28 with its content in data
    assert_eq!(area.layers[1][0].object_type, 28);
    assert_eq!(area.layers[1][0].data, 5);
    assert_eq!(area.layers[1][0].z, 8192);
    assert!(level.areas[1].layers.iter().all(Vec::is_empty));
}

#[test]
fn test_resave_canonicalizes_references() {
    init_logging();
    let level = Level::load("1-2", &level_archive(Endian::Little), Endian::Little).unwrap();
    let entries = level.save_entries(Endian::Big).unwrap();

    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["course1.bin", "course1_bgdatL1.bin", "course2.bin"]);

    let archive: MemoryArchive = entries.into_iter().collect();
    let reloaded = Level::load("1-2", &archive, Endian::Big).unwrap();
    let area = &reloaded.areas[0];

    // both bounding records hold the same values
    assert_eq!(area.bounding, vec![bounding(0)]);
    assert!(area.zones.iter().all(|z| z.bounding_id == Some(0)));

    // zone 0 uses record 10, zone 1 uses record 2, zone 2 fell back to black
    assert_eq!(area.backgrounds.len(), 2);
    assert_eq!(area.backgrounds[&0].params, [5, 0, 0]);
    assert_eq!(area.backgrounds[&1], Background::black(1));
    assert_eq!(
        area.zones.iter().map(|z| z.background_id).collect::<Vec<_>>(),
        vec![Some(0), Some(1), Some(1)]
    );

    // the legacy store is rewritten in the versioned format
    let table = block_table::decode(archive.lookup("course1.bin").unwrap(), Endian::Big).unwrap();
    assert!(table.metadata.starts_with(b"MD2_"));
    assert_eq!(area.metadata.text("Webpage").as_deref(), Some("example.org"));
    assert_eq!(table.blocks[12], &[0xC0, 0xFF, 0xEE, 0x00]);

    // a second save is a fixed point
    let again = reloaded.save_entries(Endian::Big).unwrap();
    let first: MemoryArchive = again.iter().cloned().collect();
    assert_eq!(first.lookup("course1.bin"), archive.lookup("course1.bin"));
}

#[test]
fn test_package_with_configured_unit_dir() {
    let dir = tempfile::tempdir().unwrap();
    let unit_dir = dir.path().join("Unit");
    std::fs::create_dir_all(&unit_dir).unwrap();
    std::fs::write(unit_dir.join("Pa0_jyotyu.szs"), b"Yaz0tileset").unwrap();

    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            "[tileset]\nunit_dir = {:?}\n\n[byte_order]\nread = \"little\"\nwrite = \"little\"\n",
            unit_dir.display().to_string()
        ),
    )
    .unwrap();
    let config = Config::load_from(&config_path);
    let resolver = UnitDirResolver::from_config(&config).unwrap();

    let level = Level::new("1-1");
    let bytes = level
        .save_package(&MemoryArchive::new(), &resolver, config.byte_order.write)
        .unwrap();

    let package = MemoryArchive::from_bytes(&bytes).unwrap();
    assert_eq!(package.lookup("Pa0_jyotyu"), Some(&b"Yaz0tileset"[..]));

    let inner = MemoryArchive::from_bytes(package.lookup("1-1").unwrap()).unwrap();
    let loaded = Level::load("1-1", &inner, config.byte_order.read).unwrap();
    assert_eq!(loaded.areas.len(), 1);
    assert_eq!(loaded.areas[0].tilesets.slots[0], "Pa0_jyotyu");
}

fn arb_sprite() -> impl Strategy<Value = Sprite> {
    (
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
        any::<[u8; 10]>(),
        any::<u8>(),
        any::<[u8; 2]>(),
    )
        .prop_map(|(sprite_type, x, y, settings, zone_id, reserved)| Sprite {
            sprite_type,
            x,
            y,
            settings,
            zone_id,
            layer: 0,
            reserved,
            initial_state: zone_id / 2,
        })
}

fn arb_entrance() -> impl Strategy<Value = Entrance> {
    (any::<u16>(), any::<u16>(), any::<i16>(), any::<u8>(), any::<u16>()).prop_map(
        |(x, y, camera_x, id, settings)| Entrance {
            x,
            y,
            camera_x,
            camera_y: -camera_x.saturating_abs(),
            id,
            dest_entrance: id.wrapping_add(1),
            settings,
            ..Default::default()
        },
    )
}

fn arb_location() -> impl Strategy<Value = Location> {
    (any::<u16>(), any::<u16>(), any::<u16>(), any::<u16>(), any::<u8>()).prop_map(
        |(x, y, width, height, id)| Location {
            x,
            y,
            width,
            height,
            id,
        },
    )
}

proptest! {
    #[test]
    fn prop_canonical_area_roundtrip(
        sprites in proptest::collection::vec(arb_sprite(), 0..20),
        entrances in proptest::collection::vec(arb_entrance(), 0..8),
        locations in proptest::collection::vec(arb_location(), 0..8),
        author in "[ -~]{0,24}",
        little in any::<bool>(),
    ) {
        let endian = if little { Endian::Little } else { Endian::Big };

        let mut area = Area::new(1);
        area.sprites = sprites;
        area.entrances = entrances;
        area.locations = locations;
        area.bounding = vec![bounding(0)];
        area.backgrounds = BTreeMap::from([(0, Background::black(0))]);
        area.zones = vec![zone_at(0, 0, 0, 0), zone_at(1, 0x400, 0, 0)];
        area.metadata = MetadataStore::new();
        if !author.is_empty() {
            area.metadata.set_text("Author", &author).unwrap();
        }

        let saved = area.save(endian).unwrap();
        let loaded = Area::load(1, &saved.course, [None; 3], endian).unwrap();
        prop_assert_eq!(loaded, area);
    }
}
