//! Save-time canonicalization of zone bounding and background references
//!
//! Zones point at bounding and background records by id. Editing leaves
//! those ids sparse, duplicated or dangling, so before a save every record
//! actually referenced is grouped by value (ids ignored), the groups are
//! ordered by the smallest id of the zones using them, and each zone is
//! rewritten to its group's position in that order.
//!
//! The pass is pure and idempotent: running it on its own output changes
//! nothing. It fails only when a registry would need more ids than a `u16`
//! holds.

use std::collections::BTreeMap;

use hashbrown::HashMap;

use crate::error::FormatError;
use crate::records::{Background, Bounding, Zone};

/// Zones with dense, canonical bounding and background registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneLayout {
    /// Input zones with rewritten references and coordinates clamped to 0
    pub zones: Vec<Zone>,
    /// Record `i` has id `i`
    pub bounding: Vec<Bounding>,
    /// Keys are `0..len`, each record's id equals its key
    pub backgrounds: BTreeMap<u16, Background>,
}

impl ZoneLayout {
    /// Optimize this layout again; returns an equal layout.
    pub fn optimize(&self) -> Result<ZoneLayout, FormatError> {
        optimize(&self.zones, &self.bounding, &self.backgrounds)
    }
}

/// Value of a bounding record without its id
type BoundingKey = (i32, i32, i32, i32, u16);
/// Value of a background record without its id
type BackgroundKey = ([u16; 3], [u8; 16], u8);

fn bounding_key(b: &Bounding) -> BoundingKey {
    (b.upper, b.lower, b.upper_2, b.lower_2, b.flags)
}

fn background_key(b: &Background) -> BackgroundKey {
    (b.params, b.name, b.flag)
}

/// Distinct values in first-appearance order, each with the smallest
/// zone id that uses it.
struct Groups<K, R> {
    index: HashMap<K, usize>,
    groups: Vec<(u8, R)>,
}

impl<K: std::hash::Hash + Eq, R> Groups<K, R> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    /// Returns the group number of `key`.
    fn add(&mut self, key: K, record: R, zone_id: u8) -> usize {
        if let Some(&group) = self.index.get(&key) {
            let min = &mut self.groups[group].0;
            *min = (*min).min(zone_id);
            return group;
        }
        let group = self.groups.len();
        self.index.insert(key, group);
        self.groups.push((zone_id, record));
        group
    }

    /// Sorts groups by minimum zone id, stable on ties.
    /// Returns the records in order plus the canonical index of every group.
    fn finish(self, field: &'static str) -> Result<(Vec<R>, Vec<u16>), FormatError> {
        let mut order: Vec<usize> = (0..self.groups.len()).collect();
        order.sort_by_key(|&group| self.groups[group].0);

        let mut canonical = vec![0u16; order.len()];
        for (position, &group) in order.iter().enumerate() {
            canonical[group] = u16::try_from(position).map_err(|_| FormatError::OutOfRange {
                field,
                value: position as i64,
            })?;
        }

        let mut slots: Vec<Option<R>> = self.groups.into_iter().map(|(_, r)| Some(r)).collect();
        let records = order
            .iter()
            .filter_map(|&group| slots[group].take())
            .collect();
        Ok((records, canonical))
    }
}

/// Canonicalize the references of `zones`.
///
/// A bounding reference resolves to the last record with that id; a
/// reference that resolves to nothing groups as the all-zero record. A
/// background reference missing from `backgrounds` groups as the plain
/// black background. Records no zone uses are dropped.
///
/// Fails with [`FormatError::OutOfRange`] when there are more distinct
/// records than `u16` ids.
pub fn optimize(
    zones: &[Zone],
    bounding: &[Bounding],
    backgrounds: &BTreeMap<u16, Background>,
) -> Result<ZoneLayout, FormatError> {
    let mut bounding_by_id: HashMap<u16, Bounding> = HashMap::new();
    for record in bounding {
        bounding_by_id.insert(record.id, *record);
    }

    let mut bounding_groups = Groups::new();
    let mut background_groups = Groups::new();
    let mut members = Vec::with_capacity(zones.len());

    for zone in zones {
        let b = zone
            .bounding_id
            .and_then(|id| bounding_by_id.get(&id).copied())
            .unwrap_or_default();
        let bg = zone
            .background_id
            .and_then(|id| backgrounds.get(&id).copied())
            .unwrap_or_else(|| Background::black(0));

        let b_group = bounding_groups.add(bounding_key(&b), b, zone.id);
        let bg_group = background_groups.add(background_key(&bg), bg, zone.id);
        members.push((b_group, bg_group));
    }

    let (bounding, b_index) = bounding_groups.finish("bounding id")?;
    let (backgrounds, bg_index) = background_groups.finish("background id")?;

    let zones = zones
        .iter()
        .zip(&members)
        .map(|(zone, &(b_group, bg_group))| Zone {
            x: zone.x.max(0),
            y: zone.y.max(0),
            bounding_id: Some(b_index[b_group]),
            background_id: Some(bg_index[bg_group]),
            ..*zone
        })
        .collect();

    Ok(ZoneLayout {
        zones,
        bounding: (0u16..).zip(bounding).map(|(i, b)| b.with_id(i)).collect(),
        backgrounds: (0u16..)
            .zip(backgrounds)
            .map(|(i, bg)| (i, bg.with_id(i)))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn zone(id: u8, bounding_id: u16, background_id: u16) -> Zone {
        Zone {
            id,
            bounding_id: Some(bounding_id),
            background_id: Some(background_id),
            width: 64,
            height: 32,
            ..Default::default()
        }
    }

    fn bounds(id: u16, upper: i32) -> Bounding {
        Bounding {
            upper,
            lower: -upper,
            id,
            ..Default::default()
        }
    }

    fn sky(id: u16, param: u16) -> Background {
        Background {
            params: [param, 0, 0],
            ..Background::black(id)
        }
    }

    #[test]
    fn test_groups_ordered_by_lowest_zone_id() {
        // zones 5 and 2 share values under different ids
        let zones = [zone(5, 40, 0), zone(7, 41, 0), zone(2, 42, 0)];
        let bounding = [bounds(40, 64), bounds(41, 128), bounds(42, 64)];
        let backgrounds = BTreeMap::from([(0, Background::black(0))]);

        let layout = optimize(&zones, &bounding, &backgrounds).unwrap();

        assert_eq!(layout.bounding, vec![bounds(0, 64), bounds(1, 128)]);
        assert_eq!(layout.zones[0].bounding_id, Some(0));
        assert_eq!(layout.zones[1].bounding_id, Some(1));
        assert_eq!(layout.zones[2].bounding_id, Some(0));
    }

    #[test]
    fn test_background_grouping_ignores_id() {
        let zones = [zone(3, 0, 9), zone(7, 0, 4)];
        let bounding = [bounds(0, 0)];
        let backgrounds = BTreeMap::from([(4, sky(4, 1)), (9, sky(9, 2))]);

        let layout = optimize(&zones, &bounding, &backgrounds).unwrap();

        assert_eq!(layout.backgrounds.len(), 2);
        assert_eq!(layout.backgrounds[&0], sky(0, 2));
        assert_eq!(layout.backgrounds[&1], sky(1, 1));
        assert_eq!(layout.zones[0].background_id, Some(0));
        assert_eq!(layout.zones[1].background_id, Some(1));
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let zones = [zone(1, 0, 0), zone(1, 1, 0)];
        let bounding = [bounds(0, 10), bounds(1, 20)];
        let layout = optimize(&zones, &bounding, &BTreeMap::new()).unwrap();
        assert_eq!(layout.bounding, vec![bounds(0, 10), bounds(1, 20)]);
    }

    #[test]
    fn test_last_duplicate_bounding_id_wins() {
        let zones = [zone(0, 6, 0)];
        let bounding = [bounds(6, 10), bounds(6, 99)];
        let layout = optimize(&zones, &bounding, &BTreeMap::new()).unwrap();
        assert_eq!(layout.bounding, vec![bounds(0, 99)]);
    }

    #[test]
    fn test_unresolved_references() {
        let mut dangling = zone(0, 0, 0);
        dangling.bounding_id = None;
        dangling.background_id = Some(77);

        let layout = optimize(&[dangling], &[], &BTreeMap::new()).unwrap();

        assert_eq!(layout.bounding, vec![Bounding::default()]);
        assert_eq!(layout.backgrounds[&0], Background::black(0));
        assert_eq!(layout.zones[0].bounding_id, Some(0));
        assert_eq!(layout.zones[0].background_id, Some(0));
    }

    #[test]
    fn test_unused_records_dropped_and_coordinates_clamped() {
        let mut z = zone(0, 1, 0);
        z.x = -16;
        z.y = 48;
        let bounding = [bounds(0, 1), bounds(1, 2), bounds(2, 3)];

        let layout = optimize(&[z], &bounding, &BTreeMap::new()).unwrap();

        assert_eq!(layout.bounding, vec![bounds(0, 2)]);
        assert_eq!((layout.zones[0].x, layout.zones[0].y), (0, 48));
    }

    #[test]
    fn test_input_is_untouched() {
        let mut z = zone(4, 9, 9);
        z.x = -1;
        let zones = vec![z];
        let before = zones.clone();
        optimize(&zones, &[bounds(9, 1)], &BTreeMap::new()).unwrap();
        assert_eq!(zones, before);
    }

    #[test]
    fn test_no_zones() {
        let backgrounds = BTreeMap::from([(0, Background::black(0))]);
        let layout = optimize(&[], &[bounds(0, 1)], &backgrounds).unwrap();
        assert!(layout.zones.is_empty());
        assert!(layout.bounding.is_empty());
        assert!(layout.backgrounds.is_empty());
    }

    #[test]
    fn test_too_many_distinct_records() {
        // 65536 distinct ids plus the zero record for the unresolved zone
        let bounding: Vec<Bounding> = (0..=u16::MAX)
            .map(|id| bounds(id, i32::from(id) + 1))
            .collect();
        let mut zones: Vec<Zone> = (0..=u16::MAX).map(|id| zone(0, id, 0)).collect();
        let mut unresolved = zone(0, 0, 0);
        unresolved.bounding_id = None;
        zones.push(unresolved);

        assert_eq!(
            optimize(&zones, &bounding, &BTreeMap::new()),
            Err(FormatError::OutOfRange {
                field: "bounding id",
                value: 65536,
            })
        );

        // one fewer distinct record still fits
        zones.pop();
        let layout = optimize(&zones, &bounding, &BTreeMap::new()).unwrap();
        assert_eq!(layout.bounding.len(), 65536);
        assert_eq!(layout.bounding[65535].id, u16::MAX);
    }

    fn arb_zone() -> impl Strategy<Value = Zone> {
        (
            any::<u8>(),
            proptest::option::of(0u16..6),
            proptest::option::of(0u16..6),
            -50i32..50,
            -50i32..50,
        )
            .prop_map(|(id, bounding_id, background_id, x, y)| Zone {
                id,
                bounding_id,
                background_id,
                x,
                y,
                ..Default::default()
            })
    }

    proptest! {
        #[test]
        fn prop_optimize_is_idempotent(
            zones in proptest::collection::vec(arb_zone(), 0..12),
            uppers in proptest::collection::vec(0i32..3, 6),
            params in proptest::collection::vec(0u16..3, 6),
        ) {
            let bounding: Vec<Bounding> = uppers
                .iter()
                .enumerate()
                .map(|(i, &u)| bounds(i as u16, u))
                .collect();
            let backgrounds: BTreeMap<u16, Background> = params
                .iter()
                .enumerate()
                .map(|(i, &p)| (i as u16, sky(i as u16, p)))
                .collect();

            let once = optimize(&zones, &bounding, &backgrounds).unwrap();
            prop_assert_eq!(once.optimize().unwrap(), once.clone());

            // dense ids, every zone resolved
            for (i, b) in once.bounding.iter().enumerate() {
                prop_assert_eq!(b.id as usize, i);
            }
            for (i, (&key, bg)) in once.backgrounds.iter().enumerate() {
                prop_assert_eq!(key as usize, i);
                prop_assert_eq!(bg.id, key);
            }
            for z in &once.zones {
                prop_assert!((z.bounding_id.unwrap() as usize) < once.bounding.len());
                prop_assert!(once.backgrounds.contains_key(&z.background_id.unwrap()));
                prop_assert!(z.x >= 0 && z.y >= 0);
            }
        }

        #[test]
        fn prop_optimize_is_deterministic(zones in proptest::collection::vec(arb_zone(), 0..12)) {
            let bounding: Vec<Bounding> = (0..6).map(|i| bounds(i, i32::from(i % 2))).collect();
            let a = optimize(&zones, &bounding, &BTreeMap::new()).unwrap();
            let b = optimize(&zones, &bounding, &BTreeMap::new()).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
