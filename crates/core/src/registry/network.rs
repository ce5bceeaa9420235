//! Network class partitioning
//!
//! Networked classes are split by (group, type). Within a partition each
//! class gets a dense 0-based ID in case-insensitive name order, so two
//! processes with the same class set agree on every ID. A partition of
//! `count` classes serializes IDs in `ceil(log2(count + 1))` bits.

use slotmap::SlotMap;
use tracing::debug;

use conobject_sdk::{NetClassGroup, NetClassType, NET_CLASS_GROUPS_COUNT, NET_CLASS_TYPES_COUNT};

use super::rep::{ClassId, ClassRep};

/// Class IDs for every (group, type) partition
#[derive(Debug, Default)]
pub struct NetClassTable {
    slots: [[Vec<ClassId>; NET_CLASS_TYPES_COUNT]; NET_CLASS_GROUPS_COUNT],
    bit_sizes: [[u32; NET_CLASS_TYPES_COUNT]; NET_CLASS_GROUPS_COUNT],
}

impl NetClassTable {
    /// Partition `order` and record each class's ID on its rep
    pub(crate) fn build(classes: &mut SlotMap<ClassId, ClassRep>, order: &[ClassId]) -> Self {
        let mut table = Self::default();

        for group in NetClassGroup::ALL {
            for class_type in NetClassType::ALL {
                let mut members: Vec<ClassId> = order
                    .iter()
                    .copied()
                    .filter(|&id| {
                        let rep = &classes[id];
                        rep.net_class_type == Some(class_type) && rep.net_groups.has_group(group)
                    })
                    .collect();
                members.sort_by_cached_key(|&id| classes[id].name.to_ascii_lowercase());

                for (index, &id) in members.iter().enumerate() {
                    classes[id].class_ids[group.index()] = Some(index as u32);
                }

                let bits = bit_size(members.len());
                if !members.is_empty() {
                    debug!(
                        "Net partition {:?}/{:?}: {} classes, {} bits",
                        group,
                        class_type,
                        members.len(),
                        bits
                    );
                }
                table.bit_sizes[group.index()][class_type.index()] = bits;
                table.slots[group.index()][class_type.index()] = members;
            }
        }

        table
    }

    /// Classes in a partition, in ID order
    pub fn classes(&self, group: NetClassGroup, class_type: NetClassType) -> &[ClassId] {
        &self.slots[group.index()][class_type.index()]
    }

    pub fn count(&self, group: NetClassGroup, class_type: NetClassType) -> usize {
        self.classes(group, class_type).len()
    }

    /// Bits needed to send an ID of this partition
    pub fn bit_size(&self, group: NetClassGroup, class_type: NetClassType) -> u32 {
        self.bit_sizes[group.index()][class_type.index()]
    }

    /// Class holding `id` in a partition
    pub fn class_at(&self, group: NetClassGroup, class_type: NetClassType, id: u32) -> Option<ClassId> {
        self.classes(group, class_type).get(id as usize).copied()
    }
}

fn bit_size(count: usize) -> u32 {
    (count + 1).next_power_of_two().trailing_zeros()
}
