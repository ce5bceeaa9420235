//! Network class partitioning axes
//!
//! Classes that travel over the wire are identified by a compact integer that
//! is only unique within a (group, type) pair. Groups are independent
//! networking domains; a class may belong to several groups at once. Types
//! separate ghosted objects, datablocks and events.

/// Number of network class groups
pub const NET_CLASS_GROUPS_COUNT: usize = 4;

/// Number of network class types
pub const NET_CLASS_TYPES_COUNT: usize = 3;

/// Network class group
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NetClassGroup {
    Game = 0,
    Community = 1,
    Group3 = 2,
    Group4 = 3,
}

impl NetClassGroup {
    /// All groups, in index order
    pub const ALL: [NetClassGroup; NET_CLASS_GROUPS_COUNT] =
        [Self::Game, Self::Community, Self::Group3, Self::Group4];

    /// Table index of this group
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-bit mask for this group
    pub const fn mask(self) -> u32 {
        1 << (self as u32)
    }
}

/// Network class type
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NetClassType {
    Object = 0,
    DataBlock = 1,
    Event = 2,
}

impl NetClassType {
    /// All types, in index order
    pub const ALL: [NetClassType; NET_CLASS_TYPES_COUNT] =
        [Self::Object, Self::DataBlock, Self::Event];

    /// Table index of this type
    pub const fn index(self) -> usize {
        self as usize
    }
}
