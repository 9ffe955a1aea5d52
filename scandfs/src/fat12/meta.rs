// SPDX-License-Identifier: MIT

use crate::fat12::constant::*;
use crate::fat12::types::Fat12Bpb;

/// Volume geometry derived from the BPB.
///
/// All byte offsets used by the checker come from here; nothing else does
/// address arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fat12Meta {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub num_fats: u8,
    pub fat_size_sectors: u16,
    pub root_entry_count: u16,
    pub total_sectors: u32,
}

impl Fat12Meta {
    pub fn from_bpb(bpb: &Fat12Bpb) -> Self {
        let total_16 = bpb.total_sectors_16;
        let total_32 = bpb.total_sectors_32;
        Self {
            bytes_per_sector: bpb.bytes_per_sector,
            sectors_per_cluster: bpb.sectors_per_cluster,
            reserved_sectors: bpb.reserved_sectors,
            num_fats: bpb.num_fats,
            fat_size_sectors: bpb.fat_size_16,
            root_entry_count: bpb.root_entry_count,
            total_sectors: if total_16 != 0 {
                total_16 as u32
            } else {
                total_32
            },
        }
    }

    #[inline]
    pub fn cluster_size(&self) -> u32 {
        self.bytes_per_sector as u32 * self.sectors_per_cluster as u32
    }

    #[inline]
    pub fn total_clusters(&self) -> u16 {
        (self.total_sectors / self.sectors_per_cluster as u32).min(FAT12_MAX_CLUSTERS) as u16
    }

    /// Byte offset of FAT copy `copy` (0-based).
    #[inline]
    pub fn fat_offset(&self, copy: u8) -> u64 {
        (self.reserved_sectors as u64 + copy as u64 * self.fat_size_sectors as u64)
            * self.bytes_per_sector as u64
    }

    /// Byte offset of the packed 12-bit entry for `cluster` in FAT copy `copy`.
    #[inline]
    pub fn fat_entry_offset(&self, cluster: u16, copy: u8) -> u64 {
        self.fat_offset(copy) + (cluster as u64 * 3) / 2
    }

    #[inline]
    pub fn root_dir_offset(&self) -> u64 {
        self.fat_offset(self.num_fats)
    }

    #[inline]
    pub fn root_entry_offset(&self, slot: usize) -> u64 {
        self.root_dir_offset() + (slot * FAT_DIRENT_SIZE) as u64
    }

    #[inline]
    pub fn data_offset(&self) -> u64 {
        self.root_dir_offset() + self.root_entry_count as u64 * FAT_DIRENT_SIZE as u64
    }

    /// Byte offset of `cluster`. Cluster 0 denotes the fixed root region.
    #[inline]
    pub fn cluster_offset(&self, cluster: u16) -> u64 {
        if cluster == FAT_ROOT_DIR_CLUSTER {
            self.root_dir_offset()
        } else {
            self.data_offset() + (cluster as u64 - FAT_FIRST_CLUSTER as u64) * self.cluster_size() as u64
        }
    }

    /// True iff `cluster` is a data-range index, not a FAT marker value.
    #[inline]
    pub fn is_valid_cluster(&self, cluster: u16) -> bool {
        cluster >= FAT_FIRST_CLUSTER
            && cluster < self.total_clusters()
            && cluster < FAT_RESERVED_START
    }
}
