// SPDX-License-Identifier: MIT

// === Disk Layout Parameters ===

pub const FAT_SECTOR_SIZE_MIN: u16 = 128; // BPB_BytsPerSec lower bound
pub const FAT_SIGNATURE: [u8; 2] = [0x55, 0xAA]; // boot sector signature

// === FAT Region Parameters ===

pub const FAT12_MASK: u16 = 0x0FFF;
pub const FAT_FREE_CLUSTER: u16 = 0x000;
pub const FAT_FIRST_CLUSTER: u16 = 2;
pub const FAT_RESERVED_START: u16 = 0xFF0;
pub const FAT_RESERVED_END: u16 = 0xFF6;
pub const FAT_BAD_CLUSTER: u16 = 0xFF7;
pub const FAT_EOC_START: u16 = 0xFF8; // end-of-chain range 0xFF8..=0xFFF
pub const FAT_EOC: u16 = 0xFFF; // terminal value written back

/// Volumes with this many clusters or more are FAT16/FAT32, not FAT12.
pub const FAT12_MAX_CLUSTERS: u32 = 0xFF5;

// === Directory Entries ===

pub const FAT_DIRENT_SIZE: usize = 32;
pub const FAT_ENTRY_END_OF_DIR: u8 = 0x00;
pub const FAT_ENTRY_DELETED: u8 = 0xE5;
pub const FAT_ENTRY_DOT: u8 = 0x2E;
/// Byte offset of the 32-bit size field inside a directory entry.
pub const FAT_DIRENT_SIZE_FIELD: u64 = 28;

/// Start-cluster value that denotes the fixed root directory region.
pub const FAT_ROOT_DIR_CLUSTER: u16 = 0;
