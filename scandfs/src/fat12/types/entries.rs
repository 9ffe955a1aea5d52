// SPDX-License-Identifier: MIT

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::fat12::attr::Fat12Attributes;
use crate::fat12::utils::{decode_sfn, fat_datetime_now};

/// One 32-byte short-name directory entry.
#[derive(IntoBytes, FromBytes, KnownLayout, Immutable, Copy, Clone, Debug)]
#[repr(C, packed)]
pub struct DirEntry {
    pub name: [u8; 8],
    pub ext: [u8; 3],
    pub attr: u8,
    pub reserved: u8,
    pub create_time_tenth: u8,
    pub create_time: u16,
    pub create_date: u16,
    pub access_date: u16,
    pub high_cluster: u16,
    pub write_time: u16,
    pub write_date: u16,
    pub start_cluster: u16,
    pub file_size: u32,
}

impl DirEntry {
    /// Builds a `FOUND<seq>.DAT` entry for a recovered orphan chain.
    pub fn recovered(seq: u32, start_cluster: u16, file_size: u32) -> Self {
        let mut name = [b' '; 8];
        let base = format!("FOUND{seq}");
        for (i, b) in base.bytes().take(8).enumerate() {
            name[i] = b;
        }
        let (date, time) = fat_datetime_now();

        Self {
            name,
            ext: *b"DAT",
            attr: Fat12Attributes::ARCHIVE.bits(),
            reserved: 0,
            create_time_tenth: 0,
            create_time: time,
            create_date: date,
            access_date: date,
            high_cluster: 0,
            write_time: time,
            write_date: date,
            start_cluster,
            file_size,
        }
    }

    /// Human-readable `NAME.EXT`, used in findings only.
    pub fn display_name(&self) -> String {
        let name = self.name;
        let ext = self.ext;
        decode_sfn(&name, &ext)
    }
}
