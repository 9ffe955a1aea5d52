// SPDX-License-Identifier: MIT

//! Minimal FAT12 floppy image builder for checker tests.

use scandfs::fat12::prelude::*;
use scandfs::{CheckReport, FsCheckerResult};
use scandio::prelude::*;
use zerocopy::{FromBytes, FromZeros, IntoBytes};

pub const BPS: usize = 512;
pub const CLUSTER_SIZE: u32 = 512;
pub const ROOT_ENTRIES: usize = 16;

pub struct ImageBuilder {
    pub buf: Vec<u8>,
    pub meta: Fat12Meta,
}

impl ImageBuilder {
    /// 64-sector single-FAT-sector volume: 1 reserved sector, 2 FAT
    /// copies, 16 root entries, 512-byte clusters.
    pub fn small_floppy() -> Self {
        let meta = Fat12Meta {
            bytes_per_sector: BPS as u16,
            sectors_per_cluster: 1,
            reserved_sectors: 1,
            num_fats: 2,
            fat_size_sectors: 1,
            root_entry_count: ROOT_ENTRIES as u16,
            total_sectors: 64,
        };

        let mut bpb = Fat12Bpb::new_zeroed();
        bpb.bytes_per_sector = BPS as u16;
        bpb.sectors_per_cluster = 1;
        bpb.reserved_sectors = 1;
        bpb.num_fats = 2;
        bpb.root_entry_count = ROOT_ENTRIES as u16;
        bpb.total_sectors_16 = 64;
        bpb.media = 0xF0;
        bpb.fat_size_16 = 1;
        bpb.signature = FAT_SIGNATURE;

        let mut buf = vec![0u8; 80 * BPS];
        buf[..BPS].copy_from_slice(bpb.as_bytes());

        let mut b = Self { buf, meta };
        // Reserved FAT entries 0 and 1 (media descriptor, terminal)
        b.set_fat(0, 0xFF0);
        b.set_fat(1, FAT_EOC);
        b
    }

    pub fn set_fat(&mut self, cluster: u16, value: u16) {
        for copy in 0..self.meta.num_fats {
            let off = self.meta.fat_entry_offset(cluster, copy) as usize;
            let raw = u16::from_le_bytes([self.buf[off], self.buf[off + 1]]);
            let merged = if cluster & 1 == 0 {
                (raw & 0xF000) | (value & FAT12_MASK)
            } else {
                (raw & 0x000F) | ((value & FAT12_MASK) << 4)
            };
            self.buf[off..off + 2].copy_from_slice(&merged.to_le_bytes());
        }
    }

    pub fn get_fat(&self, cluster: u16) -> u16 {
        let off = self.meta.fat_entry_offset(cluster, 0) as usize;
        let raw = u16::from_le_bytes([self.buf[off], self.buf[off + 1]]);
        if cluster & 1 == 0 {
            raw & FAT12_MASK
        } else {
            raw >> 4
        }
    }

    /// Links the clusters in order, terminating the last one.
    pub fn chain(&mut self, clusters: &[u16]) {
        for w in clusters.windows(2) {
            self.set_fat(w[0], w[1]);
        }
        if let Some(&last) = clusters.last() {
            self.set_fat(last, FAT_EOC);
        }
    }

    fn make_entry(name: &str, ext: &str, attr: u8, start: u16, size: u32) -> DirEntry {
        let mut e = DirEntry::new_zeroed();
        e.name = [b' '; 8];
        e.ext = [b' '; 3];
        e.name[..name.len()].copy_from_slice(name.as_bytes());
        e.ext[..ext.len()].copy_from_slice(ext.as_bytes());
        e.attr = attr;
        e.start_cluster = start;
        e.file_size = size;
        e
    }

    pub fn root_entry(&mut self, slot: usize, name: &str, ext: &str, attr: u8, start: u16, size: u32) {
        let off = self.meta.root_entry_offset(slot) as usize;
        let e = Self::make_entry(name, ext, attr, start, size);
        self.buf[off..off + FAT_DIRENT_SIZE].copy_from_slice(e.as_bytes());
    }

    /// Writes an entry into slot `slot` of a directory data cluster.
    pub fn dir_entry(
        &mut self,
        dir_cluster: u16,
        slot: usize,
        name: &str,
        ext: &str,
        attr: u8,
        start: u16,
        size: u32,
    ) {
        let off = self.meta.cluster_offset(dir_cluster) as usize + slot * FAT_DIRENT_SIZE;
        let e = Self::make_entry(name, ext, attr, start, size);
        self.buf[off..off + FAT_DIRENT_SIZE].copy_from_slice(e.as_bytes());
    }

    /// Convenience: file entry in the root plus its FAT chain.
    pub fn file(&mut self, slot: usize, name: &str, clusters: &[u16], size: u32) {
        self.chain(clusters);
        self.root_entry(slot, name, "TXT", Fat12Attributes::ARCHIVE.bits(), clusters[0], size);
    }

    pub fn root_slot(&self, slot: usize) -> DirEntry {
        let off = self.meta.root_entry_offset(slot) as usize;
        DirEntry::read_from_bytes(&self.buf[off..off + FAT_DIRENT_SIZE]).unwrap()
    }

    pub fn root_slot_first_byte(&self, slot: usize) -> u8 {
        self.buf[self.meta.root_entry_offset(slot) as usize]
    }

    pub fn run(&mut self) -> (FsCheckerResult<RunStats>, CheckReport) {
        let mut rep = CheckReport::default();
        let meta = self.meta;
        let mut io = MemBlockIO::new(&mut self.buf);
        let res = Fat12Checker::new(&mut io, &meta).run(&mut rep);
        (res, rep)
    }

    pub fn run_ok(&mut self) -> (RunStats, CheckReport) {
        let (res, rep) = self.run();
        (res.expect("checker run failed"), rep)
    }
}
