// SPDX-License-Identifier: MIT

//! Packed 12-bit FAT entry access.
//!
//! Entry `c` lives at byte offset `c * 3 / 2`: even entries occupy the low
//! 12 bits of the little-endian u16 at that offset, odd entries the high 12
//! bits. Writes preserve the neighbouring entry's nibble and are mirrored
//! to every FAT copy.

use scandio::prelude::*;

use crate::fat12::{constant::*, meta::Fat12Meta};

pub fn read_entry<IO: BlockIO + ?Sized>(
    io: &mut IO,
    meta: &Fat12Meta,
    cluster: u16,
) -> BlockIOResult<u16> {
    let raw = io.read_u16_at(meta.fat_entry_offset(cluster, 0))?;
    Ok(if cluster & 1 == 0 {
        raw & FAT12_MASK
    } else {
        raw >> 4
    })
}

pub fn write_entry<IO: BlockIO + ?Sized>(
    io: &mut IO,
    meta: &Fat12Meta,
    cluster: u16,
    value: u16,
) -> BlockIOResult {
    for copy in 0..meta.num_fats {
        let off = meta.fat_entry_offset(cluster, copy);
        let raw = io.read_u16_at(off)?;
        let merged = if cluster & 1 == 0 {
            (raw & 0xF000) | (value & FAT12_MASK)
        } else {
            (raw & 0x000F) | ((value & FAT12_MASK) << 4)
        };
        io.write_u16_at(off, merged)?;
    }
    Ok(())
}

/// Frees every cluster of the chain starting at `start`.
///
/// The successor is read before the entry is overwritten. Terminates on the
/// first non-data value; a cycle revisits its entry cluster once, reads the
/// FREE just written and ends. Returns the number of entries cleared.
pub fn release_chain<IO: BlockIO + ?Sized>(
    io: &mut IO,
    meta: &Fat12Meta,
    start: u16,
) -> BlockIOResult<usize> {
    let mut released = 0usize;
    let mut cur = start;
    while meta.is_valid_cluster(cur) {
        let next = read_entry(io, meta, cur)?;
        write_entry(io, meta, cur, FAT_FREE_CLUSTER)?;
        released += 1;
        cur = next;
    }
    Ok(released)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floppy_meta() -> Fat12Meta {
        Fat12Meta {
            bytes_per_sector: 512,
            sectors_per_cluster: 1,
            reserved_sectors: 1,
            num_fats: 2,
            fat_size_sectors: 1,
            root_entry_count: 16,
            total_sectors: 64,
        }
    }

    fn image() -> Vec<u8> {
        vec![0u8; 40 * 512]
    }

    #[test]
    fn test_rw_even_odd() {
        let meta = floppy_meta();
        let mut buf = image();
        let mut io = MemBlockIO::new(&mut buf);

        write_entry(&mut io, &meta, 2, 0xABC).unwrap();
        write_entry(&mut io, &meta, 3, 0x123).unwrap();

        assert_eq!(read_entry(&mut io, &meta, 2).unwrap(), 0xABC);
        assert_eq!(read_entry(&mut io, &meta, 3).unwrap(), 0x123);
    }

    #[test]
    fn test_write_preserves_neighbour() {
        let meta = floppy_meta();
        let mut buf = image();
        let mut io = MemBlockIO::new(&mut buf);

        write_entry(&mut io, &meta, 4, 0xFFF).unwrap();
        write_entry(&mut io, &meta, 5, 0x005).unwrap();
        assert_eq!(read_entry(&mut io, &meta, 4).unwrap(), 0xFFF);

        write_entry(&mut io, &meta, 4, 0x000).unwrap();
        assert_eq!(read_entry(&mut io, &meta, 5).unwrap(), 0x005);
    }

    #[test]
    fn test_write_mirrors_all_copies() {
        let meta = floppy_meta();
        let mut buf = image();
        {
            let mut io = MemBlockIO::new(&mut buf);
            write_entry(&mut io, &meta, 2, 0xFF8).unwrap();
        }
        // Entry 2 starts at byte 3 of each copy, low 12 bits
        let c0 = u16::from_le_bytes([buf[512 + 3], buf[512 + 4]]) & FAT12_MASK;
        let c1 = u16::from_le_bytes([buf[1024 + 3], buf[1024 + 4]]) & FAT12_MASK;
        assert_eq!(c0, 0xFF8);
        assert_eq!(c1, 0xFF8);
    }

    #[test]
    fn test_release_chain() {
        let meta = floppy_meta();
        let mut buf = image();
        let mut io = MemBlockIO::new(&mut buf);

        write_entry(&mut io, &meta, 10, 11).unwrap();
        write_entry(&mut io, &meta, 11, 12).unwrap();
        write_entry(&mut io, &meta, 12, FAT_EOC).unwrap();

        assert_eq!(release_chain(&mut io, &meta, 10).unwrap(), 3);
        assert_eq!(read_entry(&mut io, &meta, 10).unwrap(), FAT_FREE_CLUSTER);
        assert_eq!(read_entry(&mut io, &meta, 11).unwrap(), FAT_FREE_CLUSTER);
        assert_eq!(read_entry(&mut io, &meta, 12).unwrap(), FAT_FREE_CLUSTER);
    }

    #[test]
    fn test_release_chain_cycle_terminates() {
        let meta = floppy_meta();
        let mut buf = image();
        let mut io = MemBlockIO::new(&mut buf);

        write_entry(&mut io, &meta, 20, 21).unwrap();
        write_entry(&mut io, &meta, 21, 20).unwrap();

        // 20 is revisited once already freed; its entry then reads FREE
        // and the walk stops there.
        assert_eq!(release_chain(&mut io, &meta, 20).unwrap(), 3);
        assert_eq!(read_entry(&mut io, &meta, 20).unwrap(), FAT_FREE_CLUSTER);
        assert_eq!(read_entry(&mut io, &meta, 21).unwrap(), FAT_FREE_CLUSTER);
    }
}
