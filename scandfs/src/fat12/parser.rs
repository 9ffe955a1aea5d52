// SPDX-License-Identifier: MIT

use scandio::prelude::*;

use crate::core::errors::*;
use crate::ensure;
use crate::fat12::{constant::*, meta::Fat12Meta, types::Fat12Bpb};

/// Reads the boot sector and validates it into a [`Fat12Meta`].
///
/// A structurally invalid boot sector is fatal: nothing downstream can
/// locate the FAT or the root directory without a sane geometry.
pub fn parse_boot<IO: BlockIO + ?Sized>(io: &mut IO) -> FsParsingResult<Fat12Meta> {
    let bpb: Fat12Bpb = io.read_struct(0)?;

    let signature = bpb.signature;
    ensure!(
        signature == FAT_SIGNATURE,
        FsParsingError::Invalid("Missing 0x55AA boot signature")
    );

    let bps = bpb.bytes_per_sector;
    ensure!(
        bps >= FAT_SECTOR_SIZE_MIN && bps.is_power_of_two(),
        FsParsingError::Invalid("Bytes per sector not a power of two")
    );

    let spc = bpb.sectors_per_cluster;
    ensure!(
        spc != 0 && spc.is_power_of_two(),
        FsParsingError::Invalid("Sectors per cluster not a power of two")
    );

    let reserved = bpb.reserved_sectors;
    ensure!(
        reserved != 0,
        FsParsingError::Invalid("Zero reserved sectors")
    );

    let num_fats = bpb.num_fats;
    ensure!(num_fats != 0, FsParsingError::Invalid("Zero FAT copies"));

    let fat_size = bpb.fat_size_16;
    ensure!(fat_size != 0, FsParsingError::Invalid("Zero FAT size"));

    let root_entries = bpb.root_entry_count;
    ensure!(
        root_entries != 0,
        FsParsingError::Invalid("Zero root directory entries")
    );

    let meta = Fat12Meta::from_bpb(&bpb);
    ensure!(
        meta.total_sectors != 0,
        FsParsingError::Invalid("Zero total sectors")
    );
    ensure!(
        (meta.total_sectors / spc as u32) < FAT12_MAX_CLUSTERS,
        FsParsingError::Unsupported
    );

    // Each FAT copy must hold 12 bits for every addressable cluster.
    let fat_bytes = fat_size as u64 * bps as u64;
    ensure!(
        fat_bytes * 2 / 3 >= meta.total_clusters() as u64,
        FsParsingError::Invalid("FAT too small for cluster count")
    );

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zerocopy::{FromZeros, IntoBytes};

    fn valid_bpb() -> Fat12Bpb {
        let mut bpb = Fat12Bpb::new_zeroed();
        bpb.bytes_per_sector = 512;
        bpb.sectors_per_cluster = 1;
        bpb.reserved_sectors = 1;
        bpb.num_fats = 2;
        bpb.root_entry_count = 16;
        bpb.total_sectors_16 = 64;
        bpb.fat_size_16 = 1;
        bpb.signature = FAT_SIGNATURE;
        bpb
    }

    fn parse(bpb: &Fat12Bpb) -> FsParsingResult<Fat12Meta> {
        let mut buf = vec![0u8; 1024];
        buf[..512].copy_from_slice(bpb.as_bytes());
        let mut io = MemBlockIO::new(&mut buf);
        parse_boot(&mut io)
    }

    #[test]
    fn test_parse_valid() {
        let meta = parse(&valid_bpb()).unwrap();
        assert_eq!(meta.total_clusters(), 64);
        assert_eq!(meta.cluster_size(), 512);
        assert_eq!(meta.root_dir_offset(), 1536);
    }

    #[test]
    fn test_rejects_missing_signature() {
        let mut bpb = valid_bpb();
        bpb.signature = [0, 0];
        assert_eq!(
            parse(&bpb),
            Err(FsParsingError::Invalid("Missing 0x55AA boot signature"))
        );
    }

    #[test]
    fn test_rejects_bad_sector_size() {
        let mut bpb = valid_bpb();
        bpb.bytes_per_sector = 513;
        assert!(parse(&bpb).is_err());
    }

    #[test]
    fn test_rejects_fat16_cluster_count() {
        let mut bpb = valid_bpb();
        bpb.total_sectors_16 = 0;
        bpb.total_sectors_32 = 40_000;
        bpb.fat_size_16 = 12;
        assert_eq!(parse(&bpb), Err(FsParsingError::Unsupported));
    }

    #[test]
    fn test_rejects_undersized_fat() {
        let mut bpb = valid_bpb();
        bpb.bytes_per_sector = 128;
        // 64 clusters need 96 bytes of FAT, one 128-byte sector fits;
        // but 512 sectors do not
        bpb.total_sectors_16 = 512;
        assert_eq!(
            parse(&bpb),
            Err(FsParsingError::Invalid("FAT too small for cluster count"))
        );
    }
}
