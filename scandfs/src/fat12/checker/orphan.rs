// SPDX-License-Identifier: MIT

use scandio::prelude::*;

use super::RunStats;
use crate::core::errors::*;
use crate::core::report::{CheckReport, Finding};
use crate::core::tracker::RefTracker;
use crate::fat12::types::DirEntry;
use crate::fat12::{constant::*, fat, meta::Fat12Meta};

/// Reassembles FAT links between unreferenced clusters into chains.
///
/// Head/tail-only merging: a link whose partner is the interior of a known
/// chain cannot merge and opens a separate fragment. Correct for links
/// discovered in ascending order, which the FAT sweep guarantees.
pub(crate) struct ChainIndex {
    chains: Vec<Vec<u16>>,
}

impl ChainIndex {
    pub fn new() -> Self {
        Self { chains: Vec::new() }
    }

    pub fn link(&mut self, prev: u16, next: u16) {
        if let Some(chain) = self.chains.iter_mut().find(|c| c.last() == Some(&prev)) {
            chain.push(next);
            return;
        }
        if let Some(chain) = self.chains.iter_mut().find(|c| c.first() == Some(&next)) {
            chain.insert(0, prev);
            return;
        }
        self.chains.push(vec![prev, next]);
    }

    pub fn into_chains(self) -> Vec<Vec<u16>> {
        self.chains
    }
}

/// Sweeps the FAT for allocated-but-unreachable chains and recovers each
/// one as a `FOUND<n>.DAT` entry in the root directory.
pub(crate) fn recover_orphans<IO: BlockIO + ?Sized>(
    io: &mut IO,
    meta: &Fat12Meta,
    tracker: &mut RefTracker,
    rep: &mut CheckReport,
    stats: &mut RunStats,
) -> FsCheckerResult<()> {
    let mut index = ChainIndex::new();

    for c in FAT_FIRST_CLUSTER..meta.total_clusters() {
        if tracker.is_marked(c) {
            continue;
        }
        let v = fat::read_entry(io, meta, c)?;

        // Only live links matter here. A cluster whose entry is FREE,
        // reserved or terminal has no successor to track; it can still be
        // picked up as the head of a chain below.
        if v == FAT_FREE_CLUSTER
            || (FAT_RESERVED_START..=FAT_RESERVED_END).contains(&v)
            || v >= FAT_EOC_START
        {
            continue;
        }

        // A successor that is bad, or points back into live data, ends
        // the orphan chain at this cluster.
        let next = if v == FAT_BAD_CLUSTER || !meta.is_valid_cluster(v) || tracker.is_marked(v) {
            FAT_EOC
        } else {
            v
        };
        index.link(c, next);
        tracker.mark(c);
    }

    let cs = meta.cluster_size();
    let mut seq = 1u32;
    for mut chain in index.into_chains() {
        let Some(&tail) = chain.last() else { continue };

        // A chain without a terminal gets a synthetic one; it contributes
        // no bytes to the recovered size.
        if tail < FAT_EOC_START && fat::read_entry(io, meta, tail)? < FAT_EOC_START {
            chain.push(FAT_EOC);
        }

        let start = chain[0];
        let size = (chain.len() as u32 - 1).saturating_mul(cs);
        let Some(slot) = find_recovery_slot(io, meta)? else {
            rep.push(Finding::err(
                "ROOT.FULL",
                format!("no free root slot for orphan chain at cluster {start}"),
            ));
            return Err(FsCheckerError::RootDirFull);
        };

        let entry = DirEntry::recovered(seq, start, size);
        io.write_struct(meta.root_entry_offset(slot), &entry)?;

        // Keep the used-prefix invariant for scanners that stop at the
        // first unused slot.
        if slot + 1 < meta.root_entry_count as usize {
            io.write_at(meta.root_entry_offset(slot + 1), &[FAT_ENTRY_END_OF_DIR])?;
        }

        stats.orphans_recovered += 1;
        rep.push(Finding::warn(
            "FAT.ORPHAN",
            format!(
                "recovered {} cluster chain at {start} as FOUND{seq}.DAT ({size} bytes)",
                chain.len() - 1
            ),
        ));
        seq += 1;
    }

    Ok(())
}

/// First unused or deleted root slot, if any.
fn find_recovery_slot<IO: BlockIO + ?Sized>(
    io: &mut IO,
    meta: &Fat12Meta,
) -> FsCheckerResult<Option<usize>> {
    let mut first = [0u8; 1];
    for slot in 0..meta.root_entry_count as usize {
        io.read_at(meta.root_entry_offset(slot), &mut first)?;
        if first[0] == FAT_ENTRY_END_OF_DIR || first[0] == FAT_ENTRY_DELETED {
            return Ok(Some(slot));
        }
    }
    Ok(None)
}
