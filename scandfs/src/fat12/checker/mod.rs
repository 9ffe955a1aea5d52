// SPDX-License-Identifier: MIT

pub use crate::core::report::*;
use crate::core::{errors::*, tracker::RefTracker};
use crate::fat12::meta::Fat12Meta;
use scandio::prelude::*;

mod chain;
mod orphan;
mod walker;

/// Statistics collected over one repair run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunStats {
    pub dirs_visited: usize,
    pub entries_scanned: usize,
    pub files_checked: usize,
    pub entries_deleted: usize,
    pub sizes_corrected: usize,
    pub chains_truncated: usize,
    pub clusters_released: usize,
    pub orphans_recovered: usize,
}

/// One-pass FAT12 consistency checker and repairer.
///
/// Walks the directory tree while building the cluster reference map,
/// repairing chains and entries as it goes, then sweeps the FAT for
/// unreferenced chains and recovers them into the root directory.
pub struct Fat12Checker<'a, IO: BlockIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a Fat12Meta,
}

impl<'a, IO: BlockIO + ?Sized> Fat12Checker<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a Fat12Meta) -> Self {
        Self { io, meta }
    }

    pub fn run(&mut self, rep: &mut CheckReport) -> FsCheckerResult<RunStats> {
        let mut stats = RunStats::default();
        let total = self.meta.total_clusters();
        rep.push(Finding::info(
            "GEOMETRY",
            format!(
                "{total} clusters, {} bytes/cluster, {} FAT copies, {} root entries",
                self.meta.cluster_size(),
                self.meta.num_fats,
                self.meta.root_entry_count
            ),
        ));

        let mut tracker = RefTracker::new(total as usize);

        {
            let mut walker = walker::Fat12Walker::new(&mut *self.io, self.meta, &mut tracker);
            walker.walk_from_root(rep, &mut stats)?;
        }

        orphan::recover_orphans(self.io, self.meta, &mut tracker, rep, &mut stats)?;

        self.io.flush()?;

        rep.push(Finding::info(
            "DIR.WALK",
            format!(
                "Walked {} dirs, {} entries, {} files",
                stats.dirs_visited, stats.entries_scanned, stats.files_checked
            ),
        ));
        Ok(stats)
    }
}
