// SPDX-License-Identifier: MIT

use scandio::prelude::*;
use zerocopy::FromBytes;

use super::RunStats;
use super::chain::check_file_chain;
use crate::core::errors::*;
use crate::core::report::{CheckReport, Finding};
use crate::core::tracker::RefTracker;
use crate::fat12::attr::Fat12Attributes;
use crate::fat12::types::DirEntry;
use crate::fat12::{constant::*, fat, meta::Fat12Meta};

/// Directory tree walker.
///
/// Explicit worklist instead of call-stack recursion; the tracker's
/// already-claimed test is the sole cycle breaker.
pub(crate) struct Fat12Walker<'a, IO: BlockIO + ?Sized> {
    io: &'a mut IO,
    meta: &'a Fat12Meta,
    tracker: &'a mut RefTracker,
}

struct PendingDir {
    cluster: u16,
    path: String,
}

impl<'a, IO: BlockIO + ?Sized> Fat12Walker<'a, IO> {
    pub fn new(io: &'a mut IO, meta: &'a Fat12Meta, tracker: &'a mut RefTracker) -> Self {
        Self { io, meta, tracker }
    }

    pub fn walk_from_root(
        &mut self,
        rep: &mut CheckReport,
        stats: &mut RunStats,
    ) -> FsCheckerResult<()> {
        let mut pending: Vec<PendingDir> = Vec::new();

        // The root directory is a fixed region, not chain-linked.
        let root_offset = self.meta.root_dir_offset();
        let slots = self.meta.root_entry_count as usize;
        let mut data = vec![0u8; slots * FAT_DIRENT_SIZE];
        self.io.read_at(root_offset, &mut data)?;
        stats.dirs_visited += 1;
        self.scan_entries(&data, root_offset, "", rep, stats, &mut pending)?;

        while let Some(dir) = pending.pop() {
            stats.dirs_visited += 1;
            let clusters = self.claim_dir_chain(dir.cluster, &dir.path, rep, stats)?;
            let cs = self.meta.cluster_size() as usize;
            let mut buf = vec![0u8; cs];
            for &c in &clusters {
                let off = self.meta.cluster_offset(c);
                self.io.read_at(off, &mut buf)?;
                let end_of_dir =
                    self.scan_entries(&buf, off, &dir.path, rep, stats, &mut pending)?;
                if end_of_dir {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Classifies every entry of one directory region.
    ///
    /// Returns true when the unused-slot sentinel ended the scan.
    fn scan_entries(
        &mut self,
        data: &[u8],
        base_offset: u64,
        path: &str,
        rep: &mut CheckReport,
        stats: &mut RunStats,
        pending: &mut Vec<PendingDir>,
    ) -> FsCheckerResult<bool> {
        for (i, chunk) in data.chunks_exact(FAT_DIRENT_SIZE).enumerate() {
            let first = chunk[0];
            if first == FAT_ENTRY_END_OF_DIR {
                return Ok(true);
            }
            if first == FAT_ENTRY_DELETED || first == FAT_ENTRY_DOT {
                continue;
            }

            let attr = chunk[11];
            if Fat12Attributes::is_lfn(attr) {
                continue;
            }
            if attr & Fat12Attributes::VOLUME_ID.bits() != 0 {
                continue;
            }

            stats.entries_scanned += 1;
            let entry = DirEntry::read_from_bytes(chunk)
                .map_err(|_| FsCheckerError::Invalid("Directory entry decode failed"))?;
            let entry_offset = base_offset + (i * FAT_DIRENT_SIZE) as u64;
            let start = entry.start_cluster;
            let child_path = format!("{path}/{}", entry.display_name());

            if attr & Fat12Attributes::DIRECTORY.bits() != 0 {
                // Hidden directories stay untouched and are never entered.
                if attr & Fat12Attributes::HIDDEN.bits() != 0 {
                    continue;
                }
                if let Some(reason) = self.reject_reason(start) {
                    self.delete_entry(entry_offset, &child_path, reason, rep, stats)?;
                    continue;
                }
                self.tracker.mark(start);
                pending.push(PendingDir {
                    cluster: start,
                    path: child_path,
                });
            } else {
                if let Some(reason) = self.reject_reason(start) {
                    self.delete_entry(entry_offset, &child_path, reason, rep, stats)?;
                    continue;
                }
                stats.files_checked += 1;
                let declared = entry.file_size;
                if let Some(corrected) = check_file_chain(
                    self.io,
                    self.meta,
                    self.tracker,
                    start,
                    declared,
                    &child_path,
                    rep,
                    stats,
                )? {
                    self.io
                        .write_u32_at(entry_offset + FAT_DIRENT_SIZE_FIELD, corrected)?;
                    stats.sizes_corrected += 1;
                    rep.push(Finding::warn(
                        "CHAIN.SIZE",
                        format!("{child_path}: size {declared} -> {corrected}"),
                    ));
                }
            }
        }
        Ok(false)
    }

    /// The three-way rejection test for an entry's start cluster, widened
    /// to any index outside the data range.
    fn reject_reason(&self, start: u16) -> Option<&'static str> {
        if start == FAT_FREE_CLUSTER {
            Some("start cluster is free")
        } else if start == FAT_BAD_CLUSTER {
            Some("start cluster is bad")
        } else if !self.meta.is_valid_cluster(start) {
            Some("start cluster out of range")
        } else if self.tracker.is_marked(start) {
            Some("start cluster already referenced")
        } else {
            None
        }
    }

    fn delete_entry(
        &mut self,
        entry_offset: u64,
        path: &str,
        reason: &str,
        rep: &mut CheckReport,
        stats: &mut RunStats,
    ) -> FsCheckerResult<()> {
        self.io.write_at(entry_offset, &[FAT_ENTRY_DELETED])?;
        stats.entries_deleted += 1;
        rep.push(Finding::warn(
            "DIR.ENTRY",
            format!("{path}: entry removed ({reason})"),
        ));
        Ok(())
    }

    /// Claims and repairs a subdirectory's own cluster chain.
    ///
    /// The start cluster is already claimed by the parent scan. A bad/free
    /// successor cuts the chain like a file tail; a successor claimed
    /// elsewhere is a cross-link and cuts it too.
    fn claim_dir_chain(
        &mut self,
        start: u16,
        path: &str,
        rep: &mut CheckReport,
        stats: &mut RunStats,
    ) -> FsCheckerResult<Vec<u16>> {
        let mut clusters = vec![start];
        let mut cur = start;

        loop {
            let next = fat::read_entry(self.io, self.meta, cur)?;

            if next == FAT_BAD_CLUSTER || next == FAT_FREE_CLUSTER {
                fat::write_entry(self.io, self.meta, cur, FAT_EOC)?;
                stats.chains_truncated += 1;
                let kind = if next == FAT_BAD_CLUSTER { "bad" } else { "free" };
                rep.push(Finding::warn(
                    "CHAIN.TAIL",
                    format!("{path}: {kind} cluster follows directory cluster {cur}, chain terminated"),
                ));
                break;
            }

            if !self.meta.is_valid_cluster(next) {
                break;
            }

            if self.tracker.mark(next) {
                fat::write_entry(self.io, self.meta, cur, FAT_EOC)?;
                stats.chains_truncated += 1;
                rep.push(Finding::warn(
                    "CHAIN.XLINK",
                    format!("{path}: directory cluster {next} already in use, chain cut after {cur}"),
                ));
                break;
            }

            clusters.push(next);
            cur = next;
        }

        Ok(clusters)
    }
}
