// SPDX-License-Identifier: MIT

use scandio::prelude::*;

use super::RunStats;
use crate::core::errors::*;
use crate::core::report::{CheckReport, Finding};
use crate::core::tracker::RefTracker;
use crate::fat12::{constant::*, fat, meta::Fat12Meta};

/// Walks and repairs one file's cluster chain against its declared size.
///
/// Every visited cluster is claimed in the tracker; the chain is cut at the
/// last good cluster whenever the successor is corrupt, already owned, or
/// past the declared size. Returns `Some(observed_size)` when the directory
/// entry's size field must be rewritten, `None` when it can stand.
pub(crate) fn check_file_chain<IO: BlockIO + ?Sized>(
    io: &mut IO,
    meta: &Fat12Meta,
    tracker: &mut RefTracker,
    start: u16,
    declared: u32,
    path: &str,
    rep: &mut CheckReport,
    stats: &mut RunStats,
) -> FsCheckerResult<Option<u32>> {
    let cs = meta.cluster_size();
    let mut chain_bytes: u32 = 0;
    let mut prev: Option<u16> = None;
    let mut cur = start;

    loop {
        if tracker.mark(cur) {
            // Cross-link: this cluster already belongs to another chain.
            // The clusters up to here stay with their first owner.
            if let Some(p) = prev {
                fat::write_entry(io, meta, p, FAT_EOC)?;
                stats.chains_truncated += 1;
                rep.push(Finding::warn(
                    "CHAIN.XLINK",
                    format!("{path}: cluster {cur} already in use, chain cut after {p}"),
                ));
            } else {
                rep.push(Finding::warn(
                    "CHAIN.XLINK",
                    format!("{path}: start cluster {cur} already in use"),
                ));
            }
            return Ok(size_fix(chain_bytes, declared));
        }

        chain_bytes = chain_bytes.saturating_add(cs);
        let next = fat::read_entry(io, meta, cur)?;

        if chain_bytes >= declared {
            // Declared size exhausted: the chain must end here.
            if meta.is_valid_cluster(next) {
                fat::write_entry(io, meta, cur, FAT_EOC)?;
                stats.chains_truncated += 1;
                let released = fat::release_chain(io, meta, next)?;
                stats.clusters_released += released;
                rep.push(Finding::warn(
                    "CHAIN.LONG",
                    format!(
                        "{path}: chain exceeds size {declared}, cut after cluster {cur}, released {released} clusters"
                    ),
                ));
            } else if next == FAT_BAD_CLUSTER || next == FAT_FREE_CLUSTER {
                fat::write_entry(io, meta, cur, FAT_EOC)?;
                stats.chains_truncated += 1;
                rep.push(Finding::warn(
                    "CHAIN.TAIL",
                    format!("{path}: corrupt terminator after cluster {cur}, chain terminated"),
                ));
            }
            return Ok(size_fix(chain_bytes, declared));
        }

        if next == FAT_BAD_CLUSTER || next == FAT_FREE_CLUSTER {
            // Corrupt link mid-chain: keep what is readable, end it here.
            fat::write_entry(io, meta, cur, FAT_EOC)?;
            stats.chains_truncated += 1;
            let kind = if next == FAT_BAD_CLUSTER { "bad" } else { "free" };
            rep.push(Finding::warn(
                "CHAIN.TAIL",
                format!("{path}: {kind} cluster follows {cur}, chain terminated"),
            ));
            return Ok(size_fix(chain_bytes, declared));
        }

        if !meta.is_valid_cluster(next) {
            // Proper terminator before the declared size ran out.
            return Ok(size_fix(chain_bytes, declared));
        }

        prev = Some(cur);
        cur = next;
    }
}

/// A chain shorter than declared shrinks the entry's size to what exists.
fn size_fix(chain_bytes: u32, declared: u32) -> Option<u32> {
    (chain_bytes < declared).then_some(chain_bytes)
}
