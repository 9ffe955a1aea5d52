// scand/src/main.rs

use std::fs::OpenOptions;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;

use scandfs::fat12::prelude::*;
use scandfs::{CheckReport, Severity};
use scandio::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "scand", version, about = "FAT12 disk image consistency checker and repairer", long_about = None)]
struct Cli {
    /// FAT12 volume image, repaired in place
    image: PathBuf,

    /// Also print informational findings
    #[arg(long)]
    report_all: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        std::process::exit(parse_exit_code(&e));
    });

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(&cli.image)
        .with_context(|| format!("cannot open image {}", cli.image.display()))?;

    let mut io = StdBlockIO::new(&mut file);
    let meta = parse_boot(&mut io)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("invalid boot sector in {}", cli.image.display()))?;

    println!(
        "[scand] checking {} ({} clusters, {} bytes/cluster)",
        cli.image.display(),
        meta.total_clusters(),
        meta.cluster_size()
    );

    let mut rep = CheckReport::default();
    let result = Fat12Checker::new(&mut io, &meta).run(&mut rep);

    print_report(&rep, cli.report_all);

    let stats = result.map_err(|e| anyhow::anyhow!("{e}")).context("check aborted")?;

    println!(
        "[scand] {} entries scanned, {} removed, {} sizes corrected, {} chains truncated, {} clusters released, {} orphan chains recovered",
        stats.entries_scanned,
        stats.entries_deleted,
        stats.sizes_corrected,
        stats.chains_truncated,
        stats.clusters_released,
        stats.orphans_recovered
    );

    let repairs = rep.count(Severity::Warn);
    if repairs == 0 {
        println!("[scand] {}", "volume is consistent".green());
    } else {
        println!(
            "[scand] {}",
            format!("{repairs} inconsistencies repaired").yellow()
        );
    }

    Ok(())
}

/// Usage problems exit with 1; an explicit help or version request is not
/// an error.
fn parse_exit_code(e: &clap::Error) -> i32 {
    use clap::error::ErrorKind;
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn print_report(rep: &CheckReport, report_all: bool) {
    for f in &rep.findings {
        let tag = match f.sev {
            Severity::Info => {
                if !report_all {
                    continue;
                }
                "INFO".blue()
            }
            Severity::Warn => "WARN".yellow(),
            Severity::Error => "ERR ".red(),
        };
        println!("{tag}: {f}");
    }
}
