use anyhow::{Context, Result};

/// Memory usage snapshot for the current process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemStats {
    /// Virtual memory size in kilobytes.
    pub vm_kb: f64,
    /// Resident set size in bytes.
    pub rss_bytes: f64,
}

#[cfg(unix)]
pub fn mem_stats() -> Result<MemStats> {
    let stat =
        std::fs::read_to_string("/proc/self/stat").context("cannot read /proc/self/stat")?;
    parse_stat(&stat, page_size())
}

/// No process-status pseudo-file to read here.
#[cfg(not(unix))]
pub fn mem_stats() -> Result<MemStats> {
    Ok(MemStats {
        vm_kb: 0.0,
        rss_bytes: 0.0,
    })
}

#[cfg(unix)]
fn page_size() -> f64 {
    // SAFETY: sysconf has no preconditions.
    unsafe { nix::libc::sysconf(nix::libc::_SC_PAGESIZE) as f64 }
}

/// Parse the vsize and rss fields out of a `/proc/<pid>/stat` line. The comm
/// field may itself contain spaces, so fields are counted from the closing
/// paren rather than the start of the line.
#[cfg(any(unix, test))]
fn parse_stat(stat: &str, page_size: f64) -> Result<MemStats> {
    let after_comm = stat
        .rfind(')')
        .map(|at| &stat[at + 1..])
        .context("malformed stat line")?;
    let fields: Vec<&str> = after_comm.split_whitespace().collect();

    // vsize and rss are fields 23 and 24 of the full line; the slice after
    // the comm field starts at field 3.
    let vsize: f64 = fields
        .get(20)
        .context("stat line too short")?
        .parse()
        .context("bad vsize field")?;
    let rss: f64 = fields
        .get(21)
        .context("stat line too short")?
        .parse()
        .context("bad rss field")?;

    Ok(MemStats {
        vm_kb: vsize / 1024.0,
        rss_bytes: rss * page_size,
    })
}
