//! Binary cache for converged value functions.
//!
//! Format (little endian): 80-byte header followed by `grid_size` f64 values
//! of V and `grid_size` u32 policy indices.
//!
//! | Offset | Field |
//! |--------|-------|
//! | 0  | magic `"VFIS"` (u32) |
//! | 4  | version (u32) |
//! | 8  | grid size (u64) |
//! | 16 | iteration counter (u64) |
//! | 24 | converged flag (u32) + reserved (u32) |
//! | 32 | β, σ, R, grid lb, grid ub (5 × f64) |
//! | 72 | convergence tolerance (f64) |
//!
//! Loading memory-maps the file via `memmap2` and copies the payload out, so
//! the mapping is dropped before returning.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use memmap2::Mmap;
use ndarray::Array1;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::vfi::{CropModel, CropParams, VfiSettings, VfiSolution};

/// Cache file magic number: "VFIS" read as a little-endian u32.
pub const VFI_FILE_MAGIC: u32 = 0x5349_4656;

/// Cache file format version.
pub const VFI_FILE_VERSION: u32 = 2;

/// Header size in bytes.
pub const VFI_HEADER_SIZE: usize = 80;

/// Parameters and bookkeeping stored in the cache header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheHeader {
    pub grid_size: usize,
    pub iterations: usize,
    pub converged: bool,
    /// Tolerance the solve stopped at.
    pub tol: f64,
    pub params: CropParams,
}

impl CacheHeader {
    /// Whether the stored run also satisfies `settings`: it met a tolerance
    /// at least as strict and stopped inside the iteration cap.
    pub fn satisfies(&self, settings: &VfiSettings) -> bool {
        self.converged && self.tol <= settings.tol && self.iterations < settings.max_iter
    }
}

/// Value function and policy read back from disk.
#[derive(Debug)]
pub struct CachedSolution {
    pub header: CacheHeader,
    pub value: Array1<f64>,
    pub policy: Vec<usize>,
}

impl CachedSolution {
    /// Rebuild a full solution (leftover and sales policies) on `model`'s grid.
    /// The distance trace is not stored, so it comes back empty.
    pub fn into_solution(self, model: &CropModel) -> VfiSolution {
        let leftover = Array1::from_iter(self.policy.iter().map(|&j| model.grid[j]));
        let sales = &model.grid - &leftover;
        VfiSolution {
            value: self.value,
            policy: self.policy,
            leftover,
            sales,
            iterations: self.header.iterations,
            distance: 0.0,
            distances: Vec::new(),
            converged: self.header.converged,
            history: None,
        }
    }
}

/// Cache path for a calibration, e.g. `data/vfi/value_beta_0.900_sigma_1.000_n1500.bin`.
pub fn cache_file_path(params: &CropParams) -> PathBuf {
    PathBuf::from(format!(
        "data/vfi/value_beta_{:.3}_sigma_{:.3}_n{}.bin",
        params.beta, params.sigma, params.grid_size
    ))
}

/// Total file size for `grid_size` points, `None` if it does not fit in usize.
fn expected_file_size(grid_size: usize) -> Option<usize> {
    grid_size
        .checked_mul(std::mem::size_of::<f64>() + std::mem::size_of::<u32>())?
        .checked_add(VFI_HEADER_SIZE)
}

fn encode_header(header: &CacheHeader) -> [u8; VFI_HEADER_SIZE] {
    let mut buf = [0u8; VFI_HEADER_SIZE];
    buf[0..4].copy_from_slice(&VFI_FILE_MAGIC.to_le_bytes());
    buf[4..8].copy_from_slice(&VFI_FILE_VERSION.to_le_bytes());
    buf[8..16].copy_from_slice(&(header.grid_size as u64).to_le_bytes());
    buf[16..24].copy_from_slice(&(header.iterations as u64).to_le_bytes());
    buf[24..28].copy_from_slice(&(header.converged as u32).to_le_bytes());
    let p = &header.params;
    let floats = [p.beta, p.sigma, p.gross_return, p.grid_lb, p.grid_ub];
    for (k, x) in floats.iter().enumerate() {
        let off = 32 + 8 * k;
        buf[off..off + 8].copy_from_slice(&x.to_le_bytes());
    }
    buf[72..80].copy_from_slice(&header.tol.to_le_bytes());
    buf
}

fn read_u32(bytes: &[u8], off: usize) -> u32 {
    let mut b = [0u8; 4];
    b.copy_from_slice(&bytes[off..off + 4]);
    u32::from_le_bytes(b)
}

fn read_u64(bytes: &[u8], off: usize) -> u64 {
    let mut b = [0u8; 8];
    b.copy_from_slice(&bytes[off..off + 8]);
    u64::from_le_bytes(b)
}

fn read_f64(bytes: &[u8], off: usize) -> f64 {
    f64::from_bits(read_u64(bytes, off))
}

fn decode_header(bytes: &[u8], path: &Path) -> Result<CacheHeader> {
    let bad = |reason: String| Error::CacheFormat {
        path: path.to_owned(),
        reason,
    };
    if bytes.len() < VFI_HEADER_SIZE {
        return Err(bad(format!("file shorter than {}-byte header", VFI_HEADER_SIZE)));
    }
    let magic = read_u32(bytes, 0);
    let version = read_u32(bytes, 4);
    if magic != VFI_FILE_MAGIC || version != VFI_FILE_VERSION {
        return Err(bad(format!("magic=0x{:08x} version={}", magic, version)));
    }
    let grid_size = usize::try_from(read_u64(bytes, 8))
        .map_err(|_| bad(format!("grid size {} too large", read_u64(bytes, 8))))?;
    let iterations = usize::try_from(read_u64(bytes, 16))
        .map_err(|_| bad(format!("iteration count {} too large", read_u64(bytes, 16))))?;
    Ok(CacheHeader {
        grid_size,
        iterations,
        converged: read_u32(bytes, 24) != 0,
        tol: read_f64(bytes, 72),
        params: CropParams {
            beta: read_f64(bytes, 32),
            sigma: read_f64(bytes, 40),
            gross_return: read_f64(bytes, 48),
            grid_lb: read_f64(bytes, 56),
            grid_ub: read_f64(bytes, 64),
            grid_size,
        },
    })
}

/// Write a solution computed under `params` and `settings` to `path`,
/// creating parent directories.
pub fn save_solution(
    path: &Path,
    params: &CropParams,
    settings: &VfiSettings,
    solution: &VfiSolution,
) -> Result<()> {
    let start_time = Instant::now();
    let n = solution.value.len();
    if solution.policy.len() != n {
        return Err(Error::DimensionMismatch {
            what: "policy length",
            expected: n,
            actual: solution.policy.len(),
        });
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("failed to create {}", parent.display()), e))?;
        }
    }

    let header = CacheHeader {
        grid_size: n,
        iterations: solution.iterations,
        converged: solution.converged,
        tol: settings.tol,
        params: *params,
    };

    let mut bytes = Vec::with_capacity(expected_file_size(n).unwrap_or(VFI_HEADER_SIZE));
    bytes.extend_from_slice(&encode_header(&header));
    for v in solution.value.iter() {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    for &j in &solution.policy {
        bytes.extend_from_slice(&(j as u32).to_le_bytes());
    }

    let mut f = File::create(path)
        .map_err(|e| Error::io(format!("failed to create {}", path.display()), e))?;
    f.write_all(&bytes)
        .map_err(|e| Error::io(format!("failed to write {}", path.display()), e))?;

    info!(
        "Saved value function ({} points) to {} in {:.2} ms",
        n,
        path.display(),
        start_time.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

/// Load a cached solution for `params` that is valid under `settings`.
///
/// Returns `Ok(None)` when the file does not exist, was computed under a
/// different calibration, or did not converge to `settings.tol` within
/// `settings.max_iter`. A file that exists but is malformed is an error.
pub fn load_solution(
    path: &Path,
    params: &CropParams,
    settings: &VfiSettings,
) -> Result<Option<CachedSolution>> {
    let start_time = Instant::now();
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No cached value function at {}", path.display());
            return Ok(None);
        }
        Err(e) => return Err(Error::io(format!("failed to open {}", path.display()), e)),
    };

    // Safety: the mapping is read-only and dropped before returning; the
    // payload is copied out.
    let mmap = unsafe { Mmap::map(&file) }
        .map_err(|e| Error::io(format!("failed to mmap {}", path.display()), e))?;
    let bytes: &[u8] = &mmap;

    let header = decode_header(bytes, path)?;
    let expected = expected_file_size(header.grid_size).ok_or_else(|| Error::CacheFormat {
        path: path.to_owned(),
        reason: format!("grid size {} overflows the file size", header.grid_size),
    })?;
    if bytes.len() != expected {
        return Err(Error::CacheFormat {
            path: path.to_owned(),
            reason: format!("size mismatch: expected {}, got {}", expected, bytes.len()),
        });
    }
    if header.params != *params {
        info!(
            "Cached value function at {} was computed under different parameters, ignoring",
            path.display()
        );
        return Ok(None);
    }
    if !header.satisfies(settings) {
        info!(
            "Cached value function at {} (tol {:.1e}, {} iterations) does not meet tol {:.1e} within {} iterations, ignoring",
            path.display(),
            header.tol,
            header.iterations,
            settings.tol,
            settings.max_iter
        );
        return Ok(None);
    }

    let n = header.grid_size;
    let value = Array1::from_shape_fn(n, |i| read_f64(bytes, VFI_HEADER_SIZE + 8 * i));
    let policy_start = VFI_HEADER_SIZE + 8 * n;
    let mut policy = Vec::with_capacity(n);
    for i in 0..n {
        let j = read_u32(bytes, policy_start + 4 * i) as usize;
        if j >= n {
            return Err(Error::CacheFormat {
                path: path.to_owned(),
                reason: format!("policy index {} out of range at row {}", j, i),
            });
        }
        policy.push(j);
    }

    info!(
        "Loaded cached value function ({} points) from {} in {:.2} ms",
        n,
        path.display(),
        start_time.elapsed().as_secs_f64() * 1000.0
    );
    Ok(Some(CachedSolution {
        header,
        value,
        policy,
    }))
}
