//! Safetensors I/O for stimulus / response matrices.
//!
//! Reader: every `F32` / `F64` tensor of rank 1 or 2 is returned as an
//! `Array2<f64>` (rank-1 tensors become a single column).  Other dtypes and
//! ranks are skipped.
//!
//! Writer: [`StWriter`] emits the standard layout
//! `u64 header_len | JSON header (space-padded to 8 bytes) | raw tensor bytes`.
use anyhow::{bail, Context, Result};
use ndarray::{Array1, Array2};
use std::collections::HashMap;
use std::path::Path;

// ── Low-level safetensors parser (no dependency on the `safetensors` crate's
//    tensor types — we just need raw bytes → ndarray). ─────────────────────────

fn parse_header(bytes: &[u8]) -> Result<(serde_json::Map<String, serde_json::Value>, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let mut len = [0u8; 8];
    len.copy_from_slice(&bytes[..8]);
    let n = u64::from_le_bytes(len);
    let data_start = usize::try_from(n)
        .ok()
        .and_then(|n| n.checked_add(8))
        .filter(|&end| end <= bytes.len())
        .with_context(|| format!("safetensors header length {n} exceeds file size {}", bytes.len()))?;
    let header: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(&bytes[8..data_start])
            .context("failed to parse safetensors header")?;
    Ok((header, data_start))
}

fn data_range(entry: &serde_json::Value, data_start: usize, file_len: usize) -> Result<(usize, usize)> {
    let offsets = entry["data_offsets"]
        .as_array()
        .context("tensor entry has no 'data_offsets'")?;
    if offsets.len() != 2 {
        bail!("'data_offsets' must have two entries");
    }
    let offset = |v: &serde_json::Value| -> Result<usize> {
        let rel = v.as_u64().context("bad data offset")?;
        usize::try_from(rel)
            .ok()
            .and_then(|rel| data_start.checked_add(rel))
            .filter(|&abs| abs <= file_len)
            .with_context(|| format!("data offset {rel} out of bounds for file of {file_len} bytes"))
    };
    let (s, e) = (offset(&offsets[0])?, offset(&offsets[1])?);
    if s > e {
        bail!("tensor data [{s}, {e}) is reversed");
    }
    Ok((s, e))
}

fn shape_of(entry: &serde_json::Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .context("tensor entry has no 'shape'")?
        .iter()
        .map(|v| v.as_u64().map(|d| d as usize).context("bad shape entry"))
        .collect()
}

fn decode_f64(raw: &[u8], dtype: &str) -> Option<Vec<f64>> {
    match dtype {
        "F32" => Some(
            raw.chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64)
                .collect(),
        ),
        "F64" => Some(
            raw.chunks_exact(8)
                .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
                .collect(),
        ),
        _ => None,
    }
}

/// Load every floating-point rank-1/rank-2 tensor in `path` as `Array2<f64>`.
pub fn load_matrices(path: &Path) -> Result<HashMap<String, Array2<f64>>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_matrices(&bytes).with_context(|| format!("parsing {}", path.display()))
}

/// Decode an in-memory safetensors buffer, see [`load_matrices`].
pub fn parse_matrices(bytes: &[u8]) -> Result<HashMap<String, Array2<f64>>> {
    let (header, data_start) = parse_header(bytes)?;

    let mut out = HashMap::new();
    for (name, entry) in &header {
        if name == "__metadata__" {
            continue;
        }
        let dtype = entry["dtype"].as_str().unwrap_or("");
        let (s, e) = data_range(entry, data_start, bytes.len())
            .with_context(|| format!("tensor '{name}'"))?;
        let Some(vals) = decode_f64(&bytes[s..e], dtype) else {
            tracing::debug!(tensor = %name, dtype, "skipping non-float tensor");
            continue;
        };
        let shape = shape_of(entry).with_context(|| format!("tensor '{name}'"))?;
        let arr = match shape.as_slice() {
            [n] => Array2::from_shape_vec((*n, 1), vals),
            [r, c] => Array2::from_shape_vec((*r, *c), vals),
            _ => {
                tracing::debug!(tensor = %name, rank = shape.len(), "skipping tensor with rank > 2");
                continue;
            }
        }
        .with_context(|| format!("tensor '{name}': data does not match shape {shape:?}"))?;
        out.insert(name.clone(), arr);
    }
    Ok(out)
}

/// Fetch a required matrix by name.
pub fn take_matrix(tensors: &mut HashMap<String, Array2<f64>>, name: &str) -> Result<Array2<f64>> {
    tensors
        .remove(name)
        .with_context(|| format!("missing '{name}' tensor"))
}

// ── Result writer ─────────────────────────────────────────────────────────────

struct Entry {
    name: String,
    dtype: &'static str,
    shape: Vec<usize>,
    bytes: Vec<u8>,
}

/// Safetensors writer for the outputs of a fit: `F64` matrices / vectors and
/// `I32` index vectors.
///
/// ```rust,no_run
/// use firenc::io::StWriter;
/// use ndarray::array;
/// use std::path::Path;
/// let mut w = StWriter::new();
/// w.add_f64_arr1("correlations", &array![0.5, 0.7]);
/// w.add_i32("delays", &[1, 2]);
/// w.write(Path::new("/tmp/out.safetensors")).unwrap();
/// ```
#[derive(Default)]
pub struct StWriter {
    entries: Vec<Entry>,
}

impl StWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: &str, dtype: &'static str, shape: Vec<usize>, bytes: Vec<u8>) {
        self.entries.push(Entry { name: name.to_string(), dtype, shape, bytes });
    }

    /// Row-major copy of a 2-D array.
    pub fn add_f64_arr2(&mut self, name: &str, arr: &Array2<f64>) {
        let bytes = arr.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push(name, "F64", vec![arr.nrows(), arr.ncols()], bytes);
    }

    pub fn add_f64_arr1(&mut self, name: &str, arr: &Array1<f64>) {
        let bytes = arr.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push(name, "F64", vec![arr.len()], bytes);
    }

    pub fn add_i32(&mut self, name: &str, data: &[i32]) {
        let bytes = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push(name, "I32", vec![data.len()], bytes);
    }

    /// Serialise to `u64 header_len | header | data` in memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut header = serde_json::Map::new();
        let mut offset = 0usize;
        for e in &self.entries {
            let end = offset + e.bytes.len();
            header.insert(e.name.clone(), serde_json::json!({
                "dtype": e.dtype,
                "shape": e.shape,
                "data_offsets": [offset, end],
            }));
            offset = end;
        }
        let mut hdr = serde_json::to_vec(&header)?;
        hdr.resize(hdr.len().div_ceil(8) * 8, b' ');

        let mut out = Vec::with_capacity(8 + hdr.len() + offset);
        out.extend_from_slice(&(hdr.len() as u64).to_le_bytes());
        out.extend_from_slice(&hdr);
        for e in &self.entries {
            out.extend_from_slice(&e.bytes);
        }
        Ok(out)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)
            .with_context(|| format!("writing {}", path.display()))
    }
}
