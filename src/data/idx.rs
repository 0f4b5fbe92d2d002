//! IDX image/label pairs (the MNIST file layout) turned into feature and
//! one-hot target vectors.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-3:   0x00000803  (magic 2051: uint8, 3 dimensions)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (big-endian u32)
//! bytes 12-15:  cols        (big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-3:   0x00000801  (magic 2049: uint8, 1 dimension)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index in [0, n_classes)
//! ```

use std::path::Path;

use tracing::debug;

use crate::error::{NetworkError, Result};

pub const IMAGES_MAGIC: u32 = 2051;
pub const LABELS_MAGIC: u32 = 2049;

/// Index-aligned inputs and one-hot targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Pixel values scaled from `[0, 255]` to `[0.0, 1.0]`.
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<Vec<f64>>,
    /// Raw class index of every sample.
    pub classes: Vec<u8>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

fn be_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn dataset_err(msg: String) -> NetworkError {
    NetworkError::Dataset(msg)
}

pub fn parse_idx_pair(image_bytes: &[u8], label_bytes: &[u8], n_classes: usize) -> Result<Dataset> {
    // ── Image file ──────────────────────────────────────────────────────────
    if image_bytes.len() < 16 {
        return Err(dataset_err(format!(
            "image file too short: expected at least 16 header bytes, got {}",
            image_bytes.len()
        )));
    }
    let magic = be_u32(image_bytes, 0);
    if magic != IMAGES_MAGIC {
        return Err(dataset_err(format!(
            "unexpected image magic number: expecting {IMAGES_MAGIC}, got {magic}"
        )));
    }

    let n_items = be_u32(image_bytes, 4) as usize;
    let rows = be_u32(image_bytes, 8) as usize;
    let cols = be_u32(image_bytes, 12) as usize;

    let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
        dataset_err(format!("rows * cols overflows (rows={rows}, cols={cols})"))
    })?;
    let data_len = n_items.checked_mul(n_pixels).ok_or_else(|| {
        dataset_err(format!("image data length overflows (items={n_items}, pixels={n_pixels})"))
    })?;
    if n_pixels == 0 {
        return Err(dataset_err(format!("images have no pixels ({rows}x{cols})")));
    }
    if image_bytes.len() - 16 < data_len {
        return Err(dataset_err(format!(
            "image file truncated: header declares {n_items} images of {rows}x{cols} \
             ({data_len} bytes), but only {} bytes follow the header",
            image_bytes.len() - 16
        )));
    }

    // ── Label file ──────────────────────────────────────────────────────────
    if label_bytes.len() < 8 {
        return Err(dataset_err(format!(
            "label file too short: expected at least 8 header bytes, got {}",
            label_bytes.len()
        )));
    }
    let magic = be_u32(label_bytes, 0);
    if magic != LABELS_MAGIC {
        return Err(dataset_err(format!(
            "unexpected label magic number: expecting {LABELS_MAGIC}, got {magic}"
        )));
    }
    let label_count = be_u32(label_bytes, 4) as usize;
    if label_count != n_items {
        return Err(dataset_err(format!(
            "image file declares {n_items} items but label file declares {label_count}"
        )));
    }
    if label_bytes.len() - 8 < n_items {
        return Err(dataset_err(format!(
            "label file truncated: header declares {n_items} labels, but only {} bytes follow the header",
            label_bytes.len() - 8
        )));
    }
    if n_classes < 2 {
        return Err(dataset_err(format!("n_classes must be at least 2, got {n_classes}")));
    }

    // ── Build vectors ───────────────────────────────────────────────────────
    let inputs: Vec<Vec<f64>> = image_bytes[16..16 + data_len]
        .chunks_exact(n_pixels)
        .map(|chunk| chunk.iter().map(|&px| px as f64 / 255.0).collect())
        .collect();

    let classes = label_bytes[8..8 + n_items].to_vec();
    let mut targets = Vec::with_capacity(n_items);
    for (i, &class) in classes.iter().enumerate() {
        let class = class as usize;
        if class >= n_classes {
            return Err(dataset_err(format!(
                "label {i}: class {class} is out of range for {n_classes} classes"
            )));
        }
        let mut one_hot = vec![0.0; n_classes];
        one_hot[class] = 1.0;
        targets.push(one_hot);
    }

    Ok(Dataset { inputs, targets, classes })
}

/// Reads and parses an image file and its label file.
pub fn load_idx_pair<P: AsRef<Path>, Q: AsRef<Path>>(
    image_path: P,
    label_path: Q,
    n_classes: usize,
) -> Result<Dataset> {
    let image_bytes = std::fs::read(image_path.as_ref())?;
    let label_bytes = std::fs::read(label_path.as_ref())?;
    let dataset = parse_idx_pair(&image_bytes, &label_bytes, n_classes)?;
    debug!(
        images = %image_path.as_ref().display(),
        samples = dataset.len(),
        "loaded idx dataset"
    );
    Ok(dataset)
}
