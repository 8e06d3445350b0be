//! IDX (MNIST) file decoding
//!
//! Image files: `[magic=2051][count][rows][cols]` followed by `count` images
//! of `rows×cols` unsigned bytes. Label files: `[magic=2049][count]` followed
//! by `count` class bytes. Header fields are big-endian u32.

use crate::error::{NetworkError, Result};
use ndarray::Array1;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

pub const IMAGE_MAGIC: u32 = 2051;
pub const LABEL_MAGIC: u32 = 2049;
/// Digit classes in MNIST.
pub const NUM_CLASSES: usize = 10;

fn read_be_u32<R: Read>(reader: &mut R, field: &str) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf).map_err(|err| {
        if err.kind() == ErrorKind::UnexpectedEof {
            NetworkError::InvalidData(format!("header truncated before {}", field))
        } else {
            NetworkError::Io(err)
        }
    })?;
    Ok(u32::from_be_bytes(buf))
}

fn check_magic(found: u32, expected: u32) -> Result<()> {
    if found == expected {
        Ok(())
    } else {
        Err(NetworkError::InvalidData(format!(
            "magic number {} (expected {})",
            found, expected
        )))
    }
}

/// Reads exactly `len` payload bytes without trusting `len` for allocation.
fn read_payload<R: Read>(reader: &mut R, len: usize, what: &str) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    reader.take(len as u64).read_to_end(&mut payload)?;
    if payload.len() < len {
        return Err(NetworkError::InvalidData(format!(
            "{} truncated: expected {} bytes, found {}",
            what,
            len,
            payload.len()
        )));
    }
    Ok(payload)
}

/// Decodes an image stream into vectors of `rows·cols` pixels scaled to [0, 1].
pub fn decode_images<R: Read>(mut reader: R) -> Result<Vec<Array1<f64>>> {
    check_magic(read_be_u32(&mut reader, "magic number")?, IMAGE_MAGIC)?;
    let count = read_be_u32(&mut reader, "image count")? as usize;
    let rows = read_be_u32(&mut reader, "row count")? as usize;
    let cols = read_be_u32(&mut reader, "column count")? as usize;

    let (image_size, payload_len) = rows
        .checked_mul(cols)
        .and_then(|size| Some((size, size.checked_mul(count)?)))
        .ok_or_else(|| {
            NetworkError::InvalidData(format!(
                "image dimensions overflow: {} images of {}x{}",
                count, rows, cols
            ))
        })?;
    if image_size == 0 && count > 0 {
        return Err(NetworkError::InvalidData(format!(
            "image dimensions must be positive, got {}x{}",
            rows, cols
        )));
    }

    let pixels = read_payload(&mut reader, payload_len, "image data")?;
    Ok(pixels
        .chunks_exact(image_size.max(1))
        .take(count)
        .map(|image| image.iter().map(|&p| p as f64 / 255.0).collect())
        .collect())
}

/// Decodes a label stream into one-hot vectors of length `num_classes`.
pub fn decode_labels<R: Read>(mut reader: R, num_classes: usize) -> Result<Vec<Array1<f64>>> {
    check_magic(read_be_u32(&mut reader, "magic number")?, LABEL_MAGIC)?;
    let count = read_be_u32(&mut reader, "label count")? as usize;

    let labels = read_payload(&mut reader, count, "label data")?;
    labels
        .iter()
        .enumerate()
        .map(|(i, &label)| one_hot(label as usize, num_classes).ok_or_else(|| {
            NetworkError::InvalidData(format!(
                "label {} at index {} is outside 0..{}",
                label, i, num_classes
            ))
        }))
        .collect()
}

/// One-hot vector with a 1 at `class`, or `None` if `class >= num_classes`.
pub fn one_hot(class: usize, num_classes: usize) -> Option<Array1<f64>> {
    if class >= num_classes {
        return None;
    }
    let mut vector = Array1::zeros(num_classes);
    vector[class] = 1.0;
    Some(vector)
}

pub fn read_images<P: AsRef<Path>>(path: P) -> Result<Vec<Array1<f64>>> {
    let file = File::open(path)?;
    decode_images(BufReader::new(file))
}

pub fn read_labels<P: AsRef<Path>>(path: P, num_classes: usize) -> Result<Vec<Array1<f64>>> {
    let file = File::open(path)?;
    decode_labels(BufReader::new(file), num_classes)
}
