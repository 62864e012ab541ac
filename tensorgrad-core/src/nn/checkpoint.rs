use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use log::debug;

use crate::error::TensorGradError;
use crate::nn::parameter::Parameter;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over the shape strings of `params`, joined by `;`.
///
/// Two parameter lists hash equal iff they have the same shapes in the same
/// order (up to hash collisions).
pub fn shape_checksum(params: &[Parameter]) -> u32 {
    let joined = params
        .iter()
        .map(|p| format!("{:?}", p.shape()))
        .collect::<Vec<_>>()
        .join(";");
    joined.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Writes every parameter's row-major buffer as little-endian `f64`s, in
/// order, followed by the little-endian `u32` shape checksum.
pub fn save<W: Write>(params: &[Parameter], writer: &mut W) -> Result<(), TensorGradError> {
    let mut bytes_written = 0usize;
    for param in params {
        let guard = param.read_data();
        for value in guard.data.iter() {
            writer.write_all(&value.to_le_bytes())?;
        }
        bytes_written += guard.data.len() * 8;
    }
    let checksum = shape_checksum(params);
    writer.write_all(&checksum.to_le_bytes())?;
    writer.flush()?;
    debug!(
        "Saved checkpoint: {} parameters, {} bytes, checksum {:#010x}",
        params.len(),
        bytes_written + 4,
        checksum
    );
    Ok(())
}

/// Restores parameter values written by [`save`].
///
/// The whole stream is read and validated before any parameter is touched, so
/// on error every parameter keeps its previous value.
///
/// # Errors
/// `IncompatibleCheckpoint` if the stream is truncated, has trailing bytes, or
/// its checksum does not match the shapes of `params`.
pub fn load<R: Read>(params: &[Parameter], reader: &mut R) -> Result<(), TensorGradError> {
    let mut buffers: Vec<Vec<f64>> = Vec::with_capacity(params.len());
    for (i, param) in params.iter().enumerate() {
        let numel = param.numel();
        let mut raw = vec![0u8; numel * 8];
        read_exact_or_incompatible(reader, &mut raw, || {
            format!("stream ended inside parameter {} ({} values expected)", i, numel)
        })?;
        let values = raw
            .chunks_exact(8)
            .map(|chunk| {
                let mut bytes = [0u8; 8];
                bytes.copy_from_slice(chunk);
                f64::from_le_bytes(bytes)
            })
            .collect();
        buffers.push(values);
    }

    let mut checksum_bytes = [0u8; 4];
    read_exact_or_incompatible(reader, &mut checksum_bytes, || {
        "stream ended before the shape checksum".to_string()
    })?;
    let stored = u32::from_le_bytes(checksum_bytes);
    let expected = shape_checksum(params);
    if stored != expected {
        return Err(TensorGradError::IncompatibleCheckpoint(format!(
            "shape checksum {:#010x} does not match model checksum {:#010x}",
            stored, expected
        )));
    }

    let mut probe = [0u8; 1];
    if read_retrying(reader, &mut probe)? != 0 {
        return Err(TensorGradError::IncompatibleCheckpoint(
            "trailing bytes after the shape checksum".to_string(),
        ));
    }

    for (param, values) in params.iter().zip(buffers) {
        param.write_data().data = values;
    }
    debug!("Loaded checkpoint: {} parameters, checksum {:#010x}", params.len(), stored);
    Ok(())
}

/// [`save`] into a newly created (or truncated) file.
pub fn save_to_path<P: AsRef<Path>>(params: &[Parameter], path: P) -> Result<(), TensorGradError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    save(params, &mut writer)
}

/// [`load`] from a file.
pub fn load_from_path<P: AsRef<Path>>(params: &[Parameter], path: P) -> Result<(), TensorGradError> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);
    load(params, &mut reader)
}

fn read_exact_or_incompatible<R: Read>(
    reader: &mut R,
    buf: &mut [u8],
    describe: impl FnOnce() -> String,
) -> Result<(), TensorGradError> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            Err(TensorGradError::IncompatibleCheckpoint(describe()))
        }
        Err(e) => Err(e.into()),
    }
}

fn read_retrying<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, TensorGradError> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

#[cfg(test)]
#[path = "checkpoint_test.rs"]
mod tests;
