//! Publication of the normal map into a CPU-write-mappable texture target.
//!
//! The destination row pitch may exceed the tight `4 * N` row size due to
//! hardware alignment, so rows are copied one at a time and padding bytes
//! are never written.

/// A write-mapped view of a texture target. The mapping lives for the
/// borrow and is released on every exit path when the region drops.
pub struct MappedRegion<'a> {
    /// Destination bytes, at least `row_pitch * (rows - 1) + row_bytes` long
    pub data: &'a mut [u8],
    /// Distance in bytes between the starts of consecutive rows
    pub row_pitch: usize,
}

/// A host-owned 2D image resource the simulation can publish into.
///
/// Mapping may fail (e.g. the device behind the resource is in an invalid
/// state); that failure is recoverable and leaves prior contents visible.
pub trait MappableTarget {
    fn map_write(&mut self) -> Result<MappedRegion<'_>, String>;
}

/// Copy an `N x N` RGBA normal map into `target`, honoring its row pitch.
///
/// On any failure the target's previous contents and the simulation state
/// are both left untouched.
pub fn publish(normal_map: &[u8], grid_size: usize, target: &mut dyn MappableTarget) -> Result<(), String> {
    if grid_size == 0 {
        return Err("Grid size must be non-zero".to_string());
    }
    let row_bytes = grid_size * 4;
    if normal_map.len() != row_bytes * grid_size {
        return Err(format!(
            "Normal map size {} does not match {}x{} RGBA grid",
            normal_map.len(),
            grid_size,
            grid_size
        ));
    }

    let mapped = target.map_write()?;
    if mapped.row_pitch < row_bytes {
        return Err(format!(
            "Target row pitch {} is smaller than row size {}",
            mapped.row_pitch, row_bytes
        ));
    }
    let required = mapped.row_pitch * (grid_size - 1) + row_bytes;
    if mapped.data.len() < required {
        return Err(format!(
            "Target buffer holds {} bytes, need {}",
            mapped.data.len(),
            required
        ));
    }

    for (row, src) in normal_map.chunks_exact(row_bytes).enumerate() {
        let offset = row * mapped.row_pitch;
        mapped.data[offset..offset + row_bytes].copy_from_slice(src);
    }
    Ok(())
}

/// In-memory target with a configurable row pitch. Doubles as the staging
/// layer for GPU uploads and as a test stand-in for a device texture.
pub struct CpuTexture {
    data: Vec<u8>,
    row_pitch: usize,
    /// Simulates a device that cannot currently be mapped
    poisoned: bool,
}

impl CpuTexture {
    /// Allocate `rows` rows of `row_pitch` bytes, zero-filled
    pub fn new(row_pitch: usize, rows: usize) -> Self {
        Self {
            data: vec![0; row_pitch * rows],
            row_pitch,
            poisoned: false,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn row_pitch(&self) -> usize {
        self.row_pitch
    }

    /// Make subsequent `map_write` calls fail, for testing the recoverable
    /// publish path
    pub fn poison(&mut self) {
        self.poisoned = true;
    }
}

impl MappableTarget for CpuTexture {
    fn map_write(&mut self) -> Result<MappedRegion<'_>, String> {
        if self.poisoned {
            return Err("Texture resource cannot be mapped".to_string());
        }
        Ok(MappedRegion {
            data: &mut self.data,
            row_pitch: self.row_pitch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkered_map(n: usize) -> Vec<u8> {
        (0..n * n * 4).map(|k| (k % 251) as u8).collect()
    }

    #[test]
    fn test_tight_pitch_copies_everything() {
        let n = 8;
        let map = checkered_map(n);
        let mut target = CpuTexture::new(n * 4, n);

        publish(&map, n, &mut target).unwrap();
        assert_eq!(target.data(), &map[..]);
    }

    #[test]
    fn test_padded_pitch_leaves_padding_untouched() {
        let n = 8;
        let row_bytes = n * 4;
        let pitch = row_bytes + 24;
        let map = checkered_map(n);
        let mut target = CpuTexture::new(pitch, n);

        publish(&map, n, &mut target).unwrap();

        for row in 0..n {
            let start = row * pitch;
            assert_eq!(
                &target.data()[start..start + row_bytes],
                &map[row * row_bytes..(row + 1) * row_bytes]
            );
            assert!(target.data()[start + row_bytes..start + pitch]
                .iter()
                .all(|&b| b == 0));
        }
    }

    #[test]
    fn test_undersized_pitch_rejected() {
        let n = 8;
        let map = checkered_map(n);
        let mut target = CpuTexture::new(n * 4 - 4, n);

        assert!(publish(&map, n, &mut target).is_err());
    }

    #[test]
    fn test_map_failure_leaves_target_unchanged() {
        let n = 8;
        let map = checkered_map(n);
        let mut target = CpuTexture::new(n * 4, n);
        target.poison();

        assert!(publish(&map, n, &mut target).is_err());
        assert!(target.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let map = checkered_map(4);
        let mut target = CpuTexture::new(8 * 4, 8);

        assert!(publish(&map, 8, &mut target).is_err());
    }
}
