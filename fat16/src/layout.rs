// Volume layout resolution

use fatscope_core::FatscopeError;
use serde::{Deserialize, Serialize};

use crate::boot_sector::BootSector;
use crate::constants::DIR_ENTRY_SIZE;

/// Absolute byte offsets and sizes of the volume's regions, derived once from
/// the boot sector and immutable afterwards.
///
/// Regions are contiguous and non-overlapping: reserved sectors, then
/// `num_fats` FAT copies, then the fixed root directory, then the data
/// region. Cluster `n` lives at `data_offset + (n - 2) * cluster_size_bytes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeLayout {
    pub fat_offset: u64,
    pub fat_size_bytes: u64,
    pub root_dir_offset: u64,
    pub root_dir_size_bytes: u64,
    pub data_offset: u64,
    pub cluster_size_bytes: u64,
    pub total_sectors: u32,
    pub total_clusters: u32,
}

impl VolumeLayout {
    /// Compute the layout from a decoded boot sector.
    ///
    /// Every downstream offset divides by the sector and cluster sizes, so a
    /// zero in any geometry field is fatal here, before a single directory or
    /// data byte is read.
    pub fn from_boot_sector(boot: &BootSector) -> Result<Self, FatscopeError> {
        let bpb = &boot.bpb;

        if bpb.bytes_per_sector == 0 {
            return Err(FatscopeError::InvalidGeometry(
                "bytes per sector is 0".to_string(),
            ));
        }
        if bpb.sectors_per_cluster == 0 {
            return Err(FatscopeError::InvalidGeometry(
                "sectors per cluster is 0".to_string(),
            ));
        }
        if bpb.num_fats == 0 {
            return Err(FatscopeError::InvalidGeometry("FAT count is 0".to_string()));
        }
        if bpb.sectors_per_fat == 0 {
            return Err(FatscopeError::InvalidGeometry(
                "sectors per FAT is 0".to_string(),
            ));
        }
        let total_sectors = boot.total_sectors();
        if total_sectors == 0 {
            return Err(FatscopeError::InvalidGeometry(
                "total sector count is 0 in both the 16-bit and 32-bit fields".to_string(),
            ));
        }

        let bytes_per_sector = bpb.bytes_per_sector as u64;
        let fat_offset = bpb.reserved_sectors as u64 * bytes_per_sector;
        let fat_size_bytes = bpb.sectors_per_fat as u64 * bytes_per_sector;
        let root_dir_offset = fat_offset + fat_size_bytes * bpb.num_fats as u64;
        let root_dir_size_bytes = bpb.root_entries as u64 * DIR_ENTRY_SIZE as u64;
        let data_offset = root_dir_offset + root_dir_size_bytes;
        let cluster_size_bytes = bpb.sectors_per_cluster as u64 * bytes_per_sector;

        let total_bytes = total_sectors as u64 * bytes_per_sector;
        let data_bytes = total_bytes.saturating_sub(data_offset);
        let total_clusters = (data_bytes / cluster_size_bytes) as u32;

        Ok(Self {
            fat_offset,
            fat_size_bytes,
            root_dir_offset,
            root_dir_size_bytes,
            data_offset,
            cluster_size_bytes,
            total_sectors,
            total_clusters,
        })
    }

    /// Byte offset of a data cluster. Cluster numbering starts at 2.
    pub fn cluster_offset(&self, cluster: u16) -> u64 {
        self.data_offset + (cluster as u64 - 2) * self.cluster_size_bytes
    }

    /// Number of slots in the fixed root directory region.
    pub fn root_entry_count(&self) -> u32 {
        (self.root_dir_size_bytes / DIR_ENTRY_SIZE as u64) as u32
    }
}
