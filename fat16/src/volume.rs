// FAT16 volume handle

use std::path::Path;

use log::{debug, info};

use fatscope_core::{FatscopeError, ImageReader};

use crate::boot_sector::BootSector;
use crate::chain::follow_chain;
use crate::constants::{BOOT_SECTOR_SIZE, DIR_ENTRY_SIZE};
use crate::directory::DirEntry;
use crate::layout::VolumeLayout;

/// An opened FAT16 volume.
///
/// Owns the image reader, the decoded boot sector, the resolved layout and an
/// in-memory copy of the first FAT. Layout and FAT are immutable for the
/// handle's lifetime; the file handle is released when the volume is dropped,
/// on every exit path.
#[derive(Debug)]
pub struct Fat16Volume {
    reader: ImageReader,
    boot_sector: BootSector,
    layout: VolumeLayout,
    fat: Vec<u8>,
}

impl Fat16Volume {
    /// Open a disk image and resolve its geometry.
    ///
    /// Structural problems (a truncated boot sector, geometry that makes
    /// offset arithmetic meaningless) abort here, before any directory or
    /// data read is attempted.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FatscopeError> {
        info!("opening FAT16 image {}", path.as_ref().display());
        let reader = ImageReader::open(path)?;
        Self::from_reader(reader)
    }

    /// Open a volume over an already-constructed image reader.
    pub fn from_reader(mut reader: ImageReader) -> Result<Self, FatscopeError> {
        let available = reader.len().min(BOOT_SECTOR_SIZE as u64) as usize;
        let buf = reader.read_at(0, available)?;
        let boot_sector = BootSector::parse(&buf)?;
        let layout = VolumeLayout::from_boot_sector(&boot_sector)?;

        debug!(
            "layout: FAT at {:#x} ({} bytes x {}), root dir at {:#x}, data at {:#x}, {}-byte clusters",
            layout.fat_offset,
            layout.fat_size_bytes,
            boot_sector.bpb.num_fats,
            layout.root_dir_offset,
            layout.data_offset,
            layout.cluster_size_bytes
        );

        // First FAT copy only; the mirrors are redundant for reading.
        let fat = reader.read_at(layout.fat_offset, layout.fat_size_bytes as usize)?;

        Ok(Self {
            reader,
            boot_sector,
            layout,
            fat,
        })
    }

    pub fn boot_sector(&self) -> &BootSector {
        &self.boot_sector
    }

    pub fn layout(&self) -> &VolumeLayout {
        &self.layout
    }

    /// Iterate the live entries of the root directory.
    ///
    /// Each call restarts from the first slot. Entries are read lazily, one
    /// 32-byte slot at a time; deleted and volume-label slots are skipped,
    /// and the 0x00 end-of-directory marker stops the walk early.
    pub fn root_entries(&mut self) -> RootEntries<'_> {
        RootEntries {
            volume: self,
            slot: 0,
            done: false,
        }
    }

    /// Reconstruct a file's bytes from its directory entry.
    ///
    /// The chain walk is capped at the cluster count implied by the declared
    /// file size; trailing bytes of the final cluster beyond that size are
    /// discarded. Chain errors are local to this file and leave the volume
    /// usable.
    pub fn read_file(&mut self, entry: &DirEntry) -> Result<Vec<u8>, FatscopeError> {
        let size = entry.file_size as usize;
        // Start cluster 0 denotes an empty file; no chain walk, no data read.
        if entry.first_cluster == 0 || size == 0 {
            return Ok(Vec::new());
        }

        let cluster_size = self.layout.cluster_size_bytes as usize;
        let max_clusters = (size + cluster_size - 1) / cluster_size;
        let chain = follow_chain(&self.fat, entry.first_cluster, max_clusters)?;

        debug!(
            "reading {} bytes for {} from a {}-cluster chain",
            size,
            entry.short_name(),
            chain.len()
        );

        let mut content = Vec::with_capacity(size);
        for cluster in chain {
            self.check_data_cluster(cluster)?;
            let remaining = size - content.len();
            let take = remaining.min(cluster_size);
            let data = self
                .reader
                .read_at(self.layout.cluster_offset(cluster), take)?;
            content.extend_from_slice(&data);
            if content.len() >= size {
                break;
            }
        }
        Ok(content)
    }

    fn check_data_cluster(&self, cluster: u16) -> Result<(), FatscopeError> {
        if cluster < 2 || cluster as u32 >= self.layout.total_clusters + 2 {
            return Err(FatscopeError::CorruptChain(format!(
                "cluster {} is outside the data region (volume has {} clusters)",
                cluster, self.layout.total_clusters
            )));
        }
        Ok(())
    }

    fn read_root_slot(&mut self, slot: u32) -> Result<DirEntry, FatscopeError> {
        let offset = self.layout.root_dir_offset + slot as u64 * DIR_ENTRY_SIZE as u64;
        let buf = self.reader.read_at(offset, DIR_ENTRY_SIZE)?;
        DirEntry::parse(&buf)
    }
}

/// Lazy iterator over the root directory's live entries.
pub struct RootEntries<'a> {
    volume: &'a mut Fat16Volume,
    slot: u32,
    done: bool,
}

impl Iterator for RootEntries<'_> {
    type Item = Result<DirEntry, FatscopeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while self.slot < self.volume.layout.root_entry_count() {
            let entry = match self.volume.read_root_slot(self.slot) {
                Ok(entry) => entry,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            };
            self.slot += 1;

            if entry.is_end() {
                self.done = true;
                return None;
            }
            if entry.is_deleted() || entry.is_volume_label() {
                continue;
            }
            return Some(Ok(entry));
        }
        self.done = true;
        None
    }
}
