// Root directory entries

use fatscope_core::FatscopeError;
use serde::{Deserialize, Serialize};

use crate::boot_sector::{read_u16, read_u32};
use crate::constants::*;
use crate::timestamps::{FatDate, FatTime};

/// Directory entry attribute flags.
///
/// Read-only, hidden and system are three independent single bits; an entry
/// may carry any combination. The volume-label bit marks an entry that is
/// neither a file nor a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatAttributes(pub u8);

impl FatAttributes {
    pub const READ_ONLY: u8 = 0x01;
    pub const HIDDEN: u8 = 0x02;
    pub const SYSTEM: u8 = 0x04;
    pub const VOLUME_ID: u8 = 0x08;
    pub const DIRECTORY: u8 = 0x10;
    pub const ARCHIVE: u8 = 0x20;

    pub fn is_read_only(&self) -> bool {
        self.0 & Self::READ_ONLY != 0
    }
    pub fn is_hidden(&self) -> bool {
        self.0 & Self::HIDDEN != 0
    }
    pub fn is_system(&self) -> bool {
        self.0 & Self::SYSTEM != 0
    }
    pub fn is_volume_id(&self) -> bool {
        self.0 & Self::VOLUME_ID != 0
    }
    pub fn is_directory(&self) -> bool {
        self.0 & Self::DIRECTORY != 0
    }
    pub fn is_archive(&self) -> bool {
        self.0 & Self::ARCHIVE != 0
    }
}

/// One 32-byte directory entry, decoded field by field.
///
/// Entries are transient values read from one directory slot; nothing is
/// ever written back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: [u8; 11],
    pub attributes: FatAttributes,
    pub nt_reserved: u8,
    pub creation_time_tenths: u8,
    pub creation_time: u16,
    pub creation_date: u16,
    pub access_date: u16,
    pub first_cluster_high: u16,
    pub write_time: u16,
    pub write_date: u16,
    pub first_cluster: u16,
    pub file_size: u32,
}

impl DirEntry {
    /// Decode a directory entry from one 32-byte slot.
    pub fn parse(buf: &[u8]) -> Result<Self, FatscopeError> {
        if buf.len() < DIR_ENTRY_SIZE {
            return Err(FatscopeError::TruncatedRecord {
                offset: 0,
                needed: DIR_ENTRY_SIZE,
                got: buf.len(),
            });
        }

        let mut name = [0u8; 11];
        name.copy_from_slice(&buf[DIR_NAME..DIR_NAME + 11]);

        Ok(Self {
            name,
            attributes: FatAttributes(buf[DIR_ATTR]),
            nt_reserved: buf[DIR_NT_RES],
            creation_time_tenths: buf[DIR_CRT_TIME_TENTH],
            creation_time: read_u16(buf, DIR_CRT_TIME),
            creation_date: read_u16(buf, DIR_CRT_DATE),
            access_date: read_u16(buf, DIR_LST_ACC_DATE),
            first_cluster_high: read_u16(buf, DIR_FST_CLUS_HI),
            write_time: read_u16(buf, DIR_WRT_TIME),
            write_date: read_u16(buf, DIR_WRT_DATE),
            first_cluster: read_u16(buf, DIR_FST_CLUS_LO),
            file_size: read_u32(buf, DIR_FILE_SIZE),
        })
    }

    /// End-of-directory marker: no entry in this slot or any later one.
    pub fn is_end(&self) -> bool {
        self.name[0] == DIR_ENTRY_END
    }

    pub fn is_deleted(&self) -> bool {
        self.name[0] == DIR_ENTRY_DELETED
    }

    pub fn is_volume_label(&self) -> bool {
        self.attributes.is_volume_id()
    }

    pub fn is_directory(&self) -> bool {
        self.attributes.is_directory()
    }

    pub fn is_file(&self) -> bool {
        !self.is_directory() && !self.is_volume_label()
    }

    /// Render the 8.3 short name as `NAME.EXT`.
    pub fn short_name(&self) -> String {
        let mut name = String::new();

        for i in 0..8 {
            let b = self.name[i];
            if b == b' ' || b == 0 {
                break;
            }
            if i == 0 && b == DIR_ENTRY_KANJI_E5 {
                name.push(0xE5 as char);
            } else {
                name.push(b as char);
            }
        }

        let mut has_ext = false;
        for i in 8..11 {
            let b = self.name[i];
            if b != b' ' && b != 0 {
                if !has_ext {
                    name.push('.');
                    has_ext = true;
                }
                name.push(b as char);
            }
        }

        name
    }

    pub fn created(&self) -> (FatDate, FatTime) {
        (
            FatDate::from_raw(self.creation_date),
            FatTime::from_raw(self.creation_time),
        )
    }

    pub fn modified(&self) -> (FatDate, FatTime) {
        (
            FatDate::from_raw(self.write_date),
            FatTime::from_raw(self.write_time),
        )
    }

    pub fn accessed(&self) -> FatDate {
        FatDate::from_raw(self.access_date)
    }
}
