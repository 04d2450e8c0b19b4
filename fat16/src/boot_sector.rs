// FAT16 boot sector decoding
//
// Fields are decoded one at a time from their documented offsets instead of
// overlaying a packed struct on the raw bytes, so the result never depends on
// host alignment or byte order. All multi-byte integers are little-endian.

use fatscope_core::FatscopeError;
use serde::{Deserialize, Serialize};

use crate::constants::*;

pub(crate) fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

pub(crate) fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ])
}

/// BIOS parameter block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BiosParameterBlock {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub reserved_sectors: u16,
    pub num_fats: u8,
    pub root_entries: u16,
    pub total_sectors_16: u16,
    pub media_descriptor: u8,
    pub sectors_per_fat: u16,
    pub sectors_per_track: u16,
    pub num_heads: u16,
    pub hidden_sectors: u32,
    pub total_sectors_32: u32,
}

/// FAT16 extended BIOS parameter block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ExtendedBpb {
    pub drive_number: u8,
    pub reserved: u8,
    pub boot_signature: u8,
    pub volume_id: u32,
    pub volume_label: [u8; 11],
    pub fs_type: [u8; 8],
}

/// Decoded boot sector.
///
/// Fixed-width text fields (`oem_name`, `volume_label`, `fs_type`) are kept
/// verbatim, padding included; trimming for display is [`trim_padded`]'s job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BootSector {
    pub jump_boot: [u8; 3],
    pub oem_name: [u8; 8],
    pub bpb: BiosParameterBlock,
    pub ext: ExtendedBpb,
    pub boot_sector_signature: u16,
}

impl BootSector {
    /// Decode the boot sector from the first bytes of a volume.
    pub fn parse(buf: &[u8]) -> Result<Self, FatscopeError> {
        if buf.len() < BOOT_SECTOR_SIZE {
            return Err(FatscopeError::TruncatedRecord {
                offset: 0,
                needed: BOOT_SECTOR_SIZE,
                got: buf.len(),
            });
        }

        let mut jump_boot = [0u8; 3];
        jump_boot.copy_from_slice(&buf[BS_JMP_BOOT..BS_JMP_BOOT + 3]);
        let mut oem_name = [0u8; 8];
        oem_name.copy_from_slice(&buf[BS_OEM_NAME..BS_OEM_NAME + 8]);

        let bpb = BiosParameterBlock {
            bytes_per_sector: read_u16(buf, BPB_BYTES_PER_SEC),
            sectors_per_cluster: buf[BPB_SEC_PER_CLUS],
            reserved_sectors: read_u16(buf, BPB_RSVD_SEC_CNT),
            num_fats: buf[BPB_NUM_FATS],
            root_entries: read_u16(buf, BPB_ROOT_ENT_CNT),
            total_sectors_16: read_u16(buf, BPB_TOT_SEC16),
            media_descriptor: buf[BPB_MEDIA],
            sectors_per_fat: read_u16(buf, BPB_FAT_SZ16),
            sectors_per_track: read_u16(buf, BPB_SEC_PER_TRK),
            num_heads: read_u16(buf, BPB_NUM_HEADS),
            hidden_sectors: read_u32(buf, BPB_HIDD_SEC),
            total_sectors_32: read_u32(buf, BPB_TOT_SEC32),
        };

        let mut volume_label = [0u8; 11];
        volume_label.copy_from_slice(&buf[BS16_VOL_LAB..BS16_VOL_LAB + 11]);
        let mut fs_type = [0u8; 8];
        fs_type.copy_from_slice(&buf[BS16_FIL_SYS_TYPE..BS16_FIL_SYS_TYPE + 8]);

        let ext = ExtendedBpb {
            drive_number: buf[BS16_DRV_NUM],
            reserved: buf[BS16_RESERVED1],
            boot_signature: buf[BS16_BOOT_SIG],
            volume_id: read_u32(buf, BS16_VOL_ID),
            volume_label,
            fs_type,
        };

        Ok(Self {
            jump_boot,
            oem_name,
            bpb,
            ext,
            boot_sector_signature: read_u16(buf, BOOT_SIGNATURE_OFFSET),
        })
    }

    /// Resolve the total sector count: the 16-bit field unless it is 0, in
    /// which case the 32-bit "large" field.
    pub fn total_sectors(&self) -> u32 {
        if self.bpb.total_sectors_16 != 0 {
            self.bpb.total_sectors_16 as u32
        } else {
            self.bpb.total_sectors_32
        }
    }
}

/// Render a fixed-width, space/NUL padded on-disk text field for display.
///
/// On-disk text fields are not NUL-terminated; only trailing padding is
/// dropped, embedded spaces survive.
pub fn trim_padded(field: &[u8]) -> String {
    let end = field
        .iter()
        .rposition(|&b| b != b' ' && b != 0)
        .map_or(0, |i| i + 1);
    field[..end].iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_boot_sector() -> Vec<u8> {
        let mut buf = vec![0u8; BOOT_SECTOR_SIZE];
        buf[0..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
        buf[BS_OEM_NAME..BS_OEM_NAME + 8].copy_from_slice(b"MSDOS5.0");
        buf[BPB_BYTES_PER_SEC..BPB_BYTES_PER_SEC + 2].copy_from_slice(&512u16.to_le_bytes());
        buf[BPB_SEC_PER_CLUS] = 4;
        buf[BPB_RSVD_SEC_CNT..BPB_RSVD_SEC_CNT + 2].copy_from_slice(&1u16.to_le_bytes());
        buf[BPB_NUM_FATS] = 2;
        buf[BPB_ROOT_ENT_CNT..BPB_ROOT_ENT_CNT + 2].copy_from_slice(&512u16.to_le_bytes());
        buf[BPB_TOT_SEC16..BPB_TOT_SEC16 + 2].copy_from_slice(&20480u16.to_le_bytes());
        buf[BPB_MEDIA] = MEDIA_FIXED;
        buf[BPB_FAT_SZ16..BPB_FAT_SZ16 + 2].copy_from_slice(&9u16.to_le_bytes());
        buf[BPB_SEC_PER_TRK..BPB_SEC_PER_TRK + 2].copy_from_slice(&63u16.to_le_bytes());
        buf[BPB_NUM_HEADS..BPB_NUM_HEADS + 2].copy_from_slice(&16u16.to_le_bytes());
        buf[BS16_DRV_NUM] = 0x80;
        buf[BS16_BOOT_SIG] = 0x29;
        buf[BS16_VOL_ID..BS16_VOL_ID + 4].copy_from_slice(&0xDEAD_BEEFu32.to_le_bytes());
        buf[BS16_VOL_LAB..BS16_VOL_LAB + 11].copy_from_slice(b"TESTVOL    ");
        buf[BS16_FIL_SYS_TYPE..BS16_FIL_SYS_TYPE + 8].copy_from_slice(b"FAT16   ");
        buf[BOOT_SIGNATURE_OFFSET..BOOT_SIGNATURE_OFFSET + 2]
            .copy_from_slice(&BOOT_SIGNATURE.to_le_bytes());
        buf
    }

    #[test]
    fn decodes_all_fields() {
        let boot = BootSector::parse(&sample_boot_sector()).unwrap();

        assert_eq!(boot.jump_boot, [0xEB, 0x3C, 0x90]);
        assert_eq!(&boot.oem_name, b"MSDOS5.0");
        assert_eq!(boot.bpb.bytes_per_sector, 512);
        assert_eq!(boot.bpb.sectors_per_cluster, 4);
        assert_eq!(boot.bpb.reserved_sectors, 1);
        assert_eq!(boot.bpb.num_fats, 2);
        assert_eq!(boot.bpb.root_entries, 512);
        assert_eq!(boot.bpb.total_sectors_16, 20480);
        assert_eq!(boot.bpb.media_descriptor, MEDIA_FIXED);
        assert_eq!(boot.bpb.sectors_per_fat, 9);
        assert_eq!(boot.ext.drive_number, 0x80);
        assert_eq!(boot.ext.boot_signature, 0x29);
        assert_eq!(boot.ext.volume_id, 0xDEAD_BEEF);
        assert_eq!(&boot.ext.volume_label, b"TESTVOL    ");
        assert_eq!(&boot.ext.fs_type, b"FAT16   ");
        assert_eq!(boot.boot_sector_signature, BOOT_SIGNATURE);
    }

    #[test]
    fn total_sectors_prefers_small_field() {
        let mut buf = sample_boot_sector();
        let boot = BootSector::parse(&buf).unwrap();
        assert_eq!(boot.total_sectors(), 20480);

        // Zero small field falls back to the large one
        buf[BPB_TOT_SEC16..BPB_TOT_SEC16 + 2].copy_from_slice(&0u16.to_le_bytes());
        buf[BPB_TOT_SEC32..BPB_TOT_SEC32 + 4].copy_from_slice(&1_000_000u32.to_le_bytes());
        let boot = BootSector::parse(&buf).unwrap();
        assert_eq!(boot.total_sectors(), 1_000_000);
    }

    #[test]
    fn short_buffer_is_truncated_record() {
        let err = BootSector::parse(&[0u8; 100]).unwrap_err();
        assert!(matches!(
            err,
            FatscopeError::TruncatedRecord {
                needed: BOOT_SECTOR_SIZE,
                got: 100,
                ..
            }
        ));
    }

    #[test]
    fn trim_padded_drops_trailing_padding_only() {
        assert_eq!(trim_padded(b"FAT16   "), "FAT16");
        assert_eq!(trim_padded(b"NO NAME    "), "NO NAME");
        assert_eq!(trim_padded(b"ABC\0\0\0\0\0"), "ABC");
        assert_eq!(trim_padded(b"        "), "");
    }
}
