// FAT16 volume inspection: boot sector decoding, layout resolution, root
// directory enumeration, and cluster-chain file reading. Read-only.

pub mod boot_sector;
pub mod chain;
pub mod constants;
pub mod directory;
pub mod layout;
pub mod timestamps;
pub mod volume;

pub use boot_sector::{trim_padded, BiosParameterBlock, BootSector, ExtendedBpb};
pub use directory::{DirEntry, FatAttributes};
pub use layout::VolumeLayout;
pub use timestamps::{fat_datetime_to_naive, FatDate, FatTime};
pub use volume::{Fat16Volume, RootEntries};

pub use fatscope_core::FatscopeError;
