use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fatscope_fat16::constants::{BOOT_CODE_SIZE, MEDIA_FIXED};
use fatscope_fat16::{
    fat_datetime_to_naive, trim_padded, DirEntry, Fat16Volume, FatDate, FatTime,
};

#[derive(Parser)]
#[command(name = "fatscope")]
#[command(about = "Read-only FAT16 disk image inspector", long_about = None)]
struct Cli {
    /// Path to the FAT16 disk image
    image: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the boot sector and calculated volume parameters
    Info,
    /// List root directory entries
    List,
    /// Write one file's contents to stdout
    Cat {
        /// 8.3 short name, case-insensitive (e.g. README.TXT)
        name: String,
    },
    /// Full report: boot sector, root directory, and file contents
    Inspect,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut volume = Fat16Volume::open(&cli.image)?;

    match cli.command {
        Commands::Info => print_boot_sector(&volume),
        Commands::List => {
            println!("Root directory:");
            for entry in volume.root_entries() {
                print_entry(&entry?);
            }
        }
        Commands::Cat { name } => {
            let entries = volume
                .root_entries()
                .collect::<Result<Vec<_>, _>>()?;
            let entry = entries
                .iter()
                .find(|e| e.is_file() && e.short_name().eq_ignore_ascii_case(&name))
                .ok_or_else(|| anyhow::anyhow!("File not found in root directory: {}", name))?;

            let content = volume.read_file(entry)?;
            std::io::stdout().write_all(&content)?;
        }
        Commands::Inspect => {
            print_boot_sector(&volume);

            println!();
            println!("Root directory:");
            let entries = volume
                .root_entries()
                .collect::<Result<Vec<_>, _>>()?;
            for entry in &entries {
                print_entry(entry);
                if entry.is_file() {
                    // A damaged file must not stop inspection of the rest
                    match volume.read_file(entry) {
                        Ok(content) => {
                            println!("    Content:");
                            println!("{}    <EOF>", String::from_utf8_lossy(&content));
                        }
                        Err(e) => eprintln!("    Content unreadable: {}", e),
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_boot_sector(volume: &Fat16Volume) {
    let boot = volume.boot_sector();
    let layout = volume.layout();
    let bpb = &boot.bpb;
    let ext = &boot.ext;

    println!(
        "Jump instruction: {:02X} {:02X} {:02X}",
        boot.jump_boot[0], boot.jump_boot[1], boot.jump_boot[2]
    );
    println!("OEM name: {}", trim_padded(&boot.oem_name));

    println!("\nBIOS parameters:");
    println!("  Bytes per sector: {}", bpb.bytes_per_sector);
    println!("  Sectors per cluster: {}", bpb.sectors_per_cluster);
    println!("  Reserved sectors: {}", bpb.reserved_sectors);
    println!("  Number of FATs: {}", bpb.num_fats);
    println!("  Maximum root entries: {}", bpb.root_entries);
    println!(
        "  Total sectors: {} (small: {}, large: {})",
        boot.total_sectors(),
        bpb.total_sectors_16,
        bpb.total_sectors_32
    );
    println!(
        "  Media descriptor: 0x{:02X}{}",
        bpb.media_descriptor,
        if bpb.media_descriptor == MEDIA_FIXED {
            " (fixed disk)"
        } else {
            ""
        }
    );
    println!("  Sectors per FAT: {}", bpb.sectors_per_fat);
    println!("  Sectors per track: {}", bpb.sectors_per_track);
    println!("  Number of heads: {}", bpb.num_heads);
    println!("  Sectors before partition: {}", bpb.hidden_sectors);

    println!("\nExtended BIOS parameters:");
    println!(
        "  Physical drive code: 0x{:02X} ({})",
        ext.drive_number,
        if ext.drive_number == 0 {
            "removable"
        } else {
            "physical"
        }
    );
    println!("  Reserved byte (WinNT): 0x{:02X}", ext.reserved);
    println!("  Extended boot signature: 0x{:02X}", ext.boot_signature);
    println!("  Volume serial number: 0x{:08X}", ext.volume_id);
    println!("  Volume label: {}", trim_padded(&ext.volume_label));
    println!("  FAT type: {}", trim_padded(&ext.fs_type));
    println!("  OS boot code: {} bytes", BOOT_CODE_SIZE);
    println!("  Boot sector signature: 0x{:04X}", boot.boot_sector_signature);

    println!("\nCalculated parameters:");
    println!("  FAT size: {} bytes", layout.fat_size_bytes);
    for i in 0..bpb.num_fats {
        println!(
            "  FAT #{} offset: {:#010x}",
            i + 1,
            layout.fat_offset + layout.fat_size_bytes * i as u64
        );
    }
    println!("  Root directory offset: {:#010x}", layout.root_dir_offset);
    println!("  Root directory size: {} bytes", layout.root_dir_size_bytes);
    println!("  Data offset: {:#010x}", layout.data_offset);
    println!("  Cluster size: {} bytes", layout.cluster_size_bytes);
    println!("  Total clusters: {}", layout.total_clusters);
}

fn print_entry(entry: &DirEntry) {
    println!("  {}", entry.short_name());
    println!(
        "    bytes: {}  cluster: {}",
        entry.file_size, entry.first_cluster
    );
    println!(
        "    created:  {}",
        format_datetime(entry.creation_date, entry.creation_time)
    );
    println!(
        "    modified: {}",
        format_datetime(entry.write_date, entry.write_time)
    );
    println!("    accessed: {}", format_date(entry.accessed()));

    let attrs = entry.attributes;
    println!(
        "    ro:{} hide:{} sys:{} dir:{} arch:{}",
        yes_no(attrs.is_read_only()),
        yes_no(attrs.is_hidden()),
        yes_no(attrs.is_system()),
        yes_no(attrs.is_directory()),
        yes_no(attrs.is_archive())
    );
}

fn format_datetime(date: u16, time: u16) -> String {
    match fat_datetime_to_naive(date, time) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        // Zeroed or nonsensical on-disk values: show the raw fields
        None => {
            let d = FatDate::from_raw(date);
            let t = FatTime::from_raw(time);
            format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                d.year, d.month, d.day, t.hour, t.minute, t.second
            )
        }
    }
}

fn format_date(date: FatDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year, date.month, date.day)
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
