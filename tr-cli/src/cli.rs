//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tr_model::StorageType;

#[derive(Debug, Parser)]
#[command(name = "teensyrom", version, about = "Control a TeensyROM cartridge over USB serial")]
pub struct Cli {
    /// Serial port to use; discovered automatically when omitted
    #[arg(long, global = true)]
    pub port: Option<String>,

    #[arg(long, global = true, default_value_t = tr_shared::transport::serial_port::DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Settings JSON file (storage, target directories, known ports)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Storage to target, overriding the settings file
    #[arg(long, global = true, value_enum)]
    pub storage: Option<StorageArg>,

    /// More output; repeat for more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageArg {
    Sd,
    Usb,
}

impl From<StorageArg> for StorageType {
    fn from(arg: StorageArg) -> Self {
        match arg {
            StorageArg::Sd => StorageType::Sd,
            StorageArg::Usb => StorageType::Usb,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List serial ports, known ports first
    Ports,
    /// Ping the cartridge and show how it answered
    Ping,
    /// Reset the C64
    Reset,
    /// List a directory
    Ls {
        #[arg(default_value = "/")]
        path: String,
        #[arg(long, default_value_t = 0)]
        skip: u16,
        #[arg(long, default_value_t = 5000)]
        take: u16,
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Launch a file already on the cartridge
    Launch { path: String },
    /// Upload local files
    Save {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Target directory; defaults to the one configured per file type
        #[arg(long)]
        to: Option<String>,
    },
    /// Copy a file on the cartridge
    Copy { source: String, destination: String },
    /// Delete a file on the cartridge
    Rm { path: String },
    /// Pause or resume SID playback
    ToggleMusic,
}
