//! btdualboot - Main Entry Point
//!
//! Compares Bluetooth link keys stored by Windows and Linux on a dual-boot
//! machine.

use btdualboot::collaborators::{EditorLauncher, ExistingHive, ScriptFile, StorageProvisioner};
use btdualboot::error::Result;
use btdualboot::instructions::InstructionGenerator;
use btdualboot::logging::{bump_level, init_logging, LoggingConfig};
use btdualboot::readers::RegistryHive;
use btdualboot::report::{collect, render_text, Report};
use btdualboot::settings::{AppConfig, ConfigManager};
use clap::Parser;
use log::info;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug, Clone)]
#[command(name = "btdualboot", version)]
#[command(about = "Synchronize Bluetooth pairing keys between Linux and Windows")]
pub struct Args {
    /// Use a different configuration file (default: $XDG_CONFIG_HOME/btdualboot.toml)
    #[arg(short = 'c', long)]
    pub config_file: Option<PathBuf>,

    /// Windows SYSTEM registry hive
    #[arg(long)]
    pub hive: Option<PathBuf>,

    /// Control set to read ("current" follows Select\Current)
    #[arg(long)]
    pub control_set: Option<String>,

    /// BlueZ storage directory
    #[arg(long)]
    pub bluetooth_dir: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Write registry editor commands for mismatched keys to this file
    #[arg(long, value_name = "PATH")]
    pub write_script: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// More logging; repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(hive) = &args.hive {
        config.registry.hive_file = Some(hive.clone());
    }
    if let Some(control_set) = &args.control_set {
        config.registry.control_set = control_set.clone();
    }
    if let Some(dir) = &args.bluetooth_dir {
        config.linux.bluetooth_dir = dir.clone();
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
}

fn print_report(report: &Report, json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        let text = serde_json::to_string_pretty(report)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        writeln!(out, "{}", text)?;
    } else {
        render_text(report, &mut out)?;
    }
    Ok(())
}

fn reconcile_hive(config: &AppConfig, args: &Args, hive_path: &Path) -> Result<()> {
    let hive = RegistryHive::open(
        hive_path,
        &config.registry.control_set,
        &config.registry.keys_path,
    )?;
    let control_set = hive.control_set_name()?;
    info!("Using control set {}", control_set);

    let generator = InstructionGenerator::new(config.pairing_keys_path(&control_set));
    let report = collect(&hive, &config.linux.bluetooth_dir, &generator)?;
    print_report(&report, args.json)?;

    if let Some(script) = &args.write_script {
        let fixes = report.fixes();
        if fixes.is_empty() {
            info!("No mismatched keys, not writing {:?}", script);
        } else {
            ScriptFile::new(script).launch(hive_path, &fixes)?;
        }
    }

    Ok(())
}

fn run(args: Args) -> Result<()> {
    let mut config = ConfigManager::new(args.config_file.clone()).load()?;
    apply_overrides(&mut config, &args);

    let mut logging = LoggingConfig::try_from(&config.logging)?;
    logging.level = bump_level(logging.level, args.verbose);
    if let Err(e) = init_logging(logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let mut provisioner = ExistingHive::new(config.hive_file()?);
    let hive_path = provisioner.provision()?;

    let result = reconcile_hive(&config, &args, &hive_path);
    provisioner.release()?;
    result
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("btdualboot: {}", e);
            ExitCode::FAILURE
        }
    }
}
