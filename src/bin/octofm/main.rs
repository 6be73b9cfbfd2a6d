//! octofm - command line front end
//!
//! Renders patches from a bank file to WAV, plays them back, or prints a
//! parameter summary. The bank file is the flat 256-patch image the engine's
//! store reads and writes wholesale.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};

use octofm::engine::Renderer;
use octofm::io::wav;
use octofm::patch::{DialId, OscId, OscParam, PatchBank};
use octofm::store;

#[derive(Parser)]
#[command(name = "octofm", about = "Offline FM/AM patch synthesizer")]
struct Cli {
    /// Bank file holding all 256 patches.
    #[arg(long, default_value = "bank.save")]
    banks: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a bank and write it to a WAV file.
    Export {
        /// Bank number (0-255).
        bank: u8,
        /// Output path; defaults to bank-<n>.wav.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Render a bank and play it on the default output device.
    #[cfg(feature = "playback")]
    Play {
        /// Bank number (0-255).
        bank: u8,
    },
    /// Print a bank's parameter summary.
    Info {
        /// Bank number (0-255).
        bank: u8,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let banks = load_banks(&cli.banks)?;
    let renderer = Renderer::default();

    match cli.command {
        Command::Export { bank, out } => {
            let clip = renderer.render_patch(banks.patch(bank));
            let out = out.unwrap_or_else(|| PathBuf::from(format!("bank-{bank}.wav")));
            wav::write_clip(&out, &clip).wrap_err("WAV export failed")?;
            println!(
                "wrote {} ({} samples, {:.1} s)",
                out.display(),
                clip.len(),
                clip.duration_secs()
            );
        }
        #[cfg(feature = "playback")]
        Command::Play { bank } => {
            let clip = renderer.render_patch(banks.patch(bank));
            println!("playing bank {bank} ({:.1} s)", clip.duration_secs());
            octofm::io::playback::play_clip(&clip).wrap_err("playback failed")?;
        }
        Command::Info { bank } => {
            print_info(bank, &banks);
        }
    }

    Ok(())
}

/// A missing bank file is not an error - the synth starts from silence, the
/// same way a fresh install would.
fn load_banks(path: &Path) -> Result<PatchBank> {
    if path.exists() {
        store::load(path).wrap_err_with(|| format!("loading bank file {}", path.display()))
    } else {
        Ok(PatchBank::default())
    }
}

fn print_info(bank: u8, banks: &PatchBank) {
    let patch = banks.patch(bank);
    println!("bank {bank}: {} s section", patch.section_len());

    for osc in OscId::ALL {
        let amp = patch.scaled(DialId::Osc(osc, OscParam::Amplitude));
        if amp != 0.0 {
            println!(
                "  {osc:?}: {:.1} Hz, amplitude {amp:.1}, resolution {:.1}, shape {:.2}",
                patch.scaled(DialId::Osc(osc, OscParam::Frequency)),
                patch.scaled(DialId::Osc(osc, OscParam::Resolution)),
                patch.dial(DialId::Osc(osc, OscParam::Shape)),
            );
        }
    }

    let crush = patch.scaled(DialId::CrushAmount);
    if crush > 0.0 {
        println!("  crush: {:.0} samples", crush * 33.0);
    }
    let offset = patch.dial(DialId::EnvelopeOffset);
    if offset > 0.0 {
        println!("  envelope offset: {:.2}", offset);
    }
}
