//! coffer - command-line streaming file encryption.
//!
//! Encrypts standard input or a file into a self-describing container
//! (Argon2id key derivation, ChaCha20-Poly1305 chunked sealing) and back.

use clap::{Parser, Subcommand};
use coffer::{password, storage, CofferError, Params};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Command-line interface definition
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Password-based streaming encryption. Containers carry their own \
                  key-derivation parameters, so decryption only needs the password."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a file or standard input into a container
    Encrypt {
        /// Input file (standard input when omitted)
        input: Option<PathBuf>,
        /// Output file, written atomically (standard output when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Password (prompted on the terminal when omitted)
        #[arg(short, long)]
        password: Option<String>,
        /// Argon2 passes
        #[arg(long, value_name = "N")]
        time: Option<u32>,
        /// Argon2 memory in KiB
        #[arg(long, value_name = "KIB")]
        memory: Option<u32>,
        /// Argon2 parallelism
        #[arg(long, value_name = "N")]
        threads: Option<u8>,
        /// Plaintext bytes per chunk
        #[arg(long, value_name = "BYTES")]
        chunk_size: Option<i64>,
    },
    /// Decrypt a container back into plaintext
    Decrypt {
        /// Input file (standard input when omitted)
        input: Option<PathBuf>,
        /// Output file, written atomically (standard output when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Password (prompted on the terminal when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
}

fn main() {
    if let Err(err) = run(Cli::parse()) {
        eprintln!("coffer: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> coffer::Result<()> {
    match cli.command {
        Commands::Encrypt {
            input,
            output,
            password,
            time,
            memory,
            threads,
            chunk_size,
        } => {
            let mut params = Params {
                argon_time: time.unwrap_or(0),
                argon_memory: memory.unwrap_or(0),
                argon_threads: threads.unwrap_or(0),
                chunk_size: chunk_size.unwrap_or(0),
                ..Params::default()
            };
            params.check()?;

            let password = flag_or_prompt(password, true)?;
            with_input(input.as_deref(), |src| {
                with_output(output.as_deref(), |dst| {
                    coffer::encrypt(password.as_bytes(), src, dst, &mut params)
                })
            })
        }
        Commands::Decrypt {
            input,
            output,
            password,
        } => {
            let password = flag_or_prompt(password, false)?;
            with_input(input.as_deref(), |src| {
                with_output(output.as_deref(), |dst| {
                    coffer::decrypt(password.as_bytes(), src, dst)
                })
            })
        }
    }
}

/// Takes the password from the flag, or prompts on the terminal. An empty
/// password is refused either way; encryption additionally prompts twice.
fn flag_or_prompt(flag: Option<String>, new_password: bool) -> coffer::Result<Zeroizing<String>> {
    match flag {
        Some(flagged) if flagged.is_empty() => Err(CofferError::Password(
            "password must not be empty".to_string(),
        )),
        Some(flagged) => Ok(Zeroizing::new(flagged)),
        None if new_password => password::prompt_new_password(),
        None => password::prompt_password(),
    }
}

fn with_input<F>(path: Option<&Path>, f: F) -> coffer::Result<()>
where
    F: FnOnce(&mut dyn BufRead) -> coffer::Result<()>,
{
    match path {
        Some(path) => f(&mut BufReader::new(File::open(path)?)),
        None => f(&mut io::stdin().lock()),
    }
}

fn with_output<F>(path: Option<&Path>, f: F) -> coffer::Result<()>
where
    F: FnOnce(&mut dyn Write) -> coffer::Result<()>,
{
    match path {
        Some(path) => storage::write_atomically(path, |file| {
            let mut dst = BufWriter::new(file);
            f(&mut dst)?;
            dst.flush()?;
            Ok(())
        }),
        None => {
            let stdout = io::stdout();
            let mut dst = BufWriter::new(stdout.lock());
            f(&mut dst)?;
            dst.flush()?;
            Ok(())
        }
    }
}
