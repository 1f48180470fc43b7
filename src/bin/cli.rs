//! kvwire CLI Client
//!
//! Runs a single command against a server over the inline protocol.

use clap::{Parser, Subcommand};
use kvwire::{ClientConfig, Connection, Request};
use tracing_subscriber::{fmt, EnvFilter};

/// kvwire CLI
#[derive(Parser, Debug)]
#[command(name = "kvwire-cli")]
#[command(about = "CLI for key-value servers speaking the inline protocol")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:6379")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the server
    Ping,

    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete one or more keys
    Del {
        /// The keys to delete
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Increment the integer stored at a key
    Incr {
        /// The key to increment
        key: String,
    },

    /// Check whether a key exists
    Exists {
        /// The key to check
        key: String,
    },

    /// List keys matching a pattern
    Keys {
        /// Glob-style pattern
        #[arg(default_value = "*")]
        pattern: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = ClientConfig::builder().addr(&args.server).build();

    if let Err(e) = run(&config, args.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: &ClientConfig, command: Commands) -> kvwire::Result<()> {
    let mut conn = Connection::connect(config)?;

    match command {
        Commands::Ping => {
            conn.write_command(&Request::new("PING"))?;
            if conn.read_status("PONG")? {
                println!("PONG");
            } else {
                println!("unexpected reply to PING");
            }
        }
        Commands::Get { key } => {
            conn.write_command(&Request::new("GET").arg(&key))?;
            match conn.read_bulk()? {
                Some(value) => println!("{}", value),
                None => println!("(nil)"),
            }
        }
        Commands::Set { key, value } => {
            conn.write_value("SET", &key, value)?;
            println!("{}", if conn.read_ok()? { "OK" } else { "not set" });
        }
        Commands::Del { keys } => {
            conn.write_cmd("DEL", &keys)?;
            println!("(integer) {}", conn.read_int()?);
        }
        Commands::Incr { key } => {
            conn.write_command(&Request::new("INCR").arg(&key))?;
            println!("(integer) {}", conn.read_int64()?);
        }
        Commands::Exists { key } => {
            conn.write_command(&Request::new("EXISTS").arg(&key))?;
            println!("{}", conn.read_bool()?);
        }
        Commands::Keys { pattern } => {
            conn.write_command(&Request::new("KEYS").arg(&pattern))?;
            let keys = conn.read_multi_bulk()?;
            if keys.is_empty() {
                println!("(empty list)");
            }
            for (i, key) in keys.iter().enumerate() {
                println!("{}) {}", i + 1, key.as_deref().unwrap_or("(nil)"));
            }
        }
    }

    conn.close();
    Ok(())
}
