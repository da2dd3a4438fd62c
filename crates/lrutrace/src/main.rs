//! lrutrace - prints how an LRU store reacts to a sequence of touches

mod trace;

use anyhow::Result;
use clap::Parser;
use lrustore::Capacity;
use tracing::info;

use crate::trace::Trace;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Keys to touch, in order
    #[arg(default_values_t = ["STR1", "STR2", "STR3", "STR4", "STR5", "STR6"].map(String::from))]
    keys: Vec<String>,

    /// Store capacity (number of entries)
    #[arg(short, long, default_value_t = Capacity::default(), allow_negative_numbers = true)]
    capacity: Capacity,

    /// Keys to remove after all touches
    #[arg(short, long = "remove", value_name = "KEY")]
    remove: Vec<String>,

    /// Print activity counters at the end
    #[arg(long)]
    stats: bool,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("Starting lrutrace v{}", env!("CARGO_PKG_VERSION"));
    info!("Store capacity: {}", args.capacity);

    let stdout = std::io::stdout();
    let mut trace = Trace::new(args.capacity, stdout.lock());

    for key in args.keys {
        trace.touch(key)?;
    }
    for key in &args.remove {
        trace.remove(key)?;
    }
    if args.stats {
        trace.stats()?;
    }

    info!("Done, {} entries resident", trace.resident());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["lrutrace"]);

        assert_eq!(args.keys, vec!["STR1", "STR2", "STR3", "STR4", "STR5", "STR6"]);
        assert_eq!(args.capacity.get(), 5);
        assert!(args.remove.is_empty());
        assert!(!args.stats);
    }

    #[test]
    fn test_args_custom() {
        let args = Args::parse_from(["lrutrace", "-c", "2", "-r", "a", "--stats", "a", "b"]);

        assert_eq!(args.keys, vec!["a", "b"]);
        assert_eq!(args.capacity.get(), 2);
        assert_eq!(args.remove, vec!["a"]);
        assert!(args.stats);
    }

    #[test]
    fn test_args_invalid_capacity() {
        assert!(Args::try_parse_from(["lrutrace", "-c", "0"]).is_err());
        assert!(Args::try_parse_from(["lrutrace", "-c", "-4"]).is_err());
        assert!(Args::try_parse_from(["lrutrace", "-c", "lots"]).is_err());
    }
}
