//! FlashBloom - command-line client
//!
//! Runs a single filter operation against a service and prints the result.

use anyhow::{anyhow, bail, Context};
use flashbloom::{ClientConfig, InsertOptions, Item, ScalableBloomFilter, TcpTransport};
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// A parsed operation and its operands
#[derive(Debug, PartialEq)]
enum Operation {
    Reserve {
        error_rate: f64,
        capacity: u64,
        expansion: Option<i64>,
    },
    Add(Item),
    MAdd(Vec<Item>),
    Exists(Item),
    MExists(Vec<Item>),
    Info,
    Insert {
        items: Vec<Item>,
        options: InsertOptions,
    },
}

/// Everything the command line asks for
#[derive(Debug)]
struct Invocation {
    config: ClientConfig,
    filter: String,
    operation: Operation,
}

enum Parsed {
    Run(Invocation),
    Help,
    Version,
}

impl Invocation {
    /// Parse the invocation from command-line arguments
    fn from_args(args: &[String]) -> anyhow::Result<Parsed> {
        let mut config = ClientConfig::default();
        let mut positional = Vec::new();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    config.host = value_of(args, i, "--host")?.to_string();
                    i += 2;
                }
                "--port" | "-p" => {
                    config.port = value_of(args, i, "--port")?
                        .parse()
                        .context("invalid port number")?;
                    i += 2;
                }
                "--namespace" => {
                    config.namespace = value_of(args, i, "--namespace")?.to_string();
                    i += 2;
                }
                "--help" => return Ok(Parsed::Help),
                "--version" | "-v" => return Ok(Parsed::Version),
                _ => {
                    // Everything from the operation on is positional.
                    positional.extend_from_slice(&args[i..]);
                    break;
                }
            }
        }

        let (op, rest) = positional
            .split_first()
            .ok_or_else(|| anyhow!("missing operation"))?;
        let (filter, operands) = rest
            .split_first()
            .ok_or_else(|| anyhow!("missing filter name"))?;

        Ok(Parsed::Run(Invocation {
            config,
            filter: filter.clone(),
            operation: parse_operation(op, operands)?,
        }))
    }
}

fn value_of<'a>(args: &'a [String], i: usize, flag: &str) -> anyhow::Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires a value", flag))
}

fn parse_operation(op: &str, operands: &[String]) -> anyhow::Result<Operation> {
    let items = |values: &[String]| -> Vec<Item> { values.iter().map(Item::from).collect() };
    let single = |values: &[String]| -> anyhow::Result<Item> {
        match values {
            [item] => Ok(Item::from(item)),
            _ => bail!("'{}' takes exactly one item", op),
        }
    };

    Ok(match op.to_ascii_lowercase().as_str() {
        "reserve" => match operands {
            [rate, capacity, rest @ ..] if rest.len() <= 1 => Operation::Reserve {
                error_rate: rate.parse().context("invalid error rate")?,
                capacity: capacity.parse().context("invalid capacity")?,
                expansion: rest
                    .first()
                    .map(|e| e.parse())
                    .transpose()
                    .context("invalid expansion rate")?,
            },
            _ => bail!("usage: reserve <filter> <error-rate> <capacity> [expansion]"),
        },
        "add" => Operation::Add(single(operands)?),
        "exists" => Operation::Exists(single(operands)?),
        "madd" => Operation::MAdd(items(operands)),
        "mexists" => Operation::MExists(items(operands)),
        "info" if operands.is_empty() => Operation::Info,
        "info" => bail!("'info' takes no operands"),
        "insert" => {
            let mut options = InsertOptions::default();
            let mut i = 0;
            while i < operands.len() {
                match operands[i].as_str() {
                    "--error" => {
                        options.error_rate = Some(
                            value_of(operands, i, "--error")?
                                .parse()
                                .context("invalid error rate")?,
                        );
                        i += 2;
                    }
                    "--capacity" => {
                        options.capacity = Some(
                            value_of(operands, i, "--capacity")?
                                .parse()
                                .context("invalid capacity")?,
                        );
                        i += 2;
                    }
                    "--expansion" => {
                        options.expansion = Some(
                            value_of(operands, i, "--expansion")?
                                .parse()
                                .context("invalid expansion rate")?,
                        );
                        i += 2;
                    }
                    "--nocreate" => {
                        options.upsert = false;
                        i += 1;
                    }
                    _ => break,
                }
            }
            Operation::Insert {
                items: items(&operands[i..]),
                options,
            }
        }
        other => bail!("unknown operation '{}'", other),
    })
}

fn print_help() {
    println!(
        r#"
FlashBloom - client for scalable bloom filter services

USAGE:
    flashbloom [OPTIONS] <OPERATION> <FILTER> [OPERANDS]

OPTIONS:
    -h, --host <HOST>         Host to connect to (default: 127.0.0.1)
    -p, --port <PORT>         Port to connect to (default: 6379)
        --namespace <NS>      Command namespace (default: BF)
    -v, --version             Print version information
        --help                Print this help message

OPERATIONS:
    reserve <filter> <error-rate> <capacity> [expansion]
    add     <filter> <item>
    madd    <filter> <item>...
    exists  <filter> <item>
    mexists <filter> <item>...
    info    <filter>
    insert  <filter> [--error R] [--capacity C] [--expansion E] [--nocreate] <item>...

EXAMPLES:
    flashbloom reserve users 0.001 10000
    flashbloom madd users alice bob
    flashbloom insert events --capacity 500 --nocreate login logout

LOGGING:
    Set RUST_LOG (e.g. RUST_LOG=flashbloom=debug) to see submitted commands.
"#
    );
}

fn outcome_line(outcome: &flashbloom::Result<bool>) -> String {
    match outcome {
        Ok(flag) => format!("(integer) {}", *flag as u8),
        Err(e) => format!("(error) {}", e),
    }
}

async fn run(invocation: Invocation) -> anyhow::Result<()> {
    let transport = TcpTransport::connect(&invocation.config)
        .await
        .with_context(|| format!("failed to connect to {}", invocation.config.address()))?;
    let filter =
        ScalableBloomFilter::with_config(Arc::new(transport), &invocation.filter, &invocation.config);
    debug!(filter = %invocation.filter, operation = ?invocation.operation, "Running");

    match invocation.operation {
        Operation::Reserve {
            error_rate,
            capacity,
            expansion,
        } => {
            match expansion {
                Some(e) => filter.reserve_with_expansion(error_rate, capacity, e).await?,
                None => filter.reserve(error_rate, capacity).await?,
            }
            println!("OK");
        }
        Operation::Add(item) => println!("(integer) {}", filter.add(item).await? as u8),
        Operation::Exists(item) => println!("(integer) {}", filter.exists(item).await? as u8),
        Operation::MExists(items) => {
            for (i, flag) in filter.mexists(items).await?.into_iter().enumerate() {
                println!("{}) (integer) {}", i + 1, flag as u8);
            }
        }
        Operation::MAdd(items) => {
            for (i, outcome) in filter.madd(items).await?.iter().enumerate() {
                println!("{}) {}", i + 1, outcome_line(outcome));
            }
        }
        Operation::Insert { items, options } => {
            for (i, outcome) in filter.insert(items, &options).await?.iter().enumerate() {
                println!("{}) {}", i + 1, outcome_line(outcome));
            }
        }
        Operation::Info => print!("{}", filter.info().await?),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match Invocation::from_args(&args) {
        Ok(Parsed::Run(invocation)) => run(invocation).await,
        Ok(Parsed::Help) => {
            print_help();
            Ok(())
        }
        Ok(Parsed::Version) => {
            println!("FlashBloom version {}", flashbloom::VERSION);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            print_help();
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn invocation(line: &str) -> Invocation {
        match Invocation::from_args(&args(line)).unwrap() {
            Parsed::Run(inv) => inv,
            _ => panic!("expected an operation"),
        }
    }

    #[test]
    fn test_connection_flags() {
        let inv = invocation("-h 10.0.0.1 --port 7000 --namespace CF info f");
        assert_eq!(inv.config.address(), "10.0.0.1:7000");
        assert_eq!(inv.config.namespace, "CF");
        assert_eq!(inv.filter, "f");
        assert_eq!(inv.operation, Operation::Info);
    }

    #[test]
    fn test_reserve() {
        let inv = invocation("reserve users 0.01 1000");
        assert_eq!(
            inv.operation,
            Operation::Reserve {
                error_rate: 0.01,
                capacity: 1000,
                expansion: None
            }
        );

        let inv = invocation("reserve users 0.01 1000 0");
        assert!(matches!(inv.operation, Operation::Reserve { expansion: Some(0), .. }));
    }

    #[test]
    fn test_insert_flags() {
        let inv = invocation("insert f --error 0.01 --capacity 100 --expansion -1 --nocreate a b");
        match inv.operation {
            Operation::Insert { items, options } => {
                assert_eq!(items, vec![Item::from("a"), Item::from("b")]);
                assert_eq!(
                    options,
                    InsertOptions {
                        error_rate: Some(0.01),
                        capacity: Some(100),
                        expansion: Some(-1),
                        upsert: false,
                    }
                );
            }
            other => panic!("unexpected operation {other:?}"),
        }
    }

    #[test]
    fn test_batch_items() {
        let inv = invocation("mexists f a b c");
        assert_eq!(
            inv.operation,
            Operation::MExists(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn test_errors() {
        assert!(Invocation::from_args(&args("")).is_err());
        assert!(Invocation::from_args(&args("add")).is_err());
        assert!(Invocation::from_args(&args("add f a b")).is_err());
        assert!(Invocation::from_args(&args("frobnicate f")).is_err());
        assert!(Invocation::from_args(&args("--port nope info f")).is_err());
        assert!(matches!(
            Invocation::from_args(&args("--help")),
            Ok(Parsed::Help)
        ));
    }
}
