use clap::Parser;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

mod discounts;
mod price;
mod rates;
mod shipment;

use discounts::Discounts;
use price::Price;
use rates::RateTable;
use shipment::RawShipment;

#[derive(Parser)]
struct Args {
    /// Shipment file with one transaction per line: date, size, carrier.
    #[arg(default_value = "input.txt")]
    file_path: PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let input = std::fs::File::open(args.file_path).expect("failed to open input file");
    price_shipments(BufReader::new(input), std::io::stdout()).expect("failed to write results");
}

/// Prices shipments line by line, in input order, writing one result line
/// per input line.
///
/// A valid line is echoed back with the charged price and the discount
/// taken appended ("-" when no discount applied). A rejected line is
/// echoed back with an `Ignored` marker naming the check it failed, and
/// does not touch any month's discount budget.
fn price_shipments(input: impl BufRead, mut output: impl Write) -> std::io::Result<()> {
    let rates = RateTable::standard();
    let mut discounts = Discounts::new();
    let mut total = 0u64;
    let mut ignored = 0u64;
    for line in input.lines() {
        let line = line?;
        total += 1;
        let validated = RawShipment::split(&line)
            .and_then(|raw| raw.validate().map(|shipment| (raw, shipment)));
        match validated {
            Ok((raw, shipment)) => {
                let quote = discounts.quote(&rates, &shipment);
                if quote.discount == Price::ZERO {
                    writeln!(
                        output,
                        "{} {} {} {} -",
                        raw.date, raw.size, raw.provider, quote.charged
                    )?;
                } else {
                    writeln!(
                        output,
                        "{} {} {} {} {}",
                        raw.date, raw.size, raw.provider, quote.charged, quote.discount
                    )?;
                }
            }
            Err(reason) => {
                log::warn!("ignoring line {:?}: {}", line, reason);
                ignored += 1;
                writeln!(output, "{} Ignored ({})", line.trim(), reason)?;
            }
        }
    }
    log::debug!("priced {} of {} lines", total - ignored, total);
    Ok(())
}
